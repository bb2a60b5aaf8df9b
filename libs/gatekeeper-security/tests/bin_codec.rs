#![allow(clippy::unwrap_used, clippy::expect_used)]

use gatekeeper_security::{
    PRINCIPALS_BIN_VERSION, Principal, PrincipalCollection, decode_principals, encode_principals,
};

#[test]
fn round_trips_multi_realm_principals() {
    let mut principals = PrincipalCollection::from_realm("ldap", ["jsmith", "1001"]);
    principals.add(Principal::new("db", "42"));

    let encoded = encode_principals(&principals).expect("principals encode");
    let decoded = decode_principals(&encoded).expect("principals decode");

    // Order is part of the contract: the first principal stays primary
    assert_eq!(decoded, principals);
    assert_eq!(decoded.primary().map(Principal::value), Some("jsmith"));
}

#[test]
fn decode_rejects_unknown_version() {
    let principals = PrincipalCollection::from_realm("ldap", ["jsmith"]);

    let mut encoded = encode_principals(&principals).expect("encodes principals");
    encoded[0] = PRINCIPALS_BIN_VERSION.wrapping_add(1);

    let err = decode_principals(&encoded).expect_err("version mismatch should error");
    let message = err.to_string();
    assert!(
        message.contains("unsupported principals version"),
        "expected version error, got: {message}"
    );
}

#[test]
fn decode_rejects_empty_and_truncated_input() {
    assert!(decode_principals(&[]).is_err());

    let principals = PrincipalCollection::from_realm("ldap", ["jsmith"]);
    let encoded = encode_principals(&principals).expect("encodes principals");
    assert!(decode_principals(&encoded[..encoded.len() - 2]).is_err());
}

#[test]
fn decode_drops_duplicate_principals() {
    let jsmith = Principal::new("ldap", "jsmith");
    let payload = postcard::to_allocvec(&vec![jsmith.clone(), Principal::new("db", "42"), jsmith])
        .expect("raw payload encodes");
    let mut encoded = vec![PRINCIPALS_BIN_VERSION];
    encoded.extend_from_slice(&payload);

    let decoded = decode_principals(&encoded).expect("principals decode");

    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.primary().map(Principal::value), Some("jsmith"));
}
