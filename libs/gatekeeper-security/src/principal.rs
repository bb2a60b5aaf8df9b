use std::fmt;

use serde::{Deserialize, Serialize};

/// A single identity claim (user name, user id, e-mail, ...) asserted by a realm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    realm: String,
    value: String,
}

impl Principal {
    #[must_use]
    pub fn new(realm: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            value: value.into(),
        }
    }

    /// Name of the realm that asserted this principal.
    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Ordered, deduplicated collection of principals.
///
/// The first principal inserted is the *primary* principal. An empty collection
/// means "no identity" and is treated the same as an absent one everywhere in
/// the security manager.
///
/// Serialized as a plain sequence. Deserialization goes through
/// [`add`](Self::add), so duplicates in stored data are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Principal>", into = "Vec<Principal>")]
pub struct PrincipalCollection {
    principals: Vec<Principal>,
}

impl PrincipalCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from values asserted by a single realm.
    #[must_use]
    pub fn from_realm<I, S>(realm: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collection = Self::new();
        for value in values {
            collection.add(Principal::new(realm, value));
        }
        collection
    }

    /// Append a principal. Returns `false` if it was already present.
    pub fn add(&mut self, principal: Principal) -> bool {
        if self.principals.contains(&principal) {
            return false;
        }
        self.principals.push(principal);
        true
    }

    /// Append every principal of `other` that is not present yet, keeping order.
    pub fn add_all(&mut self, other: &PrincipalCollection) {
        for principal in &other.principals {
            self.add(principal.clone());
        }
    }

    #[must_use]
    pub fn primary(&self) -> Option<&Principal> {
        self.principals.first()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Principal> {
        self.principals.iter()
    }

    /// Principals asserted by `realm`, in insertion order.
    pub fn by_realm<'a>(&'a self, realm: &'a str) -> impl Iterator<Item = &'a Principal> + 'a {
        self.principals.iter().filter(move |p| p.realm == realm)
    }

    /// Distinct realm names in first-seen order.
    #[must_use]
    pub fn realm_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for principal in &self.principals {
            if !names.contains(&principal.realm.as_str()) {
                names.push(&principal.realm);
            }
        }
        names
    }

    /// `None` for an empty collection, so callers can treat "empty" and "absent" alike.
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

impl<'a> IntoIterator for &'a PrincipalCollection {
    type Item = &'a Principal;
    type IntoIter = std::slice::Iter<'a, Principal>;

    fn into_iter(self) -> Self::IntoIter {
        self.principals.iter()
    }
}

impl FromIterator<Principal> for PrincipalCollection {
    fn from_iter<T: IntoIterator<Item = Principal>>(iter: T) -> Self {
        let mut collection = Self::new();
        for principal in iter {
            collection.add(principal);
        }
        collection
    }
}

impl From<Vec<Principal>> for PrincipalCollection {
    fn from(principals: Vec<Principal>) -> Self {
        principals.into_iter().collect()
    }
}

impl From<PrincipalCollection> for Vec<Principal> {
    fn from(collection: PrincipalCollection) -> Self {
        collection.principals
    }
}

impl fmt::Display for PrincipalCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, principal) in self.principals.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{principal}")?;
        }
        f.write_str("]")
    }
}
