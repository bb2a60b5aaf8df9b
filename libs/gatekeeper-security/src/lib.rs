#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod bin_codec;
pub mod constants;
pub mod context;
pub mod prelude;
pub mod principal;
pub mod scope;
pub mod session;
pub mod subject;
pub mod token;

pub use context::{ContextKey, SubjectContext};
pub use principal::{Principal, PrincipalCollection};
pub use scope::{CallerScope, RememberMeUpdate, ScopeError, ScopeExit};
pub use session::{Session, SessionId};
pub use subject::Subject;
pub use token::{AuthenticationInfo, AuthenticationToken};

pub use bin_codec::{
    PRINCIPALS_BIN_VERSION, PrincipalsDecodeError, PrincipalsEncodeError, decode_principals,
    encode_principals,
};
