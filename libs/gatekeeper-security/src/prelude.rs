pub use crate::context::{ContextKey, SubjectContext};
pub use crate::principal::{Principal, PrincipalCollection};
pub use crate::scope::CallerScope;
pub use crate::session::{Session, SessionId};
pub use crate::subject::Subject;
pub use crate::token::{AuthenticationInfo, AuthenticationToken};
