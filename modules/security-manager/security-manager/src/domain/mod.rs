//! Domain layer for the security manager.

pub mod binder;
pub mod context_builder;
pub mod error;
pub mod factory;
pub mod local_client;
pub mod remembered;
pub mod service;
pub mod session_resolver;

pub use binder::{BindError, ScopedSubjectBinder, SessionSubjectBinder, SubjectBinder};
pub use context_builder::ContextBuilder;
pub use error::DomainError;
pub use factory::{DefaultSubjectFactory, FactoryError, SubjectFactory};
pub use local_client::SecurityManagerLocalClient;
pub use remembered::RememberedIdentity;
pub use service::{LoginState, Service, ServiceBuilder};
pub use session_resolver::{IgnoreInvalidSessions, InvalidSessionListener, SessionResolver};
