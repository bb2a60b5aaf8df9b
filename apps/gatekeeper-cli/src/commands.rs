use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use gatekeeper_security::{AuthenticationToken, CallerScope, RememberMeUpdate, SessionId, Subject};
use security_manager_sdk::SecurityManagerError;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::runtime::Runtime;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account name
    #[arg(short, long)]
    pub username: String,

    /// Account password
    #[arg(short, long)]
    pub password: String,

    /// Ask the remember-me provider to remember the identity
    #[arg(long)]
    pub remember_me: bool,

    /// Log out again right after a successful login
    #[arg(long)]
    pub logout: bool,

    /// Host the caller connects from
    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Cookie value printed by a previous `login --remember-me`
    #[arg(long)]
    pub remember_me_cookie: Option<String>,

    /// Host the caller connects from
    #[arg(long)]
    pub host: Option<String>,
}

/// Cookie instruction for the client, as printed.
#[derive(Debug, Serialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
enum CookieReport {
    Unchanged,
    Set(String),
    Cleared,
}

impl From<RememberMeUpdate> for CookieReport {
    fn from(update: RememberMeUpdate) -> Self {
        match update {
            RememberMeUpdate::Unchanged => Self::Unchanged,
            RememberMeUpdate::Set(cookie) => Self::Set(cookie),
            RememberMeUpdate::Cleared => Self::Cleared,
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginReport {
    session_id: SessionId,
    subject: Subject,
    logged_out: bool,
    active_sessions: usize,
    remember_me: CookieReport,
}

#[derive(Debug, Serialize)]
struct WhoamiReport {
    subject: Subject,
    remember_me: CookieReport,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

fn caller_scope(host: Option<&str>) -> CallerScope {
    match host {
        Some(host) => CallerScope::new().host(host),
        None => CallerScope::new(),
    }
}

/// Validate the configuration by wiring every plugin, then print it.
///
/// # Errors
///
/// Fails when a plugin rejects its section.
pub fn check_config(cfg: &AppConfig) -> Result<()> {
    Runtime::init(cfg).context("configuration rejected")?;
    info!("Configuration is valid");
    print_json(cfg)
}

/// Log in within a freshly created session.
///
/// # Errors
///
/// Fails when wiring fails or the login is rejected.
pub async fn login(cfg: &AppConfig, args: &LoginArgs) -> Result<()> {
    let runtime = Runtime::init(cfg)?;
    let session = runtime.sessions.create(args.host.clone());
    let session_id = session.id().clone();

    let mut token = AuthenticationToken::new(args.username.as_str(), args.password.clone())
        .remember_me(args.remember_me);
    if let Some(host) = &args.host {
        token = token.host(host.as_str());
    }

    let client = Arc::clone(&runtime.client);
    let logout = args.logout;
    let exit = caller_scope(args.host.as_deref())
        .session_id(session_id.clone())
        .run(async move {
            let subject = client.login(token).await?;
            if logout {
                client.logout(Some(subject.as_ref())).await?;
            }
            Ok::<_, SecurityManagerError>(subject)
        })
        .await;
    let subject = exit.output.context("login failed")?;

    print_json(&LoginReport {
        session_id,
        subject: Arc::unwrap_or_clone(subject),
        logged_out: logout,
        active_sessions: runtime.sessions.active_count(),
        remember_me: exit.remember_me.into(),
    })
}

/// Resolve the subject a caller presenting only ambient clues would get.
///
/// # Errors
///
/// Fails when wiring fails or resolution hits an internal error.
pub async fn whoami(cfg: &AppConfig, args: &WhoamiArgs) -> Result<()> {
    let runtime = Runtime::init(cfg)?;
    if args.remember_me_cookie.is_some() && cfg.cookie_remember_me.is_none() {
        warn!("Remember-me cookie given but cookie_remember_me is not configured, ignoring it");
    }

    let mut scope = caller_scope(args.host.as_deref());
    if let Some(cookie) = &args.remember_me_cookie {
        scope = scope.remember_me_cookie(cookie.as_str());
    }

    let client = Arc::clone(&runtime.client);
    let exit = scope.run(async move { client.subject().await }).await;
    let subject = exit.output.context("subject resolution failed")?;

    print_json(&WhoamiReport {
        subject: Arc::unwrap_or_clone(subject),
        remember_me: exit.remember_me.into(),
    })
}
