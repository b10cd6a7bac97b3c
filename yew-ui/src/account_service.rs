/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

//! Account calls made by the profile dialog.
//!
//! Errors are user-facing strings; the dialog logs them and shows its own
//! per-action message.

use std::fmt;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use watchparty_types::{LinkAccount, LinkKind};

use crate::auth::{ensure_fresh_token, load_session, AuthSession};
use crate::constants::{account_api_client, identity_client};

pub type ServiceResult<T> = Result<T, String>;

pub trait AccountService {
    fn linked_accounts(&self, session: AuthSession) -> LocalBoxFuture<'static, ServiceResult<Vec<LinkAccount>>>;

    fn send_password_reset(&self, email: String) -> LocalBoxFuture<'static, ServiceResult<()>>;

    fn send_email_verification(&self, session: AuthSession) -> LocalBoxFuture<'static, ServiceResult<()>>;

    fn unlink_discord(&self, session: AuthSession) -> LocalBoxFuture<'static, ServiceResult<()>>;

    fn delete_account(&self, session: AuthSession) -> LocalBoxFuture<'static, ServiceResult<()>>;
}

/// Backend and identity provider over HTTP, configured from `__APP_CONFIG`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpAccountService;

impl AccountService for HttpAccountService {
    fn linked_accounts(&self, session: AuthSession) -> LocalBoxFuture<'static, ServiceResult<Vec<LinkAccount>>> {
        async move {
            let token = id_token(session.clone()).await?;
            let client = account_api_client().map_err(|e| format!("Config error: {e}"))?;
            client
                .list_linked_accounts(&session.uid, &token)
                .await
                .map_err(|e| e.to_string())
        }
        .boxed_local()
    }

    fn send_password_reset(&self, email: String) -> LocalBoxFuture<'static, ServiceResult<()>> {
        async move {
            let client = identity_client().map_err(|e| format!("Config error: {e}"))?;
            client
                .send_password_reset_email(&email)
                .await
                .map_err(|e| e.to_string())
        }
        .boxed_local()
    }

    fn send_email_verification(&self, session: AuthSession) -> LocalBoxFuture<'static, ServiceResult<()>> {
        async move {
            let token = id_token(session).await?;
            let client = identity_client().map_err(|e| format!("Config error: {e}"))?;
            client
                .send_email_verification(&token)
                .await
                .map_err(|e| e.to_string())
        }
        .boxed_local()
    }

    fn unlink_discord(&self, session: AuthSession) -> LocalBoxFuture<'static, ServiceResult<()>> {
        async move {
            let token = id_token(session.clone()).await?;
            let client = account_api_client().map_err(|e| format!("Config error: {e}"))?;
            client
                .unlink_account(&session.uid, &token, LinkKind::Discord)
                .await
                .map_err(|e| e.to_string())
        }
        .boxed_local()
    }

    fn delete_account(&self, session: AuthSession) -> LocalBoxFuture<'static, ServiceResult<()>> {
        async move {
            let token = id_token(session.clone()).await?;
            let client = account_api_client().map_err(|e| format!("Config error: {e}"))?;
            client
                .delete_account(&session.uid, &token)
                .await
                .map_err(|e| e.to_string())
        }
        .boxed_local()
    }
}

/// A valid ID token for `session`, preferring a newer persisted copy.
async fn id_token(session: AuthSession) -> ServiceResult<String> {
    let latest = load_session()
        .filter(|stored| stored.uid == session.uid)
        .unwrap_or(session);
    ensure_fresh_token(&latest)
        .await
        .map(|s| s.id_token)
        .map_err(|e| format!("{e:#}"))
}

/// Shared service handle, comparable by identity so it can live in props.
#[derive(Clone)]
pub struct AccountServiceHandle(pub Rc<dyn AccountService>);

impl AccountServiceHandle {
    pub fn new<S: AccountService + 'static>(service: S) -> Self {
        Self(Rc::new(service))
    }
}

impl Default for AccountServiceHandle {
    fn default() -> Self {
        Self::new(HttpAccountService)
    }
}

impl PartialEq for AccountServiceHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for AccountServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccountServiceHandle")
    }
}
