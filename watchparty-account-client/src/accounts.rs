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
 */

//! Account endpoints: `/linkAccount` and `/deleteAccount`.

use watchparty_types::account::{
    DeleteAccountRequest, LinkAccount, LinkAccountQuery, LinkKind, UnlinkAccountRequest,
};

use crate::error::ApiError;
use crate::{parse_json, parse_status_only, AccountApiClient};

impl AccountApiClient {
    /// List the third-party accounts linked to `uid`.
    ///
    /// Calls `GET /linkAccount?uid={uid}&token={token}`.
    pub async fn list_linked_accounts(
        &self,
        uid: &str,
        token: &str,
    ) -> Result<Vec<LinkAccount>, ApiError> {
        let query = LinkAccountQuery {
            uid: uid.to_string(),
            token: token.to_string(),
        };
        let response = self.get("/linkAccount").query(&query).send().await?;
        parse_json(response).await
    }

    /// Remove the link to a third-party account.
    ///
    /// Calls `DELETE /linkAccount` with `{uid, token, kind}`.
    pub async fn unlink_account(
        &self,
        uid: &str,
        token: &str,
        kind: LinkKind,
    ) -> Result<(), ApiError> {
        log::info!("Unlinking {kind} account for {uid}");
        let body = UnlinkAccountRequest {
            uid: uid.to_string(),
            token: token.to_string(),
            kind,
        };
        let response = self.delete("/linkAccount").json(&body).send().await?;
        parse_status_only(response).await
    }

    /// Permanently delete the user's account.
    ///
    /// Calls `DELETE /deleteAccount` with `{uid, token}`.
    pub async fn delete_account(&self, uid: &str, token: &str) -> Result<(), ApiError> {
        log::warn!("Deleting account {uid}");
        let body = DeleteAccountRequest {
            uid: uid.to_string(),
            token: token.to_string(),
        };
        let response = self.delete("/deleteAccount").json(&body).send().await?;
        parse_status_only(response).await
    }
}
