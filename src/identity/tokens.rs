// Copyright 2018 Dmitry Tantsur <divius.inside@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Token API.

use log::debug;

use super::super::auth::protocol::{AuthRoot, TokenRoot};
use super::super::auth::provider::subject_token;
use super::super::auth::{CatalogRecord, Credentials, TokenInfo};
use super::super::{Error, ErrorKind, Result};
use super::protocol::CatalogRoot;

service_client! {
    /// Token API: issuing, validating and revoking tokens.
    TokensClient
}

impl TokensClient {
    /// Issue a new token with password authentication.
    ///
    /// The request is sent without the client's own token.
    pub async fn issue_token(&self, credentials: &Credentials) -> Result<(String, TokenInfo)> {
        let body = AuthRoot::from_credentials(credentials).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidCredentials,
                "Password authentication requires a user and a password",
            )
        })?;
        debug!("Issuing a token for {:?}", credentials.user());
        let response = self
            .client
            .post(&["auth", "tokens"])
            .no_auth()
            .json(&body)
            .send(&[201])
            .await?;
        let token = subject_token(response.headers(), "auth/tokens")?;
        let root: TokenRoot = response.json()?;
        Ok((token, root.token))
    }

    /// Validate a token and return its details.
    pub async fn show_token<S: Into<String>>(&self, token: S) -> Result<TokenInfo> {
        let root: TokenRoot = self
            .client
            .get(&["auth", "tokens"])
            .subject_token(token)
            .fetch(&[200])
            .await?;
        Ok(root.token)
    }

    /// Check that a token is valid.
    pub async fn check_token<S: Into<String>>(&self, token: S) -> Result<()> {
        let _ = self
            .client
            .head(&["auth", "tokens"])
            .subject_token(token)
            .send(&[200])
            .await?;
        Ok(())
    }

    /// Revoke a token.
    pub async fn revoke_token<S: Into<String>>(&self, token: S) -> Result<()> {
        debug!("Revoking a token");
        let _ = self
            .client
            .delete(&["auth", "tokens"])
            .subject_token(token)
            .send(&[204])
            .await?;
        Ok(())
    }

    /// Service catalog of the client's token.
    pub async fn show_catalog(&self) -> Result<Vec<CatalogRecord>> {
        let root: CatalogRoot = self
            .client
            .get(&["auth", "catalog"])
            .fetch(&[200])
            .await?;
        Ok(root.catalog)
    }
}
