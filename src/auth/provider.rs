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

//! Identity v3 token provider.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Local};
use log::{debug, error, trace};
use osauth::AuthType;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Url};
use static_assertions::assert_impl_all;
use tokio::sync::RwLock;

use super::catalog::ServiceCatalog;
use super::protocol::{AuthRoot, TokenInfo, TokenRoot};
use super::{
    Credentials, EndpointFilters, AUTH_HEADER, INVALID_SUBJECT_HEADER, MISSING_SUBJECT_HEADER,
    TOKEN_MIN_VALIDITY,
};
use crate::{check_response, expected_success, Error, ErrorKind, Result};

/// Authentication token with its details.
#[derive(Clone)]
pub struct AuthData {
    value: String,
    info: TokenInfo,
    catalog: ServiceCatalog,
}

impl fmt::Debug for AuthData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut hasher = DefaultHasher::new();
        self.value.hash(&mut hasher);
        write!(
            f,
            "AuthData {{ value: hash({}), info: {:?} }}",
            hasher.finish(),
            self.info
        )
    }
}

impl AuthData {
    /// The token itself.
    #[inline]
    pub fn token(&self) -> &str {
        &self.value
    }

    /// Token details.
    #[inline]
    pub fn info(&self) -> &TokenInfo {
        &self.info
    }

    /// Service catalog.
    #[inline]
    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Expiration time.
    #[inline]
    pub fn expires_at(&self) -> DateTime<FixedOffset> {
        self.info.expires_at
    }

    /// ID of the authenticated user.
    #[inline]
    pub fn user_id(&self) -> &str {
        &self.info.user.id
    }

    /// ID of the project (for project-scoped tokens).
    #[inline]
    pub fn project_id(&self) -> Option<&str> {
        self.info.project.as_ref().map(|p| p.id.as_str())
    }

    /// Role names of the user in the token scope.
    pub fn roles(&self) -> Vec<&str> {
        self.info
            .roles
            .iter()
            .filter_map(|r| r.name.as_deref())
            .collect()
    }
}

/// Password authentication using Identity API V3.
///
/// The token is cached while it's still valid or until
/// [refresh](#method.refresh) is forced. Unlike the password plugin of
/// `osauth`, the token details and the catalog are available through
/// [auth_data](#method.auth_data).
///
/// Implements `osauth::AuthType`, so requests are authenticated and
/// endpoints resolved through the same interface `osauth` sessions use.
pub struct AuthProvider {
    client: Client,
    body: AuthRoot,
    credentials: Credentials,
    token_endpoint: String,
    cached_token: RwLock<Option<AuthData>>,
}

assert_impl_all!(AuthProvider: AuthType, Send, Sync);

impl fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AuthProvider")
            .field("credentials", &self.credentials)
            .field("token_endpoint", &self.token_endpoint)
            .finish()
    }
}

/// Build the token URL from an Identity endpoint with or without `/v3`.
pub(crate) fn token_endpoint(auth_url: &str) -> Result<String> {
    let mut auth_url = Url::parse(auth_url)
        .map_err(|e| Error::new(ErrorKind::InvalidConfig, format!("Invalid auth_url: {}", e)))?;

    let _ = auth_url
        .path_segments_mut()
        .map_err(|_| Error::new(ErrorKind::InvalidConfig, "Invalid auth_url: wrong schema?"))?
        .pop_if_empty()
        .push("");

    Ok(if auth_url.as_str().ends_with("/v3/") {
        format!("{}auth/tokens", auth_url)
    } else {
        format!("{}v3/auth/tokens", auth_url)
    })
}

/// Extract the token from the `X-Subject-Token` header.
pub(crate) fn subject_token(headers: &HeaderMap, url: &str) -> Result<String> {
    match headers.get("x-subject-token") {
        Some(hdr) => match hdr.to_str() {
            Ok(s) => Ok(s.to_string()),
            Err(e) => {
                error!(
                    "Invalid X-Subject-Token {:?} received from {}: {}",
                    hdr, url, e
                );
                Err(Error::new(
                    ErrorKind::InvalidResponse,
                    INVALID_SUBJECT_HEADER,
                ))
            }
        },
        None => {
            error!("No X-Subject-Token header received from {}", url);
            Err(Error::new(
                ErrorKind::InvalidResponse,
                MISSING_SUBJECT_HEADER,
            ))
        }
    }
}

impl AuthProvider {
    /// Create a provider with a new HTTP client.
    pub fn new<U: AsRef<str>>(auth_url: U, credentials: Credentials) -> Result<AuthProvider> {
        AuthProvider::new_with_client(Client::new(), auth_url, credentials)
    }

    /// Create a provider using an existing HTTP client.
    pub fn new_with_client<U: AsRef<str>>(
        client: Client,
        auth_url: U,
        credentials: Credentials,
    ) -> Result<AuthProvider> {
        let body = AuthRoot::from_credentials(&credentials).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidCredentials,
                "A user name or ID and a password are required",
            )
        })?;
        if !credentials.is_valid() {
            return Err(Error::new(
                ErrorKind::InvalidCredentials,
                "A user domain is required when authenticating by user name",
            ));
        }

        Ok(AuthProvider {
            client,
            body,
            credentials,
            token_endpoint: token_endpoint(auth_url.as_ref())?,
            cached_token: RwLock::new(None),
        })
    }

    /// Credentials used by this provider.
    #[inline]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// HTTP client used by this provider.
    #[inline]
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// URL used to issue tokens.
    #[inline]
    pub fn token_endpoint(&self) -> &str {
        &self.token_endpoint
    }

    /// Token with its details, refreshed if needed.
    pub async fn auth_data(&self) -> Result<AuthData> {
        self.refresh(false).await?;
        let guard = self.cached_token.read().await;
        guard.clone().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidResponse,
                "Token was invalidated while being accessed",
            )
        })
    }

    /// Get the authentication token string.
    #[inline]
    pub async fn get_token(&self) -> Result<String> {
        Ok(self.auth_data().await?.value)
    }

    /// Get a URL for the requested service.
    pub async fn get_endpoint(
        &self,
        service_type: &str,
        filters: &EndpointFilters,
    ) -> Result<Url> {
        debug!(
            "Requesting a catalog endpoint for service '{}', filters {:?}",
            service_type, filters
        );
        let data = self.auth_data().await?;
        data.catalog.find_endpoint(service_type, filters)
    }

    /// Refresh the token (if needed or forced).
    pub async fn refresh(&self, force: bool) -> Result<()> {
        // This is executed every request at least once, so it's important to start with a read
        // lock. We expect to hit this branch most of the time.
        if !force && token_alive(&self.cached_token.read().await) {
            return Ok(());
        }

        let mut lock = self.cached_token.write().await;
        // Additonal check in case another task has updated the token while we were waiting for
        // the write lock.
        if !force && token_alive(&lock) {
            return Ok(());
        }

        *lock = Some(self.issue().await?);
        Ok(())
    }

    /// Drop the cached token.
    pub async fn invalidate(&self) {
        let mut lock = self.cached_token.write().await;
        *lock = None;
    }

    async fn issue(&self) -> Result<AuthData> {
        debug!(
            "Requesting a token for {:?} from {}",
            self.credentials.user(),
            self.token_endpoint
        );
        let resp = self
            .client
            .post(&self.token_endpoint)
            .json(&self.body)
            .send()
            .await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        debug!(
            "Request (auth): {} POST {}",
            status.as_u16(),
            self.token_endpoint
        );
        check_response(status, &headers, &body)?;
        expected_success(&[201], status)?;

        let value = subject_token(&headers, &self.token_endpoint)?;
        let root: TokenRoot = serde_json::from_slice(&body)?;
        debug!("Received a token expiring at {}", root.token.expires_at);
        trace!("Received catalog: {:?}", root.token.catalog);
        let catalog = ServiceCatalog::new(root.token.catalog.clone());
        Ok(AuthData {
            value,
            info: root.token,
            catalog,
        })
    }
}

#[async_trait]
impl AuthType for AuthProvider {
    /// Add the cached token to a request.
    async fn authenticate(
        &self,
        _client: &Client,
        request: RequestBuilder,
    ) -> ::std::result::Result<RequestBuilder, osauth::Error> {
        let token = self.get_token().await?;
        Ok(request.header(AUTH_HEADER, token))
    }

    /// Get a URL for the requested service.
    async fn get_endpoint(
        &self,
        _client: &Client,
        service_type: &str,
        filters: &EndpointFilters,
    ) -> ::std::result::Result<Url, osauth::Error> {
        Ok(AuthProvider::get_endpoint(self, service_type, filters).await?)
    }

    /// Refresh the cached token and service catalog.
    async fn refresh(&self, _client: &Client) -> ::std::result::Result<(), osauth::Error> {
        Ok(AuthProvider::refresh(self, true).await?)
    }
}

#[inline]
fn token_alive(token: &impl Deref<Target = Option<AuthData>>) -> bool {
    if let Some(value) = token.deref() {
        let validity_time_left = value.info.expires_at.signed_duration_since(Local::now());
        trace!("Token is valid for {:?}", validity_time_left);
        validity_time_left > Duration::minutes(TOKEN_MIN_VALIDITY)
    } else {
        false
    }
}

#[cfg(test)]
pub mod test {
    use httpmock::MockServer;
    use osauth::AuthType;
    use serde_json::json;

    use super::{token_endpoint, AuthProvider};
    use crate::auth::{endpoint_filters, Credentials, InterfaceType};
    use crate::test_utils;
    use crate::ErrorKind;

    #[test]
    fn test_token_endpoint() {
        for url in &[
            "http://127.0.0.1:8080/identity",
            "http://127.0.0.1:8080/identity/",
            "http://127.0.0.1:8080/identity/v3",
            "http://127.0.0.1:8080/identity/v3/",
        ] {
            assert_eq!(
                token_endpoint(url).unwrap(),
                "http://127.0.0.1:8080/identity/v3/auth/tokens"
            );
        }
        assert_eq!(
            token_endpoint("http://127.0.0.1:5000").unwrap(),
            "http://127.0.0.1:5000/v3/auth/tokens"
        );
    }

    #[test]
    fn test_token_endpoint_invalid() {
        assert_eq!(
            token_endpoint("http://127.0.0.1 8080/").unwrap_err().kind(),
            ErrorKind::InvalidConfig
        );
    }

    #[test]
    fn test_invalid_credentials() {
        let err = AuthProvider::new("http://127.0.0.1/identity", Credentials::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let server = MockServer::start_async().await;
        let keystone = test_utils::mock_keystone(&server).await;
        let auth = test_utils::auth_provider(&server);

        let data = auth.auth_data().await.unwrap();
        assert_eq!(data.token(), test_utils::TOKEN);
        assert_eq!(data.user_id(), test_utils::USER_ID);
        assert_eq!(data.project_id(), Some(test_utils::PROJECT_ID));
        assert_eq!(data.roles(), vec!["admin", "member"]);
        assert!(format!("{:?}", data).find(test_utils::TOKEN).is_none());

        let _ = auth.get_token().await.unwrap();
        keystone.assert_hits_async(1).await;

        auth.refresh(true).await.unwrap();
        keystone.assert_hits_async(2).await;

        auth.invalidate().await;
        let _ = auth.get_token().await.unwrap();
        keystone.assert_hits_async(3).await;
    }

    #[tokio::test]
    async fn test_get_endpoint() {
        let server = MockServer::start_async().await;
        let _keystone = test_utils::mock_keystone(&server).await;
        let auth = test_utils::auth_provider(&server);

        let public = endpoint_filters(InterfaceType::Public, None);
        let url = auth
            .get_endpoint("compute", &public)
            .await
            .unwrap();
        assert_eq!(url.as_str(), server.url("/compute/v2.1"));
        let err = auth
            .get_endpoint("volumev3", &public)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EndpointNotFound);
    }

    #[tokio::test]
    async fn test_auth_type() {
        let server = MockServer::start_async().await;
        let keystone = test_utils::mock_keystone(&server).await;
        let auth = test_utils::auth_provider(&server);
        let client = auth.http_client().clone();

        let request = AuthType::authenticate(&*auth, &client, client.get(server.url("/")))
            .await
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("x-auth-token").unwrap(),
            test_utils::TOKEN
        );

        let public = endpoint_filters(InterfaceType::Public, None);
        let url = AuthType::get_endpoint(&*auth, &client, "compute", &public)
            .await
            .unwrap();
        assert_eq!(url.as_str(), server.url("/compute/v2.1"));
        let err = AuthType::get_endpoint(&*auth, &client, "image", &public)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), osauth::ErrorKind::EndpointNotFound);
        keystone.assert_hits_async(1).await;

        AuthType::refresh(&*auth, &client).await.unwrap();
        keystone.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_authentication_failure() {
        let server = MockServer::start_async().await;
        let _keystone = server
            .mock_async(|when, then| {
                when.method("POST").path("/identity/v3/auth/tokens");
                then.status(401)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "error": {
                            "code": 401,
                            "message": "The request you have made requires authentication.",
                            "title": "Unauthorized"
                        }
                    }));
            })
            .await;
        let auth = test_utils::auth_provider(&server);

        let err = auth.get_token().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            err.message(),
            Some("The request you have made requires authentication.")
        );
    }

    #[tokio::test]
    async fn test_missing_subject_token() {
        let server = MockServer::start_async().await;
        let _keystone = server
            .mock_async(|when, then| {
                when.method("POST").path("/identity/v3/auth/tokens");
                then.status(201)
                    .header("content-type", "application/json")
                    .json_body(test_utils::token_body(&server));
            })
            .await;
        let auth = test_utils::auth_provider(&server);

        let err = auth.get_token().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }
}
