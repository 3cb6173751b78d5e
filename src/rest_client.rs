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

//! Low-level REST client.
//!
//! Every request is authenticated with `X-Auth-Token`, carries microversion
//! headers when a microversion is set, and is checked against the list of
//! expected success codes.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, trace};
use osauth::AuthType;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::auth::{AuthProvider, EndpointFilters, AUTH_HEADER};
use super::common::{parse_api_version, Microversion};
use super::{check_response, expected_success, Error, ErrorKind, Query, Result};

const SUBJECT_HEADER: &str = "X-Subject-Token";
const MICROVERSION_HEADER: &str = "OpenStack-API-Version";

/// Description of an OpenStack service.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Service {
    /// Service type in the catalog.
    pub catalog_type: &'static str,
    /// Version path component appended to catalog endpoints lacking it.
    pub version_suffix: &'static str,
    /// Service name used in the `OpenStack-API-Version` header.
    pub microversion_name: Option<&'static str>,
    /// Service-specific legacy microversion header.
    pub legacy_microversion_header: Option<&'static str>,
}

/// Compute service (Nova), API v2.1.
pub const COMPUTE: Service = Service {
    catalog_type: "compute",
    version_suffix: "v2.1",
    microversion_name: Some("compute"),
    legacy_microversion_header: Some("X-OpenStack-Nova-API-Version"),
};

/// Identity service (Keystone), API v3.
pub const IDENTITY: Service = Service {
    catalog_type: "identity",
    version_suffix: "v3",
    microversion_name: None,
    legacy_microversion_header: None,
};

/// A client for one service.
#[derive(Clone, Debug)]
pub struct RestClient {
    auth: Arc<AuthProvider>,
    service: Service,
    filters: EndpointFilters,
    microversion: Option<Microversion>,
    name: String,
}

impl RestClient {
    /// Create a client for the service.
    pub fn new(auth: Arc<AuthProvider>, service: Service, filters: EndpointFilters) -> RestClient {
        RestClient {
            auth,
            service,
            filters,
            microversion: None,
            name: service.catalog_type.to_string(),
        }
    }

    /// Set the name used in logging.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> RestClient {
        self.name = name.into();
        self
    }

    /// Set the default microversion for all requests.
    pub fn with_microversion<V: Into<Option<Microversion>>>(mut self, version: V) -> RestClient {
        self.microversion = version.into();
        self
    }

    /// Authentication provider.
    #[inline]
    pub fn auth(&self) -> &Arc<AuthProvider> {
        &self.auth
    }

    /// Default microversion.
    #[inline]
    pub fn microversion(&self) -> Option<Microversion> {
        self.microversion
    }

    /// Name used in logging.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Service description.
    #[inline]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Endpoint of the service including the version component.
    pub async fn base_url(&self) -> Result<Url> {
        let mut endpoint = AuthType::get_endpoint(
            self.auth.as_ref(),
            self.auth.http_client(),
            self.service.catalog_type,
            &self.filters,
        )
        .await?;
        let suffix = self.service.version_suffix;
        let has_version = endpoint
            .path_segments()
            .map(|mut segments| segments.any(|seg| seg == suffix))
            .unwrap_or(false);
        if !has_version {
            let _ = endpoint
                .path_segments_mut()
                .map_err(|_| invalid_endpoint(&self.name))?
                .pop_if_empty()
                .push(suffix);
        }
        Ok(endpoint)
    }

    /// Full URL for the path segments.
    pub async fn url(&self, path: &[&str]) -> Result<Url> {
        let mut url = self.base_url().await?;
        let _ = url
            .path_segments_mut()
            .map_err(|_| invalid_endpoint(&self.name))?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    /// Start a request.
    pub fn request<'c>(&'c self, method: Method, path: &[&str]) -> RestRequest<'c> {
        RestRequest {
            client: self,
            method,
            path: path.iter().map(|s| s.to_string()).collect(),
            query: Query::new(),
            headers: Vec::new(),
            body: None,
            authenticated: true,
            microversion: self.microversion,
        }
    }

    /// Start a GET request.
    #[inline]
    pub fn get<'c>(&'c self, path: &[&str]) -> RestRequest<'c> {
        self.request(Method::GET, path)
    }

    /// Start a POST request.
    #[inline]
    pub fn post<'c>(&'c self, path: &[&str]) -> RestRequest<'c> {
        self.request(Method::POST, path)
    }

    /// Start a PUT request.
    #[inline]
    pub fn put<'c>(&'c self, path: &[&str]) -> RestRequest<'c> {
        self.request(Method::PUT, path)
    }

    /// Start a PATCH request.
    #[inline]
    pub fn patch<'c>(&'c self, path: &[&str]) -> RestRequest<'c> {
        self.request(Method::PATCH, path)
    }

    /// Start a DELETE request.
    #[inline]
    pub fn delete<'c>(&'c self, path: &[&str]) -> RestRequest<'c> {
        self.request(Method::DELETE, path)
    }

    /// Start a HEAD request.
    #[inline]
    pub fn head<'c>(&'c self, path: &[&str]) -> RestRequest<'c> {
        self.request(Method::HEAD, path)
    }

    fn check_microversion(&self, requested: Option<Microversion>, headers: &HeaderMap) -> Result<()> {
        let (name, version) = match (self.service.microversion_name, requested) {
            (Some(name), Some(Microversion::Version(version))) => (name, version),
            _ => return Ok(()),
        };

        let returned = headers
            .get(MICROVERSION_HEADER)
            .and_then(|hdr| hdr.to_str().ok())
            .and_then(|value| value.trim().strip_prefix(name))
            .map(|value| value.trim().to_string())
            .or_else(|| {
                self.service
                    .legacy_microversion_header
                    .and_then(|legacy| headers.get(legacy))
                    .and_then(|hdr| hdr.to_str().ok())
                    .map(|value| value.trim().to_string())
            });

        match returned {
            Some(value) => match parse_api_version(&value) {
                Ok(received) if received == version => Ok(()),
                _ => Err(Error::new(
                    ErrorKind::InvalidResponse,
                    format!(
                        "Requested microversion {} but the server responded with {}",
                        Microversion::Version(version),
                        value
                    ),
                )),
            },
            None => Err(Error::new(
                ErrorKind::InvalidResponse,
                format!(
                    "Microversion {} was requested but the response has no {} header",
                    Microversion::Version(version),
                    MICROVERSION_HEADER
                ),
            )),
        }
    }
}

fn invalid_endpoint(name: &str) -> Error {
    Error::new(
        ErrorKind::InvalidResponse,
        format!("Endpoint of {} cannot be used as a base URL", name),
    )
}

fn is_secret_header(name: &str) -> bool {
    name.eq_ignore_ascii_case(AUTH_HEADER) || name.eq_ignore_ascii_case(SUBJECT_HEADER)
}

/// A request being built.
#[derive(Debug)]
#[must_use = "requests do nothing until sent"]
pub struct RestRequest<'c> {
    client: &'c RestClient,
    method: Method,
    path: Vec<String>,
    query: Query,
    headers: Vec<(String, String)>,
    body: Option<Result<Vec<u8>>>,
    authenticated: bool,
    microversion: Option<Microversion>,
}

impl<'c> RestRequest<'c> {
    /// Add a query parameter.
    pub fn query<K: Into<String>, V: Display>(mut self, key: K, value: V) -> Self {
        self.query.push(key, value);
        self
    }

    /// Add all parameters from a query.
    pub fn query_all(mut self, query: &Query) -> Self {
        self.query.0.extend(query.0.iter().cloned());
        self
    }

    /// Set a JSON body.
    ///
    /// Serialization errors are reported on sending.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.body = Some(serde_json::to_vec(body).map_err(Error::from));
        self
    }

    /// Add a header.
    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add the `X-Subject-Token` header.
    pub fn subject_token<S: Into<String>>(self, token: S) -> Self {
        self.header(SUBJECT_HEADER, token)
    }

    /// Do not send the authentication token.
    pub fn no_auth(mut self) -> Self {
        self.authenticated = false;
        self
    }

    /// Override the microversion for this request.
    pub fn microversion<V: Into<Option<Microversion>>>(mut self, version: V) -> Self {
        self.microversion = version.into();
        self
    }

    /// Send the request and check the status against the expected success codes.
    pub async fn send(self, expected: &[u16]) -> Result<RestResponse> {
        let client = self.client;
        let path: Vec<&str> = self.path.iter().map(String::as_str).collect();
        let url = client.url(&path).await?;

        let mut builder = client
            .auth
            .http_client()
            .request(self.method.clone(), url.clone());
        if !self.query.is_empty() {
            builder = builder.query(&self.query.0);
        }
        if self.authenticated {
            builder =
                AuthType::authenticate(client.auth.as_ref(), client.auth.http_client(), builder)
                    .await?;
        }
        if let (Some(name), Some(version)) = (client.service.microversion_name, self.microversion)
        {
            builder = builder.header(MICROVERSION_HEADER, format!("{} {}", name, version));
            if let Some(legacy) = client.service.legacy_microversion_header {
                builder = builder.header(legacy, version.to_string());
            }
        }
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = self.body {
            let body = body?;
            if log::log_enabled!(log::Level::Trace) {
                let text = String::from_utf8_lossy(&body);
                if text.contains("\"password\"") {
                    trace!("Request body: <omitted>");
                } else {
                    trace!("Request body: {}", text);
                }
            }
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }
        trace!(
            "Request headers: {:?}, microversion: {:?}",
            self.headers
                .iter()
                .map(|(k, v)| (k.as_str(), if is_secret_header(k) { "<omitted>" } else { v.as_str() }))
                .collect::<Vec<_>>(),
            self.microversion
        );

        let start = Instant::now();
        let resp = builder.send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?.to_vec();
        debug!(
            "Request ({}): {} {} {} {:.3}s",
            client.name,
            status.as_u16(),
            self.method,
            url,
            start.elapsed().as_secs_f64()
        );
        trace!(
            "Response headers: {:?}",
            headers
                .iter()
                .filter(|(k, _)| !is_secret_header(k.as_str()))
                .collect::<Vec<_>>()
        );
        trace!("Response body: {}", String::from_utf8_lossy(&body));

        check_response(status, &headers, &body)?;
        expected_success(expected, status)?;
        client.check_microversion(self.microversion, &headers)?;

        Ok(RestResponse {
            status,
            headers,
            body,
        })
    }

    /// Send the request and parse the JSON response.
    pub async fn fetch<T: DeserializeOwned>(self, expected: &[u16]) -> Result<T> {
        self.send(expected).await?.json()
    }
}

/// A successful response.
#[derive(Clone, Debug)]
pub struct RestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl RestResponse {
    /// Response status.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of a header, if present and valid.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|hdr| hdr.to_str().ok())
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::new_with_details(
                ErrorKind::InvalidResponse,
                Some(self.status),
                Some(format!("Failed to parse response body: {}", e)),
            )
        })
    }

    /// The body as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether the body is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
