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

//! Credential providers.
//!
//! Tests request credentials by type. Depending on the configuration they
//! are either created on the fly by [DynamicCredentials](struct.DynamicCredentials.html)
//! or taken from a list of accounts by
//! [PreProvisionedCredentials](struct.PreProvisionedCredentials.html).

use std::fmt;

use async_trait::async_trait;

use super::auth::Credentials;
use super::config::Config;
use super::Result;

mod dynamic;
mod preprovisioned;

pub use self::dynamic::DynamicCredentials;
pub use self::preprovisioned::{Account, PreProvisionedCredentials};

/// Type of requested credentials.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CredentialType {
    /// Regular user of the main project.
    Primary,
    /// Cloud administrator.
    Admin,
    /// Regular user of another project.
    Alt,
    /// User with the given roles.
    Roles(Vec<String>),
}

impl CredentialType {
    /// Credentials of a user with the given roles.
    ///
    /// Roles are sorted and de-duplicated.
    pub fn roles<I, S>(roles: I) -> CredentialType
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roles: Vec<String> = roles.into_iter().map(Into::into).collect();
        roles.sort();
        roles.dedup();
        CredentialType::Roles(roles)
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CredentialType::Primary => f.write_str("primary"),
            CredentialType::Admin => f.write_str("admin"),
            CredentialType::Alt => f.write_str("alt"),
            CredentialType::Roles(roles) => write!(f, "roles:{}", roles.join(",")),
        }
    }
}

/// Source of credentials for tests.
#[async_trait]
pub trait CredentialProvider: fmt::Debug + Send + Sync {
    /// Get (and cache) credentials of the given type.
    async fn get_creds(&mut self, kind: &CredentialType) -> Result<Credentials>;

    /// Get credentials with the given roles.
    ///
    /// With `force_new` cached credentials for the same roles are replaced.
    async fn get_creds_by_roles(&mut self, roles: &[String], force_new: bool)
        -> Result<Credentials>;

    /// Release or delete everything handed out so far.
    async fn clear_creds(&mut self) -> Result<()>;

    /// Whether different credential types map to different users.
    fn is_multi_user(&self) -> bool;

    /// Whether different credential types map to different projects.
    fn is_multi_tenant(&self) -> bool;

    /// Whether administrator credentials can be provided.
    fn is_admin_available(&self) -> bool;

    /// Whether credentials with the role can be provided.
    fn is_role_available(&self, role: &str) -> bool;

    /// Credentials of the primary user.
    async fn get_primary_creds(&mut self) -> Result<Credentials> {
        self.get_creds(&CredentialType::Primary).await
    }

    /// Credentials of the administrator.
    async fn get_admin_creds(&mut self) -> Result<Credentials> {
        self.get_creds(&CredentialType::Admin).await
    }

    /// Credentials of the alternative user.
    async fn get_alt_creds(&mut self) -> Result<Credentials> {
        self.get_creds(&CredentialType::Alt).await
    }
}

/// Create a credential provider according to the configuration.
///
/// The name is used as a prefix for created resources.
pub fn get_credentials_provider<S: Into<String>>(
    config: &Config,
    name: S,
) -> Result<Box<dyn CredentialProvider>> {
    if config.auth.use_dynamic_credentials {
        Ok(Box::new(DynamicCredentials::new(config.clone(), name)?))
    } else {
        Ok(Box::new(PreProvisionedCredentials::new(config, name)?))
    }
}
