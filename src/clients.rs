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

//! Client manager.

use std::sync::Arc;

use log::debug;
use reqwest::Client;

use super::auth::{AuthProvider, Credentials};
#[cfg(feature = "compute")]
use super::common::Microversion;
#[cfg(feature = "compute")]
use super::compute::{
    AggregatesClient, AvailabilityZoneClient, FlavorsClient, HypervisorsClient, KeyPairsClient,
    LimitsClient, QuotaClassesClient, QuotasClient, SecurityGroupsClient, ServersClient,
    ServicesClient,
};
use super::config::Config;
use super::identity::{DomainsClient, ProjectsClient, RolesClient, TokensClient, UsersClient};
use super::rest_client::{RestClient, IDENTITY};
#[cfg(feature = "compute")]
use super::rest_client::COMPUTE;
use super::{Error, ErrorKind, Result};

/// Every API client for one set of credentials.
///
/// All clients share the same authentication provider, so a token is only
/// requested once.
#[derive(Debug, Clone)]
pub struct Manager {
    auth: Arc<AuthProvider>,
    /// Token API.
    pub tokens: TokensClient,
    /// Projects API.
    pub projects: ProjectsClient,
    /// Users API.
    pub users: UsersClient,
    /// Roles and role assignments API.
    pub roles: RolesClient,
    /// Domains API.
    pub domains: DomainsClient,
    /// Servers API.
    #[cfg(feature = "compute")]
    pub servers: ServersClient,
    /// Flavors API.
    #[cfg(feature = "compute")]
    pub flavors: FlavorsClient,
    /// Host aggregates API.
    #[cfg(feature = "compute")]
    pub aggregates: AggregatesClient,
    /// Availability zones API.
    #[cfg(feature = "compute")]
    pub availability_zones: AvailabilityZoneClient,
    /// Quotas API.
    #[cfg(feature = "compute")]
    pub quotas: QuotasClient,
    /// Quota classes API.
    #[cfg(feature = "compute")]
    pub quota_classes: QuotaClassesClient,
    /// Key pairs API.
    #[cfg(feature = "compute")]
    pub keypairs: KeyPairsClient,
    /// Security groups API.
    #[cfg(feature = "compute")]
    pub security_groups: SecurityGroupsClient,
    /// Hypervisors API.
    #[cfg(feature = "compute")]
    pub hypervisors: HypervisorsClient,
    /// Compute services API.
    #[cfg(feature = "compute")]
    pub services: ServicesClient,
    /// Limits API.
    #[cfg(feature = "compute")]
    pub limits: LimitsClient,
}

fn http_client(config: &Config) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.http_timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Cannot build an HTTP client: {}", e),
        )
    })
}

impl Manager {
    /// Create clients for the given credentials.
    pub fn new(config: &Config, credentials: Credentials) -> Result<Manager> {
        let uri = config.identity.uri.as_ref().ok_or_else(|| {
            Error::new(ErrorKind::InvalidConfig, "identity.uri is required")
        })?;
        let auth = AuthProvider::new_with_client(http_client(config)?, uri, credentials)?;
        Ok(Manager::from_auth(config, Arc::new(auth)))
    }

    /// Create clients on top of an existing authentication provider.
    pub fn from_auth(config: &Config, auth: Arc<AuthProvider>) -> Manager {
        debug!(
            "Creating clients for {:?}",
            auth.credentials().username.as_ref().or(auth.credentials().user_id.as_ref())
        );
        let identity = RestClient::new(auth.clone(), IDENTITY, config.identity_filters())
            .with_name("identity");
        #[cfg(feature = "compute")]
        let compute = RestClient::new(auth.clone(), COMPUTE, config.compute_filters())
            .with_name("compute");

        Manager {
            tokens: TokensClient::new(identity.clone()),
            projects: ProjectsClient::new(identity.clone()),
            users: UsersClient::new(identity.clone()),
            roles: RolesClient::new(identity.clone()),
            domains: DomainsClient::new(identity),
            #[cfg(feature = "compute")]
            servers: ServersClient::new(compute.clone()),
            #[cfg(feature = "compute")]
            flavors: FlavorsClient::new(compute.clone()),
            #[cfg(feature = "compute")]
            aggregates: AggregatesClient::new(compute.clone()),
            #[cfg(feature = "compute")]
            availability_zones: AvailabilityZoneClient::new(compute.clone()),
            #[cfg(feature = "compute")]
            quotas: QuotasClient::new(compute.clone()),
            #[cfg(feature = "compute")]
            quota_classes: QuotaClassesClient::new(compute.clone()),
            #[cfg(feature = "compute")]
            keypairs: KeyPairsClient::new(compute.clone()),
            #[cfg(feature = "compute")]
            security_groups: SecurityGroupsClient::new(compute.clone()),
            #[cfg(feature = "compute")]
            hypervisors: HypervisorsClient::new(compute.clone()),
            #[cfg(feature = "compute")]
            services: ServicesClient::new(compute.clone()),
            #[cfg(feature = "compute")]
            limits: LimitsClient::new(compute),
            auth,
        }
    }

    /// Authentication provider shared by all clients.
    #[inline]
    pub fn auth(&self) -> &Arc<AuthProvider> {
        &self.auth
    }

    /// Credentials of this manager.
    #[inline]
    pub fn credentials(&self) -> &Credentials {
        self.auth.credentials()
    }

    /// Use the given compute microversion for all compute clients.
    ///
    /// The security groups client never goes above 2.35.
    #[cfg(feature = "compute")]
    pub fn with_compute_microversion<V>(mut self, version: V) -> Manager
    where
        V: Into<Option<Microversion>>,
    {
        let version = version.into();
        self.servers = self.servers.with_microversion(version);
        self.flavors = self.flavors.with_microversion(version);
        self.aggregates = self.aggregates.with_microversion(version);
        self.availability_zones = self.availability_zones.with_microversion(version);
        self.quotas = self.quotas.with_microversion(version);
        self.quota_classes = self.quota_classes.with_microversion(version);
        self.keypairs = self.keypairs.with_microversion(version);
        self.security_groups = self.security_groups.with_microversion(version);
        self.hypervisors = self.hypervisors.with_microversion(version);
        self.services = self.services.with_microversion(version);
        self.limits = self.limits.with_microversion(version);
        self
    }

    /// ID of the authenticated user.
    pub async fn user_id(&self) -> Result<String> {
        Ok(self.auth.auth_data().await?.user_id().to_string())
    }

    /// ID of the project the token is scoped to.
    pub async fn project_id(&self) -> Result<String> {
        self.auth
            .auth_data()
            .await?
            .project_id()
            .map(String::from)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidCredentials,
                    "The token is not scoped to a project",
                )
            })
    }
}

#[cfg(all(test, feature = "compute"))]
pub mod test {
    use httpmock::MockServer;
    use serde_json::json;

    use super::Manager;
    use crate::common::{ApiVersion, Microversion};
    use crate::config::Config;
    use crate::test_utils;

    fn config(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.identity.uri = Some(server.url("/identity"));
        config.identity.http_timeout = Some(10);
        config
    }

    #[tokio::test]
    async fn test_clients_share_token() {
        let server = MockServer::start_async().await;
        let keystone = test_utils::mock_keystone(&server).await;
        let _ = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/compute/v2.1/os-keypairs")
                    .header("x-auth-token", test_utils::TOKEN);
                then.status(200).json_body(json!({"keypairs": []}));
            })
            .await;
        let _ = server
            .mock_async(|when, then| {
                when.method("GET").path("/identity/v3/projects");
                then.status(200).json_body(json!({"projects": []}));
            })
            .await;

        let manager = Manager::new(&config(&server), test_utils::credentials()).unwrap();
        assert!(manager.keypairs.list_keypairs(None).await.unwrap().is_empty());
        assert!(manager
            .projects
            .list_projects(&Default::default())
            .await
            .unwrap()
            .is_empty());
        keystone.assert_hits_async(1).await;

        assert_eq!(manager.user_id().await.unwrap(), test_utils::USER_ID);
        assert_eq!(manager.project_id().await.unwrap(), test_utils::PROJECT_ID);
    }

    #[tokio::test]
    async fn test_with_compute_microversion() {
        let server = MockServer::start_async().await;
        let manager = Manager::new(&config(&server), test_utils::credentials())
            .unwrap()
            .with_compute_microversion(Microversion::Version(ApiVersion(2, 60)));
        assert_eq!(
            manager.servers.rest_client().microversion(),
            Some(Microversion::Version(ApiVersion(2, 60)))
        );
        assert_eq!(
            manager.security_groups.rest_client().microversion(),
            Some(Microversion::Version(ApiVersion(2, 35)))
        );
        assert_eq!(manager.users.rest_client().microversion(), None);
    }

    #[test]
    fn test_missing_identity_uri() {
        assert!(Manager::new(&Config::default(), test_utils::credentials()).is_err());
    }
}
