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

//! Test context: credentials, cleanups, skips and resource helpers.
//!
//! A [TestContext](struct.TestContext.html) plays the role of a test class:
//! it hands out client managers for the primary, alternative and admin
//! credentials, collects cleanups for every created resource and releases
//! everything in [tear_down](struct.TestContext.html#method.tear_down).

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::panic::{resume_unwind, AssertUnwindSafe};

use futures::future::{FutureExt, LocalBoxFuture};
use log::{debug, info, warn};

use super::clients::Manager;
use super::common::data_utils::{rand_name, rand_password};
use super::common::{
    select_request_microversion, CleanupStack, Microversion, MicroversionRange,
};
#[cfg(feature = "compute")]
use super::compute::{
    wait_for_server_status, wait_for_server_termination, Flavor, FlavorCreate, Server,
    ServerCreate, ServerStatus,
};
use super::config::Config;
use super::credentials::{get_credentials_provider, CredentialProvider, CredentialType};
use super::identity::{
    Domain, DomainCreate, DomainUpdate, Project, ProjectCreate, Role, RoleCreate, User,
    UserCreate,
};
use super::{Error, ErrorKind, Result};

const TEST_PASSWORD_LENGTH: usize = 16;

/// Resources, credentials and cleanups of a single test.
#[derive(Debug)]
pub struct TestContext {
    config: Config,
    name: String,
    provider: Box<dyn CredentialProvider>,
    managers: HashMap<CredentialType, Manager>,
    cleanups: CleanupStack,
}

impl TestContext {
    /// Create a context; the name prefixes every created resource.
    pub fn new<S: Into<String>>(config: Config, name: S) -> Result<TestContext> {
        let name = name.into();
        let provider = get_credentials_provider(&config, name.clone())?;
        Ok(TestContext::with_provider(config, name, provider))
    }

    /// Create a context with a custom credential provider.
    pub fn with_provider<S: Into<String>>(
        config: Config,
        name: S,
        provider: Box<dyn CredentialProvider>,
    ) -> TestContext {
        TestContext {
            config,
            name: name.into(),
            provider,
            managers: HashMap::new(),
            cleanups: CleanupStack::new(),
        }
    }

    /// Configuration of the cloud.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name of the test.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Credential provider in use.
    #[inline]
    pub fn credentials_provider(&self) -> &dyn CredentialProvider {
        self.provider.as_ref()
    }

    /// Random name with the test name as a prefix.
    pub fn rand_name<S: AsRef<str>>(&self, suffix: S) -> String {
        rand_name(format!("{}-{}", self.name, suffix.as_ref()))
    }

    async fn manager(&mut self, kind: CredentialType) -> Result<Manager> {
        if let Some(manager) = self.managers.get(&kind) {
            return Ok(manager.clone());
        }
        let credentials = self.provider.get_creds(&kind).await?;
        debug!("Using {} credentials {:?}", kind, credentials);
        let manager = Manager::new(&self.config, credentials)?;
        let _ = self.managers.insert(kind, manager.clone());
        Ok(manager)
    }

    /// Clients for the primary user.
    pub async fn primary(&mut self) -> Result<Manager> {
        self.manager(CredentialType::Primary).await
    }

    /// Clients for the administrator.
    pub async fn admin(&mut self) -> Result<Manager> {
        self.manager(CredentialType::Admin).await
    }

    /// Clients for the alternative user.
    pub async fn alt(&mut self) -> Result<Manager> {
        self.manager(CredentialType::Alt).await
    }

    /// Clients for a user with the given roles.
    pub async fn with_roles<I, S>(&mut self, roles: I) -> Result<Manager>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.manager(CredentialType::roles(roles)).await
    }

    /// Register a cleanup, cleanups run in reverse order.
    pub fn add_cleanup<S, F>(&mut self, description: S, cleanup: F)
    where
        S: Into<String>,
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.cleanups.add(description, cleanup);
    }

    /// Run cleanups, then release credentials.
    ///
    /// Both steps are always attempted, the first failure is returned.
    pub async fn tear_down(&mut self) -> Result<()> {
        info!("Tearing down {}", self.name);
        let cleanups = self.cleanups.run().await;
        self.managers.clear();
        let credentials = self.provider.clear_creds().await;
        cleanups.and(credentials)
    }

    /// Run a test body, then tear down even if the body panicked.
    ///
    /// A panic is re-raised after cleanups and credentials are released.
    /// Otherwise the result of [tear_down](#method.tear_down) is returned.
    pub async fn run<F>(mut self, body: F) -> Result<()>
    where
        F: for<'a> FnOnce(&'a mut TestContext) -> LocalBoxFuture<'a, ()>,
    {
        let outcome = AssertUnwindSafe(body(&mut self)).catch_unwind().await;
        let result = self.tear_down().await;
        match outcome {
            Ok(()) => result,
            Err(panic) => {
                if let Err(err) = result {
                    warn!("Tear down of {} after a panic failed: {}", self.name, err);
                }
                resume_unwind(panic)
            }
        }
    }

    /// Skip unless admin credentials can be provided.
    pub fn skip_unless_admin(&self) -> Option<String> {
        if self.provider.is_admin_available() {
            None
        } else {
            Some("Missing administrator credentials".to_string())
        }
    }

    /// Skip unless a second project can be provided.
    pub fn skip_unless_alt(&self) -> Option<String> {
        if self.provider.is_multi_tenant() {
            None
        } else {
            Some("Alternative credentials in another project are not available".to_string())
        }
    }

    /// Skip unless the configured compute microversions intersect with the range.
    pub fn skip_unless_microversion(
        &self,
        min: Option<Microversion>,
        max: Option<Microversion>,
    ) -> Result<Option<String>> {
        let configured = self.config.compute.microversions();
        let wanted = MicroversionRange::new(min, max);
        Ok(if wanted.should_skip(&configured)? {
            Some(format!(
                "The microversion range [{}, {}] of this test is not supported by the \
                 configuration [{}, {}]",
                display_bound(min, "null"),
                display_bound(max, "latest"),
                display_bound(configured.min, "null"),
                display_bound(configured.max, "null"),
            ))
        } else {
            None
        })
    }

    /// Microversion to send for a test with the given minimum.
    pub fn request_microversion(&self, min: Option<Microversion>) -> Option<Microversion> {
        select_request_microversion(min, self.config.compute.min_microversion)
    }

    /// Skip unless an optional compute feature is enabled.
    pub fn skip_unless_compute_feature(&self, name: &str) -> Result<Option<String>> {
        Ok(if self.config.compute_feature_enabled.is_enabled(name)? {
            None
        } else {
            Some(format!("Compute feature {} is disabled", name))
        })
    }

    /// Skip unless an optional identity feature is enabled.
    pub fn skip_unless_identity_feature(&self, name: &str) -> Result<Option<String>> {
        Ok(if self.config.identity_feature_enabled.is_enabled(name)? {
            None
        } else {
            Some(format!("Identity feature {} is disabled", name))
        })
    }

    /// Skip unless a service is deployed.
    pub fn skip_unless_service(&self, name: &str) -> Result<Option<String>> {
        Ok(if self.config.service_available.is_available(name)? {
            None
        } else {
            Some(format!("Service {} is not available", name))
        })
    }

    /// Server request with the configured image and flavor.
    #[cfg(feature = "compute")]
    pub fn server_request(&self) -> Result<ServerCreate> {
        let flavor = self.config.compute.flavor_ref.clone().ok_or_else(|| {
            Error::new(ErrorKind::InvalidConfig, "compute.flavor_ref is required")
        })?;
        let image = self.config.compute.image_ref.clone().ok_or_else(|| {
            Error::new(ErrorKind::InvalidConfig, "compute.image_ref is required")
        })?;
        Ok(ServerCreate::new(self.rand_name("server"), flavor).with_image(image))
    }

    /// Create a server and register its deletion.
    ///
    /// With `wait_until` the call returns once the server reaches the status.
    #[cfg(feature = "compute")]
    pub async fn create_test_server(
        &mut self,
        manager: &Manager,
        request: ServerCreate,
        wait_until: Option<ServerStatus>,
    ) -> Result<Server> {
        let created = manager.servers.create_server(&request).await?;
        let interval = self.config.compute.build_interval();
        let timeout = self.config.compute.build_timeout();

        let servers = manager.servers.clone();
        let id = created.id.clone();
        self.add_cleanup(format!("server {}", created.id), async move {
            servers.delete_server(&id).await?;
            wait_for_server_termination(&servers, id, false, interval, timeout).await
        });

        match wait_until {
            Some(status) => {
                wait_for_server_status(
                    &manager.servers,
                    created.id,
                    status,
                    true,
                    interval,
                    timeout,
                )
                .await
            }
            None => manager.servers.show_server(&created.id).await,
        }
    }

    /// Create a flavor and register its deletion.
    #[cfg(feature = "compute")]
    pub async fn create_test_flavor(
        &mut self,
        admin: &Manager,
        ram: u64,
        vcpus: u32,
        disk: u64,
    ) -> Result<Flavor> {
        let request = FlavorCreate::new(self.rand_name("flavor"), ram, vcpus, disk);
        let flavor = admin.flavors.create_flavor(&request).await?;
        let flavors = admin.flavors.clone();
        let id = flavor.id.clone();
        self.add_cleanup(format!("flavor {}", flavor.id), async move {
            flavors.delete_flavor(id).await
        });
        Ok(flavor)
    }

    /// Create a project and register its deletion.
    pub async fn create_test_project(&mut self, admin: &Manager) -> Result<Project> {
        let request = ProjectCreate::new(self.rand_name("project"))
            .with_domain_id(self.config.identity.default_domain_id.clone());
        let project = admin.projects.create_project(&request).await?;
        let projects = admin.projects.clone();
        let id = project.id.clone();
        self.add_cleanup(format!("project {}", project.id), async move {
            projects.delete_project(id).await
        });
        Ok(project)
    }

    /// Create a user and register its deletion.
    ///
    /// Returns the user and its password.
    pub async fn create_test_user(
        &mut self,
        admin: &Manager,
        project_id: Option<&str>,
    ) -> Result<(User, String)> {
        let password = rand_password(TEST_PASSWORD_LENGTH);
        let name = self.rand_name("user");
        let mut request = UserCreate::new(name.clone(), password.clone())
            .with_domain_id(self.config.identity.default_domain_id.clone())
            .with_email(format!("{}@example.com", name));
        if let Some(project_id) = project_id {
            request = request.with_default_project_id(project_id);
        }
        let user = admin.users.create_user(&request).await?;
        let users = admin.users.clone();
        let id = user.id.clone();
        self.add_cleanup(format!("user {}", user.id), async move {
            users.delete_user(id).await
        });
        Ok((user, password))
    }

    /// Create a role and register its deletion.
    pub async fn create_test_role(&mut self, admin: &Manager) -> Result<Role> {
        let role = admin
            .roles
            .create_role(&RoleCreate::new(self.rand_name("role")))
            .await?;
        let roles = admin.roles.clone();
        let id = role.id.clone();
        self.add_cleanup(format!("role {}", role.id), async move {
            roles.delete_role(id).await
        });
        Ok(role)
    }

    /// Create a domain and register disabling and deleting it.
    pub async fn create_test_domain(&mut self, admin: &Manager) -> Result<Domain> {
        let domain = admin
            .domains
            .create_domain(&DomainCreate::new(self.rand_name("domain")))
            .await?;
        let domains = admin.domains.clone();
        let id = domain.id.clone();
        self.add_cleanup(format!("domain {}", domain.id), async move {
            let disable = DomainUpdate {
                enabled: Some(false),
                ..DomainUpdate::default()
            };
            let _ = domains.update_domain(&id, &disable).await?;
            domains.delete_domain(id).await
        });
        Ok(domain)
    }
}

fn display_bound(value: Option<Microversion>, default: &str) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| default.to_string())
}

/// Assert that a call failed with the given error kind.
///
/// Returns the error for further checks.
///
/// # Panics
///
/// If the call succeeded or failed with another kind.
pub fn assert_error_kind<T: Debug>(result: Result<T>, kind: ErrorKind) -> Error {
    match result {
        Ok(value) => panic!("Expected a {:?} error, got {:?}", kind, value),
        Err(err) => {
            assert_eq!(err.kind(), kind, "Unexpected error {}", err);
            err
        }
    }
}
