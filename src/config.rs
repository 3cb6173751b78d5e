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

//! Test suite configuration.
//!
//! The configuration is a YAML document with the following sections:
//!
//! ```yaml
//! identity:
//!   uri: https://keystone.example.com/v3
//!   region: RegionOne
//! auth:
//!   admin_username: admin
//!   admin_password: secret
//!   admin_project_name: admin
//!   use_dynamic_credentials: true
//! compute:
//!   image_ref: 0b7c8ae7-e1ca-4d4e-8a8a-a6e0e6b8c6b1
//!   flavor_ref: "1"
//!   min_microversion: "2.1"
//!   max_microversion: latest
//! compute_feature_enabled:
//!   resize: true
//! ```
//!
//! Microversions must be quoted, otherwise YAML reads them as numbers.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::auth::{endpoint_filters, Credentials, EndpointFilters, InterfaceType};
use super::common::{Microversion, MicroversionRange};
use super::{Error, ErrorKind, Result};

const DEFAULT_DOMAIN: &str = "Default";

/// Parse an endpoint interface as accepted by `OS_INTERFACE`.
pub fn parse_interface(value: &str) -> Result<InterfaceType> {
    match value.trim_end_matches("URL") {
        "public" => Ok(InterfaceType::Public),
        "internal" => Ok(InterfaceType::Internal),
        "admin" => Ok(InterfaceType::Admin),
        _ => Err(Error::new(
            ErrorKind::InvalidConfig,
            format!("Invalid endpoint interface {}", value),
        )),
    }
}

mod interface_type {
    use serde::de::Error as DeserError;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_interface, InterfaceType};

    pub fn serialize<S>(value: &InterfaceType, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(match value {
            InterfaceType::Internal => "internal",
            InterfaceType::Admin => "admin",
            _ => "public",
        })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<InterfaceType, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        parse_interface(&value).map_err(DeserError::custom)
    }
}

/// Identity service options.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Keystone URL, with or without the `/v3` suffix.
    pub uri: Option<String>,
    /// Region to use for all services unless overridden.
    pub region: Option<String>,
    /// Interface of identity endpoints.
    #[serde(with = "interface_type")]
    pub endpoint_type: InterfaceType,
    /// Name of the administrator role.
    pub admin_role: String,
    /// ID of the default domain.
    pub default_domain_id: String,
    /// HTTP request timeout in seconds.
    pub http_timeout: Option<u64>,
}

impl Default for IdentityConfig {
    fn default() -> IdentityConfig {
        IdentityConfig {
            uri: None,
            region: None,
            endpoint_type: InterfaceType::Public,
            admin_role: "admin".into(),
            default_domain_id: "default".into(),
            http_timeout: None,
        }
    }
}

/// Credential options.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Administrator user name.
    pub admin_username: Option<String>,
    /// Administrator password.
    pub admin_password: Option<String>,
    /// Administrator project.
    pub admin_project_name: Option<String>,
    /// Domain of the administrator user.
    pub admin_domain_name: String,
    /// Domain of the administrator project, defaults to the user's one.
    pub admin_project_domain_name: Option<String>,
    /// Domain for dynamically created projects and users.
    pub default_credentials_domain_name: String,
    /// Create a project and a user for every credential type.
    pub use_dynamic_credentials: bool,
    /// YAML file with pre-provisioned accounts.
    pub test_accounts_file: Option<PathBuf>,
    /// Roles assigned to every dynamically created user.
    pub tempest_roles: Vec<String>,
    /// Directory for account lock files.
    pub lock_path: Option<PathBuf>,
}

impl Default for AuthConfig {
    fn default() -> AuthConfig {
        AuthConfig {
            admin_username: None,
            admin_password: None,
            admin_project_name: None,
            admin_domain_name: DEFAULT_DOMAIN.into(),
            admin_project_domain_name: None,
            default_credentials_domain_name: DEFAULT_DOMAIN.into(),
            use_dynamic_credentials: true,
            test_accounts_file: None,
            tempest_roles: Vec::new(),
            lock_path: None,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_username", &self.admin_username)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<omitted>"))
            .field("admin_project_name", &self.admin_project_name)
            .field("admin_domain_name", &self.admin_domain_name)
            .field("admin_project_domain_name", &self.admin_project_domain_name)
            .field(
                "default_credentials_domain_name",
                &self.default_credentials_domain_name,
            )
            .field("use_dynamic_credentials", &self.use_dynamic_credentials)
            .field("test_accounts_file", &self.test_accounts_file)
            .field("tempest_roles", &self.tempest_roles)
            .field("lock_path", &self.lock_path)
            .finish()
    }
}

impl AuthConfig {
    /// Administrator credentials, if configured.
    pub fn admin_credentials(&self) -> Option<Credentials> {
        match (&self.admin_username, &self.admin_password, &self.admin_project_name) {
            (Some(user), Some(password), Some(project)) => {
                let project_domain = self
                    .admin_project_domain_name
                    .clone()
                    .unwrap_or_else(|| self.admin_domain_name.clone());
                Some(
                    Credentials::new(user.clone(), password.clone(), self.admin_domain_name.clone())
                        .with_project(project.clone(), project_domain),
                )
            }
            _ => None,
        }
    }

    /// Directory for account lock files.
    pub fn lock_path(&self) -> PathBuf {
        self.lock_path
            .clone()
            .unwrap_or_else(|| env::temp_dir().join("tempest-accounts"))
    }
}

/// Compute service options.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ComputeConfig {
    /// Region of the compute service, defaults to the identity one.
    pub region: Option<String>,
    /// Interface of compute endpoints.
    #[serde(with = "interface_type")]
    pub endpoint_type: InterfaceType,
    /// Image to boot servers from.
    pub image_ref: Option<String>,
    /// Another image, used for rebuilds.
    pub image_ref_alt: Option<String>,
    /// Flavor for test servers.
    pub flavor_ref: Option<String>,
    /// Another flavor, used for resizes.
    pub flavor_ref_alt: Option<String>,
    /// Delay between status checks in seconds.
    pub build_interval: u64,
    /// Timeout of status waiters in seconds.
    pub build_timeout: u64,
    /// Lowest microversion supported by the cloud.
    pub min_microversion: Option<Microversion>,
    /// Highest microversion supported by the cloud.
    pub max_microversion: Option<Microversion>,
    /// Number of compute nodes expected in the cloud.
    pub min_compute_nodes: usize,
}

impl Default for ComputeConfig {
    fn default() -> ComputeConfig {
        ComputeConfig {
            region: None,
            endpoint_type: InterfaceType::Public,
            image_ref: None,
            image_ref_alt: None,
            flavor_ref: None,
            flavor_ref_alt: None,
            build_interval: 1,
            build_timeout: 300,
            min_microversion: None,
            max_microversion: None,
            min_compute_nodes: 1,
        }
    }
}

impl ComputeConfig {
    /// Microversion range of the cloud.
    #[inline]
    pub fn microversions(&self) -> MicroversionRange {
        MicroversionRange::new(self.min_microversion, self.max_microversion)
    }

    /// Delay between status checks.
    #[inline]
    pub fn build_interval(&self) -> Duration {
        Duration::from_secs(self.build_interval)
    }

    /// Timeout of status waiters.
    #[inline]
    pub fn build_timeout(&self) -> Duration {
        Duration::from_secs(self.build_timeout)
    }
}

/// Optional compute features.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ComputeFeatures {
    pub resize: bool,
    pub pause: bool,
    pub suspend: bool,
    pub shelve: bool,
    pub rescue: bool,
    pub snapshot: bool,
    pub console_output: bool,
    pub change_password: bool,
    pub cold_migration: bool,
    pub live_migration: bool,
}

impl Default for ComputeFeatures {
    fn default() -> ComputeFeatures {
        ComputeFeatures {
            resize: false,
            pause: true,
            suspend: true,
            shelve: true,
            rescue: true,
            snapshot: true,
            console_output: true,
            change_password: false,
            cold_migration: true,
            live_migration: true,
        }
    }
}

impl ComputeFeatures {
    /// Look up a feature flag by its name.
    pub fn is_enabled(&self, name: &str) -> Result<bool> {
        Ok(match name {
            "resize" => self.resize,
            "pause" => self.pause,
            "suspend" => self.suspend,
            "shelve" => self.shelve,
            "rescue" => self.rescue,
            "snapshot" => self.snapshot,
            "console_output" => self.console_output,
            "change_password" => self.change_password,
            "cold_migration" => self.cold_migration,
            "live_migration" => self.live_migration,
            other => return Err(unknown_option("compute_feature_enabled", other)),
        })
    }
}

/// Optional identity features.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct IdentityFeatures {
    pub trust: bool,
    pub project_tags: bool,
    pub application_credentials: bool,
    pub security_compliance: bool,
    pub domain_specific_drivers: bool,
}

impl Default for IdentityFeatures {
    fn default() -> IdentityFeatures {
        IdentityFeatures {
            trust: true,
            project_tags: true,
            application_credentials: true,
            security_compliance: false,
            domain_specific_drivers: false,
        }
    }
}

impl IdentityFeatures {
    /// Look up a feature flag by its name.
    pub fn is_enabled(&self, name: &str) -> Result<bool> {
        Ok(match name {
            "trust" => self.trust,
            "project_tags" => self.project_tags,
            "application_credentials" => self.application_credentials,
            "security_compliance" => self.security_compliance,
            "domain_specific_drivers" => self.domain_specific_drivers,
            other => return Err(unknown_option("identity_feature_enabled", other)),
        })
    }
}

/// Services deployed in the cloud.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct ServiceAvailable {
    pub nova: bool,
    pub glance: bool,
    pub neutron: bool,
    pub cinder: bool,
}

impl Default for ServiceAvailable {
    fn default() -> ServiceAvailable {
        ServiceAvailable {
            nova: true,
            glance: true,
            neutron: false,
            cinder: false,
        }
    }
}

impl ServiceAvailable {
    /// Whether a service is available, by its code name.
    pub fn is_available(&self, name: &str) -> Result<bool> {
        Ok(match name {
            "nova" => self.nova,
            "keystone" => true,
            "glance" => self.glance,
            "neutron" => self.neutron,
            "cinder" => self.cinder,
            other => return Err(unknown_option("service_available", other)),
        })
    }
}

fn unknown_option(section: &str, name: &str) -> Error {
    Error::new(
        ErrorKind::InvalidInput,
        format!("Unknown option {} in section {}", name, section),
    )
}

/// Test suite configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Identity service options.
    pub identity: IdentityConfig,
    /// Credential options.
    pub auth: AuthConfig,
    /// Compute service options.
    pub compute: ComputeConfig,
    /// Optional compute features.
    pub compute_feature_enabled: ComputeFeatures,
    /// Optional identity features.
    pub identity_feature_enabled: IdentityFeatures,
    /// Services deployed in the cloud.
    pub service_available: ServiceAvailable,
}

fn find_config() -> Option<PathBuf> {
    if let Some(path) = env::var_os("TEMPEST_CONFIG") {
        return Some(PathBuf::from(path));
    }

    let current = Path::new("./etc/tempest.yaml");
    if current.is_file() {
        match current.canonicalize() {
            Ok(val) => return Some(val),
            Err(e) => warn!("Cannot canonicalize {:?}: {}", current, e),
        }
    }

    if let Some(mut home) = dirs::home_dir() {
        home.push(".config/tempest/tempest.yaml");
        if home.is_file() {
            return Some(home);
        }
    } else {
        warn!("Cannot find home directory");
    }

    let abs = PathBuf::from("/etc/tempest/tempest.yaml");
    if abs.is_file() {
        Some(abs)
    } else {
        None
    }
}

impl Config {
    /// Parse a YAML document.
    pub fn from_yaml(source: &str) -> Result<Config> {
        serde_yaml::from_str(source).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot parse configuration: {}", e),
            )
        })
    }

    /// Read a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        debug!("Reading configuration from {:?}", path);
        let file = File::open(path).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot read {}: {}", path.display(), e),
            )
        })?;
        serde_yaml::from_reader(file).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot parse {}: {}", path.display(), e),
            )
        })
    }

    /// Find and read the configuration file.
    ///
    /// Looks at `$TEMPEST_CONFIG`, `./etc/tempest.yaml`,
    /// `~/.config/tempest/tempest.yaml` and `/etc/tempest/tempest.yaml`.
    pub fn load() -> Result<Config> {
        let path = find_config().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidConfig,
                "tempest.yaml was not found in any location",
            )
        })?;
        let config = Config::from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from `OS_*` and `TEMPEST_*` environment variables.
    pub fn from_env() -> Result<Config> {
        let vars: HashMap<String, String> = env::vars().collect();
        Config::from_vars(&vars)
    }

    /// Build a configuration from a map of environment variables.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Config> {
        let get = |name: &str| vars.get(name).filter(|v| !v.is_empty()).cloned();

        let uri = get("OS_AUTH_URL").ok_or_else(|| {
            Error::new(ErrorKind::InvalidConfig, "OS_AUTH_URL is not set")
        })?;

        let mut config = Config::default();
        config.identity.uri = Some(uri);
        config.identity.region = get("OS_REGION_NAME");
        if let Some(interface) = get("OS_INTERFACE") {
            config.identity.endpoint_type = parse_interface(&interface)?;
            config.compute.endpoint_type = parse_interface(&interface)?;
        }

        config.auth.admin_username = get("OS_USERNAME");
        config.auth.admin_password = get("OS_PASSWORD");
        config.auth.admin_project_name = get("OS_PROJECT_NAME");
        if let Some(domain) = get("OS_USER_DOMAIN_NAME") {
            config.auth.admin_domain_name = domain;
        }
        config.auth.admin_project_domain_name = get("OS_PROJECT_DOMAIN_NAME");
        if let Some(accounts) = get("TEMPEST_ACCOUNTS_FILE") {
            config.auth.test_accounts_file = Some(PathBuf::from(accounts));
            config.auth.use_dynamic_credentials = false;
        }

        config.compute.image_ref = get("TEMPEST_IMAGE_REF");
        config.compute.flavor_ref = get("TEMPEST_FLAVOR_REF");
        config.compute.flavor_ref_alt = get("TEMPEST_FLAVOR_REF_ALT");

        config.validate()?;
        Ok(config)
    }

    /// Read the configuration file if present, otherwise use the environment.
    pub fn from_env_or_file() -> Result<Config> {
        match find_config() {
            Some(path) => {
                let config = Config::from_file(path)?;
                config.validate()?;
                Ok(config)
            }
            None => Config::from_env(),
        }
    }

    /// Check the configuration for consistency.
    pub fn validate(&self) -> Result<()> {
        let uri = self
            .identity
            .uri
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::InvalidConfig, "identity.uri is required"))?;
        let _ = Url::parse(uri).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("identity.uri {} is not a valid URL: {}", uri, e),
            )
        })?;

        if let (Some(min), Some(max)) = (self.compute.min_microversion, self.compute.max_microversion)
        {
            if min > max {
                return Err(Error::new(
                    ErrorKind::InvalidConfig,
                    format!(
                        "compute.min_microversion {} is greater than compute.max_microversion {}",
                        min, max
                    ),
                ));
            }
        }

        if !self.auth.use_dynamic_credentials && self.auth.test_accounts_file.is_none() {
            return Err(Error::new(
                ErrorKind::InvalidConfig,
                "auth.test_accounts_file is required without dynamic credentials",
            ));
        }

        Ok(())
    }

    /// Endpoint filters for the identity service.
    pub fn identity_filters(&self) -> EndpointFilters {
        endpoint_filters(
            self.identity.endpoint_type.clone(),
            self.identity.region.clone(),
        )
    }

    /// Endpoint filters for the compute service.
    pub fn compute_filters(&self) -> EndpointFilters {
        endpoint_filters(
            self.compute.endpoint_type.clone(),
            self.compute
                .region
                .clone()
                .or_else(|| self.identity.region.clone()),
        )
    }

    /// Timeout for HTTP requests.
    #[inline]
    pub fn http_timeout(&self) -> Option<Duration> {
        self.identity.http_timeout.map(Duration::from_secs)
    }
}
