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

//! JSON structures and protocol bits for the Compute API.

#![allow(missing_docs)]

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};

protocol_enum! {
    #[doc = "Possible server statuses."]
    enum ServerStatus {
        Active = "ACTIVE",
        Building = "BUILD",
        Deleted = "DELETED",
        Error = "ERROR",
        HardRebooting = "HARD_REBOOT",
        Migrating = "MIGRATING",
        Paused = "PAUSED",
        Rebooting = "REBOOT",
        Rebuilding = "REBUILD",
        Rescued = "RESCUE",
        Resizing = "RESIZE",
        RevertingResize = "REVERT_RESIZE",
        ShutOff = "SHUTOFF",
        Shelved = "SHELVED",
        ShelvedOffloaded = "SHELVED_OFFLOADED",
        SoftDeleted = "SOFT_DELETED",
        Suspended = "SUSPENDED",
        Unknown = "UNKNOWN",
        UpdatingPassword = "PASSWORD",
        VerifyingResize = "VERIFY_RESIZE"
    }
}

impl Default for ServerStatus {
    fn default() -> ServerStatus {
        ServerStatus::Unknown
    }
}

protocol_enum! {
    #[doc = "Reboot type."]
    enum RebootType {
        Hard = "HARD",
        Soft = "SOFT"
    }
}

protocol_enum! {
    #[doc = "Type of a key pair."]
    enum KeyPairType {
        Ssh = "ssh",
        X509 = "x509"
    }
}

/// Treat empty strings and nulls as the default value.
pub(crate) fn empty_as_default<'de, D, T>(des: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let value = serde_json::Value::deserialize(des)?;
    match value {
        serde_json::Value::Null => Ok(T::default()),
        serde_json::Value::String(ref s) if s.is_empty() => Ok(T::default()),
        other => T::deserialize(other).map_err(de::Error::custom),
    }
}

/// Accept both integer and string identifiers.
pub(crate) fn id_as_string<'de, D>(des: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(des)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::invalid_type(
            de::Unexpected::Other(&other.to_string()),
            &"a string or an integer",
        )),
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub rel: Option<String>,
}

/// A reference to another resource.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Ref {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct NameRef {
    pub name: String,
}

/// Address of a server.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServerAddress {
    pub addr: String,
    #[serde(default)]
    pub version: Option<u8>,
    #[serde(rename = "OS-EXT-IPS-MAC:mac_addr", default)]
    pub mac_addr: Option<String>,
    #[serde(rename = "OS-EXT-IPS:type", default)]
    pub addr_type: Option<String>,
}

/// Flavor of a server.
///
/// Before microversion 2.47 only `id` is set, starting with it the flavor is
/// embedded.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ServerFlavor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub vcpus: Option<u32>,
    #[serde(default)]
    pub ram: Option<u64>,
    #[serde(default)]
    pub disk: Option<u64>,
    #[serde(default)]
    pub ephemeral: Option<u64>,
    #[serde(default)]
    pub swap: Option<u64>,
    #[serde(default)]
    pub extra_specs: Option<HashMap<String, String>>,
}

/// Fault recorded for a failed server.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServerFault {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<FixedOffset>>,
}

/// A server.
///
/// The same structure is used for summary and detailed listings, fields not
/// returned by the API stay at their defaults.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Server {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: ServerStatus,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub image: Option<Ref>,
    #[serde(default)]
    pub flavor: Option<ServerFlavor>,
    #[serde(default)]
    pub addresses: HashMap<String, Vec<ServerAddress>>,
    #[serde(rename = "accessIPv4", default, deserialize_with = "empty_as_default")]
    pub access_ipv4: Option<String>,
    #[serde(rename = "accessIPv6", default, deserialize_with = "empty_as_default")]
    pub access_ipv6: Option<String>,
    #[serde(rename = "hostId", default, deserialize_with = "empty_as_default")]
    pub host_id: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub updated: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub key_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub config_drive: Option<String>,
    #[serde(default)]
    pub fault: Option<ServerFault>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub security_groups: Vec<NameRef>,
    #[serde(rename = "OS-EXT-STS:task_state", default)]
    pub task_state: Option<String>,
    #[serde(rename = "OS-EXT-STS:vm_state", default)]
    pub vm_state: Option<String>,
    #[serde(rename = "OS-EXT-STS:power_state", default)]
    pub power_state: Option<u8>,
    #[serde(rename = "OS-EXT-AZ:availability_zone", default)]
    pub availability_zone: Option<String>,
    #[serde(rename = "OS-EXT-SRV-ATTR:host", default)]
    pub host: Option<String>,
    #[serde(rename = "OS-EXT-SRV-ATTR:hypervisor_hostname", default)]
    pub hypervisor_hostname: Option<String>,
    #[serde(rename = "OS-EXT-SRV-ATTR:instance_name", default)]
    pub instance_name: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServerRoot {
    pub server: Server,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServersRoot {
    pub servers: Vec<Server>,
}

/// Server as returned on creation.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreatedServer {
    pub id: String,
    #[serde(rename = "adminPass", default)]
    pub admin_pass: Option<String>,
    #[serde(rename = "OS-DCF:diskConfig", default)]
    pub disk_config: Option<String>,
    #[serde(default)]
    pub security_groups: Vec<NameRef>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreatedServerRoot {
    pub server: CreatedServer,
}

/// A network to attach a new server to.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ServerNetwork {
    Network { uuid: String },
    Port { port: String },
    FixedIp { uuid: String, fixed_ip: String },
}

/// Networks of a new server.
///
/// Starting with microversion 2.37 networks are required and may be `auto`
/// or `none`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ServerNetworks {
    Named(String),
    List(Vec<ServerNetwork>),
}

impl ServerNetworks {
    /// Allocate networks automatically.
    pub fn auto() -> ServerNetworks {
        ServerNetworks::Named("auto".into())
    }

    /// Do not allocate networks.
    pub fn none() -> ServerNetworks {
        ServerNetworks::Named("none".into())
    }
}

/// A server creation request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ServerCreate {
    pub name: String,
    #[serde(rename = "imageRef", skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(rename = "flavorRef")]
    pub flavor_ref: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "adminPass", skip_serializing_if = "Option::is_none")]
    pub admin_pass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_drive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networks: Option<ServerNetworks>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_groups: Vec<NameRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ServerCreate {
    /// Start a creation request.
    pub fn new<S1, S2>(name: S1, flavor_ref: S2) -> ServerCreate
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        ServerCreate {
            name: name.into(),
            flavor_ref: flavor_ref.into(),
            ..ServerCreate::default()
        }
    }

    /// Boot from this image.
    pub fn with_image<S: Into<String>>(mut self, image_ref: S) -> ServerCreate {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Add a metadata item.
    pub fn with_metadata<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> ServerCreate {
        let _ = self.metadata.insert(key.into(), value.into());
        self
    }

    /// Use this key pair.
    pub fn with_key_name<S: Into<String>>(mut self, key_name: S) -> ServerCreate {
        self.key_name = Some(key_name.into());
        self
    }

    /// Create in this availability zone.
    pub fn with_availability_zone<S: Into<String>>(mut self, zone: S) -> ServerCreate {
        self.availability_zone = Some(zone.into());
        self
    }

    /// Set networks.
    pub fn with_networks(mut self, networks: ServerNetworks) -> ServerCreate {
        self.networks = Some(networks);
        self
    }

    /// Set the administrative password.
    pub fn with_admin_pass<S: Into<String>>(mut self, admin_pass: S) -> ServerCreate {
        self.admin_pass = Some(admin_pass.into());
        self
    }

    /// Add a security group by name.
    pub fn with_security_group<S: Into<String>>(mut self, name: S) -> ServerCreate {
        self.security_groups.push(NameRef { name: name.into() });
        self
    }

    /// Set the description (microversion 2.19+).
    pub fn with_description<S: Into<String>>(mut self, description: S) -> ServerCreate {
        self.description = Some(description.into());
        self
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ServerCreateRoot<'a> {
    pub server: &'a ServerCreate,
}

/// A server update request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ServerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "accessIPv4", skip_serializing_if = "Option::is_none")]
    pub access_ipv4: Option<String>,
    #[serde(rename = "accessIPv6", skip_serializing_if = "Option::is_none")]
    pub access_ipv6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A server rebuild request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ServerRebuild {
    #[serde(rename = "imageRef")]
    pub image_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "adminPass", skip_serializing_if = "Option::is_none")]
    pub admin_pass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AddressesRoot {
    pub addresses: HashMap<String, Vec<ServerAddress>>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MetadataRoot {
    pub metadata: HashMap<String, String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MetaRoot {
    pub meta: HashMap<String, String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ConsoleOutputRoot {
    pub output: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ImageIdRoot {
    pub image_id: String,
}

/// A flavor.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Flavor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ram: u64,
    #[serde(default)]
    pub vcpus: u32,
    #[serde(default)]
    pub disk: u64,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub swap: u64,
    #[serde(rename = "OS-FLV-EXT-DATA:ephemeral", default)]
    pub ephemeral: u64,
    #[serde(rename = "OS-FLV-DISABLED:disabled", default)]
    pub disabled: bool,
    #[serde(rename = "os-flavor-access:is_public", default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub rxtx_factor: Option<f32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub extra_specs: Option<HashMap<String, String>>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[inline]
fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize)]
pub struct FlavorRoot {
    pub flavor: Flavor,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FlavorsRoot {
    pub flavors: Vec<Flavor>,
}

/// A flavor creation request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FlavorCreate {
    pub name: String,
    pub ram: u64,
    pub vcpus: u32,
    pub disk: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "OS-FLV-EXT-DATA:ephemeral", skip_serializing_if = "Option::is_none")]
    pub ephemeral: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rxtx_factor: Option<f32>,
    #[serde(rename = "os-flavor-access:is_public", skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FlavorCreate {
    /// Start a creation request.
    pub fn new<S: Into<String>>(name: S, ram: u64, vcpus: u32, disk: u64) -> FlavorCreate {
        FlavorCreate {
            name: name.into(),
            ram,
            vcpus,
            disk,
            ..FlavorCreate::default()
        }
    }

    /// Set an explicit ID.
    pub fn with_id<S: Into<String>>(mut self, id: S) -> FlavorCreate {
        self.id = Some(id.into());
        self
    }

    /// Make the flavor private or public.
    pub fn with_public(mut self, is_public: bool) -> FlavorCreate {
        self.is_public = Some(is_public);
        self
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FlavorCreateRoot<'a> {
    pub flavor: &'a FlavorCreate,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ExtraSpecsRoot {
    pub extra_specs: HashMap<String, String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct FlavorAccess {
    pub flavor_id: String,
    pub tenant_id: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FlavorAccessRoot {
    pub flavor_access: Vec<FlavorAccess>,
}

/// A host aggregate.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Aggregate {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub availability_zone: Option<String>,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub hosts: Vec<String>,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AggregateRoot {
    pub aggregate: Aggregate,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AggregatesRoot {
    pub aggregates: Vec<Aggregate>,
}

/// Aggregate creation or update.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AggregateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AvailabilityZoneState {
    pub available: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServiceState {
    pub available: bool,
    pub active: bool,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// An availability zone.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AvailabilityZone {
    #[serde(rename = "zoneName")]
    pub zone_name: String,
    #[serde(rename = "zoneState")]
    pub zone_state: AvailabilityZoneState,
    /// Hosts and their services, only in the detailed listing.
    #[serde(default)]
    pub hosts: Option<HashMap<String, HashMap<String, ServiceState>>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AvailabilityZonesRoot {
    #[serde(rename = "availabilityZoneInfo")]
    pub availability_zone_info: Vec<AvailabilityZone>,
}

/// Compute quotas.
///
/// `-1` means unlimited. Deprecated network quotas are only returned by old
/// microversions.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct QuotaSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_pairs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_items: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injected_files: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injected_file_content_bytes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injected_file_path_bytes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_groups: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_group_members: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_ips: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floating_ips: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_groups: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_group_rules: Option<i64>,
}

/// Quota update request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct QuotaSetUpdate {
    #[serde(flatten)]
    pub quotas: QuotaSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuotaSetRoot {
    pub quota_set: QuotaSet,
}

#[derive(Clone, Debug, Serialize)]
pub struct QuotaSetUpdateRoot<'a> {
    pub quota_set: &'a QuotaSetUpdate,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct QuotaClassSetRoot {
    pub quota_class_set: QuotaSet,
}

/// A key pair.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct KeyPair {
    pub name: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(rename = "type", default)]
    pub key_type: Option<KeyPairType>,
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct KeyPairRoot {
    pub keypair: KeyPair,
}

#[derive(Clone, Debug, Deserialize)]
pub struct KeyPairsRoot {
    pub keypairs: Vec<KeyPairRoot>,
}

/// A key pair creation request.
///
/// Without a public key Nova generates the pair and returns the private key.
#[derive(Clone, Debug, Default, Serialize)]
pub struct KeyPairCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub key_type: Option<KeyPairType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl KeyPairCreate {
    /// Generate a new key pair.
    pub fn generate<S: Into<String>>(name: S) -> KeyPairCreate {
        KeyPairCreate {
            name: name.into(),
            ..KeyPairCreate::default()
        }
    }

    /// Import an existing public key.
    pub fn import<S1: Into<String>, S2: Into<String>>(name: S1, public_key: S2) -> KeyPairCreate {
        KeyPairCreate {
            name: name.into(),
            public_key: Some(public_key.into()),
            ..KeyPairCreate::default()
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct KeyPairCreateRoot<'a> {
    pub keypair: &'a KeyPairCreate,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct IpRange {
    #[serde(default)]
    pub cidr: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RuleGroup {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

/// A security group rule.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SecurityGroupRule {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(deserialize_with = "id_as_string")]
    pub parent_group_id: String,
    #[serde(default)]
    pub ip_protocol: Option<String>,
    #[serde(default)]
    pub from_port: Option<i32>,
    #[serde(default)]
    pub to_port: Option<i32>,
    #[serde(default)]
    pub ip_range: IpRange,
    #[serde(default)]
    pub group: RuleGroup,
}

/// A security group.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SecurityGroup {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub rules: Vec<SecurityGroupRule>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SecurityGroupRoot {
    pub security_group: SecurityGroup,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SecurityGroupsRoot {
    pub security_groups: Vec<SecurityGroup>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SecurityGroupCreate {
    pub name: String,
    pub description: String,
}

/// A security group rule creation request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SecurityGroupRuleCreate {
    pub parent_group_id: String,
    pub ip_protocol: String,
    pub from_port: i32,
    pub to_port: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SecurityGroupRuleRoot {
    pub security_group_rule: SecurityGroupRule,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HypervisorService {
    pub host: String,
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub disabled_reason: Option<String>,
}

/// A hypervisor.
///
/// IDs are integers before microversion 2.53 and UUIDs starting with it.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Hypervisor {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub hypervisor_hostname: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub hypervisor_type: Option<String>,
    #[serde(default)]
    pub hypervisor_version: Option<u64>,
    #[serde(default)]
    pub host_ip: Option<String>,
    #[serde(default)]
    pub vcpus: Option<u64>,
    #[serde(default)]
    pub vcpus_used: Option<u64>,
    #[serde(default)]
    pub memory_mb: Option<u64>,
    #[serde(default)]
    pub memory_mb_used: Option<u64>,
    #[serde(default)]
    pub running_vms: Option<u64>,
    #[serde(default)]
    pub service: Option<HypervisorService>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HypervisorRoot {
    pub hypervisor: Hypervisor,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HypervisorsRoot {
    pub hypervisors: Vec<Hypervisor>,
}

/// A compute service.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ComputeService {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub binary: String,
    pub host: String,
    #[serde(default)]
    pub zone: Option<String>,
    pub status: String,
    pub state: String,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub disabled_reason: Option<String>,
    #[serde(default)]
    pub forced_down: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServicesRoot {
    pub services: Vec<ComputeService>,
}

/// Absolute limits of a project.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsoluteLimits {
    #[serde(default)]
    pub max_total_cores: Option<i64>,
    #[serde(default)]
    pub max_total_instances: Option<i64>,
    #[serde(rename = "maxTotalRAMSize", default)]
    pub max_total_ram_size: Option<i64>,
    #[serde(default)]
    pub max_server_meta: Option<i64>,
    #[serde(default)]
    pub max_image_meta: Option<i64>,
    #[serde(default)]
    pub max_personality: Option<i64>,
    #[serde(default)]
    pub max_personality_size: Option<i64>,
    #[serde(default)]
    pub max_total_keypairs: Option<i64>,
    #[serde(default)]
    pub max_server_groups: Option<i64>,
    #[serde(default)]
    pub max_server_group_members: Option<i64>,
    #[serde(default)]
    pub max_security_groups: Option<i64>,
    #[serde(default)]
    pub max_security_group_rules: Option<i64>,
    #[serde(default)]
    pub max_total_floating_ips: Option<i64>,
    #[serde(default)]
    pub total_cores_used: Option<i64>,
    #[serde(default)]
    pub total_instances_used: Option<i64>,
    #[serde(rename = "totalRAMUsed", default)]
    pub total_ram_used: Option<i64>,
    #[serde(default)]
    pub total_server_groups_used: Option<i64>,
    #[serde(default)]
    pub total_security_groups_used: Option<i64>,
    #[serde(default)]
    pub total_floating_ips_used: Option<i64>,
}

/// Limits of a project.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Limits {
    pub absolute: AbsoluteLimits,
    #[serde(default)]
    pub rate: Vec<serde_json::Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LimitsRoot {
    pub limits: Limits,
}
