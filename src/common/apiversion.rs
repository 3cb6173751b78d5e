// Copyright 2017 Dmitry Tantsur <divius.inside@gmail.com>
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

//! API versions and microversion negotiation helpers.

use std::fmt;
use std::str::FromStr;

use serde::de::{Error as DeserError, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use osauth::ApiVersion;

use super::super::{Error, ErrorKind, Result};

/// A microversion as used in configuration and test requirements.
///
/// `Latest` compares greater than any concrete version.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum Microversion {
    /// A concrete version.
    Version(ApiVersion),
    /// The newest version supported by the server.
    Latest,
}

/// An inclusive range of microversions.
///
/// Missing bounds follow the rules of `check_skip_with_microversion`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MicroversionRange {
    /// Lower bound.
    #[serde(default)]
    pub min: Option<Microversion>,
    /// Upper bound, may be `latest`.
    #[serde(default)]
    pub max: Option<Microversion>,
}

impl MicroversionRange {
    /// Create a range from optional bounds.
    pub fn new(min: Option<Microversion>, max: Option<Microversion>) -> MicroversionRange {
        MicroversionRange { min, max }
    }

    /// Whether a test requiring `self` must be skipped on a cloud configured with `configured`.
    pub fn should_skip(&self, configured: &MicroversionRange) -> Result<bool> {
        check_skip_with_microversion(self.min, self.max, configured.min, configured.max)
    }
}

/// Null version used when no bound is provided.
const NULL_VERSION: Microversion = Microversion::Version(ApiVersion(0, 0));

impl fmt::Display for Microversion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Microversion::Version(ApiVersion(major, minor)) => write!(f, "{}.{}", major, minor),
            Microversion::Latest => f.write_str("latest"),
        }
    }
}

fn parse_component(component: &str, message: &str) -> Result<u16> {
    component
        .parse()
        .map_err(|_| Error::new(ErrorKind::InvalidInput, message))
}

/// Parse an API version in the `X.Y` form.
pub fn parse_api_version(s: &str) -> Result<ApiVersion> {
    let parts: Vec<&str> = s.trim().split('.').collect();

    if parts.len() != 2 {
        let msg = format!("Invalid API version: expected X.Y, got {}", s);
        return Err(Error::new(ErrorKind::InvalidInput, msg));
    }

    let major = parse_component(parts[0], "First version component is not a number")?;

    let minor = parse_component(parts[1], "Second version component is not a number")?;

    Ok(ApiVersion(major, minor))
}

impl FromStr for Microversion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Microversion> {
        if s.eq_ignore_ascii_case("latest") {
            Ok(Microversion::Latest)
        } else {
            parse_api_version(s).map(Microversion::Version)
        }
    }
}

impl From<ApiVersion> for Microversion {
    fn from(value: ApiVersion) -> Microversion {
        Microversion::Version(value)
    }
}

impl Serialize for Microversion {
    fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct MicroversionVisitor;

impl<'de> Visitor<'de> for MicroversionVisitor {
    type Value = Microversion;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string in format X.Y or latest")
    }

    fn visit_str<E>(self, value: &str) -> ::std::result::Result<Microversion, E>
    where
        E: DeserError,
    {
        Microversion::from_str(value).map_err(DeserError::custom)
    }
}

impl<'de> Deserialize<'de> for Microversion {
    fn deserialize<D>(deserializer: D) -> ::std::result::Result<Microversion, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(MicroversionVisitor)
    }
}

/// Check whether a test has to be skipped because of its microversion range.
///
/// Returns `Ok(true)` when the range requested by the test does not intersect
/// with the range configured for the cloud. Missing lower bounds are treated
/// as a null version, missing upper bounds of the test as `latest`.
pub fn check_skip_with_microversion(
    test_min: Option<Microversion>,
    test_max: Option<Microversion>,
    cfg_min: Option<Microversion>,
    cfg_max: Option<Microversion>,
) -> Result<bool> {
    let min_version = test_min.unwrap_or(NULL_VERSION);
    let max_version = test_max.unwrap_or(Microversion::Latest);
    let config_min_version = cfg_min.unwrap_or(NULL_VERSION);
    let config_max_version = cfg_max.unwrap_or(NULL_VERSION);

    if min_version > max_version || config_min_version > config_max_version {
        return Err(Error::new(
            ErrorKind::InvalidConfig,
            format!(
                "The API version range is invalid: test {} - {}, configured {} - {}",
                min_version, max_version, config_min_version, config_max_version
            ),
        ));
    }

    Ok(max_version < config_min_version || config_max_version < min_version)
}

/// Pick the microversion to send for a test.
///
/// The larger of the test's minimum and the configured minimum wins.
pub fn select_request_microversion(
    test_min: Option<Microversion>,
    cfg_min: Option<Microversion>,
) -> Option<Microversion> {
    match (test_min, cfg_min) {
        (Some(test), Some(cfg)) => Some(std::cmp::max(test, cfg)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}
