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


//! Shared set up for tests running against a live cloud.
//!
//! Tests are skipped when neither `OS_AUTH_URL` nor a configuration file is
//! available.

#![allow(dead_code, unused_macros)]

use std::sync::Once;

use futures::future::LocalBoxFuture;
use log::warn;

use tempest::testing::TestContext;
use tempest::Config;

static INIT: Once = Once::new();

/// Create a test context or return `None` when no cloud is configured.
pub fn set_up(name: &str) -> Option<TestContext> {
    INIT.call_once(|| {
        env_logger::init();
    });

    match Config::from_env_or_file() {
        Ok(config) => {
            Some(TestContext::new(config, name).expect("Failed to create a test context"))
        }
        Err(err) => {
            warn!("Skipping {}: no cloud configured ({})", name, err);
            None
        }
    }
}

/// Run a test body against a live cloud, skipping it when none is configured.
///
/// Cleanups and credentials are released even when the body panics.
pub async fn run<F>(name: &str, body: F)
where
    F: for<'a> FnOnce(&'a mut TestContext) -> LocalBoxFuture<'a, ()>,
{
    if let Some(ctx) = set_up(name) {
        ctx.run(body)
            .await
            .expect("Failed to clean up test resources");
    }
}

/// Return from the test if a skip helper gave a reason.
macro_rules! skip_if {
    ($reason:expr) => {
        if let Some(reason) = $reason {
            log::warn!("Skipping: {}", reason);
            return;
        }
    };
}

/// Unwrap a result or return from the test, used for missing configuration.
macro_rules! require {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Skipping: {}", err);
                return;
            }
        }
    };
}
