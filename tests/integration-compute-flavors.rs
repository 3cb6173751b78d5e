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


#![cfg(feature = "compute")]

use std::collections::HashMap;

use tempest::common::data_utils::rand_uuid;
use tempest::compute::FlavorCreate;
use tempest::testing::assert_error_kind;
use tempest::{ErrorKind, Query};

#[macro_use]
mod common;

#[tokio::test]
async fn test_list_show_flavors() {
    common::run("FlavorsTest", |ctx| {
        Box::pin(async move {
            let primary = ctx.primary().await.expect("Cannot get primary credentials");

            let flavors = primary
                .flavors
                .list_flavors(false, &Query::new())
                .await
                .expect("Failed to list flavors");
            assert!(!flavors.is_empty());

            let detailed = primary
                .flavors
                .list_flavors(true, &Query::new())
                .await
                .expect("Failed to list flavors in detail");
            assert_eq!(detailed.len(), flavors.len());

            let flavor_ref = ctx
                .config()
                .compute
                .flavor_ref
                .clone()
                .unwrap_or_else(|| flavors[0].id.clone());
            let flavor = primary
                .flavors
                .show_flavor(&flavor_ref)
                .await
                .expect("Failed to show a flavor");
            assert_eq!(flavor.id, flavor_ref);
            assert!(detailed.iter().any(|f| f.id == flavor.id && f.ram == flavor.ram));

            let small = primary
                .flavors
                .list_flavors(true, &Query::new().with("minRam", flavor.ram))
                .await
                .expect("Failed to filter flavors");
            assert!(small.iter().all(|f| f.ram >= flavor.ram));
        })
    })
    .await;
}

#[tokio::test]
async fn test_flavor_extra_specs() {
    common::run("FlavorExtraSpecsTest", |ctx| {
        Box::pin(async move {
            skip_if!(ctx.skip_unless_admin());
            let admin = ctx.admin().await.expect("Cannot get admin credentials");
            let flavor = ctx
                .create_test_flavor(&admin, 512, 1, 10)
                .await
                .expect("Failed to create a flavor");
            let flavors = &admin.flavors;

            let mut specs = HashMap::new();
            let _ = specs.insert("hw:numa_nodes".to_string(), "1".to_string());
            let _ = specs.insert("hw:cpu_policy".to_string(), "shared".to_string());
            let result = flavors
                .set_flavor_extra_spec(&flavor.id, specs.clone())
                .await
                .expect("Failed to set extra specs");
            assert_eq!(result, specs);

            let listed = flavors
                .list_flavor_extra_specs(&flavor.id)
                .await
                .expect("Failed to list extra specs");
            assert_eq!(listed, specs);

            let updated = flavors
                .update_flavor_extra_spec(&flavor.id, "hw:numa_nodes", "2")
                .await
                .expect("Failed to update an extra spec");
            assert_eq!(updated, "2");
            let shown = flavors
                .show_flavor_extra_spec(&flavor.id, "hw:numa_nodes")
                .await
                .expect("Failed to show an extra spec");
            assert_eq!(shown, "2");

            flavors
                .unset_flavor_extra_spec(&flavor.id, "hw:cpu_policy")
                .await
                .expect("Failed to unset an extra spec");
            let _ = assert_error_kind(
                flavors
                    .show_flavor_extra_spec(&flavor.id, "hw:cpu_policy")
                    .await,
                ErrorKind::NotFound,
            );
        })
    })
    .await;
}

#[tokio::test]
async fn test_private_flavor_access() {
    common::run("FlavorAccessTest", |ctx| {
        Box::pin(async move {
            skip_if!(ctx.skip_unless_admin());
            let admin = ctx.admin().await.expect("Cannot get admin credentials");
            let primary = ctx.primary().await.expect("Cannot get primary credentials");
            let project_id = primary
                .project_id()
                .await
                .expect("Cannot get the primary project");

            let request = FlavorCreate::new(ctx.rand_name("flavor"), 512, 1, 10).with_public(false);
            let flavor = admin
                .flavors
                .create_flavor(&request)
                .await
                .expect("Failed to create a private flavor");
            let flavors = admin.flavors.clone();
            let id = flavor.id.clone();
            ctx.add_cleanup(format!("flavor {}", flavor.id), async move {
                flavors.delete_flavor(id).await
            });
            assert!(!flavor.is_public);

            let _ = assert_error_kind(
                primary.flavors.show_flavor(&flavor.id).await,
                ErrorKind::NotFound,
            );

            let access = admin
                .flavors
                .add_flavor_access(&flavor.id, &project_id)
                .await
                .expect("Failed to add flavor access");
            assert!(access.iter().any(|a| a.tenant_id == project_id));
            let _ = assert_error_kind(
                admin.flavors.add_flavor_access(&flavor.id, &project_id).await,
                ErrorKind::Conflict,
            );

            let visible = primary
                .flavors
                .show_flavor(&flavor.id)
                .await
                .expect("Private flavor is not visible after granting access");
            assert_eq!(visible.id, flavor.id);

            let access = admin
                .flavors
                .remove_flavor_access(&flavor.id, &project_id)
                .await
                .expect("Failed to remove flavor access");
            assert!(access.iter().all(|a| a.tenant_id != project_id));
            let listed = admin
                .flavors
                .list_flavor_access(&flavor.id)
                .await
                .expect("Failed to list flavor access");
            assert_eq!(listed, access);
        })
    })
    .await;
}

#[tokio::test]
async fn test_flavors_negative() {
    common::run("FlavorsNegativeTest", |ctx| {
        Box::pin(async move {
            let primary = ctx.primary().await.expect("Cannot get primary credentials");

            let _ = assert_error_kind(
                primary.flavors.show_flavor(rand_uuid()).await,
                ErrorKind::NotFound,
            );
            let request = FlavorCreate::new(ctx.rand_name("flavor"), 512, 1, 10);
            let _ = assert_error_kind(
                primary.flavors.create_flavor(&request).await,
                ErrorKind::Forbidden,
            );

            if ctx.skip_unless_admin().is_none() {
                let admin = ctx.admin().await.expect("Cannot get admin credentials");
                let flavor = ctx
                    .create_test_flavor(&admin, 512, 1, 10)
                    .await
                    .expect("Failed to create a flavor");
                let _ = assert_error_kind(
                    admin.flavors.list_flavor_access(&flavor.id).await,
                    ErrorKind::NotFound,
                );
                let invalid = FlavorCreate::new(ctx.rand_name("flavor"), 0, 1, 10);
                let _ = assert_error_kind(
                    admin.flavors.create_flavor(&invalid).await,
                    ErrorKind::BadRequest,
                );
            }
        })
    })
    .await;
}
