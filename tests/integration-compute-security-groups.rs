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

use tempest::common::data_utils::rand_uuid;
use tempest::compute::SecurityGroupRuleCreate;
use tempest::testing::assert_error_kind;
use tempest::ErrorKind;

#[macro_use]
mod common;

#[tokio::test]
async fn test_security_group_crud() {
    common::run("SecurityGroupsTest", |ctx| {
        Box::pin(async move {
            let primary = ctx.primary().await.expect("Cannot get primary credentials");
            let groups = primary.security_groups.clone();

            let name = ctx.rand_name("secgroup");
            let group = groups
                .create_security_group(name.clone(), "created by tests")
                .await
                .expect("Failed to create a security group");
            {
                let groups = groups.clone();
                let id = group.id.clone();
                ctx.add_cleanup(format!("security group {}", id), async move {
                    groups.delete_security_group(id).await
                });
            }
            assert_eq!(group.name, name);
            assert_eq!(group.description, "created by tests");

            let listed = groups
                .list_security_groups()
                .await
                .expect("Failed to list security groups");
            assert!(listed.iter().any(|g| g.id == group.id));

            let new_name = ctx.rand_name("secgroup-updated");
            let updated = groups
                .update_security_group(&group.id, new_name.clone(), "updated by tests")
                .await
                .expect("Failed to update the security group");
            assert_eq!(updated.name, new_name);
            assert_eq!(updated.description, "updated by tests");

            let rule = groups
                .create_security_group_rule(&SecurityGroupRuleCreate {
                    parent_group_id: group.id.clone(),
                    ip_protocol: "tcp".to_string(),
                    from_port: 22,
                    to_port: 22,
                    cidr: Some("10.0.0.0/8".to_string()),
                    group_id: None,
                })
                .await
                .expect("Failed to create a rule");
            assert_eq!(rule.parent_group_id, group.id);
            assert_eq!(rule.from_port, Some(22));

            let shown = groups
                .show_security_group(&group.id)
                .await
                .expect("Failed to show the security group");
            assert!(shown.rules.iter().any(|r| r.id == rule.id));

            groups
                .delete_security_group_rule(&rule.id)
                .await
                .expect("Failed to delete the rule");
            let shown = groups
                .show_security_group(&group.id)
                .await
                .expect("Failed to show the security group");
            assert!(shown.rules.iter().all(|r| r.id != rule.id));
        })
    })
    .await;
}

#[tokio::test]
async fn test_security_groups_negative() {
    common::run("SecurityGroupsNegativeTest", |ctx| {
        Box::pin(async move {
            let primary = ctx.primary().await.expect("Cannot get primary credentials");
            let groups = primary.security_groups.clone();

            let _ = assert_error_kind(
                groups.show_security_group(rand_uuid()).await,
                ErrorKind::NotFound,
            );
            let _ = assert_error_kind(
                groups.delete_security_group(rand_uuid()).await,
                ErrorKind::NotFound,
            );
            let _ = assert_error_kind(
                groups.delete_security_group_rule(rand_uuid()).await,
                ErrorKind::NotFound,
            );

            let group = groups
                .create_security_group(ctx.rand_name("secgroup"), "negative tests")
                .await
                .expect("Failed to create a security group");
            {
                let groups = groups.clone();
                let id = group.id.clone();
                ctx.add_cleanup(format!("security group {}", id), async move {
                    groups.delete_security_group(id).await
                });
            }

            let _ = assert_error_kind(
                groups
                    .create_security_group_rule(&SecurityGroupRuleCreate {
                        parent_group_id: group.id.clone(),
                        ip_protocol: "tcp".to_string(),
                        from_port: 22,
                        to_port: 65536,
                        ..SecurityGroupRuleCreate::default()
                    })
                    .await,
                ErrorKind::BadRequest,
            );
            let _ = assert_error_kind(
                groups
                    .create_security_group_rule(&SecurityGroupRuleCreate {
                        parent_group_id: group.id.clone(),
                        ip_protocol: "no-such-protocol".to_string(),
                        from_port: 22,
                        to_port: 22,
                        ..SecurityGroupRuleCreate::default()
                    })
                    .await,
                ErrorKind::BadRequest,
            );

            let default = groups
                .list_security_groups()
                .await
                .expect("Failed to list security groups")
                .into_iter()
                .find(|g| g.name == "default");
            if let Some(default) = default {
                let _ = assert_error_kind(
                    groups.delete_security_group(&default.id).await,
                    ErrorKind::BadRequest,
                );
            }
        })
    })
    .await;
}
