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

//! Servers API.

use std::collections::HashMap;

use log::{debug, trace};
use serde_json::{json, Value};

use super::super::rest_client::RestResponse;
use super::super::{Error, ErrorKind, Query, Result};
use super::protocol::*;

service_client! {
    /// Servers API: CRUD, metadata and server actions.
    ServersClient
}

impl ServersClient {
    /// Request creation of a server.
    ///
    /// The server is not active yet when this call returns.
    pub async fn create_server(&self, request: &ServerCreate) -> Result<CreatedServer> {
        debug!("Creating a server with {:?}", request);
        let root: CreatedServerRoot = self
            .client
            .post(&["servers"])
            .json(&ServerCreateRoot { server: request })
            .fetch(&[202])
            .await?;
        debug!("Requested creation of server {}", root.server.id);
        Ok(root.server)
    }

    /// Get a server.
    pub async fn show_server<S: AsRef<str>>(&self, id: S) -> Result<Server> {
        trace!("Fetching server {}", id.as_ref());
        let root: ServerRoot = self
            .client
            .get(&["servers", id.as_ref()])
            .fetch(&[200])
            .await?;
        trace!("Received {:?}", root.server);
        Ok(root.server)
    }

    /// List servers, optionally with details.
    pub async fn list_servers(&self, detail: bool, filters: &Query) -> Result<Vec<Server>> {
        trace!("Listing servers with {:?}", filters);
        let path: &[&str] = if detail {
            &["servers", "detail"]
        } else {
            &["servers"]
        };
        let root: ServersRoot = self
            .client
            .get(path)
            .query_all(filters)
            .fetch(&[200])
            .await?;
        trace!("Received servers: {:?}", root.servers);
        Ok(root.servers)
    }

    /// Update name, access addresses or description of a server.
    pub async fn update_server<S: AsRef<str>>(&self, id: S, update: &ServerUpdate) -> Result<Server> {
        debug!("Updating server {} with {:?}", id.as_ref(), update);
        let root: ServerRoot = self
            .client
            .put(&["servers", id.as_ref()])
            .json(&json!({ "server": update }))
            .fetch(&[200])
            .await?;
        Ok(root.server)
    }

    /// Request deletion of a server.
    pub async fn delete_server<S: AsRef<str>>(&self, id: S) -> Result<()> {
        debug!("Deleting server {}", id.as_ref());
        let _ = self
            .client
            .delete(&["servers", id.as_ref()])
            .send(&[204])
            .await?;
        debug!("Successfully requested deletion of server {}", id.as_ref());
        Ok(())
    }

    /// List addresses of a server grouped by network.
    pub async fn list_addresses<S: AsRef<str>>(
        &self,
        id: S,
    ) -> Result<HashMap<String, Vec<ServerAddress>>> {
        let root: AddressesRoot = self
            .client
            .get(&["servers", id.as_ref(), "ips"])
            .fetch(&[200])
            .await?;
        Ok(root.addresses)
    }

    /// List metadata of a server.
    pub async fn list_server_metadata<S: AsRef<str>>(
        &self,
        id: S,
    ) -> Result<HashMap<String, String>> {
        let root: MetadataRoot = self
            .client
            .get(&["servers", id.as_ref(), "metadata"])
            .fetch(&[200])
            .await?;
        Ok(root.metadata)
    }

    /// Replace all metadata of a server.
    pub async fn set_server_metadata<S: AsRef<str>>(
        &self,
        id: S,
        metadata: HashMap<String, String>,
    ) -> Result<HashMap<String, String>> {
        let root: MetadataRoot = self
            .client
            .put(&["servers", id.as_ref(), "metadata"])
            .json(&MetadataRoot { metadata })
            .fetch(&[200])
            .await?;
        Ok(root.metadata)
    }

    /// Create or update metadata items, keeping the other items.
    pub async fn update_server_metadata<S: AsRef<str>>(
        &self,
        id: S,
        metadata: HashMap<String, String>,
    ) -> Result<HashMap<String, String>> {
        let root: MetadataRoot = self
            .client
            .post(&["servers", id.as_ref(), "metadata"])
            .json(&MetadataRoot { metadata })
            .fetch(&[200])
            .await?;
        Ok(root.metadata)
    }

    /// Get one metadata item.
    pub async fn show_server_metadata_item<S1, S2>(&self, id: S1, key: S2) -> Result<String>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let root: MetaRoot = self
            .client
            .get(&["servers", id.as_ref(), "metadata", key.as_ref()])
            .fetch(&[200])
            .await?;
        meta_value(root, key.as_ref())
    }

    /// Set one metadata item.
    pub async fn set_server_metadata_item<S1, S2, S3>(
        &self,
        id: S1,
        key: S2,
        value: S3,
    ) -> Result<String>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
        S3: Into<String>,
    {
        let mut meta = HashMap::new();
        let _ = meta.insert(key.as_ref().to_string(), value.into());
        let root: MetaRoot = self
            .client
            .put(&["servers", id.as_ref(), "metadata", key.as_ref()])
            .json(&MetaRoot { meta })
            .fetch(&[200])
            .await?;
        meta_value(root, key.as_ref())
    }

    /// Delete one metadata item.
    pub async fn delete_server_metadata_item<S1, S2>(&self, id: S1, key: S2) -> Result<()>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let _ = self
            .client
            .delete(&["servers", id.as_ref(), "metadata", key.as_ref()])
            .send(&[204])
            .await?;
        Ok(())
    }

    async fn action(&self, id: &str, body: Value, expected: &[u16]) -> Result<RestResponse> {
        debug!("Running action {} on server {}", body, id);
        self.client
            .post(&["servers", id, "action"])
            .json(&body)
            .send(expected)
            .await
    }

    /// Reboot a server.
    pub async fn reboot_server<S: AsRef<str>>(&self, id: S, reboot_type: RebootType) -> Result<()> {
        let _ = self
            .action(id.as_ref(), json!({"reboot": {"type": reboot_type}}), &[202])
            .await?;
        Ok(())
    }

    /// Start a stopped server.
    pub async fn start_server<S: AsRef<str>>(&self, id: S) -> Result<()> {
        let _ = self.action(id.as_ref(), json!({"os-start": null}), &[202]).await?;
        Ok(())
    }

    /// Stop a server.
    pub async fn stop_server<S: AsRef<str>>(&self, id: S) -> Result<()> {
        let _ = self.action(id.as_ref(), json!({"os-stop": null}), &[202]).await?;
        Ok(())
    }

    /// Pause a server.
    pub async fn pause_server<S: AsRef<str>>(&self, id: S) -> Result<()> {
        let _ = self.action(id.as_ref(), json!({"pause": null}), &[202]).await?;
        Ok(())
    }

    /// Unpause a server.
    pub async fn unpause_server<S: AsRef<str>>(&self, id: S) -> Result<()> {
        let _ = self.action(id.as_ref(), json!({"unpause": null}), &[202]).await?;
        Ok(())
    }

    /// Suspend a server.
    pub async fn suspend_server<S: AsRef<str>>(&self, id: S) -> Result<()> {
        let _ = self.action(id.as_ref(), json!({"suspend": null}), &[202]).await?;
        Ok(())
    }

    /// Resume a suspended server.
    pub async fn resume_server<S: AsRef<str>>(&self, id: S) -> Result<()> {
        let _ = self.action(id.as_ref(), json!({"resume": null}), &[202]).await?;
        Ok(())
    }

    /// Lock a server.
    pub async fn lock_server<S: AsRef<str>>(&self, id: S) -> Result<()> {
        let _ = self.action(id.as_ref(), json!({"lock": null}), &[202]).await?;
        Ok(())
    }

    /// Unlock a server.
    pub async fn unlock_server<S: AsRef<str>>(&self, id: S) -> Result<()> {
        let _ = self.action(id.as_ref(), json!({"unlock": null}), &[202]).await?;
        Ok(())
    }

    /// Rebuild a server from an image.
    pub async fn rebuild_server<S: AsRef<str>>(
        &self,
        id: S,
        rebuild: &ServerRebuild,
    ) -> Result<Server> {
        let resp = self
            .action(id.as_ref(), json!({ "rebuild": rebuild }), &[202])
            .await?;
        let root: ServerRoot = resp.json()?;
        Ok(root.server)
    }

    /// Resize a server to another flavor.
    pub async fn resize_server<S1, S2>(&self, id: S1, flavor_ref: S2) -> Result<()>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let _ = self
            .action(
                id.as_ref(),
                json!({"resize": {"flavorRef": flavor_ref.as_ref()}}),
                &[202],
            )
            .await?;
        Ok(())
    }

    /// Confirm a pending resize.
    pub async fn confirm_resize_server<S: AsRef<str>>(&self, id: S) -> Result<()> {
        let _ = self
            .action(id.as_ref(), json!({"confirmResize": null}), &[204])
            .await?;
        Ok(())
    }

    /// Revert a pending resize.
    pub async fn revert_resize_server<S: AsRef<str>>(&self, id: S) -> Result<()> {
        let _ = self
            .action(id.as_ref(), json!({"revertResize": null}), &[202])
            .await?;
        Ok(())
    }

    /// Create an image (snapshot) of a server, returns the image ID.
    ///
    /// Starting with microversion 2.45 the ID is in the body, before it
    /// only in the `Location` header.
    pub async fn create_image<S1, S2>(
        &self,
        id: S1,
        name: S2,
        metadata: HashMap<String, String>,
    ) -> Result<String>
    where
        S1: AsRef<str>,
        S2: Into<String>,
    {
        let resp = self
            .action(
                id.as_ref(),
                json!({"createImage": {"name": name.into(), "metadata": metadata}}),
                &[202],
            )
            .await?;
        if !resp.is_empty() {
            if let Ok(root) = resp.json::<ImageIdRoot>() {
                return Ok(root.image_id);
            }
        }

        resp.header("location")
            .and_then(|location| location.trim_end_matches('/').rsplit('/').next())
            .filter(|image_id| !image_id.is_empty())
            .map(String::from)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidResponse,
                    "No image ID in the response to createImage",
                )
            })
    }

    /// Get the console output, optionally only the last lines.
    pub async fn get_console_output<S: AsRef<str>>(
        &self,
        id: S,
        length: Option<u32>,
    ) -> Result<String> {
        let resp = self
            .action(
                id.as_ref(),
                json!({"os-getConsoleOutput": {"length": length}}),
                &[200],
            )
            .await?;
        let root: ConsoleOutputRoot = resp.json()?;
        Ok(root.output)
    }
}

fn meta_value(mut root: MetaRoot, key: &str) -> Result<String> {
    root.meta.remove(key).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidResponse,
            format!("Metadata item {} is missing in the response", key),
        )
    })
}
