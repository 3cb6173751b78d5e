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

//! Key pairs API.

use log::{debug, trace};

use super::super::Result;
use super::protocol::*;

service_client! {
    /// Key pairs API.
    KeyPairsClient
}

impl KeyPairsClient {
    /// List key pairs of the current user or, for admins, of another user.
    pub async fn list_keypairs(&self, user_id: Option<&str>) -> Result<Vec<KeyPair>> {
        let mut request = self.client.get(&["os-keypairs"]);
        if let Some(user_id) = user_id {
            request = request.query("user_id", user_id);
        }
        let root: KeyPairsRoot = request.fetch(&[200]).await?;
        trace!("Received key pairs: {:?}", root.keypairs);
        Ok(root.keypairs.into_iter().map(|item| item.keypair).collect())
    }

    /// Get a key pair.
    pub async fn show_keypair<S: AsRef<str>>(&self, name: S) -> Result<KeyPair> {
        let root: KeyPairRoot = self
            .client
            .get(&["os-keypairs", name.as_ref()])
            .fetch(&[200])
            .await?;
        Ok(root.keypair)
    }

    /// Generate or import a key pair.
    ///
    /// Nova responds with 200 before microversion 2.2 and with 201 since.
    pub async fn create_keypair(&self, request: &KeyPairCreate) -> Result<KeyPair> {
        debug!(
            "Creating key pair {} ({})",
            request.name,
            if request.public_key.is_some() {
                "import"
            } else {
                "generate"
            }
        );
        let root: KeyPairRoot = self
            .client
            .post(&["os-keypairs"])
            .json(&KeyPairCreateRoot { keypair: request })
            .fetch(&[200, 201])
            .await?;
        Ok(root.keypair)
    }

    /// Delete a key pair.
    ///
    /// Nova responds with 202 before microversion 2.2 and with 204 since.
    pub async fn delete_keypair<S: AsRef<str>>(&self, name: S) -> Result<()> {
        debug!("Deleting key pair {}", name.as_ref());
        let _ = self
            .client
            .delete(&["os-keypairs", name.as_ref()])
            .send(&[202, 204])
            .await?;
        Ok(())
    }
}
