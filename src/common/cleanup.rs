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

//! Resource cleanups.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;
use log::{debug, warn};

use super::super::{ErrorKind, Result};

/// A stack of cleanup actions executed in reverse order of registration.
#[derive(Default)]
pub struct CleanupStack {
    items: Vec<(String, BoxFuture<'static, Result<()>>)>,
}

impl fmt::Debug for CleanupStack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.items.iter().map(|(desc, _)| desc))
            .finish()
    }
}

impl CleanupStack {
    /// Create an empty stack.
    pub fn new() -> CleanupStack {
        CleanupStack::default()
    }

    /// Register a cleanup.
    pub fn add<S, F>(&mut self, description: S, cleanup: F)
    where
        S: Into<String>,
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let description = description.into();
        debug!("Registering cleanup: {}", description);
        self.items.push((description, cleanup.boxed()));
    }

    /// Number of pending cleanups.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no pending cleanups.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Run all cleanups, last registered first.
    ///
    /// `NotFound` is treated as success. Every cleanup is attempted, the
    /// first failure (if any) is returned.
    pub async fn run(&mut self) -> Result<()> {
        let mut first_error = None;
        while let Some((description, cleanup)) = self.items.pop() {
            match cleanup.await {
                Ok(()) => debug!("Cleanup finished: {}", description),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("Cleanup {} skipped, resource is already gone", description)
                }
                Err(e) => {
                    warn!("Cleanup {} failed: {}", description, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
