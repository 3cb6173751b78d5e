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

//! Abstraction over a service catalog.

use log::{debug, error};
use reqwest::Url;

use super::protocol::CatalogRecord;
use super::EndpointFilters;
use crate::{Error, ErrorKind, Result};

/// Abstraction over a service catalog.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    inner: Vec<CatalogRecord>,
}

impl ServiceCatalog {
    /// Wrap catalog records.
    pub fn new(catalog: Vec<CatalogRecord>) -> ServiceCatalog {
        ServiceCatalog { inner: catalog }
    }

    /// Raw catalog records.
    #[inline]
    pub fn records(&self) -> &[CatalogRecord] {
        &self.inner
    }

    /// Whether the catalog has a service of the given type.
    pub fn has_service(&self, service_type: &str) -> bool {
        self.inner.iter().any(|x| x.service_type == service_type)
    }

    /// Find an endpoint in the catalog.
    ///
    /// Endpoints are matched by interface in the order of preference given in
    /// the filters. When a region is set, only endpoints in this region match.
    pub fn find_endpoint(&self, service_type: &str, filters: &EndpointFilters) -> Result<Url> {
        let svc = match self.inner.iter().find(|x| x.service_type == service_type) {
            Some(s) => s,
            None => return Err(Error::new_endpoint_not_found(service_type)),
        };

        let mut endpoints: Vec<_> = svc
            .endpoints
            .iter()
            .filter_map(|x| {
                let position = filters
                    .interfaces
                    .iter()
                    .position(|item| item == &x.interface)?;
                match filters.region {
                    Some(ref region) if x.region.as_ref() != Some(region) => None,
                    _ => Some((position, x)),
                }
            })
            .collect();
        endpoints.sort_by_key(|(position, _)| *position);

        let endp = match endpoints.into_iter().next() {
            Some((_, endp)) => endp,
            None => return Err(Error::new_endpoint_not_found(service_type)),
        };

        debug!("Received {:?} for {}", endp, service_type);
        Url::parse(&endp.url).map_err(|e| {
            error!(
                "Invalid URL {} received from service catalog for service \
                 '{}', filters {:?}: {}",
                endp.url, service_type, filters, e
            );
            Error::new(
                ErrorKind::InvalidResponse,
                format!("Invalid URL {} for {} - {}", endp.url, service_type, e),
            )
        })
    }
}
