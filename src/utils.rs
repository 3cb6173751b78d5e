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

//! Various utilities.

use std::fmt::Display;

use super::{Error, ErrorKind, Result};

macro_rules! protocol_enum {
    {$(#[$attr:meta])* enum $name:ident { $($item:ident = $val:literal),+ }} => (
        $(#[$attr])*
        #[allow(missing_docs)]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($item),+,
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                match self {
                    $($name::$item => $val),+,
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::Error;

            fn from_str(value: &str) -> $crate::Result<$name> {
                match value {
                    $($val => Ok($name::$item)),+,
                    other => Err($crate::Error::new(
                        $crate::ErrorKind::InvalidInput,
                        format!("Invalid {} value: {}", stringify!($name), other),
                    )),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                String::from(value.as_ref())
            }
        }

        impl ::serde::ser::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::ser::Serializer,
            {
                serializer.serialize_str(self.as_ref())
            }
        }

        impl<'de> ::serde::de::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<$name, D::Error>
            where
                D: ::serde::de::Deserializer<'de>,
            {
                let value = <String as ::serde::de::Deserialize>::deserialize(deserializer)?;
                value.parse().map_err(::serde::de::Error::custom)
            }
        }
    );
}

macro_rules! service_client {
    {$(#[$attr:meta])* $name:ident} => (
        $(#[$attr])*
        #[derive(Clone, Debug)]
        pub struct $name {
            client: $crate::rest_client::RestClient,
        }

        impl $name {
            /// Create a client on top of a REST client.
            pub fn new(client: $crate::rest_client::RestClient) -> $name {
                $name { client }
            }

            /// Use the given microversion for all requests.
            pub fn with_microversion<V>(self, version: V) -> $name
            where
                V: Into<Option<$crate::common::Microversion>>,
            {
                $name {
                    client: self.client.with_microversion(version),
                }
            }

            /// Underlying REST client.
            #[inline]
            pub fn rest_client(&self) -> &$crate::rest_client::RestClient {
                &self.client
            }
        }
    );
}

/// Query parameters for list calls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query(pub Vec<(String, String)>);

impl Query {
    /// Empty query.
    pub fn new() -> Query {
        Query(Vec::new())
    }

    /// Add an item to the query.
    pub fn push<K, V>(&mut self, param: K, value: V)
    where
        K: Into<String>,
        V: Display,
    {
        self.0.push((param.into(), value.to_string()))
    }

    /// Add a string item to the query.
    pub fn push_str<K, V>(&mut self, param: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.push((param.into(), value.into()))
    }

    /// Add an item to the query, builder style.
    pub fn with<K, V>(mut self, param: K, value: V) -> Query
    where
        K: Into<String>,
        V: Display,
    {
        self.push(param, value);
        self
    }

    /// Whether the query is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the first value of a parameter.
    pub fn get(&self, param: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == param)
            .map(|(_, value)| value.as_str())
    }
}

/// Extract one and exactly one item from a list.
pub fn one<T, I, S1, S2>(collection: I, not_found_msg: S1, too_many_msg: S2) -> Result<T>
where
    I: IntoIterator<Item = T>,
    S1: Into<String>,
    S2: Into<String>,
{
    let mut iter = collection.into_iter();
    match iter.next() {
        Some(result) => {
            if iter.next().is_some() {
                Err(Error::new(ErrorKind::TooManyItems, too_many_msg))
            } else {
                Ok(result)
            }
        }
        None => Err(Error::new(ErrorKind::NotFound, not_found_msg)),
    }
}
