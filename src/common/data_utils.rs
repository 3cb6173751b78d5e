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

//! Random data for test resources.

use rand::distributions::{Alphanumeric, DistString};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

const PUNCTUATION: &[u8] = b"~!@#%^&*_=+";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// Generate a random name: `<prefix>-<random integer>`.
///
/// An empty prefix yields just the integer.
pub fn rand_name<S: AsRef<str>>(prefix: S) -> String {
    let number = rand::thread_rng().gen_range(0..i32::MAX);
    let prefix = prefix.as_ref();
    if prefix.is_empty() {
        number.to_string()
    } else {
        format!("{}-{}", prefix, number)
    }
}

/// Generate a random password.
///
/// The password starts with an upper-case letter, a digit and a punctuation
/// character, so the length is never less than 3.
pub fn rand_password(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut seed: Vec<u8> = Vec::new();
    seed.extend(b'a'..=b'z');
    seed.extend(UPPERCASE);
    seed.extend(DIGITS);
    seed.extend(PUNCTUATION);

    let mut result = String::with_capacity(length.max(3));
    for set in &[UPPERCASE, DIGITS, PUNCTUATION] {
        if let Some(c) = set.choose(&mut rng) {
            result.push(char::from(*c));
        }
    }
    for _ in 3..length {
        if let Some(c) = seed.choose(&mut rng) {
            result.push(char::from(*c));
        }
    }
    result
}

/// Random UUID in its canonical form.
pub fn rand_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Random UUID as 32 hex digits.
pub fn rand_uuid_hex() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Random integer in the inclusive range.
///
/// The bounds may be given in any order.
pub fn rand_int_id(start: u32, end: u32) -> u32 {
    let (low, high) = if start <= end { (start, end) } else { (end, start) };
    rand::thread_rng().gen_range(low..=high)
}

/// Random alphanumeric string.
pub fn rand_string(length: usize) -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), length)
}

/// A string of exactly `size` characters made by repeating `base_text`.
///
/// Used to produce over-long names for negative tests.
pub fn arbitrary_string(size: usize, base_text: Option<&str>) -> String {
    let base_text = match base_text {
        Some(text) if !text.is_empty() => text,
        _ => "test",
    };
    base_text.chars().cycle().take(size).collect()
}
