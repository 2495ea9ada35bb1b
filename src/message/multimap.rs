//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Ordered multi-valued string map for headers and request parameters.

use serde::{Deserialize, Serialize};

/// An ordered, multi-valued string mapping.
///
/// Headers and request parameters on a [`MethodCall`](super::MethodCall)
/// may carry several values per key, and the wire protocol preserves both
/// entry order and value order through encode/decode. A `MultiMap` keeps
/// entries in insertion order; inserting a value for an existing key
/// appends to that key's value list without changing its position.
///
/// Lookups are linear. Header and param maps are small (a handful of
/// entries), so this trades lookup speed for exact order preservation.
///
/// # Example
///
/// ```rust
/// use microbus::message::MultiMap;
///
/// let mut headers = MultiMap::new();
/// headers.insert("Accept", "application/json");
/// headers.insert("Accept", "text/plain");
/// headers.insert("X-Request-Id", "abc123");
///
/// assert_eq!(headers.get("Accept"), Some("application/json"));
/// assert_eq!(headers.get_all("Accept"), Some(&["application/json".to_string(), "text/plain".to_string()][..]));
/// assert_eq!(headers.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiMap {
    entries: Vec<(String, Vec<String>)>,
}

impl MultiMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a value for `key`, creating the entry if it does not exist.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some((_, values)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            values.push(value);
        } else {
            self.entries.push((key, vec![value]));
        }
    }

    /// Returns the first value for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, values)| values.first().map(String::as_str))
    }

    /// Returns all values for `key` in insertion order, if any.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns `true` if `key` has at least one value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MultiMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut map = MultiMap::new();
        map.insert("a", "1");
        assert_eq!(map.get("a"), Some("1"));
        assert_eq!(map.get("b"), None);
    }

    #[test]
    fn test_multi_value_order() {
        let mut map = MultiMap::new();
        map.insert("key", "first");
        map.insert("key", "second");
        map.insert("key", "third");

        let values = map.get_all("key").unwrap();
        assert_eq!(values, &["first", "second", "third"]);
    }

    #[test]
    fn test_entry_order_preserved() {
        let mut map = MultiMap::new();
        map.insert("z", "1");
        map.insert("a", "2");
        map.insert("m", "3");
        map.insert("z", "4");

        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_from_iterator() {
        let map: MultiMap = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_all("a").unwrap(), &["1", "3"]);
    }

    #[test]
    fn test_is_empty() {
        let mut map = MultiMap::new();
        assert!(map.is_empty());
        map.insert("a", "1");
        assert!(!map.is_empty());
    }
}
