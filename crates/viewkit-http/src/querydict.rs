//! Parsed query strings and form bodies.
//!
//! A key may repeat. [`QueryDict::get`] answers with the last value, which is
//! what a single-valued form field wants; [`QueryDict::get_list`] keeps them
//! all.

use std::collections::BTreeMap;

/// Decoded `key=value` pairs, grouped by key.
///
/// # Examples
///
/// ```
/// use viewkit_http::QueryDict;
///
/// let qd = QueryDict::parse("color=red&color=blue&size=large");
/// assert_eq!(qd.get("color"), Some("blue"));
/// assert_eq!(qd.get_list("color"), ["red", "blue"]);
/// assert!(qd.contains_key("size"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDict {
    data: BTreeMap<String, Vec<String>>,
}

impl QueryDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `application/x-www-form-urlencoded` text. `+` and
    /// percent-escapes are decoded; a bare key maps to the empty string.
    pub fn parse(encoded: &str) -> Self {
        url::form_urlencoded::parse(encoded.as_bytes()).collect()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut qd = Self::new();
        for (key, value) in pairs {
            qd.append(key.as_ref(), value.as_ref());
        }
        qd
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key)?.last().map(String::as_str)
    }

    /// Every value sent for `key`, in arrival order. Empty when absent.
    pub fn get_list(&self, key: &str) -> &[String] {
        self.data.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn append(&mut self, key: &str, value: &str) {
        self.data
            .entry(key.to_owned())
            .or_default()
            .push(value.to_owned());
    }

    /// Re-encodes the pairs with keys in sorted order.
    pub fn urlencode(&self) -> String {
        let pairs = self
            .data
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |value| (key, value)));
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for QueryDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
