// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::collections::btree_map::{IntoIter, Iter};
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::url_state::ParamValue;

/// Parsed URL query string.
///
/// Keys are kept in sorted order so that serialising the same parameters always produces the
/// same string, regardless of the order they appeared in or were inserted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryString(BTreeMap<String, String>);

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`.
    ///
    /// Values are always strings. Repeated keys keep their last value and malformed escapes are
    /// decoded lossily, parsing never fails.
    pub fn parse(search: &str) -> Self {
        let query = search.strip_prefix('?').unwrap_or(search);
        let params = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        Self(params)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }

    /// Overlay parameters on top of this query. Keys present in both take the new value, all
    /// other keys stay untouched.
    pub fn merge<'a, I>(&mut self, params: I)
    where
        I: IntoIterator<Item = (&'a String, &'a ParamValue)>,
    {
        for (key, value) in params {
            self.0.insert(key.clone(), value.to_string());
        }
    }
}

impl Display for QueryString {
    /// Form-urlencoded representation without the leading `?`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish();
        write!(f, "{}", encoded)
    }
}

impl FromStr for QueryString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryString
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for QueryString {
    type Item = (String, String);
    type IntoIter = IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryString {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::url_state::ParamValue;

    use super::QueryString;

    #[test]
    fn parses_with_and_without_question_mark() {
        let query = QueryString::parse("?tbl_p=3&tab=members");
        assert_eq!(query.get("tbl_p"), Some("3"));
        assert_eq!(query.get("tab"), Some("members"));
        assert_eq!(query, QueryString::parse("tbl_p=3&tab=members"));

        assert!(QueryString::parse("").is_empty());
        assert!(QueryString::parse("?").is_empty());
    }

    #[test]
    fn decodes_escapes_and_keeps_last_duplicate() {
        let query = QueryString::parse("q=healthy+schools&q2=a%26b&p=1&p=2");
        assert_eq!(query.get("q"), Some("healthy schools"));
        assert_eq!(query.get("q2"), Some("a&b"));
        assert_eq!(query.get("p"), Some("2"));

        // Broken escapes never fail parsing.
        let query = QueryString::parse("name=%zz&flag");
        assert_eq!(query.get("name"), Some("%zz"));
        assert_eq!(query.get("flag"), Some(""));
    }

    #[test]
    fn serializes_in_canonical_order() {
        let query: QueryString = vec![("z", "1"), ("a", "two words"), ("m", "x&y")]
            .into_iter()
            .collect();
        assert_eq!(query.to_string(), "a=two+words&m=x%26y&z=1");

        // Same parameters in a different order serialize identically.
        let reordered = QueryString::parse("z=1&m=x%26y&a=two%20words");
        assert_eq!(reordered.to_string(), query.to_string());
    }

    #[test]
    fn merge_overrides_matching_keys_only() {
        let mut query = QueryString::parse("other_page=4&tbl_p=1");
        let mut params = BTreeMap::new();
        params.insert("tbl_p".to_string(), ParamValue::Num(3.0));
        params.insert("tbl_s".to_string(), ParamValue::from("food"));

        query.merge(&params);

        assert_eq!(query.get("other_page"), Some("4"));
        assert_eq!(query.get("tbl_p"), Some("3"));
        assert_eq!(query.get("tbl_s"), Some("food"));
        assert_eq!(query.len(), 3);
    }
}
