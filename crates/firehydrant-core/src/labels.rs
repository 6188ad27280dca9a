//! Label selectors and their canonical query-string form.
//!
//! A [`LabelsSelector`] is a map of label key to label value. It is sent to the
//! API as a single query parameter whose value is every `key=value` token,
//! ordered by key, joined with commas:
//!
//! ```
//! use firehydrant_core::labels::LabelsSelector;
//!
//! let selector: LabelsSelector = [("team", "sre"), ("env", "prod")].into_iter().collect();
//! assert_eq!(selector.encode(), "env=prod,team=sre");
//! ```
//!
//! The backing map has no iteration order, so keys are always sorted (by
//! byte value) before serialization. Two selectors with the same content
//! encode identically no matter how they were built.
//!
//! The wire format does not escape `,` or `=`. A key or value containing
//! either character cannot be decoded unambiguously. [`LabelEncoding::Escaped`]
//! is available for servers that understand backslash escapes; it is never
//! the default.

use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::QueryValueEncoder;

const TOKEN_SEPARATOR: char = ',';
const PAIR_SEPARATOR: char = '=';
const ESCAPE: char = '\\';

/// How label keys and values are written into the encoded string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelEncoding {
    /// Raw `key=value` tokens, exactly as the API expects them.
    #[default]
    Compatible,
    /// Backslash-escape `\`, `,` and `=` inside keys and values.
    Escaped,
}

/// Map of label keys to label values used as a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelsSelector(HashMap<String, String>);

impl LabelsSelector {
    /// Create an empty selector.
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Insert a label, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Remove a label, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the selector holds no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over labels in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Labels ordered by key, compared byte by byte.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
        entries
    }

    /// Borrow the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.0
    }

    /// Consume the selector and return the underlying map.
    #[must_use]
    pub fn into_map(self) -> HashMap<String, String> {
        self.0
    }

    /// Canonical wire encoding: sorted `key=value` tokens joined by `,`.
    ///
    /// An empty selector encodes to the empty string.
    #[must_use]
    pub fn encode(&self) -> String {
        self.encode_with(LabelEncoding::Compatible)
    }

    /// Canonical encoding using the given escaping mode.
    #[must_use]
    pub fn encode_with(&self, encoding: LabelEncoding) -> String {
        let mut out = String::new();
        for (index, (key, value)) in self.sorted().into_iter().enumerate() {
            if index > 0 {
                out.push(TOKEN_SEPARATOR);
            }
            match encoding {
                LabelEncoding::Compatible => {
                    out.push_str(key);
                    out.push(PAIR_SEPARATOR);
                    out.push_str(value);
                }
                LabelEncoding::Escaped => {
                    push_escaped(&mut out, key);
                    out.push(PAIR_SEPARATOR);
                    push_escaped(&mut out, value);
                }
            }
        }
        out
    }

    /// Parse a string produced by [`encode`](Self::encode).
    ///
    /// Tokens are split on `,` and then on the first `=`. A token without `=`
    /// becomes a key with an empty value. Empty tokens and tokens with an
    /// empty key are skipped; a repeated key keeps its last value.
    ///
    /// Decoding the output of `encode` gives back the same selector only when
    /// every key is non-empty. An entry with an empty key encodes as `=value`
    /// and is dropped on the way back.
    #[must_use]
    pub fn decode(input: &str) -> Self {
        Self::decode_with(input, LabelEncoding::Compatible)
    }

    /// Parse an encoded selector written with the given escaping mode.
    #[must_use]
    pub fn decode_with(input: &str, encoding: LabelEncoding) -> Self {
        let mut selector = Self::new();
        match encoding {
            LabelEncoding::Compatible => {
                for token in input.split(TOKEN_SEPARATOR) {
                    let (key, value) = token.split_once(PAIR_SEPARATOR).unwrap_or((token, ""));
                    if !key.is_empty() {
                        selector.insert(key, value);
                    }
                }
            }
            LabelEncoding::Escaped => {
                for (key, value) in split_escaped(input) {
                    if !key.is_empty() {
                        selector.0.insert(key, value);
                    }
                }
            }
        }
        selector
    }
}

fn push_escaped(out: &mut String, raw: &str) {
    for ch in raw.chars() {
        if matches!(ch, ESCAPE | TOKEN_SEPARATOR | PAIR_SEPARATOR) {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
}

fn split_escaped(input: &str) -> Vec<(String, String)> {
    let mut tokens = Vec::new();
    let mut key = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        let literal = match ch {
            ESCAPE => chars.next().unwrap_or(ESCAPE),
            TOKEN_SEPARATOR => {
                tokens.push((std::mem::take(&mut key), std::mem::take(&mut value)));
                in_value = false;
                continue;
            }
            PAIR_SEPARATOR if !in_value => {
                in_value = true;
                continue;
            }
            other => other,
        };
        if in_value {
            value.push(literal);
        } else {
            key.push(literal);
        }
    }
    tokens.push((key, value));
    tokens
}

impl QueryValueEncoder for LabelsSelector {
    fn encode_value(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.encode())
        }
    }
}

impl fmt::Display for LabelsSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<HashMap<String, String>> for LabelsSelector {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<LabelsSelector> for HashMap<String, String> {
    fn from(selector: LabelsSelector) -> Self {
        selector.0
    }
}

impl<K, V> FromIterator<(K, V)> for LabelsSelector
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V> Extend<(K, V)> for LabelsSelector
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl IntoIterator for LabelsSelector {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
