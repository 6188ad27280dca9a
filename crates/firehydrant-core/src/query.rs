//! Builder for HTTP query parameters.
//!
//! [`QueryParams`] collects `(name, value)` pairs in insertion order. Scalar
//! filters go through the `push_*` helpers, which skip unset or default values.
//! Structured filters implement [`QueryValueEncoder`] and are added with
//! [`QueryParams::push_encoded`], so the builder never needs to know which
//! concrete filter type it is handling.

use std::fmt::Display;

use url::form_urlencoded;
use url::Url;

/// Ordered query pairs handed to the transport layer.
pub type EncodedParameters = Vec<(&'static str, String)>;

/// A value that knows how to render itself as a single query-parameter value.
///
/// Returning `None` means the value carries no filter and the parameter must
/// be left out of the request entirely.
pub trait QueryValueEncoder {
    /// Render the value, or `None` to omit the parameter.
    fn encode_value(&self) -> Option<String>;
}

impl<T: QueryValueEncoder + ?Sized> QueryValueEncoder for &T {
    fn encode_value(&self) -> Option<String> {
        (**self).encode_value()
    }
}

impl<T: QueryValueEncoder> QueryValueEncoder for Option<T> {
    fn encode_value(&self) -> Option<String> {
        self.as_ref().and_then(QueryValueEncoder::encode_value)
    }
}

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: EncodedParameters,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append using a mapping function when the value is present.
    pub fn push_opt_with<T, F>(&mut self, key: &'static str, value: Option<T>, mut map: F)
    where
        F: FnMut(T) -> String,
    {
        if let Some(value) = value {
            self.pairs.push((key, map(value)));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append a string value unless it is empty.
    pub fn push_non_empty(&mut self, key: &'static str, value: &str) {
        if !value.is_empty() {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a numeric value unless it equals the type's default (zero).
    pub fn push_non_zero<T>(&mut self, key: &'static str, value: T)
    where
        T: Display + Default + PartialEq,
    {
        if value != T::default() {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a structured value through its [`QueryValueEncoder`].
    ///
    /// Nothing is appended when the encoder reports the value as empty.
    pub fn push_encoded<E>(&mut self, key: &'static str, value: &E)
    where
        E: QueryValueEncoder + ?Sized,
    {
        if let Some(encoded) = value.encode_value() {
            self.pairs.push((key, encoded));
        }
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> EncodedParameters {
        self.pairs
    }

    /// Borrow the collected key/value pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of collected parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Render the pairs as an `application/x-www-form-urlencoded` query string.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Append the pairs to the query component of `url`, percent-encoding each one.
    pub fn append_to(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        let mut query = url.query_pairs_mut();
        for (key, value) in &self.pairs {
            query.append_pair(key, value);
        }
    }
}

impl From<QueryParams> for EncodedParameters {
    fn from(params: QueryParams) -> Self {
        params.into_pairs()
    }
}
