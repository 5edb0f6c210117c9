//! Tracking request parameters: site ids, option maps, merging, and
//! query-string serialization.

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

/// Identifier of the tracked site within the analytics instance.
///
/// Piwik accepts numeric and string site ids interchangeably; both are
/// carried as their decimal string representation, so `SiteId::from(1)`
/// and `SiteId::from("1")` are indistinguishable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteId(String);

impl SiteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<u32> for SiteId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for SiteId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for SiteId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SiteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tracking API parameters as an ordered string map.
///
/// Parameter names are opaque to the client and passed through to the
/// endpoint verbatim. Iteration order is deterministic (sorted by key)
/// so the emitted query string is reproducible for the same inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingOptions {
    params: BTreeMap<String, String>,
}

impl TrackingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an arbitrary Tracking API parameter.
    pub fn set(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Sets `action_name`, the page or action title.
    pub fn action_name(self, name: &str) -> Self {
        self.set("action_name", name)
    }

    /// Sets `lang`, the visitor's accepted language.
    pub fn lang(self, lang: &str) -> Self {
        self.set("lang", lang)
    }

    /// Sets `uid`, the user identifier.
    pub fn user_id(self, uid: &str) -> Self {
        self.set("uid", uid)
    }

    /// Sets `urlref`, the referrer URL.
    pub fn referrer(self, urlref: &str) -> Self {
        self.set("urlref", urlref)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes the parameters as a percent-encoded query string.
    ///
    /// Keys and values are both encoded per the
    /// `application/x-www-form-urlencoded` rules.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for TrackingOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        }
    }
}

/// Merges parameter layers into a single mapping.
///
/// Precedence rises with position: when a key appears in more than one
/// layer, the value from the last layer containing it wins. The client
/// passes layers as per-call options, then stored defaults, then the
/// mandatory fields, so defaults override per-call options and the
/// mandatory fields override everything.
pub fn merge_layers(layers: &[&TrackingOptions]) -> TrackingOptions {
    let mut merged = BTreeMap::new();
    for layer in layers {
        for (key, value) in &layer.params {
            merged.insert(key.clone(), value.clone());
        }
    }
    TrackingOptions { params: merged }
}
