//! Query-string construction for analytics requests
//!
//! Time ranges, dimension filters, pagination and the metric-type
//! discriminator are rendered into a deterministic [`QueryString`]. Zero and
//! empty values never produce a parameter.

use std::collections::BTreeMap;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Default lookback window when no range is given
pub const DEFAULT_LOOKBACK_MS: i64 = 24 * 60 * 60 * 1000;

/// Millisecond-epoch time range; zero means unset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_at: i64,
    pub end_at: i64,
}

impl TimeRange {
    pub fn new(start_at: i64, end_at: i64) -> Self {
        Self { start_at, end_at }
    }

    pub fn is_unset(&self) -> bool {
        self.start_at == 0 && self.end_at == 0
    }

    /// Substitute the last 24 hours (UTC) when both bounds are unset
    pub fn normalize(self) -> Self {
        self.normalize_at(Utc::now().timestamp_millis())
    }

    /// Same as [`TimeRange::normalize`] with an explicit clock
    pub fn normalize_at(self, now_ms: i64) -> Self {
        if self.is_unset() {
            Self::new(now_ms - DEFAULT_LOOKBACK_MS, now_ms)
        } else {
            self
        }
    }
}

/// Optional dimension filters; an empty string means absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSet {
    pub path: String,
    pub referrer: String,
    pub title: String,
    pub query: String,
    pub browser: String,
    pub os: String,
    pub device: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub hostname: String,
    pub tag: String,
    pub distinct_id: String,
    pub segment: String,
    pub cohort: String,
}

impl FilterSet {
    /// Filters paired with their query parameter names, in declaration order
    pub fn params(&self) -> [(&'static str, &str); 15] {
        [
            ("path", self.path.as_str()),
            ("referrer", self.referrer.as_str()),
            ("title", self.title.as_str()),
            ("query", self.query.as_str()),
            ("browser", self.browser.as_str()),
            ("os", self.os.as_str()),
            ("device", self.device.as_str()),
            ("country", self.country.as_str()),
            ("region", self.region.as_str()),
            ("city", self.city.as_str()),
            ("hostname", self.hostname.as_str()),
            ("tag", self.tag.as_str()),
            ("distinctId", self.distinct_id.as_str()),
            ("segment", self.segment.as_str()),
            ("cohort", self.cohort.as_str()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.params().iter().all(|(_, value)| value.is_empty())
    }
}

/// Non-filter query options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Time bucket (year, month, day, hour, minute)
    pub unit: String,
    /// IANA timezone name
    pub timezone: String,
    /// Metric breakdown dimension, sent as `type`
    pub metric_type: String,
    pub limit: i64,
    pub offset: i64,
}

/// Ordered query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    params: BTreeMap<String, String>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Set a parameter only when the value is non-empty
    pub fn set_non_empty(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Form-encode, sorted by key
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }

    /// Parse a form-encoded query; later duplicates win
    pub fn parse(encoded: &str) -> Self {
        let params = form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect();
        Self { params }
    }
}

/// Render a range, options and filters into a query string
pub fn build_query(range: &TimeRange, options: &QueryOptions, filters: &FilterSet) -> QueryString {
    let mut query = QueryString::new();

    if range.start_at != 0 {
        query.set("startAt", range.start_at.to_string());
    }
    if range.end_at != 0 {
        query.set("endAt", range.end_at.to_string());
    }
    query.set_non_empty("unit", &options.unit);
    query.set_non_empty("timezone", &options.timezone);
    query.set_non_empty("type", &options.metric_type);
    if options.limit > 0 {
        query.set("limit", options.limit.to_string());
    }
    if options.offset > 0 {
        query.set("offset", options.offset.to_string());
    }

    for (key, value) in filters.params() {
        query.set_non_empty(key, value);
    }

    query
}

/// Append an encoded query to a path
///
/// A path that already carries a literal query keeps it and the builder
/// output is not merged in. An empty query leaves the path unchanged.
pub fn with_query(path: &str, query: &QueryString) -> String {
    if query.is_empty() || path.contains('?') {
        return path.to_string();
    }
    format!("{}?{}", path, query.encode())
}
