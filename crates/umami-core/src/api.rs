//! Resource paths of the Umami REST API

use std::fmt;
use crate::{Error, Result};

pub const LOGIN_PATH: &str = "/auth/login";
pub const VERIFY_PATH: &str = "/auth/verify";
pub const TEAMS_PATH: &str = "/teams";
pub const WEBSITES_PATH: &str = "/websites";

/// `/teams/{team_id}/websites`
pub fn team_websites_path(team_id: &str) -> Result<String> {
    if team_id.is_empty() {
        return Err(Error::required("team-id"));
    }
    Ok(format!("/teams/{}/websites", team_id))
}

/// Per-website analytics resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyticsResource {
    Active,
    EventsSeries,
    Metrics,
    MetricsExpanded,
    Pageviews,
    Stats,
}

impl AnalyticsResource {
    pub const ALL: [AnalyticsResource; 6] = [
        AnalyticsResource::Active,
        AnalyticsResource::EventsSeries,
        AnalyticsResource::Metrics,
        AnalyticsResource::MetricsExpanded,
        AnalyticsResource::Pageviews,
        AnalyticsResource::Stats,
    ];

    /// Path suffix below `/websites/{id}`
    pub fn suffix(self) -> &'static str {
        match self {
            AnalyticsResource::Active => "active",
            AnalyticsResource::EventsSeries => "events/series",
            AnalyticsResource::Metrics => "metrics",
            AnalyticsResource::MetricsExpanded => "metrics/expanded",
            AnalyticsResource::Pageviews => "pageviews",
            AnalyticsResource::Stats => "stats",
        }
    }

    /// Whether the resource needs a metric `type`
    pub fn requires_metric_type(self) -> bool {
        matches!(self, AnalyticsResource::Metrics | AnalyticsResource::MetricsExpanded)
    }

    /// `/websites/{website_id}/{suffix}`
    pub fn path(self, website_id: &str) -> Result<String> {
        if website_id.is_empty() {
            return Err(Error::required("website-id"));
        }
        Ok(format!("/websites/{}/{}", website_id, self.suffix()))
    }
}

impl fmt::Display for AnalyticsResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}
