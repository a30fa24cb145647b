//! Analytics command handlers
//!
//! Each analytics subcommand maps to one per-website resource. The request
//! path is assembled from the website id, the resource suffix and a query
//! rendered by [`umami_core::build_query`]; the server's JSON is printed
//! unchanged.

use super::Context;
use crate::cli::{AnalyticsAction, FilterArgs, MetricsArgs, TimeRangeArgs};
use crate::error::Result;
use crate::output::OutputWriter;
use serde_json::Value;
use tracing::{debug, instrument};
use umami_core::api::AnalyticsResource;
use umami_core::{
    build_query, with_query, ApiRequest, Error as CoreError, FilterSet, QueryOptions, QueryString,
    TimeRange,
};

/// Handle `analytics <resource>`
#[instrument(skip_all)]
pub async fn handle_analytics(
    action: AnalyticsAction,
    ctx: &Context<'_>,
    output: &mut OutputWriter,
) -> Result<()> {
    let (resource, path) = analytics_path(action)?;
    debug!(%resource, %path, "Analytics request");

    let transport = ctx.transport()?;
    let response = output
        .track(
            &format!("Fetching {}...", resource),
            transport.execute::<Value>(&ApiRequest::get(path)),
        )
        .await?;

    output.data(&response.data)
}

/// Resolve an action to its resource and full request path
///
/// The website id is checked before the metric type.
fn analytics_path(action: AnalyticsAction) -> umami_core::Result<(AnalyticsResource, String)> {
    let (resource, website_id, query) = match action {
        AnalyticsAction::Active(args) => {
            (AnalyticsResource::Active, args.website_id, QueryString::new())
        }
        AnalyticsAction::EventsSeries(args) => {
            let options = QueryOptions {
                unit: args.unit.unwrap_or_default(),
                timezone: args.timezone.unwrap_or_default(),
                ..Default::default()
            };
            let query = range_query(args.range, &options, args.filters);
            (AnalyticsResource::EventsSeries, args.website_id, query)
        }
        AnalyticsAction::Metrics(args) => metrics_request(AnalyticsResource::Metrics, args)?,
        AnalyticsAction::MetricsExpanded(args) => {
            metrics_request(AnalyticsResource::MetricsExpanded, args)?
        }
        AnalyticsAction::Pageviews(args) => {
            let options = QueryOptions {
                unit: args.unit.unwrap_or_default(),
                timezone: args.timezone.unwrap_or_default(),
                ..Default::default()
            };
            let mut query = range_query(args.range, &options, args.filters);
            query.set_non_empty("compare", args.compare.as_deref().unwrap_or_default());
            (AnalyticsResource::Pageviews, args.website_id, query)
        }
        AnalyticsAction::Stats(args) => {
            let query = range_query(args.range, &QueryOptions::default(), args.filters);
            (AnalyticsResource::Stats, args.website_id, query)
        }
    };

    let path = resource.path(&website_id)?;
    Ok((resource, with_query(&path, &query)))
}

fn range_query(range: TimeRangeArgs, options: &QueryOptions, filters: FilterArgs) -> QueryString {
    let range = TimeRange::from(range).normalize();
    build_query(&range, options, &FilterSet::from(filters))
}

fn metrics_request(
    resource: AnalyticsResource,
    args: MetricsArgs,
) -> umami_core::Result<(AnalyticsResource, String, QueryString)> {
    if args.website_id.is_empty() {
        return Err(CoreError::required("website-id"));
    }
    let metric_type = args.metric_type.unwrap_or_default();
    if resource.requires_metric_type() && metric_type.is_empty() {
        return Err(CoreError::required("type"));
    }

    let options = QueryOptions {
        metric_type,
        limit: args.limit.unwrap_or(0),
        offset: args.offset.unwrap_or(0),
        ..Default::default()
    };
    let query = range_query(args.range, &options, args.filters);
    Ok((resource, args.website_id, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ActiveArgs, OutputFormat, PageviewsArgs, StatsArgs};
    use crate::config::MemoryConfigStore;
    use crate::handlers::test_support::{config_for, context, output};
    use pretty_assertions::assert_eq;
    use umami_core::testing::{MockResponse, MockServer};
    use umami_core::ErrorKind;

    fn range(start_at: i64, end_at: i64) -> TimeRangeArgs {
        TimeRangeArgs {
            start_at: Some(start_at),
            end_at: Some(end_at),
        }
    }

    fn metrics_args(website_id: &str, metric_type: Option<&str>) -> MetricsArgs {
        MetricsArgs {
            website_id: website_id.to_string(),
            range: range(1, 2),
            metric_type: metric_type.map(str::to_string),
            limit: Some(10),
            offset: None,
            filters: FilterArgs {
                country: Some("DE".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_active_has_no_query() {
        let action = AnalyticsAction::Active(ActiveArgs {
            website_id: "w1".to_string(),
        });
        let (resource, path) = analytics_path(action).unwrap();
        assert_eq!(resource, AnalyticsResource::Active);
        assert_eq!(path, "/websites/w1/active");
    }

    #[test]
    fn test_metrics_path() {
        let (_, path) = analytics_path(AnalyticsAction::Metrics(metrics_args("w1", Some("browser"))))
            .unwrap();
        assert_eq!(
            path,
            "/websites/w1/metrics?country=DE&endAt=2&limit=10&startAt=1&type=browser"
        );

        let (_, path) =
            analytics_path(AnalyticsAction::MetricsExpanded(metrics_args("w1", Some("url"))))
                .unwrap();
        assert!(path.starts_with("/websites/w1/metrics/expanded?"));
    }

    #[test]
    fn test_metrics_requires_type() {
        let err = analytics_path(AnalyticsAction::Metrics(metrics_args("w1", None))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "type is required");

        let err = analytics_path(AnalyticsAction::MetricsExpanded(metrics_args("w1", Some(""))))
            .unwrap_err();
        assert_eq!(err.to_string(), "type is required");
    }

    #[test]
    fn test_single_bound_is_not_defaulted() {
        let action = AnalyticsAction::Stats(StatsArgs {
            website_id: "w1".to_string(),
            range: TimeRangeArgs {
                start_at: Some(5),
                end_at: None,
            },
            filters: FilterArgs::default(),
        });
        let (_, path) = analytics_path(action).unwrap();
        assert_eq!(path, "/websites/w1/stats?startAt=5");
    }

    #[test]
    fn test_website_id_checked_before_type() {
        let err = analytics_path(AnalyticsAction::MetricsExpanded(metrics_args("", None)))
            .unwrap_err();
        assert_eq!(err.to_string(), "website-id is required");

        let err = analytics_path(AnalyticsAction::Stats(StatsArgs {
            website_id: String::new(),
            range: TimeRangeArgs::default(),
            filters: FilterArgs::default(),
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "website-id is required");
    }

    #[test]
    fn test_pageviews_compare() {
        let action = AnalyticsAction::Pageviews(PageviewsArgs {
            website_id: "w1".to_string(),
            range: range(1, 2),
            unit: Some("day".to_string()),
            timezone: Some("UTC".to_string()),
            compare: Some("prev".to_string()),
            filters: FilterArgs::default(),
        });
        let (_, path) = analytics_path(action).unwrap();
        assert_eq!(
            path,
            "/websites/w1/pageviews?compare=prev&endAt=2&startAt=1&timezone=UTC&unit=day"
        );
    }

    #[test]
    fn test_unset_range_defaults_to_last_day() {
        let action = AnalyticsAction::Stats(StatsArgs {
            website_id: "w1".to_string(),
            range: TimeRangeArgs::default(),
            filters: FilterArgs::default(),
        });
        let (_, path) = analytics_path(action).unwrap();
        let (_, encoded) = path.split_once('?').unwrap();
        let query = QueryString::parse(encoded);

        let start: i64 = query.get("startAt").unwrap().parse().unwrap();
        let end: i64 = query.get("endAt").unwrap().parse().unwrap();
        assert_eq!(end - start, umami_core::query::DEFAULT_LOOKBACK_MS);
    }

    #[tokio::test]
    async fn test_stats_prints_server_json() {
        let server = MockServer::respond_with(MockResponse::json(
            200,
            r#"{"pageviews":{"value":5}}"#,
        ))
        .await
        .unwrap();
        let store = MemoryConfigStore::default();
        let ctx = context(&store, config_for(&server, "abc"));
        let (mut out, buffer) = output(OutputFormat::Json);

        let action = AnalyticsAction::Stats(StatsArgs {
            website_id: "w1".to_string(),
            range: range(10, 20),
            filters: FilterArgs::default(),
        });
        handle_analytics(action, &ctx, &mut out).await.unwrap();

        assert_eq!(buffer.contents(), "{\"pageviews\":{\"value\":5}}\n");
        let request = &server.requests()[0];
        assert_eq!(request.target, "/api/websites/w1/stats?endAt=20&startAt=10");
        assert_eq!(request.header("authorization"), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn test_missing_type_sends_nothing() {
        let server = MockServer::respond_with(MockResponse::json(200, "{}")).await.unwrap();
        let store = MemoryConfigStore::default();
        let ctx = context(&store, config_for(&server, "abc"));
        let (mut out, _) = output(OutputFormat::Json);

        let err = handle_analytics(AnalyticsAction::Metrics(metrics_args("w1", None)), &ctx, &mut out)
            .await
            .unwrap_err();
        assert!(err.should_show_help());
        assert_eq!(server.connection_count(), 0);
    }
}
