//! Team command handlers

use super::Context;
use crate::cli::TeamWebsitesArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use tracing::instrument;
use umami_core::api::{team_websites_path, TEAMS_PATH};
use umami_core::types::{DataList, Team, Website};
use umami_core::ApiRequest;

/// Handle `teams list`
#[instrument(skip_all)]
pub async fn handle_teams_list(ctx: &Context<'_>, output: &mut OutputWriter) -> Result<()> {
    let transport = ctx.transport()?;
    let response = output
        .track(
            "Fetching teams...",
            transport.execute::<DataList<Team>>(&ApiRequest::get(TEAMS_PATH)),
        )
        .await?;

    output.listing(
        &response.data.data,
        |team| vec![team.id.clone(), team.name.clone()],
        "No teams found.",
    )
}

/// Handle `teams websites <team-id>`
#[instrument(skip(ctx, output), fields(team_id = %args.team_id))]
pub async fn handle_team_websites(
    args: TeamWebsitesArgs,
    ctx: &Context<'_>,
    output: &mut OutputWriter,
) -> Result<()> {
    let path = team_websites_path(&args.team_id)?;
    let transport = ctx.transport()?;
    let response = output
        .track(
            "Fetching websites...",
            transport.execute::<DataList<Website>>(&ApiRequest::get(path)),
        )
        .await?;

    output.listing(
        &response.data.data,
        |site| vec![site.id.clone(), site.name.clone(), site.domain.clone()],
        &format!("No websites found for team {}.", args.team_id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::config::MemoryConfigStore;
    use crate::handlers::test_support::{config_for, context, output};
    use pretty_assertions::assert_eq;
    use umami_core::testing::{MockResponse, MockServer};

    #[tokio::test]
    async fn test_teams_list_tsv() {
        let server = MockServer::respond_with(MockResponse::json(
            200,
            r#"{"data":[{"id":"t1","name":"Core"},{"id":"t2","name":"Growth"}]}"#,
        ))
        .await
        .unwrap();
        let store = MemoryConfigStore::default();
        let ctx = context(&store, config_for(&server, "abc"));
        let (mut out, buffer) = output(OutputFormat::Human);

        handle_teams_list(&ctx, &mut out).await.unwrap();

        assert_eq!(buffer.contents(), "t1\tCore\nt2\tGrowth\n");
        assert_eq!(server.requests()[0].target, "/api/teams");
    }

    #[tokio::test]
    async fn test_teams_list_empty() {
        let server = MockServer::respond_with(MockResponse::json(200, r#"{"data":[]}"#))
            .await
            .unwrap();
        let store = MemoryConfigStore::default();
        let ctx = context(&store, config_for(&server, "abc"));
        let (mut out, buffer) = output(OutputFormat::Human);

        handle_teams_list(&ctx, &mut out).await.unwrap();
        assert_eq!(buffer.contents(), "No teams found.\n");
    }

    #[tokio::test]
    async fn test_team_websites() {
        let server = MockServer::respond_with(MockResponse::json(
            200,
            r#"{"data":[{"id":"w1","name":"Blog","domain":"blog.example"}]}"#,
        ))
        .await
        .unwrap();
        let store = MemoryConfigStore::default();
        let ctx = context(&store, config_for(&server, "abc"));
        let (mut out, buffer) = output(OutputFormat::Human);

        let args = TeamWebsitesArgs {
            team_id: "t1".to_string(),
        };
        handle_team_websites(args, &ctx, &mut out).await.unwrap();

        assert_eq!(buffer.contents(), "w1\tBlog\tblog.example\n");
        assert_eq!(server.requests()[0].target, "/api/teams/t1/websites");
    }

    #[tokio::test]
    async fn test_team_websites_empty_json() {
        let server = MockServer::respond_with(MockResponse::json(200, r#"{"data":[]}"#))
            .await
            .unwrap();
        let store = MemoryConfigStore::default();
        let ctx = context(&store, config_for(&server, "abc"));

        let (mut out, buffer) = output(OutputFormat::Human);
        let args = TeamWebsitesArgs {
            team_id: "t9".to_string(),
        };
        handle_team_websites(args, &ctx, &mut out).await.unwrap();
        assert_eq!(buffer.contents(), "No websites found for team t9.\n");

        let (mut out, buffer) = output(OutputFormat::JsonPretty);
        let args = TeamWebsitesArgs {
            team_id: "t9".to_string(),
        };
        handle_team_websites(args, &ctx, &mut out).await.unwrap();
        assert_eq!(buffer.contents(), "[]\n");
    }

    #[tokio::test]
    async fn test_team_id_required() {
        let store = MemoryConfigStore::default();
        let ctx = context(
            &store,
            crate::config::Config {
                endpoint: "http://127.0.0.1:9/api".to_string(),
                token: "abc".to_string(),
            },
        );
        let (mut out, _) = output(OutputFormat::Human);
        let args = TeamWebsitesArgs {
            team_id: String::new(),
        };

        let err = handle_team_websites(args, &ctx, &mut out).await.unwrap_err();
        assert_eq!(err.to_string(), "team-id is required");
    }
}
