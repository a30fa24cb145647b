//! Website command handlers

use super::Context;
use crate::error::Result;
use crate::output::OutputWriter;
use tracing::instrument;
use umami_core::api::WEBSITES_PATH;
use umami_core::types::{DataList, Website};
use umami_core::{ApiRequest, Diagnostics, Error as CoreError, Transport};

/// Diagnostic body excerpts are cut at this many bytes
const DEBUG_BODY_LIMIT: usize = 2048;

/// Handle `websites list`
///
/// With diagnostics enabled the raw response is fetched first so its body
/// can be reported before decoding.
#[instrument(skip_all)]
pub async fn handle_websites_list(ctx: &Context<'_>, output: &mut OutputWriter) -> Result<()> {
    let transport = ctx.transport()?;
    let request = ApiRequest::get(WEBSITES_PATH);

    let websites = if transport.diagnostics().is_enabled() {
        output
            .track("Fetching websites...", fetch_with_diagnostics(&transport, &request, &ctx.config.endpoint))
            .await?
    } else {
        output
            .track("Fetching websites...", transport.execute::<DataList<Website>>(&request))
            .await?
            .data
    };

    output.listing(
        &websites.data,
        |site| vec![site.id.clone(), site.name.clone(), site.domain.clone()],
        "No websites found.",
    )
}

async fn fetch_with_diagnostics(
    transport: &Transport,
    request: &ApiRequest,
    endpoint: &str,
) -> umami_core::Result<DataList<Website>> {
    let diagnostics = transport.diagnostics();
    diagnostics.emit(format_args!(
        "websites request method=GET path={} endpoint={}",
        WEBSITES_PATH, endpoint
    ));

    let raw = match transport.execute_raw(request).await {
        Ok(raw) => raw,
        Err(e) => {
            diagnostics.emit(format_args!(
                "websites response status={} error={}",
                e.status().unwrap_or(0),
                e
            ));
            emit_body(diagnostics, e.body().unwrap_or_default());
            return Err(e);
        }
    };

    diagnostics.emit(format_args!("websites response status={}", raw.status));
    emit_body(diagnostics, &raw.text());

    serde_json::from_slice(&raw.body).map_err(|e| {
        CoreError::decode(format!("failed to parse websites response: {}", e), Some(e))
    })
}

fn emit_body(diagnostics: &Diagnostics, body: &str) {
    if !body.is_empty() {
        diagnostics.emit(format_args!("websites response body={}", truncate_body(body)));
    }
}

/// Cut `body` to at most [`DEBUG_BODY_LIMIT`] bytes on a char boundary
fn truncate_body(body: &str) -> String {
    if body.len() <= DEBUG_BODY_LIMIT {
        return body.to_string();
    }
    let mut end = DEBUG_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &body[..end])
}
