//! Auth command handlers

use super::Context;
use crate::cli::LoginArgs;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use chrono::{Local, SecondsFormat};
use serde_json::Value;
use tracing::{info, instrument};
use umami_core::api::{LOGIN_PATH, VERIFY_PATH};
use umami_core::types::{LoginRequest, LoginResponse};
use umami_core::{ApiRequest, Error as CoreError};

/// Handle `auth login`
///
/// Exchanges username and password for a token and persists it to the
/// config store.
#[instrument(skip_all)]
pub async fn handle_login(
    args: LoginArgs,
    ctx: &mut Context<'_>,
    output: &mut OutputWriter,
) -> Result<()> {
    let username = args.username.unwrap_or_default();
    let password = args.password.unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        return Err(CoreError::validation("username", "username and password are required").into());
    }

    let _timer = Timer::with_details("auth_login", &username);
    let transport = ctx.anonymous_transport()?;
    let request = ApiRequest::post(LOGIN_PATH)
        .without_auth()
        .with_json(&LoginRequest { username, password })?;

    let response = output
        .track("Logging in...", transport.execute::<LoginResponse>(&request))
        .await?;
    let login = response.data;

    ctx.config.token = login.token.clone();
    ctx.store.save(&ctx.config)?;
    info!(user_id = %login.user.id, "Token saved");

    if output.format().is_structured() {
        return output.data(&login);
    }
    output.success(&format!(
        "Logged in as {} (id {}). Token saved.",
        login.user.username, login.user.id
    ))
}

/// Handle `auth verify`
#[instrument(skip_all)]
pub async fn handle_verify(ctx: &Context<'_>, output: &mut OutputWriter) -> Result<()> {
    let transport = ctx.transport()?;
    let diagnostics = transport.diagnostics();

    diagnostics.emit(format_args!(
        "verify request method=POST path={} endpoint={}",
        VERIFY_PATH, ctx.config.endpoint
    ));
    let result = output
        .track("Verifying token...", transport.execute::<Value>(&ApiRequest::post(VERIFY_PATH)))
        .await;
    match &result {
        Ok(response) => diagnostics.emit(format_args!("verify response status={}", response.status)),
        Err(e) => diagnostics.emit(format_args!(
            "verify response status={} error={}",
            e.status().unwrap_or(0),
            e
        )),
    }
    let response = result?;

    if output.format().is_structured() {
        return output.data(&response.data);
    }
    output.success(&format!(
        "Token verified at {}.",
        Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    ))
}
