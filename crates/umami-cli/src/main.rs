//! Umami CLI - Command-line client for the Umami analytics API
//!
//! This is the main entry point for the `umami` binary, providing commands
//! for logging in, listing teams and websites, and querying per-website
//! analytics.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{AuthAction, Cli, Commands, TeamsAction, WebsitesAction};
use colored::control;
use config::{Config, FileConfigStore};
use error::{Error, Result};
use handlers::Context;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;
use umami_core::Diagnostics;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    // Initialize logging
    let guard = match init_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    // Dropping the command future on Ctrl-C aborts any in-flight request
    let result = tokio::select! {
        result = run(cli) => result,
        Ok(()) = tokio::signal::ctrl_c() => Err(Error::Interrupted),
    };

    let code = match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            e.exit_code()
        }
    };

    // process::exit skips destructors; flush the log file first
    drop(guard);
    process::exit(code);
}

/// Main application logic
#[instrument(
    skip(cli),
    fields(
        command = command_name(&cli.command),
        request_id = logging::current_request_id().unwrap_or("unknown"),
    )
)]
async fn run(cli: Cli) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let mut output = OutputWriter::new(cli.output_format(), cli.use_color(), cli.quiet);
    let diagnostics = cli.diagnostics_config();
    let load = || -> Result<(FileConfigStore, Config)> {
        let _config_timer = Timer::new("config_loading");
        tracing::info!("Loading configuration");
        let store = FileConfigStore::open(cli.config.as_deref())?;
        let config = Config::load(&store, cli.endpoint.as_deref(), cli.token.as_deref())?;
        Ok((store, config))
    };

    tracing::info!(
        command = command_name(&cli.command),
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    // Only API commands need a resolved endpoint
    match cli.command {
        Commands::Version => handlers::handle_version(&mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
        Commands::Auth(args) => {
            let (store, config) = load()?;
            let mut ctx = Context::new(config, &store, Diagnostics::new(diagnostics));
            match args.action {
                AuthAction::Login(args) => handlers::handle_login(args, &mut ctx, &mut output).await,
                AuthAction::Verify => handlers::handle_verify(&ctx, &mut output).await,
            }
        }
        Commands::Analytics(args) => {
            let (store, config) = load()?;
            let ctx = Context::new(config, &store, Diagnostics::new(diagnostics));
            handlers::handle_analytics(args.action, &ctx, &mut output).await
        }
        Commands::Teams(args) => {
            let (store, config) = load()?;
            let ctx = Context::new(config, &store, Diagnostics::new(diagnostics));
            match args.action {
                TeamsAction::List => handlers::handle_teams_list(&ctx, &mut output).await,
                TeamsAction::Websites(args) => {
                    handlers::handle_team_websites(args, &ctx, &mut output).await
                }
            }
        }
        Commands::Websites(args) => {
            let (store, config) = load()?;
            let ctx = Context::new(config, &store, Diagnostics::new(diagnostics));
            match args.action {
                WebsitesAction::List => handlers::handle_websites_list(&ctx, &mut output).await,
            }
        }
    }
}

/// Stable command label for logs; never includes argument values
fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Auth(args) => match args.action {
            AuthAction::Login(_) => "auth login",
            AuthAction::Verify => "auth verify",
        },
        Commands::Analytics(_) => "analytics",
        Commands::Teams(args) => match args.action {
            TeamsAction::List => "teams list",
            TeamsAction::Websites(_) => "teams websites",
        },
        Commands::Websites(_) => "websites list",
        Commands::Version => "version",
        Commands::Completions(_) => "completions",
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    // Create logging configuration from CLI args and environment
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());

    // Apply environment overrides
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_command_names_hide_arguments() {
        let cli = Cli::parse_from([
            "umami", "auth", "login", "--username", "bob", "--password", "hunter22",
        ]);
        assert_eq!(command_name(&cli.command), "auth login");

        let cli = Cli::parse_from(["umami", "teams", "websites", "t1"]);
        assert_eq!(command_name(&cli.command), "teams websites");

        let cli = Cli::parse_from(["umami", "version"]);
        assert_eq!(command_name(&cli.command), "version");
    }

    #[tokio::test]
    async fn test_version_needs_no_endpoint() {
        let cli = Cli::parse_from(["umami", "--config", "/nonexistent/umami.json", "version"]);
        assert!(run(cli).await.is_ok());
    }

    #[tokio::test]
    async fn test_api_command_requires_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cli = Cli::parse_from([
            "umami",
            "--config",
            path.to_str().unwrap(),
            "--endpoint",
            "",
            "teams",
            "list",
        ]);

        let err = run(cli).await.unwrap_err();
        assert_eq!(err.to_string(), "missing endpoint: set --endpoint or UMAMI_URL");
        assert_eq!(err.exit_code(), 5);
    }
}
