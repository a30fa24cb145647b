//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use umami_core::{DiagnosticsConfig, FilterSet, TimeRange};

/// Umami CLI - Command-line client for the Umami analytics API
///
/// Log in, list teams and websites, and query analytics for a website.
#[derive(Parser, Debug)]
#[command(
    name = "umami",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Umami base URL (e.g. https://analytics.example.com)
    #[arg(long, global = true, env = "UMAMI_URL")]
    pub endpoint: Option<String>,

    /// API token (overrides stored config)
    #[arg(long, global = true, env = "UMAMI_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "UMAMI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output raw JSON (shorthand for --output json-pretty)
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Enable verbose logging (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print HTTP request diagnostics to stderr (also DEBUG=true)
    #[arg(long, global = true)]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate and manage tokens
    Auth(AuthArgs),

    /// Analytics operations
    Analytics(AnalyticsArgs),

    /// Team operations
    Teams(TeamsArgs),

    /// Website operations
    Websites(WebsitesArgs),

    /// Print version
    Version,

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthAction,
}

#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Login with username and password
    Login(LoginArgs),

    /// Verify stored token
    Verify,
}

/// Arguments for auth login
#[derive(Args, Debug, Default)]
pub struct LoginArgs {
    /// Umami username
    #[arg(long, env = "UMAMI_USERNAME")]
    pub username: Option<String>,

    /// Umami password
    #[arg(long, env = "UMAMI_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct TeamsArgs {
    #[command(subcommand)]
    pub action: TeamsAction,
}

#[derive(Subcommand, Debug)]
pub enum TeamsAction {
    /// List teams
    List,

    /// List websites for a team
    Websites(TeamWebsitesArgs),
}

#[derive(Args, Debug)]
pub struct TeamWebsitesArgs {
    /// Team ID
    #[arg(value_name = "TEAM_ID")]
    pub team_id: String,
}

#[derive(Args, Debug)]
pub struct WebsitesArgs {
    #[command(subcommand)]
    pub action: WebsitesAction,
}

#[derive(Subcommand, Debug)]
pub enum WebsitesAction {
    /// List websites
    List,
}

#[derive(Args, Debug)]
pub struct AnalyticsArgs {
    #[command(subcommand)]
    pub action: AnalyticsAction,
}

/// Per-website analytics queries
#[derive(Subcommand, Debug)]
pub enum AnalyticsAction {
    /// Active users
    Active(ActiveArgs),

    /// Event series
    EventsSeries(SeriesArgs),

    /// Metrics
    Metrics(MetricsArgs),

    /// Expanded metrics
    MetricsExpanded(MetricsArgs),

    /// Pageviews
    Pageviews(PageviewsArgs),

    /// Summary stats
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
pub struct ActiveArgs {
    /// Website ID
    #[arg(value_name = "WEBSITE_ID")]
    pub website_id: String,
}

/// Arguments for events-series
#[derive(Args, Debug)]
pub struct SeriesArgs {
    /// Website ID
    #[arg(value_name = "WEBSITE_ID")]
    pub website_id: String,

    #[command(flatten)]
    pub range: TimeRangeArgs,

    /// Time unit (year|month|day|hour|minute)
    #[arg(long)]
    pub unit: Option<String>,

    /// Timezone (e.g. America/Los_Angeles)
    #[arg(long)]
    pub timezone: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Arguments for metrics and metrics-expanded
#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// Website ID
    #[arg(value_name = "WEBSITE_ID")]
    pub website_id: String,

    #[command(flatten)]
    pub range: TimeRangeArgs,

    /// Metric type (path|entry|exit|title|query|referrer|channel|domain|country|region|city|browser|os|device|language|screen|event|hostname|tag|distinctId)
    #[arg(long = "type", value_name = "TYPE")]
    pub metric_type: Option<String>,

    /// Number of rows returned (default 500)
    #[arg(long)]
    pub limit: Option<i64>,

    /// Number of rows to skip (default 0)
    #[arg(long)]
    pub offset: Option<i64>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Arguments for pageviews
#[derive(Args, Debug)]
pub struct PageviewsArgs {
    /// Website ID
    #[arg(value_name = "WEBSITE_ID")]
    pub website_id: String,

    #[command(flatten)]
    pub range: TimeRangeArgs,

    /// Time unit (year|month|day|hour|minute)
    #[arg(long)]
    pub unit: Option<String>,

    /// Timezone (e.g. America/Los_Angeles)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Comparison value (prev|yoy)
    #[arg(long)]
    pub compare: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Website ID
    #[arg(value_name = "WEBSITE_ID")]
    pub website_id: String,

    #[command(flatten)]
    pub range: TimeRangeArgs,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Time range flags; both unset means the last 24 hours
#[derive(Args, Debug, Clone, Default)]
pub struct TimeRangeArgs {
    /// Start timestamp (ms since epoch)
    #[arg(long)]
    pub start_at: Option<i64>,

    /// End timestamp (ms since epoch)
    #[arg(long)]
    pub end_at: Option<i64>,
}

/// Dimension filter flags
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Filter by URL path
    #[arg(long)]
    pub path: Option<String>,
    /// Filter by referrer
    #[arg(long)]
    pub referrer: Option<String>,
    /// Filter by page title
    #[arg(long)]
    pub title: Option<String>,
    /// Filter by query parameter
    #[arg(long)]
    pub query: Option<String>,
    /// Filter by browser
    #[arg(long)]
    pub browser: Option<String>,
    /// Filter by operating system
    #[arg(long)]
    pub os: Option<String>,
    /// Filter by device
    #[arg(long)]
    pub device: Option<String>,
    /// Filter by country
    #[arg(long)]
    pub country: Option<String>,
    /// Filter by region
    #[arg(long)]
    pub region: Option<String>,
    /// Filter by city
    #[arg(long)]
    pub city: Option<String>,
    /// Filter by hostname
    #[arg(long)]
    pub hostname: Option<String>,
    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,
    /// Filter by distinct ID
    #[arg(long)]
    pub distinct_id: Option<String>,
    /// Filter by segment UUID
    #[arg(long)]
    pub segment: Option<String>,
    /// Filter by cohort UUID
    #[arg(long)]
    pub cohort: Option<String>,
}

/// Arguments for generating shell completions
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (tab-separated listings)
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }

    /// Output format after applying `--json`
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::JsonPretty
        } else {
            self.output
        }
    }

    /// Diagnostics setting from `--debug` or the `DEBUG` environment variable
    pub fn diagnostics_config(&self) -> DiagnosticsConfig {
        if self.debug {
            DiagnosticsConfig::enabled()
        } else {
            DiagnosticsConfig::from_env_value(std::env::var("DEBUG").ok().as_deref())
        }
    }
}

impl From<TimeRangeArgs> for TimeRange {
    fn from(args: TimeRangeArgs) -> Self {
        TimeRange::new(args.start_at.unwrap_or(0), args.end_at.unwrap_or(0))
    }
}

impl From<FilterArgs> for FilterSet {
    fn from(args: FilterArgs) -> Self {
        FilterSet {
            path: args.path.unwrap_or_default(),
            referrer: args.referrer.unwrap_or_default(),
            title: args.title.unwrap_or_default(),
            query: args.query.unwrap_or_default(),
            browser: args.browser.unwrap_or_default(),
            os: args.os.unwrap_or_default(),
            device: args.device.unwrap_or_default(),
            country: args.country.unwrap_or_default(),
            region: args.region.unwrap_or_default(),
            city: args.city.unwrap_or_default(),
            hostname: args.hostname.unwrap_or_default(),
            tag: args.tag.unwrap_or_default(),
            distinct_id: args.distinct_id.unwrap_or_default(),
            segment: args.segment.unwrap_or_default(),
            cohort: args.cohort.unwrap_or_default(),
        }
    }
}

impl OutputFormat {
    /// Whether results are printed as structured data
    pub fn is_structured(self) -> bool {
        self != OutputFormat::Human
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify that the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["umami", "-vv", "teams", "list"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["umami", "--quiet", "teams", "list"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_json_shorthand() {
        let cli = Cli::parse_from(["umami", "--json", "websites", "list"]);
        assert_eq!(cli.output_format(), OutputFormat::JsonPretty);

        let cli = Cli::parse_from(["umami", "-o", "yaml", "websites", "list"]);
        assert_eq!(cli.output_format(), OutputFormat::Yaml);
    }

    #[test]
    fn test_debug_flag_enables_diagnostics() {
        let cli = Cli::parse_from(["umami", "--debug", "auth", "verify"]);
        assert!(cli.diagnostics_config().debug);
    }

    #[test]
    fn test_metrics_flags() {
        let cli = Cli::parse_from([
            "umami", "analytics", "metrics", "w1", "--type", "browser", "--limit", "5",
            "--start-at", "1000", "--country", "DE", "--distinct-id", "u1",
        ]);
        let Commands::Analytics(AnalyticsArgs {
            action: AnalyticsAction::Metrics(args),
        }) = cli.command
        else {
            panic!("expected analytics metrics");
        };

        assert_eq!(args.website_id, "w1");
        assert_eq!(args.metric_type.as_deref(), Some("browser"));
        assert_eq!(args.limit, Some(5));
        assert_eq!(TimeRange::from(args.range.clone()), TimeRange::new(1000, 0));

        let filters = FilterSet::from(args.filters.clone());
        assert_eq!(filters.country, "DE");
        assert_eq!(filters.distinct_id, "u1");
        assert_eq!(filters.path, "");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "umami", "teams", "websites", "t1", "--endpoint", "https://a.example", "--token", "abc",
        ]);
        assert_eq!(cli.endpoint.as_deref(), Some("https://a.example"));
        assert_eq!(cli.token.as_deref(), Some("abc"));
    }
}
