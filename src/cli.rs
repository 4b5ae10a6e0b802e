use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Tournament Upset Scanner
///
/// Walks the listing of completed tournaments, reconciles player pronouns
/// from bracket data and the participant roster, and records every set where
/// a lower seed beat a higher seed across at least one seeding tier. Matching
/// results are appended to a timestamped CSV file, one line per upset.
#[derive(Parser, Debug)]
#[command(author = "Upset Scanner contributors", about, version, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Unix timestamp (seconds) to scan from. Only tournaments that started
    /// at or after this moment are considered. Defaults to the start of the
    /// current day (UTC).
    #[arg(long = "since", short = 's', help_heading = "Scan Options")]
    pub since: Option<i64>,

    /// Directory for CSV output files. Created if it doesn't exist.
    #[arg(
        long = "output-dir",
        short = 'o',
        default_value = "csv",
        help_heading = "Scan Options"
    )]
    pub output_dir: String,

    /// Update the API token in config and exit.
    #[arg(
        long = "set-api-token",
        help_heading = "Configuration",
        value_name = "TOKEN"
    )]
    pub new_api_token: Option<String>,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Enable debug mode: verbose logging mirrored to stdout in addition to
    /// the log file.
    #[arg(long = "debug", short = 'd', help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}
