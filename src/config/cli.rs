use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

use crate::domain::types::SortOrder;

/// Command-line arguments for the quire binary.
#[derive(Debug, Parser)]
#[command(name = "quire", version, about = "Browse the tutorial blog's post list")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "QUIRE_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: SettingsOverrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Load the post list once and print the filtered, sorted result.
    List(ListArgs),
    /// Fetch a single post by id and print its content.
    Show(ShowArgs),
    /// Type search text line by line and watch the list follow it.
    Browse,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ListArgs {
    /// Case-insensitive text matched against titles and summaries.
    #[arg(long, short = 's', value_name = "TEXT")]
    pub search: Option<String>,

    /// Sort order: default, asc or desc.
    #[arg(long, value_name = "ORDER", default_value_t = SortOrder::Default)]
    pub sort: SortOrder,

    /// Print posts as JSON.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Post id as it appears in `/posts/{id}`.
    #[arg(value_name = "ID")]
    pub id: String,

    /// Print the post as JSON.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(Debug, Args, Default, Clone)]
pub struct SettingsOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Override the artificial delay of the post list fetch.
    #[arg(long = "provider-list-delay-ms", value_name = "MILLIS", global = true)]
    pub provider_list_delay_ms: Option<u64>,

    /// Override the artificial delay of the single-post fetch.
    #[arg(long = "provider-detail-delay-ms", value_name = "MILLIS", global = true)]
    pub provider_detail_delay_ms: Option<u64>,

    /// Override the search debounce quiet period.
    #[arg(long = "search-debounce-ms", value_name = "MILLIS", global = true)]
    pub search_debounce_ms: Option<u64>,

    /// Override the refetch policy applied on view entry (always|once).
    #[arg(long = "store-refetch", value_name = "POLICY", global = true)]
    pub store_refetch: Option<String>,

    /// Override the minimum time the post page shows its loading state.
    #[arg(long = "detail-min-display-ms", value_name = "MILLIS", global = true)]
    pub detail_min_display_ms: Option<u64>,
}
