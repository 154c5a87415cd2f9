use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

use crate::domain::types::SortOrder;

/// Command-line arguments for the postboard binary.
#[derive(Debug, Parser)]
#[command(
    name = "postboard",
    version,
    about = "Browse, search and edit a remote post collection"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "POSTBOARD_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Interactive board reading commands from stdin (default).
    Browse,
    /// Print one page of the listing and exit.
    List(ListArgs),
    /// Print the posts matching a keyword and exit.
    Search(SearchArgs),
    /// Print the full detail of one post and exit.
    Show(ShowArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ListArgs {
    /// Page number, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: u64,

    /// Sort order: asc|desc (or oldest|newest).
    #[arg(long, default_value = "asc")]
    pub order: SortOrder,
}

#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    /// Keyword to search for.
    #[arg(value_name = "QUERY")]
    pub query: String,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Post id.
    #[arg(value_name = "ID")]
    pub id: u64,
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the remote API base URL.
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Override the request timeout.
    #[arg(long = "timeout-seconds", value_name = "SECONDS", global = true)]
    pub timeout_seconds: Option<u64>,

    /// Override the number of posts per page.
    #[arg(long = "page-size", value_name = "COUNT", global = true)]
    pub page_size: Option<u32>,

    /// Override the number of page buttons per window.
    #[arg(long = "group-size", value_name = "COUNT", global = true)]
    pub group_size: Option<u32>,

    /// Override the author id attached to created posts.
    #[arg(long = "user-id", value_name = "ID", global = true)]
    pub user_id: Option<u64>,

    /// Override the search debounce window.
    #[arg(long = "debounce-ms", value_name = "MILLIS", global = true)]
    pub debounce_ms: Option<u64>,

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
}
