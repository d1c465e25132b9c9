use crate::prelude::*;
use clap::Parser;
use std::path::PathBuf;

mod client;
mod config;
mod error;
mod prelude;
mod render;
mod search;
mod serve;
mod source;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Look up colleges, admissions, tuition and program earnings from the College Scorecard API"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// api.data.gov API key (read from --api-key-file when unset)
    #[clap(long, env = "SCORECARD_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// File holding the api.data.gov API key
    #[clap(
        long,
        env = "SCORECARD_API_KEY_FILE",
        global = true,
        default_value = "apikey.txt"
    )]
    api_key_file: PathBuf,

    /// College Scorecard schools endpoint
    #[clap(
        long,
        env = "SCORECARD_BASE_URL",
        global = true,
        default_value = scorecard_core::query::SCHOOLS_ENDPOINT
    )]
    base_url: String,

    /// Request timeout in seconds
    #[clap(long, env = "SCORECARD_TIMEOUT", global = true, default_value = "10")]
    timeout: u64,

    /// Whether to display additional information.
    #[clap(long, env = "SCORECARD_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Search schools and programs from the terminal
    Search(crate::search::SearchOptions),

    /// Serve the search form and JSON search endpoint over HTTP
    Serve(crate::serve::ServeOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Search(options) => crate::search::run(options, app.global).await,
        SubCommands::Serve(options) => crate::serve::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
