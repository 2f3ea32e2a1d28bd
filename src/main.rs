use std::path::PathBuf;

use clap::Parser;

use ncpr::app::App;
use ncpr::config::Config;
use ncpr::content::SiteContent;
use ncpr::error::AppResult;
use ncpr::logging::init_tracing;

/// Browse the Neptune Claws & Paws Rescue site in the terminal.
#[derive(Debug, Parser)]
#[command(name = "ncpr", version)]
struct Cli {
    /// Page to open first, e.g. `pets` or `contact.html`.
    #[arg(long)]
    page: Option<String>,

    /// Site content file to use instead of the bundled one.
    #[arg(long)]
    content: Option<PathBuf>,

    /// Config file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    init_tracing(&config.logging)?;

    let content = match &cli.content {
        Some(path) => SiteContent::load_from_path(path)?,
        None => SiteContent::bundled()?,
    };
    tracing::info!(pages = content.pages.len(), "site content loaded");

    App::new(config, content)
        .with_start_page(cli.page)
        .run()
        .await
}
