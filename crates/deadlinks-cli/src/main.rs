use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use deadlinks_client::ReqwestProbe;
use deadlinks_core::CheckService;
use deadlinks_core::options::{CheckOptions, Settings};
use deadlinks_core::traits::NullStore;
use deadlinks_db::SqliteStore;
use deadlinks_html::LolHtmlEditor;

#[derive(Parser)]
#[command(
    name = "deadlinks",
    version,
    about = "Dead-link detection and annotation for rendered HTML"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the links in an HTML document and annotate the dead ones
    Check {
        /// Input HTML file ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// The site's own base URL; links under it are never checked
        #[arg(long, env = "DEADLINKS_SITEURL", default_value = "")]
        site_url: String,

        /// CSS class to append to flagged anchors (repeatable)
        #[arg(long = "class")]
        classes: Vec<String>,

        /// Insert a status badge after each flagged anchor
        #[arg(long, default_value_t = false)]
        labels: bool,

        /// Do not rewrite flagged hrefs to the web archive
        #[arg(long, default_value_t = false)]
        no_archive: bool,

        /// Request timeout budget in milliseconds
        #[arg(long, default_value_t = 1000)]
        timeout_ms: u64,

        /// Treat timeouts like connection errors
        #[arg(long, default_value_t = false)]
        timeout_is_error: bool,

        /// Persist per-URL outcomes in this SQLite cache file
        #[arg(long, env = "DEADLINKS_CACHE")]
        cache_file: Option<PathBuf>,
    },

    /// Show the cached outcome for a URL
    Lookup {
        /// Target URL
        #[arg(short, long)]
        url: String,

        /// SQLite cache file to read
        #[arg(long, env = "DEADLINKS_CACHE")]
        cache_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("deadlinks=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            input,
            output,
            site_url,
            classes,
            labels,
            no_archive,
            timeout_ms,
            timeout_is_error,
            cache_file,
        } => {
            let opts = CheckOptions {
                archive: !no_archive,
                classes,
                labels,
                timeout_duration_ms: timeout_ms,
                timeout_is_error,
                cache_file,
            };
            cmd_check(&input, output.as_deref(), Settings::enabled(site_url, opts)).await?;
        }
        Commands::Lookup { url, cache_file } => {
            cmd_lookup(&url, &cache_file).await?;
        }
    }

    Ok(())
}

async fn cmd_check(input: &str, output: Option<&Path>, settings: Settings) -> Result<()> {
    let html = read_input(input)?;

    let probe = ReqwestProbe::new().context("Failed to create HTTP client")?;
    let editor = LolHtmlEditor::new();

    tracing::info!("Checking links in {}", input);

    let rewritten = match settings.opts.cache_file.clone() {
        Some(path) => {
            let service = CheckService::with_store(probe, editor, SqliteStore::new(path));
            service.process(&html, &settings).await
        }
        None => {
            let service = CheckService::<_, _, NullStore>::new(probe, editor);
            service.process(&html, &settings).await
        }
    }
    .map_err(|e| anyhow::anyhow!(e))?;

    match output {
        Some(path) => std::fs::write(path, rewritten)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{rewritten}"),
    }

    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("Failed to read stdin")?;
        Ok(html)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}

async fn cmd_lookup(url: &str, cache_file: &Path) -> Result<()> {
    let store = SqliteStore::new(cache_file);
    store.initialize().await.map_err(|e| anyhow::anyhow!(e))?;

    match store.load(url).await.map_err(|e| anyhow::anyhow!(e))? {
        Some(outcome) => println!(
            "{url}: availability={:?} success={:?} code={}",
            outcome.availability,
            outcome.success,
            outcome
                .code
                .map_or_else(|| "-".to_string(), |code| code.to_string()),
        ),
        None => println!("No cached outcome for {url}"),
    }

    Ok(())
}
