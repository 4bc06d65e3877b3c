// ABOUTME: CLI binary for Tome: suggests content selectors and scrapes chapters from URLs or saved HTML.
// ABOUTME: Prints JSON on stdout; failures print {"error": "..."} and exit with status 1.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tome::{load_heuristics_file, Client, NovelConfig, ScrapedChapter};

#[derive(Parser, Debug)]
#[command(name = "tome", version)]
#[command(about = "Suggest content selectors and scrape web-novel chapters")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// JSON file replacing the builtin heuristic tables
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Allow fetching from private/local networks
    #[arg(long, global = true)]
    allow_private_networks: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    /// User-Agent header for requests
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Print single-line JSON
    #[arg(long, global = true)]
    compact: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Propose CSS selectors for the chapter content container
    Suggest {
        /// Chapter page URL
        url: String,

        /// Read the page from this HTML file instead of fetching it
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Extract title, number, prose and pagination links from a chapter
    Scrape {
        /// Chapter page URL (defaults to the novel's URL with --novel)
        url: Option<String>,

        /// CSS selector of the content container
        #[arg(long, required_unless_present = "novel", conflicts_with = "novel")]
        selector: Option<String>,

        /// Saved novel record (JSON) providing the selector
        #[arg(long)]
        novel: Option<PathBuf>,

        /// Read the page from this HTML file instead of fetching it
        #[arg(long)]
        html: Option<PathBuf>,

        /// Output format: json (default) or markdown/md
        #[arg(short = 'f', long, default_value = "json")]
        format: String,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn init_logging() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("warn"))
        .map_err(|err| anyhow!("build log filter: {err}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

fn read_html(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).map_err(|e| anyhow!("error reading file {}: {}", path.display(), e))
}

fn build_client(global: &GlobalArgs) -> anyhow::Result<Client> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(global.timeout))
        .allow_private_networks(global.allow_private_networks);
    if let Some(user_agent) = &global.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }
    if let Some(path) = &global.rules {
        builder = builder.heuristics(Arc::new(load_heuristics_file(path)?));
    }
    Ok(builder.build())
}

fn render_chapter(chapter: &ScrapedChapter, format: &str, compact: bool) -> anyhow::Result<String> {
    match format.to_lowercase().as_str() {
        "json" => to_json(chapter, compact),
        "markdown" | "md" => Ok(chapter.format_markdown()),
        other => bail!("unknown format '{}': expected json or markdown", other),
    }
}

async fn run(cli: &Cli) -> anyhow::Result<String> {
    let client = build_client(&cli.global)?;
    let compact = cli.global.compact;

    match &cli.command {
        Command::Suggest { url, html } => {
            let selectors = match html {
                Some(path) => client.suggest_html(&read_html(path)?, url)?,
                None => client.suggest(url).await?,
            };
            to_json(&selectors, compact)
        }
        Command::Scrape {
            url,
            selector,
            novel,
            html,
            format,
        } => {
            let novel = novel.as_deref().map(NovelConfig::load).transpose()?;
            let selector = match (selector, &novel) {
                (Some(selector), _) => selector.clone(),
                (None, Some(novel)) => novel.selector.clone(),
                (None, None) => bail!("either --selector or --novel is required"),
            };
            let url = match (url, &novel) {
                (Some(url), _) => url.clone(),
                (None, Some(novel)) if !novel.url.trim().is_empty() => novel.url.clone(),
                _ => bail!("a chapter URL is required"),
            };

            let chapter = match html {
                Some(path) => client.scrape_html(&read_html(path)?, &url, &selector)?,
                None => client.scrape(&url, &selector).await?,
            };
            render_chapter(&chapter, format, compact)
        }
    }
}

fn write_output(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{}\n", text))
            .map_err(|e| anyhow!("error writing to {}: {}", path.display(), e)),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging() {
        eprintln!("warning: {}", err);
    }

    let text = match run(&cli).await {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            let body = ErrorBody {
                error: err.to_string(),
            };
            // Errors go to stdout as JSON, never to --output.
            let text = to_json(&body, cli.global.compact)
                .unwrap_or_else(|_| r#"{"error": "internal error"}"#.to_string());
            println!("{}", text);
            return ExitCode::from(1);
        }
    };

    if let Err(err) = write_output(cli.global.output.as_deref(), &text) {
        println!("{}", serde_json::json!({ "error": err.to_string() }));
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
