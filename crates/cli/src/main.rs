mod echo;

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use inkdrop_core::{
    BrowserlessFetcher, CleanArticle, OutputFormat, PageFetcher, Pipeline, RawPage, Settings, SmoothieReadability,
    TextConfig, fetch_file, fetch_stdin, is_target_platform,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use echo::{
    format_size, print_article_details, print_banner, print_detail, print_error, print_info, print_refresh_instructions,
    print_step, print_success, print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the cleaned article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Html,
    Text,
    Markdown,
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: html, text, markdown, json", s)),
        }
    }
}

/// Turn a social thread into a clean, e-ink friendly article
#[derive(Parser, Debug)]
#[command(name = "inkdrop")]
#[command(author = "Ink Drop Contributors")]
#[command(version)]
#[command(about = "Turn social threads into clean e-ink articles", long_about = None)]
struct Args {
    /// Thread URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (html, text, markdown, json)
    #[arg(short, long, default_value = "html", value_name = "FORMAT")]
    format: Format,

    /// Wrap plain text output at this many columns (0 = no wrapping)
    #[arg(long, default_value = "0", value_name = "COLS")]
    width: usize,

    /// Overall navigation timeout in seconds
    #[arg(long, value_name = "SECS")]
    nav_timeout: Option<u64>,

    /// How long to wait for thread content to appear, in seconds
    #[arg(long, value_name = "SECS")]
    content_timeout: Option<u64>,

    /// Extra delay after load for client-side rendering, in milliseconds
    #[arg(long, value_name = "MS")]
    settle_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn init_tracing(verbose: bool) {
    if verbose {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("inkdrop_core=debug"));
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }
}

async fn fetch_page(args: &Args) -> anyhow::Result<RawPage> {
    if !is_target_platform(&args.input) {
        bail!("URL must be a Twitter/X link: {}", args.input);
    }

    let mut settings = Settings::from_env().context("Failed to load settings")?;
    if let Some(secs) = args.nav_timeout {
        settings.navigation_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = args.content_timeout {
        settings.content_timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = args.settle_ms {
        settings.settle_delay = Duration::from_millis(ms);
    }

    let credentials = settings.credential_cache().context("Session credentials are not configured")?;
    let fetcher = BrowserlessFetcher::new(settings.fetch_config(), credentials)?;

    if args.verbose {
        print_detail("Browser", &settings.browser_url);
    }

    Ok(fetcher.fetch(&args.input).await?)
}

async fn read_input(args: &Args) -> anyhow::Result<RawPage> {
    if is_url(&args.input) {
        return fetch_page(args).await;
    }

    let html = if args.input == "-" {
        fetch_stdin().context("Failed to read from stdin")?
    } else {
        fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };
    Ok(RawPage::from_html(html)?)
}

fn render(article: &CleanArticle, args: &Args) -> anyhow::Result<String> {
    let output = match args.format {
        Format::Html => article.to_format(OutputFormat::Html)?,
        Format::Text => article.to_text(&TextConfig { line_width: args.width }),
        Format::Markdown => article.to_format(OutputFormat::Markdown)?,
        Format::Json => article.to_format(OutputFormat::Json)?,
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
        let source = if is_url(&args.input) {
            format!("Fetching {}", args.input.bright_white().underline())
        } else if args.input == "-" {
            "Reading from stdin".to_string()
        } else {
            format!("Reading from file {}", args.input.bright_white())
        };
        print_step(1, 3, &source);
    }

    let page = match read_input(&args).await {
        Ok(page) => page,
        Err(e) => {
            if e.downcast_ref::<inkdrop_core::InkDropError>().is_some_and(|e| e.is_auth_expired()) {
                print_error("The page is a sign-in wall");
                print_refresh_instructions();
            }
            return Err(e);
        }
    };

    if args.verbose {
        print_detail("Size", &format_size(page.html.len()));
        print_detail("Page title", &page.title);
        eprintln!();
        print_step(2, 3, "Extracting thread content");
    }

    let url = if is_url(&args.input) { args.input.as_str() } else { "" };
    let article = Pipeline::offline(SmoothieReadability::default())
        .process_page(page, url)
        .context("Failed to extract content")?;

    if article.is_empty() {
        print_warning("No paragraphs survived filtering; the article is empty");
    }

    if args.verbose {
        print_article_details(&article);
        print_step(3, 3, "Writing output");
        print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    let output = render(&article, &args)?;

    match &args.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}
