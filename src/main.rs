//! quakemap - Render recent USGS earthquakes as an interactive Leaflet map.
//!
//! Fetches a USGS summary GeoJSON feed once, maps each event to a styled
//! circle marker, and composes a Leaflet page with switchable base layers
//! and a magnitude legend.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

mod cli;
mod client;
mod encode;
mod errors;
mod map;
mod marker;
mod models;
mod server;

use cli::{Cli, Command};
use client::FeedClient;
use map::MapView;
use models::Feature;

/// Environment variable holding the tile-provider access token.
const TOKEN_ENV_VAR: &str = "MAPBOX_ACCESS_TOKEN";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Render(args) => cmd_render(args),
        Command::Serve(args) => cmd_serve(args),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Resolve the tile-provider access token from the CLI flag or environment.
fn resolve_access_token(arg: Option<String>) -> Result<String> {
    arg.or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
        .with_context(|| format!("no access token (use --access-token or set {TOKEN_ENV_VAR})"))
}

/// Execute the `render` command - one-shot fetch and HTML output.
fn cmd_render(args: cli::RenderArgs) -> Result<()> {
    let access_token = resolve_access_token(args.access_token)?;

    let client = FeedClient::new().context("failed to create feed client")?;
    let feed = client
        .fetch_feed(args.feed)
        .context("failed to fetch earthquake feed")?;

    if let Some(generated) = feed.metadata.generated_at() {
        debug!("feed generated at {}", generated.to_rfc3339());
    }
    if let Some(latest) = feed.features.first().and_then(Feature::time) {
        debug!("most recent event at {}", latest.to_rfc3339());
    }

    let mut features = feed.features;
    if let Some(min) = args.min_magnitude {
        features.retain(|f| f.properties.mag.is_some_and(|m| m >= min));
    }

    let markers = marker::overlay(&features);
    let view = MapView::compose(markers, &access_token, &feed.metadata.title);
    let html = view.render_html();

    if args.output.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(html.as_bytes())?;
    } else {
        std::fs::write(&args.output, &html)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
        info!(
            "wrote {} markers to {}",
            view.marker_count(),
            args.output.display()
        );
    }

    Ok(())
}

/// Execute the `serve` command - start the web server.
fn cmd_serve(args: cli::ServeArgs) -> Result<()> {
    let access_token = resolve_access_token(args.access_token)?;

    let config = server::ServerConfig {
        port: args.port,
        host: args.host.clone(),
        feed: args.feed,
        access_token,
        min_magnitude: args.min_magnitude,
    };

    let url = format!("http://{}:{}", args.host, args.port);
    println!("quakemap serving {} at {}", args.feed, url);
    println!("Press Ctrl+C to stop");

    // Open browser if requested (using xdg-open/open command)
    if args.open {
        #[cfg(target_os = "linux")]
        let _ = std::process::Command::new("xdg-open").arg(&url).spawn();
        #[cfg(target_os = "macos")]
        let _ = std::process::Command::new("open").arg(&url).spawn();
        #[cfg(target_os = "windows")]
        let _ = std::process::Command::new("cmd").args(["/c", "start", &url]).spawn();
    }

    // Run the async server on tokio runtime
    tokio::runtime::Runtime::new()
        .context("failed to create tokio runtime")?
        .block_on(server::run_server(config))
}
