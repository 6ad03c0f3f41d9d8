//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::client::FeedSelector;

/// Render recent USGS earthquakes as an interactive Leaflet map.
#[derive(Parser, Debug)]
#[command(name = "quakemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the feed once and write the map as an HTML file
    Render(RenderArgs),

    /// Serve the map over HTTP, re-rendering per request
    Serve(ServeArgs),
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Feed to fetch (<level>_<span>, e.g. all_week, 2.5_day)
    #[arg(long, default_value = "all_week", value_parser = parse_feed)]
    pub feed: FeedSelector,

    /// Mapbox access token (falls back to MAPBOX_ACCESS_TOKEN)
    #[arg(long)]
    pub access_token: Option<String>,

    /// Minimum magnitude to include
    #[arg(long)]
    pub min_magnitude: Option<f64>,

    /// Output file ("-" for stdout)
    #[arg(long, short = 'o', default_value = "quakemap.html")]
    pub output: PathBuf,
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short = 'p', default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Feed to fetch (<level>_<span>, e.g. all_week, 2.5_day)
    #[arg(long, default_value = "all_week", value_parser = parse_feed)]
    pub feed: FeedSelector,

    /// Mapbox access token (falls back to MAPBOX_ACCESS_TOKEN)
    #[arg(long)]
    pub access_token: Option<String>,

    /// Minimum magnitude to include
    #[arg(long)]
    pub min_magnitude: Option<f64>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

/// Parse a feed selector from string.
fn parse_feed(s: &str) -> Result<FeedSelector, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_defaults() {
        let cli = Cli::parse_from(["quakemap", "render"]);
        let Command::Render(args) = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(args.feed, FeedSelector::ALL_WEEK);
        assert_eq!(args.output, PathBuf::from("quakemap.html"));
        assert!(args.min_magnitude.is_none());
    }

    #[test]
    fn test_serve_args() {
        let cli = Cli::parse_from([
            "quakemap",
            "serve",
            "--port",
            "9000",
            "--feed",
            "2.5_day",
            "--min-magnitude",
            "1.5",
        ]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.port, 9000);
        assert_eq!(args.feed.path_segment(), "2.5_day");
        assert_eq!(args.min_magnitude, Some(1.5));
    }
}
