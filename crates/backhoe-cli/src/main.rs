//! Backhoe CLI: static export of the rental site.
//!
//! `backhoe export` writes the home page, the service-area directory and a
//! set of map snapshots to a directory that any static host can serve.
//! `backhoe render-map` writes a single map SVG. Dialogs need the server,
//! so exported pages carry only their closed state.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail, ensure};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use backhoe_core::content::LOCATIONS;
use backhoe_core::map::{MapRenderer, MapView, placeholder_svg};
use backhoe_core::service_areas::{ServiceAreaDirectory, is_valid_slug};
use backhoe_core::site::{PageContext, STYLESHEET, render_directory, render_home, render_state};
use backhoe_core::topology::{StateAtlas, TopologySource};
use backhoe_core::viewport::Viewport;

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ── CLI definition ───────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "backhoe",
    version,
    about = "Backhoe CLI: static export for the equipment rental site",
    long_about = None,
)]
struct Cli {
    /// Log filter for diagnostics on stderr.
    #[arg(long, env = "BACKHOE_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the site as static files.
    Export {
        /// Output directory (created if missing).
        #[arg(long, short)]
        out: PathBuf,

        /// Map widths to snapshot, comma separated.
        #[arg(
            long,
            value_delimiter = ',',
            default_values_t = [375u32, 768, 1280],
            value_parser = clap::value_parser!(u32).range(240..=3840),
        )]
        widths: Vec<u32>,

        /// States-to-cities JSON to use instead of the bundled data.
        #[arg(long, env = "BACKHOE_SERVICE_AREAS_FILE")]
        service_areas: Option<PathBuf>,

        #[command(flatten)]
        topology: TopologyArgs,
    },

    /// Render the service map to an SVG file.
    RenderMap {
        /// Map width in pixels.
        #[arg(
            long,
            default_value_t = 1280,
            value_parser = clap::value_parser!(u32).range(240..=3840),
        )]
        width: u32,

        /// Location id to draw in its hovered state (e.g. `houston`).
        #[arg(long)]
        active: Option<String>,

        /// Output file.
        #[arg(long, short)]
        out: PathBuf,

        #[command(flatten)]
        topology: TopologyArgs,
    },
}

#[derive(Args)]
struct TopologyArgs {
    /// Local topology file.
    #[arg(long, env = "BACKHOE_TOPOLOGY_FILE", conflicts_with = "topology_url")]
    topology_file: Option<PathBuf>,

    /// Topology document URL.
    #[arg(long, env = "BACKHOE_TOPOLOGY_URL")]
    topology_url: Option<String>,
}

impl TopologyArgs {
    fn source(self) -> TopologySource {
        match (self.topology_file, self.topology_url) {
            (Some(path), _) => TopologySource::File(path),
            (None, Some(url)) => TopologySource::Url(url),
            (None, None) => TopologySource::default(),
        }
    }
}

// ── Output helpers ───────────────────────────────────────────────────

fn header(icon: &str, title: &str) {
    println!("{BOLD}{CYAN}{icon} {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<20}{RESET} {WHITE}{value}{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

fn warning(msg: &str) {
    println!("{YELLOW}{BOLD}⚠{RESET} {YELLOW}{msg}{RESET}");
}

// ── Entry point ──────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

async fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Export {
            out,
            widths,
            service_areas,
            topology,
        } => cmd_export(&out, &widths, service_areas.as_deref(), &topology.source()).await,
        Commands::RenderMap {
            width,
            active,
            out,
            topology,
        } => cmd_render_map(width, active.as_deref(), &out, &topology.source()).await,
    }
}

// ── Commands ─────────────────────────────────────────────────────────

async fn cmd_export(
    out: &Path,
    widths: &[u32],
    service_areas: Option<&Path>,
    source: &TopologySource,
) -> Result<()> {
    let Some(&first) = widths.first() else {
        bail!("at least one map width is required");
    };

    header("▸", "Static export");
    kv_line("Output", &out.display().to_string());
    kv_line("Topology", &source.to_string());

    let directory = match service_areas {
        Some(path) => ServiceAreaDirectory::from_file(path)
            .await
            .context("failed to load service areas")?,
        None => ServiceAreaDirectory::bundled().context("bundled service areas are invalid")?,
    };

    let atlas = match source.load(&reqwest::Client::new()).await {
        Ok(atlas) => Some(Arc::new(atlas)),
        Err(e) => {
            warn!(source = %source, error = %e, "topology load failed");
            warning(&format!("Topology unavailable ({e}); the map is exported as its placeholder"));
            None
        }
    };

    let snapshots = map_snapshots(atlas, first, widths);
    for (width, svg) in &snapshots {
        write_file(&out.join(format!("map-{width}.svg")), svg).await?;
    }

    let ctx = PageContext::new(chrono::Utc::now().year());
    let widest = snapshots
        .iter()
        .max_by_key(|(width, _)| *width)
        .map(|(_, svg)| svg.as_str())
        .unwrap_or_default();

    write_file(&out.join("index.html"), &render_home(&ctx, widest)).await?;
    write_file(&out.join("static").join("site.css"), STYLESHEET).await?;
    write_file(
        &out.join("service-areas").join("index.html"),
        &render_directory(&ctx, &directory),
    )
    .await?;
    for area in directory.iter() {
        ensure!(is_valid_slug(&area.slug), "refusing to write state page for slug '{}'", area.slug);
        write_file(
            &out.join("service-areas").join(&area.slug).join("index.html"),
            &render_state(&ctx, area),
        )
        .await?;
    }

    info!(out = %out.display(), states = directory.len(), maps = snapshots.len(), "export finished");
    println!();
    kv_line("Pages", &(directory.len() + 2).to_string());
    kv_line("Map snapshots", &snapshots.len().to_string());
    success(&format!("Site exported to {}", out.display()));
    Ok(())
}

async fn cmd_render_map(
    width: u32,
    active: Option<&str>,
    out: &Path,
    source: &TopologySource,
) -> Result<()> {
    let atlas = source
        .load(&reqwest::Client::new())
        .await
        .with_context(|| format!("failed to load topology from {source}"))?;

    let renderer = MapRenderer::new(Arc::new(atlas), LOCATIONS.to_vec(), width);
    let hover = match active {
        Some(id) => Some(
            renderer
                .hover(id)
                .with_context(|| format!("no visible location '{id}'"))?,
        ),
        None => None,
    };

    write_file(out, &renderer.render_svg(hover.as_ref())).await?;
    success(&format!("Map ({width}px) written to {}", out.display()));
    Ok(())
}

/// Render one SVG per width by resizing a single mounted view.
fn map_snapshots(atlas: Option<Arc<StateAtlas>>, first: u32, widths: &[u32]) -> Vec<(u32, String)> {
    let Some(atlas) = atlas else {
        return widths.iter().map(|&w| (w, placeholder_svg(w))).collect();
    };

    let viewport = Viewport::new(first);
    let view = MapView::mount(&viewport, atlas, LOCATIONS.to_vec());
    widths
        .iter()
        .map(|&width| {
            if width != viewport.width() {
                viewport.resize(width);
            }
            (width, view.render_svg(None))
        })
        .collect()
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}
