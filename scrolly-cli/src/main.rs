//! Scrolly CLI Tool
//!
//! Command-line interface for inspecting the layout and segment mapping of a
//! scroll-driven video narrative, and for simulating a scroll session.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::{load_config, CliConfig};
use scrolly_core::{resolve, NarrativeConfig, NarrativeSnapshot, Platform, SegmentCount};
use scrolly_runtime::{Element, ElementRef, NarrativeOptions, ScrollNarrative, Viewport};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

#[derive(Parser)]
#[command(name = "scrolly")]
#[command(about = "Scroll-driven video narrative inspector and simulator")]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter (overrides RUST_LOG and the config file)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlatformArg {
    Standard,
    Ios,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Standard => Platform::Standard,
            PlatformArg::Ios => Platform::Ios,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the container height for a viewport
    Layout {
        /// Viewport height in pixels
        #[arg(long, default_value = "800")]
        viewport: f64,

        #[arg(long, value_enum, default_value = "standard")]
        platform: PlatformArg,
    },

    /// Resolve the active text segment for a progress value
    Resolve {
        /// Normalized progress (may exceed 1)
        progress: f64,

        /// Number of text segments (defaults to the configured count)
        #[arg(long)]
        segments: Option<u32>,
    },

    /// Scroll through a simulated viewport and print every state change
    Simulate {
        /// Viewport height in pixels
        #[arg(long, default_value = "800")]
        viewport: f64,

        #[arg(long, value_enum, default_value = "standard")]
        platform: PlatformArg,

        /// Number of text segments (defaults to the configured count)
        #[arg(long)]
        segments: Option<u32>,

        /// Pixels scrolled per animation frame
        #[arg(long, default_value = "100")]
        step: f64,

        /// Print snapshots as JSON lines
        #[arg(long)]
        json: bool,
    },
}

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn main() {
    let cli = Cli::parse();
    let reload_handle = init_tracing(cli.log_level.as_deref());
    let cfg = cli.config.as_deref().map(load_config).unwrap_or_default();

    if cli.log_level.is_none() {
        if let Some(level) = cfg.log_level.as_deref() {
            apply_log_level(&reload_handle, level);
        }
    }

    if let Err(err) = run(cli.command, cfg) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn init_tracing(level: Option<&str>) -> ReloadHandle {
    let env_filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn apply_log_level(handle: &ReloadHandle, level: &str) {
    match handle.reload(EnvFilter::new(level)) {
        Ok(()) => info!(level, "Applied log level from config"),
        Err(err) => warn!("Failed to apply log level {level}: {err}"),
    }
}

fn run(command: Commands, cfg: CliConfig) -> Result<()> {
    let narrative = cfg.narrative;
    narrative.validate().context("Invalid narrative config")?;

    match command {
        Commands::Layout { viewport, platform } => {
            print_layout(&narrative, viewport, platform.into())
        }

        Commands::Resolve { progress, segments } => {
            let count = segment_count(&narrative, segments)?;
            let state = resolve(progress, count);
            println!("Progress: {progress}");
            println!("Segments: {count} (length {:.4})", count.segment_len());
            match state.active_index {
                Some(index) => println!("Active text: {index}"),
                None => println!("Active text: none"),
            }
            println!("After video: {}", state.after_video);
        }

        Commands::Simulate {
            viewport,
            platform,
            segments,
            step,
            json,
        } => simulate(&narrative, viewport, platform.into(), segments, step, json)?,
    }

    Ok(())
}

fn segment_count(narrative: &NarrativeConfig, segments: Option<u32>) -> Result<SegmentCount> {
    match segments {
        Some(n) => SegmentCount::new(n).context("Invalid segment count"),
        None => Ok(narrative.default_segment_count),
    }
}

fn print_layout(narrative: &NarrativeConfig, viewport: f64, platform: Platform) {
    let distances = narrative.distances(platform);
    let height = distances.container_height(viewport);

    println!("\n=== Layout ({platform}) ===");
    println!("Viewport height: {viewport} px");
    println!("Scroll extra: {} px", distances.scroll_extra_px);
    println!("After-video extra: {} px", distances.after_video_extra_px);
    println!("Container height: {height} px");
    println!("Scrollable range: {} px (progress 1.0)", height - viewport);
}

fn simulate(
    narrative: &NarrativeConfig,
    viewport_height: f64,
    platform: Platform,
    segments: Option<u32>,
    step: f64,
    json: bool,
) -> Result<()> {
    anyhow::ensure!(step > 0.0, "Step must be positive, got {step}");
    let count = segment_count(narrative, segments)?;

    let viewport = Viewport::new(viewport_height);
    let container = ElementRef::attached(Element::new(0.0, viewport_height));
    let options = NarrativeOptions {
        platform,
        segment_count: Some(count),
        lines: (1..=count.get()).map(|i| format!("Line {i}")).collect(),
    };
    let scroll = ScrollNarrative::new(&viewport, container.clone(), narrative, options)
        .context("Failed to set up narrative")?;

    let changes = Rc::new(RefCell::new(Vec::new()));
    let _subscription = {
        let changes = Rc::clone(&changes);
        scroll.on_change(move |snapshot| changes.borrow_mut().push(*snapshot))
    };

    // Two screens of page content after the container so it scrolls fully out
    let container_height = container.get().map_or(viewport_height, |e| e.height);
    let document_height = container_height + 2.0 * viewport_height;
    let end = viewport.max_scroll_y(document_height);
    info!(end, step, "Simulating scroll session");

    let mut last = scroll.snapshot();
    print_snapshot(0.0, &last, json)?;

    let mut offset = 0.0;
    let mut frames = 0u64;
    while offset < end {
        offset = (offset + step).min(end);
        viewport.scroll_to(offset);
        viewport.run_animation_frame();
        frames += 1;

        for snapshot in changes.borrow_mut().drain(..) {
            if is_transition(&last, &snapshot) {
                print_snapshot(offset, &snapshot, json)?;
            }
            last = snapshot;
        }
    }

    info!(frames, "Simulation finished");
    Ok(())
}

// Progress moves every frame; only report when a derived flag changes.
fn is_transition(before: &NarrativeSnapshot, after: &NarrativeSnapshot) -> bool {
    before.active_text_index != after.active_text_index
        || before.after_video != after.after_video
        || before.is_in_viewport != after.is_in_viewport
}

fn print_snapshot(offset: f64, snapshot: &NarrativeSnapshot, json: bool) -> Result<()> {
    if json {
        let record = serde_json::json!({ "scroll_y": offset, "snapshot": snapshot });
        println!("{}", serde_json::to_string(&record)?);
        return Ok(());
    }

    let text = snapshot
        .active_text_index
        .map_or_else(|| "-".to_string(), |i| i.to_string());
    let playback = snapshot
        .playback_secs
        .map_or_else(String::new, |secs| format!(" t={secs:.2}s"));
    println!(
        "scroll {offset:>8.1} px  progress {:.4}  text {text:>2}  after_video {:<5}  visible {}{playback}",
        snapshot.progress, snapshot.after_video, snapshot.is_in_viewport,
    );
    Ok(())
}
