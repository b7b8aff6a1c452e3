#![deny(unsafe_code)]
//! Headless CLI for canvas-lab.
//!
//! Subcommands:
//! - `render <engine>`: run an engine for N frames with optional pointer
//!   input, write a PNG (and optionally the seed document for the run)
//! - `replay <seed.json>`: rerun a saved seed document
//! - `list`: print available engines
//!
//! Set `RUST_LOG=debug` to see engine geometry and loop events.

mod error;

use canvas_lab_core::{PointerEvent, PointerKind, Seed};
use canvas_lab_engines::{snapshot, EngineKind, FrameLoop};
use clap::{Parser, Subcommand};
use error::CliError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "canvas-lab", about = "Generative canvas simulations, headless")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an engine for N frames and write a PNG snapshot.
    Render {
        /// Engine tag, label or slug (e.g. "v1", "Flow", "reaction-diffusion").
        engine: String,

        /// Canvas width in pixels.
        #[arg(short = 'W', long, default_value_t = 512)]
        width: usize,

        /// Canvas height in pixels.
        #[arg(short = 'H', long, default_value_t = 512)]
        height: usize,

        /// Number of frames to run.
        #[arg(short, long, default_value_t = 300)]
        frames: usize,

        /// Advance the engine every N-th frame (3 = gallery preview).
        #[arg(long, default_value_t = 1)]
        cadence: usize,

        /// PRNG seed for deterministic output; omitted means random.
        #[arg(long)]
        seed: Option<u64>,

        /// Click at `x,y` before the first frame. Repeatable.
        #[arg(long = "click", value_parser = parse_point)]
        clicks: Vec<(f64, f64)>,

        /// Hover the pointer at `x,y` for the whole run.
        #[arg(long, value_parser = parse_point)]
        hover: Option<(f64, f64)>,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Also write the seed document describing this run.
        #[arg(long)]
        save_seed: Option<PathBuf>,

        /// Engine parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Rerun a seed document and write a PNG snapshot.
    Replay {
        /// Path to a seed JSON document.
        seed: PathBuf,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
    },
    /// List available engines.
    List,
}

/// Parses `x,y` into surface coordinates.
fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate {v:?}: {e}"))
    };
    Ok((coord(x)?, coord(y)?))
}

/// Hover first, then clicks, all before frame 0.
fn scripted_events(hover: Option<(f64, f64)>, clicks: &[(f64, f64)]) -> Vec<PointerEvent> {
    let hover = hover.map(|(x, y)| PointerEvent {
        frame: 0,
        kind: PointerKind::Move,
        x,
        y,
    });
    let clicks = clicks.iter().map(|&(x, y)| PointerEvent {
        frame: 0,
        kind: PointerKind::Click,
        x,
        y,
    });
    hover.into_iter().chain(clicks).collect()
}

fn read_seed(path: &Path) -> Result<Seed, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::SeedRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::SeedParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs `seed`, writes the PNG and reports the result.
fn run_and_write(seed: &Seed, output: &Path, json: bool) -> Result<(), CliError> {
    let host = FrameLoop::<EngineKind>::replay(seed)?;
    snapshot::write_png(host.raster(), output)?;

    if json {
        let info = serde_json::json!({
            "engine": seed.engine,
            "width": seed.width,
            "height": seed.height,
            "frames": seed.frames,
            "cadence": seed.cadence,
            "seed": seed.seed,
            "events": seed.events.len(),
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        let seed_text = seed
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string());
        eprintln!(
            "rendered {} ({}x{}, {} frames, seed {seed_text}) -> {}",
            seed.engine,
            seed.width,
            seed.height,
            seed.frames,
            output.display()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let engines = EngineKind::list_engines();
            if cli.json {
                let info: Vec<_> = engines
                    .iter()
                    .map(|v| {
                        serde_json::json!({
                            "tag": v.tag(),
                            "label": v.label(),
                            "slug": v.slug(),
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "engines": info }))?
                );
            } else {
                println!("Engines:");
                for v in engines {
                    println!("  {}  {:<10} {}", v.tag(), v.label(), v.slug());
                }
            }
        }
        Command::Render {
            engine,
            width,
            height,
            frames,
            cadence,
            seed,
            clicks,
            hover,
            output,
            save_seed,
            params,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Params(e.to_string()))?;
            if !params.is_object() {
                return Err(CliError::Params("expected a JSON object".into()));
            }

            let mut doc = Seed::new(&engine, width, height, seed);
            doc.params = params;
            doc.frames = frames;
            doc.cadence = cadence;
            doc.events = scripted_events(hover, &clicks);

            run_and_write(&doc, &output, cli.json)?;

            if let Some(path) = save_seed {
                fs::write(&path, serde_json::to_string_pretty(&doc)?)
                    .map_err(|source| CliError::SeedWrite {
                        path: path.clone(),
                        source,
                    })?;
                log::info!("seed document written to {}", path.display());
            }
        }
        Command::Replay { seed, output } => {
            let doc = read_seed(&seed)?;
            run_and_write(&doc, &output, cli.json)?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
