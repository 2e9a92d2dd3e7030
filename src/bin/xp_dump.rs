//! xp-dump
//!
//! Prints the layers of a scene file as text or JSON snapshots.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tilescreen::core::{GridSnapshot, TileGrid};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "xp-dump")]
#[command(version)]
#[command(about = "Print the layers of a REXPaint-style scene file", long_about = None)]
struct Args {
    /// Scene file to load
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Only print this layer (0-based)
    #[arg(short, long, value_name = "N")]
    layer: Option<usize>,

    /// Output snapshots as JSON
    #[arg(short, long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let layers = match tilescreen::scene::load(&args.file) {
        Ok(layers) => layers,
        Err(e) => {
            eprintln!("Error loading '{}': {}", args.file.display(), e);
            return ExitCode::FAILURE;
        },
    };
    tracing::debug!("loaded {} layers from {}", layers.len(), args.file.display());

    let selected: Vec<(usize, &TileGrid)> = match args.layer {
        Some(index) => match layers.get(index) {
            Some(grid) => vec![(index, grid)],
            None => {
                eprintln!("Layer {} out of range ({} layers)", index, layers.len());
                return ExitCode::FAILURE;
            },
        },
        None => layers.iter().enumerate().collect(),
    };

    if args.json {
        let snapshots: Vec<GridSnapshot> = selected
            .iter()
            .map(|(_, grid)| GridSnapshot::from_grid(grid))
            .collect();
        match serde_json::to_string_pretty(&snapshots) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing snapshot: {}", e);
                return ExitCode::FAILURE;
            },
        }
    } else {
        for (index, grid) in selected {
            let snapshot = GridSnapshot::from_grid(grid);
            println!("Layer {} ({}x{}):", index, snapshot.width, snapshot.height);
            println!("---");
            println!("{}", snapshot.text());
            println!("---");
        }
    }

    ExitCode::SUCCESS
}
