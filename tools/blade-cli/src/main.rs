//! blade-cli - blade mesh developer tool
//!
//! Generates blades from TOML presets and skeletons, validates them, dumps
//! OBJ files and prints the configuration schema.

use anyhow::Result;
use blade_mesh::schema::config_schema;
use blade_mesh::{BladeConfig, generate_blade, random_carves, validate_skeleton};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use blade_cli::{demo_skeleton, load_preset, load_skeleton, save_skeleton, write_obj};

#[derive(Parser)]
#[command(name = "blade-cli")]
#[command(about = "Blade mesh developer tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a blade and print its statistics
    Generate {
        /// Preset TOML (default: built-in defaults)
        #[arg(short, long)]
        preset: Option<PathBuf>,

        /// Skeleton TOML (default: a straight demo blade)
        #[arg(short, long)]
        skeleton: Option<PathBuf>,

        /// Write the mesh as OBJ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Append randomly generated carves from this seed
        #[arg(long)]
        seed: Option<u64>,

        /// Number of random carves when --seed is given
        #[arg(long, default_value_t = 3)]
        carves: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a preset and skeleton without generating
    Check {
        /// Preset TOML
        #[arg(short, long)]
        preset: Option<PathBuf>,

        /// Skeleton TOML
        #[arg(short, long)]
        skeleton: Option<PathBuf>,
    },

    /// Write a straight demo skeleton
    Skeleton {
        /// Output skeleton TOML
        output: PathBuf,

        /// Number of segments
        #[arg(short, long, default_value_t = 5)]
        count: usize,

        /// Blade length along +Y
        #[arg(short, long, default_value_t = 1.0)]
        length: f32,

        /// Width at the base
        #[arg(short, long, default_value_t = 0.2)]
        width: f32,
    },

    /// Print every configuration field with its range and default
    Schema,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            preset,
            skeleton,
            output,
            seed,
            carves,
            verbose,
        } => {
            let mut config = load_config(preset.as_deref())?;
            let segments = load_segments(skeleton.as_deref())?;
            if let Some(seed) = seed {
                let extra = random_carves(seed, carves);
                if verbose {
                    for spec in &extra {
                        tracing::info!("Random carve: {:?}", spec);
                    }
                }
                config.carves.extend(extra);
            }

            let mesh = generate_blade(&segments, &config);
            if mesh.is_empty() {
                anyhow::bail!("Skeleton produced an empty mesh ({} segments)", segments.len());
            }

            let report = &mesh.report;
            tracing::info!(
                "Generated {} vertices, {} triangles ({} edge) over {} rings",
                mesh.buffers.vertex_count(),
                mesh.buffers.triangle_count(),
                mesh.buffers.triangles_edge.len() / 3,
                report.ring_count
            );
            if verbose {
                tracing::info!("Max groove depth: {:.3}", report.max_groove_depth);
                tracing::info!(
                    "Holes: {} triangles removed, {} wall quads, {} wall vertices",
                    report.holes.deleted_triangles,
                    report.holes.wall_quads,
                    mesh.wall_vertex_count()
                );
            }

            if let Some(output) = output {
                tracing::info!("Writing {:?}", output);
                write_obj(&output, &mesh)?;
            }
            tracing::info!("Done!");
        }

        Commands::Check { preset, skeleton } => {
            let config = load_config(preset.as_deref())?;
            config.validate()?;
            if let Some(path) = skeleton {
                tracing::info!("Checking skeleton {:?}", path);
                validate_skeleton(&load_skeleton(&path)?)?;
            }
            tracing::info!("Input is valid!");
        }

        Commands::Skeleton {
            output,
            count,
            length,
            width,
        } => {
            tracing::info!("Writing demo skeleton {:?}", output);
            save_skeleton(&output, &demo_skeleton(count, length, width))?;
            tracing::info!("Done!");
        }

        Commands::Schema => {
            for field in config_schema() {
                let range = field
                    .range
                    .map(|r| format!("[{}, {}]", r.min, r.max))
                    .unwrap_or_default();
                let options = field.options().join("|");
                println!(
                    "{:<24} {:<6} {:<12} default {:<6} {}",
                    field.path,
                    field.kind.type_name(),
                    range,
                    field.default,
                    options
                );
            }
        }
    }

    Ok(())
}

fn load_config(preset: Option<&Path>) -> Result<BladeConfig> {
    match preset {
        Some(path) => {
            tracing::info!("Loading preset {:?}", path);
            load_preset(path)
        }
        None => Ok(BladeConfig::default()),
    }
}

fn load_segments(skeleton: Option<&Path>) -> Result<Vec<blade_mesh::Segment>> {
    match skeleton {
        Some(path) => load_skeleton(path),
        None => Ok(demo_skeleton(5, 1.0, 0.2)),
    }
}
