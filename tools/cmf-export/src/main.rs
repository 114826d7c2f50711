//! cmf-export - Columbus Model Format exporter
//!
//! Converts OBJ scenes (or every mesh listed in a models.toml manifest)
//! to .cmf containers.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use cmf_export::mesh::{AttributeSet, ExportOptions, NormalPolicy};
use cmf_export::{manifest, mesh, ElementFormat, CMF_EXT};

#[derive(Parser)]
#[command(name = "cmf-export")]
#[command(about = "Columbus Model Format exporter")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build meshes from a manifest file
    Build {
        /// Path to models.toml manifest
        #[arg(default_value = "models.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to models.toml manifest
        #[arg(default_value = "models.toml")]
        manifest: PathBuf,
    },

    /// Export a single OBJ file
    Mesh {
        /// Input OBJ file
        input: PathBuf,

        /// Output .cmf file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        switches: Switches,
    },
}

#[derive(Args)]
struct Switches {
    /// Skip the positions array
    #[arg(long)]
    no_positions: bool,

    /// Skip the texture coordinates array
    #[arg(long)]
    no_texcoords: bool,

    /// Skip the normals array
    #[arg(long)]
    no_normals: bool,

    /// Generate and write a tangents array
    #[arg(long)]
    tangents: bool,

    /// Skip the vertex colors array
    #[arg(long)]
    no_colors: bool,

    /// Write every corner as its own vertex, without an index array
    #[arg(long)]
    no_index: bool,

    /// Export only the named objects (repeatable)
    #[arg(short, long = "select", value_name = "NAME")]
    select: Vec<String>,

    /// Normal source for each corner
    #[arg(long, value_enum, default_value_t = NormalsArg::Face)]
    normals: NormalsArg,

    /// Write float arrays as 64-bit doubles
    #[arg(long)]
    double: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum NormalsArg {
    /// Follow each face's smoothing flag
    Face,
    /// Always use smoothed vertex normals
    Smooth,
    /// Always use flat face normals
    Flat,
}

impl Switches {
    fn options(&self) -> ExportOptions {
        ExportOptions {
            attributes: AttributeSet {
                positions: !self.no_positions,
                texcoords: !self.no_texcoords,
                normals: !self.no_normals,
                tangents: self.tangents,
                colors: !self.no_colors,
            },
            index: !self.no_index,
            normals: match self.normals {
                NormalsArg::Face => NormalPolicy::Face,
                NormalsArg::Smooth => NormalPolicy::Smooth,
                NormalsArg::Flat => NormalPolicy::Flat,
            },
            float_format: if self.double {
                ElementFormat::Double
            } else {
                ElementFormat::Float
            },
            ..ExportOptions::default()
        }
    }
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
        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building meshes from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Mesh {
            input,
            output,
            switches,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(CMF_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);

            let ext = input
                .extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_lowercase())
                .unwrap_or_default();

            match ext.as_str() {
                "obj" => {
                    mesh::convert_obj(&input, &output, &switches.options(), &switches.select)?;
                }
                _ => anyhow::bail!("Unsupported mesh format: {:?} (use .obj)", input),
            }
            tracing::info!("Done!");
        }
    }

    Ok(())
}
