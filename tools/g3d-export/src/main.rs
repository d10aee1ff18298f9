//! g3d-export - geometry display list export tool
//!
//! Converts OBJ meshes to stripped, packed display lists (.g3dl) and
//! prints existing display lists.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use g3d_common::{decode_display_list, format_commands, strip_nops};
use g3d_export::{ExportSettings, convert_obj};

/// Display list file extension
const DISPLAY_LIST_EXT: &str = "g3dl";

#[derive(Parser)]
#[command(name = "g3d-export")]
#[command(about = "Geometry display list export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a single OBJ mesh
    Mesh {
        /// Input OBJ file
        input: PathBuf,

        /// Output .g3dl file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export settings TOML (flags below override it)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keep faces as independent triangles/quads
        #[arg(long)]
        no_strip: bool,

        /// Emit normals for hardware lighting
        #[arg(long)]
        light: bool,

        /// Uniform position scale
        #[arg(long)]
        magnify: Option<f32>,

        /// Convert Z-up input to Y-up
        #[arg(long)]
        flip_yz: bool,

        /// Texture size, e.g. 128x64 (enables texture coordinates)
        #[arg(long, value_parser = parse_texture_size)]
        texture_size: Option<[u32; 2]>,

        /// Print the generated command list
        #[arg(long)]
        dump: bool,
    },

    /// Print the commands of a display list
    Dump {
        /// Input .g3dl file
        input: PathBuf,

        /// Keep Nop padding in the listing
        #[arg(long)]
        nops: bool,
    },
}

fn parse_texture_size(s: &str) -> Result<[u32; 2], String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", s))?;
    let w = w.trim().parse().map_err(|_| format!("invalid width {:?}", w))?;
    let h = h.trim().parse().map_err(|_| format!("invalid height {:?}", h))?;
    Ok([w, h])
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
        Commands::Mesh {
            input,
            output,
            config,
            no_strip,
            light,
            magnify,
            flip_yz,
            texture_size,
            dump,
        } => {
            let mut settings = match config {
                Some(path) => ExportSettings::load(&path)?,
                None => ExportSettings::default(),
            };
            if no_strip {
                settings.use_primitive_strip = false;
            }
            if light {
                settings.lighting = true;
            }
            if let Some(magnify) = magnify {
                settings.magnify = magnify;
            }
            if flip_yz {
                settings.flip_yz = true;
            }
            if texture_size.is_some() {
                settings.texture_size = texture_size;
            }

            let output = output.unwrap_or_else(|| input.with_extension(DISPLAY_LIST_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            let converted = convert_obj(&input, &output, &settings)?;
            if dump {
                print!("{}", format_commands(&converted.commands));
            }
            tracing::info!("Done!");
        }

        Commands::Dump { input, nops } => {
            let data = std::fs::read(&input)
                .with_context(|| format!("Failed to read display list: {:?}", input))?;
            let commands = decode_display_list(&data)
                .with_context(|| format!("Failed to decode display list: {:?}", input))?;
            let commands = if nops { commands } else { strip_nops(commands) };
            print!("{}", format_commands(&commands));
        }
    }

    Ok(())
}
