//! geotex CLI - Command-line interface
//!
//! Inspects vector layer sources and renders single tiles to PNG.

mod commands;
mod error;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use commands::common::{cancel_on_ctrl_c, load_config};
use commands::inspect::InspectArgs;
use commands::render::RenderArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "geotex")]
#[command(version = geotex::VERSION)]
#[command(about = "Rasterize KML, GPX and GeoJSON layers into tile textures", long_about = None)]
struct Cli {
    /// Configuration file (INI); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a layer source and print its format, extent and feature counts
    Inspect {
        /// KML, GPX or GeoJSON file
        file: PathBuf,

        /// Projection the layer is prepared in
        #[arg(long, default_value = "EPSG:4326")]
        projection: String,
    },

    /// Render one tile of a layer to a PNG file
    Render {
        /// Layer descriptor (JSON)
        #[arg(long)]
        layer: PathBuf,

        /// Tile column
        #[arg(long)]
        x: u32,

        /// Tile row, 0 at north
        #[arg(long)]
        y: u32,

        /// Zoom level
        #[arg(long)]
        zoom: u8,

        /// Output PNG path
        #[arg(long, default_value = "tile.png")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _logging_guard = match logging::init_logging(cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    info!(version = geotex::VERSION, "geotex starting");
    let config = load_config(cli.config.as_deref())?;
    let cancellation = cancel_on_ctrl_c()?;

    match cli.command {
        Commands::Inspect { file, projection } => {
            commands::inspect::run(InspectArgs { file, projection }, &config, cancellation).await
        }
        Commands::Render {
            layer,
            x,
            y,
            zoom,
            output,
        } => {
            let args = RenderArgs {
                layer,
                x,
                y,
                zoom,
                output,
            };
            commands::render::run(args, &config, cancellation).await
        }
    }
}
