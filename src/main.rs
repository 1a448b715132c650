//! snowflake - procedural snowflake viewer and exporter
//!
//! Usage:
//!   snowflake view                       # Interactive window
//!   snowflake render -o flake.png        # Single PNG
//!   snowflake sequence -o frames/ -n 60  # Numbered PNG frames
//!   snowflake params --seed 42           # Print effective parameters

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use snowflake::{
    host, parse_hex_color, pipeline, AppConfig, Backend, ExportConfig, HostConfig, Palette,
    SnowflakeParams,
};

#[derive(Parser)]
#[command(name = "snowflake")]
#[command(about = "Real-time procedural snowflake rendered with a signed-distance shader")]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ParamArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Parameter overrides shared by every subcommand.
#[derive(Args, Debug, Default)]
struct ParamArgs {
    /// Seed (0-1000); random when omitted
    #[arg(long, global = true)]
    seed: Option<f32>,

    /// Branches per arm (1-10)
    #[arg(long, global = true)]
    complexity: Option<f32>,

    /// Line thickness (0-0.02)
    #[arg(long, global = true)]
    thickness: Option<f32>,

    /// Glow intensity (0-1)
    #[arg(long, global = true)]
    glow: Option<f32>,

    /// Pointer x position (0-1), drives rotation
    #[arg(long, global = true)]
    mouse_x: Option<f32>,

    /// Pointer y position (0-1)
    #[arg(long, global = true)]
    mouse_y: Option<f32>,

    /// Silhouette colour as hex
    #[arg(long, global = true)]
    color: Option<String>,

    /// Glow colour as hex
    #[arg(long, global = true)]
    glow_color: Option<String>,

    /// Background colour as hex
    #[arg(long, global = true)]
    background: Option<String>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Output width in pixels
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Output height in pixels
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Elapsed time in seconds for the (first) frame
    #[arg(long, default_value_t = 0.0)]
    time: f32,

    /// Render on the CPU instead of the GPU
    #[arg(long)]
    cpu: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive window
    View {
        /// Window width (default from config)
        #[arg(long)]
        width: Option<u32>,

        /// Window height (default from config)
        #[arg(long)]
        height: Option<u32>,
    },

    /// Render a single PNG
    Render {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Render a numbered PNG sequence
    Sequence {
        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Number of frames
        #[arg(short = 'n', long, default_value_t = 60)]
        frames: usize,

        /// Frames per second (time step is 1/fps)
        #[arg(long, default_value_t = 30.0)]
        fps: f32,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Print the effective parameters as JSON
    Params,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Cli::parse()) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    // Every session starts on a fresh flake unless a seed is pinned on the command line
    let seed_given = cli.overrides.seed.is_some();
    let mut params = apply_param_overrides(config.params, &cli.overrides);
    let palette = apply_palette_overrides(config.palette, &cli.overrides)?;

    match cli.command {
        Commands::View { width, height } => {
            let mut window = config.window;
            window.width = width.unwrap_or(window.width);
            window.height = height.unwrap_or(window.height);

            let last = host::run(HostConfig {
                window,
                params,
                palette,
                keep_seed: seed_given,
            })?;
            log::info!("Last parameters: {}", serde_json::to_string(&last)?);
        }

        Commands::Render { output, export } => {
            ensure_seed(&mut params, seed_given);
            let cfg = export_config(&export, params, palette);
            pollster::block_on(pipeline::render_still(&output, &cfg))
                .with_context(|| format!("Failed to render {}", output.display()))?;
        }

        Commands::Sequence {
            output,
            frames,
            fps,
            export,
        } => {
            ensure_seed(&mut params, seed_given);
            let cfg = export_config(&export, params, palette);
            let progress: Box<dyn Fn(f32) + Send> = Box::new(|fraction| {
                log::debug!("{:.0}%", fraction * 100.0);
            });
            pollster::block_on(pipeline::render_sequence(
                &output,
                &cfg,
                frames,
                fps,
                Some(progress),
            ))
            .with_context(|| format!("Failed to render sequence into {}", output.display()))?;
        }

        Commands::Params => {
            ensure_seed(&mut params, seed_given);
            println!("{}", serde_json::to_string_pretty(&params)?);
        }
    }

    Ok(())
}

fn apply_param_overrides(mut params: SnowflakeParams, args: &ParamArgs) -> SnowflakeParams {
    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    if let Some(complexity) = args.complexity {
        params.complexity = complexity;
    }
    if let Some(thickness) = args.thickness {
        params.thickness = thickness;
    }
    if let Some(glow) = args.glow {
        params.glow = glow;
    }
    if let Some(x) = args.mouse_x {
        params.mouse[0] = x;
    }
    if let Some(y) = args.mouse_y {
        params.mouse[1] = y;
    }
    params.clamped()
}

fn apply_palette_overrides(mut palette: Palette, args: &ParamArgs) -> Result<Palette> {
    let parse = |name: &str, hex: &str| {
        parse_hex_color(hex).with_context(|| format!("Invalid {}: {}", name, hex))
    };
    if let Some(hex) = &args.color {
        palette.base = parse("color", hex)?;
    }
    if let Some(hex) = &args.glow_color {
        palette.glow = parse("glow color", hex)?;
    }
    if let Some(hex) = &args.background {
        palette.background = parse("background", hex)?;
    }
    Ok(palette)
}

fn ensure_seed(params: &mut SnowflakeParams, seed_given: bool) {
    if !seed_given {
        params.randomize_seed(&mut StdRng::from_entropy());
        log::info!("Using seed {:.3}", params.seed);
    }
}

fn export_config(args: &ExportArgs, params: SnowflakeParams, palette: Palette) -> ExportConfig {
    ExportConfig {
        width: args.width,
        height: args.height,
        time: args.time,
        params,
        palette,
        backend: if args.cpu { Backend::Cpu } else { Backend::Gpu },
    }
}
