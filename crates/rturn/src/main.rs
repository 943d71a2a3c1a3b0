//! rturn CLI - STEP model → cylinder profile → lathe NC program.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rturn::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rturn")]
#[command(about = "Generate two-axis lathe programs for cylindrical parts", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an NC program from a STEP model
    Nc {
        /// Input STEP file (.stp or .step)
        model: PathBuf,
        /// Output file (default: <stem>_turn.NC next to the model)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Also print the program to stdout
        #[arg(long)]
        stdout: bool,
        /// JSON parameter file (default: ~/.rturn/params.json when present)
        #[arg(long)]
        params: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Backend::Auto)]
        backend: Backend,
        #[command(flatten)]
        overrides: ParamOverrides,
    },
    /// Print or save the cylinder profile of a STEP model as JSON
    Profile {
        model: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Backend::Auto)]
        backend: Backend,
    },
    /// Write the default parameter table as JSON
    Params {
        /// Output file (default: ~/.rturn/params.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Per-run overrides applied on top of the parameter file.
#[derive(Args)]
struct ParamOverrides {
    #[arg(long)]
    rpm: Option<u32>,
    #[arg(long)]
    f_rough: Option<f64>,
    #[arg(long)]
    f_finish: Option<f64>,
    #[arg(long)]
    f_face: Option<f64>,
    #[arg(long)]
    f_part: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    stock_allow: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    finish_allow: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    rough_step: Option<f64>,
    #[arg(long)]
    safe_z: Option<f64>,
    #[arg(long)]
    cutoff_extra: Option<f64>,
}

impl ParamOverrides {
    fn apply(&self, mut params: TurnParams) -> TurnParams {
        if let Some(v) = self.rpm {
            params.spindle_rpm = v;
        }
        if let Some(v) = self.f_rough {
            params.feed_rough = v;
        }
        if let Some(v) = self.f_finish {
            params.feed_finish = v;
        }
        if let Some(v) = self.f_face {
            params.feed_face = v;
        }
        if let Some(v) = self.f_part {
            params.feed_part = v;
        }
        if let Some(v) = self.stock_allow {
            params.stock_allowance = v;
        }
        if let Some(v) = self.finish_allow {
            params.finish_allowance = v;
        }
        if let Some(v) = self.rough_step {
            params.rough_step = v;
        }
        if let Some(v) = self.safe_z {
            params.safe_z = v;
        }
        if let Some(v) = self.cutoff_extra {
            params.cutoff_extra = v;
        }
        params
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Nc {
            model,
            out,
            stdout,
            params,
            backend,
            overrides,
        } => {
            let params = overrides.apply(load_params(params.as_deref())?);
            let nc = nc_from_model(&model, &params, backend)
                .with_context(|| format!("generate NC program for {}", model.display()))?;
            let out_path = out.unwrap_or_else(|| default_output_path(&model));
            save_nc(&nc, &out_path)?;
            if stdout {
                print!("{nc}");
            }
            println!("Saved: {}", out_path.display());
        }
        Commands::Profile {
            model,
            out,
            backend,
        } => {
            let profile = profile_from_model(&model, backend)
                .with_context(|| format!("profile {}", model.display()))?;
            match out {
                Some(path) => profile.save_to_path(&path)?,
                None => println!("{}", profile.to_json()?),
            }
        }
        Commands::Params { out } => {
            let path = match out {
                Some(path) => path,
                None => TurnParams::default_params_path()?,
            };
            TurnParams::default().save_to_path(&path)?;
            println!("Saved: {}", path.display());
        }
    }

    Ok(())
}

/// Explicit file, else the user's default file if it exists, else defaults.
fn load_params(explicit: Option<&Path>) -> Result<TurnParams> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("parameter file {} does not exist", path.display());
            }
            TurnParams::load_from_path(path)
        }
        None => match TurnParams::default_params_path() {
            Ok(path) => TurnParams::load_from_path(path),
            Err(_) => Ok(TurnParams::default()),
        },
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
