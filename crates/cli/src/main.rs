use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use cmd::{cmd_check, cmd_generate, cmd_info, cmd_targets};
use output::{OutputFormat, print_error};

/// makegen - Generate make scripts from declarative target descriptions
#[derive(Parser)]
#[command(name = "makegen")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate the build script from a configuration file
  Generate {
    /// Path to the configuration file (.lua or .json)
    #[arg(default_value = "makegen.lua")]
    config: PathBuf,

    /// Write the script to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Omit colored progress lines from recipes
    #[arg(long)]
    no_banners: bool,
  },

  /// Validate a configuration without generating anything
  Check {
    /// Path to the configuration file (.lua or .json)
    #[arg(default_value = "makegen.lua")]
    config: PathBuf,
  },

  /// List the targets declared by a configuration
  Targets {
    /// Path to the configuration file (.lua or .json)
    #[arg(default_value = "makegen.lua")]
    config: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
  },

  /// Show host platform information
  Info,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Generate {
      config,
      output,
      no_banners,
    } => cmd_generate(&config, output.as_deref(), no_banners),
    Commands::Check { config } => cmd_check(&config),
    Commands::Targets { config, format } => cmd_targets(&config, format),
    Commands::Info => {
      cmd_info();
      Ok(())
    }
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
