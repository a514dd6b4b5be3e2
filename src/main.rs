mod adapters;
mod checks;
mod commands;
mod core;
mod release;
mod utils;

use clap::{Parser, Subcommand};
use core::error::{EXIT_FAILURE, RelError, print_error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Keep one release version aligned across manifests, lock files and CI config
#[derive(Parser)]
#[command(name = "relsync")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Repository root (default: current directory)
  #[arg(long, global = true, value_name = "DIR")]
  root: Option<PathBuf>,

  /// Verbose diagnostics on stderr (overrides RELSYNC_LOG)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Validate that every version location, the CI workflow and packaging config agree
  Check {
    /// Require every location to carry this version
    #[arg(long = "version", value_name = "X.Y.Z")]
    release_version: Option<String>,
    /// Require this tag to match the version
    #[arg(long, value_name = "vX.Y.Z")]
    tag: Option<String>,
    /// Align everything before validating
    #[arg(long)]
    fix: bool,
    /// Output the report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Align everything to a new version and validate (check --fix --version X --tag vX)
  Prepare {
    /// Release version, without a leading `v`
    #[arg(value_name = "X.Y.Z")]
    release_version: String,
  },

  /// Prepare, then commit the version files and create the release tag
  Cut {
    /// Release version, without a leading `v`
    #[arg(value_name = "X.Y.Z")]
    release_version: String,
    /// Push the current branch and the tag to the configured remote
    #[arg(long)]
    push: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Diagnostics go to stderr; stdout is reserved for reports
fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_env("RELSYNC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

fn main() {
  // Usage errors share the exit code of every other failure; help and version stay at 0
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(e) => {
      let code = if e.use_stderr() { EXIT_FAILURE } else { 0 };
      let _ = e.print();
      std::process::exit(code);
    }
  };
  init_tracing(cli.verbose);

  let root = match cli.root {
    Some(root) => root,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => handle_error(RelError::message(format!("Failed to get current directory: {}", e))),
    },
  };

  // Build the context once (loads relsync.toml); every command works from it
  let ctx = match core::context::ReleaseContext::build(&root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Check {
      release_version,
      tag,
      fix,
      json,
    } => commands::run_check(&ctx, release_version, tag, fix, json),
    Commands::Prepare { release_version } => commands::run_prepare(&ctx, &release_version),
    Commands::Cut { release_version, push } => commands::run_cut(&ctx, &release_version, push),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: RelError) -> ! {
  tracing::debug!(error = ?err, "command failed");
  print_error(&err);
  std::process::exit(EXIT_FAILURE);
}
