//! formflow CLI
//!
//! Fetch, inspect, render and fill in server-defined forms from the terminal.
//!
//! ## Usage
//!
//! ```bash
//! formflow register --roll-number 21CS042 --name Asha
//! formflow fetch --roll-number 21CS042 --name Asha --output form.json
//! formflow check form.json
//! formflow render --file form.json --output form.html
//! formflow fill --file form.json --output answers.json
//! ```
//!
//! Settings come from `formflow.toml` and `FORMFLOW_*` environment variables;
//! see `formflow-conf`.

mod commands;
mod prompt;
mod submit;

use clap::{Parser, Subcommand};
use commands::{FormSourceArgs, UserArgs};
use formflow_conf::ClientSettings;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "formflow")]
#[command(about = "Schema-driven multi-step forms in the terminal", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Settings file (defaults to ./formflow.toml)
	#[arg(long, global = true, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Verbosity level (can be repeated)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Fetch the form assigned to a user and print its outline
	Fetch {
		#[command(flatten)]
		user: UserArgs,

		/// Save the form definition as JSON
		#[arg(short, long, value_name = "PATH")]
		output: Option<PathBuf>,
	},

	/// Register a user with the form service
	Register {
		#[command(flatten)]
		user: UserArgs,
	},

	/// Check that a local form definition is well formed
	Check {
		/// Form definition (bare or `{ message, form }` envelope)
		#[arg(value_name = "PATH")]
		path: PathBuf,
	},

	/// Render the first section of a form as HTML
	Render {
		#[command(flatten)]
		source: FormSourceArgs,

		/// Write the HTML to a file instead of stdout
		#[arg(short, long, value_name = "PATH")]
		output: Option<PathBuf>,
	},

	/// Fill in a form interactively and submit it
	Fill {
		#[command(flatten)]
		source: FormSourceArgs,

		/// Save the submitted values as JSON instead of logging them
		#[arg(short, long, value_name = "PATH")]
		output: Option<PathBuf>,
	},
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();

	if let Err(e) = run(cli).await {
		eprintln!("Error: {:#}", e);
		process::exit(1);
	}
}

async fn run(cli: Cli) -> anyhow::Result<()> {
	let settings = ClientSettings::load(cli.config.as_deref())?;
	init_tracing(&settings, cli.verbosity)?;

	match cli.command {
		Commands::Fetch { user, output } => commands::run_fetch(&settings, user, output).await,
		Commands::Register { user } => commands::run_register(&settings, user).await,
		Commands::Check { path } => commands::run_check(&path),
		Commands::Render { source, output } => {
			commands::run_render(&settings, source, output).await
		}
		Commands::Fill { source, output } => commands::run_fill(&settings, source, output).await,
	}
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins, then `-v`/`-vv`, then the configured filter.
fn init_tracing(settings: &ClientSettings, verbosity: u8) -> anyhow::Result<()> {
	use tracing_subscriber::{EnvFilter, fmt, prelude::*};

	let level = log_filter(settings, verbosity);
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(level))
		.map_err(|e| anyhow::anyhow!("Invalid log filter: {}", e))?;

	tracing_subscriber::registry()
		.with(fmt::layer().with_target(false).with_writer(std::io::stderr))
		.with(filter)
		.init();

	Ok(())
}

fn log_filter(settings: &ClientSettings, verbosity: u8) -> &str {
	match verbosity {
		0 => &settings.log_filter,
		1 => "debug",
		_ => "trace",
	}
}
