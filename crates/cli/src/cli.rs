use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "cairn")]
#[command(about = "Loads content extensions and prints the merged registries")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Engine configuration file (TOML)
	#[arg(short, long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,

	/// Load extensions one after another instead of one task each
	#[arg(long)]
	pub sequential: bool,
}
