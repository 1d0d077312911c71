use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "slotkit")]
#[command(about = "Render a sample container with runtime slot overrides")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Slot configuration file (TOML)
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v')]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Render the sample profile card
	Render {
		/// Override a slot on the card instance (`key=text`)
		#[arg(long = "override", short = 'o', value_name = "KEY=TEXT")]
		overrides: Vec<Assignment>,

		/// Provide an override from an enclosing scope (`key=text`)
		#[arg(long, short = 's', value_name = "KEY=TEXT")]
		scoped: Vec<Assignment>,

		/// Override a slot from a background task after the first render (`key=text`)
		#[arg(long, short = 'd', value_name = "KEY=TEXT")]
		deferred: Vec<Assignment>,

		/// Delay before deferred overrides are applied, in milliseconds
		#[arg(long, default_value_t = 50)]
		delay_ms: u64,
	},
	/// List the sample card's slots
	Slots,
	/// Derive slot keys from producer names using the configured suffix
	Check {
		/// Producer names to check
		#[arg(required = true)]
		names: Vec<String>,
	},
}

/// A `key=text` pair given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
	pub key: String,
	pub text: String,
}

impl FromStr for Assignment {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (key, text) = s
			.split_once('=')
			.ok_or_else(|| format!("expected KEY=TEXT, got {s:?}"))?;
		if key.is_empty() {
			return Err(format!("missing slot key in {s:?}"));
		}
		Ok(Self {
			key: key.to_string(),
			text: text.to_string(),
		})
	}
}
