mod card;
mod cli;
mod logging;
#[cfg(test)]
mod tests;

use std::time::Duration;

use clap::Parser;
use cli::{Cli, Command};
use slotkit_config::SlotConfig;
use slotkit_registry::{OverrideScope, SlotKey};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	logging::init(cli.verbose)?;

	let config = match &cli.config {
		Some(path) => {
			info!(path = %path.display(), "loading slot configuration");
			SlotConfig::load(path)?
		}
		None => SlotConfig::default(),
	};

	match cli.command {
		Command::Render {
			overrides,
			scoped,
			deferred,
			delay_ms,
		} => {
			let table = card::table_for(&config)?;
			let scope_map = card::assignments_to_map(&scoped);
			let passes = OverrideScope::root()
				.provide(&scope_map, |scope| {
					card::render(
						table,
						&config,
						scope.clone(),
						&overrides,
						&deferred,
						Duration::from_millis(delay_ms),
					)
				})
				.await;

			for (i, lines) in passes.iter().enumerate() {
				if i > 0 {
					println!();
				}
				for line in lines {
					println!("{line}");
				}
			}
		}
		Command::Slots => {
			let table = card::table_for(&config)?;
			for (_, decl) in table.iter() {
				println!(
					"{}\t{}",
					decl.key(),
					decl.producer_name().unwrap_or("-")
				);
			}
		}
		Command::Check { names } => {
			let mut failed = 0usize;
			for name in &names {
				match SlotKey::derive(name, &config.suffix) {
					Ok(key) => println!("{name} -> {key}"),
					Err(error) => {
						failed += 1;
						eprintln!("{name}: {error}");
					}
				}
			}
			if failed > 0 {
				anyhow::bail!("{failed} of {} producer names are invalid", names.len());
			}
		}
	}

	Ok(())
}
