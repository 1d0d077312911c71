use std::time::Duration;

use clap::Parser;
use slotkit_config::SlotConfig;
use slotkit_registry::{OverrideScope, SlotHost};

use crate::card;
use crate::cli::{Assignment, Cli, Command};

fn assign(key: &str, text: &str) -> Assignment {
	Assignment {
		key: key.to_string(),
		text: text.to_string(),
	}
}

#[test]
fn test_assignment_parsing() {
	assert_eq!("body=Hello=World".parse::<Assignment>().unwrap(), assign("body", "Hello=World"));
	assert_eq!("body=".parse::<Assignment>().unwrap(), assign("body", ""));
	assert!("body".parse::<Assignment>().is_err());
	assert!("=text".parse::<Assignment>().is_err());
}

#[test]
fn test_cli_parses_render_flags() {
	let cli = Cli::try_parse_from([
		"slotkit", "-v", "render", "-o", "header=Hi", "--scoped", "body=Scoped", "-d", "avatar=(AB)",
	])
	.unwrap();

	assert!(cli.verbose);
	match cli.command {
		Command::Render {
			overrides,
			scoped,
			deferred,
			delay_ms,
		} => {
			assert_eq!(overrides, [assign("header", "Hi")]);
			assert_eq!(scoped, [assign("body", "Scoped")]);
			assert_eq!(deferred, [assign("avatar", "(AB)")]);
			assert_eq!(delay_ms, 50);
		}
		other => panic!("unexpected command: {other:?}"),
	}
}

#[test]
fn test_check_requires_names() {
	assert!(Cli::try_parse_from(["slotkit", "check"]).is_err());
}

#[test]
fn test_macro_and_builder_tables_agree() {
	let built = card::profile_card(&SlotConfig::default()).unwrap();
	let declared = card::profile_card_default().unwrap();

	let keys = |t: &slotkit_registry::SlotTable| {
		t.iter()
			.map(|(_, d)| (d.key().to_string(), d.producer_name().map(str::to_string)))
			.collect::<Vec<_>>()
	};
	assert_eq!(keys(&built), keys(&declared));
}

#[test]
fn test_custom_suffix_card() {
	let config = SlotConfig::default().with_suffix("View").unwrap();
	let table = card::table_for(&config).unwrap();
	let header = table.decl(table.get("header").unwrap()).unwrap();
	assert_eq!(header.producer_name(), Some("headerView"));
}

#[test]
fn test_default_render_lines() {
	let host = SlotHost::new(card::profile_card_default().unwrap());
	assert_eq!(
		card::render_lines(&host),
		[
			"header: Profile",
			"avatar: (JD)",
			"body: No bio yet.",
			"actions: [Edit] [Share]",
		]
	);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_render_applies_all_override_layers() {
	let config = SlotConfig::default();
	let table = card::table_for(&config).unwrap();
	let scoped = card::assignments_to_map(&[assign("body", "Scoped bio"), assign("header", "Scoped")]);
	let overrides = [assign("header", "Instance")];
	let deferred = [assign("avatar", "(AB)")];

	let passes = OverrideScope::root()
		.provide(&scoped, |scope| {
			card::render(
				table,
				&config,
				scope.clone(),
				&overrides,
				&deferred,
				Duration::from_millis(5),
			)
		})
		.await;

	assert_eq!(passes.len(), 2);
	assert_eq!(passes[0][0], "header: Instance");
	assert_eq!(passes[0][1], "avatar: (JD)");
	assert_eq!(passes[0][2], "body: Scoped bio");
	assert_eq!(passes[1][1], "avatar: (AB)");
}

#[tokio::test]
async fn test_render_without_deferred_is_single_pass() {
	let config = SlotConfig::default();
	let table = card::table_for(&config).unwrap();
	let passes = card::render(table, &config, OverrideScope::root(), &[], &[], Duration::ZERO).await;
	assert_eq!(passes.len(), 1);
}
