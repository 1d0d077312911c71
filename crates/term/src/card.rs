//! The sample container rendered by the CLI.

use std::sync::Arc;
use std::time::Duration;

use slotkit_registry::{
	DeclError, OverrideMap, OverrideScope, Producer, SlotConfig, SlotHost, SlotKey, SlotTable, Text,
	View, slot_table,
};

use crate::cli::Assignment;

/// Avatar placeholder shown until a picture is available.
#[derive(Debug, Clone, Copy)]
pub struct Initials(pub char, pub char);

impl View for Initials {
	fn render(&self) -> String {
		format!("({}{})", self.0, self.1)
	}
}

/// Declares the profile card's slots.
pub fn profile_card(config: &SlotConfig) -> Result<Arc<SlotTable>, DeclError> {
	let suffix = &config.suffix;
	SlotTable::builder("ProfileCard")
		.with_config(config)
		.slot(format!("header{suffix}"), || Text::new("Profile"))
		.slot(format!("avatar{suffix}"), || Initials('J', 'D'))
		.slot(format!("body{suffix}"), || Text::new("No bio yet."))
		.slot_as(format!("footer{suffix}"), "actions", || Text::new("[Edit] [Share]"))
		.build()
}

/// Declares the card with the default suffix through the macro form.
pub fn profile_card_default() -> Result<Arc<SlotTable>, DeclError> {
	slot_table! {
		container = "ProfileCard";
		header_view => || Text::new("Profile"),
		avatar_view => || Initials('J', 'D'),
		body_view => || Text::new("No bio yet."),
		footer_view as "actions" => || Text::new("[Edit] [Share]"),
	}
}

/// Returns the card table for `config`, preferring the macro form for the default suffix.
pub fn table_for(config: &SlotConfig) -> Result<Arc<SlotTable>, DeclError> {
	if config.suffix == slotkit_config::DEFAULT_SUFFIX {
		profile_card_default()
	} else {
		profile_card(config)
	}
}

/// Builds an override mapping from command-line pairs. Invalid keys are skipped.
pub fn assignments_to_map(pairs: &[Assignment]) -> OverrideMap {
	pairs
		.iter()
		.filter_map(|a| {
			let key = SlotKey::new(&a.key).ok()?;
			let text = a.text.clone();
			Some((key, Producer::new(move || Text::new(text.clone()))))
		})
		.collect()
}

/// Renders every slot as `key: output` lines.
pub fn render_lines(host: &SlotHost) -> Vec<String> {
	host.render_all()
		.into_iter()
		.map(|(key, view)| format!("{key}: {}", view.render()))
		.collect()
}

/// Renders the card inside `scope`, applying instance overrides, then applies deferred
/// overrides from a background task and renders again once the store reports the change.
pub async fn render(
	table: Arc<SlotTable>,
	config: &SlotConfig,
	scope: OverrideScope,
	overrides: &[Assignment],
	deferred: &[Assignment],
	delay: Duration,
) -> Vec<Vec<String>> {
	let mut host = SlotHost::with_config(table, config).with_scope(scope);
	for a in overrides {
		let text = a.text.clone();
		host = host.override_slot(&a.key, move || Text::new(text.clone()));
	}

	let mut passes = vec![render_lines(&host)];
	let late = assignments_to_map(deferred);
	if late.is_empty() {
		return passes;
	}

	let mut changes = host.subscribe();
	let store = host.store();
	let task = tokio::spawn(async move {
		tokio::time::sleep(delay).await;
		tracing::info!(count = late.len(), "applying deferred overrides");
		for (key, producer) in late {
			store.set(key, producer);
		}
	});

	if changes.changed().await.is_ok() {
		// Let the task finish the batch so the second pass sees all of it.
		if let Err(error) = task.await {
			tracing::warn!(%error, "deferred override task failed");
		}
		passes.push(render_lines(&host));
	}
	passes
}
