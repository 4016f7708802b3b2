//! Plain-text output for the loaded engine.

use cairn_content::{Engine, EquipmentSlot, EventTextRequest, LoadSummary, UnitState};
use cairn_registry::ContentPack;

pub fn print_extensions(summary: &LoadSummary) {
	for extension in &summary.extensions {
		println!(
			"{}: {} committed, {} skipped, {} failed, {} merged ({} routed from collections)",
			extension.extension, extension.committed, extension.skipped, extension.failed, extension.merged, extension.routed.routed
		);
		for outcome in &extension.outcomes {
			if let UnitState::Failed { stage, error } = &outcome.state {
				println!("  {} failed during {stage}: {error}", outcome.unit);
			}
		}
		for failure in &extension.discovery_failures {
			println!("  {failure}");
		}
	}
	if summary.lost_extensions > 0 {
		println!("{} extension task(s) lost", summary.lost_extensions);
	}
}

/// Every non-empty registry with its names.
pub fn print_pack(pack: &ContentPack) {
	println!("{} entries", pack.total_len());
	for (category, len) in pack.summary() {
		println!("  {category} ({len}): {}", pack.names_of(category).join(", "));
	}
}

pub fn print_equipment(engine: &Engine) {
	let Some(view) = engine.equipment().view() else {
		println!("equipment: not initialized");
		return;
	};

	let elites: Vec<&str> = view.elite_defs().iter().map(|elite| elite.name.as_str()).collect();
	println!(
		"equipment: {} total, {} elite, {} non-elite; elites: {}",
		view.all().len(),
		view.elite().len(),
		view.non_elite().len(),
		elites.join(", ")
	);

	for entry in view.all() {
		let mut slot = EquipmentSlot::new("cli");
		let handled = engine.equipment().perform_action(&mut slot, &entry.asset, |_, _| false);
		println!("  {}: activation {}", entry.asset.name, if handled { "handled" } else { "declined" });
	}
}

pub fn print_overlays(engine: &Engine) {
	let overlays = engine.overlays().overlays().unwrap_or_default();
	for (status, material) in overlays {
		println!("overlay: {} -> {}", status.name, material.name);
	}
}

pub fn print_banner(banner: &EventTextRequest) {
	let outline = banner.outline_color();
	println!(
		"banner: {} for {:.1}s (phase {:.1}s), outline rgb({:.2}, {:.2}, {:.2})",
		banner.token,
		banner.duration,
		banner.phase_duration(),
		outline.r,
		outline.g,
		outline.b
	);
}
