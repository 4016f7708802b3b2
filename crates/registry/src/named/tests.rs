use pretty_assertions::assert_eq;

use super::{InsertOutcome, NamedRegistry};
use crate::Asset;
use crate::defs::SkillDef;
use crate::handle::Handle;

#[derive(Debug)]
struct Y {
	name: &'static str,
}

impl Asset for Y {
	const TYPE_NAME: &'static str = "Y";

	fn name(&self) -> &str {
		self.name
	}
}

fn pairs<T: Asset>(registry: &NamedRegistry<T>) -> Vec<(String, usize)> {
	registry.iter().map(|info| (info.name.to_string(), info.asset.addr())).collect()
}

#[test]
fn second_insert_of_same_handle_is_noop() {
	let mut registry = NamedRegistry::new("skills");
	let skill = Handle::new(SkillDef::new("Slash"));

	assert!(registry.add(skill.clone()).is_inserted());
	let before = pairs(&registry);

	let second = registry.add(skill.clone());
	assert_eq!(second, InsertOutcome::AlreadyPresent { name: "Slash".into() });
	assert_eq!(pairs(&registry), before);
	assert_eq!(registry.len(), 1);
}

#[test]
fn explicit_name_ignored_for_duplicate_handle() {
	let mut registry = NamedRegistry::new("skills");
	let skill = Handle::new(SkillDef::new("Slash"));
	registry.add(skill.clone());

	let outcome = registry.insert(skill.clone(), Some("Other"));
	assert!(!outcome.is_inserted());
	assert_eq!(outcome.name(), "Slash");
	assert!(registry.find("Other").is_none());
}

#[test]
fn collision_assigns_generated_name() {
	let mut registry = NamedRegistry::new("y");
	let x = Handle::new(Y { name: "Alpha" });
	let y = Handle::new(Y { name: "Beta" });

	assert_eq!(registry.insert(x.clone(), Some("Alpha")).name(), "Alpha");
	let outcome = registry.insert(y.clone(), Some("Alpha"));

	assert!(outcome.is_inserted());
	assert_eq!(outcome.name(), "Y_1");
	assert_eq!(registry.len(), 2);
	assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Alpha", "Y_1"]);
	assert!(Handle::ptr_eq(registry.find("Alpha").unwrap(), &x));
	assert!(Handle::ptr_eq(registry.find("Y_1").unwrap(), &y));
	assert_eq!(registry.name_of(&y), Some("Y_1"));
}

#[test]
fn blank_name_falls_back_to_type_and_count() {
	let mut registry = NamedRegistry::new("skills");
	registry.add(Handle::new(SkillDef::new("Slash")));
	registry.add(Handle::new(SkillDef::new("Dash")));

	let outcome = registry.add(Handle::new(SkillDef::new("   ")));
	assert_eq!(outcome.name(), "SkillDef_2");
}

#[test]
fn generated_name_skips_taken_candidates() {
	let mut registry = NamedRegistry::new("y");
	registry.add(Handle::new(Y { name: "Y_1" }));

	// count is 1, but "Y_1" is already owned by the first entry.
	let outcome = registry.add(Handle::new(Y { name: "" }));
	assert_eq!(outcome.name(), "Y_2");
	assert_eq!(registry.len(), 2);
}

#[test]
fn sorted_after_every_insert() {
	let mut registry = NamedRegistry::new("skills");
	for name in ["Zap", "Bash", "Mend", "", "Aim", "Bash"] {
		registry.add(Handle::new(SkillDef::new(name)));
		let names: Vec<_> = registry.names().collect();
		let mut sorted = names.clone();
		sorted.sort();
		assert_eq!(names, sorted);
	}
	assert_eq!(registry.len(), 6);
}

#[test]
fn name_provider_takes_precedence_over_asset_name() {
	let mut registry = NamedRegistry::with_name_provider("skills", |skill: &SkillDef| format!("skill.{}", skill.name));
	registry.add(Handle::new(SkillDef::new("Slash")));
	assert!(registry.contains_name("skill.Slash"));

	let explicit = registry.insert(Handle::new(SkillDef::new("Dash")), Some("custom"));
	assert_eq!(explicit.name(), "custom");
}

#[test]
fn same_value_different_handles_both_register() {
	let mut registry = NamedRegistry::new("skills");
	let a = Handle::new(SkillDef::new("Slash"));
	let b = Handle::new(SkillDef::new("Slash"));

	registry.add(a.clone());
	let outcome = registry.add(b.clone());

	assert!(outcome.is_inserted());
	assert_eq!(outcome.name(), "SkillDef_1");
	assert!(registry.contains(&a));
	assert!(registry.contains(&b));
}
