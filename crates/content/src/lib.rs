//! Content loading.
//!
//! Extensions declare their content units through [`Extension::builder`].
//! The [`Engine`] discovers them, runs each through the [`ExtensionPipeline`]
//! into a per-extension pack and merges the packs into its own
//! [`ContentPack`](cairn_registry::ContentPack).
//!
//! # Module map
//!
//! - [`unit`] - content unit capabilities
//! - [`discovery`] - explicit registration and unit instantiation
//! - [`pipeline`] - load, initialize, commit
//! - [`engine`] - extension ownership, concurrent loading, merge
//! - [`driver`] - cooperative tick driver for hosts without a runtime
//! - [`equipment`] - equipment partition view built at steady state
//! - [`overlays`], [`event_text`] - UI collaborators

pub mod config;
pub mod discovery;
pub mod driver;
pub mod engine;
pub mod equipment;
mod error;
pub mod event_text;
mod gates;
pub mod overlays;
pub mod pipeline;
pub mod unit;

#[doc(hidden)]
pub use inventory;

pub use config::{EngineConfig, GateConfig, PipelineConfig};
pub use discovery::{Discovered, Extension, ExtensionBuilder, UnitRegistration, discover, discover_prefabs};
pub use driver::{Tick, TickDriver};
pub use engine::{Engine, ExtensionLoad, ExtensionSummary, LoadReport, LoadSummary, load_extension};
pub use equipment::{EquipmentEntry, EquipmentModule, EquipmentView};
pub use error::{ConfigError, DiscoveryError, DriverError, EngineError, UnitError};
pub use event_text::{Color, EventTextQueue, EventTextRequest, EventTextSink};
pub use gates::FeatureGates;
pub use overlays::{Material, OverlayRegistration, StatusOverlays};
pub use pipeline::{Committed, ExtensionPipeline, PipelineReport, Stage, UnitOutcome, UnitState};
pub use unit::{ContentUnit, EliteUnit, EquipmentSlot, EquipmentUnit, IntoUnit, MarkedUnit, PackModifier, UnitKind};

/// Re-exported for unit implementors.
pub use async_trait::async_trait;
