//! Named content registries.
//!
//! This crate owns everything that holds committed content:
//!
//! - [`Handle`] - shared artifact reference with identity semantics
//! - [`NamedRegistry`] - ordered, name-indexed, duplicate-safe registry for one category
//! - [`ContentPack`] - one registry per [`Category`]; the merge target for extensions
//! - [`router`] - places an [`AnyAsset`] into the right registries
//! - [`slots`] - wires registry contents into typed access points
//!
//! Loading content and driving extensions lives in `cairn-content`.

mod asset;
pub mod defs;
mod handle;
pub mod named;
pub mod pack;
pub mod router;
pub mod slots;

pub use asset::Asset;
pub use handle::Handle;
pub use named::{AssetInfo, InsertOutcome, NameProvider, NamedRegistry};
pub use pack::{Category, ContentPack, PackAsset};
pub use router::{AnyAsset, AssetCollection, RouteSummary, add_from_collection, add_from_collection_filtered, panic_message, route};
pub use slots::{Slot, SlotReport, SlotTarget, populate_slots};
