//! # Catalogs
//!
//! Declarative descriptions of the bodies of a simulation, and their resolution into a
//! [`UniverseCatalog`](crate::universe::UniverseCatalog).
//!
//! ## Pipeline
//!
//! ```text
//! .json ──► CatalogDocument::from_json_str ─┐
//!                                           ├─► UniverseLoader::load_catalog ─► UniverseCatalog
//! .ssc  ──► parse_ssc ─► ssc_to_document ───┘          ▲
//!                                               BuiltinRegistry
//! ```
//!
//! - [`document`] – the in-memory document (name + open-ended item objects).
//! - [`quantity`] – dimensioned numbers (`"1.5 au"`, `"23.93 h"`) and epochs.
//! - [`specs`] – typed normalization of a single item.
//! - [`ssc_reader`] / [`ssc_transform`] – the legacy Celestia format, converted to current items.
//! - [`registry`] – builtin trajectories and rotation models injected into the loader.
//! - [`resolver`] – dependency ordering, per-item failures and entity construction.
//! - [`resources`] – search paths and the external files entities wait for.
pub mod document;
pub mod quantity;
pub mod registry;
pub mod resolver;
pub mod resources;
pub mod specs;
pub mod ssc_reader;
pub mod ssc_transform;

pub use document::CatalogDocument;
pub use registry::BuiltinRegistry;
pub use resolver::{ItemFailure, ResolveReport, UniverseLoader};
pub use resources::{ResourceKind, SearchPaths, UpdateReport};
