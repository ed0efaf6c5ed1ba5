//! # Orrery: ephemeris, builtins and universe in one place
//!
//! This module defines the [`Orrery`](crate::orrery::Orrery) struct, the façade a host application
//! drives. It wires together:
//!
//! 1. **Planetary ephemeris** – an optional [`JplEphemeris`] loaded once at start-up.
//! 2. **Builtin registry** – the ephemeris-derived orbits
//!    ([`install_ephemeris_builtins`]) and the rotation models that need no data
//!    ([`install_default_rotation_models`]).
//! 3. **Catalog loading** – `.json` and `.ssc` files resolved by the [`UniverseLoader`] into the
//!    [`UniverseCatalog`].
//! 4. **Resource boundary** – the ids of files the host must fetch, and the entry point to hand
//!    their data back.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use camino::Utf8Path;
//! use orrery::orrery::Orrery;
//!
//! let mut orrery = Orrery::new(Some(Utf8Path::new("data/de406.bin")));
//! let report = orrery.load_catalog_file(Utf8Path::new("data/solarsys.json")).unwrap();
//! for id in &report.resource_requests {
//!     // fetch `id`, then: orrery.apply_update(id, &bytes);
//! }
//! let mars = orrery.position("Mars", 0.0).unwrap();
//! ```
//!
//! ## Errors
//!
//! A missing or corrupt ephemeris does not prevent construction: the failure is logged, kept in
//! [`Orrery::ephemeris_error`], and only the rotation builtins are installed. Catalog items that
//! need the missing orbits then fail individually with
//! [`OrreryError::UnresolvedReference`].
use std::collections::BTreeSet;

use camino::Utf8Path;
use log::{error, info};
use nalgebra::{UnitQuaternion, Vector3};

use crate::{
    catalog::{
        document::CatalogDocument, registry::BuiltinRegistry, resolver::ResolveReport,
        resources::SearchPaths, ssc_transform::ssc_to_document, UniverseLoader, UpdateReport,
    },
    constants::TdbSeconds,
    jpl_ephem::JplEphemeris,
    orrery_errors::OrreryError,
    trajectory::builtin::{install_default_rotation_models, install_ephemeris_builtins},
    universe::UniverseCatalog,
};

#[derive(Debug)]
pub struct Orrery {
    ephemeris: Option<JplEphemeris>,
    ephemeris_error: Option<OrreryError>,
    loader: UniverseLoader,
    catalog: UniverseCatalog,
}

impl Orrery {
    /// Construct the façade, loading the ephemeris when a path is given.
    ///
    /// Arguments
    /// -----------------
    /// * `ephemeris_path`: location of a JPL DE binary file, or `None` to run without one
    ///
    /// Return
    /// ----------
    /// * An [`Orrery`] with its builtins installed and an empty catalog.
    ///
    /// See also
    /// ------------
    /// * [`Orrery::with_ephemeris`] – Construction from an ephemeris already in memory.
    pub fn new(ephemeris_path: Option<&Utf8Path>) -> Self {
        match ephemeris_path.map(JplEphemeris::load) {
            Some(Ok(ephemeris)) => Self::with_ephemeris(ephemeris),
            Some(Err(err)) => {
                error!("Planetary ephemeris unavailable, continuing without builtin orbits: {err}");
                let mut orrery = Self::build(None);
                orrery.ephemeris_error = Some(err);
                orrery
            }
            None => {
                info!("No planetary ephemeris configured");
                Self::build(None)
            }
        }
    }

    /// Construct the façade around a decoded ephemeris.
    pub fn with_ephemeris(ephemeris: JplEphemeris) -> Self {
        Self::build(Some(ephemeris))
    }

    fn build(ephemeris: Option<JplEphemeris>) -> Self {
        let mut builtins = BuiltinRegistry::new();
        if let Some(ephemeris) = &ephemeris {
            install_ephemeris_builtins(ephemeris, &mut builtins);
        }
        install_default_rotation_models(&mut builtins);

        Orrery {
            ephemeris,
            ephemeris_error: None,
            loader: UniverseLoader::new(builtins),
            catalog: UniverseCatalog::new(),
        }
    }

    pub fn ephemeris(&self) -> Option<&JplEphemeris> {
        self.ephemeris.as_ref()
    }

    /// Why the ephemeris given to [`Orrery::new`] could not be loaded.
    pub fn ephemeris_error(&self) -> Option<&OrreryError> {
        self.ephemeris_error.as_ref()
    }

    pub fn catalog(&self) -> &UniverseCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut UniverseCatalog {
        &mut self.catalog
    }

    pub fn loader(&self) -> &UniverseLoader {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut UniverseLoader {
        &mut self.loader
    }

    /// Resolve an in-memory document with the current search paths.
    pub fn load_catalog(&mut self, document: &CatalogDocument) -> ResolveReport {
        self.loader.load_catalog(document, &mut self.catalog)
    }

    /// Read and resolve a catalog file.
    ///
    /// The resource request set is reset first, so [`Orrery::resource_requests`] only lists
    /// what this file still needs. The format follows the extension: `.json` for current catalogs, searched for
    /// resources in the file's own directory, and `.ssc` for legacy catalogs, searched in the
    /// `data/`, `textures/medres/` and `models/` subdirectories.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: the catalog file
    ///
    /// Return
    /// ----------
    /// * The [`ResolveReport`] of the document, or an error if the file cannot be read, parsed,
    ///   or has an unknown extension ([`OrreryError::UnsupportedCatalogFormat`]).
    pub fn load_catalog_file(&mut self, path: &Utf8Path) -> Result<ResolveReport, OrreryError> {
        let dir = path.parent().unwrap_or(Utf8Path::new("."));
        let file_name = path.file_name().unwrap_or(path.as_str());
        let extension = path.extension().map(str::to_ascii_lowercase);

        let (document, search_paths) = match extension.as_deref() {
            Some("json") => {
                let mut document = CatalogDocument::from_json_str(&std::fs::read_to_string(path)?)?;
                if document.name.is_empty() {
                    document.name = file_name.to_string();
                }
                (document, SearchPaths::uniform(dir))
            }
            Some("ssc") => (
                ssc_to_document(file_name, &std::fs::read_to_string(path)?)?,
                SearchPaths::legacy_addon(dir),
            ),
            _ => return Err(OrreryError::UnsupportedCatalogFormat(path.to_string())),
        };

        info!("Loading catalog {path} ({} items)", document.items.len());
        self.loader.clear_resource_requests();
        self.loader.set_search_paths(search_paths);
        Ok(self.load_catalog(&document))
    }

    /// Hand the data of a requested resource to the entities waiting for it.
    pub fn apply_update(&mut self, id: &str, payload: &[u8]) -> UpdateReport {
        self.loader.apply_update(id, payload, &mut self.catalog)
    }

    pub fn resource_requests(&self) -> &BTreeSet<String> {
        self.loader.resource_requests()
    }

    pub fn clear_resource_requests(&mut self) {
        self.loader.clear_resource_requests();
    }

    /// Position of an entity relative to the solar-system barycenter, EquatorJ2000, km.
    pub fn position(&self, name: &str, t: TdbSeconds) -> Result<Vector3<f64>, OrreryError> {
        self.catalog.position(name, t)
    }

    /// Orientation of an entity's body-fixed axes in EquatorJ2000.
    pub fn orientation(&self, name: &str, t: TdbSeconds) -> Result<UnitQuaternion<f64>, OrreryError> {
        self.catalog.orientation(name, t)
    }
}

#[cfg(test)]
mod orrery_test {
    use super::*;
    use crate::{constants::J2000_JD, jpl_ephem::synthetic::SyntheticDataset};

    #[test]
    fn test_missing_ephemeris_keeps_rotation_builtins() {
        let orrery = Orrery::new(Some(Utf8Path::new("/nonexistent/de000.bin")));
        assert!(matches!(
            orrery.ephemeris_error(),
            Some(OrreryError::DatasetUnreadable { .. })
        ));
        assert!(orrery.ephemeris().is_none());
        assert!(orrery.loader().builtins().orbit_names().is_empty());
        assert!(orrery.loader().builtins().has_rotation_model("IAU Moon"));
    }

    #[test]
    fn test_with_ephemeris_installs_orbits() {
        let dataset = SyntheticDataset::new(J2000_JD - 64.0, 32.0, 4);
        let ephemeris = JplEphemeris::from_bytes(&dataset.to_bytes()).unwrap();
        let orrery = Orrery::with_ephemeris(ephemeris);
        assert!(orrery.ephemeris_error().is_none());
        assert!(orrery.loader().builtins().has_orbit("Earth"));
        assert!(orrery.catalog().is_empty());
    }

    #[test]
    fn test_unsupported_extension() {
        let mut orrery = Orrery::new(None);
        assert_eq!(
            orrery
                .load_catalog_file(Utf8Path::new("catalog.xml"))
                .unwrap_err(),
            OrreryError::UnsupportedCatalogFormat("catalog.xml".into())
        );
    }
}
