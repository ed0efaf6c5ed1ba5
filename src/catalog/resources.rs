//! External files referenced by catalog items.
//!
//! The crate never fetches anything. A texture, mesh or sampled-trajectory file that is neither
//! on the local search path nor already delivered becomes a *resource id* that the host reads
//! from [`ResolveReport::resource_requests`](super::resolver::ResolveReport). When the data
//! arrives, the host hands it back through
//! [`UniverseLoader::apply_update`](super::resolver::UniverseLoader::apply_update).
//!
//! The id is the URL itself for remote sources and the joined search path for local files that
//! are missing.
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};

use crate::{
    orrery_errors::OrreryError,
    trajectory::{sampled::SampledTrajectory, tle::TleTrajectory, SharedTrajectory},
    universe::{Entity, Geometry, ResourceRef, ResourceState, UniverseCatalog},
};

use super::resolver::ItemFailure;

/// Directories searched for the files a catalog refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaths {
    /// Sampled trajectory tables.
    pub data: Utf8PathBuf,
    pub textures: Utf8PathBuf,
    pub models: Utf8PathBuf,
}

impl Default for SearchPaths {
    fn default() -> Self {
        Self::uniform(Utf8Path::new("."))
    }
}

impl SearchPaths {
    /// Every kind of file next to each other in `dir`, as current catalogs expect.
    pub fn uniform(dir: &Utf8Path) -> Self {
        SearchPaths {
            data: dir.to_path_buf(),
            textures: dir.to_path_buf(),
            models: dir.to_path_buf(),
        }
    }

    /// The add-on layout of legacy SSC catalogs: `data/`, `textures/medres/`, `models/`.
    pub fn legacy_addon(dir: &Utf8Path) -> Self {
        SearchPaths {
            data: dir.join("data"),
            textures: dir.join("textures").join("medres"),
            models: dir.join("models"),
        }
    }
}

/// What a pending resource will become once delivered.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceKind {
    Texture,
    Mesh,
    /// A `JD x y z` table; the period is the hint declared by the item.
    SampledTrajectory { period: f64 },
    /// A two-line element set holding `satellite`.
    TleSet { satellite: String },
}

/// Where a source string points.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Located {
    Local(Utf8PathBuf),
    Missing(String),
}

pub(crate) fn locate(source: &str, dir: &Utf8Path) -> Located {
    if source.contains("://") {
        return Located::Missing(source.to_string());
    }
    let path = dir.join(source);
    if path.is_file() {
        Located::Local(path)
    } else {
        Located::Missing(path.into_string())
    }
}

impl Located {
    /// Reference for an entity; missing sources start out pending.
    pub(crate) fn into_ref(self) -> ResourceRef {
        match self {
            Located::Local(path) => ResourceRef {
                id: path.to_string(),
                state: ResourceState::Local(path),
            },
            Located::Missing(id) => ResourceRef {
                id,
                state: ResourceState::Pending,
            },
        }
    }
}

/// Outcome of one `apply_update` call.
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// Entities that now use the delivered data.
    pub applied: Vec<String>,
    /// Entities that were removed or redefined without this resource.
    pub skipped: Vec<String>,
    /// Entities whose payload could not be used; their previous state is unchanged.
    pub failures: Vec<ItemFailure>,
}

/// Pending resources and the entities waiting for them.
#[derive(Debug, Default)]
pub(crate) struct ResourceTracker {
    pending: BTreeMap<String, Vec<(String, ResourceKind)>>,
    requests: BTreeSet<String>,
}

impl ResourceTracker {
    pub(crate) fn request(&mut self, id: &str, entity: &str, kind: ResourceKind) {
        let waiting = self.pending.entry(id.to_string()).or_default();
        if !waiting.iter().any(|(e, k)| e == entity && k == &kind) {
            waiting.push((entity.to_string(), kind));
        }
        self.requests.insert(id.to_string());
    }

    pub(crate) fn requests(&self) -> &BTreeSet<String> {
        &self.requests
    }

    pub(crate) fn clear_requests(&mut self) {
        self.requests.clear();
    }

    /// Deliver `payload` to every entity waiting for `id`.
    ///
    /// Pending entries are kept, so delivering the same payload again yields the same state.
    pub(crate) fn apply(
        &self,
        id: &str,
        payload: &[u8],
        catalog: &mut UniverseCatalog,
    ) -> UpdateReport {
        let mut report = UpdateReport::default();
        let Some(waiting) = self.pending.get(id) else {
            warn!("Ignoring update for unknown resource '{id}'");
            return report;
        };

        let payload = Arc::new(payload.to_vec());
        for (name, kind) in waiting {
            let Some(entity) = catalog.entity_mut(name) else {
                report.skipped.push(name.clone());
                continue;
            };

            let outcome = match kind {
                ResourceKind::SampledTrajectory { period } => {
                    replace_trajectory(entity, id, &payload, |text| {
                        Ok(Arc::new(SampledTrajectory::from_xyz_str(text, *period)?) as SharedTrajectory)
                    })
                }
                ResourceKind::TleSet { satellite } => {
                    replace_trajectory(entity, id, &payload, |text| {
                        Ok(Arc::new(TleTrajectory::from_set(text, satellite)?) as SharedTrajectory)
                    })
                }
                ResourceKind::Texture => Ok(match &mut entity.geometry {
                    Some(Geometry::Globe {
                        base_map: Some(resource),
                        ..
                    }) if resource.id == id => {
                        resource.state = ResourceState::Received(Arc::clone(&payload));
                        true
                    }
                    _ => false,
                }),
                ResourceKind::Mesh => Ok(match &mut entity.geometry {
                    Some(Geometry::Mesh { source, .. }) if source.id == id => {
                        source.state = ResourceState::Received(Arc::clone(&payload));
                        true
                    }
                    _ => false,
                }),
            };

            match outcome {
                Ok(true) => {
                    debug!("Applied resource '{id}' to '{name}'");
                    report.applied.push(name.clone());
                }
                Ok(false) => {
                    debug!("'{name}' no longer uses resource '{id}'");
                    report.skipped.push(name.clone());
                }
                Err(error) => {
                    warn!("Resource '{id}' is unusable for '{name}': {error}");
                    report.failures.push(ItemFailure {
                        name: name.clone(),
                        error,
                    });
                }
            }
        }
        report
    }
}

/// Swap in the trajectory decoded from `payload` if `entity` still waits for `id`.
fn replace_trajectory(
    entity: &mut Entity,
    id: &str,
    payload: &Arc<Vec<u8>>,
    decode: impl FnOnce(&str) -> Result<SharedTrajectory, OrreryError>,
) -> Result<bool, OrreryError> {
    match &mut entity.trajectory_resource {
        Some(resource) if resource.id == id => {
            let text = std::str::from_utf8(payload).map_err(|e| OrreryError::ParseError {
                line: 0,
                message: format!("trajectory data is not UTF-8 text: {e}"),
            })?;
            entity.trajectory = decode(text)?;
            resource.state = ResourceState::Received(Arc::clone(payload));
            Ok(true)
        }
        _ => Ok(false),
    }
}
