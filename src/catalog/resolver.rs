//! # Catalog resolution
//!
//! [`UniverseLoader::load_catalog`] turns a [`CatalogDocument`] into entities of a
//! [`UniverseCatalog`]. Every item goes through
//!
//! ```text
//! Declared → Normalized → ReferencesChecked → Resolved
//!        ↘            ↘                   ↘
//!                     Failed(reason)
//! ```
//!
//! and only resolved items are upserted. Items may refer to each other in any order: the
//! loader collects the names each item uses, orders the items with Kahn's algorithm, and then
//! builds them so that every dependency exists before its dependents.
//!
//! ## Reference lookup
//!
//! A name is looked up in the document being loaded, then in the catalog, trying in turn
//! 1. the name as written,
//! 2. the last component of a slash path (`Sol/Mars` → `Mars`),
//! 3. `Sun` for the legacy root star `Sol`.
//!
//! Trajectory and rotation names first match the [`BuiltinRegistry`], and only then another
//! item whose trajectory or rotation model is shared.
use std::{
    collections::{BTreeSet, HashMap, HashSet, VecDeque},
    sync::Arc,
};

use ahash::RandomState;
use camino::Utf8Path;
use log::{debug, info, warn};

use crate::{
    frame::Frame,
    orrery_errors::OrreryError,
    rotation::SharedRotationModel,
    trajectory::{
        fixed_point::FixedPointTrajectory, keplerian::KeplerianTrajectory,
        linear_combination::LinearCombinationTrajectory, sampled::SampledTrajectory,
        tle::TleTrajectory, SharedTrajectory,
    },
    universe::{BodyInfo, Entity, Geometry, ResourceRef, UniverseCatalog},
};

use super::{
    document::CatalogDocument,
    registry::BuiltinRegistry,
    resources::{locate, Located, ResourceKind, ResourceTracker, SearchPaths, UpdateReport},
    specs::{FrameSpec, GeometrySpec, ItemSpec, ReferenceKind, RotationSpec, TrajectorySpec},
};

/// An item that could not be resolved, and why.
#[derive(Debug, PartialEq)]
pub struct ItemFailure {
    pub name: String,
    pub error: OrreryError,
}

/// Result of loading one catalog document.
#[derive(Debug, Default)]
pub struct ResolveReport {
    /// Upserted entity names, in dependency order.
    pub bodies: Vec<String>,
    /// Items that were dropped, in document order.
    pub failures: Vec<ItemFailure>,
    /// Resource ids this document asked for.
    pub resource_requests: BTreeSet<String>,
}

impl ResolveReport {
    /// Reason an item was dropped, if it was.
    pub fn failure(&self, name: &str) -> Option<&OrreryError> {
        self.failures
            .iter()
            .find_map(|f| (f.name == name).then_some(&f.error))
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Everything needed to build one item once its references are known.
struct Pending {
    /// Position in the document, for failure ordering.
    index: usize,
    spec: ItemSpec,
    /// Written reference name → canonical entity name.
    canonical: HashMap<String, String, RandomState>,
    /// Indices of document items this one depends on.
    deps: Vec<usize>,
    failure: Option<OrreryError>,
}

/// A built item, ready to be upserted.
struct Built {
    entity: Entity,
    info: BodyInfo,
    requests: Vec<(String, ResourceKind)>,
}

fn candidates(name: &str) -> Vec<&str> {
    let mut out = vec![name];
    let last = name.rsplit('/').next().unwrap_or(name);
    if last != name {
        out.push(last);
    }
    if last == "Sol" {
        out.push("Sun");
    }
    out
}

fn unresolved(item: &str, reference: &str) -> OrreryError {
    OrreryError::UnresolvedReference {
        item: item.to_string(),
        reference: reference.to_string(),
    }
}

/// Resolves catalog documents against the builtins and the entities already in a catalog.
#[derive(Debug)]
pub struct UniverseLoader {
    builtins: BuiltinRegistry,
    search_paths: SearchPaths,
    resources: ResourceTracker,
}

impl UniverseLoader {
    pub fn new(builtins: BuiltinRegistry) -> Self {
        UniverseLoader {
            builtins,
            search_paths: SearchPaths::default(),
            resources: ResourceTracker::default(),
        }
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    pub fn builtins_mut(&mut self) -> &mut BuiltinRegistry {
        &mut self.builtins
    }

    pub fn search_paths(&self) -> &SearchPaths {
        &self.search_paths
    }

    pub fn set_search_paths(&mut self, search_paths: SearchPaths) {
        self.search_paths = search_paths;
    }

    /// Resource ids requested since the last [`clear_resource_requests`](Self::clear_resource_requests).
    pub fn resource_requests(&self) -> &BTreeSet<String> {
        self.resources.requests()
    }

    /// Forget the request set; entities still waiting keep accepting updates.
    pub fn clear_resource_requests(&mut self) {
        self.resources.clear_requests();
    }

    /// Deliver the data of a requested resource.
    ///
    /// Arguments
    /// ---------
    /// * `id`: a resource id previously reported in a resource request
    /// * `payload`: the raw file content
    /// * `catalog`: the catalog holding the waiting entities
    ///
    /// Return
    /// ------
    /// * which entities took the update, which were skipped because they no longer use the
    ///   resource, and which rejected the payload; unknown ids give an empty report
    pub fn apply_update(
        &mut self,
        id: &str,
        payload: &[u8],
        catalog: &mut UniverseCatalog,
    ) -> UpdateReport {
        self.resources.apply(id, payload, catalog)
    }

    /// Resolve a document into `catalog`.
    ///
    /// Failures are per item: an item that is malformed, refers to an unknown name, depends on a
    /// dropped item or sits on a reference cycle is reported in
    /// [`ResolveReport::failures`] and everything else is still upserted. Redeclared names
    /// replace earlier entities.
    pub fn load_catalog(
        &mut self,
        document: &CatalogDocument,
        catalog: &mut UniverseCatalog,
    ) -> ResolveReport {
        let mut report = ResolveReport::default();
        if document.is_empty() {
            info!("Catalog '{}' declares no items", document.name);
            return report;
        }

        let mut failures: Vec<(usize, ItemFailure)> = Vec::new();
        let mut items = self.normalize(document, &mut failures);
        self.check_references(&mut items, catalog);
        reject_closed_chains(&mut items, catalog);
        let order = order_items(&mut items);

        let mut dropped = vec![false; items.len()];
        for (i, item) in items.iter_mut().enumerate() {
            if let Some(error) = item.failure.take() {
                dropped[i] = true;
                failures.push((
                    item.index,
                    ItemFailure {
                        name: item.spec.name.clone(),
                        error,
                    },
                ));
            }
        }

        for i in order {
            let item = &items[i];
            let result = match item.deps.iter().find(|&&d| dropped[d]) {
                Some(&d) => Err(unresolved(&item.spec.name, &items[d].spec.name)),
                None => self.build(item, catalog),
            };
            match result {
                Ok(built) => {
                    let name = built.entity.name.clone();
                    for (id, kind) in &built.requests {
                        self.resources.request(id, &name, kind.clone());
                        report.resource_requests.insert(id.clone());
                    }
                    debug!("Resolved '{name}'");
                    catalog.upsert(&name, built.entity, built.info);
                    report.bodies.push(name);
                }
                Err(error) => {
                    dropped[i] = true;
                    failures.push((
                        item.index,
                        ItemFailure {
                            name: item.spec.name.clone(),
                            error,
                        },
                    ));
                }
            }
        }

        failures.sort_by_key(|(index, _)| *index);
        for (_, failure) in &failures {
            warn!("Dropped catalog item '{}': {}", failure.name, failure.error);
        }
        report.failures = failures.into_iter().map(|(_, f)| f).collect();

        info!(
            "Catalog '{}': {} bodies resolved, {} dropped, {} resources pending",
            document.name,
            report.bodies.len(),
            report.failures.len(),
            report.resource_requests.len()
        );
        report
    }

    /// Normalize items and drop earlier duplicates.
    fn normalize(
        &self,
        document: &CatalogDocument,
        failures: &mut Vec<(usize, ItemFailure)>,
    ) -> Vec<Pending> {
        let mut items: Vec<Option<Pending>> = Vec::with_capacity(document.items.len());
        let mut by_name: HashMap<String, usize, RandomState> = HashMap::default();

        for (index, raw) in document.items.iter().enumerate() {
            let spec = match ItemSpec::from_value(raw, index) {
                Ok(spec) => spec,
                Err(error) => {
                    let name = match &error {
                        OrreryError::InvalidItem { item, .. } => item.clone(),
                        _ => format!("#{index}"),
                    };
                    // a malformed redeclaration still replaces the earlier definition
                    if let Some(slot) = by_name.remove(&name) {
                        warn!(
                            "Catalog '{}' redeclares '{name}' with an invalid item, dropping both",
                            document.name
                        );
                        items[slot] = None;
                    }
                    failures.push((index, ItemFailure { name, error }));
                    continue;
                }
            };
            let pending = Pending {
                index,
                spec,
                canonical: HashMap::default(),
                deps: Vec::new(),
                failure: None,
            };
            match by_name.get(&pending.spec.name) {
                Some(&slot) => {
                    warn!(
                        "Catalog '{}' declares '{}' twice, keeping the later definition",
                        document.name, pending.spec.name
                    );
                    items[slot] = Some(pending);
                }
                None => {
                    by_name.insert(pending.spec.name.clone(), items.len());
                    items.push(Some(pending));
                }
            }
        }
        items.into_iter().flatten().collect()
    }

    /// Canonical entity name for `name`, and its document index if it is declared there.
    fn lookup_entity(
        name: &str,
        own: &str,
        by_name: &HashMap<&str, usize, RandomState>,
        catalog: &UniverseCatalog,
        allow_self: bool,
    ) -> Option<(String, Option<usize>)> {
        candidates(name)
            .into_iter()
            .filter(|c| allow_self || *c != own)
            .find_map(|c| match by_name.get(c) {
                Some(&i) => Some((c.to_string(), Some(i))),
                None => catalog.contains(c).then(|| (c.to_string(), None)),
            })
    }

    fn check_references(&self, items: &mut [Pending], catalog: &UniverseCatalog) {
        let names: Vec<String> = items.iter().map(|p| p.spec.name.clone()).collect();
        let by_name: HashMap<&str, usize, RandomState> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();

        for item in items.iter_mut() {
            let own = item.spec.name.clone();
            for reference in item.spec.references() {
                let name = reference.name.as_str();
                let found = match reference.kind {
                    ReferenceKind::BuiltinTrajectory => {
                        self.builtins.has_orbit(name).then_some(None)
                    }
                    ReferenceKind::BuiltinRotation => {
                        self.builtins.has_rotation_model(name).then_some(None)
                    }
                    ReferenceKind::Trajectory if self.builtins.has_orbit(name) => Some(None),
                    ReferenceKind::Rotation if self.builtins.has_rotation_model(name) => {
                        Some(None)
                    }
                    // sharing one's own trajectory or rotation model is meaningless
                    ReferenceKind::Trajectory | ReferenceKind::Rotation => {
                        Self::lookup_entity(name, &own, &by_name, catalog, false).map(Some)
                    }
                    ReferenceKind::Center | ReferenceKind::Frame => {
                        Self::lookup_entity(name, &own, &by_name, catalog, true).map(Some)
                    }
                };

                match found {
                    None => {
                        item.failure.get_or_insert_with(|| unresolved(&own, name));
                    }
                    Some(None) => {}
                    Some(Some((canonical, index))) => {
                        if let Some(i) = index {
                            if !item.deps.contains(&i) {
                                item.deps.push(i);
                            }
                        }
                        item.canonical.insert(name.to_string(), canonical);
                    }
                }
            }
        }
    }

    fn canonical<'p>(item: &'p Pending, name: &'p str) -> &'p str {
        item.canonical.get(name).map_or(name, String::as_str)
    }

    /// Canonical names of the centers and frame bodies an item is evaluated through.
    fn chain_links(item: &Pending) -> Vec<String> {
        item.spec
            .references()
            .into_iter()
            .filter(|r| matches!(r.kind, ReferenceKind::Center | ReferenceKind::Frame))
            .map(|r| Self::canonical(item, &r.name).to_string())
            .collect()
    }

    fn build(&self, item: &Pending, catalog: &UniverseCatalog) -> Result<Built, OrreryError> {
        let spec = &item.spec;
        let mut requests = Vec::new();

        let external = match &spec.trajectory {
            TrajectorySpec::Sampled { source, period } => {
                Some((source, ResourceKind::SampledTrajectory { period: *period }))
            }
            TrajectorySpec::Tle { source, satellite } => Some((
                source,
                ResourceKind::TleSet {
                    satellite: satellite.clone(),
                },
            )),
            _ => None,
        };
        let (trajectory, trajectory_resource) = match external {
            Some((source, kind)) => match locate(source, &self.search_paths.data) {
                Located::Local(path) => (
                    self.load_trajectory(&spec.name, &path, &kind)?,
                    Some(Located::Local(path).into_ref()),
                ),
                missing @ Located::Missing(_) => {
                    let resource = missing.into_ref();
                    requests.push((resource.id.clone(), kind));
                    let placeholder: SharedTrajectory = Arc::new(FixedPointTrajectory::origin());
                    (placeholder, Some(resource))
                }
            },
            None => (self.build_trajectory(item, &spec.trajectory, catalog)?, None),
        };

        let rotation_model = spec
            .rotation
            .as_ref()
            .map(|r| self.build_rotation(item, r, catalog))
            .transpose()?;

        let geometry = spec.geometry.as_ref().map(|g| match g {
            GeometrySpec::Globe { radii, base_map } => Geometry::Globe {
                radii: *radii,
                base_map: base_map.as_ref().map(|map| {
                    self.resource(map, &self.search_paths.textures, ResourceKind::Texture, &mut requests)
                }),
            },
            GeometrySpec::Mesh { source, size } => Geometry::Mesh {
                source: self.resource(source, &self.search_paths.models, ResourceKind::Mesh, &mut requests),
                size: *size,
            },
        });

        let mut info = spec.info.clone();
        if let Some(plot) = info.trajectory_plot.as_mut() {
            if plot.duration.is_nan() {
                plot.duration = trajectory.period();
            }
        }

        let entity = Entity {
            name: spec.name.clone(),
            center: spec
                .center
                .as_deref()
                .map(|c| Self::canonical(item, c).to_string()),
            trajectory,
            trajectory_frame: Self::frame(item, &spec.trajectory_frame),
            rotation_model,
            body_frame: Self::frame(item, &spec.body_frame),
            geometry,
            trajectory_resource,
        };

        Ok(Built {
            entity,
            info,
            requests,
        })
    }

    fn frame(item: &Pending, spec: &FrameSpec) -> Frame {
        match spec {
            FrameSpec::Inertial(frame) => frame.clone(),
            FrameSpec::BodyFixed(body) => Frame::BodyFixed(Self::canonical(item, body).to_string()),
        }
    }

    fn resource(
        &self,
        source: &str,
        dir: &Utf8Path,
        kind: ResourceKind,
        requests: &mut Vec<(String, ResourceKind)>,
    ) -> ResourceRef {
        let resource = locate(source, dir).into_ref();
        if resource.is_pending() {
            requests.push((resource.id.clone(), kind));
        }
        resource
    }

    /// Decode a local sampled table or TLE set.
    fn load_trajectory(
        &self,
        item: &str,
        path: &Utf8Path,
        kind: &ResourceKind,
    ) -> Result<SharedTrajectory, OrreryError> {
        let text = std::fs::read_to_string(path)?;
        let trajectory: SharedTrajectory = match kind {
            ResourceKind::SampledTrajectory { period } => Arc::new(
                SampledTrajectory::from_xyz_str(&text, *period).map_err(|e| {
                    OrreryError::invalid_item(item, format!("sampled trajectory {path}: {e}"))
                })?,
            ),
            ResourceKind::TleSet { satellite } => Arc::new(
                TleTrajectory::from_set(&text, satellite).map_err(|e| {
                    OrreryError::invalid_item(item, format!("element set {path}: {e}"))
                })?,
            ),
            ResourceKind::Texture | ResourceKind::Mesh => {
                return Err(OrreryError::invalid_item(
                    item,
                    format!("{path} is not trajectory data"),
                ))
            }
        };
        Ok(trajectory)
    }

    fn build_trajectory(
        &self,
        item: &Pending,
        spec: &TrajectorySpec,
        catalog: &UniverseCatalog,
    ) -> Result<SharedTrajectory, OrreryError> {
        let name = &item.spec.name;
        match spec {
            TrajectorySpec::Builtin(orbit) => self
                .builtins
                .orbit(orbit)
                .ok_or_else(|| unresolved(name, orbit)),
            TrajectorySpec::Named(orbit) => self.builtins.orbit(orbit).map_or_else(
                || {
                    catalog
                        .find(Self::canonical(item, orbit))
                        .map(|entity| Arc::clone(&entity.trajectory))
                        .ok_or_else(|| unresolved(name, orbit))
                },
                Ok,
            ),
            TrajectorySpec::FixedPoint(position) => Ok(Arc::new(FixedPointTrajectory::new(*position))),
            TrajectorySpec::Keplerian(elements) => {
                Ok(Arc::new(KeplerianTrajectory::new(elements.clone())))
            }
            TrajectorySpec::Sampled { source, period } => {
                match locate(source, &self.search_paths.data) {
                    Located::Local(path) => self.load_trajectory(
                        name,
                        &path,
                        &ResourceKind::SampledTrajectory { period: *period },
                    ),
                    Located::Missing(id) => Err(OrreryError::invalid_item(
                        name,
                        format!("sampled term '{id}' of a combination must be available locally"),
                    )),
                }
            }
            TrajectorySpec::Tle { source, satellite } => {
                match locate(source, &self.search_paths.data) {
                    Located::Local(path) => self.load_trajectory(
                        name,
                        &path,
                        &ResourceKind::TleSet {
                            satellite: satellite.clone(),
                        },
                    ),
                    Located::Missing(id) => Err(OrreryError::invalid_item(
                        name,
                        format!("TLE term '{id}' of a combination must be available locally"),
                    )),
                }
            }
            TrajectorySpec::LinearCombination { terms, period_term } => {
                let terms = terms
                    .iter()
                    .map(|(term, weight)| Ok((self.build_trajectory(item, term, catalog)?, *weight)))
                    .collect::<Result<Vec<_>, OrreryError>>()?;
                let period = terms
                    .get(period_term.unwrap_or(0))
                    .map_or(0.0, |(t, _)| t.period());
                Ok(Arc::new(LinearCombinationTrajectory::with_period(terms, period)))
            }
        }
    }

    fn build_rotation(
        &self,
        item: &Pending,
        spec: &RotationSpec,
        catalog: &UniverseCatalog,
    ) -> Result<SharedRotationModel, OrreryError> {
        let name = &item.spec.name;
        match spec {
            RotationSpec::Builtin(model) => self
                .builtins
                .rotation_model(model)
                .ok_or_else(|| unresolved(name, model)),
            RotationSpec::Named(model) => {
                if let Some(builtin) = self.builtins.rotation_model(model) {
                    return Ok(builtin);
                }
                let other = catalog
                    .find(Self::canonical(item, model))
                    .ok_or_else(|| unresolved(name, model))?;
                other.rotation_model.clone().ok_or_else(|| {
                    OrreryError::invalid_item(name, format!("'{model}' has no rotation model to share"))
                })
            }
            RotationSpec::Uniform(model) => Ok(Arc::new(model.clone())),
            RotationSpec::Fixed(model) => Ok(Arc::new(model.clone())),
        }
    }
}

/// Fail items whose center or frame chain leads back to themselves.
///
/// Links are followed through the document for names it declares and through the catalog
/// otherwise, so a cycle closed by entities resolved in an earlier load is caught before the
/// catalog is touched.
fn reject_closed_chains(items: &mut [Pending], catalog: &UniverseCatalog) {
    let links: Vec<Vec<String>> = items.iter().map(UniverseLoader::chain_links).collect();
    let by_name: HashMap<&str, usize, RandomState> = items
        .iter()
        .enumerate()
        .map(|(i, p)| (p.spec.name.as_str(), i))
        .collect();

    let mut cyclic = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if item.failure.is_some() {
            continue;
        }
        let own = item.spec.name.as_str();
        let mut stack: Vec<&str> = links[i].iter().map(String::as_str).collect();
        let mut seen: HashSet<&str, RandomState> = HashSet::default();
        while let Some(name) = stack.pop() {
            if name == own {
                cyclic.push(i);
                break;
            }
            if !seen.insert(name) {
                continue;
            }
            match by_name.get(name) {
                Some(&k) => stack.extend(links[k].iter().map(String::as_str)),
                None => {
                    if let Some(entity) = catalog.find(name) {
                        stack.extend(entity.linked_names());
                    }
                }
            }
        }
    }

    for i in cyclic {
        items[i].failure = Some(OrreryError::CyclicReference(items[i].spec.name.clone()));
    }
}

/// Order items so dependencies come first, and mark items that cannot be built.
///
/// An item depending on a failed one fails with [`OrreryError::UnresolvedReference`] naming that
/// dependency. Items left over by Kahn's algorithm fail with [`OrreryError::CyclicReference`]
/// when they sit on a cycle, and with an unresolved reference to the cycle otherwise.
fn order_items(items: &mut [Pending]) -> Vec<usize> {
    let n = items.len();
    let mut in_degree: Vec<usize> = items.iter().map(|p| p.deps.len()).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, item) in items.iter().enumerate() {
        for &d in &item.deps {
            dependents[d].push(i);
        }
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    while let Some(i) = queue.pop_front() {
        visited[i] = true;
        let failed = items[i].failure.is_some();
        if !failed {
            order.push(i);
        }
        for &k in &dependents[i] {
            if failed && items[k].failure.is_none() {
                items[k].failure = Some(unresolved(&items[k].spec.name, &items[i].spec.name));
            }
            in_degree[k] -= 1;
            if in_degree[k] == 0 {
                queue.push_back(k);
            }
        }
    }

    let leftover: Vec<usize> = (0..n).filter(|&i| !visited[i]).collect();
    for &i in &leftover {
        if items[i].failure.is_some() {
            continue;
        }
        items[i].failure = Some(if reaches(items, &visited, i, i) {
            OrreryError::CyclicReference(items[i].spec.name.clone())
        } else {
            let blocker = items[i]
                .deps
                .iter()
                .copied()
                .find(|&d| !visited[d])
                .unwrap_or(i);
            unresolved(&items[i].spec.name, &items[blocker].spec.name)
        });
    }
    order
}

/// Whether `target` is reachable from `from` through dependencies that were never ordered.
fn reaches(items: &[Pending], visited: &[bool], from: usize, target: usize) -> bool {
    let mut seen = vec![false; items.len()];
    let mut stack: Vec<usize> = items[from].deps.clone();
    while let Some(i) = stack.pop() {
        if i == target {
            return true;
        }
        if visited[i] || seen[i] {
            continue;
        }
        seen[i] = true;
        stack.extend(items[i].deps.iter().copied());
    }
    false
}

#[cfg(test)]
mod test_resolver {
    use super::*;
    use crate::{trajectory::Trajectory, universe::ResourceState};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use serde_json::json;

    fn loader() -> UniverseLoader {
        let mut builtins = BuiltinRegistry::new();
        builtins.add_builtin_orbit(
            "Sun",
            Arc::new(FixedPointTrajectory::new(Vector3::new(1.0, 0.0, 0.0))),
        );
        let mut loader = UniverseLoader::new(builtins);
        loader.set_search_paths(SearchPaths::uniform(Utf8Path::new("/nonexistent-orrery-dir")));
        loader
    }

    fn doc(items: serde_json::Value) -> CatalogDocument {
        CatalogDocument::new("test", items.as_array().cloned().unwrap_or_default())
    }

    #[test]
    fn test_candidates() {
        assert_eq!(candidates("Earth"), vec!["Earth"]);
        assert_eq!(candidates("Sol/Mars"), vec!["Sol/Mars", "Mars"]);
        assert_eq!(candidates("Sol"), vec!["Sol", "Sun"]);
        assert_eq!(candidates("Alpha/Sol"), vec!["Alpha/Sol", "Sol", "Sun"]);
    }

    #[test]
    fn test_forward_reference_is_ordered() {
        let mut loader = loader();
        let mut catalog = UniverseCatalog::new();
        let report = loader.load_catalog(
            &doc(json!([
                { "name": "Moon", "center": "Earth",
                  "trajectory": { "type": "FixedPoint", "position": [0, 10, 0] } },
                { "name": "Earth", "center": "Sun",
                  "trajectory": { "type": "FixedPoint", "position": [0, 0, 100] } },
                { "name": "Sun", "trajectory": "Sun" }
            ])),
            &mut catalog,
        );

        assert!(report.is_complete(), "{:?}", report.failures);
        assert_eq!(report.bodies, vec!["Sun", "Earth", "Moon"]);
        assert_relative_eq!(
            catalog.position("Moon", 0.0).unwrap(),
            Vector3::new(1.0, 10.0, 100.0)
        );
    }

    #[test]
    fn test_unresolved_and_dependent_failures() {
        let mut loader = loader();
        let mut catalog = UniverseCatalog::new();
        let report = loader.load_catalog(
            &doc(json!([
                { "name": "Lost", "center": "Nowhere" },
                { "name": "Child", "center": "Lost" },
                { "name": "Fine", "trajectory": "Sun" },
                "not an object"
            ])),
            &mut catalog,
        );

        assert_eq!(report.bodies, vec!["Fine"]);
        assert_eq!(
            report.failure("Lost"),
            Some(&OrreryError::UnresolvedReference {
                item: "Lost".into(),
                reference: "Nowhere".into()
            })
        );
        assert_eq!(
            report.failure("Child"),
            Some(&OrreryError::UnresolvedReference {
                item: "Child".into(),
                reference: "Lost".into()
            })
        );
        assert!(matches!(report.failure("#3"), Some(OrreryError::InvalidItem { .. })));
        assert!(!catalog.contains("Lost") && !catalog.contains("Child"));
    }

    #[test]
    fn test_cycles() {
        let mut loader = loader();
        let mut catalog = UniverseCatalog::new();
        let report = loader.load_catalog(
            &doc(json!([
                { "name": "A", "center": "B" },
                { "name": "B", "center": "A" },
                { "name": "C", "center": "A" },
                { "name": "D", "center": "D" }
            ])),
            &mut catalog,
        );

        assert!(report.bodies.is_empty());
        assert_eq!(report.failure("A"), Some(&OrreryError::CyclicReference("A".into())));
        assert_eq!(report.failure("B"), Some(&OrreryError::CyclicReference("B".into())));
        assert_eq!(report.failure("D"), Some(&OrreryError::CyclicReference("D".into())));
        assert_eq!(
            report.failure("C"),
            Some(&OrreryError::UnresolvedReference {
                item: "C".into(),
                reference: "A".into()
            })
        );
    }

    #[test]
    fn test_cycle_through_earlier_load() {
        let mut loader = loader();
        let mut catalog = UniverseCatalog::new();
        let first = loader.load_catalog(
            &doc(json!([
                { "name": "A" },
                { "name": "B", "center": "A",
                  "trajectory": { "type": "FixedPoint", "position": [0, 1, 0] } }
            ])),
            &mut catalog,
        );
        assert!(first.is_complete());

        let second = loader.load_catalog(
            &doc(json!([
                { "name": "A", "center": "B" },
                { "name": "C", "center": "A" },
                { "name": "D", "bodyFrame": { "type": "BodyFixed", "body": "E" } },
                { "name": "E", "center": "B", "trajectoryFrame": { "type": "BodyFixed", "body": "D" } }
            ])),
            &mut catalog,
        );

        assert_eq!(second.failure("A"), Some(&OrreryError::CyclicReference("A".into())));
        assert_eq!(second.failure("D"), Some(&OrreryError::CyclicReference("D".into())));
        assert_eq!(second.failure("E"), Some(&OrreryError::CyclicReference("E".into())));
        assert_eq!(
            second.failure("C"),
            Some(&OrreryError::UnresolvedReference {
                item: "C".into(),
                reference: "A".into()
            })
        );
        assert!(second.bodies.is_empty());

        // the earlier entities are untouched and still evaluate
        assert_eq!(catalog.find("A").unwrap().center, None);
        assert_relative_eq!(catalog.position("B", 0.0).unwrap(), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_invalid_redeclaration_drops_earlier_item() {
        let mut loader = loader();
        let mut catalog = UniverseCatalog::new();
        let report = loader.load_catalog(
            &doc(json!([
                { "name": "Vesta", "trajectory": { "type": "FixedPoint", "position": [1, 0, 0] } },
                { "name": "Vesta", "trajectory": { "type": "Spiral" } },
                { "name": "Ceres" }
            ])),
            &mut catalog,
        );

        assert_eq!(report.bodies, vec!["Ceres"]);
        assert!(matches!(report.failure("Vesta"), Some(OrreryError::InvalidItem { .. })));
        assert!(!catalog.contains("Vesta"));
    }

    #[test]
    fn test_duplicates_and_lookup_fallbacks() {
        let mut loader = loader();
        let mut catalog = UniverseCatalog::new();
        loader.load_catalog(
            &doc(json!([
                { "name": "Sun", "trajectory": "Sun" },
                { "name": "Mars", "center": "Sun",
                  "trajectory": { "type": "FixedPoint", "position": [1, 0, 0] } },
                { "name": "Mars", "center": "Sun",
                  "trajectory": { "type": "FixedPoint", "position": [2, 0, 0] } }
            ])),
            &mut catalog,
        );
        assert_relative_eq!(catalog.position("Mars", 0.0).unwrap(), Vector3::new(3.0, 0.0, 0.0));

        let report = loader.load_catalog(
            &doc(json!([
                { "name": "Sol/Mars/Deimos", "center": "Sol/Mars",
                  "trajectory": { "type": "FixedPoint", "position": [0, 5, 0] } },
                { "name": "Sol/Comet", "center": "Sol" }
            ])),
            &mut catalog,
        );
        assert!(report.is_complete(), "{:?}", report.failures);
        assert_eq!(catalog.find("Sol/Mars/Deimos").unwrap().center.as_deref(), Some("Mars"));
        assert_eq!(catalog.find("Sol/Comet").unwrap().center.as_deref(), Some("Sun"));
    }

    #[test]
    fn test_shared_trajectory_and_plot_default() {
        let mut loader = loader();
        let mut catalog = UniverseCatalog::new();
        let report = loader.load_catalog(
            &doc(json!([
                { "name": "Twin", "trajectory": "Orbiter", "trajectoryPlot": { "fade": 0.5 } },
                { "name": "Orbiter", "trajectory": {
                    "type": "Keplerian", "semiMajorAxis": 7000, "period": 2 } },
                { "name": "Self", "trajectory": "Self" }
            ])),
            &mut catalog,
        );

        assert_eq!(report.bodies, vec!["Orbiter", "Twin"]);
        let twin = catalog.find("Twin").unwrap();
        let orbiter = catalog.find("Orbiter").unwrap();
        assert!(Arc::ptr_eq(&twin.trajectory, &orbiter.trajectory));
        let plot = catalog.find_info("Twin").unwrap().trajectory_plot.clone().unwrap();
        assert_relative_eq!(plot.duration, 2.0 * 86_400.0);
        assert!(matches!(
            report.failure("Self"),
            Some(OrreryError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn test_pending_sampled_trajectory_update() {
        let mut loader = loader();
        let mut catalog = UniverseCatalog::new();
        let report = loader.load_catalog(
            &doc(json!([
                { "name": "Voyager", "trajectory": {
                    "type": "Sampled", "source": "https://example.org/voyager.xyz" } }
            ])),
            &mut catalog,
        );
        let id = "https://example.org/voyager.xyz";
        assert!(report.resource_requests.contains(id));
        assert!(loader.resource_requests().contains(id));
        assert_eq!(catalog.position("Voyager", 0.0).unwrap(), Vector3::zeros());

        let bad = loader.apply_update(id, b"2451545.0 1 2\n", &mut catalog);
        assert_eq!(bad.failures.len(), 1);
        assert!(catalog.find("Voyager").unwrap().trajectory_resource.as_ref().unwrap().is_pending());

        let payload = b"2451544.0 0 0 0\n2451546.0 20 0 0\n";
        let first = loader.apply_update(id, payload, &mut catalog);
        assert_eq!(first.applied, vec!["Voyager"]);
        let once = catalog.position("Voyager", 0.0).unwrap();
        loader.apply_update(id, payload, &mut catalog);
        assert_eq!(catalog.position("Voyager", 0.0).unwrap(), once);
        assert_relative_eq!(once.x, 10.0, epsilon = 1e-9);
        assert!(matches!(
            catalog.find("Voyager").unwrap().trajectory_resource.as_ref().unwrap().state,
            ResourceState::Received(_)
        ));
        assert_eq!(catalog.find("Voyager").unwrap().trajectory.period(), 0.0);

        // redefined without the resource: later updates are skipped
        loader.load_catalog(&doc(json!([{ "name": "Voyager" }])), &mut catalog);
        let skipped = loader.apply_update(id, payload, &mut catalog);
        assert_eq!(skipped.skipped, vec!["Voyager"]);
        assert_eq!(catalog.position("Voyager", 0.0).unwrap(), Vector3::zeros());

        loader.clear_resource_requests();
        assert!(loader.resource_requests().is_empty());
    }

    #[test]
    fn test_remote_tle_term_is_rejected() {
        let mut loader = loader();
        let mut catalog = UniverseCatalog::new();
        let report = loader.load_catalog(
            &doc(json!([
                { "name": "Relay", "trajectory": {
                    "type": "LinearCombination",
                    "terms": [{ "trajectory": {
                        "type": "TLE", "source": "https://example.org/relay.txt" } }] } },
                { "name": "Beacon", "trajectory": {
                    "type": "TLE", "source": "https://example.org/relay.txt" } }
            ])),
            &mut catalog,
        );

        assert_eq!(report.bodies, vec!["Beacon"]);
        assert!(matches!(
            report.failure("Relay"),
            Some(OrreryError::InvalidItem { message, .. }) if message.contains("available locally")
        ));
        assert!(loader
            .resource_requests()
            .contains("https://example.org/relay.txt"));
    }
}
