use std::collections::HashMap;

use ahash::RandomState;
use itertools::Itertools;

use crate::{rotation::SharedRotationModel, trajectory::SharedTrajectory};

/// Named trajectories and rotation models available to every catalog without being declared.
///
/// The registry is an explicit object injected into the
/// [`UniverseLoader`](crate::catalog::resolver::UniverseLoader): start-up code fills it from the
/// ephemeris and the built-in rotation models, catalogs refer to its entries by name.
#[derive(Debug, Clone, Default)]
pub struct BuiltinRegistry {
    orbits: HashMap<String, SharedTrajectory, RandomState>,
    rotation_models: HashMap<String, SharedRotationModel, RandomState>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trajectory under `name`, replacing any previous entry.
    pub fn add_builtin_orbit(&mut self, name: &str, trajectory: SharedTrajectory) {
        self.orbits.insert(name.to_string(), trajectory);
    }

    /// Register a rotation model under `name`, replacing any previous entry.
    pub fn add_builtin_rotation_model(&mut self, name: &str, model: SharedRotationModel) {
        self.rotation_models.insert(name.to_string(), model);
    }

    pub fn orbit(&self, name: &str) -> Option<SharedTrajectory> {
        self.orbits.get(name).cloned()
    }

    pub fn rotation_model(&self, name: &str) -> Option<SharedRotationModel> {
        self.rotation_models.get(name).cloned()
    }

    pub fn has_orbit(&self, name: &str) -> bool {
        self.orbits.contains_key(name)
    }

    pub fn has_rotation_model(&self, name: &str) -> bool {
        self.rotation_models.contains_key(name)
    }

    /// Registered orbit names, sorted.
    pub fn orbit_names(&self) -> Vec<&str> {
        self.orbits.keys().map(String::as_str).sorted().collect()
    }
}
