//! # Universe catalog
//!
//! The name-indexed registry of resolved entities and their [`BodyInfo`]. Entities form a forest
//! through their `center` names; positions are composed along that chain:
//!
//! ```text
//! position(Sol/Mars/Phobos) = R(frame of Phobos)·traj(Phobos)
//!                           + R(frame of Mars)·traj(Mars)
//!                           + R(frame of Sun)·traj(Sun)          (SSB-relative root)
//! ```
//!
//! All results are expressed in EquatorJ2000 relative to the solar-system barycenter.
use std::collections::HashMap;

use ahash::RandomState;
use itertools::Itertools;
use nalgebra::{UnitQuaternion, Vector3};

use crate::{constants::TdbSeconds, frame::Frame, orrery_errors::OrreryError};

pub mod body_info;
pub mod entity;

pub use body_info::{BodyInfo, TrajectoryPlot};
pub use entity::{Entity, Geometry, ResourceRef, ResourceState};

/// Longest center or frame chain followed before assuming a cycle.
const MAX_CHAIN_DEPTH: usize = 64;

#[derive(Debug, Clone)]
struct CatalogEntry {
    entity: Entity,
    info: BodyInfo,
}

#[derive(Debug, Clone, Default)]
pub struct UniverseCatalog {
    entries: HashMap<String, CatalogEntry, RandomState>,
}

impl UniverseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, name: &str) -> Option<&Entity> {
        self.entries.get(name).map(|e| &e.entity)
    }

    pub fn find_info(&self, name: &str) -> Option<&BodyInfo> {
        self.entries.get(name).map(|e| &e.info)
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entries.get_mut(name).map(|e| &mut e.entity)
    }

    /// Insert or replace the entity registered under `name`.
    pub fn upsert(&mut self, name: &str, entity: Entity, info: BodyInfo) {
        self.entries
            .insert(name.to_string(), CatalogEntry { entity, info });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).sorted().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get(&self, name: &str) -> Result<&Entity, OrreryError> {
        self.find(name)
            .ok_or_else(|| OrreryError::UnknownEntity(name.to_string()))
    }

    /// Position of an entity relative to the solar-system barycenter, in EquatorJ2000 (km).
    ///
    /// Arguments
    /// ---------
    /// * `name`: canonical entity name
    /// * `t`: TDB seconds past J2000
    ///
    /// Return
    /// ------
    /// * the summed position along the center chain, [`OrreryError::UnknownEntity`] if a link
    ///   of the chain is missing, [`OrreryError::CyclicReference`] if the chain loops, or the
    ///   first trajectory evaluation error
    pub fn position(&self, name: &str, t: TdbSeconds) -> Result<Vector3<f64>, OrreryError> {
        let mut position = Vector3::zeros();
        let mut current = Some(name.to_string());
        let mut depth = 0;

        while let Some(link) = current {
            if depth == MAX_CHAIN_DEPTH {
                return Err(OrreryError::CyclicReference(name.to_string()));
            }
            let entity = self.get(&link)?;
            let rotation = self.frame_orientation_at_depth(&entity.trajectory_frame, t, depth)?;
            position += rotation * entity.trajectory.position(t)?;
            current = entity.center.clone();
            depth += 1;
        }

        Ok(position)
    }

    /// Orientation of an entity's body-fixed axes in EquatorJ2000.
    ///
    /// An entity without a rotation model keeps the axes of its body frame.
    pub fn orientation(&self, name: &str, t: TdbSeconds) -> Result<UnitQuaternion<f64>, OrreryError> {
        self.orientation_at_depth(name, t, 0)
    }

    /// Orientation of a frame relative to EquatorJ2000.
    pub fn frame_orientation(
        &self,
        frame: &Frame,
        t: TdbSeconds,
    ) -> Result<UnitQuaternion<f64>, OrreryError> {
        self.frame_orientation_at_depth(frame, t, 0)
    }

    fn orientation_at_depth(
        &self,
        name: &str,
        t: TdbSeconds,
        depth: usize,
    ) -> Result<UnitQuaternion<f64>, OrreryError> {
        if depth >= MAX_CHAIN_DEPTH {
            return Err(OrreryError::CyclicReference(name.to_string()));
        }
        let entity = self.get(name)?;
        let frame = self.frame_orientation_at_depth(&entity.body_frame, t, depth + 1)?;
        Ok(match &entity.rotation_model {
            Some(model) => frame * model.orientation(t),
            None => frame,
        })
    }

    fn frame_orientation_at_depth(
        &self,
        frame: &Frame,
        t: TdbSeconds,
        depth: usize,
    ) -> Result<UnitQuaternion<f64>, OrreryError> {
        match (frame.inertial_orientation(), frame) {
            (Some(q), _) => Ok(q),
            (None, Frame::BodyFixed(body)) => self.orientation_at_depth(body, t, depth + 1),
            (None, _) => Ok(UnitQuaternion::identity()),
        }
    }
}

#[cfg(test)]
mod test_universe {
    use std::sync::Arc;

    use super::*;
    use crate::{
        constants::{J2000_OBLIQUITY_DEG, RADEG},
        rotation::uniform::UniformRotationModel,
        trajectory::fixed_point::FixedPointTrajectory,
    };
    use approx::assert_relative_eq;

    fn fixed(name: &str, center: Option<&str>, p: [f64; 3]) -> Entity {
        Entity::new(
            name,
            center,
            Arc::new(FixedPointTrajectory::new(Vector3::from(p))),
        )
    }

    #[test]
    fn test_upsert_replaces() {
        let mut catalog = UniverseCatalog::new();
        catalog.upsert("A", fixed("A", None, [1.0, 0.0, 0.0]), BodyInfo::default());
        catalog.upsert(
            "A",
            fixed("A", None, [2.0, 0.0, 0.0]),
            BodyInfo {
                class: Some("planet".into()),
                ..Default::default()
            },
        );
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.position("A", 0.0).unwrap(), Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(catalog.find_info("A").unwrap().class.as_deref(), Some("planet"));
    }

    #[test]
    fn test_position_sums_center_chain_with_frames() {
        let mut catalog = UniverseCatalog::new();
        catalog.upsert("Sun", fixed("Sun", None, [1.0, 0.0, 0.0]), BodyInfo::default());
        let mut planet = fixed("Planet", Some("Sun"), [0.0, 0.0, 10.0]);
        planet.trajectory_frame = Frame::EclipticJ2000;
        catalog.upsert("Planet", planet, BodyInfo::default());
        catalog.upsert(
            "Moon",
            fixed("Moon", Some("Planet"), [0.0, 5.0, 0.0]),
            BodyInfo::default(),
        );

        let eps = J2000_OBLIQUITY_DEG * RADEG;
        let expected = Vector3::new(1.0, 0.0, 0.0)
            + Vector3::new(0.0, -10.0 * eps.sin(), 10.0 * eps.cos())
            + Vector3::new(0.0, 5.0, 0.0);
        assert_relative_eq!(catalog.position("Moon", 0.0).unwrap(), expected, epsilon = 1e-12);
        assert_eq!(catalog.names(), vec!["Moon", "Planet", "Sun"]);
    }

    #[test]
    fn test_missing_center_and_cycle() {
        let mut catalog = UniverseCatalog::new();
        catalog.upsert("A", fixed("A", Some("Nowhere"), [0.0; 3]), BodyInfo::default());
        assert_eq!(
            catalog.position("A", 0.0),
            Err(OrreryError::UnknownEntity("Nowhere".into()))
        );

        catalog.upsert("B", fixed("B", Some("C"), [0.0; 3]), BodyInfo::default());
        catalog.upsert("C", fixed("C", Some("B"), [0.0; 3]), BodyInfo::default());
        assert_eq!(
            catalog.position("B", 0.0),
            Err(OrreryError::CyclicReference("B".into()))
        );
    }

    #[test]
    fn test_body_fixed_frame_follows_rotation() {
        let mut catalog = UniverseCatalog::new();
        let mut spinner = fixed("Spinner", None, [0.0; 3]);
        spinner.rotation_model = Some(Arc::new(UniformRotationModel {
            period: 400.0,
            epoch: 0.0,
            inclination: 0.0,
            ascending_node: 0.0,
            meridian_angle: 0.0,
        }));
        catalog.upsert("Spinner", spinner, BodyInfo::default());

        let mut station = fixed("Station", Some("Spinner"), [7.0, 0.0, 0.0]);
        station.trajectory_frame = Frame::BodyFixed("Spinner".into());
        catalog.upsert("Station", station, BodyInfo::default());

        // a quarter turn later the surface point faces +y
        assert_relative_eq!(
            catalog.position("Station", 100.0).unwrap(),
            Vector3::new(0.0, 7.0, 0.0),
            epsilon = 1e-12
        );

        let mut looped = fixed("Loop", None, [0.0; 3]);
        looped.body_frame = Frame::BodyFixed("Loop".into());
        catalog.upsert("Loop", looped, BodyInfo::default());
        assert!(matches!(
            catalog.orientation("Loop", 0.0),
            Err(OrreryError::CyclicReference(_))
        ));
    }
}
