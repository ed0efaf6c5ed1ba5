use std::sync::Arc;

use camino::Utf8PathBuf;
use nalgebra::Vector3;

use crate::{frame::Frame, rotation::SharedRotationModel, trajectory::SharedTrajectory};

/// Availability of an external file an entity depends on.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState {
    /// Found on the local search path.
    Local(Utf8PathBuf),
    /// Requested from the host; the entity uses a placeholder until the data arrives.
    Pending,
    /// Delivered through `apply_update`.
    Received(Arc<Vec<u8>>),
}

/// A texture, mesh or data file, identified by the id the host sees in resource requests.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRef {
    pub id: String,
    pub state: ResourceState,
}

impl ResourceRef {
    pub fn is_pending(&self) -> bool {
        self.state == ResourceState::Pending
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Ellipsoid with semi-axes in km.
    Globe {
        radii: Vector3<f64>,
        base_map: Option<ResourceRef>,
    },
    /// Mesh scaled to `size` km.
    Mesh { source: ResourceRef, size: f64 },
}

/// A resolved body: where it is, how it turns and what it looks like.
///
/// `center` and body-fixed frame references hold canonical entity names, so the
/// [`UniverseCatalog`](super::UniverseCatalog) can follow them without the catalog's lookup
/// rules.
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub center: Option<String>,
    pub trajectory: SharedTrajectory,
    pub trajectory_frame: Frame,
    pub rotation_model: Option<SharedRotationModel>,
    pub body_frame: Frame,
    pub geometry: Option<Geometry>,
    /// Set when the trajectory is sampled from an external file.
    pub trajectory_resource: Option<ResourceRef>,
}

impl Entity {
    /// An entity that follows `trajectory` around `center` in EquatorJ2000.
    pub fn new(name: &str, center: Option<&str>, trajectory: SharedTrajectory) -> Self {
        Entity {
            name: name.to_string(),
            center: center.map(String::from),
            trajectory,
            trajectory_frame: Frame::EquatorJ2000,
            rotation_model: None,
            body_frame: Frame::EquatorJ2000,
            geometry: None,
            trajectory_resource: None,
        }
    }

    /// Entities this one is evaluated through: its center and the bodies of body-fixed frames.
    pub fn linked_names(&self) -> Vec<&str> {
        let mut links: Vec<&str> = self.center.iter().map(String::as_str).collect();
        for frame in [&self.trajectory_frame, &self.body_frame] {
            if let Frame::BodyFixed(body) = frame {
                links.push(body);
            }
        }
        links
    }
}
