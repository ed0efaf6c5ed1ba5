//! Normalized catalog items.
//!
//! [`ItemSpec::from_value`] turns one open-ended JSON item into typed trajectory, frame, rotation
//! and geometry descriptions, converting every quantity to internal units. Names of other
//! objects stay unresolved strings here; the resolver looks them up.
use nalgebra::Vector3;
use serde_json::{Map, Value};

use crate::{
    frame::Frame,
    orrery_errors::OrreryError,
    rotation::{fixed::FixedRotationModel, uniform::UniformRotationModel},
    trajectory::keplerian::KeplerianElements,
    universe::{BodyInfo, TrajectoryPlot},
};

use super::quantity::{parse_epoch, parse_quantity, parse_quaternion, parse_vector3, Unit};

#[derive(Debug, Clone, PartialEq)]
pub enum TrajectorySpec {
    /// A builtin orbit, or the trajectory of another item.
    Named(String),
    /// A builtin orbit only.
    Builtin(String),
    FixedPoint(Vector3<f64>),
    Keplerian(KeplerianElements),
    /// Positions tabulated in an external file; period in seconds (`0.0` if unknown).
    Sampled { source: String, period: f64 },
    /// One satellite of a two-line element set; `satellite` defaults to the item name.
    Tle { source: String, satellite: String },
    LinearCombination {
        terms: Vec<(TrajectorySpec, f64)>,
        /// Index of the term whose period the sum carries; the first term when absent.
        period_term: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RotationSpec {
    /// A builtin rotation model, or the rotation model of another item.
    Named(String),
    Builtin(String),
    Uniform(UniformRotationModel),
    Fixed(FixedRotationModel),
}

/// Frame as written in an item; a body-fixed frame names an unresolved object.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameSpec {
    Inertial(Frame),
    BodyFixed(String),
}

impl Default for FrameSpec {
    fn default() -> Self {
        FrameSpec::Inertial(Frame::EquatorJ2000)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeometrySpec {
    Globe {
        radii: Vector3<f64>,
        base_map: Option<String>,
    },
    Mesh {
        source: String,
        size: f64,
    },
}

/// What a referenced name must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Center,
    /// Builtin orbit, or another item's trajectory.
    Trajectory,
    BuiltinTrajectory,
    /// Builtin rotation model, or another item's rotation model.
    Rotation,
    BuiltinRotation,
    Frame,
}

/// A name used by an item, with the role it plays there.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub name: String,
    pub kind: ReferenceKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemSpec {
    pub name: String,
    pub center: Option<String>,
    pub trajectory: TrajectorySpec,
    pub trajectory_frame: FrameSpec,
    pub rotation: Option<RotationSpec>,
    pub body_frame: FrameSpec,
    pub geometry: Option<GeometrySpec>,
    /// Metadata; a missing plot duration is filled in from the trajectory period at build time.
    pub info: BodyInfo,
}

/// Field accessors that attach the item name to every error.
struct Fields<'a> {
    item: &'a str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn error(&self, message: impl Into<String>) -> OrreryError {
        OrreryError::invalid_item(self.item, message)
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    fn str(&self, key: &str) -> Result<Option<&'a str>, OrreryError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.error(format!("'{key}' must be a string, found {other}"))),
        }
    }

    fn required_str(&self, key: &str) -> Result<&'a str, OrreryError> {
        self.str(key)?
            .ok_or_else(|| self.error(format!("missing '{key}'")))
    }

    fn number(&self, key: &str) -> Result<Option<f64>, OrreryError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.error(format!("'{key}' must be a number, found {v}"))),
        }
    }

    fn quantity(&self, key: &str, unit: Unit) -> Result<Option<f64>, OrreryError> {
        self.map
            .get(key)
            .map(|v| parse_quantity(v, unit).map_err(|e| self.error(format!("'{key}': {e}"))))
            .transpose()
    }

    fn epoch(&self, key: &str) -> Result<Option<f64>, OrreryError> {
        self.map
            .get(key)
            .map(|v| parse_epoch(v).map_err(|e| self.error(format!("'{key}': {e}"))))
            .transpose()
    }

    fn nested(&self, key: &str) -> Result<Option<Fields<'a>>, OrreryError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(Fields {
                item: self.item,
                map,
            })),
            Some(other) => Err(self.error(format!("'{key}' must be an object, found {other}"))),
        }
    }

    fn of(&self, value: &'a Value, what: &str) -> Result<Fields<'a>, OrreryError> {
        value
            .as_object()
            .map(|map| Fields {
                item: self.item,
                map,
            })
            .ok_or_else(|| self.error(format!("{what} must be a string or an object, found {value}")))
    }
}

fn keplerian(f: &Fields) -> Result<KeplerianElements, OrreryError> {
    let e = f.number("eccentricity")?.unwrap_or(0.0);
    if !e.is_finite() || e < 0.0 {
        return Err(f.error(format!("eccentricity {e} must be a finite non-negative number")));
    }
    if e == 1.0 {
        return Err(f.error("parabolic orbits (eccentricity 1) are not supported"));
    }

    let semi_major_axis = match (
        f.quantity("semiMajorAxis", Unit::Kilometer)?,
        f.quantity("periapsisDistance", Unit::Kilometer)?,
    ) {
        (Some(a), _) if e > 1.0 => -a.abs(),
        (Some(a), _) => a,
        (None, Some(q)) => q / (1.0 - e),
        (None, None) => return Err(f.error("missing 'semiMajorAxis' or 'periapsisDistance'")),
    };
    if !semi_major_axis.is_finite() || semi_major_axis * (1.0 - e) <= 0.0 {
        return Err(f.error(format!(
            "orbit size {semi_major_axis} km does not give a positive periapsis distance"
        )));
    }

    let inclination = f.quantity("inclination", Unit::Degree)?.unwrap_or(0.0);
    let ascending_node = f.quantity("ascendingNode", Unit::Degree)?.unwrap_or(0.0);
    let (periapsis_argument, periapsis_longitude) = match (
        f.quantity("argumentOfPeriapsis", Unit::Degree)?,
        f.quantity("longitudeOfPeriapsis", Unit::Degree)?,
    ) {
        (Some(w), _) => (w, w + ascending_node),
        (None, Some(lp)) => (lp - ascending_node, lp),
        (None, None) => (0.0, ascending_node),
    };
    let mean_anomaly = match (
        f.quantity("meanAnomaly", Unit::Degree)?,
        f.quantity("meanLongitude", Unit::Degree)?,
    ) {
        (Some(m), _) => m,
        (None, Some(l)) => l - periapsis_longitude,
        (None, None) => 0.0,
    };

    let period = f
        .quantity("period", Unit::Day)?
        .ok_or_else(|| f.error("missing Keplerian 'period'"))?;
    if !period.is_finite() || period <= 0.0 {
        return Err(f.error(format!("period {period} s must be positive")));
    }

    Ok(KeplerianElements {
        reference_epoch: f.epoch("epoch")?.unwrap_or(0.0),
        semi_major_axis,
        eccentricity: e,
        inclination,
        ascending_node_longitude: ascending_node,
        periapsis_argument,
        mean_anomaly,
        period,
    })
}

fn trajectory<'a>(f: &Fields<'a>, value: &'a Value) -> Result<TrajectorySpec, OrreryError> {
    if let Value::String(name) = value {
        return Ok(TrajectorySpec::Named(name.clone()));
    }
    let t = f.of(value, "a trajectory")?;
    match t.required_str("type")? {
        "Builtin" => Ok(TrajectorySpec::Builtin(t.required_str("name")?.to_string())),
        "FixedPoint" => {
            let position = t
                .get("position")
                .ok_or_else(|| t.error("missing FixedPoint 'position'"))?;
            parse_vector3(position, Unit::Kilometer)
                .map(TrajectorySpec::FixedPoint)
                .map_err(|e| t.error(format!("'position': {e}")))
        }
        "Keplerian" => keplerian(&t).map(TrajectorySpec::Keplerian),
        "Sampled" => Ok(TrajectorySpec::Sampled {
            source: t.required_str("source")?.to_string(),
            period: t.quantity("period", Unit::Day)?.unwrap_or(0.0),
        }),
        "TLE" => Ok(TrajectorySpec::Tle {
            source: t.required_str("source")?.to_string(),
            satellite: t.str("name")?.unwrap_or(t.item).to_string(),
        }),
        "LinearCombination" => {
            let terms = t
                .get("terms")
                .and_then(Value::as_array)
                .ok_or_else(|| t.error("LinearCombination needs a 'terms' array"))?;
            let terms = terms
                .iter()
                .map(|term| {
                    let term = t.of(term, "a combination term")?;
                    let inner = term
                        .get("trajectory")
                        .ok_or_else(|| t.error("combination term without 'trajectory'"))?;
                    Ok((trajectory(&term, inner)?, term.number("weight")?.unwrap_or(1.0)))
                })
                .collect::<Result<Vec<_>, OrreryError>>()?;
            let period_term = match t.get("periodTerm") {
                None | Some(Value::Null) => None,
                Some(v) => Some(v.as_u64().ok_or_else(|| {
                    t.error(format!("'periodTerm' must be a non-negative integer, found {v}"))
                })? as usize),
            };
            if let Some(i) = period_term {
                if i >= terms.len() {
                    return Err(t.error(format!(
                        "periodTerm {i} is out of range for {} terms",
                        terms.len()
                    )));
                }
            }
            Ok(TrajectorySpec::LinearCombination { terms, period_term })
        }
        other => Err(t.error(format!("unknown trajectory type '{other}'"))),
    }
}

fn rotation<'a>(f: &Fields<'a>, value: &'a Value) -> Result<RotationSpec, OrreryError> {
    if let Value::String(name) = value {
        return Ok(RotationSpec::Named(name.clone()));
    }
    let r = f.of(value, "a rotation model")?;
    let angle = |key: &str| -> Result<f64, OrreryError> {
        Ok(r.quantity(key, Unit::Degree)?.unwrap_or(0.0))
    };
    match r.required_str("type")? {
        "Builtin" => Ok(RotationSpec::Builtin(r.required_str("name")?.to_string())),
        "Uniform" => Ok(RotationSpec::Uniform(UniformRotationModel {
            period: r
                .quantity("period", Unit::Hour)?
                .ok_or_else(|| r.error("missing Uniform rotation 'period'"))?,
            epoch: r.epoch("epoch")?.unwrap_or(0.0),
            inclination: angle("inclination")?,
            ascending_node: angle("ascendingNode")?,
            meridian_angle: angle("meridianAngle")?,
        })),
        "Fixed" => match r.get("quaternion") {
            Some(q) => parse_quaternion(q)
                .map(|q| RotationSpec::Fixed(FixedRotationModel::new(q)))
                .map_err(|e| r.error(format!("'quaternion': {e}"))),
            None => Ok(RotationSpec::Fixed(FixedRotationModel::from_angles(
                angle("inclination")?,
                angle("ascendingNode")?,
                angle("meridianAngle")?,
            ))),
        },
        other => Err(r.error(format!("unknown rotation model type '{other}'"))),
    }
}

fn frame<'a>(f: &Fields<'a>, key: &str) -> Result<FrameSpec, OrreryError> {
    match f.get(key) {
        None | Some(Value::Null) => Ok(FrameSpec::default()),
        Some(Value::String(name)) => Frame::from_inertial_name(name)
            .map(FrameSpec::Inertial)
            .ok_or_else(|| f.error(format!("unknown frame '{name}' in '{key}'"))),
        Some(value) => {
            let fr = f.of(value, "a frame")?;
            match fr.required_str("type")? {
                "BodyFixed" => Ok(FrameSpec::BodyFixed(fr.required_str("body")?.to_string())),
                name => Frame::from_inertial_name(name)
                    .map(FrameSpec::Inertial)
                    .ok_or_else(|| f.error(format!("unknown frame '{name}' in '{key}'"))),
            }
        }
    }
}

fn geometry(g: &Fields) -> Result<GeometrySpec, OrreryError> {
    match g.required_str("type")? {
        "Globe" => {
            let radii = match (g.get("radii"), g.quantity("radius", Unit::Kilometer)?) {
                (Some(radii), _) => parse_vector3(radii, Unit::Kilometer)
                    .map_err(|e| g.error(format!("'radii': {e}")))?,
                (None, Some(r)) => Vector3::repeat(r),
                (None, None) => return Err(g.error("Globe needs 'radius' or 'radii'")),
            };
            if radii.iter().any(|r| !(*r > 0.0)) {
                return Err(g.error(format!("Globe radii must be positive, found {radii:?}")));
            }
            Ok(GeometrySpec::Globe {
                radii,
                base_map: g.str("baseMap")?.map(String::from),
            })
        }
        "Mesh" => Ok(GeometrySpec::Mesh {
            source: g.required_str("source")?.to_string(),
            size: g.quantity("size", Unit::Kilometer)?.unwrap_or(1.0),
        }),
        other => Err(g.error(format!("unknown geometry type '{other}'"))),
    }
}

fn color(f: &Fields, value: &Value) -> Result<[f64; 3], OrreryError> {
    let invalid = || f.error(format!("label color must be [r, g, b], found {value}"));
    let rgb: Vec<f64> = value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|c| c.as_f64().ok_or_else(invalid))
        .collect::<Result<_, _>>()?;
    <[f64; 3]>::try_from(rgb).map_err(|_| invalid())
}

fn info(f: &Fields) -> Result<BodyInfo, OrreryError> {
    let label_color = match f.nested("label")? {
        Some(label) => label.get("color").map(|c| color(f, c)).transpose()?,
        None => None,
    };
    let trajectory_plot = match f.nested("trajectoryPlot")? {
        Some(plot) => Some(TrajectoryPlot {
            // NaN marks "use the trajectory period"
            duration: plot.quantity("duration", Unit::Day)?.unwrap_or(f64::NAN),
            lead: plot.quantity("lead", Unit::Day)?.unwrap_or(0.0),
            fade: plot.number("fade")?.unwrap_or(0.0).clamp(0.0, 1.0),
        }),
        None => None,
    };
    Ok(BodyInfo {
        class: f.str("class")?.map(String::from),
        label_color,
        trajectory_plot,
        description: f.str("description")?.map(String::from),
    })
}

impl ItemSpec {
    /// Normalize one catalog item.
    ///
    /// Arguments
    /// ---------
    /// * `value`: the raw item
    /// * `index`: position of the item in its document, used to name unnamed items in errors
    ///
    /// Return
    /// ------
    /// * the typed item, or [`OrreryError::InvalidItem`] describing the first malformed field
    pub fn from_value(value: &Value, index: usize) -> Result<ItemSpec, OrreryError> {
        let placeholder = format!("#{index}");
        let map = value.as_object().ok_or_else(|| {
            OrreryError::invalid_item(&placeholder, format!("item must be an object, found {value}"))
        })?;
        let name = match map.get("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name.trim(),
            _ => return Err(OrreryError::invalid_item(&placeholder, "missing 'name'")),
        };
        let f = Fields { item: name, map };

        let trajectory = match f.get("trajectory") {
            None | Some(Value::Null) => TrajectorySpec::FixedPoint(Vector3::zeros()),
            Some(v) => trajectory(&f, v)?,
        };
        let rotation = match f.get("rotationModel") {
            None | Some(Value::Null) => None,
            Some(v) => Some(rotation(&f, v)?),
        };
        let geometry = f.nested("geometry")?.map(|g| geometry(&g)).transpose()?;

        Ok(ItemSpec {
            name: name.to_string(),
            center: f.str("center")?.map(String::from),
            trajectory,
            trajectory_frame: frame(&f, "trajectoryFrame")?,
            rotation,
            body_frame: frame(&f, "bodyFrame")?,
            geometry,
            info: info(&f)?,
        })
    }

    /// Every name this item refers to, in declaration order.
    pub fn references(&self) -> Vec<Reference> {
        fn push(refs: &mut Vec<Reference>, name: &str, kind: ReferenceKind) {
            refs.push(Reference {
                name: name.to_string(),
                kind,
            });
        }

        fn trajectory_refs(spec: &TrajectorySpec, refs: &mut Vec<Reference>) {
            match spec {
                TrajectorySpec::Named(name) => push(refs, name, ReferenceKind::Trajectory),
                TrajectorySpec::Builtin(name) => {
                    push(refs, name, ReferenceKind::BuiltinTrajectory)
                }
                TrajectorySpec::LinearCombination { terms, .. } => {
                    terms.iter().for_each(|(t, _)| trajectory_refs(t, refs))
                }
                _ => {}
            }
        }

        let mut refs = Vec::new();
        if let Some(center) = &self.center {
            push(&mut refs, center, ReferenceKind::Center);
        }
        trajectory_refs(&self.trajectory, &mut refs);
        for frame in [&self.trajectory_frame, &self.body_frame] {
            if let FrameSpec::BodyFixed(body) = frame {
                push(&mut refs, body, ReferenceKind::Frame);
            }
        }
        match &self.rotation {
            Some(RotationSpec::Named(name)) => push(&mut refs, name, ReferenceKind::Rotation),
            Some(RotationSpec::Builtin(name)) => {
                push(&mut refs, name, ReferenceKind::BuiltinRotation)
            }
            _ => {}
        }
        refs
    }
}
