//! Conversion of legacy SSC records into current-schema catalog items.
//!
//! The output is the same JSON object a current catalog would contain, so legacy and current
//! documents go through a single resolver. A record `"Phobos" "Sol/Mars"` becomes the item
//! `Sol/Mars/Phobos` centered on `Sol/Mars`.
//!
//! ## Units
//!
//! Orbits and fixed positions around a star (a parent path without `/`) use AU and Julian years;
//! everything else uses km and days. Angles are degrees, rotation periods hours.
use log::debug;
use serde_json::{json, Map, Value};

use crate::{constants::J2000_JD, orrery_errors::OrreryError};

use super::{
    document::CatalogDocument,
    ssc_reader::{parse_ssc, Disposition, SscKind, SscRecord, SscValue},
};

/// Builtin trajectory names for the Celestia `CustomOrbit` identifiers.
fn builtin_orbit_name(custom: &str) -> &str {
    match custom.to_ascii_lowercase().as_str() {
        "vsop87-mercury" | "jpl-mercury-sun" => "Mercury",
        "vsop87-venus" | "jpl-venus-sun" => "Venus",
        "vsop87-earth" | "jpl-earth-sun" => "Earth",
        "jpl-emb-sun" => "EMB",
        "vsop87-mars" | "jpl-mars-sun" => "Mars",
        "vsop87-jupiter" | "jpl-jupiter-sun" => "Jupiter",
        "vsop87-saturn" | "jpl-saturn-sun" => "Saturn",
        "vsop87-uranus" | "jpl-uranus-sun" => "Uranus",
        "vsop87-neptune" | "jpl-neptune-sun" => "Neptune",
        "pluto" | "jpl-pluto-sun" => "Pluto",
        "moon" | "jpl-moon-emb" => "Moon",
        "vsop87-sun" | "jpl-sun-ssb" => "Sun",
        _ => custom,
    }
}

fn builtin_rotation_name(custom: &str) -> &str {
    match custom.to_ascii_lowercase().as_str() {
        "iau-moon" => "IAU Moon",
        _ => custom,
    }
}

fn number(value: Option<&SscValue>) -> Option<f64> {
    value.and_then(SscValue::as_f64)
}

fn with_unit(value: f64, unit: &str) -> Value {
    Value::String(format!("{value} {unit}"))
}

struct Units {
    length: &'static str,
    time: &'static str,
}

fn units_for_parent(parent: &str) -> Units {
    if parent.contains('/') {
        Units {
            length: "km",
            time: "d",
        }
    } else {
        Units {
            length: "au",
            time: "y",
        }
    }
}

fn elliptical_orbit(orbit: &SscValue, units: &Units) -> Value {
    let mut spec = Map::new();
    spec.insert("type".into(), json!("Keplerian"));

    let mut put = |key: &str, value: Option<f64>, unit: &str| {
        if let Some(v) = value {
            spec.insert(key.into(), with_unit(v, unit));
        }
    };
    put("period", number(orbit.get("Period")), units.time);
    put("semiMajorAxis", number(orbit.get("SemiMajorAxis")), units.length);
    put(
        "periapsisDistance",
        number(orbit.get("PericenterDistance")),
        units.length,
    );
    put("inclination", number(orbit.get("Inclination")), "deg");
    put("ascendingNode", number(orbit.get("AscendingNode")), "deg");
    put("argumentOfPeriapsis", number(orbit.get("ArgOfPericenter")), "deg");
    put("longitudeOfPeriapsis", number(orbit.get("LongOfPericenter")), "deg");
    put("meanAnomaly", number(orbit.get("MeanAnomaly")), "deg");
    put("meanLongitude", number(orbit.get("MeanLongitude")), "deg");

    spec.insert(
        "eccentricity".into(),
        json!(number(orbit.get("Eccentricity")).unwrap_or(0.0)),
    );
    let epoch = match orbit.get("Epoch") {
        Some(SscValue::String(date)) => json!(date),
        other => json!(number(other).unwrap_or(J2000_JD)),
    };
    spec.insert("epoch".into(), epoch);

    Value::Object(spec)
}

fn uniform_rotation(
    period: Option<f64>,
    inclination: Option<f64>,
    node: Option<f64>,
    meridian: Option<f64>,
    epoch: Option<&SscValue>,
) -> Value {
    let mut spec = Map::new();
    spec.insert("type".into(), json!("Uniform"));
    spec.insert("period".into(), with_unit(period.unwrap_or(0.0), "h"));
    spec.insert("inclination".into(), with_unit(inclination.unwrap_or(0.0), "deg"));
    spec.insert("ascendingNode".into(), with_unit(node.unwrap_or(0.0), "deg"));
    spec.insert("meridianAngle".into(), with_unit(meridian.unwrap_or(0.0), "deg"));
    match epoch {
        Some(SscValue::String(date)) => {
            spec.insert("epoch".into(), json!(date));
        }
        Some(SscValue::Number(jd)) => {
            spec.insert("epoch".into(), json!(jd));
        }
        _ => {}
    }
    Value::Object(spec)
}

/// `OrbitFrame` / `BodyFrame` groups: `{ EquatorJ2000 {} }`, `{ BodyFixed { Center "…" } }`.
fn frame(group: &SscValue) -> Option<Value> {
    let (kind, body) = group.as_group()?.first()?;
    match kind.as_str() {
        "EquatorJ2000" | "EclipticJ2000" | "ICRF" => Some(json!(kind)),
        "BodyFixed" => {
            let center = body.get("Center").and_then(SscValue::as_str)?;
            Some(json!({ "type": "BodyFixed", "body": center }))
        }
        other => {
            debug!("Unsupported SSC frame {other}, keeping the default");
            None
        }
    }
}

fn trajectory(record: &SscRecord, units: &Units) -> Option<Value> {
    if let Some(orbit) = record.get("EllipticalOrbit") {
        return Some(elliptical_orbit(orbit, units));
    }
    if let Some(custom) = record.get("CustomOrbit").and_then(SscValue::as_str) {
        return Some(json!({ "type": "Builtin", "name": builtin_orbit_name(custom) }));
    }
    if let Some(source) = record.get("SampledOrbit").and_then(SscValue::as_str) {
        return Some(json!({ "type": "Sampled", "source": source }));
    }
    if let Some(position) = record.get("FixedPosition").and_then(SscValue::as_vector) {
        let position: Vec<Value> = position
            .iter()
            .map(|v| with_unit(*v, units.length))
            .collect();
        return Some(json!({ "type": "FixedPoint", "position": position }));
    }
    None
}

fn rotation_model(record: &SscRecord) -> Option<Value> {
    if let Some(custom) = record.get("CustomRotation").and_then(SscValue::as_str) {
        return Some(json!({ "type": "Builtin", "name": builtin_rotation_name(custom) }));
    }
    if let Some(uniform) = record.get("UniformRotation") {
        return Some(uniform_rotation(
            number(uniform.get("Period")),
            number(uniform.get("Inclination")),
            number(uniform.get("AscendingNode")),
            number(uniform.get("MeridianAngle")),
            uniform.get("Epoch"),
        ));
    }
    let period = number(record.get("RotationPeriod"));
    let obliquity = number(record.get("Obliquity"));
    let node = number(record.get("EquatorAscendingNode"));
    let offset = number(record.get("RotationOffset"));
    if period.is_some() || obliquity.is_some() || node.is_some() || offset.is_some() {
        return Some(uniform_rotation(
            period,
            obliquity,
            node,
            offset,
            record.get("RotationEpoch"),
        ));
    }
    None
}

fn geometry(record: &SscRecord) -> Option<Value> {
    let radius = number(record.get("Radius"));
    if let Some(mesh) = record.get("Mesh").and_then(SscValue::as_str) {
        let mut spec = json!({ "type": "Mesh", "source": mesh });
        if let Some(r) = radius {
            spec["size"] = json!(r);
        }
        return Some(spec);
    }
    if record.kind == SscKind::ReferencePoint {
        return None;
    }
    let radius = radius?;
    let mut spec = json!({ "type": "Globe", "radius": radius });
    if let Some(texture) = record.get("Texture").and_then(SscValue::as_str) {
        spec["baseMap"] = json!(texture);
    }
    Some(spec)
}

/// Convert one record into a current-schema item; `None` for record kinds that have no
/// counterpart (alternate surfaces and surface locations).
pub fn transform_ssc_record(record: &SscRecord) -> Option<Value> {
    if matches!(record.kind, SscKind::AltSurface | SscKind::Location) {
        debug!(
            "Skipping SSC {:?} '{}' (line {})",
            record.kind, record.name, record.line
        );
        return None;
    }

    let units = units_for_parent(&record.parent);
    let mut item = Map::new();
    item.insert(
        "name".into(),
        json!(format!("{}/{}", record.parent, record.name)),
    );
    item.insert("center".into(), json!(record.parent));

    if let Some(class) = record.get("Class").and_then(SscValue::as_str) {
        item.insert("class".into(), json!(class));
    }
    if let Some(traj) = trajectory(record, &units) {
        item.insert("trajectory".into(), traj);
    }
    let orbit_frame = record
        .get("OrbitFrame")
        .and_then(frame)
        .unwrap_or_else(|| json!("EclipticJ2000"));
    item.insert("trajectoryFrame".into(), orbit_frame);
    let body_frame = record
        .get("BodyFrame")
        .and_then(frame)
        .unwrap_or_else(|| json!("EquatorJ2000"));
    item.insert("bodyFrame".into(), body_frame);

    if let Some(rotation) = rotation_model(record) {
        item.insert("rotationModel".into(), rotation);
    }
    if let Some(geom) = geometry(record) {
        item.insert("geometry".into(), geom);
    }
    if let Some([r, g, b]) = record.get("Color").and_then(SscValue::as_vector) {
        item.insert("label".into(), json!({ "color": [r, g, b] }));
    }
    if let Some(url) = record.get("InfoURL").and_then(SscValue::as_str) {
        item.insert("description".into(), json!(url));
    }

    debug!(
        "Converted SSC record '{}' (line {}) into {}",
        record.name,
        record.line,
        Value::Object(item.clone())
    );
    Some(Value::Object(item))
}

/// Apply `Modify` and `Replace` dispositions: a modification merges its properties into the
/// earlier record of the same object, a replacement discards it.
fn merge_dispositions(records: Vec<SscRecord>) -> Vec<SscRecord> {
    let mut merged: Vec<SscRecord> = Vec::with_capacity(records.len());
    for record in records {
        let previous = merged
            .iter()
            .position(|r| r.name == record.name && r.parent == record.parent);
        match (record.disposition, previous) {
            (Disposition::Modify, Some(index)) => {
                let target = &mut merged[index];
                if let (SscValue::Group(props), SscValue::Group(new_props)) =
                    (&mut target.properties, record.properties)
                {
                    for (key, value) in new_props {
                        props.retain(|(k, _)| *k != key);
                        props.push((key, value));
                    }
                }
            }
            (Disposition::Replace, Some(index)) => {
                merged.remove(index);
                merged.push(record);
            }
            _ => merged.push(record),
        }
    }
    merged
}

/// Parse an SSC document and convert it into a catalog document named `name`.
pub fn ssc_to_document(name: &str, text: &str) -> Result<CatalogDocument, OrreryError> {
    let records = merge_dispositions(parse_ssc(text)?);
    let items = records.iter().filter_map(transform_ssc_record).collect();
    Ok(CatalogDocument::new(name, items))
}
