/// Overpass API river geometry reader.
///
/// Builds a `RiverModel` from the JSON returned by an Overpass query of the
/// form `relation["name"="Saar"]["waterway"="river"]; out geom;`. The
/// response must hold exactly one relation. Its way members are
/// concatenated in member order into a single polyline and projected;
/// members without geometry (nodes such as the source or mouth) are
/// skipped.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::model::FloodError;
use crate::projection::{PlanarPoint, Projection};
use crate::river::RiverModel;

// ============================================================================
// Overpass Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    #[serde(default)]
    pub members: Vec<OverpassMember>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassMember {
    #[serde(rename = "type", default)]
    pub member_type: Option<String>,
    #[serde(rename = "ref", default)]
    pub member_ref: Option<i64>,
    #[serde(default)]
    pub geometry: Option<Vec<LatLon>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

// ============================================================================
// Conversion
// ============================================================================

/// Parses an Overpass response and projects it into a named river.
pub fn parse_river<P: Projection>(
    name: &str,
    json: &str,
    projection: &P,
) -> Result<RiverModel, FloodError> {
    let response: OverpassResponse = serde_json::from_str(json)?;

    let element = match response.elements.as_slice() {
        [only] => only,
        other => {
            return Err(FloodError::RiverGeometry(format!(
                "{}: expected exactly one relation, found {}",
                name,
                other.len()
            )));
        }
    };

    let mut points: Vec<PlanarPoint> = Vec::new();
    for member in &element.members {
        match &member.geometry {
            Some(geometry) => {
                points.extend(geometry.iter().map(|p| projection.project(p.lat, p.lon)));
            }
            None => log::debug!(
                "{}: skipping {} member {} without geometry",
                name,
                member.member_type.as_deref().unwrap_or("unknown"),
                member.member_ref.map(|r| r.to_string()).unwrap_or_default()
            ),
        }
    }

    RiverModel::new(name, points)
}

/// Reads an Overpass response file and projects it into a named river.
pub fn load_river<P: AsRef<Path>, Q: Projection>(
    name: &str,
    path: P,
    projection: &Q,
) -> Result<RiverModel, FloodError> {
    let content = fs::read_to_string(path.as_ref())?;
    let river = parse_river(name, &content, projection)?;
    log::info!(
        "Loaded river {} from {}: {} vertices, {:.0} units long",
        name,
        path.as_ref().display(),
        river.vertex_count(),
        river.length()
    );
    Ok(river)
}

// ============================================================================
// Tests
// ============================================================================
