//! GeoJSON boundary reading.

use std::{fs, path::Path};

use anyhow::{anyhow, bail, ensure, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

use crate::{boundary::{BoundaryFeature, BoundarySet}, config::BoundaryProperties, types::DistrictId};

/// Read boundary features from GeoJSON FeatureCollection bytes.
pub(crate) fn read_boundaries_bytes(bytes: &[u8], props: &BoundaryProperties) -> Result<BoundarySet> {
    let value: Value = serde_json::from_slice(bytes).context("[io::geojson::read] Failed to parse GeoJSON bytes")?;
    ensure!(
        value["type"].as_str() == Some("FeatureCollection"),
        "[io::geojson::read] Expected a FeatureCollection, found {}", value["type"]
    );

    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("[io::geojson::read] FeatureCollection has no features array"))?;

    features.iter().enumerate()
        .map(|(idx, feature)| parse_feature(feature, props)
            .with_context(|| format!("[io::geojson::read] Invalid feature at index {idx}")))
        .collect()
}

/// Parse one feature. Name and geometry are required, the district number is optional.
fn parse_feature(feature: &Value, props: &BoundaryProperties) -> Result<BoundaryFeature> {
    let properties = feature["properties"].as_object()
        .ok_or_else(|| anyhow!("Feature has no properties object"))?;

    let name = properties.get(&props.name_property)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Feature has no string property {:?}", props.name_property))?;

    let district_id = properties.get(&props.id_property).and_then(parse_district_id);

    let geometry = parse_geometry(&feature["geometry"])
        .with_context(|| format!("Feature {name:?} has unusable geometry"))?;

    let mut rest = properties.clone();
    rest.remove(&props.id_property);
    rest.remove(&props.name_property);

    Ok(BoundaryFeature::new(district_id, name, geometry).with_properties(rest))
}

/// District numbers arrive as integers, integral floats or numeric strings; anything else is null.
fn parse_district_id(value: &Value) -> Option<DistrictId> {
    let id = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        })?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(id).ok().map(DistrictId)
}

/// Parse a Polygon or MultiPolygon geometry object.
fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>> {
    let ty = geometry["type"].as_str()
        .ok_or_else(|| anyhow!("Geometry is missing or has no type"))?;
    let coords = geometry["coordinates"].as_array()
        .ok_or_else(|| anyhow!("{ty} geometry has no coordinates array"))?;

    match ty {
        "Polygon" => Ok(MultiPolygon(vec![parse_polygon_coords(coords)?])),
        "MultiPolygon" => coords.iter()
            .map(|polygon| {
                let rings = polygon.as_array()
                    .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon is not an array"))?;
                parse_polygon_coords(rings)
            })
            .collect::<Result<Vec<_>>>()
            .map(MultiPolygon),
        other => bail!("Unsupported geometry type {other:?}"),
    }
}

/// Parse polygon rings: the first ring is the exterior, the rest are holes.
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        let ring = ring.as_array().ok_or_else(|| anyhow!("Invalid Polygon: ring is not an array"))?;
        parse_ring_coords(ring)
    });

    let exterior = rings.next()
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring from `[[x, y], ...]`, closing it if the source left it open.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = coords.iter()
        .map(|pair| {
            let pair = pair.as_array()
                .filter(|p| p.len() >= 2)
                .ok_or_else(|| anyhow!("Invalid coordinate: expected [x, y]"))?;
            let x = pair[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
            let y = pair[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last { points.push(first) }
    }

    Ok(LineString(points))
}

impl BoundarySet {
    /// Read district boundaries from a GeoJSON file.
    pub fn read_geojson(path: &Path, props: &BoundaryProperties) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("[io::geojson::read] Failed to open GeoJSON file: {}", path.display()))?;
        read_boundaries_bytes(&bytes, props)
            .with_context(|| format!("[io::geojson::read] Failed to read boundaries from {:?}", path))
    }

    /// Read district boundaries from GeoJSON bytes.
    pub fn from_geojson_bytes(bytes: &[u8], props: &BoundaryProperties) -> Result<Self> {
        read_boundaries_bytes(bytes, props)
    }
}
