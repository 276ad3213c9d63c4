//! GeoJSON export of the enriched district layer.

use std::path::Path;

use anyhow::{Context, Result};
use geo::MultiPolygon;
use serde_json::{json, Value};

use crate::{common::write_atomic, config::BoundaryProperties, pipeline::PipelineOutput};

impl PipelineOutput {
    /// Export the enriched features as a GeoJSON FeatureCollection for choropleth colouring.
    ///
    /// Each feature keeps its passthrough properties and gains the district id and name under
    /// the configured property names, the selected metric (null when there is nothing to paint)
    /// and a `centroid` pair.
    pub fn to_geojson(&self, props: &BoundaryProperties) -> Value {
        let metric = self.selection.metric();

        let features: Vec<Value> = self.features.iter().map(|enriched| {
            let feature = &enriched.feature;
            let mut properties = feature.properties().clone();
            properties.insert(props.id_property.clone(), json!(feature.district_id().map(|id| id.get())));
            properties.insert(props.name_property.clone(), json!(feature.name()));
            properties.insert(metric.to_owned(), json!(enriched.matched_value()));
            properties.insert("centroid".into(), json!([enriched.centroid.x(), enriched.centroid.y()]));

            json!({
                "type": "Feature",
                "geometry": multipolygon_to_geojson(feature.geometry()),
                "properties": properties,
            })
        }).collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }

    /// Write the enriched features to a GeoJSON file.
    pub fn write_geojson(&self, path: &Path, props: &BoundaryProperties, force: bool) -> Result<()> {
        let bytes = serde_json::to_vec(&self.to_geojson(props))
            .context("[io::geojson::write] Failed to serialize GeoJSON to bytes")?;
        write_atomic(path, &bytes, force)
            .with_context(|| format!("[io::geojson::write] Failed to write GeoJSON to {:?}", path))
    }
}

/// Convert a MultiPolygon to a GeoJSON geometry object.
fn multipolygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    let polygons: Vec<Vec<Vec<[f64; 2]>>> = mp.0.iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
                .collect()
        })
        .collect();

    json!({
        "type": "MultiPolygon",
        "coordinates": polygons,
    })
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    #[test]
    fn geometry_is_standard_multipolygon() {
        let mp = MultiPolygon(vec![polygon!(
            exterior: [(x: 0., y: 0.), (x: 4., y: 0.), (x: 4., y: 4.)],
            interiors: [[(x: 1., y: 1.), (x: 2., y: 1.), (x: 2., y: 2.)]]
        )]);
        let value = multipolygon_to_geojson(&mp);
        assert_eq!(value["type"], "MultiPolygon");
        assert_eq!(value["coordinates"][0][0], json!([[0., 0.], [4., 0.], [4., 4.], [0., 0.]]));
        assert_eq!(value["coordinates"][0][1][2], json!([2., 2.]));
    }
}
