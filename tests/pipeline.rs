// End-to-end tests: raw CSV + GeoJSON in, enriched layer and labels out.

use std::sync::Arc;

use geo::{ConvexHull, Intersects};
use serde_json::{json, Value};
use wienmap::{
    run, BoundarySet, DatasetConfig, DistrictId, Match, PipelineCache, Selection, Snapshot, TabularDataset, ORIGIN,
};

const TABLE: &str = "\
Kfz-Bestand Wien nach Bezirken;;;;;;
NUTS;DISTRICT_CODE;SUB_DISTRICT_CODE;REF_YEAR;REF_DATE;PKW_VALUE;MOTO_VALUE
AT130;90100;90100;2020;20201231;1.000,0;120
AT130;90200;90200;2020;20201231;52.340,5;k.A.
AT130;90300;90300;2020;20201231;40.100;300
AT130;90100;90100;2021;20211231;990;118
";

const CONFIG: &[u8] = br#"{
    "metrics": [
        { "column": "PKW_VALUE", "title": "Passenger cars" },
        { "column": "MOTO_VALUE", "title": "Motorcycles" }
    ]
}"#;

/// Axis-aligned square ring around `(cx, cy)`.
fn square(cx: f64, cy: f64, half: f64) -> Value {
    json!([[
        [cx - half, cy - half], [cx + half, cy - half], [cx + half, cy + half], [cx - half, cy + half], [cx - half, cy - half]
    ]])
}

fn boundaries() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "BEZNR": 1, "NAMEK": "Innere Stadt", "UMFANG": 6.8 },
                "geometry": { "type": "Polygon", "coordinates": square(16.37, 48.20, 0.01) }
            },
            {
                "type": "Feature",
                "properties": { "BEZNR": 2, "NAMEK": "Leopoldstadt" },
                "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [2, 2], [2, 0], [0, 2], [0, 0]]] }
            },
            {
                "type": "Feature",
                "properties": { "BEZNR": 99, "NAMEK": "Nirgendwo" },
                "geometry": { "type": "Polygon", "coordinates": square(16.5, 48.3, 0.01) }
            },
            {
                "type": "Feature",
                "properties": { "NAMEK": "Donauinsel" },
                "geometry": { "type": "MultiPolygon", "coordinates": [square(16.4, 48.25, 0.005)] }
            },
            {
                "type": "Feature",
                "properties": { "BEZNR": 3, "NAMEK": "Landstraße" },
                "geometry": { "type": "Polygon", "coordinates": [[
                    [16.38, 48.18], [16.42, 48.18], [16.42, 48.21], [16.41, 48.21],
                    [16.41, 48.19], [16.39, 48.19], [16.39, 48.21], [16.38, 48.21], [16.38, 48.18]
                ]] }
            }
        ]
    })
}

fn config() -> DatasetConfig {
    DatasetConfig::from_json_bytes(CONFIG).unwrap()
}

fn load() -> (TabularDataset, BoundarySet, DatasetConfig) {
    let config = config();
    let table = TabularDataset::from_csv_bytes(TABLE.as_bytes(), &config).unwrap();
    let boundaries = BoundarySet::from_geojson_bytes(boundaries().to_string().as_bytes(), &config.boundary).unwrap();
    (table, boundaries, config)
}

#[test]
fn join_preserves_boundary_cardinality_and_order() {
    let (table, boundaries, config) = load();
    for year in [2019, 2020, 2021] {
        for metric in ["PKW_VALUE", "MOTO_VALUE"] {
            let output = run(&table, &boundaries, &Selection::new(&config, metric, year).unwrap()).unwrap();
            assert_eq!(output.features.len(), boundaries.len());
            for (enriched, source) in output.features.iter().zip(boundaries.features()) {
                assert!(Arc::ptr_eq(&enriched.feature, source));
            }
        }
    }
}

#[test]
fn matched_district_gets_value_centroid_and_label() {
    let (table, boundaries, config) = load();
    let output = run(&table, &boundaries, &Selection::new(&config, "PKW_VALUE", 2020).unwrap()).unwrap();

    let inner = &output.features[0];
    assert_eq!(inner.feature.district_id(), Some(DistrictId(1)));
    assert_eq!(inner.matched_value(), Some(1000.0));
    assert!((inner.centroid.x() - 16.37).abs() < 1e-9);
    assert!((inner.centroid.y() - 48.20).abs() < 1e-9);

    assert_eq!(output.labels[0].text, "Innere Stadt:\n1000.0");
    assert_eq!(output.labels[0].position, [inner.centroid.x(), inner.centroid.y()]);
}

#[test]
fn district_absent_from_table_is_zero_and_unlabelled() {
    let (table, boundaries, config) = load();
    let output = run(&table, &boundaries, &Selection::new(&config, "PKW_VALUE", 2020).unwrap()).unwrap();

    let nowhere = &output.features[2];
    assert_eq!(nowhere.feature.name(), "Nirgendwo");
    assert_eq!(nowhere.matched, Match::Missing);
    assert_eq!(nowhere.matched_value(), Some(0.0));
    assert!(output.labels.iter().all(|l| !l.text.starts_with("Nirgendwo")));

    let island = &output.features[3];
    assert_eq!(island.feature.district_id(), None);
    assert_eq!(island.matched, Match::Unkeyed);
    assert_eq!(island.matched_value(), None);
    assert!(island.geometry_valid);
}

#[test]
fn self_intersecting_boundary_is_anchored_at_origin() {
    let (table, boundaries, config) = load();
    let output = run(&table, &boundaries, &Selection::new(&config, "PKW_VALUE", 2020).unwrap()).unwrap();

    let bowtie = &output.features[1];
    assert_eq!(bowtie.centroid, ORIGIN);
    assert_eq!((bowtie.centroid.x(), bowtie.centroid.y()), (0.0, 0.0));
    assert!(!bowtie.geometry_valid);
    // Matched data still labels, at the sentinel point.
    assert_eq!(bowtie.matched_value(), Some(52340.5));
    assert!(output.labels.iter().any(|l| l.text == "Leopoldstadt:\n52340.5" && l.position == [0.0, 0.0]));
}

#[test]
fn valid_centroids_lie_in_convex_hull() {
    let (table, boundaries, config) = load();
    let output = run(&table, &boundaries, &Selection::new(&config, "PKW_VALUE", 2020).unwrap()).unwrap();

    for enriched in output.features.iter().filter(|f| f.geometry_valid) {
        let hull = enriched.feature.geometry().convex_hull();
        assert!(hull.intersects(&enriched.centroid), "{} centroid outside hull", enriched.feature.name());
    }

    // The U-shaped district has its centroid in the notch, outside the outline itself.
    let landstrasse = &output.features[4];
    assert!(landstrasse.geometry_valid);
    assert!(!landstrasse.feature.geometry().intersects(&landstrasse.centroid));
}

#[test]
fn labels_follow_boundary_order() {
    let (table, boundaries, config) = load();
    let output = run(&table, &boundaries, &Selection::new(&config, "PKW_VALUE", 2020).unwrap()).unwrap();

    let texts: Vec<_> = output.labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, ["Innere Stadt:\n1000.0", "Leopoldstadt:\n52340.5", "Landstraße:\n40100.0"]);
}

#[test]
fn non_numeric_cell_propagates_as_absent() {
    let (table, boundaries, config) = load();
    let output = run(&table, &boundaries, &Selection::new(&config, "MOTO_VALUE", 2020).unwrap()).unwrap();

    assert_eq!(output.features[1].matched, Match::Found(None));
    assert_eq!(output.features[1].matched_value(), None);
    let texts: Vec<_> = output.labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, ["Innere Stadt:\n120.0", "Landstraße:\n300.0"]);
}

#[test]
fn year_without_rows_paints_zeros() {
    let (table, boundaries, config) = load();
    let output = run(&table, &boundaries, &Selection::new(&config, "PKW_VALUE", 1999).unwrap()).unwrap();

    assert_eq!(output.features.len(), boundaries.len());
    assert!(output.labels.is_empty());
    for enriched in &output.features {
        let expected = enriched.feature.district_id().map(|_| 0.0);
        assert_eq!(enriched.matched_value(), expected);
    }
}

#[test]
fn unknown_metric_fails_fast() {
    let (table, boundaries, config) = load();
    assert!(Selection::new(&config, "LKW_VALUE", 2020).is_err());

    // A selection valid for one config but not carried by this table is rejected too.
    let other = DatasetConfig::from_json_bytes(br#"{ "metrics": [ { "column": "LKW_VALUE", "title": "Trucks" } ] }"#).unwrap();
    let selection = Selection::new(&other, "LKW_VALUE", 2020).unwrap();
    let err = run(&table, &boundaries, &selection).unwrap_err();
    assert!(err.to_string().contains("LKW_VALUE"));
}

#[test]
fn pipeline_is_idempotent() {
    let (table, boundaries, config) = load();
    let selection = Selection::new(&config, "PKW_VALUE", 2020).unwrap();

    let first = run(&table, &boundaries, &selection).unwrap();
    let second = run(&table, &boundaries, &selection).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_geojson(&config.boundary).to_string(), second.to_geojson(&config.boundary).to_string());
    assert_eq!(first.labels_to_json().unwrap(), second.labels_to_json().unwrap());
}

#[test]
fn cache_reuses_results_per_snapshot_and_selection() {
    let config = config();
    let geojson = boundaries().to_string();
    let snapshot = Snapshot::load(TABLE.as_bytes(), geojson.as_bytes(), &config).unwrap();
    let mut cache = PipelineCache::new();

    let cars = Selection::new(&config, "PKW_VALUE", 2020).unwrap();
    let first = cache.get_or_run(&snapshot, &cars).unwrap();
    let again = cache.get_or_run(&snapshot, &cars).unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(cache.len(), 1);

    let later = Selection::new(&config, "PKW_VALUE", 2021).unwrap();
    let other = cache.get_or_run(&snapshot, &later).unwrap();
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(other.labels[0].text, "Innere Stadt:\n990.0");
    assert_eq!(cache.len(), 2);

    let reloaded = Snapshot::load(TABLE.replace("990", "991").as_bytes(), geojson.as_bytes(), &config).unwrap();
    assert_ne!(reloaded.id(), snapshot.id());
    let fresh = cache.get_or_run(&reloaded, &later).unwrap();
    assert_eq!(fresh.labels[0].text, "Innere Stadt:\n991.0");
    assert_eq!(cache.len(), 3);

    assert_eq!(cache.invalidate(snapshot.id()), 2);
    assert_eq!(cache.len(), 1);
}

#[test]
fn enriched_geojson_carries_metric_and_passthrough_properties() {
    let (table, boundaries, config) = load();
    let output = run(&table, &boundaries, &Selection::new(&config, "PKW_VALUE", 2020).unwrap()).unwrap();
    let geojson = output.to_geojson(&config.boundary);

    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 5);

    let inner = &features[0]["properties"];
    assert_eq!(inner["BEZNR"], json!(1));
    assert_eq!(inner["NAMEK"], json!("Innere Stadt"));
    assert_eq!(inner["PKW_VALUE"], json!(1000.0));
    assert_eq!(inner["UMFANG"], json!(6.8));
    assert_eq!(features[0]["geometry"]["type"], json!("MultiPolygon"));

    assert_eq!(features[2]["properties"]["PKW_VALUE"], json!(0.0));
    assert_eq!(features[3]["properties"]["PKW_VALUE"], Value::Null);
    assert_eq!(features[3]["properties"]["BEZNR"], Value::Null);
    assert_eq!(features[1]["properties"]["centroid"], json!([0.0, 0.0]));
}

#[test]
fn outputs_are_written_to_disk() {
    let (table, boundaries, config) = load();
    let output = run(&table, &boundaries, &Selection::new(&config, "PKW_VALUE", 2020).unwrap()).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let geojson_path = dir.path().join("districts.enriched.geojson");
    let labels_path = dir.path().join("labels.json");
    let series_path = dir.path().join("series.csv");

    output.write_geojson(&geojson_path, &config.boundary, false).unwrap();
    output.write_labels(&labels_path, false).unwrap();
    table.write_series_csv(&series_path, 2020, "PKW_VALUE", false).unwrap();

    let labels: Value = serde_json::from_slice(&std::fs::read(&labels_path).unwrap()).unwrap();
    assert_eq!(labels[0]["text"], json!("Innere Stadt:\n1000.0"));
    assert_eq!(labels.as_array().unwrap().len(), 3);

    let series = std::fs::read_to_string(&series_path).unwrap();
    assert_eq!(series.lines().count(), 4);

    assert!(output.write_labels(&labels_path, false).is_err());
    output.write_labels(&labels_path, true).unwrap();
}
