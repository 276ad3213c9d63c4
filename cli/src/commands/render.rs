use anyhow::Result;
use wienmap::{PipelineCache, Selection, Snapshot, BOUNDARY_FILE, TABLE_FILE};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::RenderArgs) -> Result<()> {
    let config = crate::load_config(cli)?;
    let table_path = &args.table.clone().unwrap_or(TABLE_FILE.into());
    let boundary_path = &args.boundaries.clone().unwrap_or(BOUNDARY_FILE.into());
    let out_dir = &args.output.clone().unwrap_or(".".into());

    let selection = Selection::new(&config, &args.metric, args.year)?;

    println!("[render] loading {} and {}", table_path.display(), boundary_path.display());
    let snapshot = Snapshot::from_files(table_path, boundary_path, &config)?;

    let mut cache = PipelineCache::new();
    let output = cache.get_or_run(&snapshot, &selection)?;

    let title = config.metric_title(selection.metric()).unwrap_or(selection.metric());
    println!(
        "[render] {title} ({}): {} districts, {} labels",
        selection.year(),
        output.features.len(),
        output.labels.len()
    );

    output.write_geojson(&out_dir.join("districts.enriched.geojson"), &config.boundary, args.force)?;
    output.write_labels(&out_dir.join("labels.json"), args.force)?;
    snapshot.table().write_series_csv(&out_dir.join("series.csv"), selection.year(), selection.metric(), args.force)?;

    println!("[render] wrote outputs to {}", out_dir.display());
    Ok(())
}
