use anyhow::Result;
use wienmap::{table_columns, TabularDataset, TABLE_FILE};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::InspectArgs) -> Result<()> {
    let config = crate::load_config(cli)?;
    let table_path = &args.table.clone().unwrap_or(TABLE_FILE.into());

    let table = TabularDataset::read_csv(table_path, &config)?;

    println!("[inspect] {} rows in {}", table.len(), table_path.display());
    let years = table.years().iter().map(i32::to_string).collect::<Vec<_>>();
    println!("years: {}", years.join(", "));
    println!("metrics:");
    for metric in &config.metrics {
        println!("  {:<24} {}", metric.column, metric.title);
    }

    let unconfigured = table_columns(table_path, &config)?
        .into_iter()
        .filter(|name| !config.has_metric(name))
        .collect::<Vec<_>>();
    if !unconfigured.is_empty() {
        println!("other columns (list them in --config to select):");
        println!("  {}", unconfigured.join(", "));
    }
    Ok(())
}
