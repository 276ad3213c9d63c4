use anyhow::Result;
use wienmap::fetch_sources;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::DownloadArgs) -> Result<()> {
    let config = crate::load_config(cli)?;
    let out_dir = &args.output.clone().unwrap_or(".".into());

    let files = fetch_sources(&config.sources, out_dir, args.force)?;

    println!("[download] table -> {}", files.table.display());
    println!("[download] boundaries -> {}", files.boundaries.display());
    Ok(())
}
