use std::{path::{Path, PathBuf}, time::Duration};

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::info;

use crate::{common::{ensure_dir_exists, PendingWrite}, config::Sources};

/// File name of the downloaded statistics table.
pub const TABLE_FILE: &str = "vehicles.csv";

/// File name of the downloaded district boundaries.
pub const BOUNDARY_FILE: &str = "districts.geojson";

/// Local copies of the two source datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFiles {
    pub table: PathBuf,
    pub boundaries: PathBuf,
}

impl SourceFiles {
    /// Expected locations inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self { table: dir.join(TABLE_FILE), boundaries: dir.join(BOUNDARY_FILE) }
    }
}

/// Download both datasets into `out_dir`. Existing files are kept unless `force`.
pub fn fetch_sources(sources: &Sources, out_dir: &Path, force: bool) -> Result<SourceFiles> {
    ensure_dir_exists(out_dir)?;
    let files = SourceFiles::in_dir(out_dir);

    let client = Client::builder()
        .user_agent(concat!("wienmap/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(120))
        .build()
        .context("build HTTP client")?;

    download_file(&client, &sources.table_url, &files.table, force)?;
    download_file(&client, &sources.boundary_url, &files.boundaries, force)?;

    Ok(files)
}

/// Stream `url` into `out_path` through a temp file.
fn download_file(client: &Client, url: &str, out_path: &Path, force: bool) -> Result<()> {
    // Fail before the request if the target is already there.
    let mut sink = PendingWrite::open(out_path, force)?;

    info!(url, path = %out_path.display(), "downloading");
    let mut resp = client.get(url)
        .send()
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url} returned error status"))?;

    let bytes = std::io::copy(&mut resp, &mut sink)
        .with_context(|| format!("write {}", out_path.display()))?;

    sink.finalize()?;
    info!(path = %out_path.display(), bytes, "downloaded");
    Ok(())
}
