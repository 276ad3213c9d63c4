use std::path::PathBuf;

/// Vienna district statistics choropleth builder
#[derive(clap::Parser, Debug)]
#[command(name = "wienmap-cli", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Dataset config (JSON), defaults to the Vienna vehicle registration dataset
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Download the statistics table and district boundaries
    Download(DownloadArgs),

    /// List the years and metrics available in a statistics table
    Inspect(InspectArgs),

    /// Join, enrich and label districts for one metric and year
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// Output directory, defaults to "."
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Overwrite previously downloaded files
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Statistics table (semicolon CSV), defaults to "./vehicles.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub table: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Statistics table (semicolon CSV), defaults to "./vehicles.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub table: Option<PathBuf>,

    /// District boundaries (GeoJSON), defaults to "./districts.geojson"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub boundaries: Option<PathBuf>,

    /// Metric column to display
    #[arg(short, long)]
    pub metric: String,

    /// Reference year
    #[arg(short, long)]
    pub year: i32,

    /// Output directory, defaults to "."
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(long)]
    pub force: bool,
}
