use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Geographic data file ingestion (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "mapfiles", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a geographic data file and report what was imported
    Ingest(IngestArgs),
}

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Input file (shapefile zip, bare .shp, or ACS .csv)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Declared file type: shapefile, shapefile_zip, kml, kmz, or an ACS
    /// geography (tracts, county-subdivisions, counties, states, places)
    #[arg(short, long)]
    pub kind: String,

    /// Display name for the upload (defaults to the file name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Boundary-lookup service base URL override
    #[arg(long)]
    pub boundary_url: Option<String>,

    /// Boundary-lookup request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Write imported features as a GeoJSON FeatureCollection
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub out: Option<PathBuf>,

    /// Write the processing report as JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub report: Option<PathBuf>,
}
