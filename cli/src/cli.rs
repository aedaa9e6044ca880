use std::path::PathBuf;

/// Choropleth maps of Polish administrative units (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "polmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// TOML file naming the boundary, election and growth sources
    #[arg(short, long, value_hint = clap::ValueHint::FilePath, default_value = "polmap.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Map one party's vote share (forbids stdout)
    Support(PartyMapArgs),

    /// Map natural growth per 1000 residents (forbids stdout)
    Growth(MapArgs),

    /// Map the support x growth product index (forbids stdout)
    Product(PartyMapArgs),

    /// Draw region boundaries without data (forbids stdout)
    Outline(OutlineArgs),
}

#[derive(clap::Args, Debug)]
pub struct PartyMapArgs {
    /// Party name, e.g. KO, PiS, "Nowa Lewica"; defaults to `default_party` from the config
    #[arg(short, long)]
    pub party: Option<String>,

    #[command(flatten)]
    pub map: MapArgs,
}

#[derive(clap::Args, Debug)]
pub struct MapArgs {
    /// Output SVG file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Overwrite existing output files
    #[arg(long)]
    pub force: bool,

    /// Also write the joined table as CSV
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub csv: Option<PathBuf>,

    /// Also write the joined layer as GeoJSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub geojson: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct OutlineArgs {
    /// Output SVG file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}
