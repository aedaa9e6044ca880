use anyhow::Result;
use polmap::{Choropleth, Config, MapBuilder, Party, ensure_writable};

use crate::cli::{Cli, MapArgs, PartyMapArgs};

pub fn support(cli: &Cli, args: &PartyMapArgs) -> Result<()> {
    let builder = load_builder(cli)?;
    check_outputs(&args.map)?;
    let party = resolve_party(&builder, args.party.as_deref())?;

    eprintln!("[support] building support map for {party}");
    let map = builder.support_map(party)?;
    write_outputs(&builder, &map, &args.map, cli.verbose)
}

pub fn growth(cli: &Cli, args: &MapArgs) -> Result<()> {
    let builder = load_builder(cli)?;
    check_outputs(args)?;

    eprintln!("[growth] building natural growth map");
    let map = builder.growth_map()?;
    write_outputs(&builder, &map, args, cli.verbose)
}

pub fn product(cli: &Cli, args: &PartyMapArgs) -> Result<()> {
    let builder = load_builder(cli)?;
    check_outputs(&args.map)?;
    let party = resolve_party(&builder, args.party.as_deref())?;

    eprintln!("[product] building product index map for {party}");
    let map = builder.product_map(party)?;
    write_outputs(&builder, &map, &args.map, cli.verbose)
}

pub(crate) fn load_builder(cli: &Cli) -> Result<MapBuilder> {
    if cli.verbose > 0 { eprintln!("[polmap] reading config from {}", cli.config.display()); }
    Ok(MapBuilder::new(Config::load_from_file(&cli.config)?, cli.verbose))
}

fn resolve_party(builder: &MapBuilder, name: Option<&str>) -> Result<Party> {
    match name {
        Some(name) => Ok(Party::from_name(name)?),
        None => builder.default_party(),
    }
}

/// Validate every requested output before any work is done.
fn check_outputs(args: &MapArgs) -> Result<()> {
    ensure_writable(&args.output, args.force)?;
    for path in args.csv.iter().chain(&args.geojson) {
        ensure_writable(path, args.force)?;
    }
    Ok(())
}

fn write_outputs(builder: &MapBuilder, map: &Choropleth, args: &MapArgs, verbose: u8) -> Result<()> {
    for report in &map.reports {
        eprintln!("[polmap] {}: matched {} of {} regions", report.table, report.matched, report.regions);
    }
    if verbose > 0 { eprintln!("[polmap] {} regions without a color class", map.unclassified()?); }

    eprintln!("[polmap] writing map to {}", args.output.display());
    map.to_svg(&args.output, builder.canvas())?;

    if let Some(path) = &args.csv {
        eprintln!("[polmap] writing joined table to {}", path.display());
        map.layer.to_csv(path)?;
    }
    if let Some(path) = &args.geojson {
        eprintln!("[polmap] writing GeoJSON to {}", path.display());
        map.layer.write_geojson(path)?;
    }
    Ok(())
}
