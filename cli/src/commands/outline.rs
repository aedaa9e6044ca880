use anyhow::Result;
use polmap::ensure_writable;

use crate::cli::{Cli, OutlineArgs};
use super::render::load_builder;

pub fn run(cli: &Cli, args: &OutlineArgs) -> Result<()> {
    let builder = load_builder(cli)?;
    ensure_writable(&args.output, args.force)?;

    let layer = builder.load_regions()?;
    eprintln!("[outline] writing {} region outlines to {}", layer.len(), args.output.display());
    layer.outline_svg(&args.output, builder.canvas())
}
