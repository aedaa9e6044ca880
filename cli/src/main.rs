mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{outline, render};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    match &cli.command {
        Commands::Support(args) => render::support(&cli, args),
        Commands::Growth(args) => render::growth(&cli, args),
        Commands::Product(args) => render::product(&cli, args),
        Commands::Outline(args) => outline::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
