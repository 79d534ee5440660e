mod export;
mod import;
mod list;
mod report;
mod save;

use tillroll_warehouse::Warehouse;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub fn run(cli: &Cli) -> Result<(), CliError> {
    let warehouse = Warehouse::open_default()?;
    match &cli.command {
        Command::Save(args) => save::run(&warehouse, args, cli.pretty),
        Command::List => list::run(&warehouse, cli.pretty),
        Command::Import(args) => import::run(&warehouse, args),
        Command::Export(args) => export::run(&warehouse, args),
        Command::Report(args) => report::run(&warehouse, args),
    }
}
