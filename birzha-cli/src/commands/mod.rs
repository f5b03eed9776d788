mod candles;
mod list;
mod rates;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Rates(args) => rates::run(args).await,
        Command::Candles(args) => candles::run(args).await,
        Command::List(args) => list::run(&args),
    }
}
