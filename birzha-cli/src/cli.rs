use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "birzha",
    version,
    about = "Fetch official currency rates and exchange candles, view them, and export to XLSX"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load daily central-bank rates for one or more currencies
    Rates(RatesArgs),
    /// Load exchange candles for one or more currency pairs
    Candles(CandlesArgs),
    /// Print the instrument catalogs
    List(ListArgs),
}

#[derive(Args)]
pub struct RatesArgs {
    /// Currency symbols, comma separated (e.g. USD,EUR)
    #[arg(long, value_delimiter = ',', required = true)]
    pub symbols: Vec<String>,

    /// Range start in dd/mm/yyyy form
    #[arg(long)]
    pub from: String,

    /// Range end in dd/mm/yyyy form
    #[arg(long)]
    pub till: String,

    /// Write the combined table to this XLSX file
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct CandlesArgs {
    /// Pair symbols, comma separated (e.g. CNY/RUB,KZT/RUB)
    #[arg(long, value_delimiter = ',', required = true)]
    pub symbols: Vec<String>,

    /// Candle timeframe: 1m, 5m, 15m, 30m, 1h, or 1d
    #[arg(long, default_value = "15m")]
    pub timeframe: String,

    /// Range start in dd/mm/yyyy form
    #[arg(long)]
    pub from: String,

    /// Range end in dd/mm/yyyy form
    #[arg(long)]
    pub till: String,

    /// Write the combined table (plus one sheet per pair) to this XLSX file
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Which catalog to print
    #[arg(value_enum, default_value = "all")]
    pub catalog: Catalog,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Catalog {
    /// Both catalogs
    All,
    /// Central-bank currencies only
    Rates,
    /// Exchange currency pairs only
    Pairs,
}
