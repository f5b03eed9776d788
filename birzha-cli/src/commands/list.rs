use birzha::catalog;

use crate::cli::{Catalog, ListArgs};
use crate::error::CliError;

pub fn run(args: &ListArgs) -> Result<(), CliError> {
    if matches!(args.catalog, Catalog::All | Catalog::Rates) {
        println!("central-bank currencies:");
        for instrument in catalog::currencies() {
            println!("  {:<10} {}", instrument.symbol(), instrument.label());
        }
    }
    if matches!(args.catalog, Catalog::All | Catalog::Pairs) {
        println!("exchange currency pairs:");
        for instrument in catalog::currency_pairs() {
            println!("  {:<10} {}", instrument.symbol(), instrument.label());
        }
    }
    Ok(())
}
