use std::sync::Arc;

use birzha::{Birzha, BirzhaError, DateRange, Instrument, LoadEvent, Timeframe, catalog};
use birzha_moex::MoexConnector;

use crate::cli::CandlesArgs;
use crate::error::CliError;
use crate::output;

pub async fn run(args: CandlesArgs) -> Result<(), CliError> {
    let instruments: Vec<Instrument> = args
        .symbols
        .iter()
        .map(|symbol| {
            catalog::pair_by_symbol(symbol).ok_or_else(|| CliError::UnknownSymbol(symbol.clone()))
        })
        .collect::<Result<_, _>>()?;
    let timeframe: Timeframe = args.timeframe.parse()?;
    let range = DateRange::parse(&args.from, &args.till)?;

    let birzha = Birzha::builder()
        .with_connector(Arc::new(MoexConnector::new_default()))
        .build()?;
    let (handle, mut rx) = birzha
        .candles()
        .instruments(&instruments)?
        .date_range(range)
        .timeframe(timeframe)
        .spawn()?;

    let mut outcome = None;
    while let Some(event) = rx.recv().await {
        match event {
            LoadEvent::Fetched { symbol, rows } => eprintln!("loaded {symbol}: {rows} rows"),
            LoadEvent::Finished(result) => {
                outcome = Some(result);
                break;
            }
        }
    }
    handle.join().await;
    let table = outcome
        .unwrap_or_else(|| Err(BirzhaError::Other("load worker ended without a result".into())))?;

    output::render_candles(&table);
    if let Some(path) = args.out {
        birzha::export::write_candles(&table, &path)?;
        println!("saved {}", path.display());
    }
    Ok(())
}
