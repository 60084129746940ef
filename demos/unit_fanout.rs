//! Unit-based scan example: enumerate units, then chunk each on its own
//! thread so one failing unit does not affect the others.
//!
//! Run with:
//!     cargo run --example unit_fanout -- ./src ./missing ./Cargo.toml

use std::env;
use std::thread;

use serde_json::json;

use chunkfeed::{ChunkResult, Context, FilesystemSource, Source};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let paths: Vec<String> = env::args().skip(1).collect();

    let ctx = Context::new();
    let mut source = FilesystemSource::new();
    source.init(&ctx, "units", 2, 2, false, &json!({ "paths": paths }), 4)?;

    let (Some(enumerator), Some(chunker)) = (source.as_unit_enumerator(), source.as_unit_chunker())
    else {
        return Err("source does not support unit scanning".into());
    };

    let (units_tx, units_rx) = crossbeam_channel::unbounded();
    enumerator.enumerate(&ctx, &units_tx)?;
    drop(units_tx);

    let (tx, rx) = crossbeam_channel::bounded(16);
    thread::scope(|s| {
        for unit in units_rx {
            let unit = match unit.into_result() {
                Ok(unit) => unit,
                Err(e) => {
                    eprintln!("enumeration error: {e}");
                    continue;
                }
            };
            let tx = tx.clone();
            let ctx = &ctx;
            s.spawn(move || {
                if let Err(e) = chunker.chunk_unit(ctx, unit.as_ref(), &tx) {
                    eprintln!("unit {} failed: {e}", unit.source_unit_id());
                }
            });
        }
        drop(tx);

        for result in rx {
            match result {
                ChunkResult::Chunk(chunk) => println!("{chunk}"),
                ChunkResult::Error(e) => println!("error: {e}"),
            }
        }
    });

    Ok(())
}
