//! Monolithic filesystem scan example.
//!
//! Run with:
//!     RUST_LOG=chunkfeed=debug cargo run --example scan_paths -- ./src ./Cargo.toml

use std::env;
use std::thread;

use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chunkfeed::{Chunk, Context, FilesystemSource, Source};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chunkfeed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut paths: Vec<String> = env::args().skip(1).collect();
    if paths.is_empty() {
        paths.push(".".to_string());
    }

    let ctx = Context::new();
    let mut source = FilesystemSource::new();
    source.init(&ctx, "local", 1, 1, false, &json!({ "paths": paths }), 1)?;

    for problem in source.as_validator().map(|v| v.validate()).unwrap_or_default() {
        eprintln!("warning: {problem}");
    }

    let (tx, rx) = crossbeam_channel::bounded::<Chunk>(64);
    let (chunks, bytes) = thread::scope(|s| {
        let consumer = s.spawn(move || {
            let mut chunks = 0usize;
            let mut bytes = 0usize;
            for chunk in rx {
                chunks += 1;
                bytes += chunk.len();
                println!("{chunk}");
            }
            (chunks, bytes)
        });

        let result = source.chunks(&ctx, &tx);
        drop(tx);
        result.map(|()| consumer.join().unwrap_or_default())
    })?;

    println!("\nTotal: {chunks} chunks, {bytes} bytes");
    for item in source.skipped() {
        println!("skipped {}: {}", item.path.display(), item.reason);
    }
    Ok(())
}
