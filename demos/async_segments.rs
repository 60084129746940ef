//! Async chunking example.
//!
//! Run with:
//!     cargo run --example async_segments --features async-io -- /path/to/file

use std::env;

use futures_util::StreamExt;
use tokio_util::compat::TokioAsyncReadCompatExt;

use chunkfeed::{ChunkConfig, segments_async};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    println!("Chunking file: {}\n", path);

    let file = tokio::fs::File::open(&path).await?;
    let config = ChunkConfig::new(4 * 1024, 512)?;
    let mut stream = segments_async(file.compat(), config);

    let mut total = 0usize;
    while let Some(segment) = stream.next().await {
        let segment = segment?;
        total += 1;
        println!(
            "Segment {}: offset={:>10}, len={:>6}, overlap={:>4}",
            total,
            segment.offset,
            segment.len(),
            segment.overlap().len()
        );
    }

    println!("\nTotal: {} segments", total);
    Ok(())
}
