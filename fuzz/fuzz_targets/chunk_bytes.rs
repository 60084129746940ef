#![no_main]

use libfuzzer_sys::fuzz_target;
use chunkfeed::{ChunkConfig, Chunker};

fuzz_target!(|input: (u8, u8, Vec<u8>)| {
    let (read, peek, data) = input;
    let Ok(config) = ChunkConfig::new(read as usize, peek as usize) else {
        return;
    };

    let segments = Chunker::new(config).chunk_bytes(data.clone());

    // Primaries tile the input with no gaps
    let mut expected_offset = 0u64;
    let mut rebuilt = Vec::with_capacity(data.len());
    for segment in &segments {
        assert_eq!(segment.offset, expected_offset);
        assert!(!segment.is_empty());
        assert!(segment.len() <= config.max_chunk_len());
        rebuilt.extend_from_slice(&segment.primary());
        expected_offset = segment.end();
    }
    assert_eq!(rebuilt, data);

    // Every non-final segment carries a full peek window, or runs to EOF
    for segment in &segments {
        let start = segment.offset as usize;
        let want = (config.max_chunk_len()).min(data.len() - start);
        assert_eq!(segment.len(), want);
        assert_eq!(&segment.data[..], &data[start..start + want]);
    }
});
