// Property tests for chunk boundaries
// Tests cover: every short substring survives whole, primaries tile the input

use std::io::Cursor;

use chunkfeed::{ChunkConfig, Chunker};
use proptest::prelude::*;

fn config() -> impl Strategy<Value = ChunkConfig> {
    (1usize..64, 1usize..32).prop_map(|(read, peek)| ChunkConfig::new(read, peek).unwrap())
}

proptest! {
    #[test]
    fn short_substrings_never_split(
        data in proptest::collection::vec(any::<u8>(), 0..600),
        config in config(),
        start in any::<prop::sample::Index>(),
        len in 1usize..32,
    ) {
        prop_assume!(!data.is_empty());
        let len = len.min(config.peek_size()).min(data.len());
        let start = start.index(data.len() - len + 1);
        let needle = &data[start..start + len];

        let segments = Chunker::new(config).chunk_bytes(data.clone());
        // Located by offset, not by content, so repeated bytes cannot pass
        // the check by accident.
        let covered = segments.iter().any(|s| {
            s.offset as usize <= start && start + len <= s.offset as usize + s.len()
        });
        prop_assert!(covered);

        let holder = segments
            .iter()
            .find(|s| s.offset as usize <= start && start + len <= s.offset as usize + s.len())
            .unwrap();
        let local = start - holder.offset as usize;
        prop_assert_eq!(&holder.data[local..local + len], needle);
    }

    #[test]
    fn primaries_tile_input(
        data in proptest::collection::vec(any::<u8>(), 0..2000),
        config in config(),
    ) {
        let segments = Chunker::new(config).chunk_bytes(data.clone());

        let mut rebuilt = Vec::with_capacity(data.len());
        let mut offset = 0u64;
        for segment in &segments {
            prop_assert_eq!(segment.offset, offset);
            prop_assert!(segment.len() <= config.max_chunk_len());
            rebuilt.extend_from_slice(&segment.primary());
            offset = segment.end();
        }
        prop_assert_eq!(rebuilt, data);
    }

    #[test]
    fn reader_matches_bytes(
        data in proptest::collection::vec(any::<u8>(), 0..1500),
        config in config(),
    ) {
        let chunker = Chunker::new(config);
        let streamed = chunker
            .chunk(Cursor::new(data.clone()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        prop_assert_eq!(streamed, chunker.chunk_bytes(data));
    }
}
