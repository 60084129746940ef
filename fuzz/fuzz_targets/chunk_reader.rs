#![no_main]

use std::io::{self, Read};

use libfuzzer_sys::fuzz_target;
use chunkfeed::{ChunkConfig, Chunker, ResetReader};

/// Hands out at most `step` bytes per read.
struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.step.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

fuzz_target!(|input: (u8, u8, u8, u16, Vec<u8>)| {
    let (read, peek, step, sniff, data) = input;
    let Ok(config) = ChunkConfig::new(read as usize, peek as usize) else {
        return;
    };
    let step = (step as usize).max(1);
    let chunker = Chunker::new(config);

    // Sniff some bytes, decline, then chunk the replayed stream
    let mut reader = ResetReader::new(Trickle { data: &data, step });
    let mut head = vec![0u8; sniff as usize];
    let _ = reader.read(&mut head);
    reader.reset().unwrap();
    reader.stop();

    let streamed: Vec<_> = chunker
        .chunk(reader)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(streamed, chunker.chunk_bytes(data));
});
