//! Thread-local pool of chunker window buffers.
//!
//! A directory walk opens one chunk iterator per file; pooling keeps that
//! from allocating a fresh `read_size + peek_size` window every time.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

use crate::config::{DEFAULT_PEEK_SIZE, DEFAULT_READ_SIZE};

/// Capacity of pooled windows under the default configuration.
pub const DEFAULT_BUFFER_SIZE: usize = DEFAULT_READ_SIZE + DEFAULT_PEEK_SIZE;

/// Maximum number of buffers to keep per thread.
pub const MAX_POOL_SIZE: usize = 4;

/// A reusable byte buffer, returned to the pool on drop.
#[derive(Debug)]
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Takes a buffer with at least `capacity` bytes reserved.
    pub fn take(capacity: usize) -> Self {
        let mut data = THREAD_BUFFER_POOL
            .with(|pool| pool.borrow_mut().pop())
            .unwrap_or_default();
        data.clear();
        data.reserve(capacity);
        Self { data }
    }
}

impl Deref for Buffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.data
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        // Oversized windows from custom configs are dropped.
        if self.data.capacity() <= DEFAULT_BUFFER_SIZE * 2 {
            self.data.clear();
            THREAD_BUFFER_POOL.with(|pool| {
                let mut pool = pool.borrow_mut();
                if pool.len() < MAX_POOL_SIZE {
                    pool.push(std::mem::take(&mut self.data));
                }
            });
        }
    }
}

thread_local! {
    static THREAD_BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}
