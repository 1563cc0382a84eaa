// crates/rhtmx-resp/src/pool.rs — pooled scratch buffers for JSON encoding and large bodies

//! Scratch buffer pools shared across requests.
//!
//! A pool is a mutex-guarded free list of `Vec<u8>`. Checkout hands out a
//! cleared buffer wrapped in a [`PooledBuffer`] guard; dropping the guard
//! returns the buffer, on every exit path.

use std::ops::{Deref, DerefMut};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::config;

#[derive(Debug)]
pub struct BufferPool {
    name: &'static str,
    free: Mutex<Vec<Vec<u8>>>,
    capacity: usize,
    max_retained: usize,
    max_buffer_size: usize,
}

impl BufferPool {
    pub fn new(
        name: &'static str,
        capacity: usize,
        max_retained: usize,
        max_buffer_size: usize,
    ) -> Self {
        Self {
            name,
            free: Mutex::new(Vec::new()),
            capacity,
            max_retained,
            max_buffer_size,
        }
    }

    pub fn acquire(&self) -> PooledBuffer<'_> {
        let reused = self.free.lock().pop();
        let buf = match reused {
            Some(mut buf) => {
                buf.clear();
                buf
            }
            None => {
                tracing::trace!(pool = self.name, "allocating scratch buffer");
                Vec::with_capacity(self.capacity)
            }
        };
        PooledBuffer { pool: self, buf }
    }

    /// Buffers currently sitting in the free list.
    pub fn retained(&self) -> usize {
        self.free.lock().len()
    }

    fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() > self.max_buffer_size {
            tracing::trace!(
                pool = self.name,
                capacity = buf.capacity(),
                "dropping oversized scratch buffer"
            );
            return;
        }
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < self.max_retained {
            free.push(buf);
        }
    }
}

/// A checked-out buffer. Returned to its pool on drop.
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Vec<u8>,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.pool.release(buf);
    }
}

static JSON_POOL: Lazy<BufferPool> = Lazy::new(|| {
    let cfg = &config::get().buffers;
    BufferPool::new("json", cfg.json_capacity, cfg.max_retained, cfg.max_buffer_size)
});

static LARGE_POOL: Lazy<BufferPool> = Lazy::new(|| {
    let cfg = &config::get().buffers;
    BufferPool::new("large", cfg.large_capacity, cfg.max_retained, cfg.max_buffer_size)
});

/// Pool for JSON and JSONP encoding.
pub fn json_pool() -> &'static BufferPool {
    &JSON_POOL
}

/// Pool for large string bodies and stream copies.
pub fn large_pool() -> &'static BufferPool {
    &LARGE_POOL
}
