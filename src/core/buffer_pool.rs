//! Process-wide pool of reusable byte buffers
//!
//! Every checkout hands out an owned `Vec<u8>`, so a buffer is never
//! aliased between callers. Returning is optional: a buffer that is simply
//! dropped is freed, and one whose capacity grew past the ceiling is
//! discarded instead of being put back.

use crossbeam_channel::{bounded, Receiver, Sender};
use once_cell::sync::Lazy;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

/// Initial capacity of a freshly allocated buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 512;

/// Buffers that grew beyond this capacity are not returned to the pool.
pub const DEFAULT_CAPACITY_CEILING: usize = 64 * 1024;

/// Maximum number of idle buffers kept by the global pool.
pub const DEFAULT_POOL_SIZE: usize = 256;

static GLOBAL_POOL: Lazy<BufferPool> = Lazy::new(|| {
    BufferPool::new(
        DEFAULT_POOL_SIZE,
        DEFAULT_BUFFER_CAPACITY,
        DEFAULT_CAPACITY_CEILING,
    )
});

/// The pool shared by every entry and writer in the process.
pub fn global() -> &'static BufferPool {
    &GLOBAL_POOL
}

/// Counters describing pool effectiveness.
#[derive(Debug)]
pub struct PoolMetrics {
    /// Checkouts served by a recycled buffer
    hits: AtomicU64,

    /// Checkouts that had to allocate
    misses: AtomicU64,

    /// Buffers put back on the free list
    returned: AtomicU64,

    /// Buffers dropped because they were oversized or the free list was full
    discarded: AtomicU64,
}

impl PoolMetrics {
    pub const fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            returned: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn returned(&self) -> u64 {
        self.returned.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    /// Percentage of checkouts served from the free list
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

impl Default for PoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Free-list of byte buffers with a capacity ceiling.
///
/// The free list is a bounded channel, so checkout and return from many
/// threads at once need no additional locking.
pub struct BufferPool {
    sender: Sender<Vec<u8>>,
    receiver: Receiver<Vec<u8>>,
    buffer_capacity: usize,
    capacity_ceiling: usize,
    metrics: PoolMetrics,
}

impl BufferPool {
    pub fn new(pool_size: usize, buffer_capacity: usize, capacity_ceiling: usize) -> Self {
        let (sender, receiver) = bounded(pool_size.max(1));
        Self {
            sender,
            receiver,
            buffer_capacity,
            capacity_ceiling: capacity_ceiling.max(buffer_capacity),
            metrics: PoolMetrics::new(),
        }
    }

    /// Take an empty buffer, reusing an idle one when available.
    pub fn get(&self) -> Vec<u8> {
        match self.receiver.try_recv() {
            Ok(buf) => {
                self.metrics.hits.fetch_add(1, Ordering::Relaxed);
                buf
            }
            Err(_) => {
                self.metrics.misses.fetch_add(1, Ordering::Relaxed);
                Vec::with_capacity(self.buffer_capacity)
            }
        }
    }

    /// Hand a buffer back. The caller must not keep any view into it.
    pub fn put(&self, mut buf: Vec<u8>) {
        if buf.capacity() > self.capacity_ceiling {
            self.metrics.discarded.fetch_add(1, Ordering::Relaxed);
            return;
        }
        buf.clear();
        match self.sender.try_send(buf) {
            Ok(()) => {
                self.metrics.returned.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.metrics.discarded.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Checkout wrapped in a guard that returns the buffer on drop.
    pub fn scoped(&self) -> PooledBuffer<'_> {
        PooledBuffer {
            pool: self,
            buf: self.get(),
        }
    }

    pub fn capacity_ceiling(&self) -> usize {
        self.capacity_ceiling
    }

    /// Number of idle buffers currently on the free list
    pub fn idle(&self) -> usize {
        self.receiver.len()
    }

    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }
}

/// RAII checkout from a [`BufferPool`].
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Vec<u8>,
}

impl PooledBuffer<'_> {
    /// Detach the buffer from the guard; it will not be returned.
    pub fn into_inner(mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }
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
        // capacity 0 means the buffer was detached by `into_inner`
        if self.buf.capacity() > 0 {
            self.pool.put(std::mem::take(&mut self.buf));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_reuse_after_put() {
        let pool = BufferPool::new(4, 16, 1024);
        let mut buf = pool.get();
        buf.extend_from_slice(b"hello");
        pool.put(buf);

        let buf = pool.get();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 16);
        assert_eq!(pool.metrics().hits(), 1);
        assert_eq!(pool.metrics().misses(), 1);
    }

    #[test]
    fn test_oversized_buffer_discarded() {
        let pool = BufferPool::new(4, 16, 64);
        let mut buf = pool.get();
        buf.resize(1000, b'x');
        pool.put(buf);

        assert_eq!(pool.idle(), 0);
        assert_eq!(pool.metrics().discarded(), 1);
    }

    #[test]
    fn test_full_free_list_discards() {
        let pool = BufferPool::new(1, 16, 64);
        pool.put(Vec::new());
        pool.put(Vec::new());
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.metrics().returned(), 1);
        assert_eq!(pool.metrics().discarded(), 1);
    }

    #[test]
    fn test_scoped_returns_on_drop() {
        let pool = BufferPool::new(4, 16, 1024);
        {
            let mut guard = pool.scoped();
            guard.extend_from_slice(b"abc");
            assert_eq!(&guard[..], b"abc");
        }
        assert_eq!(pool.idle(), 1);

        let detached = pool.scoped().into_inner();
        assert!(detached.is_empty());
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_concurrent_checkout_is_exclusive() {
        let pool = Arc::new(BufferPool::new(8, 32, 4096));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for i in 0..500 {
                        let mut buf = pool.get();
                        let marker = format!("{}-{}", t, i);
                        buf.extend_from_slice(marker.as_bytes());
                        assert_eq!(buf, marker.as_bytes());
                        pool.put(buf);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(pool.idle() <= 8);
        assert_eq!(pool.metrics().hits() + pool.metrics().misses(), 4000);
    }

    #[test]
    fn test_hit_rate() {
        let metrics = PoolMetrics::new();
        assert_eq!(metrics.hit_rate(), 0.0);
    }
}
