//! Domain sharding for chart data fetches.
//!
//! Browsers cap concurrent connections per host, so dashboards with many
//! charts fan their data fetches out over a pool of alternate domains,
//! leaving the main application domain free for interactive calls
//! (saving, favoriting, etc).

use std::sync::atomic::{AtomicUsize, Ordering};

/// An ordered pool of application domains.
///
/// Index 0 is the main application domain; the rest are shards.
/// [`DomainPool::next_shard`] rotates round-robin over the shards. The
/// rotation cursor is atomic, so a pool shared between tasks needs no
/// locking.
#[derive(Debug)]
pub struct DomainPool {
    domains: Vec<String>,
    cursor: AtomicUsize,
}

impl DomainPool {
    /// Create a pool from an ordered domain list; the first entry is the
    /// main application domain.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domains: domains.into_iter().map(Into::into).collect(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of domains in the pool, the main domain included.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Check if the pool has no domains at all.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// The main application domain.
    pub fn main(&self) -> Option<&str> {
        self.domains.first().map(String::as_str)
    }

    /// The next shard domain in round-robin order.
    ///
    /// With fewer than two domains there is nothing to rotate over and
    /// the main domain is returned.
    pub fn next_shard(&self) -> Option<&str> {
        if self.domains.len() < 2 {
            return self.main();
        }
        let shard_count = self.domains.len() - 1;
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % shard_count;
        self.domains.get(1 + i).map(String::as_str)
    }
}
