//! Sharded map with atomic first-wins publication.
//!
//! # Role
//!
//! Backing store for both activation caches. Keys hash to one of a fixed set of shards, each a
//! `parking_lot::RwLock` over an `FxHashMap`. Readers take a shard read lock; publication takes
//! the shard write lock only long enough to test and insert. Values are always computed by the
//! caller before `publish`, so no lock is held while synthesizing.
//!
//! # Invariants
//!
//! - Once a key is published its value never changes (see `invariants::test_idempotent_publication`).
//! - Concurrent publications of distinct keys are never lost.
//! - Publishing costs one hash and one shard insert regardless of how many keys exist.

use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxBuildHasher, FxHashMap};

const SHARDS: usize = 16;

/// Outcome of [`PublishMap::publish`].
pub(crate) enum Published<V> {
	/// The candidate was installed.
	Inserted(Arc<V>),
	/// Another writer got there first; the candidate was discarded.
	Existing(Arc<V>),
}

impl<V> Published<V> {
	pub(crate) fn into_value(self) -> Arc<V> {
		match self {
			Published::Inserted(v) | Published::Existing(v) => v,
		}
	}
}

pub(crate) struct PublishMap<K, V> {
	shards: Box<[RwLock<FxHashMap<K, Arc<V>>>]>,
	hasher: FxBuildHasher,
}

impl<K, V> PublishMap<K, V>
where
	K: Eq + Hash,
{
	pub(crate) fn new() -> Self {
		Self {
			shards: (0..SHARDS).map(|_| RwLock::new(FxHashMap::default())).collect(),
			hasher: FxBuildHasher,
		}
	}

	#[inline]
	fn shard(&self, key: &K) -> &RwLock<FxHashMap<K, Arc<V>>> {
		let hash = self.hasher.hash_one(key);
		// High bits; Fx mixes poorly into the low ones.
		&self.shards[(hash >> 32) as usize % SHARDS]
	}

	#[inline]
	pub(crate) fn get(&self, key: &K) -> Option<Arc<V>> {
		self.shard(key).read().get(key).cloned()
	}

	/// Inserts `value` under `key` unless a value is already published there.
	pub(crate) fn publish(&self, key: K, value: V) -> Published<V> {
		let mut shard = self.shard(&key).write();
		match shard.get(&key) {
			Some(existing) => Published::Existing(Arc::clone(existing)),
			None => {
				let value = Arc::new(value);
				shard.insert(key, Arc::clone(&value));
				Published::Inserted(value)
			}
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.shards.iter().map(|shard| shard.read().len()).sum()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Barrier;
	use std::time::{Duration, Instant};

	use super::*;

	#[test]
	fn first_publication_wins() {
		let map: PublishMap<u32, &'static str> = PublishMap::new();
		assert!(matches!(map.publish(1, "a"), Published::Inserted(_)));
		match map.publish(1, "b") {
			Published::Existing(v) => assert_eq!(*v, "a"),
			Published::Inserted(_) => panic!("second publication must not replace the first"),
		}
		assert_eq!(map.get(&1).as_deref(), Some(&"a"));
		assert_eq!(map.len(), 1);
	}

	#[test]
	fn concurrent_distinct_keys_are_not_lost() {
		const THREADS: u32 = 8;
		const PER_THREAD: u32 = 64;

		let map: PublishMap<u32, u32> = PublishMap::new();
		let barrier = Barrier::new(THREADS as usize);
		std::thread::scope(|s| {
			for t in 0..THREADS {
				let map = &map;
				let barrier = &barrier;
				s.spawn(move || {
					barrier.wait();
					for i in 0..PER_THREAD {
						let key = t * PER_THREAD + i;
						map.publish(key, key);
					}
				});
			}
		});

		assert_eq!(map.len(), (THREADS * PER_THREAD) as usize);
		for key in 0..THREADS * PER_THREAD {
			assert_eq!(map.get(&key).as_deref(), Some(&key));
		}
	}

	#[test]
	fn concurrent_same_key_publishes_once() {
		const THREADS: usize = 16;

		let map: PublishMap<u32, usize> = PublishMap::new();
		let barrier = Barrier::new(THREADS);
		let inserted: usize = std::thread::scope(|s| {
			let handles: Vec<_> = (0..THREADS)
				.map(|t| {
					let (map, barrier) = (&map, &barrier);
					s.spawn(move || {
						barrier.wait();
						matches!(map.publish(7, t), Published::Inserted(_)) as usize
					})
				})
				.collect();
			handles.into_iter().map(|h| h.join().unwrap()).sum()
		});
		assert_eq!(inserted, 1);
		assert_eq!(map.len(), 1);
	}

	/// Filling the map must stay linear: publishing 4x the keys may not cost anywhere near 16x.
	#[test]
	fn publication_cost_is_independent_of_size() {
		fn fill(n: u32) -> Duration {
			let map: PublishMap<u32, u32> = PublishMap::new();
			let start = Instant::now();
			for key in 0..n {
				map.publish(key, key);
			}
			assert_eq!(map.len(), n as usize);
			start.elapsed()
		}

		// Warm the allocator before timing.
		fill(4_000);
		let small = fill(4_000).max(Duration::from_micros(200));
		let large = fill(16_000);
		assert!(large < small * 10, "4k keys took {small:?}, 16k keys took {large:?}");
	}
}
