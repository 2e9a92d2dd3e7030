//! "Rendering hints changed" signal
//!
//! When the host changes something that affects every rendered glyph (for
//! example subpixel hinting), it calls [`HintsSignal::notify_changed`].
//! Each [`HintsSubscription`] sees the change once and its owner drops
//! whatever it cached.
//!
//! The signal is an ordinary value: create one per rendering environment and
//! hand clones to the caches that should follow it.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Shared {
    generation: AtomicU64,
    subscribers: AtomicUsize,
}

/// Broadcast handle for rendering-hint changes
#[derive(Debug, Clone, Default)]
pub struct HintsSignal {
    shared: Arc<Shared>,
}

impl HintsSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tell every subscriber that cached renderings are stale
    pub fn notify_changed(&self) {
        let generation = self.shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
        log::debug!("rendering hints changed (generation {})", generation);
    }

    /// Number of changes announced so far
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }

    /// Start observing changes from now on
    pub fn subscribe(&self) -> HintsSubscription {
        self.shared.subscribers.fetch_add(1, Ordering::AcqRel);
        HintsSubscription {
            seen: AtomicU64::new(self.generation()),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.load(Ordering::Acquire)
    }
}

/// A receiver of [`HintsSignal`] changes; unsubscribes when dropped
#[derive(Debug)]
pub struct HintsSubscription {
    seen: AtomicU64,
    shared: Arc<Shared>,
}

impl HintsSubscription {
    /// True once for every batch of changes since the last call
    pub fn take_changed(&self) -> bool {
        let current = self.shared.generation.load(Ordering::Acquire);
        let previous = self.seen.swap(current, Ordering::AcqRel);
        previous != current
    }
}

impl Drop for HintsSubscription {
    fn drop(&mut self) {
        self.shared.subscribers.fetch_sub(1, Ordering::AcqRel);
    }
}
