//! Glyph image cache
//!
//! Maps (character, foreground color, transform chain identity) to a
//! rendered bitmap. Characters that have no image (whitespace, glyphs the
//! font lacks) are cached as `None` so the font is asked only once.
//!
//! Entries are bounded two ways, both checked lazily:
//! - capacity: least recently used entries are dropped first
//! - idle time: entries unused for longer than the configured expiry are
//!   treated as misses and swept out on insert
//!
//! The store is locked only for lookup and insert. Rasterization and
//! transforms run unlocked, so two threads missing on the same key may both
//! render it; the first one to insert wins and the other's result is
//! discarded in favor of the stored bitmap.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use tile_core::{Bitmap, Rgba, Tile, TransformChain};

use crate::config::CacheConfig;
use crate::error::Result;
use crate::font::GlyphRasterizer;
use crate::hints::{HintsSignal, HintsSubscription};

/// Cache key, computed once per lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    pub code_point: char,
    pub color: Rgba,
    /// Identity of the transform chain, `None` when no chain applies
    pub chain: Option<u64>,
}

impl GlyphKey {
    pub fn new(code_point: char, color: Rgba, chain: Option<&TransformChain>) -> Self {
        Self {
            code_point,
            color,
            chain: chain.map(TransformChain::identity),
        }
    }
}

#[derive(Debug)]
struct Entry {
    bitmap: Option<Arc<Bitmap>>,
    last_access: Instant,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    rasterizations: AtomicU64,
    evictions: AtomicU64,
    invalidations: AtomicU64,
}

/// Point-in-time cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Calls made to the font rasterizer
    pub rasterizations: u64,
    /// Entries dropped for capacity or idle time
    pub evictions: u64,
    /// Bulk invalidations, explicit or signalled
    pub invalidations: u64,
}

/// Thread-safe cache of rendered glyph images
pub struct GlyphCache {
    entries: Mutex<LruCache<GlyphKey, Entry>>,
    rasterizer: Arc<dyn GlyphRasterizer>,
    expire_after: Duration,
    /// Bumped by every bulk invalidation; renders started before a bump are
    /// not stored
    epoch: AtomicU64,
    hints: HintsSubscription,
    counters: Counters,
}

impl GlyphCache {
    /// Create a cache that follows `hints` until it is dropped
    pub fn new(
        config: CacheConfig,
        rasterizer: Arc<dyn GlyphRasterizer>,
        hints: &HintsSignal,
    ) -> Result<Self> {
        config.validate()?;
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        log::debug!(
            "glyph cache: capacity {}, expiry {:?}, cell {}x{}",
            capacity,
            config.expire_after(),
            rasterizer.cell_width(),
            rasterizer.cell_height()
        );

        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            rasterizer,
            expire_after: config.expire_after(),
            epoch: AtomicU64::new(0),
            hints: hints.subscribe(),
            counters: Counters::default(),
        })
    }

    /// Resolve a raw code point.
    ///
    /// Fails for values that are not Unicode scalar values and when the
    /// transform chain breaks its size contract; nothing is cached in either
    /// case.
    pub fn resolve(
        &self,
        code_point: u32,
        color: Rgba,
        chain: Option<&TransformChain>,
    ) -> Result<Option<Arc<Bitmap>>> {
        let c = char::from_u32(code_point).ok_or(tile_core::Error::InvalidCodePoint(code_point))?;
        self.resolve_char(c, color, chain)
    }

    /// Resolve a character to its rendered image, or `None` if it has none
    pub fn resolve_char(
        &self,
        c: char,
        color: Rgba,
        chain: Option<&TransformChain>,
    ) -> Result<Option<Arc<Bitmap>>> {
        if self.hints.take_changed() {
            self.invalidate_all();
        }

        let key = GlyphKey::new(c, color, chain);
        if let Some(bitmap) = self.lookup(&key) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(bitmap);
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);

        let epoch = self.epoch.load(Ordering::Acquire);
        let rendered = self.render(c, color, chain)?;
        Ok(self.store(key, rendered, epoch))
    }

    /// Resolve the glyph image of a tile. Hidden tiles have none.
    pub fn resolve_tile(&self, tile: &Tile) -> Result<Option<Arc<Bitmap>>> {
        if tile.is_hidden() {
            return Ok(None);
        }
        self.resolve_char(
            tile.code_point(),
            tile.foreground(),
            tile.transforms().map(Arc::as_ref),
        )
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        let mut entries = self.entries.lock();
        let dropped = entries.len();
        entries.clear();
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
        log::debug!("glyph cache invalidated, {} entries dropped", dropped);
    }

    /// Sweep out entries idle for longer than the expiry
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock();
        self.evict_expired(&mut entries, Instant::now())
    }

    /// Whether `key` currently has an entry, without touching its recency
    pub fn contains(&self, key: &GlyphKey) -> bool {
        self.entries.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    /// Cell size of the backing font
    pub fn cell_size(&self) -> (u32, u32) {
        (self.rasterizer.cell_width(), self.rasterizer.cell_height())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            rasterizations: self.counters.rasterizations.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            invalidations: self.counters.invalidations.load(Ordering::Relaxed),
        }
    }

    /// Fresh entry for `key`, promoting it; expired entries are removed
    fn lookup(&self, key: &GlyphKey) -> Option<Option<Arc<Bitmap>>> {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        match entries.get_mut(key) {
            None => return None,
            Some(entry) if !self.is_expired(entry, now) => {
                entry.last_access = now;
                return Some(entry.bitmap.clone());
            }
            Some(_) => {}
        }
        entries.pop(key);
        self.counters.evictions.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn render(
        &self,
        c: char,
        color: Rgba,
        chain: Option<&TransformChain>,
    ) -> Result<Option<Arc<Bitmap>>> {
        if c.is_whitespace() || !self.rasterizer.can_display(c) {
            log::trace!("no glyph for {:?}, caching empty result", c);
            return Ok(None);
        }

        self.counters.rasterizations.fetch_add(1, Ordering::Relaxed);
        let glyph = self.rasterizer.rasterize(c, color);
        let bitmap = match chain {
            Some(chain) => chain.apply(&glyph)?,
            None => Arc::new(glyph),
        };
        Ok(Some(bitmap))
    }

    /// Insert a freshly rendered result unless another thread beat us to it
    fn store(
        &self,
        key: GlyphKey,
        bitmap: Option<Arc<Bitmap>>,
        epoch: u64,
    ) -> Option<Arc<Bitmap>> {
        let mut entries = self.entries.lock();
        let now = Instant::now();

        if let Some(existing) = entries.get_mut(&key) {
            if !self.is_expired(existing, now) {
                existing.last_access = now;
                return existing.bitmap.clone();
            }
        }

        // Rendered against settings that have since been invalidated
        if self.epoch.load(Ordering::Acquire) != epoch {
            return bitmap;
        }

        self.evict_expired(&mut entries, now);
        let entry = Entry {
            bitmap: bitmap.clone(),
            last_access: now,
        };
        if let Some((evicted, _)) = entries.push(key, entry) {
            if evicted != key {
                log::trace!("evicted {:?} for capacity", evicted.code_point);
                self.counters.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
        bitmap
    }

    /// Pop idle entries from the least recently used end
    fn evict_expired(&self, entries: &mut LruCache<GlyphKey, Entry>, now: Instant) -> usize {
        let mut evicted = 0;
        while entries
            .peek_lru()
            .is_some_and(|(_, entry)| self.is_expired(entry, now))
        {
            entries.pop_lru();
            evicted += 1;
        }
        if evicted > 0 {
            self.counters
                .evictions
                .fetch_add(evicted as u64, Ordering::Relaxed);
        }
        evicted
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        now.saturating_duration_since(entry.last_access) > self.expire_after
    }
}
