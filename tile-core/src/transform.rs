//! Sequential transform chains
//!
//! A [`TransformChain`] is an ordered list of image transforms applied to a
//! glyph bitmap. Every transform must keep the width and height of its input;
//! the chain checks this after each step.
//!
//! Chains are immutable once built, so their identity hash is computed once
//! and can be used directly as part of a cache key.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::bitmap::Bitmap;
use crate::color::Rgba;
use crate::error::{Error, Result};

/// A dimension-preserving bitmap transform
pub trait Transform: Send + Sync + fmt::Debug {
    /// Stable name, part of the chain identity
    fn name(&self) -> &str;

    /// Produce a new bitmap from `source`. Must not change its dimensions.
    fn apply(&self, source: &Bitmap) -> Bitmap;

    /// Feed everything that distinguishes this transform into `state`.
    ///
    /// The default covers parameterless transforms.
    fn write_identity(&self, state: &mut dyn Hasher) {
        state.write(self.name().as_bytes());
    }
}

/// Mirror the image left to right
#[derive(Debug, Clone, Copy, Default)]
pub struct FlipHorizontal;

impl Transform for FlipHorizontal {
    fn name(&self) -> &str {
        "flip-horizontal"
    }

    fn apply(&self, source: &Bitmap) -> Bitmap {
        let (width, height) = source.dimensions();
        let mut out = Bitmap::blank(width, height);
        for y in 0..height {
            for x in 0..width {
                out.set_pixel(width - 1 - x, y, source.pixel(x, y));
            }
        }
        out
    }
}

/// Mirror the image top to bottom
#[derive(Debug, Clone, Copy, Default)]
pub struct FlipVertical;

impl Transform for FlipVertical {
    fn name(&self) -> &str {
        "flip-vertical"
    }

    fn apply(&self, source: &Bitmap) -> Bitmap {
        let (width, height) = source.dimensions();
        let mut out = Bitmap::blank(width, height);
        for y in 0..height {
            for x in 0..width {
                out.set_pixel(x, height - 1 - y, source.pixel(x, y));
            }
        }
        out
    }
}

/// Multiply every pixel by a color
#[derive(Debug, Clone, Copy)]
pub struct Tint(pub Rgba);

impl Transform for Tint {
    fn name(&self) -> &str {
        "tint"
    }

    fn apply(&self, source: &Bitmap) -> Bitmap {
        let tint = self.0.to_array();
        let pixels = source
            .as_bytes()
            .chunks_exact(4)
            .flat_map(|px| {
                let mut out = [0u8; 4];
                for (channel, (value, factor)) in out.iter_mut().zip(px.iter().zip(tint)) {
                    *channel = ((*value as u16 * factor as u16) / 255) as u8;
                }
                out
            })
            .collect();
        Bitmap::new(source.width(), source.height(), pixels)
            .unwrap_or_else(|| source.clone())
    }

    fn write_identity(&self, state: &mut dyn Hasher) {
        state.write(self.name().as_bytes());
        state.write(&self.0.to_array());
    }
}

/// Last (source fingerprint, result) pair produced by a chain
type Memo = Option<(u64, Arc<Bitmap>)>;

/// An ordered, immutable pipeline of transforms
pub struct TransformChain {
    transforms: Vec<Arc<dyn Transform>>,
    identity: u64,
    last: Mutex<Memo>,
}

impl TransformChain {
    /// Build a chain; the identity hash is fixed from here on
    pub fn new(transforms: Vec<Arc<dyn Transform>>) -> Self {
        let identity = compute_identity(&transforms);
        Self {
            transforms,
            identity,
            last: Mutex::new(None),
        }
    }

    /// A chain that returns its input unchanged
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// A new chain with `transform` appended
    pub fn then(&self, transform: impl Transform + 'static) -> Self {
        let mut transforms = self.transforms.clone();
        transforms.push(Arc::new(transform));
        Self::new(transforms)
    }

    /// Content hash of the ordered transforms and their parameters
    pub fn identity(&self) -> u64 {
        self.identity
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Transform>> {
        self.transforms.iter()
    }

    /// Run every transform in order over `source`.
    ///
    /// Fails with [`Error::DimensionMismatch`] naming the first transform
    /// that changed the image size; nothing is memoized in that case.
    pub fn apply(&self, source: &Bitmap) -> Result<Arc<Bitmap>> {
        let source_key = source.fingerprint();
        if let Some((key, result)) = self.last.lock().as_ref() {
            if *key == source_key {
                return Ok(Arc::clone(result));
            }
        }

        let mut current = source.clone();
        for (index, transform) in self.transforms.iter().enumerate() {
            let next = transform.apply(&current);
            if next.dimensions() != current.dimensions() {
                log::debug!(
                    "transform #{} ({}) resized {:?} to {:?}",
                    index,
                    transform.name(),
                    current.dimensions(),
                    next.dimensions()
                );
                return Err(Error::DimensionMismatch {
                    index,
                    expected: current.dimensions(),
                    actual: next.dimensions(),
                });
            }
            current = next;
        }

        let result = Arc::new(current);
        *self.last.lock() = Some((source_key, Arc::clone(&result)));
        Ok(result)
    }
}

impl Default for TransformChain {
    fn default() -> Self {
        Self::empty()
    }
}

impl Clone for TransformChain {
    fn clone(&self) -> Self {
        Self::new(self.transforms.clone())
    }
}

impl PartialEq for TransformChain {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for TransformChain {}

impl Hash for TransformChain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformChain")
            .field("transforms", &self.transforms)
            .field("identity", &format_args!("{:#018x}", self.identity))
            .finish()
    }
}

fn compute_identity(transforms: &[Arc<dyn Transform>]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write_usize(transforms.len());
    for transform in transforms {
        transform.write_identity(&mut hasher);
        // Separator so adjacent names cannot run together
        hasher.write_u8(0xff);
    }
    hasher.finish()
}
