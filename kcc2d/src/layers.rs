use num_traits::{One, PrimInt};
use serde::{Deserialize, Serialize};

/// The default primitive storage for layer masks (32 collision layers).
pub type MaskStorage = u32;

/// Trait implemented by user-defined layer enums.
///
/// The enum's discriminant (via `#[repr(u8)]`) typically determines the layer index.
pub trait Layer {
    type Storage: PrimInt;

    fn layer_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: Ensure `layer_index()` is < number of bits in `Storage`.
        Self::Storage::one() << (self.layer_index() as usize)
    }
}

/// A set of collision layers, one bit per layer.
///
/// Platform masks, one-way platform masks and the per-ray query masks are all `LayerMask`s.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask<T: PrimInt = MaskStorage> {
    pub bits: T,
}

impl<T: PrimInt> LayerMask<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    pub fn empty() -> Self {
        Self { bits: T::zero() }
    }

    pub fn all() -> Self {
        Self { bits: !T::zero() }
    }

    /// Mask with the single layer at `index` set. Out-of-range indices give an empty mask.
    pub fn from_index(index: u8) -> Self {
        let mut mask = Self::empty();
        mask.insert_index(index);
        mask
    }

    pub fn from_indices(indices: &[u8]) -> Self {
        indices.iter().fold(Self::empty(), |mut mask, &index| {
            mask.insert_index(index);
            mask
        })
    }

    fn width() -> u32 {
        T::zero().count_zeros()
    }

    // --- Index Operations ---
    pub fn insert_index(&mut self, index: u8) {
        if u32::from(index) < Self::width() {
            self.bits = self.bits | (T::one() << index as usize);
        }
    }

    pub fn contains_index(&self, index: u8) -> bool {
        u32::from(index) < Self::width() && (self.bits & (T::one() << index as usize)) != T::zero()
    }

    // --- Single Layer Operations ---
    pub fn add<U: Layer<Storage = T>>(&mut self, layer: U) {
        self.bits = self.bits | layer.mask();
    }

    pub fn remove<U: Layer<Storage = T>>(&mut self, layer: U) {
        self.bits = self.bits & !layer.mask();
    }

    pub fn has<U: Layer<Storage = T>>(&self, layer: U) -> bool {
        (self.bits & layer.mask()) != T::zero()
    }

    pub fn with<U: Layer<Storage = T>>(mut self, layer: U) -> Self {
        self.add(layer);
        self
    }

    // --- Mask Algebra ---
    pub fn union(self, other: Self) -> Self {
        Self::new(self.bits | other.bits)
    }

    /// `self & !other`: used to strip one-way platforms from a query mask.
    pub fn without(self, other: Self) -> Self {
        Self::new(self.bits & !other.bits)
    }

    pub fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != T::zero()
    }

    /// True when every layer of `other` is also in `self`.
    pub fn contains_all(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }

    pub fn clear(&mut self) {
        self.bits = T::zero();
    }
}

impl<T: PrimInt> std::ops::BitOr for LayerMask<T> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Declare a layer enum and implement [`Layer`] for it.
///
/// Example:
/// ```rust
/// kcc2d::define_layers!(GameLayer, u32, {
///     Ground,
///     OneWay,
///     Hazard,
/// });
///
/// let mask = kcc2d::layers::LayerMask::<u32>::empty().with(GameLayer::Ground);
/// assert!(mask.has(GameLayer::Ground));
/// ```
#[macro_export]
macro_rules! define_layers {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::layers::Layer for $name {
            type Storage = $storage;

            fn layer_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}
