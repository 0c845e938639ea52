//! Index integer widths accepted by triangulation.

use crate::error::{Result, ShapeError};

/// Unsigned index type a triangulation can be written into.
///
/// `MAX_VERTICES` is the largest vertex count a shape may have for this width:
/// one third of the integer range, so that every vertex can contribute up to
/// three indices without the index values approaching the type's limit.
pub trait IndexInt: Copy + Default + core::fmt::Debug + PartialEq + Send + Sync + 'static {
    const BITS: u32;
    const MAX_VERTICES: usize;

    /// Converts a vertex index. Callers check [`check_capacity`] first.
    fn from_index(index: usize) -> Self;

    fn to_index(self) -> usize;
}

impl IndexInt for u16 {
    const BITS: u32 = 16;
    const MAX_VERTICES: usize = 21_845;

    #[inline]
    fn from_index(index: usize) -> Self {
        index as u16
    }

    #[inline]
    fn to_index(self) -> usize {
        self as usize
    }
}

impl IndexInt for u32 {
    const BITS: u32 = 32;
    const MAX_VERTICES: usize = (u32::MAX / 3) as usize;

    #[inline]
    fn from_index(index: usize) -> Self {
        index as u32
    }

    #[inline]
    fn to_index(self) -> usize {
        self as usize
    }
}

/// Fails with [`ShapeError::IndexCapacity`] when `vertex_count` cannot be
/// addressed safely with `I`.
#[inline]
pub fn check_capacity<I: IndexInt>(vertex_count: usize) -> Result<()> {
    if vertex_count > I::MAX_VERTICES {
        return Err(ShapeError::IndexCapacity {
            count: vertex_count,
            max: I::MAX_VERTICES,
            bits: I::BITS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_threshold_is_a_third_of_the_range() {
        assert_eq!(<u16 as IndexInt>::MAX_VERTICES, u16::MAX as usize / 3);
        assert!(check_capacity::<u16>(21_845).is_ok());
        assert_eq!(
            check_capacity::<u16>(21_846),
            Err(ShapeError::IndexCapacity { count: 21_846, max: 21_845, bits: 16 })
        );
    }

    #[test]
    fn u32_accepts_what_u16_rejects() {
        assert!(check_capacity::<u32>(100_000).is_ok());
    }
}
