use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Shape, ShapeDefinition};

/// Shared, lockable reference to a shape.
///
/// Application threads mutate shapes through [`write`](Self::write) while the
/// render thread polls them through the non-blocking
/// [`try_read`](Self::try_read). Equality is identity: two handles are equal
/// when they point at the same shape.
#[derive(Debug, Clone)]
pub struct ShapeHandle(Arc<RwLock<Shape>>);

impl ShapeHandle {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self(Arc::new(RwLock::new(shape.into())))
    }

    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, Shape> {
        self.0.read()
    }

    #[inline]
    pub fn try_read(&self) -> Option<RwLockReadGuard<'_, Shape>> {
        self.0.try_read()
    }

    /// Locks the shape for mutation.
    ///
    /// A render pass skips shapes that are write-locked and picks them up on
    /// a later pass, so holding this guard across calls into a render buffer
    /// cannot deadlock the render thread. Holding it keeps the shape out of
    /// every pass until it is dropped.
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, Shape> {
        self.0.write()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ShapeHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Current `(version, vertex count)` pair.
    #[inline]
    pub fn state(&self) -> (u64, usize) {
        let shape = self.0.read();
        (shape.version(), shape.len())
    }

    /// Like [`state`](Self::state), or `None` while the shape is write-locked.
    #[inline]
    pub fn try_state(&self) -> Option<(u64, usize)> {
        let shape = self.0.try_read()?;
        Some((shape.version(), shape.len()))
    }
}

impl PartialEq for ShapeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ShapeHandle {}

impl From<Shape> for ShapeHandle {
    fn from(shape: Shape) -> Self {
        Self::new(shape)
    }
}
