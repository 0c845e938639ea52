use tessera_shapes::ShapeError;
use thiserror::Error;

/// Errors that abort a whole render buffer call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderBufferError {
    /// The device is gone; no buffer was touched.
    #[error("render device lost")]
    DeviceLost,

    #[error("shape index {index} out of bounds for {len} shapes")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// A shape whose regeneration failed during a pass. Its device buffers keep
/// their previous contents.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFailure {
    /// Position of the shape in the list at the time of the pass.
    pub index: usize,
    pub error: ShapeError,
}

/// Work done by one sync (and draw) pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub inserted: usize,
    pub removed: usize,
    pub vertex_uploads: usize,
    pub index_uploads: usize,
    /// First-time buffer creations.
    pub allocations: usize,
    /// Buffers replaced because the required size grew.
    pub reallocations: usize,
    pub draws: usize,
    pub failures: Vec<EntryFailure>,
}

impl FrameStats {
    /// True when the pass regenerated nothing.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.vertex_uploads == 0
            && self.index_uploads == 0
            && self.allocations == 0
            && self.reallocations == 0
            && self.inserted == 0
            && self.removed == 0
    }
}
