use slotmap::new_key_type;
use tessera_shapes::ShapeHandle;

use crate::render::backend::Backend;

new_key_type! {
    /// Stable identity of a render buffer entry across list edits.
    pub(super) struct EntryKey;
}

/// Lifecycle of an entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryState {
    /// Queued for its first upload.
    PendingInsert,
    /// Has been through at least one sync pass.
    Live,
    /// Removed from the list; buffers are released by the next pass.
    PendingRemove,
}

pub(super) struct DeviceBuffer<B: Backend> {
    pub buffer: B::Buffer,
    /// Allocated bytes.
    pub capacity: u64,
    /// Bytes written by the last upload.
    pub len: u64,
}

/// Device-side mirror of one shape.
pub(super) struct Entry<B: Backend> {
    pub shape: ShapeHandle,
    pub state: EntryState,
    pub vertices: Option<DeviceBuffer<B>>,
    pub indices: Option<DeviceBuffer<B>>,
    pub index_count: u32,
    pub line_strip_count: u32,
    /// `(version, vertex count)` of the shape at its last regeneration.
    pub seen: Option<(u64, usize)>,
    /// Convexity of the shape at its last successful index build.
    pub convex: Option<bool>,
    /// The last index build failed; the uploaded indices belong to an older
    /// geometry and are rebuilt by every regeneration until one succeeds.
    pub indices_stale: bool,
    /// An op for this entry is waiting in the queue.
    pub queued: bool,
}

impl<B: Backend> Entry<B> {
    pub fn new(shape: ShapeHandle) -> Self {
        Self {
            shape,
            state: EntryState::PendingInsert,
            vertices: None,
            indices: None,
            index_count: 0,
            line_strip_count: 0,
            seen: None,
            convex: None,
            indices_stale: false,
            queued: true,
        }
    }

    /// Buffers to draw with, if the entry is live and has been uploaded.
    pub fn drawable(&self) -> Option<(&B::Buffer, &B::Buffer, u32)> {
        if self.state != EntryState::Live || self.index_count == 0 {
            return None;
        }
        let (Some(v), Some(i)) = (&self.vertices, &self.indices) else { return None };
        Some((&v.buffer, &i.buffer, self.index_count))
    }

    pub fn info(&self) -> EntryInfo {
        EntryInfo {
            state: self.state,
            index_count: self.index_count,
            line_strip_count: self.line_strip_count,
            vertex_capacity: self.vertices.as_ref().map_or(0, |b| b.capacity),
            index_capacity: self.indices.as_ref().map_or(0, |b| b.capacity),
            seen: self.seen,
            queued: self.queued,
        }
    }
}

/// Read-only snapshot of an entry, for diagnostics and tests.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub state: EntryState,
    pub index_count: u32,
    /// Index count of the entry's wireframe (`vertex count + 1`).
    pub line_strip_count: u32,
    pub vertex_capacity: u64,
    pub index_capacity: u64,
    pub seen: Option<(u64, usize)>,
    pub queued: bool,
}

impl EntryInfo {
    #[inline]
    pub fn has_buffers(&self) -> bool {
        self.vertex_capacity > 0 && self.index_capacity > 0
    }
}
