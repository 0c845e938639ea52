//! Device buffer cache for a list of shapes.
//!
//! Every shape gets its own vertex and index buffer. List edits only record
//! ops; the next pass (`synchronize`, or the first half of `render_with`)
//! polls each live shape for a `(version, vertex count)` change, drains the
//! queue FIFO and uploads what changed:
//! - same count: vertices only
//! - count changed (or skip changed): vertices and indices, growing buffers
//!   that became too small
//!
//! Buffers never shrink and are released only inside a pass.

mod entry;
mod queue;
mod stats;


use parking_lot::Mutex;
use slotmap::{SecondaryMap, SlotMap};
use tessera_shapes::{
    ElementSkip, IndexInt, Shape, ShapeDefinition, ShapeError, ShapeHandle, TriangulationMode,
};

use crate::paint::Paint;
use crate::render::backend::{
    Backend, BufferUsage, DrawPass, IndexWidth, PipelineDesc, RenderDevice,
};
use crate::render::common::copy_aligned;
use crate::render::vertex_gen::{GenerateCtx, IdentityVertices, VertexGenerator, VertexUpload};

use entry::{DeviceBuffer, Entry, EntryKey};
use queue::{OpKind, OpQueue};

pub use entry::{EntryInfo, EntryState};
pub use stats::{EntryFailure, FrameStats, RenderBufferError};

/// Render buffer settings shared by all entries.
#[derive(Debug, Clone)]
pub struct ShapeBufferConfig {
    /// Prefix of every device label.
    pub label: String,
    pub mode: TriangulationMode,
    pub index_width: IndexWidth,
    pub skip: ElementSkip,
    pub paint: Paint,
}

impl Default for ShapeBufferConfig {
    fn default() -> Self {
        Self {
            label: "tessera shapes".to_owned(),
            mode: TriangulationMode::Fill,
            index_width: IndexWidth::U16,
            skip: ElementSkip::None,
            paint: Paint::default(),
        }
    }
}

/// List of shapes mirrored into device buffers.
///
/// All list operations and passes serialize on one lock, so shapes can be
/// added or removed from any thread while a render thread drives the passes.
/// A pass never blocks on a shape: write-locked shapes are left for the next
/// pass.
pub struct ShapeRenderBuffer<B: Backend, G: VertexGenerator = IdentityVertices> {
    state: Mutex<State<B, G>>,
}

struct State<B: Backend, G: VertexGenerator> {
    /// User-visible list; `keys[i]` is the entry of `shapes[i]`.
    shapes: Vec<ShapeHandle>,
    keys: Vec<EntryKey>,
    entries: SlotMap<EntryKey, Entry<B>>,
    queue: OpQueue,

    pipeline: Option<B::Pipeline>,
    generator: G,
    config: ShapeBufferConfig,

    vertex_scratch: Vec<G::Vertex>,
    index_scratch: IndexScratch,
    last_stats: FrameStats,
}

impl<B: Backend> ShapeRenderBuffer<B, IdentityVertices> {
    pub fn new(config: ShapeBufferConfig) -> Self {
        Self::with_generator(config, IdentityVertices)
    }
}

impl<B: Backend, G: VertexGenerator> ShapeRenderBuffer<B, G> {
    pub fn with_generator(config: ShapeBufferConfig, generator: G) -> Self {
        Self {
            state: Mutex::new(State {
                shapes: Vec::new(),
                keys: Vec::new(),
                entries: SlotMap::with_key(),
                queue: OpQueue::default(),
                pipeline: None,
                generator,
                config,
                vertex_scratch: Vec::new(),
                index_scratch: IndexScratch::default(),
                last_stats: FrameStats::default(),
            }),
        }
    }

    // ── list ───────────────────────────────────────────────────────────────

    /// Appends `shape` and returns its index.
    pub fn push(&self, shape: ShapeHandle) -> usize {
        let mut state = self.state.lock();
        let index = state.shapes.len();
        state.insert_at(index, shape);
        index
    }

    pub fn insert(&self, index: usize, shape: ShapeHandle) -> Result<(), RenderBufferError> {
        let mut state = self.state.lock();
        let len = state.shapes.len();
        if index > len {
            return Err(RenderBufferError::IndexOutOfBounds { index, len });
        }
        state.insert_at(index, shape);
        Ok(())
    }

    /// Replaces the shape at `index` and returns the previous one.
    pub fn set(&self, index: usize, shape: ShapeHandle) -> Result<ShapeHandle, RenderBufferError> {
        let mut state = self.state.lock();
        let old = state.remove_at(index)?;
        state.insert_at(index, shape);
        Ok(old)
    }

    pub fn remove(&self, index: usize) -> Result<ShapeHandle, RenderBufferError> {
        self.state.lock().remove_at(index)
    }

    /// Removes every shape. Buffers are released by the next pass.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.shapes.clear();
        let keys = std::mem::take(&mut state.keys);
        for key in keys.into_iter().rev() {
            state.retire(key);
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().shapes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ShapeHandle> {
        self.state.lock().shapes.get(index).cloned()
    }

    pub fn contains(&self, shape: &ShapeHandle) -> bool {
        self.state.lock().shapes.iter().any(|s| s.ptr_eq(shape))
    }

    pub fn position(&self, shape: &ShapeHandle) -> Option<usize> {
        self.state.lock().shapes.iter().position(|s| s.ptr_eq(shape))
    }

    /// Snapshot of the shape list.
    pub fn iter(&self) -> std::vec::IntoIter<ShapeHandle> {
        self.state.lock().shapes.clone().into_iter()
    }

    /// Number of ops waiting for the next pass.
    pub fn pending_ops(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Stats of the most recent successful pass.
    pub fn stats(&self) -> FrameStats {
        self.state.lock().last_stats.clone()
    }

    pub fn entry_info(&self, index: usize) -> Option<EntryInfo> {
        let state = self.state.lock();
        let key = *state.keys.get(index)?;
        state.entries.get(key).map(Entry::info)
    }

    // ── configuration ──────────────────────────────────────────────────────

    pub fn config(&self) -> ShapeBufferConfig {
        self.state.lock().config.clone()
    }

    /// Changes the element skip and queues every shape for full regeneration.
    pub fn set_skip(&self, skip: ElementSkip) {
        let mut state = self.state.lock();
        if state.config.skip == skip {
            return;
        }
        state.config.skip = skip;

        let State { keys, entries, queue, .. } = &mut *state;
        for &key in keys.iter() {
            let Some(entry) = entries.get_mut(key) else { continue };
            if entry.queued && queue.upgrade_update(key) {
                continue;
            }
            queue.push(key, OpKind::Update { indices: true });
            entry.queued = true;
        }
        log::debug!("element skip set to {skip:?}; {} shapes queued", keys.len());
    }

    /// Fill used by the next draw.
    pub fn set_paint(&self, paint: Paint) {
        self.state.lock().config.paint = paint;
    }

    // ── passes ─────────────────────────────────────────────────────────────

    /// Queues an update for every live shape whose `(version, count)` moved.
    /// Returns the number of shapes queued.
    pub fn query_for_change(&self) -> usize {
        self.state.lock().query_for_change()
    }

    /// Brings every device buffer up to date without drawing.
    pub fn synchronize<D>(&self, device: &D) -> Result<FrameStats, RenderBufferError>
    where
        D: RenderDevice<B>,
    {
        ensure_device::<B, D>(device)?;
        let mut stats = FrameStats::default();
        let mut state = self.state.lock();
        state.sync(device, &mut stats);
        state.last_stats.clone_from(&stats);
        Ok(stats)
    }

    /// Synchronizes, then issues one indexed draw per live shape in list order.
    pub fn render_with<D, P>(
        &self,
        device: &D,
        pass: &mut P,
    ) -> Result<FrameStats, RenderBufferError>
    where
        D: RenderDevice<B>,
        P: DrawPass<B>,
    {
        ensure_device::<B, D>(device)?;
        let mut stats = FrameStats::default();
        let mut state = self.state.lock();
        state.sync(device, &mut stats);
        state.draw(device, pass, &mut stats);
        state.last_stats.clone_from(&stats);
        Ok(stats)
    }
}

fn ensure_device<B: Backend, D: RenderDevice<B>>(device: &D) -> Result<(), RenderBufferError> {
    if device.is_lost() {
        log::error!("shape render buffer skipped: device lost");
        return Err(RenderBufferError::DeviceLost);
    }
    Ok(())
}

impl<B: Backend, G: VertexGenerator> State<B, G> {
    fn insert_at(&mut self, index: usize, shape: ShapeHandle) {
        let key = self.entries.insert(Entry::new(shape.clone()));
        self.shapes.insert(index, shape);
        self.keys.insert(index, key);
        self.queue.push(key, OpKind::Insert);
    }

    fn remove_at(&mut self, index: usize) -> Result<ShapeHandle, RenderBufferError> {
        let len = self.shapes.len();
        if index >= len {
            return Err(RenderBufferError::IndexOutOfBounds { index, len });
        }
        let shape = self.shapes.remove(index);
        let key = self.keys.remove(index);
        self.retire(key);
        Ok(shape)
    }

    /// Marks an entry that already left the list and queues its release.
    fn retire(&mut self, key: EntryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.state = EntryState::PendingRemove;
            entry.queued = true;
        }
        self.queue.push(key, OpKind::Remove);
    }

    fn query_for_change(&mut self) -> usize {
        let mut queued = 0;
        for &key in &self.keys {
            let Some(entry) = self.entries.get_mut(key) else { continue };
            if entry.state != EntryState::Live || entry.queued {
                continue;
            }
            // Write-locked shapes are polled again by the next pass.
            let Some(current) = entry.shape.try_state() else { continue };
            let indices = match entry.seen {
                Some(seen) if seen == current => continue,
                Some((_, count)) => count != current.1,
                None => true,
            };
            self.queue.push(key, OpKind::Update { indices });
            entry.queued = true;
            queued += 1;
        }
        if queued > 0 {
            log::trace!("{queued} shapes changed since the last pass");
        }
        queued
    }

    fn sync<D: RenderDevice<B>>(&mut self, device: &D, stats: &mut FrameStats) {
        self.query_for_change();

        let positions: SecondaryMap<EntryKey, usize> =
            self.keys.iter().enumerate().map(|(i, &k)| (k, i)).collect();
        let mut deferred = Vec::new();

        while let Some(op) = self.queue.pop() {
            let Some(entry) = self.entries.get_mut(op.key) else { continue };
            if let OpKind::Remove = op.kind {
                release(device, entry);
                stats.removed += 1;
                continue;
            }
            if entry.state == EntryState::PendingRemove {
                continue;
            }
            let Some(&index) = positions.get(op.key) else { continue };
            let indices = match op.kind {
                OpKind::Update { indices } => indices,
                _ => true,
            };
            match self.regenerate(device, op.key, index, indices, stats) {
                Regenerated::Done => {
                    if op.kind == OpKind::Insert {
                        stats.inserted += 1;
                    }
                }
                Regenerated::Busy => deferred.push(op),
            }
        }

        if !deferred.is_empty() {
            log::trace!("{} write-locked shapes deferred to the next pass", deferred.len());
        }
        for op in deferred {
            self.queue.push(op.key, op.kind);
        }

        let before = self.entries.len();
        self.entries.retain(|_, e| e.state != EntryState::PendingRemove);
        if self.entries.len() != before {
            log::debug!("disposed {} shape entries", before - self.entries.len());
        }
    }

    /// Regenerates the entry at list position `index`. Indices are built
    /// first so a triangulation error leaves the device buffers untouched.
    fn regenerate<D: RenderDevice<B>>(
        &mut self,
        device: &D,
        key: EntryKey,
        index: usize,
        indices: bool,
        stats: &mut FrameStats,
    ) -> Regenerated {
        let State {
            shapes,
            entries,
            generator,
            config,
            vertex_scratch,
            index_scratch,
            ..
        } = self;
        let Some(entry) = entries.get_mut(key) else { return Regenerated::Done };
        let Some(shape) = entry.shape.try_read() else { return Regenerated::Busy };
        entry.queued = false;

        let current = (shape.version(), shape.len());
        entry.seen = Some(current);
        entry.state = EntryState::Live;

        let count_changed =
            entry.vertices.as_ref().map(|b| b.len) != Some(vertex_bytes::<G>(current.1));
        let convexity_changed = entry.convex != Some(shape.is_convex());
        let rebuild_indices = indices
            || count_changed
            || convexity_changed
            || entry.indices_stale
            || entry.indices.is_none();

        let index_count = if rebuild_indices {
            match index_scratch.fill(&shape, config) {
                Ok(count) => Some(count),
                Err(error) => {
                    log::warn!("shape {index} ({}) not regenerated: {error}", shape.kind());
                    stats.failures.push(EntryFailure { index, error });
                    entry.indices_stale = true;
                    return Regenerated::Done;
                }
            }
        } else {
            None
        };
        entry.indices_stale = false;
        entry.convex = Some(shape.is_convex());

        vertex_scratch.clear();
        let ctx = GenerateCtx { shapes: shapes.as_slice(), index };
        let upload = generator.generate(&shape, &ctx, vertex_scratch);
        debug_assert_eq!(vertex_scratch.len(), shape.len(), "one vertex per shape vertex");
        let vertex_data: &[u8] = bytemuck::cast_slice(vertex_scratch.as_slice());
        let len = vertex_data.len() as u64;

        let keep = upload == VertexUpload::Keep
            && entry.vertices.as_ref().is_some_and(|b| b.len == len);
        if !keep {
            let label = format!("{} vbo", config.label);
            let buffer =
                ensure_buffer(device, &mut entry.vertices, BufferUsage::Vertex, len, &label, stats);
            device.write_buffer(buffer, vertex_data);
            stats.vertex_uploads += 1;
        }

        if let Some(count) = index_count {
            let data = index_scratch.bytes(config.index_width);
            let label = format!("{} ibo", config.label);
            let len = data.len() as u64;
            let buffer =
                ensure_buffer(device, &mut entry.indices, BufferUsage::Index, len, &label, stats);
            device.write_buffer(buffer, data);
            stats.index_uploads += 1;
            entry.index_count = count as u32;
        }

        entry.line_strip_count = (current.1 + 1) as u32;
        log::trace!(
            "shape {index} regenerated (v{}, {} vertices, indices: {})",
            current.0,
            current.1,
            index_count.is_some()
        );
        Regenerated::Done
    }

    fn draw<D, P>(&mut self, device: &D, pass: &mut P, stats: &mut FrameStats)
    where
        D: RenderDevice<B>,
        P: DrawPass<B>,
    {
        let any_drawable = self
            .keys
            .iter()
            .any(|&k| self.entries.get(k).is_some_and(|e| e.drawable().is_some()));
        if !any_drawable {
            return;
        }

        let desc = PipelineDesc {
            label: format!("{} pipeline", self.config.label),
            layout: G::LAYOUT,
            mode: self.config.mode,
            index_width: self.config.index_width,
        };
        let stale = self
            .pipeline
            .as_ref()
            .is_none_or(|p| !device.pipeline_compatible(p, &desc));
        if stale {
            self.pipeline = Some(device.create_pipeline(&desc));
        }
        let Some(pipeline) = self.pipeline.as_ref() else { return };

        device.write_uniforms(pipeline, &self.config.paint);
        pass.set_pipeline(pipeline);

        for &key in &self.keys {
            let drawable = self.entries.get(key).and_then(Entry::drawable);
            let Some((vertices, indices, count)) = drawable else { continue };
            pass.draw_indexed(vertices, indices, self.config.index_width, count);
            stats.draws += 1;
        }
    }
}

/// Outcome of one regeneration attempt.
enum Regenerated {
    /// Regenerated, or failed with a recorded error.
    Done,
    /// The shape was write-locked; the op is retried by the next pass.
    Busy,
}

#[inline]
fn vertex_bytes<G: VertexGenerator>(count: usize) -> u64 {
    (count * std::mem::size_of::<G::Vertex>()) as u64
}

/// Returns a buffer of at least `len` bytes, replacing `slot` only if it is
/// missing or too small.
fn ensure_buffer<'a, B: Backend, D: RenderDevice<B>>(
    device: &D,
    slot: &'a mut Option<DeviceBuffer<B>>,
    usage: BufferUsage,
    len: u64,
    label: &str,
    stats: &mut FrameStats,
) -> &'a B::Buffer {
    let capacity = copy_aligned(len);
    if let Some(old) = slot.take_if(|b| b.capacity < capacity) {
        device.release_buffer(old.buffer);
        stats.reallocations += 1;
    } else if slot.is_none() {
        stats.allocations += 1;
    }

    let buffer = slot.get_or_insert_with(|| DeviceBuffer {
        buffer: device.create_buffer(usage, capacity, label),
        capacity,
        len,
    });
    buffer.len = len;
    &buffer.buffer
}

fn release<B: Backend, D: RenderDevice<B>>(device: &D, entry: &mut Entry<B>) {
    if let Some(b) = entry.vertices.take() {
        device.release_buffer(b.buffer);
    }
    if let Some(b) = entry.indices.take() {
        device.release_buffer(b.buffer);
    }
    entry.index_count = 0;
}

/// Reusable index storage for both widths.
#[derive(Default)]
struct IndexScratch {
    u16s: Vec<u16>,
    u32s: Vec<u32>,
}

impl IndexScratch {
    /// Triangulates `shape` into the scratch of the configured width and
    /// returns the index count. Storage is padded to the copy alignment.
    fn fill(&mut self, shape: &Shape, config: &ShapeBufferConfig) -> Result<usize, ShapeError> {
        match config.index_width {
            IndexWidth::U16 => fill_indices(&mut self.u16s, shape, config),
            IndexWidth::U32 => fill_indices(&mut self.u32s, shape, config),
        }
    }

    fn bytes(&self, width: IndexWidth) -> &[u8] {
        match width {
            IndexWidth::U16 => bytemuck::cast_slice(&self.u16s),
            IndexWidth::U32 => bytemuck::cast_slice(&self.u32s),
        }
    }
}

fn fill_indices<I: IndexInt>(
    out: &mut Vec<I>,
    shape: &Shape,
    config: &ShapeBufferConfig,
) -> Result<usize, ShapeError> {
    let len = shape.triangulation_len(config.mode, config.skip)?;
    out.clear();
    out.resize(len, I::default());
    let count = shape.triangulate(config.mode, out, config.skip)?;
    out.truncate(count);

    let size = std::mem::size_of::<I>();
    let padded = copy_aligned((out.len() * size) as u64) as usize / size;
    out.resize(padded, I::default());
    Ok(count)
}
