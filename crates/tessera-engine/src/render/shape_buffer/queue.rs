use std::collections::VecDeque;

use super::entry::EntryKey;

/// Work recorded between passes and drained FIFO by the next one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum OpKind {
    /// Allocate buffers and fully regenerate.
    Insert,
    /// Regenerate vertices; indices too when `indices` is set.
    Update { indices: bool },
    /// Release buffers.
    Remove,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) struct PendingOp {
    pub key: EntryKey,
    pub kind: OpKind,
}

#[derive(Default)]
pub(super) struct OpQueue {
    ops: VecDeque<PendingOp>,
}

impl OpQueue {
    #[inline]
    pub fn push(&mut self, key: EntryKey, kind: OpKind) {
        self.ops.push_back(PendingOp { key, kind });
    }

    #[inline]
    pub fn pop(&mut self) -> Option<PendingOp> {
        self.ops.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Upgrades a queued vertex-only update of `key` to a full one.
    /// Returns false when no update for `key` is queued.
    pub fn upgrade_update(&mut self, key: EntryKey) -> bool {
        let mut found = false;
        for op in self.ops.iter_mut().filter(|op| op.key == key) {
            match &mut op.kind {
                OpKind::Update { indices } => {
                    *indices = true;
                    found = true;
                }
                OpKind::Insert => found = true,
                OpKind::Remove => {}
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn drains_in_fifo_order_and_upgrades_updates() {
        let mut keys: SlotMap<EntryKey, ()> = SlotMap::with_key();
        let (a, b) = (keys.insert(()), keys.insert(()));

        let mut queue = OpQueue::default();
        queue.push(a, OpKind::Insert);
        queue.push(b, OpKind::Update { indices: false });
        queue.push(a, OpKind::Remove);

        assert!(queue.upgrade_update(b));
        assert!(queue.upgrade_update(a));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(PendingOp { key: a, kind: OpKind::Insert }));
        assert_eq!(queue.pop(), Some(PendingOp { key: b, kind: OpKind::Update { indices: true } }));
        assert_eq!(queue.pop(), Some(PendingOp { key: a, kind: OpKind::Remove }));
        assert_eq!(queue.pop(), None);
    }
}
