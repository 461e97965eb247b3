// STD Dependencies -----------------------------------------------------------
use std::cmp;
use std::collections::HashMap;
use std::ops::Range;

// External Dependencies ------------------------------------------------------
use log::error;

// Internal Dependencies ------------------------------------------------------
use crate::adapter::{ExpandableListAdapter, ParentItem, Row};
use crate::binder::{RowBinder, ViewHolder, ViewType};
use crate::change::Change;

/// Position indexed view holders plus a pool of unbound holders per view
/// type.
pub(crate) struct HolderCache<V> {
    slots: Vec<Option<ViewHolder<V>>>,
    pool: HashMap<ViewType, Vec<ViewHolder<V>>>,
}

impl<V> HolderCache<V> {
    pub fn new(len: usize) -> Self {
        let mut cache = Self {
            slots: Vec::new(),
            pool: HashMap::new(),
        };
        cache.slots.resize_with(len, || None);
        cache
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// The holder bound to `position`, if any.
    pub fn get(&self, position: usize) -> Option<&ViewHolder<V>> {
        self.slots
            .get(position)
            .and_then(|slot| slot.as_ref())
            .filter(|holder| holder.bound_position() == Some(position))
    }

    /// Iterates over all holders bound to their current position.
    pub fn bound(&self) -> impl Iterator<Item = (usize, &ViewHolder<V>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(position, slot)| slot.as_ref().map(|holder| (position, holder)))
            .filter(|&(position, holder)| holder.bound_position() == Some(position))
    }

    #[cfg(test)]
    pub fn pooled(&self, view_type: ViewType) -> usize {
        self.pool.get(&view_type).map(Vec::len).unwrap_or(0)
    }

    pub fn apply(&mut self, change: Change) {
        let len = self.slots.len();
        match change {
            Change::Inserted { start, count } => {
                let start = cmp::min(start, len);
                let tail = self.slots.split_off(start);
                self.slots.resize_with(start + count, || None);
                self.slots.extend(tail);
                self.invalidate_all();
            }
            Change::Removed { start, count } => {
                let range = cmp::min(start, len)..cmp::min(start + count, len);
                let removed: Vec<_> = self.slots.drain(range).collect();
                for holder in removed.into_iter().flatten() {
                    self.recycle(holder);
                }
                self.invalidate_all();
            }
            Change::Changed { start, count } => {
                let range = cmp::min(start, len)..cmp::min(start + count, len);
                for holder in self.slots[range].iter_mut().flatten() {
                    holder.invalidate();
                }
            }
            Change::Moved { from, to } => {
                if from < len && to < len {
                    let holder = self.slots.remove(from);
                    self.slots.insert(to, holder);
                }
                self.invalidate_all();
            }
            Change::Reset => self.reset(0),
        }
    }

    /// Applies a drained batch of changes, ending up with `len` slots.
    ///
    /// Changes queued before the last reset are skipped, the slot count at
    /// the reset is recovered from `len` and the changes following it.
    pub fn replay(&mut self, changes: &[Change], len: usize) {
        let tail = match changes.iter().rposition(|change| *change == Change::Reset) {
            Some(index) => {
                let tail = &changes[index + 1..];
                let mut at_reset = len;
                for change in tail.iter().rev() {
                    match *change {
                        Change::Inserted { count, .. } => at_reset = at_reset.saturating_sub(count),
                        Change::Removed { count, .. } => at_reset = at_reset.saturating_add(count),
                        _ => {}
                    }
                }
                self.reset(at_reset);
                tail
            }
            None => changes,
        };

        for change in tail {
            self.apply(*change);
        }
    }

    /// Recycles every holder and resizes the cache to `len` empty slots.
    pub fn reset(&mut self, len: usize) {
        let slots: Vec<_> = self.slots.drain(..).collect();
        for holder in slots.into_iter().flatten() {
            self.recycle(holder);
        }
        self.slots.resize_with(len, || None);
    }

    /// Makes sure every position in `range` holds a holder of the right type
    /// which is bound to that position.
    pub fn bind_range<P, B>(
        &mut self,
        adapter: &ExpandableListAdapter<P>,
        binder: &mut B,
        range: Range<usize>,
    ) where
        P: ParentItem,
        B: RowBinder<P, View = V>,
    {
        let end = cmp::min(range.end, self.slots.len());
        for position in range.start..end {
            let view_type = match adapter.row_view_type(position, &*binder) {
                Ok(view_type) => view_type,
                Err(err) => {
                    error!("cannot resolve view type: {}", err);
                    continue;
                }
            };

            let mut holder = match self.slots[position].take() {
                Some(holder) if holder.view_type() == view_type => holder,
                Some(holder) => {
                    self.recycle(holder);
                    self.obtain(adapter, binder, view_type)
                }
                None => self.obtain(adapter, binder, view_type),
            };

            // Parents are also rebound once their expansion state changed,
            // childless parents flip it without queueing any row change.
            let expanded = match adapter.row(position) {
                Ok(Row::Parent { expanded, .. }) => Some(expanded),
                _ => None,
            };

            if holder.bound_position() != Some(position) || holder.bound_expanded() != expanded {
                if let Err(err) = adapter.bind_view(binder, &mut holder, position) {
                    error!("cannot bind row: {}", err);
                }
            }

            self.slots[position] = Some(holder);
        }
    }

    fn obtain<P, B>(
        &mut self,
        adapter: &ExpandableListAdapter<P>,
        binder: &mut B,
        view_type: ViewType,
    ) -> ViewHolder<V>
    where
        P: ParentItem,
        B: RowBinder<P, View = V>,
    {
        match self.pool.get_mut(&view_type).and_then(Vec::pop) {
            Some(holder) => holder,
            None => adapter.create_view(binder, view_type),
        }
    }

    fn recycle(&mut self, mut holder: ViewHolder<V>) {
        holder.invalidate();
        self.pool
            .entry(holder.view_type())
            .or_insert_with(Vec::new)
            .push(holder);
    }

    fn invalidate_all(&mut self) {
        for holder in self.slots.iter_mut().flatten() {
            holder.invalidate();
        }
    }
}

/// Where the row at `position` ends up after `change` was applied.
pub(crate) fn follow_position(position: usize, change: Change) -> usize {
    match change {
        Change::Inserted { start, count } if position >= start => position + count,
        Change::Removed { start, count } if position >= start + count => position - count,
        Change::Removed { start, .. } if position >= start => start,
        Change::Moved { from, to } if position == from => to,
        Change::Moved { from, to } if from < position && position <= to => position - 1,
        Change::Moved { from, to } if to <= position && position < from => position + 1,
        _ => position,
    }
}
