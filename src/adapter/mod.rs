// STD Dependencies -----------------------------------------------------------
use std::cmp;
use std::mem;

// External Dependencies ------------------------------------------------------
use log::{debug, trace, warn};

// Internal Dependencies ------------------------------------------------------
use crate::binder::{RowBinder, ViewHolder, ViewType};
use crate::change::{Change, ExpansionEvent, Trigger};
use crate::error::{check_index, check_insert_index, ListError, Result};
use crate::flat_list::{FlatList, RowKind};
use crate::state::{ExpansionSnapshot, StateBundle, EXPANDED_STATE_MAP_KEY};

/// A top level item owning an ordered sequence of children.
pub trait ParentItem {
    /// The type of the nested items.
    type Child;

    /// The children in display order.
    fn children(&self) -> &[Self::Child];

    /// Mutable access to the children.
    ///
    /// Only the adapter calls this, so that every edit is mirrored in the
    /// flat row list.
    fn children_mut(&mut self) -> &mut Vec<Self::Child>;

    /// Whether the item starts out expanded when it enters an adapter.
    fn is_initially_expanded(&self) -> bool {
        false
    }
}

/// A generic [`ParentItem`](trait.ParentItem.html) carrying a value and a
/// list of children.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParentNode<T, C> {
    value: T,
    children: Vec<C>,
    initially_expanded: bool,
}

impl<T, C> ParentNode<T, C> {
    /// Creates a new, initially collapsed node.
    pub fn new(value: T, children: Vec<C>) -> Self {
        Self {
            value,
            children,
            initially_expanded: false,
        }
    }

    /// Sets whether the node starts out expanded.
    ///
    /// Chainable variant.
    pub fn initially_expanded(mut self, expanded: bool) -> Self {
        self.initially_expanded = expanded;
        self
    }

    /// Returns a reference to the value of this node.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns a mutable reference to the value of this node.
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T, C> ParentItem for ParentNode<T, C> {
    type Child = C;

    fn children(&self) -> &[C] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<C> {
        &mut self.children
    }

    fn is_initially_expanded(&self) -> bool {
        self.initially_expanded
    }
}

#[derive(Debug)]
struct ExpansionWrapper<P> {
    parent: P,
    expanded: bool,
    id: u64,
}

#[derive(Debug, Default)]
struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// A borrowed view of the row at a flat position.
#[derive(Debug)]
pub enum Row<'a, P: ParentItem> {
    /// A parent row.
    Parent {
        /// Position of the parent among all parents.
        ordinal: usize,
        /// The parent item.
        parent: &'a P,
        /// Whether the parent is currently expanded.
        expanded: bool,
    },

    /// A child row.
    Child {
        /// Position of the owning parent among all parents.
        parent_ordinal: usize,
        /// Position of the child among its siblings.
        child_ordinal: usize,
        /// The child item.
        child: &'a P::Child,
    },
}

impl<'a, P: ParentItem> Row<'a, P> {
    /// The kind of this row.
    pub fn kind(&self) -> RowKind {
        match *self {
            Row::Parent { .. } => RowKind::Parent,
            Row::Child { .. } => RowKind::Child,
        }
    }

    /// Ordinal of the parent this row is or belongs to.
    pub fn parent_ordinal(&self) -> usize {
        match *self {
            Row::Parent { ordinal, .. } => ordinal,
            Row::Child { parent_ordinal, .. } => parent_ordinal,
        }
    }
}

/// Presents a two level parent/child list as a single flat sequence of rows.
///
/// The adapter owns the parents and keeps a flat row list in which each
/// parent row is followed by its children whenever the parent is expanded.
/// All flat positions handed out and accepted by the adapter refer to that
/// list.
///
/// Every edit queues the minimal [`Change`](enum.Change.html)s needed by a
/// host widget to replay it; expansion changes triggered by the user also
/// queue an [`ExpansionEvent`](enum.ExpansionEvent.html).
///
/// # Examples
///
/// ```rust
/// # extern crate cursive_expandable_list;
/// # use cursive_expandable_list::{Change, ExpandableListAdapter, ParentNode};
/// # fn main() {
/// let mut adapter = ExpandableListAdapter::new(vec![
///     ParentNode::new("fruit", vec!["apple", "pear"]),
///     ParentNode::new("vegetables", vec!["leek"]),
/// ]);
/// assert_eq!(adapter.row_count(), 2);
///
/// adapter.expand_parent(0);
/// assert_eq!(adapter.row_count(), 4);
/// assert_eq!(
///     adapter.drain_changes(),
///     vec![Change::Inserted { start: 1, count: 2 }]
/// );
/// # }
/// ```
#[derive(Debug)]
pub struct ExpandableListAdapter<P: ParentItem> {
    parents: Vec<ExpansionWrapper<P>>,
    flat: FlatList,
    ids: IdGenerator,
    changes: Vec<Change>,
    events: Vec<ExpansionEvent>,
}

impl<P: ParentItem> Default for ExpandableListAdapter<P> {
    /// Creates a new, empty adapter.
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<P: ParentItem> ExpandableListAdapter<P> {
    /// Creates a new adapter, expanding all parents which are initially
    /// expanded.
    pub fn new(parents: Vec<P>) -> Self {
        let mut adapter = Self {
            parents: Vec::with_capacity(parents.len()),
            flat: FlatList::new(),
            ids: IdGenerator::default(),
            changes: Vec::new(),
            events: Vec::new(),
        };

        for parent in parents {
            let wrapper = adapter.wrap(parent);
            adapter.parents.push(wrapper);
        }

        adapter.rebuild_rows();
        adapter
    }

    /// Returns the number of visible rows.
    pub fn row_count(&self) -> usize {
        self.flat.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// Returns the number of parents.
    pub fn parent_count(&self) -> usize {
        self.parents.len()
    }

    /// Returns the kind of the row at `position`.
    pub fn row_kind(&self, position: usize) -> Result<RowKind> {
        self.flat
            .kind(position)
            .ok_or(ListError::IndexOutOfRange {
                index: position,
                len: self.flat.len(),
            })
    }

    /// Returns the row at `position`.
    pub fn row(&self, position: usize) -> Result<Row<P>> {
        let kind = self.row_kind(position)?;
        let ordinal = self.flat.nearest_parent_position(position);
        let wrapper = self.wrapper(ordinal)?;

        Ok(match kind {
            RowKind::Parent => Row::Parent {
                ordinal,
                parent: &wrapper.parent,
                expanded: wrapper.expanded,
            },
            RowKind::Child => {
                let child_ordinal = self.flat.child_position(position);
                let children = wrapper.parent.children();
                let child = children
                    .get(child_ordinal)
                    .ok_or(ListError::IndexOutOfRange {
                        index: child_ordinal,
                        len: children.len(),
                    })?;

                Row::Child {
                    parent_ordinal: ordinal,
                    child_ordinal,
                    child,
                }
            }
        })
    }

    /// Returns the ordinal of the parent the row at `position` is, or
    /// belongs to.
    ///
    /// This is the number of parent rows up to and including `position`,
    /// minus one.
    pub fn nearest_parent_position(&self, position: usize) -> Result<usize> {
        check_index(position, self.flat.len())?;
        Ok(self.flat.nearest_parent_position(position))
    }

    /// Returns the offset of the child row at `position` within the visible
    /// children of its parent.
    ///
    /// For a parent row the length of the child run preceding it is
    /// returned.
    pub fn child_position(&self, position: usize) -> Result<usize> {
        check_index(position, self.flat.len())?;
        Ok(self.flat.child_position(position))
    }

    /// Returns the flat position of the parent at `ordinal`.
    pub fn parent_flat_position(&self, ordinal: usize) -> Option<usize> {
        self.flat.parent_position(ordinal)
    }

    /// Returns a reference to the parent at `ordinal`.
    pub fn parent(&self, ordinal: usize) -> Option<&P> {
        self.parents.get(ordinal).map(|wrapper| &wrapper.parent)
    }

    /// Returns an iterator over all parents in order.
    pub fn parents(&self) -> impl Iterator<Item = &P> {
        self.parents.iter().map(|wrapper| &wrapper.parent)
    }

    /// Returns the stable id of the parent at `ordinal`.
    ///
    /// Ids are unique within this adapter and survive moves and expansion
    /// changes.
    pub fn parent_id(&self, ordinal: usize) -> Option<u64> {
        self.parents.get(ordinal).map(|wrapper| wrapper.id)
    }

    /// Returns `true` if the parent at `ordinal` exists and is expanded.
    pub fn is_expanded(&self, ordinal: usize) -> bool {
        self.parents
            .get(ordinal)
            .map(|wrapper| wrapper.expanded)
            .unwrap_or(false)
    }

    /// Consumes the adapter, returning its parents.
    pub fn into_parents(self) -> Vec<P> {
        self.parents.into_iter().map(|wrapper| wrapper.parent).collect()
    }

    /// Removes and returns all queued row changes, oldest first.
    pub fn drain_changes(&mut self) -> Vec<Change> {
        mem::replace(&mut self.changes, Vec::new())
    }

    /// Returns `true` if row changes are waiting to be drained.
    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Removes and returns all queued expansion events, oldest first.
    pub fn drain_events(&mut self) -> Vec<ExpansionEvent> {
        mem::replace(&mut self.events, Vec::new())
    }
}

// Expansion ------------------------------------------------------------------
impl<P: ParentItem> ExpandableListAdapter<P> {
    /// Expands the parent at `ordinal`.
    ///
    /// Does nothing if the parent is already expanded or does not exist.
    pub fn expand_parent(&mut self, ordinal: usize) {
        self.set_expanded(ordinal, true, Trigger::Programmatic);
    }

    /// Collapses the parent at `ordinal`.
    ///
    /// Does nothing if the parent is already collapsed or does not exist.
    pub fn collapse_parent(&mut self, ordinal: usize) {
        self.set_expanded(ordinal, false, Trigger::Programmatic);
    }

    /// Expands `count` parents starting at `start`.
    pub fn expand_parent_range(&mut self, start: usize, count: usize) {
        let end = cmp::min(start.saturating_add(count), self.parents.len());
        for ordinal in start..end {
            self.set_expanded(ordinal, true, Trigger::Programmatic);
        }
    }

    /// Collapses `count` parents starting at `start`.
    pub fn collapse_parent_range(&mut self, start: usize, count: usize) {
        let end = cmp::min(start.saturating_add(count), self.parents.len());
        for ordinal in start..end {
            self.set_expanded(ordinal, false, Trigger::Programmatic);
        }
    }

    /// Expands every parent, queueing one change per expanded parent.
    pub fn expand_all(&mut self) {
        let count = self.parents.len();
        self.expand_parent_range(0, count);
    }

    /// Collapses every parent, queueing one change per collapsed parent.
    pub fn collapse_all(&mut self) {
        let count = self.parents.len();
        self.collapse_parent_range(0, count);
    }

    /// Toggles the parent row at `position` on behalf of the user, queueing
    /// and returning the resulting event.
    ///
    /// `None` is returned for child rows.
    pub fn toggle_parent(&mut self, position: usize) -> Result<Option<ExpansionEvent>> {
        if self.row_kind(position)? == RowKind::Child {
            return Ok(None);
        }

        let ordinal = self.flat.nearest_parent_position(position);
        let expanded = !self.is_expanded(ordinal);
        Ok(self.set_expanded_by_user(ordinal, expanded))
    }

    /// Expands or collapses the parent at `ordinal` on behalf of the user.
    ///
    /// Returns the queued event, or `None` if nothing changed.
    pub fn set_expanded_by_user(
        &mut self,
        ordinal: usize,
        expanded: bool,
    ) -> Option<ExpansionEvent> {
        if self.set_expanded(ordinal, expanded, Trigger::User) {
            self.events.last().cloned()
        } else {
            None
        }
    }

    fn set_expanded(&mut self, ordinal: usize, expanded: bool, trigger: Trigger) -> bool {
        let position = match self.flat.parent_position(ordinal) {
            Some(position) => position,
            None => {
                debug!("ignoring expansion change of missing parent {}", ordinal);
                return false;
            }
        };

        let children = {
            let wrapper = &mut self.parents[ordinal];
            if wrapper.expanded == expanded {
                return false;
            }
            wrapper.expanded = expanded;
            wrapper.parent.children().len()
        };

        if expanded {
            self.flat.insert_children(position + 1, children);
            self.notify(Change::Inserted {
                start: position + 1,
                count: children,
            });
        } else {
            let run = self.flat.child_run(position);
            self.flat.remove(position + 1..position + 1 + run);
            self.notify(Change::Removed {
                start: position + 1,
                count: run,
            });
        }

        if trigger == Trigger::User {
            self.events.push(if expanded {
                ExpansionEvent::Expanded(ordinal)
            } else {
                ExpansionEvent::Collapsed(ordinal)
            });
        }

        true
    }
}

impl<P: ParentItem + PartialEq> ExpandableListAdapter<P> {
    /// Expands the first parent equal to `parent`.
    pub fn expand_parent_item(&mut self, parent: &P) {
        if let Some(ordinal) = self.ordinal_of(parent) {
            self.expand_parent(ordinal);
        }
    }

    /// Collapses the first parent equal to `parent`.
    pub fn collapse_parent_item(&mut self, parent: &P) {
        if let Some(ordinal) = self.ordinal_of(parent) {
            self.collapse_parent(ordinal);
        }
    }

    /// Replaces all parents, keeping the expansion state and id of every
    /// new parent that equals a previous one.
    ///
    /// Queues a [`Change::Reset`](enum.Change.html#variant.Reset).
    pub fn set_parents_preserving_expansion(&mut self, parents: Vec<P>) {
        let mut previous = mem::replace(&mut self.parents, Vec::with_capacity(parents.len()));
        for parent in parents {
            let wrapper = match previous.iter().position(|old| old.parent == parent) {
                Some(index) => {
                    let old = previous.remove(index);
                    ExpansionWrapper {
                        parent,
                        expanded: old.expanded,
                        id: old.id,
                    }
                }
                None => self.wrap(parent),
            };
            self.parents.push(wrapper);
        }

        self.rebuild_rows();
        self.notify(Change::Reset);
    }

    fn ordinal_of(&self, parent: &P) -> Option<usize> {
        let ordinal = self
            .parents
            .iter()
            .position(|wrapper| wrapper.parent == *parent);
        if ordinal.is_none() {
            debug!("ignoring expansion change of unknown parent");
        }
        ordinal
    }
}

// Parent Mutation ------------------------------------------------------------
impl<P: ParentItem> ExpandableListAdapter<P> {
    /// Inserts `parent` so that it ends up at `ordinal`.
    pub fn insert_parent(&mut self, ordinal: usize, parent: P) -> Result<()> {
        self.insert_parents(ordinal, vec![parent])
    }

    /// Inserts `parents` so that the first one ends up at `ordinal`.
    ///
    /// Parents which are initially expanded are inserted together with their
    /// children; a single insertion covering all new rows is queued.
    pub fn insert_parents(&mut self, ordinal: usize, parents: Vec<P>) -> Result<()> {
        check_insert_index(ordinal, self.parents.len())?;

        let start = self
            .flat
            .parent_position(ordinal)
            .unwrap_or_else(|| self.flat.len());

        let mut position = start;
        let mut wrappers = Vec::with_capacity(parents.len());
        for parent in parents {
            let wrapper = self.wrap(parent);
            let visible = Self::visible_children(&wrapper);
            self.flat.insert_parent(position, visible);
            position += 1 + visible;
            wrappers.push(wrapper);
        }

        self.parents.splice(ordinal..ordinal, wrappers);
        self.notify(Change::Inserted {
            start,
            count: position - start,
        });

        Ok(())
    }

    /// Removes and returns the parent at `ordinal` along with its rows.
    pub fn remove_parent(&mut self, ordinal: usize) -> Result<P> {
        let position = self.locate(ordinal)?;
        let block = self.flat.block(position);
        let count = self.flat.remove(block);

        self.notify(Change::Removed {
            start: position,
            count,
        });

        Ok(self.parents.remove(ordinal).parent)
    }

    /// Removes and returns `count` parents starting at `ordinal`.
    pub fn remove_parents(&mut self, ordinal: usize, count: usize) -> Result<Vec<P>> {
        let last = ordinal
            .checked_add(count)
            .ok_or(ListError::IndexOutOfRange {
                index: ordinal,
                len: self.parents.len(),
            })?;
        check_insert_index(last, self.parents.len())?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let start = self.locate(ordinal)?;
        let end = self
            .flat
            .parent_position(last)
            .unwrap_or_else(|| self.flat.len());

        let removed = self.flat.remove(start..end);
        self.notify(Change::Removed {
            start,
            count: removed,
        });

        Ok(self
            .parents
            .drain(ordinal..last)
            .map(|wrapper| wrapper.parent)
            .collect())
    }

    /// Replaces the parent at `ordinal`, returning the previous one.
    ///
    /// The expansion state and id of the slot are kept.
    pub fn change_parent(&mut self, ordinal: usize, parent: P) -> Result<P> {
        self.update_parent(ordinal, move |old| mem::replace(old, parent))
    }

    /// Modifies the parent at `ordinal` in place.
    ///
    /// The parent row and its visible children are reported as changed. In
    /// case `f` changes the number of children of an expanded parent the
    /// difference is reported as an insertion or removal at the end of the
    /// child run.
    pub fn update_parent<F, R>(&mut self, ordinal: usize, f: F) -> Result<R>
    where
        F: FnOnce(&mut P) -> R,
    {
        let position = self.locate(ordinal)?;
        let before = self.flat.child_run(position);

        let (result, after) = {
            let wrapper = &mut self.parents[ordinal];
            let result = f(&mut wrapper.parent);
            (result, Self::visible_children(wrapper))
        };

        let first_child = position + 1;
        self.notify(Change::Changed {
            start: position,
            count: 1 + cmp::min(before, after),
        });

        if after > before {
            self.flat.insert_children(first_child + before, after - before);
            self.notify(Change::Inserted {
                start: first_child + before,
                count: after - before,
            });
        } else if before > after {
            self.flat.remove(first_child + after..first_child + before);
            self.notify(Change::Removed {
                start: first_child + after,
                count: before - after,
            });
        }

        Ok(result)
    }

    /// Moves the parent at `from` so that it ends up at `to`.
    ///
    /// A parent without visible children is reported as a single move. An
    /// expanded parent with children is reported as the removal of its rows
    /// followed by their insertion at the destination.
    pub fn move_parent(&mut self, from: usize, to: usize) -> Result<()> {
        let position = self.locate(from)?;
        check_index(to, self.parents.len())?;
        if from == to {
            return Ok(());
        }

        let block = self.flat.block(position);
        let visible = block.len() - 1;

        let wrapper = self.parents.remove(from);
        self.parents.insert(to, wrapper);

        // The destination is resolved against the list without the moved
        // rows, which matches the parent order after the move.
        self.flat.remove(block);
        let destination = self
            .flat
            .parent_position(to)
            .unwrap_or_else(|| self.flat.len());
        self.flat.insert_parent(destination, visible);

        if visible == 0 {
            self.notify(Change::Moved {
                from: position,
                to: destination,
            });
        } else {
            self.notify(Change::Removed {
                start: position,
                count: visible + 1,
            });
            self.notify(Change::Inserted {
                start: destination,
                count: visible + 1,
            });
        }

        Ok(())
    }

    /// Replaces all parents, expanding those which are initially expanded.
    ///
    /// Queues a [`Change::Reset`](enum.Change.html#variant.Reset).
    pub fn set_parents(&mut self, parents: Vec<P>) {
        self.parents.clear();
        for parent in parents {
            let wrapper = self.wrap(parent);
            self.parents.push(wrapper);
        }

        self.rebuild_rows();
        self.notify(Change::Reset);
    }
}

// Child Mutation -------------------------------------------------------------
impl<P: ParentItem> ExpandableListAdapter<P> {
    /// Inserts `child` so that it ends up at `child_ordinal` under the parent
    /// at `parent_ordinal`.
    pub fn insert_child(
        &mut self,
        parent_ordinal: usize,
        child_ordinal: usize,
        child: P::Child,
    ) -> Result<()> {
        self.insert_children(parent_ordinal, child_ordinal, vec![child])
    }

    /// Inserts `children` so that the first one ends up at `child_ordinal`.
    pub fn insert_children(
        &mut self,
        parent_ordinal: usize,
        child_ordinal: usize,
        children: Vec<P::Child>,
    ) -> Result<()> {
        let position = self.locate(parent_ordinal)?;
        let count = children.len();

        let expanded = {
            let wrapper = &mut self.parents[parent_ordinal];
            let list = wrapper.parent.children_mut();
            check_insert_index(child_ordinal, list.len())?;
            list.splice(child_ordinal..child_ordinal, children);
            wrapper.expanded
        };

        if expanded {
            let start = position + 1 + child_ordinal;
            self.flat.insert_children(start, count);
            self.notify(Change::Inserted { start, count });
        }

        Ok(())
    }

    /// Removes and returns a single child.
    pub fn remove_child(
        &mut self,
        parent_ordinal: usize,
        child_ordinal: usize,
    ) -> Result<P::Child> {
        let position = self.locate(parent_ordinal)?;

        let (child, expanded) = {
            let wrapper = &mut self.parents[parent_ordinal];
            let list = wrapper.parent.children_mut();
            check_index(child_ordinal, list.len())?;
            (list.remove(child_ordinal), wrapper.expanded)
        };

        if expanded {
            let start = position + 1 + child_ordinal;
            self.flat.remove(start..start + 1);
            self.notify(Change::Removed { start, count: 1 });
        }

        Ok(child)
    }

    /// Removes and returns `count` children starting at `child_ordinal`.
    pub fn remove_children(
        &mut self,
        parent_ordinal: usize,
        child_ordinal: usize,
        count: usize,
    ) -> Result<Vec<P::Child>> {
        let position = self.locate(parent_ordinal)?;

        let (removed, expanded) = {
            let wrapper = &mut self.parents[parent_ordinal];
            let list = wrapper.parent.children_mut();
            let last = child_ordinal
                .checked_add(count)
                .ok_or(ListError::IndexOutOfRange {
                    index: child_ordinal,
                    len: list.len(),
                })?;
            check_insert_index(last, list.len())?;
            let removed: Vec<P::Child> = list.drain(child_ordinal..last).collect();
            (removed, wrapper.expanded)
        };

        if expanded {
            let start = position + 1 + child_ordinal;
            self.flat.remove(start..start + count);
            self.notify(Change::Removed { start, count });
        }

        Ok(removed)
    }

    /// Replaces a single child, returning the previous one.
    pub fn change_child(
        &mut self,
        parent_ordinal: usize,
        child_ordinal: usize,
        child: P::Child,
    ) -> Result<P::Child> {
        self.update_child(parent_ordinal, child_ordinal, move |old| {
            mem::replace(old, child)
        })
    }

    /// Modifies a single child in place.
    pub fn update_child<F, R>(
        &mut self,
        parent_ordinal: usize,
        child_ordinal: usize,
        f: F,
    ) -> Result<R>
    where
        F: FnOnce(&mut P::Child) -> R,
    {
        let position = self.locate(parent_ordinal)?;

        let (result, expanded) = {
            let wrapper = &mut self.parents[parent_ordinal];
            let list = wrapper.parent.children_mut();
            check_index(child_ordinal, list.len())?;
            (f(&mut list[child_ordinal]), wrapper.expanded)
        };

        if expanded {
            self.notify(Change::Changed {
                start: position + 1 + child_ordinal,
                count: 1,
            });
        }

        Ok(result)
    }

    /// Moves a child within its parent so that it ends up at `to`.
    pub fn move_child(&mut self, parent_ordinal: usize, from: usize, to: usize) -> Result<()> {
        let position = self.locate(parent_ordinal)?;

        let expanded = {
            let wrapper = &mut self.parents[parent_ordinal];
            let list = wrapper.parent.children_mut();
            check_index(from, list.len())?;
            check_index(to, list.len())?;
            if from == to {
                return Ok(());
            }

            let child = list.remove(from);
            list.insert(to, child);
            wrapper.expanded
        };

        if expanded {
            self.notify(Change::Moved {
                from: position + 1 + from,
                to: position + 1 + to,
            });
        }

        Ok(())
    }
}

// State ----------------------------------------------------------------------
impl<P: ParentItem> ExpandableListAdapter<P> {
    /// Captures the expansion state of every parent.
    pub fn snapshot(&self) -> ExpansionSnapshot {
        let mut snapshot = ExpansionSnapshot::new();
        let mut children = 0;
        for (position, row) in self.flat.rows().iter().enumerate() {
            match *row {
                RowKind::Parent => {
                    let ordinal = position - children;
                    if let Some(wrapper) = self.parents.get(ordinal) {
                        snapshot.insert(ordinal, wrapper.expanded);
                    }
                }
                RowKind::Child => children += 1,
            }
        }
        snapshot
    }

    /// Rebuilds all rows from the expansion states in `snapshot`.
    ///
    /// Parents without a recorded state fall back to their initial state.
    /// Queues a [`Change::Reset`](enum.Change.html#variant.Reset).
    pub fn restore(&mut self, snapshot: &ExpansionSnapshot) {
        for (ordinal, wrapper) in self.parents.iter_mut().enumerate() {
            wrapper.expanded = snapshot
                .get(ordinal)
                .unwrap_or_else(|| wrapper.parent.is_initially_expanded());
        }

        self.rebuild_rows();
        self.notify(Change::Reset);
    }

    /// Stores the current expansion state in `bundle`.
    pub fn save_state(&self, bundle: &mut StateBundle) {
        match serde_json::to_value(self.snapshot()) {
            Ok(value) => bundle.put(EXPANDED_STATE_MAP_KEY, value),
            Err(err) => warn!("failed to encode expansion state: {}", err),
        }
    }

    /// Restores the expansion state stored in `bundle`.
    ///
    /// Does nothing if `bundle` holds no expansion state.
    pub fn restore_state(&mut self, bundle: &StateBundle) {
        let value = match bundle.get(EXPANDED_STATE_MAP_KEY) {
            Some(value) => value.clone(),
            None => {
                debug!("no expansion state to restore");
                return;
            }
        };

        match serde_json::from_value::<ExpansionSnapshot>(value) {
            Ok(snapshot) => self.restore(&snapshot),
            Err(err) => warn!("ignoring undecodable expansion state: {}", err),
        }
    }
}

// Host Contract --------------------------------------------------------------
impl<P: ParentItem> ExpandableListAdapter<P> {
    /// Returns the view type of the row at `position` as reported by
    /// `binder`.
    pub fn row_view_type<B>(&self, position: usize, binder: &B) -> Result<ViewType>
    where
        B: RowBinder<P>,
    {
        Ok(match self.row(position)? {
            Row::Parent { ordinal, .. } => binder.parent_view_type(ordinal),
            Row::Child {
                parent_ordinal,
                child_ordinal,
                ..
            } => binder.child_view_type(parent_ordinal, child_ordinal),
        })
    }

    /// Creates an unbound view holder for rows of `view_type`.
    pub fn create_view<B>(&self, binder: &mut B, view_type: ViewType) -> ViewHolder<B::View>
    where
        B: RowBinder<P>,
    {
        if binder.is_parent_view_type(view_type) {
            ViewHolder::new(binder.create_parent_view(view_type), view_type, true)
        } else {
            ViewHolder::new(binder.create_child_view(view_type), view_type, false)
        }
    }

    /// Binds the row at `position` into `holder`.
    ///
    /// Fails with
    /// [`InconsistentViewKind`](enum.ListError.html#variant.InconsistentViewKind)
    /// when a parent holder is handed a child row or vice versa.
    pub fn bind_view<B: RowBinder<P>>(
        &self,
        binder: &mut B,
        holder: &mut ViewHolder<B::View>,
        position: usize,
    ) -> Result<()> {
        let bound_expanded = match self.row(position)? {
            Row::Parent {
                ordinal,
                parent,
                expanded,
            } => {
                if !holder.is_parent() {
                    return Err(ListError::InconsistentViewKind {
                        position,
                        view_type: holder.view_type(),
                        expected: "parent",
                    });
                }
                binder.bind_parent_view(holder.view_mut(), ordinal, parent, expanded);
                Some(expanded)
            }
            Row::Child {
                parent_ordinal,
                child_ordinal,
                child,
            } => {
                if holder.is_parent() {
                    return Err(ListError::InconsistentViewKind {
                        position,
                        view_type: holder.view_type(),
                        expected: "child",
                    });
                }
                binder.bind_child_view(holder.view_mut(), parent_ordinal, child_ordinal, child);
                None
            }
        };

        holder.set_bound(position, bound_expanded);
        Ok(())
    }
}

impl<P: ParentItem> ExpandableListAdapter<P> {
    fn wrap(&mut self, parent: P) -> ExpansionWrapper<P> {
        ExpansionWrapper {
            expanded: parent.is_initially_expanded(),
            id: self.ids.next_id(),
            parent,
        }
    }

    fn wrapper(&self, ordinal: usize) -> Result<&ExpansionWrapper<P>> {
        self.parents.get(ordinal).ok_or(ListError::IndexOutOfRange {
            index: ordinal,
            len: self.parents.len(),
        })
    }

    fn locate(&self, ordinal: usize) -> Result<usize> {
        check_index(ordinal, self.parents.len())?;
        self.flat
            .parent_position(ordinal)
            .ok_or(ListError::IndexOutOfRange {
                index: ordinal,
                len: self.parents.len(),
            })
    }

    fn visible_children(wrapper: &ExpansionWrapper<P>) -> usize {
        if wrapper.expanded {
            wrapper.parent.children().len()
        } else {
            0
        }
    }

    fn rebuild_rows(&mut self) {
        self.flat.clear();
        for wrapper in &self.parents {
            self.flat.push_parent(Self::visible_children(wrapper));
        }
    }

    fn notify(&mut self, change: Change) {
        match change {
            Change::Inserted { count: 0, .. }
            | Change::Removed { count: 0, .. }
            | Change::Changed { count: 0, .. } => return,
            _ => {}
        }

        trace!("queued {:?}", change);
        self.changes.push(change);
    }
}
