// STD Dependencies -----------------------------------------------------------
use std::iter;
use std::ops::Range;

/// The kind of a row within the flat list.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum RowKind {
    /// A top level row which can be expanded and collapsed.
    Parent,

    /// A row nested under the closest preceding parent row.
    Child,
}

/// The single linear sequence of rows the host widget sees.
///
/// Only the row kinds are stored; the parent a row belongs to is recovered
/// by scanning backwards to the closest parent row.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct FlatList {
    rows: Vec<RowKind>,
}

impl FlatList {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[RowKind] {
        &self.rows
    }

    pub fn kind(&self, position: usize) -> Option<RowKind> {
        self.rows.get(position).cloned()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Appends a parent row followed by `children` child rows.
    pub fn push_parent(&mut self, children: usize) {
        self.rows.push(RowKind::Parent);
        self.rows.extend(iter::repeat(RowKind::Child).take(children));
    }

    /// Number of parent rows in `0..=position`, minus one.
    ///
    /// Expects `position` to be in bounds.
    pub fn nearest_parent_position(&self, position: usize) -> usize {
        if position == 0 {
            return 0;
        }

        let parents = self.rows[..=position]
            .iter()
            .filter(|row| **row == RowKind::Parent)
            .count();

        parents.saturating_sub(1)
    }

    /// Number of child rows between the closest parent row before
    /// `position` and `position` itself (exclusive).
    ///
    /// For a child row this is its offset within the child run of its
    /// parent. Expects `position` to be in bounds.
    pub fn child_position(&self, position: usize) -> usize {
        let mut children = 0;
        for row in &self.rows[..position] {
            match *row {
                RowKind::Parent => children = 0,
                RowKind::Child => children += 1,
            }
        }
        children
    }

    /// Flat position of the parent row with the given `ordinal`.
    pub fn parent_position(&self, ordinal: usize) -> Option<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|&(_, row)| *row == RowKind::Parent)
            .nth(ordinal)
            .map(|(position, _)| position)
    }

    /// Number of child rows directly following the row at `position`.
    pub fn child_run(&self, position: usize) -> usize {
        self.rows
            .iter()
            .skip(position + 1)
            .take_while(|row| **row == RowKind::Child)
            .count()
    }

    /// Flat range covered by the parent row at `position` and its visible
    /// children.
    pub fn block(&self, position: usize) -> Range<usize> {
        position..position + 1 + self.child_run(position)
    }

    pub fn insert_parent(&mut self, position: usize, children: usize) {
        let rows = iter::once(RowKind::Parent).chain(iter::repeat(RowKind::Child).take(children));
        self.rows.splice(position..position, rows);
    }

    pub fn insert_children(&mut self, position: usize, count: usize) {
        let rows = iter::repeat(RowKind::Child).take(count);
        self.rows.splice(position..position, rows);
    }

    pub fn remove(&mut self, range: Range<usize>) -> usize {
        self.rows.drain(range).count()
    }
}
