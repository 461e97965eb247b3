/// A change to the flat row list that the host widget has to replay.
///
/// Positions are flat positions as they are *after* all previously queued
/// changes have been applied.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Change {
    /// `count` rows were inserted, the first one now sits at `start`.
    Inserted {
        /// First inserted position.
        start: usize,
        /// Number of inserted rows.
        count: usize,
    },

    /// `count` rows starting at `start` were removed.
    Removed {
        /// First removed position.
        start: usize,
        /// Number of removed rows.
        count: usize,
    },

    /// The data behind `count` rows starting at `start` changed.
    Changed {
        /// First changed position.
        start: usize,
        /// Number of changed rows.
        count: usize,
    },

    /// The row at `from` now sits at `to`.
    Moved {
        /// Position before the move.
        from: usize,
        /// Position after the move.
        to: usize,
    },

    /// The whole list has to be laid out again.
    Reset,
}

/// Emitted when the user expands or collapses a parent row.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum ExpansionEvent {
    /// The parent at the given ordinal was expanded.
    Expanded(usize),

    /// The parent at the given ordinal was collapsed.
    Collapsed(usize),
}

impl ExpansionEvent {
    /// The ordinal of the parent this event refers to.
    pub fn parent_ordinal(&self) -> usize {
        match *self {
            ExpansionEvent::Expanded(ordinal) | ExpansionEvent::Collapsed(ordinal) => ordinal,
        }
    }

    /// Returns `true` for [`Expanded`](#variant.Expanded).
    pub fn is_expanded(&self) -> bool {
        match *self {
            ExpansionEvent::Expanded(_) => true,
            ExpansionEvent::Collapsed(_) => false,
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub(crate) enum Trigger {
    Programmatic,
    User,
}
