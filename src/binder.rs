// Internal Dependencies ------------------------------------------------------
use crate::adapter::ParentItem;

/// Identifies a row layout.
pub type ViewType = usize;

/// View type used for all parent rows unless overridden.
pub const PARENT_VIEW_TYPE: ViewType = 0;

/// View type used for all child rows unless overridden.
pub const CHILD_VIEW_TYPE: ViewType = 1;

/// The set of callbacks through which the host creates and fills row views.
///
/// A binder is held by the host next to the
/// [`ExpandableListAdapter`](struct.ExpandableListAdapter.html); the adapter
/// only translates flat positions into parent and child ordinals before
/// handing them to the binder.
///
/// Heterogeneous layouts are supported by overriding
/// [`parent_view_type`](#method.parent_view_type),
/// [`child_view_type`](#method.child_view_type) and
/// [`is_parent_view_type`](#method.is_parent_view_type).
pub trait RowBinder<P: ParentItem> {
    /// The reusable view container for a single row.
    type View;

    /// Creates an unbound container for a parent row of the given type.
    fn create_parent_view(&mut self, view_type: ViewType) -> Self::View;

    /// Creates an unbound container for a child row of the given type.
    fn create_child_view(&mut self, view_type: ViewType) -> Self::View;

    /// Fills `view` with the parent found at `parent_ordinal`.
    fn bind_parent_view(
        &mut self,
        view: &mut Self::View,
        parent_ordinal: usize,
        parent: &P,
        expanded: bool,
    );

    /// Fills `view` with the child at `child_ordinal` of the parent at
    /// `parent_ordinal`.
    fn bind_child_view(
        &mut self,
        view: &mut Self::View,
        parent_ordinal: usize,
        child_ordinal: usize,
        child: &P::Child,
    );

    /// The view type of the parent at `parent_ordinal`.
    fn parent_view_type(&self, _parent_ordinal: usize) -> ViewType {
        PARENT_VIEW_TYPE
    }

    /// The view type of the given child.
    fn child_view_type(&self, _parent_ordinal: usize, _child_ordinal: usize) -> ViewType {
        CHILD_VIEW_TYPE
    }

    /// Returns `true` if `view_type` denotes a parent row layout.
    ///
    /// Must agree with the values returned by
    /// [`parent_view_type`](#method.parent_view_type).
    fn is_parent_view_type(&self, view_type: ViewType) -> bool {
        view_type == PARENT_VIEW_TYPE
    }

    /// Whether submitting the parent at `parent_ordinal` toggles its
    /// expansion state.
    fn toggles_on_submit(&self, _parent_ordinal: usize) -> bool {
        true
    }
}

/// A view container created by a [`RowBinder`](trait.RowBinder.html)
/// together with the bookkeeping the host needs for recycling it.
#[derive(Debug)]
pub struct ViewHolder<V> {
    view: V,
    view_type: ViewType,
    is_parent: bool,
    bound_position: Option<usize>,
    bound_expanded: Option<bool>,
}

impl<V> ViewHolder<V> {
    pub(crate) fn new(view: V, view_type: ViewType, is_parent: bool) -> Self {
        Self {
            view,
            view_type,
            is_parent,
            bound_position: None,
            bound_expanded: None,
        }
    }

    /// The wrapped view container.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The wrapped view container.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// The view type this holder was created for.
    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    /// Returns `true` if this holder was created for parent rows.
    pub fn is_parent(&self) -> bool {
        self.is_parent
    }

    /// The flat position this holder was last bound to, `None` when it
    /// needs to be bound again.
    pub fn bound_position(&self) -> Option<usize> {
        self.bound_position
    }

    /// The expansion state the parent row was last bound with.
    pub(crate) fn bound_expanded(&self) -> Option<bool> {
        self.bound_expanded
    }

    pub(crate) fn set_bound(&mut self, position: usize, expanded: Option<bool>) {
        self.bound_position = Some(position);
        self.bound_expanded = expanded;
    }

    pub(crate) fn invalidate(&mut self) {
        self.bound_position = None;
        self.bound_expanded = None;
    }
}
