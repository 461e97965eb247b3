//! An expandable two level list view for [cursive](https://crates.io/crates/cursive).
//!
//! The list is backed by an [`ExpandableListAdapter`](struct.ExpandableListAdapter.html)
//! which flattens parents and their children into a single sequence of rows
//! and reports every structural change as a minimal row range change.
#![deny(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]

// Crate Dependencies ---------------------------------------------------------
extern crate cursive;
#[macro_use]
extern crate debug_stub_derive;

// STD Dependencies -----------------------------------------------------------
use std::cmp;
use std::fmt::{Debug, Display};
use std::rc::Rc;

// External Dependencies ------------------------------------------------------
use cursive::direction::Direction;
use cursive::event::{Callback, Event, EventResult, Key};
use cursive::theme::ColorStyle;
use cursive::vec::Vec2;
use cursive::view::{ScrollBase, View};
use cursive::With;
use cursive::{Cursive, Printer};
use log::debug;

// Internal Dependencies ------------------------------------------------------
mod adapter;
mod binder;
mod change;
mod error;
mod flat_list;
mod recycler;
mod state;

pub use adapter::{ExpandableListAdapter, ParentItem, ParentNode, Row};
pub use binder::{RowBinder, ViewHolder, ViewType, CHILD_VIEW_TYPE, PARENT_VIEW_TYPE};
pub use change::{Change, ExpansionEvent};
pub use error::{ListError, Result};
pub use flat_list::RowKind;
pub use state::{ExpansionSnapshot, StateBundle, EXPANDED_STATE_MAP_KEY};

use recycler::{follow_position, HolderCache};

/// Callback taking a row index as input.
type IndexCallback = Rc<dyn Fn(&mut Cursive, usize)>;

/// Callback taking an expansion event as input.
type ExpansionCallback = Rc<dyn Fn(&mut Cursive, ExpansionEvent)>;

/// A list view showing parents which can be expanded to reveal their
/// children.
///
/// Rows are created and filled by a [`RowBinder`](trait.RowBinder.html),
/// whose view containers are printed through their `Display` implementation
/// after a tree symbol.
///
/// All structural edits go through the adapter returned by
/// [`adapter_mut`](#method.adapter_mut); the view replays the queued changes
/// on its next layout, keeping the selection on the same item.
///
/// # Examples
///
/// ```rust
/// # extern crate cursive_expandable_list;
/// # use cursive_expandable_list::*;
/// # fn main() {
/// struct Labels;
///
/// impl RowBinder<ParentNode<String, String>> for Labels {
///     type View = String;
///
///     fn create_parent_view(&mut self, _: ViewType) -> String {
///         String::new()
///     }
///
///     fn create_child_view(&mut self, _: ViewType) -> String {
///         String::new()
///     }
///
///     fn bind_parent_view(
///         &mut self,
///         view: &mut String,
///         _: usize,
///         parent: &ParentNode<String, String>,
///         _: bool,
///     ) {
///         *view = parent.value().clone();
///     }
///
///     fn bind_child_view(&mut self, view: &mut String, _: usize, _: usize, child: &String) {
///         *view = child.clone();
///     }
/// }
///
/// let adapter = ExpandableListAdapter::new(vec![ParentNode::new(
///     "src".to_string(),
///     vec!["lib.rs".to_string()],
/// )]);
///
/// let view = ExpandableListView::new(adapter, Labels);
/// assert_eq!(view.len(), 1);
/// # }
/// ```
#[derive(DebugStub)]
pub struct ExpandableListView<P: ParentItem + Debug, B: RowBinder<P>> {
    enabled: bool,

    #[debug_stub(some = "Rc<Fn(&mut Cursive, usize)")]
    on_submit: Option<IndexCallback>,

    #[debug_stub(some = "Rc<Fn(&mut Cursive, usize)")]
    on_select: Option<IndexCallback>,

    #[debug_stub(some = "Rc<Fn(&mut Cursive, ExpansionEvent)>")]
    on_expansion: Option<ExpansionCallback>,

    #[debug_stub = "ScrollBase"]
    scrollbase: ScrollBase,
    focus: usize,
    adapter: ExpandableListAdapter<P>,

    #[debug_stub = "RowBinder"]
    binder: B,

    #[debug_stub = "HolderCache"]
    holders: HolderCache<B::View>,
}

/// One character for the symbol, and one for a space between the symbol and the row
const SYMBOL_WIDTH: usize = 2;

impl<P: ParentItem + Debug, B: RowBinder<P>> ExpandableListView<P, B> {
    /// Creates a new view around `adapter`, creating and binding rows
    /// through `binder`.
    pub fn new(adapter: ExpandableListAdapter<P>, binder: B) -> Self {
        let holders = HolderCache::new(adapter.row_count());
        Self {
            enabled: true,
            on_submit: None,
            on_select: None,
            on_expansion: None,

            scrollbase: ScrollBase::new(),
            focus: 0,
            adapter,
            binder,
            holders,
        }
    }

    /// Disables this view.
    ///
    /// A disabled view cannot be selected.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Re-enables this view.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Enable or disable this view.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns `true` if this view is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets a callback to be used when `<Enter>` is pressed on a child row,
    /// or on a parent row which does not toggle on submit.
    pub fn set_on_submit<F>(&mut self, cb: F)
    where
        F: Fn(&mut Cursive, usize) + 'static,
    {
        self.on_submit = Some(Rc::new(move |s, row| cb(s, row)));
    }

    /// Sets a callback to be used when `<Enter>` is pressed on a child row,
    /// or on a parent row which does not toggle on submit.
    ///
    /// Chainable variant.
    pub fn on_submit<F>(self, cb: F) -> Self
    where
        F: Fn(&mut Cursive, usize) + 'static,
    {
        self.with(|t| t.set_on_submit(cb))
    }

    /// Sets a callback to be used when a row is selected.
    pub fn set_on_select<F>(&mut self, cb: F)
    where
        F: Fn(&mut Cursive, usize) + 'static,
    {
        self.on_select = Some(Rc::new(move |s, row| cb(s, row)));
    }

    /// Sets a callback to be used when a row is selected.
    ///
    /// Chainable variant.
    pub fn on_select<F>(self, cb: F) -> Self
    where
        F: Fn(&mut Cursive, usize) + 'static,
    {
        self.with(|t| t.set_on_select(cb))
    }

    /// Sets a callback to be used when the user expands or collapses a
    /// parent.
    pub fn set_on_expansion<F>(&mut self, cb: F)
    where
        F: Fn(&mut Cursive, ExpansionEvent) + 'static,
    {
        self.on_expansion = Some(Rc::new(move |s, event| cb(s, event)));
    }

    /// Sets a callback to be used when the user expands or collapses a
    /// parent.
    ///
    /// Chainable variant.
    pub fn on_expansion<F>(self, cb: F) -> Self
    where
        F: Fn(&mut Cursive, ExpansionEvent) + 'static,
    {
        self.with(|t| t.set_on_expansion(cb))
    }

    /// Returns a reference to the underlying adapter.
    pub fn adapter(&self) -> &ExpandableListAdapter<P> {
        &self.adapter
    }

    /// Returns a mutable reference to the underlying adapter.
    ///
    /// Changes queued through it are picked up on the next layout, they must
    /// not be drained by the caller.
    pub fn adapter_mut(&mut self) -> &mut ExpandableListAdapter<P> {
        &mut self.adapter
    }

    /// Returns a reference to the binder.
    pub fn binder(&self) -> &B {
        &self.binder
    }

    /// Returns a mutable reference to the binder.
    ///
    /// All rows are bound again on the next layout.
    pub fn binder_mut(&mut self) -> &mut B {
        self.holders.reset(self.adapter.row_count());
        &mut self.binder
    }

    /// Returns the view holder currently bound to `row`.
    pub fn holder(&self, row: usize) -> Option<&ViewHolder<B::View>> {
        self.holders.get(row)
    }

    /// Returns the number of visible rows.
    pub fn len(&self) -> usize {
        self.adapter.row_count()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.adapter.is_empty()
    }

    /// Returns the index of the currently selected row.
    ///
    /// `None` is returned in case of the list being empty.
    pub fn row(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.focus)
        }
    }

    /// Selects the row at the specified index.
    pub fn set_selected_row(&mut self, row: usize) {
        self.focus = row;
        self.scrollbase.scroll_to(row);
    }

    /// Selects the row at the specified index.
    ///
    /// Chainable variant.
    pub fn selected_row(self, row: usize) -> Self {
        self.with(|t| t.set_selected_row(row))
    }

    /// Stores the expansion state of the list in `bundle`.
    pub fn save_state(&self, bundle: &mut StateBundle) {
        self.adapter.save_state(bundle);
    }

    /// Restores the expansion state stored in `bundle`.
    pub fn restore_state(&mut self, bundle: &StateBundle) {
        self.adapter.restore_state(bundle);
        self.sync();
    }

    /// Replays all changes queued in the adapter against the view holders
    /// and the selection.
    fn sync(&mut self) {
        let changes = self.adapter.drain_changes();
        for change in &changes {
            self.focus = follow_position(self.focus, *change);
        }

        let rows = self.adapter.row_count();
        self.holders.replay(&changes, rows);
        if self.holders.len() != rows {
            debug!("view holders out of sync, rebuilding {} rows", rows);
            self.holders.reset(rows);
        }

        self.focus = cmp::min(self.focus, rows.saturating_sub(1));
    }

    fn bind_visible(&mut self, height: usize) {
        let start = self.scrollbase.start_line;
        self.holders
            .bind_range(&self.adapter, &mut self.binder, start..start.saturating_add(height));
    }

    fn indent(&self, row: usize) -> usize {
        match self.adapter.row_kind(row) {
            Ok(RowKind::Child) => SYMBOL_WIDTH,
            _ => 0,
        }
    }

    fn focus_up(&mut self, n: usize) {
        self.focus -= cmp::min(self.focus, n);
    }

    fn focus_down(&mut self, n: usize) {
        self.focus = cmp::min(self.focus + n, self.len().saturating_sub(1));
    }

    fn expand_focused(&mut self, expanded: bool) -> EventResult {
        let ordinal = match self.adapter.nearest_parent_position(self.focus) {
            Ok(ordinal) => ordinal,
            Err(_) => return EventResult::Ignored,
        };

        if self.adapter.set_expanded_by_user(ordinal, expanded).is_none() {
            return EventResult::Ignored;
        }

        self.sync();
        if !expanded {
            if let Some(position) = self.adapter.parent_flat_position(ordinal) {
                self.focus = position;
            }
        }

        self.expansion_result()
    }

    fn expansion_result(&mut self) -> EventResult {
        self.sync();
        self.scrollbase.scroll_to(self.focus);

        let events = self.adapter.drain_events();
        match self.on_expansion.clone() {
            Some(cb) if !events.is_empty() => {
                EventResult::Consumed(Some(Callback::from_fn(move |s| {
                    for event in &events {
                        cb(s, *event);
                    }
                })))
            }
            _ => EventResult::Consumed(None),
        }
    }

    fn submit(&self, row: usize) -> EventResult {
        match self.on_submit.clone() {
            Some(cb) => EventResult::Consumed(Some(Callback::from_fn(move |s| cb(s, row)))),
            None => EventResult::Ignored,
        }
    }
}

impl<P, B> View for ExpandableListView<P, B>
where
    P: ParentItem + Debug + 'static,
    B: RowBinder<P> + 'static,
    B::View: Display + 'static,
{
    fn draw(&self, printer: &Printer) {
        self.scrollbase.draw(printer, |printer, i| {
            let (offset, symbol) = match self.adapter.row(i) {
                Ok(Row::Parent { expanded, .. }) => (0, if expanded { "▾" } else { "▸" }),
                Ok(Row::Child { .. }) => (SYMBOL_WIDTH, "◦"),
                Err(_) => return,
            };

            let color = if i == self.focus {
                if self.enabled && printer.focused {
                    ColorStyle::highlight()
                } else {
                    ColorStyle::highlight_inactive()
                }
            } else {
                ColorStyle::primary()
            };

            printer.print((offset, 0), symbol);

            if let Some(holder) = self.holders.get(i) {
                printer.with_color(color, |printer| {
                    printer.print(
                        (offset + SYMBOL_WIDTH, 0),
                        format!("{}", holder.view()).as_str(),
                    );
                });
            }
        });
    }

    fn required_size(&mut self, req: Vec2) -> Vec2 {
        self.sync();
        self.bind_visible(req.y);

        let width: usize = self
            .holders
            .bound()
            .map(|(row, holder)| self.indent(row) + format!("{}", holder.view()).len() + SYMBOL_WIDTH)
            .max()
            .unwrap_or(0);

        let h = self.len();
        let w = if req.y < h { width + 2 } else { width };

        (w, h).into()
    }

    fn layout(&mut self, size: Vec2) {
        self.sync();

        let height = self.len();
        self.scrollbase.set_heights(size.y, height);
        self.scrollbase.scroll_to(self.focus);
        self.bind_visible(size.y);
    }

    fn take_focus(&mut self, _: Direction) -> bool {
        self.enabled && !self.is_empty()
    }

    fn on_event(&mut self, event: Event) -> EventResult {
        if !self.enabled {
            return EventResult::Ignored;
        }

        self.sync();

        let last_focus = self.focus;
        match event {
            Event::Key(Key::Up) if self.focus > 0 => {
                self.focus_up(1);
            }
            Event::Key(Key::Down) if self.focus + 1 < self.len() => {
                self.focus_down(1);
            }
            Event::Key(Key::PageUp) => {
                self.focus_up(10);
            }
            Event::Key(Key::PageDown) => {
                self.focus_down(10);
            }
            Event::Key(Key::Home) => {
                self.focus = 0;
            }
            Event::Key(Key::End) => {
                self.focus = self.len().saturating_sub(1);
            }
            Event::Key(Key::Right) => {
                return self.expand_focused(true);
            }
            Event::Key(Key::Left) => {
                return self.expand_focused(false);
            }
            Event::Key(Key::Enter) => {
                if self.is_empty() {
                    return EventResult::Ignored;
                }

                let row = self.focus;
                let toggles = match self.adapter.row(row) {
                    Ok(Row::Parent { ordinal, .. }) => self.binder.toggles_on_submit(ordinal),
                    Ok(Row::Child { .. }) => false,
                    Err(_) => return EventResult::Ignored,
                };

                if !toggles {
                    return self.submit(row);
                }

                return match self.adapter.toggle_parent(row) {
                    Ok(Some(_)) => self.expansion_result(),
                    _ => EventResult::Ignored,
                };
            }
            _ => return EventResult::Ignored,
        }

        let focus = self.focus;
        self.scrollbase.scroll_to(focus);

        if !self.is_empty() && last_focus != focus {
            let row = self.focus;
            EventResult::Consumed(
                self.on_select
                    .clone()
                    .map(|cb| Callback::from_fn(move |s| cb(s, row))),
            )
        } else {
            EventResult::Ignored
        }
    }
}

// Tests ----------------------------------------------------------------------
#[cfg(test)]
mod test {

    use super::{
        ExpandableListAdapter, ExpandableListView, ParentNode, RowBinder, StateBundle, ViewType,
    };
    use cursive::event::{Event, EventResult, Key};
    use cursive::view::View;

    type Node = ParentNode<&'static str, &'static str>;

    struct Labels;

    impl RowBinder<Node> for Labels {
        type View = String;

        fn create_parent_view(&mut self, _: ViewType) -> String {
            String::new()
        }

        fn create_child_view(&mut self, _: ViewType) -> String {
            String::new()
        }

        fn bind_parent_view(&mut self, view: &mut String, _: usize, parent: &Node, _: bool) {
            *view = parent.value().to_string();
        }

        fn bind_child_view(&mut self, view: &mut String, _: usize, _: usize, child: &&'static str) {
            *view = child.to_string();
        }

        fn toggles_on_submit(&self, parent_ordinal: usize) -> bool {
            parent_ordinal != 2
        }
    }

    fn view() -> ExpandableListView<Node, Labels> {
        let adapter = ExpandableListAdapter::new(vec![
            ParentNode::new("a", vec!["a0", "a1"]),
            ParentNode::new("b", vec!["b0"]).initially_expanded(true),
            ParentNode::new("c", vec!["c0"]),
        ]);
        ExpandableListView::new(adapter, Labels)
    }

    fn consumed(result: &EventResult) -> bool {
        match *result {
            EventResult::Consumed(_) => true,
            EventResult::Ignored => false,
        }
    }

    #[test]
    fn test_layout_binds_visible_rows() {
        let mut view = view();
        view.layout((20, 2).into());

        assert_eq!(view.holder(0).map(|h| h.view().as_str()), Some("a"));
        assert_eq!(view.holder(1).map(|h| h.view().as_str()), Some("b"));
        assert!(view.holder(2).is_none());
    }

    #[test]
    fn test_enter_toggles_parent() {
        let mut view = view();
        view.layout((20, 10).into());

        let result = view.on_event(Event::Key(Key::Enter));
        assert!(consumed(&result));
        assert_eq!(view.len(), 6);
        assert!(view.adapter().is_expanded(0));

        view.layout((20, 10).into());
        assert_eq!(view.holder(2).map(|h| h.view().as_str()), Some("a1"));
        assert_eq!(view.holder(3).map(|h| h.view().as_str()), Some("b"));
    }

    #[test]
    fn test_enter_without_toggle_submits() {
        let mut view = view();
        view.set_selected_row(3);

        let result = view.on_event(Event::Key(Key::Enter));
        assert!(!consumed(&result));
        assert!(!view.adapter().is_expanded(2));

        view.set_on_submit(|_, _| {});
        let result = view.on_event(Event::Key(Key::Enter));
        assert!(consumed(&result));
    }

    #[test]
    fn test_focus_follows_item() {
        let mut view = view();
        view.set_selected_row(3);

        view.adapter_mut().expand_parent(0);
        view.layout((20, 10).into());

        assert_eq!(view.row(), Some(5));
    }

    #[test]
    fn test_left_collapses_parent_of_child() {
        let mut view = view();
        view.set_selected_row(2);

        let result = view.on_event(Event::Key(Key::Left));
        assert!(consumed(&result));
        assert_eq!(view.row(), Some(1));
        assert_eq!(view.len(), 3);

        let result = view.on_event(Event::Key(Key::Left));
        assert!(!consumed(&result));
    }

    struct StateLabels;

    impl RowBinder<Node> for StateLabels {
        type View = String;

        fn create_parent_view(&mut self, _: ViewType) -> String {
            String::new()
        }

        fn create_child_view(&mut self, _: ViewType) -> String {
            String::new()
        }

        fn bind_parent_view(&mut self, view: &mut String, _: usize, parent: &Node, expanded: bool) {
            let state = if expanded { "open" } else { "closed" };
            *view = format!("{} {}", parent.value(), state);
        }

        fn bind_child_view(&mut self, view: &mut String, _: usize, _: usize, child: &&'static str) {
            *view = child.to_string();
        }
    }

    #[test]
    fn test_toggle_childless_parent_rebinds() {
        let adapter = ExpandableListAdapter::new(vec![
            ParentNode::new("empty", vec![]),
            ParentNode::new("full", vec!["f0"]),
        ]);
        let mut view = ExpandableListView::new(adapter, StateLabels);
        view.layout((20, 10).into());
        assert_eq!(view.holder(0).map(|h| h.view().as_str()), Some("empty closed"));

        let result = view.on_event(Event::Key(Key::Enter));
        assert!(consumed(&result));
        assert!(view.adapter().is_expanded(0));

        view.layout((20, 10).into());
        assert_eq!(view.holder(0).map(|h| h.view().as_str()), Some("empty open"));

        view.on_event(Event::Key(Key::Left));
        view.layout((20, 10).into());
        assert_eq!(view.holder(0).map(|h| h.view().as_str()), Some("empty closed"));
    }

    #[test]
    fn test_right_expands() {
        let mut view = view();
        let result = view.on_event(Event::Key(Key::Right));

        assert!(consumed(&result));
        assert_eq!(view.len(), 6);
        assert_eq!(view.row(), Some(0));
    }

    #[test]
    fn test_navigation() {
        let mut view = view();
        view.on_event(Event::Key(Key::End));
        assert_eq!(view.row(), Some(3));

        view.on_event(Event::Key(Key::Up));
        assert_eq!(view.row(), Some(2));

        view.on_event(Event::Key(Key::Home));
        assert_eq!(view.row(), Some(0));

        view.on_event(Event::Key(Key::PageDown));
        assert_eq!(view.row(), Some(3));
    }

    #[test]
    fn test_disabled_view_ignores_events() {
        let mut view = view();
        view.disable();

        let result = view.on_event(Event::Key(Key::Enter));
        assert!(!consumed(&result));
        assert!(!view.take_focus(cursive::direction::Direction::none()));
    }

    #[test]
    fn test_restore_state() {
        let mut view = view();
        view.adapter_mut().expand_all();

        let mut bundle = StateBundle::new();
        view.save_state(&mut bundle);

        let mut restored = self::view();
        restored.restore_state(&bundle);
        restored.layout((20, 10).into());

        assert_eq!(restored.len(), 7);
        assert_eq!(restored.holder(6).map(|h| h.view().as_str()), Some("c0"));
    }

    #[test]
    fn test_required_size() {
        let mut view = view();
        let size = view.required_size((20, 10).into());

        assert_eq!(size.y, 4);
        assert_eq!(size.x, 6);
    }
}
