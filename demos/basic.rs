// Crate Dependencies ---------------------------------------------------------
extern crate cursive;
extern crate cursive_expandable_list;

// STD Dependencies -----------------------------------------------------------
use std::cell::RefCell;
use std::rc::Rc;

// External Dependencies ------------------------------------------------------
use cursive::direction::Orientation;
use cursive::traits::*;
use cursive::views::{BoxView, Dialog, DummyView, LinearLayout, Panel, TextView};
use cursive::Cursive;

// Modules --------------------------------------------------------------------
use cursive_expandable_list::{
    ExpandableListAdapter, ExpandableListView, ExpansionEvent, ParentItem, ParentNode, Row,
    RowBinder, StateBundle, ViewType,
};

type Node = ParentNode<String, String>;
type List = ExpandableListView<Node, Labels>;

// Binder ---------------------------------------------------------------------
struct Labels;

impl RowBinder<Node> for Labels {
    type View = String;

    fn create_parent_view(&mut self, _: ViewType) -> String {
        String::new()
    }

    fn create_child_view(&mut self, _: ViewType) -> String {
        String::new()
    }

    fn bind_parent_view(&mut self, view: &mut String, _: usize, parent: &Node, expanded: bool) {
        *view = if expanded {
            parent.value().clone()
        } else {
            format!("{} ({})", parent.value(), parent.children().len())
        };
    }

    fn bind_child_view(&mut self, view: &mut String, _: usize, _: usize, child: &String) {
        *view = child.clone();
    }
}

// Example --------------------------------------------------------------------
fn main() {
    let mut siv = Cursive::default();

    // List -------------------------------------------------------------------
    let adapter = ExpandableListAdapter::new(vec![
        ParentNode::new(
            "src".to_string(),
            vec!["lib.rs".to_string(), "binder.rs".to_string()],
        )
        .initially_expanded(true),
        ParentNode::new("demos".to_string(), vec!["basic.rs".to_string()]),
        ParentNode::new(
            "docs".to_string(),
            vec!["README.md".to_string(), "DESIGN.md".to_string()],
        ),
        ParentNode::new("target".to_string(), vec![]),
    ]);

    let mut list = ExpandableListView::new(adapter, Labels);

    // Callbacks --------------------------------------------------------------
    list.set_on_submit(|siv: &mut Cursive, row| {
        let value = siv.call_on_id("list", move |list: &mut List| label(list, row));

        siv.add_layer(
            Dialog::around(TextView::new(value.unwrap_or_default()))
                .title("Row submitted")
                .button("Close", |s| {
                    s.pop_layer();
                }),
        );

        set_status(siv, row, "Submitted");
    });

    list.set_on_select(|siv: &mut Cursive, row| {
        set_status(siv, row, "Selected");
    });

    list.set_on_expansion(|siv: &mut Cursive, event: ExpansionEvent| {
        let text = if event.is_expanded() {
            format!("Expanded parent #{}", event.parent_ordinal())
        } else {
            format!("Collapsed parent #{}", event.parent_ordinal())
        };

        siv.call_on_id("status", move |view: &mut TextView| {
            view.set_content(format!("Last action: {}", text));
        });
    });

    // Controls ---------------------------------------------------------------
    fn selected_parent(list: &List) -> Option<usize> {
        list.row()
            .and_then(|row| list.adapter().nearest_parent_position(row).ok())
    }

    siv.add_global_callback('p', |s| {
        s.call_on_id("list", |list: &mut List| {
            let ordinal = selected_parent(list).map(|o| o + 1).unwrap_or(0);
            let parent = ParentNode::new(format!("parent {}", ordinal), vec![]);
            if let Err(err) = list.adapter_mut().insert_parent(ordinal, parent) {
                eprintln!("{}", err);
            }
        });
    });

    siv.add_global_callback('c', |s| {
        s.call_on_id("list", |list: &mut List| {
            if let Some(ordinal) = selected_parent(list) {
                let adapter = list.adapter_mut();
                let count = adapter.parent(ordinal).map_or(0, |p| p.children().len());
                let child = format!("child {}", count);
                if let Err(err) = adapter.insert_child(ordinal, count, child) {
                    eprintln!("{}", err);
                }
            }
        });
    });

    siv.add_global_callback('r', |s| {
        s.call_on_id("list", |list: &mut List| {
            let row = match list.row() {
                Some(row) => row,
                None => return,
            };

            let adapter = list.adapter_mut();
            let result = match adapter.row(row) {
                Ok(Row::Parent { ordinal, .. }) => adapter.remove_parent(ordinal).map(|_| ()),
                Ok(Row::Child {
                    parent_ordinal,
                    child_ordinal,
                    ..
                }) => adapter
                    .remove_child(parent_ordinal, child_ordinal)
                    .map(|_| ()),
                Err(err) => Err(err),
            };

            if let Err(err) = result {
                eprintln!("{}", err);
            }
        });
    });

    siv.add_global_callback('u', |s| move_selected(s, false));
    siv.add_global_callback('d', |s| move_selected(s, true));

    siv.add_global_callback('x', |s| {
        s.call_on_id("list", |list: &mut List| list.adapter_mut().expand_all());
    });

    siv.add_global_callback('z', |s| {
        s.call_on_id("list", |list: &mut List| list.adapter_mut().collapse_all());
    });

    let bundle = Rc::new(RefCell::new(StateBundle::new()));

    let saved = bundle.clone();
    siv.add_global_callback('s', move |s| {
        let saved = saved.clone();
        s.call_on_id("list", move |list: &mut List| {
            list.save_state(&mut saved.borrow_mut());
        });
    });

    let saved = bundle.clone();
    siv.add_global_callback('l', move |s| {
        let saved = saved.clone();
        s.call_on_id("list", move |list: &mut List| {
            list.restore_state(&saved.borrow());
        });
    });

    // UI ---------------------------------------------------------------------
    let mut v_split = LinearLayout::new(Orientation::Vertical);
    v_split.add_child(
        TextView::new(
            r#"
-- Controls --

Enter - Toggle parent or submit child.
Right / Left - Expand / collapse.

p - Insert parent after selection.
c - Append child to parent.
r - Remove row.
u / d - Move parent up / down.
x / z - Expand / collapse all.
s / l - Save / load expansion state.
"#,
        )
        .min_height(12),
    );

    v_split.add_child(BoxView::with_full_height(DummyView));
    v_split.add_child(TextView::new("Last action: None").with_id("status"));

    let mut h_split = LinearLayout::new(Orientation::Horizontal);
    h_split.add_child(v_split);
    h_split.add_child(BoxView::with_fixed_size((4, 0), DummyView));
    h_split.add_child(Panel::new(list.with_id("list")));

    siv.add_layer(
        Dialog::around(h_split)
            .title("Expandable List")
            .max_height(20),
    );

    fn label(list: &List, row: usize) -> String {
        match list.adapter().row(row) {
            Ok(Row::Parent { parent, .. }) => parent.value().clone(),
            Ok(Row::Child { child, .. }) => child.clone(),
            Err(_) => String::new(),
        }
    }

    fn move_selected(siv: &mut Cursive, down: bool) {
        siv.call_on_id("list", move |list: &mut List| {
            let ordinal = match selected_parent(list) {
                Some(ordinal) => ordinal,
                None => return,
            };

            let target = if down {
                ordinal + 1
            } else if ordinal > 0 {
                ordinal - 1
            } else {
                return;
            };

            if target < list.adapter().parent_count() {
                if let Err(err) = list.adapter_mut().move_parent(ordinal, target) {
                    eprintln!("{}", err);
                }
            }
        });
    }

    fn set_status(siv: &mut Cursive, row: usize, text: &str) {
        let value = siv
            .call_on_id("list", move |list: &mut List| label(list, row))
            .unwrap_or_default();

        siv.call_on_id("status", move |view: &mut TextView| {
            view.set_content(format!("Last action: {} row #{} \"{}\"", text, row, value));
        });
    }

    siv.run();
}
