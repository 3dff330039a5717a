use weft_dom::{Handoff, Patch, Props, comment, diff, diff_children, h, text};

#[test]
fn props_set_and_remove() {
    let a = h("div", vec![("class", "a"), ("id", "x")], vec![]);
    let b = h("div", vec![("class", "b")], vec![]);

    let patches = diff(&a, &b);

    assert!(patches.contains(&Patch::SetAttr("class".into(), "b".into())));
    assert!(patches.contains(&Patch::RemoveAttr("id".into())));
}

#[test]
fn insert_child() {
    let a = h("ul", Props::new(), vec![]);
    let b = h("ul", Props::new(), vec![text("item")]);

    let patches = diff(&a, &b);

    assert_eq!(patches, vec![Patch::InsertChild(0, text("item"))]);
}

#[test]
fn remove_child() {
    let a = h("ul", Props::new(), vec![text("a"), text("b")]);
    let b = h("ul", Props::new(), vec![text("a")]);

    let patches = diff(&a, &b);

    // expect removal of index 1
    assert!(patches.contains(&Patch::RemoveChild(1)));
}

#[test]
fn replace_on_tag_change() {
    let a = h("div", Props::new(), vec![]);
    let b = h("span", Props::new(), vec![]);

    let patches = diff(&a, &b);
    assert_eq!(patches, vec![Patch::Replace(b.clone())]);
}

#[test]
fn replace_on_namespace_change() {
    let a = h("a", Props::new(), vec![]);
    let b = h("a", Props::new().with_namespace("svg"), vec![]);
    assert_eq!(diff(&a, &b), vec![Patch::Replace(b.clone())]);
}

#[test]
fn comment_and_handoff_changes_replace() {
    assert_eq!(
        diff(&comment("a"), &comment("b")),
        vec![Patch::Replace(comment("b"))]
    );
    let slot = |id: &str| {
        weft_dom::VNode::Handoff(Handoff {
            id: id.into(),
            name: "child".into(),
            host: "app".into(),
            scope: serde_json::Value::Null,
        })
    };
    assert!(diff(&slot("0"), &slot("0")).is_empty());
    assert_eq!(diff(&slot("0"), &slot("1")), vec![Patch::Replace(slot("1"))]);
}

#[test]
fn sibling_lists_diff_without_a_wrapper() {
    let a = vec![text("a"), text("b"), text("c")];
    let b = vec![text("a")];
    assert_eq!(
        diff_children(&a, &b),
        vec![Patch::RemoveChild(2), Patch::RemoveChild(1)]
    );
}

#[test]
fn leaf_kind_change_replaces_even_with_equal_content() {
    assert!(diff(&text("a"), &text("a")).is_empty());
    assert_eq!(diff(&text("a"), &comment("a")), vec![Patch::Replace(comment("a"))]);
    let el = h("p", Props::new(), vec![]);
    assert_eq!(diff(&el, &text("p")), vec![Patch::Replace(text("p"))]);
}
