use weft_dom::{Props, diff, diff_children, h, patch, patch_children, text};

#[test]
fn patch_reproduces_new_tree() {
    let old = h(
        "ul",
        vec![("class", "list"), ("id", "x")],
        vec![
            h("li", (), vec![text("a")]),
            h("li", (), vec![text("b")]),
            h("li", (), vec![text("c")]),
        ],
    );
    let new = h(
        "ul",
        vec![("class", "list wide")],
        vec![h("li", (), vec![text("a")]), h("li", (), vec![text("B")])],
    );

    let patches = diff(&old, &new);
    assert_eq!(patch(&old, &patches), new);
}

#[test]
fn patch_children_grows_list() {
    let old = vec![text("a")];
    let new = vec![text("a"), h("b", Props::new(), vec![]), text("c")];
    let patches = diff_children(&old, &new);
    assert_eq!(patch_children(&old, &patches), new);
}

#[test]
fn replace_swaps_whole_node() {
    let old = h("div", (), vec![]);
    let new = text("gone");
    assert_eq!(patch(&old, &diff(&old, &new)), new);
}

#[test]
fn out_of_range_patches_are_skipped() {
    let old = text("t");
    let patches = vec![
        weft_dom::Patch::SetAttr("k".into(), "v".into()),
        weft_dom::Patch::RemoveChild(4),
    ];
    assert_eq!(patch(&old, &patches), old);
}
