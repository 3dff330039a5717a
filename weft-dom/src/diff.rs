use crate::{Props, VNode};

/// One edit against a rendered tree. Child patches address positions in
/// the sibling list as it stands when the patch is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    Replace(VNode),
    SetAttr(String, String),
    RemoveAttr(String),
    UpdateChild(usize, Vec<Patch>),
    InsertChild(usize, VNode),
    RemoveChild(usize),
}

/// Patches turning `old` into `new`.
///
/// Elements with the same tag and namespace are updated in place. Any other
/// pairing, leaves included, is replaced wholesale when unequal.
pub fn diff(old: &VNode, new: &VNode) -> Vec<Patch> {
    match (old, new) {
        (
            VNode::Element {
                tag: old_tag,
                props: old_props,
                children: old_children,
            },
            VNode::Element {
                tag: new_tag,
                props: new_props,
                children: new_children,
            },
        ) if old_tag == new_tag && old_props.namespace == new_props.namespace => {
            let mut patches = diff_props(old_props, new_props);
            patches.extend(diff_children(old_children, new_children));
            patches
        }
        _ => replace_if_changed(old, new),
    }
}

fn replace_if_changed(old: &VNode, new: &VNode) -> Vec<Patch> {
    if old == new {
        Vec::new()
    } else {
        vec![Patch::Replace(new.clone())]
    }
}

fn diff_props(old: &Props, new: &Props) -> Vec<Patch> {
    let set = new
        .attrs
        .iter()
        .filter(|(k, v)| old.attrs.get(*k) != Some(*v))
        .map(|(k, v)| Patch::SetAttr(k.clone(), v.clone()));
    let removed = old
        .attrs
        .keys()
        .filter(|k| !new.attrs.contains_key(*k))
        .map(|k| Patch::RemoveAttr(k.clone()));
    set.chain(removed).collect()
}

/// Index-based diff of two sibling lists. Removals come last, in descending
/// index order, so the list can be patched front to back.
pub fn diff_children(old: &[VNode], new: &[VNode]) -> Vec<Patch> {
    let mut patches: Vec<Patch> = old
        .iter()
        .zip(new)
        .enumerate()
        .filter_map(|(i, (a, b))| {
            let child = diff(a, b);
            (!child.is_empty()).then(|| Patch::UpdateChild(i, child))
        })
        .collect();

    patches.extend(
        new.iter()
            .enumerate()
            .skip(old.len())
            .map(|(i, node)| Patch::InsertChild(i, node.clone())),
    );
    patches.extend((new.len()..old.len()).rev().map(Patch::RemoveChild));
    patches
}
