use crate::VNode;
use crate::diff::Patch;

/// Apply patches produced by [`crate::diff`] to `node`, returning the result.
///
/// Patches that do not fit the node (an attribute patch on a text node, an
/// out-of-range child index) are skipped.
pub fn patch(node: &VNode, patches: &[Patch]) -> VNode {
    let mut out = node.clone();
    for p in patches {
        apply(&mut out, p);
    }
    out
}

/// List counterpart of [`patch`], pairing with [`crate::diff_children`].
pub fn patch_children(nodes: &[VNode], patches: &[Patch]) -> Vec<VNode> {
    let mut out = nodes.to_vec();
    for p in patches {
        apply_child(&mut out, p);
    }
    out
}

fn apply(node: &mut VNode, p: &Patch) {
    match p {
        Patch::Replace(new) => *node = new.clone(),
        Patch::SetAttr(k, v) => {
            if let VNode::Element { props, .. } = node {
                props.attrs.insert(k.clone(), v.clone());
            }
        }
        Patch::RemoveAttr(k) => {
            if let VNode::Element { props, .. } = node {
                props.attrs.remove(k);
            }
        }
        _ => {
            if let VNode::Element { children, .. } = node {
                apply_child(children, p);
            }
        }
    }
}

fn apply_child(children: &mut Vec<VNode>, p: &Patch) {
    match p {
        Patch::UpdateChild(i, inner) => {
            if let Some(child) = children.get_mut(*i) {
                for q in inner {
                    apply(child, q);
                }
            }
        }
        Patch::InsertChild(i, new) => {
            let at = (*i).min(children.len());
            children.insert(at, new.clone());
        }
        Patch::RemoveChild(i) => {
            if *i < children.len() {
                children.remove(*i);
            }
        }
        // list-level patches only touch children
        Patch::Replace(_) | Patch::SetAttr(..) | Patch::RemoveAttr(_) => {}
    }
}
