//! Small DOM toolkit over `markup5ever_rcdom`.
//!
//! Tree walks always return a snapshot (`Vec<Handle>`) so callers can
//! replace nodes while iterating the result.

use html5ever::driver::ParseOpts;
use html5ever::tendril::TendrilSink;
use html5ever::{
    ns, parse_document, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute,
    LocalName, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::io;
use std::rc::{Rc, Weak};

pub fn parse(html: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(html)
}

/// All nodes below `root` in document order, `root` excluded.
pub fn descendants(root: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack: Vec<Handle> = root.children.borrow().iter().rev().cloned().collect();
    while let Some(node) = stack.pop() {
        stack.extend(node.children.borrow().iter().rev().cloned());
        out.push(node);
    }
    out
}

/// Descendant elements of `root` with the given tag name.
pub fn elements_by_tag(root: &Handle, tag: &str) -> Vec<Handle> {
    descendants(root)
        .into_iter()
        .filter(|node| tag_name(node) == Some(tag))
        .collect()
}

pub fn find_by_id(root: &Handle, id: &str) -> Option<Handle> {
    descendants(root)
        .into_iter()
        .find(|node| attr(node, "id").as_deref() == Some(id))
}

pub fn tag_name(node: &Node) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

pub fn is_element(node: &Node) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

pub fn attr(node: &Node, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

pub fn set_attr(node: &Node, name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(existing) = attrs.iter_mut().find(|a| &*a.name.local == name) {
            existing.value = value.into();
        } else {
            attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(name)),
                value: value.into(),
            });
        }
    }
}

/// Whitespace-normalized class membership, not string equality.
pub fn has_class(node: &Node, class: &str) -> bool {
    attr(node, "class")
        .map(|value| value.split_whitespace().any(|token| token == class))
        .unwrap_or(false)
}

/// Concatenated text of `node` and everything below it.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in descendants(node) {
        if let NodeData::Text { contents } = &child.data {
            out.push_str(&contents.borrow());
        }
    }
    out
}

pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(Weak::upgrade);
    node.parent.set(weak);
    parent
}

/// Put `new` where `old` sits in its parent. Returns false for detached nodes.
pub fn replace(old: &Handle, new: &Handle) -> bool {
    let Some(parent) = parent(old) else {
        return false;
    };
    let mut children = parent.children.borrow_mut();
    let Some(index) = children.iter().position(|child| Rc::ptr_eq(child, old)) else {
        return false;
    };
    old.parent.set(None);
    new.parent.set(Some(Rc::downgrade(&parent)));
    children[index] = new.clone();
    true
}

pub fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Move (not copy) every child of `from` to the end of `to`.
pub fn move_children(from: &Handle, to: &Handle) {
    let children = std::mem::take(&mut *from.children.borrow_mut());
    for child in children {
        append_child(to, child);
    }
}

pub fn next_element_sibling(node: &Handle) -> Option<Handle> {
    let parent = parent(node)?;
    let children = parent.children.borrow();
    let index = children.iter().position(|child| Rc::ptr_eq(child, node))?;
    let sibling = children[index + 1..]
        .iter()
        .find(|child| is_element(child))
        .cloned();
    sibling
}

/// Create an HTML element with attributes
pub fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

pub fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.into()),
        },
    })
}

/// Copy every attribute of `from` onto `to`, overwriting same-named ones.
pub fn copy_attrs(from: &Node, to: &Node) {
    if let NodeData::Element { attrs, .. } = &from.data {
        for attribute in attrs.borrow().iter() {
            set_attr(to, &attribute.name.local, &attribute.value);
        }
    }
}

/// Parse `markup` in a scratch document and detach the resulting nodes so
/// they can be adopted by another tree.
pub fn parse_fragment_nodes(markup: &str) -> Vec<Handle> {
    let scratch = parse(&format!("<div>{markup}</div>"));
    let Some(div) = elements_by_tag(&scratch.document, "div").into_iter().next() else {
        return Vec::new();
    };
    let nodes = std::mem::take(&mut *div.children.borrow_mut());
    for node in &nodes {
        node.parent.set(None);
    }
    nodes
}

/// Serialize `node` including its own tag.
pub fn outer_html(node: &Handle) -> io::Result<String> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    serialize(&mut output, &SerializableHandle::from(node.clone()), opts)?;
    String::from_utf8(output).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// HTML-escape text before it is re-parsed as markup.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
