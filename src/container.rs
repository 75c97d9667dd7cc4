use crate::render::{class, Element, Node, Tag};

pub static DEFAULT_ID: &str = "client-container";

/// Where rendered nodes end up. Appending is the only way in.
pub trait Container {
    fn append(&mut self, node: Node);
}

impl Container for Element {
    fn append(&mut self, node: Node) {
        self.push_child(node);
    }
}

impl Container for Vec<Node> {
    fn append(&mut self, node: Node) {
        self.push(node);
    }
}

/// An empty `div` with the given id, ready to be handed to
/// [`load_manifest`](crate::loader::load_manifest).
pub fn with_id(id: impl Into<String>) -> Element {
    Element::new(Tag::Div).with_id(id)
}

pub fn cards(container: &Element) -> impl Iterator<Item = &Element> + '_ {
    container
        .child_elements()
        .filter(|child| child.has_class(class::CLIENT))
}

pub fn error_notices(container: &Element) -> impl Iterator<Item = &Element> + '_ {
    container
        .child_elements()
        .filter(|child| child.tag() == Tag::B)
}
