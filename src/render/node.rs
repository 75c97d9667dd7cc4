#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tag {
    A,
    B,
    Div,
    Img,
    P,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::Div => "div",
            Self::Img => "img",
            Self::P => "p",
        }
    }

    /// Void elements can't have children and don't get a closing tag.
    pub fn is_void(self) -> bool {
        matches!(self, Self::Img)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Concatenated text of this node and everything below it.
    pub fn text_content(&self) -> String {
        match self {
            Self::Element(element) => element.text_content(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// An element description.
///
/// Built by value with the `with_*` methods; once it's been handed to a
/// container nothing changes it again.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    tag: Tag,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            styles: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl ToString) -> Self {
        self.styles.push((property.into(), value.to_string()));
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::text(text))
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.classes.iter().map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attrs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs()
            .find(|(attr, _)| *attr == name)
            .map(|(_, value)| value)
    }

    pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.styles
            .iter()
            .map(|(property, value)| (property.as_str(), value.as_str()))
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles()
            .find(|(prop, _)| *prop == property)
            .map(|(_, value)| value)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    pub(crate) fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }
}
