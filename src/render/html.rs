use super::{Element, Node};
use handlebars::html_escape;

fn write_element(out: &mut String, element: &Element) {
    let tag = element.tag().as_str();
    out.push('<');
    out.push_str(tag);
    if let Some(id) = element.id() {
        out.push_str(&format!(r#" id="{}""#, html_escape(id)));
    }
    let classes = element.classes().collect::<Vec<_>>();
    if !classes.is_empty() {
        out.push_str(&format!(r#" class="{}""#, html_escape(&classes.join(" "))));
    }
    let style = element
        .styles()
        .map(|(property, value)| format!("{}: {}", property, value))
        .collect::<Vec<_>>();
    if !style.is_empty() {
        out.push_str(&format!(r#" style="{}""#, html_escape(&style.join("; "))));
    }
    for (name, value) in element.attrs() {
        out.push_str(&format!(r#" {}="{}""#, name, html_escape(value)));
    }
    out.push('>');
    if element.tag().is_void() {
        return;
    }
    for child in element.children() {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(element) => write_element(out, element),
        Node::Text(text) => out.push_str(&html_escape(text)),
    }
}

pub fn to_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

pub fn element_to_html(element: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, element);
    out
}
