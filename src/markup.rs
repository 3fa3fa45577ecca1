use scraper::{ElementRef, Html};

const IMPLIED_TBODY: &str = "tbody";

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Owned HTML tree. Only elements and text survive parsing; comments,
/// doctypes and processing instructions are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    /// Parse a whole document. The returned node is the `<html>` element.
    pub fn parse_document(html: &str) -> MarkupNode {
        let doc = Html::parse_document(html);
        let mut root = from_element(doc.root_element());
        drop_implied_tbody(html, &mut root);
        root
    }

    /// Parse a body fragment and return its top-level elements.
    #[cfg(test)]
    pub fn parse_fragment(html: &str) -> Vec<MarkupNode> {
        let doc = Html::parse_fragment(html);
        let mut root = from_element(doc.root_element());
        drop_implied_tbody(html, &mut root);
        match root {
            MarkupNode::Element(root) => root
                .children
                .into_iter()
                .filter(MarkupNode::is_element)
                .collect(),
            MarkupNode::Text(_) => Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn element(tag: &str, children: Vec<MarkupNode>) -> MarkupNode {
        MarkupNode::Element(Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children,
        })
    }

    /// Tag name, `None` for text leaves.
    pub fn tag(&self) -> Option<&str> {
        match self {
            MarkupNode::Element(el) => Some(&el.tag),
            MarkupNode::Text(_) => None,
        }
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag() == Some(tag)
    }

    pub fn is_element(&self) -> bool {
        matches!(self, MarkupNode::Element(_))
    }

    /// All descendant text concatenated in document order.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            MarkupNode::Text(t) => out.push_str(t),
            MarkupNode::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Find the first descendant element named `tag` (pre-order) and return
    /// its parent together with its index in the parent's children.
    pub fn locate(&self, tag: &str) -> Option<(&Element, usize)> {
        let MarkupNode::Element(el) = self else {
            return None;
        };
        for (i, child) in el.children.iter().enumerate() {
            if child.is_tag(tag) {
                return Some((el, i));
            }
            if let Some(found) = child.locate(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Serialise back to markup. Non-ASCII text is written verbatim.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            MarkupNode::Text(t) => escape_into(t, false, out),
            MarkupNode::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (key, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                if el.children.is_empty() && VOID_TAGS.contains(&el.tag.as_str()) {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in &el.children {
                    child.render_into(out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

impl Element {
    /// Element children only; whitespace text between tags is skipped.
    pub fn element_children(&self) -> impl Iterator<Item = &MarkupNode> {
        self.children.iter().filter(|c| c.is_element())
    }
}

fn from_element(el: ElementRef<'_>) -> MarkupNode {
    let value = el.value();
    let mut children = Vec::new();
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            children.push(from_element(child_el));
        } else if let Some(text) = child.value().as_text() {
            let text: &str = text;
            children.push(MarkupNode::Text(text.to_string()));
        }
    }
    MarkupNode::Element(Element {
        tag: value.name().to_string(),
        attrs: value
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        children,
    })
}

/// html5ever wraps bare table rows in a `<tbody>` the source never wrote.
/// When the source has no `<tbody>` at all, every one of them is implied and
/// is replaced by its children.
fn drop_implied_tbody(source: &str, root: &mut MarkupNode) {
    if source.to_ascii_lowercase().contains("<tbody") {
        return;
    }
    unwrap_tag(root, IMPLIED_TBODY);
}

fn unwrap_tag(node: &mut MarkupNode, tag: &str) {
    let MarkupNode::Element(el) = node else {
        return;
    };
    if el.children.iter().any(|c| c.is_tag(tag)) {
        let children = std::mem::take(&mut el.children);
        for child in children {
            match child {
                MarkupNode::Element(inner) if inner.tag == tag => {
                    el.children.extend(inner.children)
                }
                other => el.children.push(other),
            }
        }
    }
    for child in el.children.iter_mut() {
        unwrap_tag(child, tag);
    }
}

fn escape_into(s: &str, attr: bool, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_top_level_elements() {
        let nodes = MarkupNode::parse_fragment("<h3>Llum</h3>\n<p>Durada:&nbsp;1 torn.</p>");
        let tags: Vec<_> = nodes.iter().filter_map(|n| n.tag()).collect();
        assert_eq!(tags, vec!["h3", "p"]);
    }

    #[test]
    fn nbsp_decodes_to_char() {
        let nodes = MarkupNode::parse_fragment("<p>Durada:&nbsp;1 torn</p>");
        assert_eq!(nodes[0].plain_text(), "Durada:\u{a0}1 torn");
    }

    #[test]
    fn plain_text_is_concatenated() {
        let nodes = MarkupNode::parse_fragment("<p>Un <b>objecte</b> <i>brilla</i>.</p>");
        assert_eq!(nodes[0].plain_text(), "Un objecte brilla.");
    }

    #[test]
    fn comments_are_dropped() {
        let nodes = MarkupNode::parse_fragment("<p>a<!-- hidden -->b</p>");
        assert_eq!(nodes[0].plain_text(), "ab");
    }

    #[test]
    fn render_keeps_attributes_and_non_ascii() {
        let nodes = MarkupNode::parse_fragment("<p class=\"c1\">Paràlisi &amp; mort</p>");
        assert_eq!(nodes[0].render(), "<p class=\"c1\">Paràlisi &amp; mort</p>");
    }

    #[test]
    fn render_void_element() {
        let nodes = MarkupNode::parse_fragment("<p>a<br>b</p>");
        assert_eq!(nodes[0].render(), "<p>a<br/>b</p>");
    }

    #[test]
    fn implied_tbody_is_dropped() {
        let nodes = MarkupNode::parse_fragment("<table><tr><td>a</td></tr></table>");
        assert_eq!(nodes[0].render(), "<table><tr><td>a</td></tr></table>");
    }

    #[test]
    fn explicit_tbody_is_kept() {
        let nodes = MarkupNode::parse_fragment("<table><TBODY><tr><td>a</td></tr></TBODY></table>");
        assert_eq!(nodes[0].render(), "<table><tbody><tr><td>a</td></tr></tbody></table>");
    }

    #[test]
    fn implied_tbody_dropped_in_documents() {
        let doc = MarkupNode::parse_document("<body><table><tr><td>a</td></tr></table></body>");
        let (body, idx) = doc.locate("table").unwrap();
        assert_eq!(body.children[idx].render(), "<table><tr><td>a</td></tr></table>");
    }

    #[test]
    fn locate_first_in_document_order() {
        let doc = MarkupNode::parse_document(
            "<html><body><div><h2>Nivell 1</h2></div><h2>Nivell 2</h2></body></html>",
        );
        let (parent, idx) = doc.locate("h2").unwrap();
        assert_eq!(parent.tag, "div");
        assert_eq!(idx, 0);
        assert_eq!(parent.children[idx].plain_text(), "Nivell 1");
    }

    #[test]
    fn locate_missing_tag() {
        let doc = MarkupNode::parse_document("<p>res</p>");
        assert!(doc.locate("table").is_none());
    }

    #[test]
    fn element_children_skip_whitespace() {
        let doc = MarkupNode::parse_document("<body>\n<h2>a</h2>\n  <p>b</p>\n</body>");
        let (body, _) = doc.locate("h2").unwrap();
        assert_eq!(body.element_children().count(), 2);
    }
}
