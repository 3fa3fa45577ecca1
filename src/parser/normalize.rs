use crate::error::ParseError;
use crate::markup::MarkupNode;

use super::{CELL, HEADER_CELL, ROW, TABLE};

/// Remove every attribute from every element in the subtree.
pub fn strip_attributes(node: &mut MarkupNode) -> &mut MarkupNode {
    if let MarkupNode::Element(el) = node {
        el.attrs.clear();
        for child in el.children.iter_mut() {
            strip_attributes(child);
        }
    }
    node
}

/// Turn the cells of a table's first row into header cells.
/// Anything that is not a table is left as is; a table without rows fails.
pub fn promote_first_row_to_header(node: &mut MarkupNode) -> Result<&mut MarkupNode, ParseError> {
    if !node.is_tag(TABLE) {
        return Ok(node);
    }
    let Some(MarkupNode::Element(row)) = find_mut(node, ROW) else {
        return Err(ParseError::MissingRow);
    };
    for cell in row.children.iter_mut() {
        if let MarkupNode::Element(cell) = cell {
            if cell.tag == CELL {
                cell.tag = HEADER_CELL.to_string();
            }
        }
    }
    Ok(node)
}

fn find_mut<'a>(node: &'a mut MarkupNode, tag: &str) -> Option<&'a mut MarkupNode> {
    let MarkupNode::Element(el) = node else {
        return None;
    };
    for child in el.children.iter_mut() {
        if child.is_tag(tag) {
            return Some(child);
        }
        if let Some(found) = find_mut(child, tag) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(html: &str) -> MarkupNode {
        MarkupNode::parse_fragment(html).remove(0)
    }

    fn count_tag(node: &MarkupNode, tag: &str) -> usize {
        match node {
            MarkupNode::Text(_) => 0,
            MarkupNode::Element(el) => {
                usize::from(el.tag == tag)
                    + el.children.iter().map(|c| count_tag(c, tag)).sum::<usize>()
            }
        }
    }

    #[test]
    fn strips_nested_attributes() {
        let mut node = table(
            "<table class=\"t\" style=\"x\"><tr id=\"r\"><td class=\"c\"><span style=\"s\">1</span></td></tr></table>",
        );
        strip_attributes(&mut node);
        assert_eq!(
            node.render(),
            "<table><tr><td><span>1</span></td></tr></table>"
        );
    }

    #[test]
    fn strip_is_idempotent() {
        let mut once = table("<table class=\"t\"><tr><td a=\"b\">1</td></tr></table>");
        strip_attributes(&mut once);
        let mut twice = once.clone();
        strip_attributes(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn promote_non_table_is_identity() {
        let original = table("<p><td>not a table</td></p>");
        let mut node = original.clone();
        promote_first_row_to_header(&mut node).unwrap();
        assert_eq!(node, original);
    }

    #[test]
    fn promote_first_row_only() {
        let mut node = table(
            "<table><tr><td>Nivell</td><td>Efecte</td><td>Dau</td></tr><tr><td>1</td><td>2</td><td>3</td></tr></table>",
        );
        promote_first_row_to_header(&mut node).unwrap();
        assert_eq!(count_tag(&node, "th"), 3);
        assert_eq!(count_tag(&node, "td"), 3);
        assert!(node
            .render()
            .contains("<tr><th>Nivell</th><th>Efecte</th><th>Dau</th></tr>"));
    }

    #[test]
    fn table_without_rows_fails() {
        let mut node = table("<table><caption>x</caption></table>");
        assert!(matches!(
            promote_first_row_to_header(&mut node),
            Err(ParseError::MissingRow)
        ));
    }

    #[test]
    fn chained_normalisation() {
        let mut node = table("<table border=\"1\"><tr><td class=\"h\">A</td></tr></table>");
        let rendered = promote_first_row_to_header(strip_attributes(&mut node))
            .unwrap()
            .render();
        assert_eq!(rendered, "<table><tr><th>A</th></tr></table>");
    }
}
