use crate::markup::MarkupNode;

/// Lazily split `nodes` into contiguous groups, starting a new group at each
/// node tagged `boundary`. The first group starts with whatever node opens
/// the input; the last group is always yielded, so an empty input yields a
/// single empty group.
pub fn segment<'a>(nodes: &'a [MarkupNode], boundary: &'a str) -> Segments<'a> {
    Segments {
        nodes,
        boundary,
        pos: 0,
        done: false,
    }
}

#[derive(Debug, Clone)]
pub struct Segments<'a> {
    nodes: &'a [MarkupNode],
    boundary: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a [MarkupNode];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let nodes = self.nodes;
        let boundary = self.boundary;
        let start = self.pos;
        let end = nodes[start..]
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, n)| n.is_tag(boundary))
            .map_or(nodes.len(), |(i, _)| start + i);
        self.pos = end;
        self.done = end == nodes.len();
        Some(&nodes[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(tags: &[&str]) -> Vec<MarkupNode> {
        tags.iter()
            .enumerate()
            .map(|(i, t)| MarkupNode::element(t, vec![MarkupNode::Text(i.to_string())]))
            .collect()
    }

    fn shape(groups: Segments<'_>) -> Vec<Vec<String>> {
        groups
            .map(|g| g.iter().filter_map(|n| n.tag().map(String::from)).collect())
            .collect()
    }

    #[test]
    fn splits_at_boundaries() {
        let input = nodes(&["h3", "p", "p", "h3", "table", "h3"]);
        assert_eq!(
            shape(segment(&input, "h3")),
            vec![vec!["h3", "p", "p"], vec!["h3", "table"], vec!["h3"]]
        );
    }

    #[test]
    fn leading_non_boundary_opens_first_group() {
        let input = nodes(&["p", "h3", "p"]);
        assert_eq!(
            shape(segment(&input, "h3")),
            vec![vec!["p"], vec!["h3", "p"]]
        );
    }

    #[test]
    fn no_boundary_is_single_group() {
        let input = nodes(&["p", "table", "h4"]);
        let groups: Vec<_> = segment(&input, "h3").collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0], &input[..]);
    }

    #[test]
    fn empty_input_yields_one_empty_group() {
        let groups: Vec<_> = segment(&[], "h2").collect();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_empty());
    }

    #[test]
    fn concatenation_reproduces_input() {
        let layouts: &[&[&str]] = &[
            &["h2", "h3", "p", "h3", "p", "h2", "h3", "p"],
            &["p", "p", "h2"],
            &["h2", "h2", "h2"],
            &["table"],
        ];
        for layout in layouts {
            let input = nodes(layout);
            let rebuilt: Vec<MarkupNode> = segment(&input, "h2").flatten().cloned().collect();
            assert_eq!(rebuilt, input, "layout {:?}", layout);
        }
    }

    #[test]
    fn every_later_group_starts_at_boundary() {
        let input = nodes(&["p", "h3", "p", "h3", "h3", "p"]);
        for group in segment(&input, "h3").skip(1) {
            assert!(group[0].is_tag("h3"));
        }
    }

    #[test]
    fn restartable() {
        let input = nodes(&["h3", "p", "h3"]);
        let first: Vec<_> = segment(&input, "h3").collect();
        let second: Vec<_> = segment(&input, "h3").collect();
        assert_eq!(first, second);
    }
}
