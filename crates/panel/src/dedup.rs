use std::collections::HashSet;
use ua_model::Node;

/// Drop nodes whose id was already seen, keeping the first occurrence and
/// the original order.
pub fn dedup_preserve_order(nodes: Vec<Node>) -> Vec<Node> {
    let mut seen = HashSet::with_capacity(nodes.len());
    nodes
        .into_iter()
        .filter(|node| seen.insert(node.node_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use ua_model::{NodeClass, QualifiedName};

    fn node(id: &str, display: &str) -> Node {
        Node::new(id, QualifiedName::new(id, ""), display, NodeClass::Object)
    }

    fn ids(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.node_id.as_str()).collect()
    }

    #[test]
    fn keeps_first_seen_order() {
        let input = vec![
            node("A", "a1"),
            node("B", "b1"),
            node("A", "a2"),
            node("C", "c1"),
            node("B", "b2"),
        ];
        let output = dedup_preserve_order(input);
        assert_eq!(ids(&output), vec!["A", "B", "C"]);
        assert_eq!(output[0].display_name, "a1");
        assert_eq!(output[1].display_name, "b1");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(dedup_preserve_order(Vec::new()).is_empty());
    }

    proptest! {
        #[test]
        fn proptest_dedup_is_idempotent(raw in proptest::collection::vec("[a-e]", 0..24)) {
            let nodes: Vec<Node> = raw.iter().map(|id| node(id, id)).collect();
            let once = dedup_preserve_order(nodes);
            let twice = dedup_preserve_order(once.clone());
            prop_assert_eq!(&once, &twice);
        }

        #[test]
        fn proptest_dedup_preserves_first_occurrence_order(raw in proptest::collection::vec("[a-e]", 0..24)) {
            let nodes: Vec<Node> = raw.iter().map(|id| node(id, id)).collect();
            let output = dedup_preserve_order(nodes);

            let mut expected: Vec<&str> = Vec::new();
            for id in &raw {
                if !expected.contains(&id.as_str()) {
                    expected.push(id);
                }
            }
            prop_assert_eq!(ids(&output), expected);
        }
    }
}
