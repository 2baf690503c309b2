//! Diagram tree: the outline as a rooted tree with synthetic node keys.
//!
//! The root is keyed `root`, topic `i` is `T{i}` and subtopic `j` of topic
//! `i` is `T{i}_{j}` (both zero-based). Keys never depend on labels, so two
//! nodes with the same text stay distinct.

use crate::outline::Outline;
use dot_generator::{attr, id};
use dot_structures::{Attribute, Edge, EdgeTy, Graph, Id, Node, NodeId, Stmt, Vertex};
use graphviz_rust::printer::{DotPrinter, PrinterContext};

/// Key of the synthetic root node.
pub const ROOT_KEY: &str = "root";

/// Name of the emitted digraph.
pub const GRAPH_ID: &str = "mindmap";

/// One node of the mind map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    pub key: String,
    pub label: String,
    pub children: Vec<DiagramNode>,
}

/// Root node labelled with the map title, one child per topic and one
/// grandchild per subtopic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramTree {
    pub root: DiagramNode,
}

impl DiagramTree {
    pub fn from_outline(title: &str, outline: &Outline) -> Self {
        let children = outline
            .iter()
            .enumerate()
            .map(|(i, (topic, subs))| {
                let topic_key = format!("T{i}");
                let children = subs
                    .iter()
                    .enumerate()
                    .map(|(j, sub)| DiagramNode {
                        key: format!("{topic_key}_{j}"),
                        label: sub.clone(),
                        children: Vec::new(),
                    })
                    .collect();
                DiagramNode {
                    key: topic_key,
                    label: topic.to_string(),
                    children,
                }
            })
            .collect();

        Self {
            root: DiagramNode {
                key: ROOT_KEY.to_string(),
                label: title.to_string(),
                children,
            },
        }
    }

    /// Total nodes including the root.
    pub fn node_count(&self) -> usize {
        fn count(node: &DiagramNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }

    /// The tree as a Graphviz directed graph.
    ///
    /// Nodes come in depth-first order, each followed by the edge from its
    /// parent:
    ///
    /// ```text
    /// digraph mindmap {
    ///   root[label="Meu Estudo"]
    ///   T0[label="Redes"]
    ///   root -> T0
    ///   T0_0[label="TCP"]
    ///   T0 -> T0_0
    /// }
    /// ```
    pub fn to_graph(&self) -> Graph {
        let mut stmts = Vec::with_capacity(self.node_count() * 2);
        push_node(&mut stmts, &self.root, None);
        Graph::DiGraph {
            id: id!(GRAPH_ID),
            strict: false,
            stmts,
        }
    }

    /// DOT source for the tree.
    pub fn to_dot(&self) -> String {
        self.to_graph().print(&mut PrinterContext::default())
    }
}

fn push_node(stmts: &mut Vec<Stmt>, node: &DiagramNode, parent: Option<&str>) {
    stmts.push(Stmt::Node(Node {
        id: node_key(&node.key),
        attributes: vec![attr!("label", esc escape_label(&node.label))],
    }));
    if let Some(parent) = parent {
        stmts.push(Stmt::Edge(Edge {
            ty: EdgeTy::Pair(Vertex::N(node_key(parent)), Vertex::N(node_key(&node.key))),
            attributes: Vec::new(),
        }));
    }
    for child in &node.children {
        push_node(stmts, child, Some(&node.key));
    }
}

fn node_key(key: &str) -> NodeId {
    NodeId(id!(key), None)
}

/// Escape text for a DOT double-quoted string. The printer writes escaped
/// ids verbatim, so quoting and backslashes are handled here.
fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

/// DOT source for `outline` under `title`.
pub fn to_dot(title: &str, outline: &Outline) -> String {
    DiagramTree::from_outline(title, outline).to_dot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Outline {
        [("Redes", vec!["TCP", "UDP"]), ("Segurança", vec!["Criptografia"])]
            .into_iter()
            .collect()
    }

    #[test]
    fn keys_are_positional() {
        let tree = DiagramTree::from_outline("Meu Estudo", &sample());
        assert_eq!(tree.root.key, "root");
        let keys: Vec<&str> = tree.root.children[0]
            .children
            .iter()
            .map(|n| n.key.as_str())
            .collect();
        assert_eq!(keys, vec!["T0_0", "T0_1"]);
        assert_eq!(tree.root.children[1].key, "T1");
        assert_eq!(tree.node_count(), 6);
    }

    /// Printed DOT with whitespace and statement separators removed, so
    /// assertions do not depend on the printer's layout.
    fn compact(dot: &str) -> String {
        dot.chars().filter(|c| !c.is_whitespace() && *c != ';').collect()
    }

    #[test]
    fn identical_labels_stay_distinct() {
        let outline: Outline = [("A", vec!["x", "x"]), ("B", vec!["x"])].into_iter().collect();
        let tree = DiagramTree::from_outline("A", &outline);
        assert_eq!(tree.node_count(), 6);
        let dot = compact(&tree.to_dot());
        assert!(dot.contains(r#"T0_0[label="x"]"#), "{dot}");
        assert!(dot.contains(r#"T0_1[label="x"]"#), "{dot}");
        assert!(dot.contains(r#"T1_0[label="x"]"#), "{dot}");
    }

    #[test]
    fn graph_statements_follow_the_tree() {
        let graph = DiagramTree::from_outline("Meu Estudo", &sample()).to_graph();
        let Graph::DiGraph { id, strict, stmts } = graph else {
            panic!("expected a digraph");
        };
        assert_eq!(id, Id::Plain(GRAPH_ID.to_string()));
        assert!(!strict);
        // 6 nodes, 5 edges
        assert_eq!(stmts.len(), 11);
        assert_eq!(
            stmts[0],
            Stmt::Node(Node {
                id: NodeId(Id::Plain("root".to_string()), None),
                attributes: vec![Attribute(
                    Id::Plain("label".to_string()),
                    Id::Escaped("\"Meu Estudo\"".to_string())
                )],
            })
        );
        assert_eq!(
            stmts[2],
            Stmt::Edge(Edge {
                ty: EdgeTy::Pair(
                    Vertex::N(NodeId(Id::Plain("root".to_string()), None)),
                    Vertex::N(NodeId(Id::Plain("T0".to_string()), None)),
                ),
                attributes: Vec::new(),
            })
        );
    }

    #[test]
    fn dot_output() {
        let dot = compact(&to_dot("Meu Estudo", &sample()));
        assert!(dot.starts_with("digraphmindmap{"), "{dot}");
        assert!(dot.ends_with('}'), "{dot}");
        let expected = [
            r#"root[label="MeuEstudo"]"#,
            r#"T0[label="Redes"]"#,
            "root->T0",
            r#"T0_0[label="TCP"]"#,
            "T0->T0_0",
            r#"T0_1[label="UDP"]"#,
            "T0->T0_1",
            r#"T1[label="Segurança"]"#,
            "root->T1",
            r#"T1_0[label="Criptografia"]"#,
            "T1->T1_0",
        ];
        let mut from = 0;
        for stmt in expected {
            let at = dot[from..]
                .find(stmt)
                .unwrap_or_else(|| panic!("{stmt} missing after byte {from} in {dot}"));
            from += at + stmt.len();
        }
    }

    #[test]
    fn labels_are_escaped() {
        assert_eq!(escape_label(r#"a "b" \c"#), r#"a \"b\" \\c"#);
        assert_eq!(escape_label("x\r\ny"), "x\\ny");
        let outline: Outline = [(r#"Say "hi""#, Vec::<&str>::new())].into_iter().collect();
        let dot = to_dot("T", &outline);
        assert!(dot.contains(r#""Say \"hi\"""#), "{dot}");
    }
}
