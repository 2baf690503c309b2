//! The two-level topic outline produced from a model reply.
//!
//! An [`Outline`] maps topic names to their subtopics, both in the order the
//! model wrote them. It is backed by an [`IndexMap`], so inserting a topic
//! name that already exists replaces its subtopic list while the topic keeps
//! the position where it first appeared.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Ordered mapping from topic name to ordered subtopic names.
///
/// Equality is order-sensitive: two outlines with the same topics in a
/// different order are not equal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outline {
    topics: IndexMap<String, Vec<String>>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no topic was recognised.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Number of topics.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Total number of subtopics across every topic.
    pub fn subtopic_count(&self) -> usize {
        self.topics.values().map(Vec::len).sum()
    }

    /// Subtopics of `topic`, if the topic exists.
    pub fn get(&self, topic: &str) -> Option<&[String]> {
        self.topics.get(topic).map(Vec::as_slice)
    }

    /// Iterate `(topic, subtopics)` in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.topics
            .iter()
            .map(|(topic, subs)| (topic.as_str(), subs.as_slice()))
    }

    /// Start a topic with an empty subtopic list.
    ///
    /// A name that is already present has its list replaced; the previous
    /// list is returned.
    pub fn open_topic(&mut self, name: impl Into<String>) -> Option<Vec<String>> {
        self.topics.insert(name.into(), Vec::new())
    }

    /// Append a subtopic to an existing topic. Returns `false` when the topic
    /// does not exist.
    pub fn push_subtopic(&mut self, topic: &str, name: impl Into<String>) -> bool {
        match self.topics.get_mut(topic) {
            Some(subs) => {
                subs.push(name.into());
                true
            }
            None => false,
        }
    }

    /// Render the outline in the bullet template the model is asked to use.
    ///
    /// ```text
    /// * Tópico 1: Redes
    ///     + Subtópico 1: TCP
    ///     + Subtópico 2: UDP
    ///
    /// * Tópico 2: Segurança
    ///     + Subtópico 1: Criptografia
    /// ```
    ///
    /// Feeding the result back through [`crate::parser::parse_outline`]
    /// yields an equal outline as long as every name is trimmed, non-empty
    /// and single-line.
    pub fn to_template(&self) -> String {
        let mut out = String::new();
        for (i, (topic, subs)) in self.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "* Tópico {}: {}", i + 1, topic);
            for (j, sub) in subs.iter().enumerate() {
                let _ = writeln!(out, "    + Subtópico {}: {}", j + 1, sub);
            }
        }
        out
    }
}

impl PartialEq for Outline {
    fn eq(&self, other: &Self) -> bool {
        self.topics.len() == other.topics.len() && self.topics.iter().eq(other.topics.iter())
    }
}

impl Eq for Outline {}

impl<T, S> FromIterator<(T, Vec<S>)> for Outline
where
    T: Into<String>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (T, Vec<S>)>>(iter: I) -> Self {
        let topics = iter
            .into_iter()
            .map(|(topic, subs)| (topic.into(), subs.into_iter().map(Into::into).collect()))
            .collect();
        Self { topics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reopening_a_topic_keeps_position_and_clears_list() {
        let mut outline = Outline::new();
        outline.open_topic("A");
        outline.push_subtopic("A", "S1");
        outline.open_topic("B");

        let previous = outline.open_topic("A");
        assert_eq!(previous, Some(vec!["S1".to_string()]));

        let order: Vec<&str> = outline.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["A", "B"]);
        assert_eq!(outline.get("A"), Some(&[][..]));
    }

    #[test]
    fn push_to_unknown_topic_is_rejected() {
        let mut outline = Outline::new();
        assert!(!outline.push_subtopic("missing", "x"));
        assert!(outline.is_empty());
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a: Outline = [("x", vec!["1"]), ("y", vec![])].into_iter().collect();
        let b: Outline = [("y", vec![]), ("x", vec!["1"])].into_iter().collect();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn template_layout() {
        let outline: Outline = [("Redes", vec!["TCP", "UDP"]), ("Segurança", vec!["Criptografia"])]
            .into_iter()
            .collect();
        let expected = "* Tópico 1: Redes\n    + Subtópico 1: TCP\n    + Subtópico 2: UDP\n\n\
                        * Tópico 2: Segurança\n    + Subtópico 1: Criptografia\n";
        assert_eq!(outline.to_template(), expected);
        assert_eq!(outline.subtopic_count(), 3);
    }

    #[test]
    fn serialises_as_ordered_object() {
        let outline: Outline = [("b", vec!["1"]), ("a", vec!["2", "3"])].into_iter().collect();
        let json = serde_json::to_string(&outline).unwrap();
        assert_eq!(json, r#"{"b":["1"],"a":["2","3"]}"#);
    }
}
