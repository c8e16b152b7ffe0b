use crate::cursor::Input;
use crate::utils::escape_string;
use std::fmt;
use std::sync::Arc;

/// What produced a [`Node`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    /// A successful application of a named rule.
    Rule(Arc<str>),
    /// A literal, character class, `.` or regex match.
    Terminal,
    /// A sequence which is not the whole body of a rule.
    Sequence,
    /// A repetition which is not the whole body of a rule.
    Repetition,
}

impl Label {
    pub fn rule_name(&self) -> Option<&str> {
        match self {
            Label::Rule(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Rule(name) => f.write_str(name),
            Label::Terminal => f.write_str("Terminal"),
            Label::Sequence => f.write_str("Sequence"),
            Label::Repetition => f.write_str("Repetition"),
        }
    }
}

/// A node in the parse tree, spanning the atoms `[start, end)`.
///
/// Children are in input order and lie contiguously inside the parent's span,
/// except where zero-width constructs (predicates, failed optionals) left no
/// subtree behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub label: Label,
    pub start: usize,
    pub end: usize,
    pub children: Vec<Node>,
    /// For a rule whose definition is an ordered choice, the index of the
    /// alternative which matched.
    pub alternative: Option<u16>,
}

impl Node {
    pub(crate) fn new(label: Label, start: usize, end: usize) -> Self {
        Self {
            label,
            start,
            end,
            children: Vec::new(),
            alternative: None,
        }
    }

    pub(crate) fn with_children(
        label: Label,
        start: usize,
        end: usize,
        children: Vec<Node>,
    ) -> Self {
        Self {
            label,
            start,
            end,
            children,
            alternative: None,
        }
    }

    pub fn rule_name(&self) -> Option<&str> {
        self.label.rule_name()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn as_str<'s>(&self, input: &Input<'s>) -> &'s str {
        input.slice(self.start, self.end)
    }

    /// All leaf nodes, left to right.
    pub fn leaves(&self) -> Vec<&Node> {
        let mut list = Vec::new();

        fn recurse<'t>(node: &'t Node, list: &mut Vec<&'t Node>) {
            if node.children.is_empty() {
                list.push(node);
            } else {
                for node in &node.children {
                    recurse(node, list);
                }
            }
        }

        recurse(self, &mut list);

        list
    }

    /// The outermost nodes for the named rule, in input order. Nodes nested
    /// inside a match are not returned separately.
    pub fn find_all(&self, rule: &str) -> Vec<&Node> {
        let mut list = Vec::new();

        fn recurse<'t>(node: &'t Node, rule: &str, list: &mut Vec<&'t Node>) {
            if node.rule_name() == Some(rule) {
                list.push(node);
            } else {
                for node in &node.children {
                    recurse(node, rule, list);
                }
            }
        }

        recurse(self, rule, &mut list);

        list
    }

    /// Compact s-expression rendering: `(label, alt=N, "text", children...)`.
    pub fn print_to_string(&self, input: &Input<'_>) -> String {
        let children = if self.children.is_empty() {
            String::new()
        } else {
            format!(
                ", {}",
                self.children
                    .iter()
                    .map(|node| node.print_to_string(input))
                    .collect::<Vec<String>>()
                    .join(", ")
            )
        };

        format!(
            "({}, {}\"{}\"{})",
            self.label,
            if let Some(alt) = self.alternative {
                format!("alt={}, ", alt)
            } else {
                String::new()
            },
            escape_string(self.as_str(input)),
            children,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut root = Node::with_children(
            Label::Rule(Arc::from("pair")),
            0,
            3,
            vec![
                Node::new(Label::Terminal, 0, 1),
                Node::new(Label::Terminal, 1, 2),
                Node::with_children(
                    Label::Rule(Arc::from("tail")),
                    2,
                    3,
                    vec![Node::new(Label::Terminal, 2, 3)],
                ),
            ],
        );
        root.alternative = Some(1);
        root
    }

    #[test]
    fn print() {
        let input = Input::new("a\"b");

        assert_eq!(
            sample().print_to_string(&input),
            "(pair, alt=1, \"a\\\"b\", (Terminal, \"a\"), (Terminal, \"\\\"\"), (tail, \"b\", (Terminal, \"b\")))"
        );
    }

    #[test]
    fn walk() {
        let root = sample();

        assert_eq!(root.leaves().len(), 3);
        assert_eq!(root.find_all("tail").len(), 1);
        assert_eq!(root.find_all("pair").len(), 1);
        assert!(root.find_all("missing").is_empty());
        assert_eq!(root.len(), 3);
    }
}
