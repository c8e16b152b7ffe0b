use crate::tree::Node;
use std::collections::BTreeSet;
use std::fmt;

/// Where matching stopped, and what would have been accepted there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub position: usize,
    pub expected: BTreeSet<String>,
}

impl Failure {
    pub fn new(position: usize, expected: impl Into<String>) -> Self {
        let mut set = BTreeSet::new();
        set.insert(expected.into());

        Failure {
            position,
            expected: set,
        }
    }

    /// Furthest position wins; on a tie the expectation sets are merged.
    pub fn merge(self, other: Failure) -> Failure {
        match self.position.cmp(&other.position) {
            std::cmp::Ordering::Greater => self,
            std::cmp::Ordering::Less => other,
            std::cmp::Ordering::Equal => {
                let mut merged = self;
                merged.expected.extend(other.expected);
                merged
            }
        }
    }

    pub(crate) fn merge_opt(left: Option<Failure>, right: Option<Failure>) -> Option<Failure> {
        match (left, right) {
            (Some(left), Some(right)) => Some(left.merge(right)),
            (left, None) => left,
            (None, right) => right,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected: Vec<&str> = self.expected.iter().map(String::as_str).collect();

        match expected.as_slice() {
            [] => write!(f, "unexpected input at position {}", self.position),
            [one] => write!(f, "expected {} at position {}", one, self.position),
            many => write!(
                f,
                "expected one of {} at position {}",
                many.join(", "),
                self.position
            ),
        }
    }
}

/// Result of matching one expression at one position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// `node` is `None` for zero-width constructs which build no subtree.
    Success { end: usize, node: Option<Node> },
    Failure(Failure),
}

impl MatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MatchOutcome::Success { .. })
    }

    pub fn end(&self) -> Option<usize> {
        match self {
            MatchOutcome::Success { end, .. } => Some(*end),
            MatchOutcome::Failure(_) => None,
        }
    }
}

/// Result of a top-level parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseResult {
    /// The start rule matched the whole input.
    Complete(Node),
    /// The start rule matched a prefix of `consumed` atoms. `furthest` is the
    /// deepest failure seen, which usually explains why matching stopped.
    Partial {
        tree: Node,
        consumed: usize,
        furthest: Option<Failure>,
    },
    Failed(Failure),
}

impl ParseResult {
    pub fn is_complete(&self) -> bool {
        matches!(self, ParseResult::Complete(_))
    }

    pub fn tree(&self) -> Option<&Node> {
        match self {
            ParseResult::Complete(tree) | ParseResult::Partial { tree, .. } => Some(tree),
            ParseResult::Failed(_) => None,
        }
    }

    /// The tree, only if the whole input was consumed.
    pub fn into_complete(self) -> Option<Node> {
        match self {
            ParseResult::Complete(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ParseResult::Failed(failure) => Some(failure),
            ParseResult::Partial { furthest, .. } => furthest.as_ref(),
            ParseResult::Complete(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_furthest_wins() {
        let near = Failure::new(1, "\"a\"");
        let far = Failure::new(3, "\"b\"");

        assert_eq!(near.clone().merge(far.clone()), far);
        assert_eq!(far.clone().merge(near), far);

        let tie = Failure::new(3, "digit").merge(far);
        assert_eq!(tie.position, 3);
        assert_eq!(tie.expected.len(), 2);
        assert_eq!(
            tie.to_string(),
            "expected one of \"b\", digit at position 3"
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            Failure::new(0, "\"x\"").to_string(),
            "expected \"x\" at position 0"
        );
    }
}
