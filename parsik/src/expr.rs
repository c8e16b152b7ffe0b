use crate::error::GrammarError;
use crate::utils::{escape_char, escape_string};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use unicode_xid::UnicodeXID;

/// A parsing expression.
///
/// Rule references are stored by name and resolved against the
/// [`RuleTable`](crate::RuleTable) when they are evaluated, so definitions can
/// refer to each other (or themselves) in any order.
#[derive(Clone, Debug)]
pub enum Expression {
    /// Matches if the input at the cursor starts with the text.
    Literal(String),
    /// Matches exactly one atom accepted by the class.
    CharClass(CharClass),
    /// Matches any single atom (`.`).
    Any,
    /// Zero-width; matches only at the end of the input.
    EndOfInput,
    /// Matches a regular expression anchored at the cursor.
    Regex(Pattern),
    Sequence(Vec<Expression>),
    /// First alternative which matches wins.
    OrderedChoice(Vec<Expression>),
    ZeroOrMore(Box<Expression>),
    OneOrMore(Box<Expression>),
    /// Never fails; a failed child becomes a zero-width match.
    Optional(Box<Expression>),
    /// Zero-width lookahead which succeeds if the child matches.
    AndPredicate(Box<Expression>),
    /// Zero-width lookahead which succeeds if the child does not match.
    NotPredicate(Box<Expression>),
    RuleReference(String),
}

impl Expression {
    pub fn literal(text: impl Into<String>) -> Self {
        Expression::Literal(text.into())
    }

    pub fn class(class: CharClass) -> Self {
        Expression::CharClass(class)
    }

    pub fn any() -> Self {
        Expression::Any
    }

    pub fn end_of_input() -> Self {
        Expression::EndOfInput
    }

    /// Compile a regular expression terminal. The pattern is anchored at the
    /// cursor; it must not be anchored by the caller.
    pub fn regex(pattern: &str) -> Result<Self, GrammarError> {
        Ok(Expression::Regex(Pattern::new(pattern)?))
    }

    pub fn seq<I: IntoIterator<Item = Expression>>(list: I) -> Self {
        Expression::Sequence(list.into_iter().collect())
    }

    pub fn choice<I: IntoIterator<Item = Expression>>(list: I) -> Self {
        Expression::OrderedChoice(list.into_iter().collect())
    }

    pub fn zero_or_more(expr: Expression) -> Self {
        Expression::ZeroOrMore(Box::new(expr))
    }

    pub fn one_or_more(expr: Expression) -> Self {
        Expression::OneOrMore(Box::new(expr))
    }

    pub fn optional(expr: Expression) -> Self {
        Expression::Optional(Box::new(expr))
    }

    pub fn and(expr: Expression) -> Self {
        Expression::AndPredicate(Box::new(expr))
    }

    pub fn not(expr: Expression) -> Self {
        Expression::NotPredicate(Box::new(expr))
    }

    pub fn rule(name: impl Into<String>) -> Self {
        Expression::RuleReference(name.into())
    }

    /// Zero or more whitespace atoms.
    pub fn whitespace() -> Self {
        Expression::zero_or_more(Expression::class(CharClass::whitespace()))
    }

    /// A unicode identifier: an XID start atom or `_`, followed by XID
    /// continue atoms.
    pub fn xid_identifier() -> Self {
        Expression::seq([
            Expression::class(CharClass::xid_start().or_one_of("_")),
            Expression::zero_or_more(Expression::class(CharClass::xid_continue())),
        ])
    }

    /// Human readable description, used for expectations in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Expression::Literal(text) => format!("\"{}\"", escape_string(text)),
            Expression::CharClass(class) => class.description(),
            Expression::Any => String::from("any character"),
            Expression::EndOfInput => String::from("end of input"),
            Expression::Regex(pattern) => format!("/{}/", pattern.as_str()),
            Expression::Sequence(list) => list
                .iter()
                .map(Expression::describe)
                .collect::<Vec<String>>()
                .join(" "),
            Expression::OrderedChoice(list) => list
                .iter()
                .map(Expression::describe)
                .collect::<Vec<String>>()
                .join(" / "),
            Expression::ZeroOrMore(expr) => format!("{}*", expr.describe_nested()),
            Expression::OneOrMore(expr) => format!("{}+", expr.describe_nested()),
            Expression::Optional(expr) => format!("{}?", expr.describe_nested()),
            Expression::AndPredicate(expr) => format!("&{}", expr.describe_nested()),
            Expression::NotPredicate(expr) => format!("!{}", expr.describe_nested()),
            Expression::RuleReference(name) => name.clone(),
        }
    }

    fn describe_nested(&self) -> String {
        match self {
            Expression::Sequence(list) | Expression::OrderedChoice(list) if list.len() > 1 => {
                format!("({})", self.describe())
            }
            _ => self.describe(),
        }
    }
}

/// A regular expression terminal, compiled once and anchored at the cursor.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, GrammarError> {
        let regex =
            Regex::new(&format!("^(?:{})", source)).map_err(|e| GrammarError::InvalidRegex {
                pattern: source.to_owned(),
                source: e,
            })?;

        Ok(Pattern {
            source: source.to_owned(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Length in bytes of the match at the start of `text`, if any.
    pub(crate) fn match_len(&self, text: &str) -> Option<usize> {
        self.regex.find(text).map(|m| m.end())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.source)
    }
}

type CharTest = Arc<dyn Fn(char) -> bool + Send + Sync>;

#[derive(Clone)]
enum ClassKind {
    Digit,
    Alphabetic,
    Alphanumeric,
    Whitespace,
    XidStart,
    XidContinue,
    Range(char, char),
    OneOf(Vec<char>),
    Predicate { description: String, test: CharTest },
    Union(Vec<ClassKind>),
}

impl ClassKind {
    fn matches(&self, ch: char) -> bool {
        match self {
            ClassKind::Digit => ch.is_ascii_digit(),
            ClassKind::Alphabetic => ch.is_alphabetic(),
            ClassKind::Alphanumeric => ch.is_alphanumeric(),
            ClassKind::Whitespace => ch.is_whitespace(),
            ClassKind::XidStart => UnicodeXID::is_xid_start(ch),
            ClassKind::XidContinue => UnicodeXID::is_xid_continue(ch),
            ClassKind::Range(lo, hi) => (*lo..=*hi).contains(&ch),
            ClassKind::OneOf(set) => set.contains(&ch),
            ClassKind::Predicate { test, .. } => test(ch),
            ClassKind::Union(kinds) => kinds.iter().any(|kind| kind.matches(ch)),
        }
    }

    fn description(&self) -> String {
        match self {
            ClassKind::Digit => String::from("digit"),
            ClassKind::Alphabetic => String::from("letter"),
            ClassKind::Alphanumeric => String::from("letter or digit"),
            ClassKind::Whitespace => String::from("whitespace"),
            ClassKind::XidStart => String::from("identifier start"),
            ClassKind::XidContinue => String::from("identifier character"),
            ClassKind::Range(lo, hi) => format!("{}..{}", escape_char(*lo), escape_char(*hi)),
            ClassKind::OneOf(set) => format!(
                "one of {}",
                set.iter()
                    .map(|ch| escape_char(*ch))
                    .collect::<Vec<String>>()
                    .join(", ")
            ),
            ClassKind::Predicate { description, .. } => description.clone(),
            ClassKind::Union(kinds) => kinds
                .iter()
                .map(ClassKind::description)
                .collect::<Vec<String>>()
                .join(" or "),
        }
    }
}

/// A predicate over a single atom, with a description for diagnostics.
#[derive(Clone)]
pub struct CharClass {
    kind: ClassKind,
    negated: bool,
}

impl CharClass {
    fn from_kind(kind: ClassKind) -> Self {
        CharClass {
            kind,
            negated: false,
        }
    }

    /// ASCII digits `0` to `9`.
    pub fn digit() -> Self {
        Self::from_kind(ClassKind::Digit)
    }

    pub fn alphabetic() -> Self {
        Self::from_kind(ClassKind::Alphabetic)
    }

    pub fn alphanumeric() -> Self {
        Self::from_kind(ClassKind::Alphanumeric)
    }

    pub fn whitespace() -> Self {
        Self::from_kind(ClassKind::Whitespace)
    }

    pub fn xid_start() -> Self {
        Self::from_kind(ClassKind::XidStart)
    }

    pub fn xid_continue() -> Self {
        Self::from_kind(ClassKind::XidContinue)
    }

    /// Inclusive range of atoms.
    pub fn range(lo: char, hi: char) -> Self {
        Self::from_kind(ClassKind::Range(lo, hi))
    }

    pub fn one_of(set: &str) -> Self {
        Self::from_kind(ClassKind::OneOf(set.chars().collect()))
    }

    pub fn predicate<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(char) -> bool + Send + Sync + 'static,
    {
        Self::from_kind(ClassKind::Predicate {
            description: description.into(),
            test: Arc::new(test),
        })
    }

    /// Accept atoms matched by either class.
    pub fn or(self, other: CharClass) -> Self {
        let left = self.into_kind();
        let right = other.into_kind();

        let kinds = match (left, right) {
            (ClassKind::Union(mut left), ClassKind::Union(right)) => {
                left.extend(right);
                left
            }
            (ClassKind::Union(mut left), right) => {
                left.push(right);
                left
            }
            (left, right) => vec![left, right],
        };

        Self::from_kind(ClassKind::Union(kinds))
    }

    pub fn or_one_of(self, set: &str) -> Self {
        self.or(CharClass::one_of(set))
    }

    /// Accept exactly the atoms this class rejects.
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn matches(&self, ch: char) -> bool {
        self.kind.matches(ch) != self.negated
    }

    pub fn description(&self) -> String {
        if self.negated {
            format!("not {}", self.kind.description())
        } else {
            self.kind.description()
        }
    }

    // a negated class cannot be flattened into a union
    fn into_kind(self) -> ClassKind {
        if self.negated {
            let CharClass { kind, .. } = self;
            let description = format!("not {}", kind.description());
            ClassKind::Predicate {
                description,
                test: Arc::new(move |ch| !kind.matches(ch)),
            }
        } else {
            self.kind
        }
    }
}

impl fmt::Debug for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharClass({})", self.description())
    }
}
