//! The recursive matching engine.
//!
//! Every construct is evaluated against an immutable [`Cursor`]. Failure is
//! ordinary data ([`MatchOutcome::Failure`]) which flows back through
//! sequences and choices; only an undefined rule or an exhausted resource
//! limit stops a session, as a [`ParseError`].

use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::expr::{CharClass, Expression, Pattern};
use crate::memo::{MemoCache, MemoEntry};
use crate::options::ParseOptions;
use crate::outcome::{Failure, MatchOutcome};
use crate::rules::{Definition, RuleTable};
use crate::tree::{Label, Node};
use crate::utils::escape_string;
use log::trace;
use std::collections::BTreeSet;

/// Match `expression` at `cursor` with default options.
///
/// The cache must only be shared between calls over the same table and
/// input.
pub fn match_expression(
    expression: &Expression,
    cursor: Cursor<'_, '_>,
    table: &RuleTable,
    cache: &mut MemoCache,
) -> Result<MatchOutcome, ParseError> {
    Session::new(table, cache, ParseOptions::default()).match_expression(expression, cursor)
}

/// State of one parse: the rule table, the cache, and the diagnostics
/// gathered so far.
pub struct Session<'g, 'c> {
    table: &'g RuleTable,
    cache: &'c mut MemoCache,
    options: ParseOptions,
    depth: usize,
    furthest: Option<Failure>,
}

impl<'g, 'c> Session<'g, 'c> {
    pub fn new(table: &'g RuleTable, cache: &'c mut MemoCache, options: ParseOptions) -> Self {
        Session {
            table,
            cache,
            options,
            depth: 0,
            furthest: None,
        }
    }

    /// The deepest terminal failure seen outside of predicates.
    pub fn furthest_failure(&self) -> Option<&Failure> {
        self.furthest.as_ref()
    }

    pub(crate) fn take_furthest(&mut self) -> Option<Failure> {
        self.furthest.take()
    }

    pub fn match_expression(
        &mut self,
        expr: &Expression,
        cursor: Cursor<'_, '_>,
    ) -> Result<MatchOutcome, ParseError> {
        if self.depth >= self.options.max_depth {
            return Err(ParseError::RecursionLimit {
                limit: self.options.max_depth,
                position: cursor.position(),
            });
        }

        self.depth += 1;
        let res = self.dispatch(expr, cursor);
        self.depth -= 1;

        res
    }

    fn dispatch(
        &mut self,
        expr: &Expression,
        cursor: Cursor<'_, '_>,
    ) -> Result<MatchOutcome, ParseError> {
        match expr {
            Expression::Literal(text) => Ok(self.match_literal(text, cursor)),
            Expression::CharClass(class) => Ok(self.match_class(class, cursor)),
            Expression::Any => Ok(self.match_any(cursor)),
            Expression::EndOfInput => Ok(self.match_end(cursor)),
            Expression::Regex(pattern) => Ok(self.match_regex(pattern, cursor)),
            Expression::Sequence(list) => self.match_sequence(list, cursor),
            Expression::OrderedChoice(list) => {
                self.match_choice(list, cursor).map(|(outcome, _)| outcome)
            }
            Expression::ZeroOrMore(expr) => self.match_repetition(expr, cursor, false),
            Expression::OneOrMore(expr) => self.match_repetition(expr, cursor, true),
            Expression::Optional(expr) => match self.match_expression(expr, cursor)? {
                MatchOutcome::Failure(_) => Ok(zero_width(cursor)),
                success => Ok(success),
            },
            Expression::AndPredicate(expr) => self.match_and(expr, cursor),
            Expression::NotPredicate(expr) => self.match_not(expr, cursor),
            Expression::RuleReference(name) => self.match_rule(name, cursor),
        }
    }

    fn fail(&mut self, failure: Failure) -> MatchOutcome {
        self.furthest = Failure::merge_opt(self.furthest.take(), Some(failure.clone()));

        MatchOutcome::Failure(failure)
    }

    fn terminal(&self, cursor: Cursor<'_, '_>, count: usize) -> MatchOutcome {
        let start = cursor.position();

        MatchOutcome::Success {
            end: start + count,
            node: Some(Node::new(Label::Terminal, start, start + count)),
        }
    }

    fn match_literal(&mut self, text: &str, cursor: Cursor<'_, '_>) -> MatchOutcome {
        let mut matched = 0;
        let mut rest = cursor.rest().iter();

        for expected in text.chars() {
            match rest.next() {
                Some(ch) if *ch == expected => matched += 1,
                _ => {
                    // fail at the first atom which differs
                    let failure = Failure::new(
                        cursor.position() + matched,
                        format!("\"{}\"", escape_string(text)),
                    );
                    return self.fail(failure);
                }
            }
        }

        self.terminal(cursor, matched)
    }

    fn match_class(&mut self, class: &CharClass, cursor: Cursor<'_, '_>) -> MatchOutcome {
        match cursor.peek() {
            Some(ch) if class.matches(ch) => self.terminal(cursor, 1),
            _ => self.fail(Failure::new(cursor.position(), class.description())),
        }
    }

    fn match_any(&mut self, cursor: Cursor<'_, '_>) -> MatchOutcome {
        if cursor.peek().is_some() {
            self.terminal(cursor, 1)
        } else {
            self.fail(Failure::new(cursor.position(), Expression::Any.describe()))
        }
    }

    fn match_end(&mut self, cursor: Cursor<'_, '_>) -> MatchOutcome {
        if cursor.is_at_end() {
            zero_width(cursor)
        } else {
            let failure = Failure::new(cursor.position(), Expression::EndOfInput.describe());
            self.fail(failure)
        }
    }

    fn match_regex(&mut self, pattern: &Pattern, cursor: Cursor<'_, '_>) -> MatchOutcome {
        match pattern.match_len(cursor.rest_str()) {
            Some(len) => {
                let input = cursor.input();
                let end = input.position_of_byte(input.byte_offset(cursor.position()) + len);

                self.terminal(cursor, end - cursor.position())
            }
            None => self.fail(Failure::new(
                cursor.position(),
                format!("/{}/", pattern.as_str()),
            )),
        }
    }

    fn match_sequence(
        &mut self,
        list: &[Expression],
        cursor: Cursor<'_, '_>,
    ) -> Result<MatchOutcome, ParseError> {
        let start = cursor.position();
        let mut pos = cursor;
        let mut children = Vec::new();

        for expr in list {
            match self.match_expression(expr, pos)? {
                MatchOutcome::Success { end, node } => {
                    children.extend(node);
                    pos = pos.with_position(end);
                }
                failure => return Ok(failure),
            }
        }

        let end = pos.position();

        Ok(MatchOutcome::Success {
            end,
            node: Some(Node::with_children(Label::Sequence, start, end, children)),
        })
    }

    /// Try each alternative from the same cursor; the first success wins.
    /// Returns the index of the winning alternative alongside the outcome.
    fn match_choice(
        &mut self,
        list: &[Expression],
        cursor: Cursor<'_, '_>,
    ) -> Result<(MatchOutcome, Option<u16>), ParseError> {
        let mut failure = None;

        for (no, expr) in list.iter().enumerate() {
            match self.match_expression(expr, cursor)? {
                MatchOutcome::Failure(f) => {
                    failure = Failure::merge_opt(failure, Some(f));
                }
                success => return Ok((success, u16::try_from(no).ok())),
            }
        }

        let failure = failure.unwrap_or_else(|| Failure {
            position: cursor.position(),
            expected: BTreeSet::new(),
        });

        Ok((MatchOutcome::Failure(failure), None))
    }

    fn match_repetition(
        &mut self,
        expr: &Expression,
        cursor: Cursor<'_, '_>,
        at_least_one: bool,
    ) -> Result<MatchOutcome, ParseError> {
        let start = cursor.position();
        let mut pos = cursor;
        let mut children = Vec::new();
        let mut count = 0;

        loop {
            match self.match_expression(expr, pos)? {
                MatchOutcome::Success { end, node } => {
                    count += 1;

                    if end == pos.position() {
                        // must be making progress; a zero-width first match
                        // still satisfies one-or-more
                        if at_least_one && count == 1 {
                            children.extend(node);
                        }
                        break;
                    }

                    children.extend(node);
                    pos = pos.with_position(end);
                }
                MatchOutcome::Failure(failure) => {
                    if at_least_one && count == 0 {
                        return Ok(MatchOutcome::Failure(failure));
                    }
                    break;
                }
            }
        }

        let end = pos.position();

        Ok(MatchOutcome::Success {
            end,
            node: Some(Node::with_children(Label::Repetition, start, end, children)),
        })
    }

    fn match_and(
        &mut self,
        expr: &Expression,
        cursor: Cursor<'_, '_>,
    ) -> Result<MatchOutcome, ParseError> {
        Ok(if self.lookahead(expr, cursor)? {
            zero_width(cursor)
        } else {
            self.fail(Failure::new(cursor.position(), expr.describe()))
        })
    }

    fn match_not(
        &mut self,
        expr: &Expression,
        cursor: Cursor<'_, '_>,
    ) -> Result<MatchOutcome, ParseError> {
        Ok(if self.lookahead(expr, cursor)? {
            let expected = format!("not {}", expr.describe());
            self.fail(Failure::new(cursor.position(), expected))
        } else {
            zero_width(cursor)
        })
    }

    /// Evaluate `expr` without consuming input. Failures seen inside the
    /// lookahead are not part of the diagnostics.
    fn lookahead(
        &mut self,
        expr: &Expression,
        cursor: Cursor<'_, '_>,
    ) -> Result<bool, ParseError> {
        let saved = self.furthest.take();
        let res = self.match_expression(expr, cursor);
        self.furthest = saved;

        Ok(res?.is_success())
    }

    fn match_rule(
        &mut self,
        name: &str,
        cursor: Cursor<'_, '_>,
    ) -> Result<MatchOutcome, ParseError> {
        let table = self.table;
        let id = table.resolve_id(name)?;
        let pos = cursor.position();

        if self.options.memoize {
            if let Some(entry) = self.cache.get(id, pos).cloned() {
                trace!("memo hit for rule {} at {}", name, pos);

                // Note that failure to match is also cached
                self.furthest = Failure::merge_opt(self.furthest.take(), entry.furthest);

                return Ok(entry.outcome);
            }
        }

        trace!("rule {} at {}", name, pos);

        let saved = self.furthest.take();
        let res = self.match_definition(table.definition(id), cursor);
        let local = self.furthest.take();
        self.furthest = Failure::merge_opt(saved, local.clone());

        let outcome = res?;

        if self.options.memoize {
            self.cache.insert(
                id,
                pos,
                MemoEntry {
                    outcome: outcome.clone(),
                    furthest: local,
                },
            );
        }

        Ok(outcome)
    }

    fn match_definition(
        &mut self,
        def: &Definition,
        cursor: Cursor<'_, '_>,
    ) -> Result<MatchOutcome, ParseError> {
        let start = cursor.position();

        let (outcome, alternative) = match &def.expression {
            Expression::OrderedChoice(list) => self.match_choice(list, cursor)?,
            expr => (self.match_expression(expr, cursor)?, None),
        };

        Ok(match outcome {
            MatchOutcome::Success { end, node } => {
                let children = match node {
                    Some(Node {
                        label: Label::Sequence | Label::Repetition,
                        children,
                        ..
                    }) => children,
                    Some(node) => vec![node],
                    None => Vec::new(),
                };

                let label = Label::Rule(def.name.clone());
                let mut node = Node::with_children(label, start, end, children);
                node.alternative = alternative;

                MatchOutcome::Success {
                    end,
                    node: Some(node),
                }
            }
            failure => failure,
        })
    }
}

fn zero_width(cursor: Cursor<'_, '_>) -> MatchOutcome {
    MatchOutcome::Success {
        end: cursor.position(),
        node: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Input;

    fn run(expr: &Expression, text: &str) -> MatchOutcome {
        let table = RuleTable::new();
        let input = Input::new(text);
        let mut cache = MemoCache::new();

        match_expression(expr, input.cursor(), &table, &mut cache).unwrap()
    }

    fn failure(pos: usize, expected: &[&str]) -> MatchOutcome {
        MatchOutcome::Failure(Failure {
            position: pos,
            expected: expected.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn literal() {
        assert_eq!(run(&Expression::literal("ab"), "abc").end(), Some(2));
        assert_eq!(run(&Expression::literal("abd"), "abc"), failure(2, &["\"abd\""]));
        assert_eq!(run(&Expression::literal("abcd"), "abc"), failure(3, &["\"abcd\""]));
        assert_eq!(run(&Expression::literal("µ"), "µx").end(), Some(1));
    }

    #[test]
    fn class_and_any() {
        let digit = Expression::class(CharClass::digit());

        assert_eq!(run(&digit, "7").end(), Some(1));
        assert_eq!(run(&digit, "x"), failure(0, &["digit"]));
        assert_eq!(run(&digit, ""), failure(0, &["digit"]));
        assert_eq!(run(&Expression::any(), "µ").end(), Some(1));
        assert_eq!(run(&Expression::any(), ""), failure(0, &["any character"]));
    }

    #[test]
    fn regex_counts_atoms() {
        let expr = Expression::regex("[a-zµ]+").unwrap();

        assert_eq!(run(&expr, "aµb1").end(), Some(3));
        assert_eq!(run(&expr, "1"), failure(0, &["/[a-zµ]+/"]));
    }

    #[test]
    fn sequence_fails_at_child() {
        let expr = Expression::seq([Expression::literal("a"), Expression::literal("bc")]);

        assert_eq!(run(&expr, "abx"), failure(2, &["\"bc\""]));

        match run(&expr, "abc") {
            MatchOutcome::Success { end, node: Some(node) } => {
                assert_eq!(end, 3);
                assert_eq!(node.label, Label::Sequence);
                assert_eq!(node.children.len(), 2);
                assert_eq!((node.children[1].start, node.children[1].end), (1, 3));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn choice_is_left_biased() {
        let expr = Expression::choice([Expression::literal("a"), Expression::literal("ab")]);

        assert_eq!(run(&expr, "ab").end(), Some(1));
    }

    #[test]
    fn choice_merges_failures() {
        let expr = Expression::choice([
            Expression::literal("ac"),
            Expression::literal("ax"),
            Expression::literal("b"),
        ]);

        assert_eq!(run(&expr, "ab"), failure(1, &["\"ac\"", "\"ax\""]));
        assert_eq!(run(&Expression::choice([]), "a"), failure(0, &[]));
    }

    #[test]
    fn repetition() {
        let digits = Expression::zero_or_more(Expression::class(CharClass::digit()));

        match run(&digits, "12a") {
            MatchOutcome::Success { end, node: Some(node) } => {
                assert_eq!(end, 2);
                assert_eq!(node.label, Label::Repetition);
                assert_eq!(node.children.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(run(&digits, "a").end(), Some(0));

        let more = Expression::one_or_more(Expression::class(CharClass::digit()));
        assert_eq!(run(&more, "a"), failure(0, &["digit"]));
        assert_eq!(run(&more, "123").end(), Some(3));
    }

    #[test]
    fn repetition_stops_without_progress() {
        let expr = Expression::zero_or_more(Expression::optional(Expression::literal("x")));

        assert_eq!(run(&expr, "xxy").end(), Some(2));
        assert_eq!(run(&expr, "y").end(), Some(0));

        let expr = Expression::one_or_more(Expression::literal(""));

        match run(&expr, "y") {
            MatchOutcome::Success { end, node: Some(node) } => {
                assert_eq!(end, 0);
                assert_eq!(node.children.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn optional_never_fails() {
        assert_eq!(
            run(&Expression::optional(Expression::literal("x")), "y"),
            MatchOutcome::Success { end: 0, node: None }
        );
        assert_eq!(
            run(&Expression::optional(Expression::literal("y")), "y").end(),
            Some(1)
        );
    }

    #[test]
    fn predicates_consume_nothing() {
        let and = Expression::and(Expression::literal("ab"));
        let not = Expression::not(Expression::literal("ab"));

        assert_eq!(run(&and, "abc"), MatchOutcome::Success { end: 0, node: None });
        assert_eq!(run(&and, "ax"), failure(0, &["\"ab\""]));
        assert_eq!(run(&not, "ax"), MatchOutcome::Success { end: 0, node: None });
        assert_eq!(run(&not, "abc"), failure(0, &["not \"ab\""]));
        let eoi = Expression::end_of_input();
        assert_eq!(run(&eoi, ""), MatchOutcome::Success { end: 0, node: None });
        assert_eq!(run(&eoi, "a"), failure(0, &["end of input"]));
    }

    #[test]
    fn lookahead_failures_are_not_diagnostics() {
        let table = RuleTable::new();
        let input = Input::new("abc");
        let mut cache = MemoCache::new();
        let mut session = Session::new(&table, &mut cache, ParseOptions::default());

        let expr = Expression::seq([
            Expression::not(Expression::literal("abx")),
            Expression::literal("ab"),
        ]);

        assert_eq!(session.match_expression(&expr, input.cursor()).unwrap().end(), Some(2));
        assert_eq!(session.furthest_failure(), None);
    }

    #[test]
    fn undefined_rule_is_an_error() {
        let table = RuleTable::new();
        let input = Input::new("x");
        let mut cache = MemoCache::new();

        assert_eq!(
            match_expression(&Expression::rule("Missing"), input.cursor(), &table, &mut cache),
            Err(ParseError::UndefinedRule {
                name: String::from("Missing")
            })
        );

        // even behind an ordered choice which could have matched later
        let expr = Expression::choice([Expression::rule("Missing"), Expression::literal("x")]);
        assert!(match_expression(&expr, input.cursor(), &table, &mut cache).is_err());
    }

    #[test]
    fn rules_are_memoized() {
        let table = RuleTable::new()
            .rule("a", Expression::literal("a"))
            .unwrap();
        let input = Input::new("ab");
        let mut cache = MemoCache::new();

        let expr = Expression::choice([
            Expression::seq([Expression::rule("a"), Expression::literal("x")]),
            Expression::seq([Expression::rule("a"), Expression::literal("b")]),
        ]);

        let outcome = match_expression(&expr, input.cursor(), &table, &mut cache).unwrap();

        assert_eq!(outcome.end(), Some(2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn rule_node_records_alternative() {
        let table = RuleTable::new()
            .rule(
                "sign",
                Expression::choice([Expression::literal("+"), Expression::literal("-")]),
            )
            .unwrap();
        let input = Input::new("-");
        let mut cache = MemoCache::new();

        match match_expression(&Expression::rule("sign"), input.cursor(), &table, &mut cache) {
            Ok(MatchOutcome::Success { node: Some(node), .. }) => {
                assert_eq!(node.rule_name(), Some("sign"));
                assert_eq!(node.alternative, Some(1));
                assert_eq!(node.children.len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn left_recursion_hits_depth_limit() {
        let table = RuleTable::new()
            .rule(
                "expr",
                Expression::choice([
                    Expression::seq([Expression::rule("expr"), Expression::literal("+1")]),
                    Expression::literal("1"),
                ]),
            )
            .unwrap();
        let input = Input::new("1+1");
        let mut cache = MemoCache::new();
        let options = ParseOptions::default().with_max_depth(64);
        let mut session = Session::new(&table, &mut cache, options);

        let err = session
            .match_expression(&Expression::rule("expr"), input.cursor())
            .unwrap_err();

        assert_eq!(
            err,
            ParseError::RecursionLimit {
                limit: 64,
                position: 0
            }
        );
        assert!(err.is_resource_exhaustion());
    }

    #[test]
    fn default_depth_limit_is_an_error() {
        let table = RuleTable::new()
            .rule(
                "list",
                Expression::seq([Expression::rule("list"), Expression::literal(",")]),
            )
            .unwrap();
        let input = Input::new("a,");
        let mut cache = MemoCache::new();

        match match_expression(&Expression::rule("list"), input.cursor(), &table, &mut cache) {
            Err(ParseError::RecursionLimit { limit, position }) => {
                assert_eq!(limit, crate::options::DEFAULT_MAX_DEPTH);
                assert_eq!(position, 0);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(cache.is_empty());
    }
}
