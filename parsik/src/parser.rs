use crate::cursor::Input;
use crate::engine::Session;
use crate::error::ParseError;
use crate::expr::Expression;
use crate::memo::MemoCache;
use crate::options::ParseOptions;
use crate::outcome::{MatchOutcome, ParseResult};
use crate::rules::RuleTable;
use crate::tree::{Label, Node};
use log::debug;

/// Parse `input` from the rule `start` with default options.
pub fn parse(table: &RuleTable, start: &str, input: &str) -> Result<ParseResult, ParseError> {
    Parser::new(table).parse_str(start, input)
}

/// Runs parse sessions against a rule table.
///
/// Every call to [`parse`](Parser::parse) starts from a fresh cache, so a
/// `Parser` can be shared between threads and reused for any number of
/// inputs.
#[derive(Clone, Copy, Debug)]
pub struct Parser<'g> {
    table: &'g RuleTable,
    options: ParseOptions,
}

impl<'g> Parser<'g> {
    pub fn new(table: &'g RuleTable) -> Self {
        Parser {
            table,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn table(&self) -> &'g RuleTable {
        self.table
    }

    pub fn parse_str(&self, start: &str, text: &str) -> Result<ParseResult, ParseError> {
        self.parse(start, &Input::new(text))
    }

    pub fn parse(&self, start: &str, input: &Input<'_>) -> Result<ParseResult, ParseError> {
        let mut cache = MemoCache::new();

        self.parse_with_cache(start, input, &mut cache)
    }

    /// Like [`parse`](Parser::parse), with a caller-owned cache. The cache is
    /// cleared first and left populated afterwards, for inspection.
    pub fn parse_with_cache(
        &self,
        start: &str,
        input: &Input<'_>,
        cache: &mut MemoCache,
    ) -> Result<ParseResult, ParseError> {
        if let Some(limit) = self.options.max_input_len {
            if input.len() > limit {
                return Err(ParseError::InputTooLarge {
                    length: input.len(),
                    limit,
                });
            }
        }

        cache.clear();

        debug!("parsing {} atoms from rule {}", input.len(), start);

        let mut session = Session::new(self.table, cache, self.options);

        let outcome = session.match_expression(&Expression::rule(start), input.cursor())?;
        let furthest = session.take_furthest();

        let res = match outcome {
            MatchOutcome::Success { end, node } => {
                let tree = node.unwrap_or_else(|| Node::new(Label::Rule(start.into()), 0, end));

                if end == input.len() {
                    ParseResult::Complete(tree)
                } else {
                    ParseResult::Partial {
                        tree,
                        consumed: end,
                        furthest,
                    }
                }
            }
            MatchOutcome::Failure(failure) => ParseResult::Failed(match furthest {
                Some(furthest) => failure.merge(furthest),
                None => failure,
            }),
        };

        debug!(
            "parse of rule {}: {}, {} memo entries, {} hits, {} misses",
            start,
            match &res {
                ParseResult::Complete(_) => String::from("complete"),
                ParseResult::Partial { consumed, .. } => format!("partial ({} atoms)", consumed),
                ParseResult::Failed(failure) => failure.to_string(),
            },
            cache.len(),
            cache.hits(),
            cache.misses(),
        );

        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::CharClass;
    use crate::outcome::Failure;

    fn number_grammar() -> RuleTable {
        RuleTable::new()
            .rule(
                "Digits",
                Expression::one_or_more(Expression::class(CharClass::digit())),
            )
            .unwrap()
            .rule("Number", Expression::rule("Digits"))
            .unwrap()
    }

    #[test]
    fn complete() {
        let table = number_grammar();

        match parse(&table, "Number", "123").unwrap() {
            ParseResult::Complete(tree) => {
                assert_eq!(tree.rule_name(), Some("Number"));
                assert_eq!((tree.start, tree.end), (0, 3));
                assert_eq!(tree.leaves().len(), 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn partial() {
        let table = number_grammar();

        match parse(&table, "Number", "123abc").unwrap() {
            ParseResult::Partial {
                consumed, furthest, ..
            } => {
                assert_eq!(consumed, 3);
                assert_eq!(furthest, Some(Failure::new(3, "digit")));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn failed() {
        let table = number_grammar();

        assert_eq!(
            parse(&table, "Number", "abc").unwrap(),
            ParseResult::Failed(Failure::new(0, "digit"))
        );
    }

    #[test]
    fn undefined_start() {
        let table = number_grammar();

        assert_eq!(
            parse(&table, "Missing", "1"),
            Err(ParseError::UndefinedRule {
                name: String::from("Missing")
            })
        );
    }

    #[test]
    fn input_limit() {
        let table = number_grammar();
        let parser =
            Parser::new(&table).with_options(ParseOptions::default().with_max_input_len(2));

        assert_eq!(
            parser.parse_str("Number", "123"),
            Err(ParseError::InputTooLarge {
                length: 3,
                limit: 2
            })
        );
        assert!(parser.parse_str("Number", "12").unwrap().is_complete());
    }

    #[test]
    fn cache_is_fresh_per_parse() {
        let table = number_grammar();
        let parser = Parser::new(&table);
        let mut cache = MemoCache::new();

        let first = parser
            .parse_with_cache("Number", &Input::new("12"), &mut cache)
            .unwrap();
        let entries = cache.len();

        let second = parser
            .parse_with_cache("Number", &Input::new("ab"), &mut cache)
            .unwrap();

        assert!(first.is_complete());
        assert!(matches!(second, ParseResult::Failed(_)));
        assert_eq!(entries, 2);
        assert_eq!(cache.hits(), 0);
    }
}
