use crate::{calculator, nested};
use parsik::{
    match_expression, CharClass, Cursor, Expression, Input, MatchOutcome, MemoCache, Node,
    ParseOptions, ParseResult, Parser, RuleTable,
};
use proptest::prelude::*;

fn spans_nest(node: &Node) -> bool {
    let mut prev = node.start;

    for child in &node.children {
        if child.start < prev || child.end < child.start || child.end > node.end {
            return false;
        }
        prev = child.end;

        if !spans_nest(child) {
            return false;
        }
    }

    node.start <= node.end
}

proptest! {
    #[test]
    fn memoization_is_transparent(s in "[0-9+*%() -]{0,24}") {
        let table = calculator::grammar();

        let memo = Parser::new(&table).parse_str("calculator", &s).unwrap();
        let plain = Parser::new(&table)
            .with_options(ParseOptions::default().with_memoize(false))
            .parse_str("calculator", &s)
            .unwrap();

        prop_assert_eq!(memo, plain);
    }

    #[test]
    fn parsing_is_deterministic(s in "[\\[\\]0-9, -]{0,24}") {
        let table = nested::grammar();
        let parser = Parser::new(&table);

        let first = parser.parse_str("value", &s).unwrap();
        let second = parser.parse_str("value", &s).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn consumption_is_monotonic(s in "[0-9+*() ]{0,24}") {
        let table = calculator::grammar();

        match Parser::new(&table).parse_str("calculator", &s).unwrap() {
            ParseResult::Complete(tree) => {
                prop_assert_eq!(tree.end, s.chars().count());
                prop_assert!(spans_nest(&tree));
            }
            ParseResult::Partial { tree, consumed, .. } => {
                prop_assert_eq!(tree.end, consumed);
                prop_assert!(spans_nest(&tree));
            }
            ParseResult::Failed(failure) => {
                prop_assert!(failure.position <= s.chars().count());
            }
        }
    }

    #[test]
    fn predicates_are_zero_width(s in "[a-c0-9]{0,12}", pos in 0usize..13) {
        let table = RuleTable::new();
        let input = Input::new(&s);
        let cursor = Cursor::at(&input, pos);

        let targets = [
            Expression::class(CharClass::digit()),
            Expression::literal("ab"),
            Expression::one_or_more(Expression::any()),
        ];

        let run = |expr: &Expression| {
            match_expression(expr, cursor, &table, &mut MemoCache::new()).unwrap()
        };

        for target in targets {
            let and = run(&Expression::and(target.clone()));
            let not = run(&Expression::not(target.clone()));
            let direct = run(&target);

            prop_assert_eq!(and.is_success(), direct.is_success());
            prop_assert_eq!(not.is_success(), !direct.is_success());

            for outcome in [and, not] {
                match outcome {
                    MatchOutcome::Success { end, node } => {
                        prop_assert_eq!(end, cursor.position());
                        prop_assert!(node.is_none());
                    }
                    MatchOutcome::Failure(failure) => {
                        prop_assert_eq!(failure.position, cursor.position());
                    }
                }
            }
        }
    }
}
