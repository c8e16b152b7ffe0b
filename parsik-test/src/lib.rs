#![cfg_attr(not(test), allow(dead_code, unused_imports))]

mod calculator;
mod identifiers;
mod nested;
#[cfg(test)]
mod properties;
mod repeat;
mod test1;
mod test2;

use parsik::{
    match_expression, CharClass, Expression, Failure, Input, Label, MatchOutcome, MemoCache,
    ParseError, ParseOptions, ParseResult, Parser, RuleTable, Session, DEFAULT_MAX_DEPTH,
};

fn print(table: &RuleTable, start: &str, s: &str) -> String {
    let input = Input::new(s);

    match Parser::new(table).parse(start, &input).unwrap() {
        ParseResult::Complete(node) => node.print_to_string(&input),
        other => panic!("{} did not parse completely: {:?}", s, other),
    }
}

fn failure(table: &RuleTable, start: &str, s: &str) -> Failure {
    match Parser::new(table).parse_str(start, s).unwrap() {
        ParseResult::Failed(failure) => failure,
        other => panic!("{} should not parse: {:?}", s, other),
    }
}

#[test]
fn test1() {
    let table = test1::grammar();

    assert!(parsik::parse(&table, "foo", "barf").unwrap().is_complete());
    assert!(!parsik::parse(&table, "foo", "berf").unwrap().is_complete());
}

#[test]
fn test2() {
    let table = test2::grammar();

    assert_eq!(
        print(&table, "foo", "barf darf"),
        "(foo, alt=0, \"barf darf\", (Terminal, \"barf\"), (Terminal, \" \"), (Terminal, \"darf\"))"
    );

    // test dot. Also make sure that dot steps over non-ascii
    assert_eq!(
        print(&table, "foo", "carf erf"),
        "(foo, alt=1, \"carf erf\", (carf, \"carf erf\", (Terminal, \"carf\"), (Terminal, \" \"), (erf, \"erf\", (Terminal, \"erf\"))))"
    );

    let parse = |s: &str| parsik::parse(&table, "foo", s).unwrap();

    assert!(parse("carfxerf").is_complete());
    assert!(parse("carfµerf").is_complete());
    assert_eq!(parse("carf"), ParseResult::Failed(Failure::new(4, "any character")));
    assert_eq!(parse("carfµ"), ParseResult::Failed(Failure::new(5, "\"erf\"")));
    assert_eq!(parse("carfx"), ParseResult::Failed(Failure::new(5, "\"erf\"")));
    assert_eq!(parse("berf"), ParseResult::Failed(Failure::new(1, "\"barf\"")));
}

#[test]
fn repeat() {
    let table = repeat::grammar();
    let parse = |s: &str| print(&table, "foo", s);

    assert_eq!(
        parse("abc"),
        "(foo, alt=0, \"abc\", (Terminal, \"a\"), (Terminal, \"b\"), (Terminal, \"c\"))"
    );
    assert_eq!(
        parse("ac"),
        "(foo, alt=0, \"ac\", (Terminal, \"a\"), (Terminal, \"c\"))"
    );

    assert_eq!(
        parse("xyyyyz"),
        "(foo, alt=1, \"xyyyyz\", (Terminal, \"x\"), (Repetition, \"yyyy\", (Terminal, \"y\"), (Terminal, \"y\"), (Terminal, \"y\"), (Terminal, \"y\")), (Terminal, \"z\"))"
    );

    assert_eq!(
        parse("xz"),
        "(foo, alt=1, \"xz\", (Terminal, \"x\"), (Repetition, \"\"), (Terminal, \"z\"))"
    );

    assert_eq!(
        parse("def"),
        "(foo, alt=2, \"def\", (Terminal, \"d\"), (Repetition, \"e\", (Terminal, \"e\")), (Terminal, \"f\"))"
    );

    assert_eq!(
        parse("deeeef"),
        "(foo, alt=2, \"deeeef\", (Terminal, \"d\"), (Repetition, \"eeee\", (Terminal, \"e\"), (Terminal, \"e\"), (Terminal, \"e\"), (Terminal, \"e\")), (Terminal, \"f\"))"
    );

    assert_eq!(
        parse("kx"),
        "(foo, alt=3, \"kx\", (Terminal, \"k\"), (Terminal, \"x\"))"
    );

    assert_eq!(
        parse("qr"),
        "(foo, alt=4, \"qr\", (Terminal, \"q\"), (Terminal, \"r\"))"
    );

    assert_eq!(failure(&table, "foo", "qs"), Failure::new(1, "\"r\""));
    assert_eq!(failure(&table, "foo", "kl"), Failure::new(1, "not \"l\""));
    assert_eq!(failure(&table, "foo", "df"), Failure::new(1, "\"e\""));
    assert_eq!(
        failure(&table, "foo", "ad").to_string(),
        "expected one of \"b\", \"c\" at position 1"
    );
}

#[test]
fn calculator() {
    let table = calculator::grammar();

    assert!(table.check("calculator").is_clean());

    assert_eq!(
        print(&table, "calculator", "1"),
        "(calculator, \"1\", (ws, \"\"), (expr, \"1\", (term, \"1\", (factor, alt=1, \"1\", (num, \"1\", (Terminal, \"1\"))), (Repetition, \"\")), (Repetition, \"\")), (ws, \"\"))"
    );

    let eval = |s: &str| -> Option<i64> {
        let input = Input::new(s);
        let tree = parsik::parse(&table, "calculator", s)
            .unwrap()
            .into_complete()
            .unwrap();
        calculator::evaluate(&tree, &input)
    };

    assert_eq!(eval("1+2*3"), Some(7));
    assert_eq!(eval("(1+2)*3"), Some(9));
    assert_eq!(eval(" 10 % 4 - 1 "), Some(1));
    assert_eq!(eval("10-2-3"), Some(5));
    assert_eq!(eval("((((7))))"), Some(7));
    assert_eq!(eval("8/0"), None);

    let failed = failure(&table, "calculator", "2*(3");
    assert_eq!(failed.position, 4);
    assert!(failed.expected.contains("\")\""));
    assert!(failed.expected.contains("\"+\""));
}

#[test]
fn identifiers() {
    let table = identifiers::grammar();

    let statement = |s: &str| -> (Option<u16>, String) {
        let tree = parsik::parse(&table, "statement", s)
            .unwrap()
            .into_complete()
            .unwrap();

        (
            tree.alternative,
            tree.children[0].rule_name().unwrap().to_owned(),
        )
    };

    assert_eq!(statement("while"), (Some(0), String::from("keyword")));
    assert_eq!(statement("whiles"), (Some(1), String::from("ident")));
    assert_eq!(statement("iffy"), (Some(1), String::from("ident")));
    assert_eq!(statement("_if"), (Some(1), String::from("ident")));

    assert!(parsik::parse(&table, "list", "α_1,_x,b9")
        .unwrap()
        .is_complete());

    assert_eq!(
        failure(&table, "list", "a,b,if"),
        Failure::new(4, "not keyword")
    );
}

#[test]
fn nested() {
    let table = nested::grammar();
    let s = "[1, [2,-3], []]";
    let input = Input::new(s);

    let tree = Parser::new(&table)
        .parse("value", &input)
        .unwrap()
        .into_complete()
        .unwrap();

    let numbers: Vec<&str> = tree
        .find_all("number")
        .into_iter()
        .map(|node| node.as_str(&input))
        .collect();

    assert_eq!(numbers, vec!["1", "2", "-3"]);
    assert_eq!(tree.find_all("list").len(), 1);

    let failed = failure(&table, "value", "[1,,2]");
    assert_eq!(failed.position, 3);
    assert!(failed.expected.contains("\"[\""));
}

#[test]
fn furthest_failure() {
    let table = RuleTable::new()
        .rule(
            "Start",
            Expression::choice([Expression::literal("ac"), Expression::literal("ax")]),
        )
        .unwrap();

    let failed = failure(&table, "Start", "ab");

    assert_eq!(failed.position, 1);
    assert_eq!(
        failed.to_string(),
        "expected one of \"ac\", \"ax\" at position 1"
    );
    assert_eq!(Input::new("ab").line_col(failed.position), (1, 2));
}

#[test]
fn ordered_choice_left_bias() {
    let table = RuleTable::new()
        .rule(
            "Start",
            Expression::choice([
                Expression::literal("ab"),
                Expression::seq([Expression::literal("a"), Expression::literal("b")]),
            ]),
        )
        .unwrap();

    assert_eq!(
        print(&table, "Start", "ab"),
        "(Start, alt=0, \"ab\", (Terminal, \"ab\"))"
    );
}

#[test]
fn digits_end_to_end() {
    let table = RuleTable::new()
        .rule(
            "Digits",
            Expression::one_or_more(Expression::class(CharClass::digit())),
        )
        .unwrap()
        .rule("Number", Expression::rule("Digits"))
        .unwrap();

    match parsik::parse(&table, "Number", "123").unwrap() {
        ParseResult::Complete(tree) => {
            assert_eq!(tree.rule_name(), Some("Number"));
            assert_eq!((tree.start, tree.end), (0, 3));

            let leaves = tree.leaves();
            assert_eq!(leaves.len(), 3);
            for (no, leaf) in leaves.iter().enumerate() {
                assert_eq!(leaf.label, Label::Terminal);
                assert_eq!((leaf.start, leaf.end), (no, no + 1));
            }
        }
        other => panic!("unexpected {:?}", other),
    }

    match parsik::parse(&table, "Number", "123abc").unwrap() {
        ParseResult::Partial { tree, consumed, .. } => {
            assert_eq!(consumed, 3);
            assert_eq!(tree.end, 3);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn undefined_rule() {
    let table = RuleTable::new()
        .rule(
            "Start",
            Expression::choice([Expression::literal("a"), Expression::rule("Missing")]),
        )
        .unwrap();

    // resolution is lazy: inputs which never reach the reference are fine
    assert!(parsik::parse(&table, "Start", "a").unwrap().is_complete());

    assert_eq!(
        parsik::parse(&table, "Start", "b"),
        Err(ParseError::UndefinedRule {
            name: String::from("Missing")
        })
    );
}

#[test]
fn optional_never_fails() {
    let table = RuleTable::new()
        .rule("S", Expression::optional(Expression::literal("x")))
        .unwrap();

    match parsik::parse(&table, "S", "y").unwrap() {
        ParseResult::Partial {
            tree,
            consumed,
            furthest,
        } => {
            assert_eq!(consumed, 0);
            assert!(tree.is_empty());
            assert!(tree.children.is_empty());
            assert_eq!(furthest, Some(Failure::new(0, "\"x\"")));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn predicates_leave_cache_intact() {
    let table = RuleTable::new()
        .rule("X", Expression::one_or_more(Expression::literal("a")))
        .unwrap();
    let input = Input::new("aaa");
    let mut cache = MemoCache::new();
    let mut session = Session::new(&table, &mut cache, ParseOptions::default());

    let peek = session
        .match_expression(&Expression::and(Expression::rule("X")), input.cursor())
        .unwrap();
    let direct = session
        .match_expression(&Expression::rule("X"), input.cursor())
        .unwrap();

    let fresh = match_expression(
        &Expression::rule("X"),
        input.cursor(),
        &table,
        &mut MemoCache::new(),
    )
    .unwrap();

    assert_eq!(peek, MatchOutcome::Success { end: 0, node: None });
    assert_eq!(direct, fresh);
    assert_eq!(direct.end(), Some(3));
}

#[test]
fn memoization_transparent_on_shared_rules() {
    let table = calculator::grammar();
    let memo = Parser::new(&table);
    let plain = Parser::new(&table).with_options(ParseOptions::default().with_memoize(false));

    for s in ["1+2*3", " ( 4 % 3 ) * (2 - 1)", "2*(3", "1+", "((1)", ""] {
        let input = Input::new(s);
        let mut cache = MemoCache::new();

        let with_cache = memo.parse_with_cache("calculator", &input, &mut cache).unwrap();
        let without = plain.parse("calculator", &input).unwrap();

        assert_eq!(with_cache, without, "input {:?}", s);
    }

    // factor is tried twice at the same position inside parentheses
    let mut cache = MemoCache::new();
    memo.parse_with_cache("calculator", &Input::new("(1)"), &mut cache)
        .unwrap();
    assert!(cache.hits() > 0);
}

// expr <- expr "+" num / num
fn left_recursive() -> RuleTable {
    RuleTable::new()
        .rule(
            "expr",
            Expression::choice([
                Expression::seq([
                    Expression::rule("expr"),
                    Expression::literal("+"),
                    Expression::rule("num"),
                ]),
                Expression::rule("num"),
            ]),
        )
        .unwrap()
        .rule("num", Expression::class(CharClass::digit()))
        .unwrap()
}

#[test]
fn left_recursion_is_reported() {
    let table = left_recursive();
    let parser = Parser::new(&table).with_options(ParseOptions::default().with_max_depth(64));

    match parser.parse_str("expr", "1+1") {
        Err(err) => {
            assert!(err.is_resource_exhaustion());
            assert_eq!(
                err,
                ParseError::RecursionLimit {
                    limit: 64,
                    position: 0
                }
            );
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn default_depth_limit() {
    let table = left_recursive();

    match parsik::parse(&table, "expr", "1+1") {
        Err(err) => assert_eq!(
            err,
            ParseError::RecursionLimit {
                limit: DEFAULT_MAX_DEPTH,
                position: 0
            }
        ),
        other => panic!("unexpected {:?}", other),
    }

    let table = calculator::grammar();
    let nested = |depth: usize| format!("{}7{}", "(".repeat(depth), ")".repeat(depth));

    let s = nested(20);
    let input = Input::new(&s);
    let tree = parsik::parse(&table, "calculator", &s)
        .unwrap()
        .into_complete()
        .unwrap();
    assert_eq!(calculator::evaluate(&tree, &input), Some(7));

    for depth in [100, 1000] {
        match parsik::parse(&table, "calculator", &nested(depth)) {
            Err(err) => assert!(err.is_resource_exhaustion(), "{}", err),
            other => panic!("depth {} should be rejected: {:?}", depth, other),
        }
    }
}

#[test]
fn parallel_sessions() {
    let table = calculator::grammar();
    let inputs = ["1+2", "3*(4-1)", "7 % 4", "9/", "((2))"];

    let expected: Vec<ParseResult> = inputs
        .iter()
        .map(|s| parsik::parse(&table, "calculator", s).unwrap())
        .collect();

    let results: Vec<ParseResult> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|s| {
                let table = &table;
                scope.spawn(move || parsik::parse(table, "calculator", s).unwrap())
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(results, expected);
}
