use parsik::{Expression, RuleTable};

// foo <- "a" "b"? "c"
//      / "x" "y"* "z"
//      / "d" "e"+ "f"
//      / "k" !"l" .
//      / "q" &"r" .
pub fn grammar() -> RuleTable {
    let lit = Expression::literal;

    RuleTable::new()
        .rule(
            "foo",
            Expression::choice([
                Expression::seq([lit("a"), Expression::optional(lit("b")), lit("c")]),
                Expression::seq([lit("x"), Expression::zero_or_more(lit("y")), lit("z")]),
                Expression::seq([lit("d"), Expression::one_or_more(lit("e")), lit("f")]),
                Expression::seq([lit("k"), Expression::not(lit("l")), Expression::any()]),
                Expression::seq([lit("q"), Expression::and(lit("r")), Expression::any()]),
            ]),
        )
        .unwrap()
}
