use parsik::{Expression, RuleTable};

// foo <- "barf" " " "darf" / carf
// carf <- "carf" . erf
// erf <- "erf"
pub fn grammar() -> RuleTable {
    RuleTable::new()
        .rule(
            "foo",
            Expression::choice([
                Expression::seq([
                    Expression::literal("barf"),
                    Expression::literal(" "),
                    Expression::literal("darf"),
                ]),
                Expression::rule("carf"),
            ]),
        )
        .unwrap()
        .rule(
            "carf",
            Expression::seq([
                Expression::literal("carf"),
                Expression::any(),
                Expression::rule("erf"),
            ]),
        )
        .unwrap()
        .rule("erf", Expression::literal("erf"))
        .unwrap()
}
