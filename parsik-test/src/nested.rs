use parsik::{CharClass, Expression, RuleTable};

// value <- number / list
// list <- "[" ws (value (ws "," ws value)*)? ws "]"
// number <- re#-?[0-9]+#
// ws <- WHITESPACE
pub fn grammar() -> RuleTable {
    let lit = Expression::literal;
    let rule = Expression::rule;

    RuleTable::new()
        .rule("value", Expression::choice([rule("number"), rule("list")]))
        .unwrap()
        .rule(
            "list",
            Expression::seq([
                lit("["),
                rule("ws"),
                Expression::optional(Expression::seq([
                    rule("value"),
                    Expression::zero_or_more(Expression::seq([
                        rule("ws"),
                        lit(","),
                        rule("ws"),
                        rule("value"),
                    ])),
                ])),
                rule("ws"),
                lit("]"),
            ]),
        )
        .unwrap()
        .rule("number", Expression::regex("-?[0-9]+").unwrap())
        .unwrap()
        .rule(
            "ws",
            Expression::zero_or_more(Expression::class(CharClass::whitespace())),
        )
        .unwrap()
}
