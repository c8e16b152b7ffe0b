use parsik::{CharClass, Expression, RuleTable};

// statement <- keyword / ident
// keyword <- ("if" / "else" / "while") !XID_CONTINUE
// ident <- !keyword XID_IDENTIFIER
// list <- ident ("," ident)* EOI
pub fn grammar() -> RuleTable {
    let lit = Expression::literal;
    let rule = Expression::rule;

    RuleTable::new()
        .rule("statement", Expression::choice([rule("keyword"), rule("ident")]))
        .unwrap()
        .rule(
            "keyword",
            Expression::seq([
                Expression::choice([lit("if"), lit("else"), lit("while")]),
                Expression::not(Expression::class(CharClass::xid_continue())),
            ]),
        )
        .unwrap()
        .rule(
            "ident",
            Expression::seq([Expression::not(rule("keyword")), Expression::xid_identifier()]),
        )
        .unwrap()
        .rule(
            "list",
            Expression::seq([
                rule("ident"),
                Expression::zero_or_more(Expression::seq([lit(","), rule("ident")])),
                Expression::end_of_input(),
            ]),
        )
        .unwrap()
}
