use parsik::{CharClass, Expression, Input, Node, RuleTable};

// calculator <- ws expr ws EOI
// expr <- term (ws add_op ws term)*
// term <- factor (ws mul_op ws factor)*
// factor <- "(" ws expr ws ")" / num
// num <- [0-9]+
// add_op <- "+" / "-"
// mul_op <- "*" / "/" / "%"
// ws <- [ \t]*
pub fn grammar() -> RuleTable {
    let lit = Expression::literal;
    let rule = Expression::rule;

    RuleTable::new()
        .rule(
            "calculator",
            Expression::seq([rule("ws"), rule("expr"), rule("ws"), Expression::end_of_input()]),
        )
        .unwrap()
        .rule(
            "expr",
            Expression::seq([
                rule("term"),
                Expression::zero_or_more(Expression::seq([
                    rule("ws"),
                    rule("add_op"),
                    rule("ws"),
                    rule("term"),
                ])),
            ]),
        )
        .unwrap()
        .rule(
            "term",
            Expression::seq([
                rule("factor"),
                Expression::zero_or_more(Expression::seq([
                    rule("ws"),
                    rule("mul_op"),
                    rule("ws"),
                    rule("factor"),
                ])),
            ]),
        )
        .unwrap()
        .rule(
            "factor",
            Expression::choice([
                Expression::seq([lit("("), rule("ws"), rule("expr"), rule("ws"), lit(")")]),
                rule("num"),
            ]),
        )
        .unwrap()
        .rule(
            "num",
            Expression::one_or_more(Expression::class(CharClass::digit())),
        )
        .unwrap()
        .rule("add_op", Expression::choice([lit("+"), lit("-")]))
        .unwrap()
        .rule("mul_op", Expression::choice([lit("*"), lit("/"), lit("%")]))
        .unwrap()
        .rule(
            "ws",
            Expression::zero_or_more(Expression::class(CharClass::one_of(" \t"))),
        )
        .unwrap()
}

/// Evaluate a tree produced from the `calculator` rule. Division by zero
/// yields `None`.
pub fn evaluate(node: &Node, input: &Input) -> Option<i64> {
    match node.rule_name() {
        Some("calculator") => evaluate(node.find_all("expr")[0], input),
        Some("expr") | Some("term") => {
            let mut value = evaluate(&node.children[0], input)?;

            for op in &node.children[1].children {
                let right = evaluate(&op.children[3], input)?;

                value = match op.children[1].as_str(input) {
                    "+" => value.checked_add(right)?,
                    "-" => value.checked_sub(right)?,
                    "*" => value.checked_mul(right)?,
                    "/" => value.checked_div(right)?,
                    "%" => value.checked_rem(right)?,
                    _ => unreachable!(),
                };
            }

            Some(value)
        }
        Some("factor") => {
            if node.alternative == Some(0) {
                evaluate(&node.children[2], input)
            } else {
                evaluate(&node.children[0], input)
            }
        }
        Some("num") => node.as_str(input).parse().ok(),
        _ => unreachable!(),
    }
}
