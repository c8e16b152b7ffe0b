use parsik::{CharClass, Expression, GrammarError, Input, Node, ParseResult, RuleTable};

// calculator <- ws expr ws EOI
// expr <- term (ws ("+" / "-") ws term)*
// term <- factor (ws ("*" / "/" / "%") ws factor)*
// factor <- "(" ws expr ws ")" / num
// num <- re#[0-9]+#
// ws <- WHITESPACE
fn calculator() -> Result<RuleTable, GrammarError> {
    let lit = Expression::literal;
    let rule = Expression::rule;

    let tail = |ops: Expression, operand: &str| {
        Expression::zero_or_more(Expression::seq([
            rule("ws"),
            ops,
            rule("ws"),
            Expression::rule(operand),
        ]))
    };

    RuleTable::new()
        .rule(
            "calculator",
            Expression::seq([rule("ws"), rule("expr"), rule("ws"), Expression::end_of_input()]),
        )?
        .rule(
            "expr",
            Expression::seq([
                rule("term"),
                tail(Expression::choice([lit("+"), lit("-")]), "term"),
            ]),
        )?
        .rule(
            "term",
            Expression::seq([
                rule("factor"),
                tail(Expression::choice([lit("*"), lit("/"), lit("%")]), "factor"),
            ]),
        )?
        .rule(
            "factor",
            Expression::choice([
                Expression::seq([lit("("), rule("ws"), rule("expr"), rule("ws"), lit(")")]),
                rule("num"),
            ]),
        )?
        .rule("num", Expression::regex("[0-9]+")?)?
        .rule(
            "ws",
            Expression::zero_or_more(Expression::class(CharClass::whitespace())),
        )
}

fn walk(node: &Node, input: &Input) -> Result<u64, String> {
    match node.rule_name() {
        Some("calculator") => walk(&node.children[1], input),
        Some("expr") | Some("term") => {
            let mut value = walk(&node.children[0], input)?;

            for op in &node.children[1].children {
                let right = walk(&op.children[3], input)?;

                value = match op.children[1].as_str(input) {
                    "+" => value.checked_add(right),
                    "-" => value.checked_sub(right),
                    "*" => value.checked_mul(right),
                    "/" => value.checked_div(right),
                    "%" => value.checked_rem(right),
                    _ => unreachable!(),
                }
                .ok_or_else(|| format!("arithmetic error at offset {}", op.start + 1))?;
            }

            Ok(value)
        }
        Some("factor") => {
            if node.alternative == Some(0) {
                walk(&node.children[2], input)
            } else {
                walk(&node.children[0], input)
            }
        }
        Some("num") => node
            .as_str(input)
            .parse()
            .map_err(|e| format!("{}: {}", node.as_str(input), e)),
        _ => unreachable!(),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage {} EXPRESSION", &args[0]);
        std::process::exit(2);
    }

    let table = match calculator() {
        Ok(table) => table,
        Err(e) => {
            eprintln!("invalid grammar: {}", e);
            std::process::exit(1);
        }
    };

    let input = Input::new(&args[1]);

    println!("parsing: {}", input.text());

    match parsik::Parser::new(&table).parse("calculator", &input) {
        Ok(ParseResult::Complete(node)) => match walk(&node, &input) {
            Ok(value) => println!("result: {}", value),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        Ok(result) => {
            if let Some(failure) = result.failure() {
                let (line, col) = input.line_col(failure.position);
                eprintln!("parser error at {}:{}: {}", line, col, failure);
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
