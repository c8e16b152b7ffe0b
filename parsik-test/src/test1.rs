use parsik::{Expression, RuleTable};

pub fn grammar() -> RuleTable {
    RuleTable::new()
        .rule("foo", Expression::literal("barf"))
        .unwrap()
}
