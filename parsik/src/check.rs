use crate::expr::Expression;
use crate::rules::RuleTable;
use log::warn;
use std::collections::BTreeSet;

/// A reference to a rule which the table does not define. `from` is the
/// referencing rule, or `None` for the start rule itself.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct UndefinedReference {
    pub from: Option<String>,
    pub name: String,
}

/// Findings of [`RuleTable::check`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrammarReport {
    pub undefined: Vec<UndefinedReference>,
    /// Rules which cannot be reached from the start rule.
    pub unreachable: Vec<String>,
}

impl GrammarReport {
    pub fn is_clean(&self) -> bool {
        self.undefined.is_empty() && self.unreachable.is_empty()
    }
}

impl RuleTable {
    /// Static check of the rule graph from `start`. Parsing does not depend on
    /// this; undefined rules are still reported lazily when they are reached.
    pub fn check(&self, start: &str) -> GrammarReport {
        let mut report = GrammarReport::default();
        let mut undefined = BTreeSet::new();
        let mut used = BTreeSet::new();
        let mut pending = vec![(None, start.to_owned())];

        while let Some((from, name)) = pending.pop() {
            if used.contains(&name) {
                continue;
            }

            match self.resolve(&name) {
                Ok(expr) => {
                    used.insert(name.clone());

                    let mut refs = Vec::new();
                    collect_references(expr, &mut refs);

                    for referenced in refs {
                        pending.push((Some(name.clone()), referenced.to_owned()));
                    }
                }
                Err(_) => {
                    undefined.insert(UndefinedReference { from, name });
                }
            }
        }

        report.undefined = undefined.into_iter().collect();

        for def in self.definitions() {
            if !used.contains(&*def.name) {
                warn!("rule {} is not used anywhere", def.name);
                report.unreachable.push(def.name.to_string());
            }
        }

        for reference in &report.undefined {
            match &reference.from {
                Some(from) => warn!("rule {} refers to undefined rule {}", from, reference.name),
                None => warn!("start rule {} is not defined", reference.name),
            }
        }

        report
    }
}

fn collect_references<'e>(expr: &'e Expression, refs: &mut Vec<&'e str>) {
    match expr {
        Expression::RuleReference(name) => {
            refs.push(name);
        }
        Expression::Sequence(list) | Expression::OrderedChoice(list) => {
            for expr in list {
                collect_references(expr, refs);
            }
        }
        Expression::AndPredicate(expr)
        | Expression::NotPredicate(expr)
        | Expression::Optional(expr)
        | Expression::ZeroOrMore(expr)
        | Expression::OneOrMore(expr) => {
            collect_references(expr.as_ref(), refs);
        }
        Expression::Any
        | Expression::EndOfInput
        | Expression::Literal(_)
        | Expression::CharClass(_)
        | Expression::Regex(_) => (),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_undefined_and_unreachable() {
        let table = RuleTable::new()
            .rule(
                "start",
                Expression::choice([Expression::rule("a"), Expression::rule("ghost")]),
            )
            .unwrap()
            .rule(
                "a",
                Expression::seq([
                    Expression::literal("a"),
                    Expression::optional(Expression::rule("a")),
                ]),
            )
            .unwrap()
            .rule("orphan", Expression::literal("o"))
            .unwrap();

        let report = table.check("start");

        assert_eq!(
            report.undefined,
            vec![UndefinedReference {
                from: Some(String::from("start")),
                name: String::from("ghost"),
            }]
        );
        assert_eq!(report.unreachable, vec![String::from("orphan")]);
        assert!(!report.is_clean());
    }

    #[test]
    fn missing_start() {
        let table = RuleTable::new().rule("a", Expression::any()).unwrap();
        let report = table.check("b");

        assert_eq!(report.undefined[0].from, None);
        assert_eq!(report.unreachable, vec![String::from("a")]);
    }

    #[test]
    fn clean_grammar() {
        let table = RuleTable::new()
            .rule("start", Expression::rule("digit"))
            .unwrap()
            .rule("digit", Expression::regex("[0-9]").unwrap())
            .unwrap();

        assert!(table.check("start").is_clean());
    }
}
