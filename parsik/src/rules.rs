use crate::error::{GrammarError, ParseError};
use crate::expr::Expression;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Index of a definition within its [`RuleTable`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct RuleId(pub(crate) usize);

#[derive(Clone, Debug)]
pub struct Definition {
    pub name: Arc<str>,
    pub expression: Expression,
}

/// The rules of a grammar, by name.
///
/// A table is built completely before parsing. Parsing borrows it immutably,
/// so it cannot change while a parse is running, and one table can serve any
/// number of concurrent parses.
///
/// Rules must not be left recursive, directly or through other rules, unless
/// input is consumed first: a left-recursive rule recurses until the session
/// hits its depth limit and fails with
/// [`ParseError::RecursionLimit`](crate::ParseError::RecursionLimit).
#[derive(Clone, Debug, Default)]
pub struct RuleTable {
    lookup: BTreeMap<String, usize>,
    definitions: Vec<Definition>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. References to other rules may name rules which are
    /// defined later, or never; they are resolved during parsing.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        expression: Expression,
    ) -> Result<(), GrammarError> {
        let name = name.into();

        if name.is_empty() {
            return Err(GrammarError::EmptyName);
        }

        if self.lookup.contains_key(&name) {
            return Err(GrammarError::DuplicateRule(name));
        }

        self.lookup.insert(name.clone(), self.definitions.len());

        self.definitions.push(Definition {
            name: Arc::from(name),
            expression,
        });

        Ok(())
    }

    /// Builder form of [`define`](Self::define).
    pub fn rule(
        mut self,
        name: impl Into<String>,
        expression: Expression,
    ) -> Result<Self, GrammarError> {
        self.define(name, expression)?;

        Ok(self)
    }

    /// The definition of a rule.
    pub fn resolve(&self, name: &str) -> Result<&Expression, ParseError> {
        self.resolve_id(name)
            .map(|id| &self.definitions[id.0].expression)
    }

    pub(crate) fn resolve_id(&self, name: &str) -> Result<RuleId, ParseError> {
        self.lookup
            .get(name)
            .map(|no| RuleId(*no))
            .ok_or_else(|| ParseError::UndefinedRule {
                name: name.to_owned(),
            })
    }

    pub(crate) fn definition(&self, id: RuleId) -> &Definition {
        &self.definitions[id.0]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions in the order they were added.
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter()
    }
}
