//! Operator registry
//!
//! Every accepted operator token maps to exactly one [`Operator`]. Aliases are a
//! pure renaming: arity and behavior belong to the operator, never the alias.
//! Tokens are matched case-insensitively.

use crate::error::PromptError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    OneOf,
    Static,
    Exclusive,
    Literal,
    Maybe,
    Error,
    Coalesce,
    Repeat,
    Track,
    Optional,
    In,
    NotIn,
    Has,
    NotHas,
    Case,
    Indirection,
    Except,
    Comment,
    Ignore,
    Store,
    Index,
}

/// Accepted argument counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }

    pub fn describe(&self) -> String {
        match self.max {
            Some(max) if max == self.min => max.to_string(),
            Some(max) => format!("{}-{}", self.min, max),
            None => format!("at least {}", self.min),
        }
    }
}

/// Token → operator table.
const ALIASES: &[(&str, Operator)] = &[
    ("equals", Operator::Equals),
    ("==", Operator::Equals),
    ("=", Operator::Equals),
    ("eq", Operator::Equals),
    ("not_equals", Operator::NotEquals),
    ("!=", Operator::NotEquals),
    ("neq", Operator::NotEquals),
    ("<>", Operator::NotEquals),
    (">", Operator::Greater),
    ("gt", Operator::Greater),
    ("<", Operator::Less),
    ("lt", Operator::Less),
    (">=", Operator::GreaterOrEqual),
    ("gte", Operator::GreaterOrEqual),
    ("<=", Operator::LessOrEqual),
    ("lte", Operator::LessOrEqual),
    ("one_of", Operator::OneOf),
    ("choice", Operator::OneOf),
    ("select", Operator::OneOf),
    ("any", Operator::OneOf),
    ("any_of", Operator::OneOf),
    ("pick_one", Operator::OneOf),
    ("static", Operator::Static),
    ("$", Operator::Static),
    ("exclusive", Operator::Exclusive),
    ("@", Operator::Exclusive),
    ("literal", Operator::Literal),
    ("#", Operator::Literal),
    ("maybe", Operator::Maybe),
    ("?", Operator::Maybe),
    ("error", Operator::Error),
    ("coalesce", Operator::Coalesce),
    ("!", Operator::Coalesce),
    ("repeat", Operator::Repeat),
    ("x", Operator::Repeat),
    ("track", Operator::Track),
    ("tk", Operator::Track),
    ("optional", Operator::Optional),
    ("opt", Operator::Optional),
    ("in", Operator::In),
    ("not_in", Operator::NotIn),
    ("has", Operator::Has),
    ("not_has", Operator::NotHas),
    ("case", Operator::Case),
    ("*", Operator::Indirection),
    ("indirect", Operator::Indirection),
    ("except", Operator::Except),
    ("^", Operator::Except),
    ("comment", Operator::Comment),
    ("//", Operator::Comment),
    ("ignore", Operator::Ignore),
    ("ign", Operator::Ignore),
    ("empty", Operator::Ignore),
    ("set", Operator::Store),
    ("store", Operator::Store),
    (":=", Operator::Store),
];

impl Operator {
    pub const ALL: [Operator; 27] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::Greater,
        Operator::Less,
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::OneOf,
        Operator::Static,
        Operator::Exclusive,
        Operator::Literal,
        Operator::Maybe,
        Operator::Error,
        Operator::Coalesce,
        Operator::Repeat,
        Operator::Track,
        Operator::Optional,
        Operator::In,
        Operator::NotIn,
        Operator::Has,
        Operator::NotHas,
        Operator::Case,
        Operator::Indirection,
        Operator::Except,
        Operator::Comment,
        Operator::Ignore,
        Operator::Store,
        Operator::Index,
    ];

    /// Look up a plain token in the alias table.
    pub fn from_alias(token: &str) -> Option<Operator> {
        let token = token.to_ascii_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == token)
            .map(|(_, op)| *op)
    }

    /// All tokens accepted for this operator.
    pub fn aliases(self) -> Vec<&'static str> {
        ALIASES
            .iter()
            .filter(|(_, op)| *op == self)
            .map(|(alias, _)| *alias)
            .collect()
    }

    /// Operators that receive their body unsplit.
    pub fn takes_raw_body(self) -> bool {
        matches!(self, Operator::Literal | Operator::Comment | Operator::Ignore)
    }

    pub fn arity(self) -> Arity {
        match self {
            Operator::Equals
            | Operator::NotEquals
            | Operator::Greater
            | Operator::Less
            | Operator::GreaterOrEqual
            | Operator::LessOrEqual
            | Operator::In
            | Operator::NotIn
            | Operator::Has
            | Operator::NotHas => Arity::between(2, 4),
            Operator::OneOf => Arity::at_least(1),
            Operator::Static | Operator::Exclusive | Operator::Indirection => Arity::between(1, 1),
            Operator::Literal | Operator::Comment | Operator::Ignore => Arity::at_least(0),
            Operator::Maybe => Arity::between(1, 2),
            Operator::Error | Operator::Repeat | Operator::Track | Operator::Store => {
                Arity::between(2, 2)
            }
            Operator::Coalesce => Arity::at_least(2),
            Operator::Optional | Operator::Index => Arity::between(1, 2),
            Operator::Case => Arity::between(1, 4),
            Operator::Except => Arity::between(2, 3),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Greater => "greater",
            Operator::Less => "less",
            Operator::GreaterOrEqual => "greater_or_equal",
            Operator::LessOrEqual => "less_or_equal",
            Operator::OneOf => "one_of",
            Operator::Static => "static",
            Operator::Exclusive => "exclusive",
            Operator::Literal => "literal",
            Operator::Maybe => "maybe",
            Operator::Error => "error",
            Operator::Coalesce => "coalesce",
            Operator::Repeat => "repeat",
            Operator::Track => "track",
            Operator::Optional => "optional",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Has => "has",
            Operator::NotHas => "not_has",
            Operator::Case => "case",
            Operator::Indirection => "indirection",
            Operator::Except => "except",
            Operator::Comment => "comment",
            Operator::Ignore => "ignore",
            Operator::Store => "store",
            Operator::Index => "index",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Operator::Equals => "key|value|true|false: branch on string equality",
            Operator::NotEquals => "key|value|true|false: branch on string inequality",
            Operator::Greater => "key|number|true|false: branch on key > number",
            Operator::Less => "key|number|true|false: branch on key < number",
            Operator::GreaterOrEqual => "key|number|true|false: branch on key >= number",
            Operator::LessOrEqual => "key|number|true|false: branch on key <= number",
            Operator::OneOf => "a|b|...: pick one option",
            Operator::Static => "key: same value for every reference in one output",
            Operator::Exclusive => "key: a value not drawn before in this output",
            Operator::Literal => "text: verbatim, never parsed",
            Operator::Maybe => "chance|text: text with chance percent, else empty",
            Operator::Error => "key|value: fail when key equals value",
            Operator::Coalesce => "key|...|default: first non-empty key value",
            Operator::Repeat => "count|text: text evaluated count times",
            Operator::Track => "name|text: record resolved text under name",
            Operator::Optional => "key|default: key value when present, else default",
            Operator::In => "key|a,b|true|false: branch on list membership",
            Operator::NotIn => "key|a,b|true|false: branch on list non-membership",
            Operator::Has => "key|a,b|true|false: branch when all substrings occur",
            Operator::NotHas => "key|a,b|true|false: branch when not all substrings occur",
            Operator::Case => "key|prefix|default|a,b: value of prefix+match",
            Operator::Indirection => "key-expression: look up the resolved key name",
            Operator::Except => "key|a,b|default: pick a value not in the list",
            Operator::Comment => "text: ignored",
            Operator::Ignore => "text: evaluated for side effects, output dropped",
            Operator::Store => "key|text: fix a static value",
            Operator::Index => "key|default (as N:key): N-th value of key",
        }
    }
}

/// Extra parameter carried in the operator token itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Qualifier<'a> {
    None,
    /// Namespace for static / exclusive / store keys (`scope$`, `scope@`, `scope,set`).
    Scope(&'a str),
    /// Position for the index operator (`2:key`).
    Position(usize),
    /// Percent chance for maybe (`30?`).
    Chance(f64),
}

/// A token resolved to its operator.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorCall<'a> {
    pub operator: Operator,
    pub qualifier: Qualifier<'a>,
}

impl<'a> OperatorCall<'a> {
    fn plain(operator: Operator) -> Self {
        Self {
            operator,
            qualifier: Qualifier::None,
        }
    }
}

/// Resolve an operator token, including scoped and numeric forms.
pub fn resolve(token: &str) -> Result<OperatorCall<'_>, PromptError> {
    if let Some(operator) = Operator::from_alias(token) {
        return Ok(OperatorCall::plain(operator));
    }
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        let position = token
            .parse()
            .map_err(|_| PromptError::UnrecognizedOperator(token.to_string()))?;
        return Ok(OperatorCall {
            operator: Operator::Index,
            qualifier: Qualifier::Position(position),
        });
    }
    if let Some(scope) = token.strip_suffix('$') {
        return Ok(OperatorCall {
            operator: Operator::Static,
            qualifier: Qualifier::Scope(scope),
        });
    }
    if let Some(scope) = token.strip_suffix('@') {
        return Ok(OperatorCall {
            operator: Operator::Exclusive,
            qualifier: Qualifier::Scope(scope),
        });
    }
    if let Some(chance) = token.strip_suffix('?') {
        if let Ok(chance) = chance.trim().parse::<f64>() {
            return Ok(OperatorCall {
                operator: Operator::Maybe,
                qualifier: Qualifier::Chance(chance),
            });
        }
    }
    if let Some((scope, op)) = token.rsplit_once(',') {
        if Operator::from_alias(op) == Some(Operator::Store) {
            return Ok(OperatorCall {
                operator: Operator::Store,
                qualifier: Qualifier::Scope(scope),
            });
        }
    }
    Err(PromptError::UnrecognizedOperator(token.to_string()))
}
