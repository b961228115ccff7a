//! Operator implementations.
//!
//! Each operator receives the raw argument list and chooses which arguments to
//! evaluate. Nothing is evaluated before dispatch.

use crate::engine::context::EvalContext;
use crate::engine::registry::{Operator, OperatorCall, Qualifier};
use crate::engine::splitter::Invocation;
use crate::error::PromptError;
use crate::template::escape::unescape;

pub mod conditional;
pub mod selection;
pub mod stateful;
pub mod text;

pub use conditional::Comparison;

/// Run the operator named by `call` over the invocation's raw arguments.
pub fn dispatch(
    ctx: &mut EvalContext<'_>,
    call: &OperatorCall<'_>,
    invocation: &Invocation<'_>,
) -> Result<String, PromptError> {
    let args = invocation.args.as_slice();
    let scope = match call.qualifier {
        Qualifier::Scope(scope) => scope,
        _ => "",
    };
    match call.operator {
        Operator::Equals => conditional::equals(ctx, args, false),
        Operator::NotEquals => conditional::equals(ctx, args, true),
        Operator::Greater => conditional::compare(ctx, Comparison::Greater, args),
        Operator::Less => conditional::compare(ctx, Comparison::Less, args),
        Operator::GreaterOrEqual => conditional::compare(ctx, Comparison::GreaterOrEqual, args),
        Operator::LessOrEqual => conditional::compare(ctx, Comparison::LessOrEqual, args),
        Operator::In => conditional::membership(ctx, args, false),
        Operator::NotIn => conditional::membership(ctx, args, true),
        Operator::Has => conditional::contains_all(ctx, args, false),
        Operator::NotHas => conditional::contains_all(ctx, args, true),
        Operator::Error => conditional::error(ctx, args),
        Operator::Case => conditional::case(ctx, args),
        Operator::Coalesce => conditional::coalesce(ctx, args),
        Operator::Optional => conditional::optional(ctx, args),
        Operator::OneOf => selection::one_of(ctx, args),
        Operator::Indirection => selection::indirection(ctx, args[0]),
        Operator::Except => selection::except(ctx, args),
        Operator::Index => {
            let position = match call.qualifier {
                Qualifier::Position(position) => position,
                _ => 0,
            };
            selection::index(ctx, position, args)
        }
        Operator::Maybe => {
            let chance = match call.qualifier {
                Qualifier::Chance(chance) => Some(chance),
                _ => None,
            };
            selection::maybe(ctx, chance, args)
        }
        Operator::Static => stateful::static_value(ctx, scope, args[0]),
        Operator::Exclusive => stateful::exclusive(ctx, scope, args[0]),
        Operator::Track => stateful::track(ctx, args[0], args[1]),
        Operator::Store => stateful::store(ctx, scope, args[0], args[1]),
        Operator::Literal => Ok(text::literal(invocation.body)),
        Operator::Comment => Ok(String::new()),
        Operator::Ignore => text::ignore(ctx, invocation.body),
        Operator::Repeat => text::repeat(ctx, args[0], args[1]),
    }
}

/// Split a comma-separated list, trimming items and dropping empty ones.
pub(crate) fn comma_list(text: &str) -> Vec<&str> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Text as written by the user, entities restored, for comparing or parsing.
pub(crate) fn plain(text: &str) -> String {
    unescape(text.trim())
}

/// [`comma_list`] over escaped text, each item restored. An escaped comma
/// stays inside its item.
pub(crate) fn plain_list(text: &str) -> Vec<String> {
    comma_list(text).into_iter().map(plain).collect()
}
