use crate::environment::prelude::Expression;

use super::{apply, error::RuntimeFault};

/// Rebuilds a literal list shape as nested applications of `join`.
///
/// Atoms come back untouched. A list has every child transformed first,
/// left to right, and is then replaced by `(join child...)`, so a
/// `cons`-like join yields pairs while an adding join yields a sum.
pub fn quote_transform(raw: &Expression, join: &Expression) -> Result<Expression, RuntimeFault> {
    match raw {
        Expression::List(children) => {
            let children = children.iter()
                .map(|child| quote_transform(child, join))
                .collect::<Result<Vec<Expression>, RuntimeFault>>()?;

            apply(join, children)
        },
        atom => Ok(atom.clone()),
    }
}
