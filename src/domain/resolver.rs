use crate::domain::document::ResourceExpr;
use crate::domain::error::DocumentError;
use crate::domain::stack::Stack;

/// Resolve a statement `Resource` entry to a concrete address.
///
/// Literals pass through. A `Ref` resolves first against the template's
/// declared parameters (deployed value), then against its declared resources
/// (physical id). Other intrinsics yield `Ok(None)`. A `Ref` that resolves to
/// nothing is `DocumentError::UnresolvedReference`, which callers treat as
/// recoverable.
pub fn resolve(stack: &Stack, expr: &ResourceExpr) -> Result<Option<String>, DocumentError> {
    let target = match expr {
        ResourceExpr::Literal(address) => return Ok(Some(address.clone())),
        ResourceExpr::Other(_) => return Ok(None),
        ResourceExpr::Ref { target } => target,
    };

    let template = stack.template()?;
    let resolved = if template.parameters.contains_key(target) {
        stack.get_parameter_value(target)?
    } else if template.resources.contains_key(target) {
        stack.get_physical_id(target)?
    } else {
        None
    };

    resolved
        .map(|value| Some(value.to_string()))
        .ok_or_else(|| DocumentError::UnresolvedReference {
            stack: stack.name().to_string(),
            reference: target.clone(),
        })
}
