pub(crate) mod check;
pub(crate) mod state;

use itf_trace::Expr;

/// Kind name plus element count for containers, e.g. `Map(2)`.
pub(crate) fn describe_expr(expr: &Expr) -> String {
    match expr {
        Expr::List(items) => format!("List({})", items.len()),
        Expr::Map(fields) => format!("Map({})", fields.len()),
        other => other.type_name().to_string(),
    }
}
