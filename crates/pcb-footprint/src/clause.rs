//! Argument extraction shared by the record decoders.
//!
//! A clause is a list shaped `(keyword arg...)`; positional arguments start
//! at index 1.

use pcb_sexpr::Sexpr;

use crate::error::{FieldContext, Result};
use crate::types::Point2D;

/// Items of a list node, or an empty slice for atoms.
pub(crate) fn list_items(node: &Sexpr) -> &[Sexpr] {
    node.as_list().unwrap_or_default()
}

/// Sub-clauses of a record after its leading keyword, paired with their own
/// keyword. Atoms and lists without a keyword are skipped.
pub(crate) fn sub_clauses(node: &Sexpr) -> impl Iterator<Item = (&str, &Sexpr)> {
    list_items(node)
        .iter()
        .skip(1)
        .filter_map(|child| Some((child.head()?, child)))
}

/// `(keyword x y ...)` as a point; trailing arguments such as rotation are ignored.
pub(crate) fn point_arg(
    clause: &Sexpr,
    record: &'static str,
    field: &'static str,
) -> Result<Point2D> {
    let x = clause
        .child(1)
        .and_then(Sexpr::coerce_f64)
        .field(record, field)?;
    let y = clause
        .child(2)
        .and_then(Sexpr::coerce_f64)
        .field(record, field)?;
    Ok(Point2D { x, y })
}

/// `(keyword value)` as a float.
pub(crate) fn float_arg(clause: &Sexpr, record: &'static str, field: &'static str) -> Result<f64> {
    clause
        .child(1)
        .and_then(Sexpr::coerce_f64)
        .field(record, field)
}

/// `(keyword value)` as a string.
pub(crate) fn string_arg(
    clause: &Sexpr,
    record: &'static str,
    field: &'static str,
) -> Result<String> {
    clause
        .child(1)
        .and_then(Sexpr::coerce_string)
        .field(record, field)
}

/// Every argument of `(keyword a b c ...)` as a string.
pub(crate) fn string_args(
    clause: &Sexpr,
    record: &'static str,
    field: &'static str,
) -> Result<Vec<String>> {
    list_items(clause)
        .iter()
        .skip(1)
        .map(Sexpr::coerce_string)
        .collect::<std::result::Result<Vec<_>, _>>()
        .field(record, field)
}
