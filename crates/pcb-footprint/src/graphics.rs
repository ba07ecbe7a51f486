//! Outline geometry: `fp_line`, `fp_circle`, `fp_arc` and `fp_poly`.
//!
//! Sub-clauses outside each record's vocabulary are ignored, so newer KiCad
//! writers can add clauses without breaking older footprints.

use pcb_sexpr::Sexpr;

use crate::clause::{float_arg, list_items, point_arg, string_arg, sub_clauses};
use crate::error::{DecodeError, Result};
use crate::types::{FpArc, FpCircle, FpLine, FpPoly};

const FP_LINE: &str = "fp_line";
const FP_CIRCLE: &str = "fp_circle";
const FP_ARC: &str = "fp_arc";
const FP_POLY: &str = "fp_poly";

/// Sub-clauses known to the outline records. Each record reads a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GraphicClause {
    Start,
    End,
    Center,
    Angle,
    At,
    Pts,
    Layer,
    Width,
    Other,
}

impl GraphicClause {
    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "start" => Self::Start,
            "end" => Self::End,
            "center" => Self::Center,
            "angle" => Self::Angle,
            "at" => Self::At,
            "pts" => Self::Pts,
            "layer" => Self::Layer,
            "width" => Self::Width,
            _ => Self::Other,
        }
    }
}

fn graphic_clauses(node: &Sexpr) -> impl Iterator<Item = (GraphicClause, &Sexpr)> {
    sub_clauses(node).map(|(keyword, clause)| (GraphicClause::from_keyword(keyword), clause))
}

pub(crate) fn decode_line(node: &Sexpr) -> Result<FpLine> {
    let mut line = FpLine::default();
    for (keyword, clause) in graphic_clauses(node) {
        match keyword {
            GraphicClause::Start => line.start = point_arg(clause, FP_LINE, "start")?,
            GraphicClause::End => line.end = point_arg(clause, FP_LINE, "end")?,
            GraphicClause::Layer => line.layer = string_arg(clause, FP_LINE, "layer")?,
            GraphicClause::Width => line.width = float_arg(clause, FP_LINE, "width")?,
            GraphicClause::Center
            | GraphicClause::Angle
            | GraphicClause::At
            | GraphicClause::Pts
            | GraphicClause::Other => {}
        }
    }
    Ok(line)
}

pub(crate) fn decode_circle(node: &Sexpr) -> Result<FpCircle> {
    let mut circle = FpCircle::default();
    for (keyword, clause) in graphic_clauses(node) {
        match keyword {
            GraphicClause::Center => circle.center = point_arg(clause, FP_CIRCLE, "center")?,
            GraphicClause::End => circle.end = point_arg(clause, FP_CIRCLE, "end")?,
            GraphicClause::Layer => circle.layer = string_arg(clause, FP_CIRCLE, "layer")?,
            GraphicClause::Width => circle.width = float_arg(clause, FP_CIRCLE, "width")?,
            GraphicClause::Start
            | GraphicClause::Angle
            | GraphicClause::At
            | GraphicClause::Pts
            | GraphicClause::Other => {}
        }
    }
    Ok(circle)
}

pub(crate) fn decode_arc(node: &Sexpr) -> Result<FpArc> {
    let mut arc = FpArc::default();
    for (keyword, clause) in graphic_clauses(node) {
        match keyword {
            GraphicClause::Start => arc.start = point_arg(clause, FP_ARC, "start")?,
            GraphicClause::End => arc.end = point_arg(clause, FP_ARC, "end")?,
            GraphicClause::Layer => arc.layer = string_arg(clause, FP_ARC, "layer")?,
            GraphicClause::Width => arc.width = float_arg(clause, FP_ARC, "width")?,
            GraphicClause::Angle => arc.angle = float_arg(clause, FP_ARC, "angle")?,
            GraphicClause::Center
            | GraphicClause::At
            | GraphicClause::Pts
            | GraphicClause::Other => {}
        }
    }
    Ok(arc)
}

pub(crate) fn decode_poly(node: &Sexpr) -> Result<FpPoly> {
    let mut poly = FpPoly::default();
    for (keyword, clause) in graphic_clauses(node) {
        match keyword {
            GraphicClause::At => poly.at = point_arg(clause, FP_POLY, "at")?,
            GraphicClause::Pts => {
                // Every entry must be a vertex.
                for entry in list_items(clause).iter().skip(1) {
                    match entry.head() {
                        Some("xy") => poly.points.push(point_arg(entry, FP_POLY, "xy")?),
                        Some(other) => {
                            return Err(DecodeError::UnsupportedPointKind(other.to_string()));
                        }
                        None => return Err(DecodeError::UnsupportedPointKind(entry.to_string())),
                    }
                }
            }
            GraphicClause::Layer => poly.layer = string_arg(clause, FP_POLY, "layer")?,
            GraphicClause::Width => poly.width = float_arg(clause, FP_POLY, "width")?,
            GraphicClause::Start
            | GraphicClause::End
            | GraphicClause::Center
            | GraphicClause::Angle
            | GraphicClause::Other => {}
        }
    }
    Ok(poly)
}
