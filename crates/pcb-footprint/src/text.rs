use pcb_sexpr::Sexpr;

use crate::clause::{float_arg, list_items, point_arg, string_arg, sub_clauses};
use crate::error::{FieldContext, Result};
use crate::types::FpText;

const FP_TEXT: &str = "fp_text";

/// Bare atom marking text as not rendered.
const HIDE_FLAG: &str = "hide";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextClause {
    At,
    Layer,
    Effects,
    Other,
}

impl TextClause {
    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "at" => Self::At,
            "layer" => Self::Layer,
            "effects" => Self::Effects,
            _ => Self::Other,
        }
    }
}

/// Clauses inside `effects`, either wrapped in `font` or written directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontClause {
    Font,
    Size,
    Thickness,
    Other,
}

impl FontClause {
    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "font" => Self::Font,
            "size" => Self::Size,
            "thickness" => Self::Thickness,
            _ => Self::Other,
        }
    }
}

/// Decode `(fp_text <kind> <value> [hide] (at x y [rot]) (layer L) (effects ...))`.
pub(crate) fn decode_text(node: &Sexpr) -> Result<FpText> {
    let mut text = FpText {
        kind: node
            .child(1)
            .and_then(Sexpr::coerce_string)
            .field(FP_TEXT, "kind")?,
        value: node
            .child(2)
            .and_then(Sexpr::coerce_string)
            .field(FP_TEXT, "value")?,
        ..Default::default()
    };

    for child in list_items(node).iter().skip(3) {
        if child.is_scalar() {
            if child.as_atom() == Some(HIDE_FLAG) {
                text.hidden = true;
            }
            continue;
        }

        let Some(keyword) = child.head() else {
            continue;
        };
        match TextClause::from_keyword(keyword) {
            TextClause::At => text.pos = point_arg(child, FP_TEXT, "at")?,
            TextClause::Layer => text.layer = string_arg(child, FP_TEXT, "layer")?,
            TextClause::Effects => apply_effects(&mut text, child)?,
            TextClause::Other => {}
        }
    }
    Ok(text)
}

/// `(effects (font (size w h) (thickness t)) [hide])`
///
/// `size` and `thickness` are also accepted directly under `effects`.
fn apply_effects(text: &mut FpText, effects: &Sexpr) -> Result<()> {
    if list_items(effects)
        .iter()
        .any(|child| child.as_atom() == Some(HIDE_FLAG))
    {
        text.hidden = true;
    }
    for (keyword, clause) in sub_clauses(effects) {
        match FontClause::from_keyword(keyword) {
            FontClause::Font => {
                for (keyword, clause) in sub_clauses(clause) {
                    apply_font_clause(text, FontClause::from_keyword(keyword), clause)?;
                }
            }
            font_clause => apply_font_clause(text, font_clause, clause)?,
        }
    }
    Ok(())
}

fn apply_font_clause(text: &mut FpText, keyword: FontClause, clause: &Sexpr) -> Result<()> {
    match keyword {
        FontClause::Size => text.size = point_arg(clause, FP_TEXT, "size")?,
        FontClause::Thickness => text.thickness = float_arg(clause, FP_TEXT, "thickness")?,
        FontClause::Font | FontClause::Other => {}
    }
    Ok(())
}
