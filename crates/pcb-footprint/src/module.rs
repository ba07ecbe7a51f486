//! Top-level `(module ...)` decoding.

use pcb_sexpr::{AccessError, Sexpr};

use crate::clause::{float_arg, point_arg, string_arg, string_args};
use crate::error::{DecodeError, FieldContext, Malformed, Result};
use crate::graphics::{decode_arc, decode_circle, decode_line, decode_poly};
use crate::pad::decode_pad;
use crate::text::decode_text;
use crate::types::Module;

const MODULE: &str = "module";

/// The closed set of clauses allowed directly inside `(module ...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleClause {
    /// `zone_connect`, `path`, `autoplace_cost90`, `autoplace_cost180`
    Ignored,
    Layer,
    Tedit,
    Descr,
    Tags,
    Attr,
    At,
    Clearance,
    SolderMaskMargin,
    SolderPasteMargin,
    SolderPasteRatio,
    Model,
    FpLine,
    FpCircle,
    FpArc,
    FpPoly,
    FpText,
    Pad,
}

impl ModuleClause {
    fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "zone_connect" | "path" | "autoplace_cost90" | "autoplace_cost180" => Self::Ignored,
            "layer" => Self::Layer,
            "tedit" => Self::Tedit,
            "descr" => Self::Descr,
            "tags" => Self::Tags,
            "attr" => Self::Attr,
            "at" => Self::At,
            "clearance" => Self::Clearance,
            "solder_mask_margin" => Self::SolderMaskMargin,
            "solder_paste_margin" => Self::SolderPasteMargin,
            "solder_paste_ratio" => Self::SolderPasteRatio,
            "model" => Self::Model,
            "fp_line" => Self::FpLine,
            "fp_circle" => Self::FpCircle,
            "fp_arc" => Self::FpArc,
            "fp_poly" => Self::FpPoly,
            "fp_text" => Self::FpText,
            "pad" => Self::Pad,
            _ => return None,
        })
    }
}

/// Decode a parsed footprint document.
///
/// `root` is the document node from [`pcb_sexpr::parse_document`]: a list
/// wrapping the single `(module <name> ...)` expression. The first error
/// aborts the decode.
pub fn decode(root: &Sexpr) -> Result<Module> {
    let top = root.as_list().ok_or(Malformed::ExpectedListAtTop)?;
    if top.len() != 1 {
        return Err(Malformed::ExpectedSingleChild(top.len()).into());
    }
    let items = top[0]
        .as_list()
        .ok_or(Malformed::ExpectedListAtSecondLevel)?;
    if items.len() < 3 {
        return Err(Malformed::TooFewElements(items.len()).into());
    }
    if items[0].as_atom() != Some(MODULE) {
        return Err(DecodeError::MissingPrefix);
    }

    let name = items[1].coerce_string().field(MODULE, "name")?;
    if name.is_empty() {
        return Err(DecodeError::InvalidField {
            record: MODULE,
            field: "name",
            source: AccessError::Empty,
        });
    }

    let mut module = Module {
        name,
        ..Default::default()
    };

    for node in &items[2..] {
        // Bare flags (`locked`, `placed`) and one-element lists carry nothing to decode.
        match node.as_list() {
            Some(clause) if clause.len() >= 2 => {}
            _ => {
                log::trace!("Skipping module element {node}");
                continue;
            }
        }
        let Some(keyword) = node.head() else {
            return Err(DecodeError::UnrecognizedClause(
                list_head_text(node).unwrap_or_default(),
            ));
        };
        let clause = ModuleClause::from_keyword(keyword)
            .ok_or_else(|| DecodeError::UnrecognizedClause(keyword.to_string()))?;

        apply_clause(&mut module, clause, node)?;
    }

    log::debug!(
        "Decoded module {}: {} pads, {} texts, {} lines, {} arcs, {} circles, {} polygons",
        module.name,
        module.pads.len(),
        module.texts.len(),
        module.lines.len(),
        module.arcs.len(),
        module.circles.len(),
        module.polygons.len()
    );
    Ok(module)
}

fn apply_clause(module: &mut Module, clause: ModuleClause, node: &Sexpr) -> Result<()> {
    match clause {
        ModuleClause::Ignored => log::trace!("Ignoring module clause {node}"),
        ModuleClause::Layer => module.layer = string_arg(node, MODULE, "layer")?,
        ModuleClause::Tedit => module.tedit = string_arg(node, MODULE, "tedit")?,
        ModuleClause::Descr => module.description = string_arg(node, MODULE, "descr")?,
        ModuleClause::Tags => module.tags.extend(string_args(node, MODULE, "tags")?),
        ModuleClause::Attr => module.attrs.extend(string_args(node, MODULE, "attr")?),
        ModuleClause::At => module.position = point_arg(node, MODULE, "at")?,
        ModuleClause::Clearance => module.clearance = float_arg(node, MODULE, "clearance")?,
        ModuleClause::SolderMaskMargin => {
            module.solder_mask_margin = float_arg(node, MODULE, "solder_mask_margin")?
        }
        ModuleClause::SolderPasteMargin => {
            module.solder_paste_margin = float_arg(node, MODULE, "solder_paste_margin")?
        }
        ModuleClause::SolderPasteRatio => {
            module.solder_paste_ratio = float_arg(node, MODULE, "solder_paste_ratio")?
        }
        ModuleClause::Model => module.model = string_arg(node, MODULE, "model")?,
        ModuleClause::FpLine => module.lines.push(decode_line(node)?),
        ModuleClause::FpCircle => module.circles.push(decode_circle(node)?),
        ModuleClause::FpArc => module.arcs.push(decode_arc(node)?),
        ModuleClause::FpPoly => module.polygons.push(decode_poly(node)?),
        ModuleClause::FpText => module.texts.push(decode_text(node)?),
        ModuleClause::Pad => module.pads.push(decode_pad(node)?),
    }
    Ok(())
}

fn list_head_text(node: &Sexpr) -> Option<String> {
    node.as_list()?.first().map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point2D;
    use pcb_sexpr::parse_document;

    fn decode_src(src: &str) -> Result<Module> {
        decode(&parse_document(src).unwrap())
    }

    #[test]
    fn minimal_module() {
        let module = decode_src("(module M (layer F.Cu))").unwrap();
        assert_eq!(module.name, "M");
        assert_eq!(module.layer, "F.Cu");
        assert!(module.tags.is_empty());
        assert!(module.attrs.is_empty());
        assert!(module.lines.is_empty());
        assert!(module.arcs.is_empty());
        assert!(module.circles.is_empty());
        assert!(module.polygons.is_empty());
        assert!(module.texts.is_empty());
        assert!(module.pads.is_empty());
    }

    #[test]
    fn quoted_name() {
        let module = decode_src(r#"(module "R_0603 Handsolder" (layer F.Cu))"#).unwrap();
        assert_eq!(module.name, "R_0603 Handsolder");
    }

    #[test]
    fn outer_shape_violations() {
        assert!(matches!(
            decode(&Sexpr::symbol("module")),
            Err(DecodeError::MalformedStructure(Malformed::ExpectedListAtTop))
        ));
        assert!(matches!(
            decode_src(""),
            Err(DecodeError::MalformedStructure(Malformed::ExpectedSingleChild(0)))
        ));
        assert!(matches!(
            decode_src("(module A (layer F.Cu)) (module B (layer F.Cu))"),
            Err(DecodeError::MalformedStructure(Malformed::ExpectedSingleChild(2)))
        ));
        assert!(matches!(
            decode_src("module"),
            Err(DecodeError::MalformedStructure(Malformed::ExpectedListAtSecondLevel))
        ));
        assert!(matches!(
            decode_src("(module)"),
            Err(DecodeError::MalformedStructure(Malformed::TooFewElements(1)))
        ));
        assert!(matches!(
            decode_src("(module M)"),
            Err(DecodeError::MalformedStructure(Malformed::TooFewElements(2)))
        ));
    }

    #[test]
    fn prefix_is_required() {
        assert!(matches!(
            decode_src("(footprint M (layer F.Cu))"),
            Err(DecodeError::MissingPrefix)
        ));
        assert!(matches!(
            decode_src("((module) M (layer F.Cu))"),
            Err(DecodeError::MissingPrefix)
        ));
    }

    #[test]
    fn name_must_be_a_non_empty_atom() {
        assert!(matches!(
            decode_src("(module (M) (layer F.Cu))"),
            Err(DecodeError::InvalidField {
                record: "module",
                field: "name",
                source: AccessError::NotAnAtom,
            })
        ));
        assert!(matches!(
            decode_src(r#"(module "" (layer F.Cu))"#),
            Err(DecodeError::InvalidField {
                record: "module",
                field: "name",
                source: AccessError::Empty,
            })
        ));
    }

    #[test]
    fn decimal_atoms_keep_their_text() {
        let module = decode_src(
            "(module 1.10 (layer F.Cu) (tags 0.50 1.0) (fp_text value 4.70 (at 0 0)))",
        )
        .unwrap();
        assert_eq!(module.name, "1.10");
        assert_eq!(module.tags, vec!["0.50", "1.0"]);
        assert_eq!(module.texts[0].value, "4.70");
    }

    #[test]
    fn scalar_fields() {
        let module = decode_src(
            r#"(module SOT-23 (layer F.Cu) (tedit 5A02FF57)
                 (descr "SOT-23, Standard")
                 (at 10 20.5)
                 (clearance 0.2)
                 (solder_mask_margin 0.05)
                 (solder_paste_margin -0.03)
                 (solder_paste_ratio -0.1)
                 (model ${KISYS3DMOD}/Package_TO_SOT_SMD.3dshapes/SOT-23.wrl
                   (at (xyz 0 0 0)) (scale (xyz 1 1 1)) (rotate (xyz 0 0 0))))"#,
        )
        .unwrap();
        assert_eq!(module.tedit, "5A02FF57");
        assert_eq!(module.description, "SOT-23, Standard");
        assert_eq!(module.position, Point2D::new(10.0, 20.5));
        assert_eq!(module.clearance, 0.2);
        assert_eq!(module.solder_mask_margin, 0.05);
        assert_eq!(module.solder_paste_margin, -0.03);
        assert_eq!(module.solder_paste_ratio, -0.1);
        assert_eq!(
            module.model,
            "${KISYS3DMOD}/Package_TO_SOT_SMD.3dshapes/SOT-23.wrl"
        );
    }

    #[test]
    fn tags_and_attrs_accumulate() {
        let module = decode_src(
            r#"(module M (layer F.Cu) (tags "resistor handsolder") (attr smd) (tags extra more))"#,
        )
        .unwrap();
        assert_eq!(module.tags, vec!["resistor handsolder", "extra", "more"]);
        assert_eq!(module.attrs, vec!["smd"]);
    }

    #[test]
    fn ignored_and_skipped_elements() {
        let module = decode_src(
            "(module M locked (layer F.Cu) (path /abc) (zone_connect 2)
               (autoplace_cost90 1) (autoplace_cost180 2) (placed))",
        )
        .unwrap();
        assert_eq!(module.layer, "F.Cu");
    }

    #[test]
    fn unknown_clause_fails_decode() {
        let err = decode_src("(module M (layer F.Cu) (bogus_clause 1 2))").unwrap_err();
        assert!(matches!(err, DecodeError::UnrecognizedClause(ref k) if k == "bogus_clause"));
        assert_eq!(
            err.to_string(),
            "invalid format: unrecognized module clause `bogus_clause`"
        );

        assert!(matches!(
            decode_src("(module M (layer F.Cu) (5 1))"),
            Err(DecodeError::UnrecognizedClause(k)) if k == "5"
        ));
    }

    #[test]
    fn bad_scalar_field() {
        assert!(matches!(
            decode_src("(module M (at x 1))"),
            Err(DecodeError::InvalidField {
                record: "module",
                field: "at",
                ..
            })
        ));
        assert!(matches!(
            decode_src("(module M (clearance (0.1)))"),
            Err(DecodeError::InvalidField {
                record: "module",
                field: "clearance",
                ..
            })
        ));
        assert!(matches!(
            decode_src("(module M (layer (F.Cu)))"),
            Err(DecodeError::InvalidField {
                record: "module",
                field: "layer",
                ..
            })
        ));
    }

    #[test]
    fn record_errors_propagate() {
        assert!(matches!(
            decode_src("(module M (layer F.Cu) (fp_poly (pts (xy 0 0) (bezier 1 1))))"),
            Err(DecodeError::UnsupportedPointKind(k)) if k == "bezier"
        ));
        assert!(matches!(
            decode_src("(module M (layer F.Cu) (pad 1 smd))"),
            Err(DecodeError::InvalidField {
                record: "pad",
                field: "shape",
                ..
            })
        ));
    }

    #[test]
    fn records_keep_source_order() {
        let module = decode_src(
            "(module M (layer F.Cu)
               (pad 2 smd rect) (fp_line (layer A)) (pad 1 smd rect) (fp_line (layer B)))",
        )
        .unwrap();
        let pins: Vec<_> = module.pads.iter().map(|p| p.pin).collect();
        assert_eq!(pins, vec![Some(2), Some(1)]);
        let layers: Vec<_> = module.lines.iter().map(|l| l.layer.as_str()).collect();
        assert_eq!(layers, vec!["A", "B"]);
    }
}
