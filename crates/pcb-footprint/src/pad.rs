//! Copper pads and their drill holes.

use pcb_sexpr::Sexpr;

use crate::clause::{list_items, point_arg, string_args, sub_clauses};
use crate::error::{DecodeError, FieldContext, Result};
use crate::types::{Drill, Pad, Point2D};

const PAD: &str = "pad";
const DRILL: &str = "drill";

/// Sub-clauses read from a pad; anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PadClause {
    At,
    Size,
    Layers,
    Drill,
    Other,
}

impl PadClause {
    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "at" => Self::At,
            "size" => Self::Size,
            "layers" => Self::Layers,
            "drill" => Self::Drill,
            _ => Self::Other,
        }
    }
}

/// Decode `(pad <pin> <kind> <shape> (at ..) (size ..) (drill ..) (layers ..))`.
pub(crate) fn decode_pad(node: &Sexpr) -> Result<Pad> {
    let mut pad = Pad {
        kind: node
            .child(2)
            .and_then(Sexpr::coerce_string)
            .field(PAD, "kind")?,
        shape: node
            .child(3)
            .and_then(Sexpr::coerce_string)
            .field(PAD, "shape")?,
        ..Default::default()
    };

    // Pads without an integer pin (mounting holes, `""`) are unconnected.
    pad.pin = node.child(1).and_then(Sexpr::coerce_int).ok();

    for (keyword, clause) in sub_clauses(node) {
        match PadClause::from_keyword(keyword) {
            PadClause::At => pad.pos = point_arg(clause, PAD, "at")?,
            PadClause::Size => pad.size = point_arg(clause, PAD, "size")?,
            PadClause::Layers => pad.layers.extend(string_args(clause, PAD, "layers")?),
            PadClause::Drill => pad.drill = decode_drill(clause)?,
            PadClause::Other => {}
        }
    }
    Ok(pad)
}

/// Which drill representation a `(drill ...)` clause has committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrillForm {
    Unset,
    Round,
    Slot,
}

/// Decode `(drill <size> [(offset x y)])` or `(drill <kind> <w> <h> [(offset x y)])`.
///
/// The format does not tag which form is used. Each atom is probed as a
/// number first: a number is the round drill size, anything else is the
/// slot kind followed by its two extents. Once a form is chosen, further
/// atoms of the same form are ignored and an atom of the other form is a
/// [`DecodeError::ConflictingDrillGeometry`].
pub(crate) fn decode_drill(node: &Sexpr) -> Result<Drill> {
    let items = list_items(node);
    let mut drill = Drill::default();
    let mut form = DrillForm::Unset;

    let mut i = 1;
    while i < items.len() {
        let child = &items[i];
        if child.is_list() {
            if child.head() == Some("offset") {
                drill.offset = point_arg(child, DRILL, "offset")?;
            }
            i += 1;
            continue;
        }

        match (form, child.coerce_f64()) {
            (DrillForm::Unset, Ok(size)) => {
                drill.scalar = size;
                form = DrillForm::Round;
                i += 1;
            }
            (DrillForm::Unset, Err(_)) => {
                drill.kind = child.coerce_string().field(DRILL, "kind")?;
                drill.ellipse = slot_extents(node, i)?;
                form = DrillForm::Slot;
                i += 3;
            }
            (DrillForm::Round, Ok(_)) | (DrillForm::Slot, Err(_)) => {
                log::trace!("Ignoring extra drill argument {child}");
                i += 1;
            }
            (DrillForm::Round, Err(_)) | (DrillForm::Slot, Ok(_)) => {
                return Err(DecodeError::ConflictingDrillGeometry);
            }
        }
    }
    Ok(drill)
}

/// The two extents following the slot kind at `kind_index`.
fn slot_extents(node: &Sexpr, kind_index: usize) -> Result<Point2D> {
    let x = node
        .child(kind_index + 1)
        .and_then(Sexpr::coerce_f64)
        .field(DRILL, "ellipse")?;
    let y = node
        .child(kind_index + 2)
        .and_then(Sexpr::coerce_f64)
        .field(DRILL, "ellipse")?;
    Ok(Point2D { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcb_sexpr::{parse, AccessError};

    fn drill(src: &str) -> Result<Drill> {
        decode_drill(&parse(src).unwrap())
    }

    #[test]
    fn smd_pad() {
        let node =
            parse("(pad 1 smd rect (at -0.95 0) (size 0.7 1.3) (layers F.Cu F.Paste F.Mask))")
                .unwrap();
        assert_eq!(
            decode_pad(&node).unwrap(),
            Pad {
                pin: Some(1),
                kind: "smd".to_string(),
                shape: "rect".to_string(),
                drill: Drill::default(),
                pos: Point2D::new(-0.95, 0.0),
                size: Point2D::new(0.7, 1.3),
                layers: vec!["F.Cu".into(), "F.Paste".into(), "F.Mask".into()],
            }
        );
    }

    #[test]
    fn non_numeric_pin_is_unconnected() {
        let node = parse(r#"(pad "" np_thru_hole circle (at 0 0) (size 3.2 3.2) (drill 3.2))"#)
            .unwrap();
        let pad = decode_pad(&node).unwrap();
        assert_eq!(pad.pin, None);
        assert_eq!(pad.drill.scalar, 3.2);

        let pad = decode_pad(&parse("(pad A1 smd circle)").unwrap()).unwrap();
        assert_eq!(pad.pin, None);

        let pad = decode_pad(&parse(r#"(pad "2" thru_hole oval)"#).unwrap()).unwrap();
        assert_eq!(pad.pin, Some(2));

        let pad = decode_pad(&parse("(pad 0 smd rect)").unwrap()).unwrap();
        assert_eq!(pad.pin, Some(0));
    }

    #[test]
    fn kind_and_shape_are_required() {
        assert!(matches!(
            decode_pad(&parse("(pad 1)").unwrap()),
            Err(DecodeError::InvalidField {
                record: "pad",
                field: "kind",
                ..
            })
        ));
        assert!(matches!(
            decode_pad(&parse("(pad 1 smd)").unwrap()),
            Err(DecodeError::InvalidField {
                record: "pad",
                field: "shape",
                ..
            })
        ));
    }

    #[test]
    fn unknown_pad_clauses_are_ignored() {
        let node = parse(
            "(pad 3 smd roundrect (at 0 1) (size 1 1) (roundrect_rratio 0.25) (solder_mask_margin 0.05) (layers F.Cu))",
        )
        .unwrap();
        let pad = decode_pad(&node).unwrap();
        assert_eq!(pad.layers, vec!["F.Cu"]);
    }

    #[test]
    fn round_drill() {
        assert_eq!(
            drill("(drill 0.5)").unwrap(),
            Drill {
                kind: String::new(),
                scalar: 0.5,
                ..Default::default()
            }
        );
        assert_eq!(drill("(drill 1)").unwrap().scalar, 1.0);
    }

    #[test]
    fn slotted_drill() {
        let d = drill("(drill oval 0.6 0.3)").unwrap();
        assert_eq!(
            d,
            Drill {
                kind: "oval".to_string(),
                scalar: 0.0,
                ellipse: Point2D::new(0.6, 0.3),
                offset: Point2D::default(),
            }
        );
        assert!(d.is_slotted());
    }

    #[test]
    fn drill_offset_applies_to_either_form() {
        let round = drill("(drill 0.8 (offset 0.1 0.2))").unwrap();
        assert_eq!(round.offset, Point2D::new(0.1, 0.2));
        assert_eq!(round.scalar, 0.8);

        let slot = drill("(drill oval 1.2 0.6 (offset 0.1 0.2))").unwrap();
        assert_eq!(slot.offset, Point2D::new(0.1, 0.2));
        assert_eq!(slot.ellipse, Point2D::new(1.2, 0.6));

        let leading = drill("(drill (offset -0.5 0) 0.9)").unwrap();
        assert_eq!(leading.offset, Point2D::new(-0.5, 0.0));
        assert_eq!(leading.scalar, 0.9);
    }

    #[test]
    fn slot_with_missing_extent_is_an_error() {
        assert!(matches!(
            drill("(drill oval 0.6)"),
            Err(DecodeError::InvalidField {
                record: "drill",
                field: "ellipse",
                source: AccessError::OutOfRange { index: 3, len: 3 },
            })
        ));
        assert!(matches!(
            drill("(drill oval 0.6 wide)"),
            Err(DecodeError::InvalidField {
                record: "drill",
                field: "ellipse",
                ..
            })
        ));
    }

    #[test]
    fn drill_never_carries_both_forms() {
        assert!(matches!(
            drill("(drill oval 1.2 0.6 0.3)"),
            Err(DecodeError::ConflictingDrillGeometry)
        ));
        assert!(matches!(
            drill("(drill 0.8 oval 1.2 0.6)"),
            Err(DecodeError::ConflictingDrillGeometry)
        ));
    }

    #[test]
    fn extra_round_sizes_keep_the_first() {
        assert_eq!(
            drill("(drill 0.8 0.9)").unwrap(),
            Drill {
                scalar: 0.8,
                ..Default::default()
            }
        );

        let pad = decode_pad(&parse("(pad 1 thru_hole circle (drill 0.8 0.9))").unwrap()).unwrap();
        assert_eq!(pad.drill.scalar, 0.8);
        assert!(!pad.drill.is_slotted());
    }

    #[test]
    fn empty_drill_defaults() {
        assert_eq!(drill("(drill)").unwrap(), Drill::default());
    }
}
