use serde::Serialize;

/// A point in board coordinates (millimetres).
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Graphical line, `(fp_line ...)`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FpLine {
    pub start: Point2D,
    pub end: Point2D,
    pub layer: String,
    pub width: f64,
}

/// Graphical circle, `(fp_circle ...)`. `end` is a point on the circumference.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FpCircle {
    pub center: Point2D,
    pub end: Point2D,
    pub layer: String,
    pub width: f64,
}

/// Graphical arc, `(fp_arc ...)`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FpArc {
    pub start: Point2D,
    pub end: Point2D,
    pub layer: String,
    pub angle: f64,
    pub width: f64,
}

/// Graphical polygon, `(fp_poly ...)`.
///
/// The order of `points` is the order of the boundary.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FpPoly {
    #[serde(rename = "position")]
    pub at: Point2D,
    pub points: Vec<Point2D>,
    pub layer: String,
    pub width: f64,
}

/// Text annotation, `(fp_text <kind> <value> ...)`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FpText {
    #[serde(rename = "position")]
    pub pos: Point2D,
    /// `reference`, `value` or `user`.
    pub kind: String,
    pub value: String,
    pub layer: String,
    pub hidden: bool,

    pub size: Point2D,
    pub thickness: f64,
}

/// Copper pad, `(pad <pin> <kind> <shape> ...)`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Pad {
    /// Electrical pin number. `None` for pads without a numeric identifier,
    /// which are not connected to anything.
    pub pin: Option<i64>,
    pub kind: String,
    pub shape: String,
    pub drill: Drill,

    #[serde(rename = "position")]
    pub pos: Point2D,
    pub size: Point2D,
    pub layers: Vec<String>,
}

/// Pad drill parameters, `(drill ...)`.
///
/// A round drill sets `scalar` and leaves `kind` empty. A slotted drill sets
/// `kind` (e.g. `oval`) and `ellipse`. The two are never both populated.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Drill {
    pub kind: String,
    pub scalar: f64,
    pub ellipse: Point2D,
    pub offset: Point2D,
}

impl Drill {
    pub fn is_slotted(&self) -> bool {
        !self.kind.is_empty()
    }
}

/// A KiCad footprint, `(module <name> ...)`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Module {
    pub name: String,
    pub tedit: String,
    pub description: String,
    pub layer: String,
    pub position: Point2D,
    #[serde(skip_serializing_if = "is_zero")]
    pub clearance: f64,
    pub model: String,

    #[serde(skip_serializing_if = "is_zero")]
    pub solder_mask_margin: f64,
    #[serde(skip_serializing_if = "is_zero")]
    pub solder_paste_margin: f64,
    #[serde(skip_serializing_if = "is_zero")]
    pub solder_paste_ratio: f64,

    pub tags: Vec<String>,
    pub attrs: Vec<String>,
    pub lines: Vec<FpLine>,
    pub arcs: Vec<FpArc>,
    pub circles: Vec<FpCircle>,
    pub polygons: Vec<FpPoly>,
    pub texts: Vec<FpText>,
    pub pads: Vec<Pad>,
}

impl Module {
    /// Look up the `reference` or `value` text, if present.
    pub fn text(&self, kind: &str) -> Option<&FpText> {
        self.texts.iter().find(|t| t.kind == kind)
    }

    /// Pads carrying a numeric pin identifier.
    pub fn connected_pads(&self) -> impl Iterator<Item = &Pad> {
        self.pads.iter().filter(|p| p.pin.is_some())
    }
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}
