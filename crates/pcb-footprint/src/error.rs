use pcb_sexpr::{AccessError, ParseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S-expression parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid format: {0}")]
    MalformedStructure(Malformed),

    #[error("invalid format: missing module prefix")]
    MissingPrefix,

    #[error("invalid format: bad `{field}` value in {record}")]
    InvalidField {
        record: &'static str,
        field: &'static str,
        #[source]
        source: AccessError,
    },

    #[error("invalid format: unrecognized module clause `{0}`")]
    UnrecognizedClause(String),

    #[error("cannot handle expression of type `{0}` in fp_poly pts")]
    UnsupportedPointKind(String),

    #[error("invalid format: drill specifies both a diameter and a slot size")]
    ConflictingDrillGeometry,
}

/// Which expectation about the outer document shape was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Malformed {
    #[error("expected s-expression list at top level")]
    ExpectedListAtTop,

    #[error("expected exactly one top level expression, found {0}")]
    ExpectedSingleChild(usize),

    #[error("expected s-expression list at 1st level")]
    ExpectedListAtSecondLevel,

    #[error("missing minimum elements: expected at least 3, found {0}")]
    TooFewElements(usize),
}

impl From<Malformed> for DecodeError {
    fn from(m: Malformed) -> Self {
        DecodeError::MalformedStructure(m)
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Attach record and field context to a failed tree access.
pub(crate) trait FieldContext<T> {
    fn field(self, record: &'static str, field: &'static str) -> Result<T>;
}

impl<T> FieldContext<T> for std::result::Result<T, AccessError> {
    fn field(self, record: &'static str, field: &'static str) -> Result<T> {
        self.map_err(|source| DecodeError::InvalidField {
            record,
            field,
            source,
        })
    }
}
