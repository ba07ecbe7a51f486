//! Fallible navigation over parsed trees.
//!
//! Decoders for KiCad formats pull positional arguments out of clauses such as
//! `(at 1.27 -2.54)` or `(pad 1 smd rect ...)`. Every accessor here returns an
//! [`AccessError`] on a shape or type mismatch so callers can attach their own
//! context and never index out of bounds.

use thiserror::Error;

use crate::{Sexpr, SexprKind};

/// Errors produced by the accessors on [`Sexpr`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccessError {
    #[error("expected a list, found {0}")]
    NotAList(&'static str),

    #[error("expected an atom, found a list")]
    NotAnAtom,

    #[error("child index {index} out of range for list of {len} items")]
    OutOfRange { index: usize, len: usize },

    #[error("cannot coerce {0} to an integer")]
    NotAnInt(String),

    #[error("cannot coerce {0} to a number")]
    NotAFloat(String),

    #[error("expected a non-empty value")]
    Empty,
}

impl Sexpr {
    /// Short name of the node's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            SexprKind::Symbol(_) => "symbol",
            SexprKind::String(_) => "string",
            SexprKind::Int(_) => "integer",
            SexprKind::F64(_) => "float",
            SexprKind::List(_) => "list",
        }
    }

    /// Number of children of a list node.
    pub fn num_children(&self) -> Result<usize, AccessError> {
        self.children().map(<[Sexpr]>::len)
    }

    /// Children of a list node.
    pub fn children(&self) -> Result<&[Sexpr], AccessError> {
        self.as_list()
            .ok_or_else(|| AccessError::NotAList(self.kind_name()))
    }

    /// The `index`-th (0-based) child of a list node.
    pub fn child(&self, index: usize) -> Result<&Sexpr, AccessError> {
        let items = self.children()?;
        items.get(index).ok_or(AccessError::OutOfRange {
            index,
            len: items.len(),
        })
    }

    /// The leading keyword of a `(keyword arg...)` clause.
    ///
    /// Returns `None` for atoms, empty lists and lists whose first element is
    /// not a symbol or string.
    pub fn head(&self) -> Option<&str> {
        self.as_list()?.first()?.as_atom()
    }

    /// Coerce an atom to its string value.
    ///
    /// Symbols and strings are returned verbatim, numbers in their decimal
    /// rendering.
    pub fn coerce_string(&self) -> Result<String, AccessError> {
        match &self.kind {
            SexprKind::Symbol(s) | SexprKind::String(s) => Ok(s.clone()),
            SexprKind::Int(n) => Ok(n.to_string()),
            SexprKind::F64(v) => Ok(v.to_string()),
            SexprKind::List(_) => Err(AccessError::NotAnAtom),
        }
    }

    /// Coerce an atom to an integer.
    ///
    /// Accepts integer atoms and symbols or strings whose text is an integer
    /// (KiCad quotes pad numbers in some writers).
    pub fn coerce_int(&self) -> Result<i64, AccessError> {
        match &self.kind {
            SexprKind::Int(n) => Ok(*n),
            SexprKind::Symbol(s) | SexprKind::String(s) => s
                .parse::<i64>()
                .map_err(|_| AccessError::NotAnInt(format!("{s:?}"))),
            SexprKind::F64(v) => Err(AccessError::NotAnInt(v.to_string())),
            SexprKind::List(_) => Err(AccessError::NotAnAtom),
        }
    }

    /// Coerce an atom to a float.
    ///
    /// KiCad S-exprs sometimes encode whole numbers as ints and sometimes as
    /// floats, so both are accepted, as is numeric text in a symbol or string.
    pub fn coerce_f64(&self) -> Result<f64, AccessError> {
        match &self.kind {
            SexprKind::F64(v) => Ok(*v),
            SexprKind::Int(n) => Ok(*n as f64),
            SexprKind::Symbol(s) | SexprKind::String(s) => s
                .parse::<f64>()
                .map_err(|_| AccessError::NotAFloat(format!("{s:?}"))),
            SexprKind::List(_) => Err(AccessError::NotAnAtom),
        }
    }
}
