//! Document paths: `info.rating`, `myList[0]`, `a.b[1][2].c`.

use std::fmt;
use std::str::FromStr;

use crate::error::{ExpressionError, ExpressionResult};

/// A document path consisting of one or more elements.
///
/// The first element is always an [`PathElement::Attribute`]. Each attribute
/// element is aliased separately when compiled, so `info.rating` becomes
/// `#0.#1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributePath {
    elements: Vec<PathElement>,
}

/// A single element in an attribute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// A named attribute.
    Attribute(String),
    /// A list index dereference (e.g., `[0]`).
    Index(usize),
}

impl AttributePath {
    /// Parse a dotted/indexed path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` when a segment name is empty, a bracket is
    /// unbalanced, or an index is not a non-negative integer.
    pub fn parse(input: &str) -> ExpressionResult<Self> {
        if input.is_empty() {
            return Err(ExpressionError::invalid_parameter(
                "attribute path must not be empty",
            ));
        }

        let mut elements = Vec::new();
        for segment in input.split('.') {
            parse_segment(input, segment, &mut elements)?;
        }
        Ok(Self { elements })
    }

    /// A single-element path naming a top-level attribute, taken verbatim.
    pub(crate) fn top_level(name: &str) -> ExpressionResult<Self> {
        if name.is_empty() {
            return Err(ExpressionError::invalid_parameter(
                "key attribute name must not be empty",
            ));
        }
        Ok(Self {
            elements: vec![PathElement::Attribute(name.to_owned())],
        })
    }

    /// The path elements in order.
    #[must_use]
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }
}

fn parse_segment(
    path: &str,
    segment: &str,
    elements: &mut Vec<PathElement>,
) -> ExpressionResult<()> {
    let invalid =
        |reason: &str| ExpressionError::invalid_parameter(format!("invalid path {path:?}: {reason}"));

    let (name, mut rest) = segment.split_at(segment.find('[').unwrap_or(segment.len()));
    if name.is_empty() {
        return Err(invalid("empty attribute name"));
    }
    if name.contains(']') {
        return Err(invalid("unbalanced ']'"));
    }
    elements.push(PathElement::Attribute(name.to_owned()));

    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return Err(invalid("unexpected characters after list index"));
        };
        let Some(close) = inner.find(']') else {
            return Err(invalid("unclosed '['"));
        };
        let digits = &inner[..close];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("list index must be a non-negative integer"));
        }
        let index = digits
            .parse::<usize>()
            .map_err(|_| invalid("list index out of range"))?;
        elements.push(PathElement::Index(index));
        rest = &inner[close + 1..];
    }
    Ok(())
}

impl FromStr for AttributePath {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, elem) in self.elements.iter().enumerate() {
            match elem {
                PathElement::Attribute(name) if i > 0 => write!(f, ".{name}")?,
                PathElement::Attribute(name) => f.write_str(name)?,
                PathElement::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}
