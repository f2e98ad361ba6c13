//! Projection expressions: the attributes an operation returns.

use super::operand::NameOperand;

/// An ordered list of attribute paths.
///
/// A path listed more than once is compiled once, at its first position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    names: Vec<NameOperand>,
}

impl Projection {
    /// Project the given paths, in order.
    #[must_use]
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator<Item = NameOperand>,
    {
        Self {
            names: names.into_iter().collect(),
        }
    }

    /// Append more paths.
    #[must_use]
    pub fn add_names<I>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = NameOperand>,
    {
        self.names.extend(names);
        self
    }

    pub(crate) fn names(&self) -> &[NameOperand] {
        &self.names
    }
}

impl FromIterator<NameOperand> for Projection {
    fn from_iter<I: IntoIterator<Item = NameOperand>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// `first, rest...`.
#[must_use]
pub fn names_list<I>(first: NameOperand, rest: I) -> Projection
where
    I: IntoIterator<Item = NameOperand>,
{
    Projection::new([first]).add_names(rest)
}
