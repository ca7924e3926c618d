//! Static integral constants
//!
//! Every constant kind shares the `static_constant` tag so that comparisons
//! and arithmetic dispatch to a single instance regardless of width.

use std::fmt;

/// Width of a static constant, ordered by promotion rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstantKind {
    Bool,
    Int,
    Long,
    SizeT,
}

impl ConstantKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConstantKind::Bool => "bool",
            ConstantKind::Int => "int",
            ConstantKind::Long => "long",
            ConstantKind::SizeT => "size_t",
        }
    }

    /// Kind of the result of arithmetic between `self` and `other`
    ///
    /// Booleans promote to `int` before arithmetic.
    pub fn promote(self, other: ConstantKind) -> ConstantKind {
        self.max(other).max(ConstantKind::Int)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticConstant {
    pub kind: ConstantKind,
    pub value: i64,
}

impl StaticConstant {
    pub fn new(kind: ConstantKind, value: i64) -> Self {
        let value = match kind {
            ConstantKind::Bool => i64::from(value != 0),
            _ => value,
        };
        Self { kind, value }
    }

    pub fn int(value: i64) -> Self {
        Self::new(ConstantKind::Int, value)
    }

    pub fn long(value: i64) -> Self {
        Self::new(ConstantKind::Long, value)
    }

    pub fn size_t(value: usize) -> Self {
        Self::new(ConstantKind::SizeT, value as i64)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ConstantKind::Bool, i64::from(value))
    }

    /// Truth of the constant, nonzero is true
    pub fn truth(&self) -> bool {
        self.value != 0
    }
}

impl fmt::Display for StaticConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConstantKind::Bool => write!(f, "{}", self.truth()),
            ConstantKind::Int => write!(f, "{}", self.value),
            ConstantKind::Long | ConstantKind::SizeT => {
                write!(f, "({} {})", self.kind.name(), self.value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_normalises_value() {
        assert_eq!(StaticConstant::new(ConstantKind::Bool, 7).value, 1);
        assert!(StaticConstant::int(2).truth());
        assert!(!StaticConstant::long(0).truth());
    }

    #[test]
    fn test_promotion() {
        assert_eq!(ConstantKind::Bool.promote(ConstantKind::Bool), ConstantKind::Int);
        assert_eq!(ConstantKind::Int.promote(ConstantKind::Long), ConstantKind::Long);
        assert_eq!(ConstantKind::SizeT.promote(ConstantKind::Int), ConstantKind::SizeT);
    }

    #[test]
    fn test_display_matches_meta_language() {
        assert_eq!(StaticConstant::int(3).to_string(), "3");
        assert_eq!(StaticConstant::bool(true).to_string(), "true");
        assert_eq!(StaticConstant::size_t(4).to_string(), "(size_t 4)");
    }
}
