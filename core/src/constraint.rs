use crate::{ConstraintError, Type};

/// Requirements a template places on a type.
///
/// Each flag is independent; an unset flag leaves that capability
/// unconstrained. Constraints do not compose: a template declares one for
/// its own type and one per type parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct Constraint {
    /// Arithmetic operations are supported.
    pub numeric: bool,
    /// `==` and `!=` are supported. Map keys must be comparable, for example.
    pub comparable: bool,
    /// `<` and `>` are supported.
    pub ordered: bool,
}

impl Constraint {
    /// A constraint every type satisfies.
    pub const ANY: Self = Self {
        numeric: false,
        comparable: false,
        ordered: false,
    };

    pub const fn numeric() -> Self {
        Self::ANY.and_numeric()
    }

    pub const fn comparable() -> Self {
        Self::ANY.and_comparable()
    }

    pub const fn ordered() -> Self {
        Self::ANY.and_ordered()
    }

    pub const fn and_numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    pub const fn and_comparable(mut self) -> Self {
        self.comparable = true;
        self
    }

    pub const fn and_ordered(mut self) -> Self {
        self.ordered = true;
        self
    }

    /// Check `ty` against this constraint.
    ///
    /// Capabilities are checked in a fixed order (comparable, numeric,
    /// ordered) and the first one missing is reported.
    pub fn check(&self, ty: &Type) -> Result<(), ConstraintError> {
        if self.comparable && !ty.comparable() {
            return Err(ConstraintError::NotComparable(ty.to_string()));
        }

        if self.numeric && !ty.numeric() {
            return Err(ConstraintError::NotNumeric(ty.to_string()));
        }

        if self.ordered && !ty.ordered() {
            return Err(ConstraintError::NotOrdered(ty.to_string()));
        }

        Ok(())
    }

    #[inline]
    pub fn is_satisfied_by(&self, ty: &Type) -> bool {
        self.check(ty).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Capabilities;
    use test_case::test_case;

    fn caps(comparable: bool, numeric: bool, ordered: bool) -> Capabilities {
        Capabilities {
            comparable,
            numeric,
            ordered,
        }
    }

    #[test]
    fn test_unconstrained_accepts_anything() {
        assert!(Constraint::ANY.check(&Type::named("T")).is_ok());
    }

    #[test_case(Constraint::comparable(), caps(false, true, true), "T must be comparable (i.e. supports == and != operators)"; "comparable")]
    #[test_case(Constraint::numeric(), caps(true, false, true), "T must be numeric"; "numeric")]
    #[test_case(Constraint::ordered(), caps(true, true, false), "T must be ordered (i.e. supports > and < operators)"; "ordered")]
    fn test_missing_capability(constraint: Constraint, capabilities: Capabilities, message: &str) {
        let err = constraint.check(&Type::new("T", capabilities)).unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_first_violation_wins() {
        let all = Constraint::numeric().and_comparable().and_ordered();
        let err = all.check(&Type::named("T")).unwrap_err();
        assert!(matches!(err, ConstraintError::NotComparable(_)));

        let err = all.check(&Type::new("T", caps(true, false, false))).unwrap_err();
        assert!(matches!(err, ConstraintError::NotNumeric(_)));
    }

    #[test]
    fn test_pointer_in_message() {
        let ty = Type::named("Foo").with_pointer(true);
        let err = Constraint::numeric().check(&ty).unwrap_err();
        assert_eq!(err.to_string(), "*Foo must be numeric");
    }

    #[test]
    fn test_monotonic_in_capabilities() {
        let constraints = [
            Constraint::ANY,
            Constraint::numeric(),
            Constraint::comparable().and_ordered(),
            Constraint::numeric().and_comparable().and_ordered(),
        ];
        let all_caps: Vec<Capabilities> = (0..8u8)
            .map(|bits| caps(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0))
            .collect();

        for c in constraints {
            for small in &all_caps {
                for large in all_caps.iter().filter(|l| l.contains(small)) {
                    if c.is_satisfied_by(&Type::new("B", *small)) {
                        assert!(c.is_satisfied_by(&Type::new("A", *large)));
                    }
                }
            }
        }
    }
}
