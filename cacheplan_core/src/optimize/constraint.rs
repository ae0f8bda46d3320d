//! Provides struct for representing a constraint in an optimization problem
use std::fmt::{Display, Formatter};

use crate::optimize::variable::VarHandle;

/// Represents a linear constraint in an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Represents an equality constraint, where `terms` = `equals`
    Equality {
        /// Linear terms which are added together, see [`ConstraintTerm`] for more
        terms: Vec<ConstraintTerm>,
        /// The right hand side of the equality constraint
        equals: f64,
    },
    /// Represents an inequality constraint
    Inequality {
        /// Linear terms which are added together, see [`ConstraintTerm`] for more
        terms: Vec<ConstraintTerm>,
        /// The lowest value the sum of the terms can take
        lower_bound: f64,
        /// The highest value the sum of the terms can take
        upper_bound: f64,
    },
}

impl Constraint {
    /// Create a new equality constraint
    ///
    /// # Parameters
    /// - `variables`: A slice of variable handles
    /// - `coefficients`: A slice of coefficients for the variables
    /// - `equals`: The right hand side of the equality
    pub fn new_equality(variables: &[VarHandle], coefficients: &[f64], equals: f64) -> Self {
        Constraint::Equality {
            terms: Constraint::zip_into_terms(variables, coefficients),
            equals,
        }
    }

    /// Create a new inequality constraint
    ///
    /// # Parameters
    /// - `variables`: A slice of variable handles
    /// - `coefficients`: A slice of coefficients for the variables
    /// - `lower_bound`: The lowest value the constraint can take
    /// - `upper_bound`: The highest value the constraint can take
    pub fn new_inequality(
        variables: &[VarHandle],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Self {
        Constraint::Inequality {
            terms: Constraint::zip_into_terms(variables, coefficients),
            lower_bound,
            upper_bound,
        }
    }

    /// Create a `terms <= rhs` constraint (unbounded below)
    pub fn new_upper_bounded(variables: &[VarHandle], coefficients: &[f64], rhs: f64) -> Self {
        Constraint::new_inequality(variables, coefficients, f64::NEG_INFINITY, rhs)
    }

    /// Create a `terms >= rhs` constraint (unbounded above)
    pub fn new_lower_bounded(variables: &[VarHandle], coefficients: &[f64], rhs: f64) -> Self {
        Constraint::new_inequality(variables, coefficients, rhs, f64::INFINITY)
    }

    /// The linear terms of the constraint
    pub fn terms(&self) -> &[ConstraintTerm] {
        match self {
            Constraint::Equality { terms, .. } => terms,
            Constraint::Inequality { terms, .. } => terms,
        }
    }

    /// Evaluate the left hand side of the constraint for a full assignment of
    /// variable values (indexed by variable position)
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms()
            .iter()
            .map(|term| term.coefficient * values[term.variable.index()])
            .sum()
    }

    /// Whether an assignment of variable values satisfies the constraint,
    /// within `tolerance`
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.evaluate(values);
        match self {
            Constraint::Equality { equals, .. } => (lhs - equals).abs() <= tolerance,
            Constraint::Inequality {
                lower_bound,
                upper_bound,
                ..
            } => lhs >= lower_bound - tolerance && lhs <= upper_bound + tolerance,
        }
    }

    /// Take a slice of variable handles, and a slice of coefficients and zip
    /// them together into a vec of ConstraintTerms
    fn zip_into_terms(variables: &[VarHandle], coefficients: &[f64]) -> Vec<ConstraintTerm> {
        variables
            .iter()
            .zip(coefficients)
            .map(|(var, coef)| ConstraintTerm {
                variable: *var,
                coefficient: *coef,
            })
            .collect()
    }

    /// Convert a vector of terms into a String representation
    fn terms_to_string(terms: &[ConstraintTerm]) -> String {
        if terms.is_empty() {
            return "0".to_string();
        }
        let mut str_rep = String::new();
        for t in &terms[..terms.len() - 1] {
            str_rep.push_str(format!("{} + ", t).as_str());
        }
        str_rep.push_str(format!("{}", terms.last().unwrap()).as_str());
        str_rep
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Equality { terms, equals } => {
                write!(f, "{} = {}", Self::terms_to_string(terms), equals)
            }
            Constraint::Inequality {
                terms,
                lower_bound,
                upper_bound,
            } => {
                write!(
                    f,
                    "{} <= {} <= {}",
                    lower_bound,
                    Self::terms_to_string(terms),
                    upper_bound
                )
            }
        }
    }
}

/// Represents a single term in a constraint, specifically
/// represents the multiplication of the `variable` by the `coefficient`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintTerm {
    /// Handle of the variable
    pub variable: VarHandle,
    /// The coefficient for the variable
    pub coefficient: f64,
}

impl Display for ConstraintTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*{}", self.coefficient, self.variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let cons = Constraint::new_inequality(&[VarHandle(0), VarHandle(1)], &[3.0, 2.0], 2.0, 6.0);
        assert_eq!(format!("{}", cons), "2 <= 3*v0 + 2*v1 <= 6");

        let cons = Constraint::new_equality(&[VarHandle(2)], &[1.0], 4.0);
        assert_eq!(format!("{}", cons), "1*v2 = 4");
    }

    #[test]
    fn satisfaction() {
        // 10*v0 + 20*v1 <= 25
        let cons = Constraint::new_upper_bounded(&[VarHandle(0), VarHandle(1)], &[10.0, 20.0], 25.0);
        assert!(cons.is_satisfied(&[0.0, 1.0], 1e-9));
        assert!(!cons.is_satisfied(&[1.0, 1.0], 1e-9));

        // v0 - v1 <= 0, the coupling shape
        let couple = Constraint::new_upper_bounded(&[VarHandle(0), VarHandle(1)], &[1.0, -1.0], 0.0);
        assert!(couple.is_satisfied(&[0.0, 0.0], 1e-9));
        assert!(couple.is_satisfied(&[1.0, 1.0], 1e-9));
        assert!(!couple.is_satisfied(&[1.0, 0.0], 1e-9));
    }
}
