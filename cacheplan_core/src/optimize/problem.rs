//! Provides struct representing an optimization problem
use indexmap::IndexMap;
use thiserror::Error;

use crate::optimize::constraint::Constraint;
use crate::optimize::objective::{Objective, ObjectiveSense};
use crate::optimize::variable::{VarHandle, Variable, VariableType};

/// A mixed-integer linear optimization problem
///
/// Accumulates variables, linear constraints, and a linear objective, then is
/// handed (immutably) to a [`MilpSolver`](crate::optimize::solvers::MilpSolver)
/// for one optimize call. Variables and constraints are keyed by id so that
/// duplicate registrations are caught at build time.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Objective to optimize
    objective: Objective,
    /// Variables of the optimization problem, in handle order
    variables: Vec<Variable>,
    /// Map of variable id to its handle
    variable_ids: IndexMap<String, VarHandle>,
    /// Constraints of the optimization problem, keyed by id
    constraints: IndexMap<String, Constraint>,
    /// Type of problem
    problem_type: ProblemType,
}

impl Problem {
    // region Creation Functions
    /// Create a new optimization problem
    pub fn new(objective_sense: ObjectiveSense) -> Self {
        Self {
            objective: Objective::new(objective_sense),
            variables: Vec::new(),
            variable_ids: IndexMap::new(),
            constraints: IndexMap::new(),
            problem_type: ProblemType::LinearContinuous,
        }
    }

    /// Create a new maximization problem
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization problem
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }
    // endregion Creation Functions

    // region Adding Variables
    /// Add a variable to the optimization problem
    ///
    /// # Returns
    /// The [`VarHandle`] referring to the added variable
    pub fn add_variable(&mut self, variable: Variable) -> Result<VarHandle, ProblemError> {
        self.validate_variable(&variable)?;
        let handle = VarHandle(self.variables.len());
        self.variable_ids.insert(variable.id.clone(), handle);
        if variable.variable_type == VariableType::Binary {
            self.problem_type = ProblemType::LinearMixedInteger;
        }
        self.variables.push(variable);
        Ok(handle)
    }

    /// Create a new variable and add it to the optimization problem
    pub fn add_new_variable(
        &mut self,
        id: &str,
        variable_type: VariableType,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<VarHandle, ProblemError> {
        self.add_variable(Variable {
            id: id.to_string(),
            name: None,
            variable_type,
            lower_bound,
            upper_bound,
        })
    }

    /// Create a new binary variable and add it to the optimization problem
    pub fn add_new_binary_variable(&mut self, id: &str) -> Result<VarHandle, ProblemError> {
        self.add_variable(Variable::new_binary(id))
    }
    // endregion Adding Variables

    // region Adding Constraints
    /// Add a constraint to the problem
    pub fn add_constraint(&mut self, id: &str, constraint: Constraint) -> Result<(), ProblemError> {
        self.validate_constraint(id, &constraint)?;
        self.constraints.insert(id.to_string(), constraint);
        Ok(())
    }

    /// Create a new equality constraint and add it to the problem
    pub fn add_new_equality_constraint(
        &mut self,
        id: &str,
        variables: &[VarHandle],
        coefficients: &[f64],
        equals: f64,
    ) -> Result<(), ProblemError> {
        self.check_term_lengths(variables, coefficients)?;
        self.add_constraint(id, Constraint::new_equality(variables, coefficients, equals))
    }

    /// Create a new inequality constraint and add it to the problem
    pub fn add_new_inequality_constraint(
        &mut self,
        id: &str,
        variables: &[VarHandle],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        self.check_term_lengths(variables, coefficients)?;
        self.add_constraint(
            id,
            Constraint::new_inequality(variables, coefficients, lower_bound, upper_bound),
        )
    }

    /// Create a new `terms <= rhs` constraint and add it to the problem
    pub fn add_new_upper_bounded_constraint(
        &mut self,
        id: &str,
        variables: &[VarHandle],
        coefficients: &[f64],
        rhs: f64,
    ) -> Result<(), ProblemError> {
        self.check_term_lengths(variables, coefficients)?;
        self.add_constraint(id, Constraint::new_upper_bounded(variables, coefficients, rhs))
    }
    // endregion Adding Constraints

    // region Objective
    /// Add a new linear term to the objective
    pub fn add_linear_objective_term(
        &mut self,
        variable: VarHandle,
        coefficient: f64,
    ) -> Result<(), ProblemError> {
        if variable.index() >= self.variables.len() {
            return Err(ProblemError::NonExistentVariableInObjective);
        }
        self.objective.add_linear_term(variable, coefficient);
        Ok(())
    }

    /// Update the objective sense of the problem
    pub fn update_objective_sense(&mut self, sense: ObjectiveSense) {
        self.objective.set_sense(sense);
    }
    // endregion Objective

    // region Accessors
    /// The objective of the problem
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// The variable behind a handle
    pub fn variable(&self, handle: VarHandle) -> &Variable {
        &self.variables[handle.index()]
    }

    /// Look up a variable handle by id
    pub fn variable_by_id(&self, id: &str) -> Option<VarHandle> {
        self.variable_ids.get(id).copied()
    }

    /// All variables, in handle order
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Iterate over all constraints with their ids
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.constraints.iter().map(|(id, c)| (id.as_str(), c))
    }

    /// Current number of variables in the problem
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Current number of constraints in the problem
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Whether the problem contains any binary variables
    pub fn is_mixed_integer(&self) -> bool {
        self.problem_type == ProblemType::LinearMixedInteger
    }
    // endregion Accessors

    // region Validation Functions
    /// Check that a variable to be added is valid to add to this problem
    fn validate_variable(&self, variable: &Variable) -> Result<(), ProblemError> {
        if self.variable_ids.contains_key(&variable.id) {
            return Err(ProblemError::VariableIdAlreadyExists);
        }
        if variable.lower_bound > variable.upper_bound {
            return Err(ProblemError::InvalidVariableBounds);
        }
        Ok(())
    }

    /// Check that a constraint to be added is valid to add to this problem
    fn validate_constraint(&self, id: &str, constraint: &Constraint) -> Result<(), ProblemError> {
        if self.constraints.contains_key(id) {
            return Err(ProblemError::ConstraintAlreadyExists);
        }
        if let Constraint::Inequality {
            lower_bound,
            upper_bound,
            ..
        } = constraint
        {
            if lower_bound > upper_bound {
                return Err(ProblemError::InvalidConstraintBounds);
            }
        }
        // Check that the variables in this constraint are in the problem
        for term in constraint.terms() {
            if term.variable.index() >= self.variables.len() {
                return Err(ProblemError::NonExistentVariableInConstraint);
            }
        }
        Ok(())
    }

    fn check_term_lengths(
        &self,
        variables: &[VarHandle],
        coefficients: &[f64],
    ) -> Result<(), ProblemError> {
        if variables.len() != coefficients.len() {
            return Err(ProblemError::MismatchedTermLengths);
        }
        Ok(())
    }
    // endregion Validation Functions
}

/// Types of optimization problems
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemType {
    /// Problem with linear objective and constraints, and continuous variables
    LinearContinuous,
    /// Problem with linear objective and constraints, with binary variables
    LinearMixedInteger,
}

/// Errors associated with building a Problem
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add a variable with the same id as an existing variable")]
    VariableIdAlreadyExists,
    /// Error when trying to add variable with invalid bounds
    #[error("Tried to add a variable with lower_bound>upper_bound")]
    InvalidVariableBounds,
    /// Error when trying to add a constraint with the same id as an existing constraint
    #[error("Tried to add a constraint with the same id as an existing constraint")]
    ConstraintAlreadyExists,
    /// Error when trying to add a constraint with invalid bounds
    #[error("Tried to add an inequality constraint with lower_bound > upper_bound")]
    InvalidConstraintBounds,
    /// Error when trying to add a constraint that contains variables not in the problem
    #[error("Tried to add a constraint with variables not in the problem")]
    NonExistentVariableInConstraint,
    /// Error when trying to add an objective term which includes variables not in the problem
    #[error("Tried adding an objective term with variables not in the problem")]
    NonExistentVariableInObjective,
    /// Error when variable and coefficient slices differ in length
    #[error("Tried to add a constraint with mismatched variable and coefficient counts")]
    MismatchedTermLengths,
}
