//! Backend-independent integer program model.
//!
//! A [`Model`] is a list of variables, linear constraints and a linear
//! objective to minimize:
//!
//! ```text
//! minimize    Σ c_k · v_k
//! subject to  Σ a_ik · v_k  (<= | >= | ==)  b_i     for every constraint i
//!             v_k ∈ {0, 1}                           for binary variables
//! ```
//!
//! Backends translate this into their own representation; nothing here
//! depends on a concrete solver library.

use crate::error::{Result, SolveError};

/// Handle to a variable inside one [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// Domain of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// 0 or 1.
    Binary,
    /// Continuous in `[lower, upper]`.
    Continuous { lower: f64, upper: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub domain: Domain,
}

/// Σ coefficient · variable + constant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::with_capacity(capacity),
            constant: 0.0,
        }
    }

    /// Sum of the given variables with coefficient 1.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    pub fn add(&mut self, var: VarId, coefficient: f64) -> &mut Self {
        self.terms.push((var, coefficient));
        self
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|&(var, c)| c * values.get(var.0).copied().unwrap_or(0.0))
                .sum::<f64>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessEq,
    GreaterEq,
    Equal,
}

/// `expr relation rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.relation {
            Relation::LessEq => lhs <= self.rhs + tolerance,
            Relation::GreaterEq => lhs >= self.rhs - tolerance,
            Relation::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// A minimization problem over linear constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.add_variable(name, Domain::Binary)
    }

    pub fn add_variable(&mut self, name: impl Into<String>, domain: Domain) -> VarId {
        self.variables.push(Variable {
            name: name.into(),
            domain,
        });
        VarId(self.variables.len() - 1)
    }

    pub fn add_constraint(&mut self, expr: LinearExpr, relation: Relation, rhs: f64) {
        self.constraints.push(Constraint {
            expr,
            relation,
            rhs,
        });
    }

    pub fn less_eq(&mut self, expr: LinearExpr, rhs: f64) {
        self.add_constraint(expr, Relation::LessEq, rhs);
    }

    pub fn greater_eq(&mut self, expr: LinearExpr, rhs: f64) {
        self.add_constraint(expr, Relation::GreaterEq, rhs);
    }

    pub fn equal(&mut self, expr: LinearExpr, rhs: f64) {
        self.add_constraint(expr, Relation::Equal, rhs);
    }

    pub fn minimize(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Reject references to variables the model does not define.
    pub fn validate(&self) -> Result<()> {
        let n = self.variables.len();
        let exprs = std::iter::once(&self.objective).chain(self.constraints.iter().map(|c| &c.expr));
        for expr in exprs {
            if let Some((var, _)) = expr.terms.iter().find(|(var, _)| var.0 >= n) {
                return Err(SolveError::InvalidModel(format!(
                    "variable #{} referenced but only {} defined",
                    var.0, n
                )));
            }
        }
        Ok(())
    }

    /// Whether `values` satisfy every constraint and variable domain.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.variables.len()
            && self.variables.iter().zip(values).all(|(var, &v)| match var.domain {
                Domain::Binary => v.abs() <= tolerance || (v - 1.0).abs() <= tolerance,
                Domain::Continuous { lower, upper } => {
                    v >= lower - tolerance && v <= upper + tolerance
                }
            })
            && self.constraints.iter().all(|c| c.is_satisfied(values, tolerance))
    }
}

/// Values found by a solver, indexed by [`VarId`].
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    values: Vec<f64>,
    objective: f64,
}

impl Solution {
    pub fn new(values: Vec<f64>, objective: f64) -> Self {
        Self { values, objective }
    }

    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.0).copied().unwrap_or(0.0)
    }

    /// Binary read-back: true when the value rounds to 1.
    pub fn is_set(&self, var: VarId) -> bool {
        self.value(var) > 0.5
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expressions_evaluate_with_constant() {
        let mut model = Model::new();
        let a = model.add_binary("a");
        let b = model.add_binary("b");
        let mut expr = LinearExpr::sum([a, b]);
        expr.add(a, 2.0);
        expr.constant = 0.5;
        assert_eq!(expr.evaluate(&[1.0, 1.0]), 4.5);
        assert_eq!(expr.evaluate(&[0.0, 1.0]), 1.5);
    }

    #[test]
    fn feasibility_checks_domains_and_constraints() {
        let mut model = Model::new();
        let a = model.add_binary("a");
        let b = model.add_binary("b");
        model.equal(LinearExpr::sum([a, b]), 1.0);

        assert!(model.is_feasible(&[1.0, 0.0], 1e-9));
        assert!(!model.is_feasible(&[1.0, 1.0], 1e-9));
        assert!(!model.is_feasible(&[0.5, 0.5], 1e-9));
        assert!(!model.is_feasible(&[1.0], 1e-9));
    }

    #[test]
    fn validate_catches_foreign_variables() {
        let mut other = Model::new();
        other.add_binary("x");
        let foreign = other.add_binary("y");

        let mut model = Model::new();
        model.add_binary("only");
        model.minimize(LinearExpr::sum([foreign]));
        assert!(matches!(model.validate(), Err(SolveError::InvalidModel(_))));
    }

    #[test]
    fn solution_reads_binaries_with_threshold() {
        let solution = Solution::new(vec![0.9999, 0.0001], 3.0);
        assert!(solution.is_set(VarId(0)));
        assert!(!solution.is_set(VarId(1)));
        assert!(!solution.is_set(VarId(7)));
        assert_eq!(solution.objective(), 3.0);
    }
}
