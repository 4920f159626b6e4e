//! Solver-independent description of a (mixed-integer) linear program.
//!
//! Formulations declare variables and constraints here; an `LpSolver`
//! translates the description to a concrete backend.

/// Handle to a variable declared in a `LinearProgram`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarKind {
    Continuous {
        lower: Option<f64>,
        upper: Option<f64>,
    },
    Binary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDef {
    pub name: String,
    pub kind: VarKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Geq,
    Leq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// A weighted sum of variables.
pub type Terms = Vec<(VarId, f64)>;

/// `Σ coef·var  <cmp>  rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub terms: Terms,
    pub cmp: Cmp,
    pub rhs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    variables: Vec<VarDef>,
    constraints: Vec<Constraint>,
    objective: Terms,
    sense: Sense,
}

impl Default for LinearProgram {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearProgram {
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: Vec::new(),
            sense: Sense::Minimize,
        }
    }

    /// Declare a continuous variable; `None` bounds are unbounded.
    pub fn continuous(
        &mut self,
        name: impl Into<String>,
        lower: Option<f64>,
        upper: Option<f64>,
    ) -> VarId {
        self.declare(name.into(), VarKind::Continuous { lower, upper })
    }

    /// Declare a continuous variable bounded below by zero.
    pub fn non_negative(&mut self, name: impl Into<String>) -> VarId {
        self.continuous(name, Some(0.0), None)
    }

    pub fn binary(&mut self, name: impl Into<String>) -> VarId {
        self.declare(name.into(), VarKind::Binary)
    }

    fn declare(&mut self, name: String, kind: VarKind) -> VarId {
        self.variables.push(VarDef { name, kind });
        VarId(self.variables.len() - 1)
    }

    pub fn constrain(&mut self, terms: Terms, cmp: Cmp, rhs: f64) {
        self.constraints.push(Constraint { terms, cmp, rhs });
    }

    pub fn set_objective(&mut self, terms: Terms, sense: Sense) {
        self.objective = terms;
        self.sense = sense;
    }

    pub fn variables(&self) -> &[VarDef] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &[(VarId, f64)] {
        &self.objective
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// True when any variable is binary (the program needs a MIP solver).
    pub fn is_mixed_integer(&self) -> bool {
        self.variables.iter().any(|v| v.kind == VarKind::Binary)
    }
}

/// Optimal variable values returned by a solver.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    values: Vec<f64>,
    objective: f64,
}

impl LpSolution {
    /// `values` must be indexed like the program's variables.
    pub fn new(program: &LinearProgram, values: Vec<f64>) -> Self {
        let objective = program
            .objective()
            .iter()
            .map(|&(var, coef)| coef * values[var.index()])
            .sum();
        Self { values, objective }
    }

    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }

    pub fn values(&self, vars: &[VarId]) -> Vec<f64> {
        vars.iter().map(|&v| self.value(v)).collect()
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }
}
