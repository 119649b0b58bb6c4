//! Vector valued function given by one formula per output over an ordered list of inputs.
//!
//! # Example
//! ```
//! use RustedFunctions::function::symbolic_function::SymbolicFunction;
//! use RustedFunctions::function::function_traits::FunctionImplementation;
//! let f = SymbolicFunction::new(&["x1", "x2"], &["x1*sin(x2)", "cos(x1+x2)"]).unwrap();
//! assert_eq!(f.get_input_dimension(), 2);
//! assert_eq!(f.get_output_dimension(), 2);
//! let y = f.evaluate(&[1.0, 0.0]).unwrap();
//! assert_eq!(y[0], 0.0);
//! ```
use crate::function::function_errors::{FunctionError, check_description};
use crate::function::function_handle::Function;
use crate::function::function_traits::{
    FunctionImplementation, bracketed, default_output_description,
};
use crate::symbolic::parse_expr::parse_expression;
use crate::symbolic::symbolic_engine::Expr;
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SymbolicFunction {
    input_description: Arc<[String]>, // shared with every marginal
    output_description: Vec<String>,
    formulas: Vec<String>,         // formulas as the user wrote them (trimmed)
    expressions: Vec<Arc<Expr>>,   // one parsed tree per output, shared with marginals
}

impl SymbolicFunction {
    /// Parses every formula against `inputs`.
    ///
    /// Fails with `Arity` when `formulas` is empty, `Description` when an input name is not an
    /// identifier or is repeated, `Parse` (with the index of the formula) when a formula is
    /// rejected by the parser.
    pub fn new<S: AsRef<str>, F: AsRef<str>>(
        inputs: &[S],
        formulas: &[F],
    ) -> Result<Self, FunctionError> {
        if formulas.is_empty() {
            return Err(FunctionError::Arity(
                "a symbolic function needs at least one output formula".to_string(),
            ));
        }
        let input_description: Vec<String> =
            inputs.iter().map(|s| s.as_ref().to_string()).collect();
        check_description(&input_description, "input")?;

        let mut expressions = Vec::with_capacity(formulas.len());
        let mut formula_strings = Vec::with_capacity(formulas.len());
        for (index, formula) in formulas.iter().enumerate() {
            let formula = formula.as_ref().trim();
            let expr = parse_expression(formula, &input_description).map_err(|source| {
                FunctionError::Parse {
                    index,
                    formula: formula.to_string(),
                    source,
                }
            })?;
            debug!(
                "output #{}: {} node(s), depth {}",
                index,
                expr.node_count(),
                expr.depth()
            );
            expressions.push(Arc::new(expr));
            formula_strings.push(formula.to_string());
        }

        let used: BTreeSet<usize> = expressions.iter().flat_map(|e| e.variables()).collect();
        for (i, name) in input_description.iter().enumerate() {
            if !used.contains(&i) {
                warn!("input variable '{}' is not used by any output formula", name);
            }
        }
        info!(
            "symbolic function created: {} input(s), {} output(s)",
            input_description.len(),
            expressions.len()
        );
        Ok(SymbolicFunction {
            input_description: input_description.into(),
            output_description: default_output_description(expressions.len()),
            formulas: formula_strings,
            expressions,
        })
    }

    /// Replaces the default `y0, y1, ...` output labels.
    pub fn with_output_description<S: AsRef<str>>(
        mut self,
        names: &[S],
    ) -> Result<Self, FunctionError> {
        let names: Vec<String> = names.iter().map(|s| s.as_ref().to_string()).collect();
        if names.len() != self.expressions.len() {
            return Err(FunctionError::Description(format!(
                "{} output name(s) given for {} output formula(s)",
                names.len(),
                self.expressions.len()
            )));
        }
        check_description(&names, "output")?;
        self.output_description = names;
        Ok(self)
    }

    pub fn get_formulas(&self) -> &[String] {
        &self.formulas
    }

    /// Symbolic function made of the selected outputs. The result shares this function's input
    /// description and expression trees instead of copying or re-parsing them. Indices are
    /// checked by [`Function::get_marginal_indices`].
    fn select(&self, indices: &[usize]) -> SymbolicFunction {
        SymbolicFunction {
            input_description: Arc::clone(&self.input_description),
            output_description: indices
                .iter()
                .map(|&i| self.output_description[i].clone())
                .collect(),
            formulas: indices.iter().map(|&i| self.formulas[i].clone()).collect(),
            expressions: indices
                .iter()
                .map(|&i| Arc::clone(&self.expressions[i]))
                .collect(),
        }
    }
}

impl FunctionImplementation for SymbolicFunction {
    fn class_name(&self) -> &'static str {
        "SymbolicFunction"
    }

    fn get_input_dimension(&self) -> usize {
        self.input_description.len()
    }

    fn get_output_dimension(&self) -> usize {
        self.expressions.len()
    }

    fn get_input_description(&self) -> &[String] {
        &self.input_description
    }

    fn get_output_description(&self) -> &[String] {
        &self.output_description
    }

    fn evaluate(&self, point: &[f64]) -> Result<Vec<f64>, FunctionError> {
        let dimension = self.input_description.len();
        self.expressions
            .iter()
            .map(|e| e.evaluate(point, dimension))
            .collect()
    }

    fn marginal(&self, indices: &[usize]) -> Option<Function> {
        Some(Function::new(self.select(indices)))
    }

    fn to_display_string(&self) -> String {
        format!(
            "{}->{}",
            bracketed(&self.input_description),
            bracketed(&self.formulas)
        )
    }

    fn repr(&self) -> String {
        format!(
            "class={} inputs={} outputs={} formulas={}",
            self.class_name(),
            bracketed(&self.input_description),
            bracketed(&self.output_description),
            bracketed(&self.formulas)
        )
    }
}
