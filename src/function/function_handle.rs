//! `Function`: cheap, cloneable handle over a shared function implementation.
//!
//! Cloning a handle does not copy the implementation: both handles refer to the same
//! object, see [`Function::shares_implementation_with`]. Implementations are immutable once
//! built so a shared handle can be evaluated from several threads at once.
//!
//! # Example
//! ```
//! use RustedFunctions::function::function_handle::Function;
//! let f = Function::symbolic(&["x1", "x2"], &["x1*sin(x2)", "cos(x1+x2)", "(x2+1)*exp(x1-2*x2)"]).unwrap();
//! let y = f.evaluate(&[1.0, 0.0]).unwrap();
//! assert_eq!(y.len(), 3);
//! let g = f.get_marginal(1).unwrap();
//! assert_eq!(g.get_output_dimension(), 1);
//! println!("{}", f);
//! ```
use crate::function::function_errors::{FunctionError, check_marginal_indices};
use crate::function::function_traits::FunctionImplementation;
use crate::function::marginal_function::MarginalFunction;
use crate::function::symbolic_function::SymbolicFunction;
use log::debug;
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;
use tabled::{builder::Builder, settings::Style};

#[derive(Clone, Debug)]
pub struct Function {
    implementation: Arc<dyn FunctionImplementation>,
}

impl Function {
    pub fn new<F: FunctionImplementation + 'static>(implementation: F) -> Self {
        Function {
            implementation: Arc::new(implementation),
        }
    }

    /// Shortcut for `Function::new(SymbolicFunction::new(inputs, formulas)?)`.
    pub fn symbolic<S: AsRef<str>, F: AsRef<str>>(
        inputs: &[S],
        formulas: &[F],
    ) -> Result<Self, FunctionError> {
        Ok(Function::new(SymbolicFunction::new(inputs, formulas)?))
    }

    /// true if both handles refer to the same implementation object
    pub fn shares_implementation_with(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.implementation, &other.implementation)
    }

    pub fn class_name(&self) -> &'static str {
        self.implementation.class_name()
    }

    pub fn get_input_dimension(&self) -> usize {
        self.implementation.get_input_dimension()
    }

    pub fn get_output_dimension(&self) -> usize {
        self.implementation.get_output_dimension()
    }

    pub fn get_input_description(&self) -> &[String] {
        self.implementation.get_input_description()
    }

    pub fn get_output_description(&self) -> &[String] {
        self.implementation.get_output_description()
    }

    pub fn evaluate(&self, point: &[f64]) -> Result<Vec<f64>, FunctionError> {
        self.implementation.evaluate(point)
    }

    pub fn evaluate_DVector(&self, point: &DVector<f64>) -> Result<DVector<f64>, FunctionError> {
        let values = self.implementation.evaluate(point.as_slice())?;
        Ok(DVector::from_vec(values))
    }

    /// Evaluates every row of `sample` (one point per row). Rows are processed in parallel,
    /// the result has one row per input row and one column per output.
    pub fn evaluate_sample(&self, sample: &DMatrix<f64>) -> Result<DMatrix<f64>, FunctionError> {
        let input_dimension = self.get_input_dimension();
        let output_dimension = self.get_output_dimension();
        if sample.ncols() != input_dimension {
            return Err(FunctionError::DimensionMismatch {
                expected: input_dimension,
                got: sample.ncols(),
            });
        }
        let rows: Vec<Vec<f64>> = (0..sample.nrows())
            .into_par_iter()
            .map(|r| {
                let point: Vec<f64> = sample.row(r).iter().copied().collect();
                let values = self.implementation.evaluate(&point)?;
                if values.len() != output_dimension {
                    return Err(FunctionError::DimensionMismatch {
                        expected: output_dimension,
                        got: values.len(),
                    });
                }
                Ok(values)
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "evaluated a sample of {} point(s) with {}",
            rows.len(),
            self.class_name()
        );
        Ok(DMatrix::from_fn(sample.nrows(), output_dimension, |r, c| {
            rows[r][c]
        }))
    }

    /// Function made of output `index` only.
    pub fn get_marginal(&self, index: usize) -> Result<Function, FunctionError> {
        self.get_marginal_indices(&[index])
    }

    /// Function made of the selected outputs, in the given order (repetitions allowed).
    /// The input side is unchanged. Implementations that know their own structure build the
    /// marginal themselves, the others are wrapped into a [`MarginalFunction`] view.
    pub fn get_marginal_indices(&self, indices: &[usize]) -> Result<Function, FunctionError> {
        check_marginal_indices(indices, self.get_output_dimension())?;
        match self.implementation.marginal(indices) {
            Some(marginal) => Ok(marginal),
            None => {
                debug!(
                    "{} has no specialised marginal, using a generic view",
                    self.class_name()
                );
                Ok(Function::new(MarginalFunction::new(
                    self.clone(),
                    indices.to_vec(),
                )?))
            }
        }
    }

    pub fn to_display_string(&self) -> String {
        self.implementation.to_display_string()
    }

    pub fn repr(&self) -> String {
        self.implementation.repr()
    }

    /// Table of inputs and outputs (with the marginal of every output), for logs and reports.
    pub fn summary_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(vec![
            "role".to_string(),
            "index".to_string(),
            "name".to_string(),
            "definition".to_string(),
        ]);
        for (i, name) in self.get_input_description().iter().enumerate() {
            builder.push_record(vec![
                "input".to_string(),
                i.to_string(),
                name.clone(),
                String::new(),
            ]);
        }
        for (i, name) in self.get_output_description().iter().enumerate() {
            let definition = self
                .get_marginal(i)
                .map(|m| m.to_display_string())
                .unwrap_or_default();
            builder.push_record(vec!["output".to_string(), i.to_string(), name.clone(), definition]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.implementation.to_display_string())
    }
}
