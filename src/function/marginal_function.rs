// Generic marginal: a view selecting some outputs of any function. Used for implementations that
// cannot build a marginal of their own kind.

use crate::function::function_errors::{FunctionError, check_marginal_indices};
use crate::function::function_handle::Function;
use crate::function::function_traits::FunctionImplementation;
use itertools::Itertools;

#[derive(Debug, Clone)]
pub struct MarginalFunction {
    parent: Function,
    indices: Vec<usize>,
    output_description: Vec<String>,
}

impl MarginalFunction {
    pub fn new(parent: Function, indices: Vec<usize>) -> Result<Self, FunctionError> {
        check_marginal_indices(&indices, parent.get_output_dimension())?;
        let output_description = indices
            .iter()
            .map(|&i| parent.get_output_description()[i].clone())
            .collect();
        Ok(MarginalFunction {
            parent,
            indices,
            output_description,
        })
    }

    pub fn get_parent(&self) -> &Function {
        &self.parent
    }

    pub fn get_indices(&self) -> &[usize] {
        &self.indices
    }
}

impl FunctionImplementation for MarginalFunction {
    fn class_name(&self) -> &'static str {
        "MarginalFunction"
    }

    fn get_input_dimension(&self) -> usize {
        self.parent.get_input_dimension()
    }

    fn get_output_dimension(&self) -> usize {
        self.indices.len()
    }

    fn get_input_description(&self) -> &[String] {
        self.parent.get_input_description()
    }

    fn get_output_description(&self) -> &[String] {
        &self.output_description
    }

    fn evaluate(&self, point: &[f64]) -> Result<Vec<f64>, FunctionError> {
        let values = self.parent.evaluate(point)?;
        Ok(self.indices.iter().map(|&i| values[i]).collect())
    }

    // a marginal of a marginal selects directly from the parent, no nested views
    fn marginal(&self, indices: &[usize]) -> Option<Function> {
        let selected: Vec<usize> = indices.iter().map(|&j| self.indices[j]).collect();
        let output_description = indices
            .iter()
            .map(|&j| self.output_description[j].clone())
            .collect();
        Some(Function::new(MarginalFunction {
            parent: self.parent.clone(),
            indices: selected,
            output_description,
        }))
    }

    fn to_display_string(&self) -> String {
        format!(
            "({})[{}]",
            self.parent.to_display_string(),
            self.indices.iter().join(",")
        )
    }
}
