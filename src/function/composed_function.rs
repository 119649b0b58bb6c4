// Composition x -> left(right(x)).

use crate::function::function_errors::FunctionError;
use crate::function::function_handle::Function;
use crate::function::function_traits::FunctionImplementation;
use log::info;

#[derive(Debug, Clone)]
pub struct ComposedFunction {
    left: Function,
    right: Function,
}

impl ComposedFunction {
    /// `left` must take as many inputs as `right` produces outputs.
    pub fn new(left: Function, right: Function) -> Result<Self, FunctionError> {
        if left.get_input_dimension() != right.get_output_dimension() {
            return Err(FunctionError::DimensionMismatch {
                expected: left.get_input_dimension(),
                got: right.get_output_dimension(),
            });
        }
        info!(
            "composed function: {} -> {} -> {}",
            right.get_input_dimension(),
            right.get_output_dimension(),
            left.get_output_dimension()
        );
        Ok(ComposedFunction { left, right })
    }

    pub fn get_left_function(&self) -> &Function {
        &self.left
    }

    pub fn get_right_function(&self) -> &Function {
        &self.right
    }
}

impl FunctionImplementation for ComposedFunction {
    fn class_name(&self) -> &'static str {
        "ComposedFunction"
    }

    fn get_input_dimension(&self) -> usize {
        self.right.get_input_dimension()
    }

    fn get_output_dimension(&self) -> usize {
        self.left.get_output_dimension()
    }

    fn get_input_description(&self) -> &[String] {
        self.right.get_input_description()
    }

    fn get_output_description(&self) -> &[String] {
        self.left.get_output_description()
    }

    fn evaluate(&self, point: &[f64]) -> Result<Vec<f64>, FunctionError> {
        let inner = self.right.evaluate(point)?;
        self.left.evaluate(&inner)
    }

    // only the outer function is cut, the inner one is shared as is
    fn marginal(&self, indices: &[usize]) -> Option<Function> {
        let left = self.left.get_marginal_indices(indices).ok()?;
        Some(Function::new(ComposedFunction {
            left,
            right: self.right.clone(),
        }))
    }

    fn to_display_string(&self) -> String {
        format!(
            "({})o({})",
            self.left.to_display_string(),
            self.right.to_display_string()
        )
    }
}
