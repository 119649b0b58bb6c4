// FUNCTION TRAITS //////////////////////////////////////////////////////////////////
// The capability set every function implementation provides. Implementations live in
// symbolic_function.rs, marginal_function.rs, composed_function.rs, linear_combination.rs;
// add other implementations here as needed and wrap them into a `Function` handle.

use crate::function::function_errors::FunctionError;
use crate::function::function_handle::Function;
use itertools::Itertools;
use std::fmt::Debug;

pub trait FunctionImplementation: Debug + Send + Sync {
    /// short type name used by `repr`
    fn class_name(&self) -> &'static str;
    fn get_input_dimension(&self) -> usize;
    fn get_output_dimension(&self) -> usize;
    fn get_input_description(&self) -> &[String];
    fn get_output_description(&self) -> &[String];
    /// Evaluates all outputs at `point`; fails with `DimensionMismatch` if
    /// `point.len() != get_input_dimension()`.
    fn evaluate(&self, point: &[f64]) -> Result<Vec<f64>, FunctionError>;
    /// Marginal built from the implementation's own structure. `indices` are already checked
    /// by the caller. `None` makes the handle fall back to a generic `MarginalFunction` view.
    fn marginal(&self, _indices: &[usize]) -> Option<Function> {
        None
    }
    /// Short human readable form, e.g. `[x1,x2]->[x1*sin(x2),cos(x1+x2)]`.
    fn to_display_string(&self) -> String;
    /// Detailed form with class name and descriptions.
    fn repr(&self) -> String {
        format!(
            "class={} inputs=[{}] outputs=[{}] evaluation={}",
            self.class_name(),
            self.get_input_description().iter().join(","),
            self.get_output_description().iter().join(","),
            self.to_display_string()
        )
    }
}

/// `y0, y1, ...` labels used when no output description is given.
pub fn default_output_description(dimension: usize) -> Vec<String> {
    (0..dimension).map(|i| format!("y{}", i)).collect()
}

/// `[a,b]` list formatting shared by the display strings.
pub fn bracketed(items: &[String]) -> String {
    format!("[{}]", items.iter().join(","))
}
