// Linear combination x -> c0*f0(x) + c1*f1(x) + ... of functions sharing the same dimensions.

use crate::function::function_errors::{FunctionError, check_point_dimension};
use crate::function::function_handle::Function;
use crate::function::function_traits::FunctionImplementation;
use itertools::Itertools;

#[derive(Debug, Clone)]
pub struct LinearCombinationFunction {
    functions: Vec<Function>,
    coefficients: Vec<f64>,
}

impl LinearCombinationFunction {
    pub fn new(functions: Vec<Function>, coefficients: Vec<f64>) -> Result<Self, FunctionError> {
        let Some(first) = functions.first() else {
            return Err(FunctionError::Arity(
                "a linear combination needs at least one function".to_string(),
            ));
        };
        if functions.len() != coefficients.len() {
            return Err(FunctionError::Arity(format!(
                "{} coefficient(s) given for {} function(s)",
                coefficients.len(),
                functions.len()
            )));
        }
        let (input_dimension, output_dimension) =
            (first.get_input_dimension(), first.get_output_dimension());
        for f in functions.iter().skip(1) {
            if f.get_input_dimension() != input_dimension {
                return Err(FunctionError::DimensionMismatch {
                    expected: input_dimension,
                    got: f.get_input_dimension(),
                });
            }
            if f.get_output_dimension() != output_dimension {
                return Err(FunctionError::DimensionMismatch {
                    expected: output_dimension,
                    got: f.get_output_dimension(),
                });
            }
        }
        Ok(LinearCombinationFunction {
            functions,
            coefficients,
        })
    }

    pub fn get_functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn get_coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

impl FunctionImplementation for LinearCombinationFunction {
    fn class_name(&self) -> &'static str {
        "LinearCombinationFunction"
    }

    fn get_input_dimension(&self) -> usize {
        self.functions[0].get_input_dimension()
    }

    fn get_output_dimension(&self) -> usize {
        self.functions[0].get_output_dimension()
    }

    fn get_input_description(&self) -> &[String] {
        self.functions[0].get_input_description()
    }

    fn get_output_description(&self) -> &[String] {
        self.functions[0].get_output_description()
    }

    fn evaluate(&self, point: &[f64]) -> Result<Vec<f64>, FunctionError> {
        check_point_dimension(point, self.get_input_dimension())?;
        let mut result = vec![0.0; self.get_output_dimension()];
        for (f, c) in self.functions.iter().zip(&self.coefficients) {
            let values = f.evaluate(point)?;
            for (r, v) in result.iter_mut().zip(values) {
                *r += c * v;
            }
        }
        Ok(result)
    }

    fn marginal(&self, indices: &[usize]) -> Option<Function> {
        let functions = self
            .functions
            .iter()
            .map(|f| f.get_marginal_indices(indices))
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        Some(Function::new(LinearCombinationFunction {
            functions,
            coefficients: self.coefficients.clone(),
        }))
    }

    fn to_display_string(&self) -> String {
        self.functions
            .iter()
            .zip(&self.coefficients)
            .map(|(f, c)| format!("({})*{}", c, f.to_display_string()))
            .join("+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pair() -> (Function, Function) {
        (
            Function::symbolic(&["x", "y"], &["x", "y^2"]).unwrap(),
            Function::symbolic(&["x", "y"], &["sin(x)", "1"]).unwrap(),
        )
    }

    #[test]
    fn test_evaluate() {
        let (f, g) = pair();
        let h = LinearCombinationFunction::new(vec![f, g], vec![2.0, -1.0]).unwrap();
        assert_eq!(h.get_functions().len(), 2);
        assert_eq!(h.get_coefficients(), &[2.0, -1.0]);
        let y = h.evaluate(&[1.0, 3.0]).unwrap();
        assert_relative_eq!(y[0], 2.0 - 1.0f64.sin());
        assert_relative_eq!(y[1], 17.0);
        assert!(h.evaluate(&[1.0]).is_err());
    }

    #[test]
    fn test_invalid_construction() {
        let (f, g) = pair();
        assert!(matches!(
            LinearCombinationFunction::new(vec![], vec![]),
            Err(FunctionError::Arity(_))
        ));
        assert!(matches!(
            LinearCombinationFunction::new(vec![f.clone(), g], vec![1.0]),
            Err(FunctionError::Arity(_))
        ));
        let wide = Function::symbolic(&["x", "y"], &["x", "y", "x*y"]).unwrap();
        assert_eq!(
            LinearCombinationFunction::new(vec![f, wide], vec![1.0, 1.0]).unwrap_err(),
            FunctionError::DimensionMismatch {
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn test_marginal_and_display() {
        let (f, g) = pair();
        let h = Function::new(LinearCombinationFunction::new(vec![f, g], vec![2.0, -1.0]).unwrap());
        assert_eq!(
            h.to_display_string(),
            "(2)*[x,y]->[x,y^2]+(-1)*[x,y]->[sin(x),1]"
        );
        let m = h.get_marginal(1).unwrap();
        assert_eq!(m.class_name(), "LinearCombinationFunction");
        assert_eq!(m.evaluate(&[1.0, 3.0]).unwrap(), vec![17.0]);
        assert_eq!(m.to_display_string(), "(2)*[x,y]->[y^2]+(-1)*[x,y]->[1]");
    }
}
