//! Vector valued functions of real variables behind a shared handle.
//!
//! # Example
//! ```
//! use RustedFunctions::function::function_handle::Function;
//! let f = Function::symbolic(&["x1", "x2"], &["x1*sin(x2)", "cos(x1+x2)"]).unwrap();
//! let g = f.get_marginal(0).unwrap();
//! assert_eq!(g.evaluate(&[1.0, 0.0]).unwrap(), vec![0.0]);
//! println!("{}", f.summary_table());
//! ```
/// error enum and argument checks shared by all implementations
pub mod function_errors;
/// the capability set of a function implementation
pub mod function_traits;
/// `Function`: reference counted handle, evaluation of points and samples, marginals
pub mod function_handle;
/// functions defined by one formula per output
pub mod symbolic_function;
/// generic marginal view
pub mod marginal_function;
/// x -> f(g(x))
pub mod composed_function;
/// x -> sum c_i f_i(x)
pub mod linear_combination;
/// function definitions read from task documents
pub mod function_task;
mod function_tests;
