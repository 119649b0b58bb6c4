/// registry of the elementary functions known by the formula language
pub mod elementary;
/// a module turns a formula into a symbolic expression
///
///# Example
/// ```
/// use RustedFunctions::symbolic::parse_expr::parse_expression;
/// let vars = vec!["x".to_string(), "y".to_string()];
/// let expr = parse_expression("x^2*ln(x+y)", &vars).unwrap();
/// println!("{}", expr);
/// assert_eq!(expr.eval(&[1.0, 0.0]), 0.0);
/// ```
pub mod parse_expr;
/// # Symbolic engine
/// expression tree, evaluation, variable analysis and printing back to formulas
pub mod symbolic_engine;
/// bracket checks used by the parser
pub mod utils;
