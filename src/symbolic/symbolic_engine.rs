//! # Symbolic Engine Module
//!
//! Expression trees for scalar formulas over an ordered list of input variables.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(usize)` - reference to an input by its position in the input description.
//!   Names are resolved once by the parser, so evaluation is an array lookup
//! - **Constants**: `Const(f64)`
//! - **Operations**: `Neg`, `Pow`, and the chains `Sum` (`+`/`-`) and `Product` (`*`/`/`).
//!   A left associative chain `a - b + c` is one node holding all its terms, so a long sum
//!   adds one level to the tree, not one level per term
//! - **Functions**: `Fun(ElemFun, arg)` - one of the registered unary functions
//!
//! ### Key Methods
//! - `eval(point)` - unchecked evaluation, the hot path
//! - `evaluate(point, dimension)` - evaluation with a dimension check
//! - `to_formula(names)` - render back to text with minimal parentheses
//! - `variables()` - indices of the inputs the tree actually reads
//!
//! ## Numeric policy
//! Every node follows plain IEEE-754 double arithmetic. Division by zero, overflow and
//! domain errors turn into `inf`/`nan` and propagate, nothing here returns an error for them.
//!
//! Evaluation, printing and the introspection methods recurse once per tree level. Trees coming
//! from the parser are bounded by [`MAX_NESTING_DEPTH`](crate::symbolic::parse_expr::MAX_NESTING_DEPTH).
//!
//! Trees are never mutated after construction. A `SymbolicFunction` keeps each output tree
//! behind an `Arc`, and marginals clone the `Arc`, not the tree.

use crate::function::function_errors::FunctionError;
use crate::symbolic::elementary::ElemFun;
use std::collections::BTreeSet;
use std::fmt;

/// Operator in front of a term of [`Expr::Sum`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SumOp {
    Add,
    Sub,
}

/// Operator in front of a factor of [`Expr::Product`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductOp {
    Mul,
    Div,
}

/// Scalar expression tree.
///
/// # Examples
/// ```
/// use RustedFunctions::symbolic::symbolic_engine::Expr;
/// // x0 * 2
/// let expr = Expr::Var(0) * Expr::Const(2.0);
/// assert_eq!(expr.eval(&[3.0]), 6.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Input variable, index into the input description
    Var(usize),
    /// Numerical constant value
    Const(f64),
    /// Unary minus: -arg
    Neg(Box<Expr>),
    /// t0 ± t1 ± ... evaluated left to right. The operator of the first term is its sign
    Sum(Vec<(SumOp, Expr)>),
    /// f0 */ f1 */ ... evaluated left to right. `Div` on the first factor means 1/f0
    Product(Vec<(ProductOp, Expr)>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Registered unary function applied to one argument
    Fun(ElemFun, Box<Expr>),
}

// `a + b` appends to `a` when `a` is already a sum, `b` always stays one term
impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.push_term(SumOp::Add, rhs)
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.push_term(SumOp::Sub, rhs)
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.push_factor(ProductOp::Mul, rhs)
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        self.push_factor(ProductOp::Div, rhs)
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Neg(self.boxed())
    }
}

// binding strength used when printing
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_UNARY: u8 = 3;
const PREC_POWER: u8 = 4;
const PREC_ATOM: u8 = 5;

impl Expr {
    // basic features

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates base ^ (rhs).
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Applies a registered function to this expression.
    pub fn apply(self, fun: ElemFun) -> Expr {
        Expr::Fun(fun, self.boxed())
    }

    fn push_term(self, op: SumOp, rhs: Expr) -> Expr {
        match self {
            Expr::Sum(mut terms) => {
                terms.push((op, rhs));
                Expr::Sum(terms)
            }
            lhs => Expr::Sum(vec![(SumOp::Add, lhs), (op, rhs)]),
        }
    }

    fn push_factor(self, op: ProductOp, rhs: Expr) -> Expr {
        match self {
            Expr::Product(mut factors) => {
                factors.push((op, rhs));
                Expr::Product(factors)
            }
            lhs => Expr::Product(vec![(ProductOp::Mul, lhs), (op, rhs)]),
        }
    }

    //___________________________________EVALUATION____________________________________

    /// Evaluates the tree at `args` without checking its length.
    ///
    /// # Panics
    /// Panics if a `Var` index is out of `args` bounds. Trees built by the parser only hold
    /// indices below the length of the input description they were parsed against.
    #[inline(always)]
    pub fn eval(&self, args: &[f64]) -> f64 {
        match self {
            Expr::Var(i) => args[*i],
            Expr::Const(v) => *v,
            Expr::Neg(a) => -a.eval(args),
            Expr::Sum(terms) => {
                let mut terms = terms.iter();
                let first = match terms.next() {
                    Some((SumOp::Add, t)) => t.eval(args),
                    Some((SumOp::Sub, t)) => -t.eval(args),
                    None => return 0.0,
                };
                terms.fold(first, |acc, (op, t)| match op {
                    SumOp::Add => acc + t.eval(args),
                    SumOp::Sub => acc - t.eval(args),
                })
            }
            Expr::Product(factors) => {
                let mut factors = factors.iter();
                let first = match factors.next() {
                    Some((ProductOp::Mul, f)) => f.eval(args),
                    Some((ProductOp::Div, f)) => 1.0 / f.eval(args),
                    None => return 1.0,
                };
                factors.fold(first, |acc, (op, f)| match op {
                    ProductOp::Mul => acc * f.eval(args),
                    ProductOp::Div => acc / f.eval(args),
                })
            }
            Expr::Pow(a, b) => a.eval(args).powf(b.eval(args)),
            Expr::Fun(f, a) => f.apply(a.eval(args)),
        }
    }

    /// Evaluates the tree at `point`, which must hold exactly `dimension` values.
    ///
    /// `dimension` is the length of the input description the tree was parsed against, so every
    /// `Var` index is below it.
    pub fn evaluate(&self, point: &[f64], dimension: usize) -> Result<f64, FunctionError> {
        if point.len() != dimension {
            return Err(FunctionError::DimensionMismatch {
                expected: dimension,
                got: point.len(),
            });
        }
        Ok(self.eval(point))
    }

    //___________________________________INTROSPECTION____________________________________

    /// Direct subtrees of this node, in order.
    fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Var(_) | Expr::Const(_) => Vec::new(),
            Expr::Neg(a) | Expr::Fun(_, a) => vec![a.as_ref()],
            Expr::Pow(a, b) => vec![a.as_ref(), b.as_ref()],
            Expr::Sum(terms) => terms.iter().map(|(_, t)| t).collect(),
            Expr::Product(factors) => factors.iter().map(|(_, f)| f).collect(),
        }
    }

    /// Sorted indices of all input variables the tree references.
    pub fn variables(&self) -> BTreeSet<usize> {
        let mut found = BTreeSet::new();
        self.collect_variables(&mut found);
        found
    }

    fn collect_variables(&self, found: &mut BTreeSet<usize>) {
        if let Expr::Var(i) = self {
            found.insert(*i);
        }
        for child in self.children() {
            child.collect_variables(found);
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(|c| c.depth()).max().unwrap_or(0)
    }

    //___________________________________PRINTING____________________________________

    /// Renders the tree as a formula over `names`, with only the parentheses the grammar needs.
    ///
    /// Variables whose index has no name are printed as `x<index>`.
    pub fn to_formula(&self, names: &[String]) -> String {
        let mut out = String::new();
        self.write_formula(&mut out, &|i| {
            names.get(i).cloned().unwrap_or_else(|| format!("x{}", i))
        });
        out
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Sum(..) => PREC_SUM,
            Expr::Product(..) => PREC_PRODUCT,
            Expr::Neg(_) => PREC_UNARY,
            Expr::Const(v) if v.is_sign_negative() => PREC_UNARY,
            Expr::Pow(..) => PREC_POWER,
            Expr::Var(_) | Expr::Const(_) | Expr::Fun(..) => PREC_ATOM,
        }
    }

    fn write_child(&self, out: &mut String, name_of: &dyn Fn(usize) -> String, min_prec: u8) {
        if self.precedence() < min_prec {
            out.push('(');
            self.write_formula(out, name_of);
            out.push(')');
        } else {
            self.write_formula(out, name_of);
        }
    }

    fn write_formula(&self, out: &mut String, name_of: &dyn Fn(usize) -> String) {
        match self {
            Expr::Var(i) => out.push_str(&name_of(*i)),
            Expr::Const(v) => out.push_str(&v.to_string()),
            Expr::Neg(a) => {
                out.push('-');
                a.write_child(out, name_of, PREC_UNARY);
            }
            Expr::Sum(terms) => {
                for (k, (op, t)) in terms.iter().enumerate() {
                    match (k, op) {
                        (0, SumOp::Add) => t.write_child(out, name_of, PREC_SUM),
                        (0, SumOp::Sub) => {
                            out.push('-');
                            t.write_child(out, name_of, PREC_UNARY);
                        }
                        // chains are left associative, a nested sum on the right keeps its brackets
                        (_, SumOp::Add) => {
                            out.push('+');
                            t.write_child(out, name_of, PREC_PRODUCT);
                        }
                        (_, SumOp::Sub) => {
                            out.push('-');
                            t.write_child(out, name_of, PREC_PRODUCT);
                        }
                    }
                }
            }
            Expr::Product(factors) => {
                for (k, (op, f)) in factors.iter().enumerate() {
                    match (k, op) {
                        (0, ProductOp::Mul) => f.write_child(out, name_of, PREC_PRODUCT),
                        (0, ProductOp::Div) => {
                            out.push_str("1/");
                            f.write_child(out, name_of, PREC_UNARY);
                        }
                        (_, ProductOp::Mul) => {
                            out.push('*');
                            f.write_child(out, name_of, PREC_UNARY);
                        }
                        (_, ProductOp::Div) => {
                            out.push('/');
                            f.write_child(out, name_of, PREC_UNARY);
                        }
                    }
                }
            }
            Expr::Pow(a, b) => {
                // base must be an atom: -x^2 and (x^y)^z read differently without parentheses
                a.write_child(out, name_of, PREC_ATOM);
                out.push('^');
                b.write_child(out, name_of, PREC_UNARY);
            }
            Expr::Fun(f, a) => {
                out.push_str(f.as_ref());
                out.push('(');
                a.write_formula(out, name_of);
                out.push(')');
            }
        }
    }
}

/// Prints variables positionally as `x0, x1, ...`; use [`Expr::to_formula`] to print real names.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut out = String::new();
        self.write_formula(&mut out, &|i| format!("x{}", i));
        write!(f, "{}", out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn names() -> Vec<String> {
        vec!["x1".to_string(), "x2".to_string()]
    }

    #[test]
    fn test_operator_overloading_builds_nodes() {
        let expr = Expr::Var(0) + Expr::Const(2.0);
        assert_eq!(
            expr,
            Expr::Sum(vec![(SumOp::Add, Expr::Var(0)), (SumOp::Add, Expr::Const(2.0))])
        );
        let neg = -Expr::Var(1);
        assert_eq!(neg, Expr::Neg(Box::new(Expr::Var(1))));
    }

    #[test]
    fn test_left_chains_are_flat() {
        let expr = Expr::Var(0) - Expr::Var(1) + Expr::Const(1.0);
        assert_eq!(
            expr,
            Expr::Sum(vec![
                (SumOp::Add, Expr::Var(0)),
                (SumOp::Sub, Expr::Var(1)),
                (SumOp::Add, Expr::Const(1.0)),
            ])
        );
        let expr = Expr::Var(0) / Expr::Var(1) * Expr::Const(2.0);
        assert_eq!(expr.depth(), 2);
        assert_eq!(expr.eval(&[3.0, 4.0]), 1.5);

        // a right operand stays a single term
        let expr = Expr::Var(0) - (Expr::Var(1) - Expr::Const(1.0));
        assert_eq!(expr.depth(), 3);
        assert_eq!(expr.eval(&[3.0, 4.0]), 0.0);
    }

    #[test]
    fn test_long_sum_stays_shallow() {
        let expr = (1..10_000).fold(Expr::Var(0), |acc, _| acc + Expr::Var(0));
        assert_eq!(expr.depth(), 2);
        assert_eq!(expr.node_count(), 10_001);
        assert_eq!(expr.eval(&[0.5]), 5000.0);
    }

    #[test]
    fn test_leading_operator_of_a_chain() {
        let expr = Expr::Sum(vec![(SumOp::Sub, Expr::Var(0)), (SumOp::Add, Expr::Const(1.0))]);
        assert_eq!(expr.eval(&[3.0]), -2.0);
        assert_eq!(expr.to_string(), "-x0+1");
        let expr = Expr::Product(vec![(ProductOp::Div, Expr::Var(0))]);
        assert_eq!(expr.eval(&[4.0]), 0.25);
        assert_eq!(expr.to_string(), "1/x0");
        assert_eq!(Expr::Sum(vec![]).eval(&[]), 0.0);
        assert_eq!(Expr::Product(vec![]).eval(&[]), 1.0);
    }

    #[test]
    fn test_eval_basic_arithmetic() {
        // (x1 + 2) * x2 / 4 - x1^2
        let expr = (Expr::Var(0) + Expr::Const(2.0)) * Expr::Var(1) / Expr::Const(4.0)
            - Expr::Var(0).pow(Expr::Const(2.0));
        assert_eq!(expr.eval(&[1.0, 8.0]), 5.0);
    }

    #[test]
    fn test_eval_functions() {
        let expr = Expr::Var(0) * Expr::Var(1).apply(ElemFun::Sin);
        assert_relative_eq!(
            expr.eval(&[2.0, std::f64::consts::FRAC_PI_2]),
            2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_division_by_zero_propagates() {
        let expr = Expr::Const(1.0) / Expr::Var(0);
        assert_eq!(expr.eval(&[0.0]), f64::INFINITY);
        let expr = Expr::Const(0.0) / Expr::Var(0);
        assert!(expr.eval(&[0.0]).is_nan());
    }

    #[test]
    fn test_evaluate_checks_dimension() {
        let expr = Expr::Var(0) + Expr::Var(1);
        assert_eq!(expr.evaluate(&[1.0, 2.0], 2).unwrap(), 3.0);
        assert_eq!(
            expr.evaluate(&[1.0], 2),
            Err(FunctionError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_variables_are_sorted_and_unique() {
        let expr = Expr::Var(2) * Expr::Var(0) + Expr::Var(2).apply(ElemFun::Exp);
        assert_eq!(expr.variables().into_iter().collect::<Vec<_>>(), vec![0, 2]);
        assert!(Expr::Const(1.0).variables().is_empty());
    }

    #[test]
    fn test_node_count_and_depth() {
        let expr = Expr::Var(0) * Expr::Var(1).apply(ElemFun::Sin);
        assert_eq!(expr.node_count(), 4);
        assert_eq!(expr.depth(), 3);
    }

    #[test]
    fn test_to_formula_minimal_parentheses() {
        let expr = Expr::Var(0) * Expr::Var(1).apply(ElemFun::Sin);
        assert_eq!(expr.to_formula(&names()), "x1*sin(x2)");

        let expr = (Expr::Var(1) + Expr::Const(1.0))
            * (Expr::Var(0) - Expr::Const(2.0) * Expr::Var(1)).apply(ElemFun::Exp);
        assert_eq!(expr.to_formula(&names()), "(x2+1)*exp(x1-2*x2)");

        let expr = Expr::Var(0) - (Expr::Var(1) - Expr::Const(1.0));
        assert_eq!(expr.to_formula(&names()), "x1-(x2-1)");

        let expr = -(Expr::Var(0).pow(Expr::Const(2.0)));
        assert_eq!(expr.to_formula(&names()), "-x1^2");

        let expr = (-Expr::Var(0)).pow(Expr::Const(2.0));
        assert_eq!(expr.to_formula(&names()), "(-x1)^2");

        let expr = Expr::Var(0).pow(Expr::Const(2.0)).pow(Expr::Const(3.0));
        assert_eq!(expr.to_formula(&names()), "(x1^2)^3");

        let expr = Expr::Var(0) + (Expr::Var(1) + Expr::Const(1.0));
        assert_eq!(expr.to_formula(&names()), "x1+(x2+1)");

        let expr = Expr::Var(0) * (Expr::Var(1) / Expr::Const(2.0));
        assert_eq!(expr.to_formula(&names()), "x1*(x2/2)");
    }

    #[test]
    fn test_display_uses_positional_names() {
        let expr = Expr::Var(0) / (Expr::Var(1) * Expr::Var(2));
        assert_eq!(expr.to_string(), "x0/(x1*x2)");
    }
}
