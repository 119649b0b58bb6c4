//! Registry of the named unary functions a formula may call.
//!
//! Every function takes exactly one argument. Lookup goes through `FromStr` generated by
//! strum, so aliases (`tg` for `tan`, `log` for `ln`, `arctg` for `atan` ...) resolve to the
//! same variant and `Display` always prints the canonical name.
use std::f64::consts::PI;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
pub enum ElemFun {
    #[strum(serialize = "sin")]
    Sin,
    #[strum(serialize = "cos")]
    Cos,
    #[strum(to_string = "tan", serialize = "tg")]
    Tan,
    #[strum(to_string = "cot", serialize = "ctg")]
    Cot,
    #[strum(to_string = "asin", serialize = "arcsin")]
    Asin,
    #[strum(to_string = "acos", serialize = "arccos")]
    Acos,
    #[strum(to_string = "atan", serialize = "arctan", serialize = "arctg")]
    Atan,
    #[strum(to_string = "acot", serialize = "arcctg")]
    Acot,
    #[strum(serialize = "sinh")]
    Sinh,
    #[strum(serialize = "cosh")]
    Cosh,
    #[strum(serialize = "tanh")]
    Tanh,
    #[strum(serialize = "asinh")]
    Asinh,
    #[strum(serialize = "acosh")]
    Acosh,
    #[strum(serialize = "atanh")]
    Atanh,
    #[strum(serialize = "exp")]
    Exp,
    #[strum(to_string = "ln", serialize = "log")]
    Ln,
    #[strum(serialize = "log2")]
    Log2,
    #[strum(serialize = "log10")]
    Log10,
    #[strum(serialize = "sqrt")]
    Sqrt,
    #[strum(serialize = "cbrt")]
    Cbrt,
    #[strum(serialize = "abs")]
    Abs,
    #[strum(serialize = "sign")]
    Sign,
}

impl ElemFun {
    /// Applies the function with plain IEEE semantics: out-of-domain arguments give `nan`,
    /// poles give `inf`, nothing panics.
    #[inline(always)]
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            ElemFun::Sin => x.sin(),
            ElemFun::Cos => x.cos(),
            ElemFun::Tan => x.tan(),
            ElemFun::Cot => 1.0 / x.tan(),
            ElemFun::Asin => x.asin(),
            ElemFun::Acos => x.acos(),
            ElemFun::Atan => x.atan(),
            ElemFun::Acot => PI / 2.0 - x.atan(),
            ElemFun::Sinh => x.sinh(),
            ElemFun::Cosh => x.cosh(),
            ElemFun::Tanh => x.tanh(),
            ElemFun::Asinh => x.asinh(),
            ElemFun::Acosh => x.acosh(),
            ElemFun::Atanh => x.atanh(),
            ElemFun::Exp => x.exp(),
            ElemFun::Ln => x.ln(),
            ElemFun::Log2 => x.log2(),
            ElemFun::Log10 => x.log10(),
            ElemFun::Sqrt => x.sqrt(),
            ElemFun::Cbrt => x.cbrt(),
            ElemFun::Abs => x.abs(),
            // f64::signum maps +0 to 1, we keep zero (and nan) as is
            ElemFun::Sign => {
                if x > 0.0 {
                    1.0
                } else if x < 0.0 {
                    -1.0
                } else {
                    x
                }
            }
        }
    }
}
