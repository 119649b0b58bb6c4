/////////////////////////////TESTS////////////////////////////////////////////////////
/*
laws every function handle must satisfy, checked on seeded random points:
dimension consistency
marginal equivalence and marginal shape
copy aliasing
index boundary
sample evaluation equals pointwise evaluation
composition and linear combination marginals
*/

#[cfg(test)]
mod tests {
    use crate::function::composed_function::ComposedFunction;
    use crate::function::function_errors::FunctionError;
    use crate::function::function_handle::Function;
    use crate::function::linear_combination::LinearCombinationFunction;
    use crate::function::marginal_function::MarginalFunction;
    use crate::symbolic::parse_expr::ParseError;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const N_POINTS: usize = 50;

    fn smoke_function() -> Function {
        Function::symbolic(
            &["x1", "x2"],
            &["x1*sin(x2)", "cos(x1+x2)", "(x2+1)*exp(x1-2*x2)"],
        )
        .unwrap()
    }

    fn random_points(dimension: usize, seed: u64) -> Vec<Vec<f64>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..N_POINTS)
            .map(|_| (0..dimension).map(|_| rng.random_range(-2.0..2.0)).collect())
            .collect()
    }

    /// every kind of function the crate can build, over the same two inputs
    fn zoo() -> Vec<Function> {
        let f = smoke_function();
        let inner = Function::symbolic(&["x1", "x2"], &["x1-x2", "x1*x2"]).unwrap();
        let outer = Function::symbolic(&["u", "v"], &["u+v", "sqrt(abs(u))", "v^2"]).unwrap();
        let composed = Function::new(ComposedFunction::new(outer, inner).unwrap());
        let combination = Function::new(
            LinearCombinationFunction::new(vec![f.clone(), composed.clone()], vec![0.5, -2.0])
                .unwrap(),
        );
        let view = Function::new(MarginalFunction::new(f.clone(), vec![2, 1, 0]).unwrap());
        vec![f, composed, combination, view]
    }

    #[test]
    fn test_smoke_scenario() {
        let f = smoke_function();
        assert_eq!(f.get_input_dimension(), 2);
        assert_eq!(f.get_output_dimension(), 3);
        let y = f.evaluate(&[1.0, 0.0]).unwrap();
        assert_eq!(y[0], 0.0);
        assert_relative_eq!(y[1], 0.5403023058681398, epsilon = 1e-15);
        assert_relative_eq!(y[2], 2.718281828459045, epsilon = 1e-15);

        let g = f.get_marginal(1).unwrap();
        assert_eq!(g.get_input_dimension(), 2);
        assert_eq!(g.get_output_dimension(), 1);
        assert_relative_eq!(g.evaluate(&[1.0, 0.0]).unwrap()[0], 1.0f64.cos());
        println!("f = {}", f);
        println!("g = {}", g);
    }

    #[test]
    fn test_dimension_consistency() {
        for f in zoo() {
            for point in random_points(f.get_input_dimension(), 1) {
                let y = f.evaluate(&point).unwrap();
                assert_eq!(y.len(), f.get_output_dimension(), "{}", f.repr());
            }
            assert_eq!(f.get_input_description().len(), f.get_input_dimension());
            assert_eq!(f.get_output_description().len(), f.get_output_dimension());
        }
    }

    #[test]
    fn test_marginal_equivalence_and_shape() {
        for f in zoo() {
            for i in 0..f.get_output_dimension() {
                let g = f.get_marginal(i).unwrap();
                assert_eq!(g.get_input_dimension(), f.get_input_dimension());
                assert_eq!(g.get_output_dimension(), 1);
                assert_eq!(g.get_input_description(), f.get_input_description());
                assert_eq!(g.get_output_description()[0], f.get_output_description()[i]);
                for point in random_points(f.get_input_dimension(), 2 + i as u64) {
                    let full = f.evaluate(&point).unwrap();
                    let single = g.evaluate(&point).unwrap();
                    // nan from sqrt of a negative must match nan on both sides
                    if full[i].is_nan() {
                        assert!(single[0].is_nan());
                    } else {
                        assert_relative_eq!(single[0], full[i], max_relative = 1e-14);
                    }
                }
            }
        }
    }

    #[test]
    fn test_multi_index_marginal() {
        for f in zoo() {
            let last = f.get_output_dimension() - 1;
            let indices = [last, 0, last];
            let g = f.get_marginal_indices(&indices).unwrap();
            assert_eq!(g.get_output_dimension(), 3);
            for point in random_points(2, 7) {
                let full = f.evaluate(&point).unwrap();
                let selected = g.evaluate(&point).unwrap();
                for (k, &i) in indices.iter().enumerate() {
                    assert_eq!(selected[k].to_bits(), full[i].to_bits());
                }
            }
        }
    }

    #[test]
    fn test_copy_aliasing() {
        for f in zoo() {
            let copy = f.clone();
            assert!(copy.shares_implementation_with(&f));
            for point in random_points(2, 3) {
                assert_eq!(copy.evaluate(&point).unwrap(), f.evaluate(&point).unwrap());
            }
        }
        let a = smoke_function();
        let b = smoke_function();
        assert!(!a.shares_implementation_with(&b));
    }

    #[test]
    fn test_index_boundary() {
        for f in zoo() {
            let m = f.get_output_dimension();
            assert!(f.get_marginal(m - 1).is_ok());
            assert_eq!(
                f.get_marginal(m).unwrap_err(),
                FunctionError::Index {
                    index: m,
                    dimension: m
                }
            );
            assert!(matches!(
                f.get_marginal(usize::MAX),
                Err(FunctionError::Index { .. })
            ));
            assert!(matches!(
                f.get_marginal_indices(&[]),
                Err(FunctionError::Arity(_))
            ));
            // a failed call leaves the function usable
            assert!(f.evaluate(&[0.5, 0.5]).is_ok());
        }
    }

    #[test]
    fn test_wrong_point_dimension() {
        for f in zoo() {
            assert!(matches!(
                f.evaluate(&[1.0]),
                Err(FunctionError::DimensionMismatch {
                    expected: 2,
                    got: 1
                })
            ));
            assert!(f.evaluate(&[1.0, 2.0, 3.0]).is_err());
        }
    }

    #[test]
    fn test_sample_equals_pointwise() {
        let points = random_points(2, 11);
        let flat: Vec<f64> = points.iter().flatten().copied().collect();
        let sample = DMatrix::from_row_slice(N_POINTS, 2, &flat);
        for f in zoo() {
            let out = f.evaluate_sample(&sample).unwrap();
            assert_eq!(out.shape(), (N_POINTS, f.get_output_dimension()));
            for (r, point) in points.iter().enumerate() {
                let y = f.evaluate(point).unwrap();
                for (c, v) in y.iter().enumerate() {
                    assert_eq!(out[(r, c)].to_bits(), v.to_bits());
                }
            }
        }
        let empty = DMatrix::<f64>::zeros(0, 2);
        assert_eq!(smoke_function().evaluate_sample(&empty).unwrap().shape(), (0, 3));
    }

    #[test]
    fn test_specialised_marginal_kinds() {
        let kinds: Vec<&str> = zoo()
            .iter()
            .map(|f| f.get_marginal(0).unwrap().class_name())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "SymbolicFunction",
                "ComposedFunction",
                "LinearCombinationFunction",
                "MarginalFunction"
            ]
        );
    }

    #[test]
    fn test_parallel_shared_evaluation() {
        use rayon::prelude::*;
        let f = smoke_function();
        let points = random_points(2, 5);
        let parallel: Vec<Vec<f64>> = points
            .par_iter()
            .map(|p| f.clone().evaluate(p).unwrap())
            .collect();
        for (p, y) in points.iter().zip(parallel) {
            assert_eq!(f.evaluate(p).unwrap(), y);
        }
    }

    #[test]
    fn test_summary_table() {
        let table = smoke_function().summary_table();
        assert!(table.contains("cos(x1+x2)"));
        assert!(table.contains("y2"));
        assert!(table.contains("x1"));
    }

    #[test]
    fn test_large_formulas_do_not_exhaust_the_stack() {
        let sum = vec!["x"; 10_000].join("+");
        let f = Function::symbolic(&["x"], &[sum.as_str()]).unwrap();
        assert_eq!(f.evaluate(&[1.0]).unwrap(), vec![10_000.0]);
        let m = f.get_marginal(0).unwrap();
        assert_eq!(m.evaluate(&[0.5]).unwrap(), vec![5_000.0]);
        drop(f);
        drop(m);

        let nested = format!("{}x{}", "(".repeat(1000), ")".repeat(1000));
        let err = Function::symbolic(&["x"], &[nested.as_str()]).unwrap_err();
        assert!(matches!(
            err,
            FunctionError::Parse {
                index: 0,
                source: ParseError::TooDeep { .. },
                ..
            }
        ));
    }
}
