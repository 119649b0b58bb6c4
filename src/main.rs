#![allow(non_snake_case)]
use RustedFunctions::Utils::logger::init_logger;
use RustedFunctions::function::composed_function::ComposedFunction;
use RustedFunctions::function::function_handle::Function;
use RustedFunctions::function::function_task::FunctionTask;
use RustedFunctions::function::linear_combination::LinearCombinationFunction;
use log::{LevelFilter, error, info};
use nalgebra::DMatrix;

fn main() {
    // pick the example with the first command line argument, 0 by default
    let example: usize = std::env::args()
        .nth(1)
        .and_then(|a| a.parse().ok())
        .unwrap_or(0);
    init_logger(LevelFilter::Info);
    match example {
        0 => {
            // SMOKE TEST: three outputs over two inputs, then one of its marginals
            let f = match Function::symbolic(
                &["x1", "x2"],
                &["x1*sin(x2)", "cos(x1+x2)", "(x2+1)*exp(x1-2*x2)"],
            ) {
                Ok(f) => f,
                Err(e) => {
                    error!("{}", e);
                    return;
                }
            };
            info!("f = {}", f);
            info!("input dimension = {}", f.get_input_dimension());
            info!("output dimension = {}", f.get_output_dimension());
            info!("f([1, 0]) = {:?}", f.evaluate(&[1.0, 0.0]));
            match f.get_marginal(1) {
                Ok(g) => {
                    info!("g = {}", g);
                    info!("g([1, 0]) = {:?}", g.evaluate(&[1.0, 0.0]));
                }
                Err(e) => error!("{}", e),
            }
            info!("\n{}", f.summary_table());
        }
        1 => {
            // FUNCTION FROM A TASK DOCUMENT
            let document = "
                # damped oscillator, position and velocity
                function
                    inputs: t, omega, zeta
                    outputs: exp(-zeta*t)*cos(omega*t), -exp(-zeta*t)*(zeta*cos(omega*t) + omega*sin(omega*t))
                    output_names: position, velocity
                settings
                    loglevel: info
            ";
            let result = document
                .parse::<FunctionTask>()
                .and_then(|task| task.build());
            match result {
                Ok(f) => {
                    info!("{}", f.repr());
                    info!("f([1, 2, 0.1]) = {:?}", f.evaluate(&[1.0, 2.0, 0.1]));
                    info!("\n{}", f.summary_table());
                }
                Err(e) => error!("{}", e),
            }
        }
        2 => {
            // SAMPLE EVALUATION: every row of the matrix is one point
            let f = match Function::symbolic(&["x", "y"], &["sqrt(x^2 + y^2)", "atan(y/x)"]) {
                Ok(f) => f,
                Err(e) => {
                    error!("{}", e);
                    return;
                }
            };
            let sample = DMatrix::from_fn(10, 2, |r, c| (r as f64 + 1.0) * (c as f64 + 0.5));
            match f.evaluate_sample(&sample) {
                Ok(out) => info!("polar coordinates of the sample: {}", out),
                Err(e) => error!("{}", e),
            }
        }
        3 => {
            // COMPOSITION AND LINEAR COMBINATION
            let built = (|| {
                let inner = Function::symbolic(&["x1", "x2"], &["x1+x2", "x1*x2"])?;
                let outer = Function::symbolic(&["s", "p"], &["s^2 - 2*p", "p"])?;
                let h = Function::new(ComposedFunction::new(outer, inner.clone())?);
                let c = Function::new(LinearCombinationFunction::new(
                    vec![h.clone(), inner],
                    vec![1.0, -1.0],
                )?);
                Ok::<_, RustedFunctions::function::function_errors::FunctionError>((h, c))
            })();
            match built {
                Ok((h, c)) => {
                    info!("h = {}", h);
                    info!("h([2, 3]) = {:?}", h.evaluate(&[2.0, 3.0]));
                    info!("c = {}", c);
                    info!("c marginal 0 = {:?}", c.get_marginal(0).map(|m| m.to_display_string()));
                }
                Err(e) => error!("{}", e),
            }
        }
        _ => {
            error!("unknown example {}, choose 0..3", example);
        }
    }
}
