use symex::{DeepEx, ExResult, Express};

pub fn assert_float_eq<T: num::Float + std::fmt::Display>(
    f1: T,
    f2: T,
    atol: T,
    rtol: T,
    msg: &str,
) {
    if (f1 - f2).abs() >= atol + rtol * f2.abs() {
        println!("Floats not almost equal. {}\nf1: {}\nf2: {}\n", msg, f1, f2);
        unreachable!();
    }
}

#[cfg(test)]
pub fn assert_float_eq_f64(f1: f64, f2: f64) {
    assert_float_eq(f1, f2, 1e-12, 1e-12, "");
}

#[cfg(test)]
#[allow(dead_code)]
pub fn assert_float_eq_f32(f1: f32, f2: f32) {
    assert_float_eq(f1, f2, 1e-5, 1e-5, "");
}

/// Evaluates an expression with the variables `x`, `y`, and `z`.
#[cfg(test)]
#[allow(dead_code)]
pub fn eval_xyz(expr: &DeepEx<f64>, x: f64, y: f64, z: f64) -> ExResult<f64> {
    expr.eval_with(|name| match name {
        "x" => Some(x),
        "y" => Some(y),
        "z" => Some(z),
        _ => None,
    })
}

#[cfg(test)]
#[allow(dead_code)]
pub fn xyz() -> (DeepEx<f64>, DeepEx<f64>, DeepEx<f64>) {
    let var = |name: &str| DeepEx::<f64>::var(name).unwrap();
    (var("x"), var("y"), var("z"))
}
