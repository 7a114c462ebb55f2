#![cfg(feature = "partial")]
mod utils;
use itertools::izip;
use rand::{thread_rng, Rng};
use std::collections::HashMap;
use symex::{build, prelude::*, BinOpKind};
use utils::{assert_float_eq_f64, eval_xyz, xyz};

#[test]
fn test_readme_partial() -> ExResult<()> {
    let x = DeepEx::<f64>::var("x")?;
    let y = DeepEx::<f64>::var("y")?;
    let expr = &y * x.pow(2.0);

    // d_x
    let dexpr_dx = expr.partial("x")?;
    assert_eq!(format!("{}", dexpr_dx), "0 * x ^ 2 + y * 2 * x ^ 1 * 1");

    // d_xy
    let ddexpr_dxy = dexpr_dx.partial("y")?;
    let bindings: HashMap<&str, f64> = [("x", 2.0), ("y", f64::MAX)].into_iter().collect();
    assert_float_eq_f64(ddexpr_dxy.eval(&bindings)?, 4.0);
    Ok(())
}

#[test]
fn test_product_rule() -> ExResult<()> {
    let x = DeepEx::<f64>::var("x")?;
    let deri = (&x * &x).partial("x")?;
    let bindings: HashMap<&str, f64> = [("x", 3.0)].into_iter().collect();
    assert_float_eq_f64(deri.eval(&bindings)?, 6.0);
    // Add(Mul(x', x), Mul(x, x'))
    assert_eq!(deri.bin_kind(), Some(BinOpKind::Add));
    let lhs = &deri.operands()[0];
    let rhs = &deri.operands()[1];
    assert_eq!(lhs.bin_kind(), Some(BinOpKind::Mul));
    assert_eq!(lhs.operands()[0].as_num(), Some(1.0));
    assert!(lhs.operands()[1].ptr_eq(&x));
    assert!(rhs.operands()[0].ptr_eq(&x));
    assert_eq!(rhs.operands()[1].as_num(), Some(1.0));
    Ok(())
}

#[test]
fn test_quotient_rule() -> ExResult<()> {
    let x = DeepEx::<f64>::var("x")?;
    let deri = (&x / 2.0).partial("x")?;
    let bindings: HashMap<&str, f64> = [("x", 5.0)].into_iter().collect();
    assert_float_eq_f64(deri.eval(&bindings)?, 0.5);
    assert_eq!(deri.unparse(), "(1 * 2 - x * 0) / 2 ^ 2");
    Ok(())
}

#[test]
fn test_errors() -> ExResult<()> {
    let x = DeepEx::<f64>::var("x")?;
    let y = DeepEx::<f64>::var("y")?;
    let err = build::pow(&x, &y).partial("x").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Unsupported);
    assert_eq!(format!("{}", err), "unsupported: non-constant exponent");
    // the exponent is checked even if it does not depend on the variable
    assert!((&y + x.clone().pow(&y)).partial("z").is_err());
    assert!(x.partial("").is_err());
    let unbound = (&x * &y).partial_at("x", &HashMap::<&str, f64>::new());
    assert_eq!(unbound.unwrap_err().kind(), ExErrorKind::UnboundVariable);
    Ok(())
}

#[test]
fn test_partial_random() -> ExResult<()> {
    let (x, y, z) = xyz();
    let exprs = vec![
        2.0 * &x * &y - 4.0 * &z + &y / 3.0,
        (&x - &y).pow(3.0) / (&z + 1.0),
        1.0 / (&x * &x + &y * &y + &z * &z),
        (&x * &y * &z).pow(0.5) - &x / (&y - 5.0),
    ];
    type Grad = fn(f64, f64, f64) -> [f64; 3];
    let grads: Vec<Grad> = vec![
        |x, y, _| [2.0 * y, 2.0 * x + 1.0 / 3.0, -4.0],
        |x, y, z| {
            let d = 3.0 * (x - y).powi(2) / (z + 1.0);
            [d, -d, -(x - y).powi(3) / (z + 1.0).powi(2)]
        },
        |x, y, z| {
            let s = (x * x + y * y + z * z).powi(2);
            [-2.0 * x / s, -2.0 * y / s, -2.0 * z / s]
        },
        |x, y, z| {
            let r = 0.5 / (x * y * z).sqrt();
            [
                r * y * z - 1.0 / (y - 5.0),
                r * x * z + x / (y - 5.0).powi(2),
                r * x * y,
            ]
        },
    ];
    let mut rng = thread_rng();
    for (expr, grad) in izip!(exprs.iter(), grads.iter()) {
        let deris = ["x", "y", "z"]
            .iter()
            .map(|var| expr.partial(var))
            .collect::<ExResult<Vec<_>>>()?;
        for _ in 0..50 {
            let x = rng.gen_range(0.5..2.0);
            let y = rng.gen_range(0.5..2.0);
            let z = rng.gen_range(0.5..2.0);
            let reference = grad(x, y, z);
            for (deri, r) in izip!(deris.iter(), reference.iter()) {
                utils::assert_float_eq(eval_xyz(deri, x, y, z)?, *r, 1e-10, 1e-10, "");
            }
        }
    }
    Ok(())
}

#[test]
fn test_partial_nth_iter() -> ExResult<()> {
    let (x, y, _) = xyz();
    let expr = x.clone().pow(3.0) * &y;
    let bindings: HashMap<&str, f64> = [("x", 2.0), ("y", 5.0)].into_iter().collect();

    let d0 = expr.partial_nth("x", 0)?;
    assert!(d0.ptr_eq(&expr));
    // d/dx: 3 x^2 y, d^2/dx^2: 6 x y, d^3/dx^3: 6 y
    let reference = [60.0, 60.0, 30.0];
    for (n, r) in (1..4).zip(reference) {
        assert_float_eq_f64(expr.partial_nth("x", n)?.eval(&bindings)?, r);
    }
    assert_float_eq_f64(expr.partial_nth("x", 4)?.eval(&bindings)?, 0.0);

    let d_xy = expr.partial_iter(["x", "y"])?;
    assert_float_eq_f64(d_xy.eval(&bindings)?, 12.0);
    let vars = vec!["y".to_string(), "x".to_string(), "x".to_string()];
    let d_yxx = expr.partial_iter(vars.iter())?;
    assert_float_eq_f64(d_yxx.eval(&bindings)?, 12.0);
    assert_float_eq_f64(expr.partial_at("y", &bindings)?, 8.0);
    Ok(())
}

#[test]
fn test_partial_deep() -> ExResult<()> {
    let x = DeepEx::<f64>::var("x")?;
    let mut expr = DeepEx::num(1.0);
    for _ in 0..100_000 {
        expr = expr + &x * 2.0;
    }
    let deri = expr.partial("x")?;
    assert_float_eq_f64(eval_xyz(&deri, 7.0, 0.0, 0.0)?, 200_000.0);
    Ok(())
}

#[test]
fn test_partial_subs() -> ExResult<()> {
    let (x, y, _) = xyz();
    let expr = &x * &y;
    // chain rule by substitution, x = y^2
    let substituted = expr.subs(&mut |name: &str| match name {
        "x" => Some(y.clone().pow(2.0)),
        _ => None,
    });
    let deri = substituted.partial("y")?;
    assert_float_eq_f64(eval_xyz(&deri, 0.0, 2.0, 0.0)?, 12.0);
    Ok(())
}
