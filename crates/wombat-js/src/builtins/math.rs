//! The `Math` global.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::value::{JsFunction, JsObject, Value};

thread_local! {
    /// xorshift64* state for Math.random, seeded from the wall clock.
    static RANDOM_STATE: Cell<u64> = Cell::new(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15)
            | 1,
    );
}

fn next_random() -> f64 {
    RANDOM_STATE.with(|state| {
        let mut x = state.get();
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        state.set(x);
        let bits = x.wrapping_mul(0x2545_F491_4F6C_DD1D);
        // Use the top 53 bits for a uniform double in [0, 1).
        (bits >> 11) as f64 / (1u64 << 53) as f64
    })
}

/// Build the `Math` object with its constants and functions.
#[must_use]
pub fn make_math() -> Value {
    let math = Rc::new(RefCell::new(JsObject::new()));
    {
        let mut m = math.borrow_mut();
        m.set("PI", Value::Number(std::f64::consts::PI));
        m.set("E", Value::Number(std::f64::consts::E));
        m.set("LN2", Value::Number(std::f64::consts::LN_2));
        m.set("LN10", Value::Number(std::f64::consts::LN_10));
        m.set("LOG2E", Value::Number(std::f64::consts::LOG2_E));
        m.set("LOG10E", Value::Number(std::f64::consts::LOG10_E));
        m.set("SQRT2", Value::Number(std::f64::consts::SQRT_2));
        m.set("SQRT1_2", Value::Number(std::f64::consts::FRAC_1_SQRT_2));
    }

    let unary = |name: &str, f: fn(f64) -> f64| {
        JsFunction::native(name, move |_, _, args| {
            Ok(Value::Number(f(args.first().map_or(f64::NAN, Value::to_number))))
        })
    };

    {
        let mut m = math.borrow_mut();
        m.set("abs", unary("abs", f64::abs));
        m.set("ceil", unary("ceil", f64::ceil));
        m.set("floor", unary("floor", f64::floor));
        // JS rounds half-up (toward +∞), unlike Rust's round-half-away.
        m.set("round", unary("round", |n| (n + 0.5).floor()));
        m.set("sqrt", unary("sqrt", f64::sqrt));
        m.set("sin", unary("sin", f64::sin));
        m.set("cos", unary("cos", f64::cos));
        m.set("tan", unary("tan", f64::tan));
        m.set("log", unary("log", f64::ln));
        m.set("exp", unary("exp", f64::exp));
        m.set("trunc", unary("trunc", f64::trunc));
        m.set(
            "sign",
            unary("sign", |n| {
                if n.is_nan() || n == 0.0 {
                    n
                } else if n > 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }),
        );
        m.set(
            "pow",
            JsFunction::native("pow", |_, _, args| {
                let base = args.first().map_or(f64::NAN, Value::to_number);
                let exponent = args.get(1).map_or(f64::NAN, Value::to_number);
                Ok(Value::Number(base.powf(exponent)))
            }),
        );
        m.set(
            "max",
            JsFunction::native("max", |_, _, args| {
                let mut best = f64::NEG_INFINITY;
                for arg in args {
                    let n = arg.to_number();
                    if n.is_nan() {
                        return Ok(Value::Number(f64::NAN));
                    }
                    best = best.max(n);
                }
                Ok(Value::Number(best))
            }),
        );
        m.set(
            "min",
            JsFunction::native("min", |_, _, args| {
                let mut best = f64::INFINITY;
                for arg in args {
                    let n = arg.to_number();
                    if n.is_nan() {
                        return Ok(Value::Number(f64::NAN));
                    }
                    best = best.min(n);
                }
                Ok(Value::Number(best))
            }),
        );
        m.set(
            "random",
            JsFunction::native("random", |_, _, _| Ok(Value::Number(next_random()))),
        );
    }

    Value::Object(math)
}
