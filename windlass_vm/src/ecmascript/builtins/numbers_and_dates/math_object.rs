// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [21.3 The Math Object](https://tc39.es/ecma262/#sec-math-object)

use rand::Rng;

use crate::ecmascript::abstract_operations::type_conversion::to_number;
use crate::ecmascript::builders::OrdinaryObjectBuilder;
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, JsResult, RealmIdentifier};
use crate::ecmascript::types::Value;

macro_rules! unary_math_method {
    ($struct_name: ident, $name: literal, $op: expr) => {
        struct $struct_name;
        impl Builtin for $struct_name {
            const NAME: &'static str = $name;
            const LENGTH: u8 = 1;
            const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, _this, arguments| {
                let x = to_number(agent, arguments.get(0))?;
                let op: fn(f64) -> f64 = $op;
                Ok(Value::Number(op(x)))
            });
        }
    };
}

unary_math_method!(MathAbs, "abs", |x| x.abs());
unary_math_method!(MathCeil, "ceil", |x| x.ceil());
unary_math_method!(MathCbrt, "cbrt", |x| x.cbrt());
unary_math_method!(MathCos, "cos", |x| x.cos());
unary_math_method!(MathExp, "exp", |x| x.exp());
unary_math_method!(MathFloor, "floor", |x| x.floor());
unary_math_method!(MathLog, "log", |x| x.ln());
unary_math_method!(MathLog2, "log2", |x| x.log2());
unary_math_method!(MathLog10, "log10", |x| x.log10());
unary_math_method!(MathSign, "sign", |x| {
    if x.is_nan() || x == 0.0 { x } else { x.signum() }
});
unary_math_method!(MathSin, "sin", |x| x.sin());
unary_math_method!(MathSqrt, "sqrt", |x| x.sqrt());
unary_math_method!(MathTan, "tan", |x| x.tan());
unary_math_method!(MathTrunc, "trunc", |x| x.trunc());

struct MathRound;
impl Builtin for MathRound {
    const NAME: &'static str = "round";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(math_round);
}

/// ### [21.3.2.28 Math.round ( x )](https://tc39.es/ecma262/#sec-math.round)
///
/// Halfway cases round toward +∞, unlike Rust's `round`.
fn math_round(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let x = to_number(agent, arguments.get(0))?;
    let rounded = if x.is_finite() && x.fract() == -0.5 {
        -0.0
    } else {
        (x + 0.5).floor()
    };
    let rounded = if x.is_nan() || x.is_infinite() { x } else { rounded };
    Ok(Value::Number(rounded))
}

struct MathMax;
impl Builtin for MathMax {
    const NAME: &'static str = "max";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(math_max);
}

/// ### [21.3.2.24 Math.max ( ...args )](https://tc39.es/ecma262/#sec-math.max)
fn math_max(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let mut highest = f64::NEG_INFINITY;
    for argument in arguments.0 {
        let n = to_number(agent, *argument)?;
        if n.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        // +0 beats -0.
        if n > highest || (n == 0.0 && highest == 0.0 && !n.is_sign_negative()) {
            highest = n;
        }
    }
    Ok(Value::Number(highest))
}

struct MathMin;
impl Builtin for MathMin {
    const NAME: &'static str = "min";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(math_min);
}

fn math_min(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let mut lowest = f64::INFINITY;
    for argument in arguments.0 {
        let n = to_number(agent, *argument)?;
        if n.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        if n < lowest || (n == 0.0 && lowest == 0.0 && n.is_sign_negative()) {
            lowest = n;
        }
    }
    Ok(Value::Number(lowest))
}

struct MathPow;
impl Builtin for MathPow {
    const NAME: &'static str = "pow";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(math_pow);
}

fn math_pow(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let base = to_number(agent, arguments.get(0))?;
    let exponent = to_number(agent, arguments.get(1))?;
    Ok(Value::Number(base.powf(exponent)))
}

struct MathHypot;
impl Builtin for MathHypot {
    const NAME: &'static str = "hypot";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(math_hypot);
}

fn math_hypot(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let mut sum = 0.0f64;
    for argument in arguments.0 {
        let n = to_number(agent, *argument)?;
        sum += n * n;
    }
    Ok(Value::Number(sum.sqrt()))
}

struct MathRandom;
impl Builtin for MathRandom {
    const NAME: &'static str = "random";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(math_random);
}

/// ### [21.3.2.27 Math.random ( )](https://tc39.es/ecma262/#sec-math.random)
fn math_random(_agent: &mut Agent, _this: Value, _arguments: ArgumentsList) -> JsResult<Value> {
    Ok(Value::Number(rand::rng().random::<f64>()))
}

pub(crate) fn create_math_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
    let e = Value::Number(std::f64::consts::E);
    let ln10 = Value::Number(std::f64::consts::LN_10);
    let ln2 = Value::Number(std::f64::consts::LN_2);
    let log10e = Value::Number(std::f64::consts::LOG10_E);
    let log2e = Value::Number(std::f64::consts::LOG2_E);
    let pi = Value::Number(std::f64::consts::PI);
    let sqrt1_2 = Value::Number(std::f64::consts::FRAC_1_SQRT_2);
    let sqrt2 = Value::Number(std::f64::consts::SQRT_2);
    let mut builder = OrdinaryObjectBuilder::new_intrinsic_object(
        agent,
        realm,
        "%Math%",
        Some(object_prototype),
    )
    .with_builtin_function_property::<MathAbs>()
    .with_builtin_function_property::<MathCbrt>()
    .with_builtin_function_property::<MathCeil>()
    .with_builtin_function_property::<MathCos>()
    .with_builtin_function_property::<MathExp>()
    .with_builtin_function_property::<MathFloor>()
    .with_builtin_function_property::<MathHypot>()
    .with_builtin_function_property::<MathLog>()
    .with_builtin_function_property::<MathLog10>()
    .with_builtin_function_property::<MathLog2>()
    .with_builtin_function_property::<MathMax>()
    .with_builtin_function_property::<MathMin>()
    .with_builtin_function_property::<MathPow>()
    .with_builtin_function_property::<MathRandom>()
    .with_builtin_function_property::<MathRound>()
    .with_builtin_function_property::<MathSign>()
    .with_builtin_function_property::<MathSin>()
    .with_builtin_function_property::<MathSqrt>()
    .with_builtin_function_property::<MathTan>()
    .with_builtin_function_property::<MathTrunc>()
    .with_to_string_tag("Math");
    for (name, value) in [
        ("E", e),
        ("LN10", ln10),
        ("LN2", ln2),
        ("LOG10E", log10e),
        ("LOG2E", log2e),
        ("PI", pi),
        ("SQRT1_2", sqrt1_2),
        ("SQRT2", sqrt2),
    ] {
        let key = crate::ecmascript::types::PropertyKey::from_str(builder.agent_mut(), name);
        builder = builder.with_frozen_property(key, value);
    }
    builder.build();
}
