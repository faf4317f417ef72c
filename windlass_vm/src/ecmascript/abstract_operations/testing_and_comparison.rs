// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [7.2 Testing and Comparison Operations](https://tc39.es/ecma262/#sec-testing-and-comparison-operations)

use num_bigint::BigInt;
use num_traits::FromPrimitive;

use super::type_conversion::{to_numeric, to_primitive, PreferredType};
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult};
use crate::ecmascript::types::{string_to_big_int, Value};

/// ### [7.2.1 RequireObjectCoercible ( argument )](https://tc39.es/ecma262/#sec-requireobjectcoercible)
pub fn require_object_coercible(agent: &mut Agent, argument: Value) -> JsResult<Value> {
    if argument.is_nullish() {
        Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert undefined or null to object",
        ))
    } else {
        Ok(argument)
    }
}

/// ### [7.2.10 SameValue ( x, y )](https://tc39.es/ecma262/#sec-samevalue)
///
/// NaN equals itself; `+0` and `-0` are distinguished.
pub fn same_value(agent: &Agent, x: Value, y: Value) -> bool {
    match (x, y) {
        (Value::Number(a), Value::Number(b)) => {
            if a.is_nan() && b.is_nan() {
                return true;
            }
            a == b && a.is_sign_negative() == b.is_sign_negative()
        }
        _ => same_value_non_number(agent, x, y),
    }
}

/// ### [7.2.11 SameValueZero ( x, y )](https://tc39.es/ecma262/#sec-samevaluezero)
///
/// NaN equals itself; `+0` and `-0` are equal.
pub fn same_value_zero(agent: &Agent, x: Value, y: Value) -> bool {
    match (x, y) {
        (Value::Number(a), Value::Number(b)) => {
            if a.is_nan() && b.is_nan() {
                return true;
            }
            a == b
        }
        _ => same_value_non_number(agent, x, y),
    }
}

/// ### [7.2.12 SameValueNonNumber ( x, y )](https://tc39.es/ecma262/#sec-samevaluenonnumber)
pub fn same_value_non_number(agent: &Agent, x: Value, y: Value) -> bool {
    match (x, y) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        // Strings are interned, so content equality is handle equality.
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Symbol(a), Value::Symbol(b)) => a == b,
        (Value::BigInt(a), Value::BigInt(b)) => a == b || a.data(agent) == b.data(agent),
        (Value::Object(a), Value::Object(b)) => a == b,
        _ => false,
    }
}

/// ### [7.2.14 IsStrictlyEqual ( x, y )](https://tc39.es/ecma262/#sec-isstrictlyequal)
///
/// The semantics of `===`: NaN is unequal to anything including itself,
/// and `+0` equals `-0`.
pub fn is_strictly_equal(agent: &Agent, x: Value, y: Value) -> bool {
    match (x, y) {
        (Value::Number(a), Value::Number(b)) => a == b,
        _ => {
            if x.value_type() != y.value_type() {
                return false;
            }
            same_value_non_number(agent, x, y)
        }
    }
}

/// ### [7.2.13 IsLooselyEqual ( x, y )](https://tc39.es/ecma262/#sec-islooselyequal)
///
/// The `==` coercion cascade.
pub fn is_loosely_equal(agent: &mut Agent, x: Value, y: Value) -> JsResult<bool> {
    // 1. If Type(x) is Type(y), return IsStrictlyEqual(x, y).
    if x.value_type() == y.value_type() {
        return Ok(is_strictly_equal(agent, x, y));
    }
    match (x, y) {
        // 2./3. The null ↔ undefined equivalence.
        (Value::Null, Value::Undefined) | (Value::Undefined, Value::Null) => Ok(true),
        // 5. If x is a Number and y is a String, return
        //    IsLooselyEqual(x, ToNumber(y)).
        (Value::Number(_), Value::String(s)) => {
            let n = crate::ecmascript::types::string_to_number(s.as_str(agent));
            is_loosely_equal(agent, x, Value::Number(n))
        }
        // 6. If x is a String and y is a Number, symmetric.
        (Value::String(s), Value::Number(_)) => {
            let n = crate::ecmascript::types::string_to_number(s.as_str(agent));
            is_loosely_equal(agent, Value::Number(n), y)
        }
        // 7. If x is a BigInt and y is a String, then
        (Value::BigInt(a), Value::String(s)) => {
            // a. Let n be StringToBigInt(y); if n is undefined, return false.
            let text = s.as_str(agent).to_owned();
            match string_to_big_int(agent, &text) {
                Some(n) => Ok(*a.data(agent) == n),
                None => Ok(false),
            }
        }
        // 8. Symmetric.
        (Value::String(_), Value::BigInt(_)) => is_loosely_equal(agent, y, x),
        // 9./10. Booleans coerce to numbers.
        (Value::Boolean(b), _) => {
            let n = Value::Number(if b { 1.0 } else { 0.0 });
            is_loosely_equal(agent, n, y)
        }
        (_, Value::Boolean(b)) => {
            let n = Value::Number(if b { 1.0 } else { 0.0 });
            is_loosely_equal(agent, x, n)
        }
        // 11./12. Objects convert to primitives against primitives.
        (
            Value::Number(_) | Value::BigInt(_) | Value::String(_) | Value::Symbol(_),
            Value::Object(_),
        ) => {
            let y = to_primitive(agent, y, None)?;
            is_loosely_equal(agent, x, y)
        }
        (
            Value::Object(_),
            Value::Number(_) | Value::BigInt(_) | Value::String(_) | Value::Symbol(_),
        ) => {
            let x = to_primitive(agent, x, None)?;
            is_loosely_equal(agent, x, y)
        }
        // 13. BigInt against Number compares mathematical values.
        (Value::BigInt(a), Value::Number(n)) | (Value::Number(n), Value::BigInt(a)) => {
            if !n.is_finite() {
                return Ok(false);
            }
            if n.fract() != 0.0 {
                return Ok(false);
            }
            Ok(*a.data(agent) == BigInt::from_f64(n).unwrap())
        }
        // 14. Return false.
        _ => Ok(false),
    }
}

/// ### [7.2.9 IsLessThan ( x, y, LeftFirst )](https://tc39.es/ecma262/#sec-islessthan)
///
/// The `LEFT_FIRST` flag controls the evaluation order of the
/// side-effecting coercions. Returns `None` when either operand converts
/// to NaN.
pub fn is_less_than<const LEFT_FIRST: bool>(
    agent: &mut Agent,
    x: Value,
    y: Value,
) -> JsResult<Option<bool>> {
    // 1./2. Evaluate the coercions in the requested order.
    let (px, py) = if LEFT_FIRST {
        let px = to_primitive(agent, x, Some(PreferredType::Number))?;
        let py = to_primitive(agent, y, Some(PreferredType::Number))?;
        (px, py)
    } else {
        let py = to_primitive(agent, y, Some(PreferredType::Number))?;
        let px = to_primitive(agent, x, Some(PreferredType::Number))?;
        (px, py)
    };

    // 3. If px is a String and py is a String, compare code units.
    if let (Value::String(a), Value::String(b)) = (px, py) {
        let a = a.as_str(agent);
        let b = b.as_str(agent);
        // UTF-8 byte order matches UTF-16 code unit order for any pair of
        // strings without surrogates; lone surrogates cannot be stored in
        // our UTF-8 heap strings.
        return Ok(Some(a < b));
    }

    // 4.a/b. Mixed BigInt and String comparisons parse the string.
    if let (Value::BigInt(a), Value::String(s)) = (px, py) {
        let text = s.as_str(agent).to_owned();
        return Ok(string_to_big_int(agent, &text).map(|n| *a.data(agent) < n));
    }
    if let (Value::String(s), Value::BigInt(b)) = (px, py) {
        let text = s.as_str(agent).to_owned();
        return Ok(string_to_big_int(agent, &text).map(|n| n < *b.data(agent)));
    }

    // 4.c. Let nx be ? ToNumeric(px); let ny be ? ToNumeric(py).
    let nx = to_numeric(agent, px)?;
    let ny = to_numeric(agent, py)?;
    match (nx, ny) {
        (Value::Number(a), Value::Number(b)) => {
            if a.is_nan() || b.is_nan() {
                return Ok(None);
            }
            Ok(Some(a < b))
        }
        (Value::BigInt(a), Value::BigInt(b)) => Ok(Some(a.data(agent) < b.data(agent))),
        (Value::BigInt(a), Value::Number(n)) => {
            if n.is_nan() {
                return Ok(None);
            }
            if n == f64::INFINITY {
                return Ok(Some(true));
            }
            if n == f64::NEG_INFINITY {
                return Ok(Some(false));
            }
            Ok(Some(a.to_f64(agent) < n))
        }
        (Value::Number(n), Value::BigInt(b)) => {
            if n.is_nan() {
                return Ok(None);
            }
            if n == f64::INFINITY {
                return Ok(Some(false));
            }
            if n == f64::NEG_INFINITY {
                return Ok(Some(true));
            }
            Ok(Some(n < b.to_f64(agent)))
        }
        _ => unreachable!(),
    }
}

/// Numeric addition helper shared by `+` evaluation after both operands
/// have been reduced to numerics of the same type.
pub fn numeric_types_match(x: Value, y: Value) -> bool {
    matches!(
        (x, y),
        (Value::Number(_), Value::Number(_)) | (Value::BigInt(_), Value::BigInt(_))
    )
}

/// Throws the TypeError both numeric paths raise on mixed BigInt/Number
/// arithmetic.
pub fn throw_mixed_numeric_types(agent: &mut Agent) -> crate::ecmascript::execution::JsError {
    agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Cannot mix BigInt and other types, use explicit conversions",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecmascript::execution::{DefaultHostHooks, Options};

    #[test]
    fn same_value_and_strict_equality_on_numbers() {
        let agent = Agent::new(Options::default(), &DefaultHostHooks);
        let nan = Value::Number(f64::NAN);
        let pz = Value::Number(0.0);
        let nz = Value::Number(-0.0);
        // Identity equality treats NaN as equal to itself, strict does not.
        assert!(same_value(&agent, nan, nan));
        assert!(!is_strictly_equal(&agent, nan, nan));
        // +0/-0 distinguished under SameValue, equal under SameValueZero
        // and strict equality.
        assert!(!same_value(&agent, pz, nz));
        assert!(same_value_zero(&agent, pz, nz));
        assert!(is_strictly_equal(&agent, pz, nz));
    }

    #[test]
    fn loose_equality_cascade() {
        let mut agent = Agent::new(Options::default(), &DefaultHostHooks);
        let one_string = Value::from_str(&mut agent, "1");
        assert!(is_loosely_equal(&mut agent, Value::Number(1.0), one_string).unwrap());
        assert!(is_loosely_equal(&mut agent, Value::Null, Value::Undefined).unwrap());
        assert!(is_loosely_equal(&mut agent, Value::Boolean(true), one_string).unwrap());
        assert!(!is_loosely_equal(&mut agent, Value::Null, Value::Number(0.0)).unwrap());
    }
}
