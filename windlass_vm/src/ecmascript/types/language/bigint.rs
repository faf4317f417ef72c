// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.1.6.2 The BigInt Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-bigint-type)

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::ecmascript::execution::{Agent, ExceptionType, JsResult};
use crate::ecmascript::types::{HeapString, Value};
pub use crate::heap::HeapBigInt;

#[derive(Debug, Clone)]
pub struct BigIntHeapData {
    pub(crate) data: BigInt,
}

impl HeapBigInt {
    pub fn from_bigint(agent: &mut Agent, data: BigInt) -> Self {
        agent.heap.create_bigint(BigIntHeapData { data })
    }

    pub fn from_i64(agent: &mut Agent, value: i64) -> Self {
        Self::from_bigint(agent, BigInt::from(value))
    }

    pub fn data(self, agent: &Agent) -> &BigInt {
        &agent.heap.bigints[self.into_index()].data
    }

    pub fn is_zero(self, agent: &Agent) -> bool {
        self.data(agent).is_zero()
    }

    /// ### [6.1.6.2.21 BigInt::toString ( x, radix )](https://tc39.es/ecma262/#sec-numeric-types-bigint-tostring)
    pub fn to_string_radix(self, agent: &mut Agent, radix: u32) -> HeapString {
        let data = self.data(agent).to_str_radix(radix);
        HeapString::from_string(agent, data)
    }

    /// Lossy conversion to Number, the behaviour of the `Number(bigint)`
    /// constructor path.
    pub fn to_f64(self, agent: &Agent) -> f64 {
        self.data(agent).to_f64().unwrap_or(f64::NAN)
    }
}

/// Binary operations over BigInt values. Division and remainder by zero are
/// range errors; everything else is total.
pub(crate) fn bigint_binary_op(
    agent: &mut Agent,
    op: &str,
    x: HeapBigInt,
    y: HeapBigInt,
) -> JsResult<Value> {
    let a = x.data(agent).clone();
    let b = y.data(agent).clone();
    let result = match op {
        "+" => a + b,
        "-" => a - b,
        "*" => a * b,
        "/" => {
            if b.is_zero() {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::RangeError,
                    "Division by zero",
                ));
            }
            a / b
        }
        "%" => {
            if b.is_zero() {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::RangeError,
                    "Division by zero",
                ));
            }
            a % b
        }
        "**" => {
            let Some(exponent) = b.to_u32() else {
                if b.is_negative() {
                    return Err(agent.throw_exception_with_static_message(
                        ExceptionType::RangeError,
                        "Exponent must be non-negative",
                    ));
                }
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::RangeError,
                    "BigInt exponent is too large",
                ));
            };
            a.pow(exponent)
        }
        "&" => a & b,
        "|" => a | b,
        "^" => a ^ b,
        "<<" => {
            let Some(shift) = b.to_i64() else {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::RangeError,
                    "BigInt shift amount is too large",
                ));
            };
            if shift >= 0 { a << shift } else { a >> (-shift) }
        }
        ">>" => {
            let Some(shift) = b.to_i64() else {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::RangeError,
                    "BigInt shift amount is too large",
                ));
            };
            if shift >= 0 { a >> shift } else { a << (-shift) }
        }
        _ => unreachable!("unknown BigInt operator {op}"),
    };
    Ok(Value::BigInt(HeapBigInt::from_bigint(agent, result)))
}

/// ### [7.2.12 StringToBigInt ( str )](https://tc39.es/ecma262/#sec-stringtobigint)
pub(crate) fn string_to_big_int(agent: &Agent, text: &str) -> Option<BigInt> {
    let trimmed = text.trim();
    let _ = agent;
    if trimmed.is_empty() {
        return Some(BigInt::zero());
    }
    let (radix, digits) = if let Some(rest) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        (16, rest)
    } else if let Some(rest) = trimmed.strip_prefix("0o").or_else(|| trimmed.strip_prefix("0O")) {
        (8, rest)
    } else if let Some(rest) = trimmed.strip_prefix("0b").or_else(|| trimmed.strip_prefix("0B")) {
        (2, rest)
    } else {
        (10, trimmed)
    };
    BigInt::parse_bytes(digits.as_bytes(), radix)
}
