// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [19 The Global Object](https://tc39.es/ecma262/#sec-global-object)

use crate::ecmascript::abstract_operations::type_conversion::{to_number, to_string};
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult};
use crate::ecmascript::types::{string_to_number, Value};

pub(crate) struct GlobalParseInt;
impl Builtin for GlobalParseInt {
    const NAME: &'static str = "parseInt";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(parse_int);
}

/// ### [19.2.5 parseInt ( string, radix )](https://tc39.es/ecma262/#sec-parseint-string-radix)
fn parse_int(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let input = to_string(agent, arguments.get(0))?;
    let radix_argument = arguments.get(1);
    let mut radix = if radix_argument.is_undefined() {
        0
    } else {
        crate::ecmascript::abstract_operations::type_conversion::to_int32(agent, radix_argument)?
    };
    let mut text = input.as_str(agent).trim_start();
    let mut sign = 1.0;
    if let Some(rest) = text.strip_prefix('-') {
        sign = -1.0;
        text = rest;
    } else if let Some(rest) = text.strip_prefix('+') {
        text = rest;
    }
    if radix == 0 {
        if text.starts_with("0x") || text.starts_with("0X") {
            radix = 16;
            text = &text[2..];
        } else {
            radix = 10;
        }
    } else if radix == 16 && (text.starts_with("0x") || text.starts_with("0X")) {
        text = &text[2..];
    }
    if !(2..=36).contains(&radix) {
        return Ok(Value::Number(f64::NAN));
    }
    let mut value = 0.0f64;
    let mut seen = false;
    for c in text.chars() {
        let Some(digit) = c.to_digit(radix as u32) else {
            break;
        };
        seen = true;
        value = value * radix as f64 + digit as f64;
    }
    if !seen {
        return Ok(Value::Number(f64::NAN));
    }
    Ok(Value::Number(sign * value))
}

pub(crate) struct GlobalParseFloat;
impl Builtin for GlobalParseFloat {
    const NAME: &'static str = "parseFloat";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(parse_float);
}

/// ### [19.2.4 parseFloat ( string )](https://tc39.es/ecma262/#sec-parsefloat-string)
fn parse_float(agent: &mut Agent, _this: Value, arguments: ArgumentsList) -> JsResult<Value> {
    let input = to_string(agent, arguments.get(0))?;
    let text = input.as_str(agent).trim_start();
    // Take the longest prefix that parses as a decimal literal.
    let mut end = 0;
    let bytes = text.as_bytes();
    let mut seen_dot = false;
    let mut seen_exp = false;
    while end < bytes.len() {
        let b = bytes[end];
        let ok = b.is_ascii_digit()
            || (end == 0 && (b == b'+' || b == b'-'))
            || (b == b'.' && !seen_dot && !seen_exp)
            || ((b == b'e' || b == b'E') && !seen_exp && end > 0)
            || ((b == b'+' || b == b'-') && end > 0 && (bytes[end - 1] == b'e' || bytes[end - 1] == b'E'));
        if !ok {
            break;
        }
        if b == b'.' {
            seen_dot = true;
        }
        if b == b'e' || b == b'E' {
            seen_exp = true;
        }
        end += 1;
    }
    if text.starts_with("Infinity") || text.starts_with("+Infinity") || text.starts_with("-Infinity")
    {
        return Ok(Value::Number(string_to_number(
            text.split_whitespace().next().unwrap_or(text),
        )));
    }
    let prefix = &text[..end];
    match prefix.parse::<f64>() {
        Ok(n) => Ok(Value::Number(n)),
        Err(_) => Ok(Value::Number(f64::NAN)),
    }
}

pub(crate) struct GlobalIsNaN;
impl Builtin for GlobalIsNaN {
    const NAME: &'static str = "isNaN";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, _this, arguments| {
        // ### [19.2.3 isNaN ( number )](https://tc39.es/ecma262/#sec-isnan-number)
        let n = to_number(agent, arguments.get(0))?;
        Ok(Value::Boolean(n.is_nan()))
    });
}

pub(crate) struct GlobalIsFinite;
impl Builtin for GlobalIsFinite {
    const NAME: &'static str = "isFinite";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, _this, arguments| {
        let n = to_number(agent, arguments.get(0))?;
        Ok(Value::Boolean(n.is_finite()))
    });
}

pub(crate) struct GlobalEval;
impl Builtin for GlobalEval {
    const NAME: &'static str = "eval";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, _this, _arguments| {
        // Runtime source-text compilation is not provided by this host.
        Err(agent.throw_exception_with_static_message(
            ExceptionType::EvalError,
            "eval is not supported by this host",
        ))
    });
}

pub(crate) struct GlobalEncodeUriComponent;
impl Builtin for GlobalEncodeUriComponent {
    const NAME: &'static str = "encodeURIComponent";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, _this, arguments| {
        // ### [19.2.6.3 encodeURIComponent ( uriComponent )](https://tc39.es/ecma262/#sec-encodeuricomponent-uricomponent)
        let input = to_string(agent, arguments.get(0))?;
        let text = input.as_str(agent).to_owned();
        let mut out = std::string::String::new();
        for byte_or_char in text.chars() {
            let c = byte_or_char;
            if c.is_ascii_alphanumeric() || "-_.!~*'()".contains(c) {
                out.push(c);
            } else {
                let mut buffer = [0u8; 4];
                for byte in c.encode_utf8(&mut buffer).bytes() {
                    out.push_str(&format!("%{byte:02X}"));
                }
            }
        }
        Ok(Value::from_string(agent, out))
    });
}

pub(crate) struct GlobalDecodeUriComponent;
impl Builtin for GlobalDecodeUriComponent {
    const NAME: &'static str = "decodeURIComponent";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(|agent, _this, arguments| {
        // ### [19.2.6.2 decodeURIComponent ( encodedURIComponent )](https://tc39.es/ecma262/#sec-decodeuricomponent-encodeduricomponent)
        let input = to_string(agent, arguments.get(0))?;
        let text = input.as_str(agent).to_owned();
        let bytes = text.as_bytes();
        let mut decoded: Vec<u8> = Vec::with_capacity(bytes.len());
        let mut index = 0;
        while index < bytes.len() {
            if bytes[index] == b'%' {
                if index + 2 >= bytes.len() + 1 {
                    return Err(agent.throw_exception_with_static_message(
                        ExceptionType::UriError,
                        "URI malformed",
                    ));
                }
                let hex = text.get(index + 1..index + 3).ok_or_else(|| {
                    agent.throw_exception_with_static_message(
                        ExceptionType::UriError,
                        "URI malformed",
                    )
                })?;
                let byte = u8::from_str_radix(hex, 16).map_err(|_| {
                    agent.throw_exception_with_static_message(
                        ExceptionType::UriError,
                        "URI malformed",
                    )
                })?;
                decoded.push(byte);
                index += 3;
            } else {
                decoded.push(bytes[index]);
                index += 1;
            }
        }
        let decoded = std::string::String::from_utf8(decoded).map_err(|_| {
            agent.throw_exception_with_static_message(ExceptionType::UriError, "URI malformed")
        })?;
        Ok(Value::from_string(agent, decoded))
    });
}
