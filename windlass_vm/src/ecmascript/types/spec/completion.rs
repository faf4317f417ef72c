// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.2.4 The Completion Record Specification Type](https://tc39.es/ecma262/#sec-completion-record-specification-type)

use crate::ecmascript::execution::{JsError, JsResult};
use crate::ecmascript::types::{HeapString, Value};

/// ### [6.2.4 The Completion Record Specification Type](https://tc39.es/ecma262/#sec-completion-record-specification-type)
///
/// The result of every evaluation step. A normal completion carries a value
/// or the empty sentinel; the abrupt kinds carry their propagation payload.
/// Abruptness is a single discriminant test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Completion {
    /// \[\[Type]]: normal; `None` is the ~empty~ sentinel.
    Normal(Option<Value>),
    /// \[\[Type]]: throw.
    Throw(JsError),
    /// \[\[Type]]: return.
    Return(Value),
    /// \[\[Type]]: break, with the optional \[\[Target]] label.
    Break(Option<HeapString>),
    /// \[\[Type]]: continue, with the optional \[\[Target]] label.
    Continue(Option<HeapString>),
}

impl Completion {
    pub const EMPTY: Completion = Completion::Normal(None);

    pub fn normal(value: Value) -> Self {
        Completion::Normal(Some(value))
    }

    pub fn is_abrupt(&self) -> bool {
        !matches!(self, Completion::Normal(_))
    }

    pub fn is_normal_empty(&self) -> bool {
        matches!(self, Completion::Normal(None))
    }

    /// ### [6.2.4.3 UpdateEmpty ( completionRecord, value )](https://tc39.es/ecma262/#sec-updateempty)
    pub fn update_empty(self, value: Option<Value>) -> Self {
        match self {
            Completion::Normal(None) => Completion::Normal(value),
            other => other,
        }
    }

    /// The value a normal completion carries, with empty read as undefined.
    pub fn value(&self) -> Option<Value> {
        match self {
            Completion::Normal(v) => *v,
            Completion::Return(v) => Some(*v),
            Completion::Throw(e) => Some(e.value()),
            Completion::Break(_) | Completion::Continue(_) => None,
        }
    }

    /// Converts a completion into the `JsResult` view used by abstract
    /// operations: normal becomes `Ok`, throw becomes `Err`. The caller
    /// asserts that break/continue/return cannot occur here.
    pub fn into_js_result(self) -> JsResult<Value> {
        match self {
            Completion::Normal(v) => Ok(v.unwrap_or(Value::Undefined)),
            Completion::Throw(e) => Err(e),
            Completion::Return(_) | Completion::Break(_) | Completion::Continue(_) => {
                unreachable!("control-flow completion escaped its syntactic context")
            }
        }
    }
}

impl From<JsResult<Value>> for Completion {
    fn from(value: JsResult<Value>) -> Self {
        match value {
            Ok(v) => Completion::normal(v),
            Err(e) => Completion::Throw(e),
        }
    }
}

impl From<JsError> for Completion {
    fn from(value: JsError) -> Self {
        Completion::Throw(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_empty_only_fills_normal_empty() {
        let v = Value::Boolean(true);
        assert_eq!(
            Completion::EMPTY.update_empty(Some(v)),
            Completion::normal(v)
        );
        let kept = Completion::normal(Value::Null).update_empty(Some(v));
        assert_eq!(kept, Completion::normal(Value::Null));
        let brk = Completion::Break(None).update_empty(Some(v));
        assert_eq!(brk, Completion::Break(None));
    }
}
