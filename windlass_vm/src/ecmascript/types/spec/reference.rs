// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.2.5 The Reference Record Specification Type](https://tc39.es/ecma262/#sec-reference-record-specification-type)

use crate::ecmascript::abstract_operations::operations_on_objects::set;
use crate::ecmascript::abstract_operations::type_conversion::to_object;
use crate::ecmascript::execution::{Agent, EnvironmentIndex, ExceptionType, JsResult};
use crate::ecmascript::types::{PropertyKey, Value};

/// ### [6.2.5 The Reference Record Specification Type](https://tc39.es/ecma262/#sec-reference-record-specification-type)
#[derive(Debug, Clone, Copy)]
pub struct Reference {
    /// \[\[Base]]
    pub base: Base,
    /// \[\[ReferencedName]]
    pub referenced_name: PropertyKey,
    /// \[\[Strict]]
    pub strict: bool,
    /// \[\[ThisValue]]: present only for super references.
    pub this_value: Option<Value>,
}

#[derive(Debug, Clone, Copy)]
pub enum Base {
    /// The reference could not be resolved to any binding.
    Unresolvable,
    /// The reference names a binding in an environment record.
    Environment(EnvironmentIndex),
    /// The reference names a property of a value.
    Value(Value),
}

impl Reference {
    /// ### [6.2.5.2 IsUnresolvableReference ( V )](https://tc39.es/ecma262/#sec-isunresolvablereference)
    pub fn is_unresolvable(&self) -> bool {
        matches!(self.base, Base::Unresolvable)
    }

    /// ### [6.2.5.1 IsPropertyReference ( V )](https://tc39.es/ecma262/#sec-ispropertyreference)
    pub fn is_property_reference(&self) -> bool {
        matches!(self.base, Base::Value(_))
    }

    /// ### [6.2.5.3 IsSuperReference ( V )](https://tc39.es/ecma262/#sec-issuperreference)
    pub fn is_super_reference(&self) -> bool {
        self.this_value.is_some()
    }

    /// ### [6.2.5.7 GetThisValue ( V )](https://tc39.es/ecma262/#sec-getthisvalue)
    pub fn get_this_value(&self) -> Value {
        debug_assert!(self.is_property_reference());
        match (self.this_value, self.base) {
            (Some(this), _) => this,
            (None, Base::Value(v)) => v,
            _ => unreachable!(),
        }
    }

    /// ### [6.2.5.5 GetValue ( V )](https://tc39.es/ecma262/#sec-getvalue)
    pub fn get_value(&self, agent: &mut Agent) -> JsResult<Value> {
        match self.base {
            // 2. If V.[[Base]] is unresolvable, throw a ReferenceError exception.
            Base::Unresolvable => {
                let name = self.referenced_name.debug_string(agent);
                Err(agent.throw_exception(
                    ExceptionType::ReferenceError,
                    format!("{name} is not defined"),
                ))
            }
            // 3. If IsPropertyReference(V) is true, then
            Base::Value(base) => {
                // a. Let baseObj be ? ToObject(V.[[Base]]).
                let base_obj = to_object(agent, base)?;
                // c. Return ? baseObj.[[Get]](V.[[ReferencedName]], GetThisValue(V)).
                base_obj.internal_get(agent, self.referenced_name, self.get_this_value())
            }
            // 4. Else,
            Base::Environment(env) => {
                // b. Return ? base.GetBindingValue(V.[[ReferencedName]], V.[[Strict]]).
                let PropertyKey::String(name) = self.referenced_name else {
                    unreachable!("environment references are always string-named")
                };
                env.get_binding_value(agent, name, self.strict)
            }
        }
    }

    /// ### [6.2.5.6 PutValue ( V, W )](https://tc39.es/ecma262/#sec-putvalue)
    pub fn put_value(&self, agent: &mut Agent, value: Value) -> JsResult<()> {
        match self.base {
            Base::Unresolvable => {
                // a. If V.[[Strict]] is true, throw a ReferenceError exception.
                if self.strict {
                    let name = self.referenced_name.debug_string(agent);
                    return Err(agent.throw_exception(
                        ExceptionType::ReferenceError,
                        format!("{name} is not defined"),
                    ));
                }
                // b. Let globalObj be GetGlobalObject().
                let global_obj = agent.current_global_object();
                // c. Perform ? Set(globalObj, V.[[ReferencedName]], W, false).
                set(agent, global_obj, self.referenced_name, value, false)
            }
            Base::Value(base) => {
                // a. Let baseObj be ? ToObject(V.[[Base]]).
                let base_obj = to_object(agent, base)?;
                // b. Let succeeded be ? baseObj.[[Set]](V.[[ReferencedName]], W, GetThisValue(V)).
                let succeeded = base_obj.internal_set(
                    agent,
                    self.referenced_name,
                    value,
                    self.get_this_value(),
                )?;
                // c. If succeeded is false and V.[[Strict]] is true, throw a TypeError exception.
                if !succeeded && self.strict {
                    let name = self.referenced_name.debug_string(agent);
                    return Err(agent.throw_exception(
                        ExceptionType::TypeError,
                        format!("Cannot assign to read-only property '{name}'"),
                    ));
                }
                Ok(())
            }
            Base::Environment(env) => {
                // a. Return ? base.SetMutableBinding(V.[[ReferencedName]], W, V.[[Strict]]).
                let PropertyKey::String(name) = self.referenced_name else {
                    unreachable!("environment references are always string-named")
                };
                env.set_mutable_binding(agent, name, value, self.strict)
            }
        }
    }

    /// ### [6.2.5.8 InitializeReferencedBinding ( V, W )](https://tc39.es/ecma262/#sec-initializereferencedbinding)
    pub fn initialize_referenced_binding(&self, agent: &mut Agent, value: Value) -> JsResult<()> {
        let Base::Environment(env) = self.base else {
            unreachable!("initialization target must be an environment reference")
        };
        let PropertyKey::String(name) = self.referenced_name else {
            unreachable!("environment references are always string-named")
        };
        env.initialize_binding(agent, name, value)
    }
}
