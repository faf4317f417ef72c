// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.2.6 The Property Descriptor Specification Type](https://tc39.es/ecma262/#sec-property-descriptor-specification-type)

use crate::ecmascript::execution::{Agent, ExceptionType, JsResult};
use crate::ecmascript::types::{Object, Value};

/// ### [6.2.6 The Property Descriptor Specification Type](https://tc39.es/ecma262/#sec-property-descriptor-specification-type)
///
/// A partial record: every field may be absent. The getter and setter
/// fields distinguish "absent" (outer `None`) from "present but undefined"
/// (inner `None`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropertyDescriptor {
    /// \[\[Value]]
    pub value: Option<Value>,
    /// \[\[Writable]]
    pub writable: Option<bool>,
    /// \[\[Get]]
    pub get: Option<Option<Object>>,
    /// \[\[Set]]
    pub set: Option<Option<Object>>,
    /// \[\[Enumerable]]
    pub enumerable: Option<bool>,
    /// \[\[Configurable]]
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    pub fn new_data_descriptor(value: Value) -> Self {
        Self {
            value: Some(value),
            writable: Some(true),
            enumerable: Some(true),
            configurable: Some(true),
            ..Default::default()
        }
    }

    pub fn non_enumerable_data_descriptor(value: Value) -> Self {
        Self {
            value: Some(value),
            writable: Some(true),
            enumerable: Some(false),
            configurable: Some(true),
            ..Default::default()
        }
    }

    pub fn frozen_data_descriptor(value: Value) -> Self {
        Self {
            value: Some(value),
            writable: Some(false),
            enumerable: Some(true),
            configurable: Some(false),
            ..Default::default()
        }
    }

    /// ### [6.2.6.1 IsAccessorDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isaccessordescriptor)
    pub fn is_accessor_descriptor(&self) -> bool {
        // 2. If Desc has a [[Get]] field, return true.
        // 3. If Desc has a [[Set]] field, return true.
        self.get.is_some() || self.set.is_some()
    }

    /// ### [6.2.6.2 IsDataDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isdatadescriptor)
    pub fn is_data_descriptor(&self) -> bool {
        // 2. If Desc has a [[Value]] field, return true.
        // 3. If Desc has a [[Writable]] field, return true.
        self.value.is_some() || self.writable.is_some()
    }

    /// ### [6.2.6.3 IsGenericDescriptor ( Desc )](https://tc39.es/ecma262/#sec-isgenericdescriptor)
    pub fn is_generic_descriptor(&self) -> bool {
        !self.is_accessor_descriptor() && !self.is_data_descriptor()
    }

    pub fn is_fully_populated(&self) -> bool {
        (self.enumerable.is_some() && self.configurable.is_some())
            && ((self.value.is_some() && self.writable.is_some())
                || (self.get.is_some() && self.set.is_some()))
    }

    /// ### [6.2.6.6 CompletePropertyDescriptor ( Desc )](https://tc39.es/ecma262/#sec-completepropertydescriptor)
    ///
    /// Fills absent fields with their defaults: `undefined` for value-like
    /// fields and `false` for the flags.
    pub fn complete(mut self) -> Self {
        if self.is_generic_descriptor() || self.is_data_descriptor() {
            self.value.get_or_insert(Value::Undefined);
            self.writable.get_or_insert(false);
        } else {
            self.get.get_or_insert(None);
            self.set.get_or_insert(None);
        }
        self.enumerable.get_or_insert(false);
        self.configurable.get_or_insert(false);
        self
    }

    /// Rejects descriptors that define both data and accessor fields.
    pub fn validate_exclusivity(&self, agent: &mut Agent) -> JsResult<()> {
        if (self.value.is_some() || self.writable.is_some())
            && (self.get.is_some() || self.set.is_some())
        {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Property descriptor cannot be both a data and an accessor descriptor",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_descriptor_completes_as_data() {
        let desc = PropertyDescriptor::default().complete();
        assert_eq!(desc.value, Some(Value::Undefined));
        assert_eq!(desc.writable, Some(false));
        assert_eq!(desc.enumerable, Some(false));
        assert_eq!(desc.configurable, Some(false));
        assert!(desc.get.is_none());
    }

    #[test]
    fn accessor_descriptor_completes_without_data_fields() {
        let desc = PropertyDescriptor {
            get: Some(None),
            ..Default::default()
        }
        .complete();
        assert!(desc.value.is_none());
        assert!(desc.writable.is_none());
        assert_eq!(desc.set, Some(None));
    }
}
