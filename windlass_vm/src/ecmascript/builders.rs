// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builders for assembling intrinsic objects declaratively. Intrinsic
//! modules describe their functions as [`Builtin`] impls and chain the
//! builder methods; the builders handle property attributes and name
//! bookkeeping.

use crate::ecmascript::builtins::builtin_function::{create_builtin_function, Builtin};
use crate::ecmascript::execution::{Agent, RealmIdentifier};
use crate::ecmascript::types::{
    Object, ObjectHeapData, ObjectKind, Property, PropertyKey, PropertyValue, Value,
};

/// Builds an ordinary intrinsic object (usually a prototype), registering
/// it in the realm's intrinsics table up front so that mutually-referential
/// intrinsics can link to it while it is still being populated.
pub struct OrdinaryObjectBuilder<'agent> {
    agent: &'agent mut Agent,
    realm: RealmIdentifier,
    object: Object,
}

impl<'agent> OrdinaryObjectBuilder<'agent> {
    pub fn new_intrinsic_object(
        agent: &'agent mut Agent,
        realm: RealmIdentifier,
        name: &'static str,
        prototype: Option<Object>,
    ) -> Self {
        let object = agent
            .heap
            .create_object(ObjectHeapData::new(prototype, ObjectKind::Ordinary));
        agent.get_realm_mut(realm).intrinsics.set(name, object);
        Self {
            agent,
            realm,
            object,
        }
    }

    /// Continues population of an intrinsic object created earlier, used
    /// when two intrinsics must exist before either can be filled in.
    pub fn for_existing(
        agent: &'agent mut Agent,
        realm: RealmIdentifier,
        object: Object,
    ) -> Self {
        Self {
            agent,
            realm,
            object,
        }
    }

    pub fn with_prototype(self, prototype: Object) -> Self {
        self.agent[self.object].prototype = Some(prototype);
        self
    }

    /// Adds a writable, non-enumerable, configurable data property, the
    /// default attributes of intrinsic methods and values.
    pub fn with_data_property(self, key: PropertyKey, value: Value) -> Self {
        self.agent[self.object]
            .properties
            .set(key, Property::data(value, true, false, true));
        self
    }

    /// Adds a non-writable, non-enumerable, non-configurable data
    /// property.
    pub fn with_frozen_property(self, key: PropertyKey, value: Value) -> Self {
        self.agent[self.object]
            .properties
            .set(key, Property::data(value, false, false, false));
        self
    }

    pub fn with_str_property(self, name: &str, value: Value) -> Self {
        let key = PropertyKey::from_str(self.agent, name);
        self.with_data_property(key, value)
    }

    /// Adds a built-in function under its declared name.
    pub fn with_builtin_function_property<T: Builtin>(self) -> Self {
        let function = create_builtin_function(
            self.agent,
            T::BEHAVIOUR,
            T::NAME,
            T::LENGTH,
            T::NAME_PREFIX,
        );
        let key = PropertyKey::from_str(self.agent, T::NAME);
        self.with_data_property(key, Value::Object(function))
    }

    /// Adds an accessor property whose getter is the given builtin.
    pub fn with_builtin_function_getter_property<T: Builtin>(self) -> Self {
        let getter = create_builtin_function(
            self.agent,
            T::BEHAVIOUR,
            T::NAME,
            T::LENGTH,
            "get ",
        );
        let key = PropertyKey::from_str(self.agent, T::NAME);
        self.agent[self.object].properties.set(
            key,
            Property {
                enumerable: false,
                configurable: true,
                value: PropertyValue::Accessor {
                    get: Some(getter),
                    set: None,
                },
            },
        );
        self
    }

    /// Adds the back-link `constructor` property.
    pub fn with_constructor_property(self, constructor: Object) -> Self {
        let key = PropertyKey::from_str(self.agent, "constructor");
        self.with_data_property(key, Value::Object(constructor))
    }

    /// Adds an `@@toStringTag` entry.
    pub fn with_to_string_tag(self, tag: &str) -> Self {
        let value = Value::from_str(self.agent, tag);
        let key = PropertyKey::Symbol(crate::heap::WellKnownSymbolIndexes::ToStringTag.into());
        self.agent[self.object].properties.set(
            key,
            Property::data(value, false, false, true),
        );
        self
    }

    pub fn with_symbol_data_property(self, symbol: crate::heap::Symbol, value: Value) -> Self {
        self.agent[self.object]
            .properties
            .set(PropertyKey::Symbol(symbol), Property::data(value, true, false, true));
        self
    }

    pub fn realm(&self) -> RealmIdentifier {
        self.realm
    }

    pub fn agent_mut(&mut self) -> &mut Agent {
        self.agent
    }

    pub fn build(self) -> Object {
        self.object
    }
}

/// Builds a built-in function intrinsic (usually a constructor).
pub struct BuiltinFunctionBuilder<'agent> {
    agent: &'agent mut Agent,
    realm: RealmIdentifier,
    function: Object,
}

impl<'agent> BuiltinFunctionBuilder<'agent> {
    pub fn new_intrinsic_constructor<T: Builtin>(
        agent: &'agent mut Agent,
        realm: RealmIdentifier,
        intrinsic_name: &'static str,
    ) -> Self {
        let function =
            create_builtin_function(agent, T::BEHAVIOUR, T::NAME, T::LENGTH, T::NAME_PREFIX);
        agent.get_realm_mut(realm).intrinsics.set(intrinsic_name, function);
        Self {
            agent,
            realm,
            function,
        }
    }

    pub fn new<T: Builtin>(agent: &'agent mut Agent, realm: RealmIdentifier) -> Self {
        let function =
            create_builtin_function(agent, T::BEHAVIOUR, T::NAME, T::LENGTH, T::NAME_PREFIX);
        Self {
            agent,
            realm,
            function,
        }
    }

    /// Adds the non-writable, non-enumerable, non-configurable `prototype`
    /// property constructors carry.
    pub fn with_prototype_property(self, prototype: Object) -> Self {
        let key = PropertyKey::from_str(self.agent, "prototype");
        self.agent[self.function].properties.set(
            key,
            Property::data(Value::Object(prototype), false, false, false),
        );
        self
    }

    pub fn with_data_property(self, key: PropertyKey, value: Value) -> Self {
        self.agent[self.function]
            .properties
            .set(key, Property::data(value, true, false, true));
        self
    }

    /// Adds a non-writable, non-enumerable, non-configurable data
    /// property (the attributes of the well-known symbols).
    pub fn with_frozen_data_property(self, key: PropertyKey, value: Value) -> Self {
        self.agent[self.function]
            .properties
            .set(key, Property::data(value, false, false, false));
        self
    }

    pub fn agent_mut(&mut self) -> &mut Agent {
        self.agent
    }

    pub fn with_str_property(self, name: &str, value: Value) -> Self {
        let key = PropertyKey::from_str(self.agent, name);
        self.with_data_property(key, value)
    }

    pub fn with_builtin_function_property<T: Builtin>(self) -> Self {
        let function = create_builtin_function(
            self.agent,
            T::BEHAVIOUR,
            T::NAME,
            T::LENGTH,
            T::NAME_PREFIX,
        );
        let key = PropertyKey::from_str(self.agent, T::NAME);
        self.with_data_property(key, Value::Object(function))
    }

    pub fn with_builtin_function_getter_property<T: Builtin>(self) -> Self {
        let getter =
            create_builtin_function(self.agent, T::BEHAVIOUR, T::NAME, T::LENGTH, "get ");
        let key = PropertyKey::from_str(self.agent, T::NAME);
        self.agent[self.function].properties.set(
            key,
            Property {
                enumerable: false,
                configurable: true,
                value: PropertyValue::Accessor {
                    get: Some(getter),
                    set: None,
                },
            },
        );
        self
    }

    pub fn with_symbol_data_property(self, symbol: crate::heap::Symbol, value: Value) -> Self {
        self.agent[self.function]
            .properties
            .set(PropertyKey::Symbol(symbol), Property::data(value, true, false, true));
        self
    }

    pub fn realm(&self) -> RealmIdentifier {
        self.realm
    }

    pub fn build(self) -> Object {
        self.function
    }
}
