// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.1.7 The Object Type](https://tc39.es/ecma262/#sec-object-type)
//!
//! Every object shares one heap header: prototype link, extensible flag,
//! ordered property storage, and an [`ObjectKind`] carrying the internal
//! slots of the exotic variants. The essential internal methods dispatch on
//! the kind once per call; ordinary behaviour is the fallback.

mod property_key;
mod property_storage;

pub use property_key::*;
pub use property_storage::*;

use core::ops::{Index, IndexMut};

use crate::ecmascript::builtins::{
    arguments::{
        mapped_arguments_define_own_property, mapped_arguments_delete,
        mapped_arguments_get_own_property, ParameterMap,
    },
    array::array_define_own_property,
    bound_function::{bound_function_call, bound_function_construct, BoundFunctionData},
    builtin_function::{builtin_function_call, builtin_function_construct, BuiltinFunctionData},
    control_abstraction_objects::{
        async_generator_objects::AsyncGeneratorData,
        generator_objects::GeneratorData,
        promise_objects::{
            promise_abstract_operations::promise_resolving_functions::{
                promise_resolving_function_call, PromiseResolvingFunctionData,
            },
            promise_objects_data::PromiseData,
        },
    },
    ecmascript_function::{
        ecmascript_function_call, ecmascript_function_construct, ECMAScriptFunctionObjectData,
    },
    error::ErrorData,
    iterator_objects::{
        ArrayIteratorData, MapIteratorData, SetIteratorData, StringIteratorData,
    },
    keyed_collections::{MapData, SetData, WeakMapData, WeakSetData},
    module_namespace::{
        module_namespace_define_own_property, module_namespace_delete, module_namespace_get,
        module_namespace_get_own_property, module_namespace_has_property,
        module_namespace_own_property_keys, module_namespace_set,
        module_namespace_set_prototype_of, ModuleNamespaceData,
    },
    ordinary::{
        ordinary_define_own_property, ordinary_delete, ordinary_get, ordinary_get_own_property,
        ordinary_get_prototype_of, ordinary_has_property, ordinary_is_extensible,
        ordinary_own_property_keys, ordinary_prevent_extensions, ordinary_set,
        ordinary_set_prototype_of,
    },
    proxy::{
        proxy_call, proxy_construct, proxy_define_own_property, proxy_delete,
        proxy_get, proxy_get_own_property, proxy_get_prototype_of, proxy_has_property,
        proxy_is_extensible, proxy_own_property_keys, proxy_prevent_extensions, proxy_set,
        proxy_set_prototype_of, ProxyData,
    },
    regexp::RegExpData,
    string_object::{
        string_exotic_define_own_property, string_exotic_get_own_property,
        string_exotic_own_property_keys,
    },
    ArgumentsList,
};
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult};
use crate::ecmascript::types::{PropertyDescriptor, Value};
pub use crate::heap::Object;

/// The per-variant internal slots of an object. The populated variant picks
/// the internal-method behaviour.
#[derive(Debug)]
pub enum ObjectKind {
    Ordinary,
    /// ### [10.4.2 Array Exotic Objects](https://tc39.es/ecma262/#sec-array-exotic-objects)
    ///
    /// The `length` property and the index properties live in the ordinary
    /// property storage; the exotic \[\[DefineOwnProperty]] keeps them
    /// coupled.
    Array,
    /// ### [10.4.3 String Exotic Objects](https://tc39.es/ecma262/#sec-string-exotic-objects)
    ///
    /// Doubles as the String primitive box; `StringData` is the boxed value.
    StringObject { value: crate::heap::HeapString },
    /// ### [10.4.4 Arguments Exotic Objects](https://tc39.es/ecma262/#sec-arguments-exotic-objects)
    ArgumentsMapped(Box<ParameterMap>),
    ArgumentsUnmapped,
    /// Boolean/Number/Symbol/BigInt boxes (`BooleanData` and friends).
    PrimitiveBoolean(bool),
    PrimitiveNumber(f64),
    PrimitiveSymbol(crate::heap::Symbol),
    PrimitiveBigInt(crate::heap::HeapBigInt),
    ECMAScriptFunction(Box<ECMAScriptFunctionObjectData>),
    BuiltinFunction(BuiltinFunctionData),
    BoundFunction(Box<BoundFunctionData>),
    Proxy(ProxyData),
    /// Carries `ErrorData`; message and stack are ordinary properties.
    Error(ErrorData),
    Promise(Box<PromiseData>),
    PromiseResolvingFunction(PromiseResolvingFunctionData),
    Generator(Box<GeneratorData>),
    AsyncGenerator(Box<AsyncGeneratorData>),
    Map(Box<MapData>),
    Set(Box<SetData>),
    WeakMap(Box<WeakMapData>),
    WeakSet(Box<WeakSetData>),
    RegExp(Box<RegExpData>),
    ArrayIterator(Box<ArrayIteratorData>),
    StringIterator(Box<StringIteratorData>),
    MapIterator(Box<MapIteratorData>),
    SetIterator(Box<SetIteratorData>),
    ModuleNamespace(Box<ModuleNamespaceData>),
}

#[derive(Debug)]
pub struct ObjectHeapData {
    /// \[\[Prototype]]
    pub prototype: Option<Object>,
    /// \[\[Extensible]]
    pub extensible: bool,
    pub properties: PropertyStorage,
    pub kind: ObjectKind,
}

impl ObjectHeapData {
    pub fn new(prototype: Option<Object>, kind: ObjectKind) -> Self {
        Self {
            prototype,
            extensible: true,
            properties: PropertyStorage::new(),
            kind,
        }
    }
}

impl Index<Object> for Agent {
    type Output = ObjectHeapData;

    fn index(&self, index: Object) -> &Self::Output {
        &self.heap.objects[index.into_index()]
    }
}

impl IndexMut<Object> for Agent {
    fn index_mut(&mut self, index: Object) -> &mut Self::Output {
        &mut self.heap.objects[index.into_index()]
    }
}

impl Object {
    pub fn prototype(self, agent: &Agent) -> Option<Object> {
        agent[self].prototype
    }

    pub fn extensible(self, agent: &Agent) -> bool {
        agent[self].extensible
    }

    pub fn kind<'a>(self, agent: &'a Agent) -> &'a ObjectKind {
        &agent[self].kind
    }

    pub fn is_callable(self, agent: &Agent) -> bool {
        match &agent[self].kind {
            ObjectKind::ECMAScriptFunction(_)
            | ObjectKind::BuiltinFunction(_)
            | ObjectKind::BoundFunction(_)
            | ObjectKind::PromiseResolvingFunction(_) => true,
            ObjectKind::Proxy(proxy) => match proxy.target {
                Some(target) => target.is_callable(agent),
                None => proxy.is_callable,
            },
            _ => false,
        }
    }

    pub fn is_constructor(self, agent: &Agent) -> bool {
        match &agent[self].kind {
            ObjectKind::ECMAScriptFunction(data) => data.constructor_status.is_constructor(),
            ObjectKind::BuiltinFunction(data) => data.is_constructor(),
            ObjectKind::BoundFunction(data) => data.bound_target_function.is_constructor(agent),
            ObjectKind::Proxy(proxy) => match proxy.target {
                Some(target) => target.is_constructor(agent),
                None => proxy.is_constructor,
            },
            _ => false,
        }
    }

    pub fn is_array(self, agent: &Agent) -> bool {
        match &agent[self].kind {
            ObjectKind::Array => true,
            ObjectKind::Proxy(proxy) => proxy
                .target
                .is_some_and(|target| target.is_array(agent)),
            _ => false,
        }
    }

    /// ### \[\[GetPrototypeOf]]
    pub fn internal_get_prototype_of(self, agent: &mut Agent) -> JsResult<Option<Object>> {
        match &agent[self].kind {
            ObjectKind::Proxy(_) => proxy_get_prototype_of(agent, self),
            _ => Ok(ordinary_get_prototype_of(agent, self)),
        }
    }

    /// ### \[\[SetPrototypeOf]]
    pub fn internal_set_prototype_of(
        self,
        agent: &mut Agent,
        prototype: Option<Object>,
    ) -> JsResult<bool> {
        match &agent[self].kind {
            ObjectKind::Proxy(_) => proxy_set_prototype_of(agent, self, prototype),
            ObjectKind::ModuleNamespace(_) => {
                Ok(module_namespace_set_prototype_of(agent, self, prototype))
            }
            _ => Ok(ordinary_set_prototype_of(agent, self, prototype)),
        }
    }

    /// ### \[\[IsExtensible]]
    pub fn internal_is_extensible(self, agent: &mut Agent) -> JsResult<bool> {
        match &agent[self].kind {
            ObjectKind::Proxy(_) => proxy_is_extensible(agent, self),
            _ => Ok(ordinary_is_extensible(agent, self)),
        }
    }

    /// ### \[\[PreventExtensions]]
    pub fn internal_prevent_extensions(self, agent: &mut Agent) -> JsResult<bool> {
        match &agent[self].kind {
            ObjectKind::Proxy(_) => proxy_prevent_extensions(agent, self),
            _ => Ok(ordinary_prevent_extensions(agent, self)),
        }
    }

    /// ### \[\[GetOwnProperty]]
    pub fn internal_get_own_property(
        self,
        agent: &mut Agent,
        key: PropertyKey,
    ) -> JsResult<Option<PropertyDescriptor>> {
        match &agent[self].kind {
            ObjectKind::StringObject { .. } => {
                Ok(string_exotic_get_own_property(agent, self, key))
            }
            ObjectKind::ArgumentsMapped(_) => {
                Ok(mapped_arguments_get_own_property(agent, self, key))
            }
            ObjectKind::Proxy(_) => proxy_get_own_property(agent, self, key),
            ObjectKind::ModuleNamespace(_) => module_namespace_get_own_property(agent, self, key),
            _ => Ok(ordinary_get_own_property(agent, self, key)),
        }
    }

    /// ### \[\[DefineOwnProperty]]
    pub fn internal_define_own_property(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        descriptor: PropertyDescriptor,
    ) -> JsResult<bool> {
        match &agent[self].kind {
            ObjectKind::Array => array_define_own_property(agent, self, key, descriptor),
            ObjectKind::StringObject { .. } => {
                Ok(string_exotic_define_own_property(agent, self, key, descriptor))
            }
            ObjectKind::ArgumentsMapped(_) => {
                mapped_arguments_define_own_property(agent, self, key, descriptor)
            }
            ObjectKind::Proxy(_) => proxy_define_own_property(agent, self, key, descriptor),
            ObjectKind::ModuleNamespace(_) => {
                module_namespace_define_own_property(agent, self, key, descriptor)
            }
            _ => ordinary_define_own_property(agent, self, key, descriptor),
        }
    }

    /// ### \[\[HasProperty]]
    pub fn internal_has_property(self, agent: &mut Agent, key: PropertyKey) -> JsResult<bool> {
        match &agent[self].kind {
            ObjectKind::Proxy(_) => proxy_has_property(agent, self, key),
            ObjectKind::ModuleNamespace(_) => module_namespace_has_property(agent, self, key),
            _ => ordinary_has_property(agent, self, key),
        }
    }

    /// ### \[\[Get]]
    pub fn internal_get(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        match &agent[self].kind {
            ObjectKind::Proxy(_) => proxy_get(agent, self, key, receiver),
            ObjectKind::ModuleNamespace(_) => module_namespace_get(agent, self, key, receiver),
            _ => ordinary_get(agent, self, key, receiver),
        }
    }

    /// ### \[\[Set]]
    pub fn internal_set(
        self,
        agent: &mut Agent,
        key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        match &agent[self].kind {
            ObjectKind::Proxy(_) => proxy_set(agent, self, key, value, receiver),
            ObjectKind::ModuleNamespace(_) => {
                Ok(module_namespace_set(agent, self, key, value, receiver))
            }
            _ => ordinary_set(agent, self, key, value, receiver),
        }
    }

    /// ### \[\[Delete]]
    pub fn internal_delete(self, agent: &mut Agent, key: PropertyKey) -> JsResult<bool> {
        match &agent[self].kind {
            ObjectKind::ArgumentsMapped(_) => mapped_arguments_delete(agent, self, key),
            ObjectKind::Proxy(_) => proxy_delete(agent, self, key),
            ObjectKind::ModuleNamespace(_) => module_namespace_delete(agent, self, key),
            _ => ordinary_delete(agent, self, key),
        }
    }

    /// ### \[\[OwnPropertyKeys]]
    pub fn internal_own_property_keys(self, agent: &mut Agent) -> JsResult<Vec<PropertyKey>> {
        match &agent[self].kind {
            ObjectKind::StringObject { .. } => Ok(string_exotic_own_property_keys(agent, self)),
            ObjectKind::Proxy(_) => proxy_own_property_keys(agent, self),
            ObjectKind::ModuleNamespace(_) => Ok(module_namespace_own_property_keys(agent, self)),
            _ => Ok(ordinary_own_property_keys(agent, self)),
        }
    }

    /// ### \[\[Call]]
    pub fn internal_call(
        self,
        agent: &mut Agent,
        this_argument: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        match &agent[self].kind {
            ObjectKind::ECMAScriptFunction(_) => {
                ecmascript_function_call(agent, self, this_argument, arguments)
            }
            ObjectKind::BuiltinFunction(_) => {
                builtin_function_call(agent, self, this_argument, arguments)
            }
            ObjectKind::BoundFunction(_) => bound_function_call(agent, self, arguments),
            ObjectKind::PromiseResolvingFunction(_) => {
                promise_resolving_function_call(agent, self, arguments)
            }
            ObjectKind::Proxy(_) => proxy_call(agent, self, this_argument, arguments),
            _ => Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Value is not a function",
            )),
        }
    }

    /// ### \[\[Construct]]
    pub fn internal_construct(
        self,
        agent: &mut Agent,
        arguments: ArgumentsList,
        new_target: Object,
    ) -> JsResult<Object> {
        match &agent[self].kind {
            ObjectKind::ECMAScriptFunction(_) => {
                ecmascript_function_construct(agent, self, arguments, new_target)
            }
            ObjectKind::BuiltinFunction(_) => {
                builtin_function_construct(agent, self, arguments, new_target)
            }
            ObjectKind::BoundFunction(_) => {
                bound_function_construct(agent, self, arguments, new_target)
            }
            ObjectKind::Proxy(_) => proxy_construct(agent, self, arguments, new_target),
            _ => Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Value is not a constructor",
            )),
        }
    }

    /// Shallow diagnostic rendering; never runs user code.
    pub fn debug_string(self, agent: &Agent) -> std::string::String {
        match &agent[self].kind {
            ObjectKind::Error(_) => {
                let name = self.get_string_property_for_debug(agent, "name");
                let message = self.get_string_property_for_debug(agent, "message");
                match (name, message) {
                    (Some(name), Some(message)) if !message.is_empty() => {
                        format!("{name}: {message}")
                    }
                    (Some(name), _) => name,
                    _ => "Error".to_owned(),
                }
            }
            ObjectKind::ECMAScriptFunction(_)
            | ObjectKind::BuiltinFunction(_)
            | ObjectKind::BoundFunction(_) => {
                let name = self
                    .get_string_property_for_debug(agent, "name")
                    .unwrap_or_default();
                format!("[Function: {name}]")
            }
            ObjectKind::Array => {
                let length = self
                    .get_string_property_for_debug(agent, "length")
                    .unwrap_or_else(|| "0".to_owned());
                format!("[Array({length})]")
            }
            ObjectKind::RegExp(data) => format!("/{}/", data.original_source.as_str(agent)),
            _ => "[object Object]".to_owned(),
        }
    }

    fn get_string_property_for_debug(
        self,
        agent: &Agent,
        name: &str,
    ) -> Option<std::string::String> {
        let key = agent.heap.string_lookup.get(name).copied()?;
        let property = agent[self].properties.get(PropertyKey::String(key))?;
        match property.value {
            PropertyValue::Data { value, .. } => Some(value.debug_string(agent)),
            _ => None,
        }
    }
}
