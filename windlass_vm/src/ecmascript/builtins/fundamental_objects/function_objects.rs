// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.2 Function Objects](https://tc39.es/ecma262/#sec-function-objects)

use crate::ecmascript::abstract_operations::operations_on_objects::{
    call_function, create_list_from_array_like, get, ordinary_has_instance,
};
use crate::ecmascript::builders::BuiltinFunctionBuilder;
use crate::ecmascript::builtins::bound_function::bound_function_create;
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::ecmascript_function::function_data;
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult, RealmIdentifier};
use crate::ecmascript::types::{Object, ObjectKind, Property, PropertyKey, Value};
use crate::heap::WellKnownSymbolIndexes;

pub(crate) struct FunctionConstructor;
impl Builtin for FunctionConstructor {
    const NAME: &'static str = "Function";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(Self::constructor);
}

impl FunctionConstructor {
    /// ### [20.2.1.1 Function ( ...parameterArgs, bodyArg )](https://tc39.es/ecma262/#sec-function-p1-p2-pn-body)
    ///
    /// Dynamic function creation compiles source text at runtime, which
    /// this embedding does not allow.
    fn constructor(
        agent: &mut Agent,
        _this_value: Value,
        _arguments: ArgumentsList,
        _new_target: Option<Object>,
    ) -> JsResult<Value> {
        Err(agent.throw_exception_with_static_message(
            ExceptionType::EvalError,
            "Dynamic function creation is not supported by this host",
        ))
    }
}

pub(crate) struct FunctionPrototype;

struct FunctionPrototypeApply;
impl Builtin for FunctionPrototypeApply {
    const NAME: &'static str = "apply";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::apply);
}
struct FunctionPrototypeBind;
impl Builtin for FunctionPrototypeBind {
    const NAME: &'static str = "bind";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::bind);
}
struct FunctionPrototypeCall;
impl Builtin for FunctionPrototypeCall {
    const NAME: &'static str = "call";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::call);
}
struct FunctionPrototypeToString;
impl Builtin for FunctionPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::to_string);
}
struct FunctionPrototypeHasInstance;
impl Builtin for FunctionPrototypeHasInstance {
    const NAME: &'static str = "[Symbol.hasInstance]";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(FunctionPrototype::has_instance);
}

impl FunctionPrototype {
    /// ### [20.2.3.1 Function.prototype.apply ( thisArg, argArray )](https://tc39.es/ecma262/#sec-function.prototype.apply)
    fn apply(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Object(function) = this_value else {
            return Err(not_a_function(agent));
        };
        if !function.is_callable(agent) {
            return Err(not_a_function(agent));
        }
        let this_arg = arguments.get(0);
        let arg_array = arguments.get(1);
        // 3. If argArray is either undefined or null, call with no
        //    arguments.
        if arg_array.is_nullish() {
            return call_function(agent, function, this_arg, &[]);
        }
        // 4. Let argList be ? CreateListFromArrayLike(argArray).
        let args = create_list_from_array_like(agent, arg_array)?;
        call_function(agent, function, this_arg, &args)
    }

    /// ### [20.2.3.2 Function.prototype.bind ( thisArg, ...args )](https://tc39.es/ecma262/#sec-function.prototype.bind)
    fn bind(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        // 1./2. The target must be callable.
        let Value::Object(target) = this_value else {
            return Err(not_a_function(agent));
        };
        if !target.is_callable(agent) {
            return Err(not_a_function(agent));
        }
        let bound_this = arguments.get(0);
        let bound_args: Vec<Value> = arguments.0.iter().skip(1).copied().collect();
        let bound_args_len = bound_args.len();
        // 3. Let F be ? BoundFunctionCreate(Target, thisArg, args).
        let bound = bound_function_create(agent, target, bound_this, bound_args)?;
        // 4.-8. Carry over length and the "bound " name.
        let length_key = PropertyKey::from_str(agent, "length");
        let target_length = get(agent, target, length_key)?;
        let length = match target_length {
            Value::Number(n) if n.is_finite() => (n.max(0.0) - bound_args_len as f64).max(0.0),
            Value::Number(n) if n == f64::INFINITY => f64::INFINITY,
            _ => 0.0,
        };
        agent[bound].properties.set(
            length_key,
            Property::data(Value::Number(length), false, false, true),
        );
        let name_key = PropertyKey::from_str(agent, "name");
        let target_name = get(agent, target, name_key)?;
        let target_name = match target_name {
            Value::String(name) => name.as_str(agent).to_owned(),
            _ => std::string::String::new(),
        };
        let bound_name = Value::from_string(agent, format!("bound {target_name}"));
        agent[bound]
            .properties
            .set(name_key, Property::data(bound_name, false, false, true));
        Ok(Value::Object(bound))
    }

    /// ### [20.2.3.3 Function.prototype.call ( thisArg, ...args )](https://tc39.es/ecma262/#sec-function.prototype.call)
    fn call(agent: &mut Agent, this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let Value::Object(function) = this_value else {
            return Err(not_a_function(agent));
        };
        if !function.is_callable(agent) {
            return Err(not_a_function(agent));
        }
        let this_arg = arguments.get(0);
        let args: Vec<Value> = arguments.0.iter().skip(1).copied().collect();
        call_function(agent, function, this_arg, &args)
    }

    /// ### [20.2.3.5 Function.prototype.toString ( )](https://tc39.es/ecma262/#sec-function.prototype.tostring)
    fn to_string(
        agent: &mut Agent,
        this_value: Value,
        _arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let Value::Object(function) = this_value else {
            return Err(not_a_function(agent));
        };
        match &agent[function].kind {
            ObjectKind::ECMAScriptFunction(_) => {
                let data = function_data(agent, function);
                let span = data.source_text;
                let source_code = data.source_code;
                let text = source_code.source_text(agent);
                let start = (span.start as usize).min(text.len());
                let end = (span.end as usize).clamp(start, text.len());
                let source = text[start..end].to_owned();
                Ok(Value::from_string(agent, source))
            }
            ObjectKind::BuiltinFunction(_)
            | ObjectKind::BoundFunction(_)
            | ObjectKind::PromiseResolvingFunction(_) => {
                let name_key = PropertyKey::from_str(agent, "name");
                let name = get(agent, function, name_key)?;
                let name = match name {
                    Value::String(name) => name.as_str(agent).to_owned(),
                    _ => std::string::String::new(),
                };
                Ok(Value::from_string(
                    agent,
                    format!("function {name}() {{ [native code] }}"),
                ))
            }
            _ => Err(not_a_function(agent)),
        }
    }

    /// ### [20.2.3.6 Function.prototype \[ @@hasInstance \] ( V )](https://tc39.es/ecma262/#sec-function.prototype-@@hasinstance)
    fn has_instance(
        agent: &mut Agent,
        this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Return ? OrdinaryHasInstance(F, V).
        Ok(Value::Boolean(ordinary_has_instance(
            agent,
            this_value,
            arguments.get(0),
        )?))
    }

    /// The behaviour of `%Function.prototype%` itself: accept any
    /// arguments and return undefined.
    pub(crate) fn behaviour(
        _agent: &mut Agent,
        _this_value: Value,
        _arguments: ArgumentsList,
    ) -> JsResult<Value> {
        Ok(Value::Undefined)
    }
}

fn not_a_function(agent: &mut Agent) -> crate::ecmascript::execution::JsError {
    agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Function method called on a non-callable value",
    )
}

/// The `%ThrowTypeError%` intrinsic.
pub(crate) struct ThrowTypeError;
impl Builtin for ThrowTypeError {
    const NAME: &'static str = "";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(Self::behaviour);
}
impl ThrowTypeError {
    fn behaviour(
        agent: &mut Agent,
        _this_value: Value,
        _arguments: ArgumentsList,
    ) -> JsResult<Value> {
        Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "'caller', 'callee', and 'arguments' properties may not be accessed in strict mode",
        ))
    }
}

/// Populates `%Function.prototype%` (created as a shell by the realm
/// bootstrap) and creates `%Function%` and `%ThrowTypeError%`.
pub(crate) fn create_function_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let function_prototype = agent.get_realm(realm).intrinsics.function_prototype();
    let constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<FunctionConstructor>(
        agent,
        realm,
        "%Function%",
    )
    .with_prototype_property(function_prototype)
    .build();

    // The prototype's own function properties.
    {
        let builder = crate::ecmascript::builders::OrdinaryObjectBuilder::for_existing(
            agent,
            realm,
            function_prototype,
        )
        .with_constructor_property(constructor)
        .with_builtin_function_property::<FunctionPrototypeApply>()
        .with_builtin_function_property::<FunctionPrototypeBind>()
        .with_builtin_function_property::<FunctionPrototypeCall>()
        .with_builtin_function_property::<FunctionPrototypeToString>();
        builder.build();
    }
    // @@hasInstance is non-writable and non-configurable.
    let has_instance = crate::ecmascript::builtins::builtin_function::create_builtin_function(
        agent,
        FunctionPrototypeHasInstance::BEHAVIOUR,
        FunctionPrototypeHasInstance::NAME,
        FunctionPrototypeHasInstance::LENGTH,
        "",
    );
    agent[function_prototype].properties.set(
        PropertyKey::Symbol(WellKnownSymbolIndexes::HasInstance.into()),
        Property::data(Value::Object(has_instance), false, false, false),
    );

    let throw_type_error = BuiltinFunctionBuilder::new::<ThrowTypeError>(agent, realm).build();
    agent[throw_type_error].extensible = false;
    agent
        .get_realm_mut(realm)
        .intrinsics
        .set("%ThrowTypeError%", throw_type_error);
}
