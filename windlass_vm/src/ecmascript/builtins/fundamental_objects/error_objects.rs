// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.5 Error Objects](https://tc39.es/ecma262/#sec-error-objects)

use crate::ecmascript::abstract_operations::operations_on_objects::get;
use crate::ecmascript::abstract_operations::type_conversion::to_string;
use crate::ecmascript::builders::{BuiltinFunctionBuilder, OrdinaryObjectBuilder};
use crate::ecmascript::builtins::builtin_function::{Behaviour, Builtin};
use crate::ecmascript::builtins::error::{capture_error_stack, ErrorData};
use crate::ecmascript::builtins::ordinary::get_prototype_from_constructor;
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{
    Agent, ExceptionType, JsResult, ProtoIntrinsics, RealmIdentifier,
};
use crate::ecmascript::types::{
    Object, ObjectHeapData, ObjectKind, Property, PropertyKey, Value,
};

/// ### [20.5.1.1 Error ( message \[ , options \] )](https://tc39.es/ecma262/#sec-error-message)
///
/// Shared by `Error` and the native error kinds; `new.target` drives the
/// prototype so subclassing works.
pub(crate) fn error_constructor_base(
    agent: &mut Agent,
    kind: ExceptionType,
    arguments: ArgumentsList,
    new_target: Option<Object>,
) -> JsResult<Value> {
    let intrinsic = match kind {
        ExceptionType::Error => ProtoIntrinsics::Error,
        ExceptionType::AggregateError => ProtoIntrinsics::AggregateError,
        ExceptionType::EvalError => ProtoIntrinsics::EvalError,
        ExceptionType::RangeError => ProtoIntrinsics::RangeError,
        ExceptionType::ReferenceError => ProtoIntrinsics::ReferenceError,
        ExceptionType::SyntaxError => ProtoIntrinsics::SyntaxError,
        ExceptionType::TypeError => ProtoIntrinsics::TypeError,
        ExceptionType::UriError => ProtoIntrinsics::UriError,
    };
    // 1. If NewTarget is undefined, let newTarget be the active function
    //    object.
    let new_target = new_target
        .or_else(|| agent.active_function_object())
        .expect("error constructors always run with an active function");
    // 2. Let O be ? OrdinaryCreateFromConstructor(newTarget,
    //    "%NativeError.prototype%", « [[ErrorData]] »).
    let prototype = get_prototype_from_constructor(agent, new_target, intrinsic)?;
    let error = agent.heap.create_object(ObjectHeapData::new(
        Some(prototype),
        ObjectKind::Error(ErrorData { kind }),
    ));
    // 3. If message is not undefined, define the non-enumerable message
    //    property.
    let message = arguments.get(0);
    if !message.is_undefined() {
        let message = to_string(agent, message)?;
        let message_key = PropertyKey::from_str(agent, "message");
        agent[error].properties.set(
            message_key,
            Property::data(Value::String(message), true, false, true),
        );
    }
    // 4. Perform ? InstallErrorCause(O, options).
    if let Value::Object(options) = arguments.get(1) {
        let cause_key = PropertyKey::from_str(agent, "cause");
        if crate::ecmascript::abstract_operations::operations_on_objects::has_property(
            agent, options, cause_key,
        )? {
            let cause = get(agent, options, cause_key)?;
            agent[error]
                .properties
                .set(cause_key, Property::data(cause, true, false, true));
        }
    }
    // The non-standard stack property is captured at construction.
    capture_error_stack(agent, error, kind);
    // 5. Return O.
    Ok(Value::Object(error))
}

pub(crate) struct ErrorConstructor;
impl Builtin for ErrorConstructor {
    const NAME: &'static str = "Error";
    const LENGTH: u8 = 1;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(Self::constructor);
}
impl ErrorConstructor {
    fn constructor(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        error_constructor_base(agent, ExceptionType::Error, arguments, new_target)
    }
}

macro_rules! native_error_constructor {
    ($name: ident, $text: literal, $kind: expr) => {
        pub(crate) struct $name;
        impl Builtin for $name {
            const NAME: &'static str = $text;
            const LENGTH: u8 = 1;
            const BEHAVIOUR: Behaviour = Behaviour::Constructor(Self::constructor);
        }
        impl $name {
            fn constructor(
                agent: &mut Agent,
                _this_value: Value,
                arguments: ArgumentsList,
                new_target: Option<Object>,
            ) -> JsResult<Value> {
                error_constructor_base(agent, $kind, arguments, new_target)
            }
        }
    };
}

native_error_constructor!(EvalErrorConstructor, "EvalError", ExceptionType::EvalError);
native_error_constructor!(RangeErrorConstructor, "RangeError", ExceptionType::RangeError);
native_error_constructor!(
    ReferenceErrorConstructor,
    "ReferenceError",
    ExceptionType::ReferenceError
);
native_error_constructor!(
    SyntaxErrorConstructor,
    "SyntaxError",
    ExceptionType::SyntaxError
);
native_error_constructor!(TypeErrorConstructor, "TypeError", ExceptionType::TypeError);
native_error_constructor!(UriErrorConstructor, "URIError", ExceptionType::UriError);

pub(crate) struct AggregateErrorConstructor;
impl Builtin for AggregateErrorConstructor {
    const NAME: &'static str = "AggregateError";
    const LENGTH: u8 = 2;
    const BEHAVIOUR: Behaviour = Behaviour::Constructor(Self::constructor);
}
impl AggregateErrorConstructor {
    /// ### [20.5.7.1.1 AggregateError ( errors, message \[ , options \] )](https://tc39.es/ecma262/#sec-aggregate-error)
    fn constructor(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
        new_target: Option<Object>,
    ) -> JsResult<Value> {
        let message_and_options = [arguments.get(1), arguments.get(2)];
        let error = error_constructor_base(
            agent,
            ExceptionType::AggregateError,
            ArgumentsList(&message_and_options),
            new_target,
        )?;
        let Value::Object(error_object) = error else {
            unreachable!()
        };
        // 5. Let errorsList be ? IteratorToList(? GetIterator(errors)).
        let errors =
            crate::ecmascript::abstract_operations::operations_on_iterator_objects::iterable_to_list(
                agent,
                arguments.get(0),
            )?;
        let errors_array =
            crate::ecmascript::abstract_operations::operations_on_objects::create_array_from_list(
                agent, &errors,
            );
        let errors_key = PropertyKey::from_str(agent, "errors");
        agent[error_object].properties.set(
            errors_key,
            Property::data(Value::Object(errors_array), true, false, true),
        );
        Ok(error)
    }
}

pub(crate) struct ErrorPrototype;

struct ErrorPrototypeToString;
impl Builtin for ErrorPrototypeToString {
    const NAME: &'static str = "toString";
    const LENGTH: u8 = 0;
    const BEHAVIOUR: Behaviour = Behaviour::Regular(ErrorPrototype::to_string);
}

impl ErrorPrototype {
    /// ### [20.5.3.4 Error.prototype.toString ( )](https://tc39.es/ecma262/#sec-error.prototype.tostring)
    fn to_string(agent: &mut Agent, this_value: Value, _: ArgumentsList) -> JsResult<Value> {
        // 1./2. The receiver must be an Object.
        let Value::Object(object) = this_value else {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Error.prototype.toString called on a non-object",
            ));
        };
        // 3. Let name be ? Get(O, "name"), defaulting to "Error".
        let name_key = PropertyKey::from_str(agent, "name");
        let name = get(agent, object, name_key)?;
        let name = if name.is_undefined() {
            "Error".to_owned()
        } else {
            to_string(agent, name)?.as_str(agent).to_owned()
        };
        // 5. Let msg be ? Get(O, "message"), defaulting to "".
        let message_key = PropertyKey::from_str(agent, "message");
        let message = get(agent, object, message_key)?;
        let message = if message.is_undefined() {
            std::string::String::new()
        } else {
            to_string(agent, message)?.as_str(agent).to_owned()
        };
        // 7.-9. Join with ": " when both parts are non-empty.
        let text = if name.is_empty() {
            message
        } else if message.is_empty() {
            name
        } else {
            format!("{name}: {message}")
        };
        Ok(Value::from_string(agent, text))
    }
}

fn create_error_prototype(
    agent: &mut Agent,
    realm: RealmIdentifier,
    intrinsic_name: &'static str,
    name: &str,
    parent: Object,
    with_to_string: bool,
) -> Object {
    let name_value = Value::from_str(agent, name);
    let empty_message = Value::from_str(agent, "");
    let builder =
        OrdinaryObjectBuilder::new_intrinsic_object(agent, realm, intrinsic_name, Some(parent))
            .with_str_property("name", name_value)
            .with_str_property("message", empty_message);
    let builder = if with_to_string {
        builder.with_builtin_function_property::<ErrorPrototypeToString>()
    } else {
        builder
    };
    builder.build()
}

/// Creates `%Error%`, the six native error kinds, `%AggregateError%`, and
/// their prototype chains.
pub(crate) fn create_error_intrinsics(agent: &mut Agent, realm: RealmIdentifier) {
    let object_prototype = agent.get_realm(realm).intrinsics.object_prototype();
    let error_prototype = create_error_prototype(
        agent,
        realm,
        "%Error.prototype%",
        "Error",
        object_prototype,
        true,
    );
    let error_constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<ErrorConstructor>(
        agent, realm, "%Error%",
    )
    .with_prototype_property(error_prototype)
    .build();
    OrdinaryObjectBuilder::for_existing(agent, realm, error_prototype)
        .with_constructor_property(error_constructor)
        .build();

    macro_rules! native_error {
        ($constructor: ty, $proto_name: literal, $ctor_name: literal, $display: literal) => {{
            let prototype = create_error_prototype(
                agent,
                realm,
                $proto_name,
                $display,
                error_prototype,
                false,
            );
            // 20.5.6.2: native error constructors inherit from %Error%.
            let constructor = BuiltinFunctionBuilder::new_intrinsic_constructor::<$constructor>(
                agent, realm, $ctor_name,
            )
            .with_prototype_property(prototype)
            .build();
            agent[constructor].prototype = Some(error_constructor);
            OrdinaryObjectBuilder::for_existing(agent, realm, prototype)
                .with_constructor_property(constructor)
                .build();
        }};
    }

    native_error!(EvalErrorConstructor, "%EvalError.prototype%", "%EvalError%", "EvalError");
    native_error!(RangeErrorConstructor, "%RangeError.prototype%", "%RangeError%", "RangeError");
    native_error!(
        ReferenceErrorConstructor,
        "%ReferenceError.prototype%",
        "%ReferenceError%",
        "ReferenceError"
    );
    native_error!(
        SyntaxErrorConstructor,
        "%SyntaxError.prototype%",
        "%SyntaxError%",
        "SyntaxError"
    );
    native_error!(TypeErrorConstructor, "%TypeError.prototype%", "%TypeError%", "TypeError");
    native_error!(UriErrorConstructor, "%URIError.prototype%", "%URIError%", "URIError");
    native_error!(
        AggregateErrorConstructor,
        "%AggregateError.prototype%",
        "%AggregateError%",
        "AggregateError"
    );
}
