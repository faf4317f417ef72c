// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [15.7 Class Definitions](https://tc39.es/ecma262/#sec-class-definitions)

use core::ptr::NonNull;

use oxc_ast::ast;
use oxc_span::GetSpan;

use crate::ecmascript::abstract_operations::operations_on_objects::get;
use crate::ecmascript::abstract_operations::type_conversion::to_property_key;
use crate::ecmascript::builtins::ecmascript_function::{
    function_data_mut, make_method, ordinary_function_create, set_function_name,
    ClassFieldRecord, ConstructorStatus, OrdinaryFunctionCreateParams,
};
use crate::ecmascript::builtins::ordinary::ordinary_object_create;
use crate::ecmascript::execution::{
    new_declarative_environment, Agent, EnvironmentIndex, ExceptionType, JsResult,
};
use crate::ecmascript::scripts_and_modules::source_code::{extend_node_lifetime, SourceCode, SourceCodeType};
use crate::ecmascript::types::{
    HeapString, Object, Property, PropertyDescriptor, PropertyKey, PropertyValue, Value,
};
use crate::engine::evaluate_expression_native;

/// ### [15.7.14 Runtime Semantics: ClassDefinitionEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-classdefinitionevaluation)
pub(crate) fn class_definition_evaluation(
    agent: &mut Agent,
    class: &'static ast::Class<'static>,
    name: Option<PropertyKey>,
) -> JsResult<Object> {
    let class_binding_name = class
        .id
        .as_ref()
        .map(|id| HeapString::from_str(agent, id.name.as_str()));
    let name = match (name, class_binding_name) {
        (Some(name), _) => name,
        (None, Some(binding)) => PropertyKey::String(binding),
        (None, None) => PropertyKey::from_str(agent, ""),
    };

    // 2./3. Let classEnv be NewDeclarativeEnvironment(env); bind the class
    //    name immutably for the duration of the definition.
    let outer_env = agent.current_lexical_environment();
    let outer_strict = agent.in_strict_mode();
    let class_env =
        EnvironmentIndex::Declarative(new_declarative_environment(agent, Some(outer_env)));
    if let Some(binding) = class_binding_name {
        class_env.create_immutable_binding(agent, binding, true)?;
    }

    // Class definitions are always strict mode code.
    agent.set_current_lexical_environment(class_env);
    agent
        .running_execution_context_mut()
        .ecmascript_code
        .as_mut()
        .unwrap()
        .is_strict_mode = true;

    let result = class_definition_evaluation_inner(agent, class, name, class_env);

    // Restore the surrounding evaluation state whatever happened.
    agent.set_current_lexical_environment(outer_env);
    agent
        .running_execution_context_mut()
        .ecmascript_code
        .as_mut()
        .unwrap()
        .is_strict_mode = outer_strict;

    let class_constructor = result?;
    // 27. If classBinding is not undefined, initialize it to F.
    if let Some(binding) = class_binding_name {
        class_env.initialize_binding(agent, binding, Value::Object(class_constructor))?;
    }
    Ok(class_constructor)
}

fn class_definition_evaluation_inner(
    agent: &mut Agent,
    class: &'static ast::Class<'static>,
    name: PropertyKey,
    class_env: EnvironmentIndex,
) -> JsResult<Object> {
    // 5.-7. Resolve the heritage into protoParent and constructorParent.
    let (proto_parent, constructor_parent, is_derived) = match &class.super_class {
        None => (
            Some(agent.current_realm().intrinsics.object_prototype()),
            agent.current_realm().intrinsics.function_prototype(),
            false,
        ),
        Some(heritage) => {
            let superclass = evaluate_expression_native(agent, heritage)?;
            match superclass {
                Value::Null => (
                    None,
                    agent.current_realm().intrinsics.function_prototype(),
                    true,
                ),
                Value::Object(superclass) if superclass.is_constructor(agent) => {
                    // d.ii. Let protoParent be ? Get(superclass,
                    //       "prototype"); it must be an Object or null.
                    let prototype_key = PropertyKey::from_str(agent, "prototype");
                    let proto_parent = get(agent, superclass, prototype_key)?;
                    let proto_parent = match proto_parent {
                        Value::Object(proto) => Some(proto),
                        Value::Null => None,
                        _ => {
                            return Err(agent.throw_exception_with_static_message(
                                ExceptionType::TypeError,
                                "Class extends value does not have valid prototype property",
                            ));
                        }
                    };
                    (proto_parent, superclass, true)
                }
                _ => {
                    return Err(agent.throw_exception_with_static_message(
                        ExceptionType::TypeError,
                        "Class extends value is not a constructor",
                    ));
                }
            }
        }
    };

    // 8. Let proto be OrdinaryObjectCreate(protoParent).
    let proto = ordinary_object_create(agent, proto_parent);

    // 10./11. Find the constructor method.
    let constructor_method = class.body.body.iter().find_map(|element| match element {
        ast::ClassElement::MethodDefinition(method)
            if method.kind == ast::MethodDefinitionKind::Constructor =>
        {
            Some(&method.value)
        }
        _ => None,
    });

    // 14. Create the constructor function.
    let class_constructor = match constructor_method {
        Some(method) => {
            let source_code = agent
                .running_execution_context()
                .ecmascript_code
                .as_ref()
                .unwrap()
                .source_code;
            let params = OrdinaryFunctionCreateParams {
                function_prototype: Some(constructor_parent),
                source_code,
                source_text: class.span,
                parameters_list: unsafe { extend_node_lifetime(&method.params) },
                body: unsafe { extend_node_lifetime(method.body.as_deref().unwrap()) },
                is_concise_arrow_function: false,
                is_async: false,
                is_generator: false,
                lexical_this: false,
                env: class_env,
                private_env: None,
            };
            ordinary_function_create(agent, params)
        }
        None => default_class_constructor(agent, class_env, constructor_parent, is_derived)?,
    };

    // 15./16. MakeConstructor with a non-writable prototype; wire the
    //    constructor kind and home object.
    set_function_name(agent, class_constructor, name, None);
    {
        let data = function_data_mut(agent, class_constructor);
        data.constructor_status = if is_derived {
            ConstructorStatus::DerivedClass
        } else {
            ConstructorStatus::BaseClass
        };
        data.home_object = Some(proto);
    }
    let prototype_key = PropertyKey::from_str(agent, "prototype");
    agent[class_constructor].properties.set(
        prototype_key,
        Property::data(Value::Object(proto), false, false, false),
    );
    // 17. Perform CreateMethodProperty(proto, "constructor", F).
    let constructor_key = PropertyKey::from_str(agent, "constructor");
    agent[proto].properties.set(
        constructor_key,
        Property::data(Value::Object(class_constructor), true, false, true),
    );

    // 25. Evaluate the remaining class elements.
    let mut instance_fields: Vec<ClassFieldRecord> = Vec::new();
    for element in &class.body.body {
        match element {
            ast::ClassElement::MethodDefinition(method) => {
                if method.kind == ast::MethodDefinitionKind::Constructor {
                    continue;
                }
                let home = if method.r#static { class_constructor } else { proto };
                class_method_definition_evaluation(agent, method, home, class_env)?;
            }
            ast::ClassElement::PropertyDefinition(field) => {
                let key = class_element_key(agent, &field.key, field.computed)?;
                let initializer = field
                    .value
                    .as_ref()
                    .map(|expression| NonNull::from(unsafe { extend_node_lifetime(expression) }));
                if field.r#static {
                    // Static fields are evaluated now with the constructor
                    // as `this`.
                    let value = match &field.value {
                        None => Value::Undefined,
                        Some(expression) => crate::engine::evaluate_expression_with_this(
                            agent,
                            class_constructor,
                            Value::Object(class_constructor),
                            unsafe { extend_node_lifetime(expression) },
                        )?,
                    };
                    crate::ecmascript::abstract_operations::operations_on_objects::define_property_or_throw(
                        agent,
                        class_constructor,
                        key,
                        PropertyDescriptor::new_data_descriptor(value),
                    )?;
                } else {
                    instance_fields.push(ClassFieldRecord { key, initializer });
                }
            }
            ast::ClassElement::StaticBlock(block) => {
                crate::engine::run_class_static_block(
                    agent,
                    class_constructor,
                    unsafe { extend_node_lifetime(&block.body) },
                )?;
            }
            ast::ClassElement::AccessorProperty(_) | ast::ClassElement::TSIndexSignature(_) => {
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::SyntaxError,
                    "Unsupported class element",
                ));
            }
        }
    }
    function_data_mut(agent, class_constructor).fields = instance_fields;

    Ok(class_constructor)
}

/// ### [15.7.10 Runtime Semantics: ClassElementEvaluation](https://tc39.es/ecma262/#sec-static-semantics-classelementevaluation)
/// for method, getter, and setter definitions.
fn class_method_definition_evaluation(
    agent: &mut Agent,
    method: &'static ast::MethodDefinition<'static>,
    home: Object,
    class_env: EnvironmentIndex,
) -> JsResult<()> {
    let key = class_element_key(agent, &method.key, method.computed)?;
    let function = &method.value;
    let source_code = agent
        .running_execution_context()
        .ecmascript_code
        .as_ref()
        .unwrap()
        .source_code;
    let params = OrdinaryFunctionCreateParams {
        function_prototype: None,
        source_code,
        source_text: function.span(),
        parameters_list: unsafe { extend_node_lifetime(&function.params) },
        body: unsafe { extend_node_lifetime(function.body.as_deref().unwrap()) },
        is_concise_arrow_function: false,
        is_async: function.r#async,
        is_generator: function.generator,
        lexical_this: false,
        env: class_env,
        private_env: None,
    };
    let closure = ordinary_function_create(agent, params);
    make_method(agent, closure, home);
    match method.kind {
        ast::MethodDefinitionKind::Method => {
            set_function_name(agent, closure, key, None);
            agent[home].properties.set(
                key,
                Property::data(Value::Object(closure), true, false, true),
            );
        }
        ast::MethodDefinitionKind::Get => {
            set_function_name(agent, closure, key, Some("get"));
            let set = existing_setter(agent, home, key);
            agent[home].properties.set(
                key,
                Property {
                    enumerable: false,
                    configurable: true,
                    value: PropertyValue::Accessor {
                        get: Some(closure),
                        set,
                    },
                },
            );
        }
        ast::MethodDefinitionKind::Set => {
            set_function_name(agent, closure, key, Some("set"));
            let get = existing_getter(agent, home, key);
            agent[home].properties.set(
                key,
                Property {
                    enumerable: false,
                    configurable: true,
                    value: PropertyValue::Accessor {
                        get,
                        set: Some(closure),
                    },
                },
            );
        }
        ast::MethodDefinitionKind::Constructor => unreachable!(),
    }
    Ok(())
}

fn existing_getter(agent: &Agent, object: Object, key: PropertyKey) -> Option<Object> {
    match agent[object].properties.get(key) {
        Some(Property {
            value: PropertyValue::Accessor { get, .. },
            ..
        }) => *get,
        _ => None,
    }
}

fn existing_setter(agent: &Agent, object: Object, key: PropertyKey) -> Option<Object> {
    match agent[object].properties.get(key) {
        Some(Property {
            value: PropertyValue::Accessor { set, .. },
            ..
        }) => *set,
        _ => None,
    }
}

/// Evaluates a class element name into a property key; computed keys run
/// arbitrary code in the class environment.
fn class_element_key(
    agent: &mut Agent,
    key: &'static ast::PropertyKey<'static>,
    computed: bool,
) -> JsResult<PropertyKey> {
    if computed {
        let expression = key
            .as_expression()
            .expect("computed keys are always expressions");
        let value = evaluate_expression_native(agent, expression)?;
        return to_property_key(agent, value);
    }
    match key {
        ast::PropertyKey::StaticIdentifier(identifier) => {
            Ok(PropertyKey::from_str(agent, identifier.name.as_str()))
        }
        ast::PropertyKey::StringLiteral(literal) => {
            Ok(PropertyKey::from_str(agent, literal.value.as_str()))
        }
        ast::PropertyKey::NumericLiteral(literal) => {
            let string = crate::ecmascript::types::number_to_string(literal.value);
            Ok(PropertyKey::from_str(agent, &string))
        }
        ast::PropertyKey::PrivateIdentifier(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::SyntaxError,
            "Private class members are not supported",
        )),
        _ => unreachable!("non-computed class keys are identifiers or literals"),
    }
}

/// Synthesizes the default constructor by parsing a tiny class of the
/// right shape and lifting out its constructor method; the parsed source
/// is kept alive in the heap like any other.
fn default_class_constructor(
    agent: &mut Agent,
    class_env: EnvironmentIndex,
    constructor_parent: Object,
    is_derived: bool,
) -> JsResult<Object> {
    let source = if is_derived {
        "class __default { constructor(...args) { super(...args); } }"
    } else {
        "class __default { constructor() {} }"
    };
    let Ok((program, source_code)) =
        SourceCode::parse_source(agent, source, SourceCodeType::Script)
    else {
        unreachable!("the synthetic default constructor always parses")
    };
    // Lift the constructor method out of the synthetic class.
    let program: &'static ast::Program<'static> =
        Box::leak(Box::new(program));
    let ast::Statement::ClassDeclaration(class) = &program.body[0] else {
        unreachable!()
    };
    let method = class
        .body
        .body
        .iter()
        .find_map(|element| match element {
            ast::ClassElement::MethodDefinition(method) => Some(&method.value),
            _ => None,
        })
        .unwrap();
    let params = OrdinaryFunctionCreateParams {
        function_prototype: Some(constructor_parent),
        source_code,
        source_text: class.span,
        parameters_list: unsafe { extend_node_lifetime(&method.params) },
        body: unsafe { extend_node_lifetime(method.body.as_deref().unwrap()) },
        is_concise_arrow_function: false,
        is_async: false,
        is_generator: false,
        lexical_this: false,
        env: class_env,
        private_env: None,
    };
    Ok(ordinary_function_create(agent, params))
}
