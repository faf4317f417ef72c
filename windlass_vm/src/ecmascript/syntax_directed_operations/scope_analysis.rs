// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [8.2 Scope Analysis](https://tc39.es/ecma262/#sec-syntax-directed-operations-scope-analysis)
//!
//! The static semantics that drive declaration instantiation:
//! VarDeclaredNames, VarScopedDeclarations, LexicallyDeclaredNames, and
//! LexicallyScopedDeclarations. Var collection descends into every
//! statement but never into nested functions; function declarations are
//! var-scoped only at the top level of a script or function body.

use oxc_ast::ast::{
    BindingIdentifier, Class, ForStatementInit, ForStatementLeft, Function, FunctionBody, Program,
    Statement, VariableDeclarationKind, VariableDeclarator,
};
use oxc_ecmascript::BoundNames;

/// A var-scoped declaration: a `var` declarator or a hoisted function
/// declaration.
#[derive(Debug, Clone, Copy)]
pub enum VarScopedDeclaration {
    Variable(&'static VariableDeclarator<'static>),
    Function(&'static Function<'static>),
}

/// ### [8.2.5 Static Semantics: LexicallyScopedDeclarations](https://tc39.es/ecma262/#sec-static-semantics-lexicallyscopeddeclarations)
#[derive(Debug, Clone, Copy)]
pub enum LexicallyScopedDeclaration {
    Variable(&'static VariableDeclarator<'static>),
    Function(&'static Function<'static>),
    Class(&'static Class<'static>),
}

impl LexicallyScopedDeclaration {
    pub fn bound_names<F: FnMut(&BindingIdentifier<'static>)>(&self, f: &mut F) {
        match self {
            LexicallyScopedDeclaration::Variable(declarator) => declarator.id.bound_names(f),
            LexicallyScopedDeclaration::Function(function) => function.bound_names(f),
            LexicallyScopedDeclaration::Class(class) => class.bound_names(f),
        }
    }

    /// ### [8.2.2 Static Semantics: IsConstantDeclaration](https://tc39.es/ecma262/#sec-static-semantics-isconstantdeclaration)
    pub fn is_constant_declaration(&self) -> bool {
        matches!(
            self,
            LexicallyScopedDeclaration::Variable(declarator)
                if declarator.kind == VariableDeclarationKind::Const
        )
    }
}

/// SAFETY: callers hand in statements borrowed from a `Program<'static>`
/// owned by a never-dropped source-code heap entry.
fn extend<'a, T: ?Sized>(node: &'a T) -> &'static T {
    unsafe { core::mem::transmute::<&'a T, &'static T>(node) }
}

/// The recursive VarScopedDeclarations walk over a statement. `top_level`
/// is true only for the direct statements of a script or function body,
/// where function declarations hoist as vars.
fn var_scoped_declarations_of_statement(
    statement: &Statement<'static>,
    top_level: bool,
    out: &mut Vec<VarScopedDeclaration>,
) {
    match statement {
        Statement::VariableDeclaration(declaration) => {
            if declaration.kind == VariableDeclarationKind::Var {
                for declarator in &declaration.declarations {
                    out.push(VarScopedDeclaration::Variable(extend(declarator)));
                }
            }
        }
        Statement::FunctionDeclaration(function) => {
            if top_level {
                out.push(VarScopedDeclaration::Function(extend(function)));
            }
        }
        Statement::BlockStatement(block) => {
            for statement in &block.body {
                var_scoped_declarations_of_statement(statement, false, out);
            }
        }
        Statement::IfStatement(statement) => {
            var_scoped_declarations_of_statement(&statement.consequent, false, out);
            if let Some(alternate) = &statement.alternate {
                var_scoped_declarations_of_statement(alternate, false, out);
            }
        }
        Statement::DoWhileStatement(statement) => {
            var_scoped_declarations_of_statement(&statement.body, false, out);
        }
        Statement::WhileStatement(statement) => {
            var_scoped_declarations_of_statement(&statement.body, false, out);
        }
        Statement::ForStatement(statement) => {
            if let Some(ForStatementInit::VariableDeclaration(declaration)) = &statement.init {
                if declaration.kind == VariableDeclarationKind::Var {
                    for declarator in &declaration.declarations {
                        out.push(VarScopedDeclaration::Variable(extend(declarator)));
                    }
                }
            }
            var_scoped_declarations_of_statement(&statement.body, false, out);
        }
        Statement::ForInStatement(statement) => {
            if let ForStatementLeft::VariableDeclaration(declaration) = &statement.left {
                if declaration.kind == VariableDeclarationKind::Var {
                    for declarator in &declaration.declarations {
                        out.push(VarScopedDeclaration::Variable(extend(declarator)));
                    }
                }
            }
            var_scoped_declarations_of_statement(&statement.body, false, out);
        }
        Statement::ForOfStatement(statement) => {
            if let ForStatementLeft::VariableDeclaration(declaration) = &statement.left {
                if declaration.kind == VariableDeclarationKind::Var {
                    for declarator in &declaration.declarations {
                        out.push(VarScopedDeclaration::Variable(extend(declarator)));
                    }
                }
            }
            var_scoped_declarations_of_statement(&statement.body, false, out);
        }
        Statement::WithStatement(statement) => {
            var_scoped_declarations_of_statement(&statement.body, false, out);
        }
        Statement::SwitchStatement(statement) => {
            for case in &statement.cases {
                for statement in &case.consequent {
                    var_scoped_declarations_of_statement(statement, false, out);
                }
            }
        }
        Statement::LabeledStatement(statement) => {
            // A labelled function declaration at the top level is still a
            // top-level declaration.
            var_scoped_declarations_of_statement(&statement.body, top_level, out);
        }
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(oxc_ast::ast::Declaration::VariableDeclaration(declaration))
                if declaration.kind == VariableDeclarationKind::Var =>
            {
                for declarator in &declaration.declarations {
                    out.push(VarScopedDeclaration::Variable(extend(declarator)));
                }
            }
            Some(oxc_ast::ast::Declaration::FunctionDeclaration(function)) if top_level => {
                out.push(VarScopedDeclaration::Function(extend(function)));
            }
            _ => {}
        },
        Statement::TryStatement(statement) => {
            for statement in &statement.block.body {
                var_scoped_declarations_of_statement(statement, false, out);
            }
            if let Some(handler) = &statement.handler {
                for statement in &handler.body.body {
                    var_scoped_declarations_of_statement(statement, false, out);
                }
            }
            if let Some(finalizer) = &statement.finalizer {
                for statement in &finalizer.body {
                    var_scoped_declarations_of_statement(statement, false, out);
                }
            }
        }
        _ => {}
    }
}

fn lexically_scoped_declarations_of_statement(
    statement: &Statement<'static>,
    top_level: bool,
    out: &mut Vec<LexicallyScopedDeclaration>,
) {
    match statement {
        Statement::VariableDeclaration(declaration) => {
            if declaration.kind != VariableDeclarationKind::Var {
                for declarator in &declaration.declarations {
                    out.push(LexicallyScopedDeclaration::Variable(extend(declarator)));
                }
            }
        }
        // At the top level of a script or function body, function
        // declarations are var declarations rather than lexical ones.
        Statement::FunctionDeclaration(function) => {
            if !top_level {
                out.push(LexicallyScopedDeclaration::Function(extend(function)));
            }
        }
        Statement::ClassDeclaration(class) => {
            out.push(LexicallyScopedDeclaration::Class(extend(class)));
        }
        Statement::LabeledStatement(statement) => {
            if let Statement::FunctionDeclaration(function) = &statement.body {
                if !top_level {
                    out.push(LexicallyScopedDeclaration::Function(extend(function)));
                }
            }
        }
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(oxc_ast::ast::Declaration::VariableDeclaration(declaration))
                if declaration.kind != VariableDeclarationKind::Var =>
            {
                for declarator in &declaration.declarations {
                    out.push(LexicallyScopedDeclaration::Variable(extend(declarator)));
                }
            }
            Some(oxc_ast::ast::Declaration::ClassDeclaration(class)) => {
                out.push(LexicallyScopedDeclaration::Class(extend(class)));
            }
            Some(oxc_ast::ast::Declaration::FunctionDeclaration(function)) if !top_level => {
                out.push(LexicallyScopedDeclaration::Function(extend(function)));
            }
            _ => {}
        },
        _ => {}
    }
}

/// The lexically scoped declarations of one statement list (a block, a
/// switch case block, or a caught block's body).
pub fn statements_lexically_scoped_declarations(
    statements: &[Statement<'static>],
) -> Vec<LexicallyScopedDeclaration> {
    let mut declarations = Vec::new();
    for statement in statements {
        lexically_scoped_declarations_of_statement(statement, false, &mut declarations);
    }
    declarations
}

/// ### [8.2.4 Static Semantics: LexicallyDeclaredNames](https://tc39.es/ecma262/#sec-static-semantics-lexicallydeclarednames)
/// applied to a function body's top level.
pub fn function_body_lexically_scoped_declarations(
    body: &FunctionBody<'static>,
) -> Vec<LexicallyScopedDeclaration> {
    let mut declarations = Vec::new();
    for statement in &body.statements {
        lexically_scoped_declarations_of_statement(statement, true, &mut declarations);
    }
    declarations
}

/// ### [8.2.6 Static Semantics: VarDeclaredNames](https://tc39.es/ecma262/#sec-static-semantics-vardeclarednames)
pub fn function_body_var_declared_names(body: &FunctionBody<'static>) -> Vec<&'static str> {
    let declarations = function_body_var_scoped_declarations(body);
    var_declared_names_of(&declarations)
}

/// ### [8.2.7 Static Semantics: VarScopedDeclarations](https://tc39.es/ecma262/#sec-static-semantics-varscopeddeclarations)
pub fn function_body_var_scoped_declarations(
    body: &FunctionBody<'static>,
) -> Vec<VarScopedDeclaration> {
    let mut declarations = Vec::new();
    for statement in &body.statements {
        var_scoped_declarations_of_statement(statement, true, &mut declarations);
    }
    declarations
}

pub fn script_lexically_scoped_declarations(
    program: &Program<'static>,
) -> Vec<LexicallyScopedDeclaration> {
    let mut declarations = Vec::new();
    for statement in &program.body {
        lexically_scoped_declarations_of_statement(statement, true, &mut declarations);
    }
    declarations
}

pub fn script_var_scoped_declarations(program: &Program<'static>) -> Vec<VarScopedDeclaration> {
    let mut declarations = Vec::new();
    for statement in &program.body {
        var_scoped_declarations_of_statement(statement, true, &mut declarations);
    }
    declarations
}

pub fn script_var_declared_names(program: &Program<'static>) -> Vec<&'static str> {
    let declarations = script_var_scoped_declarations(program);
    var_declared_names_of(&declarations)
}

fn var_declared_names_of(declarations: &[VarScopedDeclaration]) -> Vec<&'static str> {
    let mut names = Vec::new();
    for declaration in declarations {
        match declaration {
            VarScopedDeclaration::Variable(declarator) => {
                declarator.id.bound_names(&mut |identifier| {
                    names.push(extend(identifier.name.as_str()));
                });
            }
            VarScopedDeclaration::Function(function) => {
                if let Some(id) = &function.id {
                    names.push(extend(id.name.as_str()));
                }
            }
        }
    }
    names
}

/// Keeps a statement-level walker handy for `var` name collection inside
/// one nested statement (loop bodies hoisting through block scopes).
pub fn statement_var_scoped_declarations(
    statement: &Statement<'static>,
) -> Vec<VarScopedDeclaration> {
    let mut declarations = Vec::new();
    var_scoped_declarations_of_statement(statement, false, &mut declarations);
    declarations
}
