// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Source text ownership. A [`SourceCode`] heap entry owns both the source
//! string and the parser's bump allocator; everything parsed out of it
//! (the `Program`, the AST nodes functions keep references to) stays valid
//! until the heap is dropped, which is what makes the `'static` lifetime
//! extension below sound.

use core::ptr::NonNull;

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::{Parser, ParserReturn};
use oxc_semantic::{SemanticBuilder, SemanticBuilderReturn};
use oxc_span::SourceType;

use crate::ecmascript::execution::Agent;
pub use crate::heap::SourceCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCodeType {
    Script,
    StrictScript,
    Module,
}

pub struct SourceCodeHeapData {
    /// The owned source text. AST string references point into this
    /// buffer; its heap allocation is address-stable across moves.
    source: Box<str>,
    /// The arena all AST nodes live in.
    allocator: NonNull<Allocator>,
}

impl core::fmt::Debug for SourceCodeHeapData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SourceCodeHeapData({:?})", &self.source[..self.source.len().min(32)])
    }
}

impl Drop for SourceCodeHeapData {
    fn drop(&mut self) {
        // SAFETY: the allocator was leaked at parse time and this is the
        // only owner; by drop time no AST references remain reachable.
        drop(unsafe { Box::from_raw(self.allocator.as_ptr()) });
    }
}

impl SourceCode {
    /// Parses the given source text and returns the parsed program together
    /// with the heap entry that keeps its backing memory alive.
    ///
    /// ### Program lifetime
    ///
    /// The returned `Program<'static>` borrows from the allocator and the
    /// source buffer owned by the new heap entry. Since heap entries are
    /// never dropped before the agent itself, holding the AST (or any node
    /// pointer into it) for the lifetime of the agent is sound.
    pub fn parse_source(
        agent: &mut Agent,
        source: &str,
        source_type: SourceCodeType,
    ) -> Result<(Program<'static>, SourceCode), Vec<OxcDiagnostic>> {
        let source: Box<str> = source.into();
        // SAFETY: the box's buffer is stable across the later move into the
        // heap vector and outlives every AST reference into it.
        let source_text = unsafe { core::mem::transmute::<&str, &'static str>(&source) };

        let allocator = NonNull::from(Box::leak(Box::default()));
        // SAFETY: Parser borrows the allocator for the duration of this
        // call; the allocator is freed only when the heap entry drops.
        let alloc = unsafe { &*allocator.as_ptr() };
        let oxc_type = match source_type {
            // Strict scripts parse with the script grammar; strictness is
            // applied by the evaluation context so that module-only syntax
            // stays rejected.
            SourceCodeType::Script | SourceCodeType::StrictScript => SourceType::cjs(),
            SourceCodeType::Module => SourceType::mjs(),
        };
        let ParserReturn {
            errors, program, ..
        } = Parser::new(alloc, source_text, oxc_type).parse();

        if !errors.is_empty() {
            // SAFETY: no references into the allocator survive this branch.
            drop(unsafe { Box::from_raw(allocator.as_ptr()) });
            return Err(errors);
        }

        // Early errors (let/let duplicates, assignments to constants in
        // strict code, ...) surface through the semantic checker.
        let SemanticBuilderReturn { errors, .. } = SemanticBuilder::new()
            .with_check_syntax_error(true)
            .build(&program);
        if !errors.is_empty() {
            drop(unsafe { Box::from_raw(allocator.as_ptr()) });
            return Err(errors);
        }

        // SAFETY: see the function doc comment.
        let program = unsafe { core::mem::transmute::<Program, Program<'static>>(program) };
        agent.heap.source_codes.push(SourceCodeHeapData { source, allocator });
        let source_code = SourceCode::last(&agent.heap.source_codes);
        Ok((program, source_code))
    }

    pub fn source_text(self, agent: &Agent) -> &str {
        &agent.heap.source_codes[self.into_index()].source
    }
}

/// Extends a borrow of an AST node (or any value owned by a never-dropped
/// heap entry) to `'static`.
///
/// SAFETY: callers must only pass references whose referent is owned by a
/// [`SourceCodeHeapData`] entry or another arena that lives until agent
/// teardown.
pub(crate) unsafe fn extend_node_lifetime<T: ?Sized>(node: &T) -> &'static T {
    unsafe { core::mem::transmute::<&T, &'static T>(node) }
}
