// AST container library for the HDL compiler.
//
// The parser and binder upstream produce this tree; lowering passes rewrite
// it in place of the source constructs. Node ownership is strictly by value:
// every node has exactly one owner, and cross-references (variable uses,
// jump targets) go through `Identifier` and `LabelId` handles instead of
// pointers.

use shared_context::{Identifier, Span};

pub mod expressions;
pub mod print_ast;
pub mod statements;
pub mod verify;

use statements::Stmt;

/// Root container of all modules.
#[derive(Debug, Clone)]
pub struct Netlist {
    modules: Vec<Module>,
}

impl Netlist {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    pub fn into_parts(self) -> Vec<Module> {
        self.modules
    }

    pub fn get_modules_ref(&self) -> &[Module] {
        &self.modules
    }
}

/// A module scope. `dead` modules were disconnected by elaboration and are
/// skipped by every pass; `parameterized` modules keep loop-related
/// warnings quiet because parameter values may zero a loop legitimately.
#[derive(Debug, Clone)]
pub struct Module {
    name: Identifier,
    dead: bool,
    parameterized: bool,
    items: Vec<ModuleItem>,
    span: Span,
}

impl Module {
    pub fn new(
        name: Identifier,
        dead: bool,
        parameterized: bool,
        items: Vec<ModuleItem>,
        span: Span,
    ) -> Self {
        Self {
            name,
            dead,
            parameterized,
            items,
            span,
        }
    }

    pub fn into_parts(self) -> (Identifier, bool, bool, Vec<ModuleItem>, Span) {
        (
            self.name,
            self.dead,
            self.parameterized,
            self.items,
            self.span,
        )
    }

    pub fn get_name(&self) -> Identifier {
        self.name
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_parameterized(&self) -> bool {
        self.parameterized
    }

    pub fn get_items_ref(&self) -> &[ModuleItem] {
        &self.items
    }

    pub fn get_span(&self) -> Span {
        self.span
    }
}

/// Top-level contents of a module.
#[derive(Debug, Clone)]
pub enum ModuleItem {
    Ftask(FunctionOrTask),
    Process(Process),
}

/// Distinguishes functions (value-returning, with a result variable bound
/// by the binder) from tasks.
#[derive(Debug, Clone, Copy)]
pub enum FtaskKind {
    Function {
        result: Identifier,
        is_constructor: bool,
    },
    Task,
}

/// A function or task definition with its statement body.
#[derive(Debug, Clone)]
pub struct FunctionOrTask {
    name: Identifier,
    kind: FtaskKind,
    stmts: Vec<Stmt>,
    span: Span,
}

impl FunctionOrTask {
    pub fn new(name: Identifier, kind: FtaskKind, stmts: Vec<Stmt>, span: Span) -> Self {
        Self {
            name,
            kind,
            stmts,
            span,
        }
    }

    pub fn into_parts(self) -> (Identifier, FtaskKind, Vec<Stmt>, Span) {
        (self.name, self.kind, self.stmts, self.span)
    }

    pub fn get_name(&self) -> Identifier {
        self.name
    }

    pub fn get_kind(&self) -> FtaskKind {
        self.kind
    }

    pub fn get_stmts_ref(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn get_span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessKind {
    Initial,
    Always,
    Final,
}

/// A procedural block at module level. Statement sequences occur here as
/// well as in functions and tasks, but a process is never a jump anchor.
#[derive(Debug, Clone)]
pub struct Process {
    kind: ProcessKind,
    stmts: Vec<Stmt>,
    span: Span,
}

impl Process {
    pub fn new(kind: ProcessKind, stmts: Vec<Stmt>, span: Span) -> Self {
        Self { kind, stmts, span }
    }

    pub fn into_parts(self) -> (ProcessKind, Vec<Stmt>, Span) {
        (self.kind, self.stmts, self.span)
    }

    pub fn get_kind(&self) -> ProcessKind {
        self.kind
    }

    pub fn get_stmts_ref(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn get_span(&self) -> Span {
        self.span
    }
}
