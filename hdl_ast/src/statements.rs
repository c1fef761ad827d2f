use crate::expressions::Expression;
use shared_context::symbol_table::{Lifetime, Type};
use shared_context::{Identifier, Span};
use std::collections::HashMap;

/// Handle of a jump label. A label id is *defined* by exactly one
/// `JumpBlock`, whose final statement is the matching `JumpLabel`; any
/// number of `JumpGo` statements may target it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(usize);

impl LabelId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Unroll directive recorded on a loop for the unroller downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnrollMode {
    Full,
    Disable,
}

/// Source-level pragma statements. The unroll pair is consumed by the
/// control-flow lowering pass; the rest travel through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PragmaKind {
    UnrollFull,
    UnrollDisable,
    InlineModule,
    PublicModule,
}

/// A variable declaration node. Flags such as `used_loop_idx` live in the
/// symbol table under the same identifier, not on the node.
#[derive(Debug, Clone, Copy)]
pub struct Var {
    name: Identifier,
    var_type: Type,
    lifetime: Lifetime,
    span: Span,
}

impl Var {
    pub fn new(name: Identifier, var_type: Type, lifetime: Lifetime, span: Span) -> Self {
        Self {
            name,
            var_type,
            lifetime,
            span,
        }
    }

    pub fn get_name(&self) -> Identifier {
        self.name
    }

    pub fn get_type(&self) -> Type {
        self.var_type
    }

    pub fn get_lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn get_span(&self) -> Span {
        self.span
    }
}

/// A statement with its source location.
#[derive(Debug, Clone)]
pub struct Stmt {
    kind: StmtKind,
    span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn into_parts(self) -> (StmtKind, Span) {
        (self.kind, self.span)
    }

    pub fn get_kind_ref(&self) -> &StmtKind {
        &self.kind
    }

    pub fn get_span(&self) -> Span {
        self.span
    }

    /// True for variable declarations; the lowering pass keeps these
    /// visible in their original scope when it wraps statement lists.
    pub fn is_var_decl(&self) -> bool {
        matches!(self.kind, StmtKind::VarDecl(_))
    }
}

/// Statements in the language, including the lowered jump triple.
#[derive(Debug, Clone)]
pub enum StmtKind {
    VarDecl(Var),
    Assign {
        lhs: Expression,
        rhs: Expression,
    },
    ExprStmt(Expression),
    If {
        cond: Expression,
        thens: Vec<Stmt>,
        elses: Vec<Stmt>,
    },
    /// Sequential block, optionally named. `contains_fork` is maintained
    /// by the lowering pass for `disable` legality checks.
    Begin {
        name: Option<Identifier>,
        contains_fork: bool,
        stmts: Vec<Stmt>,
    },
    /// Parallel block.
    Fork {
        name: Option<Identifier>,
        contains_fork: bool,
        stmts: Vec<Stmt>,
    },
    While {
        preconds: Vec<Stmt>,
        cond: Expression,
        body: Vec<Stmt>,
        incs: Vec<Stmt>,
        unroll: Option<UnrollMode>,
        suppress_unused: bool,
    },
    DoWhile {
        cond: Expression,
        body: Vec<Stmt>,
    },
    Repeat {
        count: Expression,
        body: Vec<Stmt>,
    },
    Foreach {
        array: Expression,
        body: Vec<Stmt>,
    },
    Return {
        value: Option<Expression>,
    },
    Break,
    Continue,
    Disable {
        target: Identifier,
    },
    Pragma(PragmaKind),
    /// Container whose final statement is the `JumpLabel` for `label`.
    JumpBlock {
        label: LabelId,
        stmts: Vec<Stmt>,
    },
    JumpLabel(LabelId),
    JumpGo(LabelId),
}

/// Deep-copies a statement list, giving every label *defined inside the
/// copied region* a fresh id from `next_label` and retargeting the copied
/// `JumpGo`/`JumpLabel` uses accordingly. Labels defined outside the region
/// keep their ids, so jumps out of the copy still land on the original
/// label. Counterpart of the owner-aware tree clone of the node library.
pub fn clone_stmts_with_fresh_labels(
    stmts: &[Stmt],
    next_label: &mut dyn FnMut() -> LabelId,
) -> Vec<Stmt> {
    let mut remap = HashMap::new();
    for stmt in stmts {
        collect_defined_labels(stmt, &mut |label| {
            remap.entry(label).or_insert_with(&mut *next_label);
        });
    }

    let mut copy = stmts.to_vec();
    for stmt in &mut copy {
        remap_labels(stmt, &remap);
    }
    copy
}

fn collect_defined_labels(stmt: &Stmt, found: &mut impl FnMut(LabelId)) {
    match stmt.get_kind_ref() {
        StmtKind::JumpBlock { label, stmts } => {
            found(*label);
            for inner in stmts {
                collect_defined_labels(inner, found);
            }
        }
        kind => {
            for list in child_lists(kind) {
                for inner in list {
                    collect_defined_labels(inner, found);
                }
            }
        }
    }
}

fn remap_labels(stmt: &mut Stmt, remap: &HashMap<LabelId, LabelId>) {
    match &mut stmt.kind {
        StmtKind::JumpBlock { label, stmts } => {
            if let Some(fresh) = remap.get(label) {
                *label = *fresh;
            }
            for inner in stmts {
                remap_labels(inner, remap);
            }
        }
        StmtKind::JumpLabel(label) | StmtKind::JumpGo(label) => {
            if let Some(fresh) = remap.get(label) {
                *label = *fresh;
            }
        }
        kind => {
            for list in child_lists_mut(kind) {
                for inner in list {
                    remap_labels(inner, remap);
                }
            }
        }
    }
}

/// Renames every named `Begin` in the subtree through `rename`.
/// Used when a loop body is duplicated and block names must stay unique.
pub fn rename_named_begins(stmts: &mut [Stmt], rename: &mut dyn FnMut(Identifier) -> Identifier) {
    for stmt in stmts {
        if let StmtKind::Begin {
            name: Some(name), ..
        } = &mut stmt.kind
        {
            *name = rename(*name);
        }
        for list in child_lists_mut(&mut stmt.kind) {
            rename_named_begins(list, rename);
        }
    }
}

/// Statement lists directly contained in `kind`.
pub(crate) fn child_lists<'a>(kind: &'a StmtKind) -> Vec<&'a Vec<Stmt>> {
    match kind {
        StmtKind::If { thens, elses, .. } => vec![thens, elses],
        StmtKind::Begin { stmts, .. }
        | StmtKind::Fork { stmts, .. }
        | StmtKind::JumpBlock { stmts, .. } => vec![stmts],
        StmtKind::While {
            preconds,
            body,
            incs,
            ..
        } => vec![preconds, body, incs],
        StmtKind::DoWhile { body, .. }
        | StmtKind::Repeat { body, .. }
        | StmtKind::Foreach { body, .. } => vec![body],
        _ => Vec::new(),
    }
}

fn child_lists_mut<'a>(kind: &'a mut StmtKind) -> Vec<&'a mut Vec<Stmt>> {
    match kind {
        StmtKind::If { thens, elses, .. } => vec![thens, elses],
        StmtKind::Begin { stmts, .. }
        | StmtKind::Fork { stmts, .. }
        | StmtKind::JumpBlock { stmts, .. } => vec![stmts],
        StmtKind::While {
            preconds,
            body,
            incs,
            ..
        } => vec![preconds, body, incs],
        StmtKind::DoWhile { body, .. }
        | StmtKind::Repeat { body, .. }
        | StmtKind::Foreach { body, .. } => vec![body],
        _ => Vec::new(),
    }
}
