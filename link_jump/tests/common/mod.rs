#![allow(dead_code)]

// Shared scaffolding for the lowering tests: builders for small netlists
// and a `run` wrapper that also checks the jump links of the result.

use hdl_ast::expressions::{Access, BinaryOP, Expression};
use hdl_ast::print_ast::DebuggingPrinter;
use hdl_ast::statements::{Stmt, StmtKind};
use hdl_ast::{FtaskKind, FunctionOrTask, Module, ModuleItem, Netlist, Process, ProcessKind};
use link_jump::link_error::LinkDiagnostic;
use link_jump::link_jumps;
use shared_context::interner::Interner;
use shared_context::source_map::SourceMap;
use shared_context::symbol_table::SymbolTable;
use shared_context::{Identifier, Span};

pub fn ident(interner: &mut Interner, name: &str) -> Identifier {
    Identifier::new(interner.intern(name), 0)
}

pub fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::default())
}

pub fn rd(interner: &mut Interner, name: &str) -> Expression {
    Expression::VarRef {
        name: ident(interner, name),
        access: Access::Read,
    }
}

pub fn wr(interner: &mut Interner, name: &str) -> Expression {
    Expression::VarRef {
        name: ident(interner, name),
        access: Access::Write,
    }
}

pub fn cnst(value: i32) -> Expression {
    Expression::Constant(value)
}

pub fn binary(operator: BinaryOP, operand1: Expression, operand2: Expression) -> Expression {
    Expression::Binary {
        operator,
        operand1: Box::new(operand1),
        operand2: Box::new(operand2),
    }
}

pub fn expr_stmt(expr: Expression) -> Stmt {
    stmt(StmtKind::ExprStmt(expr))
}

pub fn var_decl(interner: &mut Interner, name: &str) -> Stmt {
    stmt(StmtKind::VarDecl(hdl_ast::statements::Var::new(
        ident(interner, name),
        shared_context::symbol_table::Type::Int,
        shared_context::symbol_table::Lifetime::Automatic,
        Span::default(),
    )))
}

pub fn assign(lhs: Expression, rhs: Expression) -> Stmt {
    stmt(StmtKind::Assign { lhs, rhs })
}

pub fn if_then(cond: Expression, thens: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::If {
        cond,
        thens,
        elses: Vec::new(),
    })
}

pub fn begin(stmts: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Begin {
        name: None,
        contains_fork: false,
        stmts,
    })
}

pub fn begin_named(interner: &mut Interner, name: &str, stmts: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Begin {
        name: Some(ident(interner, name)),
        contains_fork: false,
        stmts,
    })
}

pub fn fork(stmts: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Fork {
        name: None,
        contains_fork: false,
        stmts,
    })
}

pub fn fork_named(interner: &mut Interner, name: &str, stmts: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Fork {
        name: Some(ident(interner, name)),
        contains_fork: false,
        stmts,
    })
}

pub fn while_loop(cond: Expression, body: Vec<Stmt>, incs: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::While {
        preconds: Vec::new(),
        cond,
        body,
        incs,
        unroll: None,
        suppress_unused: false,
    })
}

/// A netlist with one module holding one initial process.
pub fn initial_netlist(interner: &mut Interner, stmts: Vec<Stmt>) -> Netlist {
    let process = Process::new(ProcessKind::Initial, stmts, Span::default());
    let module = Module::new(
        ident(interner, "m"),
        false,
        false,
        vec![ModuleItem::Process(process)],
        Span::default(),
    );
    Netlist::new(vec![module])
}

/// A netlist with one module holding one function `f` whose result
/// variable shares the function name, the way the binder sets it up.
pub fn function_netlist(interner: &mut Interner, stmts: Vec<Stmt>) -> Netlist {
    let result = ident(interner, "f");
    let ftask = FunctionOrTask::new(
        ident(interner, "f"),
        FtaskKind::Function {
            result,
            is_constructor: false,
        },
        stmts,
        Span::default(),
    );
    netlist_with_ftask(interner, ftask)
}

/// A netlist with one module holding one task `t`.
pub fn task_netlist(interner: &mut Interner, stmts: Vec<Stmt>) -> Netlist {
    let ftask = FunctionOrTask::new(ident(interner, "t"), FtaskKind::Task, stmts, Span::default());
    netlist_with_ftask(interner, ftask)
}

pub fn netlist_with_ftask(interner: &mut Interner, ftask: FunctionOrTask) -> Netlist {
    let module = Module::new(
        ident(interner, "m"),
        false,
        false,
        vec![ModuleItem::Ftask(ftask)],
        Span::default(),
    );
    Netlist::new(vec![module])
}

/// Runs the pass and checks the lowered netlist's jump links on the way
/// out; every test output must be structurally consistent.
pub fn run(
    netlist: Netlist,
    interner: &mut Interner,
    symbol_table: &mut SymbolTable,
) -> (Netlist, Vec<LinkDiagnostic>) {
    let source_map = SourceMap::new("test.sv", "");
    let (linked, diagnostics) = link_jumps(netlist, interner, symbol_table, &source_map, 0);
    let violations = hdl_ast::verify::check_links(&linked);
    assert!(violations.is_empty(), "inconsistent links: {violations:?}");
    (linked, diagnostics)
}

pub fn dump(netlist: &Netlist, interner: &Interner) -> String {
    DebuggingPrinter::new(interner).dump(netlist)
}
