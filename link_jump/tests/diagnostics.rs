// Diagnostic behavior of the lowering pass: illegal control flow is
// reported with the language-mandated messages, the offending node is
// deleted, and one run collects every problem.

mod common;

use common::*;
use hdl_ast::statements::StmtKind;
use hdl_ast::{FtaskKind, FunctionOrTask, Module, ModuleItem, Netlist, Process, ProcessKind};
use link_jump::link_error::Severity;
use shared_context::symbol_table::SymbolTable;
use shared_context::{Bump, Span, interner::Interner};

#[test]
fn return_under_fork_is_rejected_and_removed() {
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut symbols = SymbolTable::new();

    let body = vec![fork(vec![stmt(StmtKind::Return {
        value: Some(cnst(1)),
    })])];
    let netlist = function_netlist(&mut interner, body);

    let (linked, diagnostics) = run(netlist, &mut interner, &mut symbols);

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].is_error());
    assert!(diagnostics[0]
        .get_message_ref()
        .contains("Return isn't legal under fork (IEEE 1800-2023 9.2.3)"));

    // the return is gone and no label was materialized for it
    let text = dump(&linked, &interner);
    assert!(!text.contains("Return"), "dump was:\n{text}");
    assert!(!text.contains("JumpGo"), "dump was:\n{text}");
}

#[test]
fn return_outside_function_or_task_is_rejected() {
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut symbols = SymbolTable::new();

    let netlist = initial_netlist(&mut interner, vec![stmt(StmtKind::Return { value: None })]);
    let (linked, diagnostics) = run(netlist, &mut interner, &mut symbols);

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].is_error());
    assert!(diagnostics[0]
        .get_message_ref()
        .contains("Return isn't underneath a task or function"));
    assert!(!dump(&linked, &interner).contains("Return"));
}

#[test]
fn function_return_without_value_is_rejected_but_still_lowered() {
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut symbols = SymbolTable::new();

    let netlist = function_netlist(&mut interner, vec![stmt(StmtKind::Return { value: None })]);
    let (linked, diagnostics) = run(netlist, &mut interner, &mut symbols);

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0]
        .get_message_ref()
        .contains("Return underneath a function should have return value"));

    // the jump still happens so later passes see consistent control flow
    let text = dump(&linked, &interner);
    assert!(text.contains("JumpGo L0"), "dump was:\n{text}");
    assert!(text.contains("JumpLabel L0"), "dump was:\n{text}");
}

#[test]
fn constructor_return_without_value_is_fine() {
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut symbols = SymbolTable::new();

    let result = ident(&mut interner, "new");
    let ftask = FunctionOrTask::new(
        ident(&mut interner, "new"),
        FtaskKind::Function {
            result,
            is_constructor: true,
        },
        vec![stmt(StmtKind::Return { value: None })],
        Span::default(),
    );
    let netlist = netlist_with_ftask(&mut interner, ftask);

    let (_, diagnostics) = run(netlist, &mut interner, &mut symbols);
    assert!(diagnostics.is_empty());
}

#[test]
fn task_return_with_value_is_rejected_but_still_lowered() {
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut symbols = SymbolTable::new();

    let netlist = task_netlist(
        &mut interner,
        vec![stmt(StmtKind::Return {
            value: Some(cnst(5)),
        })],
    );
    let (linked, diagnostics) = run(netlist, &mut interner, &mut symbols);

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0]
        .get_message_ref()
        .contains("Return underneath a task shouldn't have return value"));

    // no result variable exists, so the value is dropped with the node
    let text = dump(&linked, &interner);
    assert!(text.contains("JumpGo L0"), "dump was:\n{text}");
    assert!(!text.contains("Assign"), "dump was:\n{text}");
}

#[test]
fn break_and_continue_outside_a_loop_are_rejected() {
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut symbols = SymbolTable::new();

    let netlist = initial_netlist(
        &mut interner,
        vec![stmt(StmtKind::Break), stmt(StmtKind::Continue)],
    );
    let (linked, diagnostics) = run(netlist, &mut interner, &mut symbols);

    // both problems surface in one run
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics[0]
        .get_message_ref()
        .contains("break isn't underneath a loop"));
    assert!(diagnostics[1]
        .get_message_ref()
        .contains("continue isn't underneath a loop"));

    let text = dump(&linked, &interner);
    assert!(!text.contains("Break"), "dump was:\n{text}");
    assert!(!text.contains("Continue"), "dump was:\n{text}");
}

#[test]
fn disable_without_matching_block_warns() {
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut symbols = SymbolTable::new();

    let target = ident(&mut interner, "missing");
    let block = begin_named(
        &mut interner,
        "other",
        vec![stmt(StmtKind::Disable { target })],
    );
    let netlist = initial_netlist(&mut interner, vec![block]);
    let (linked, diagnostics) = run(netlist, &mut interner, &mut symbols);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].get_severity(), Severity::Unsupported);
    assert!(diagnostics[0]
        .get_message_ref()
        .contains("disable isn't underneath a begin with name: missing"));
    assert!(!dump(&linked, &interner).contains("Disable"));
}

#[test]
fn disable_of_a_block_containing_a_fork_warns() {
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut symbols = SymbolTable::new();

    // begin : B fork join disable B; end
    let target = ident(&mut interner, "B");
    let body = vec![fork(Vec::new()), stmt(StmtKind::Disable { target })];
    let block = begin_named(&mut interner, "B", body);
    let netlist = initial_netlist(&mut interner, vec![block]);
    let (linked, diagnostics) = run(netlist, &mut interner, &mut symbols);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].get_severity(), Severity::Unsupported);
    assert!(diagnostics[0]
        .get_message_ref()
        .contains("Unsupported: disabling block that contains a fork"));

    let text = dump(&linked, &interner);
    assert!(text.contains("Begin :B (contains fork)"), "dump was:\n{text}");
    assert!(!text.contains("JumpGo"), "dump was:\n{text}");
}

#[test]
fn disable_of_a_named_fork_warns() {
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut symbols = SymbolTable::new();

    // fork : F disable F; join
    let target = ident(&mut interner, "F");
    let block = fork_named(
        &mut interner,
        "F",
        vec![stmt(StmtKind::Disable { target })],
    );
    let netlist = initial_netlist(&mut interner, vec![block]);
    let (_, diagnostics) = run(netlist, &mut interner, &mut symbols);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].get_severity(), Severity::Unsupported);
    assert!(diagnostics[0]
        .get_message_ref()
        .contains("Unsupported: disabling fork by name"));
}

#[test]
fn break_inside_a_loop_inside_a_fork_is_fine() {
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut symbols = SymbolTable::new();

    // the loop is wholly inside the fork, so the jump never crosses it
    let cond = rd(&mut interner, "c");
    let loop_in_fork = fork(vec![while_loop(cond, vec![stmt(StmtKind::Break)], Vec::new())]);
    let netlist = initial_netlist(&mut interner, vec![loop_in_fork]);
    let (linked, diagnostics) = run(netlist, &mut interner, &mut symbols);

    assert!(diagnostics.is_empty());
    let text = dump(&linked, &interner);
    assert!(text.contains("JumpGo L0"), "dump was:\n{text}");
}

#[test]
fn dead_modules_are_left_alone() {
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut symbols = SymbolTable::new();

    let process = Process::new(
        ProcessKind::Initial,
        vec![stmt(StmtKind::Break)],
        Span::default(),
    );
    let module = Module::new(
        ident(&mut interner, "dead_mod"),
        true, // dead
        false,
        vec![ModuleItem::Process(process)],
        Span::default(),
    );
    let netlist = Netlist::new(vec![module]);

    let (linked, diagnostics) = run(netlist, &mut interner, &mut symbols);

    // no diagnostics, no rewrite: the pass never descends into it
    assert!(diagnostics.is_empty());
    let text = dump(&linked, &interner);
    assert!(text.contains("Module dead_mod (dead)"), "dump was:\n{text}");
    assert!(text.contains("Break"), "dump was:\n{text}");
}
