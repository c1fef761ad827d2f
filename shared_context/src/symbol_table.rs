use crate::{Identifier, Span, SpannedIdentifier};
use std::collections::HashMap;

/// The `Type` enum represents the type of a symbol in the symbol table.
/// - `Int` is the signed 32-bit integer type.
/// - `Logic(width)` is a packed logic vector of the given bit width.
/// - `Ftask` covers function and task names.
#[derive(Debug, Clone, PartialEq, Copy, Eq)]
pub enum Type {
    Int,
    Logic(u32),
    Ftask,
}

/// Storage duration of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    Automatic,
    Static,
}

/// Metadata attached to a symbol beyond its type.
///
/// `used_loop_idx` marks variables that serve as loop induction counters;
/// later optimization passes must not eliminate writes to them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarAttrs {
    pub lifetime: Lifetime,
    pub used_loop_idx: bool,
}

impl VarAttrs {
    pub fn automatic() -> Self {
        Self {
            lifetime: Lifetime::Automatic,
            used_loop_idx: false,
        }
    }

    pub fn is_used_loop_idx(&self) -> bool {
        self.used_loop_idx
    }
}

/// A `SymbolEntry` represents an entry in the symbol table.
/// It stores information about a declared variable, function or task.
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct SymbolEntry {
    pub sp_iden: SpannedIdentifier, // The identifier along with its source span
    pub entry_type: Type,           // Type of the symbol
    pub attributes: VarAttrs,       // Metadata about the symbol
    pub span: Span,                 // Source code span of the declaration
}

pub struct SymbolTable {
    table: HashMap<Identifier, SymbolEntry>, // Internal hashmap for fast lookups
}

impl SymbolTable {
    /// Creates a new, empty symbol table.
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Retrieves a `SymbolEntry` for a given identifier if it exists.
    /// Returns `None` if the identifier is not found.
    pub fn get(&self, key: Identifier) -> Option<SymbolEntry> {
        self.table.get(&key).copied()
    }

    /// Adds a new symbol to the symbol table.
    pub fn add(
        &mut self,
        sp_iden: SpannedIdentifier,
        entry_type: Type,
        attributes: VarAttrs,
        span: Span,
    ) {
        self.table.insert(
            sp_iden.get_identifier(), // Use the identifier as the key
            SymbolEntry {
                sp_iden,
                attributes,
                entry_type,
                span,
            },
        );
    }

    /// Flags the variable behind `key` as a used loop induction counter.
    /// Unknown identifiers are ignored; the binder upstream registers every
    /// declared variable before lowering runs.
    pub fn mark_used_loop_idx(&mut self, key: Identifier) {
        if let Some(entry) = self.table.get_mut(&key) {
            entry.attributes.used_loop_idx = true;
        }
    }

}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
