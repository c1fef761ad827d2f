use bumpalo::Bump;
use std::collections::HashMap;

/// Handle to an interned name. `Symbol::default()` is the reserved
/// anonymous entry and resolves to the empty string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Symbol(pub(crate) u32);

/// Deduplicating name store for the compiler. Besides plain interning it
/// derives the generated-name shapes the lowering passes need: prefixed
/// copies of existing names and counter-suffixed fresh names.
pub struct Interner<'a> {
    arena: &'a Bump,
    index: HashMap<&'a str, Symbol>,
    names: Vec<&'a str>,
}

impl<'a> Interner<'a> {
    pub fn new(arena: &'a Bump) -> Self {
        Self {
            arena,
            index: HashMap::new(),
            // slot 0 backs Symbol::default(), the anonymous name
            names: vec![""],
        }
    }

    /// Returns the symbol for `name`, interning it on first sight.
    pub fn intern(&mut self, name: &str) -> Symbol {
        match self.index.get(name) {
            Some(&sym) => sym,
            None => {
                // Copy the name into the arena so it outlives the caller's buffer
                let stored: &'a str = self.arena.alloc_str(name);
                let sym = Symbol(self.names.len() as u32);
                self.names.push(stored);
                self.index.insert(stored, sym);
                sym
            }
        }
    }

    /// Interns `<prefix><existing name>`. Passes that duplicate a subtree
    /// rename its blocks this way to keep names unique downstream.
    pub fn intern_prefixed(&mut self, prefix: &str, sym: Symbol) -> Symbol {
        let combined = format!("{}{}", prefix, self.lookup(sym));
        self.intern(&combined)
    }

    /// Interns `<base><index>`, the shape of compiler-created variables
    /// such as loop counters.
    pub fn intern_indexed(&mut self, base: &str, index: usize) -> Symbol {
        let combined = format!("{}{}", base, index);
        self.intern(&combined)
    }

    /// Resolves a symbol back to its name.
    pub fn lookup(&self, sym: Symbol) -> &'a str {
        self.names[sym.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_deduplicates() {
        let arena = Bump::new();
        let mut interner = Interner::new(&arena);

        let a = interner.intern("clk");
        let b = interner.intern("rst");
        let c = interner.intern("clk");

        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(interner.lookup(a), "clk");
        assert_eq!(interner.lookup(b), "rst");
    }

    #[test]
    fn default_symbol_is_the_anonymous_name() {
        let arena = Bump::new();
        let interner = Interner::new(&arena);
        assert_eq!(interner.lookup(Symbol::default()), "");
    }

    #[test]
    fn derived_names_share_the_plain_entries() {
        let arena = Bump::new();
        let mut interner = Interner::new(&arena);

        let block = interner.intern("b");
        let renamed = interner.intern_prefixed("__Vdo_while1_", block);
        assert_eq!(interner.lookup(renamed), "__Vdo_while1_b");
        assert_eq!(renamed, interner.intern("__Vdo_while1_b"));

        let counter = interner.intern_indexed("__Vrepeat", 0);
        assert_eq!(interner.lookup(counter), "__Vrepeat0");
        assert_eq!(counter, interner.intern("__Vrepeat0"));
    }
}
