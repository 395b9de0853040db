//! Compilation unit: functions plus a symbol table of callee declarations.

use std::collections::HashMap;

use crate::func::Func;
use crate::types::Type;

/// Identity of a function within its module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncId(pub u32);

/// Identity of a declaration in the module symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(pub u32);

/// A named function signature with no body (an external callee).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: String,
    pub params: Vec<Type>,
    pub results: Vec<Type>,
}

/// Name -> declaration table scoped to one module.
///
/// Declarations are append-only: nothing removes one for the lifetime of the
/// module.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    decls: Vec<FuncDecl>,
    by_name: HashMap<String, DeclId>,
}

impl SymbolTable {
    pub fn lookup(&self, name: &str) -> Option<DeclId> {
        self.by_name.get(name).copied()
    }

    pub fn decl(&self, id: DeclId) -> &FuncDecl {
        &self.decls[id.0 as usize]
    }

    pub fn decls(&self) -> &[FuncDecl] {
        &self.decls
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Insert a declaration under a name not yet present.
    pub fn insert(&mut self, decl: FuncDecl) -> DeclId {
        debug_assert!(!self.by_name.contains_key(&decl.name), "duplicate symbol `{}`", decl.name);
        let id = DeclId(self.decls.len() as u32);
        self.by_name.insert(decl.name.clone(), id);
        self.decls.push(decl);
        id
    }
}

/// One compilation unit.
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub symbols: SymbolTable,
    pub funcs: Vec<Func>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_func(&mut self, func: Func) -> FuncId {
        let id = FuncId(self.funcs.len() as u32);
        self.funcs.push(func);
        id
    }

    pub fn func(&self, id: FuncId) -> &Func {
        &self.funcs[id.0 as usize]
    }

    pub fn func_mut(&mut self, id: FuncId) -> &mut Func {
        &mut self.funcs[id.0 as usize]
    }
}
