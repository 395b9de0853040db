//! Callee declaration registry.
//!
//! Every lowered operation calls a runtime intrinsic through a declared
//! function. The registry guarantees at most one declaration per call-target
//! name for the lifetime of the module.

use sable_ir::{DeclId, FuncDecl, SymbolTable, Type};

/// Return the declaration registered under `name`, creating it with the given
/// signature if absent.
///
/// Lookups are by name only: an existing declaration is returned
/// unconditionally, without re-validating its signature against the requested
/// one. Callers must request a consistent signature per name; the first
/// request wins otherwise.
pub fn get_or_create_declaration(
    symbols: &mut SymbolTable,
    name: &str,
    params: Vec<Type>,
    results: Vec<Type>,
) -> DeclId {
    if let Some(id) = symbols.lookup(name) {
        return id;
    }
    tracing::debug!(name, params = params.len(), results = results.len(), "declaring runtime callee");
    symbols.insert(FuncDecl { name: name.to_owned(), params, results })
}
