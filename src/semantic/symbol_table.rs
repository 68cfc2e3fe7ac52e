//! Symbol table with nested scopes and a persistent species member table.

use crate::parser::Visibility;
use std::collections::HashMap;

/// What a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Record,
}

/// A symbol in the symbol table
#[derive(Debug, Clone)]
pub struct SymbolEntry {
    pub name: String,
    /// Declared type for variables, return type for functions, the
    /// species name itself for records
    pub type_name: String,
    pub kind: SymbolKind,
    pub scope_level: usize,
    /// `None` for free-standing symbols (the default visibility)
    pub visibility: Option<Visibility>,
    /// Species that owns this member, if any
    pub owning_record: Option<String>,
    /// Declared parameter types (functions only)
    pub parameter_types: Vec<String>,
}

/// Scope stack plus a per-species member table. Members stay resolvable
/// through the member table after the species scope is popped, which is
/// what makes later method-body analysis and `x.member` access work.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, SymbolEntry>>,
    record_members: HashMap<String, HashMap<String, SymbolEntry>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()], // global scope
            record_members: HashMap::new(),
        }
    }

    /// Enter a new scope
    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Exit the current scope; the global scope is never popped
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Current nesting depth (0 = global)
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Define a symbol in the current scope. Members are additionally
    /// recorded in their species' persistent member table. Returns
    /// `false` if the name is already taken in the relevant namespace;
    /// the caller turns that into a diagnostic.
    pub fn define(
        &mut self,
        name: &str,
        type_name: &str,
        kind: SymbolKind,
        visibility: Option<Visibility>,
        owning_record: Option<&str>,
        parameter_types: Vec<String>,
    ) -> bool {
        let already_defined = match owning_record {
            Some(record) => self
                .record_members
                .get(record)
                .map_or(false, |members| members.contains_key(name)),
            None => self.scopes.last().unwrap().contains_key(name),
        };

        if already_defined {
            return false;
        }

        let entry = SymbolEntry {
            name: name.to_string(),
            type_name: type_name.to_string(),
            kind,
            scope_level: self.depth(),
            visibility,
            owning_record: owning_record.map(str::to_string),
            parameter_types,
        };

        if let Some(record) = owning_record {
            self.record_members
                .entry(record.to_string())
                .or_default()
                .insert(name.to_string(), entry.clone());
        }

        self.scopes
            .last_mut()
            .unwrap()
            .insert(name.to_string(), entry);
        true
    }

    /// Look up a symbol, searching scopes innermost to outermost
    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
    }

    /// Look up a member of a species through its persistent member
    /// table. `hidden` and `guarded` members resolve only when the
    /// calling context is the declaring species itself; an inaccessible
    /// member behaves as not found.
    pub fn lookup_member(
        &self,
        member_name: &str,
        record_name: &str,
        caller_record: Option<&str>,
    ) -> Option<&SymbolEntry> {
        let entry = self.record_members.get(record_name)?.get(member_name)?;

        let accessible = entry.visibility == Some(Visibility::Open)
            || caller_record == Some(record_name);

        if accessible {
            Some(entry)
        } else {
            None
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
