//! Semantic analyzer for Hanami.
//!
//! A single top-down traversal over a borrowed AST. Unlike the parser,
//! the analyzer never aborts: every violation appends one diagnostic and
//! checking continues, so one run surfaces as many independent problems
//! as possible. `type_of` returns an empty string once a subexpression's
//! type is unknown; every rule treats that sentinel as "already
//! reported, assume nothing".

use super::symbol_table::{SymbolKind, SymbolTable};
use crate::parser::{
    BinaryOp, Block, Expr, Parameter, Program, Stmt, IoDirection, VisibilityBlock,
};

/// Result of a semantic analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub diagnostics: Vec<String>,
}

impl AnalysisReport {
    pub fn ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Semantic analyzer with a fresh symbol table per run
pub struct SemanticAnalyzer {
    symbols: SymbolTable,
    errors: Vec<String>,
    current_species: Option<String>,
    current_return_type: Option<String>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            errors: Vec::new(),
            current_species: None,
            current_return_type: None,
        }
    }

    /// Analyze a program, consuming the analyzer so every run starts
    /// from an empty symbol table
    pub fn analyze(mut self, program: &Program) -> AnalysisReport {
        for stmt in &program.statements {
            self.visit_stmt(stmt);
        }

        AnalysisReport {
            diagnostics: self.errors,
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    // === Statement visitors ===

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::ImportDirective { .. } => {}
            Stmt::NamespaceDecl { .. } => {}

            Stmt::RecordDecl { name, sections } => self.visit_record(name, sections),

            Stmt::Block { statements } => {
                self.symbols.enter_scope();
                for stmt in statements {
                    self.visit_stmt(stmt);
                }
                self.symbols.exit_scope();
            }

            Stmt::VarDecl {
                type_name,
                var_name,
                initializer,
            } => self.visit_var_decl(type_name, var_name, initializer.as_ref()),

            Stmt::FunctionDecl {
                name,
                return_type,
                parameters,
                body,
            } => self.visit_function(name, return_type, parameters, body),

            Stmt::Return { value } => self.visit_return(value.as_ref()),

            Stmt::ExprStmt { expression } => {
                self.type_of(expression);
            }

            Stmt::Branch { arms } => {
                for arm in arms {
                    if let Some(condition) = &arm.condition {
                        let condition_type = self.type_of(condition);
                        if !condition_type.is_empty() && condition_type != "bool" {
                            self.error(format!(
                                "Condition for 'branch' must be of type 'bool', but got '{}'.",
                                condition_type
                            ));
                        }
                    }
                    self.visit_block(&arm.body);
                }
            }

            Stmt::Io {
                direction,
                expressions,
                ..
            } => {
                for expr in expressions {
                    self.type_of(expr);
                    if *direction == IoDirection::In && !expr.is_assignable() {
                        self.error(
                            "'water >>' can only read into variables or assignable members."
                                .to_string(),
                        );
                    }
                }
            }

            Stmt::While { condition, body } => {
                let condition_type = self.type_of(condition);
                if !condition_type.is_empty() && condition_type != "bool" {
                    self.error(format!(
                        "Condition for 'while' must be of type 'bool', but got '{}'.",
                        condition_type
                    ));
                }
                self.visit_block(body);
            }

            Stmt::For {
                init,
                condition,
                increment,
                body,
            } => {
                // the loop header gets its own scope so the initializer
                // binding is gone after the loop
                self.symbols.enter_scope();

                if let Some(init) = init {
                    self.visit_stmt(init);
                }
                if let Some(condition) = condition {
                    let condition_type = self.type_of(condition);
                    if !condition_type.is_empty() && condition_type != "bool" {
                        self.error(format!(
                            "Condition for 'for' must be of type 'bool', but got '{}'.",
                            condition_type
                        ));
                    }
                }
                if let Some(increment) = increment {
                    self.type_of(increment);
                }
                self.visit_block(body);

                self.symbols.exit_scope();
            }
        }
    }

    fn visit_block(&mut self, block: &Block) {
        self.symbols.enter_scope();
        for stmt in &block.statements {
            self.visit_stmt(stmt);
        }
        self.symbols.exit_scope();
    }

    /// Species declarations are analyzed in two passes so that members
    /// may reference siblings declared later in the same species: pass
    /// one registers every member variable and method signature, pass
    /// two analyzes initializers and method bodies.
    fn visit_record(&mut self, name: &str, sections: &[VisibilityBlock]) {
        if !self
            .symbols
            .define(name, name, SymbolKind::Record, None, None, Vec::new())
        {
            self.error(format!("Species '{}' already defined in this scope.", name));
        }

        let previous_species = self.current_species.replace(name.to_string());
        self.symbols.enter_scope();

        // pass 1: register members
        for section in sections {
            for stmt in &section.statements {
                match stmt {
                    Stmt::VarDecl {
                        type_name,
                        var_name,
                        ..
                    } => {
                        if !self.symbols.define(
                            var_name,
                            type_name,
                            SymbolKind::Variable,
                            Some(section.visibility),
                            Some(name),
                            Vec::new(),
                        ) {
                            self.error(format!(
                                "Member variable '{}' already declared in species '{}'.",
                                var_name, name
                            ));
                        }
                    }
                    Stmt::FunctionDecl {
                        name: method_name,
                        return_type,
                        parameters,
                        ..
                    } => {
                        let parameter_types =
                            parameters.iter().map(|p| p.type_name.clone()).collect();
                        if !self.symbols.define(
                            method_name,
                            return_type,
                            SymbolKind::Function,
                            Some(section.visibility),
                            Some(name),
                            parameter_types,
                        ) {
                            self.error(format!(
                                "Method '{}' already declared in species '{}'.",
                                method_name, name
                            ));
                        }
                    }
                    _ => {}
                }
            }
        }

        // pass 2: analyze member initializers and method bodies
        for section in sections {
            for stmt in &section.statements {
                match stmt {
                    Stmt::VarDecl {
                        type_name,
                        var_name,
                        initializer,
                    } => {
                        if let Some(init) = initializer {
                            let init_type = self.type_of(init);
                            if !init_type.is_empty() && init_type != *type_name {
                                self.error(format!(
                                    "Type mismatch: cannot initialize member variable '{}' of type '{}' with expression of type '{}'.",
                                    var_name, type_name, init_type
                                ));
                            }
                        }
                    }
                    other => self.visit_stmt(other),
                }
            }
        }

        self.symbols.exit_scope();
        self.current_species = previous_species;
    }

    fn visit_var_decl(&mut self, type_name: &str, var_name: &str, initializer: Option<&Expr>) {
        // an unknown, non-primitive type must name a previously declared species
        if !is_primitive(type_name) {
            let names_species = self
                .symbols
                .lookup(type_name)
                .map_or(false, |entry| entry.kind == SymbolKind::Record);
            if !names_species {
                self.error(format!(
                    "Unknown type '{}' for variable '{}'.",
                    type_name, var_name
                ));
            }
        }

        if let Some(init) = initializer {
            let init_type = self.type_of(init);
            if !init_type.is_empty() && init_type != type_name {
                self.error(format!(
                    "Type mismatch: cannot initialize variable '{}' of type '{}' with expression of type '{}'.",
                    var_name, type_name, init_type
                ));
            }
        }

        if !self.symbols.define(
            var_name,
            type_name,
            SymbolKind::Variable,
            None,
            None,
            Vec::new(),
        ) {
            self.error(format!(
                "Variable '{}' already declared in this scope.",
                var_name
            ));
        }
    }

    fn visit_function(
        &mut self,
        name: &str,
        return_type: &str,
        parameters: &[Parameter],
        body: &Block,
    ) {
        // methods were registered during the species' first pass; free
        // functions register here, at their declaration point
        if self.current_species.is_none() {
            let parameter_types = parameters.iter().map(|p| p.type_name.clone()).collect();
            if !self.symbols.define(
                name,
                return_type,
                SymbolKind::Function,
                None,
                None,
                parameter_types,
            ) {
                self.error(format!(
                    "Function '{}' already defined in this scope.",
                    name
                ));
            }
        }

        let previous_return_type = self
            .current_return_type
            .replace(return_type.to_string());

        self.symbols.enter_scope();

        for param in parameters {
            let type_known = is_primitive(&param.type_name)
                || self.symbols.lookup(&param.type_name).is_some();
            if !type_known {
                self.error(format!(
                    "Unknown type '{}' for parameter '{}' in function '{}'.",
                    param.type_name, param.param_name, name
                ));
            }

            if !self.symbols.define(
                &param.param_name,
                &param.type_name,
                SymbolKind::Variable,
                None,
                None,
                Vec::new(),
            ) {
                self.error(format!(
                    "Parameter '{}' redeclared in function '{}'.",
                    param.param_name, name
                ));
            }
        }

        // the body shares the parameter scope
        for stmt in &body.statements {
            self.visit_stmt(stmt);
        }

        self.symbols.exit_scope();
        self.current_return_type = previous_return_type;
    }

    fn visit_return(&mut self, value: Option<&Expr>) {
        let return_type = match value {
            Some(expr) => {
                let t = self.type_of(expr);
                if t.is_empty() {
                    return; // already reported
                }
                t
            }
            None => "void".to_string(),
        };

        let Some(expected) = self.current_return_type.clone() else {
            self.error("'blossom' statement found outside of a function definition.".to_string());
            return;
        };

        if return_type == expected {
            return;
        }

        if expected == "void" && value.is_some() {
            self.error("Cannot return a value from a 'void' function.".to_string());
        } else if expected != "void" && value.is_none() {
            self.error(format!(
                "Must return a value of type '{}' from non-void function.",
                expected
            ));
        } else {
            self.error(format!(
                "Return type mismatch: cannot return value of type '{}' from function expecting '{}'.",
                return_type, expected
            ));
        }
    }

    // === Type inference ===

    /// Infer an expression's type. An empty result means the type could
    /// not be determined and the cause has already been reported.
    fn type_of(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::NumberLiteral { .. } => "int".to_string(),
            Expr::FloatLiteral { .. } => "float".to_string(),
            Expr::DoubleLiteral { .. } => "double".to_string(),
            Expr::StringLiteral { .. } => "string".to_string(),
            Expr::BooleanLiteral { .. } => "bool".to_string(),

            Expr::Identifier { name } => {
                let declared = self.symbols.lookup(name).map(|e| e.type_name.clone());
                match declared {
                    Some(type_name) => type_name,
                    None => {
                        self.error(format!(
                            "Undeclared identifier '{}' used in expression.",
                            name
                        ));
                        String::new()
                    }
                }
            }

            Expr::BinaryOp { op, left, right } => {
                let left_type = self.type_of(left);
                let right_type = self.type_of(right);
                if left_type.is_empty() || right_type.is_empty() {
                    return String::new(); // avoid cascading errors
                }
                self.binary_op_type(*op, &left_type, &right_type)
            }

            Expr::FunctionCall { callee, arguments } => self.call_type(callee, arguments),

            Expr::Assignment { left, right } => self.assignment_type(left, right),

            Expr::MemberAccess { object, member } => {
                let object_type = self.type_of(object);
                if object_type.is_empty() {
                    return String::new();
                }

                let is_species = self
                    .symbols
                    .lookup(&object_type)
                    .map_or(false, |entry| entry.kind == SymbolKind::Record);
                if !is_species {
                    self.error(format!(
                        "Cannot access member '{}' on non-species type '{}'.",
                        member, object_type
                    ));
                    return String::new();
                }

                let caller = self.current_species.clone();
                let entry = self
                    .symbols
                    .lookup_member(member, &object_type, caller.as_deref())
                    .cloned();
                match entry {
                    Some(entry) if entry.kind == SymbolKind::Function => {
                        self.error(format!(
                            "Cannot access method '{}' like a variable; use '()' to call it.",
                            member
                        ));
                        String::new()
                    }
                    Some(entry) => entry.type_name,
                    None => {
                        self.error(format!(
                            "Cannot find accessible member variable '{}' in species '{}'.",
                            member, object_type
                        ));
                        String::new()
                    }
                }
            }
        }
    }

    fn binary_op_type(&mut self, op: BinaryOp, left: &str, right: &str) -> String {
        match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                if is_numeric(left) && is_numeric(right) {
                    return promote(left, right);
                }
                if op == BinaryOp::Add && left == "string" && right == "string" {
                    return "string".to_string();
                }
                self.error(format!(
                    "Arithmetic operation requires numeric operands or string concatenation, but got '{}' and '{}'.",
                    left, right
                ));
                String::new()
            }

            BinaryOp::Mod => {
                if left == "int" && right == "int" {
                    return "int".to_string();
                }
                self.error(format!(
                    "Modulo operation requires 'int' operands, but got '{}' and '{}'.",
                    left, right
                ));
                String::new()
            }

            BinaryOp::And | BinaryOp::Or => {
                if left == "bool" && right == "bool" {
                    return "bool".to_string();
                }
                self.error(format!(
                    "Logical operation requires 'bool' operands, but got '{}' and '{}'.",
                    left, right
                ));
                String::new()
            }

            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt
            | BinaryOp::Ge => {
                if is_numeric(left) && is_numeric(right) {
                    return "bool".to_string();
                }
                if left == "string" && right == "string" {
                    return "bool".to_string();
                }
                if matches!(op, BinaryOp::Eq | BinaryOp::Ne)
                    && left == "bool"
                    && right == "bool"
                {
                    return "bool".to_string();
                }
                self.error(format!(
                    "Comparison between incompatible types '{}' and '{}'.",
                    left, right
                ));
                String::new()
            }
        }
    }

    fn call_type(&mut self, callee: &Expr, arguments: &[Expr]) -> String {
        match callee {
            Expr::Identifier { name } => {
                let entry = self.symbols.lookup(name).cloned();
                let Some(entry) = entry.filter(|e| e.kind == SymbolKind::Function) else {
                    self.error(format!(
                        "Attempting to call undeclared or non-function identifier '{}'.",
                        name
                    ));
                    return String::new();
                };

                self.check_call_arguments(name, "Function", &entry.parameter_types, arguments);
                entry.type_name
            }

            Expr::MemberAccess { object, member } => {
                let object_type = self.type_of(object);
                if object_type.is_empty() {
                    return String::new();
                }

                let caller = self.current_species.clone();
                let entry = self
                    .symbols
                    .lookup_member(member, &object_type, caller.as_deref())
                    .cloned();
                let Some(entry) = entry.filter(|e| e.kind == SymbolKind::Function) else {
                    self.error(format!(
                        "Cannot find accessible member function '{}' in species '{}'.",
                        member, object_type
                    ));
                    return String::new();
                };

                self.check_call_arguments(member, "Method", &entry.parameter_types, arguments);
                entry.type_name
            }

            _ => {
                self.error("Invalid callee for function call.".to_string());
                String::new()
            }
        }
    }

    /// Arity must match exactly and each argument must equal its
    /// declared parameter type (no implicit widening on call arguments).
    /// Mismatches are reported per argument without stopping the check.
    fn check_call_arguments(
        &mut self,
        callee_name: &str,
        callee_kind: &str,
        expected: &[String],
        arguments: &[Expr],
    ) {
        if arguments.len() != expected.len() {
            self.error(format!(
                "{} '{}' expects {} arguments, but got {}.",
                callee_kind,
                callee_name,
                expected.len(),
                arguments.len()
            ));
            return;
        }

        for (index, (argument, expected_type)) in
            arguments.iter().zip(expected.iter()).enumerate()
        {
            let argument_type = self.type_of(argument);
            if !argument_type.is_empty() && argument_type != *expected_type {
                self.error(format!(
                    "Argument type mismatch in call to '{}'. Expected '{}' for argument {}, but got '{}'.",
                    callee_name,
                    expected_type,
                    index + 1,
                    argument_type
                ));
            }
        }
    }

    fn assignment_type(&mut self, left: &Expr, right: &Expr) -> String {
        let right_type = self.type_of(right);

        let left_type = match left {
            Expr::Identifier { name } => {
                let entry = self.symbols.lookup(name).cloned();
                match entry {
                    None => {
                        self.error(format!("Cannot assign to undeclared identifier '{}'.", name));
                        return String::new();
                    }
                    Some(entry) => match entry.kind {
                        SymbolKind::Function => {
                            self.error(format!("Cannot assign to function '{}'.", name));
                            return String::new();
                        }
                        SymbolKind::Record => {
                            self.error("Invalid left-hand side for assignment.".to_string());
                            return String::new();
                        }
                        SymbolKind::Variable => entry.type_name,
                    },
                }
            }

            Expr::MemberAccess { object, member } => {
                let object_type = self.type_of(object);
                if object_type.is_empty() {
                    return String::new();
                }

                let is_species = self
                    .symbols
                    .lookup(&object_type)
                    .map_or(false, |entry| entry.kind == SymbolKind::Record);
                if !is_species {
                    self.error(format!(
                        "Cannot assign to member '{}' of non-species type '{}'.",
                        member, object_type
                    ));
                    return String::new();
                }

                let caller = self.current_species.clone();
                let entry = self
                    .symbols
                    .lookup_member(member, &object_type, caller.as_deref())
                    .cloned();
                match entry {
                    Some(entry) if entry.kind == SymbolKind::Function => {
                        self.error(format!("Cannot assign to method '{}'.", member));
                        return String::new();
                    }
                    Some(entry) => entry.type_name,
                    None => {
                        self.error(format!(
                            "Cannot find accessible member variable '{}' in species '{}' for assignment.",
                            member, object_type
                        ));
                        return String::new();
                    }
                }
            }

            // unreachable from the parser, but a deserialized tree can
            // carry an arbitrary left side
            _ => {
                self.error("Invalid left-hand side for assignment.".to_string());
                return String::new();
            }
        };

        if !left_type.is_empty() && !right_type.is_empty() {
            let compatible = left_type == right_type
                || ((left_type == "float" || left_type == "double") && right_type == "int")
                || (left_type == "double" && right_type == "float");

            if !compatible {
                self.error(format!(
                    "Type mismatch: cannot assign value of type '{}' to target of type '{}'.",
                    right_type, left_type
                ));
                return String::new();
            }
        }

        // an assignment expression evaluates to the assigned value
        right_type
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_primitive(type_name: &str) -> bool {
    matches!(type_name, "int" | "float" | "double" | "string" | "bool")
}

fn is_numeric(type_name: &str) -> bool {
    matches!(type_name, "int" | "float" | "double")
}

/// Widening result of a numeric binary operation: `int < float < double`
fn promote(left: &str, right: &str) -> String {
    if left == "double" || right == "double" {
        "double".to_string()
    } else if left == "float" || right == "float" {
        "float".to_string()
    } else {
        "int".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticReporter;
    use crate::lexer::Scanner;
    use crate::parser::Parser;

    fn parse(source: &str) -> Program {
        let mut reporter = DiagnosticReporter::new("test.hnm", source);
        let tokens = Scanner::new(source, &mut reporter).scan_tokens();
        assert!(!reporter.has_errors(), "unexpected lexer errors");
        Parser::new(tokens).parse().expect("parse failed")
    }

    fn analyze(source: &str) -> AnalysisReport {
        SemanticAnalyzer::new().analyze(&parse(source))
    }

    fn assert_clean(source: &str) {
        let report = analyze(source);
        assert!(
            report.ok(),
            "expected no diagnostics, got: {:?}",
            report.diagnostics
        );
    }

    #[test]
    fn numeric_promotion_follows_the_lattice() {
        assert_clean("double d = 1 + 2.5;");
        assert_clean("float f = 1 * 2.5f;");
        assert_clean("int i = 7 % 3;");

        let report = analyze("int i = 1 + 2.5;");
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].contains("cannot initialize variable 'i'"));
    }

    #[test]
    fn modulo_requires_int_operands() {
        let report = analyze("double x = 1 % 2.5;");
        assert!(!report.ok());
        assert!(report.diagnostics[0].contains("Modulo operation requires 'int' operands"));
        // the sentinel suppresses a second diagnostic for the initializer
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn string_concatenation_is_allowed() {
        assert_clean(r#"string s = "a" + "b";"#);

        let report = analyze(r#"string s = "a" + 1;"#);
        assert!(report.diagnostics[0].contains("Arithmetic operation requires numeric operands"));
    }

    #[test]
    fn logical_operators_require_bool() {
        assert_clean("bool b = true && false;");

        let report = analyze("bool b = 1 && true;");
        assert!(report.diagnostics[0].contains("Logical operation requires 'bool' operands"));
    }

    #[test]
    fn comparisons_yield_bool() {
        assert_clean("bool b = 1 < 2.5;");
        assert_clean(r#"bool b = "a" == "b";"#);
        assert_clean("bool b = true != false;");

        let report = analyze(r#"bool b = 1 == "one";"#);
        assert!(report.diagnostics[0].contains("Comparison between incompatible types"));

        // bool ordering comparisons are not defined
        let report = analyze("bool b = true < false;");
        assert!(report.diagnostics[0].contains("Comparison between incompatible types"));
    }

    #[test]
    fn undeclared_identifier_is_reported_once() {
        let report = analyze("int x = missing + 1;");
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].contains("Undeclared identifier 'missing'"));
    }

    #[test]
    fn block_scope_ends_at_the_brace() {
        let report = analyze("{ int inner = 1; } int y = inner;");
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.contains("Undeclared identifier 'inner'")));

        // shadowing in a nested scope is not a redeclaration
        assert_clean("int x = 1; { int x = 2; }");
    }

    #[test]
    fn redeclaration_in_same_scope_is_reported() {
        let report = analyze("int x = 1; int x = 2;");
        assert!(report.diagnostics[0].contains("Variable 'x' already declared in this scope."));
    }

    #[test]
    fn var_decl_initializer_must_match_exactly() {
        // no widening at declaration, unlike assignment
        let report = analyze("double d = 1;");
        assert!(report.diagnostics[0].contains("cannot initialize variable 'd'"));
    }

    #[test]
    fn assignment_allows_widening() {
        assert_clean("double d = 0.0; d = 1;");
        assert_clean("double d = 0.0; float f = 0.0f; d = f;");

        let report = analyze("int i = 0; i = 2.5;");
        assert!(report.diagnostics[0]
            .contains("cannot assign value of type 'double' to target of type 'int'"));
    }

    #[test]
    fn unknown_declared_type_must_name_a_species() {
        let report = analyze("Fern f;");
        assert!(report.diagnostics[0].contains("Unknown type 'Fern' for variable 'f'"));

        assert_clean("species Fern { open: int fronds; } Fern f;");
    }

    #[test]
    fn free_functions_do_not_forward_reference() {
        let report = analyze(
            r#"
            grow caller() -> int { blossom helper(); }
            grow helper() -> int { blossom 1; }
            "#,
        );
        assert!(report.diagnostics[0]
            .contains("Attempting to call undeclared or non-function identifier 'helper'"));
    }

    #[test]
    fn species_methods_forward_reference_siblings() {
        assert_clean(
            r#"
            species Rose {
            open:
                int petals;
                grow describe() -> int { blossom count(); }
                grow count() -> int { blossom petals; }
            }
            "#,
        );
    }

    #[test]
    fn hidden_member_access_is_rejected_outside_the_species() {
        let report = analyze(
            r#"
            species Rose {
            hidden:
                int secret;
            open:
                grow reveal() -> int { blossom secret; }
            }
            grow main() -> int {
                Rose r;
                blossom r.secret;
            }
            "#,
        );
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0]
            .contains("Cannot find accessible member variable 'secret' in species 'Rose'"));
    }

    #[test]
    fn open_member_access_is_allowed() {
        assert_clean(
            r#"
            species Rose {
            open:
                int petals;
            }
            grow main() -> int {
                Rose r;
                r.petals = 5;
                blossom r.petals;
            }
            "#,
        );
    }

    #[test]
    fn guarded_is_as_private_as_hidden() {
        let report = analyze(
            r#"
            species Rose {
            guarded:
                int stem;
            }
            grow main() -> int {
                Rose r;
                blossom r.stem;
            }
            "#,
        );
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].contains("'stem'"));
    }

    #[test]
    fn methods_must_be_called_not_read() {
        let report = analyze(
            r#"
            species Rose {
            open:
                grow count() -> int { blossom 1; }
            }
            grow main() -> int {
                Rose r;
                blossom r.count;
            }
            "#,
        );
        assert!(report.diagnostics[0]
            .contains("Cannot access method 'count' like a variable"));
    }

    #[test]
    fn call_arity_and_argument_types_are_checked() {
        let report = analyze(
            r#"
            grow feed(int amount, string what) -> int { blossom amount; }
            grow main() -> int {
                feed(1);
                feed("x", "y");
                blossom 0;
            }
            "#,
        );
        assert!(report.diagnostics[0].contains("Function 'feed' expects 2 arguments, but got 1."));
        assert!(report.diagnostics[1].contains("Expected 'int' for argument 1, but got 'string'"));
        assert_eq!(report.diagnostics.len(), 2);
    }

    #[test]
    fn call_arguments_do_not_widen() {
        let report = analyze(
            r#"
            grow grow_by(double amount) -> int { blossom 0; }
            grow main() -> int { blossom grow_by(1); }
            "#,
        );
        assert!(report.diagnostics[0]
            .contains("Expected 'double' for argument 1, but got 'int'"));
    }

    #[test]
    fn return_checking_covers_void_mismatches() {
        let report = analyze("grow noisy() -> void { blossom 1; }");
        assert!(report.diagnostics[0].contains("Cannot return a value from a 'void' function."));

        let report = analyze("grow quiet() -> int { blossom; }");
        assert!(report.diagnostics[0]
            .contains("Must return a value of type 'int' from non-void function."));

        let report = analyze("grow off() -> int { blossom \"one\"; }");
        assert!(report.diagnostics[0].contains("Return type mismatch"));

        let report = analyze("blossom 1;");
        assert!(report.diagnostics[0]
            .contains("'blossom' statement found outside of a function definition."));
    }

    #[test]
    fn branch_conditions_must_be_bool() {
        let report = analyze("branch (1 + 2) { }");
        assert!(report.diagnostics[0]
            .contains("Condition for 'branch' must be of type 'bool', but got 'int'."));

        assert_clean("branch (1 < 2) { } else { }");
    }

    #[test]
    fn water_targets_must_be_assignable() {
        let report = analyze("int x = 0; water >> x + 1;");
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.contains("'water >>' can only read into variables or assignable members.")));

        assert_clean("int x = 0; water >> x;");
        assert_clean("int x = 0; bloom << x + 1;");
    }

    #[test]
    fn assigning_to_a_function_name_is_an_error() {
        let report = analyze(
            r#"
            grow sprout() -> int { blossom 1; }
            grow main() -> int {
                sprout = 3;
                blossom 0;
            }
            "#,
        );
        assert!(report.diagnostics[0].contains("Cannot assign to function 'sprout'."));
    }

    #[test]
    fn a_function_used_as_a_value_has_its_return_type() {
        // grounded directly in the symbol entry: a function symbol read
        // as a value yields its declared return type
        assert_clean(
            r#"
            grow measure() -> int { blossom 2; }
            grow main() -> int {
                int x = measure;
                blossom x;
            }
            "#,
        );
    }

    #[test]
    fn analysis_is_idempotent() {
        let program = parse("int x = 1; x = missing;");
        let first = SemanticAnalyzer::new().analyze(&program);
        let second = SemanticAnalyzer::new().analyze(&program);
        assert_eq!(first, second);
        assert!(!first.ok());
    }

    #[test]
    fn analysis_never_stops_at_the_first_error() {
        let report = analyze(
            r#"
            int a = missing_one;
            int b = missing_two;
            string c = 1 + 2;
            "#,
        );
        assert_eq!(report.diagnostics.len(), 3);
    }
}
