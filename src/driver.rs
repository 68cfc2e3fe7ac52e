//! Driver that orchestrates the front-end pipeline.

use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter};
use crate::lexer::Scanner;
use crate::parser::{Parser, Program};
use crate::semantic::SemanticAnalyzer;

/// The front-end driver: scan -> parse -> analyze.
///
/// A syntax error is fatal and ends the run with a single positioned
/// diagnostic; semantic analysis runs to completion and reports its
/// whole batch. Either way, a failed stage stops the pipeline.
pub struct Driver {
    file: String,
    source: String,
    dump_tokens: bool,
    dump_ast: bool,
}

impl Driver {
    pub fn new(file: String, source: String) -> Self {
        Self {
            file,
            source,
            dump_tokens: false,
            dump_ast: false,
        }
    }

    pub fn set_dump_tokens(&mut self, enabled: bool) {
        self.dump_tokens = enabled;
    }

    pub fn set_dump_ast(&mut self, enabled: bool) {
        self.dump_ast = enabled;
    }

    /// Run the full pipeline over the source text, producing the
    /// validated AST
    pub fn run(&self) -> Result<Program, Vec<Diagnostic>> {
        let mut reporter = DiagnosticReporter::new(&self.file, &self.source);

        // === Lexical analysis ===
        let tokens = Scanner::new(&self.source, &mut reporter).scan_tokens();

        if self.dump_tokens {
            eprintln!("=== Tokens ===");
            for token in &tokens {
                eprintln!("  {}", token);
            }
            eprintln!();
        }

        if reporter.has_errors() {
            return Err(reporter.take_diagnostics());
        }

        // === Parsing (fail-fast) ===
        let program = match Parser::new(tokens).parse() {
            Ok(program) => program,
            Err(err) => {
                reporter.report(
                    Diagnostic::error(codes::SYNTAX_ERROR, err.message.clone()),
                    err.line,
                    err.column,
                    1,
                );
                return Err(reporter.take_diagnostics());
            }
        };

        if self.dump_ast {
            eprintln!("=== AST ===");
            eprintln!("{:#?}", program);
            eprintln!();
        }

        // === Semantic analysis (collects everything) ===
        self.analyze(program, reporter)
    }

    /// Run only the semantic analyzer over an AST deserialized from its
    /// JSON interchange form
    pub fn run_from_ast(&self) -> Result<Program, Vec<Diagnostic>> {
        let mut reporter = DiagnosticReporter::new(&self.file, "");

        let program: Program = match serde_json::from_str(&self.source) {
            Ok(program) => program,
            Err(err) => {
                reporter.add(Diagnostic::error(
                    codes::SEMANTIC_ERROR,
                    format!("could not deserialize AST: {}", err),
                ));
                return Err(reporter.take_diagnostics());
            }
        };

        if self.dump_ast {
            eprintln!("=== AST ===");
            eprintln!("{:#?}", program);
            eprintln!();
        }

        self.analyze(program, reporter)
    }

    fn analyze(
        &self,
        program: Program,
        mut reporter: DiagnosticReporter,
    ) -> Result<Program, Vec<Diagnostic>> {
        let report = SemanticAnalyzer::new().analyze(&program);

        if !report.ok() {
            for message in report.diagnostics {
                reporter.add(Diagnostic::error(codes::SEMANTIC_ERROR, message));
            }
            return Err(reporter.take_diagnostics());
        }

        Ok(program)
    }
}
