//! Diagnostic reporter that collects diagnostics and resolves source excerpts.

use super::{Diagnostic, SourceLocation};

/// Collects diagnostics during a front-end run
#[derive(Debug, Default)]
pub struct DiagnosticReporter {
    diagnostics: Vec<Diagnostic>,
    file: String,
    lines: Vec<String>,
}

impl DiagnosticReporter {
    pub fn new(file: &str, source: &str) -> Self {
        Self {
            diagnostics: Vec::new(),
            file: file.to_string(),
            lines: source.lines().map(str::to_string).collect(),
        }
    }

    /// Get a specific line's content (1-based)
    pub fn get_line(&self, line: usize) -> Option<&str> {
        if line == 0 {
            return None;
        }
        self.lines.get(line - 1).map(String::as_str)
    }

    /// Report a diagnostic anchored at a 1-based line/column position
    pub fn report(&mut self, diagnostic: Diagnostic, line: usize, column: usize, length: usize) {
        let mut diagnostic =
            diagnostic.with_location(SourceLocation::new(&self.file, line, column, length));
        if let Some(source_line) = self.get_line(line) {
            diagnostic = diagnostic.with_source_line(source_line);
        }
        self.diagnostics.push(diagnostic);
    }

    /// Add a diagnostic without a source position
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Consume and return all diagnostics
    pub fn take_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Get reference to diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
