//! Parser module for building the AST from tokens.

mod ast;
mod expression;
mod statement;

pub use ast::*;
pub use expression::ExpressionParser;
pub use statement::StatementParser;

use crate::lexer::{Token, TokenKind};
use std::fmt;

/// Fatal syntax error carrying the offending token's position.
///
/// The first violated expectation unwinds the whole parse; no partial
/// tree is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: token.line,
            column: token.column,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}] Syntax error: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for SyntaxError {}

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Recursive descent parser for Hanami
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let tokens = if tokens.is_empty() {
            vec![Token::eof(1, 1)]
        } else {
            tokens
        };
        Self { tokens, current: 0 }
    }

    /// Parse the entire program, transferring ownership of the tree to
    /// the caller
    pub fn parse(mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            self.declaration(&mut statements)?;
        }

        Ok(Program { statements })
    }

    /// Parse a top-level declaration into `out`. A braced namespace
    /// splices its contents, which is why this pushes instead of
    /// returning a single node.
    fn declaration(&mut self, out: &mut Vec<Stmt>) -> ParseResult<()> {
        match self.peek().kind {
            TokenKind::StyleInclude => {
                let path = self.advance().lexeme.clone();
                out.push(Stmt::ImportDirective { path });
                Ok(())
            }
            TokenKind::Garden => self.garden_declaration(out),
            TokenKind::Species => {
                let species = self.species_declaration()?;
                out.push(species);
                Ok(())
            }
            TokenKind::Grow => {
                let function = self.function_declaration()?;
                out.push(function);
                Ok(())
            }
            _ => {
                let stmt = self.statement()?;
                out.push(stmt);
                Ok(())
            }
        }
    }

    /// Parse a namespace declaration: `garden Name;` or `garden Name { ... }`
    fn garden_declaration(&mut self, out: &mut Vec<Stmt>) -> ParseResult<()> {
        self.advance(); // consume 'garden'

        let name = self
            .expect(TokenKind::Identifier, "Expect namespace name after 'garden'.")?
            .lexeme;
        out.push(Stmt::NamespaceDecl { name });

        if self.match_token(TokenKind::Semicolon) {
            return Ok(());
        }

        self.expect(
            TokenKind::LeftBrace,
            "Expect ';' or '{' after namespace name.",
        )?;

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            self.declaration(out)?;
        }

        self.expect(TokenKind::RightBrace, "Expect '}' after namespace body.")?;
        Ok(())
    }

    /// Parse a species declaration with its visibility sections
    fn species_declaration(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume 'species'

        let name = self
            .expect(TokenKind::Identifier, "Expect species name after 'species'.")?
            .lexeme;
        self.expect(TokenKind::LeftBrace, "Expect '{' before species body.")?;

        let mut sections = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            sections.push(self.visibility_section()?);
        }

        self.expect(TokenKind::RightBrace, "Expect '}' after species body.")?;
        self.match_token(TokenKind::Semicolon); // optional trailing ';'

        Ok(Stmt::RecordDecl { name, sections })
    }

    /// Parse one visibility section. A section has no closing delimiter
    /// of its own; it runs until '}' or the next visibility keyword.
    fn visibility_section(&mut self) -> ParseResult<VisibilityBlock> {
        let visibility = match self.peek().kind {
            TokenKind::Open => Visibility::Open,
            TokenKind::Hidden => Visibility::Hidden,
            TokenKind::Guarded => Visibility::Guarded,
            _ => {
                return Err(SyntaxError::at(
                    self.peek(),
                    "Expect visibility specifier ('open', 'hidden', or 'guarded') in species body.",
                ));
            }
        };
        self.advance();
        self.expect(TokenKind::Colon, "Expect ':' after visibility specifier.")?;

        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace)
            && !self.peek().kind.is_visibility()
            && !self.is_at_end()
        {
            if self.check(TokenKind::Grow) {
                statements.push(self.function_declaration()?);
            } else {
                statements.push(self.statement()?);
            }
        }

        Ok(VisibilityBlock {
            visibility,
            statements,
        })
    }

    /// Parse a function declaration: `grow name(params) -> type { ... }`
    fn function_declaration(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume 'grow'

        let name = self
            .expect(TokenKind::Identifier, "Expect function name after 'grow'.")?
            .lexeme;
        self.expect(TokenKind::LeftParen, "Expect '(' after function name.")?;

        let mut parameters = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                let type_name = self.type_name()?;
                let param_name = self
                    .expect(TokenKind::Identifier, "Expect parameter name.")?
                    .lexeme;

                parameters.push(Parameter {
                    type_name,
                    param_name,
                });

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightParen, "Expect ')' after parameters.")?;
        self.expect(TokenKind::Arrow, "Expect '->' before function return type.")?;
        let return_type = self.type_name()?;
        let body = self.block()?;

        Ok(Stmt::FunctionDecl {
            name,
            return_type,
            parameters,
            body,
        })
    }

    /// Parse a type position: a plain identifier, or the qualified
    /// `std::string` spelling of the builtin string type.
    pub(crate) fn type_name(&mut self) -> ParseResult<String> {
        if self.check(TokenKind::Identifier)
            && self.peek().lexeme == "std"
            && self.peek_at(1).kind == TokenKind::ColonColon
        {
            self.advance(); // 'std'
            self.advance(); // '::'
            let qualified = self.expect(TokenKind::Identifier, "Expect type name after '::'.")?;
            if qualified.lexeme != "string" {
                return Err(SyntaxError {
                    message: format!("Unknown qualified type 'std::{}'.", qualified.lexeme),
                    line: qualified.line,
                    column: qualified.column,
                });
            }
            return Ok("string".to_string());
        }

        let token = self.expect(TokenKind::Identifier, "Expect type name.")?;
        Ok(token.lexeme)
    }

    /// Parse a brace-delimited block
    pub(crate) fn block(&mut self) -> ParseResult<Block> {
        self.expect(TokenKind::LeftBrace, "Expect '{' before block.")?;

        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.statement()?);
        }

        self.expect(TokenKind::RightBrace, "Expect '}' after block.")?;

        Ok(Block { statements })
    }

    // === Helper methods ===

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Fixed-length lookahead; clamps to the trailing EOF token
    pub(crate) fn peek_at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.current + offset)
            .unwrap_or_else(|| self.tokens.last().unwrap())
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(SyntaxError::at(self.peek(), message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticReporter;
    use crate::lexer::Scanner;

    fn parse(source: &str) -> ParseResult<Program> {
        let mut reporter = DiagnosticReporter::new("test.hnm", source);
        let tokens = Scanner::new(source, &mut reporter).scan_tokens();
        assert!(!reporter.has_errors(), "unexpected lexer errors");
        Parser::new(tokens).parse()
    }

    fn parse_expr(source: &str) -> Expr {
        let program = parse(&format!("{};", source)).expect("parse failed");
        match program.statements.into_iter().next() {
            Some(Stmt::ExprStmt { expression }) => expression,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expr = parse_expr("1 + 2 * 3");

        let Expr::BinaryOp { op, left, right } = expr else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Add);
        assert_eq!(*left, Expr::NumberLiteral { value: "1".into() });

        let Expr::BinaryOp { op, .. } = *right else {
            panic!("expected '*' on the right");
        };
        assert_eq!(op, BinaryOp::Mul);
    }

    #[test]
    fn assignment_is_right_associative() {
        let expr = parse_expr("a = b = 3");

        let Expr::Assignment { left, right } = expr else {
            panic!("expected assignment");
        };
        assert_eq!(*left, Expr::Identifier { name: "a".into() });
        assert!(matches!(*right, Expr::Assignment { .. }));
    }

    #[test]
    fn invalid_assignment_target_is_a_syntax_error() {
        let err = parse("1 + 2 = 3;").unwrap_err();
        assert_eq!(err.message, "Invalid assignment target.");
    }

    #[test]
    fn member_assignment_target_is_accepted() {
        let expr = parse_expr("rose.petals = 5");
        let Expr::Assignment { left, .. } = expr else {
            panic!("expected assignment");
        };
        assert!(matches!(*left, Expr::MemberAccess { .. }));
    }

    #[test]
    fn call_and_member_chains() {
        let expr = parse_expr("meadow.rose.describe(1, 2)");
        let Expr::FunctionCall { callee, arguments } = expr else {
            panic!("expected call");
        };
        assert_eq!(arguments.len(), 2);
        assert!(matches!(*callee, Expr::MemberAccess { .. }));
    }

    #[test]
    fn unary_forms_lower_to_binary_nodes() {
        let negated = parse_expr("-x");
        let Expr::BinaryOp { op, left, .. } = negated else {
            panic!("expected lowered negation");
        };
        assert_eq!(op, BinaryOp::Sub);
        assert_eq!(*left, Expr::NumberLiteral { value: "0".into() });

        let not = parse_expr("!ready");
        let Expr::BinaryOp { op, right, .. } = not else {
            panic!("expected lowered logical not");
        };
        assert_eq!(op, BinaryOp::Ne);
        assert_eq!(*right, Expr::BooleanLiteral { value: true });
    }

    #[test]
    fn missing_semicolon_aborts_the_parse() {
        let err = parse("int x = 1").unwrap_err();
        assert_eq!(err.message, "Expect ';' after variable declaration.");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn var_decl_lookahead_does_not_eat_expressions() {
        let program = parse("int x = 1;\nx = 2;\ncount();").expect("parse failed");
        assert!(matches!(program.statements[0], Stmt::VarDecl { .. }));
        assert!(matches!(program.statements[1], Stmt::ExprStmt { .. }));
        assert!(matches!(program.statements[2], Stmt::ExprStmt { .. }));
    }

    #[test]
    fn qualified_string_type_is_normalized() {
        let program = parse("std::string name = \"fern\";").expect("parse failed");
        let Stmt::VarDecl { type_name, .. } = &program.statements[0] else {
            panic!("expected variable declaration");
        };
        assert_eq!(type_name, "string");
    }

    #[test]
    fn branch_chain_builds_flat_arm_list() {
        let source = r#"
            branch (x < 1) { blossom 1; }
            else branch (x < 2) { blossom 2; }
            else { blossom 3; }
        "#;
        let program = parse(source).expect("parse failed");

        let Stmt::Branch { arms } = &program.statements[0] else {
            panic!("expected branch");
        };
        assert_eq!(arms.len(), 3);
        assert!(arms[0].condition.is_some());
        assert!(arms[1].condition.is_some());
        assert!(arms[2].condition.is_none());
    }

    #[test]
    fn io_statement_chains_one_operator() {
        let program = parse("bloom << \"total: \" << total << 42;").expect("parse failed");
        let Stmt::Io {
            channel,
            direction,
            expressions,
        } = &program.statements[0]
        else {
            panic!("expected io statement");
        };
        assert_eq!(*channel, IoChannel::Write);
        assert_eq!(*direction, IoDirection::Out);
        assert_eq!(expressions.len(), 3);
    }

    #[test]
    fn io_statement_requires_terminator() {
        let err = parse("water >> x").unwrap_err();
        assert_eq!(err.message, "Expect ';' after channel statement.");
    }

    #[test]
    fn species_sections_end_at_next_visibility_keyword() {
        let source = r#"
            species Rose {
            open:
                int petals;
                grow bloom_count() -> int { blossom petals; }
            hidden:
                string secret;
            }
        "#;
        let program = parse(source).expect("parse failed");

        let Stmt::RecordDecl { name, sections } = &program.statements[0] else {
            panic!("expected species declaration");
        };
        assert_eq!(name, "Rose");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].visibility, Visibility::Open);
        assert_eq!(sections[0].statements.len(), 2);
        assert_eq!(sections[1].visibility, Visibility::Hidden);
        assert_eq!(sections[1].statements.len(), 1);
    }

    #[test]
    fn braced_namespace_splices_declarations() {
        let source = r#"
            garden Meadow {
                grow main() -> int { blossom 0; }
            }
        "#;
        let program = parse(source).expect("parse failed");
        assert!(matches!(
            program.statements[0],
            Stmt::NamespaceDecl { .. }
        ));
        assert!(matches!(
            program.statements[1],
            Stmt::FunctionDecl { .. }
        ));
    }

    #[test]
    fn for_loop_clauses_are_optional() {
        let program = parse("for (;;) { }").expect("parse failed");
        let Stmt::For {
            init,
            condition,
            increment,
            ..
        } = &program.statements[0]
        else {
            panic!("expected for statement");
        };
        assert!(init.is_none());
        assert!(condition.is_none());
        assert!(increment.is_none());
    }

    #[test]
    fn syntax_error_carries_position() {
        let err = parse("grow main( -> int { }").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.column > 1);
    }
}
