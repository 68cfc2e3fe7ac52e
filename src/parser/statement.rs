//! Statement parser for Hanami.

use super::expression::ExpressionParser;
use super::{BranchArm, IoChannel, IoDirection, ParseResult, Parser, Stmt, SyntaxError};
use crate::lexer::TokenKind;

/// Trait extension for statement parsing
pub trait StatementParser {
    fn statement(&mut self) -> ParseResult<Stmt>;
}

impl StatementParser for Parser {
    fn statement(&mut self) -> ParseResult<Stmt> {
        self.parse_statement()
    }
}

impl Parser {
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.peek().kind {
            TokenKind::LeftBrace => {
                let block = self.block()?;
                Ok(Stmt::Block {
                    statements: block.statements,
                })
            }

            TokenKind::Branch => self.branch_statement(),
            TokenKind::Bloom => self.io_statement(IoChannel::Write),
            TokenKind::Water => self.io_statement(IoChannel::Read),
            TokenKind::Blossom => self.return_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::For => self.for_statement(),

            _ => self.var_decl_or_expression_statement(),
        }
    }

    /// Disambiguate `Type Name (=|;)` from an expression statement with
    /// fixed-length lookahead; `std::string` also starts a declaration.
    fn is_var_decl_start(&self) -> bool {
        if !self.check(TokenKind::Identifier) {
            return false;
        }

        if self.peek().lexeme == "std" && self.peek_at(1).kind == TokenKind::ColonColon {
            return true;
        }

        self.peek_at(1).kind == TokenKind::Identifier
            && matches!(
                self.peek_at(2).kind,
                TokenKind::Assign | TokenKind::Semicolon
            )
    }

    fn var_decl_or_expression_statement(&mut self) -> ParseResult<Stmt> {
        if self.is_var_decl_start() {
            self.var_declaration()
        } else {
            self.expression_statement()
        }
    }

    /// Parse a variable declaration: `type name;` or `type name = init;`
    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let type_name = self.type_name()?;
        let var_name = self
            .expect(TokenKind::Identifier, "Expect variable name.")?
            .lexeme;

        let initializer = if self.match_token(TokenKind::Assign) {
            Some(self.expression()?)
        } else {
            None
        };

        self.expect(
            TokenKind::Semicolon,
            "Expect ';' after variable declaration.",
        )?;

        Ok(Stmt::VarDecl {
            type_name,
            var_name,
            initializer,
        })
    }

    /// Parse a branch chain into a flat arm list; a trailing bare `else`
    /// becomes one final arm without a condition
    fn branch_statement(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume 'branch'

        let mut arms = Vec::new();
        arms.push(self.branch_arm()?);

        while self.match_token(TokenKind::Else) {
            if self.match_token(TokenKind::Branch) {
                arms.push(self.branch_arm()?);
            } else {
                let body = self.block()?;
                arms.push(BranchArm {
                    condition: None,
                    body,
                });
                break;
            }
        }

        Ok(Stmt::Branch { arms })
    }

    fn branch_arm(&mut self) -> ParseResult<BranchArm> {
        self.expect(TokenKind::LeftParen, "Expect '(' after 'branch'.")?;
        let condition = self.expression()?;
        self.expect(TokenKind::RightParen, "Expect ')' after branch condition.")?;
        let body = self.block()?;

        Ok(BranchArm {
            condition: Some(condition),
            body,
        })
    }

    /// Parse a channel statement: the first directional operator sets the
    /// direction, then the same operator chains further expressions
    fn io_statement(&mut self, channel: IoChannel) -> ParseResult<Stmt> {
        let keyword = self.advance().clone(); // consume 'bloom'/'water'

        let operator = self.peek().kind;
        let direction = match operator {
            TokenKind::StreamOut => IoDirection::Out,
            TokenKind::StreamIn => IoDirection::In,
            _ => {
                return Err(SyntaxError::at(
                    self.peek(),
                    format!("Expect '<<' or '>>' after '{}'.", keyword.lexeme),
                ));
            }
        };
        self.advance();

        let mut expressions = vec![self.expression()?];

        while self.check(operator) {
            self.advance();
            expressions.push(self.expression()?);
        }

        self.expect(TokenKind::Semicolon, "Expect ';' after channel statement.")?;

        Ok(Stmt::Io {
            channel,
            direction,
            expressions,
        })
    }

    /// Parse a return statement: `blossom;` or `blossom value;`
    fn return_statement(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume 'blossom'

        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };

        self.expect(TokenKind::Semicolon, "Expect ';' after return value.")?;

        Ok(Stmt::Return { value })
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume 'while'

        self.expect(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.expect(TokenKind::RightParen, "Expect ')' after while condition.")?;
        let body = self.block()?;

        Ok(Stmt::While { condition, body })
    }

    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.advance(); // consume 'for'

        self.expect(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let init = if self.match_token(TokenKind::Semicolon) {
            None
        } else if self.is_var_decl_start() {
            Some(Box::new(self.var_declaration()?))
        } else {
            let expr = self.expression()?;
            self.expect(TokenKind::Semicolon, "Expect ';' after loop initializer.")?;
            Some(Box::new(Stmt::ExprStmt { expression: expr }))
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let body = self.block()?;

        Ok(Stmt::For {
            init,
            condition,
            increment,
            body,
        })
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;
        self.expect(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::ExprStmt { expression })
    }
}
