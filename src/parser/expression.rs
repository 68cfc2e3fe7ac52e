//! Expression parser for Hanami.
//! Grammar layers are ordered by precedence, each one calling the next
//! tighter layer and looping on its own operator set.

use super::{BinaryOp, Expr, ParseResult, Parser, SyntaxError};
use crate::lexer::TokenKind;

/// Trait extension for expression parsing
pub trait ExpressionParser {
    fn expression(&mut self) -> ParseResult<Expr>;
}

impl ExpressionParser for Parser {
    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }
}

impl Parser {
    /// Parse assignment (lowest precedence, right-associative)
    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.logical_or()?;

        if self.check(TokenKind::Assign) {
            let equals = self.peek().clone();
            self.advance();
            let value = self.assignment()?;

            if !expr.is_assignable() {
                return Err(SyntaxError::at(&equals, "Invalid assignment target."));
            }

            return Ok(Expr::Assignment {
                left: Box::new(expr),
                right: Box::new(value),
            });
        }

        Ok(expr)
    }

    /// Parse logical OR: a || b
    fn logical_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.logical_and()?;

        while self.match_token(TokenKind::PipePipe) {
            let right = self.logical_and()?;
            expr = Expr::BinaryOp {
                op: BinaryOp::Or,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// Parse logical AND: a && b
    fn logical_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while self.match_token(TokenKind::AmpersandAmpersand) {
            let right = self.equality()?;
            expr = Expr::BinaryOp {
                op: BinaryOp::And,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// Parse equality: a == b, a != b
    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::EqualEqual => BinaryOp::Eq,
                TokenKind::BangEqual => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.comparison()?;
            expr = Expr::BinaryOp {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// Parse comparison: a < b, a <= b, a > b, a >= b
    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Less => BinaryOp::Lt,
                TokenKind::LessEqual => BinaryOp::Le,
                TokenKind::Greater => BinaryOp::Gt,
                TokenKind::GreaterEqual => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.term()?;
            expr = Expr::BinaryOp {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// Parse term: a + b, a - b
    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.factor()?;
            expr = Expr::BinaryOp {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// Parse factor: a * b, a / b, a % b
    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.unary()?;
            expr = Expr::BinaryOp {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// Parse prefix unary: !a, -a.
    /// The node taxonomy is binary-only, so both forms lower to their
    /// equivalent binary expressions.
    fn unary(&mut self) -> ParseResult<Expr> {
        if self.match_token(TokenKind::Bang) {
            let operand = self.unary()?;
            return Ok(Expr::BinaryOp {
                op: BinaryOp::Ne,
                left: Box::new(operand),
                right: Box::new(Expr::BooleanLiteral { value: true }),
            });
        }

        if self.match_token(TokenKind::Minus) {
            let operand = self.unary()?;
            return Ok(Expr::BinaryOp {
                op: BinaryOp::Sub,
                left: Box::new(Expr::NumberLiteral {
                    value: "0".to_string(),
                }),
                right: Box::new(operand),
            });
        }

        self.call()
    }

    /// Parse postfix call and member access: a(args), a.b, chainable
    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.match_token(TokenKind::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if self.match_token(TokenKind::Dot) {
                let member = self
                    .expect(TokenKind::Identifier, "Expect member name after '.'.")?
                    .lexeme;
                expr = Expr::MemberAccess {
                    object: Box::new(expr),
                    member,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                arguments.push(self.expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightParen, "Expect ')' after arguments.")?;

        Ok(Expr::FunctionCall {
            callee: Box::new(callee),
            arguments,
        })
    }

    /// Parse primary expressions: literals, identifiers, grouping
    fn primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::IntLiteral => {
                self.advance();
                Ok(Expr::NumberLiteral {
                    value: token.lexeme,
                })
            }

            TokenKind::FloatLiteral => {
                self.advance();
                Ok(Expr::FloatLiteral {
                    value: token.lexeme,
                })
            }

            TokenKind::DoubleLiteral => {
                self.advance();
                Ok(Expr::DoubleLiteral {
                    value: token.lexeme,
                })
            }

            TokenKind::StringLiteral => {
                self.advance();
                Ok(Expr::StringLiteral {
                    value: token.lexeme,
                })
            }

            TokenKind::True => {
                self.advance();
                Ok(Expr::BooleanLiteral { value: true })
            }

            TokenKind::False => {
                self.advance();
                Ok(Expr::BooleanLiteral { value: false })
            }

            TokenKind::Identifier => {
                self.advance();
                Ok(Expr::Identifier { name: token.lexeme })
            }

            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(TokenKind::RightParen, "Expect ')' after expression.")?;
                Ok(expr)
            }

            _ => Err(SyntaxError::at(&token, "Expect expression.")),
        }
    }
}
