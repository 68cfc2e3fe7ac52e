//! Scanner for Hanami source code tokenization.

use super::token::{lookup_keyword, Token, TokenKind};
use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter};

/// Scanner that produces tokens from source code
pub struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    start_line: usize,
    start_column: usize,
    reporter: &'a mut DiagnosticReporter,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, reporter: &'a mut DiagnosticReporter) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            reporter,
        }
    }

    /// Tokenize the entire source. The result is always EOF-terminated;
    /// error tokens are reported and dropped.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;

            if token.kind != TokenKind::Error {
                tokens.push(token);
            }

            if is_eof {
                break;
            }
        }

        tokens
    }

    /// Scan a single token
    fn scan_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start_line = self.line;
        self.start_column = self.column;

        match self.advance() {
            None => Token::eof(self.line, self.column),
            Some(c) => match c {
                '(' => self.make_token(TokenKind::LeftParen, "("),
                ')' => self.make_token(TokenKind::RightParen, ")"),
                '{' => self.make_token(TokenKind::LeftBrace, "{"),
                '}' => self.make_token(TokenKind::RightBrace, "}"),
                '[' => self.make_token(TokenKind::LeftBracket, "["),
                ']' => self.make_token(TokenKind::RightBracket, "]"),
                ',' => self.make_token(TokenKind::Comma, ","),
                ';' => self.make_token(TokenKind::Semicolon, ";"),
                '.' => self.make_token(TokenKind::Dot, "."),
                '+' => self.make_token(TokenKind::Plus, "+"),
                '*' => self.make_token(TokenKind::Star, "*"),
                '/' => self.make_token(TokenKind::Slash, "/"),
                '%' => self.make_token(TokenKind::Percent, "%"),

                '-' => {
                    if self.match_char('>') {
                        self.make_token(TokenKind::Arrow, "->")
                    } else {
                        self.make_token(TokenKind::Minus, "-")
                    }
                }

                '=' => {
                    if self.match_char('=') {
                        self.make_token(TokenKind::EqualEqual, "==")
                    } else {
                        self.make_token(TokenKind::Assign, "=")
                    }
                }

                '!' => {
                    if self.match_char('=') {
                        self.make_token(TokenKind::BangEqual, "!=")
                    } else {
                        self.make_token(TokenKind::Bang, "!")
                    }
                }

                '<' => {
                    if self.match_char('<') {
                        self.make_token(TokenKind::StreamOut, "<<")
                    } else if self.match_char('=') {
                        self.make_token(TokenKind::LessEqual, "<=")
                    } else {
                        self.make_token(TokenKind::Less, "<")
                    }
                }

                '>' => {
                    if self.match_char('>') {
                        self.make_token(TokenKind::StreamIn, ">>")
                    } else if self.match_char('=') {
                        self.make_token(TokenKind::GreaterEqual, ">=")
                    } else {
                        self.make_token(TokenKind::Greater, ">")
                    }
                }

                ':' => {
                    if self.match_char(':') {
                        self.make_token(TokenKind::ColonColon, "::")
                    } else {
                        self.make_token(TokenKind::Colon, ":")
                    }
                }

                '&' => {
                    if self.match_char('&') {
                        self.make_token(TokenKind::AmpersandAmpersand, "&&")
                    } else {
                        self.error_token('&')
                    }
                }

                '|' => {
                    if self.match_char('|') {
                        self.make_token(TokenKind::PipePipe, "||")
                    } else {
                        self.error_token('|')
                    }
                }

                '"' => self.scan_string(),

                '0'..='9' => self.scan_number(c),

                c if is_ident_start(c) => self.scan_identifier(c),

                _ => self.error_token(c),
            },
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.advance();
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.peek() {
                        Some('/') => {
                            self.advance();
                            self.advance();
                            while self.peek().map_or(false, |c| c != '\n') {
                                self.advance();
                            }
                        }
                        Some('*') => {
                            let open_line = self.line;
                            let open_column = self.column;
                            self.advance();
                            self.advance();
                            let mut closed = false;
                            while let Some(c) = self.advance() {
                                if c == '*' && self.match_char('/') {
                                    closed = true;
                                    break;
                                }
                            }
                            if !closed {
                                self.reporter.report(
                                    Diagnostic::error(
                                        codes::UNTERMINATED_COMMENT,
                                        "unterminated block comment",
                                    ),
                                    open_line,
                                    open_column,
                                    2,
                                );
                            }
                        }
                        _ => break,
                    }
                }
                _ => break,
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        match c {
            Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some(_) => self.column += 1,
            None => {}
        }
        c
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn make_token(&self, kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token::new(kind, lexeme, self.start_line, self.start_column)
    }

    fn error_token(&mut self, c: char) -> Token {
        self.reporter.report(
            Diagnostic::error(
                codes::UNEXPECTED_CHARACTER,
                format!("unexpected character '{}'", c),
            ),
            self.start_line,
            self.start_column,
            1,
        );
        Token::new(TokenKind::Error, c, self.start_line, self.start_column)
    }

    fn scan_identifier(&mut self, first: char) -> Token {
        let mut ident = String::new();
        ident.push(first);

        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }

        // 'style' is scanned together with its include path so the parser
        // sees a single import token.
        if ident == "style" {
            return self.scan_style_path();
        }

        match lookup_keyword(&ident) {
            Some(kind) => self.make_token(kind, ident),
            None => self.make_token(TokenKind::Identifier, ident),
        }
    }

    /// Scan the `<path>` or `"path"` that follows the `style` keyword.
    /// The resulting token's lexeme is the bare path.
    fn scan_style_path(&mut self) -> Token {
        while let Some(' ' | '\t') = self.peek() {
            self.advance();
        }

        let close = match self.peek() {
            Some('<') => '>',
            Some('"') => '"',
            _ => {
                self.reporter.report(
                    Diagnostic::error(
                        codes::MALFORMED_IMPORT,
                        "expected '<' or '\"' after 'style'",
                    ),
                    self.start_line,
                    self.start_column,
                    5,
                );
                return Token::new(TokenKind::Error, "", self.start_line, self.start_column);
            }
        };
        self.advance();

        let mut path = String::new();
        while let Some(c) = self.peek() {
            if c == close || c == '\n' {
                break;
            }
            path.push(c);
            self.advance();
        }

        if !self.match_char(close) {
            self.reporter.report(
                Diagnostic::error(
                    codes::MALFORMED_IMPORT,
                    format!("unterminated style path, expected '{}'", close),
                ),
                self.start_line,
                self.start_column,
                5,
            );
            return Token::new(TokenKind::Error, "", self.start_line, self.start_column);
        }

        self.make_token(TokenKind::StyleInclude, path)
    }

    fn scan_number(&mut self, first: char) -> Token {
        let mut lexeme = String::new();
        lexeme.push(first);
        let mut is_floating = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }

        // Decimal point: only if followed by a digit, so that a member
        // access on a call result does not get swallowed.
        if self.peek() == Some('.') {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if lookahead.peek().map_or(false, |c| c.is_ascii_digit()) {
                is_floating = true;
                lexeme.push('.');
                self.advance();
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        lexeme.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        // Exponent
        if let Some('e' | 'E') = self.peek() {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            let valid = match lookahead.peek() {
                Some('+' | '-') => {
                    lookahead.next();
                    lookahead.peek().map_or(false, |c| c.is_ascii_digit())
                }
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if valid {
                is_floating = true;
                if let Some(e) = self.advance() {
                    lexeme.push(e);
                }
                if let Some('+' | '-') = self.peek() {
                    if let Some(sign) = self.advance() {
                        lexeme.push(sign);
                    }
                }
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        lexeme.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        // 'f' suffix narrows a floating literal to float; it is invalid
        // on a bare integer.
        if let Some('f' | 'F') = self.peek() {
            self.advance();
            if !is_floating {
                self.reporter.report(
                    Diagnostic::error(
                        codes::INVALID_NUMBER,
                        format!("invalid suffix 'f' on integer literal '{}'", lexeme),
                    ),
                    self.start_line,
                    self.start_column,
                    lexeme.len() + 1,
                );
                return Token::new(TokenKind::Error, lexeme, self.start_line, self.start_column);
            }
            return self.make_token(TokenKind::FloatLiteral, lexeme);
        }

        let kind = if is_floating {
            TokenKind::DoubleLiteral
        } else {
            TokenKind::IntLiteral
        };
        self.make_token(kind, lexeme)
    }

    fn scan_string(&mut self) -> Token {
        let mut value = String::new();

        while let Some(c) = self.peek() {
            match c {
                '"' => {
                    self.advance();
                    return self.make_token(TokenKind::StringLiteral, value);
                }
                '\\' => {
                    self.advance();
                    match self.advance() {
                        Some('n') => value.push('\n'),
                        Some('r') => value.push('\r'),
                        Some('t') => value.push('\t'),
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some('0') => value.push('\0'),
                        Some(other) => {
                            value.push('\\');
                            value.push(other);
                        }
                        None => break,
                    }
                }
                '\n' => break,
                _ => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        self.reporter.report(
            Diagnostic::error(codes::UNTERMINATED_STRING, "unterminated string literal")
                .with_help("add a closing '\"' at the end of the string"),
            self.start_line,
            self.start_column,
            value.len() + 1,
        );
        Token::new(TokenKind::Error, "", self.start_line, self.start_column)
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_xid::UnicodeXID::is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || unicode_xid::UnicodeXID::is_xid_continue(c)
}
