//! Token definitions for the Hanami lexer.

use std::fmt;

/// A token with its kind, lexeme, and position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    /// 1-based source line
    pub line: usize,
    /// 1-based source column
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    pub fn eof(line: usize, column: usize) -> Self {
        Self::new(TokenKind::Eof, "", line, column)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}('{}')", self.kind, self.lexeme)
    }
}

/// All token kinds in Hanami
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    IntLiteral,
    FloatLiteral,
    DoubleLiteral,
    StringLiteral,

    // Identifiers
    Identifier,

    // Keywords
    Garden,     // namespace declaration
    Species,    // record declaration
    Open,       // public visibility
    Hidden,     // private visibility
    Guarded,    // protected visibility
    Grow,       // function declaration
    Blossom,    // return
    Bloom,      // output channel
    Water,      // input channel
    Branch,     // conditional
    Else,
    While,
    For,
    True,
    False,

    // Import directive; the lexeme carries the include path
    StyleInclude,

    // Operators
    Plus,           // +
    Minus,          // -
    Star,           // *
    Slash,          // /
    Percent,        // %
    Bang,           // !
    Less,           // <
    Greater,        // >
    Assign,         // =
    Dot,            // .
    Comma,          // ,
    Semicolon,      // ;
    Colon,          // :

    // Compound operators
    EqualEqual,         // ==
    BangEqual,          // !=
    LessEqual,          // <=
    GreaterEqual,       // >=
    AmpersandAmpersand, // &&
    PipePipe,           // ||
    StreamOut,          // <<
    StreamIn,           // >>
    Arrow,              // ->
    ColonColon,         // ::

    // Delimiters
    LeftParen,      // (
    RightParen,     // )
    LeftBrace,      // {
    RightBrace,     // }
    LeftBracket,    // [
    RightBracket,   // ]

    // Special
    Eof,
    Error,
}

impl TokenKind {
    /// Check if this token starts a visibility section inside a species
    pub fn is_visibility(&self) -> bool {
        matches!(self, TokenKind::Open | TokenKind::Hidden | TokenKind::Guarded)
    }
}

/// Map string to keyword token kind
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    match ident {
        "garden" => Some(TokenKind::Garden),
        "species" => Some(TokenKind::Species),
        "open" => Some(TokenKind::Open),
        "hidden" => Some(TokenKind::Hidden),
        "guarded" => Some(TokenKind::Guarded),
        "grow" => Some(TokenKind::Grow),
        "blossom" => Some(TokenKind::Blossom),
        "bloom" => Some(TokenKind::Bloom),
        "water" => Some(TokenKind::Water),
        "branch" => Some(TokenKind::Branch),
        "else" => Some(TokenKind::Else),
        "while" => Some(TokenKind::While),
        "for" => Some(TokenKind::For),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        _ => None,
    }
}
