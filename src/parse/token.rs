use std::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    Eof,
    Illegal,

    Ident,
    Int,

    // Operators
    Assign, // =
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    Percent, // %

    Ampersand, // &
    Pipe,      // |
    Caret,     // ^
    Shl,       // <<
    Shr,       // >>
    Tilde,     // ~

    PlusAssign,    // +=
    MinusAssign,   // -=
    StarAssign,    // *=
    SlashAssign,   // /=
    PercentAssign, // %=

    AmpersandAssign, // &=
    PipeAssign,      // |=
    CaretAssign,     // ^=
    ShlAssign,       // <<=
    ShrAssign,       // >>=

    AmpersandAmpersand, // &&
    PipePipe,           // ||
    Bang,               // !

    EqualsEquals,  // ==
    BangEquals,    // !=
    Smaller,       // <
    SmallerEquals, // <=
    Greater,       // >
    GreaterEquals, // >=

    Comma, // ,
    Semi,  // ;

    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }

    // Keywords
    Let,
    If,
    Else,
    While,
    Continue,
    Break,
    Func,
    Return,
}

#[repr(u8)]
#[derive(Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Debug)]
pub enum Precedence {
    None = 0,
    Assign = 1,
    LogicalOr = 2,
    LogicalAnd = 3,
    BitXor = 4,
    BitOr = 5,
    BitAnd = 6,
    Equality = 7,
    Relational = 8,
    Shift = 9,
    Additive = 10,
    Multiplicative = 11,
    Prefix = 12,
    Call = 13,
}

impl TokenKind {
    pub fn precedence(self) -> Precedence {
        use TokenKind::*;

        match self {
            Assign | PlusAssign | MinusAssign | StarAssign | SlashAssign | PercentAssign
            | AmpersandAssign | PipeAssign | CaretAssign | ShlAssign | ShrAssign => {
                Precedence::Assign
            }
            PipePipe => Precedence::LogicalOr,
            AmpersandAmpersand => Precedence::LogicalAnd,
            Caret => Precedence::BitXor,
            Pipe => Precedence::BitOr,
            Ampersand => Precedence::BitAnd,
            EqualsEquals | BangEquals => Precedence::Equality,
            Smaller | SmallerEquals | Greater | GreaterEquals => Precedence::Relational,
            Shl | Shr => Precedence::Shift,
            Plus | Minus => Precedence::Additive,
            Star | Slash | Percent => Precedence::Multiplicative,
            LParen => Precedence::Call,
            _ => Precedence::None,
        }
    }

    /// Assignment operators group to the right, everything else to the left.
    pub fn is_right_assoc(self) -> bool {
        self.precedence() == Precedence::Assign
    }

    /// Tokens after which a newline, `}` or the end of input ends the statement.
    pub fn ends_value(self) -> bool {
        use TokenKind::*;

        match self {
            Ident | Int | RParen | RBrace | Return | Break | Continue => true,
            _ => false,
        }
    }

    pub fn keyword(ident: &str) -> Option<TokenKind> {
        Some(match ident {
            "let" => TokenKind::Let,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "continue" => TokenKind::Continue,
            "break" => TokenKind::Break,
            "func" | "fn" => TokenKind::Func,
            "return" => TokenKind::Return,
            _ => return None,
        })
    }

    /// The canonical source text of fixed tokens.
    pub fn as_str(self) -> &'static str {
        use TokenKind::*;

        match self {
            Eof => "EOF",
            Illegal => "ILLEGAL",
            Ident => "IDENT",
            Int => "INT",

            Assign => "=",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",

            Ampersand => "&",
            Pipe => "|",
            Caret => "^",
            Shl => "<<",
            Shr => ">>",
            Tilde => "~",

            PlusAssign => "+=",
            MinusAssign => "-=",
            StarAssign => "*=",
            SlashAssign => "/=",
            PercentAssign => "%=",

            AmpersandAssign => "&=",
            PipeAssign => "|=",
            CaretAssign => "^=",
            ShlAssign => "<<=",
            ShrAssign => ">>=",

            AmpersandAmpersand => "&&",
            PipePipe => "||",
            Bang => "!",

            EqualsEquals => "==",
            BangEquals => "!=",
            Smaller => "<",
            SmallerEquals => "<=",
            Greater => ">",
            GreaterEquals => ">=",

            Comma => ",",
            Semi => ";",

            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",

            Let => "let",
            If => "if",
            Else => "else",
            While => "while",
            Continue => "continue",
            Break => "break",
            Func => "func",
            Return => "return",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Eof => write!(f, "end of file"),
            TokenKind::Illegal => write!(f, "illegal character"),
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::Int => write!(f, "integer literal"),
            TokenKind::Semi => write!(f, "';' or newline"),
            kind => write!(f, "'{}'", kind.as_str()),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub literal: &'src str,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, literal: &'src str) -> Self {
        Token { kind, literal }
    }

    /// Terminators inserted by the lexer instead of written in the source.
    pub fn is_implicit_semi(&self) -> bool {
        self.kind == TokenKind::Semi && self.literal != ";"
    }
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Ident | TokenKind::Int | TokenKind::Illegal => {
                write!(f, "{} '{}'", self.kind, self.literal)
            }
            TokenKind::Semi if self.literal == "\n" => write!(f, "newline"),
            TokenKind::Semi if self.is_implicit_semi() => write!(f, "end of statement"),
            kind => write!(f, "{}", kind),
        }
    }
}
