use super::token::{Token, TokenKind};
use std::{error, fmt};

/// Tokens that may start an expression, in the order they are listed in errors.
pub const PREFIX_KINDS: &[TokenKind] = &[
    TokenKind::Ident,
    TokenKind::Int,
    TokenKind::Minus,
    TokenKind::Bang,
    TokenKind::Tilde,
    TokenKind::LParen,
    TokenKind::LBrace,
    TokenKind::If,
    TokenKind::While,
    TokenKind::Func,
];

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum SyntaxError<'src> {
    Prefix {
        actual: Token<'src>,
    },
    Consume {
        expected: TokenKind,
        actual: Token<'src>,
    },
    Internal(&'static str),
}

impl<'src> SyntaxError<'src> {
    /// The token kinds the parser would have accepted.
    pub fn expected(&self) -> &[TokenKind] {
        match self {
            SyntaxError::Prefix { .. } => PREFIX_KINDS,
            SyntaxError::Consume { expected, .. } => std::slice::from_ref(expected),
            SyntaxError::Internal(_) => &[],
        }
    }

    pub fn actual(&self) -> Option<&Token<'src>> {
        match self {
            SyntaxError::Prefix { actual } | SyntaxError::Consume { actual, .. } => Some(actual),
            SyntaxError::Internal(_) => None,
        }
    }
}

impl<'src> fmt::Display for SyntaxError<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SyntaxError::Prefix { actual } => {
                let expected = PREFIX_KINDS
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "expected one of {}, got {}", expected, actual)
            }
            SyntaxError::Consume { expected, actual } => {
                write!(f, "expected {}, got {}", expected, actual)
            }
            SyntaxError::Internal(err) => write!(
                f,
                "an internal error has occured: {}\nPlease report this as a bug",
                err
            ),
        }
    }
}

impl<'src> error::Error for SyntaxError<'src> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_error_names_both_sides() {
        let err = SyntaxError::Consume {
            expected: TokenKind::Ident,
            actual: Token::new(TokenKind::Assign, "="),
        };

        assert_eq!("expected identifier, got '='", err.to_string());
        assert_eq!(&[TokenKind::Ident], err.expected());
        assert_eq!(Some(&Token::new(TokenKind::Assign, "=")), err.actual());
    }

    #[test]
    fn test_prefix_error_lists_every_leading_token() {
        let err = SyntaxError::Prefix {
            actual: Token::new(TokenKind::Illegal, "@"),
        };

        assert_eq!(
            "expected one of identifier, integer literal, '-', '!', '~', '(', '{', 'if', \
             'while', 'func', got illegal character '@'",
            err.to_string()
        );
    }
}
