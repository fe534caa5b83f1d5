use std::{fmt, hash};

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

use self::token::Token;
use crate::Source;

type CharPos = usize;

/// Byte range into the source, `end` exclusive.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Span {
    pub start: CharPos,
    pub end: CharPos,
}

impl Span {
    pub fn new(start: CharPos, end: CharPos) -> Self {
        Span { start, end }
    }
}

#[derive(Debug)]
pub struct Spanned<T> {
    pub span: Span,
    pub node: T,
}

impl<T> Spanned<T> {
    pub fn new(start: CharPos, end: CharPos, node: T) -> Self {
        let span = Span { start, end };

        Spanned { span, node }
    }

    pub fn from_span(span: Span, node: T) -> Self {
        Self { span, node }
    }
}

impl<T: Clone> Clone for Spanned<T> {
    fn clone(&self) -> Self {
        Self {
            span: self.span,
            node: self.node.clone(),
        }
    }
}

impl<T: Copy> Copy for Spanned<T> {}

impl<T: hash::Hash> hash::Hash for Spanned<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl<T: PartialEq> PartialEq for Spanned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.span == other.span
    }
}

impl<T: PartialEq> Eq for Spanned<T> {}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.node)
    }
}

/// A pull based token source. Once `Eof` has been returned, every further call
/// returns `Eof` again.
pub trait Scanner<'src> {
    fn next_token(&mut self) -> Spanned<Token<'src>>;

    fn source(&self) -> &'src Source;
}
