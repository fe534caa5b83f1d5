use std::str::CharIndices;

use super::{token::*, *};
use crate::Source;

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct InputPos {
    pos: CharPos,
    value: char,
}

impl InputPos {
    fn new_opt(value: Option<(CharPos, char)>) -> Option<Self> {
        let (pos, value) = value?;

        Some(InputPos { pos, value })
    }
}

pub struct Lexer<'src> {
    source: &'src Source,
    src: &'src str,
    chars: CharIndices<'src>,
    current: Option<InputPos>,
    // set after a token that can end a statement, see `TokenKind::ends_value`
    expect_terminator: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src Source) -> Self {
        let src = &source.code;
        let mut chars = src.char_indices();

        Lexer {
            source,
            src,
            current: InputPos::new_opt(chars.next()),
            chars,
            expect_terminator: false,
        }
    }
}

impl<'src> Lexer<'src> {
    fn pos(&self) -> CharPos {
        if let Some(InputPos { pos, .. }) = self.current {
            return pos;
        }

        self.src.len()
    }

    fn slice(&self, start: CharPos, end: CharPos) -> &'src str {
        let end = if end > self.src.len() {
            self.src.len()
        } else {
            end
        };

        &self.src[start..end]
    }

    fn current_char(&self) -> Option<char> {
        self.current.map(|InputPos { value, .. }| value)
    }

    fn token(&self, start: CharPos, kind: TokenKind) -> Spanned<Token<'src>> {
        let end = self.pos();
        Spanned::new(start, end, Token::new(kind, self.slice(start, end)))
    }
}

macro_rules! consume_single {
    ($self:ident, $start:ident, $kind:expr) => {{
        $self.advance();
        $self.token($start, $kind)
    }};
}

macro_rules! consume_double {
    ($self:ident, $start:ident, $single:expr, $($next:literal => $double:expr),+) => {{
        $self.advance();
        match $self.current_char() {
            $(Some($next) => {
                $self.advance();
                $self.token($start, $double)
            })+
            _ => $self.token($start, $single),
        }
    }};
}

impl<'src> Lexer<'src> {
    fn advance(&mut self) -> Option<InputPos> {
        let curr = self.current?;
        self.current = InputPos::new_opt(self.chars.next());
        Some(curr)
    }

    fn read_while<P>(&mut self, predicate: P) -> &'src str
    where
        P: Fn(char) -> bool,
    {
        let start = self.pos();

        while let Some(InputPos { value, .. }) = self.current {
            if predicate(value) {
                self.advance();
            } else {
                break;
            }
        }

        self.slice(start, self.pos())
    }

    /// A newline is only skipped while no terminator is pending.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char() {
            if !c.is_whitespace() || (c == '\n' && self.expect_terminator) {
                break;
            }

            self.advance();
        }
    }

    fn implicit_terminator(&mut self, start: CharPos) -> Option<Spanned<Token<'src>>> {
        if !self.expect_terminator {
            return None;
        }

        self.expect_terminator = false;
        let literal = match self.current_char() {
            Some('\n') => "\n",
            Some('}') | None => "",
            _ => return None,
        };

        Some(Spanned::new(start, start, Token::new(TokenKind::Semi, literal)))
    }

    fn scan_ident(&mut self) -> Spanned<Token<'src>> {
        let start = self.pos();
        let slice = self.read_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let kind = TokenKind::keyword(slice).unwrap_or(TokenKind::Ident);

        self.token(start, kind)
    }

    fn scan_num(&mut self) -> Spanned<Token<'src>> {
        let start = self.pos();
        self.read_while(|c| c.is_ascii_digit());

        self.token(start, TokenKind::Int)
    }

    /// `<`, `<=`, `<<`, `<<=` and the same for `>`.
    fn scan_angle(
        &mut self,
        start: CharPos,
        angle: char,
        kinds: [TokenKind; 4],
    ) -> Spanned<Token<'src>> {
        let [single, single_eq, double, double_eq] = kinds;
        self.advance();

        match self.current_char() {
            Some('=') => consume_single!(self, start, single_eq),
            Some(c) if c == angle => {
                self.advance();
                if self.current_char() == Some('=') {
                    consume_single!(self, start, double_eq)
                } else {
                    self.token(start, double)
                }
            }
            _ => self.token(start, single),
        }
    }

    fn scan_token(&mut self, start: CharPos) -> Spanned<Token<'src>> {
        let ch = match self.current_char() {
            Some(ch) => ch,
            None => return Spanned::new(start, start, Token::new(TokenKind::Eof, "")),
        };

        match ch {
            '=' => consume_double!(self, start, TokenKind::Assign, '=' => TokenKind::EqualsEquals),
            '!' => consume_double!(self, start, TokenKind::Bang, '=' => TokenKind::BangEquals),
            '+' => consume_double!(self, start, TokenKind::Plus, '=' => TokenKind::PlusAssign),
            '-' => consume_double!(self, start, TokenKind::Minus, '=' => TokenKind::MinusAssign),
            '*' => consume_double!(self, start, TokenKind::Star, '=' => TokenKind::StarAssign),
            '/' => consume_double!(self, start, TokenKind::Slash, '=' => TokenKind::SlashAssign),
            '%' => {
                consume_double!(self, start, TokenKind::Percent, '=' => TokenKind::PercentAssign)
            }
            '^' => consume_double!(self, start, TokenKind::Caret, '=' => TokenKind::CaretAssign),
            '&' => consume_double!(
                self,
                start,
                TokenKind::Ampersand,
                '&' => TokenKind::AmpersandAmpersand,
                '=' => TokenKind::AmpersandAssign
            ),
            '|' => consume_double!(
                self,
                start,
                TokenKind::Pipe,
                '|' => TokenKind::PipePipe,
                '=' => TokenKind::PipeAssign
            ),
            '<' => self.scan_angle(
                start,
                '<',
                [
                    TokenKind::Smaller,
                    TokenKind::SmallerEquals,
                    TokenKind::Shl,
                    TokenKind::ShlAssign,
                ],
            ),
            '>' => self.scan_angle(
                start,
                '>',
                [
                    TokenKind::Greater,
                    TokenKind::GreaterEquals,
                    TokenKind::Shr,
                    TokenKind::ShrAssign,
                ],
            ),
            '~' => consume_single!(self, start, TokenKind::Tilde),
            ',' => consume_single!(self, start, TokenKind::Comma),
            ';' => consume_single!(self, start, TokenKind::Semi),
            '(' => consume_single!(self, start, TokenKind::LParen),
            ')' => consume_single!(self, start, TokenKind::RParen),
            '{' => consume_single!(self, start, TokenKind::LBrace),
            '}' => consume_single!(self, start, TokenKind::RBrace),
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_ident(),
            c if c.is_ascii_digit() => self.scan_num(),
            _ => consume_single!(self, start, TokenKind::Illegal),
        }
    }
}

impl<'src> Scanner<'src> for Lexer<'src> {
    fn next_token(&mut self) -> Spanned<Token<'src>> {
        self.skip_whitespace();
        let start = self.pos();

        if let Some(semi) = self.implicit_terminator(start) {
            return semi;
        }

        let token = self.scan_token(start);
        self.expect_terminator = token.node.kind.ends_value();
        token
    }

    fn source(&self) -> &'src Source {
        self.source
    }
}

/// Yields every token up to, but not including, `Eof`.
impl<'src> Iterator for Lexer<'src> {
    type Item = Spanned<Token<'src>>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.node.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(code: &str) -> Vec<(TokenKind, String)> {
        let source = Source::new("main", code);
        Lexer::new(&source)
            .map(|t| (t.node.kind, t.node.literal.to_owned()))
            .collect()
    }

    fn kinds(code: &str) -> Vec<TokenKind> {
        tokens(code).into_iter().map(|(kind, _)| kind).collect()
    }

    fn tok(kind: TokenKind, literal: &str) -> (TokenKind, String) {
        (kind, literal.to_owned())
    }

    #[test]
    fn test_scan_program_with_implicit_terminators() {
        let code = "let a0 = 1
let b = 2

fn add(x, y) { return x + y }

let c = add(a0, b)

if c == 3 { print(true) } else {
\tprint(false)
}
";
        use TokenKind::*;

        let expected = vec![
            tok(Let, "let"),
            tok(Ident, "a0"),
            tok(Assign, "="),
            tok(Int, "1"),
            tok(Semi, "\n"),
            tok(Let, "let"),
            tok(Ident, "b"),
            tok(Assign, "="),
            tok(Int, "2"),
            tok(Semi, "\n"),
            tok(Func, "fn"),
            tok(Ident, "add"),
            tok(LParen, "("),
            tok(Ident, "x"),
            tok(Comma, ","),
            tok(Ident, "y"),
            tok(RParen, ")"),
            tok(LBrace, "{"),
            tok(Return, "return"),
            tok(Ident, "x"),
            tok(Plus, "+"),
            tok(Ident, "y"),
            tok(Semi, ""),
            tok(RBrace, "}"),
            tok(Semi, "\n"),
            tok(Let, "let"),
            tok(Ident, "c"),
            tok(Assign, "="),
            tok(Ident, "add"),
            tok(LParen, "("),
            tok(Ident, "a0"),
            tok(Comma, ","),
            tok(Ident, "b"),
            tok(RParen, ")"),
            tok(Semi, "\n"),
            tok(If, "if"),
            tok(Ident, "c"),
            tok(EqualsEquals, "=="),
            tok(Int, "3"),
            tok(LBrace, "{"),
            tok(Ident, "print"),
            tok(LParen, "("),
            tok(Ident, "true"),
            tok(RParen, ")"),
            tok(Semi, ""),
            tok(RBrace, "}"),
            tok(Else, "else"),
            tok(LBrace, "{"),
            tok(Ident, "print"),
            tok(LParen, "("),
            tok(Ident, "false"),
            tok(RParen, ")"),
            tok(Semi, "\n"),
            tok(RBrace, "}"),
            tok(Semi, "\n"),
        ];

        assert_eq!(expected, tokens(code));
    }

    #[test]
    fn test_closing_brace_triggers_terminator_without_being_consumed() {
        use TokenKind::*;

        assert_eq!(
            vec![
                LBrace, Let, Ident, Assign, Int, Semi, Ident, Plus, Int, Semi, RBrace, Semi
            ],
            kinds("{ let a = 10\n a + 10 }")
        );
    }

    #[test]
    fn test_explicit_semicolons_suppress_implicit_ones() {
        use TokenKind::*;

        assert_eq!(
            vec![Let, Ident, Assign, Int, Semi, Let, Ident, Assign, Int, Semi],
            kinds("let a = 1;\nlet b = 2;\n")
        );
    }

    #[test]
    fn test_newline_after_operator_is_whitespace() {
        use TokenKind::*;

        assert_eq!(vec![Int, Plus, Int, Semi], kinds("1 +\n2"));
        assert_eq!(vec![LParen, Ident, RParen, Semi], kinds("(\n\nx)"));
    }

    #[test]
    fn test_jump_keywords_end_a_statement() {
        use TokenKind::*;

        assert_eq!(vec![Return, Semi], kinds("return\n"));
        assert_eq!(vec![LBrace, Break, Semi, RBrace, Semi], kinds("{ break }"));
        assert_eq!(vec![Continue, Semi], kinds("continue"));
    }

    #[test]
    fn test_eof_is_returned_forever() {
        let source = Source::new("main", "x");
        let mut lexer = Lexer::new(&source);

        assert_eq!(TokenKind::Ident, lexer.next_token().node.kind);
        assert_eq!(
            Spanned::new(1, 1, Token::new(TokenKind::Semi, "")),
            lexer.next_token()
        );
        for _ in 0..3 {
            assert_eq!(
                Spanned::new(1, 1, Token::new(TokenKind::Eof, "")),
                lexer.next_token()
            );
        }
    }

    #[test]
    fn test_scan_declaration_spans() {
        let source = Source::new("main", "let a = 10;");
        let lexer = Lexer::new(&source);

        let tokens: Vec<Spanned<Token>> = lexer.collect();
        let expected = vec![
            Spanned::new(0, 3, Token::new(TokenKind::Let, "let")),
            Spanned::new(4, 5, Token::new(TokenKind::Ident, "a")),
            Spanned::new(6, 7, Token::new(TokenKind::Assign, "=")),
            Spanned::new(8, 10, Token::new(TokenKind::Int, "10")),
            Spanned::new(10, 11, Token::new(TokenKind::Semi, ";")),
        ];

        assert_eq!(expected, tokens);
    }

    #[test]
    fn test_scan_operators() {
        use TokenKind::*;

        let code = "= == + += - -= * *= / /= % %= ^ ^= & && &= | || |= \
                    < <= << <<= > >= >> >>= ! != ~ , ;";
        let expected = vec![
            Assign,
            EqualsEquals,
            Plus,
            PlusAssign,
            Minus,
            MinusAssign,
            Star,
            StarAssign,
            Slash,
            SlashAssign,
            Percent,
            PercentAssign,
            Caret,
            CaretAssign,
            Ampersand,
            AmpersandAmpersand,
            AmpersandAssign,
            Pipe,
            PipePipe,
            PipeAssign,
            Smaller,
            SmallerEquals,
            Shl,
            ShlAssign,
            Greater,
            GreaterEquals,
            Shr,
            ShrAssign,
            Bang,
            BangEquals,
            Tilde,
            Comma,
            Semi,
        ];

        assert_eq!(expected, kinds(code));
    }

    #[test]
    fn test_operators_are_scanned_with_maximal_munch() {
        use TokenKind::*;

        assert_eq!(vec![ShlAssign, Assign], kinds("<<=="));
        assert_eq!(vec![Shr, Greater], kinds(">>>"));
        assert_eq!(vec![AmpersandAmpersand, Ampersand], kinds("&&&"));
        assert_eq!(vec![Int, Ident, Semi], kinds("12ab"));
    }

    #[test]
    fn test_keywords_need_an_exact_match() {
        use TokenKind::*;

        assert_eq!(
            vec![tok(Let, "let"), tok(Ident, "lets"), tok(Ident, "_if"), tok(Semi, "")],
            tokens("let lets _if")
        );
    }

    #[test]
    fn test_scan_illegal_char_should_return_illegal_token() {
        let source = Source::new("main", "a @ b");
        let lexer = Lexer::new(&source);

        let tokens: Vec<Spanned<Token>> = lexer.collect();
        assert_eq!(
            vec![
                Spanned::new(0, 1, Token::new(TokenKind::Ident, "a")),
                Spanned::new(2, 3, Token::new(TokenKind::Illegal, "@")),
                Spanned::new(4, 5, Token::new(TokenKind::Ident, "b")),
                Spanned::new(5, 5, Token::new(TokenKind::Semi, "")),
            ],
            tokens
        );
    }

    #[test]
    fn test_non_ascii_char_is_one_illegal_token() {
        let source = Source::new("main", "こ");
        let mut lexer = Lexer::new(&source);

        assert_eq!(
            Spanned::new(0, 'こ'.len_utf8(), Token::new(TokenKind::Illegal, "こ")),
            lexer.next_token()
        );
        assert_eq!(TokenKind::Eof, lexer.next_token().node.kind);
    }

    #[test]
    fn test_double_slash_is_two_operators() {
        use TokenKind::*;

        assert_eq!(
            vec![
                tok(Ident, "a"),
                tok(Slash, "/"),
                tok(Slash, "/"),
                tok(Ident, "b"),
                tok(Semi, ""),
            ],
            tokens("a // b")
        );
        assert_eq!(
            vec![
                tok(Ident, "x"),
                tok(Assign, "="),
                tok(Int, "8"),
                tok(Slash, "/"),
                tok(SlashAssign, "/="),
                tok(Int, "2"),
                tok(Semi, "\n"),
            ],
            tokens("x = 8 //= 2\n")
        );
    }

    #[test]
    fn test_read_while() {
        let source = Source::new("main", "hello1 world");
        let mut lexer = Lexer::new(&source);

        let slice = lexer.read_while(|c| c.is_alphabetic());
        assert_eq!("hello", slice);

        let source = Source::new("main", "こんにちは");
        let mut lexer = Lexer::new(&source);

        let slice = lexer.read_while(|c| c.is_alphabetic());
        assert_eq!("こんにちは", slice);
    }
}
