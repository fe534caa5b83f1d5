use std::mem;

use tracing::trace;

use super::{ast::*, error::SyntaxError, token::*, *};
use crate::Source;

pub type ParseResult<'src, T> = Result<T, Spanned<SyntaxError<'src>>>;
type ExprResult<'src> = ParseResult<'src, Expr<'src>>;
type StmtResult<'src> = ParseResult<'src, Stmt<'src>>;

pub struct Parser<'src, I>
where
    I: Scanner<'src>,
{
    pub(crate) source: &'src Source,
    scanner: I,
    current: Spanned<Token<'src>>,
}

impl<'src, I> Parser<'src, I>
where
    I: Scanner<'src>,
{
    pub fn new(mut scanner: I) -> Self {
        let source = scanner.source();
        let current = scanner.next_token();

        Parser {
            source,
            scanner,
            current,
        }
    }
}

impl<'src, I> Parser<'src, I>
where
    I: Scanner<'src>,
{
    /// Parses statements until the end of the input. The first syntax error
    /// aborts the whole parse.
    pub fn parse_program(&mut self) -> ParseResult<'src, Program<'src>> {
        let mut stmts = vec![];

        while !self.at(TokenKind::Eof) {
            stmts.push(self.statement()?);
        }

        Ok(Program(stmts))
    }

    fn statement(&mut self) -> StmtResult<'src> {
        let start = self.current.span.start;

        let stmt = match self.kind() {
            TokenKind::Let => self.let_stmt()?,
            TokenKind::Return => Stmt::Return(self.jump_value()?),
            TokenKind::Break => Stmt::Break(self.jump_value()?),
            TokenKind::Continue => {
                self.advance();
                self.terminator()?;
                Stmt::Continue
            }
            TokenKind::Func => self.func_stmt()?,
            TokenKind::LBrace => {
                let block = self.block()?;
                self.skip_terminator();
                Stmt::Block(block)
            }
            TokenKind::If => {
                let stmt = self.if_node()?;
                self.skip_terminator();
                Stmt::If(stmt)
            }
            TokenKind::While => {
                let stmt = self.while_node()?;
                self.skip_terminator();
                Stmt::While(stmt)
            }
            _ => {
                let expr = self.expression()?;
                self.terminator()?;
                Stmt::Expr(expr)
            }
        };

        trace!("statement at {}: {}", start, stmt);
        Ok(stmt)
    }

    fn let_stmt(&mut self) -> StmtResult<'src> {
        self.consume(TokenKind::Let)?;
        let name = self.consume_ident()?;
        self.consume(TokenKind::Assign)?;
        let value = self.expression()?;
        self.terminator()?;

        Ok(Stmt::Let { name, value })
    }

    /// The optional operand of `return` and `break`.
    fn jump_value(&mut self) -> ParseResult<'src, Option<Expr<'src>>> {
        self.advance();

        if self.at(TokenKind::Semi) {
            self.advance();
            return Ok(None);
        }

        let value = self.expression()?;
        self.terminator()?;
        Ok(Some(value))
    }

    /// `func name(..) { .. }` declares a function, `func(..) { .. }` starts an
    /// expression statement with a function literal.
    fn func_stmt(&mut self) -> StmtResult<'src> {
        self.consume(TokenKind::Func)?;

        if self.at(TokenKind::LParen) {
            let literal = Expr::Func(self.function()?);
            let expr = self.infix_loop(literal, Precedence::None)?;
            self.terminator()?;
            return Ok(Stmt::Expr(expr));
        }

        let name = self.consume_ident()?;
        let func = self.function()?;
        self.skip_terminator();

        Ok(Stmt::FuncDecl { name, func })
    }

    fn function(&mut self) -> ParseResult<'src, Function<'src>> {
        let params = self.param_list()?;
        let body = self.block()?;

        Ok(Function { params, body })
    }

    fn param_list(&mut self) -> ParseResult<'src, ParamList<'src>> {
        self.consume(TokenKind::LParen)?;
        let mut params = vec![];

        while !self.at(TokenKind::RParen) {
            params.push(self.consume_ident()?);

            if !self.at(TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.consume(TokenKind::RParen)?;

        Ok(ParamList(params))
    }

    fn block(&mut self) -> ParseResult<'src, Block<'src>> {
        self.consume(TokenKind::LBrace)?;
        let mut stmts = vec![];

        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            stmts.push(self.statement()?);
        }
        self.consume(TokenKind::RBrace)?;

        Ok(Block(stmts))
    }

    fn if_node(&mut self) -> ParseResult<'src, If<'src>> {
        self.consume(TokenKind::If)?;
        let condition = Box::new(self.expression()?);
        let then_block = self.block()?;

        let else_branch = if self.at(TokenKind::Else) {
            self.advance();
            if self.at(TokenKind::If) {
                Some(Else::If(Box::new(self.if_node()?)))
            } else {
                Some(Else::Block(self.block()?))
            }
        } else {
            None
        };

        Ok(If {
            condition,
            then_block,
            else_branch,
        })
    }

    fn while_node(&mut self) -> ParseResult<'src, While<'src>> {
        self.consume(TokenKind::While)?;
        let condition = Box::new(self.expression()?);
        let body = self.block()?;

        Ok(While { condition, body })
    }

    pub fn expression(&mut self) -> ExprResult<'src> {
        self.parse_expression(Precedence::None)
    }

    fn parse_expression(&mut self, precedence: Precedence) -> ExprResult<'src> {
        let left = self.prefix()?;
        self.infix_loop(left, precedence)
    }

    fn infix_loop(&mut self, mut left: Expr<'src>, precedence: Precedence) -> ExprResult<'src> {
        while !self.at_expr_end() && self.kind().precedence() > precedence {
            left = self.infix(left)?;
        }

        Ok(left)
    }

    fn prefix(&mut self) -> ExprResult<'src> {
        let token = self.current.node;

        match token.kind {
            TokenKind::Ident => {
                self.advance();
                Ok(Expr::Ident(token.literal))
            }
            TokenKind::Int => {
                self.advance();
                Ok(Expr::IntLit(token.literal))
            }
            TokenKind::Minus | TokenKind::Bang | TokenKind::Tilde => {
                self.advance();
                let operand = self.parse_expression(Precedence::Prefix)?;
                Ok(Expr::Unary(token.kind, Box::new(operand)))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBrace => Ok(Expr::Block(self.block()?)),
            TokenKind::If => Ok(Expr::If(self.if_node()?)),
            TokenKind::While => Ok(Expr::While(self.while_node()?)),
            TokenKind::Func => {
                self.advance();
                Ok(Expr::Func(self.function()?))
            }
            _ => Err(self.make_prefix_err()),
        }
    }

    fn infix(&mut self, left: Expr<'src>) -> ExprResult<'src> {
        use TokenKind::*;

        let op = self.kind();
        match op {
            LParen => {
                self.advance();
                let args = self.call_args()?;
                Ok(Expr::Call {
                    callee: Box::new(left),
                    args,
                })
            }
            Assign | PlusAssign | MinusAssign | StarAssign | SlashAssign | PercentAssign
            | AmpersandAssign | PipeAssign | CaretAssign | ShlAssign | ShrAssign | PipePipe
            | AmpersandAmpersand | Caret | Pipe | Ampersand | EqualsEquals | BangEquals
            | Smaller | SmallerEquals | Greater | GreaterEquals | Shl | Shr | Plus | Minus
            | Star | Slash | Percent => {
                self.advance();
                // assignment takes everything to its right, all other
                // operators stop at their own level
                let floor = if op.is_right_assoc() {
                    Precedence::None
                } else {
                    op.precedence()
                };
                let right = self.parse_expression(floor)?;
                Ok(Expr::Binary(Box::new(left), op, Box::new(right)))
            }
            _ => Err(self.make_internal_err("token has a precedence but no infix rule")),
        }
    }

    fn call_args(&mut self) -> ParseResult<'src, Vec<Expr<'src>>> {
        let mut args = vec![];

        while !self.at(TokenKind::RParen) {
            args.push(self.expression()?);

            if !self.at(TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.consume(TokenKind::RParen)?;

        Ok(args)
    }

    fn kind(&self) -> TokenKind {
        self.current.node.kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    /// Tokens that close the expression being parsed for an enclosing construct.
    fn at_expr_end(&self) -> bool {
        match self.kind() {
            TokenKind::Semi
            | TokenKind::Eof
            | TokenKind::RParen
            | TokenKind::RBrace
            | TokenKind::Comma => true,
            _ => false,
        }
    }

    fn advance(&mut self) -> Spanned<Token<'src>> {
        let next = self.scanner.next_token();
        mem::replace(&mut self.current, next)
    }

    fn consume(&mut self, expected: TokenKind) -> ParseResult<'src, Spanned<Token<'src>>> {
        if self.at(expected) {
            Ok(self.advance())
        } else {
            Err(self.make_consume_err(expected))
        }
    }

    fn consume_ident(&mut self) -> ParseResult<'src, &'src str> {
        self.consume(TokenKind::Ident).map(|ident| ident.node.literal)
    }

    fn terminator(&mut self) -> ParseResult<'src, ()> {
        self.consume(TokenKind::Semi).map(|_| ())
    }

    /// Statements ending in a block may be followed by a terminator, which the
    /// lexer inserts whenever the closing brace ends a line.
    fn skip_terminator(&mut self) {
        if self.at(TokenKind::Semi) {
            self.advance();
        }
    }

    fn make_prefix_err(&self) -> Spanned<SyntaxError<'src>> {
        Spanned::from_span(
            self.current.span,
            SyntaxError::Prefix {
                actual: self.current.node,
            },
        )
    }

    fn make_consume_err(&self, expected: TokenKind) -> Spanned<SyntaxError<'src>> {
        Spanned::from_span(
            self.current.span,
            SyntaxError::Consume {
                expected,
                actual: self.current.node,
            },
        )
    }

    fn make_internal_err(&self, cause: &'static str) -> Spanned<SyntaxError<'src>> {
        Spanned::from_span(self.current.span, SyntaxError::Internal(cause))
    }
}
