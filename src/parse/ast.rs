use std::fmt;

use super::token::TokenKind;

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Program<'src>(pub Vec<Stmt<'src>>);

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Stmt<'src> {
    Expr(Expr<'src>),
    Let {
        name: &'src str,
        value: Expr<'src>,
    },
    Return(Option<Expr<'src>>),
    Break(Option<Expr<'src>>),
    Continue,
    Block(Block<'src>),
    If(If<'src>),
    While(While<'src>),
    FuncDecl {
        name: &'src str,
        func: Function<'src>,
    },
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Block<'src>(pub Vec<Stmt<'src>>);

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct ParamList<'src>(pub Vec<&'src str>);

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Function<'src> {
    pub params: ParamList<'src>,
    pub body: Block<'src>,
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct If<'src> {
    pub condition: Box<Expr<'src>>,
    pub then_block: Block<'src>,
    pub else_branch: Option<Else<'src>>,
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Else<'src> {
    Block(Block<'src>),
    If(Box<If<'src>>),
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct While<'src> {
    pub condition: Box<Expr<'src>>,
    pub body: Block<'src>,
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Expr<'src> {
    Ident(&'src str),
    IntLit(&'src str),
    Unary(TokenKind, Box<Expr<'src>>),
    Binary(Box<Expr<'src>>, TokenKind, Box<Expr<'src>>),
    Call {
        callee: Box<Expr<'src>>,
        args: Vec<Expr<'src>>,
    },
    Block(Block<'src>),
    If(If<'src>),
    While(While<'src>),
    Func(Function<'src>),
}

impl<'src> Expr<'src> {
    /// The expression whose text comes first when this one is rendered.
    fn leftmost(&self) -> &Expr<'src> {
        match self {
            Expr::Call { callee, .. } => callee.leftmost(),
            expr => expr,
        }
    }

    /// Whether the rendered text would be read back as a statement of its own
    /// when it starts a line.
    fn looks_like_stmt(&self) -> bool {
        match self.leftmost() {
            Expr::Block(_) | Expr::If(_) | Expr::While(_) => true,
            _ => false,
        }
    }
}

fn join<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join(sep)
}

impl<'src> fmt::Display for Program<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", join(&self.0, "\n"))
    }
}

impl<'src> fmt::Display for Block<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "{{ }}")
        } else {
            write!(f, "{{ {} }}", join(&self.0, " "))
        }
    }
}

impl<'src> fmt::Display for ParamList<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

impl<'src> fmt::Display for If<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "if {} {}", self.condition, self.then_block)?;
        match &self.else_branch {
            Some(Else::Block(block)) => write!(f, " else {}", block),
            Some(Else::If(elif)) => write!(f, " else {}", elif),
            None => Ok(()),
        }
    }
}

impl<'src> fmt::Display for While<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "while {} {}", self.condition, self.body)
    }
}

impl<'src> fmt::Display for Stmt<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stmt::Expr(expr) if expr.looks_like_stmt() => write!(f, "({});", expr),
            Stmt::Expr(expr) => write!(f, "{};", expr),
            Stmt::Let { name, value } => write!(f, "let {} = {};", name, value),
            Stmt::Return(Some(value)) => write!(f, "return {};", value),
            Stmt::Return(None) => write!(f, "return;"),
            Stmt::Break(Some(value)) => write!(f, "break {};", value),
            Stmt::Break(None) => write!(f, "break;"),
            Stmt::Continue => write!(f, "continue;"),
            Stmt::Block(block) => write!(f, "{};", block),
            Stmt::If(stmt) => write!(f, "{};", stmt),
            Stmt::While(stmt) => write!(f, "{};", stmt),
            Stmt::FuncDecl { name, func } => write!(f, "func {}{} {};", name, func.params, func.body),
        }
    }
}

impl<'src> fmt::Display for Expr<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::IntLit(lit) => write!(f, "{}", lit),
            Expr::Unary(op, expr) => write!(f, "({}{})", op.as_str(), expr),
            Expr::Binary(l, op, r) => write!(f, "({} {} {})", l, op.as_str(), r),
            Expr::Call { callee, args } => write!(f, "{}({})", callee, join(args, ", ")),
            Expr::Block(block) => write!(f, "{}", block),
            Expr::If(expr) => write!(f, "{}", expr),
            Expr::While(expr) => write!(f, "{}", expr),
            Expr::Func(func) => write!(f, "func{} {}", func.params, func.body),
        }
    }
}
