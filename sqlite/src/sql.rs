//! Chunk-based SQL builder.
//!
//! Statements are assembled from [`Chunk`]s and rendered in one pass into
//! SQL text with positional `?` placeholders plus the ordered parameter list.

use core::fmt::Write;

use compact_str::CompactString;
use criteria_core::Value;
use smallvec::SmallVec;

use crate::Statement;

/// SQL keywords and punctuation.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    SELECT,
    FROM,
    WHERE,
    AS,
    LEFT,
    JOIN,
    ON,
    AND,
    OR,
    IS,
    NOT,
    NULL,
    IN,
    LIKE,
    BETWEEN,
    ORDER,
    BY,
    ASC,
    DESC,
    LIMIT,
    OFFSET,
    INSERT,
    INTO,
    VALUES,
    CONFLICT,
    DO,
    UPDATE,
    SET,
    NOTHING,
    DELETE,
    CREATE,
    TABLE,
    IF,
    EXISTS,
    PRIMARY,
    KEY,
    REFERENCES,
    LPAREN,
    RPAREN,
    COMMA,
    DOT,
    EQ,
    NE,
    LT,
    GT,
    LE,
    GE,
}

impl Token {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SELECT => "SELECT",
            Self::FROM => "FROM",
            Self::WHERE => "WHERE",
            Self::AS => "AS",
            Self::LEFT => "LEFT",
            Self::JOIN => "JOIN",
            Self::ON => "ON",
            Self::AND => "AND",
            Self::OR => "OR",
            Self::IS => "IS",
            Self::NOT => "NOT",
            Self::NULL => "NULL",
            Self::IN => "IN",
            Self::LIKE => "LIKE",
            Self::BETWEEN => "BETWEEN",
            Self::ORDER => "ORDER",
            Self::BY => "BY",
            Self::ASC => "ASC",
            Self::DESC => "DESC",
            Self::LIMIT => "LIMIT",
            Self::OFFSET => "OFFSET",
            Self::INSERT => "INSERT",
            Self::INTO => "INTO",
            Self::VALUES => "VALUES",
            Self::CONFLICT => "CONFLICT",
            Self::DO => "DO",
            Self::UPDATE => "UPDATE",
            Self::SET => "SET",
            Self::NOTHING => "NOTHING",
            Self::DELETE => "DELETE",
            Self::CREATE => "CREATE",
            Self::TABLE => "TABLE",
            Self::IF => "IF",
            Self::EXISTS => "EXISTS",
            Self::PRIMARY => "PRIMARY",
            Self::KEY => "KEY",
            Self::REFERENCES => "REFERENCES",
            Self::LPAREN => "(",
            Self::RPAREN => ")",
            Self::COMMA => ",",
            Self::DOT => ".",
            Self::EQ => "=",
            Self::NE => "<>",
            Self::LT => "<",
            Self::GT => ">",
            Self::LE => "<=",
            Self::GE => ">=",
        }
    }

    #[inline]
    pub const fn is_operator(self) -> bool {
        matches!(
            self,
            Self::EQ | Self::NE | Self::LT | Self::GT | Self::LE | Self::GE
        )
    }

    #[inline]
    const fn is_punctuation(self) -> bool {
        matches!(
            self,
            Self::LPAREN | Self::RPAREN | Self::COMMA | Self::DOT
        )
    }
}

/// One piece of a SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    Token(Token),
    /// Quoted identifier: `"name"`
    Ident(CompactString),
    /// Qualified column: `"table"."column"`
    Column {
        table: CompactString,
        column: &'static str,
    },
    /// Unquoted SQL text: literals, type names, functions
    Raw(CompactString),
    /// Positional `?` parameter
    Param(Value),
}

impl Chunk {
    fn write(&self, buf: &mut String) {
        match self {
            Chunk::Token(token) => buf.push_str(token.as_str()),
            Chunk::Ident(name) => {
                let _ = write!(buf, "\"{name}\"");
            }
            Chunk::Column { table, column } => {
                let _ = write!(buf, "\"{table}\".\"{column}\"");
            }
            Chunk::Raw(text) => buf.push_str(text),
            Chunk::Param(_) => buf.push('?'),
        }
    }

    #[inline]
    const fn is_word_like(&self) -> bool {
        match self {
            Chunk::Token(token) => !token.is_punctuation() && !token.is_operator(),
            Chunk::Ident(_) | Chunk::Column { .. } | Chunk::Raw(_) | Chunk::Param(_) => true,
        }
    }
}

impl From<Token> for Chunk {
    #[inline]
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

fn needs_space(current: &Chunk, next: &Chunk) -> bool {
    match (current, next) {
        (_, Chunk::Token(Token::RPAREN | Token::COMMA | Token::DOT)) => false,
        (Chunk::Token(Token::LPAREN | Token::DOT), _) => false,
        (Chunk::Token(Token::COMMA), _) => true,
        (Chunk::Token(Token::RPAREN), next) => next.is_word_like(),
        (current, Chunk::Token(Token::LPAREN)) => current.is_word_like(),
        (Chunk::Token(token), _) if token.is_operator() => true,
        (_, Chunk::Token(token)) if token.is_operator() => true,
        _ => current.is_word_like() && next.is_word_like(),
    }
}

/// A SQL fragment under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sql {
    pub chunks: SmallVec<[Chunk; 16]>,
}

impl Sql {
    pub const fn empty() -> Self {
        Self {
            chunks: SmallVec::new_const(),
        }
    }

    pub fn token(token: Token) -> Self {
        Self::empty().push(token)
    }

    pub fn ident(name: impl Into<CompactString>) -> Self {
        Self::empty().push(Chunk::Ident(name.into()))
    }

    pub fn column(table: impl Into<CompactString>, column: &'static str) -> Self {
        Self::empty().push(Chunk::Column {
            table: table.into(),
            column,
        })
    }

    pub fn raw(text: impl Into<CompactString>) -> Self {
        Self::empty().push(Chunk::Raw(text.into()))
    }

    pub fn param(value: impl Into<Value>) -> Self {
        Self::empty().push(Chunk::Param(value.into()))
    }

    #[inline]
    pub fn push(mut self, chunk: impl Into<Chunk>) -> Self {
        self.chunks.push(chunk.into());
        self
    }

    #[inline]
    pub fn append(mut self, other: Sql) -> Self {
        self.chunks.extend(other.chunks);
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn parens(self) -> Self {
        Self::token(Token::LPAREN).append(self).push(Token::RPAREN)
    }

    /// Joins fragments with a separator token.
    pub fn join(parts: impl IntoIterator<Item = Sql>, separator: Token) -> Self {
        let mut out = Self::empty();
        for (index, part) in parts.into_iter().enumerate() {
            if index > 0 {
                out = out.push(separator);
            }
            out = out.append(part);
        }
        out
    }

    /// Renders SQL text and collects parameters in a single pass.
    pub fn build(self) -> Statement {
        let mut sql = String::with_capacity(self.chunks.len().saturating_mul(8).max(64));
        let mut params = Vec::new();

        for (index, chunk) in self.chunks.iter().enumerate() {
            chunk.write(&mut sql);
            if let Chunk::Param(value) = chunk {
                params.push(value.clone());
            }
            if let Some(next) = self.chunks.get(index + 1) {
                if needs_space(chunk, next) {
                    sql.push(' ');
                }
            }
        }

        Statement { sql, params }
    }
}

impl From<Token> for Sql {
    fn from(token: Token) -> Self {
        Self::token(token)
    }
}
