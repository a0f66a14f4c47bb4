//! Parser for dotted path expressions.

use super::QueryError;
use std::fmt;

/// Step is one navigation step of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Field access, `.name` or `."quoted name"`. Purely numeric names also
    /// index into lists.
    Field(String),
    /// Bracketed index, `[2]` or `[-1]`.
    Index(i64),
}

/// Expression is a parsed query: a sequence of steps from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expression {
    steps: Vec<Step>,
}

impl Expression {
    /// Parses an expression.
    pub fn parse(input: &str) -> Result<Expression, QueryError> {
        Parser::new(input).parse()
    }

    /// Returns the steps of the expression.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the expression has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromIterator<Step> for Expression {
    fn from_iter<T: IntoIterator<Item = Step>>(iter: T) -> Self {
        Expression {
            steps: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    if is_bare_identifier(name) {
                        f.write_str(name)?;
                    } else {
                        write!(f, "{:?}", name)?;
                    }
                }
                Step::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_bare_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_identifier_char)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), QueryError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(QueryError::syntax(
                self.pos - c.len_utf8(),
                format!("expected '{}', found '{}'", want, c),
            )),
            None => Err(QueryError::syntax(
                self.pos,
                format!("expected '{}', found end of expression", want),
            )),
        }
    }

    fn parse(mut self) -> Result<Expression, QueryError> {
        let mut steps = Vec::new();

        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(QueryError::syntax(0, "empty expression"));
        }

        match self.peek() {
            Some('[') => steps.push(self.parse_index()?),
            _ => steps.push(self.parse_field()?),
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('.') => {
                    self.bump();
                    self.skip_whitespace();
                    steps.push(self.parse_field()?);
                }
                Some('[') => steps.push(self.parse_index()?),
                Some(c) => {
                    return Err(QueryError::syntax(
                        self.pos,
                        format!("unexpected character '{}'", c),
                    ))
                }
            }
        }

        Ok(Expression { steps })
    }

    fn parse_field(&mut self) -> Result<Step, QueryError> {
        match self.peek() {
            Some('"') => self.parse_quoted().map(Step::Field),
            Some(c) if is_identifier_char(c) => {
                let start = self.pos;
                while matches!(self.peek(), Some(c) if is_identifier_char(c)) {
                    self.bump();
                }
                Ok(Step::Field(self.input[start..self.pos].to_string()))
            }
            Some(c) => Err(QueryError::syntax(
                self.pos,
                format!("expected field name, found '{}'", c),
            )),
            None => Err(QueryError::syntax(
                self.pos,
                "expected field name, found end of expression",
            )),
        }
    }

    fn parse_quoted(&mut self) -> Result<String, QueryError> {
        let start = self.pos;
        self.expect('"')?;
        let mut name = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(name),
                Some('\\') => match self.bump() {
                    Some('"') => name.push('"'),
                    Some('\\') => name.push('\\'),
                    Some('/') => name.push('/'),
                    Some('n') => name.push('\n'),
                    Some('t') => name.push('\t'),
                    Some(c) => {
                        return Err(QueryError::syntax(
                            self.pos - c.len_utf8(),
                            format!("invalid escape '\\{}'", c),
                        ))
                    }
                    None => break,
                },
                Some(c) => name.push(c),
                None => break,
            }
        }
        Err(QueryError::syntax(start, "unterminated quoted identifier"))
    }

    fn parse_index(&mut self) -> Result<Step, QueryError> {
        let open = self.pos;
        self.expect('[')?;
        self.skip_whitespace();

        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        let literal = &self.input[start..self.pos];
        let index = literal.parse::<i64>().map_err(|_| {
            QueryError::syntax(start, format!("invalid array index '{}'", literal))
        })?;

        self.skip_whitespace();
        if self.peek().is_none() {
            return Err(QueryError::syntax(open, "unterminated '['"));
        }
        self.expect(']')?;
        Ok(Step::Index(index))
    }
}
