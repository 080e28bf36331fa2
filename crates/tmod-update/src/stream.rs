//! Token streams over structured payloads
//!
//! Readers walk payloads through the [`TokenStream`] trait instead of a
//! concrete parser. [`TokenBuffer`] is the stock implementation, tokenizing a
//! `serde_json::Value` up front.
//!
//! # Positioning
//!
//! A reader handed a stream positioned on a value leaves it positioned on the
//! *last* token of that value: the scalar itself, or the matching end token of
//! an object or array. The caller then advances to whatever follows.

use crate::error::ReadError;
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// Kind of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    String,
    Number,
    Bool,
    Null,
}

impl TokenKind {
    /// Check if token opens a container
    #[inline]
    #[must_use]
    pub fn is_start(self) -> bool {
        matches!(self, Self::StartObject | Self::StartArray)
    }

    /// Check if token closes a container
    #[inline]
    #[must_use]
    pub fn is_end(self) -> bool {
        matches!(self, Self::EndObject | Self::EndArray)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::StartObject => "start of object",
            Self::EndObject => "end of object",
            Self::StartArray => "start of array",
            Self::EndArray => "end of array",
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "boolean",
            Self::Null => "null",
        };
        f.write_str(s)
    }
}

/// Cursor over a stream of tokens
///
/// # Contract
/// - `nesting()` counts the containers *enclosing* the current token, so a
///   start token and its matching end token report the same nesting
/// - `current_name()` is the object key the current token is the value of,
///   `None` for array elements, end tokens and the root
/// - After `advance()` returns `None` the stream is exhausted
pub trait TokenStream {
    /// Kind of the current token
    fn current_kind(&self) -> Option<TokenKind>;

    /// Object key of the current token
    fn current_name(&self) -> Option<&str>;

    /// Text of a scalar token (strings, numbers, booleans)
    fn current_text(&self) -> Option<&str>;

    /// Value of a number token
    fn current_number(&self) -> Option<f64>;

    /// Move to the next token
    fn advance(&mut self) -> Option<TokenKind>;

    /// Enclosing container depth of the current token
    fn nesting(&self) -> usize;
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    name: Option<String>,
    text: Option<String>,
    number: Option<f64>,
    nesting: usize,
}

/// Pre-tokenized, owned token stream
///
/// Positioned on the first token after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenBuffer {
    /// Tokenize a JSON value
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let mut tokens = Vec::new();
        tokenize(value, None, 0, &mut tokens);
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse and tokenize JSON text
    ///
    /// # Errors
    /// Returns error if `json` is not valid JSON
    pub fn from_json(json: &str) -> Result<Self, ReadError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    /// Total number of tokens
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if buffer holds no tokens
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }
}

fn tokenize(value: &Value, name: Option<&str>, nesting: usize, out: &mut Vec<Token>) {
    let token = |kind, text: Option<String>, number| Token {
        kind,
        name: name.map(str::to_string),
        text,
        number,
        nesting,
    };

    match value {
        Value::Object(map) => {
            out.push(token(TokenKind::StartObject, None, None));
            for (key, child) in map {
                tokenize(child, Some(key.as_str()), nesting + 1, out);
            }
            out.push(end_token(TokenKind::EndObject, nesting));
        }
        Value::Array(items) => {
            out.push(token(TokenKind::StartArray, None, None));
            for item in items {
                tokenize(item, None, nesting + 1, out);
            }
            out.push(end_token(TokenKind::EndArray, nesting));
        }
        Value::String(s) => out.push(token(TokenKind::String, Some(s.clone()), None)),
        Value::Number(n) => out.push(token(TokenKind::Number, Some(n.to_string()), n.as_f64())),
        Value::Bool(b) => out.push(token(TokenKind::Bool, Some(b.to_string()), None)),
        Value::Null => out.push(token(TokenKind::Null, None, None)),
    }
}

fn end_token(kind: TokenKind, nesting: usize) -> Token {
    Token {
        kind,
        name: None,
        text: None,
        number: None,
        nesting,
    }
}

impl TokenStream for TokenBuffer {
    fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    fn current_name(&self) -> Option<&str> {
        self.current().and_then(|t| t.name.as_deref())
    }

    fn current_text(&self) -> Option<&str> {
        self.current().and_then(|t| t.text.as_deref())
    }

    fn current_number(&self) -> Option<f64> {
        self.current().and_then(|t| t.number)
    }

    fn advance(&mut self) -> Option<TokenKind> {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        self.current_kind()
    }

    fn nesting(&self) -> usize {
        self.current().map_or(0, |t| t.nesting)
    }
}

/// Walks the keys of one object, in stream order
///
/// Keeps reading `(key, value)` pairs until the stream's nesting returns to
/// the object's own level.
///
/// ```rust
/// use tmod_update::stream::{ObjectFields, TokenBuffer, TokenStream, skip_value};
///
/// let mut stream = TokenBuffer::from_json(r#"{"a": 1, "b": [2, 3]}"#)?;
/// let fields = ObjectFields::enter(&stream)?;
/// let mut keys = Vec::new();
/// while let Some(key) = fields.next_field(&mut stream)? {
///     keys.push(key);
///     skip_value(&mut stream)?;
/// }
/// assert_eq!(keys, ["a", "b"]);
/// # Ok::<(), tmod_update::ReadError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ObjectFields {
    nesting: usize,
}

impl ObjectFields {
    /// Start walking the object the stream is positioned on
    ///
    /// # Errors
    /// Returns error if the current token is not the start of an object
    pub fn enter(stream: &(impl TokenStream + ?Sized)) -> Result<Self, ReadError> {
        match stream.current_kind() {
            Some(TokenKind::StartObject) => Ok(Self {
                nesting: stream.nesting(),
            }),
            other => Err(ReadError::unexpected("start of object", other)),
        }
    }

    /// Advance to the next key's value
    ///
    /// Returns the key, or `None` once the object's end token is reached.
    /// The previous value must have been fully consumed.
    ///
    /// # Errors
    /// Returns error if the stream ends before the object does
    pub fn next_field(
        &self,
        stream: &mut (impl TokenStream + ?Sized),
    ) -> Result<Option<String>, ReadError> {
        match stream.advance() {
            None => Err(ReadError::UnexpectedEnd),
            Some(TokenKind::EndObject) if stream.nesting() == self.nesting => Ok(None),
            Some(kind) => stream
                .current_name()
                .map(|name| Some(name.to_string()))
                .ok_or_else(|| ReadError::unexpected("object key", Some(kind))),
        }
    }
}

/// Consume the value the stream is positioned on
///
/// # Errors
/// Returns error if the stream ends inside the value
pub fn skip_value(stream: &mut (impl TokenStream + ?Sized)) -> Result<(), ReadError> {
    let Some(kind) = stream.current_kind() else {
        return Err(ReadError::UnexpectedEnd);
    };
    if !kind.is_start() {
        return Ok(());
    }

    let nesting = stream.nesting();
    loop {
        match stream.advance() {
            None => return Err(ReadError::UnexpectedEnd),
            Some(k) if k.is_end() && stream.nesting() == nesting => return Ok(()),
            Some(_) => {}
        }
    }
}
