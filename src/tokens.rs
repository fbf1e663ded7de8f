//! In-memory token source.
//!
//! [`Tokens`] replays a list of already tokenized navigation events. It is the reference
//! implementation of [`TokenSource`] and a convenient way to drive a [`crate::Reader`] from a
//! [`serde_json::Value`]:
//!
//! ```
//! use objread::{Reader, tokens::{Token, Tokens}};
//! use serde_json::json;
//!
//! let tokens = Tokens::from(&json!({"id": 7}));
//! assert_eq!(
//!     tokens.remaining(),
//!     &[
//!         Token::StartObject,
//!         Token::Key("id".to_owned()),
//!         Token::Int(7),
//!         Token::EndObject,
//!     ]
//! );
//!
//! let mut reader = Reader::new(tokens);
//! assert!(reader.read_start_object().unwrap());
//! ```
//!
//! Token lists can also be stored as JSON, each token is tagged by its `type`:
//! `{"type":"key","value":"id"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, TokenSource, ValueType};

/// A single navigation token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Token {
    StartObject,
    /// Key of the member whose value follows.
    Key(String),
    EndObject,
    StartArray,
    EndArray,
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned integer too large for `Int`.
    #[serde(rename = "uint")]
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl Token {
    /// Short description used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::StartObject => "start of object",
            Token::Key(_) => "member key",
            Token::EndObject => "end of object",
            Token::StartArray => "start of array",
            Token::EndArray => "end of array",
            Token::Null => "null",
            Token::Bool(_) => "boolean",
            Token::Int(_) | Token::UInt(_) => "integer",
            Token::Float(_) => "float",
            Token::Str(_) => "string",
            Token::Bytes(_) => "bytes",
        }
    }

    /// Returns whether the token is a complete scalar value, including null.
    pub fn is_primitive(&self) -> bool {
        !matches!(
            self,
            Token::StartObject
                | Token::Key(_)
                | Token::EndObject
                | Token::StartArray
                | Token::EndArray
        )
    }
}

/// A token source replaying a list of [`Token`]s.
#[derive(Clone, Debug, Default)]
pub struct Tokens {
    tokens: Vec<Token>,
    position: usize,
}

impl Tokens {
    /// Creates a token source positioned on the first token.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses JSON text with `serde_json` and tokenizes the resulting value.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from(&value))
    }

    /// Index of the next token to be consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Tokens that have not been consumed yet.
    pub fn remaining(&self) -> &[Token] {
        self.tokens.get(self.position..).unwrap_or_default()
    }

    /// Returns whether every token was consumed.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn peek(&self) -> Result<&Token, Error> {
        self.tokens.get(self.position).ok_or(Error::UnexpectedEnd)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn read_integer<T>(&mut self, target: &'static str) -> Result<T, Error>
    where
        T: TryFrom<i64> + TryFrom<u64>,
    {
        let value = match *self.peek()? {
            Token::Int(v) => <T as TryFrom<i64>>::try_from(v).map_err(|_| out_of_range(target, v)),
            Token::UInt(v) => <T as TryFrom<u64>>::try_from(v).map_err(|_| out_of_range(target, v)),
            ref other => Err(unexpected("integer", other)),
        }?;

        self.advance();
        Ok(value)
    }
}

fn unexpected(expected: &'static str, found: &Token) -> Error {
    Error::UnexpectedToken {
        expected,
        found: found.kind(),
    }
}

fn out_of_range<V: ToString>(target: &'static str, value: V) -> Error {
    Error::NumberOutOfRange {
        target,
        value: value.to_string(),
    }
}

fn check_quota(quota: usize, len: usize) -> Result<(), Error> {
    if len > quota {
        return Err(Error::QuotaExceeded { quota, len });
    }
    Ok(())
}

impl TokenSource for Tokens {
    type Key = String;

    fn read_start_object_token(&mut self) -> Result<bool, Error> {
        let started = match self.peek()? {
            Token::StartObject => true,
            Token::Null => false,
            other => return Err(unexpected("start of object or null", other)),
        };
        self.advance();
        Ok(started)
    }

    fn read_next_member_key(&mut self) -> Result<Option<String>, Error> {
        let key = match self.peek()? {
            Token::Key(key) => key.clone(),
            Token::EndObject => return Ok(None),
            other => return Err(unexpected("member key or end of object", other)),
        };
        self.advance();
        Ok(Some(key))
    }

    fn read_end_object_token(&mut self) -> Result<(), Error> {
        match self.peek()? {
            Token::EndObject => {
                self.advance();
                Ok(())
            }
            other => Err(unexpected("end of object", other)),
        }
    }

    fn read_start_array_token(&mut self) -> Result<bool, Error> {
        let started = match self.peek()? {
            Token::StartArray => true,
            Token::Null => false,
            other => return Err(unexpected("start of array or null", other)),
        };
        self.advance();
        Ok(started)
    }

    fn read_to_next_array_value(&mut self) -> Result<bool, Error> {
        match self.peek()? {
            Token::EndArray => Ok(false),
            other @ (Token::Key(_) | Token::EndObject) => {
                Err(unexpected("array value or end of array", other))
            }
            _ => Ok(true),
        }
    }

    fn read_end_array_token(&mut self) -> Result<(), Error> {
        match self.peek()? {
            Token::EndArray => {
                self.advance();
                Ok(())
            }
            other => Err(unexpected("end of array", other)),
        }
    }

    fn read_bool(&mut self) -> Result<bool, Error> {
        let value = match *self.peek()? {
            Token::Bool(value) => value,
            ref other => return Err(unexpected("boolean", other)),
        };
        self.advance();
        Ok(value)
    }

    fn read_i32(&mut self) -> Result<i32, Error> {
        self.read_integer("i32")
    }

    fn read_u32(&mut self) -> Result<u32, Error> {
        self.read_integer("u32")
    }

    fn read_i64(&mut self) -> Result<i64, Error> {
        self.read_integer("i64")
    }

    fn read_u64(&mut self) -> Result<u64, Error> {
        self.read_integer("u64")
    }

    fn read_f32(&mut self) -> Result<f32, Error> {
        let value = self.read_f64()?;
        let narrowed = value as f32;
        if value.is_finite() && narrowed.is_infinite() {
            return Err(out_of_range("f32", value));
        }
        Ok(narrowed)
    }

    fn read_f64(&mut self) -> Result<f64, Error> {
        let value = match *self.peek()? {
            Token::Float(v) => v,
            Token::Int(v) => v as f64,
            Token::UInt(v) => v as f64,
            ref other => return Err(unexpected("number", other)),
        };
        self.advance();
        Ok(value)
    }

    fn read_bytes(&mut self, quota: usize) -> Result<Vec<u8>, Error> {
        let bytes = match self.peek()? {
            Token::Bytes(bytes) => {
                check_quota(quota, bytes.len())?;
                bytes.clone()
            }
            other => return Err(unexpected("bytes", other)),
        };
        self.advance();
        Ok(bytes)
    }

    fn read_string(&mut self, quota: usize) -> Result<String, Error> {
        let string = match self.peek()? {
            Token::Str(string) => {
                check_quota(quota, string.len())?;
                string.clone()
            }
            other => return Err(unexpected("string", other)),
        };
        self.advance();
        Ok(string)
    }

    fn peek_value_type(&mut self) -> Result<ValueType, Error> {
        match self.peek()? {
            Token::StartObject => Ok(ValueType::Object),
            Token::StartArray => Ok(ValueType::Array),
            token if token.is_primitive() => Ok(ValueType::Primitive),
            other => Err(unexpected("value", other)),
        }
    }

    fn skip_primitive_value(&mut self) -> Result<(), Error> {
        match self.peek()? {
            token if token.is_primitive() => {
                self.advance();
                Ok(())
            }
            other => Err(unexpected("primitive value", other)),
        }
    }
}

impl From<Vec<Token>> for Tokens {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl FromIterator<Token> for Tokens {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<&Value> for Tokens {
    fn from(value: &Value) -> Self {
        let mut tokens = Vec::new();
        push_value(value, &mut tokens);
        Self::new(tokens)
    }
}

fn push_value(value: &Value, tokens: &mut Vec<Token>) {
    match value {
        Value::Null => tokens.push(Token::Null),
        Value::Bool(b) => tokens.push(Token::Bool(*b)),
        Value::Number(n) => tokens.push(if let Some(i) = n.as_i64() {
            Token::Int(i)
        } else if let Some(u) = n.as_u64() {
            Token::UInt(u)
        } else {
            Token::Float(n.as_f64().unwrap_or(f64::NAN))
        }),
        Value::String(s) => tokens.push(Token::Str(s.clone())),
        Value::Array(values) => {
            tokens.push(Token::StartArray);
            for value in values {
                push_value(value, tokens);
            }
            tokens.push(Token::EndArray);
        }
        Value::Object(members) => {
            tokens.push(Token::StartObject);
            for (key, value) in members {
                tokens.push(Token::Key(key.clone()));
                push_value(value, tokens);
            }
            tokens.push(Token::EndObject);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Token, Tokens};
    use crate::{Error, TokenSource, ValueType};

    #[test]
    fn test_from_json_value() {
        let value = json!({"a": [1, -2, 18446744073709551615u64, 1.5, null], "b": "x"});
        let tokens = Tokens::from(&value);

        assert_eq!(
            tokens.remaining(),
            &[
                Token::StartObject,
                Token::Key("a".to_owned()),
                Token::StartArray,
                Token::Int(1),
                Token::Int(-2),
                Token::UInt(u64::MAX),
                Token::Float(1.5),
                Token::Null,
                Token::EndArray,
                Token::Key("b".to_owned()),
                Token::Str("x".to_owned()),
                Token::EndObject,
            ]
        );
    }

    #[test]
    fn test_token_script_deserialization() {
        let script = r#"[
  {"type": "start_array"},
  {"type": "bytes", "value": [1, 2, 3]},
  {"type": "uint", "value": 7},
  {"type": "end_array"}
]"#;

        let tokens: Vec<Token> = serde_json::from_str(script).expect("should deserialize tokens");
        assert_eq!(
            tokens,
            vec![
                Token::StartArray,
                Token::Bytes(vec![1, 2, 3]),
                Token::UInt(7),
                Token::EndArray,
            ]
        );
    }

    #[test]
    fn test_string_quota() {
        let mut tokens = Tokens::new(vec![Token::Str("héllo".to_owned())]);

        // quota is measured in encoded bytes, "é" takes two
        let err = tokens.read_string(5).unwrap_err();
        assert!(matches!(err, Error::QuotaExceeded { quota: 5, len: 6 }));
        assert_eq!(tokens.position(), 0);

        assert_eq!(tokens.read_string(6).unwrap(), "héllo");
        assert!(tokens.is_exhausted());
    }

    #[test]
    fn test_bytes_quota() {
        let mut tokens = Tokens::new(vec![Token::Bytes(vec![0; 16])]);

        let err = tokens.read_bytes(15).unwrap_err();
        assert!(matches!(err, Error::QuotaExceeded { quota: 15, len: 16 }));
        assert_eq!(tokens.read_bytes(16).unwrap().len(), 16);
    }

    #[test]
    fn test_numeric_conversions() {
        let mut tokens: Tokens = [
            Token::Int(-1),
            Token::Int(2_147_483_648),
            Token::UInt(u64::MAX),
            Token::Int(3),
            Token::Float(0.25),
        ]
        .into_iter()
        .collect();

        assert_eq!(tokens.read_i32().unwrap(), -1);

        let err = tokens.read_i32().unwrap_err();
        assert_eq!(err.to_string(), "number 2147483648 does not fit into i32");
        assert_eq!(tokens.read_u32().unwrap(), 2_147_483_648);

        assert!(matches!(
            tokens.read_i64().unwrap_err(),
            Error::NumberOutOfRange { target: "i64", .. }
        ));
        assert_eq!(tokens.read_u64().unwrap(), u64::MAX);

        assert_eq!(tokens.read_f64().unwrap(), 3.0);
        assert_eq!(tokens.read_f32().unwrap(), 0.25);
    }

    #[test]
    fn test_f32_out_of_range() {
        let mut tokens = Tokens::new(vec![
            Token::Float(1e300),
            Token::Float(-1e300),
            Token::Float(f64::INFINITY),
        ]);

        let err = tokens.read_f32().unwrap_err();
        assert!(matches!(err, Error::NumberOutOfRange { target: "f32", .. }));
        let err = tokens.read_f32().unwrap_err();
        assert!(matches!(err, Error::NumberOutOfRange { target: "f32", .. }));
        assert_eq!(tokens.read_f32().unwrap(), f32::INFINITY);
    }

    #[test]
    fn test_null_is_null_object_and_array() {
        let mut tokens = Tokens::new(vec![Token::Null, Token::Null]);

        assert!(!tokens.read_start_object_token().unwrap());
        assert!(!tokens.read_start_array_token().unwrap());
        assert!(tokens.is_exhausted());
    }

    #[test]
    fn test_peek_value_type() {
        let mut tokens = Tokens::new(vec![
            Token::StartObject,
            Token::Key("k".to_owned()),
        ]);

        assert_eq!(tokens.peek_value_type().unwrap(), ValueType::Object);
        tokens.read_start_object_token().unwrap();

        let err = tokens.peek_value_type().unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedToken {
                expected: "value",
                found: "member key"
            }
        ));
    }

    #[test]
    fn test_unexpected_end() {
        let mut tokens = Tokens::default();
        assert!(matches!(tokens.read_bool(), Err(Error::UnexpectedEnd)));
    }
}
