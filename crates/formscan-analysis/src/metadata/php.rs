//! Decoder for PHP's native `serialize()` format.
//!
//! Produces a `serde_json::Value` so serialized builder data and JSON builder
//! data share one tree type. Lists with sequential integer keys become arrays;
//! every other array or object becomes a map with string keys.

use serde_json::{Map, Number, Value};

/// Upper bound on nodes materialized by reference expansion.
const REFERENCE_NODE_BUDGET: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhpErrorKind {
    Syntax(String),
    Depth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhpError {
    pub offset: usize,
    pub kind: PhpErrorKind,
}

impl PhpError {
    fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            kind: PhpErrorKind::Syntax(message.into()),
        }
    }
}

/// Whether `text` starts with a serialized-value type prefix.
pub fn looks_serialized(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes {
        [b'N', b';', ..] => true,
        [b'a' | b'O' | b's' | b'i' | b'b' | b'd', b':', ..] => true,
        _ => false,
    }
}

/// Decode one serialized value. Trailing non-whitespace data is an error.
pub fn unserialize(text: &str, max_depth: usize) -> Result<Value, PhpError> {
    let mut parser = Parser {
        bytes: text.as_bytes(),
        pos: 0,
        slots: Vec::new(),
        max_depth,
        budget: REFERENCE_NODE_BUDGET,
    };
    let value = parser.value(0)?;
    parser.skip_whitespace();
    if parser.pos != parser.bytes.len() {
        return Err(PhpError::syntax(parser.pos, "trailing data after value"));
    }
    Ok(value)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    /// Decoded values in reference-numbering order. `None` while in progress.
    slots: Vec<Option<Value>>,
    max_depth: usize,
    budget: usize,
}

impl<'a> Parser<'a> {
    fn value(&mut self, depth: usize) -> Result<Value, PhpError> {
        if depth > self.max_depth {
            return Err(PhpError {
                offset: self.pos,
                kind: PhpErrorKind::Depth,
            });
        }
        let start = self.pos;
        let tag = self.next_byte()?;

        match tag {
            b'R' => {
                self.expect(b':')?;
                let index = self.unsigned(b';')?;
                self.reference(start, index)
            }
            b'r' => {
                self.expect(b':')?;
                let index = self.unsigned(b';')?;
                let value = self.reference(start, index)?;
                self.slots.push(Some(value.clone()));
                Ok(value)
            }
            _ => {
                let slot = self.slots.len();
                self.slots.push(None);
                let value = self.plain(tag, start, depth)?;
                self.slots[slot] = Some(value.clone());
                Ok(value)
            }
        }
    }

    fn plain(&mut self, tag: u8, start: usize, depth: usize) -> Result<Value, PhpError> {
        match tag {
            b'N' => {
                self.expect(b';')?;
                Ok(Value::Null)
            }
            b'b' => {
                self.expect(b':')?;
                match self.unsigned(b';')? {
                    0 => Ok(Value::Bool(false)),
                    1 => Ok(Value::Bool(true)),
                    other => Err(PhpError::syntax(start, format!("invalid boolean {other}"))),
                }
            }
            b'i' => {
                self.expect(b':')?;
                let raw = self.until(b';')?;
                raw.parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| PhpError::syntax(start, format!("invalid integer '{raw}'")))
            }
            b'd' => {
                self.expect(b':')?;
                let raw = self.until(b';')?;
                let float = match raw {
                    "INF" | "-INF" | "NAN" => return Ok(Value::Null),
                    _ => raw
                        .parse::<f64>()
                        .map_err(|_| PhpError::syntax(start, format!("invalid float '{raw}'")))?,
                };
                Ok(Number::from_f64(float).map_or(Value::Null, Value::Number))
            }
            b's' => {
                self.expect(b':')?;
                let text = self.string_body()?;
                self.expect(b';')?;
                Ok(Value::String(text))
            }
            b'a' => {
                self.expect(b':')?;
                let count = self.unsigned(b':')?;
                self.expect(b'{')?;
                let value = self.entries(count, depth, false)?;
                self.expect(b'}')?;
                Ok(value)
            }
            b'O' => {
                self.expect(b':')?;
                // Class name is irrelevant to form detection.
                let _class = self.string_body()?;
                self.expect(b':')?;
                let count = self.unsigned(b':')?;
                self.expect(b'{')?;
                let value = self.entries(count, depth, true)?;
                self.expect(b'}')?;
                Ok(value)
            }
            other => Err(PhpError::syntax(
                start,
                format!("unsupported type tag '{}'", other as char),
            )),
        }
    }

    fn entries(&mut self, count: usize, depth: usize, object: bool) -> Result<Value, PhpError> {
        let mut pairs: Vec<(Value, Value)> = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let key = self.key()?;
            let value = self.value(depth + 1)?;
            pairs.push((key, value));
        }

        let sequential = !object
            && pairs
                .iter()
                .enumerate()
                .all(|(i, (k, _))| k.as_i64() == Some(i as i64));
        if sequential {
            return Ok(Value::Array(pairs.into_iter().map(|(_, v)| v).collect()));
        }

        let mut map = Map::new();
        for (key, value) in pairs {
            let name = match key {
                Value::String(s) if object => property_name(&s).to_string(),
                Value::String(s) => s,
                other => other.to_string(),
            };
            map.insert(name, value);
        }
        Ok(Value::Object(map))
    }

    /// Array keys are integers or strings and never take a reference slot.
    fn key(&mut self) -> Result<Value, PhpError> {
        let start = self.pos;
        match self.next_byte()? {
            b'i' => {
                self.expect(b':')?;
                let raw = self.until(b';')?;
                raw.parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| PhpError::syntax(start, format!("invalid integer key '{raw}'")))
            }
            b's' => {
                self.expect(b':')?;
                let text = self.string_body()?;
                self.expect(b';')?;
                Ok(Value::String(text))
            }
            other => Err(PhpError::syntax(
                start,
                format!("invalid key type '{}'", other as char),
            )),
        }
    }

    fn reference(&mut self, start: usize, index: usize) -> Result<Value, PhpError> {
        let slot = index
            .checked_sub(1)
            .and_then(|i| self.slots.get(i))
            .ok_or_else(|| PhpError::syntax(start, format!("reference {index} out of range")))?;
        // A slot still being decoded means the reference closes a cycle.
        let Some(value) = slot else {
            return Ok(Value::Null);
        };
        let cost = node_count(value);
        if cost > self.budget {
            return Err(PhpError::syntax(start, "reference expansion limit exceeded"));
        }
        self.budget -= cost;
        Ok(value.clone())
    }

    /// `N:"...."` where N is the byte length.
    fn string_body(&mut self) -> Result<String, PhpError> {
        let len = self.unsigned(b':')?;
        self.expect(b'"')?;
        let start = self.pos;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| PhpError::syntax(start, "string length exceeds input"))?;
        let text = String::from_utf8_lossy(&self.bytes[start..end]).into_owned();
        self.pos = end;
        self.expect(b'"')?;
        Ok(text)
    }

    fn unsigned(&mut self, terminator: u8) -> Result<usize, PhpError> {
        let start = self.pos;
        let raw = self.until(terminator)?;
        raw.parse::<usize>()
            .map_err(|_| PhpError::syntax(start, format!("invalid length '{raw}'")))
    }

    /// Consume up to and including `terminator`, returning the text before it.
    fn until(&mut self, terminator: u8) -> Result<&'a str, PhpError> {
        let start = self.pos;
        let bytes: &'a [u8] = self.bytes;
        let rest = &bytes[start..];
        let len = rest
            .iter()
            .position(|b| *b == terminator)
            .ok_or_else(|| {
                PhpError::syntax(start, format!("expected '{}'", terminator as char))
            })?;
        self.pos = start + len + 1;
        std::str::from_utf8(&rest[..len])
            .map_err(|_| PhpError::syntax(start, "invalid UTF-8 in scalar"))
    }

    fn expect(&mut self, byte: u8) -> Result<(), PhpError> {
        match self.bytes.get(self.pos) {
            Some(b) if *b == byte => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(PhpError::syntax(
                self.pos,
                format!("expected '{}'", byte as char),
            )),
        }
    }

    fn next_byte(&mut self) -> Result<u8, PhpError> {
        let byte = self
            .bytes
            .get(self.pos)
            .copied()
            .ok_or_else(|| PhpError::syntax(self.pos, "unexpected end of input"))?;
        self.pos += 1;
        Ok(byte)
    }

    fn skip_whitespace(&mut self) {
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
    }
}

/// Strip the visibility prefix of private (`\0Class\0name`) and protected
/// (`\0*\0name`) property names.
fn property_name(raw: &str) -> &str {
    match raw.strip_prefix('\0') {
        Some(rest) => rest.split_once('\0').map_or(rest, |(_, name)| name),
        None => raw,
    }
}

fn node_count(value: &Value) -> usize {
    let mut count = 0;
    let mut stack = vec![value];
    while let Some(node) = stack.pop() {
        count += 1;
        match node {
            Value::Array(items) => stack.extend(items),
            Value::Object(map) => stack.extend(map.values()),
            _ => {}
        }
    }
    count
}
