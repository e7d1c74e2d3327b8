use super::{Error, Value};

/// Recursive-descent JSON parser operating over a byte cursor into the
/// input string. Ported from the original's `LoadNode`/`LoadString`/
/// `LoadNumber`/`LoadArray`/`LoadDict` dispatch.
struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

pub fn parse(input: &str) -> Result<Value, Error> {
    let mut p = Parser {
        bytes: input.as_bytes(),
        pos: 0,
    };
    p.skip_whitespace();
    let value = p.parse_value()?;
    p.skip_whitespace();
    if p.pos != p.bytes.len() {
        return Err(p.err("trailing data after document"));
    }
    Ok(value)
}

impl<'a> Parser<'a> {
    fn err(&self, reason: impl Into<String>) -> Error {
        Error::Parse {
            reason: reason.into(),
            position: self.pos,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), Error> {
        match self.bump() {
            Some(b) if b == byte => Ok(()),
            Some(b) => Err(self.err(format!("expected '{}', found '{}'", byte as char, b as char))),
            None => Err(self.err(format!("expected '{}', found end of input", byte as char))),
        }
    }

    fn parse_value(&mut self) -> Result<Value, Error> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => self.parse_string().map(Value::Str),
            Some(b't') => self.parse_literal("true", Value::Bool(true)),
            Some(b'f') => self.parse_literal("false", Value::Bool(false)),
            Some(b'n') => self.parse_literal("null", Value::Null),
            Some(b'-') | Some(b'0'..=b'9') => self.parse_number(),
            Some(c) => Err(self.err(format!("unexpected character '{}'", c as char))),
            None => Err(self.err("unexpected end of input")),
        }
    }

    fn parse_literal(&mut self, text: &str, value: Value) -> Result<Value, Error> {
        let end = self.pos + text.len();
        if end <= self.bytes.len() && &self.bytes[self.pos..end] == text.as_bytes() {
            self.pos = end;
            Ok(value)
        } else {
            Err(self.err(format!("expected literal '{text}'")))
        }
    }

    fn parse_number(&mut self) -> Result<Value, Error> {
        let start = self.pos;
        let mut is_real = false;

        if self.peek() == Some(b'-') {
            self.bump();
        }
        match self.peek() {
            Some(b'0') => {
                self.bump();
            }
            Some(b'1'..=b'9') => {
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.bump();
                }
            }
            _ => return Err(self.err("a digit is expected")),
        }

        if self.peek() == Some(b'.') {
            is_real = true;
            self.bump();
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.err("a digit is expected after decimal point"));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_real = true;
            self.bump();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.bump();
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.err("a digit is expected in exponent"));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }

        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap();
        if is_real {
            text.parse::<f64>()
                .map(Value::Real)
                .map_err(|_| self.err(format!("failed to convert '{text}' to a number")))
        } else {
            match text.parse::<i64>() {
                Ok(n) => Ok(Value::Int(n)),
                Err(_) => text
                    .parse::<f64>()
                    .map(Value::Real)
                    .map_err(|_| self.err(format!("failed to convert '{text}' to a number"))),
            }
        }
    }

    fn parse_string(&mut self) -> Result<String, Error> {
        self.expect(b'"')?;
        let mut s = String::new();
        loop {
            match self.bump() {
                None => return Err(self.err("unterminated string")),
                Some(b'"') => break,
                Some(b'\\') => match self.bump() {
                    Some(b'n') => s.push('\n'),
                    Some(b't') => s.push('\t'),
                    Some(b'r') => s.push('\r'),
                    Some(b'"') => s.push('"'),
                    Some(b'\\') => s.push('\\'),
                    Some(c) => return Err(self.err(format!("unrecognized escape sequence \\{}", c as char))),
                    None => return Err(self.err("unterminated escape sequence")),
                },
                Some(b'\n') | Some(b'\r') => {
                    return Err(self.err("unexpected end of line inside string literal"));
                }
                Some(c) => {
                    // Strings are UTF-8; re-assemble multi-byte sequences a byte at a time.
                    if c < 0x80 {
                        s.push(c as char);
                    } else {
                        let start = self.pos - 1;
                        let len = utf8_len(c);
                        let end = start + len;
                        if end > self.bytes.len() {
                            return Err(self.err("invalid utf-8 in string literal"));
                        }
                        let chunk = std::str::from_utf8(&self.bytes[start..end])
                            .map_err(|_| self.err("invalid utf-8 in string literal"))?;
                        s.push_str(chunk);
                        self.pos = end;
                    }
                }
            }
        }
        Ok(s)
    }

    fn parse_array(&mut self) -> Result<Value, Error> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.bump();
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(b',') => {
                    self.skip_whitespace();
                    continue;
                }
                Some(b']') => break,
                _ => return Err(self.err("expected ',' or ']' in array")),
            }
        }
        Ok(Value::Array(items))
    }

    fn parse_object(&mut self) -> Result<Value, Error> {
        self.expect(b'{')?;
        let mut entries = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.bump();
            return Ok(Value::Object(entries));
        }
        loop {
            self.skip_whitespace();
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(b':')?;
            let value = self.parse_value()?;
            entries.push((key, value));
            self.skip_whitespace();
            match self.bump() {
                Some(b',') => continue,
                Some(b'}') => break,
                _ => return Err(self.err("expected ',' or '}' in object")),
            }
        }
        Ok(Value::Object(entries))
    }
}

fn utf8_len(first_byte: u8) -> usize {
    if first_byte & 0xE0 == 0xC0 {
        2
    } else if first_byte & 0xF0 == 0xE0 {
        3
    } else if first_byte & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalars() {
        assert_eq!(parse("null").unwrap(), Value::Null);
        assert_eq!(parse("true").unwrap(), Value::Bool(true));
        assert_eq!(parse("false").unwrap(), Value::Bool(false));
        assert_eq!(parse("42").unwrap(), Value::Int(42));
        assert_eq!(parse("-7").unwrap(), Value::Int(-7));
        assert_eq!(parse("3.5").unwrap(), Value::Real(3.5));
        assert_eq!(parse("1e3").unwrap(), Value::Real(1000.0));
    }

    #[test]
    fn parses_string_with_escapes() {
        let v = parse(r#""a\nb\tc\"d""#).unwrap();
        assert_eq!(v, Value::Str("a\nb\tc\"d".to_string()));
    }

    #[test]
    fn rejects_raw_newline_in_string() {
        let raw = "\"a\nb\"";
        assert!(parse(raw).is_err());
    }

    #[test]
    fn parses_nested_array_and_object() {
        let v = parse(r#"{"a": [1, 2, {"b": true}]}"#).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        let arr = obj[0].1.as_array().unwrap();
        assert_eq!(arr.len(), 3);
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse("1 2").is_err());
    }

    #[test]
    fn rejects_leading_zero_followed_by_digit() {
        // "0" alone is fine...
        assert_eq!(parse("0").unwrap(), Value::Int(0));
        // ...but "01" is not valid JSON and should be rejected as trailing garbage.
        assert!(parse("01").is_err());
    }
}
