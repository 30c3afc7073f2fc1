//! Minimal XML-RPC codec for the AfiniMaki wire protocol.
//!
//! Requests are built by hand (the argument shapes are small and fixed);
//! responses are parsed with `quick-xml`. Identifiers travel as `<i8>`
//! (64-bit), rate values as `<int>` (32-bit). Untyped `<value>` content
//! defaults to string per the XML-RPC specification.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use afinimaki_core::{AfiniError, AfiniResult};

/// A typed XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 32-bit integer (`<int>` / `<i4>`).
    Int(i32),
    /// 64-bit integer (`<i8>`).
    Int64(i64),
    /// Boolean (`<boolean>`).
    Bool(bool),
    /// Double-precision float (`<double>`).
    Double(f64),
    /// String (`<string>` or untyped).
    String(String),
    /// Array (`<array>`).
    Array(Vec<Value>),
    /// Struct (`<struct>`).
    Struct(HashMap<String, Value>),
    /// Nil (`<nil/>`).
    Nil,
}

impl Value {
    /// Render a scalar value as a plain string for the authentication
    /// digest. Non-scalar values render as the empty string.
    pub fn scalar_string(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Int64(n) => n.to_string(),
            Value::Bool(b) => {
                if *b {
                    "1".to_string()
                } else {
                    "0".to_string()
                }
            }
            Value::Double(d) => format!("{}", d),
            Value::String(s) => s.clone(),
            Value::Array(_) | Value::Struct(_) | Value::Nil => String::new(),
        }
    }

    /// Coerce to a 64-bit integer, if this value holds one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(i64::from(*n)),
            Value::Int64(n) => Some(*n),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Coerce any numeric wire representation to a double. The service
    /// reports estimates and affinities through whatever numeric type its
    /// serializer picked, so every consumer forces float coercion.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(f64::from(*n)),
            Value::Int64(n) => Some(*n as f64),
            Value::Double(d) => Some(*d),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Consume this value as an array.
    pub fn into_array(self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// Encode a `<methodCall>` document for `method` with `params`.
pub fn encode_request(method: &str, params: &[Value]) -> String {
    let mut out = String::with_capacity(256);
    out.push_str("<?xml version=\"1.0\"?><methodCall><methodName>");
    escape_into(method, &mut out);
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        encode_value(param, &mut out);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

fn encode_value(value: &Value, out: &mut String) {
    out.push_str("<value>");
    match value {
        Value::Int(n) => {
            out.push_str("<int>");
            out.push_str(&n.to_string());
            out.push_str("</int>");
        }
        Value::Int64(n) => {
            out.push_str("<i8>");
            out.push_str(&n.to_string());
            out.push_str("</i8>");
        }
        Value::Bool(b) => {
            out.push_str("<boolean>");
            out.push(if *b { '1' } else { '0' });
            out.push_str("</boolean>");
        }
        Value::Double(d) => {
            out.push_str("<double>");
            out.push_str(&format!("{}", d));
            out.push_str("</double>");
        }
        Value::String(s) => {
            out.push_str("<string>");
            escape_into(s, out);
            out.push_str("</string>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                encode_value(item, out);
            }
            out.push_str("</data></array>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                escape_into(name, out);
                out.push_str("</name>");
                encode_value(member, out);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn xml_err(err: quick_xml::Error) -> AfiniError {
    AfiniError::parse(format!("invalid XML-RPC payload: {}", err))
}

/// Parse a `<methodResponse>` document into its single result value.
///
/// A `<fault>` response becomes [`AfiniError::Fault`] carrying the server's
/// `faultCode` and `faultString`.
pub fn parse_response(xml: &str) -> AfiniResult<Value> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) => match e.name().as_ref() {
                b"params" => return parse_params(&mut reader),
                b"fault" => return parse_fault(&mut reader),
                b"methodResponse" => {}
                other => {
                    return Err(AfiniError::unexpected_type(format!(
                        "unexpected response element <{}>",
                        String::from_utf8_lossy(other)
                    )))
                }
            },
            Event::Eof => {
                return Err(AfiniError::parse(
                    "response contains neither params nor fault",
                ))
            }
            _ => {}
        }
    }
}

fn parse_params(reader: &mut Reader<&[u8]>) -> AfiniResult<Value> {
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) if e.name().as_ref() == b"value" => return parse_value(reader),
            Event::Start(e) if e.name().as_ref() == b"param" => {}
            Event::End(e) if e.name().as_ref() == b"params" => {
                return Err(AfiniError::parse("response params contain no value"))
            }
            Event::Eof => return Err(AfiniError::parse("unexpected end of response")),
            _ => {}
        }
    }
}

fn parse_fault(reader: &mut Reader<&[u8]>) -> AfiniResult<Value> {
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) if e.name().as_ref() == b"value" => break,
            Event::Eof => return Err(AfiniError::parse("truncated fault response")),
            _ => {}
        }
    }

    let detail = parse_value(reader)?;
    let (fault_code, message) = match detail {
        Value::Struct(mut members) => {
            let code = members
                .remove("faultCode")
                .and_then(|v| v.as_i64())
                .unwrap_or(0) as i32;
            let message = members
                .remove("faultString")
                .map(|v| v.scalar_string())
                .unwrap_or_else(|| "unknown server fault".to_string());
            (code, message)
        }
        other => (0, other.scalar_string()),
    };
    Err(AfiniError::fault(fault_code, message))
}

/// Parse one value; the reader is positioned just past a `<value>` start tag.
fn parse_value(reader: &mut Reader<&[u8]>) -> AfiniResult<Value> {
    let mut text = String::new();
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) => {
                let tag = e.name().as_ref().to_vec();
                let value = parse_typed(reader, &tag)?;
                expect_end(reader, b"value")?;
                return Ok(value);
            }
            Event::Empty(e) => {
                let value = empty_typed(e.name().as_ref())?;
                expect_end(reader, b"value")?;
                return Ok(value);
            }
            Event::Text(t) => text.push_str(&t.unescape().map_err(xml_err)?),
            Event::End(e) if e.name().as_ref() == b"value" => {
                // Untyped value content defaults to string.
                return Ok(Value::String(text));
            }
            Event::Eof => return Err(AfiniError::parse("unexpected end of value")),
            _ => {}
        }
    }
}

/// Decode a self-closing typed element. Empty collections are valid;
/// an empty numeric or boolean element has no value to parse.
fn empty_typed(tag: &[u8]) -> AfiniResult<Value> {
    match tag {
        b"nil" => Ok(Value::Nil),
        b"string" => Ok(Value::String(String::new())),
        b"array" => Ok(Value::Array(Vec::new())),
        b"struct" => Ok(Value::Struct(HashMap::new())),
        other => Err(AfiniError::unexpected_type(format!(
            "empty <{}/> element has no value",
            String::from_utf8_lossy(other)
        ))),
    }
}

fn parse_typed(reader: &mut Reader<&[u8]>, tag: &[u8]) -> AfiniResult<Value> {
    match tag {
        b"int" | b"i4" => {
            let text = read_scalar_text(reader, tag)?;
            let n = text.trim().parse::<i32>().map_err(|_| {
                AfiniError::unexpected_type(format!("invalid integer: '{}'", text))
            })?;
            Ok(Value::Int(n))
        }
        b"i8" => {
            let text = read_scalar_text(reader, tag)?;
            let n = text.trim().parse::<i64>().map_err(|_| {
                AfiniError::unexpected_type(format!("invalid 64-bit integer: '{}'", text))
            })?;
            Ok(Value::Int64(n))
        }
        b"double" => {
            let text = read_scalar_text(reader, tag)?;
            let d = text
                .trim()
                .parse::<f64>()
                .map_err(|_| AfiniError::unexpected_type(format!("invalid double: '{}'", text)))?;
            Ok(Value::Double(d))
        }
        b"boolean" => {
            let text = read_scalar_text(reader, tag)?;
            match text.trim() {
                "1" | "true" => Ok(Value::Bool(true)),
                "0" | "false" => Ok(Value::Bool(false)),
                other => Err(AfiniError::unexpected_type(format!(
                    "invalid boolean: '{}'",
                    other
                ))),
            }
        }
        b"string" => Ok(Value::String(read_scalar_text(reader, tag)?)),
        b"nil" => {
            expect_end(reader, b"nil")?;
            Ok(Value::Nil)
        }
        b"array" => parse_array(reader),
        b"struct" => parse_struct(reader),
        other => Err(AfiniError::unexpected_type(format!(
            "unsupported value type <{}>",
            String::from_utf8_lossy(other)
        ))),
    }
}

fn read_scalar_text(reader: &mut Reader<&[u8]>, tag: &[u8]) -> AfiniResult<String> {
    let mut text = String::new();
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Text(t) => text.push_str(&t.unescape().map_err(xml_err)?),
            Event::End(e) if e.name().as_ref() == tag => return Ok(text),
            Event::Eof => return Err(AfiniError::parse("unexpected end of document")),
            _ => {
                return Err(AfiniError::unexpected_type(format!(
                    "unexpected markup inside <{}>",
                    String::from_utf8_lossy(tag)
                )))
            }
        }
    }
}

fn expect_end(reader: &mut Reader<&[u8]>, tag: &[u8]) -> AfiniResult<()> {
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::End(e) if e.name().as_ref() == tag => return Ok(()),
            Event::Eof => return Err(AfiniError::parse("unexpected end of document")),
            _ => {
                return Err(AfiniError::unexpected_type(format!(
                    "unexpected content before </{}>",
                    String::from_utf8_lossy(tag)
                )))
            }
        }
    }
}

fn parse_array(reader: &mut Reader<&[u8]>) -> AfiniResult<Value> {
    let mut items = Vec::new();
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) if e.name().as_ref() == b"value" => items.push(parse_value(reader)?),
            Event::Start(e) if e.name().as_ref() == b"data" => {}
            Event::End(e) if e.name().as_ref() == b"array" => return Ok(Value::Array(items)),
            Event::End(e) if e.name().as_ref() == b"data" => {}
            Event::Eof => return Err(AfiniError::parse("unexpected end of array")),
            _ => {}
        }
    }
}

fn parse_struct(reader: &mut Reader<&[u8]>) -> AfiniResult<Value> {
    let mut members = HashMap::new();
    let mut pending_name: Option<String> = None;
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) if e.name().as_ref() == b"member" => pending_name = None,
            Event::Start(e) if e.name().as_ref() == b"name" => {
                pending_name = Some(read_scalar_text(reader, b"name")?);
            }
            Event::Start(e) if e.name().as_ref() == b"value" => {
                let value = parse_value(reader)?;
                if let Some(name) = pending_name.take() {
                    members.insert(name, value);
                }
            }
            Event::End(e) if e.name().as_ref() == b"struct" => return Ok(Value::Struct(members)),
            Event::Eof => return Err(AfiniError::parse("unexpected end of struct")),
            _ => {}
        }
    }
}
