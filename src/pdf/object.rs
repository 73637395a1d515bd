//! PDF object model and serializer.

use std::collections::HashMap;
use std::fmt::Write as _;

/// Indirect object reference: id and generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub id: u32,
    pub generation: u16,
}

impl ObjectRef {
    pub fn new(id: u32) -> Self {
        Self { id, generation: 0 }
    }
}

/// A PDF object.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    /// Byte string; serialized literal or hex depending on content
    String(Vec<u8>),
    Name(String),
    Array(Vec<Object>),
    Dictionary(HashMap<String, Object>),
    Stream {
        dict: HashMap<String, Object>,
        data: Vec<u8>,
    },
    Reference(ObjectRef),
}

impl Object {
    pub fn string(s: impl AsRef<str>) -> Object {
        Object::String(s.as_ref().as_bytes().to_vec())
    }

    pub fn name(s: impl Into<String>) -> Object {
        Object::Name(s.into())
    }

    pub fn dict(entries: Vec<(&str, Object)>) -> Object {
        Object::Dictionary(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}

/// Serializes objects into the PDF syntax.
///
/// Output is compact: single spaces as separators, dictionary keys
/// sorted so serialization is deterministic.
#[derive(Debug, Default)]
pub struct ObjectSerializer;

impl ObjectSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize one object into `out`.
    pub fn serialize(&self, object: &Object, out: &mut Vec<u8>) {
        match object {
            Object::Null => out.extend_from_slice(b"null"),
            Object::Boolean(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
            Object::Integer(i) => {
                let _ = write!(SinkVec(out), "{}", i);
            },
            Object::Real(r) => self.write_real(*r, out),
            Object::String(bytes) => self.write_string(bytes, out),
            Object::Name(name) => self.write_name(name, out),
            Object::Array(items) => {
                out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(b' ');
                    }
                    self.serialize(item, out);
                }
                out.push(b']');
            },
            Object::Dictionary(dict) => self.write_dictionary(dict, out),
            Object::Stream { dict, data } => {
                let mut dict = dict.clone();
                dict.insert("Length".to_string(), Object::Integer(data.len() as i64));
                self.write_dictionary(&dict, out);
                out.extend_from_slice(b"\nstream\n");
                out.extend_from_slice(data);
                out.extend_from_slice(b"\nendstream");
            },
            Object::Reference(r) => {
                let _ = write!(SinkVec(out), "{} {} R", r.id, r.generation);
            },
        }
    }

    /// Serialize an indirect object definition.
    pub fn serialize_indirect(&self, object: &Object, r: ObjectRef, out: &mut Vec<u8>) {
        let _ = write!(SinkVec(out), "{} {} obj\n", r.id, r.generation);
        self.serialize(object, out);
        out.extend_from_slice(b"\nendobj\n");
    }

    /// Write a real number, trimming trailing zeros.
    fn write_real(&self, value: f64, out: &mut Vec<u8>) {
        let mut s = format!("{:.5}", value);
        if s.contains('.') {
            while s.ends_with('0') {
                s.pop();
            }
            if s.ends_with('.') {
                s.pop();
            }
        }
        out.extend_from_slice(s.as_bytes());
    }

    /// Write a string literal, or hex when the bytes are not printable.
    fn write_string(&self, bytes: &[u8], out: &mut Vec<u8>) {
        let printable = bytes
            .iter()
            .all(|&b| (0x20..0x7F).contains(&b) || b == b'\n' || b == b'\r' || b == b'\t');
        if printable {
            out.push(b'(');
            for &b in bytes {
                match b {
                    b'(' | b')' | b'\\' => {
                        out.push(b'\\');
                        out.push(b);
                    },
                    b'\n' => out.extend_from_slice(b"\\n"),
                    b'\r' => out.extend_from_slice(b"\\r"),
                    b'\t' => out.extend_from_slice(b"\\t"),
                    _ => out.push(b),
                }
            }
            out.push(b')');
        } else {
            out.push(b'<');
            for &b in bytes {
                let _ = write!(SinkVec(out), "{:02X}", b);
            }
            out.push(b'>');
        }
    }

    /// Write a name, escaping delimiter and non-regular bytes as `#XX`.
    fn write_name(&self, name: &str, out: &mut Vec<u8>) {
        out.push(b'/');
        for &b in name.as_bytes() {
            let regular = (0x21..0x7F).contains(&b)
                && !matches!(b, b'#' | b'/' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'%');
            if regular {
                out.push(b);
            } else {
                let _ = write!(SinkVec(out), "#{:02X}", b);
            }
        }
    }

    fn write_dictionary(&self, dict: &HashMap<String, Object>, out: &mut Vec<u8>) {
        let mut keys: Vec<&String> = dict.keys().collect();
        keys.sort();
        out.extend_from_slice(b"<<");
        for key in keys {
            self.write_name(key, out);
            let value = &dict[key];
            // A space is only needed before tokens that are not
            // self-delimiting; names, strings, arrays, dictionaries and
            // streams all begin with a delimiter byte.
            if !matches!(
                value,
                Object::Name(_)
                    | Object::String(_)
                    | Object::Array(_)
                    | Object::Dictionary(_)
                    | Object::Stream { .. }
            ) {
                out.push(b' ');
            }
            self.serialize(value, out);
        }
        out.extend_from_slice(b">>");
    }
}

/// Adapter so `write!` can target a byte vector without UTF-8 checks on
/// our side; everything written through it is ASCII.
struct SinkVec<'a>(&'a mut Vec<u8>);

impl std::fmt::Write for SinkVec<'_> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}
