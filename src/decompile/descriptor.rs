//! Field and method descriptor parsing, plus the name conversions used for display.

use super::{DecompileError, Result};

/// Represents a JVM type from a descriptor string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JvmType {
    Int,
    Long,
    Float,
    Double,
    Byte,
    Char,
    Short,
    Boolean,
    Void,
    Reference(String),
    Array(Box<JvmType>),
}

impl JvmType {
    /// Returns true if this type occupies two local variable slots.
    pub fn is_wide(&self) -> bool {
        matches!(self, JvmType::Long | JvmType::Double)
    }

    pub fn array_dimensions(&self) -> usize {
        match self {
            JvmType::Array(inner) => 1 + inner.array_dimensions(),
            _ => 0,
        }
    }

    /// The innermost non-array type.
    pub fn base_type(&self) -> &JvmType {
        match self {
            JvmType::Array(inner) => inner.base_type(),
            other => other,
        }
    }

    /// Source-like name: primitives as keywords, classes dotted with
    /// `java.lang` members shortened, and one `[]` per dimension.
    pub fn display_name(&self) -> String {
        match self {
            JvmType::Int => "int".into(),
            JvmType::Long => "long".into(),
            JvmType::Float => "float".into(),
            JvmType::Double => "double".into(),
            JvmType::Byte => "byte".into(),
            JvmType::Char => "char".into(),
            JvmType::Short => "short".into(),
            JvmType::Boolean => "boolean".into(),
            JvmType::Void => "void".into(),
            JvmType::Reference(name) => display_class_name(name),
            JvmType::Array(inner) => format!("{}[]", inner.display_name()),
        }
    }
}

/// Parse a single type descriptor starting at position `pos` in `desc`.
/// Returns (JvmType, next_position).
pub fn parse_type_at(desc: &str, pos: usize) -> Option<(JvmType, usize)> {
    let bytes = desc.as_bytes();
    if pos >= bytes.len() {
        return None;
    }
    match bytes[pos] {
        b'B' => Some((JvmType::Byte, pos + 1)),
        b'C' => Some((JvmType::Char, pos + 1)),
        b'D' => Some((JvmType::Double, pos + 1)),
        b'F' => Some((JvmType::Float, pos + 1)),
        b'I' => Some((JvmType::Int, pos + 1)),
        b'J' => Some((JvmType::Long, pos + 1)),
        b'S' => Some((JvmType::Short, pos + 1)),
        b'Z' => Some((JvmType::Boolean, pos + 1)),
        b'V' => Some((JvmType::Void, pos + 1)),
        b'L' => {
            let semi = desc[pos + 1..].find(';')?;
            if semi == 0 {
                return None;
            }
            let class_name = &desc[pos + 1..pos + 1 + semi];
            Some((JvmType::Reference(class_name.to_string()), pos + 1 + semi + 1))
        }
        b'[' => {
            let (inner, next) = parse_type_at(desc, pos + 1)?;
            if inner == JvmType::Void {
                return None;
            }
            Some((JvmType::Array(Box::new(inner)), next))
        }
        _ => None,
    }
}

/// Parse a full type descriptor string.
pub fn parse_type_descriptor(desc: &str) -> Option<JvmType> {
    match parse_type_at(desc, 0)? {
        (ty, end) if end == desc.len() => Some(ty),
        _ => None,
    }
}

/// Parse a method descriptor, e.g. "(II)V" -> ([Int, Int], Void)
pub fn parse_method_descriptor(desc: &str) -> Option<(Vec<JvmType>, JvmType)> {
    if !desc.starts_with('(') {
        return None;
    }
    let close = desc.find(')')?;
    let mut params = Vec::new();
    let mut pos = 1;
    while pos < close {
        let (ty, next) = parse_type_at(desc, pos)?;
        if ty == JvmType::Void || next > close {
            return None;
        }
        params.push(ty);
        pos = next;
    }
    let (ret, end) = parse_type_at(desc, close + 1)?;
    if end != desc.len() {
        return None;
    }
    Some((params, ret))
}

pub fn field_type(desc: &str) -> Result<JvmType> {
    parse_type_descriptor(desc).ok_or_else(|| malformed(desc))
}

pub fn method_type(desc: &str) -> Result<(Vec<JvmType>, JvmType)> {
    parse_method_descriptor(desc).ok_or_else(|| malformed(desc))
}

/// Type named by a class constant. Array classes are spelled as descriptors
/// (`[I`, `[Ljava/lang/String;`), everything else as an internal name.
pub fn class_constant_type(name: &str) -> Result<JvmType> {
    if name.starts_with('[') {
        field_type(name)
    } else if name.is_empty() {
        Err(malformed(name))
    } else {
        Ok(JvmType::Reference(name.to_string()))
    }
}

fn malformed(desc: &str) -> DecompileError {
    DecompileError::MalformedDescriptor {
        descriptor: desc.to_string(),
    }
}

/// Convert internal class name to source name.
pub fn internal_to_source_name(name: &str) -> String {
    name.replace('/', ".")
}

/// Dotted name, with direct members of `java.lang` reduced to their simple name.
pub fn display_class_name(name: &str) -> String {
    match name.strip_prefix("java/lang/") {
        Some(simple) if !simple.contains('/') => simple.to_string(),
        _ => internal_to_source_name(name),
    }
}

/// Get just the simple class name from an internal name.
pub fn simple_class_name(name: &str) -> &str {
    match name.rfind('/') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Get the package from an internal name.
pub fn package_name(name: &str) -> Option<&str> {
    name.rfind('/').map(|pos| &name[..pos])
}

/// Element type of a displayed array type (`"int[][]"` -> `"int[]"`).
pub fn element_type_name(array_type: &str) -> Option<&str> {
    array_type.strip_suffix("[]")
}

/// Convert a newarray type code to JvmType.
pub fn newarray_type(atype: u8) -> Option<JvmType> {
    match atype {
        4 => Some(JvmType::Boolean),
        5 => Some(JvmType::Char),
        6 => Some(JvmType::Float),
        7 => Some(JvmType::Double),
        8 => Some(JvmType::Byte),
        9 => Some(JvmType::Short),
        10 => Some(JvmType::Int),
        11 => Some(JvmType::Long),
        _ => None,
    }
}
