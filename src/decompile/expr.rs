/// Comparison operator of a conditional branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Ge,
    Gt,
    Le,
}

impl CompareOp {
    /// Java source token for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
        }
    }
}

/// A literal pushed by a constant instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl Literal {
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Int(_) => "int",
            Literal::Long(_) => "long",
            Literal::Float(_) => "float",
            Literal::Double(_) => "double",
            Literal::String(_) => "String",
        }
    }

    pub fn to_source(&self) -> String {
        match self {
            Literal::Int(v) => v.to_string(),
            Literal::Long(v) => format!("{}L", v),
            Literal::Float(v) => format!("{}f", float_text(*v as f64, v.is_finite())),
            Literal::Double(v) => float_text(*v, v.is_finite()),
            Literal::String(s) => quote(s),
        }
    }
}

fn float_text(value: f64, finite: bool) -> String {
    if !finite {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    // Debug formatting keeps a trailing ".0" on whole numbers.
    format!("{:?}", value)
}

/// Java string literal with the usual escapes.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// One cell of the symbolic operand stack.
#[derive(Clone, Debug, PartialEq)]
pub enum StackValue {
    Const { origin: usize, value: Literal },
    Variable { origin: usize, name: String, ty: String },
    Code { origin: usize, text: String, ty: String },
    Null { origin: usize },
}

impl StackValue {
    pub fn code(origin: usize, text: impl Into<String>, ty: impl Into<String>) -> Self {
        StackValue::Code {
            origin,
            text: text.into(),
            ty: ty.into(),
        }
    }

    pub fn variable(origin: usize, name: impl Into<String>, ty: impl Into<String>) -> Self {
        StackValue::Variable {
            origin,
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// Block-relative index of the instruction that pushed this value.
    pub fn origin(&self) -> usize {
        match self {
            StackValue::Const { origin, .. }
            | StackValue::Variable { origin, .. }
            | StackValue::Code { origin, .. }
            | StackValue::Null { origin } => *origin,
        }
    }

    /// Semantic type, e.g. `"int"` or `"a.b.C[]"`.
    pub fn type_name(&self) -> &str {
        match self {
            StackValue::Const { value, .. } => value.type_name(),
            StackValue::Variable { ty, .. } | StackValue::Code { ty, .. } => ty,
            StackValue::Null { .. } => "null",
        }
    }

    pub fn text(&self) -> String {
        match self {
            StackValue::Const { value, .. } => value.to_source(),
            StackValue::Variable { name, .. } => name.clone(),
            StackValue::Code { text, .. } => text.clone(),
            StackValue::Null { .. } => "null".to_string(),
        }
    }

    /// Text wrapped in parentheses when it is a compound expression.
    pub fn parenthesized(&self) -> String {
        let text = self.text();
        if text.contains(' ') {
            format!("({})", text)
        } else {
            text
        }
    }

    pub fn is_array(&self) -> bool {
        self.type_name().ends_with("[]")
    }

    pub fn int_constant(&self) -> Option<i32> {
        match self {
            StackValue::Const {
                value: Literal::Int(v),
                ..
            } => Some(*v),
            _ => None,
        }
    }
}
