//! The embedded runtime's tagged value representation.

use std::fmt;

/// Handle to an output stream owned by the bridge.
///
/// Embedded code never sees the host's stream itself, only this token. It
/// passes the token back through [`HostServices::write`](crate::runtime::HostServices::write)
/// to emit text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamRef(u32);

impl StreamRef
{
    #[must_use]
    pub const fn from_raw(value: u32) -> Self
    {
        Self(value)
    }

    #[must_use]
    pub const fn raw(self) -> u32
    {
        self.0
    }
}

/// A value as the embedded runtime sees it.
///
/// This mirrors the uniform representation of a managed runtime: a word is
/// either an immediate integer or a pointer to a tagged block of fields.
/// Strings are owned: nothing crossing the boundary shares storage with the
/// other side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddedValue
{
    /// Unboxed integer. `Immediate(0)` doubles as unit and as the absent
    /// variant of an option.
    Immediate(i64),
    Bool(bool),
    Str(String),
    Stream(StreamRef),
    /// Heap block: constructor tag plus fields.
    Block
    {
        tag: u8,
        fields: Vec<EmbeddedValue>,
    },
}

impl EmbeddedValue
{
    /// The unit value.
    pub const UNIT: EmbeddedValue = EmbeddedValue::Immediate(0);

    /// The absent variant of an optional result.
    #[must_use]
    pub const fn none() -> Self
    {
        EmbeddedValue::Immediate(0)
    }

    /// The present variant of an optional result, wrapping `value`.
    #[must_use]
    pub fn some(value: EmbeddedValue) -> Self
    {
        EmbeddedValue::Block {
            tag: 0,
            fields: vec![value],
        }
    }

    /// Copy a native string into the embedded representation.
    pub fn string(value: &str) -> Self
    {
        EmbeddedValue::Str(value.to_owned())
    }

    pub fn as_immediate(&self) -> Option<i64>
    {
        match self {
            EmbeddedValue::Immediate(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool>
    {
        match self {
            EmbeddedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str>
    {
        match self {
            EmbeddedValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<StreamRef>
    {
        match self {
            EmbeddedValue::Stream(stream) => Some(*stream),
            _ => None,
        }
    }

    /// Short description of the value's shape, for contract-violation messages.
    pub fn shape(&self) -> String
    {
        match self {
            EmbeddedValue::Immediate(value) => format!("immediate {value}"),
            EmbeddedValue::Bool(_) => "bool".to_string(),
            EmbeddedValue::Str(_) => "string".to_string(),
            EmbeddedValue::Stream(_) => "stream".to_string(),
            EmbeddedValue::Block { tag, fields } => format!("block(tag {tag}, {} fields)", fields.len()),
        }
    }
}

impl fmt::Display for EmbeddedValue
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            EmbeddedValue::Immediate(value) => write!(f, "{value}"),
            EmbeddedValue::Bool(value) => write!(f, "{value}"),
            EmbeddedValue::Str(value) => write!(f, "{value:?}"),
            EmbeddedValue::Stream(stream) => write!(f, "<stream {}>", stream.raw()),
            EmbeddedValue::Block { tag, fields } => {
                write!(f, "[{tag}|")?;
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}")?;
                }
                write!(f, "]")
            }
        }
    }
}
