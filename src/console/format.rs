//! Rendering of console call arguments into message text.
//!
//! Primitives are stringified as-is, composite values are pretty-printed as
//! JSON with two-space indentation, and anything that fails to serialize falls
//! back to its `Debug` text. Rendering never fails.
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;

/// A single argument passed to a console call.
#[derive(Debug, Clone, PartialEq)]
pub enum LogArg {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
    Null,
    /// An array or object value.
    Structured(Value),
    /// A value that could not be serialized, kept as its fallback text.
    Opaque(String),
}

impl LogArg {
    /// Captures any serializable value.
    ///
    /// Values that serialize to a JSON primitive are treated like the
    /// corresponding primitive argument. If serialization fails (non-string map
    /// keys, a failing `Serialize` impl) the `Debug` text is kept instead, or
    /// the type name when that text is empty.
    pub fn structured<T>(value: &T) -> Self
    where
        T: Serialize + Debug + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(value) => Self::from(value),
            Err(_) => Self::Opaque(fallback_text(value)),
        }
    }

    /// Renders the argument to the text used in the entry message.
    pub fn render(&self) -> String {
        match self {
            LogArg::Text(text) => text.clone(),
            LogArg::Integer(n) => n.to_string(),
            LogArg::Unsigned(n) => n.to_string(),
            LogArg::Float(x) => render_float(*x),
            LogArg::Bool(b) => b.to_string(),
            LogArg::Null => "null".to_string(),
            LogArg::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            LogArg::Opaque(text) => text.clone(),
        }
    }
}

/// Joins rendered arguments with single spaces.
pub fn render_args(args: &[LogArg]) -> String {
    args.iter().map(LogArg::render).collect::<Vec<_>>().join(" ")
}

fn render_float(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x.is_infinite() {
        let text = if x > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else {
        x.to_string()
    }
}

fn fallback_text<T: Debug + ?Sized>(value: &T) -> String {
    let text = format!("{:?}", value);
    if text.is_empty() {
        format!("[{}]", std::any::type_name::<T>())
    } else {
        text
    }
}

impl From<Value> for LogArg {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => LogArg::Null,
            Value::Bool(b) => LogArg::Bool(b),
            Value::String(s) => LogArg::Text(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    LogArg::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    LogArg::Unsigned(u)
                } else {
                    LogArg::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            composite @ (Value::Array(_) | Value::Object(_)) => LogArg::Structured(composite),
        }
    }
}

impl From<&Value> for LogArg {
    fn from(value: &Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<&str> for LogArg {
    fn from(text: &str) -> Self {
        LogArg::Text(text.to_string())
    }
}

impl From<String> for LogArg {
    fn from(text: String) -> Self {
        LogArg::Text(text)
    }
}

impl From<&String> for LogArg {
    fn from(text: &String) -> Self {
        LogArg::Text(text.clone())
    }
}

impl From<char> for LogArg {
    fn from(c: char) -> Self {
        LogArg::Text(c.to_string())
    }
}

impl From<bool> for LogArg {
    fn from(b: bool) -> Self {
        LogArg::Bool(b)
    }
}

impl From<f32> for LogArg {
    fn from(x: f32) -> Self {
        LogArg::Float(f64::from(x))
    }
}

impl From<f64> for LogArg {
    fn from(x: f64) -> Self {
        LogArg::Float(x)
    }
}

impl From<()> for LogArg {
    fn from(_: ()) -> Self {
        LogArg::Null
    }
}

impl<T: Into<LogArg>> From<Option<T>> for LogArg {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(LogArg::Null)
    }
}

macro_rules! signed_args {
    ($($ty:ty),*) => {
        $(impl From<$ty> for LogArg {
            fn from(n: $ty) -> Self {
                LogArg::Integer(n as i64)
            }
        })*
    };
}

macro_rules! unsigned_args {
    ($($ty:ty),*) => {
        $(impl From<$ty> for LogArg {
            fn from(n: $ty) -> Self {
                LogArg::Unsigned(n as u64)
            }
        })*
    };
}

signed_args!(i8, i16, i32, i64, isize);
unsigned_args!(u8, u16, u32, u64, usize);
