//! Scalar values and closed value sets.
//!
//! A scalar is anything with a faithful single-token string form: numbers,
//! strings, booleans, dates, URIs, enumeration members, and the explicit
//! null marker.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Number;

/// A single-token value carried by a leaf node or bound into a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Present-but-null. Distinct from an absent node.
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Symbolic name of an enumeration member.
    Symbol(String),
    Timestamp(DateTime<Utc>),
    LocalDateTime(NaiveDateTime),
    Date(NaiveDate),
    Uri(String),
}

impl Scalar {
    /// Returns `true` for the explicit null marker.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Build a symbol scalar from a closed-set member.
    pub fn symbol<T: ClosedSet>(member: &T) -> Self {
        Self::Symbol(member.symbol().to_string())
    }

    /// Build a number scalar from a float. Non-finite floats have no JSON
    /// number form and fall back to their string spelling.
    #[must_use]
    pub fn float(value: f64) -> Self {
        Number::from_f64(value).map_or_else(|| Self::String(value.to_string()), Self::Number)
    }

    /// The string form used for template expansion and text rendering.
    /// `Null` has no token and yields `None`.
    #[must_use]
    pub fn as_token(&self) -> Option<String> {
        match self {
            Self::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) | Self::Symbol(s) | Self::Uri(s) => f.write_str(s),
            Self::Timestamp(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::LocalDateTime(t) => write!(f, "{}", t.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! scalar_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

scalar_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::float(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Self::float(f64::from(value))
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A closed enumeration whose members are known up front.
///
/// Implementors list their symbolic member names in declaration order; the
/// engine uses that list as the possible values of a parameter of this type.
pub trait ClosedSet {
    /// Declared type name, e.g. `"OrderStatus"`.
    const TYPE_NAME: &'static str;

    /// Symbolic member names in declaration order.
    const MEMBERS: &'static [&'static str];

    /// Symbolic name of this member.
    fn symbol(&self) -> &'static str;
}
