//! Input parameters declared by an action.

use serde::Serialize;

use crate::value::{ClosedSet, Scalar};

/// Declared type of a parameter. Closed enumerations carry their member set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredType {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
}

impl DeclaredType {
    /// An open (non-enumerated) type.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: None,
        }
    }

    /// A closed enumeration with explicit members in declaration order.
    pub fn enumeration<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: Some(members.into_iter().map(Into::into).collect()),
        }
    }

    /// The declared type of a [`ClosedSet`] implementor.
    #[must_use]
    pub fn of<T: ClosedSet>() -> Self {
        Self::enumeration(T::TYPE_NAME, T::MEMBERS.iter().copied())
    }

    #[must_use]
    pub fn string() -> Self {
        Self::named("String")
    }

    #[must_use]
    pub fn is_enumeration(&self) -> bool {
        self.members.is_some()
    }
}

/// Where a parameter travels in the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    #[default]
    Query,
    Header,
    /// The full request payload rather than a query or form field.
    Body,
}

impl ParameterLocation {
    /// Whether parameters at this location are expressed in a URI template.
    #[must_use]
    pub fn in_template(self) -> bool {
        matches!(self, Self::Path | Self::Query)
    }
}

/// A single input of an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputParameter {
    pub name: String,
    pub declared_type: DeclaredType,
    pub location: ParameterLocation,
    pub required: bool,
    /// Explicit enumeration of acceptable values. Overrides the declared
    /// type's members when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<Vec<Scalar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Scalar>,
    /// Value bound at invocation time, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
}

impl InputParameter {
    /// An optional query parameter of the given type.
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            location: ParameterLocation::default(),
            required: false,
            possible_values: None,
            default_value: None,
            value: None,
        }
    }

    /// A required path variable.
    pub fn path(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self::new(name, declared_type)
            .at(ParameterLocation::Path)
            .required(true)
    }

    /// A required request body of the given type.
    pub fn body(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self::new(name, declared_type)
            .at(ParameterLocation::Body)
            .required(true)
    }

    #[must_use]
    pub fn at(mut self, location: ParameterLocation) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_possible_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        self.possible_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<Scalar>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Bind a value. Binding [`Scalar::Null`] leaves the parameter unbound.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Scalar>) -> Self {
        let value = value.into();
        self.value = (!value.is_null()).then_some(value);
        self
    }

    #[must_use]
    pub fn is_request_body(&self) -> bool {
        self.location == ParameterLocation::Body
    }

    #[must_use]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Acceptable values: explicit ones if supplied, else the declared
    /// enumeration's members in declaration order, else `None`.
    #[must_use]
    pub fn possible_values(&self) -> Option<Vec<Scalar>> {
        if let Some(values) = &self.possible_values {
            return Some(values.clone());
        }
        self.declared_type
            .members
            .as_ref()
            .map(|members| members.iter().cloned().map(Scalar::Symbol).collect())
    }
}
