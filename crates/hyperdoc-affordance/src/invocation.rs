//! Method invocation references supplied by a dispatch layer.
//!
//! An invocation names the target method, its verb and path template, and
//! the arguments it was called with. An argument may be bound, deliberately
//! left unbound (a placeholder), or absent altogether.

use hyperdoc_core::{HttpVerb, InputParameter, ParameterLocation, Scalar, TemplateError};
use hyperdoc_uri::{Bindings, PartialUriTemplate};

/// Value supplied for one declared argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Bound(Scalar),
    /// Placeholder sentinel: the variable stays in the template.
    Unbound,
    /// Not supplied. Optional query parameters are dropped from the template.
    Absent,
}

impl ArgumentValue {
    /// The bound scalar, treating a bound null as unbound.
    #[must_use]
    pub fn bound(&self) -> Option<&Scalar> {
        match self {
            Self::Bound(value) if !value.is_null() => Some(value),
            _ => None,
        }
    }
}

/// One declared argument and the value it was invoked with.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub parameter: InputParameter,
    pub value: ArgumentValue,
}

impl Argument {
    /// The declared parameter carrying the bound value, if any.
    #[must_use]
    pub fn resolved_parameter(&self) -> InputParameter {
        match self.value.bound() {
            Some(value) => self.parameter.clone().with_value(value.clone()),
            None => self.parameter.clone(),
        }
    }

    fn is_absent(&self) -> bool {
        self.value == ArgumentValue::Absent
    }
}

/// A reference to a controller method together with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInvocation {
    pub method_name: String,
    pub verb: HttpVerb,
    pub path_template: String,
    pub arguments: Vec<Argument>,
}

impl MethodInvocation {
    pub fn new(
        method_name: impl Into<String>,
        verb: HttpVerb,
        path_template: impl Into<String>,
    ) -> Self {
        Self {
            method_name: method_name.into(),
            verb,
            path_template: path_template.into(),
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, parameter: InputParameter, value: ArgumentValue) -> Self {
        self.arguments.push(Argument { parameter, value });
        self
    }

    #[must_use]
    pub fn bound(self, parameter: InputParameter, value: impl Into<Scalar>) -> Self {
        self.arg(parameter, ArgumentValue::Bound(value.into()))
    }

    #[must_use]
    pub fn unbound(self, parameter: InputParameter) -> Self {
        self.arg(parameter, ArgumentValue::Unbound)
    }

    /// The path template extended with a query group for every supplied
    /// query argument it does not already declare.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Malformed`] if the path template or a query
    /// parameter name is invalid.
    pub fn template(&self) -> Result<PartialUriTemplate, TemplateError> {
        let template = PartialUriTemplate::parse(&self.path_template)?;
        let query_names = self
            .arguments
            .iter()
            .filter(|a| a.parameter.location == ParameterLocation::Query && !a.is_absent())
            .map(|a| a.parameter.name.as_str());
        template.with_query_params(query_names)
    }

    /// Bindings for every bound template argument.
    #[must_use]
    pub fn bindings(&self) -> Bindings {
        self.arguments
            .iter()
            .filter(|a| a.parameter.location.in_template())
            .filter_map(|a| a.value.bound().map(|v| (a.parameter.name.clone(), v.clone())))
            .collect()
    }

    /// Declared parameters that travel in the URI, with bound values.
    pub fn template_parameters(&self) -> impl Iterator<Item = InputParameter> + '_ {
        self.arguments
            .iter()
            .filter(|a| a.parameter.location.in_template())
            .map(Argument::resolved_parameter)
    }

    /// Supplied parameters that travel outside the URI (headers, body).
    pub fn other_parameters(&self) -> impl Iterator<Item = InputParameter> + '_ {
        self.arguments
            .iter()
            .filter(|a| !a.parameter.location.in_template() && !a.is_absent())
            .map(Argument::resolved_parameter)
    }
}
