//! Action descriptors: one declared state transition with its inputs.

use serde::Serialize;

use crate::action::{ActionKind, HttpVerb};
use crate::error::{DescriptorError, HyperError};
use crate::param::InputParameter;

/// One possible state transition on a target resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionDescriptor {
    name: String,
    verb: HttpVerb,
    parameters: Vec<InputParameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_body: Option<InputParameter>,
    /// Unbound variables rendered in the verb's parameter style.
    #[serde(skip_serializing_if = "Option::is_none")]
    template_fragment: Option<String>,
}

impl ActionDescriptor {
    pub fn new(name: impl Into<String>, verb: HttpVerb) -> Self {
        Self {
            name: name.into(),
            verb,
            parameters: Vec::new(),
            request_body: None,
            template_fragment: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a parameter. A body-location parameter becomes the request
    /// body.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::DuplicateBodyParameter`] if a request body
    /// is already set.
    pub fn add_parameter(&mut self, parameter: InputParameter) -> Result<(), DescriptorError> {
        if !parameter.is_request_body() {
            self.parameters.push(parameter);
            return Ok(());
        }
        if let Some(existing) = &self.request_body {
            return Err(DescriptorError::DuplicateBodyParameter {
                action: self.name.clone(),
                existing: existing.name.clone(),
                rejected: parameter.name,
            });
        }
        self.request_body = Some(parameter);
        Ok(())
    }

    pub fn set_template_fragment(&mut self, fragment: Option<String>) {
        self.template_fragment = fragment;
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn verb(&self) -> HttpVerb {
        self.verb
    }

    #[must_use]
    pub fn action_kind(&self) -> ActionKind {
        self.verb.action_kind()
    }

    /// Non-body parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[InputParameter] {
        &self.parameters
    }

    #[must_use]
    pub fn request_body(&self) -> Option<&InputParameter> {
        self.request_body.as_ref()
    }

    #[must_use]
    pub fn template_fragment(&self) -> Option<&str> {
        self.template_fragment.as_deref()
    }

    #[must_use]
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
            || self.request_body.as_ref().is_some_and(|p| p.name == name)
    }

    /// Look up a parameter by name, including the request body.
    ///
    /// # Errors
    ///
    /// Returns [`HyperError::NotFound`] if no parameter has that name.
    pub fn action_input_parameter(&self, name: &str) -> Result<&InputParameter, HyperError> {
        self.parameters
            .iter()
            .chain(self.request_body.as_ref())
            .find(|p| p.name == name)
            .ok_or_else(|| HyperError::not_found("parameter", name))
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    /// Parameters that must be supplied and have no bound value yet.
    pub fn required_unbound(&self) -> impl Iterator<Item = &InputParameter> {
        self.parameters
            .iter()
            .chain(self.request_body.as_ref())
            .filter(|p| p.required && !p.has_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{DeclaredType, ParameterLocation};

    fn search() -> ActionDescriptor {
        let mut action = ActionDescriptor::new("search", HttpVerb::Get);
        action
            .add_parameter(InputParameter::new("name", DeclaredType::string()))
            .unwrap();
        action
            .add_parameter(InputParameter::new("rating", DeclaredType::named("u8")))
            .unwrap();
        action
    }

    #[test]
    fn parameters_keep_declaration_order() {
        let action = search();
        let names: Vec<&str> = action.parameter_names().collect();
        assert_eq!(names, ["name", "rating"]);
        assert_eq!(action.action_kind(), ActionKind::Read);
    }

    #[test]
    fn second_body_parameter_is_rejected() {
        let mut action = ActionDescriptor::new("createOrder", HttpVerb::Post);
        action
            .add_parameter(InputParameter::body("order", DeclaredType::named("Order")))
            .unwrap();
        let err = action
            .add_parameter(InputParameter::body("other", DeclaredType::named("Order")))
            .unwrap_err();
        assert_eq!(
            err,
            DescriptorError::DuplicateBodyParameter {
                action: "createOrder".into(),
                existing: "order".into(),
                rejected: "other".into(),
            }
        );
        assert_eq!(action.request_body().unwrap().name, "order");
        assert!(action.parameters().is_empty());
    }

    #[test]
    fn lookup_finds_body_and_fails_on_missing() {
        let mut action = search();
        action
            .add_parameter(InputParameter::body("payload", DeclaredType::named("Query")))
            .unwrap();
        assert_eq!(
            action.action_input_parameter("payload").unwrap().location,
            ParameterLocation::Body
        );
        assert!(action.action_input_parameter("rating").is_ok());
        let err = action.action_input_parameter("missing").unwrap_err();
        assert!(matches!(err, HyperError::NotFound { kind: "parameter", .. }));
    }

    #[test]
    fn required_unbound_skips_bound_parameters() {
        let mut action = ActionDescriptor::new("update", HttpVerb::Put);
        action
            .add_parameter(InputParameter::path("id", DeclaredType::named("u64")).with_value(7))
            .unwrap();
        action
            .add_parameter(InputParameter::body("item", DeclaredType::named("Item")))
            .unwrap();
        let names: Vec<&str> = action.required_unbound().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["item"]);
    }
}
