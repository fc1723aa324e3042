//! Affordance builder.
//!
//! The builder moves through three states:
//!
//! ```text
//! Empty --afford()--> Accumulating --build()/with_rel()--> Affordance
//! ```
//!
//! `build()` only exists on an accumulating builder, and building consumes
//! it, so a finalized [`Affordance`] can no longer be changed.

use std::marker::PhantomData;

use tracing::debug;

use hyperdoc_core::{
    ActionDescriptor, DeclaredType, HttpVerb, HyperError, InputParameter, ParameterLocation,
    RelationError,
};
use hyperdoc_uri::{Bindings, Expansion, PartialUriTemplate, VariableKind};

use crate::affordance::{Affordance, ReverseRel};
use crate::invocation::MethodInvocation;

/// No action declared yet.
#[derive(Debug)]
pub struct Empty;

/// At least one action declared.
#[derive(Debug)]
pub struct Accumulating;

mod sealed {
    pub trait Open {}
    impl Open for super::Empty {}
    impl Open for super::Accumulating {}
}

/// Builds one [`Affordance`] on a single target.
#[derive(Debug)]
pub struct AffordanceBuilder<S = Empty> {
    expansion: Expansion,
    /// Declared metadata for template variables, keyed by name.
    known: Vec<InputParameter>,
    rels: Vec<String>,
    reverse_rels: Vec<ReverseRel>,
    actions: Vec<ActionDescriptor>,
    _state: PhantomData<S>,
}

impl AffordanceBuilder<Empty> {
    /// Start from a template string and a (possibly partial) binding set.
    ///
    /// # Errors
    ///
    /// Returns [`HyperError::Template`] if the template is malformed.
    pub fn new(template: &str, bindings: &Bindings) -> Result<Self, HyperError> {
        let template = PartialUriTemplate::parse(template)?;
        Ok(Self::from_template(&template, bindings))
    }

    #[must_use]
    pub fn from_template(template: &PartialUriTemplate, bindings: &Bindings) -> Self {
        Self {
            expansion: template.expand(bindings),
            known: Vec::new(),
            rels: Vec::new(),
            reverse_rels: Vec::new(),
            actions: Vec::new(),
            _state: PhantomData,
        }
    }

    /// Resolve an invocation into a builder with one action for the
    /// invocation's verb.
    ///
    /// # Errors
    ///
    /// Returns [`HyperError::Template`] if the template is malformed and
    /// [`HyperError::Descriptor`] if the invocation declares two request
    /// bodies.
    pub fn from_invocation(
        invocation: &MethodInvocation,
    ) -> Result<AffordanceBuilder<Accumulating>, HyperError> {
        let template = invocation.template()?;
        let mut builder = Self::from_template(&template, &invocation.bindings());
        builder.known = invocation.template_parameters().collect();

        let mut action = builder.afford(invocation.verb).named(&invocation.method_name);
        for parameter in invocation.other_parameters() {
            action = action.parameter(parameter)?;
        }
        Ok(action.done())
    }
}

impl<S: sealed::Open> AffordanceBuilder<S> {
    /// Begin a new action on the current target.
    #[must_use]
    pub fn afford(self, verb: HttpVerb) -> DescriptorBuilder<S> {
        let name = default_action_name(verb);
        DescriptorBuilder {
            builder: self,
            descriptor: ActionDescriptor::new(name, verb),
        }
    }

    /// Add a forward relation. Adding a rel twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::Invalid`] for an empty or whitespace-bearing
    /// name.
    pub fn rel(mut self, rel: &str) -> Result<Self, RelationError> {
        validate_rel(rel)?;
        if !self.rels.iter().any(|r| r == rel) {
            self.rels.push(rel.to_string());
        }
        Ok(self)
    }

    /// Add a reverse relation from `anchor`. Duplicates are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::Invalid`] for an invalid relation name.
    pub fn reverse_rel(mut self, anchor: &str, rel: &str) -> Result<Self, RelationError> {
        validate_rel(rel)?;
        let reverse = ReverseRel {
            anchor: anchor.to_string(),
            rel: rel.to_string(),
        };
        if !self.reverse_rels.contains(&reverse) {
            self.reverse_rels.push(reverse);
        }
        Ok(self)
    }

    #[must_use]
    pub fn href(&self) -> &str {
        &self.expansion.base_uri
    }

    fn into_state<T>(self) -> AffordanceBuilder<T> {
        AffordanceBuilder {
            expansion: self.expansion,
            known: self.known,
            rels: self.rels,
            reverse_rels: self.reverse_rels,
            actions: self.actions,
            _state: PhantomData,
        }
    }
}

impl AffordanceBuilder<Accumulating> {
    /// Finalize the affordance.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::Missing`] if no rel was added, and
    /// [`HyperError::Descriptor`] if an action ends up with two request
    /// bodies.
    pub fn build(self) -> Result<Affordance, HyperError> {
        if self.rels.is_empty() {
            return Err(RelationError::Missing.into());
        }

        let descriptors = self
            .actions
            .iter()
            .map(|action| self.synthesize(action))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            href = %self.expansion.base_uri,
            rels = ?self.rels,
            actions = descriptors.len(),
            "built affordance"
        );

        Ok(Affordance {
            href: self.expansion.base_uri,
            template: self.expansion.remaining,
            variables: self.expansion.unbound,
            rels: self.rels,
            reverse_rels: self.reverse_rels,
            descriptors,
        })
    }

    /// Add `rel` and finalize.
    ///
    /// # Errors
    ///
    /// See [`AffordanceBuilder::rel`] and [`AffordanceBuilder::build`].
    pub fn with_rel(self, rel: &str) -> Result<Affordance, HyperError> {
        self.rel(rel)?.build()
    }

    /// Template parameters first, in declaration order, then the action's
    /// own parameters. Unbound variables also yield the action's template
    /// fragment in its verb's parameter style.
    fn synthesize(&self, action: &ActionDescriptor) -> Result<ActionDescriptor, HyperError> {
        let mut descriptor = ActionDescriptor::new(action.name(), action.verb());

        for parameter in self.template_parameters(action) {
            descriptor.add_parameter(parameter)?;
        }
        for parameter in action.parameters().iter().chain(action.request_body()) {
            if !descriptor.has_parameter(&parameter.name) {
                descriptor.add_parameter(parameter.clone())?;
            }
        }

        let fragment = action
            .verb()
            .parameter_style()
            .fragment(self.expansion.unbound_names());
        descriptor.set_template_fragment(fragment);
        Ok(descriptor)
    }

    fn template_parameters(&self, action: &ActionDescriptor) -> Vec<InputParameter> {
        let unbound = self.expansion.unbound.iter().map(|variable| {
            let declared = action
                .parameters()
                .iter()
                .chain(&self.known)
                .find(|p| p.name == variable.name);
            declared.cloned().unwrap_or_else(|| {
                let parameter = InputParameter::new(&variable.name, DeclaredType::string());
                match variable.kind {
                    VariableKind::Path => parameter.at(ParameterLocation::Path).required(true),
                    VariableKind::Query => parameter,
                }
            })
        });
        let bound = self.known.iter().filter(|p| p.has_value()).cloned();

        let mut parameters: Vec<InputParameter> = unbound.collect();
        parameters.extend(bound);
        parameters
    }
}

/// Declares one action on the builder's target.
#[derive(Debug)]
pub struct DescriptorBuilder<S> {
    builder: AffordanceBuilder<S>,
    descriptor: ActionDescriptor,
}

impl<S: sealed::Open> DescriptorBuilder<S> {
    /// Override the symbolic action name (defaults to a verb-derived name).
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.descriptor = self.descriptor.with_name(name);
        self
    }

    /// Declare an input parameter.
    ///
    /// # Errors
    ///
    /// Returns [`HyperError::Descriptor`] if a second request body is added.
    pub fn parameter(mut self, parameter: InputParameter) -> Result<Self, HyperError> {
        self.descriptor.add_parameter(parameter)?;
        Ok(self)
    }

    /// Declare several input parameters in order.
    ///
    /// # Errors
    ///
    /// See [`DescriptorBuilder::parameter`].
    pub fn parameters<I>(self, parameters: I) -> Result<Self, HyperError>
    where
        I: IntoIterator<Item = InputParameter>,
    {
        parameters
            .into_iter()
            .try_fold(self, |action, parameter| action.parameter(parameter))
    }

    /// Declare the request body.
    ///
    /// # Errors
    ///
    /// Returns [`HyperError::Descriptor`] if a request body is already set.
    pub fn request_body(self, name: &str, declared_type: DeclaredType) -> Result<Self, HyperError> {
        self.parameter(InputParameter::body(name, declared_type))
    }

    /// Finish the action and return to the affordance builder.
    #[must_use]
    pub fn done(self) -> AffordanceBuilder<Accumulating> {
        let mut builder: AffordanceBuilder<Accumulating> = self.builder.into_state();
        builder.actions.push(self.descriptor);
        builder
    }
}

fn validate_rel(rel: &str) -> Result<(), RelationError> {
    if rel.is_empty() || rel.chars().any(char::is_whitespace) {
        return Err(RelationError::Invalid(rel.to_string()));
    }
    Ok(())
}

fn default_action_name(verb: HttpVerb) -> &'static str {
    match verb {
        HttpVerb::Get => "get",
        HttpVerb::Post => "create",
        HttpVerb::Put => "replace",
        HttpVerb::Patch => "update",
        HttpVerb::Delete => "delete",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::ArgumentValue;
    use hyperdoc_core::{ActionKind, ClosedSet, DescriptorError, Scalar};

    enum OrderStatus {
        Open,
        Shipped,
    }

    impl ClosedSet for OrderStatus {
        const TYPE_NAME: &'static str = "OrderStatus";
        const MEMBERS: &'static [&'static str] = &["OPEN", "SHIPPED"];

        fn symbol(&self) -> &'static str {
            match self {
                Self::Open => "OPEN",
                Self::Shipped => "SHIPPED",
            }
        }
    }

    #[test]
    fn get_with_two_unbound_query_variables() {
        let affordance = AffordanceBuilder::new("/search{?name,rating}", &Bindings::new())
            .unwrap()
            .afford(HttpVerb::Get)
            .done()
            .with_rel("search")
            .unwrap();

        assert_eq!(affordance.href(), "/search");
        assert_eq!(affordance.template(), "/search{?name,rating}");
        let [action] = affordance.action_descriptors() else {
            panic!("expected exactly one action");
        };
        assert_eq!(action.verb(), HttpVerb::Get);
        let names: Vec<&str> = action.parameter_names().collect();
        assert_eq!(names, ["name", "rating"]);
        assert!(action.parameters().iter().all(|p| !p.required && !p.has_value()));
        assert_eq!(action.template_fragment(), Some("{?name,rating}"));
    }

    #[test]
    fn post_with_bound_path_variable_and_request_body() {
        let invocation = MethodInvocation::new("addItem", HttpVerb::Post, "/orders/{id}")
            .bound(InputParameter::path("id", DeclaredType::named("u64")), 42)
            .unbound(InputParameter::body("order", DeclaredType::named("Order")));

        let affordance = AffordanceBuilder::from_invocation(&invocation)
            .unwrap()
            .with_rel("add-item")
            .unwrap();

        assert_eq!(affordance.href(), "/orders/42");
        assert!(affordance.unbound_variables().is_empty());
        assert!(!affordance.is_templated());
        let [action] = affordance.action_descriptors() else {
            panic!("expected exactly one action");
        };
        assert_eq!(action.name(), "addItem");
        assert_eq!(action.verb(), HttpVerb::Post);
        assert_eq!(action.request_body().unwrap().declared_type.name, "Order");
        assert_eq!(action.template_fragment(), None);
        assert_eq!(
            action.action_input_parameter("id").unwrap().value,
            Some(Scalar::from(42))
        );
    }

    #[test]
    fn mutating_verbs_use_form_fragment() {
        let affordance = AffordanceBuilder::new("/people/{id}{?name}", &Bindings::new())
            .unwrap()
            .afford(HttpVerb::Put)
            .done()
            .with_rel("edit")
            .unwrap();
        let action = &affordance.action_descriptors()[0];
        assert_eq!(action.template_fragment(), Some("id={id}&name={name}"));
        assert!(action.action_input_parameter("id").unwrap().required);
        assert_eq!(action.action_kind(), ActionKind::Replace);
    }

    #[test]
    fn enum_body_carries_possible_values() {
        let invocation = MethodInvocation::new("setStatus", HttpVerb::Patch, "/orders/{id}/status")
            .bound(InputParameter::path("id", DeclaredType::named("u64")), 1)
            .unbound(InputParameter::body("status", DeclaredType::of::<OrderStatus>()));
        let affordance = AffordanceBuilder::from_invocation(&invocation)
            .unwrap()
            .with_rel("status")
            .unwrap();
        let body = affordance.action_descriptors()[0].request_body().unwrap();
        let values: Vec<String> = body
            .possible_values()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(values, ["OPEN", "SHIPPED"]);
        assert_eq!(OrderStatus::Open.symbol(), "OPEN");
        assert_eq!(OrderStatus::Shipped.symbol(), "SHIPPED");
    }

    #[test]
    fn invocation_metadata_types_unbound_variables() {
        let invocation = MethodInvocation::new("find", HttpVerb::Get, "/orders")
            .unbound(
                InputParameter::new("status", DeclaredType::of::<OrderStatus>()).required(true),
            )
            .arg(
                InputParameter::new("page", DeclaredType::named("u32")),
                ArgumentValue::Absent,
            );
        let affordance = AffordanceBuilder::from_invocation(&invocation)
            .unwrap()
            .with_rel("orders")
            .unwrap();
        assert_eq!(affordance.template(), "/orders{?status}");
        let status = affordance.action_descriptors()[0]
            .action_input_parameter("status")
            .unwrap();
        assert!(status.required);
        assert_eq!(status.declared_type.name, "OrderStatus");
    }

    #[test]
    fn bound_query_argument_after_unbound_group_stays_well_formed() {
        let invocation = MethodInvocation::new("search", HttpVerb::Get, "/search{?name}")
            .unbound(InputParameter::new("name", DeclaredType::string()))
            .bound(InputParameter::new("page", DeclaredType::named("u32")), 5);
        let affordance = AffordanceBuilder::from_invocation(&invocation)
            .unwrap()
            .with_rel("search")
            .unwrap();
        assert_eq!(affordance.href(), "/search?page=5");
        assert_eq!(affordance.template(), "/search?page=5{&name}");

        let resolved = PartialUriTemplate::parse(affordance.template())
            .unwrap()
            .expand(&Bindings::new().with("name", "x"));
        assert_eq!(resolved.base_uri, "/search?page=5&name=x");
    }

    #[test]
    fn multiple_verbs_on_one_target() {
        let affordance = AffordanceBuilder::new("/items/{id}", &Bindings::new().with("id", 7))
            .unwrap()
            .afford(HttpVerb::Get)
            .done()
            .afford(HttpVerb::Put)
            .request_body("item", DeclaredType::named("Item"))
            .unwrap()
            .done()
            .afford(HttpVerb::Delete)
            .done()
            .rel("item")
            .unwrap()
            .build()
            .unwrap();
        let verbs: Vec<HttpVerb> = affordance.verbs().collect();
        assert_eq!(verbs, [HttpVerb::Get, HttpVerb::Put, HttpVerb::Delete]);
        assert_eq!(affordance.href(), "/items/7");
    }

    #[test]
    fn build_without_rel_fails() {
        let err = AffordanceBuilder::new("/items", &Bindings::new())
            .unwrap()
            .afford(HttpVerb::Get)
            .done()
            .build()
            .unwrap_err();
        assert!(matches!(err, HyperError::Relation(RelationError::Missing)));
    }

    #[test]
    fn empty_rel_fails_immediately() {
        let builder = AffordanceBuilder::new("/items", &Bindings::new()).unwrap();
        assert_eq!(builder.rel("").unwrap_err(), RelationError::Invalid(String::new()));

        let builder = AffordanceBuilder::new("/items", &Bindings::new()).unwrap();
        assert!(builder.rel("next page").is_err());
    }

    #[test]
    fn rels_are_idempotent() {
        let affordance = AffordanceBuilder::new("/items", &Bindings::new())
            .unwrap()
            .rel("items")
            .unwrap()
            .rel("items")
            .unwrap()
            .reverse_rel("/orders/1", "order")
            .unwrap()
            .reverse_rel("/orders/1", "order")
            .unwrap()
            .afford(HttpVerb::Get)
            .done()
            .build()
            .unwrap();
        assert_eq!(affordance.rels(), ["items"]);
        assert_eq!(affordance.reverse_rels().len(), 1);
    }

    #[test]
    fn duplicate_body_is_rejected_on_declaration() {
        let err = AffordanceBuilder::new("/orders", &Bindings::new())
            .unwrap()
            .afford(HttpVerb::Post)
            .request_body("a", DeclaredType::named("Order"))
            .unwrap()
            .request_body("b", DeclaredType::named("Order"))
            .unwrap_err();
        assert!(matches!(
            err,
            HyperError::Descriptor(DescriptorError::DuplicateBodyParameter { .. })
        ));
    }

    #[test]
    fn bulk_parameters_keep_order() {
        let affordance = AffordanceBuilder::new("/people", &Bindings::new())
            .unwrap()
            .afford(HttpVerb::Get)
            .parameters([
                InputParameter::new("name", DeclaredType::string()),
                InputParameter::new("city", DeclaredType::string()),
            ])
            .unwrap()
            .done()
            .with_rel("search")
            .unwrap();
        let names: Vec<&str> = affordance.action_descriptors()[0]
            .parameter_names()
            .collect();
        assert_eq!(names, ["name", "city"]);
    }

    #[test]
    fn malformed_template_is_reported() {
        let err = AffordanceBuilder::new("/orders/{id", &Bindings::new()).unwrap_err();
        assert!(matches!(err, HyperError::Template(_)));
    }
}
