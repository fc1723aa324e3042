//! Variable bindings used for template expansion.

use std::collections::BTreeMap;

use hyperdoc_core::Scalar;

/// Values bound to template variables. A variable bound to
/// [`Scalar::Null`] counts as unbound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: BTreeMap<String, Scalar>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.bind(name, value);
        self
    }

    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Scalar>) {
        self.values.insert(name.into(), value.into());
    }

    /// The bound value, or `None` if the variable is missing or null.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    #[must_use]
    pub fn is_bound(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of non-null bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.values().filter(|v| !v.is_null()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn token(&self, name: &str) -> Option<String> {
        self.get(name).and_then(Scalar::as_token)
    }
}

impl<K, V> FromIterator<(K, V)> for Bindings
where
    K: Into<String>,
    V: Into<Scalar>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Self::new();
        for (name, value) in iter {
            bindings.bind(name, value);
        }
        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_bindings_count_as_unbound() {
        let bindings = Bindings::new().with("id", 42).with("name", Scalar::Null);
        assert!(bindings.is_bound("id"));
        assert!(!bindings.is_bound("name"));
        assert!(!bindings.is_bound("missing"));
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn collects_from_pairs() {
        let bindings: Bindings = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(bindings.get("b"), Some(&Scalar::from("2")));
    }
}
