//! Introspection capability used by the transformer.
//!
//! Any value the transformer walks implements [`Introspect`], which
//! classifies it once into a [`Shape`]: null, scalar, sequence, mapping,
//! bean-like object, or link-bearing resource. How members are discovered
//! (hand-written impls, [`introspect_struct!`](crate::introspect_struct),
//! or generated code) is up to the implementor.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use hyperdoc_affordance::{Links, Resource};
use hyperdoc_core::{AccessError, Scalar};
use hyperdoc_uri::PartialUriTemplate;

/// What a value looks like to the transformer.
pub enum Shape<'a> {
    Null,
    Scalar(Scalar),
    Sequence(Vec<&'a dyn Introspect>),
    Mapping(Vec<(String, &'a dyn Introspect)>),
    Object(Vec<Property<'a>>),
    Resource {
        links: &'a Links,
        content: &'a dyn Introspect,
    },
}

/// A value the transformer can walk.
pub trait Introspect {
    fn shape(&self) -> Shape<'_>;

    /// Type name used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Stable identity of shared allocations, used for cycle detection.
    fn identity(&self) -> Option<usize> {
        None
    }
}

/// A member value returned by an accessor.
pub enum Member<'a> {
    Borrowed(&'a dyn Introspect),
    Owned(Box<dyn Introspect + 'a>),
}

impl<'a> Member<'a> {
    #[must_use]
    pub fn get(&self) -> &dyn Introspect {
        match self {
            Self::Borrowed(value) => *value,
            Self::Owned(value) => value.as_ref(),
        }
    }
}

type Accessor<'a> = Box<dyn Fn() -> Result<Member<'a>, AccessError> + 'a>;

/// One named member of a bean-like object.
pub struct Property<'a> {
    name: Cow<'a, str>,
    declared_type: &'static str,
    accessor: Accessor<'a>,
}

impl<'a> Property<'a> {
    /// A plain field. Reading it never fails.
    pub fn field<T: Introspect>(name: impl Into<Cow<'a, str>>, value: &'a T) -> Self {
        Self {
            name: name.into(),
            declared_type: std::any::type_name::<T>(),
            accessor: Box::new(move || Ok(Member::Borrowed(value))),
        }
    }

    /// A computed member whose accessor may fail.
    pub fn computed<F>(
        name: impl Into<Cow<'a, str>>,
        declared_type: &'static str,
        accessor: F,
    ) -> Self
    where
        F: Fn() -> Result<Member<'a>, AccessError> + 'a,
    {
        Self {
            name: name.into(),
            declared_type,
            accessor: Box::new(accessor),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn declared_type(&self) -> &'static str {
        self.declared_type
    }

    /// # Errors
    ///
    /// Propagates whatever the accessor raises.
    pub fn read(&self) -> Result<Member<'a>, AccessError> {
        (self.accessor)()
    }
}

impl fmt::Debug for Property<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .finish_non_exhaustive()
    }
}

/// Implement [`Introspect`] for a struct by listing its exposed fields in
/// order.
///
/// ```
/// use hyperdoc_transform::introspect_struct;
///
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// introspect_struct!(Person { name, age });
/// ```
#[macro_export]
macro_rules! introspect_struct {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::Introspect for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                $crate::Shape::Object(vec![
                    $($crate::Property::field(stringify!($field), &self.$field)),*
                ])
            }
        }
    };
}

/// Implement [`Introspect`] for closed-set enumerations. Members become
/// symbol scalars carrying their symbolic name.
///
/// ```
/// use hyperdoc_transform::{introspect_closed_set, ClosedSet};
///
/// enum Status {
///     Open,
///     Closed,
/// }
///
/// impl ClosedSet for Status {
///     const TYPE_NAME: &'static str = "Status";
///     const MEMBERS: &'static [&'static str] = &["OPEN", "CLOSED"];
///
///     fn symbol(&self) -> &'static str {
///         match self {
///             Self::Open => "OPEN",
///             Self::Closed => "CLOSED",
///         }
///     }
/// }
///
/// introspect_closed_set!(Status);
/// ```
#[macro_export]
macro_rules! introspect_closed_set {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Introspect for $ty {
                fn shape(&self) -> $crate::Shape<'_> {
                    $crate::Shape::Scalar($crate::Scalar::symbol(self))
                }

                fn type_name(&self) -> &'static str {
                    <$ty as $crate::ClosedSet>::TYPE_NAME
                }
            }
        )+
    };
}

macro_rules! scalar_introspect {
    ($($ty:ty),*) => {
        $(
            impl Introspect for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar(Scalar::from(*self))
                }
            }
        )*
    };
}

scalar_introspect!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Introspect for char {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::String(self.to_string()))
    }
}

impl Introspect for str {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::String(self.to_string()))
    }
}

impl Introspect for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::String(self.clone()))
    }
}

/// Templates are carried as URI scalars, unexpanded.
impl Introspect for PartialUriTemplate {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Uri(self.as_str().to_string()))
    }
}

impl Introspect for Scalar {
    fn shape(&self) -> Shape<'_> {
        match self {
            Scalar::Null => Shape::Null,
            other => Shape::Scalar(other.clone()),
        }
    }
}

impl<Tz: TimeZone> Introspect for DateTime<Tz> {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Timestamp(self.with_timezone(&Utc)))
    }
}

impl Introspect for NaiveDate {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Date(*self))
    }
}

impl Introspect for NaiveDateTime {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::LocalDateTime(*self))
    }
}

impl<T: Introspect> Introspect for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(value) => value.shape(),
            None => Shape::Null,
        }
    }

    fn type_name(&self) -> &'static str {
        self.as_ref().map_or(std::any::type_name::<Self>(), T::type_name)
    }

    fn identity(&self) -> Option<usize> {
        self.as_ref().and_then(T::identity)
    }
}

impl<T: Introspect + ?Sized> Introspect for &T {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn identity(&self) -> Option<usize> {
        (**self).identity()
    }
}

impl<T: Introspect + ?Sized> Introspect for Box<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn identity(&self) -> Option<usize> {
        (**self).identity()
    }
}

impl<T: Introspect + ?Sized> Introspect for Rc<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn identity(&self) -> Option<usize> {
        Some(Rc::as_ptr(self).cast::<()>() as usize)
    }
}

impl<T: Introspect + ?Sized> Introspect for Arc<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn identity(&self) -> Option<usize> {
        Some(Arc::as_ptr(self).cast::<()>() as usize)
    }
}

impl<T: Introspect> Introspect for [T] {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|v| v as &dyn Introspect).collect())
    }
}

impl<T: Introspect> Introspect for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        self.as_slice().shape()
    }
}

impl<K: fmt::Display, V: Introspect> Introspect for BTreeMap<K, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Mapping(
            self.iter()
                .map(|(k, v)| (k.to_string(), v as &dyn Introspect))
                .collect(),
        )
    }
}

/// Entries are emitted in key order so repeated transforms agree.
impl<K: fmt::Display, V: Introspect, S: BuildHasher> Introspect for HashMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        let mut entries: Vec<(String, &dyn Introspect)> = self
            .iter()
            .map(|(k, v)| (k.to_string(), v as &dyn Introspect))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Shape::Mapping(entries)
    }
}

impl Introspect for serde_json::Value {
    fn shape(&self) -> Shape<'_> {
        use serde_json::Value;

        match self {
            Value::Null => Shape::Null,
            Value::Bool(b) => Shape::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => Shape::Scalar(Scalar::Number(n.clone())),
            Value::String(s) => Shape::Scalar(Scalar::String(s.clone())),
            Value::Array(items) => items.shape(),
            Value::Object(map) => Shape::Mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), v as &dyn Introspect))
                    .collect(),
            ),
        }
    }
}

impl<T: Introspect> Introspect for Resource<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Resource {
            links: &self.links,
            content: &self.content,
        }
    }

    fn identity(&self) -> Option<usize> {
        self.content.identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Account {
        owner: String,
    }

    impl Introspect for Account {
        fn shape(&self) -> Shape<'_> {
            Shape::Object(vec![
                Property::field("owner", &self.owner),
                Property::computed("balance", "f64", || Err("ledger offline".into())),
            ])
        }
    }

    #[test]
    fn objects_list_members_in_order() {
        let account = Account {
            owner: "jane".into(),
        };
        let Shape::Object(props) = account.shape() else {
            panic!("expected object shape");
        };
        let names: Vec<&str> = props.iter().map(Property::name).collect();
        assert_eq!(names, ["owner", "balance"]);
        assert_eq!(props[0].declared_type(), "alloc::string::String");
        assert!(props[1].read().is_err());
    }

    #[test]
    fn option_delegates_to_inner_value() {
        assert!(matches!(None::<u8>.shape(), Shape::Null));
        assert!(matches!(Some(3u8).shape(), Shape::Scalar(_)));
    }

    #[test]
    fn shared_pointers_expose_identity() {
        let shared = Rc::new(5u32);
        let alias = Rc::clone(&shared);
        assert_eq!(shared.identity(), alias.identity());
        assert!(Rc::new(5u32).identity() != shared.identity());
        assert_eq!(5u32.identity(), None);
    }

    #[test]
    fn hash_maps_are_key_ordered() {
        let map: HashMap<&str, u8> = [("b", 2), ("a", 1), ("c", 3)].into_iter().collect();
        let Shape::Mapping(entries) = map.shape() else {
            panic!("expected mapping shape");
        };
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn templates_are_uri_scalars() {
        let template = PartialUriTemplate::parse("/orders/{id}").unwrap();
        let Shape::Scalar(scalar) = template.shape() else {
            panic!("expected scalar shape");
        };
        assert_eq!(scalar, Scalar::Uri("/orders/{id}".into()));
    }

    #[test]
    fn json_values_classify() {
        let value = serde_json::json!({"a": [1, null], "b": null});
        let Shape::Mapping(entries) = value.shape() else {
            panic!("expected mapping shape");
        };
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[1].1.shape(), Shape::Null));
    }
}
