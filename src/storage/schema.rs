//! Schema Validation Module
//!
//! The typed layer only needs a two-outcome contract from a schema engine:
//! a candidate value is either accepted (possibly canonicalized) or rejected.
//! Why a candidate was rejected is never inspected.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

// == Validation Outcome ==
/// Outcome of validating a candidate value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T> {
    /// The candidate matched; carries the canonical typed value
    Accepted(T),
    /// The candidate did not match
    Rejected,
}

impl<T> Validation<T> {
    /// Returns true for [`Validation::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accepted(_))
    }

    /// Returns the accepted value or `fallback`.
    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            Validation::Accepted(value) => value,
            Validation::Rejected => fallback,
        }
    }

    /// Converts into an `Option`, mapping [`Validation::Rejected`] to `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Validation::Accepted(value) => Some(value),
            Validation::Rejected => None,
        }
    }
}

impl<T> From<Option<T>> for Validation<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Validation::Rejected, Validation::Accepted)
    }
}

// == Schema Trait ==
/// Validates an untyped candidate into a `T`.
pub trait Schema<T> {
    fn validate(&self, candidate: Value) -> Validation<T>;
}

impl<T, F> Schema<T> for F
where
    F: Fn(Value) -> Validation<T>,
{
    fn validate(&self, candidate: Value) -> Validation<T> {
        self(candidate)
    }
}

// == Typed ==
/// Accepts a candidate iff it deserializes into `T`.
///
/// Object fields unknown to `T` are dropped; missing required fields or a
/// type mismatch anywhere in the value reject the whole candidate.
pub struct Typed<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Typed<T> {
    /// Creates the schema; see [`typed`] for the usual shorthand.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Typed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Typed<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for Typed<T> {}

impl<T> std::fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Typed<{}>", std::any::type_name::<T>())
    }
}

impl<T: DeserializeOwned> Schema<T> for Typed<T> {
    fn validate(&self, candidate: Value) -> Validation<T> {
        serde_json::from_value::<T>(candidate).ok().into()
    }
}

/// Shorthand for [`Typed::new`].
pub fn typed<T: DeserializeOwned>() -> Typed<T> {
    Typed::new()
}

/// Accepts only strings equal to one of `allowed`.
pub fn one_of(allowed: &[&str]) -> Refined<Typed<String>, impl Fn(&String) -> bool> {
    let allowed: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
    typed::<String>().refine(move |value: &String| allowed.contains(value))
}

// == Combinators ==
/// Schema that additionally requires a predicate to hold.
#[derive(Debug, Clone)]
pub struct Refined<S, F> {
    inner: S,
    predicate: F,
}

impl<T, S, F> Schema<T> for Refined<S, F>
where
    S: Schema<T>,
    F: Fn(&T) -> bool,
{
    fn validate(&self, candidate: Value) -> Validation<T> {
        match self.inner.validate(candidate) {
            Validation::Accepted(value) if (self.predicate)(&value) => Validation::Accepted(value),
            _ => Validation::Rejected,
        }
    }
}

/// Schema that transforms accepted values.
pub struct Mapped<S, F, T> {
    inner: S,
    transform: F,
    _marker: PhantomData<fn(T)>,
}

impl<T, U, S, F> Schema<U> for Mapped<S, F, T>
where
    S: Schema<T>,
    F: Fn(T) -> U,
{
    fn validate(&self, candidate: Value) -> Validation<U> {
        match self.inner.validate(candidate) {
            Validation::Accepted(value) => Validation::Accepted((self.transform)(value)),
            Validation::Rejected => Validation::Rejected,
        }
    }
}

/// Combinator methods available on every schema.
pub trait SchemaExt<T>: Schema<T> + Sized {
    /// Rejects accepted values for which `predicate` is false.
    fn refine<F>(self, predicate: F) -> Refined<Self, F>
    where
        F: Fn(&T) -> bool,
    {
        Refined {
            inner: self,
            predicate,
        }
    }

    /// Canonicalizes accepted values with `transform`.
    fn map<U, F>(self, transform: F) -> Mapped<Self, F, T>
    where
        F: Fn(T) -> U,
    {
        Mapped {
            inner: self,
            transform,
            _marker: PhantomData,
        }
    }
}

impl<T, S: Schema<T>> SchemaExt<T> for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: String,
        name: String,
    }

    #[test]
    fn test_typed_accepts_matching_shape() {
        let schema = typed::<User>();
        let result = schema.validate(json!({"id": "123", "name": "Alice"}));
        assert_eq!(
            result,
            Validation::Accepted(User {
                id: "123".to_string(),
                name: "Alice".to_string()
            })
        );
    }

    #[test]
    fn test_typed_rejects_missing_field() {
        let schema = typed::<User>();
        assert_eq!(schema.validate(json!({"id": "123"})), Validation::Rejected);
    }

    #[test]
    fn test_typed_strips_unknown_fields() {
        let schema = typed::<User>();
        let result = schema.validate(json!({"id": "1", "name": "Bob", "extra": true}));
        assert!(result.is_accepted());
    }

    #[test]
    fn test_typed_scalar_mismatch() {
        assert_eq!(typed::<String>().validate(json!(1)), Validation::Rejected);
        assert_eq!(typed::<f64>().validate(json!("oops")), Validation::Rejected);
        assert_eq!(typed::<bool>().validate(json!(true)), Validation::Accepted(true));
    }

    #[test]
    fn test_refine_range() {
        let schema = typed::<f64>().refine(|age: &f64| (18.0..=100.0).contains(age));
        assert_eq!(schema.validate(json!(25)), Validation::Accepted(25.0));
        assert_eq!(schema.validate(json!(15)), Validation::Rejected);
    }

    #[test]
    fn test_one_of() {
        let schema = one_of(&["en", "es", "fr"]);
        assert_eq!(schema.validate(json!("en")), Validation::Accepted("en".to_string()));
        assert_eq!(schema.validate(json!("invalid")), Validation::Rejected);
    }

    #[test]
    fn test_map_canonicalizes() {
        let schema = typed::<String>().map(|s: String| s.trim().to_lowercase());
        assert_eq!(
            schema.validate(json!("  EN ")),
            Validation::Accepted("en".to_string())
        );
    }

    #[test]
    fn test_closure_schema() {
        let schema = |candidate: Value| -> Validation<i64> {
            candidate.as_i64().filter(|n| n % 2 == 0).into()
        };
        assert_eq!(schema.validate(json!(4)), Validation::Accepted(4));
        assert_eq!(schema.validate(json!(3)), Validation::Rejected);
    }

    #[test]
    fn test_validation_helpers() {
        assert_eq!(Validation::Accepted(1).unwrap_or(0), 1);
        assert_eq!(Validation::<i32>::Rejected.unwrap_or(0), 0);
        assert_eq!(Validation::Accepted(1).into_option(), Some(1));
    }
}
