//! Structural validation of untrusted JSON.
//!
//! A [`Shape`] declares what a response must look like: which fields are
//! required, which are optional, and the primitive kind of each. Unknown
//! extra fields are ignored. Open-ended maps (dependency lists, dist-tags)
//! only have their values checked.
//!
//! [`validate`] runs the shape check first so the error names the exact path
//! that failed (`repository.url`, `versions["1.0.0"].name`, ...), and only then
//! hands the value to serde for re-typing.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// A response that failed structural validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{path}`: expected {expected}, found {found}")]
pub struct SchemaError {
    /// Dotted path of the offending field, `$` for the document root
    pub path: String,
    pub expected: String,
    pub found: String,
}

impl SchemaError {
    fn new(path: &str, expected: impl fmt::Display, found: impl Into<String>) -> Self {
        Self {
            path: if path.is_empty() { "$".to_owned() } else { path.to_owned() },
            expected: expected.to_string(),
            found: found.into(),
        }
    }

    /// The body was not JSON at all.
    pub fn invalid_json(err: &serde_json::Error) -> Self {
        Self::new("", "JSON document", err.to_string())
    }
}

/// Declared shape of a JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    String,
    /// Any JSON number
    Number,
    /// A non-negative integer
    Count,
    /// A number in `[0, 1]`
    Fraction,
    Boolean,
    /// Anything, including null
    Any,
    Object(Vec<Field>),
    /// Object with arbitrary keys, every value matching the inner shape
    Map(Box<Shape>),
    Array(Box<Shape>),
    /// The value must match at least one alternative
    OneOf(Vec<Shape>),
}

/// A named member of an [`Shape::Object`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

impl Field {
    pub fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    /// An optional field may be absent or null; when present it must match.
    pub fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

impl Shape {
    pub fn object(fields: impl IntoIterator<Item = Field>) -> Self {
        Self::Object(fields.into_iter().collect())
    }

    pub fn map_of(values: Shape) -> Self {
        Self::Map(Box::new(values))
    }

    pub fn array_of(items: Shape) -> Self {
        Self::Array(Box::new(items))
    }

    pub fn one_of(alternatives: impl IntoIterator<Item = Shape>) -> Self {
        Self::OneOf(alternatives.into_iter().collect())
    }

    /// Check `value` against this shape.
    pub fn check(&self, value: &Value) -> Result<(), SchemaError> {
        self.check_at(value, "")
    }

    fn check_at(&self, value: &Value, path: &str) -> Result<(), SchemaError> {
        match self {
            Shape::Any => Ok(()),
            Shape::String => match value {
                Value::String(_) => Ok(()),
                other => Err(SchemaError::new(path, self, kind_of(other))),
            },
            Shape::Number => match value {
                Value::Number(_) => Ok(()),
                other => Err(SchemaError::new(path, self, kind_of(other))),
            },
            Shape::Count => match value.as_u64() {
                Some(_) => Ok(()),
                None => Err(SchemaError::new(path, self, describe(value))),
            },
            Shape::Fraction => match value.as_f64() {
                Some(n) if (0.0..=1.0).contains(&n) => Ok(()),
                _ => Err(SchemaError::new(path, self, describe(value))),
            },
            Shape::Boolean => match value {
                Value::Bool(_) => Ok(()),
                other => Err(SchemaError::new(path, self, kind_of(other))),
            },
            Shape::Object(fields) => {
                let Value::Object(map) = value else {
                    return Err(SchemaError::new(path, self, kind_of(value)));
                };
                for field in fields {
                    let field_path = join(path, field.name);
                    match map.get(field.name) {
                        None | Some(Value::Null) if field.required => {
                            return Err(SchemaError::new(&field_path, &field.shape, "missing"));
                        }
                        None | Some(Value::Null) => {}
                        Some(inner) => field.shape.check_at(inner, &field_path)?,
                    }
                }
                Ok(())
            }
            Shape::Map(values) => {
                let Value::Object(map) = value else {
                    return Err(SchemaError::new(path, self, kind_of(value)));
                };
                for (key, inner) in map {
                    values.check_at(inner, &format!("{path}[{key:?}]"))?;
                }
                Ok(())
            }
            Shape::Array(items) => {
                let Value::Array(elements) = value else {
                    return Err(SchemaError::new(path, self, kind_of(value)));
                };
                for (index, inner) in elements.iter().enumerate() {
                    items.check_at(inner, &format!("{path}[{index}]"))?;
                }
                Ok(())
            }
            Shape::OneOf(alternatives) => {
                // An alternative whose kind matched fails below `path`; the
                // deepest such failure names the offending field.
                let here = SchemaError::new(path, self, kind_of(value));
                let mut deepest: Option<SchemaError> = None;
                for alternative in alternatives {
                    match alternative.check_at(value, path) {
                        Ok(()) => return Ok(()),
                        Err(err) if err.path != here.path => {
                            if deepest.as_ref().is_none_or(|d| err.path.len() > d.path.len()) {
                                deepest = Some(err);
                            }
                        }
                        Err(_) => {}
                    }
                }
                Err(deepest.unwrap_or(here))
            }
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::String => f.write_str("string"),
            Shape::Number => f.write_str("number"),
            Shape::Count => f.write_str("non-negative integer"),
            Shape::Fraction => f.write_str("number between 0 and 1"),
            Shape::Boolean => f.write_str("boolean"),
            Shape::Any => f.write_str("any value"),
            Shape::Object(_) => f.write_str("object"),
            Shape::Map(_) => f.write_str("map"),
            Shape::Array(_) => f.write_str("array"),
            Shape::OneOf(alternatives) => {
                let names: Vec<String> = alternatives.iter().map(|a| a.to_string()).collect();
                write!(f, "one of {}", names.join(" | "))
            }
        }
    }
}

/// A typed model with a declared wire shape.
pub trait Validated: DeserializeOwned {
    fn shape() -> Shape;
}

/// Check `value` against `T`'s shape, then convert it into `T`.
pub fn validate<T: Validated>(value: Value) -> Result<T, SchemaError> {
    T::shape().check(&value)?;
    serde_json::from_value(value).map_err(|err| SchemaError {
        path: "$".to_owned(),
        expected: std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("value")
            .to_owned(),
        found: err.to_string(),
    })
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_owned()
    } else {
        format!("{path}.{name}")
    }
}

fn kind_of(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_owned()
}

fn describe(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        other => kind_of(other),
    }
}
