//! Conversion between domain objects and generic JSON documents.
//!
//! The store never looks inside a profile or a location; it hands them to a
//! [`DocumentSerializer`] and persists whatever document comes back.

use std::marker::PhantomData;

use models::Document;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializerError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Two-way mapping between `T` and a [`Document`].
pub trait DocumentSerializer<T>: Send + Sync {
    fn to_document(&self, value: &T) -> Result<Document, SerializerError>;
    fn from_document(&self, doc: &Document) -> Result<T, SerializerError>;
}

/// Serializer for any serde type whose JSON form is an object.
pub struct SerdeDocumentSerializer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeDocumentSerializer<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerdeDocumentSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DocumentSerializer<T> for SerdeDocumentSerializer<T>
where
    T: Serialize + DeserializeOwned,
{
    fn to_document(&self, value: &T) -> Result<Document, SerializerError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(map),
            other => Err(SerializerError::NotAnObject(kind(&other))),
        }
    }

    fn from_document(&self, doc: &Document) -> Result<T, SerializerError> {
        Ok(serde_json::from_value(Value::Object(doc.clone()))?)
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
