use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::headers::{self, Headers};
use super::MessageError;

/// An immutable envelope: a typed payload plus a header set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message<T> {
    payload: T,
    #[serde(default)]
    headers: Headers,
}

impl<T> Message<T> {
    /// Create a message with empty headers.
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            headers: Headers::new(),
        }
    }

    /// Create a message with the given headers.
    pub fn with_headers(payload: T, headers: Headers) -> Self {
        Self { payload, headers }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get a header value.
    pub fn header(&self, key: &str) -> Option<&Value> {
        self.headers.get(key)
    }

    /// Get a header value if it is a string.
    pub fn header_str(&self, key: &str) -> Option<&str> {
        self.headers.get(key).and_then(Value::as_str)
    }

    /// Returns true if the header is present.
    pub fn has_header(&self, key: &str) -> bool {
        self.headers.contains_key(key)
    }

    /// Return a new message with an additional user header.
    ///
    /// Framework-owned keys (see [`headers::RESERVED`]) are rejected; use
    /// [`Message::override_header`] to replace one deliberately.
    pub fn with_header(
        self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, MessageError> {
        let key = key.into();
        if headers::is_reserved(&key) {
            return Err(MessageError::ReservedHeader(key));
        }
        Ok(self.override_header(key, value))
    }

    /// Return a new message with `key` set to `value`, reserved or not.
    pub fn override_header(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Return a new message without `key`.
    pub fn without_header(mut self, key: &str) -> Self {
        self.headers.remove(key);
        self
    }

    /// Return a new message with the payload replaced and headers preserved.
    pub fn map_payload<U>(self, f: impl FnOnce(T) -> U) -> Message<U> {
        Message {
            payload: f(self.payload),
            headers: self.headers,
        }
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    pub fn into_parts(self) -> (T, Headers) {
        (self.payload, self.headers)
    }
}

impl<T> From<T> for Message<T> {
    fn from(payload: T) -> Self {
        Message::new(payload)
    }
}
