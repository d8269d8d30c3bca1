use std::borrow::Cow;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;

use super::TransportError;

/// Content type applied to bodies sent without one
const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Prefix a path with `/` so it never resolves relative to the current page
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{}", path))
    }
}

/// Caller-supplied request options. Defaults to a bodiless GET.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a header from strings, e.g. parsed from user input
    pub fn try_header(self, name: &str, value: &str) -> Result<Self, TransportError> {
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| TransportError::InvalidHeaderName(name.to_string()))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|_| TransportError::InvalidHeader(name.to_string()))?;
        Ok(self.header(name, value))
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the body. Content type is left to the defaulting rule.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, TransportError> {
        let body = serde_json::to_vec(value)?;
        Ok(self.body(body))
    }
}

/// A request ready for the transport
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    /// Always starts with `/`
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl OutboundRequest {
    /// Build the outbound request from caller options.
    ///
    /// The bearer token replaces any caller Authorization header; all other
    /// caller headers are kept. A body without a content type gets JSON.
    pub fn prepare(
        path: &str,
        options: RequestOptions,
        token: Option<&str>,
    ) -> Result<Self, TransportError> {
        let RequestOptions {
            method,
            mut headers,
            body,
        } = options;

        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| TransportError::InvalidHeader(header::AUTHORIZATION.to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        if body.is_some() && !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(DEFAULT_CONTENT_TYPE),
            );
        }

        Ok(Self {
            method,
            path: normalize_path(path).into_owned(),
            headers,
            body,
        })
    }
}
