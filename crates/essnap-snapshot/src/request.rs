//! Snapshot request descriptor.

use std::collections::BTreeMap;

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use url::Url;
use uuid::Uuid;

use crate::{Error, Result};

/// Content type sent with every snapshot request.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// HTTP methods used by the snapshot API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    /// Reads snapshot status.
    Get,
    /// Registers a repository or starts a snapshot.
    Put,
}

/// A fully described HTTP request.
///
/// The same value is signed by [`RequestSigner`](crate::RequestSigner) and
/// then sent by a [`SnapshotProvider`](crate::SnapshotProvider), so the
/// signature always covers exactly what goes on the wire. Header names are
/// stored lowercase.
#[derive(Debug, Clone)]
pub struct SnapshotRequest {
    /// Unique identifier for this request.
    pub request_id: Uuid,
    /// HTTP method.
    pub method: Method,
    /// Absolute target URL.
    pub url: Url,
    /// Headers, keyed by lowercase name.
    pub headers: BTreeMap<String, String>,
    /// Request body; empty for bodiless requests.
    pub body: Vec<u8>,
}

impl SnapshotRequest {
    /// Creates a request for the given method and URL.
    ///
    /// The `content-type: application/json` header is always set.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidInput`](crate::ErrorKind::InvalidInput) error if
    /// `url` is not an absolute URL, or if its path contains `.` or `..`
    /// segments. Parsing would resolve those segments and send the request
    /// to a different resource than the one that was built.
    pub fn new(method: Method, url: &str) -> Result<Self> {
        if has_dot_segment(url) {
            return Err(Error::invalid_input().with_message(format!(
                "Request URL '{url}' contains a '.' or '..' path segment"
            )));
        }

        let url = Url::parse(url).map_err(|e| {
            Error::invalid_input()
                .with_message(format!("Invalid request URL '{url}'"))
                .with_source(e)
        })?;

        let request = Self {
            request_id: Uuid::now_v7(),
            method,
            url,
            headers: BTreeMap::new(),
            body: Vec::new(),
        };

        Ok(request.with_header("content-type", CONTENT_TYPE_JSON))
    }

    /// Creates a `GET` request.
    pub fn get(url: &str) -> Result<Self> {
        Self::new(Method::Get, url)
    }

    /// Creates a `PUT` request.
    pub fn put(url: &str) -> Result<Self> {
        Self::new(Method::Put, url)
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a header, replacing any previous value with the same name.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    /// Inserts a header in place.
    pub fn insert_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Returns the value of a header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Returns whether the path of `url` has a segment that URL parsing would
/// resolve away, including the percent-encoded forms.
fn has_dot_segment(url: &str) -> bool {
    let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = after_scheme.split(['?', '#']).next().unwrap_or_default();

    path.split(['/', '\\']).skip(1).any(|segment| {
        let segment = segment.to_ascii_lowercase().replace("%2e", ".");
        segment == "." || segment == ".."
    })
}
