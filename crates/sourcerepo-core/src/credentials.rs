//! Private key resolution.
//!
//! A request carries its key either as a base64 encoded Google
//! service-account JSON key or as raw key text. The blob wins whenever it is
//! present and non-empty.

use std::fmt;

use base64::Engine as _;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::request::BootstrapRequest;

/// Google service-account key file.
///
/// Only `private_key` is consumed; the remaining fields are carried so the
/// whole document deserializes.
#[derive(Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub auth_provider_x509_cert_url: String,
    pub client_x509_cert_url: String,
}

impl ServiceAccountKey {
    /// Parses a key document, treating every field as empty when the
    /// document is not a valid key object.
    ///
    /// An unparseable document therefore yields an empty private key, which
    /// surfaces later as an authentication failure.
    pub fn parse_lenient(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(key) => key,
            Err(e) => {
                warn!("Service account key is not valid JSON, using empty key: {}", e);
                Self::default()
            },
        }
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("type", &self.key_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .finish_non_exhaustive()
    }
}

/// Where a resolved private key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Extracted from the base64 service-account blob.
    ServiceAccountBlob,
    /// Taken verbatim from the raw key field.
    Raw,
}

/// SSH private key text.
///
/// `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pem: String,
    source: KeySource,
}

impl PrivateKey {
    /// Wraps key text obtained from `source`.
    pub fn new(pem: impl Into<String>, source: KeySource) -> Self {
        Self {
            pem: pem.into(),
            source,
        }
    }

    /// Returns the key text.
    pub fn expose(&self) -> &str {
        &self.pem
    }

    /// Returns where the key came from.
    pub fn source(&self) -> KeySource {
        self.source
    }

    /// Returns true if no key text was supplied.
    pub fn is_empty(&self) -> bool {
        self.pem.is_empty()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("source", &self.source)
            .field("len", &self.pem.len())
            .finish()
    }
}

/// Resolves the private key for a request.
///
/// # Errors
///
/// Returns `BootstrapError::Decode` if the blob is not valid base64.
pub fn resolve_private_key(request: &BootstrapRequest) -> Result<PrivateKey> {
    match request.private_key_b64() {
        Some(blob) if !blob.is_empty() => {
            let bytes = base64::engine::general_purpose::STANDARD.decode(blob)?;
            let key = ServiceAccountKey::parse_lenient(&bytes);
            debug!(
                "Resolved private key from service account blob (key id: {})",
                key.private_key_id
            );
            Ok(PrivateKey::new(key.private_key, KeySource::ServiceAccountBlob))
        },
        _ => {
            debug!("Resolved private key from raw key field");
            Ok(PrivateKey::new(
                request.private_key_str().unwrap_or_default(),
                KeySource::Raw,
            ))
        },
    }
}
