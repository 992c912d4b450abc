#![allow(dead_code)]
use base64::Engine as _;
use sourcerepo_core::{BootstrapRequest, BootstrapRequestBuilder};

/// Builder pre-filled with the required fields.
pub fn request() -> BootstrapRequestBuilder {
    BootstrapRequest::builder()
        .repo_name("platform-config")
        .project("acme-infra")
        .username("deployer@acme-infra.iam.gserviceaccount.com")
}

/// Base64 encodes a service-account key document carrying `private_key`.
pub fn service_account_blob(private_key: &str) -> String {
    let doc = serde_json::json!({
        "type": "service_account",
        "project_id": "acme-infra",
        "private_key_id": "0123456789abcdef",
        "private_key": private_key,
        "client_email": "deployer@acme-infra.iam.gserviceaccount.com",
        "client_id": "109876543210",
        "auth_uri": "https://accounts.google.com/o/oauth2/auth",
        "token_uri": "https://oauth2.googleapis.com/token",
    });
    base64::engine::general_purpose::STANDARD.encode(doc.to_string())
}
