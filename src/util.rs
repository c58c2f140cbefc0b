use axum::http::{HeaderMap, header};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand_core::{OsRng, RngCore};

pub fn random_urlsafe_string(num_bytes: usize) -> String {
    let mut bytes = vec![0u8; num_bytes];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn get_header(headers: &HeaderMap, key: impl header::AsHeaderName) -> Option<String> {
    if let Some(header) = headers.get(key) {
        if let Ok(header) = header.to_str() {
            return Some(header.to_string());
        }
    }
    None
}

pub fn get_ua(headers: &HeaderMap) -> String {
    match get_header(headers, header::USER_AGENT) {
        Some(ua) => ua,
        None => "-".to_string(),
    }
}
