use crate::constants::{OK_CODE, RESULT_CODES};
use crate::error::{ConcordError, Result};
use rand::Rng;
use serde_json::Value;

/// Decode the vendor result envelope and extract the `data` payload.
///
/// Every endpoint except the snapshot wraps its response as
/// `{"result": N, "data": {...}}`. A zero result code yields the `data`
/// object untouched (`null` when the camera omits it, e.g. on setters).
pub fn unpack_envelope(body: &[u8]) -> Result<Value> {
    let reply: Value = serde_json::from_slice(body)
        .map_err(|e| ConcordError::ProtocolError(format!("Error parsing JSON envelope: {}", e)))?;

    let code = reply
        .get("result")
        .and_then(|r| r.as_u64())
        .ok_or_else(|| ConcordError::ProtocolError("Envelope missing result code".to_string()))?
        as u32;

    if code == OK_CODE {
        return Ok(reply.get("data").cloned().unwrap_or(Value::Null));
    }

    Err(error_for_code(code))
}

/// Map a non-zero vendor result code to its typed error.
pub fn error_for_code(code: u32) -> ConcordError {
    let message = format!(
        "{} (result code {})",
        RESULT_CODES.get(&code).copied().unwrap_or("Unknown result code"),
        code
    );

    match code {
        2 => ConcordError::AuthenticationError(message),
        3 => ConcordError::PermissionError(message),
        4 => ConcordError::NotFoundError(message),
        6 => ConcordError::DeviceBusyError(message),
        _ => ConcordError::ProtocolError(message),
    }
}

/// A parsed `WWW-Authenticate: Digest ...` challenge.
///
/// The camera answers some endpoints with a Digest challenge instead of
/// accepting Basic credentials; the client computes the RFC 2617 MD5
/// response and retries the request once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
    pub qop: Option<String>,
    pub opaque: Option<String>,
    pub algorithm: Option<String>,
}

impl DigestChallenge {
    pub fn parse(header: &str) -> Option<Self> {
        let params = header.trim().strip_prefix("Digest")?.trim();

        let mut challenge = DigestChallenge::default();
        for param in split_params(params) {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "realm" => challenge.realm = value,
                "nonce" => challenge.nonce = value,
                "qop" => challenge.qop = Some(value),
                "opaque" => challenge.opaque = Some(value),
                "algorithm" => challenge.algorithm = Some(value),
                _ => {}
            }
        }

        if challenge.nonce.is_empty() {
            return None;
        }
        Some(challenge)
    }

    /// Build the `Authorization` header value for one request.
    pub fn authorization(&self, username: &str, password: &str, method: &str, uri: &str) -> String {
        let nonce_bytes: [u8; 8] = rand::thread_rng().r#gen();
        let cnonce: String = nonce_bytes.iter().map(|b| format!("{:02x}", b)).collect();
        self.authorization_with(username, password, method, uri, &cnonce, "00000001")
    }

    // Deterministic variant; the public entry point feeds it a random cnonce.
    pub(crate) fn authorization_with(
        &self,
        username: &str,
        password: &str,
        method: &str,
        uri: &str,
        cnonce: &str,
        nc: &str,
    ) -> String {
        let ha1 = md5_hex(&format!("{}:{}:{}", username, self.realm, password));
        let ha2 = md5_hex(&format!("{}:{}", method, uri));

        let response = if self.use_qop_auth() {
            md5_hex(&format!(
                "{}:{}:{}:{}:auth:{}",
                ha1, self.nonce, nc, cnonce, ha2
            ))
        } else {
            md5_hex(&format!("{}:{}:{}", ha1, self.nonce, ha2))
        };

        let mut header = format!(
            "Digest username=\"{}\", realm=\"{}\", nonce=\"{}\", uri=\"{}\", response=\"{}\"",
            username, self.realm, self.nonce, uri, response
        );
        if self.use_qop_auth() {
            header.push_str(&format!(", qop=auth, nc={}, cnonce=\"{}\"", nc, cnonce));
        }
        if let Some(opaque) = &self.opaque {
            header.push_str(&format!(", opaque=\"{}\"", opaque));
        }
        if let Some(algorithm) = &self.algorithm {
            header.push_str(&format!(", algorithm={}", algorithm));
        }
        header
    }

    fn use_qop_auth(&self) -> bool {
        self.qop
            .as_deref()
            .is_some_and(|qop| qop.split(',').any(|q| q.trim() == "auth"))
    }
}

// Challenge params are comma separated, but qop="auth,auth-int" nests a
// comma inside quotes.
fn split_params(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, c) in params.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(params[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(params[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

pub(crate) fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// Serialize a patch struct into the partial-update body for a setter.
/// `skip_serializing_if` on the patch fields keeps unset fields out.
pub(crate) fn encode_patch<T: serde::Serialize>(patch: &T) -> Result<Value> {
    serde_json::to_value(patch)
        .map_err(|e| ConcordError::ProtocolError(format!("Error encoding request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_success_passes_data_through() {
        let body = br#"{"result":0,"data":{"dhcp":0,"ip":"192.168.1.10"}}"#;
        let data = unpack_envelope(body).unwrap();
        assert_eq!(data, json!({"dhcp": 0, "ip": "192.168.1.10"}));
    }

    #[test]
    fn envelope_success_without_data_is_null() {
        let data = unpack_envelope(br#"{"result":0}"#).unwrap();
        assert_eq!(data, Value::Null);
    }

    #[test]
    fn envelope_codes_map_to_typed_errors() {
        let cases = [
            (1u32, "ProtocolError"),
            (2, "AuthenticationError"),
            (3, "PermissionError"),
            (4, "NotFoundError"),
            (5, "ProtocolError"),
            (6, "DeviceBusyError"),
            (42, "ProtocolError"),
        ];
        for (code, expected) in cases {
            let body = format!("{{\"result\":{},\"data\":{{}}}}", code);
            let err = unpack_envelope(body.as_bytes()).unwrap_err();
            let variant = match err {
                ConcordError::AuthenticationError(_) => "AuthenticationError",
                ConcordError::PermissionError(_) => "PermissionError",
                ConcordError::NotFoundError(_) => "NotFoundError",
                ConcordError::DeviceBusyError(_) => "DeviceBusyError",
                ConcordError::ProtocolError(_) => "ProtocolError",
                other => panic!("unexpected error for code {}: {}", code, other),
            };
            assert_eq!(variant, expected, "result code {}", code);
        }
    }

    #[test]
    fn malformed_json_is_a_protocol_error() {
        let err = unpack_envelope(b"<html>not json</html>").unwrap_err();
        assert!(matches!(err, ConcordError::ProtocolError(_)));
    }

    #[test]
    fn missing_result_code_is_a_protocol_error() {
        let err = unpack_envelope(br#"{"data":{}}"#).unwrap_err();
        assert!(matches!(err, ConcordError::ProtocolError(_)));
    }

    #[test]
    fn parses_digest_challenge_with_quoted_qop_list() {
        let challenge = DigestChallenge::parse(
            "Digest realm=\"ipcam\", nonce=\"abc123\", qop=\"auth,auth-int\", opaque=\"xyz\"",
        )
        .unwrap();
        assert_eq!(challenge.realm, "ipcam");
        assert_eq!(challenge.nonce, "abc123");
        assert_eq!(challenge.qop.as_deref(), Some("auth,auth-int"));
        assert_eq!(challenge.opaque.as_deref(), Some("xyz"));
    }

    #[test]
    fn rejects_non_digest_challenges() {
        assert_eq!(DigestChallenge::parse("Basic realm=\"ipcam\""), None);
        assert_eq!(DigestChallenge::parse("Digest realm=\"ipcam\""), None);
    }

    // Worked example from RFC 2617 section 3.5.
    #[test]
    fn digest_response_matches_rfc2617_example() {
        let challenge = DigestChallenge {
            realm: "testrealm@host.com".to_string(),
            nonce: "dcd98b7102dd2f0e8b11d0f600bfb0c093".to_string(),
            qop: Some("auth,auth-int".to_string()),
            opaque: Some("5ccc069c403ebaf9f0171e9517f40e41".to_string()),
            algorithm: None,
        };
        let header = challenge.authorization_with(
            "Mufasa",
            "Circle Of Life",
            "GET",
            "/dir/index.html",
            "0a4f113b",
            "00000001",
        );
        assert!(
            header.contains("response=\"6629fae49393a05397450978507c4ef1\""),
            "unexpected header: {}",
            header
        );
        assert!(header.contains("qop=auth"));
        assert!(header.contains("opaque=\"5ccc069c403ebaf9f0171e9517f40e41\""));
    }

    #[test]
    fn digest_without_qop_uses_legacy_response() {
        let challenge = DigestChallenge {
            realm: "ipcam".to_string(),
            nonce: "abc".to_string(),
            qop: None,
            opaque: None,
            algorithm: None,
        };
        let header =
            challenge.authorization_with("admin", "", "GET", "/api/v1/system/info", "x", "00000001");
        let expected = md5_hex(&format!(
            "{}:abc:{}",
            md5_hex("admin:ipcam:"),
            md5_hex("GET:/api/v1/system/info")
        ));
        assert!(header.contains(&format!("response=\"{}\"", expected)));
        assert!(!header.contains("cnonce"));
    }
}
