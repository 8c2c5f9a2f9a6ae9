use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Stateless HMAC-SHA256 signer for unsubscribe tokens. Pure function of
/// (id, secret); no store lookups, nothing persisted.
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
}

/// The two URL forms of one unsubscribe capability: a direct-action API
/// endpoint and a human-facing confirmation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsubscribeLinks {
    pub api_url: String,
    pub page_url: String,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Hex-encoded HMAC-SHA256 signature over the subscription id.
    pub fn sign(&self, id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(id.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verify a supplied signature against the recomputed one. Comparison is
    /// constant-time via `Mac::verify_slice`; malformed hex never propagates,
    /// it is simply a failed verification.
    pub fn verify(&self, id: &str, signature: &str) -> bool {
        let decoded = match hex::decode(signature) {
            Ok(bytes) => bytes,
            Err(_) => {
                debug!("Rejecting signature with malformed hex encoding");
                return false;
            }
        };

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(id.as_bytes());
        mac.verify_slice(&decoded).is_ok()
    }

    /// Compose both unsubscribe URLs from a single signature computation.
    pub fn unsubscribe_links(&self, id: &str, domain: &str) -> UnsubscribeLinks {
        let signature = self.sign(id);

        UnsubscribeLinks {
            api_url: format!("https://{}/api/unsubscribe/{}.{}", domain, id, signature),
            page_url: format!(
                "https://{}/unsubscribe?token={}&sig={}",
                domain, id, signature
            ),
        }
    }
}
