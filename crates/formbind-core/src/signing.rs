//! Anti-forgery tokens for rendered forms.
//!
//! A form embeds a hidden field produced by a [`NonceProvider`]. Hosts with
//! their own token machinery implement the trait; [`NonceSigner`] is a
//! self-contained implementation that signs `(action, tick)` pairs with
//! HMAC-SHA256. A tick is half the token lifetime, and a token verifies
//! during the tick it was issued in and the one after.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::FormError;
use crate::utils::text::escape_attr;

type HmacSha256 = Hmac<Sha256>;

/// Default token lifetime: one day.
const DEFAULT_LIFETIME_SECS: u64 = 86_400;

/// Number of base64 characters kept from the MAC.
const NONCE_LEN: usize = 20;

/// Supplies the hidden anti-forgery field embedded in every rendered form.
pub trait NonceProvider: Send + Sync {
    /// Returns the hidden-field markup for `action`. Embedded verbatim.
    fn nonce_field(&self, action: &str) -> String;
}

/// Signs and verifies per-action anti-forgery tokens.
///
/// # Examples
///
/// ```
/// use formbind_core::signing::NonceSigner;
///
/// let signer = NonceSigner::new("my-secret-key");
/// let nonce = signer.create_nonce("update_options");
/// assert!(signer.verify_nonce("update_options", &nonce).is_ok());
/// assert!(signer.verify_nonce("delete_everything", &nonce).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct NonceSigner {
    key: String,
    salt: String,
    field_name: String,
    lifetime_secs: u64,
}

impl NonceSigner {
    /// Creates a new signer with the given secret key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            salt: "formbind.signing.nonce".to_string(),
            field_name: "_wpnonce".to_string(),
            lifetime_secs: DEFAULT_LIFETIME_SECS,
        }
    }

    /// Sets the name of the emitted hidden field.
    #[must_use]
    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }

    /// Sets the salt mixed into the HMAC key.
    #[must_use]
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = salt.into();
        self
    }

    /// Sets the token lifetime in seconds. Values below 2 are raised to 2.
    #[must_use]
    pub fn with_lifetime(mut self, secs: u64) -> Self {
        self.lifetime_secs = secs.max(2);
        self
    }

    /// Returns the name of the hidden field this signer emits.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Creates a token for `action`, valid for the configured lifetime.
    pub fn create_nonce(&self, action: &str) -> String {
        self.nonce_for_tick(action, self.current_tick())
    }

    /// Verifies a token previously created for `action`.
    ///
    /// Returns the age of the token in ticks: `0` when issued in the current
    /// tick, `1` when issued in the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::SignatureError`] if the token is empty, was issued
    /// for another action, or has expired.
    pub fn verify_nonce(&self, action: &str, nonce: &str) -> Result<u8, FormError> {
        if nonce.is_empty() {
            return Err(FormError::SignatureError("Empty nonce".to_string()));
        }
        let tick = self.current_tick();
        if constant_time_eq(nonce, &self.nonce_for_tick(action, tick)) {
            return Ok(0);
        }
        if tick > 0 && constant_time_eq(nonce, &self.nonce_for_tick(action, tick - 1)) {
            return Ok(1);
        }
        Err(FormError::SignatureError(
            "Nonce verification failed".to_string(),
        ))
    }

    fn current_tick(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        now / (self.lifetime_secs / 2)
    }

    fn nonce_for_tick(&self, action: &str, tick: u64) -> String {
        let salted_key = format!("{}:{}", self.salt, self.key);
        let mut mac =
            HmacSha256::new_from_slice(salted_key.as_bytes()).expect("HMAC accepts any key size");
        mac.update(format!("{tick}|{action}").as_bytes());
        let encoded = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        encoded[..NONCE_LEN].to_string()
    }
}

impl NonceProvider for NonceSigner {
    fn nonce_field(&self, action: &str) -> String {
        format!(
            r#"<input type="hidden" name="{}" value="{}" />"#,
            escape_attr(&self.field_name),
            self.create_nonce(action)
        )
    }
}

/// Compares two strings without short-circuiting on the first difference.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
