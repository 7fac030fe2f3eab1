/*!
 * Request nonces.
 *
 * A nonce binds an action to a user for a limited time. It is derived from
 * the configured secret and a coarse time tick, so nothing has to be stored:
 * a nonce is accepted during the tick it was issued in and the one after.
 */

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::app_config::Config;

/// Hex characters kept from the digest
const NONCE_LENGTH: usize = 10;

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Issues and checks nonces for one secret
#[derive(Clone)]
pub struct NonceVerifier {
    secret: String,
    lifetime_secs: u64,
}

impl std::fmt::Debug for NonceVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceVerifier")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl NonceVerifier {
    pub fn new(secret: impl Into<String>, lifetime_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            // A tick is half a lifetime and must not be zero
            lifetime_secs: lifetime_secs.max(2),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.nonce_secret.clone(), config.nonce_lifetime_secs)
    }

    fn tick(&self, now_secs: u64) -> u64 {
        now_secs / (self.lifetime_secs / 2)
    }

    fn digest(&self, action: &str, user: &str, tick: u64) -> String {
        let tick = tick.to_string();
        let mut hasher = Sha256::new();
        for part in [self.secret.as_str(), action, user, tick.as_str()] {
            hasher.update(part.as_bytes());
            hasher.update(b"|");
        }
        let mut hex = format!("{:x}", hasher.finalize());
        hex.truncate(NONCE_LENGTH);
        hex
    }

    /// Nonce for `action` by `user` at `now_secs`
    pub fn issue_at(&self, action: &str, user: &str, now_secs: u64) -> String {
        self.digest(action, user, self.tick(now_secs))
    }

    /// Nonce for `action` by `user`, valid from now on
    pub fn issue(&self, action: &str, user: &str) -> String {
        self.issue_at(action, user, now_secs())
    }

    /// Whether `nonce` was issued for `action` and `user` in the current or
    /// previous tick
    pub fn verify_at(&self, nonce: &str, action: &str, user: &str, now_secs: u64) -> bool {
        if nonce.len() != NONCE_LENGTH {
            return false;
        }
        let tick = self.tick(now_secs);
        let current = constant_time_compare(nonce, &self.digest(action, user, tick));
        let previous = tick > 0 && constant_time_compare(nonce, &self.digest(action, user, tick - 1));
        current || previous
    }

    pub fn verify(&self, nonce: &str, action: &str, user: &str) -> bool {
        self.verify_at(nonce, action, user, now_secs())
    }
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
