//! Domain records

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_FQDN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Registered domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub fqdn: String,
    pub owner: String,
    pub auth_code: String,
    pub registered_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Domain {
    /// Create a registration starting now and lasting `years` years
    pub fn register(fqdn: impl Into<String>, owner: impl Into<String>, years: u32) -> Self {
        let registered_at = Utc::now();
        Self {
            fqdn: fqdn.into(),
            owner: owner.into(),
            auth_code: generate_auth_code(),
            registered_at,
            expires_at: registered_at + Duration::days(365 * i64::from(years)),
        }
    }

    pub fn tld(&self) -> &str {
        tld(&self.fqdn)
    }
}

/// Random transfer authorization code
pub fn generate_auth_code() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

/// Normalise a user-supplied name into a canonical FQDN
///
/// Returns `None` when the name is not a valid host name with at least two
/// labels.
pub fn normalize_fqdn(input: &str) -> Option<String> {
    let fqdn = input.trim().trim_end_matches('.').to_ascii_lowercase();

    if fqdn.is_empty() || fqdn.len() > MAX_FQDN_LEN {
        return None;
    }

    let labels: Vec<&str> = fqdn.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|label| valid_label(label)) {
        return None;
    }

    Some(fqdn)
}

fn valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Last label of a normalised FQDN
pub fn tld(fqdn: &str) -> &str {
    fqdn.rsplit('.').next().unwrap_or(fqdn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_fqdn() {
        assert_eq!(normalize_fqdn(" Example.COM. "), Some("example.com".to_string()));
        assert_eq!(normalize_fqdn("a-b.example.io"), Some("a-b.example.io".to_string()));
    }

    #[test]
    fn test_normalize_rejects_invalid_names() {
        assert_eq!(normalize_fqdn(""), None);
        assert_eq!(normalize_fqdn("localhost"), None);
        assert_eq!(normalize_fqdn("-bad.com"), None);
        assert_eq!(normalize_fqdn("bad-.com"), None);
        assert_eq!(normalize_fqdn("under_score.com"), None);
        assert_eq!(normalize_fqdn("double..dot.com"), None);
        assert_eq!(normalize_fqdn(&format!("{}.com", "a".repeat(64))), None);
    }

    #[test]
    fn test_tld() {
        assert_eq!(tld("www.example.co"), "co");
        assert_eq!(tld("example.com"), "com");
    }

    #[test]
    fn test_register_sets_expiry() {
        let domain = Domain::register("example.com", "alice", 2);
        assert_eq!(domain.expires_at - domain.registered_at, Duration::days(730));
        assert_eq!(domain.auth_code.len(), 12);
        assert_eq!(domain.tld(), "com");
    }
}
