//! Utility functions

/// Case-folds an email for storage and comparison.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

pub fn emails_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Masks the local part of an email so log lines don't carry full addresses.
pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let keep = local.chars().take(if local.chars().count() <= 2 { 1 } else { 2 });
        format!("{}***{}", keep.collect::<String>(), domain)
    } else {
        "***".to_string()
    }
}
