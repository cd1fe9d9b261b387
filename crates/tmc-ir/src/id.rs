//! Deterministic identifier scheme.
//!
//! Target ids are a 12-hex-character lowercase truncation of a 64-bit
//! stable hash (the leading 8 bytes of a SHA-256 over the
//! length-delimited tuple `(page, name, strategy, locator_value)`), so
//! the same locator yields the same id across runs and across projects
//! that share target names but differ in locator values. Step and
//! assertion ids are two-digit zero-padded ordinals, growing to three
//! digits past 99. Suite, test, and data-set ids are sanitized name
//! functions.

use sha2::{Digest, Sha256};

/// Deterministic target id for one `(page, name, strategy, value)` tuple.
pub fn target_id(page: &str, name: &str, strategy: &str, locator_value: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [page, name, strategy, locator_value] {
        // Length-delimit so ("ab","c") never collides with ("a","bc").
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    let digest = hasher.finalize();
    let mut word = [0u8; 8];
    word.copy_from_slice(&digest[..8]);
    let hex = format!("{:016x}", u64::from_be_bytes(word));
    hex[..12].to_string()
}

/// `STEP_01`, `STEP_02`, ... `STEP_100` (1-based source order).
pub fn step_id(ordinal: usize) -> String {
    format!("STEP_{ordinal:02}")
}

/// `ASSERT_01`, `ASSERT_02`, ... (1-based source order).
pub fn assert_id(ordinal: usize) -> String {
    format!("ASSERT_{ordinal:02}")
}

/// `SUITE_<sanitized name>`.
pub fn suite_id(name: &str) -> String {
    format!("SUITE_{}", sanitize(name))
}

/// `TEST_<sanitized suite>_<sanitized name>`; suite-qualified so tests
/// with the same name in different suites keep distinct ids.
pub fn test_id(suite_name: &str, test_name: &str) -> String {
    format!("TEST_{}_{}", sanitize(suite_name), sanitize(test_name))
}

/// `DATA_<sanitized name>`.
pub fn data_set_id(name: &str) -> String {
    format!("DATA_{}", sanitize(name))
}

/// Replace runs of non-alphanumeric characters with a single underscore.
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_sep = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep && !out.is_empty() {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_id_shape() {
        let id = target_id("LoginPage", "emailInput", "css", "#email");
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_target_id_is_a_pure_function() {
        let a = target_id("LoginPage", "emailInput", "css", "#email");
        let b = target_id("LoginPage", "emailInput", "css", "#email");
        assert_eq!(a, b);
    }

    #[test]
    fn test_target_id_depends_on_every_component() {
        let base = target_id("LoginPage", "emailInput", "css", "#email");
        assert_ne!(base, target_id("HomePage", "emailInput", "css", "#email"));
        assert_ne!(base, target_id("LoginPage", "email", "css", "#email"));
        assert_ne!(base, target_id("LoginPage", "emailInput", "xpath", "#email"));
        assert_ne!(base, target_id("LoginPage", "emailInput", "css", "#mail"));
    }

    #[test]
    fn test_target_id_length_delimiting() {
        // Concatenation-ambiguous tuples must not collide.
        assert_ne!(
            target_id("ab", "c", "css", "#x"),
            target_id("a", "bc", "css", "#x")
        );
    }

    #[test]
    fn test_step_ids_pad_to_two_then_grow() {
        assert_eq!(step_id(1), "STEP_01");
        assert_eq!(step_id(9), "STEP_09");
        assert_eq!(step_id(42), "STEP_42");
        assert_eq!(step_id(100), "STEP_100");
    }

    #[test]
    fn test_name_derived_ids() {
        assert_eq!(suite_id("LoginTest"), "SUITE_LoginTest");
        assert_eq!(suite_id("Login Test!"), "SUITE_Login_Test");
        assert_eq!(test_id("LoginTest", "testLogin"), "TEST_LoginTest_testLogin");
        assert_eq!(data_set_id("users.csv"), "DATA_users_csv");
    }
}
