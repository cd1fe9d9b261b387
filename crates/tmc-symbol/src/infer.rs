//! Method-name pattern inference.
//!
//! When a page-object method body is not visible (or references no
//! locator field), the method *name* still encodes intent:
//! `enterEmail` manipulates an input, `clickRegisterLink` a button.
//! This module turns a method name into candidate target names; the
//! caller checks candidates against the class's declared fields and
//! discards the ones that do not exist.

/// Prefix table, checked in order. An empty suffix means "the remainder
/// of the method name verbatim".
const PATTERNS: &[(&[&str], &[&str])] = &[
    (&["enter", "type", "set", "fill", "input"], &["Input"]),
    (&["click", "press", "tap"], &["Button"]),
    (&["select", "choose"], &["Select"]),
    (&["check", "uncheck", "toggle"], &["Checkbox"]),
    (&["get", "read"], &["Label", ""]),
];

/// Candidate target names for a method name, best first.
///
/// `enterEmail` yields `["emailInput"]`; `getWelcomeMessage` yields
/// `["welcomeMessageLabel", "welcomeMessage"]`. The suffix is
/// case-preserving; the remainder is lower-cased on its first letter to
/// match field naming conventions. Names that match no prefix (or have
/// nothing after the prefix) yield no candidates.
pub fn infer_target_candidates(method_name: &str) -> Vec<String> {
    for (prefixes, suffixes) in PATTERNS {
        for prefix in *prefixes {
            let Some(rest) = method_name.strip_prefix(prefix) else {
                continue;
            };
            // Require a camelCase boundary so `settings` does not match `set`.
            if !rest.chars().next().is_some_and(|c| c.is_uppercase()) {
                continue;
            }
            let base = lower_first(rest);
            return suffixes
                .iter()
                .map(|suffix| format!("{base}{suffix}"))
                .collect();
        }
    }
    Vec::new()
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_prefixes() {
        assert_eq!(infer_target_candidates("enterEmail"), vec!["emailInput"]);
        assert_eq!(infer_target_candidates("typePassword"), vec!["passwordInput"]);
        assert_eq!(infer_target_candidates("fillSearchBox"), vec!["searchBoxInput"]);
    }

    #[test]
    fn test_click_prefixes() {
        assert_eq!(
            infer_target_candidates("clickRegisterLink"),
            vec!["registerLinkButton"]
        );
        assert_eq!(infer_target_candidates("pressSubmit"), vec!["submitButton"]);
    }

    #[test]
    fn test_getter_yields_label_then_verbatim() {
        assert_eq!(
            infer_target_candidates("getWelcomeMessage"),
            vec!["welcomeMessageLabel", "welcomeMessage"]
        );
    }

    #[test]
    fn test_select_and_checkbox() {
        assert_eq!(infer_target_candidates("selectCountry"), vec!["countrySelect"]);
        assert_eq!(infer_target_candidates("toggleNews"), vec!["newsCheckbox"]);
    }

    #[test]
    fn test_requires_camel_case_boundary() {
        assert!(infer_target_candidates("settings").is_empty());
        assert!(infer_target_candidates("clicker").is_empty());
        assert!(infer_target_candidates("set").is_empty());
    }

    #[test]
    fn test_unknown_prefix() {
        assert!(infer_target_candidates("doMagic").is_empty());
        assert!(infer_target_candidates("navigateHome").is_empty());
    }
}
