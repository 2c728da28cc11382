use once_cell::sync::Lazy;
use regex::Regex;

/// School ids and usernames are typed at the login prompt, so they may not
/// contain whitespace.
pub fn is_ascii_no_spaces(identifier: &str) -> Result<(), String> {
    match identifier.chars().all(|c| c.is_ascii() && !c.is_whitespace()) {
        true => Ok(()),
        false => Err("should be an ascii string without spaces".to_string()),
    }
}

pub fn is_valid_email(string: &str) -> Result<(), String> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
        r#"(?i)^(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])$"#
    ).expect("email regex is valid")
    });
    match RE.is_match(string) {
        true => Ok(()),
        false => Err("invalid email".to_string()),
    }
}

/// Trims a submitted form field, treating missing and blank fields alike.
pub fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a numeric row id submitted as a form field.
pub fn parse_id(field: &Option<String>) -> Option<i32> {
    required(field).and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[test]
fn test_email() {
    assert!(is_valid_email("hello@example.com").is_ok());
    assert!(is_valid_email("Ada.Lovelace@Example.org").is_ok());
    assert!(is_valid_email("not an email").is_err());
    assert!(is_valid_email("prefix hello@example.com").is_err());
}

#[cfg(test)]
#[test]
fn test_required_fields() {
    assert_eq!(required(&Some("  x ".to_string())), Some("x"));
    assert_eq!(required(&Some("   ".to_string())), None);
    assert_eq!(required(&None), None);
    assert_eq!(parse_id(&Some("12".to_string())), Some(12));
    assert_eq!(parse_id(&Some("none".to_string())), None);
    assert!(is_ascii_no_spaces("2024-0001").is_ok());
    assert!(is_ascii_no_spaces("2024 0001").is_err());
}
