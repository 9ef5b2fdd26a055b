use regex::Regex;
use std::sync::LazyLock;

/// "Key (email)=(a@b.com) already exists."
static KEY_VALUE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("key/value pattern compiles")
});

static TABLE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:table|relation) "([^"]+)""#).expect("table pattern compiles")
});

/// Pulls structured details out of PostgreSQL constraint violation messages.
pub struct ConstraintParser;

impl ConstraintParser {
    /// Parses a unique violation into `(entity, field, value)`.
    ///
    /// The constraint name (`users_email_key`) is preferred for entity and
    /// field; the value always comes from the message detail when present.
    ///
    /// # Examples
    /// ```
    /// use user_registry::error::ConstraintParser;
    ///
    /// let message = "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(a@b.com) already exists.";
    /// let parsed = ConstraintParser::parse_unique_violation(message, Some("users_email_key"));
    /// assert_eq!(parsed, Some(("users".to_string(), "email".to_string(), "a@b.com".to_string())));
    /// ```
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = Self::extract_key_value(message);

        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = key_value?;
        let entity = Self::extract_table(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Splits `{table}_{column...}_{suffix}` constraint names.
    ///
    /// Multi-word columns survive: `users_phone_number_key` yields
    /// `("users", "phone_number")`.
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let parts: Vec<&str> = constraint_name.split('_').collect();
        if parts.len() < 3 {
            return None;
        }
        let entity = parts[0].to_string();
        let field = parts[1..parts.len() - 1].join("_");
        Some((entity, field))
    }

    fn extract_key_value(message: &str) -> Option<(String, String)> {
        KEY_VALUE_REGEX
            .captures(message)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
    }

    fn extract_table(message: &str) -> Option<String> {
        TABLE_NAME_REGEX
            .captures(message)
            .map(|caps| caps[1].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unique_violation_from_constraint_name() {
        let message = "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(test@example.com) already exists.";
        let result = ConstraintParser::parse_unique_violation(message, Some("users_email_key"));
        assert_eq!(
            result,
            Some((
                "users".to_string(),
                "email".to_string(),
                "test@example.com".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_unique_violation_without_constraint_name() {
        let message = "duplicate key value violates unique constraint on relation \"users\"\nDETAIL: Key (email)=(x@y.org) already exists.";
        let result = ConstraintParser::parse_unique_violation(message, None);
        assert_eq!(
            result,
            Some(("users".to_string(), "email".to_string(), "x@y.org".to_string()))
        );
    }

    #[test]
    fn test_parse_unique_violation_without_detail() {
        let result = ConstraintParser::parse_unique_violation("duplicate", Some("users_email_key"));
        assert_eq!(
            result,
            Some((
                "users".to_string(),
                "email".to_string(),
                "duplicate_value".to_string()
            ))
        );
        assert_eq!(ConstraintParser::parse_unique_violation("duplicate", None), None);
    }

    #[test]
    fn test_parse_constraint_name() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("users_phone_number_key"),
            Some(("users".to_string(), "phone_number".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("pkey"), None);
    }
}
