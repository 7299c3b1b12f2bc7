//! Declarative field rules and the engine that evaluates them.

use std::sync::LazyLock;

use email_address::EmailAddress;
use regex::Regex;

/// A single constraint on a string field, paired with its error message.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Value must be non-empty.
    Required(&'static str),
    /// At least this many characters.
    MinChars(usize, &'static str),
    /// At most this many characters.
    MaxChars(usize, &'static str),
    /// Syntactically valid email address.
    Email(&'static str),
    /// Must match a pattern somewhere in the value.
    Pattern(&'static LazyLock<Regex>, &'static str),
}

impl Rule {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Required(m)
            | Self::MinChars(_, m)
            | Self::MaxChars(_, m)
            | Self::Email(m)
            | Self::Pattern(_, m) => m,
        }
    }

    /// Whether `value` satisfies this rule.
    ///
    /// Only `Required` rejects an empty value; every other rule passes it so
    /// optional fields are checked only once filled in.
    pub fn check(&self, value: &str) -> bool {
        if value.is_empty() {
            return !matches!(self, Self::Required(_));
        }
        match self {
            Self::Required(_) => true,
            Self::MinChars(min, _) => value.chars().count() >= *min,
            Self::MaxChars(max, _) => value.chars().count() <= *max,
            Self::Email(_) => EmailAddress::is_valid(value),
            Self::Pattern(regex, _) => regex.is_match(value),
        }
    }
}

/// The rules for one named field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

/// Evaluate `rules` against `value`, returning the first failure's message.
pub fn first_failure(rules: &[Rule], value: &str) -> Option<&'static str> {
    rules
        .iter()
        .find(|rule| !rule.check(value))
        .map(Rule::message)
}

#[cfg(test)]
mod tests {
    use super::*;

    static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

    static RULES: &[Rule] = &[
        Rule::Required("required"),
        Rule::Pattern(&DIGITS, "digits"),
        Rule::MinChars(3, "short"),
    ];

    #[test]
    fn first_failing_rule_wins() {
        assert_eq!(first_failure(RULES, ""), Some("required"));
        assert_eq!(first_failure(RULES, "a"), Some("digits"));
        assert_eq!(first_failure(RULES, "12"), Some("short"));
        assert_eq!(first_failure(RULES, "123"), None);
    }

    #[test]
    fn optional_rules_skip_empty_values() {
        let optional = [Rule::MaxChars(2, "long"), Rule::Email("email")];
        assert_eq!(first_failure(&optional, ""), None);
        assert_eq!(first_failure(&optional, "abc"), Some("long"));
    }

    #[test]
    fn char_counts_not_bytes() {
        let rule = Rule::MaxChars(3, "long");
        assert!(rule.check("ằằằ"));
        assert!(!rule.check("ằằằằ"));
    }

    #[test]
    fn email_shape() {
        let rule = Rule::Email("bad");
        assert!(rule.check("jane@example.com"));
        assert!(!rule.check("not-an-email"));
    }
}
