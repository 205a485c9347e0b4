use regex_lite::Regex;
use serde::Serialize;
use serde_json::Value;

/// A single schema violation, addressed by JSON-pointer-style path.
///
/// Field-level violations carry `/<field>`; violations about the payload
/// itself (wrong root type, unknown fields) carry an empty path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub message: String,
    pub path: String,
}

impl Violation {
    fn field(name: &str, message: &str) -> Self {
        Self {
            message: message.to_string(),
            path: format!("/{name}"),
        }
    }

    fn root(message: &str) -> Self {
        Self {
            message: message.to_string(),
            path: String::new(),
        }
    }
}

/// Expected JSON type of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Expected {
    Str,
    Int,
}

/// Format checks beyond plain pattern matching.
#[derive(Debug)]
pub(crate) enum FormatRule {
    /// RFC-5322-ish address shape; intentionally loose, the store does not
    /// verify deliverability.
    Email,
    /// Parseable absolute URI.
    Uri,
    /// At least one lowercase, one uppercase, one digit and one special
    /// character, drawn only from the allowed alphabet.
    ///
    /// Expressed as code rather than a pattern because the composition rule
    /// needs lookahead, which `regex-lite` (deliberately) does not support.
    Password,
}

/// Validation rules for one named field.
pub struct FieldRule {
    name: &'static str,
    required: Option<&'static str>,
    expects: Expected,
    type_message: &'static str,
    min_length: Option<(usize, &'static str)>,
    max_length: Option<(usize, &'static str)>,
    pattern: Option<(Regex, &'static str)>,
    format: Option<(FormatRule, &'static str)>,
    one_of: Option<(&'static [&'static str], &'static str)>,
    minimum: Option<(i64, &'static str)>,
    maximum: Option<(i64, &'static str)>,
}

impl FieldRule {
    pub fn string(name: &'static str, type_message: &'static str) -> Self {
        Self {
            name,
            required: None,
            expects: Expected::Str,
            type_message,
            min_length: None,
            max_length: None,
            pattern: None,
            format: None,
            one_of: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn integer(name: &'static str, type_message: &'static str) -> Self {
        Self {
            expects: Expected::Int,
            ..Self::string(name, type_message)
        }
    }

    pub fn required(mut self, message: &'static str) -> Self {
        self.required = Some(message);
        self
    }

    pub fn min_length(mut self, min: usize, message: &'static str) -> Self {
        self.min_length = Some((min, message));
        self
    }

    pub fn max_length(mut self, max: usize, message: &'static str) -> Self {
        self.max_length = Some((max, message));
        self
    }

    pub fn pattern(mut self, pattern: &str, message: &'static str) -> Self {
        let regex = Regex::new(pattern).expect("Invalid schema pattern");
        self.pattern = Some((regex, message));
        self
    }

    pub(crate) fn format(mut self, format: FormatRule, message: &'static str) -> Self {
        self.format = Some((format, message));
        self
    }

    pub fn one_of(mut self, values: &'static [&'static str], message: &'static str) -> Self {
        self.one_of = Some((values, message));
        self
    }

    pub fn minimum(mut self, min: i64, message: &'static str) -> Self {
        self.minimum = Some((min, message));
        self
    }

    pub fn maximum(mut self, max: i64, message: &'static str) -> Self {
        self.maximum = Some((max, message));
        self
    }

    fn check(&self, value: &Value, violations: &mut Vec<Violation>) {
        match self.expects {
            Expected::Str => self.check_string(value, violations),
            Expected::Int => self.check_integer(value, violations),
        }
    }

    fn check_string(&self, value: &Value, violations: &mut Vec<Violation>) {
        let Some(s) = value.as_str() else {
            violations.push(Violation::field(self.name, self.type_message));
            return;
        };

        if let Some((min, message)) = self.min_length {
            if s.chars().count() < min {
                violations.push(Violation::field(self.name, message));
            }
        }
        if let Some((max, message)) = self.max_length {
            if s.chars().count() > max {
                violations.push(Violation::field(self.name, message));
            }
        }
        if let Some((regex, message)) = &self.pattern {
            if !regex.is_match(s) {
                violations.push(Violation::field(self.name, message));
            }
        }
        if let Some((format, message)) = &self.format {
            if !format_matches(format, s) {
                violations.push(Violation::field(self.name, message));
            }
        }
        if let Some((values, message)) = self.one_of {
            if !values.contains(&s) {
                violations.push(Violation::field(self.name, message));
            }
        }
    }

    fn check_integer(&self, value: &Value, violations: &mut Vec<Violation>) {
        let Some(n) = value.as_i64() else {
            violations.push(Violation::field(self.name, self.type_message));
            return;
        };

        if let Some((min, message)) = self.minimum {
            if n < min {
                violations.push(Violation::field(self.name, message));
            }
        }
        if let Some((max, message)) = self.maximum {
            if n > max {
                violations.push(Violation::field(self.name, message));
            }
        }
    }
}

fn format_matches(format: &FormatRule, s: &str) -> bool {
    match format {
        FormatRule::Email => {
            static EMAIL: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
                Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
                    .expect("Invalid email pattern")
            });
            EMAIL.is_match(s)
        }
        FormatRule::Uri => url::Url::parse(s).is_ok(),
        FormatRule::Password => password_composition_ok(s),
    }
}

const PASSWORD_SPECIALS: &[char] = &['@', '$', '!', '%', '*', '?', '&'];

fn password_composition_ok(s: &str) -> bool {
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(&c);

    s.chars().all(allowed)
        && s.chars().any(|c| c.is_ascii_lowercase())
        && s.chars().any(|c| c.is_ascii_uppercase())
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().any(|c| PASSWORD_SPECIALS.contains(&c))
}

/// A declarative payload schema: an ordered list of field rules over a
/// JSON object. Unknown fields are always rejected.
pub struct Schema {
    root_type_message: &'static str,
    fields: Vec<FieldRule>,
}

impl Schema {
    pub fn new(root_type_message: &'static str, fields: Vec<FieldRule>) -> Self {
        Self {
            root_type_message,
            fields,
        }
    }

    /// Check `data` against this schema.
    ///
    /// Returns the full, ordered violation list on failure: required and
    /// per-field checks in declaration order, then unknown-field checks.
    pub fn validate(&self, data: &Value) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        let Some(object) = data.as_object() else {
            return Err(vec![Violation::root(self.root_type_message)]);
        };

        for rule in &self.fields {
            match object.get(rule.name) {
                Some(value) => rule.check(value, &mut violations),
                None => {
                    if let Some(message) = rule.required {
                        violations.push(Violation::field(rule.name, message));
                    }
                }
            }
        }

        for key in object.keys() {
            if !self.fields.iter().any(|rule| rule.name == key) {
                violations.push(Violation::root(&format!(
                    "must NOT have additional properties: '{key}'"
                )));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample_schema() -> Schema {
        Schema::new(
            "Request body must be an object",
            vec![
                FieldRule::string("name", "Name must be a string")
                    .required("Name is required")
                    .min_length(2, "Name must be at least 2 characters long")
                    .max_length(5, "Name must be at most 5 characters long"),
                FieldRule::integer("age", "Age must be an integer")
                    .minimum(0, "Age must be a non-negative integer"),
            ],
        )
    }

    #[test]
    fn test_valid_payload_passes() {
        let schema = sample_schema();
        assert!(schema.validate(&json!({"name": "abc", "age": 3})).is_ok());
    }

    #[test]
    fn test_optional_field_may_be_absent() {
        let schema = sample_schema();
        assert!(schema.validate(&json!({"name": "abc"})).is_ok());
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let schema = sample_schema();
        let violations = schema.validate(&json!("nope")).unwrap_err();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "Request body must be an object");
        assert_eq!(violations[0].path, "");
    }

    #[test]
    fn test_missing_required_field_reports_custom_message() {
        let schema = sample_schema();
        let violations = schema.validate(&json!({"age": 3})).unwrap_err();

        assert_eq!(violations[0].message, "Name is required");
        assert_eq!(violations[0].path, "/name");
    }

    #[test]
    fn test_wrong_type_reports_type_message() {
        let schema = sample_schema();
        let violations = schema.validate(&json!({"name": 42})).unwrap_err();

        assert_eq!(violations[0].message, "Name must be a string");
    }

    #[test]
    fn test_integer_rejects_float() {
        let schema = sample_schema();
        let violations = schema
            .validate(&json!({"name": "abc", "age": 1.5}))
            .unwrap_err();

        assert_eq!(violations[0].message, "Age must be an integer");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let schema = sample_schema();
        let violations = schema
            .validate(&json!({"name": "abc", "extra": true}))
            .unwrap_err();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "");
        assert!(violations[0].message.contains("additional properties"));
    }

    #[test]
    fn test_all_violations_are_collected_in_order() {
        let schema = sample_schema();
        let violations = schema
            .validate(&json!({"name": "a", "age": -1, "extra": 1}))
            .unwrap_err();

        assert_eq!(violations.len(), 3);
        assert_eq!(
            violations[0].message,
            "Name must be at least 2 characters long"
        );
        assert_eq!(violations[1].message, "Age must be a non-negative integer");
        assert_eq!(violations[2].path, "");
    }

    #[test]
    fn test_password_composition() {
        assert!(password_composition_ok("Passw0rd!"));
        assert!(!password_composition_ok("passw0rd!")); // no uppercase
        assert!(!password_composition_ok("PASSW0RD!")); // no lowercase
        assert!(!password_composition_ok("Password!")); // no digit
        assert!(!password_composition_ok("Passw0rd1")); // no special
        assert!(!password_composition_ok("Passw0rd! ")); // space not allowed
    }

    #[test]
    fn test_email_format() {
        assert!(format_matches(&FormatRule::Email, "a@example.com"));
        assert!(!format_matches(&FormatRule::Email, "a@example"));
        assert!(!format_matches(&FormatRule::Email, "not-an-email"));
    }

    #[test]
    fn test_uri_format() {
        assert!(format_matches(
            &FormatRule::Uri,
            "https://example.com/p.png"
        ));
        assert!(!format_matches(&FormatRule::Uri, "not a uri"));
    }

    proptest! {
        /// A password accepted by the composition check always contains all
        /// four character classes.
        #[test]
        fn test_password_accept_implies_all_classes(s in "[A-Za-z0-9@$!%*?&]{0,32}") {
            if password_composition_ok(&s) {
                prop_assert!(s.chars().any(|c| c.is_ascii_lowercase()));
                prop_assert!(s.chars().any(|c| c.is_ascii_uppercase()));
                prop_assert!(s.chars().any(|c| c.is_ascii_digit()));
                prop_assert!(s.chars().any(|c| PASSWORD_SPECIALS.contains(&c)));
            }
        }

        /// Any character outside the allowed alphabet is rejected outright.
        #[test]
        fn test_password_rejects_outside_alphabet(s in "[A-Za-z0-9@$!%*?&]{0,16}", c in "[ #^()\\[\\]{}<>~]") {
            let candidate = format!("{s}{c}");
            prop_assert!(!password_composition_ok(&candidate));
        }
    }
}
