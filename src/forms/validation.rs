//! Declarative field constraints shared by every wizard.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Supported data kinds for form fields. Drives how prompts are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Email,
    Url,
    Integer,
    Decimal,
    Date,
    Choice(Vec<String>),
}

type ValidatorCallback = dyn Fn(&str) -> Result<String, String> + Send + Sync;

/// Built-in validation rules. Every rule returns the normalized value.
#[derive(Clone)]
pub enum Validator {
    None,
    NonEmpty,
    MaxLength(usize),
    Email,
    Url,
    Percentage,
    NonNegativeDecimal,
    Date,
    OneOf(Vec<String>),
    Custom(Arc<ValidatorCallback>),
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::None => f.write_str("None"),
            Validator::NonEmpty => f.write_str("NonEmpty"),
            Validator::MaxLength(max) => write!(f, "MaxLength({max})"),
            Validator::Email => f.write_str("Email"),
            Validator::Url => f.write_str("Url"),
            Validator::Percentage => f.write_str("Percentage"),
            Validator::NonNegativeDecimal => f.write_str("NonNegativeDecimal"),
            Validator::Date => f.write_str("Date"),
            Validator::OneOf(options) => write!(f, "OneOf({options:?})"),
            Validator::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl Validator {
    pub fn custom(
        callback: impl Fn(&str) -> Result<String, String> + Send + Sync + 'static,
    ) -> Self {
        Validator::Custom(Arc::new(callback))
    }

    pub fn validate(&self, input: &str) -> Result<String, ValidationError> {
        let trimmed = input.trim();
        match self {
            Validator::None => Ok(trimmed.to_string()),
            Validator::NonEmpty => {
                if trimmed.is_empty() {
                    Err(ValidationError::new("Value cannot be empty"))
                } else {
                    Ok(trimmed.to_string())
                }
            }
            Validator::MaxLength(max) => {
                if trimmed.chars().count() > *max {
                    Err(ValidationError::new(format!(
                        "Keep this under {max} characters"
                    )))
                } else {
                    Ok(trimmed.to_string())
                }
            }
            Validator::Email => validate_email(trimmed),
            Validator::Url => validate_url(trimmed),
            Validator::Percentage => trimmed
                .parse::<u8>()
                .ok()
                .filter(|value| *value <= 100)
                .map(|value| value.to_string())
                .ok_or_else(|| ValidationError::new("Enter a whole number between 0 and 100")),
            Validator::NonNegativeDecimal => trimmed
                .parse::<f64>()
                .map_err(|_| ValidationError::new("Enter a numeric amount"))
                .and_then(|value| {
                    if value.is_finite() && value >= 0.0 {
                        Ok(value.to_string())
                    } else {
                        Err(ValidationError::new("Amount must be zero or positive"))
                    }
                }),
            Validator::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(|date| date.to_string())
                .map_err(|_| ValidationError::new("Use YYYY-MM-DD format")),
            Validator::OneOf(options) => options
                .iter()
                .find(|candidate| candidate.eq_ignore_ascii_case(trimmed))
                .cloned()
                .ok_or_else(|| {
                    ValidationError::new(format!("Value must be one of: {}", options.join(", ")))
                }),
            Validator::Custom(func) => func(trimmed).map_err(ValidationError::new),
        }
    }
}

fn validate_email(value: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::new("Enter a valid email address (name@example.com)");
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    let domain_ok = domain
        .split_once('.')
        .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty());
    if local.is_empty() || !domain_ok || value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(value.to_ascii_lowercase())
}

fn validate_url(value: &str) -> Result<String, ValidationError> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .ok_or_else(|| ValidationError::new("URL must start with http:// or https://"))?;
    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() || !host.contains('.') || value.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("Enter a valid URL (https://example.com)"));
    }
    Ok(value.to_string())
}

/// Declarative description of a single form field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: Option<&'static str>,
    pub validator: Validator,
}

impl FieldDescriptor {
    pub fn new(label: &'static str, kind: FieldKind, validator: Validator) -> Self {
        Self {
            label,
            kind,
            required: true,
            help: None,
            validator,
        }
    }

    /// Choice field over a fixed option set; matching is case-insensitive.
    pub fn choice(label: &'static str, options: Vec<String>) -> Self {
        Self::new(
            label,
            FieldKind::Choice(options.clone()),
            Validator::OneOf(options),
        )
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    /// Validates a raw value against this field's constraints.
    ///
    /// Blank input is an error for required fields and normalizes to an empty
    /// string for optional ones; the validator only sees non-blank input.
    pub fn check(&self, raw: Option<&str>) -> Result<String, ValidationError> {
        let value = raw.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return if self.required {
                Err(ValidationError::new(format!("{} is required", self.label)))
            } else {
                Ok(String::new())
            };
        }
        self.validator.validate(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validator_normalizes_case() {
        assert_eq!(
            Validator::Email.validate(" Jo@Acme.Test ").unwrap(),
            "jo@acme.test"
        );
        assert!(Validator::Email.validate("jo@acme").is_err());
        assert!(Validator::Email.validate("@acme.test").is_err());
        assert!(Validator::Email.validate("jo smith@acme.test").is_err());
    }

    #[test]
    fn url_validator_requires_scheme_and_host() {
        assert!(Validator::Url.validate("https://acme.test/about").is_ok());
        assert!(Validator::Url.validate("acme.test").is_err());
        assert!(Validator::Url.validate("https://localhost").is_err());
    }

    #[test]
    fn percentage_rejects_out_of_range() {
        assert_eq!(Validator::Percentage.validate("42").unwrap(), "42");
        assert!(Validator::Percentage.validate("101").is_err());
        assert!(Validator::Percentage.validate("-1").is_err());
    }

    #[test]
    fn one_of_returns_canonical_option() {
        let validator = Validator::OneOf(vec!["Active".into(), "On Hold".into()]);
        assert_eq!(validator.validate("on hold").unwrap(), "On Hold");
        let err = validator.validate("paused").unwrap_err();
        assert_eq!(err.message, "Value must be one of: Active, On Hold");
    }

    #[test]
    fn optional_field_accepts_blank() {
        let field = FieldDescriptor::new("Website", FieldKind::Url, Validator::Url).with_optional();
        assert_eq!(field.check(Some("   ")).unwrap(), "");
        assert_eq!(field.check(None).unwrap(), "");
        assert!(field.check(Some("nope")).is_err());
    }

    #[test]
    fn required_field_names_label_when_blank() {
        let field = FieldDescriptor::new("Company", FieldKind::Text, Validator::NonEmpty);
        let err = field.check(Some("")).unwrap_err();
        assert_eq!(err.message, "Company is required");
    }
}
