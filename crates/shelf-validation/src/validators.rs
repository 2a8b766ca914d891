#![forbid(unsafe_code)]

//! Constraint objects and the result types they report through.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

// ---------------------------------------------------------------------------
// Failure codes
// ---------------------------------------------------------------------------

/// `NotBlank` failed.
pub const ERROR_CODE_NOT_BLANK: &str = "not_blank";
/// `MinLength` failed.
pub const ERROR_CODE_MIN_LENGTH: &str = "too_short";
/// `MaxDate` failed: the date is after the bound.
pub const ERROR_CODE_MAX_DATE: &str = "date_too_late";
/// `MaxDate` failed: the value could not be read as a calendar date.
pub const ERROR_CODE_INVALID_DATE: &str = "invalid_date";

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// Why a value was rejected.
///
/// `code` is one of the `ERROR_CODE_*` constants (or a custom code) and is
/// what a translation layer keys on. `message` is the text shown next to the
/// field; it may contain `{name}` placeholders filled from `params` by
/// [`format_message`](Self::format_message).
///
/// ```rust
/// use shelf_validation::ValidationError;
///
/// let error = ValidationError::new("too_short", "Titles need {min}+ characters")
///     .with_param("min", 2);
/// assert_eq!(error.format_message(), "Titles need 2+ characters");
/// assert_eq!(error.to_string(), "Titles need 2+ characters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Stable failure code, keyed on by translation layers.
    pub code: &'static str,
    /// Text shown next to the field, possibly with `{name}` placeholders.
    pub message: String,
    /// Values for `{name}` placeholders, and extra context for the caller.
    pub params: BTreeMap<String, String>,
}

impl ValidationError {
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            params: BTreeMap::new(),
        }
    }

    /// Attach a named parameter, replacing any earlier value under that name.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    /// The message with every known `{name}` placeholder filled in.
    ///
    /// Placeholders without a matching parameter are kept verbatim.
    /// Substituted values are never re-scanned.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut out = String::with_capacity(self.message.len());
        let mut rest = self.message.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];
            let Some(close) = tail.find('}') else {
                rest = tail;
                break;
            };
            match self.params.get(&tail[1..close]) {
                Some(value) => out.push_str(value),
                None => out.push_str(&tail[..=close]),
            }
            rest = &tail[close + 1..];
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_message())
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// Outcome of applying one constraint to one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        if let Self::Invalid(err) = self {
            Some(err)
        } else {
            None
        }
    }

    /// Rendered message of the failure, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ValidationError::format_message)
    }

    /// Logical AND that keeps the first failure.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        if self.is_valid() { other } else { self }
    }

    #[must_use]
    pub fn into_error(self) -> Option<ValidationError> {
        if let Self::Invalid(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<ValidationError> for ValidationResult {
    fn from(err: ValidationError) -> Self {
        Self::Invalid(err)
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// A constraint on values of type `T`.
///
/// Constraints carry only their configuration (a bound, a message), never
/// per-call state, so one instance may guard any number of fields.
///
/// ```rust
/// use shelf_validation::{ValidationError, ValidationResult, Validator};
///
/// struct Isbn13;
///
/// impl Validator<str> for Isbn13 {
///     fn validate(&self, value: &str) -> ValidationResult {
///         let digits = value.chars().filter(char::is_ascii_digit).count();
///         if digits == 13 {
///             ValidationResult::Valid
///         } else {
///             ValidationError::new("isbn", self.error_message()).into()
///         }
///     }
///
///     fn error_message(&self) -> &str {
///         "Expected a 13-digit ISBN"
///     }
/// }
///
/// assert!(Isbn13.is_valid("978-0-441-17271-9"));
/// assert!(!Isbn13.is_valid("0-441-17271-7"));
/// ```
pub trait Validator<T: ?Sized>: Send + Sync {
    fn validate(&self, value: &T) -> ValidationResult;

    /// The message this constraint reports on failure.
    fn error_message(&self) -> &str;

    fn is_valid(&self, value: &T) -> bool {
        self.validate(value).is_valid()
    }
}

// ---------------------------------------------------------------------------
// NotBlank
// ---------------------------------------------------------------------------

/// Validates that a string has content besides leading/trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotBlank {
    message: String,
}

impl Default for NotBlank {
    fn default() -> Self {
        Self {
            message: "This field must not be blank".to_string(),
        }
    }
}

impl NotBlank {
    /// Create a new `NotBlank` validator with the default message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom error message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The message reported on failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Validator<str> for NotBlank {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.trim().is_empty() {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_NOT_BLANK, &self.message))
        } else {
            ValidationResult::Valid
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

// ---------------------------------------------------------------------------
// MinLength
// ---------------------------------------------------------------------------

/// Validates that a string has at least `min` characters.
///
/// Counts Unicode scalar values, not bytes, and does not trim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinLength {
    /// Minimum number of characters required.
    pub min: usize,
    message: String,
}

impl MinLength {
    /// Create a new `MinLength` validator.
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self {
            min,
            message: format!("This field must have at least {min} characters"),
        }
    }

    /// Set a custom error message. `{min}` and `{actual}` are interpolated
    /// into the reported error.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The message reported on failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Validator<str> for MinLength {
    fn validate(&self, value: &str) -> ValidationResult {
        let len = value.chars().count();
        if len < self.min {
            ValidationResult::Invalid(
                ValidationError::new(ERROR_CODE_MIN_LENGTH, &self.message)
                    .with_param("min", self.min)
                    .with_param("actual", len),
            )
        } else {
            ValidationResult::Valid
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}

// ---------------------------------------------------------------------------
// MaxDate
// ---------------------------------------------------------------------------

/// A value that can be reduced to a calendar day.
///
/// Time-of-day is discarded. Text that is not a recognizable date yields
/// `None`. Accepted text forms (surrounding whitespace ignored):
///
/// - `YYYY-MM-DD`
/// - RFC 3339 (`2024-03-10T18:30:00+02:00`), reduced in its own offset
/// - `YYYY-MM-DDTHH:MM[:SS[.fff]]` and `YYYY-MM-DD HH:MM[:SS[.fff]]`
pub trait CalendarDate {
    /// The calendar day of this value, if it has one.
    fn calendar_date(&self) -> Option<NaiveDate>;
}

impl CalendarDate for NaiveDate {
    fn calendar_date(&self) -> Option<NaiveDate> {
        Some(*self)
    }
}

impl CalendarDate for NaiveDateTime {
    fn calendar_date(&self) -> Option<NaiveDate> {
        Some(self.date())
    }
}

impl<Tz: TimeZone> CalendarDate for DateTime<Tz> {
    fn calendar_date(&self) -> Option<NaiveDate> {
        Some(self.date_naive())
    }
}

impl CalendarDate for str {
    fn calendar_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(self)
    }
}

impl CalendarDate for String {
    fn calendar_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(self)
    }
}

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.date_naive());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|stamp| stamp.date())
}

/// Validates that a date falls on or before a calendar day.
///
/// The bound is reduced to its calendar day once, at construction. Each
/// candidate is reduced independently, so neither side's time-of-day affects
/// the outcome, and the caller's value is never modified.
///
/// Values that are not recognizable dates always fail, with code
/// [`ERROR_CODE_INVALID_DATE`] and this constraint's message.
///
/// ```rust
/// use chrono::NaiveDate;
/// use shelf_validation::{MaxDate, Validator};
///
/// let bound = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
/// let rule = MaxDate::new(bound);
/// assert!(rule.is_valid("2024-03-10"));
/// assert!(!rule.is_valid("2024-03-11"));
/// assert!(!rule.is_valid("next tuesday"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxDate {
    max: NaiveDate,
    message: String,
}

impl MaxDate {
    /// Create a `MaxDate` validator bounded by `max` (inclusive).
    #[must_use]
    pub fn new(max: NaiveDate) -> Self {
        Self {
            max,
            message: format!("The date must be on or before {}", max.format("%Y-%m-%d")),
        }
    }

    /// Create a `MaxDate` bounded by the calendar day of a timestamp.
    #[must_use]
    pub fn from_date_time<Tz: TimeZone>(max: &DateTime<Tz>) -> Self {
        Self::new(max.date_naive())
    }

    /// Create a `MaxDate` bounded by today's local calendar day.
    #[must_use]
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    /// Set a custom error message. `{max}` is interpolated into the
    /// reported error.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The normalized bound.
    #[must_use]
    pub fn max(&self) -> NaiveDate {
        self.max
    }

    /// The message reported on failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<T: CalendarDate + ?Sized> Validator<T> for MaxDate {
    fn validate(&self, value: &T) -> ValidationResult {
        match value.calendar_date() {
            Some(date) if date <= self.max => ValidationResult::Valid,
            Some(date) => ValidationResult::Invalid(
                ValidationError::new(ERROR_CODE_MAX_DATE, &self.message)
                    .with_param("max", self.max.format("%Y-%m-%d"))
                    .with_param("actual", date.format("%Y-%m-%d")),
            ),
            None => ValidationResult::Invalid(
                ValidationError::new(ERROR_CODE_INVALID_DATE, &self.message)
                    .with_param("max", self.max.format("%Y-%m-%d")),
            ),
        }
    }

    fn error_message(&self) -> &str {
        &self.message
    }
}
