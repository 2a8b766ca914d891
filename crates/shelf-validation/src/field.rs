#![forbid(unsafe_code)]

//! Field- and form-level composition of constraints.
//!
//! A field holds an ordered list of constraints. The field is valid only when
//! every constraint passes; its messages are those of the failing constraints,
//! first to last. Every constraint is evaluated, so a form can display all
//! problems with a field at once rather than one per submit.

use std::fmt;

use chrono::NaiveDate;

use crate::validators::{MaxDate, MinLength, NotBlank, ValidationError, Validator};

// ---------------------------------------------------------------------------
// FieldReport
// ---------------------------------------------------------------------------

/// Outcome of validating one field against all of its constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldReport {
    errors: Vec<ValidationError>,
}

impl FieldReport {
    /// `true` when no constraint failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors of the failing constraints, in declaration order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Formatted messages of the failing constraints, in declaration order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(ValidationError::format_message)
            .collect()
    }

    /// The first failure, suitable for a single inline hint.
    #[must_use]
    pub fn first_message(&self) -> Option<String> {
        self.errors.first().map(ValidationError::format_message)
    }
}

// ---------------------------------------------------------------------------
// FieldValidator
// ---------------------------------------------------------------------------

/// An ordered list of constraints applied to one field.
///
/// # Example
///
/// ```rust
/// use shelf_validation::FieldValidator;
///
/// let title = FieldValidator::<str>::new().not_blank().min_length(3);
/// assert!(title.is_valid("Dune"));
///
/// let report = title.validate("");
/// assert_eq!(
///     report.messages(),
///     vec![
///         "This field must not be blank".to_string(),
///         "This field must have at least 3 characters".to_string(),
///     ]
/// );
/// ```
pub struct FieldValidator<T: ?Sized> {
    rules: Vec<Box<dyn Validator<T>>>,
}

impl<T: ?Sized> Default for FieldValidator<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T: ?Sized> fmt::Debug for FieldValidator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValidator")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl<T: ?Sized> FieldValidator<T> {
    /// Create a field with no constraints (always valid).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a constraint. Constraints are evaluated in the order added.
    #[must_use]
    pub fn rule(mut self, validator: impl Validator<T> + 'static) -> Self {
        self.rules.push(Box::new(validator));
        self
    }

    /// Append an already boxed constraint.
    pub fn push(&mut self, validator: Box<dyn Validator<T>>) {
        self.rules.push(validator);
    }

    /// Number of constraints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// `true` when the field has no constraints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every constraint and collect the failures.
    #[must_use]
    pub fn validate(&self, value: &T) -> FieldReport {
        let errors = self
            .rules
            .iter()
            .filter_map(|rule| rule.validate(value).into_error())
            .collect();
        FieldReport { errors }
    }

    /// `true` when every constraint passes.
    ///
    /// Stops at the first failure.
    #[must_use]
    pub fn is_valid(&self, value: &T) -> bool {
        self.rules.iter().all(|rule| rule.is_valid(value))
    }
}

impl FieldValidator<str> {
    /// Append a [`NotBlank`] constraint.
    #[must_use]
    pub fn not_blank(self) -> Self {
        self.rule(NotBlank::new())
    }

    /// Append a [`MinLength`] constraint.
    #[must_use]
    pub fn min_length(self, min: usize) -> Self {
        self.rule(MinLength::new(min))
    }

    /// Append a [`MaxDate`] constraint.
    #[must_use]
    pub fn max_date(self, max: NaiveDate) -> Self {
        self.rule(MaxDate::new(max))
    }
}

// ---------------------------------------------------------------------------
// FormSchema
// ---------------------------------------------------------------------------

/// Per-field outcome of validating a whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormReport {
    fields: Vec<(String, FieldReport)>,
}

impl FormReport {
    /// `true` when every field is valid. A form may only be submitted then.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|(_, report)| report.is_valid())
    }

    /// Report for one field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldReport> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, report)| report)
    }

    /// Formatted messages for one field; empty when valid or unknown.
    #[must_use]
    pub fn errors_for(&self, name: &str) -> Vec<String> {
        self.field(name).map(FieldReport::messages).unwrap_or_default()
    }

    /// Names of the failing fields, in schema order.
    #[must_use]
    pub fn invalid_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, report)| !report.is_valid())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// All field reports, in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldReport)> {
        self.fields
            .iter()
            .map(|(name, report)| (name.as_str(), report))
    }
}

/// Named text fields validated together, in declaration order.
///
/// ```rust
/// use shelf_validation::{FieldValidator, FormSchema};
///
/// let schema = FormSchema::new()
///     .field("title", FieldValidator::<str>::new().not_blank())
///     .field("author", FieldValidator::<str>::new().not_blank());
///
/// let report = schema.validate(|name| match name {
///     "title" => "Dune",
///     _ => "",
/// });
/// assert!(!report.is_valid());
/// assert_eq!(report.invalid_fields(), vec!["author"]);
/// ```
#[derive(Debug, Default)]
pub struct FormSchema {
    fields: Vec<(String, FieldValidator<str>)>,
}

impl FormSchema {
    /// Create an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, validator: FieldValidator<str>) -> Self {
        self.fields.push((name.into(), validator));
        self
    }

    /// Declared field names, in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Validate a single field by name. Unknown fields are valid.
    #[must_use]
    pub fn validate_field(&self, name: &str, value: &str) -> FieldReport {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, validator)| validator.validate(value))
            .unwrap_or_default()
    }

    /// Validate every field, reading raw input values through `value_of`.
    pub fn validate<'a, F>(&self, mut value_of: F) -> FormReport
    where
        F: FnMut(&str) -> &'a str,
    {
        let fields = self
            .fields
            .iter()
            .map(|(name, validator)| {
                let report = validator.validate(value_of(name.as_str()));
                (name.clone(), report)
            })
            .collect();
        FormReport { fields }
    }
}
