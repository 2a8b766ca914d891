#![forbid(unsafe_code)]

//! Form validation built from independent, stateless constraints.
//!
//! This crate provides:
//! - A core [`Validator`] trait checking one value against one rule
//! - Built-in constraints: [`NotBlank`], [`MinLength`], [`MaxDate`]
//! - [`FieldValidator`]: an ordered list of constraints for one field, valid
//!   only when every constraint passes, reporting every failing message
//! - [`FormSchema`]: named fields validated together
//!
//! Validation never fails loudly: a failing constraint is a
//! [`ValidationResult::Invalid`] carrying the constraint's message.
//!
//! # Example
//!
//! ```rust
//! use shelf_validation::{FieldValidator, MinLength, NotBlank, Validator};
//!
//! assert!(NotBlank::new().validate(" a ").is_valid());
//! assert!(!MinLength::new(5).is_valid("abcd"));
//!
//! let title = FieldValidator::<str>::new().not_blank().min_length(3);
//! let report = title.validate("  ");
//! assert_eq!(report.messages().len(), 2);
//! ```

mod field;
mod validators;

pub use field::{FieldReport, FieldValidator, FormReport, FormSchema};
pub use validators::{
    CalendarDate, ERROR_CODE_INVALID_DATE, ERROR_CODE_MAX_DATE, ERROR_CODE_MIN_LENGTH,
    ERROR_CODE_NOT_BLANK, MaxDate, MinLength, NotBlank, ValidationError, ValidationResult,
    Validator,
};
