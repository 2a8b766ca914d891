#![forbid(unsafe_code)]

//! Book records exchanged with the catalogue service, and the form schema
//! that guards create/edit submissions.
//!
//! Field values are kept as the raw strings the form produced; `published`
//! is a calendar date in `YYYY-MM-DD` form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shelf_validation::{FieldValidator, FormReport, FormSchema};

/// Collection endpoint for book records.
pub const BOOKS_ENDPOINT: &str = "/books";

/// Endpoint of a single book record.
#[must_use]
pub fn book_endpoint(id: u64) -> String {
    format!("{BOOKS_ENDPOINT}/{id}")
}

/// A stored book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub published: String,
    pub category: String,
    pub stock: u32,
}

/// A book that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub published: String,
    pub category: String,
    pub stock: u32,
}

/// A partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBook {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// Form schema for creating or editing a book.
///
/// `today` bounds the publication date: books cannot be published in the
/// future.
#[must_use]
pub fn book_form_schema(today: NaiveDate) -> FormSchema {
    FormSchema::new()
        .field("title", FieldValidator::<str>::new().not_blank().min_length(2))
        .field("author", FieldValidator::<str>::new().not_blank())
        .field(
            "published",
            FieldValidator::<str>::new().not_blank().max_date(today),
        )
        .field("category", FieldValidator::<str>::new().not_blank())
}

impl Book {
    /// Split into its id and the fields a create form would carry.
    #[must_use]
    pub fn into_parts(self) -> (u64, CreateBook) {
        let Self {
            id,
            title,
            author,
            published,
            category,
            stock,
        } = self;
        (
            id,
            CreateBook {
                title,
                author,
                published,
                category,
                stock,
            },
        )
    }

    /// Apply a partial update. Returns `false` if the ids differ.
    pub fn apply(&mut self, update: UpdateBook) -> bool {
        if update.id != self.id {
            return false;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(author) = update.author {
            self.author = author;
        }
        if let Some(published) = update.published {
            self.published = published;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        true
    }
}

impl CreateBook {
    /// Raw form value of a text field by name.
    #[must_use]
    pub fn text_field(&self, name: &str) -> &str {
        match name {
            "title" => &self.title,
            "author" => &self.author,
            "published" => &self.published,
            "category" => &self.category,
            _ => "",
        }
    }

    /// Run `schema` over the text fields. Stock is numeric and not checked here.
    #[must_use]
    pub fn validate(&self, schema: &FormSchema) -> FormReport {
        schema.validate(|name| self.text_field(name))
    }

    /// Attach the id assigned by the service.
    #[must_use]
    pub fn with_id(self, id: u64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            published: self.published,
            category: self.category,
            stock: self.stock,
        }
    }
}
