//! Input validation rules.
//!
//! Every function here is pure: it only inspects its arguments and either
//! returns `Ok` or an `AppError::Validation` describing the first violated
//! rule. Re-validating an accepted value always succeeds. Length limits are
//! declared on the request structs with `validator` attributes and checked by
//! the `validate_new_*` / `validate_*_changes` entry points.

use chrono::{Datelike, Utc};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::{DEFAULT_PAGE, DEFAULT_PER_PAGE, MAX_PER_PAGE},
        CreateAuthor, CreateBook, CreateCategory, Pagination, UpdateAuthor, UpdateBook,
        UpdateCategory,
    },
};

pub const MIN_YEAR: i32 = 1000;
pub const MIN_PAGES: i32 = 1;
pub const MAX_PAGES: i32 = 50_000;
pub const MAX_CATEGORIES: usize = 10;
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;
pub const MAX_BIO_LENGTH: usize = 2000;
pub const MAX_COUNTRY_LENGTH: usize = 100;
pub const MAX_CATEGORY_DESCRIPTION_LENGTH: usize = 500;
const MIN_NAME_LENGTH: usize = 2;

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Validation(message.into())
}

pub fn validate_not_empty(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{} cannot be empty", field)));
    }
    Ok(())
}

fn validate_min_length(value: &str, field: &str, min: usize) -> AppResult<()> {
    if value.trim().chars().count() < min {
        return Err(invalid(format!(
            "{} must be at least {} character(s) long",
            field, min
        )));
    }
    Ok(())
}

fn validate_max_length(value: &str, field: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(invalid(format!("{} must be {} characters or less", field, max)));
    }
    Ok(())
}

fn validate_not_only_digits(value: &str, field: &str) -> AppResult<()> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(format!("{} cannot contain only numbers", field)));
    }
    Ok(())
}

fn validate_range(value: i64, field: &str, min: Option<i64>, max: Option<i64>) -> AppResult<()> {
    if let Some(min) = min {
        if value < min {
            return Err(invalid(format!("{} must be at least {}", field, min)));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(invalid(format!("{} must be at most {}", field, max)));
        }
    }
    Ok(())
}

pub fn validate_title(title: &str) -> AppResult<()> {
    validate_not_empty(title, "Title")
}

pub fn validate_author_name(name: &str) -> AppResult<()> {
    validate_not_empty(name, "Author name")?;
    validate_min_length(name, "Author name", MIN_NAME_LENGTH)?;
    validate_not_only_digits(name, "Author name")
}

pub fn validate_category_name(name: &str) -> AppResult<()> {
    validate_not_empty(name, "Category name")?;
    validate_min_length(name, "Category name", MIN_NAME_LENGTH)?;
    validate_not_only_digits(name, "Category name")
}

/// Strip hyphens and spaces from an ISBN
pub fn normalize_isbn(value: &str) -> String {
    value.chars().filter(|c| *c != '-' && *c != ' ').collect()
}

/// Check an ISBN and return its normalized (digits only) form
pub fn validate_isbn(value: &str) -> AppResult<String> {
    let clean = normalize_isbn(value);

    if clean.is_empty() || !clean.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(
            "ISBN must contain only digits (hyphens and spaces are allowed)",
        ));
    }
    if clean.len() != 10 && clean.len() != 13 {
        return Err(invalid("ISBN must be 10 or 13 digits"));
    }

    Ok(clean)
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

pub fn validate_year(year: i32) -> AppResult<()> {
    validate_range(
        year as i64,
        "Year",
        Some(MIN_YEAR as i64),
        Some(current_year() as i64),
    )
}

pub fn validate_pages(pages: i32) -> AppResult<()> {
    validate_range(
        pages as i64,
        "Pages",
        Some(MIN_PAGES as i64),
        Some(MAX_PAGES as i64),
    )
}

pub fn validate_description(description: &str) -> AppResult<()> {
    validate_max_length(description, "Description", MAX_DESCRIPTION_LENGTH)
}

pub fn validate_bio(bio: &str) -> AppResult<()> {
    validate_max_length(bio, "Biography", MAX_BIO_LENGTH)
}

pub fn validate_country(country: &str) -> AppResult<()> {
    validate_max_length(country, "Country name", MAX_COUNTRY_LENGTH)?;
    validate_not_only_digits(country, "Country name")
}

pub fn validate_category_description(description: &str) -> AppResult<()> {
    validate_max_length(
        description,
        "Category description",
        MAX_CATEGORY_DESCRIPTION_LENGTH,
    )
}

pub fn validate_category_ids(ids: &[i32]) -> AppResult<()> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    if !ids.iter().all(|id| seen.insert(*id)) {
        return Err(invalid("Duplicate category IDs are not allowed"));
    }
    if ids.len() > MAX_CATEGORIES {
        return Err(invalid(format!(
            "A book can have a maximum of {} categories",
            MAX_CATEGORIES
        )));
    }
    Ok(())
}

/// Apply defaults and bounds to page parameters
pub fn validate_pagination(page: Option<i64>, per_page: Option<i64>) -> AppResult<Pagination> {
    let page = page.unwrap_or(DEFAULT_PAGE);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);

    validate_range(page, "Page", Some(1), None)?;
    validate_range(per_page, "Per_page", Some(1), Some(MAX_PER_PAGE))?;

    Ok(Pagination { page, per_page })
}

/// Full validation for book creation
pub fn validate_new_book(data: &CreateBook) -> AppResult<()> {
    validate_title(&data.title)?;
    validate_isbn(&data.isbn)?;
    validate_year(data.year)?;
    if let Some(pages) = data.pages {
        validate_pages(pages)?;
    }
    if let Some(ref ids) = data.category_ids {
        validate_category_ids(ids)?;
    }
    data.validate()?;
    Ok(())
}

/// Partial validation for book updates: only supplied fields are checked
pub fn validate_book_changes(data: &UpdateBook) -> AppResult<()> {
    if let Some(ref title) = data.title {
        validate_title(title)?;
    }
    if let Some(ref isbn) = data.isbn {
        validate_isbn(isbn)?;
    }
    if let Some(year) = data.year {
        validate_year(year)?;
    }
    if let Some(Some(pages)) = data.pages {
        validate_pages(pages)?;
    }
    if let Some(Some(ref description)) = data.description {
        validate_description(description)?;
    }
    if let Some(ref ids) = data.category_ids {
        validate_category_ids(ids)?;
    }
    data.validate()?;
    Ok(())
}

pub fn validate_new_author(data: &CreateAuthor) -> AppResult<()> {
    validate_author_name(&data.name)?;
    if let Some(ref country) = data.country {
        validate_country(country)?;
    }
    data.validate()?;
    Ok(())
}

pub fn validate_author_changes(data: &UpdateAuthor) -> AppResult<()> {
    if let Some(ref name) = data.name {
        validate_author_name(name)?;
    }
    if let Some(Some(ref bio)) = data.bio {
        validate_bio(bio)?;
    }
    if let Some(Some(ref country)) = data.country {
        validate_country(country)?;
    }
    data.validate()?;
    Ok(())
}

pub fn validate_new_category(data: &CreateCategory) -> AppResult<()> {
    validate_category_name(&data.name)?;
    data.validate()?;
    Ok(())
}

pub fn validate_category_changes(data: &UpdateCategory) -> AppResult<()> {
    if let Some(ref name) = data.name {
        validate_category_name(name)?;
    }
    if let Some(Some(ref description)) = data.description {
        validate_category_description(description)?;
    }
    data.validate()?;
    Ok(())
}
