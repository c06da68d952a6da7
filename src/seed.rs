//! Sample dataset loaded into an empty store

use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::{CreateAuthor, CreateBook, CreateCategory},
    services::Services,
};

const CATEGORIES: &[(&str, &str)] = &[
    ("Fiction", "Literary works based on imagination"),
    ("Programming", "Books about software development"),
    ("Science", "Scientific literature and research"),
    ("History", "Historical accounts and analysis"),
    ("Business", "Business and entrepreneurship"),
];

const AUTHORS: &[(&str, &str, &str)] = &[
    (
        "Robert C. Martin",
        "Software engineer and author, known for promoting software design principles",
        "USA",
    ),
    (
        "Martin Fowler",
        "British software developer, author and international speaker",
        "UK",
    ),
    (
        "Eric Evans",
        "Software developer and author who coined the term Domain-Driven Design",
        "USA",
    ),
    (
        "George Orwell",
        "English novelist and essayist, journalist and critic",
        "UK",
    ),
    (
        "Yuval Noah Harari",
        "Israeli public intellectual, historian and professor",
        "Israel",
    ),
];

struct SeedBook {
    title: &'static str,
    author: &'static str,
    isbn: &'static str,
    year: i32,
    pages: i32,
    description: &'static str,
    categories: &'static [&'static str],
}

const BOOKS: &[SeedBook] = &[
    SeedBook {
        title: "Clean Code: A Handbook of Agile Software Craftsmanship",
        author: "Robert C. Martin",
        isbn: "9780132350884",
        year: 2008,
        pages: 464,
        description: "Even bad code can function. But if code isn't clean, it can bring a development organization to its knees.",
        categories: &["Programming"],
    },
    SeedBook {
        title: "Clean Architecture",
        author: "Robert C. Martin",
        isbn: "9780134494166",
        year: 2017,
        pages: 432,
        description: "Robert C. Martin shows how to bring greater professionalism and discipline to application architecture.",
        categories: &["Programming", "Business"],
    },
    SeedBook {
        title: "Refactoring: Improving the Design of Existing Code",
        author: "Martin Fowler",
        isbn: "9780201485677",
        year: 1999,
        pages: 464,
        description: "Improving the design of existing code through small behavior-preserving transformations.",
        categories: &["Programming"],
    },
    SeedBook {
        title: "Domain-Driven Design: Tackling Complexity in the Heart of Software",
        author: "Eric Evans",
        isbn: "9780321125217",
        year: 2003,
        pages: 560,
        description: "How to make the design of your software match your mental model of the problem domain.",
        categories: &["Programming", "Business"],
    },
    SeedBook {
        title: "1984",
        author: "George Orwell",
        isbn: "9780451524935",
        year: 1949,
        pages: 328,
        description: "A dystopian social science fiction novel and cautionary tale about the dangers of totalitarianism.",
        categories: &["Fiction", "History"],
    },
    SeedBook {
        title: "Animal Farm",
        author: "George Orwell",
        isbn: "9780451526342",
        year: 1945,
        pages: 112,
        description: "A satirical allegorical novella reflecting events leading up to the Russian Revolution and the Stalinist era.",
        categories: &["Fiction", "History"],
    },
    SeedBook {
        title: "Sapiens: A Brief History of Humankind",
        author: "Yuval Noah Harari",
        isbn: "9780062316097",
        year: 2011,
        pages: 443,
        description: "Explores the history of humankind from the Stone Age to the twenty-first century.",
        categories: &["History", "Science"],
    },
    SeedBook {
        title: "Homo Deus: A Brief History of Tomorrow",
        author: "Yuval Noah Harari",
        isbn: "9780062464316",
        year: 2015,
        pages: 450,
        description: "Explores the projects, dreams and nightmares that will shape the twenty-first century.",
        categories: &["History", "Science"],
    },
];

/// Populate the sample dataset through the services.
///
/// Returns `false` without touching anything when the store already holds books,
/// authors or categories.
pub async fn seed_sample_data(services: &Services) -> AppResult<bool> {
    let existing = services.stats.get_stats().await?;
    if existing.total_books > 0 || existing.total_authors > 0 || existing.total_categories > 0 {
        tracing::info!("Store is not empty, skipping sample data");
        return Ok(false);
    }

    let mut category_ids = HashMap::new();
    for (name, description) in CATEGORIES {
        let category = services
            .categories
            .create(&CreateCategory {
                name: name.to_string(),
                description: Some(description.to_string()),
            })
            .await?;
        category_ids.insert(*name, category.id);
    }

    let mut author_ids = HashMap::new();
    for (name, bio, country) in AUTHORS {
        let author = services
            .authors
            .create(&CreateAuthor {
                name: name.to_string(),
                bio: Some(bio.to_string()),
                country: Some(country.to_string()),
            })
            .await?;
        author_ids.insert(*name, author.id);
    }

    for book in BOOKS {
        let author_id = *author_ids
            .get(book.author)
            .ok_or_else(|| AppError::Internal(format!("Unknown seed author {}", book.author)))?;
        let categories = book
            .categories
            .iter()
            .map(|name| {
                category_ids.get(name).copied().ok_or_else(|| {
                    AppError::Internal(format!("Unknown seed category {}", name))
                })
            })
            .collect::<AppResult<Vec<i32>>>()?;

        services
            .books
            .create(&CreateBook {
                title: book.title.to_string(),
                author_id,
                isbn: book.isbn.to_string(),
                year: book.year,
                description: Some(book.description.to_string()),
                pages: Some(book.pages),
                category_ids: Some(categories),
            })
            .await?;
    }

    tracing::info!(
        "Seeded {} categories, {} authors and {} books",
        CATEGORIES.len(),
        AUTHORS.len(),
        BOOKS.len()
    );
    Ok(true)
}
