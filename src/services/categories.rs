//! Categories service

use crate::{
    error::{AppError, AppResult},
    models::{Category, CreateCategory, UpdateCategory},
    repository::Repository,
    validation::{validate_category_changes, validate_new_category},
};

use super::{clean, clean_clearable, clean_optional};

#[derive(Clone)]
pub struct CategoriesService {
    repository: Repository,
}

impl CategoriesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        self.repository.categories.list().await
    }

    pub async fn get(&self, id: i32, include_books: bool) -> AppResult<Category> {
        let mut category = self
            .repository
            .categories
            .get(id)
            .await?
            .ok_or_else(|| AppError::category_not_found(id))?;

        if include_books {
            category.books = Some(self.repository.categories.books(id).await?);
        }
        Ok(category)
    }

    pub async fn create(&self, data: &CreateCategory) -> AppResult<Category> {
        validate_new_category(data)?;

        let data = CreateCategory {
            name: clean(&data.name),
            description: clean_optional(&data.description),
        };

        if self.repository.categories.name_exists(&data.name, None).await? {
            tracing::warn!("Rejected duplicate category name {}", data.name);
            return Err(AppError::DuplicateName(data.name));
        }

        let category = self.repository.categories.create(&data).await?;
        tracing::info!("Created category {} ({})", category.id, category.name);
        Ok(category)
    }

    pub async fn update(&self, id: i32, data: &UpdateCategory) -> AppResult<Category> {
        let existing = self.get(id, false).await?;
        validate_category_changes(data)?;

        let data = UpdateCategory {
            name: data.name.as_deref().map(clean),
            description: clean_clearable(&data.description),
        };

        if let Some(ref name) = data.name {
            if *name != existing.name
                && self.repository.categories.name_exists(name, Some(id)).await?
            {
                tracing::warn!("Rejected rename of category {} to duplicate {}", id, name);
                return Err(AppError::DuplicateName(name.clone()));
            }
        }

        let category = self
            .repository
            .categories
            .update(id, &data)
            .await?
            .ok_or_else(|| AppError::category_not_found(id))?;
        tracing::info!("Updated category {}", id);
        Ok(category)
    }

    /// Delete a category; tagged books lose the tag but are kept
    pub async fn delete(&self, id: i32) -> AppResult<Category> {
        let category = self.get(id, false).await?;
        if !self.repository.categories.delete(id).await? {
            return Err(AppError::category_not_found(id));
        }
        tracing::info!("Deleted category {} ({})", id, category.name);
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        models::{CreateAuthor, CreateBook},
        services::Services,
    };

    fn new_category(name: &str) -> CreateCategory {
        CreateCategory {
            name: name.into(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let services = Services::new(Repository::in_memory());
        services.categories.create(&new_category("Programming")).await.unwrap();

        let err = services
            .categories
            .create(&new_category("  Programming "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.to_string(), "Category 'Programming' already exists");
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_conflicts() {
        let services = Services::new(Repository::in_memory());
        services.categories.create(&new_category("Programming")).await.unwrap();
        let design = services.categories.create(&new_category("Design")).await.unwrap();

        let err = services
            .categories
            .update(
                design.id,
                &UpdateCategory {
                    name: Some("Programming".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateName(_)));

        let same = services
            .categories
            .update(
                design.id,
                &UpdateCategory {
                    name: Some("Design".into()),
                    description: Some(Some("Software design".into())),
                },
            )
            .await
            .unwrap();
        assert_eq!(same.description.as_deref(), Some("Software design"));
    }

    #[tokio::test]
    async fn test_delete_keeps_tagged_books() {
        let services = Services::new(Repository::in_memory());
        let category = services.categories.create(&new_category("Programming")).await.unwrap();
        let author = services
            .authors
            .create(&CreateAuthor {
                name: "Martin Fowler".into(),
                bio: None,
                country: None,
            })
            .await
            .unwrap();
        let book = services
            .books
            .create(&CreateBook {
                title: "Refactoring".into(),
                author_id: author.id,
                isbn: "0201485672".into(),
                year: 1999,
                description: None,
                pages: None,
                category_ids: Some(vec![category.id]),
            })
            .await
            .unwrap();

        let detailed = services.categories.get(category.id, true).await.unwrap();
        assert_eq!(detailed.book_count, 1);
        assert_eq!(detailed.books.map(|b| b.len()), Some(1));

        let deleted = services.categories.delete(category.id).await.unwrap();
        assert_eq!(deleted.name, "Programming");

        let book = services.books.get(book.id).await.unwrap();
        assert!(book.categories.is_empty());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let services = Services::new(Repository::in_memory());
        for name in ["Testing", "Architecture", "Programming"] {
            services.categories.create(&new_category(name)).await.unwrap();
        }

        let names: Vec<_> = services
            .categories
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Architecture", "Programming", "Testing"]);
    }
}
