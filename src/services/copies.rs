//! Copies service

use crate::{
    error::{AppError, AppResult},
    models::copy::{Copy, CopyCount, CopyQuery, CopyStatus, CreateCopy},
    repository::Repository,
};

#[derive(Clone)]
pub struct CopiesService {
    repository: Repository,
}

impl CopiesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List copies, filtered by book title and availability
    pub async fn list(&self, query: &CopyQuery) -> AppResult<Vec<Copy>> {
        let status = query.status();

        match query.title.as_deref() {
            Some(title) => self.repository.copies.list_by_title(title, status).await,
            None => self.repository.copies.list(status).await,
        }
    }

    /// Copies of a book that can be rented right now
    pub async fn list_available_for_book(&self, book_id: i32) -> AppResult<Vec<Copy>> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository
            .copies
            .list_by_book(book_id, Some(CopyStatus::Available))
            .await
    }

    pub async fn count_for_book(&self, book_id: i32) -> AppResult<CopyCount> {
        self.repository.books.get_by_id(book_id).await?;
        let copies = self.repository.copies.count_by_book(book_id).await?;
        Ok(CopyCount { book_id, copies })
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Copy> {
        self.repository.copies.get_by_id(id).await
    }

    pub async fn create(&self, copy: &CreateCopy) -> AppResult<Copy> {
        self.repository.books.get_by_id(copy.book_id).await?;
        self.repository
            .copies
            .create(copy.book_id, copy.status.unwrap_or_default())
            .await
    }

    /// Change the status of a copy. A rented copy only becomes available
    /// again by completing its rental.
    pub async fn change_status(&self, id: i32, status: CopyStatus) -> AppResult<Copy> {
        let copy = self.repository.copies.get_by_id(id).await?;

        if copy.status == CopyStatus::Rented && status == CopyStatus::Available {
            return Err(AppError::BusinessRule(format!(
                "Copy {} is rented, complete its rental instead",
                id
            )));
        }

        let updated = self.repository.copies.update_status(id, status).await?;
        tracing::info!(copy_id = id, from = %copy.status, to = %status, "Copy status changed");
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.copies.delete(id).await
    }
}
