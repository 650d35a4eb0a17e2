//! Book catalog service

use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, CreateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        book.validate()?;
        let created = self.repository.books.create(book).await?;
        tracing::info!(book_id = created.id, title = %created.title, "Book created");
        Ok(created)
    }

    /// Delete a book and all of its copies
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }
}
