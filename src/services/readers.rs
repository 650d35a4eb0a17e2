//! Readers service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::reader::{CreateReader, Reader},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReadersService {
    repository: Repository,
}

impl ReadersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Reader>> {
        self.repository.readers.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Reader> {
        self.repository.readers.get_by_id(id).await
    }

    pub async fn create(&self, reader: &CreateReader) -> AppResult<Reader> {
        reader.validate()?;
        self.repository.readers.create(reader).await
    }

    /// Delete a reader who has no rentals on record
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if self.repository.readers.has_rentals(id).await? {
            return Err(AppError::BusinessRule(format!("Reader {} still has rentals", id)));
        }
        self.repository.readers.delete(id).await
    }
}
