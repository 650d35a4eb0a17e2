//! Business logic services

pub mod audit;
pub mod books;
pub mod copies;
pub mod email;
pub mod readers;
pub mod rentals;
pub mod scheduler;
pub mod users;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub books: books::BooksService,
    pub copies: copies::CopiesService,
    pub readers: readers::ReadersService,
    pub rentals: rentals::RentalsService,
    pub email: email::EmailService,
    pub scheduler: scheduler::EmailScheduler,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let email = email::EmailService::new(config.email.clone());

        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone()),
            books: books::BooksService::new(repository.clone()),
            copies: copies::CopiesService::new(repository.clone()),
            readers: readers::ReadersService::new(repository.clone()),
            rentals: rentals::RentalsService::new(repository.clone(), config.rentals.clone()),
            scheduler: scheduler::EmailScheduler::new(
                repository,
                email.clone(),
                config.admin.mail.clone(),
                config.scheduler.clone(),
            ),
            email,
        }
    }
}
