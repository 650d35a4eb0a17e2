//! Weekly summary email job

use chrono::{DateTime, Datelike, Duration, Local, TimeZone, Weekday};
use tokio::task::JoinHandle;

use crate::{
    config::SchedulerConfig,
    error::AppResult,
    models::{copy::CopyStatus, mail::Mail},
    repository::Repository,
};

use super::email::EmailService;

pub const SUMMARY_SUBJECT: &str = "Library: Books info";

/// Counts reported in the weekly summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySummary {
    pub books: i64,
    pub copies: i64,
    pub available_copies: i64,
    pub active_rentals: i64,
}

impl LibrarySummary {
    pub fn to_message(&self) -> String {
        format!(
            "Weekly summary of books status in the database.\n\n\
             Books: {}\n\
             Copies: {}\n\
             Available copies: {}\n\
             Active rentals: {}\n",
            self.books, self.copies, self.available_copies, self.active_rentals
        )
    }
}

/// Next time strictly after `now` that falls on `weekday` at `hour`:00.
/// Returns `None` for an hour outside 0-23.
pub fn next_weekly_run<Tz: TimeZone>(now: &DateTime<Tz>, weekday: Weekday, hour: u32) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let today = now.date_naive();
    let days_ahead = (7 + weekday.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64)
        % 7;

    for week in 0..=1 {
        let date = today + Duration::days(days_ahead + 7 * week);
        let naive = date.and_hms_opt(hour, 0, 0)?;
        if let Some(candidate) = tz.from_local_datetime(&naive).earliest() {
            if candidate > *now {
                return Some(candidate);
            }
        }
    }
    None
}

#[derive(Clone)]
pub struct EmailScheduler {
    repository: Repository,
    email: EmailService,
    admin_mail: String,
    config: SchedulerConfig,
}

impl EmailScheduler {
    pub fn new(
        repository: Repository,
        email: EmailService,
        admin_mail: String,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            repository,
            email,
            admin_mail,
            config,
        }
    }

    /// Start the weekly job in the background
    pub fn spawn(self) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            tracing::info!("Summary email scheduler disabled");
            return None;
        }

        let weekday = match self.config.weekday.parse::<Weekday>() {
            Ok(weekday) => weekday,
            Err(_) => {
                tracing::error!(weekday = %self.config.weekday, "Invalid scheduler weekday, summary email disabled");
                return None;
            }
        };

        Some(tokio::spawn(self.run(weekday)))
    }

    async fn run(self, weekday: Weekday) {
        loop {
            let now = Local::now();
            let Some(next) = next_weekly_run(&now, weekday, self.config.hour) else {
                tracing::error!(hour = self.config.hour, "Invalid scheduler hour, summary email disabled");
                return;
            };

            tracing::info!(next_run = %next, "Summary email scheduled");
            tokio::time::sleep((next - now).to_std().unwrap_or_default()).await;

            if let Err(e) = self.send_information_email().await {
                tracing::error!("Failed to send summary email: {}", e);
            }
        }
    }

    pub async fn summary(&self) -> AppResult<LibrarySummary> {
        Ok(LibrarySummary {
            books: self.repository.books.count().await?,
            copies: self.repository.copies.count(None).await?,
            available_copies: self.repository.copies.count(Some(CopyStatus::Available)).await?,
            active_rentals: self.repository.rentals.count_active().await?,
        })
    }

    /// Send the summary email to the library administrator
    pub async fn send_information_email(&self) -> AppResult<()> {
        tracing::info!("Preparing to send weekly database summary email");

        let summary = self.summary().await?;
        let mail = Mail::new(self.admin_mail.as_str(), SUMMARY_SUBJECT, summary.to_message());
        self.email.send(&mail).await?;

        tracing::info!(to = %self.admin_mail, "Summary email has been sent");
        Ok(())
    }
}
