//! Daily return-reminder sweep

use chrono::{DateTime, Duration, Utc};

use crate::{
    error::AppResult,
    repository::Repository,
    services::{email::EmailService, notifications::NotificationHub},
};

/// Background job that mails return reminders and overdue notices once a day
/// and mirrors them onto the notification fan-out.
#[derive(Clone)]
pub struct ReminderScheduler {
    repository: Repository,
    email: EmailService,
    hub: NotificationHub,
    hour_utc: u32,
}

impl ReminderScheduler {
    pub fn new(
        repository: Repository,
        email: EmailService,
        hub: NotificationHub,
        hour_utc: u32,
    ) -> Self {
        Self {
            repository,
            email,
            hub,
            hour_utc,
        }
    }

    /// Spawn the scheduler loop on the runtime
    pub fn spawn(self) {
        tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let next = next_run_after(now, self.hour_utc);
                let wait = (next - now)
                    .to_std()
                    .unwrap_or_else(|_| std::time::Duration::from_secs(0));

                tracing::info!("Next reminder sweep at {}", next);
                tokio::time::sleep(wait).await;

                if let Err(e) = self.run_sweep().await {
                    tracing::error!("Reminder sweep failed: {}", e);
                }
            }
        });
    }

    /// One sweep: remind loans due within 24h, notify overdue ones
    pub async fn run_sweep(&self) -> AppResult<()> {
        let now = Utc::now();
        let tomorrow = now + Duration::days(1);

        let due_tomorrow = self.repository.borrows.due_between(now, tomorrow).await?;
        let overdue = self.repository.borrows.overdue(now).await?;

        tracing::info!(
            "Reminder sweep: {} due tomorrow, {} overdue",
            due_tomorrow.len(),
            overdue.len()
        );

        for loan in &due_tomorrow {
            if let Err(e) = self
                .email
                .send_return_reminder(&loan.user_email, &loan.user_name, &loan.book_title)
                .await
            {
                tracing::warn!("Failed to send reminder to {}: {}", loan.user_email, e);
            }

            self.hub.broadcast(format!(
                "Reminder: The book \"{}\" is due tomorrow.",
                loan.book_title
            ));
        }

        for loan in &overdue {
            if let Err(e) = self
                .email
                .send_overdue_notice(&loan.user_email, &loan.user_name, &loan.book_title)
                .await
            {
                tracing::warn!("Failed to send overdue notice to {}: {}", loan.user_email, e);
            }

            self.hub.broadcast(format!(
                "Overdue Alert: The book \"{}\" is overdue. Please return it to avoid further fines.",
                loan.book_title
            ));
        }

        Ok(())
    }
}

/// Next occurrence of `hour_utc`:00:00 strictly after `now`
pub fn next_run_after(now: DateTime<Utc>, hour_utc: u32) -> DateTime<Utc> {
    let today_run = now
        .date_naive()
        .and_hms_opt(hour_utc.min(23), 0, 0)
        .expect("valid wall-clock time")
        .and_utc();

    if today_run > now {
        today_run
    } else {
        today_run + Duration::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn next_run_is_later_today_before_the_hour() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 6, 30, 0).unwrap();
        let next = next_run_after(now, 8);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap());
    }

    #[test]
    fn next_run_rolls_to_tomorrow_after_the_hour() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let next = next_run_after(now, 8);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 3, 11, 8, 0, 0).unwrap());
    }

    #[test]
    fn next_run_skips_the_exact_hour() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let next = next_run_after(now, 8);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 3, 11, 8, 0, 0).unwrap());
    }
}
