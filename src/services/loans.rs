//! Loan management service
//!
//! Holds the renewal-date rule: a librarian may move a copy's due date
//! anywhere between today and four weeks out, and the pre-filled suggestion
//! is three weeks out (the normal loan period).

use chrono::{Duration, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book_instance::{BookInstance, BookInstanceDetails, LoanStatus},
    repository::Repository,
};

use super::page_offset;

/// Page size for both the self-service and the all-loans listings
pub const LOANS_PAGE_SIZE: i64 = 10;

/// Furthest a renewal may be pushed out, in days
pub const RENEWAL_WINDOW_DAYS: i64 = 28;

/// Normal loan period, used for the pre-filled renewal suggestion
pub const DEFAULT_LOAN_DAYS: i64 = 21;

/// Why a proposed renewal date was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenewalDateError {
    #[error("Invalid date - renewal in past")]
    InPast,
    #[error("Invalid date - renewal more than 4 weeks ahead")]
    TooFarAhead,
}

impl From<RenewalDateError> for AppError {
    fn from(err: RenewalDateError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Decide whether a proposed renewal date is acceptable.
///
/// Today itself and exactly four weeks out are both valid. Pure: rejection
/// has no side effects, and the caller writes the accepted date.
pub fn validate_renewal_date(
    proposed: NaiveDate,
    today: NaiveDate,
) -> Result<(), RenewalDateError> {
    if proposed < today {
        return Err(RenewalDateError::InPast);
    }
    if proposed > today + Duration::days(RENEWAL_WINDOW_DAYS) {
        return Err(RenewalDateError::TooFarAhead);
    }
    Ok(())
}

/// Default date offered when a renewal form is opened. A suggestion only,
/// never validated against itself.
pub fn proposed_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(DEFAULT_LOAN_DAYS)
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Copies on loan to the requesting user, ordered by due date
    pub async fn my_loans(
        &self,
        borrower_id: i32,
        page: i64,
    ) -> AppResult<(Vec<BookInstanceDetails>, i64)> {
        self.repository
            .book_instances
            .loans_for_borrower(borrower_id, page_offset(page, LOANS_PAGE_SIZE), LOANS_PAGE_SIZE)
            .await
    }

    /// All copies on loan regardless of borrower, ordered by due date
    pub async fn all_loans(&self, page: i64) -> AppResult<(Vec<BookInstanceDetails>, i64)> {
        self.repository
            .book_instances
            .all_loans(page_offset(page, LOANS_PAGE_SIZE), LOANS_PAGE_SIZE)
            .await
    }

    /// Look up a copy and compute the suggested renewal date for the form
    pub async fn renewal_proposal(&self, id: Uuid) -> AppResult<(BookInstance, NaiveDate)> {
        let instance = self.repository.book_instances.get_by_id(id).await?;
        Ok((instance, proposed_renewal_date(Utc::now().date_naive())))
    }

    /// Renew a loan: validate the proposed date, then write it as the copy's
    /// new due date. Any holder of the loans permission may renew any copy.
    pub async fn renew(&self, id: Uuid, renewal_date: NaiveDate) -> AppResult<BookInstance> {
        let instance = self.repository.book_instances.get_by_id(id).await?;

        if instance.status != LoanStatus::OnLoan {
            return Err(AppError::BusinessRule(
                "Only copies on loan can be renewed".to_string(),
            ));
        }

        validate_renewal_date(renewal_date, Utc::now().date_naive())?;

        self.repository
            .book_instances
            .set_due_back(id, renewal_date)
            .await
    }

    /// Lend an available copy to a borrower. The due date defaults to the
    /// normal loan period when not given.
    pub async fn checkout(
        &self,
        id: Uuid,
        borrower_id: i32,
        due_back: Option<NaiveDate>,
    ) -> AppResult<BookInstance> {
        let instance = self.repository.book_instances.get_by_id(id).await?;

        if instance.status != LoanStatus::Available {
            return Err(AppError::BusinessRule(format!(
                "Copy is not available (status: {})",
                instance.status
            )));
        }

        // Verify the borrower exists
        self.repository.users.get_by_id(borrower_id).await?;

        let due = due_back.unwrap_or_else(|| proposed_renewal_date(Utc::now().date_naive()));
        self.repository
            .book_instances
            .checkout(id, borrower_id, due)
            .await
    }

    /// Mark a loaned copy returned
    pub async fn mark_returned(&self, id: Uuid) -> AppResult<BookInstance> {
        let instance = self.repository.book_instances.get_by_id(id).await?;

        if instance.status != LoanStatus::OnLoan {
            return Err(AppError::BusinessRule(
                "Only copies on loan can be returned".to_string(),
            ));
        }

        self.repository.book_instances.mark_returned(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn rejects_date_in_past() {
        let proposed = today() - Duration::days(1);
        assert_eq!(
            validate_renewal_date(proposed, today()),
            Err(RenewalDateError::InPast)
        );
    }

    #[test]
    fn accepts_today() {
        assert_eq!(validate_renewal_date(today(), today()), Ok(()));
    }

    #[test]
    fn accepts_exactly_four_weeks_ahead() {
        let proposed = today() + Duration::days(28);
        assert_eq!(validate_renewal_date(proposed, today()), Ok(()));
    }

    #[test]
    fn rejects_more_than_four_weeks_ahead() {
        let proposed = today() + Duration::days(29);
        assert_eq!(
            validate_renewal_date(proposed, today()),
            Err(RenewalDateError::TooFarAhead)
        );
    }

    #[test]
    fn rejection_reasons_are_distinguishable() {
        let past = validate_renewal_date(today() - Duration::days(7), today()).unwrap_err();
        let ahead = validate_renewal_date(today() + Duration::days(60), today()).unwrap_err();
        assert_ne!(past, ahead);
        assert_ne!(past.to_string(), ahead.to_string());
    }

    #[test]
    fn proposal_is_three_weeks_out() {
        assert_eq!(proposed_renewal_date(today()), today() + Duration::days(21));
    }
}
