//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::user::UserShort;

/// Availability status of a physical copy
///
/// Stored as a single-character code. New copies default to Maintenance
/// until they are shelved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl LoanStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }
}

impl Default for LoanStatus {
    fn default() -> Self {
        LoanStatus::Maintenance
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(LoanStatus::Maintenance),
            "o" => Ok(LoanStatus::OnLoan),
            "a" => Ok(LoanStatus::Available),
            "r" => Ok(LoanStatus::Reserved),
            _ => Err(format!("Invalid loan status code: {}", s)),
        }
    }
}

// SQLx conversion for LoanStatus (stored as a one-character string)
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_code().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// One physical copy of a book
///
/// The id is generated at creation and never reused. `due_back` and
/// `borrower_id` are only meaningful while the copy is on loan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    /// Publication descriptor for this copy
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub borrower_id: Option<i32>,
}

impl BookInstance {
    /// Whether this copy is overdue as of `today`.
    ///
    /// Derived, never stored. An absent due date is never compared and is
    /// never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_back {
            Some(due) => due < today,
            None => false,
        }
    }
}

/// Copy with book title and borrower for loan listings and detail pages
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceDetails {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub borrower: Option<UserShort>,
    pub is_overdue: bool,
}

/// Create book instance request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookInstance {
    #[validate(length(min = 1, max = 200))]
    pub imprint: String,
    /// Defaults to Maintenance when omitted
    pub status: Option<LoanStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(due_back: Option<NaiveDate>) -> BookInstance {
        BookInstance {
            id: Uuid::new_v4(),
            book_id: 1,
            imprint: "Test Imprint, 2020".to_string(),
            due_back,
            status: LoanStatus::OnLoan,
            borrower_id: Some(1),
        }
    }

    #[test]
    fn overdue_when_due_back_in_past() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let inst = instance(Some(today.pred_opt().unwrap()));
        assert!(inst.is_overdue(today));
    }

    #[test]
    fn not_overdue_on_due_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let inst = instance(Some(today));
        assert!(!inst.is_overdue(today));
    }

    #[test]
    fn not_overdue_when_due_back_in_future() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let inst = instance(Some(today.succ_opt().unwrap()));
        assert!(!inst.is_overdue(today));
    }

    #[test]
    fn never_overdue_without_due_back() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert!(!instance(None).is_overdue(today));
    }

    #[test]
    fn status_codes_round_trip() {
        for status in [
            LoanStatus::Maintenance,
            LoanStatus::OnLoan,
            LoanStatus::Available,
            LoanStatus::Reserved,
        ] {
            assert_eq!(status.as_code().parse::<LoanStatus>().unwrap(), status);
        }
    }

    #[test]
    fn default_status_is_maintenance() {
        assert_eq!(LoanStatus::default(), LoanStatus::Maintenance);
    }
}
