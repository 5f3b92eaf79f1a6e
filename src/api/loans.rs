//! Loan endpoints: listings, renewal, checkout and return
//!
//! The self-service listing needs only a logged-in identity; everything
//! else here is gated on the librarian loans permission. Renewal carries
//! no ownership check: any permission holder may renew any copy.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book_instance::{BookInstance, BookInstanceDetails},
    services::loans::LOANS_PAGE_SIZE,
};

use super::{AuthenticatedUser, PageQuery, PaginatedResponse};

/// Renewal form state: the copy and a suggested date
#[derive(Serialize, ToSchema)]
pub struct RenewalProposal {
    pub instance: BookInstance,
    /// Pre-filled suggestion, three weeks from today
    pub proposed_renewal_date: NaiveDate,
}

/// Renew request
#[derive(Deserialize, ToSchema)]
pub struct RenewRequest {
    /// New due date; must lie between today and four weeks ahead
    pub renewal_date: NaiveDate,
}

/// Checkout request
#[derive(Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub borrower_id: i32,
    /// Defaults to three weeks from today when omitted
    pub due_back: Option<NaiveDate>,
}

/// List the copies on loan to the current user
#[utoipa::path(
    get,
    path = "/loans/mine",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Own loans, ordered by due date", body = PaginatedResponse<BookInstanceDetails>),
        (status = 303, description = "Not authenticated, redirect to login")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<BookInstanceDetails>>> {
    let page = query.page();
    let (items, total) = state.services.loans.my_loans(claims.user_id, page).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page: LOANS_PAGE_SIZE,
    }))
}

/// List all copies on loan, with their borrowers (librarians only)
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "All loans, ordered by due date", body = PaginatedResponse<BookInstanceDetails>),
        (status = 303, description = "Not authenticated, redirect to login"),
        (status = 403, description = "Missing loans permission")
    )
)]
pub async fn all_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<BookInstanceDetails>>> {
    claims.require_mark_returned()?;

    let page = query.page();
    let (items, total) = state.services.loans.all_loans(page).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page: LOANS_PAGE_SIZE,
    }))
}

/// Get the renewal form state for a copy
#[utoipa::path(
    get,
    path = "/instances/{id}/renewal",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy and suggested date", body = RenewalProposal),
        (status = 403, description = "Missing loans permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renewal_proposal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalProposal>> {
    claims.require_mark_returned()?;

    let (instance, proposed_renewal_date) = state.services.loans.renewal_proposal(id).await?;
    Ok(Json(RenewalProposal {
        instance,
        proposed_renewal_date,
    }))
}

/// Renew a loaned copy to a new due date
#[utoipa::path(
    post,
    path = "/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body = RenewRequest,
    responses(
        (status = 200, description = "Copy renewed", body = BookInstance),
        (status = 400, description = "Date in the past or more than 4 weeks ahead"),
        (status = 403, description = "Missing loans permission"),
        (status = 404, description = "Copy not found"),
        (status = 422, description = "Copy is not on loan")
    )
)]
pub async fn renew(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RenewRequest>,
) -> AppResult<Json<BookInstance>> {
    claims.require_mark_returned()?;

    let renewed = state.services.loans.renew(id, request.renewal_date).await?;
    Ok(Json(renewed))
}

/// Lend an available copy to a borrower
#[utoipa::path(
    post,
    path = "/instances/{id}/checkout",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Copy checked out", body = BookInstance),
        (status = 403, description = "Missing loans permission"),
        (status = 404, description = "Copy or borrower not found"),
        (status = 422, description = "Copy is not available")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<Json<BookInstance>> {
    claims.require_mark_returned()?;

    let instance = state
        .services
        .loans
        .checkout(id, request.borrower_id, request.due_back)
        .await?;
    Ok(Json(instance))
}

/// Mark a loaned copy returned
#[utoipa::path(
    post,
    path = "/instances/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy returned", body = BookInstance),
        (status = 403, description = "Missing loans permission"),
        (status = 404, description = "Copy not found"),
        (status = 422, description = "Copy is not on loan")
    )
)]
pub async fn mark_returned(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstance>> {
    claims.require_mark_returned()?;

    let instance = state.services.loans.mark_returned(id).await?;
    Ok(Json(instance))
}
