//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health, loans, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Athenaeum API",
        version = "0.1.0",
        description = "Library Catalog Server REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::me,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Books, genres, copies
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::list_genres,
        books::create_genre,
        books::create_instance,
        books::delete_instance,
        // Loans
        loans::my_loans,
        loans::all_loans,
        loans::renewal_proposal,
        loans::renew,
        loans::checkout,
        loans::mark_returned,
        // Stats
        stats::summary,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorDetails,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            // Books
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            // Copies
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::BookInstanceDetails,
            crate::models::book_instance::CreateBookInstance,
            crate::models::book_instance::LoanStatus,
            crate::models::user::UserShort,
            // Loans
            loans::RenewalProposal,
            loans::RenewRequest,
            loans::CheckoutRequest,
            // Stats
            crate::services::stats::CatalogSummary,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "authors", description = "Author catalog management"),
        (name = "books", description = "Book catalog management"),
        (name = "loans", description = "Loan listings and workflow"),
        (name = "stats", description = "Catalog summary")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
