//! Book, genre and copy endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookDetails, CreateBook, UpdateBook},
        book_instance::{BookInstance, CreateBookInstance},
        genre::{CreateGenre, Genre},
    },
    services::catalog::BOOKS_PAGE_SIZE,
};

use super::{AuthenticatedUser, PageQuery, PaginatedResponse};

/// List books, ordered by title
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated book list", body = PaginatedResponse<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let page = query.page();
    let (items, total) = state.services.catalog.list_books(page).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page: BOOKS_PAGE_SIZE,
    }))
}

/// Get book details with author, genres and copies
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let details = state.services.catalog.get_book(id).await?;
    Ok(Json(details))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Missing catalog permission"),
        (status = 404, description = "Referenced author not found")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_modify_catalog()?;

    let created = state.services.catalog.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 403, description = "Missing catalog permission"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(update): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_modify_catalog()?;

    let updated = state.services.catalog.update_book(id, update).await?;
    Ok(Json(updated))
}

/// Delete a book and all of its copies
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "Missing catalog permission"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_modify_catalog()?;

    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List all genres
#[utoipa::path(
    get,
    path = "/genres",
    tag = "books",
    responses(
        (status = 200, description = "Genre list", body = Vec<Genre>)
    )
)]
pub async fn list_genres(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(genres))
}

/// Create a new genre
#[utoipa::path(
    post,
    path = "/genres",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateGenre,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 403, description = "Missing catalog permission")
    )
)]
pub async fn create_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(genre): Json<CreateGenre>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    claims.require_modify_catalog()?;

    let created = state.services.catalog.create_genre(genre).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Add a copy of a book
#[utoipa::path(
    post,
    path = "/books/{id}/instances",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = CreateBookInstance,
    responses(
        (status = 201, description = "Copy created", body = BookInstance),
        (status = 403, description = "Missing catalog permission"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
    Json(instance): Json<CreateBookInstance>,
) -> AppResult<(StatusCode, Json<BookInstance>)> {
    claims.require_modify_catalog()?;

    let created = state
        .services
        .catalog
        .create_instance(book_id, instance)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a copy
#[utoipa::path(
    delete,
    path = "/instances/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 403, description = "Missing catalog permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn delete_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_modify_catalog()?;

    state.services.catalog.delete_instance(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
