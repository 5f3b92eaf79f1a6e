//! Catalog service: authors, books, genres and their copies

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDetails, CreateAuthor, UpdateAuthor},
        book::{Book, BookDetails, CreateBook, UpdateBook},
        book_instance::{BookInstance, CreateBookInstance},
        genre::{CreateGenre, Genre},
    },
    repository::Repository,
};

use super::page_offset;

/// Page size for the book listing
pub const BOOKS_PAGE_SIZE: i64 = 3;

/// Page size for the author listing
pub const AUTHORS_PAGE_SIZE: i64 = 10;

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Authors

    pub async fn list_authors(&self, page: i64) -> AppResult<(Vec<Author>, i64)> {
        self.repository
            .authors
            .list(page_offset(page, AUTHORS_PAGE_SIZE), AUTHORS_PAGE_SIZE)
            .await
    }

    /// Author detail with the list of books they have written
    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.authors.books_by_author(id).await?;
        Ok(AuthorDetails { author, books })
    }

    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        author
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.create(&author).await
    }

    pub async fn update_author(&self, id: i32, update: UpdateAuthor) -> AppResult<Author> {
        update
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.update(id, &update).await
    }

    /// Delete an author; their books survive with a null author reference
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }

    // Books

    pub async fn list_books(&self, page: i64) -> AppResult<(Vec<Book>, i64)> {
        self.repository
            .books
            .list(page_offset(page, BOOKS_PAGE_SIZE), BOOKS_PAGE_SIZE)
            .await
    }

    /// Book detail with author, genres and all copies (overdue flag included)
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;
        let author = match book.author_id {
            Some(author_id) => Some(self.repository.authors.get_by_id(author_id).await?),
            None => None,
        };
        let genres = self.repository.books.genres_for_book(id).await?;
        let copies = self.repository.book_instances.copies_of_book(id).await?;
        Ok(BookDetails {
            book,
            author,
            genres,
            copies,
        })
    }

    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if let Some(author_id) = book.author_id {
            // Surface a clear not-found instead of a foreign key violation
            self.repository.authors.get_by_id(author_id).await?;
        }
        self.repository.books.create(&book).await
    }

    pub async fn update_book(&self, id: i32, update: UpdateBook) -> AppResult<Book> {
        update
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if let Some(Some(author_id)) = update.author_id {
            self.repository.authors.get_by_id(author_id).await?;
        }
        self.repository.books.update(id, &update).await
    }

    /// Delete a book and, via cascade, all of its copies
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    // Genres

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn create_genre(&self, genre: CreateGenre) -> AppResult<Genre> {
        genre
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.genres.create(&genre).await
    }

    // Copies

    pub async fn create_instance(
        &self,
        book_id: i32,
        instance: CreateBookInstance,
    ) -> AppResult<BookInstance> {
        instance
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        // Verify the book exists
        self.repository.books.get_by_id(book_id).await?;
        self.repository.book_instances.create(book_id, &instance).await
    }

    pub async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        self.repository.book_instances.delete(id).await
    }
}
