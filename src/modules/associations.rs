//! The `author_books` join relation.
//!
//! Every function takes a connection so callers can run it inside their own
//! transaction. No uniqueness is enforced: the same pair may be stored twice.

use sqlx::SqliteConnection;
use uuid::Uuid;

/// Link an author to a book. Unknown ids fail on the foreign keys.
pub async fn add(
    conn: &mut SqliteConnection,
    author_id: Uuid,
    book_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO author_books (author_id, book_id) VALUES (?, ?)")
        .bind(author_id.to_string())
        .bind(book_id.to_string())
        .execute(conn)
        .await?;
    Ok(())
}

/// Remove every link to `book_id`. Returns how many were removed.
pub async fn clear_for_book(conn: &mut SqliteConnection, book_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM author_books WHERE book_id = ?")
        .bind(book_id.to_string())
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Remove every link to `author_id`. Returns how many were removed.
pub async fn clear_for_author(
    conn: &mut SqliteConnection,
    author_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM author_books WHERE author_id = ?")
        .bind(author_id.to_string())
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
