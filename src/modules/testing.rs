//! Fixtures for database-backed unit tests.

use bookstore_kernel::Migration;
use sqlx::SqlitePool;
use uuid::Uuid;

/// A fresh in-memory database with every module's tables.
pub async fn migrated_pool() -> SqlitePool {
    let pool = bookstore_db::connect_in_memory().await.unwrap();
    let migrations: Vec<(String, Migration)> = [
        ("author", super::authors::MIGRATIONS.as_slice()),
        ("book", super::books::MIGRATIONS.as_slice()),
        ("user", super::users::MIGRATIONS.as_slice()),
    ]
    .into_iter()
    .flat_map(|(module, migrations)| {
        migrations
            .iter()
            .map(move |m| (module.to_string(), m.clone()))
    })
    .collect();
    bookstore_db::run_migrations(&pool, &migrations).await.unwrap();
    pool
}

pub async fn insert_author(pool: &SqlitePool, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO authors (id, name, country) VALUES (?, ?, ?)")
        .bind(id.to_string())
        .bind(name)
        .bind("Nowhere")
        .execute(pool)
        .await
        .unwrap();
    id
}

pub async fn insert_book(pool: &SqlitePool, title: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO books (id, title, published_year, isbn) VALUES (?, ?, ?, ?)")
        .bind(id.to_string())
        .bind(title)
        .bind(chrono::Utc::now())
        .bind("978-000000000-0")
        .execute(pool)
        .await
        .unwrap();
    id
}

pub async fn link(pool: &SqlitePool, author_id: Uuid, book_id: Uuid) {
    let mut conn = pool.acquire().await.unwrap();
    super::associations::add(&mut conn, author_id, book_id)
        .await
        .unwrap();
}
