mod data_formats;
mod db_helpers;
mod errors;
mod handlers;
mod models;

pub mod config;
pub mod query;
pub mod seed;

use std::{
    net::{SocketAddr, TcpListener},
    str::FromStr,
    sync::Arc,
};

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Sqlite, SqlitePool,
};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use data_formats::*;
pub use errors::{ApiError, ErrorCategory, ErrorMessage};
use handlers::*;

pub type JsonResponse<T> = (StatusCode, Json<T>);

pub async fn run_app(config: &Config) -> Result<()> {
    let db = init_db(&config.database_url).await?;
    if config.seed_on_start {
        let data = seed::SeedData::test_data()?;
        seed::seed(&db, &data).await?;
    }
    let listener = TcpListener::bind(config.address)
        .with_context(|| format!("Could not bind {}", config.address))?;
    serve(make_router(db), listener).await
}

/// Serves `app` on an already bound listener until the server stops.
pub async fn serve(app: Router, listener: TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    tracing::info!("Server started on http://{address}");
    axum::Server::from_tcp(listener)?
        .serve(app.layer(TraceLayer::new_for_http()).into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!("Creating database {db_url}");
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("Could not create database {db_url}"))?;
    } else {
        tracing::info!("Database already exists");
    }
    let options = SqliteConnectOptions::from_str(db_url)
        .with_context(|| format!("Invalid DATABASE_URL {db_url}"))?
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(options).await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// An empty, migrated in-memory database.
///
/// The pool holds exactly one connection that is never recycled, since every
/// SQLite in-memory connection is a separate database.
pub async fn init_memory_db() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

async fn migrate(pool: &SqlitePool) -> Result<()> {
    tracing::debug!("Running migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    tracing::debug!("Migrations completed");
    Ok(())
}

/// Binds an OS-assigned local port.
pub fn bind_random_port() -> Result<(SocketAddr, TcpListener)> {
    let listener = TcpListener::bind("127.0.0.1:0").context("Could not get a free port")?;
    Ok((listener.local_addr()?, listener))
}

/// Unknown paths and unsupported methods on known paths both answer with
/// `404 Invalid URL`.
pub fn make_router(db: SqlitePool) -> Router {
    Router::new()
        .route("/api", get(get_endpoints).fallback(not_found))
        .route(
            "/api/topics",
            get(get_topics).post(post_topic).fallback(not_found),
        )
        .route("/api/users", get(get_users).fallback(not_found))
        .route("/api/users/:username", get(get_user).fallback(not_found))
        .route(
            "/api/articles",
            get(get_articles).post(post_article).fallback(not_found),
        )
        .route(
            "/api/articles/:article_id",
            get(get_article)
                .patch(patch_article_votes)
                .delete(delete_article)
                .fallback(not_found),
        )
        .route(
            "/api/articles/:article_id/comments",
            get(get_article_comments)
                .post(post_comment)
                .fallback(not_found),
        )
        .route(
            "/api/comments/:comment_id",
            patch(patch_comment_votes)
                .delete(delete_comment)
                .fallback(not_found),
        )
        .fallback(not_found)
        .layer(Extension(Arc::new(db)))
}
