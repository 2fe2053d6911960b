use news_api::{bind_random_port, init_memory_db, make_router, seed, serve};

/// Starts a server over a freshly seeded in-memory database and returns its
/// base URL.
pub async fn spawn_app() -> String {
    let pool = init_memory_db().await.expect("in-memory database");
    let data = seed::SeedData::test_data().expect("bundled fixture");
    seed::seed(&pool, &data).await.expect("seeding");

    let (address, listener) = bind_random_port().expect("free port");
    tokio::spawn(serve(make_router(pool), listener));
    format!("http://{address}")
}
