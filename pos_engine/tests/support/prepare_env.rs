use log::*;
use pos_common::Money;
use pos_engine::{db_types::NewProduct, SqliteDatabase};
use sqlx::{migrate::MigrateDatabase, Sqlite};

/// The catalog every test database starts with.
pub const BURGER: i64 = 1;
pub const FRIES: i64 = 2;
pub const SODA: i64 = 3;
/// Present in the catalog, but not for sale
pub const RETIRED: i64 = 4;

pub fn random_db_url() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/pos_test_{}.db", dir.display(), rand::random::<u64>())
}

/// Creates a fresh, migrated database with the standard catalog and returns it together with its URL.
pub async fn prepare_test_env() -> (SqliteDatabase, String) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let url = random_db_url();
    let db = SqliteDatabase::create_and_migrate(&url, 5).await.expect("Error creating test database");
    debug!("🚀️ Created test database {url}");
    seed_catalog(&db).await;
    (db, url)
}

pub async fn seed_catalog(db: &SqliteDatabase) {
    let products = [
        NewProduct::new("Burger", Money::from(500)),
        NewProduct::new("Fries", Money::from(250)),
        NewProduct::new("Soda", Money::from(150)),
        NewProduct::new("Retired special", Money::from(900)).inactive(),
    ];
    for product in products {
        db.add_product(product).await.expect("Error seeding catalog");
    }
}

pub async fn count_rows(db: &SqliteDatabase, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .expect("Error counting rows")
}

pub async fn teardown(db: SqliteDatabase, url: &str) {
    db.close().await;
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("🚀️ Could not remove test database {url}: {e}");
    }
}
