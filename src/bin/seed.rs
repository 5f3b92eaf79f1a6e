//! Seed development users
//!
//! Inserts the demo accounts the integration tests expect:
//! librarian/librarian (both grants) and reader/reader (no grants).
//! Existing accounts are left untouched.

use sqlx::postgres::PgPoolOptions;

use athenaeum::{
    config::AppConfig,
    models::user::CreateUser,
    repository::Repository,
    services::auth::AuthService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");

    tracing_subscriber::fmt::init();

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let repository = Repository::new(pool);

    let users = [
        CreateUser {
            username: "librarian".to_string(),
            password_hash: AuthService::hash_password("librarian")?,
            first_name: "Libby".to_string(),
            last_name: "Librarian".to_string(),
            can_mark_returned: true,
            can_modify_catalog: true,
        },
        CreateUser {
            username: "reader".to_string(),
            password_hash: AuthService::hash_password("reader")?,
            first_name: "Rita".to_string(),
            last_name: "Reader".to_string(),
            can_mark_returned: false,
            can_modify_catalog: false,
        },
    ];

    for user in &users {
        match repository.users.create(user).await? {
            Some(created) => tracing::info!("Created user {}", created.username),
            None => tracing::info!("User {} already exists, skipped", user.username),
        }
    }

    Ok(())
}
