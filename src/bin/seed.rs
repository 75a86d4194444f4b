//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const DEMO_EMAIL: &str = "demo@ticklist.local";
const DEMO_PASSWORD: &str = "Demo123!pass";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== Ticklist Seed Script ===");

    let user_id = seed_demo_user(&pool).await?;
    seed_todos(&pool, user_id).await?;

    println!("\n=== Seed complete! ===");
    println!("Demo login: {DEMO_EMAIL} / {DEMO_PASSWORD}");

    Ok(())
}

async fn seed_demo_user(pool: &PgPool) -> anyhow::Result<Uuid> {
    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(DEMO_EMAIL)
        .fetch_optional(pool)
        .await?;

    let hash = ticklist::services::auth::hash_password(DEMO_PASSWORD)?;

    if let Some(id) = existing {
        // Update password for the existing demo user
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(&hash)
            .bind(id)
            .execute(pool)
            .await?;
        println!("[done] Updated demo user password");
        return Ok(id);
    }

    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, name, email, password_hash) VALUES ($1, 'Demo User', $2, $3)")
        .bind(id)
        .bind(DEMO_EMAIL)
        .bind(&hash)
        .execute(pool)
        .await?;

    println!("[done] Created demo user");
    Ok(id)
}

async fn seed_todos(pool: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Todos already exist ({count})");
        return Ok(());
    }

    let now = Utc::now();
    let last_week = now - Duration::days(7);

    // Spread creation dates across this week and the prior one so the
    // dashboard deltas have something to compare.
    type SeedTodo = (
        &'static str,
        Option<&'static str>,
        &'static str,
        bool,
        DateTime<Utc>,
    );
    let todos: Vec<SeedTodo> = vec![
        (
            "Prepare weekly report",
            Some("Summarize sprint progress for the team"),
            "high",
            false,
            now,
        ),
        ("Review pull requests", None, "medium", true, now),
        (
            "Book dentist appointment",
            None,
            "low",
            false,
            now - Duration::hours(3),
        ),
        (
            "Plan project kickoff",
            Some("Draft the agenda and invite stakeholders"),
            "high",
            false,
            now - Duration::days(1),
        ),
        ("Water the plants", None, "low", true, last_week),
        (
            "Renew gym membership",
            None,
            "medium",
            false,
            last_week - Duration::hours(5),
        ),
        (
            "Archive old e-mails",
            Some("Inbox zero before the quarter ends"),
            "low",
            false,
            last_week + Duration::hours(8),
        ),
    ];

    for (title, description, priority, completed, created_at) in todos {
        sqlx::query(
            r#"
            INSERT INTO todos (id, user_id, title, description, priority, start_date, end_date, completed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5::todo_priority, $6, $7, $8, $9, $9)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(priority)
        .bind(created_at)
        .bind(created_at + Duration::days(3))
        .bind(completed)
        .bind(created_at)
        .execute(pool)
        .await?;
    }

    println!("[done] Created sample todos across two weeks");
    Ok(())
}
