use anyhow::{anyhow, Result};
use eslatma_bot::config::Config;
use eslatma_bot::database::connection::{sqlite_file_path, DatabaseManager};
use eslatma_bot::database::models::Reminder;
use log::{error, info};
use std::env;
use std::io;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "reset" => reset_database().await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

async fn run_migrations() -> Result<()> {
    let database_url = Config::database_url_from_env();
    println!("🔧 Eslatma Bot - Database Migration Tool");
    println!("📊 Database URL: {}", mask_url(&database_url));

    let db = DatabaseManager::new(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    match db.run_migrations().await {
        Ok(()) => {
            info!("migrations applied to {}", mask_url(&database_url));
            println!("✅ Migrations completed successfully!");
            Ok(())
        }
        Err(e) => {
            error!("migration failed: {}", e);
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn check_database() -> Result<()> {
    let database_url = Config::database_url_from_env();
    println!("🔍 Checking {}", mask_url(&database_url));

    let db = DatabaseManager::new(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    let tables =
        sqlx::query_scalar::<_, String>("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(&db.pool)
            .await?;

    println!("✅ Database connection successful!");
    println!("📋 Found tables:");
    for table in &tables {
        println!("  • {table}");
    }

    if tables.iter().any(|t| t == "reminders") {
        let pending = Reminder::count_pending(&db.pool).await?;
        println!("⏰ Pending reminders: {pending}");
    } else {
        println!("💡 Table 'reminders' is missing - run 'migrate up' to create the schema");
    }

    Ok(())
}

async fn reset_database() -> Result<()> {
    let database_url = Config::database_url_from_env();
    let Some(db_path) = sqlite_file_path(&database_url) else {
        return Err(anyhow!("Reset is only supported for file-backed SQLite databases"));
    };

    println!("⚠️  WARNING: This will delete ALL pending reminders!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    for suffix in ["", "-wal", "-shm"] {
        let file = format!("{db_path}{suffix}");
        if Path::new(&file).exists() {
            std::fs::remove_file(&file)?;
            println!("🗑️  Deleted {file}");
        }
    }

    println!("🔄 Recreating database schema...");
    run_migrations().await
}

fn mask_url(url: &str) -> String {
    match sqlite_file_path(url).and_then(|p| Path::new(p).file_name()) {
        Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("⏰ Eslatma Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up    Run database migrations (default)");
    println!("    check          Check database connection and pending reminders");
    println!("    reset          Delete the SQLite file and recreate it - DESTRUCTIVE!");
    println!("    help           Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: sqlite:./data/reminders.db)");
}
