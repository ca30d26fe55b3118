//! CLI for managing the file store.
//!
//! Usage:
//!   cargo run -- migrate
//!   cargo run -- show-file --id <file-id>
//!   cargo run -- delete-file --id <file-id>

use std::env;

use serde::Serialize;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use filestore_lib::config::Config;
use filestore_lib::db::DbPool;
use filestore_lib::error::{AppError, AppResult};

/// A parsed command line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Migrate,
    CreateTables,
    DropTables,
    ShowFile(String),
    ShowBatch(String),
    DeleteFile(String),
    Help,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let args: Vec<String> = env::args().collect();

    let command = match parse_command(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if command == Command::Help {
        print_usage();
        return;
    }

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let result =
        DbPool::with_pool(&config, async move |pool: &DbPool| run(command, pool).await).await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command, pool: &DbPool) -> AppResult<()> {
    match command {
        Command::Migrate => pool.run_migrations().await,
        Command::CreateTables => pool.create_all_tables().await,
        Command::DropTables => pool.drop_all_tables().await,
        Command::ShowFile(id) => match pool.get_file(&id).await? {
            Some(file) => print_json(&file),
            None => Err(AppError::NotFound(format!("File {}", id))),
        },
        Command::ShowBatch(id) => match pool.get_batch(&id).await? {
            Some(batch) => print_json(&batch),
            None => Err(AppError::NotFound(format!("Batch {}", id))),
        },
        Command::DeleteFile(id) => {
            if pool.delete_file(&id).await? {
                info!("File {} deleted with its batches", id);
                Ok(())
            } else {
                Err(AppError::NotFound(format!("File {}", id)))
            }
        }
        Command::Help => Ok(()),
    }
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let Some(name) = args.get(1) else {
        return Err("No command given".to_string());
    };

    match name.as_str() {
        "migrate" => Ok(Command::Migrate),
        "create-tables" => Ok(Command::CreateTables),
        "drop-tables" => Ok(Command::DropTables),
        "show-file" => parse_id_arg(args).map(Command::ShowFile),
        "show-batch" => parse_id_arg(args).map(Command::ShowBatch),
        "delete-file" => parse_id_arg(args).map(Command::DeleteFile),
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn parse_id_arg(args: &[String]) -> Result<String, String> {
    let mut i = 2;
    while i < args.len() {
        if (args[i] == "--id" || args[i] == "-i") && i + 1 < args.len() {
            return Ok(args[i + 1].clone());
        }
        i += 1;
    }
    Err("--id is required".to_string())
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::InvalidInput(format!("Failed to render JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: filestore <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  migrate               Apply pending schema migrations");
    eprintln!("  create-tables         Create the status type and tables if missing");
    eprintln!("  drop-tables           Drop the tables and the status type");
    eprintln!("  show-file --id <id>   Print a file with its batches");
    eprintln!("  show-batch --id <id>  Print a batch with its owning file");
    eprintln!("  delete-file --id <id> Delete a file and its batches");
    eprintln!("  help                  Show this help");
    eprintln!();
}
