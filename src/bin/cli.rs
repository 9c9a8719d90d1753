use clap::{Parser, Subcommand};
use prettytable::{Cell, Row, Table};
use reqwest;
use serde::{Deserialize, Serialize};

const API_URL: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(name = "exercise")]
#[command(about = "A CLI client for the exercise tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Register a new user")]
    NewUser {
        #[arg(short, long, help = "Username (doubles as the userId)")]
        username: String,
    },

    #[command(about = "Log an exercise for a user")]
    Add {
        #[arg(short, long, help = "userId (the username)")]
        user: String,

        #[arg(short = 'm', long, help = "What the exercise was")]
        description: String,

        #[arg(short = 't', long, help = "Duration in minutes")]
        duration: i64,

        #[arg(short, long, help = "Date (YYYY-MM-DD); defaults to today")]
        date: Option<String>,
    },

    #[command(about = "View a user's exercise log")]
    Log {
        #[arg(short, long, help = "userId (the username)")]
        user: String,

        #[arg(short, long, help = "Only entries on or after this date (YYYY-MM-DD)")]
        from: Option<String>,

        #[arg(short, long, help = "Only entries before this date (YYYY-MM-DD)")]
        to: Option<String>,

        #[arg(short, long, help = "Maximum number of entries")]
        limit: Option<u32>,
    },
}

#[derive(Debug, Serialize)]
struct NewUserRequest {
    username: String,
}

#[derive(Debug, Deserialize)]
struct NewUserResponse {
    username: String,
    #[serde(rename = "userId")]
    user_id: String,
}

#[derive(Debug, Serialize)]
struct AddRequest {
    #[serde(rename = "userId")]
    user_id: String,
    description: String,
    duration: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AddResponse {
    username: String,
    description: String,
    duration: i64,
    date: String,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    #[serde(rename = "userId")]
    user_id: String,
    description: String,
    duration: i64,
    date: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::NewUser { username } => new_user(username).await,
        Commands::Add {
            user,
            description,
            duration,
            date,
        } => add_exercise(user, description, duration, date).await,
        Commands::Log {
            user,
            from,
            to,
            limit,
        } => view_log(user, from, to, limit).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn new_user(username: String) -> anyhow::Result<()> {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/exercise/new-user", API_URL))
        .json(&NewUserRequest { username })
        .send()
        .await?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to create user: {}", response.text().await?);
    }

    let result: NewUserResponse = response.json().await?;

    println!("✅ User created successfully!");
    println!("   Username: {}", result.username);
    println!("   UserId: {}", result.user_id);

    Ok(())
}

async fn add_exercise(
    user: String,
    description: String,
    duration: i64,
    date: Option<String>,
) -> anyhow::Result<()> {
    let client = reqwest::Client::new();

    let payload = AddRequest {
        user_id: user,
        description,
        duration,
        date,
    };

    let response = client
        .post(format!("{}/api/exercise/add", API_URL))
        .json(&payload)
        .send()
        .await?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to add exercise: {}", response.text().await?);
    }

    let result: AddResponse = response.json().await?;

    println!("✅ Exercise logged!");
    println!("   User: {}", result.username);
    println!("   Description: {}", result.description);
    println!("   Duration: {} minutes", result.duration);
    println!("   Date: {}", result.date);

    Ok(())
}

async fn view_log(
    user: String,
    from: Option<String>,
    to: Option<String>,
    limit: Option<u32>,
) -> anyhow::Result<()> {
    let client = reqwest::Client::new();

    let mut query: Vec<(&str, String)> = vec![("userId", user)];
    if let Some(from) = from {
        query.push(("from", from));
    }
    if let Some(to) = to {
        query.push(("to", to));
    }
    if let Some(limit) = limit {
        query.push(("limit", limit.to_string()));
    }

    let response = client
        .get(format!("{}/api/exercise/log", API_URL))
        .query(&query)
        .send()
        .await?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to fetch log: {}", response.text().await?);
    }

    let entries: Vec<LogEntry> = response.json().await?;

    if entries.is_empty() {
        println!("📭 No exercises found.");
        return Ok(());
    }

    println!("\n📋 Exercise Log ({})\n", entries.len());

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Date"),
        Cell::new("Description"),
        Cell::new("Duration (min)"),
        Cell::new("User"),
    ]));

    for entry in entries {
        table.add_row(Row::new(vec![
            Cell::new(&entry.date),
            Cell::new(&entry.description),
            Cell::new(&entry.duration.to_string()),
            Cell::new(&entry.user_id),
        ]));
    }

    table.printstd();
    println!();

    Ok(())
}
