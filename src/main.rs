use exercise_tracker::routes::{app, AppState};
use exercise_tracker::storage::TrackerStorage;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exercise_tracker=info,tower_http=info".into()),
        )
        .init();

    let data_dir = std::env::var("EXERCISE_DATA_DIR").unwrap_or_else(|_| ".".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let storage =
        Arc::new(TrackerStorage::with_data_dir(&data_dir).expect("Failed to initialize storage"));

    let app_state = Arc::new(AppState { storage });
    let app = app(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind to port");

    println!("🏃 Exercise tracker running on http://0.0.0.0:{}", port);
    println!("📋 Endpoints:");
    println!("   POST /api/exercise/new-user - Register a user");
    println!("   POST /api/exercise/add - Log an exercise for a user");
    println!("   GET  /api/exercise/log - View a user's exercise log");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
