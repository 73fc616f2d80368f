use ardoise::logging::{init_tracing, shutdown_tracer};
use ardoise::metrics::{init_metrics, metrics_app};
use ardoise::router::init_router;
use ardoise::state::init_app_state;
use dotenvy::dotenv;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    // Check if this is a CLI command
    if args.len() > 1 && args[1] == "seed-demo" {
        handle_seed_demo().await;
        return;
    }

    // Normal server startup
    init_tracing();

    let state = init_app_state().await;

    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .expect("Failed to run database migrations");

    let app = init_router(state);

    if let Some(handle) = init_metrics() {
        let metrics_port: u16 = std::env::var("METRICS_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(9100);
        let metrics_router = metrics_app(handle);

        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(("0.0.0.0", metrics_port))
                .await
                .expect("Failed to bind metrics port");
            axum::serve(listener, metrics_router)
                .await
                .expect("Metrics server failed");
        });
        println!("📈 Metrics available on http://localhost:{}/metrics", metrics_port);
    }

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    println!("📖 Scalar UI available at http://localhost:3000/scalar");
    axum::serve(listener, app).await.unwrap();

    shutdown_tracer().await;
}

async fn handle_seed_demo() {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    match ardoise::cli::seed_demo(&pool).await {
        Ok(summary) => {
            println!("✅ Demo data seeded successfully!");
            println!("   Students: {}", summary.students);
            println!("   Subjects: {}", summary.subjects);
            println!("   Lessons:  {}", summary.lessons);
        }
        Err(e) => {
            eprintln!("❌ Error seeding demo data: {}", e.error);
            std::process::exit(1);
        }
    }
}
