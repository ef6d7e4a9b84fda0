use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod models;
mod repository;
mod scoring;
mod services;
mod utils;

use config::Config;
use database::create_pool;
use middleware::{RateLimitConfig, RateLimiter};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    let config = Arc::new(config);

    info!("Starting screening backend on port {}", config.port);

    // Initialize database pool
    let db_pool = create_pool(&config)
        .await
        .expect("Failed to create database pool");

    // Run migrations
    database::run_migrations(&db_pool)
        .await
        .expect("Failed to run migrations");

    // Seed the built-in question bank
    if config.seed_on_start {
        database::run_seed(&db_pool)
            .await
            .expect("Failed to seed question bank");
    }

    // Initialize repositories
    let user_repo = Arc::new(repository::UserRepository::new(db_pool.clone()));
    let questionnaire_repo = Arc::new(repository::QuestionnaireRepository::new(db_pool.clone()));
    let assessment_repo = Arc::new(repository::AssessmentRepository::new(db_pool.clone()));

    // Initialize JWT Manager
    let jwt_manager = Arc::new(utils::JwtManager::new(
        &config.jwt_secret,
        config.jwt_expiry_hours,
        config.jwt_refresh_expiry_hours,
    ));

    // Initialize services
    let auth_service = services::AuthService::new(user_repo.clone(), jwt_manager.clone());
    let questionnaire_service = services::QuestionnaireService::new(questionnaire_repo.clone());
    let assessment_service =
        services::AssessmentService::new(questionnaire_repo.clone(), assessment_repo.clone());

    // One limiter shared by all workers, guarding the auth endpoints
    let auth_limiter = Arc::new(RateLimiter::new(RateLimitConfig::per_minute(
        config.auth_requests_per_minute,
    )));
    middleware::spawn_cleanup_task(auth_limiter.clone());

    // Create application state
    let app_state = web::Data::new(handlers::AppState {
        auth_service,
        questionnaire_service,
        assessment_service,
    });

    let server_port = config.port;
    let cors_origins = config.cors_allowed_origins.clone();

    HttpServer::new(move || {
        let cors_origins_inner = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origin_str = origin.to_str().unwrap_or("");
                if cors_origins_inner == "*" {
                    return true;
                }
                cors_origins_inner
                    .split(',')
                    .any(|o| o.trim() == origin_str)
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
            .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
            .supports_credentials()
            .max_age(3600);

        // Custom JSON error handler
        let json_cfg = web::JsonConfig::default().error_handler(|err, _req| {
            let message = format!("{}", err);
            actix_web::error::InternalError::from_response(
                err,
                actix_web::HttpResponse::BadRequest().json(serde_json::json!({
                    "success": false,
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "message": message
                    }
                })),
            )
            .into()
        });

        App::new()
            .app_data(app_state.clone())
            .app_data(json_cfg)
            .wrap(Logger::default())
            .wrap(cors)
            // Health check
            .route("/health", web::get().to(handlers::health_check))
            // API v1 routes
            .service(
                web::scope("/api/v1")
                    // Auth routes
                    .service(
                        web::scope("/auth")
                            .wrap(middleware::RateLimitMiddleware::with_limiter(
                                auth_limiter.clone(),
                            ))
                            .route("/register", web::post().to(handlers::auth::register))
                            .route("/login", web::post().to(handlers::auth::login))
                            .route("/refresh", web::post().to(handlers::auth::refresh_token))
                            .service(
                                web::scope("/me")
                                    .wrap(middleware::AuthMiddleware::new(config.clone()))
                                    .route("", web::get().to(handlers::auth::get_profile))
                                    .route("", web::put().to(handlers::auth::update_profile)),
                            ),
                    )
                    // Questionnaire routes; submissions accept anonymous callers
                    .service(
                        web::scope("/questionnaires")
                            .wrap(middleware::OptionalAuthMiddleware::new(config.clone()))
                            .route(
                                "",
                                web::get().to(handlers::questionnaire::list_questionnaires),
                            )
                            .route(
                                "/{identifier}",
                                web::get().to(handlers::questionnaire::get_questionnaire),
                            )
                            .route(
                                "/{identifier}/submissions",
                                web::post().to(handlers::questionnaire::submit_assessment),
                            ),
                    )
                    // Result history (owner only)
                    .service(
                        web::scope("/results")
                            .wrap(middleware::AuthMiddleware::new(config.clone()))
                            .route("", web::get().to(handlers::results::list_results))
                            .route("/{id}", web::get().to(handlers::results::get_result)),
                    ),
            )
    })
    .bind(format!("0.0.0.0:{}", server_port))?
    .run()
    .await
}
