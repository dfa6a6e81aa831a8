use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, error, warn};

use rust_schoolsys::config::AppConfig;
use rust_schoolsys::routes;
use rust_schoolsys::runtime::lifetime;
use rust_schoolsys::utils::{json_error_handler, query_error_handler};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let started_at = chrono::Utc::now();

    // 启动前预处理 //

    // 初始化配置
    setup_panic!();
    if let Err(e) = AppConfig::init() {
        eprintln!("Failed to initialize configuration: {e}");
        return Err(std::io::Error::other(e.to_string()));
    }
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    debug!(
        "
        Project: {}
        Version: {}
        Authors: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS")
    );

    let startup = match lifetime::startup::prepare_server_startup().await {
        Ok(startup) => startup,
        Err(e) => {
            error!("Server startup failed: {}", e.format_simple());
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    let storage = startup.storage.clone();
    let cache = startup.cache.clone();

    debug!(
        "Pre-startup processing completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(started_at)
            .num_milliseconds()
    );

    // 预处理完成 //

    warn!("Using {} CPU cores for the server", config.server.workers);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(config.cors.max_age),
            )
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add((
                        "Keep-Alive",
                        format!("timeout={}, max=1000", config.server.timeouts.keep_alive),
                    ))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::PayloadConfig::new(
                config.server.limits.max_payload_size,
            ))
            .configure(routes::configure_auth_routes)
            .configure(routes::configure_user_routes)
            .configure(routes::configure_schools_routes)
            .configure(routes::configure_classes_routes)
            .configure(routes::configure_students_routes)
            .configure(routes::configure_subjects_routes)
            .configure(routes::configure_teachers_routes)
            .configure(routes::configure_teacher_subjects_routes)
            .configure(routes::configure_terms_routes)
            .configure(routes::configure_examinations_routes)
            .configure(routes::configure_results_routes)
            .configure(routes::configure_tests_routes)
            .configure(routes::configure_analytics_routes)
            .configure(routes::configure_timetable_routes)
    })
    .keep_alive(std::time::Duration::from_secs(
        config.server.timeouts.keep_alive,
    ))
    .client_request_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_request,
    ))
    .client_disconnect_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    let server = {
        #[cfg(unix)]
        {
            if let Some(socket_path) = config.unix_socket_path() {
                warn!("Starting server on Unix socket: {}", socket_path);
                if std::path::Path::new(socket_path).exists() {
                    std::fs::remove_file(socket_path)?;
                }
                server.bind_uds(socket_path)?
            } else {
                let bind_address = config.server_bind_address();
                warn!("Starting server at http://{}", bind_address);
                server.bind(bind_address)?
            }
        }

        #[cfg(not(unix))]
        {
            let bind_address = config.server_bind_address();
            warn!("Starting server at http://{}", bind_address);
            server.bind(bind_address)?
        }
    }
    .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
