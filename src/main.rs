use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use chat_backend::{
    AppState,
    cache::RedisKv,
    config::Config,
    database::PgStore,
    infrastructure::{Registry, TokenAuthority},
    routes,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    if config.test_uid.is_some() {
        tracing::warn!("TEST_UID is set, tokens for that uid skip the user check");
    }

    let registry = Registry::new();

    // 连接池是惰性的，启动时先探测一次
    let pool = registry
        .pg_pool(&config.db())
        .await
        .expect("Failed to create Postgres pool");
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .expect("Failed to connect to Postgres");

    let redis = registry
        .redis_connection(&config.redis())
        .await
        .expect("Failed to connect to Redis");

    let timeout = config.operation_timeout();
    let tokens = TokenAuthority::from_config(&config);
    let state = AppState::new(
        config,
        Arc::new(RedisKv::new(redis, timeout)),
        Arc::new(PgStore::new(pool, timeout)),
        tokens,
    );

    let router = routes::router(state.clone());

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router,
    )
    .await
    .expect("Failed to start server");
}
