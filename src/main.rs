use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use movecar::{
    AppState,
    cache::{JsonFileStore, KvStore, RedisStore},
    config::Config,
    infrastructure::{BarkGateway, LogGateway, PushGateway},
    router::create_router,
    routes::notify::NotifyCoordinator,
};
#[cfg(debug_assertions)]
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

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

    // 设置存储，配置了 Redis 时优先使用
    let store: Arc<dyn KvStore> = match &config.redis_url {
        Some(url) => {
            tracing::info!("Using Redis store");
            Arc::new(RedisStore::open(url).expect("Failed to create Redis client"))
        }
        None => {
            let path = config.store_file();
            tracing::info!("Using file store at {}", path.display());
            Arc::new(
                JsonFileStore::open(path)
                    .await
                    .expect("Failed to open store file"),
            )
        }
    };

    // 设置推送网关
    let gateway: Arc<dyn PushGateway> = match &config.bark_url {
        Some(url) => Arc::new(BarkGateway::new(url.clone()).expect("Failed to create HTTP client")),
        None => {
            tracing::warn!("BARK_URL not set, notifications will only be logged");
            Arc::new(LogGateway)
        }
    };

    // 设置应用状态
    let state = AppState {
        coordinator: NotifyCoordinator::new(store, gateway, config.notify_delay()),
        config: config.clone(),
    };

    let router = create_router(state);

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(CorsLayer::permissive())
    };

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router,
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");
}
