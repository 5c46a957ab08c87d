//! Lector - 朗读会话服务
//!
//! 组装所有适配器并启动 HTTP 服务器:
//! - Domain: narration/, segmenter
//! - Application: commands, queries, ports
//! - Infrastructure: http, memory, worker, persistence, adapters, events

use std::sync::Arc;

use lector::application::TtsEnginePort;
use lector::config::{load_config, print_config, TtsEngineKind};
use lector::infrastructure::adapters::extraction::{DocumentExtractor, WebScraper, WebScraperConfig};
use lector::infrastructure::adapters::transport::{PacedTransport, PacedTransportConfig};
use lector::infrastructure::adapters::tts::{
    FakeTtsClient, FakeTtsClientConfig, HttpTtsClient, HttpTtsClientConfig, PiperTtsClient,
    PiperTtsClientConfig,
};
use lector::infrastructure::events::EventPublisher;
use lector::infrastructure::http::{AppState, HttpServer, ServerConfig};
use lector::infrastructure::memory::InMemoryNarrationRegistry;
use lector::infrastructure::persistence::sled::{SledProgressStore, SledProgressStoreConfig};
use lector::infrastructure::worker::{PlaybackDriver, PlaybackDriverConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},lector={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Lector - 朗读会话服务");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.storage.progress_path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 创建进度存储
    let store_config = SledProgressStoreConfig {
        db_path: config.storage.progress_path.clone(),
    };
    let progress_store = Arc::new(SledProgressStore::new(&store_config)?);

    // 创建 TTS 引擎
    let tts_engine: Arc<dyn TtsEnginePort> = match config.tts.engine {
        TtsEngineKind::Http => {
            let tts_config = HttpTtsClientConfig {
                base_url: config.tts.url.clone(),
                timeout_secs: config.tts.timeout_secs,
            };
            Arc::new(HttpTtsClient::new(tts_config)?)
        }
        TtsEngineKind::Piper => {
            let tts_config = PiperTtsClientConfig {
                binary: config.tts.piper_binary.clone(),
                model: config.tts.piper_model.clone(),
                work_dir: std::env::temp_dir(),
            };
            Arc::new(PiperTtsClient::new(tts_config))
        }
        TtsEngineKind::Fake => Arc::new(FakeTtsClient::new(FakeTtsClientConfig::default())),
    };

    // 创建传输
    let transport = Arc::new(PacedTransport::new(PacedTransportConfig {
        fallback_clip_ms: config.transport.fallback_clip_ms,
    }));

    // 创建事件发布器
    let event_publisher = Arc::new(EventPublisher::new());

    // 创建播放驱动器
    let driver = Arc::new(PlaybackDriver::new(
        PlaybackDriverConfig {
            max_consecutive_failures: config.playback.max_consecutive_failures,
        },
        tts_engine.clone(),
        transport.clone(),
        event_publisher.clone(),
    ));

    // 创建会话注册表
    let registry = Arc::new(InMemoryNarrationRegistry::new(
        driver,
        progress_store,
        transport,
        event_publisher.clone(),
    ));

    // 创建文本来源适配器
    let extractor = Arc::new(DocumentExtractor::new());
    let scraper = Arc::new(
        WebScraper::new(WebScraperConfig {
            timeout_secs: config.scraper.timeout_secs,
            ..Default::default()
        })
        .map_err(|e| anyhow::anyhow!("Failed to build scraper: {}", e))?,
    );

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(registry, tts_engine, extractor, scraper, event_publisher);

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
