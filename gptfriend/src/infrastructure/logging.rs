use tracing_subscriber::EnvFilter;

/// 未设置 `RUST_LOG` 时的默认过滤指令
pub const DEFAULT_LOG_DIRECTIVE: &str = "info";

/// 初始化日志
///
/// `RUST_LOG` 优先；重复调用时保持第一次的设置
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
