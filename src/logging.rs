use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use preventive_config::{LogConfig, OutputFormat};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 初始化日志系统，RUST_LOG 优先于配置中的级别
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let file_layer = if config.to_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.file)
            .with_context(|| format!("打开日志文件失败: {}", config.file))?;
        Some(format_layer(config.format, Mutex::new(file), false))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(format_layer(config.format, std::io::stdout, true))
        .with(file_layer)
        .try_init()
        .context("初始化日志系统失败")?;

    Ok(())
}

fn format_layer<S, W>(format: OutputFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        OutputFormat::Json => layer.json().boxed(),
        OutputFormat::Pretty => layer.pretty().boxed(),
        OutputFormat::Compact => layer.compact().boxed(),
    }
}
