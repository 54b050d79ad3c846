use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use preventive_config::AppConfig;
use preventive_reconciler::RunPhase;
use preventive_sync::app::Application;
use preventive_sync::logging::init_logging;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let config_path = matches.get_one::<String>("config").map(String::as_str);

    let mut config = AppConfig::load(config_path).with_context(|| match config_path {
        Some(path) => format!("加载配置文件失败: {path}"),
        None => "加载默认配置失败".to_string(),
    })?;
    apply_overrides(&mut config, &matches)?;

    if matches.get_flag("dry-config") {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    init_logging(&config.logging)?;

    let phase = matches
        .get_one::<String>("phase")
        .map(|p| p.parse::<RunPhase>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?
        .unwrap_or_default();

    info!("启动预防性维护同步");
    info!("配置文件: {}", config_path.unwrap_or("默认路径"));
    info!("执行阶段: {phase}");

    let report = Application::new(config, phase).run().await?;

    if report.is_degraded() {
        warn!("同步结束，部分单元被跳过，详见上方日志");
    }
    info!("预防性维护同步已退出");
    Ok(())
}

fn build_cli() -> Command {
    Command::new("preventive-sync")
        .version("1.0.0")
        .about("按资产分类规则同步 GLPI 预防性维护周期工单")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径，未指定时依次查找 config/preventive.toml、preventive.toml"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别，覆盖配置文件")
                .value_parser(["trace", "debug", "info", "warn", "error"]),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式，覆盖配置文件")
                .value_parser(["json", "pretty", "compact"]),
        )
        .arg(
            Arg::new("phase")
                .long("phase")
                .value_name("PHASE")
                .help("执行阶段")
                .value_parser(["all", "sync", "create"])
                .default_value("all"),
        )
        .arg(
            Arg::new("dry-config")
                .long("dry-config")
                .help("打印合并后的配置并退出")
                .action(ArgAction::SetTrue),
        )
}

fn apply_overrides(config: &mut AppConfig, matches: &ArgMatches) -> Result<()> {
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    }
    if let Some(format) = matches.get_one::<String>("log-format") {
        config.logging.format = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use preventive_config::{LogLevel, OutputFormat};

    #[test]
    fn test_cli_defaults() {
        let matches = build_cli().get_matches_from(["preventive-sync"]);
        assert!(matches.get_one::<String>("config").is_none());
        assert_eq!(
            matches.get_one::<String>("phase").map(String::as_str),
            Some("all")
        );
        assert!(!matches.get_flag("dry-config"));
    }

    #[test]
    fn test_explicit_config_path() {
        let matches = build_cli().get_matches_from(["preventive-sync", "-c", "/tmp/glpi.toml"]);
        assert_eq!(
            matches.get_one::<String>("config").map(String::as_str),
            Some("/tmp/glpi.toml")
        );
    }

    #[test]
    fn test_log_overrides() {
        let matches = build_cli().get_matches_from([
            "preventive-sync",
            "-l",
            "debug",
            "--log-format",
            "json",
        ]);
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &matches).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_phase_rejected() {
        let result = build_cli().try_get_matches_from(["preventive-sync", "--phase", "both"]);
        assert!(result.is_err());
    }
}
