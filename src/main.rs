use clap::Parser;
use tabular_clean::core::ConfigProvider;
use tabular_clean::utils::{logger, validation::Validate};
use tabular_clean::{
    CleanError, CleaningEngine, CliConfig, CsvCleaningPipeline, LocalStorage, TomlConfig,
};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting tabular-clean");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let mut config = match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!("❌ Failed to load config file '{}': {}", path, e);
                    exit_with(&e)
                }
            };
            config.apply_overrides(&cli);
            let monitor = cli.monitor || config.monitoring_enabled();
            tracing::info!("🔧 Pipeline: {}", config.pipeline.name);
            execute(config, monitor, cli.dry_run)
        }
        None => execute(cli.clone(), cli.monitor, cli.dry_run),
    }
}

fn execute<C: ConfigProvider + Validate>(config: C, monitor: bool, dry_run: bool) -> anyhow::Result<()> {
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    display_config_summary(&config);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No data will be cleaned or written");
        return Ok(());
    }

    if monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = CsvCleaningPipeline::new(LocalStorage::default(), config);
    let engine = CleaningEngine::new_with_monitoring(pipeline, monitor);

    match engine.run() {
        Ok(summary) => {
            let report = &summary.report;
            println!("✅ Cleaning completed: {} -> {} rows", report.rows_in, report.rows_out);
            for step in &report.steps {
                println!(
                    "   {:<45} {:>6} -> {:<6} ({} changed)",
                    step.step, step.rows_before, step.rows_after, step.values_changed
                );
            }
            if !report.warnings.is_empty() {
                println!("⚠️  {} value(s) could not be parsed and were set to missing", report.warnings.len());
            }
            for output in &summary.outputs {
                println!("📁 Output saved to: {}", output);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Cleaning failed: {}", e);
            exit_with(&e)
        }
    }
}

fn display_config_summary<C: ConfigProvider>(config: &C) {
    tracing::info!("📥 Input: {}", config.input_path());
    tracing::info!("📤 Output: {}/{}", config.output_path(), config.output_name());
    let formats: Vec<&str> = config.output_formats().iter().map(|f| f.extension()).collect();
    tracing::info!("🗂️ Formats: {}", formats.join(", "));
    if let Some(archive) = config.compression() {
        tracing::info!("🗜️ Archive: {}", archive);
    }
    if config.steps().is_empty() {
        tracing::warn!("No cleaning steps configured, input is only re-encoded");
    }
    for (i, step) in config.steps().iter().enumerate() {
        tracing::info!("  {}. {}", i + 1, step);
    }
}

// 記錄詳細錯誤信息，並依嚴重程度決定退出碼
fn exit_with(e: &CleanError) -> ! {
    tracing::error!(
        "Category: {:?}, Severity: {:?}",
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code())
}
