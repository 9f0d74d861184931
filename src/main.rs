use clap::Parser;
use recipe_etl::core::ConfigProvider;
use recipe_etl::utils::{logger, output, validation::Validate};
use recipe_etl::{
    CliConfig, Comparison, ConvertPipeline, EtlEngine, EtlError, LocalStorage, Mode, TomlConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting recipe-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = prepare(&mut config) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let storage = LocalStorage::current_dir();

    let result = match config.mode() {
        Ok(Mode::Convert { .. }) => convert(storage, config.clone()).await,
        Ok(Mode::Diff { old, new }) => compare(storage, &config, old, new).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        fail(&e);
    }

    Ok(())
}

/// 讀取設定檔（若有）後驗證整體配置
fn prepare(config: &mut CliConfig) -> recipe_etl::Result<()> {
    if let Some(path) = config.config.clone() {
        let settings = TomlConfig::from_file(&path)?;
        settings.validate()?;
        tracing::debug!("Loaded settings from {}", path);
        config.apply_settings(&settings);
    }

    config.validate()
}

async fn convert(storage: LocalStorage, config: CliConfig) -> recipe_etl::Result<()> {
    let pipeline = ConvertPipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    let output_path = engine.run().await?;
    tracing::info!("✅ Conversion completed, output saved to: {}", output_path);
    Ok(())
}

async fn compare(
    storage: LocalStorage,
    config: &CliConfig,
    old: &str,
    new: &str,
) -> recipe_etl::Result<()> {
    let comparison = Comparison::new(storage).with_echo(config.echo(), config.indent());
    let changes = comparison.run(old, new).await?;

    for change in &changes {
        println!("{}", change);
    }

    if let Some(report) = &config.report {
        comparison.write_report(report, &changes).await?;
        output::success(&format!(
            "Saved {} changes to report '{}'",
            changes.len(),
            report
        ));
    }

    Ok(())
}

fn fail(e: &EtlError) -> ! {
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    output::error(&e.user_friendly_message());
    output::hint(e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼，失敗時至少為 1
    std::process::exit(e.exit_code().max(1));
}
