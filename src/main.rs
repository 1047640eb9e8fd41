use anyhow::Context;
use clap::Parser;
use cpr_deadline::app::{ics, report};
use cpr_deadline::utils::error::ErrorSeverity;
use cpr_deadline::utils::{logger, validation::Validate};
use cpr_deadline::{
    CliConfig, DeadlineEngine, DeadlineError, DeadlineRequest, EngineConfig,
    HolidayCalendarProvider,
};

fn exit_with(e: &DeadlineError) -> ! {
    tracing::error!(
        "❌ Deadline computation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    let file_config = args.config.as_ref().map(EngineConfig::from_file);
    let json_logs = args.log_json
        || matches!(&file_config, Some(Ok(config)) if config.json_logging());

    // 初始化日誌
    if json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::debug!("CLI config: {:?}", args);

    let file_config = match file_config.transpose() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "❌ Failed to load config file '{}': {}",
                args.config.as_deref().unwrap_or_default(),
                e
            );
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = args.validate() {
        exit_with(&e);
    }
    if let Some(config) = &file_config {
        if let Err(e) = config.validate() {
            exit_with(&e);
        }
    }

    // 命令列參數優先於設定檔
    let settings = args.layered_over(file_config.as_ref());
    tracing::debug!("Effective settings: {:?}", settings);

    let provider = match HolidayCalendarProvider::from_settings(&settings) {
        Ok(provider) => provider,
        Err(e) => exit_with(&e),
    };
    let engine = DeadlineEngine::new(provider);

    let jurisdiction = settings.default_jurisdiction().unwrap_or_default();
    let extension_days = settings.default_extension_days().unwrap_or(0);

    let service_date = match args.service_date() {
        Ok(date) => date,
        Err(e) => exit_with(&e),
    };
    if let Some(service_date) = service_date {
        let deadline = match engine
            .deadline_from_service(jurisdiction, service_date, extension_days)
            .await
        {
            Ok(deadline) => deadline,
            Err(e) => exit_with(&e),
        };

        if args.json {
            println!("{}", serde_json::to_string_pretty(&deadline)?);
        } else {
            print!("{}", report::render_service_text(&deadline));
        }
        if args.ics.is_some() {
            tracing::warn!("⚠️ --ics needs a transmission date; no calendar written");
        }
        return Ok(());
    }

    let request = DeadlineRequest {
        jurisdiction,
        transmission: match args.transmission() {
            Ok(transmission) => transmission,
            Err(e) => exit_with(&e),
        },
        extension_days,
    };

    let deadline = match engine.compute(&request).await {
        Ok(deadline) => deadline,
        Err(e) => exit_with(&e),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&deadline)?);
    } else {
        print!("{}", report::render_text(&deadline));
    }

    if let Some(path) = &args.ics {
        std::fs::write(path, ics::render_calendar(&deadline))
            .with_context(|| format!("writing calendar file {}", path))?;
        tracing::info!("📁 Calendar saved to: {}", path);
    }

    Ok(())
}
