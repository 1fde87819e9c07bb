//! Telegram Media Downloader - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use telegram_media_downloader::{
    cli::Args,
    client::Telegram,
    config::{parse_chat_ref, validate_config, Config},
    download::run_download,
    error::{exit_codes, Error, Result},
    output::{print_banner, print_chat_stats, print_config_summary, print_error, print_info,
        print_warning},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Connect(_)
                | Error::Authentication(_)
                | Error::ChatNotFound(_)
                | Error::Rpc(_) => ExitCode::from(exit_codes::TELEGRAM_ERROR as u8),
                Error::Download(_) | Error::SizeMismatch { .. } | Error::EmptyFile(_) => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging; the MTProto transport crates are noisy at info level
    let log_level = if args.debug { "debug" } else { "info" };
    let default_directives = format!(
        "{},grammers_session=warn,grammers_mtsender=warn,grammers_mtproto=warn",
        log_level
    );
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&default_directives));

    fmt().with_env_filter(filter).with_target(false).init();

    // Print banner
    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;
    let chat_ref = parse_chat_ref(&config.target.chat)?;

    // Print configuration summary
    let media_types: Vec<String> = config
        .options
        .media_types
        .iter()
        .map(|t| t.to_string())
        .collect();
    print_config_summary(
        &config.target.chat,
        &media_types,
        &config.download_directory().display().to_string(),
    );

    // Connect to Telegram
    print_info("Connecting to Telegram...");
    let telegram = Telegram::connect(&config).await?;

    let me = telegram.inner().get_me().await?;
    print_info(&format!(
        "Logged in as: {}",
        me.username().map(str::to_string).unwrap_or_else(|| me.id().to_string())
    ));

    // Resolve the target chat
    let chat = telegram.resolve_chat(&chat_ref).await?;
    print_info(&format!("Processing chat: {} ({})", chat.name(), chat.id()));

    // Download
    let state = run_download(&telegram, &mut config, &config_path, &chat).await?;

    // Print statistics
    print_chat_stats(&state);

    if state.failed_count() > 0 {
        print_warning(&format!(
            "{} downloads failed. Failed message IDs added to the config file for retry.",
            state.failed_count()
        ));
    }

    Ok(())
}
