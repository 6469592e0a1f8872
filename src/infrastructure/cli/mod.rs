use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::{
    controllers::{
        chapters::{ChaptersArgs, ChaptersController},
        narrate::{NarrateArgs, NarrateController},
        translate::{TranslateArgs, TranslateController},
    },
    domain::{
        narration::NarrationService,
        translation::{TranslationService, TranslationServiceApi},
    },
    error::AppResult,
    infrastructure::{
        config::{Config, SpeechProvider},
        http::{build_client, RetryPolicy},
        repositories::{
            AudioRepository, AzureTranslatorRepository, AzureTtsRepository, PollyTtsRepository,
            TtsRepository,
        },
    },
};

/// Turn books and text files into narrated audio
#[derive(Debug, Parser)]
#[command(name = "booktape")]
#[command(version)]
#[command(about = "Narrate text files with Azure Speech or AWS Polly, optionally translating first", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Synthesize speech from a text file, a directory or stdin
    Narrate(NarrateArgs),
    /// Translate text files into one or more languages
    Translate(TranslateArgs),
    /// Split an HTML e-book into chapter text files
    Chapters(ChaptersArgs),
}

/// Wire the command's dependencies and run it.
///
/// Credentials are checked before any client is built, so a missing key
/// fails without a single request leaving the process. `chapters` never
/// touches the configuration, so a broken environment only fails the
/// commands that call a cloud service.
pub async fn run(cli: Cli, config: AppResult<Config>) -> AppResult<()> {
    match cli.command {
        Commands::Narrate(args) => {
            let mut config = config?;
            if let Some(provider) = args.provider {
                config.speech_provider = provider;
            }
            apply_azure_overrides(
                &mut config,
                args.azure_region.clone(),
                args.translator_endpoint.clone(),
            );
            if let Some(endpoint) = args.speech_endpoint.clone() {
                config.speech_endpoint = Some(endpoint);
            }

            let controller = build_narrate_controller(&config, args.target.is_some()).await?;
            controller.narrate(args).await?;
        }
        Commands::Translate(args) => {
            let mut config = config?;
            apply_azure_overrides(
                &mut config,
                args.azure_region.clone(),
                args.translator_endpoint.clone(),
            );

            let translation_service = build_translation_service(&config)?;
            TranslateController::new(translation_service)
                .translate(args)
                .await?;
        }
        Commands::Chapters(args) => {
            ChaptersController::new().split(args).await?;
        }
    }

    Ok(())
}

fn apply_azure_overrides(
    config: &mut Config,
    azure_region: Option<String>,
    translator_endpoint: Option<String>,
) {
    if let Some(region) = azure_region {
        config.azure_region = region;
    }
    if let Some(endpoint) = translator_endpoint {
        config.translator_endpoint = endpoint;
    }
}

/// Build the narrate controller with the translator, speech and audio
/// repositories the configuration selects.
pub async fn build_narrate_controller(
    config: &Config,
    needs_translation: bool,
) -> AppResult<NarrateController> {
    // === DEPENDENCY INJECTION SETUP ===
    // 1. Check credentials up front
    if needs_translation || config.speech_provider == SpeechProvider::Azure {
        config.require_resource_key()?;
    }

    // 2. Instantiate services (inject repositories and clients)
    let translation_service = if needs_translation {
        Some(build_translation_service(config)?)
    } else {
        None
    };
    let tts_repo = build_tts_repository(config).await?;
    let audio_repo = Arc::new(AudioRepository::new());

    let narration_service = Arc::new(NarrationService::new(
        translation_service,
        tts_repo,
        audio_repo,
    ));

    // 3. Instantiate controller (inject service)
    Ok(NarrateController::new(narration_service))
}

pub fn build_translation_service(config: &Config) -> AppResult<Arc<dyn TranslationServiceApi>> {
    let api_key = config.require_resource_key()?.to_string();
    let http_client = build_client(config.http_timeout_secs)?;

    tracing::debug!(
        endpoint = %config.translator_endpoint,
        region = %config.azure_region,
        "Instantiating Azure Translator client"
    );

    let translator = Arc::new(AzureTranslatorRepository::new(
        http_client,
        config.translator_endpoint.clone(),
        api_key,
        config.azure_region.clone(),
        RetryPolicy::new(config.retry_max_attempts),
    ));

    Ok(Arc::new(TranslationService::new(translator)))
}

pub async fn build_tts_repository(config: &Config) -> AppResult<Arc<dyn TtsRepository>> {
    let retry = RetryPolicy::new(config.retry_max_attempts);

    match config.speech_provider {
        SpeechProvider::Azure => {
            let api_key = config.require_resource_key()?.to_string();
            let endpoint = config.speech_endpoint();
            tracing::debug!(endpoint = %endpoint, "Instantiating Azure Speech client");

            Ok(Arc::new(AzureTtsRepository::new(
                build_client(config.http_timeout_secs)?,
                endpoint,
                api_key,
                retry,
            )))
        }
        SpeechProvider::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

            // Check for AWS credentials in environment (for debugging)
            let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
            let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
            if !has_access_key || !has_secret_key {
                tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (profile, instance metadata, etc.)");
            }

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;

            tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");

            let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
            Ok(Arc::new(PollyTtsRepository::new(polly_client, retry)))
        }
    }
}
