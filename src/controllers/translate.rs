use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    domain::{
        text::{self, loader::list_text_files, TextSource},
        translation::TranslationServiceApi,
    },
    error::{AppError, AppResult},
};

/// Arguments for `booktape translate`
#[derive(Debug, Clone, Args)]
pub struct TranslateArgs {
    /// Text file or directory of *.txt files
    pub input: PathBuf,
    /// Directory receiving the translated files
    #[arg(short, long, default_value = "_output")]
    pub output: PathBuf,
    /// Language of the input text
    #[arg(short, long, default_value = "en")]
    pub source: String,
    /// Target language, repeat for several
    #[arg(short, long = "target", default_value = "zh-Hans")]
    pub targets: Vec<String>,
    /// Azure region, overrides AZURE_REGION
    #[arg(long)]
    pub azure_region: Option<String>,
    /// Translator endpoint, overrides TRANSLATOR_ENDPOINT
    #[arg(long)]
    pub translator_endpoint: Option<String>,
}

pub struct TranslateController {
    translation_service: Arc<dyn TranslationServiceApi>,
}

impl TranslateController {
    pub fn new(translation_service: Arc<dyn TranslationServiceApi>) -> Self {
        Self {
            translation_service,
        }
    }

    /// `booktape translate` - write one translated copy per input and target
    pub async fn translate(&self, args: TranslateArgs) -> AppResult<Vec<PathBuf>> {
        let inputs = if args.input.is_dir() {
            let files = list_text_files(&args.input).await?;
            if files.is_empty() {
                return Err(AppError::InvalidInput(format!(
                    "The input directory {} contains no .txt files",
                    args.input.display()
                )));
            }
            files
        } else {
            vec![args.input.clone()]
        };

        let mut written = Vec::new();

        for input in inputs {
            let loaded = text::load(&TextSource::File(input.clone())).await?;

            let response = self
                .translation_service
                .translate(loaded.as_str(), Some(&args.source), &args.targets)
                .await?;

            // Nothing is written until every target came back
            tokio::fs::create_dir_all(&args.output).await?;

            for translation in &response.translations {
                let path = translated_path(&args.output, &input, &translation.target);
                tokio::fs::write(&path, &translation.text).await?;

                tracing::info!(
                    path = %path.display(),
                    target = %translation.target,
                    text_length = translation.text.chars().count(),
                    "Translation written"
                );
                println!("Successfully written {}", path.display());
                written.push(path);
            }
        }

        Ok(written)
    }
}

/// `{output_dir}/{stem}_{lang}{.ext}`
fn translated_path(output_dir: &Path, input: &Path, target: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "text".to_string());
    let extension = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    output_dir.join(format!("{}_{}{}", stem, target, extension))
}
