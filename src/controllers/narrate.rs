use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    domain::{
        narration::{NarrationRequest, NarrationResult, NarrationService, NarrationServiceApi},
        text::{loader::list_text_files, TextSource},
        tts::{AudioFormat, VoiceSettings},
    },
    error::{AppError, AppResult},
    infrastructure::config::SpeechProvider,
};

/// Arguments for `booktape narrate`
#[derive(Debug, Clone, Args)]
pub struct NarrateArgs {
    /// Text file, directory of *.txt files, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: String,
    /// Output audio file (a directory when the input is a directory)
    #[arg(short, long)]
    pub output: PathBuf,
    /// Language of the input text; detected when omitted
    #[arg(short, long)]
    pub source: Option<String>,
    /// Translate to this language before synthesis
    #[arg(short, long)]
    pub target: Option<String>,
    /// Voice name, overrides the voice configuration file
    #[arg(long)]
    pub voice: Option<String>,
    /// JSON voice configuration (voice, style, rate, pitch, volume)
    #[arg(long)]
    pub voice_config: Option<PathBuf>,
    /// Audio format: mp3 or ogg
    #[arg(long, default_value = "mp3")]
    pub format: AudioFormat,
    /// Speech provider, overrides SPEECH_PROVIDER
    #[arg(long)]
    pub provider: Option<SpeechProvider>,
    /// Azure region, overrides AZURE_REGION
    #[arg(long)]
    pub azure_region: Option<String>,
    /// Translator endpoint, overrides TRANSLATOR_ENDPOINT
    #[arg(long)]
    pub translator_endpoint: Option<String>,
    /// Speech endpoint, overrides SPEECH_ENDPOINT
    #[arg(long)]
    pub speech_endpoint: Option<String>,
}

pub struct NarrateController {
    narration_service: Arc<NarrationService>,
}

impl NarrateController {
    pub fn new(narration_service: Arc<NarrationService>) -> Self {
        Self { narration_service }
    }

    /// `booktape narrate` - turn text into audio, one file per input
    pub async fn narrate(&self, args: NarrateArgs) -> AppResult<Vec<NarrationResult>> {
        let voice = match &args.voice_config {
            Some(path) => VoiceSettings::load(path).await?,
            None => VoiceSettings::default(),
        }
        .with_voice(args.voice.clone());

        let jobs = plan_jobs(&args).await?;
        let mut results = Vec::with_capacity(jobs.len());

        for (source, output) in jobs {
            let result = self
                .narration_service
                .narrate(NarrationRequest {
                    source,
                    output,
                    source_language: args.source.clone(),
                    target_language: args.target.clone(),
                    voice: voice.clone(),
                    format: args.format,
                })
                .await?;

            println!(
                "Successfully written {} ({} bytes, ~{:.1} min, voice {})",
                result.output.display(),
                result.audio_size,
                result.duration_minutes,
                result.voice
            );
            results.push(result);
        }

        Ok(results)
    }
}

/// Pair every text source with its audio destination
async fn plan_jobs(args: &NarrateArgs) -> AppResult<Vec<(TextSource, PathBuf)>> {
    let input = Path::new(&args.input);

    if args.input != "-" && input.is_dir() {
        let files = list_text_files(input).await?;
        if files.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "The input directory {} contains no .txt files",
                input.display()
            )));
        }

        return Ok(files
            .into_iter()
            .map(|file| {
                let output = directory_output(&args.output, &file, args.format);
                (TextSource::File(file), output)
            })
            .collect());
    }

    Ok(vec![(TextSource::from_arg(&args.input), args.output.clone())])
}

/// `{output_dir}/{stem}_voice_synthesis.{ext}`
fn directory_output(output_dir: &Path, input: &Path, format: AudioFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "narration".to_string());

    output_dir.join(format!("{}_voice_synthesis.{}", stem, format.extension()))
}
