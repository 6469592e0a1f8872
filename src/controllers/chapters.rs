use clap::Args;
use std::path::PathBuf;

use crate::{
    domain::text::{
        chapters::{DEFAULT_CHAPTER_TAG, DEFAULT_TITLE_TAG},
        split_chapters,
    },
    error::{AppError, AppResult},
};

/// Arguments for `booktape chapters`
#[derive(Debug, Clone, Args)]
pub struct ChaptersArgs {
    /// HTML e-book to split
    pub input: PathBuf,
    /// Directory receiving chapter_N.txt files
    #[arg(short, long, default_value = "_output")]
    pub output: PathBuf,
    /// Substring of the div id marking a chapter
    #[arg(short, long, default_value = DEFAULT_CHAPTER_TAG)]
    pub chapter_tag: String,
    /// Element holding the book title
    #[arg(long, default_value = DEFAULT_TITLE_TAG)]
    pub title_tag: String,
}

#[derive(Default)]
pub struct ChaptersController;

impl ChaptersController {
    pub fn new() -> Self {
        Self
    }

    /// `booktape chapters` - split an HTML book into plain text chapters
    pub async fn split(&self, args: ChaptersArgs) -> AppResult<Vec<PathBuf>> {
        let bytes = match tokio::fs::read(&args.input).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::InvalidInput(format!(
                    "Input file {} does not exist",
                    args.input.display()
                )))
            }
            Err(e) => return Err(e.into()),
        };
        let html = String::from_utf8(bytes).map_err(|_| {
            AppError::InvalidInput(format!("{} is not valid UTF-8", args.input.display()))
        })?;

        let chapters = split_chapters(&html, &args.chapter_tag, &args.title_tag)?;
        if chapters.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "No div with an id containing '{}' found in {}",
                args.chapter_tag,
                args.input.display()
            )));
        }

        tokio::fs::create_dir_all(&args.output).await?;

        let mut written = Vec::with_capacity(chapters.len());
        for chapter in &chapters {
            let path = args.output.join(chapter.file_name());
            tokio::fs::write(&path, chapter.to_text()).await?;
            written.push(path);
        }

        tracing::info!(
            input = %args.input.display(),
            chapter_count = chapters.len(),
            output = %args.output.display(),
            "Book split into chapters"
        );
        println!(
            "Successfully parsed {} chapters into {}",
            chapters.len(),
            args.output.display()
        );

        Ok(written)
    }
}
