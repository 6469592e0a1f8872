use crate::error::{AppError, AppResult};
use html2text::from_read;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Where the input text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    File(PathBuf),
    Stdin,
}

impl TextSource {
    /// `-` means stdin, anything else is a path
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            TextSource::Stdin
        } else {
            TextSource::File(PathBuf::from(arg))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            TextSource::File(path) => path.display().to_string(),
            TextSource::Stdin => "stdin".to_string(),
        }
    }
}

/// Text ready for translation or synthesis. Immutable once loaded.
///
/// Only surrounding whitespace is trimmed; line breaks and everything between
/// the first and last visible character reach the services unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputText {
    content: String,
    origin: String,
}

impl InputText {
    /// Fails when the text is empty or whitespace only
    pub fn new(raw: &str, origin: impl Into<String>) -> AppResult<Self> {
        let origin = origin.into();
        let content = raw.trim().to_string();

        if content.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "The input {} contains no text",
                origin
            )));
        }

        Ok(Self { content, origin })
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn into_string(self) -> String {
        self.content
    }
}

/// Load text from a file or stdin
pub async fn load(source: &TextSource) -> AppResult<InputText> {
    match source {
        TextSource::File(path) => load_file(path).await,
        TextSource::Stdin => load_reader(tokio::io::stdin(), "stdin").await,
    }
}

pub async fn load_file(path: &Path) -> AppResult<InputText> {
    if !path.is_file() {
        return Err(AppError::InvalidInput(format!(
            "The input {} does not exist",
            path.display()
        )));
    }

    let bytes = tokio::fs::read(path).await?;
    let raw = String::from_utf8(bytes).map_err(|_| {
        AppError::InvalidInput(format!("The input {} is not valid UTF-8", path.display()))
    })?;

    let text = if is_html(path) {
        from_read(raw.as_bytes(), usize::MAX)
    } else {
        raw
    };

    tracing::debug!(
        path = %path.display(),
        raw_length = text.len(),
        "Input file read"
    );

    InputText::new(&text, path.display().to_string())
}

pub async fn load_reader<R>(mut reader: R, origin: &str) -> AppResult<InputText>
where
    R: AsyncRead + Unpin,
{
    let mut raw = String::new();
    reader.read_to_string(&mut raw).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            AppError::InvalidInput(format!("The input {} is not valid UTF-8", origin))
        } else {
            AppError::Io(e)
        }
    })?;

    InputText::new(&raw, origin)
}

/// List the `*.txt` files of a directory, sorted by name
pub async fn list_text_files(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn is_html(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref(),
        Some("html") | Some("htm") | Some("xhtml")
    )
}
