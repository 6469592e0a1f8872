use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Persists synthesized audio to disk.
///
/// Audio is written next to the destination as `<name>.part` and renamed into
/// place, so the destination either holds the complete file or nothing.
#[derive(Debug, Default, Clone)]
pub struct AudioRepository;

impl AudioRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn save(&self, path: &Path, audio: &[u8]) -> AppResult<u64> {
        if audio.is_empty() {
            return Err(AppError::Internal(format!(
                "Refusing to write empty audio to {}",
                path.display()
            )));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let part_path = part_path(path)?;

        if let Err(e) = tokio::fs::write(&part_path, audio).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(AppError::Io(e));
        }

        if let Err(e) = tokio::fs::rename(&part_path, path).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(AppError::Io(e));
        }

        tracing::info!(
            path = %path.display(),
            audio_size_bytes = audio.len(),
            "Audio written"
        );

        Ok(audio.len() as u64)
    }
}

fn part_path(path: &Path) -> AppResult<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        AppError::InvalidInput(format!("Output path {} has no file name", path.display()))
    })?;

    let mut part_name = file_name.to_os_string();
    part_name.push(".part");
    Ok(path.with_file_name(part_name))
}
