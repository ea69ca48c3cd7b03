use join_core::JoinResult;
use std::path::Path;
use tokio::fs;

/// Atomic file writer: write to a temp file in the target directory, then
/// rename over the destination. A crash mid-write can never leave a
/// half-written board file behind.
pub struct AtomicWriter;

impl AtomicWriter {
    pub async fn write_atomic(path: &Path, data: &[u8]) -> JoinResult<()> {
        // Temp file must live in the same directory so the rename stays on
        // one filesystem.
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let temp_file = tempfile::NamedTempFile::new_in(parent)?;
        let temp_path = temp_file.path().to_path_buf();

        tokio::fs::write(&temp_path, data).await?;
        fs::rename(&temp_path, path).await?;

        tracing::debug!("wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    pub async fn read_all(path: &Path) -> JoinResult<Vec<u8>> {
        let data = fs::read(path).await?;
        Ok(data)
    }
}
