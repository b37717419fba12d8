use cfm_core::ClientError;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Fails with `InputFileMissing` unless `path` is an existing regular file.
pub async fn ensure_input(path: &Path) -> Result<(), ClientError> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(ClientError::InputFileMissing {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ClientError::InputFileMissing {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(ClientError::UnexpectedError(format!(
            "cannot access '{}': {}",
            path.display(),
            e
        ))),
    }
}

/// Reads the whole input file and returns it with the name to declare in the upload.
pub async fn read_input(path: &Path) -> Result<(Vec<u8>, String), ClientError> {
    let data = fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => ClientError::InputFileMissing {
            path: path.to_path_buf(),
        },
        _ => ClientError::UnexpectedError(format!("failed to read '{}': {}", path.display(), e)),
    })?;

    let file_name = path
        .file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned();

    Ok((data, file_name))
}

/// Writes `data` to `path`, replacing any previous content.
/// Returns the size on disk and the hex SHA-256 of what was written.
pub async fn write_output(path: &Path, data: &[u8]) -> Result<(u64, String), ClientError> {
    let write_err = |e: std::io::Error| {
        ClientError::UnexpectedError(format!("failed to write '{}': {}", path.display(), e))
    };

    {
        let mut file = fs::File::create(path).await.map_err(write_err)?;
        file.write_all(data).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;
    }

    let size = fs::metadata(path).await.map_err(write_err)?.len();

    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hex::encode(hasher.finalize());

    Ok((size, digest))
}
