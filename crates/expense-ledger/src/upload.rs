//! Receipt upload into the uploads directory

use crate::types::*;
use receipt_report::ReceiptFile;
use std::path::{Path, PathBuf};

/// Give up looking for a free name after this many suffixes
const MAX_NAME_ATTEMPTS: usize = 10_000;

/// Copy a receipt into `uploads_dir` and tag its kind.
///
/// The file keeps its name, with the ledger's receipt separator replaced
/// by `_`. When a different file already holds that name a numeric suffix
/// is added (`scan-1.jpg`); an identical file is reused.
pub async fn store_upload(
    source: impl AsRef<Path>,
    uploads_dir: impl AsRef<Path>,
) -> Result<ReceiptFile> {
    let source = source.as_ref();
    let uploads_dir = uploads_dir.as_ref();

    let file_name = source
        .file_name()
        .ok_or_else(|| LedgerError::Validation(format!("{} is not a file", source.display())))?
        .to_string_lossy()
        .replace(RECEIPT_SEPARATOR, "_");

    if uploads_dir.to_string_lossy().contains(RECEIPT_SEPARATOR) {
        return Err(LedgerError::Validation(format!(
            "Uploads directory {} contains the reserved character {:?}",
            uploads_dir.display(),
            RECEIPT_SEPARATOR
        )));
    }

    let bytes = tokio::fs::read(source).await?;
    tokio::fs::create_dir_all(uploads_dir).await?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = uploads_dir.join(candidate_name(Path::new(&file_name), attempt));

        match tokio::fs::read(&candidate).await {
            Ok(existing) if existing == bytes => {
                log::debug!("Reusing stored receipt {}", candidate.display());
                return Ok(ReceiptFile::classify(candidate));
            }
            Ok(_) => continue,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tokio::fs::write(&candidate, &bytes).await?;
                log::info!("Stored receipt {}", candidate.display());
                return Ok(ReceiptFile::classify(candidate));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(LedgerError::Validation(format!(
        "No free upload name for {}",
        source.display()
    )))
}

/// `scan.jpg`, then `scan-1.jpg`, `scan-2.jpg`, ...
fn candidate_name(file_name: &Path, attempt: usize) -> PathBuf {
    if attempt == 0 {
        return file_name.to_path_buf();
    }

    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.extension() {
        Some(ext) => PathBuf::from(format!("{}-{}.{}", stem, attempt, ext.to_string_lossy())),
        None => PathBuf::from(format!("{}-{}", stem, attempt)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_names() {
        let name = Path::new("scan.jpg");
        assert_eq!(candidate_name(name, 0), PathBuf::from("scan.jpg"));
        assert_eq!(candidate_name(name, 2), PathBuf::from("scan-2.jpg"));
        assert_eq!(candidate_name(Path::new("README"), 1), PathBuf::from("README-1"));
    }
}
