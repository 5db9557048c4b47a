use std::{io::ErrorKind, path::Path};

use tokio::{fs, io::AsyncWriteExt};
use tracing::debug;

use super::{CacheError, CredentialSet, Provenance};

/// Create the cache directory, owner-only on unix
pub(super) async fn ensure_dir(dir: &Path) -> Result<(), CacheError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o700);

    builder
        .create(dir)
        .await
        .map_err(|source| CacheError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
}

/// Read a credential set, rejecting anything that is not a complete issued record
pub(super) async fn load(path: &Path) -> Result<CredentialSet, CacheError> {
    let content = match fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CacheError::Missing(path.to_path_buf()));
        }
        Err(source) => {
            return Err(CacheError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let creds: CredentialSet =
        serde_json::from_slice(&content).map_err(|source| CacheError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    if creds.provenance == Provenance::Ambient {
        return Err(CacheError::Degenerate {
            path: path.to_path_buf(),
            provider: creds.provider_name,
        });
    }

    if !creds.is_complete() {
        return Err(CacheError::Incomplete(path.to_path_buf()));
    }

    Ok(creds)
}

/// Write a credential set with owner-only permissions. The write is not atomic.
pub(super) async fn persist(path: &Path, creds: &CredentialSet) -> Result<(), CacheError> {
    let json = serde_json::to_vec(creds).map_err(CacheError::Serialize)?;
    let write_err = |source| CacheError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await.map_err(write_err)?;
    file.write_all(&json).await.map_err(write_err)?;
    file.flush().await.map_err(write_err)?;

    // The mode above only applies to newly created files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut permissions = file.metadata().await.map_err(write_err)?.permissions();
        if permissions.mode() & 0o777 != 0o600 {
            permissions.set_mode(0o600);
            fs::set_permissions(path, permissions)
                .await
                .map_err(write_err)?;
        }
    }

    debug!("Wrote {} bytes to {}", json.len(), path.display());
    Ok(())
}

/// Remove the cache file; returns whether one existed
pub(super) async fn remove(path: &Path) -> Result<bool, CacheError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(CacheError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}
