//! Credentials and the scoped `.credentials` handoff for nexus-cli
//!
//! nexus-cli reads its connection details from a `.credentials` file in its
//! working directory. Instead of leaving that file behind in the caller's
//! directory, [`CredentialHandoff`] writes it into a private temporary
//! directory that is removed when the handoff is dropped.

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::fmt;
use std::fs;
use tempfile::TempDir;

/// File name nexus-cli looks for in its working directory
pub const CREDENTIALS_FILE_NAME: &str = ".credentials";

/// Username/password pair for the repository manager
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// On-disk layout of the `.credentials` file
#[derive(Debug, Serialize)]
struct CredentialsFile<'a> {
    nexus_host: &'a str,
    nexus_username: &'a str,
    nexus_password: &'a str,
    nexus_repository: &'a str,
}

/// A `.credentials` file living in a private directory for one run
#[derive(Debug)]
pub struct CredentialHandoff {
    dir: TempDir,
    path: Utf8PathBuf,
}

impl CredentialHandoff {
    /// Write the credentials file for `repository` into a fresh directory
    pub fn write(host: &str, credentials: &Credentials, repository: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("nexus-cleanup-")
            .tempdir()?;

        let path = Utf8PathBuf::from_path_buf(dir.path().join(CREDENTIALS_FILE_NAME))
            .map_err(|p| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("non UTF-8 temp path: {}", p.display()),
                )
            })?;

        let content = toml::to_string(&CredentialsFile {
            nexus_host: host,
            nexus_username: credentials.username(),
            nexus_password: credentials.password(),
            nexus_repository: repository,
        })?;

        // Truncates if present
        fs::write(&path, content)?;
        restrict_permissions(&path)?;

        Ok(Self { dir, path })
    }

    /// Directory the external tool should run in
    pub fn working_dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Full path of the credentials file
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Utf8Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Utf8Path) -> std::io::Result<()> {
    Ok(())
}
