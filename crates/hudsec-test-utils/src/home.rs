// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporary server home directory with the standard key file layout.

use std::path::{Path, PathBuf};

use hudsec_core::KEY_SIZE;
use tempfile::TempDir;

use crate::fixtures::{wrap_confidentiality_key, TEST_MASTER_KEY};

/// 256 bytes of key material, fixed so ciphertext in tests is reproducible.
pub fn default_key_material() -> Vec<u8> {
    (0..256u32).map(|i| (i * 167 + 13) as u8).collect()
}

/// Builder for [`ServerHome`].
pub struct ServerHomeBuilder {
    master_key: Vec<u8>,
    key_material: Option<Vec<u8>>,
    credentials: Option<String>,
    trailing_newline: bool,
}

impl ServerHomeBuilder {
    fn new() -> Self {
        Self {
            master_key: TEST_MASTER_KEY.to_vec(),
            key_material: None,
            credentials: None,
            trailing_newline: false,
        }
    }

    /// Use a specific master key instead of [`TEST_MASTER_KEY`].
    pub fn with_master_key(mut self, master_key: &[u8]) -> Self {
        self.master_key = master_key.to_vec();
        self
    }

    /// Use specific key material instead of [`default_key_material`].
    pub fn with_key_material(mut self, material: &[u8]) -> Self {
        self.key_material = Some(material.to_vec());
        self
    }

    /// Write `credentials.xml` with this content.
    pub fn with_credentials(mut self, xml: impl Into<String>) -> Self {
        self.credentials = Some(xml.into());
        self
    }

    /// Terminate `master.key` with a newline, as an editor would.
    pub fn with_trailing_newline(mut self) -> Self {
        self.trailing_newline = true;
        self
    }

    /// Write the files into a fresh temporary directory.
    pub fn build(self) -> std::io::Result<ServerHome> {
        let dir = TempDir::new()?;
        let secrets = dir.path().join("secrets");
        std::fs::create_dir_all(&secrets)?;

        let material = self.key_material.unwrap_or_else(default_key_material);
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&material[..KEY_SIZE]);

        let mut master_file = self.master_key.clone();
        if self.trailing_newline {
            master_file.push(b'\n');
        }
        std::fs::write(secrets.join("master.key"), &master_file)?;
        std::fs::write(
            secrets.join("hudson.util.Secret"),
            wrap_confidentiality_key(&self.master_key, &material),
        )?;

        if let Some(xml) = &self.credentials {
            std::fs::write(dir.path().join("credentials.xml"), xml)?;
        }

        Ok(ServerHome { dir, key })
    }
}

/// A server home on disk: `secrets/master.key`, `secrets/hudson.util.Secret`
/// and optionally `credentials.xml`.
///
/// The directory is removed when the value is dropped.
pub struct ServerHome {
    dir: TempDir,
    key: [u8; KEY_SIZE],
}

impl ServerHome {
    pub fn builder() -> ServerHomeBuilder {
        ServerHomeBuilder::new()
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn master_key_path(&self) -> PathBuf {
        self.dir.path().join("secrets/master.key")
    }

    pub fn wrapped_key_path(&self) -> PathBuf {
        self.dir.path().join("secrets/hudson.util.Secret")
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.dir.path().join("credentials.xml")
    }

    /// The confidentiality key the wrapped key file decrypts to.
    pub fn confidentiality_key(&self) -> [u8; KEY_SIZE] {
        self.key
    }
}
