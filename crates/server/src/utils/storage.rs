use log::warn;
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Flat directory holding uploaded excess documents, addressed by file name
#[derive(Debug, Clone)]
pub struct DocumentStorage {
    root: PathBuf,
}

impl DocumentStorage {
    pub async fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn save(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::write(self.path_for(name)?, bytes).await
    }

    pub async fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(name)?).await
    }

    /// Removes a stored file. Missing files and failures are only logged.
    pub async fn remove(&self, name: &str) {
        let path = match self.path_for(name) {
            Ok(path) => path,
            Err(e) => {
                warn!("Refusing to remove document {name:?}: {e}");
                return;
            }
        };

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove document {}: {e}", path.display()),
        }
    }

    pub async fn remove_all<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.remove(name.as_ref()).await;
        }
    }

    // References are bare file names; anything that could escape the root is rejected
    fn path_for(&self, name: &str) -> io::Result<PathBuf> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && !name.contains("..");

        if valid {
            Ok(self.root.join(name))
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid document name {name:?}"),
            ))
        }
    }
}
