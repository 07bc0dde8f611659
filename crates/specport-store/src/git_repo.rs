// ABOUTME: Reads specification records from a git-synced workspace data directory.
// ABOUTME: Each record is one YAML file under <working_dir>/.insomnia/ApiSpec/.

use std::fs;
use std::path::{Path, PathBuf};

use specport_core::ApiSpec;

use crate::store::{StoreError, WorkspaceStore, find_spec};

/// Name of the data directory at the root of a git-synced workspace.
pub const GIT_DATA_DIR: &str = ".insomnia";

const API_SPEC_DIR: &str = "ApiSpec";

/// A workspace store backed by the YAML files of a git repository.
#[derive(Debug, Clone)]
pub struct GitRepoStore {
    data_dir: PathBuf,
}

impl GitRepoStore {
    /// Open the data directory inside `working_dir`, or None if the working
    /// directory is not a git-synced workspace.
    pub fn open(working_dir: &Path) -> Option<Self> {
        let data_dir = working_dir.join(GIT_DATA_DIR);
        if data_dir.is_dir() {
            Some(Self { data_dir })
        } else {
            None
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn spec_dir(&self) -> PathBuf {
        self.data_dir.join(API_SPEC_DIR)
    }

    /// Parse one record file, logging and skipping anything unreadable.
    fn read_spec_file(path: &Path) -> Result<Option<ApiSpec>, StoreError> {
        let text = fs::read_to_string(path)?;
        match serde_yaml::from_str::<ApiSpec>(&text) {
            Ok(spec) => Ok(Some(spec)),
            Err(e) => {
                tracing::warn!("skipping unparseable spec file {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }
}

fn is_yaml_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yml" || ext == "yaml")
}

impl WorkspaceStore for GitRepoStore {
    fn kind(&self) -> &'static str {
        "git-repo"
    }

    fn list(&self) -> Result<Vec<ApiSpec>, StoreError> {
        let spec_dir = self.spec_dir();
        if !spec_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut specs = Vec::new();
        for entry in fs::read_dir(&spec_dir)? {
            let path = entry?.path();
            if !is_yaml_file(&path) {
                continue;
            }
            if let Some(spec) = Self::read_spec_file(&path)? {
                specs.push(spec);
            }
        }

        specs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(specs)
    }

    fn lookup(&self, identifier: &str) -> Result<Option<ApiSpec>, StoreError> {
        // Records are normally stored as <id>.yml, so try that file first.
        if !identifier.is_empty() && !identifier.contains(['/', '\\']) {
            let direct = self.spec_dir().join(format!("{identifier}.yml"));
            if direct.is_file()
                && let Some(spec) = Self::read_spec_file(&direct)?
                && spec.id == identifier
            {
                return Ok(Some(spec));
            }
        }

        Ok(find_spec(self.list()?, identifier))
    }
}
