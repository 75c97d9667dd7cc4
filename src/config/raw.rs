use crate::util::cli::{Report, Reportable};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display},
    fs, io,
    path::{Path, PathBuf},
};

#[derive(Debug)]
pub enum LoadError {
    DiscoverFailed(io::Error),
    ReadFailed {
        path: PathBuf,
        cause: io::Error,
    },
    ParseFailed {
        path: PathBuf,
        cause: toml::de::Error,
    },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiscoverFailed(err) => write!(
                f,
                "Failed to canonicalize path while searching for config file: {}",
                err
            ),
            Self::ReadFailed { path, cause } => {
                write!(f, "Failed to read config file at {:?}: {}", path, cause)
            }
            Self::ParseFailed { path, cause } => {
                write!(f, "Failed to parse config file at {:?}: {}", path, cause)
            }
        }
    }
}

#[derive(Debug)]
pub enum WriteError {
    SerializeFailed(toml::ser::Error),
    AlreadyExists(PathBuf),
    WriteFailed { path: PathBuf, cause: io::Error },
}

impl Reportable for WriteError {
    fn report(&self) -> Report {
        match self {
            Self::SerializeFailed(err) => Report::error("Failed to serialize config", err),
            Self::AlreadyExists(path) => Report::action_request(
                format!("Config file already exists at {:?}", path),
                "Pass `--force` if you really want to replace it.",
            ),
            Self::WriteFailed { path, cause } => {
                Report::error(format!("Failed to write config to {:?}", path), cause)
            }
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ManifestRaw {
    pub base_url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PageRaw {
    pub container_id: Option<String>,
    pub title: Option<String>,
    pub stylesheets: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Raw {
    pub manifest: Option<ManifestRaw>,
    pub page: Option<PageRaw>,
}

impl Raw {
    /// What `init` writes: a placeholder server and the stock page.
    pub fn starter() -> Self {
        Self {
            manifest: Some(ManifestRaw {
                base_url: Some("http://localhost:8080".to_owned()),
            }),
            page: Some(PageRaw {
                container_id: Some(super::DEFAULT_CONTAINER_ID.to_owned()),
                title: Some(super::DEFAULT_TITLE.to_owned()),
                stylesheets: Some(Vec::new()),
            }),
        }
    }

    pub fn file_name() -> String {
        format!("{}.toml", crate::NAME)
    }

    pub fn discover_root(cwd: impl AsRef<Path>) -> io::Result<Option<PathBuf>> {
        let file_name = Self::file_name();
        let mut path = cwd.as_ref().canonicalize()?.join(&file_name);
        log::info!("looking for config file at {:?}", path);
        while !path.exists() {
            if let Some(parent) = path.parent().and_then(Path::parent) {
                path = parent.join(&file_name);
                log::info!("looking for config file at {:?}", path);
            } else {
                log::info!("no config file was ever found");
                return Ok(None);
            }
        }
        log::info!("found config file at {:?}", path);
        path.pop();
        Ok(Some(path))
    }

    pub fn load(cwd: impl AsRef<Path>) -> Result<Option<(PathBuf, Self)>, LoadError> {
        Self::discover_root(cwd)
            .map_err(LoadError::DiscoverFailed)?
            .map(|root_dir| {
                let path = root_dir.join(Self::file_name());
                let bytes = fs::read(&path).map_err(|cause| LoadError::ReadFailed {
                    path: path.clone(),
                    cause,
                })?;
                toml::from_slice::<Self>(&bytes)
                    .map(|raw| (root_dir, raw))
                    .map_err(|cause| LoadError::ParseFailed {
                        path: path.clone(),
                        cause,
                    })
            })
            .transpose()
    }

    pub fn write(&self, dir: &Path, clobber: bool) -> Result<PathBuf, WriteError> {
        let path = dir.join(Self::file_name());
        if path.exists() && !clobber {
            return Err(WriteError::AlreadyExists(path));
        }
        let bytes = toml::to_vec(self).map_err(WriteError::SerializeFailed)?;
        log::info!("writing config to {:?}", path);
        fs::write(&path, bytes).map_err(|cause| WriteError::WriteFailed {
            path: path.clone(),
            cause,
        })?;
        Ok(path)
    }
}
