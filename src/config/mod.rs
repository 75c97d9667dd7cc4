mod raw;

pub use self::raw::*;

use crate::util::cli::{Report, Reportable};
use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
};

pub use crate::container::DEFAULT_ID as DEFAULT_CONTAINER_ID;

pub static DEFAULT_TITLE: &str = "Download";

#[derive(Debug, Eq, PartialEq)]
pub enum BaseUrlError {
    Missing,
    UnsupportedScheme { url: String },
    NoHost { url: String },
}

impl Display for BaseUrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(
                f,
                "No server was given. Set `base-url` under `[manifest]` in {}, or pass `--base-url`.",
                Raw::file_name()
            ),
            Self::UnsupportedScheme { url } => write!(
                f,
                "{:?} isn't an `http://` or `https://` URL.",
                url
            ),
            Self::NoHost { url } => write!(f, "{:?} doesn't name a host.", url),
        }
    }
}

pub fn check_base_url(url: &str) -> Result<(), BaseUrlError> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| BaseUrlError::UnsupportedScheme {
            url: url.to_owned(),
        })?;
    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return Err(BaseUrlError::NoHost {
            url: url.to_owned(),
        });
    }
    Ok(())
}

#[derive(Debug, Eq, PartialEq)]
pub enum ContainerIdError {
    Empty,
    ContainsWhitespace { id: String },
}

impl Display for ContainerIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Container id can't be empty."),
            Self::ContainsWhitespace { id } => {
                write!(f, "Container id {:?} can't contain whitespace.", id)
            }
        }
    }
}

pub fn check_container_id(id: &str) -> Result<(), ContainerIdError> {
    if id.is_empty() {
        return Err(ContainerIdError::Empty);
    }
    if id.chars().any(char::is_whitespace) {
        return Err(ContainerIdError::ContainsWhitespace { id: id.to_owned() });
    }
    Ok(())
}

#[derive(Debug)]
pub enum FromRawError {
    BaseUrlInvalid(BaseUrlError),
    ContainerIdInvalid(ContainerIdError),
}

impl FromRawError {
    pub fn report(&self, msg: &str) -> Report {
        match self {
            Self::BaseUrlInvalid(err) => Report::error(msg, err),
            Self::ContainerIdInvalid(err) => Report::error(msg, err),
        }
    }
}

#[derive(Debug)]
pub enum LoadOrDefaultError {
    LoadFailed(LoadError),
    FromRawFailed {
        path: Option<PathBuf>,
        cause: FromRawError,
    },
}

impl Reportable for LoadOrDefaultError {
    fn report(&self) -> Report {
        match self {
            Self::LoadFailed(err) => Report::error("Failed to load config", err),
            Self::FromRawFailed {
                path: Some(path),
                cause,
            } => cause.report(&format!("Config file at {:?} invalid", path)),
            Self::FromRawFailed { path: None, cause } => cause.report("Config invalid"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Page {
    container_id: String,
    title: String,
    stylesheets: Vec<String>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_owned(),
            title: DEFAULT_TITLE.to_owned(),
            stylesheets: Vec::new(),
        }
    }
}

impl Page {
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    base_url: String,
    page: Page,
}

impl Config {
    /// `base_url` comes from the command line and beats whatever the file
    /// says.
    pub fn from_raw(raw: Raw, base_url: Option<String>) -> Result<Self, FromRawError> {
        let manifest = raw.manifest;
        let base_url = base_url
            .or_else(|| manifest.and_then(|manifest| manifest.base_url))
            .ok_or(BaseUrlError::Missing)
            .map_err(FromRawError::BaseUrlInvalid)?;
        check_base_url(&base_url).map_err(FromRawError::BaseUrlInvalid)?;
        let page_raw = raw.page.unwrap_or_default();
        let defaults = Page::default();
        let page = Page {
            container_id: page_raw.container_id.unwrap_or(defaults.container_id),
            title: page_raw.title.unwrap_or(defaults.title),
            stylesheets: page_raw.stylesheets.unwrap_or(defaults.stylesheets),
        };
        check_container_id(&page.container_id).map_err(FromRawError::ContainerIdInvalid)?;
        Ok(Self { base_url, page })
    }

    /// Reads the nearest config file, or starts from nothing if there isn't
    /// one.
    pub fn load_or_default(
        cwd: impl AsRef<Path>,
        base_url: Option<String>,
    ) -> Result<Self, LoadOrDefaultError> {
        let (path, raw) = match Raw::load(cwd).map_err(LoadOrDefaultError::LoadFailed)? {
            Some((root_dir, raw)) => (Some(root_dir.join(Raw::file_name())), raw),
            None => (None, Raw::default()),
        };
        let config = Self::from_raw(raw, base_url)
            .map_err(|cause| LoadOrDefaultError::FromRawFailed { path, cause })?;
        log::info!("loaded config: {:#?}", config);
        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page(&self) -> &Page {
        &self.page
    }
}
