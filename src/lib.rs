#![forbid(unsafe_code)]

pub mod config;
pub mod container;
pub mod fetch;
pub mod loader;
pub mod manifest;
pub mod opts;
pub mod render;
pub mod section;
pub mod templating;
pub mod util;

pub use self::{
    container::Container,
    fetch::{Fetch, HttpFetcher},
    loader::{load_manifest, LoadError, Summary},
};

pub static NAME: &str = "client-cards";
