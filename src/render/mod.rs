//! Turns manifest entries into node trees.
//!
//! Everything in here is pure: [`card`] and [`error_notice`] only describe
//! what should be shown, and a [`Container`](crate::container::Container)
//! is what actually receives it.

pub mod html;
mod node;

pub use self::node::*;

use crate::manifest::ClientEntry;
use thiserror::Error;

pub static ERROR_MESSAGE: &str = "Failed to load clients. Please contact an administrator!";
pub static DOWNLOAD_LABEL: &str = "Download";
pub static WARNING_COLOR: &str = "#c40900";

pub mod class {
    pub static CLIENT: &str = "client";
    pub static KNOWN_BUGS: &str = "known-bugs";
    pub static VERSION: &str = "version";
    pub static DESCRIPTION: &str = "description";
    pub static DOWNLOAD_LINK: &str = "download-link";
    pub static WARNING_ICON: [&str; 2] = ["fa-solid", "fa-triangle-exclamation"];
}

/// An eligible entry that can't be drawn.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("client {name:?} has no screenshots")]
    NoScreenshots { name: String },
    #[error("client {name:?} has no downloads")]
    NoDownloads { name: String },
    #[error("client {name:?} has an unusable screenshot size {size}")]
    BadDimension { name: String, size: String },
}

fn warning_indicator(known_bugs: &str) -> Element {
    let icon = class::WARNING_ICON
        .iter()
        .fold(Element::new(Tag::A), |icon, name| icon.with_class(*name))
        .with_style("color", WARNING_COLOR);
    Element::new(Tag::Div)
        .with_class(class::KNOWN_BUGS)
        .with_attr("title", known_bugs)
        .with_child(icon)
}

/// Describes the card for one entry.
///
/// This doesn't look at `supported`/`recommended`; callers filter first.
pub fn card(entry: &ClientEntry) -> Result<Element, ShapeError> {
    let screenshot = entry
        .first_screenshot()
        .ok_or_else(|| ShapeError::NoScreenshots {
            name: entry.name.clone(),
        })?;
    let download = entry
        .first_download()
        .ok_or_else(|| ShapeError::NoDownloads {
            name: entry.name.clone(),
        })?;
    if let Some(bad) = [&screenshot.width, &screenshot.height]
        .iter()
        .find(|dimension| !dimension.is_reasonable())
    {
        return Err(ShapeError::BadDimension {
            name: entry.name.clone(),
            size: bad.to_string(),
        });
    }

    let mut card = Element::new(Tag::Div)
        .with_class(class::CLIENT)
        .with_style("max-width", &screenshot.width)
        .with_style("max-height", &screenshot.height);
    if let Some(known_bugs) = entry.known_bugs() {
        card = card.with_child(warning_indicator(known_bugs));
    }
    Ok(card
        .with_child(
            Element::new(Tag::P)
                .with_class(class::VERSION)
                .with_text(entry.name.as_str()),
        )
        .with_child(
            Element::new(Tag::P)
                .with_class(class::DESCRIPTION)
                .with_text(entry.description.as_str()),
        )
        .with_child(Element::new(Tag::Img).with_attr("src", screenshot.src.as_str()))
        .with_child(
            Element::new(Tag::A)
                .with_class(class::DOWNLOAD_LINK)
                .with_attr("target", "_blank")
                .with_attr("href", download)
                .with_text(DOWNLOAD_LABEL),
        ))
}

pub fn error_notice() -> Element {
    Element::new(Tag::B).with_text(ERROR_MESSAGE)
}
