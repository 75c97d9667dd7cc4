//! Wraps a rendered container in a complete HTML document.

use crate::{config, render::html, render::Element};
use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

static PAGE_TEMPLATE_NAME: &str = "page";
static PAGE_TEMPLATE: &str = include_str!("../templates/page/index.html.hbs");

#[derive(Debug, Error)]
pub enum RenderingError {
    #[error("Page template is invalid: {0}")]
    TemplateInvalid(#[from] Box<handlebars::TemplateError>),
    #[error("Failed to render page: {0}")]
    RenderingFailed(#[from] Box<handlebars::RenderError>),
}

#[derive(Debug, Serialize)]
struct PageData<'a> {
    title: &'a str,
    stylesheets: &'a [String],
    container: String,
}

#[derive(Debug)]
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, RenderingError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::html_escape);
        handlebars
            .register_template_string(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)
            .map_err(Box::new)?;
        Ok(Self { handlebars })
    }

    /// The container is already escaped node by node, so it goes in raw.
    pub fn render(
        &self,
        page: &config::Page,
        container: &Element,
    ) -> Result<String, RenderingError> {
        let data = PageData {
            title: page.title(),
            stylesheets: page.stylesheets(),
            container: html::element_to_html(container),
        };
        self.handlebars
            .render(PAGE_TEMPLATE_NAME, &data)
            .map_err(Box::new)
            .map_err(Into::into)
    }
}
