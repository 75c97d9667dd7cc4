#![forbid(unsafe_code)]

use client_cards::{
    config::{self, Config, Raw},
    container,
    loader::{self, LoadError},
    load_manifest,
    section::Section,
    templating::{PageRenderer, RenderingError},
    util::cli::{self, Exec, GlobalFlags, Report, Reportable, TextWrapper},
    HttpFetcher, NAME,
};
use std::{fs, io, path::PathBuf};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = NAME, settings = cli::SETTINGS)]
pub struct Input {
    #[structopt(flatten)]
    flags: GlobalFlags,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, StructOpt)]
pub enum Command {
    #[structopt(
        name = "render",
        about = "Fetches the client manifest and renders the download page"
    )]
    Render {
        #[structopt(flatten)]
        server: cli::Server,
        #[structopt(
            long,
            short,
            value_name = "PATH",
            help = "Write the page here instead of to stdout",
            parse(from_os_str)
        )]
        out: Option<PathBuf>,
    },
    #[structopt(name = "list", about = "Lists the clients the page would show")]
    List {
        #[structopt(flatten)]
        server: cli::Server,
    },
    #[structopt(
        name = "init",
        about = "Writes a starter config file to the current working directory"
    )]
    Init {
        #[structopt(flatten)]
        clobbering: cli::Clobbering,
    },
}

#[derive(Debug)]
pub enum Error {
    CurrentDirFailed(io::Error),
    ConfigFailed(config::LoadOrDefaultError),
    ConfigWriteFailed(config::WriteError),
    TemplatingFailed(RenderingError),
    PageWriteFailed { path: PathBuf, cause: io::Error },
    LoadFailed(LoadError),
    ListFailed(LoadError),
    ListHasErrors,
}

impl Reportable for Error {
    fn report(&self) -> Report {
        match self {
            Self::CurrentDirFailed(err) => {
                Report::error("Failed to get current working directory", err)
            }
            Self::ConfigFailed(err) => err.report(),
            Self::ConfigWriteFailed(err) => err.report(),
            Self::TemplatingFailed(err) => Report::error("Failed to render page", err),
            Self::PageWriteFailed { path, cause } => {
                Report::error(format!("Failed to write page to {:?}", path), cause)
            }
            Self::LoadFailed(err) => Report::error(
                "Page was rendered, but the clients couldn't be loaded",
                err,
            ),
            Self::ListFailed(err) => Report::error("Failed to load clients", err),
            Self::ListHasErrors => Report::error(
                "Some clients can't be rendered",
                "The page will show an error instead of any cards until they're fixed.",
            ),
        }
    }
}

fn load_config(server: cli::Server) -> Result<Config, Error> {
    let cwd = std::env::current_dir().map_err(Error::CurrentDirFailed)?;
    Config::load_or_default(cwd, server.base_url).map_err(Error::ConfigFailed)
}

fn render(server: cli::Server, out: Option<PathBuf>, wrapper: &TextWrapper) -> Result<(), Error> {
    let config = load_config(server)?;
    let fetcher = HttpFetcher::new(config.base_url());
    let mut container = container::with_id(config.page().container_id());
    let loaded = load_manifest(&fetcher, &mut container);
    let page = PageRenderer::new()
        .and_then(|renderer| renderer.render(config.page(), &container))
        .map_err(Error::TemplatingFailed)?;
    match &out {
        Some(path) => fs::write(path, page).map_err(|cause| Error::PageWriteFailed {
            path: path.clone(),
            cause,
        })?,
        None => print!("{}", page),
    }
    let summary = loaded.map_err(Error::LoadFailed)?;
    if let Some(path) = out {
        Report::victory(
            format!("Wrote {:?}", path),
            format!(
                "{} client(s) shown, {} skipped",
                summary.rendered, summary.skipped
            ),
        )
        .print(wrapper);
    }
    Ok(())
}

fn list(server: cli::Server, wrapper: &TextWrapper) -> Result<(), Error> {
    let config = load_config(server)?;
    let fetcher = HttpFetcher::new(config.base_url());
    let manifest = loader::fetch_manifest(&fetcher).map_err(Error::ListFailed)?;
    let section = Section::for_manifest(&manifest);
    section.print(wrapper);
    if section.has_error() {
        Err(Error::ListHasErrors)
    } else {
        Ok(())
    }
}

fn init(clobbering: cli::Clobbering, wrapper: &TextWrapper) -> Result<(), Error> {
    let cwd = std::env::current_dir().map_err(Error::CurrentDirFailed)?;
    let path = Raw::starter()
        .write(&cwd, clobbering.clobbering.allowed())
        .map_err(Error::ConfigWriteFailed)?;
    Report::victory(
        format!("Wrote {:?}", path),
        "Point `base-url` at your server, then run `client-cards render`.",
    )
    .print(wrapper);
    Ok(())
}

impl Exec for Input {
    type Report = Error;

    fn global_flags(&self) -> GlobalFlags {
        self.flags
    }

    fn exec(self, wrapper: &TextWrapper) -> Result<(), Self::Report> {
        match self.command {
            Command::Render { server, out } => render(server, out, wrapper),
            Command::List { server } => list(server, wrapper),
            Command::Init { clobbering } => init(clobbering, wrapper),
        }
    }
}

fn main() {
    cli::exec::<Input>()
}
