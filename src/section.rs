//! Colored terminal summaries, used by `client-cards list`.

use crate::{
    manifest::{ClientEntry, Manifest},
    util::{
        self,
        cli::{colors, TextWrapper},
    },
};
use colored::Colorize as _;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Label {
    Victory,
    Warning,
    Error,
}

impl Label {
    fn title_symbol(self) -> &'static str {
        match self {
            Self::Victory | Self::Warning => "✔",
            Self::Error => "!",
        }
    }

    fn item_symbol(self) -> &'static str {
        match self {
            Self::Victory => "•",
            Self::Warning | Self::Error => "✗",
        }
    }

    fn color(self) -> colored::Color {
        match self {
            Self::Victory => colors::VICTORY,
            Self::Warning => colors::WARNING,
            Self::Error => colors::ERROR,
        }
    }

    fn format_title(self, title: &str) -> colored::ColoredString {
        format!("[{}] {}", self.title_symbol(), title)
            .color(self.color())
            .bold()
    }

    fn format_item(self, msg: &str) -> colored::ColoredString {
        let item = format!("{} {}", self.item_symbol(), msg);
        match self {
            Self::Victory => item.normal(),
            _ => item.color(self.color()).bold(),
        }
    }
}

#[derive(Debug)]
struct Item {
    label: Label,
    msg: String,
}

impl Item {
    fn new(label: Label, msg: impl ToString) -> Self {
        Self {
            label,
            msg: msg.to_string(),
        }
    }

    fn from_result(result: Result<impl ToString, impl ToString>) -> Self {
        util::unwrap_either(
            result
                .map(|msg| Self::new(Label::Victory, msg))
                .map_err(|msg| Self::new(Label::Error, msg)),
        )
    }

    // Eligible entries are the only ones worth listing; a card that can't
    // be built is an error, and known bugs are a warning.
    fn for_eligible(index: usize, decoded: serde_json::Result<ClientEntry>) -> Self {
        match decoded {
            Ok(entry) => Self::for_entry(&entry),
            Err(err) => Self::new(
                Label::Error,
                format!("client at index {} is malformed: {}", index, err),
            ),
        }
    }

    fn for_entry(entry: &ClientEntry) -> Self {
        let item = Self::from_result(
            crate::render::card(entry)
                .map(|_| format!("{}: {}", entry.name, entry.description))
                .map_err(|err| err.to_string()),
        );
        match (item.label, entry.known_bugs()) {
            (Label::Victory, Some(bugs)) => Self::new(
                Label::Warning,
                format!("{}: {} (known bugs: {})", entry.name, entry.description, bugs),
            ),
            _ => item,
        }
    }

    fn format(&self) -> colored::ColoredString {
        self.label.format_item(&self.msg)
    }
}

#[derive(Debug)]
pub struct Section {
    title: String,
    items: Vec<Item>,
}

impl Section {
    pub fn new(title: impl ToString) -> Self {
        Self {
            title: title.to_string(),
            items: Default::default(),
        }
    }

    pub fn for_manifest(manifest: &Manifest) -> Self {
        let eligible = manifest.eligible().count();
        let title = format!(
            "{} of {} client(s) would be shown",
            eligible,
            manifest.len()
        );
        manifest
            .eligible()
            .fold(Self::new(title), |section, (index, decoded)| {
                section.with_item(Item::for_eligible(index, decoded))
            })
    }

    fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn has_error(&self) -> bool {
        self.items.iter().any(|item| item.label == Label::Error)
    }

    fn has_warning(&self) -> bool {
        self.items.iter().any(|item| item.label == Label::Warning)
    }

    fn label(&self) -> Label {
        if self.has_error() {
            Label::Error
        } else if self.has_warning() {
            Label::Warning
        } else {
            Label::Victory
        }
    }

    pub fn print(&self, wrapper: &TextWrapper) {
        static BULLET_INDENT: &str = "    ";
        static HANGING_INDENT: &str = "      ";
        let bullet_wrapper = wrapper
            .clone()
            .initial_indent(BULLET_INDENT)
            .subsequent_indent(HANGING_INDENT);
        // `to_string` keeps the color; `fill` would only see the plain text
        println!(
            "\n{}",
            wrapper.fill(&self.label().format_title(&self.title).to_string())
        );
        for item in &self.items {
            println!("{}", bullet_wrapper.fill(&item.format().to_string()));
        }
    }
}
