//! The manifest loader.
//!
//! [`load_manifest`] is meant to run once per page: it makes a single
//! request, and whatever happens, the container ends up with either the
//! cards or exactly one error notice. Calling it again appends a second
//! full set of nodes.

use crate::{
    container::Container,
    fetch::{Fetch, FetchError, MANIFEST_PATH},
    manifest::{self, ClientEntry, Manifest},
    render::{self, Element, ShapeError},
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Server responded with status {status}{}", details_suffix(.details))]
    Status {
        status: u16,
        details: Option<String>,
    },
    #[error("Failed to parse client manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Client at index {index} is malformed: {cause}")]
    Malformed {
        index: usize,
        #[source]
        cause: serde_json::Error,
    },
    #[error("Client at index {index} can't be shown: {cause}")]
    Shape {
        index: usize,
        #[source]
        cause: ShapeError,
    },
}

fn details_suffix(details: &Option<String>) -> String {
    details
        .as_ref()
        .map(|details| format!(": {}", details))
        .unwrap_or_default()
}

/// What a successful load put in the container.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    pub rendered: usize,
    pub skipped: usize,
}

// The error body the server sends for failed `/api` requests.
#[derive(Debug, Deserialize)]
struct ApiError {
    details: serde_json::Value,
}

fn error_details(body: &str) -> Option<String> {
    let err = serde_json::from_str::<ApiError>(body).ok()?;
    Some(match err.details {
        serde_json::Value::String(details) => details,
        other => other.to_string(),
    })
}

/// Fetches and parses the manifest, without touching any container.
pub fn fetch_manifest(fetcher: &impl Fetch) -> Result<Manifest, LoadError> {
    let response = fetcher.get(MANIFEST_PATH)?;
    if !response.is_success() {
        return Err(LoadError::Status {
            status: response.status,
            details: error_details(&response.body),
        });
    }
    Manifest::from_json(&response.body).map_err(Into::into)
}

/// Builds every card the manifest calls for.
///
/// Nothing is appended here, so a bad entry late in the list can't leave
/// half the cards behind. Skipped entries are never decoded.
pub fn build_cards(manifest: &Manifest) -> Result<(Vec<Element>, Summary), LoadError> {
    let mut cards = Vec::new();
    let mut summary = Summary::default();
    for (index, value) in manifest.entries().iter().enumerate() {
        if !manifest::is_eligible(value) {
            log::debug!("skipping client at index {}", index);
            summary.skipped += 1;
            continue;
        }
        let entry = ClientEntry::from_value(value)
            .map_err(|cause| LoadError::Malformed { index, cause })?;
        let card = render::card(&entry).map_err(|cause| LoadError::Shape { index, cause })?;
        cards.push(card);
        summary.rendered += 1;
    }
    Ok((cards, summary))
}

/// Loads the client manifest into `container`.
///
/// On failure the container gets the error notice and the returned error
/// carries the detail that was logged.
pub fn load_manifest(
    fetcher: &impl Fetch,
    container: &mut impl Container,
) -> Result<Summary, LoadError> {
    log::info!("Loading clients...");
    match fetch_manifest(fetcher).and_then(|manifest| build_cards(&manifest)) {
        Ok((cards, summary)) => {
            for card in cards {
                container.append(card.into());
            }
            log::info!(
                "rendered {} client(s), skipped {}",
                summary.rendered,
                summary.skipped
            );
            Ok(summary)
        }
        Err(err) => {
            container.append(render::error_notice().into());
            log::error!("Error loading client manifest: {}", err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        container::{self, cards, error_notices},
        fetch::Response,
        render::{class, ERROR_MESSAGE},
    };
    use std::cell::{Cell, RefCell};

    thread_local! {
        static RECORDS: RefCell<Vec<(log::Level, String)>> = RefCell::new(Vec::new());
    }

    // Keeps each test thread's records to itself.
    struct Capture;

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            RECORDS.with(|records| {
                records
                    .borrow_mut()
                    .push((record.level(), record.args().to_string()))
            });
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture;

    fn capture_logs() {
        // Only the first test to get here actually installs it.
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Debug);
        RECORDS.with(|records| records.borrow_mut().clear());
    }

    fn errors_logged() -> Vec<String> {
        RECORDS.with(|records| {
            records
                .borrow()
                .iter()
                .filter(|(level, _)| *level == log::Level::Error)
                .map(|(_, msg)| msg.clone())
                .collect()
        })
    }

    struct Canned {
        result: Box<dyn Fn() -> Result<Response, FetchError>>,
        calls: Cell<usize>,
        last_path: Cell<Option<&'static str>>,
    }

    impl Canned {
        fn status(status: u16, body: &'static str) -> Self {
            Self {
                result: Box::new(move || {
                    Ok(Response {
                        status,
                        body: body.to_owned(),
                    })
                }),
                calls: Cell::new(0),
                last_path: Cell::new(None),
            }
        }

        fn ok(body: &'static str) -> Self {
            Self::status(200, body)
        }

        fn broken() -> Self {
            Self {
                result: Box::new(|| {
                    Err(FetchError::BodyRead {
                        url: "http://localhost/api/clients".into(),
                        cause: std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            "connection reset",
                        ),
                    })
                }),
                calls: Cell::new(0),
                last_path: Cell::new(None),
            }
        }
    }

    impl Fetch for Canned {
        fn get(&self, path: &str) -> Result<Response, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if path == MANIFEST_PATH {
                self.last_path.set(Some(MANIFEST_PATH));
            }
            (self.result)()
        }
    }

    static MIXED: &str = r#"[
        {
            "supported": true, "recommended": true,
            "name": "Stable", "description": "Most people want this",
            "screenshots": [{ "width": 300, "height": 200, "src": "/stable.png" }],
            "downloads": ["/stable.zip"]
        },
        {
            "supported": true, "recommended": false,
            "name": "Nightly", "description": "Breaks often",
            "screenshots": [{ "width": 300, "height": 200, "src": "/nightly.png" }],
            "downloads": ["/nightly.zip"]
        },
        {
            "supported": false, "recommended": true,
            "name": "Legacy", "description": "Old but gold",
            "screenshots": [],
            "downloads": []
        },
        {
            "supported": true, "recommended": true,
            "name": "Lite", "description": "For older machines",
            "known_bugs": "No sound on some laptops",
            "screenshots": [{ "width": "50%", "height": "20em", "src": "/lite.png" }],
            "downloads": ["/lite.zip"]
        }
    ]"#;

    fn names(container: &Element) -> Vec<String> {
        cards(container)
            .map(|card| {
                card.child_elements()
                    .find(|child| child.has_class(class::VERSION))
                    .map(Element::text_content)
                    .unwrap_or_default()
            })
            .collect()
    }

    #[test]
    fn renders_eligible_entries_in_order() {
        let fetcher = Canned::ok(MIXED);
        let mut container = container::with_id(container::DEFAULT_ID);
        let summary = load_manifest(&fetcher, &mut container).unwrap();
        assert_eq!(
            summary,
            Summary {
                rendered: 2,
                skipped: 2
            }
        );
        assert_eq!(names(&container), ["Stable", "Lite"]);
        assert_eq!(error_notices(&container).count(), 0);
        assert_eq!(fetcher.calls.get(), 1);
        assert_eq!(fetcher.last_path.get(), Some(MANIFEST_PATH));
    }

    #[test]
    fn warning_only_on_entries_with_known_bugs() {
        let fetcher = Canned::ok(MIXED);
        let mut container = container::with_id(container::DEFAULT_ID);
        load_manifest(&fetcher, &mut container).unwrap();
        let warnings = cards(&container)
            .map(|card| {
                card.child_elements()
                    .find(|child| child.has_class(class::KNOWN_BUGS))
                    .and_then(|warning| warning.attr("title").map(ToOwned::to_owned))
            })
            .collect::<Vec<_>>();
        assert_eq!(
            warnings,
            [None, Some("No sound on some laptops".to_owned())]
        );
    }

    #[test]
    fn no_eligible_entries_leaves_container_empty() {
        let fetcher = Canned::ok(
            r#"[{ "supported": false, "recommended": false, "name": "n", "description": "d" }]"#,
        );
        let mut container = container::with_id(container::DEFAULT_ID);
        let summary = load_manifest(&fetcher, &mut container).unwrap();
        assert_eq!(summary.rendered, 0);
        assert!(container.children().is_empty());
    }

    #[test]
    fn empty_manifest_is_fine() {
        let fetcher = Canned::ok("[]");
        let mut container: Vec<crate::render::Node> = Vec::new();
        assert_eq!(
            load_manifest(&fetcher, &mut container).unwrap(),
            Summary::default()
        );
        assert!(container.is_empty());
    }

    #[test]
    fn server_error_appends_one_notice() {
        let fetcher = Canned::status(500, "Internal Server Error");
        let mut container = container::with_id(container::DEFAULT_ID);
        let err = load_manifest(&fetcher, &mut container).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Status {
                status: 500,
                details: None
            }
        ));
        assert_eq!(container.children().len(), 1);
        assert_eq!(cards(&container).count(), 0);
        let notice = error_notices(&container).next().unwrap();
        assert_eq!(notice.text_content(), ERROR_MESSAGE);
    }

    #[test]
    fn server_error_details_are_kept_out_of_the_page() {
        let fetcher = Canned::status(
            403,
            r#"{ "error": 403, "details": "You are not authorized to perform this action." }"#,
        );
        let mut container = container::with_id(container::DEFAULT_ID);
        let err = load_manifest(&fetcher, &mut container).unwrap_err();
        match &err {
            LoadError::Status { status, details } => {
                assert_eq!(*status, 403);
                assert_eq!(
                    details.as_deref(),
                    Some("You are not authorized to perform this action.")
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("not authorized"));
        assert_eq!(container.text_content(), ERROR_MESSAGE);
    }

    #[test]
    fn malformed_json_appends_one_notice() {
        let fetcher = Canned::ok("[{ \"name\": ");
        let mut container = container::with_id(container::DEFAULT_ID);
        let err = load_manifest(&fetcher, &mut container).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
        assert_eq!(container.children().len(), 1);
        assert_eq!(error_notices(&container).count(), 1);
    }

    #[test]
    fn malformed_json_is_logged_as_an_error() {
        capture_logs();
        let fetcher = Canned::ok("[{ \"name\": ");
        let mut container = container::with_id(container::DEFAULT_ID);
        let err = load_manifest(&fetcher, &mut container).unwrap_err();
        let errors = errors_logged();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Error loading client manifest"));
        assert!(errors[0].contains(&err.to_string()));
    }

    #[test]
    fn successful_load_logs_no_errors() {
        capture_logs();
        let fetcher = Canned::ok(MIXED);
        let mut container = container::with_id(container::DEFAULT_ID);
        load_manifest(&fetcher, &mut container).unwrap();
        assert!(errors_logged().is_empty());
    }

    #[test]
    fn odd_flags_are_just_skipped() {
        let fetcher = Canned::ok(
            r#"[
                {
                    "supported": true, "recommended": true,
                    "name": "Good", "description": "",
                    "screenshots": [{ "width": 1, "height": 1, "src": "/g.png" }],
                    "downloads": ["/g.zip"]
                },
                { "supported": null, "recommended": true, "name": "L", "description": "d" },
                { "supported": "true", "recommended": 1 }
            ]"#,
        );
        let mut container = container::with_id(container::DEFAULT_ID);
        let summary = load_manifest(&fetcher, &mut container).unwrap();
        assert_eq!(
            summary,
            Summary {
                rendered: 1,
                skipped: 2
            }
        );
        assert_eq!(names(&container), ["Good"]);
        assert_eq!(error_notices(&container).count(), 0);
    }

    #[test]
    fn malformed_skipped_entries_are_never_read() {
        let fetcher = Canned::ok(
            r#"[
                { "supported": false, "recommended": true, "screenshots": null },
                { "supported": false, "description": null,
                  "screenshots": [{ "height": 1, "src": "/x.png" }] },
                42,
                {
                    "supported": true, "recommended": true,
                    "name": "Good", "description": "",
                    "screenshots": [{ "width": 1, "height": 1, "src": "/g.png" }],
                    "downloads": ["/g.zip"]
                }
            ]"#,
        );
        let mut container = container::with_id(container::DEFAULT_ID);
        let summary = load_manifest(&fetcher, &mut container).unwrap();
        assert_eq!(summary.skipped, 3);
        assert_eq!(names(&container), ["Good"]);
    }

    #[test]
    fn malformed_eligible_entry_appends_one_notice() {
        let fetcher = Canned::ok(
            r#"[
                {
                    "supported": true, "recommended": true,
                    "name": "Good", "description": "",
                    "screenshots": [{ "width": 1, "height": 1, "src": "/g.png" }],
                    "downloads": ["/g.zip"]
                },
                { "supported": true, "recommended": true, "name": "Bad", "screenshots": null }
            ]"#,
        );
        let mut container = container::with_id(container::DEFAULT_ID);
        let err = load_manifest(&fetcher, &mut container).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { index: 1, .. }));
        assert_eq!(cards(&container).count(), 0);
        assert_eq!(error_notices(&container).count(), 1);
    }

    #[test]
    fn transport_failure_appends_one_notice() {
        let fetcher = Canned::broken();
        let mut container = container::with_id(container::DEFAULT_ID);
        let err = load_manifest(&fetcher, &mut container).unwrap_err();
        assert!(matches!(err, LoadError::Fetch(_)));
        assert_eq!(container.children().len(), 1);
        assert_eq!(error_notices(&container).count(), 1);
    }

    #[test]
    fn shape_failure_discards_earlier_cards() {
        let fetcher = Canned::ok(
            r#"[
                {
                    "supported": true, "recommended": true,
                    "name": "Good", "description": "",
                    "screenshots": [{ "width": 1, "height": 1, "src": "/g.png" }],
                    "downloads": ["/g.zip"]
                },
                {
                    "supported": true, "recommended": true,
                    "name": "Bad", "description": "",
                    "screenshots": [{ "width": 1, "height": 1, "src": "/b.png" }],
                    "downloads": []
                }
            ]"#,
        );
        let mut container = container::with_id(container::DEFAULT_ID);
        let err = load_manifest(&fetcher, &mut container).unwrap_err();
        match err {
            LoadError::Shape { index, cause } => {
                assert_eq!(index, 1);
                assert_eq!(cause, ShapeError::NoDownloads { name: "Bad".into() });
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(cards(&container).count(), 0);
        assert_eq!(error_notices(&container).count(), 1);
    }

    #[test]
    fn loading_twice_appends_twice() {
        let fetcher = Canned::ok(MIXED);
        let mut container = container::with_id(container::DEFAULT_ID);
        load_manifest(&fetcher, &mut container).unwrap();
        load_manifest(&fetcher, &mut container).unwrap();
        assert_eq!(names(&container), ["Stable", "Lite", "Stable", "Lite"]);
        assert_eq!(fetcher.calls.get(), 2);
    }
}
