//! Testing utilities and mock implementations.
//!
//! Mocks for every collaborator trait the pipeline consumes, so the whole
//! Orchestrator -> Reconciler -> Namer flow can be exercised without
//! network access or a filesystem.
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_core::testing::{fixtures, MockSourceAdapter};
//!
//! let flaky = MockSourceAdapter::new("alpha")
//!     .fail_times(2, || SourceError::TransientNetwork("reset".into()))
//!     .succeed_with(fixtures::record("Some title"));
//! let calls = flaky.call_counter();
//! ```

mod mock_downstream;
mod mock_notifier;
mod mock_source;

pub use mock_downstream::{Delivery, MockDownstream};
pub use mock_notifier::MockNotifier;
pub use mock_source::{CallCounter, MockSourceAdapter};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::collections::BTreeMap;

    use crate::record::SourceRecord;

    /// A record carrying only a title.
    pub fn record(title: &str) -> SourceRecord {
        SourceRecord {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    /// A record that satisfies the default required fields.
    pub fn complete_record(title: &str, cover: &str) -> SourceRecord {
        SourceRecord {
            title: Some(title.to_string()),
            cover: Some(cover.to_string()),
            plot: Some(format!("Plot of {}", title)),
            genre: Some(vec!["drama".to_string()]),
            publish_date: Some("2020-01-02".to_string()),
            ..Default::default()
        }
    }

    /// A record with a cast and their portraits.
    pub fn cast_record(title: &str, people: &[&str]) -> SourceRecord {
        let pics: BTreeMap<String, String> = people
            .iter()
            .map(|p| (p.to_string(), format!("http://pics/{}.jpg", p)))
            .collect();
        SourceRecord {
            title: Some(title.to_string()),
            people: Some(people.iter().map(|p| p.to_string()).collect()),
            people_pics: Some(pics),
            ..Default::default()
        }
    }
}
