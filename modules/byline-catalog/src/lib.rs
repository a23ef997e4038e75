//! Author deduplication engine.
//!
//! Resolves noisy per-post author sightings — the same person appearing as
//! `twitter.com/x`, `x.com/x`, a dated blog-post URL, or a bare display name —
//! into one catalog entry per real author, reconciled against the
//! subscription registry.
//!
//! The pipeline is a pure in-memory transform: accumulate sightings per
//! deduplication key, build one entry per accumulator, stub out unmatched
//! subscriptions, then run a second pass that folds name-keyed entries into
//! URL-keyed entries for the same author. `chunked` wraps the same stages in a
//! cooperatively yielding async variant for very large vaults.

pub mod accumulate;
pub mod chunked;
pub mod entry;
pub mod key;
pub mod merge;
pub mod pipeline;
pub mod platform;
pub mod reconcile;
pub mod url;

pub use accumulate::AuthorAccumulator;
pub use chunked::{deduplicate_chunked, ChunkedOptions, Stage, TimerYield, YieldPoint};
pub use key::{generate_author_key, normalize_author_name};
pub use merge::richness_score;
pub use pipeline::{deduplicate, merge};
pub use platform::Platform;
pub use url::{normalize_author_url, NormalizedUrl};
