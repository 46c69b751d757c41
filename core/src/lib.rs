//! Data layer of the styler explorer.
//!
//! Loads the error catalog and its classification taxonomy, derives facets,
//! filters and sorts the records, and drives master/detail navigation. Front
//! ends own an instance of each piece and feed it user input.

pub mod analytics;
pub mod config;
pub mod detail;
pub mod error;
pub mod facets;
pub mod filter;
pub mod model;
pub mod navigation;
pub mod source;
pub mod store;
pub mod taxonomy;
pub mod view;

pub use analytics::AnalyticsEvent;
pub use analytics::AnalyticsSink;
pub use analytics::TracingSink;
pub use config::ConfigOverrides;
pub use config::ExplorerConfig;
pub use detail::DetailPresenter;
pub use detail::DetailStatus;
pub use detail::DetailTicket;
pub use error::SourceError;
pub use filter::FilterEngine;
pub use filter::MatchMode;
pub use model::ErrorDetail;
pub use model::ErrorRecord;
pub use model::FacetKey;
pub use model::RecordId;
pub use navigation::Modal;
pub use navigation::Navigator;
pub use navigation::Route;
pub use navigation::SelectionChange;
pub use navigation::Step;
pub use source::DataSource;
pub use source::DirSource;
pub use source::HttpSource;
pub use source::open_source;
pub use store::Dataset;
pub use store::DatasetStore;
pub use store::LoadState;
pub use taxonomy::Taxonomy;
pub use view::FilteredView;
pub use view::SortKey;
pub use view::SortSpec;
