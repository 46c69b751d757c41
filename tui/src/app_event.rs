use crossterm::event::KeyEvent;
use styler_core::Dataset;
use styler_core::DetailTicket;
use styler_core::ErrorDetail;
use styler_core::FacetKey;
use styler_core::Route;
use styler_core::SourceError;

#[allow(clippy::large_enum_variant)]
#[derive(Debug)]
pub(crate) enum AppEvent {
    /// Both bootstrap resources arrived and facets were derived, or one of
    /// the fetches failed.
    DatasetLoaded(Result<Dataset, SourceError>),

    /// Response to a detail request. Dropped by the presenter when `ticket`
    /// is no longer live.
    DetailLoaded {
        ticket: DetailTicket,
        result: Result<ErrorDetail, String>,
    },

    /// Every key-down event, republished verbatim.
    KeyPress(KeyEvent),

    /// Key-down events that carry a legacy key code (arrows, enter, escape).
    KeyCode(u16),

    /// Flip one facet of the filter selection.
    ToggleFacet(FacetKey),

    /// Change the current location.
    Navigate(Route),

    /// Request to exit the application gracefully.
    ExitRequest,
}
