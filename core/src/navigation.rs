//! Master/detail navigation.
//!
//! The navigator owns the current [`Route`] and the selection it resolves to
//! within the current [`FilteredView`]. Every transition goes through the route:
//! activating a row, stepping next/previous and dismissing the error modal all
//! navigate, and [`Navigator::sync`] re-resolves the selection against the view
//! it is given. Callers pass the live view on every call so a selection index
//! never outlives the view it was resolved against.

use std::fmt;

use crate::model::RecordId;
use crate::view::FilteredView;

pub const LIST_TITLE: &str = "Styler experiments";

const ERROR_SEGMENT: &str = "error";

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    List,
    Error {
        project: String,
        error_id: String,
    },
}

impl Route {
    /// Parse a location path. Hash-routed links (`#/error/...`) are accepted and
    /// anything unrecognised maps to the list.
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        let path = path.strip_prefix('#').unwrap_or(path);
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(ERROR_SEGMENT), Some(project), Some(error_id), None) => Route::Error {
                project: project.to_string(),
                error_id: error_id.to_string(),
            },
            _ => Route::List,
        }
    }

    pub fn for_record(id: &RecordId) -> Self {
        Route::Error {
            project: id.project.clone(),
            error_id: id.error_id.clone(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Route::List)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::List => f.write_str("/"),
            Route::Error { project, error_id } => {
                write!(f, "/{ERROR_SEGMENT}/{project}/{error_id}")
            }
        }
    }
}

/// Position in `view` of the record `route` points at.
pub fn resolve_selection(view: &FilteredView, route: &Route) -> Option<usize> {
    match route {
        Route::List => None,
        Route::Error { project, error_id } => view.position_of(project, error_id),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    None,
    Error,
    Welcome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Next => "next",
            Step::Previous => "previous",
        }
    }

    /// Target position for a view of `len` rows, wrapping at both ends.
    pub fn target(self, current: Option<usize>, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(match (self, current) {
            (Step::Next, Some(index)) => (index + 1) % len,
            (Step::Previous, Some(index)) => (index + len - 1) % len,
            (Step::Next, None) => 0,
            (Step::Previous, None) => len - 1,
        })
    }
}

/// The selected record identity changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<RecordId>,
    pub current: Option<RecordId>,
}

#[derive(Clone, Debug, Default)]
pub struct Navigator {
    route: Route,
    selected: Option<usize>,
    selected_id: Option<RecordId>,
    welcome_open: bool,
}

impl Navigator {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            ..Self::default()
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_id(&self) -> Option<&RecordId> {
        self.selected_id.as_ref()
    }

    pub fn modal(&self) -> Modal {
        if self.welcome_open {
            Modal::Welcome
        } else if self.selected.is_some() {
            Modal::Error
        } else {
            Modal::None
        }
    }

    pub fn page_title(&self) -> String {
        match &self.selected_id {
            Some(id) => format!("Dissection of {} {}", id.project, id.error_id),
            None => LIST_TITLE.to_string(),
        }
    }

    /// Re-resolve the selection against `view`. Call after any change to the
    /// records, the filter or the sort.
    pub fn sync(&mut self, view: &FilteredView) -> Option<SelectionChange> {
        self.selected = resolve_selection(view, &self.route);
        let current = self
            .selected
            .and_then(|position| view.id(position))
            .cloned();
        if current.is_some() {
            self.welcome_open = false;
        }
        if current == self.selected_id {
            return None;
        }
        let previous = std::mem::replace(&mut self.selected_id, current.clone());
        Some(SelectionChange { previous, current })
    }

    pub fn navigate(&mut self, route: Route, view: &FilteredView) -> Option<SelectionChange> {
        self.route = route;
        self.sync(view)
    }

    /// Open the row at `position` of `view`.
    pub fn activate(&mut self, position: usize, view: &FilteredView) -> Option<SelectionChange> {
        let route = Route::for_record(view.id(position)?);
        self.navigate(route, view)
    }

    pub fn step(&mut self, step: Step, view: &FilteredView) -> Option<SelectionChange> {
        let target = step.target(self.selected, view.len())?;
        self.activate(target, view)
    }

    pub fn next(&mut self, view: &FilteredView) -> Option<SelectionChange> {
        self.step(Step::Next, view)
    }

    pub fn previous(&mut self, view: &FilteredView) -> Option<SelectionChange> {
        self.step(Step::Previous, view)
    }

    /// Close the error modal. Explicit close and escape share this path.
    pub fn dismiss(&mut self, view: &FilteredView) -> Option<SelectionChange> {
        self.navigate(Route::List, view)
    }

    /// Show the welcome overlay, dismissing an open error modal first.
    pub fn open_welcome(&mut self, view: &FilteredView) -> Option<SelectionChange> {
        let change = if self.route.is_list() {
            None
        } else {
            self.dismiss(view)
        };
        self.welcome_open = true;
        change
    }

    pub fn close_welcome(&mut self) {
        self.welcome_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets;
    use crate::filter::FilterEngine;
    use crate::model::ErrorRecord;
    use crate::view::SortSpec;
    use pretty_assertions::assert_eq;

    fn records() -> Vec<ErrorRecord> {
        let mut records = vec![
            ErrorRecord::new("A", "1", "x.Foo"),
            ErrorRecord::new("A", "2", "x.Bar"),
            ErrorRecord::new("B", "3", "x.Foo"),
        ];
        facets::derive(&mut records);
        records
    }

    fn view_of(records: &[ErrorRecord], filter: &FilterEngine) -> FilteredView {
        FilteredView::compute(records, filter, SortSpec::default())
    }

    #[test]
    fn route_round_trips_through_display() {
        assert_eq!(Route::parse("/"), Route::List);
        assert_eq!(Route::parse(""), Route::List);
        assert_eq!(Route::parse("/elsewhere"), Route::List);
        assert_eq!(Route::parse("/error/p/1/extra"), Route::List);
        let route = Route::parse("#/error/h2database-h2database/62");
        assert_eq!(
            route,
            Route::Error {
                project: "h2database-h2database".to_string(),
                error_id: "62".to_string(),
            }
        );
        assert_eq!(route.to_string(), "/error/h2database-h2database/62");
        assert_eq!(Route::parse(&route.to_string()), route);
    }

    #[test]
    fn resolution_is_pure() {
        let records = records();
        let view = view_of(&records, &FilterEngine::default());
        let route = Route::parse("/error/A/2");
        assert_eq!(resolve_selection(&view, &route), Some(1));
        assert_eq!(resolve_selection(&view, &route), Some(1));
        assert_eq!(resolve_selection(&view, &Route::parse("/error/C/9")), None);
        assert_eq!(resolve_selection(&view, &Route::List), None);
    }

    #[test]
    fn next_wraps_from_last_to_first() {
        let records = records();
        let view = view_of(&records, &FilterEngine::default());
        let mut navigator = Navigator::new(Route::parse("/error/B/3"));
        navigator.sync(&view);
        assert_eq!(navigator.selected(), Some(2));

        let change = navigator.next(&view).expect("selection changes");
        assert_eq!(change.previous, Some(RecordId::new("B", "3")));
        assert_eq!(change.current, Some(RecordId::new("A", "1")));
        assert_eq!(navigator.selected(), Some(0));
        assert_eq!(navigator.route().to_string(), "/error/A/1");

        navigator.previous(&view);
        assert_eq!(navigator.selected(), Some(2));
    }

    #[test]
    fn stepping_without_selection_or_rows() {
        assert_eq!(Step::Next.target(None, 3), Some(0));
        assert_eq!(Step::Previous.target(None, 3), Some(2));
        assert_eq!(Step::Next.target(Some(0), 0), None);
        assert_eq!(Step::Previous.target(Some(0), 1), Some(0));

        let mut navigator = Navigator::default();
        assert_eq!(navigator.next(&FilteredView::default()), None);
        assert_eq!(navigator.modal(), Modal::None);
    }

    #[test]
    fn filter_change_resolves_against_current_view() {
        let records = records();
        let mut filter = FilterEngine::default();
        let mut navigator = Navigator::default();
        navigator.activate(1, &view_of(&records, &filter));
        assert_eq!(navigator.modal(), Modal::Error);
        assert_eq!(navigator.page_title(), "Dissection of A 2");

        filter.toggle("B");
        let change = navigator
            .sync(&view_of(&records, &filter))
            .expect("selection filtered out");
        assert_eq!(change.current, None);
        assert_eq!(navigator.selected(), None);
        assert_eq!(navigator.modal(), Modal::None);
        assert_eq!(navigator.page_title(), LIST_TITLE);

        filter.toggle("B");
        navigator.sync(&view_of(&records, &filter));
        assert_eq!(navigator.selected(), Some(1));
    }

    #[test]
    fn welcome_and_error_modals_never_overlap() {
        let records = records();
        let view = view_of(&records, &FilterEngine::default());
        let mut navigator = Navigator::default();
        navigator.activate(0, &view);

        let change = navigator.open_welcome(&view).expect("error modal dismissed");
        assert_eq!(change.current, None);
        assert_eq!(navigator.route(), &Route::List);
        assert_eq!(navigator.modal(), Modal::Welcome);

        navigator.activate(2, &view);
        assert_eq!(navigator.modal(), Modal::Error);

        navigator.dismiss(&view);
        assert_eq!(navigator.modal(), Modal::None);
        assert_eq!(navigator.route(), &Route::List);
    }

    #[test]
    fn sync_reports_identity_changes_only() {
        let records = records();
        let view = view_of(&records, &FilterEngine::default());
        let mut navigator = Navigator::new(Route::parse("/error/A/1"));
        assert!(navigator.sync(&view).is_some());
        assert!(navigator.sync(&view).is_none());
        assert!(navigator.navigate(Route::parse("/error/A/1"), &view).is_none());
    }
}
