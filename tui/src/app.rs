use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::execute;
use crossterm::terminal::SetTitle;
use ratatui::buffer::Buffer;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Stylize as _;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use styler_core::AnalyticsEvent;
use styler_core::AnalyticsSink;
use styler_core::DataSource;
use styler_core::DatasetStore;
use styler_core::DetailPresenter;
use styler_core::DetailTicket;
use styler_core::FacetKey;
use styler_core::FilterEngine;
use styler_core::FilteredView;
use styler_core::LoadState;
use styler_core::MatchMode;
use styler_core::Modal;
use styler_core::Navigator;
use styler_core::Route;
use styler_core::SelectionChange;
use styler_core::SortKey;
use styler_core::SortSpec;
use styler_core::Step;
use styler_core::detail::fetch_detail;
use styler_core::store;
use styler_core::store::error_chain;
use tokio::select;
use tokio::sync::mpsc::unbounded_channel;
use tracing::debug;
use tracing::info;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::error_modal::ErrorModal;
use crate::error_table::ErrorTable;
use crate::filter_panel::FilterPanel;
use crate::hint_bar::HintBar;
use crate::keyboard::KEY_LEFT;
use crate::keyboard::KEY_RIGHT;
use crate::keyboard::KeyboardRouter;
use crate::tui::Tui;
use crate::tui::TuiEvent;
use crate::welcome::WelcomeModal;

const FILTER_PANEL_WIDTH: u16 = 38;
const MODAL_PAGE: u16 = 10;

const LIST_HINTS: &[(&str, &str)] = &[
    ("tab", "focus"),
    ("space", "toggle"),
    ("m", "match"),
    ("c", "clear"),
    ("1-4", "sort"),
    ("enter", "open"),
    ("?", "help"),
    ("q", "quit"),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Focus {
    #[default]
    Table,
    Filters,
}

pub(crate) struct AppInit {
    pub(crate) source: Arc<dyn DataSource>,
    pub(crate) match_mode: MatchMode,
    pub(crate) show_welcome: bool,
    pub(crate) route: Route,
    pub(crate) analytics: Option<Box<dyn AnalyticsSink>>,
}

/// Explorer state. Mutated only from the event loop.
pub(crate) struct App {
    app_event_tx: AppEventSender,
    keyboard: KeyboardRouter,
    source: Arc<dyn DataSource>,

    store: DatasetStore,
    filter: FilterEngine,
    sort: SortSpec,
    view: FilteredView,
    navigator: Navigator,
    detail: DetailPresenter,
    analytics: Option<Box<dyn AnalyticsSink>>,

    focus: Focus,
    table: ErrorTable,
    panel: FilterPanel,
    modal_scroll: u16,
    title: Option<String>,
}

impl App {
    pub(crate) async fn run(tui: &mut Tui, init: AppInit) -> Result<()> {
        use tokio_stream::StreamExt;
        let (app_event_tx, mut app_event_rx) = unbounded_channel();
        let mut app = App::new(init, AppEventSender::new(app_event_tx));
        app.start();

        let tui_events = tui.event_stream();
        tokio::pin!(tui_events);

        app.draw(tui)?;
        while select! {
            Some(event) = app_event_rx.recv() => {
                app.handle_event(event)
            }
            Some(event) = tui_events.next() => {
                app.handle_tui_event(event)
            }
            else => false,
        } {
            app.draw(tui)?;
        }
        info!(route = %app.navigator.route(), "explorer closed");
        tui.terminal.clear()?;
        Ok(())
    }

    pub(crate) fn new(init: AppInit, app_event_tx: AppEventSender) -> Self {
        let mut navigator = Navigator::default();
        if init.show_welcome {
            navigator.open_welcome(&FilteredView::default());
        }
        if !init.route.is_list() {
            app_event_tx.send(AppEvent::Navigate(init.route));
        }
        Self {
            keyboard: KeyboardRouter::new(app_event_tx.clone()),
            app_event_tx,
            source: init.source,
            store: DatasetStore::new(),
            filter: FilterEngine::new(init.match_mode),
            sort: SortSpec::default(),
            view: FilteredView::default(),
            navigator,
            detail: DetailPresenter::new(),
            analytics: init.analytics,
            focus: Focus::default(),
            table: ErrorTable::default(),
            panel: FilterPanel::default(),
            modal_scroll: 0,
            title: None,
        }
    }

    /// Kick off the one-time dataset load.
    pub(crate) fn start(&mut self) {
        self.store.begin();
        let source = self.source.clone();
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let result = store::load(source.as_ref()).await;
            tx.send(AppEvent::DatasetLoaded(result));
        });
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        let title = self.navigator.page_title();
        if self.title.as_deref() != Some(title.as_str()) {
            execute!(tui.terminal.backend_mut(), SetTitle(&title))?;
            self.title = Some(title);
        }
        tui.terminal
            .draw(|frame| self.render(frame.area(), frame.buffer_mut()))?;
        Ok(())
    }

    fn handle_tui_event(&mut self, event: TuiEvent) -> bool {
        match event {
            TuiEvent::Key(key_event) => self.keyboard.publish(key_event),
            TuiEvent::Draw => {}
        }
        true
    }

    /// Apply one event. Returns `false` when the app should exit.
    pub(crate) fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::DatasetLoaded(result) => {
                self.store.finish(result);
                self.panel = FilterPanel::new(self.store.dataset());
                self.refresh_view();
            }
            AppEvent::DetailLoaded { ticket, result } => {
                if self.detail.resolve(ticket, result) {
                    self.modal_scroll = self.modal_scroll.min(self.max_modal_scroll());
                }
            }
            AppEvent::KeyPress(key_event) => self.handle_key(key_event),
            AppEvent::KeyCode(KEY_LEFT) => self.step(Step::Previous),
            AppEvent::KeyCode(KEY_RIGHT) => self.step(Step::Next),
            AppEvent::KeyCode(_) => {}
            AppEvent::ToggleFacet(key) => self.toggle_facet(key),
            AppEvent::Navigate(route) => {
                let change = self.navigator.navigate(route, &self.view);
                self.apply_selection_change(change);
            }
            AppEvent::ExitRequest => return false,
        }
        true
    }

    fn handle_key(&mut self, event: KeyEvent) {
        if event.kind == KeyEventKind::Release {
            return;
        }
        if let (KeyModifiers::CONTROL, KeyCode::Char('c')) = (event.modifiers, event.code) {
            self.app_event_tx.send(AppEvent::ExitRequest);
            return;
        }
        match self.navigator.modal() {
            Modal::Welcome => self.handle_welcome_key(event),
            Modal::Error => self.handle_modal_key(event),
            Modal::None => self.handle_list_key(event),
        }
    }

    fn handle_welcome_key(&mut self, event: KeyEvent) {
        match event.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('?') => {
                self.navigator.close_welcome();
            }
            KeyCode::Char('q') => self.app_event_tx.send(AppEvent::ExitRequest),
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, event: KeyEvent) {
        match event.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                let change = self.navigator.dismiss(&self.view);
                self.apply_selection_change(change);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.modal_scroll = self.modal_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll_modal(1),
            KeyCode::PageUp => self.modal_scroll = self.modal_scroll.saturating_sub(MODAL_PAGE),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_modal(MODAL_PAGE),
            KeyCode::Home => self.modal_scroll = 0,
            KeyCode::Char('n') => self.step(Step::Next),
            KeyCode::Char('p') => self.step(Step::Previous),
            KeyCode::Char('?') => self.open_welcome(),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, event: KeyEvent) {
        match event.code {
            KeyCode::Char('q') => self.app_event_tx.send(AppEvent::ExitRequest),
            KeyCode::Char('?') => self.open_welcome(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Table => Focus::Filters,
                    Focus::Filters => Focus::Table,
                };
            }
            KeyCode::Char('m') => {
                self.filter.set_mode(self.filter.mode().toggled());
                self.refresh_view();
            }
            KeyCode::Char('c') => {
                self.filter.clear();
                self.refresh_view();
            }
            KeyCode::Char(digit @ '1'..='4') => {
                let key = digit
                    .to_digit(10)
                    .and_then(|n| SortKey::ALL.get(n as usize - 1).copied());
                if let Some(key) = key {
                    self.sort.sort(key);
                    self.refresh_view();
                }
            }
            _ => match self.focus {
                Focus::Table => self.handle_table_key(event),
                Focus::Filters => self.handle_panel_key(event),
            },
        }
    }

    fn handle_table_key(&mut self, event: KeyEvent) {
        let len = self.view.len();
        match event.code {
            KeyCode::Up | KeyCode::Char('k') => self.table.move_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.table.move_down(1, len),
            KeyCode::PageUp => self.table.move_up(self.table.page_step()),
            KeyCode::PageDown => self.table.move_down(self.table.page_step(), len),
            KeyCode::Home => self.table.set_cursor(0),
            KeyCode::End => self.table.set_cursor(len.saturating_sub(1)),
            KeyCode::Enter => {
                if let Some(id) = self.view.id(self.table.cursor()) {
                    self.app_event_tx.send(AppEvent::Navigate(Route::for_record(id)));
                }
            }
            _ => {}
        }
    }

    fn handle_panel_key(&mut self, event: KeyEvent) {
        match event.code {
            KeyCode::Up | KeyCode::Char('k') => self.panel.move_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.panel.move_down(1),
            KeyCode::PageUp => self.panel.move_up(self.panel.page_step()),
            KeyCode::PageDown => self.panel.move_down(self.panel.page_step()),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some((key, _)) = self.panel.current() {
                    self.app_event_tx.send(AppEvent::ToggleFacet(key.clone()));
                }
            }
            _ => {}
        }
    }

    fn toggle_facet(&mut self, key: FacetKey) {
        let active = self.filter.toggle(key.as_str());
        let label = self.store.dataset().display_name(key.as_str()).to_string();
        debug!(key = %key, active, "facet toggled");
        self.record(AnalyticsEvent::FilterClick {
            key: key.to_string(),
            label,
        });
        self.refresh_view();
    }

    fn step(&mut self, step: Step) {
        if self.navigator.modal() == Modal::Welcome || self.view.is_empty() {
            return;
        }
        self.record(AnalyticsEvent::Shortcut {
            action: step.as_str().to_string(),
        });
        let change = self.navigator.step(step, &self.view);
        self.apply_selection_change(change);
    }

    fn open_welcome(&mut self) {
        let change = self.navigator.open_welcome(&self.view);
        self.apply_selection_change(change);
    }

    /// Recompute the filtered view and re-resolve the selection against it.
    fn refresh_view(&mut self) {
        self.view = FilteredView::compute(self.store.dataset().records(), &self.filter, self.sort);
        self.table.clamp(self.view.len());
        let change = self.navigator.sync(&self.view);
        self.apply_selection_change(change);
    }

    fn apply_selection_change(&mut self, change: Option<SelectionChange>) {
        if let Some(position) = self.navigator.selected() {
            self.table.set_cursor(position);
        }
        let Some(change) = change else {
            return;
        };
        self.modal_scroll = 0;
        match change.current {
            Some(id) => {
                let ticket = self.detail.request(id);
                self.spawn_detail_fetch(ticket);
            }
            None => self.detail.clear(),
        }
        let event = AnalyticsEvent::PageView {
            path: self.navigator.route().to_string(),
            title: self.navigator.page_title(),
        };
        self.record(event);
    }

    fn spawn_detail_fetch(&self, ticket: DetailTicket) {
        let source = self.source.clone();
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let result = fetch_detail(source.as_ref(), &ticket.id)
                .await
                .map_err(|err| error_chain(&err));
            tx.send(AppEvent::DetailLoaded { ticket, result });
        });
    }

    fn record(&mut self, event: AnalyticsEvent) {
        if let Some(sink) = self.analytics.as_mut() {
            sink.record(event);
        }
    }

    fn scroll_modal(&mut self, lines: u16) {
        self.modal_scroll = self
            .modal_scroll
            .saturating_add(lines)
            .min(self.max_modal_scroll());
    }

    fn max_modal_scroll(&self) -> u16 {
        self.error_modal()
            .map(|modal| modal.lines().len().saturating_sub(1))
            .map_or(0, |len| u16::try_from(len).unwrap_or(u16::MAX))
    }

    fn error_modal(&self) -> Option<ErrorModal<'_>> {
        let position = self.navigator.selected()?;
        let record = self
            .view
            .record_index(position)
            .and_then(|index| self.store.dataset().records().get(index))?;
        Some(ErrorModal {
            record,
            dataset: self.store.dataset(),
            presenter: &self.detail,
            position: (position + 1, self.view.len()),
            scroll: self.modal_scroll,
        })
    }

    fn header_line(&self) -> Line<'static> {
        let mut spans = vec![self.navigator.page_title().bold()];
        match self.store.state() {
            LoadState::Ready => {
                let active = self.filter.active_keys().len();
                spans.push(
                    format!(
                        "  {} of {} errors · {active} facets · match {} · sort {}{}",
                        self.view.len(),
                        self.store.dataset().len(),
                        self.filter.mode(),
                        self.sort.key,
                        if self.sort.reverse { " ▼" } else { " ▲" },
                    )
                    .dim(),
                );
            }
            LoadState::Failed(_) => spans.push(format!("  {}", self.store.state()).red()),
            state => spans.push(format!("  {state}").dim()),
        }
        Line::from(spans)
    }

    pub(crate) fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        Paragraph::new(self.header_line()).render(header, buf);
        HintBar::new(LIST_HINTS).render(footer, buf);

        match self.store.state() {
            LoadState::Ready => {
                let [left, right] = Layout::horizontal([
                    Constraint::Length(FILTER_PANEL_WIDTH),
                    Constraint::Min(20),
                ])
                .areas(body);
                self.panel
                    .render(left, buf, &self.filter, self.focus == Focus::Filters);
                self.table.render(
                    right,
                    buf,
                    self.store.dataset().records(),
                    &self.view,
                    self.sort,
                    self.focus == Focus::Table,
                );
            }
            LoadState::Failed(_) => {
                Paragraph::new(vec![
                    Line::from(self.store.state().to_string().red()),
                    Line::from(format!("data: {}", self.source.describe()).dim()),
                ])
                .render(body, buf);
            }
            LoadState::NotLoaded | LoadState::Loading => {
                Paragraph::new(format!("loading {}…", self.source.describe()).dim())
                    .render(body, buf);
            }
        }

        match self.navigator.modal() {
            Modal::Error => {
                if let Some(modal) = self.error_modal() {
                    modal.render(area, buf);
                }
            }
            Modal::Welcome => WelcomeModal.render(area, buf),
            Modal::None => {}
        }
    }
}
