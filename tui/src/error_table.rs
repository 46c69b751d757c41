use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Stylize as _;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use styler_core::ErrorRecord;
use styler_core::FilteredView;
use styler_core::SortKey;
use styler_core::SortSpec;
use unicode_width::UnicodeWidthStr;

use crate::filter_panel::truncate;
use crate::render::virtual_list::ListAdapter;
use crate::render::virtual_list::ListViewport;

const PROJECT_WIDTH: usize = 28;
const ID_WIDTH: usize = 6;
const TYPE_WIDTH: usize = 30;

/// Cursor and scroll position over the filtered view.
#[derive(Debug, Default)]
pub(crate) struct ErrorTable {
    cursor: usize,
    viewport: ListViewport,
    page_height: u16,
}

impl ErrorTable {
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    /// Keep the cursor inside a view of `len` rows.
    pub(crate) fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub(crate) fn move_down(&mut self, steps: usize, len: usize) {
        self.cursor = self.cursor.saturating_add(steps).min(len.saturating_sub(1));
    }

    pub(crate) fn move_up(&mut self, steps: usize) {
        self.cursor = self.cursor.saturating_sub(steps);
    }

    /// Rows visible at the last render.
    pub(crate) fn page_step(&self) -> usize {
        usize::from(self.page_height).max(1)
    }

    pub(crate) fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        records: &[ErrorRecord],
        view: &FilteredView,
        sort: SortSpec,
        focused: bool,
    ) {
        let title = Line::from(vec![
            " Errors ".bold(),
            format!("{} of {} ", view.len(), records.len()).dim(),
        ]);
        let block = Block::default().borders(Borders::ALL).title(title);
        let block = if focused { block.cyan() } else { block.dim() };
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        Paragraph::new(header_line(sort)).render(Rect { height: 1, ..inner }, buf);
        let body = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };
        self.page_height = body.height;
        if view.is_empty() {
            Paragraph::new("no errors match the active filters".dim()).render(body, buf);
            return;
        }
        let adapter = TableRows {
            records,
            view,
            focused,
        };
        self.viewport.render(&adapter, Some(self.cursor), body, buf);
    }
}

struct TableRows<'a> {
    records: &'a [ErrorRecord],
    view: &'a FilteredView,
    focused: bool,
}

impl ListAdapter for TableRows<'_> {
    fn len(&self) -> usize {
        self.view.len()
    }

    fn render_item(&self, index: usize, area: Rect, buf: &mut Buffer, highlighted: bool) {
        let Some(record) = self
            .view
            .record_index(index)
            .and_then(|row| self.records.get(row))
        else {
            return;
        };
        let line = format_row(record, highlighted && self.focused);
        Paragraph::new(line).render(area, buf);
    }
}

fn header_line(sort: SortSpec) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = vec!["  ".into()];
    let columns = [
        (SortKey::Project, PROJECT_WIDTH),
        (SortKey::ErrorId, ID_WIDTH),
        (SortKey::ErrorType, TYPE_WIDTH),
        (SortKey::RepairedBy, 0),
    ];
    for (number, (key, width)) in columns.into_iter().enumerate() {
        let arrow = match (sort.key == key, sort.reverse) {
            (true, false) => " ▲",
            (true, true) => " ▼",
            (false, _) => "",
        };
        let label = format!("{}:{}{arrow}", number + 1, key.title());
        let label = if width > 0 { pad(&label, width) } else { label };
        spans.push(if sort.key == key {
            label.bold()
        } else {
            label.dim()
        });
        spans.push(" ".into());
    }
    Line::from(spans)
}

fn format_row(record: &ErrorRecord, highlighted: bool) -> Line<'static> {
    let marker: Span<'static> = if highlighted { "› ".cyan() } else { "  ".into() };
    let project = pad(&record.project_name, PROJECT_WIDTH);
    let id = pad(&record.error_id, ID_WIDTH);
    let error_type = pad(record.exception_name(), TYPE_WIDTH);
    let mut spans = vec![
        marker,
        if highlighted {
            project.bold()
        } else {
            project.into()
        },
        " ".into(),
        id.dim(),
        " ".into(),
        error_type.into(),
        " ".into(),
    ];
    for tool in &record.repaired_by {
        spans.push(tool.clone().green());
        spans.push(" ".into());
    }
    for tool in &record.not_repaired_by {
        spans.push(format!("¬{tool}").red().dim());
        spans.push(" ".into());
    }
    Line::from(spans)
}

/// Truncate or pad `text` to exactly `width` columns.
fn pad(text: &str, width: usize) -> String {
    let mut out = truncate(text, width);
    let used = out.width();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}
