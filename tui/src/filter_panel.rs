use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Stylize as _;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use styler_core::Dataset;
use styler_core::FacetKey;
use styler_core::FilterEngine;
use unicode_width::UnicodeWidthStr;

use crate::render::virtual_list::ListAdapter;
use crate::render::virtual_list::ListViewport;

#[derive(Clone, Debug, PartialEq, Eq)]
enum PanelRow {
    Category(String),
    Group(String),
    Facet {
        key: FacetKey,
        name: String,
        count: usize,
    },
}

/// Taxonomy rendered as a list of toggleable facets.
#[derive(Debug, Default)]
pub(crate) struct FilterPanel {
    rows: Vec<PanelRow>,
    cursor: usize,
    viewport: ListViewport,
    page_height: u16,
}

impl FilterPanel {
    pub(crate) fn new(dataset: &Dataset) -> Self {
        let mut rows = Vec::new();
        for (category, groups) in dataset.taxonomy().categories() {
            rows.push(PanelRow::Category(category.to_string()));
            for (label, group) in groups {
                rows.push(PanelRow::Group(label.clone()));
                rows.extend(group.iter().map(|(key, facet)| PanelRow::Facet {
                    key: key.clone(),
                    name: facet.display().to_string(),
                    count: dataset.count(key.as_str()),
                }));
            }
        }
        let cursor = rows
            .iter()
            .position(|row| matches!(row, PanelRow::Facet { .. }))
            .unwrap_or(0);
        Self {
            rows,
            cursor,
            viewport: ListViewport::default(),
            page_height: 0,
        }
    }

    pub(crate) fn current(&self) -> Option<(&FacetKey, &str)> {
        match self.rows.get(self.cursor)? {
            PanelRow::Facet { key, name, .. } => Some((key, name.as_str())),
            _ => None,
        }
    }

    pub(crate) fn move_down(&mut self, steps: usize) {
        for _ in 0..steps {
            match self.next_facet(self.cursor + 1..self.rows.len()) {
                Some(index) => self.cursor = index,
                None => break,
            }
        }
    }

    pub(crate) fn move_up(&mut self, steps: usize) {
        for _ in 0..steps {
            match self.next_facet((0..self.cursor).rev()) {
                Some(index) => self.cursor = index,
                None => break,
            }
        }
    }

    fn next_facet(&self, mut range: impl Iterator<Item = usize>) -> Option<usize> {
        range.find(|index| matches!(self.rows.get(*index), Some(PanelRow::Facet { .. })))
    }

    /// Facets visible at the last render.
    pub(crate) fn page_step(&self) -> usize {
        self.viewport
            .page_step(&PanelRows::new(&self.rows), self.page_height)
    }

    pub(crate) fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        filter: &FilterEngine,
        focused: bool,
    ) {
        let active = filter.active_keys().len();
        let mut title = vec![" Filters ".bold(), format!("match {} ", filter.mode()).dim()];
        if active > 0 {
            title.push(format!("· {active} active ").cyan());
        }
        let block = Block::default().borders(Borders::ALL).title(Line::from(title));
        let block = if focused { block.cyan() } else { block.dim() };
        let inner = block.inner(area);
        block.render(area, buf);
        self.page_height = inner.height;

        if self.rows.is_empty() {
            Paragraph::new("no facets".dim()).render(inner, buf);
            return;
        }
        let adapter = PanelRows {
            rows: &self.rows,
            filter: Some(filter),
            focused,
        };
        self.viewport.render(&adapter, Some(self.cursor), inner, buf);
    }
}

struct PanelRows<'a> {
    rows: &'a [PanelRow],
    filter: Option<&'a FilterEngine>,
    focused: bool,
}

impl<'a> PanelRows<'a> {
    fn new(rows: &'a [PanelRow]) -> Self {
        Self {
            rows,
            filter: None,
            focused: false,
        }
    }
}

impl ListAdapter for PanelRows<'_> {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn item_height(&self, index: usize) -> u16 {
        // Categories after the first get a blank line above them.
        match self.rows.get(index) {
            Some(PanelRow::Category(_)) if index > 0 => 2,
            _ => 1,
        }
    }

    fn render_item(&self, index: usize, area: Rect, buf: &mut Buffer, highlighted: bool) {
        let Some(row) = self.rows.get(index) else {
            return;
        };
        let line = match row {
            PanelRow::Category(name) => Line::from(name.clone().bold().underlined()),
            PanelRow::Group(label) => Line::from(vec![" ".into(), label.clone().italic()]),
            PanelRow::Facet { key, name, count } => {
                let active = self
                    .filter
                    .is_some_and(|filter| filter.is_active(key.as_str()));
                format_facet_row(name, *count, active, highlighted && self.focused, area.width)
            }
        };
        let y = area.bottom().saturating_sub(1);
        Paragraph::new(line).render(Rect::new(area.x, y, area.width, 1), buf);
    }
}

fn format_facet_row(
    name: &str,
    count: usize,
    active: bool,
    highlighted: bool,
    width: u16,
) -> Line<'static> {
    let marker: Span<'static> = if highlighted { "›".cyan() } else { " ".into() };
    let checkbox: Span<'static> = if active { "[x]".into() } else { "[ ]".dim() };
    let count = format!(" {count}");
    let used = 6 + count.width();
    let room = usize::from(width).saturating_sub(used);
    let name = truncate(name, room);
    let name = if highlighted { name.bold() } else { name.into() };
    Line::from(vec![marker, " ".into(), checkbox, " ".into(), name, count.dim()])
}

pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}
