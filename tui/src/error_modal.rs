use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Stylize as _;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use styler_core::Dataset;
use styler_core::DetailPresenter;
use styler_core::DetailStatus;
use styler_core::ErrorDetail;
use styler_core::ErrorRecord;
use styler_core::detail::classification_names;
use styler_core::detail::source_lines;

use crate::diff_render::diff_lines;
use crate::hint_bar::HintBar;

const MODAL_HINTS: &[(&str, &str)] = &[
    ("←/→", "previous/next"),
    ("↑/↓", "scroll"),
    ("esc", "close"),
];

/// Detail overlay for the selected error.
pub(crate) struct ErrorModal<'a> {
    pub(crate) record: &'a ErrorRecord,
    pub(crate) dataset: &'a Dataset,
    pub(crate) presenter: &'a DetailPresenter,
    /// One-based position in the filtered view and the view length.
    pub(crate) position: (usize, usize),
    pub(crate) scroll: u16,
}

impl ErrorModal<'_> {
    fn title(&self) -> Line<'static> {
        let (position, len) = self.position;
        Line::from(vec![
            " Dissection of ".into(),
            format!("{} {}", self.record.project_name, self.record.error_id).bold(),
            format!(" ({position}/{len}) ").dim(),
        ])
    }

    pub(crate) fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = self.summary_lines();
        match self.presenter.status() {
            DetailStatus::Loading => lines.push(Line::from("loading…".dim())),
            DetailStatus::Failed(_) => {
                lines.push(Line::from(self.presenter.status().to_string().red()))
            }
            DetailStatus::Idle | DetailStatus::Ready => {}
        }

        let Some(detail) = self.presenter.detail() else {
            return lines;
        };
        if let Some(shown) = self.presenter.shown_id()
            && !self.record.matches(&shown.project, &shown.error_id)
        {
            lines.push(Line::from(format!("showing {shown}").dim().italic()));
        }
        lines.push(Line::default());
        lines.extend(source_section(detail));
        for (label, patch) in detail.patches() {
            lines.push(Line::default());
            lines.push(Line::from(vec!["Diff ".bold(), format!("({label})").dim()]));
            lines.extend(diff_lines(patch));
        }
        lines
    }

    fn summary_lines(&self) -> Vec<Line<'static>> {
        let record = self.record;
        let mut lines = vec![Line::from(vec![
            "Error type       ".dim(),
            record.error_type.clone().into(),
        ])];
        lines.push(tool_line("Repaired by      ", &record.repaired_by, true));
        lines.push(tool_line("Not repaired by  ", &record.not_repaired_by, false));

        let names = classification_names(record, self.dataset);
        let mut current: Option<&str> = None;
        let mut spans: Vec<Span<'static>> = Vec::new();
        for name in &names {
            if current != Some(name.category.as_str()) {
                if !spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut spans)));
                }
                current = Some(name.category.as_str());
                spans.push(format!("{:<17}", name.category).dim());
            } else {
                spans.push(", ".dim());
            }
            spans.push(name.name.clone().into());
        }
        if !spans.is_empty() {
            lines.push(Line::from(spans));
        }
        lines
    }
}

fn tool_line(label: &'static str, tools: &[String], repaired: bool) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = vec![label.dim()];
    if tools.is_empty() {
        spans.push("none".dim());
    }
    for (index, tool) in tools.iter().enumerate() {
        if index > 0 {
            spans.push(", ".into());
        }
        spans.push(if repaired {
            tool.clone().green()
        } else {
            tool.clone().red()
        });
    }
    Line::from(spans)
}

fn source_section(detail: &ErrorDetail) -> Vec<Line<'static>> {
    let mut header = vec!["Source".bold()];
    if let Some(path) = detail.relative_path.as_deref() {
        header.push(format!("  {path}").dim());
    }
    let mut lines = vec![Line::from(header)];
    for line in source_lines(detail) {
        let number = format!("{:>5} ", line.number);
        lines.push(if line.reported {
            Line::from(vec![
                number.red().bold(),
                "› ".red(),
                line.text.to_string().into(),
            ])
        } else {
            Line::from(vec![number.dim(), "│ ".dim(), line.text.to_string().into()])
        });
    }
    for error in &detail.information.errors {
        let mut text = format!("line {}", error.line);
        if let Some(column) = error.column {
            text.push_str(&format!(":{column}"));
        }
        if let Some(message) = error.message.as_deref() {
            text.push_str(&format!("  {message}"));
        }
        lines.push(Line::from(text.red()));
    }
    lines
}

impl Widget for ErrorModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered(area, 90, 90);
        Clear.render(popup, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .title_bottom(HintBar::new(MODAL_HINTS).line());
        let inner = block.inner(popup);
        block.render(popup, buf);
        Paragraph::new(self.lines())
            .scroll((self.scroll, 0))
            .render(inner, buf);
    }
}

/// `percent_x` by `percent_y` rectangle centred in `area`.
pub(crate) fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = scale(area.width, percent_x);
    let height = scale(area.height, percent_y);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn scale(length: u16, percent: u16) -> u16 {
    let scaled = u32::from(length) * u32::from(percent.min(100)) / 100;
    u16::try_from(scaled).unwrap_or(length)
}
