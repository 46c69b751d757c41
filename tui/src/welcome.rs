use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Stylize as _;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;

use crate::error_modal::centered;

const INTRO: &str = "Every row is a real checkstyle violation mined from an open source Java \
project, together with the formatting repair tools that fixed it and those that did not. \
Pick facets on the left to narrow the list, then open an error to see its source, the \
reported violation and the diff of the repair.";

const KEYS: &[(&str, &str)] = &[
    ("tab", "switch between filters and errors"),
    ("space", "toggle the facet under the cursor"),
    ("m", "match all or any active facet"),
    ("c", "clear every facet"),
    ("1-4", "sort by project, id, error type or repairs"),
    ("enter", "open the error under the cursor"),
    ("←/→", "previous or next error"),
    ("esc", "close the error"),
    ("?", "show this help"),
    ("q", "quit"),
];

pub(crate) struct WelcomeModal;

impl WelcomeModal {
    pub(crate) fn lines(width: u16) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from("Styler experiments".bold()), Line::default()];
        let wrap_width = usize::from(width).max(20);
        lines.extend(
            textwrap::wrap(INTRO, wrap_width)
                .into_iter()
                .map(|line| Line::from(line.into_owned())),
        );
        lines.push(Line::default());
        for (key, action) in KEYS {
            lines.push(Line::from(vec![
                format!("{key:>7}  ").cyan().bold(),
                (*action).into(),
            ]));
        }
        lines.push(Line::default());
        lines.push(Line::from("press enter or esc to start".dim()));
        lines
    }
}

impl Widget for WelcomeModal {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered(area, 70, 80);
        Clear.render(popup, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Welcome ".bold());
        let inner = block.inner(popup);
        block.render(popup, buf);
        Paragraph::new(Self::lines(inner.width)).render(inner, buf);
    }
}
