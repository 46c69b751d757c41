use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;

/// One-line footer listing the keys available in the current screen.
#[derive(Clone, Debug, Default)]
pub(crate) struct HintBar {
    hints: Vec<(&'static str, &'static str)>,
}

impl HintBar {
    pub(crate) fn new(hints: &[(&'static str, &'static str)]) -> Self {
        Self {
            hints: hints.to_vec(),
        }
    }

    pub(crate) fn line(&self) -> Line<'static> {
        let mut spans: Vec<Span<'static>> = Vec::with_capacity(self.hints.len() * 3);
        for (index, &(key, action)) in self.hints.iter().enumerate() {
            if index > 0 {
                spans.push("  ".into());
            }
            spans.push(key.cyan().bold());
            spans.push(format!(" {action}").dim());
        }
        Line::from(spans)
    }

    pub(crate) fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || self.hints.is_empty() {
            return;
        }
        Paragraph::new(self.line()).render(Rect { height: 1, ..area }, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hints_are_space_separated() {
        let bar = HintBar::new(&[("←/→", "prev/next"), ("esc", "close")]);
        let text: String = bar
            .line()
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert_eq!(text, "←/→ prev/next  esc close");
    }
}
