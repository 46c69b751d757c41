use diffy::Patch;
use ratatui::style::Stylize as _;
use ratatui::text::Line;
use ratatui::text::Span;

/// Render a unified diff without file headers. Hunks keep their `@@` line;
/// removed lines are red and added lines green.
pub(crate) fn diff_lines(patch: &str) -> Vec<Line<'static>> {
    match Patch::from_str(patch) {
        Ok(parsed) if !parsed.hunks().is_empty() => {
            let mut lines = Vec::new();
            for hunk in parsed.hunks() {
                let old = hunk.old_range();
                let new = hunk.new_range();
                lines.push(Line::from(
                    format!(
                        "@@ -{},{} +{},{} @@",
                        old.start(),
                        old.len(),
                        new.start(),
                        new.len()
                    )
                    .cyan()
                    .dim(),
                ));
                for line in hunk.lines() {
                    lines.push(match line {
                        diffy::Line::Context(text) => styled_line(" ", text, None),
                        diffy::Line::Delete(text) => styled_line("-", text, Some(false)),
                        diffy::Line::Insert(text) => styled_line("+", text, Some(true)),
                    });
                }
            }
            lines
        }
        Ok(_) => raw_diff_lines(patch),
        Err(err) => {
            tracing::debug!("falling back to raw diff rendering: {err}");
            raw_diff_lines(patch)
        }
    }
}

fn styled_line(sign: &'static str, text: &str, added: Option<bool>) -> Line<'static> {
    let content = format!("{sign}{}", text.trim_end_matches(['\n', '\r']));
    let span: Span<'static> = match added {
        Some(true) => content.green(),
        Some(false) => content.red(),
        None => content.into(),
    };
    Line::from(span)
}

/// Colour lines by their leading character when the patch does not parse.
fn raw_diff_lines(patch: &str) -> Vec<Line<'static>> {
    patch
        .lines()
        .filter(|line| !line.starts_with("---") && !line.starts_with("+++"))
        .map(|line| {
            if line.starts_with("@@") {
                Line::from(line.to_string().cyan().dim())
            } else if let Some(rest) = line.strip_prefix('+') {
                styled_line("+", rest, Some(true))
            } else if let Some(rest) = line.strip_prefix('-') {
                styled_line("-", rest, Some(false))
            } else {
                Line::from(line.to_string())
            }
        })
        .collect()
}
