use std::fmt::Display;

use owo_colors::OwoColorize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Text styling that is only applied when stdout is a colour terminal.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Palette {
    enabled: bool,
}

impl Palette {
    pub(crate) fn for_stdout() -> Self {
        Self {
            enabled: supports_color::on_cached(supports_color::Stream::Stdout).is_some(),
        }
    }

    pub(crate) fn bold(self, text: impl Display) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn dim(self, text: impl Display) -> String {
        if self.enabled {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn green(self, text: impl Display) -> String {
        if self.enabled {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn red(self, text: impl Display) -> String {
        if self.enabled {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Tools joined with `, `, or `-` when there are none.
pub(crate) fn join_tools(tools: &[String]) -> String {
    if tools.is_empty() {
        "-".to_string()
    } else {
        tools.join(", ")
    }
}
