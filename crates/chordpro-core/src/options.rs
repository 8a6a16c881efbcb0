use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

/// Rewrites a chord, title or subtitle before it is emitted.
pub type Formatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

pub(crate) fn apply(formatter: Option<&Formatter>, text: &str) -> String {
    match formatter {
        Some(format) => format(text),
        None => text.to_string(),
    }
}

pub fn wrap_in(tag: &'static str) -> Formatter {
    Arc::new(move |text: &str| format!("<{tag}>{text}</{tag}>"))
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Layout {
    /// One `linefragment` per shared chord/lyrics column.
    #[default]
    Columns,
    /// One `song-linesegment` per tokenized segment, with block directives.
    Segments,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown layout `{0}` (expected `columns` or `segments`)")]
pub struct UnknownLayout(pub String);

impl FromStr for Layout {
    type Err = UnknownLayout;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "columns" => Ok(Layout::Columns),
            "segments" => Ok(Layout::Segments),
            _ => Err(UnknownLayout(value.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct TextOptions {
    pub line_end: String,
    pub chord_formatter: Option<Formatter>,
    pub title_formatter: Option<Formatter>,
    pub subtitle_formatter: Option<Formatter>,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            line_end: "\n".to_string(),
            chord_formatter: None,
            title_formatter: None,
            subtitle_formatter: None,
        }
    }
}

/// Options for the `<pre>` display rendering. Unset formatters fall back to
/// `<b>` for chords, `<h1>` for the title and `<h2>` for the subtitle.
#[derive(Clone, Default)]
pub struct PreOptions {
    pub class: Option<String>,
    pub chord_formatter: Option<Formatter>,
    pub title_formatter: Option<Formatter>,
    pub subtitle_formatter: Option<Formatter>,
}

#[derive(Clone, Default)]
pub struct MarkupOptions {
    pub layout: Layout,
    /// Class of an enclosing `div`; no wrapper is emitted when unset.
    pub class: Option<String>,
    pub chord_formatter: Option<Formatter>,
    pub title_formatter: Option<Formatter>,
    pub subtitle_formatter: Option<Formatter>,
}

pub enum RenderMode {
    PlainText(TextOptions),
    Markup(MarkupOptions),
}

impl fmt::Debug for TextOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextOptions")
            .field("line_end", &self.line_end)
            .field("chord_formatter", &self.chord_formatter.is_some())
            .field("title_formatter", &self.title_formatter.is_some())
            .field("subtitle_formatter", &self.subtitle_formatter.is_some())
            .finish()
    }
}

impl fmt::Debug for MarkupOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkupOptions")
            .field("layout", &self.layout)
            .field("class", &self.class)
            .field("chord_formatter", &self.chord_formatter.is_some())
            .field("title_formatter", &self.title_formatter.is_some())
            .field("subtitle_formatter", &self.subtitle_formatter.is_some())
            .finish()
    }
}
