use crate::ast::{Document, FlatLine};
use crate::options::{Formatter, TextOptions, apply};

pub(crate) fn render_text(document: &Document, options: &TextOptions) -> String {
    let mut out: Vec<String> = Vec::new();

    if let Some(title) = &document.title {
        out.push(apply(options.title_formatter.as_ref(), title));
    }
    if let Some(subtitle) = &document.subtitle {
        out.push(apply(options.subtitle_formatter.as_ref(), subtitle));
    }
    if !out.is_empty() {
        out.push(String::new());
    }

    for line in &document.lines {
        let flat = line.flatten();
        // Title and subtitle already went into the header.
        if !flat.has_content() {
            continue;
        }
        out.push(render_text_line(
            &flat,
            &options.line_end,
            options.chord_formatter.as_ref(),
        ));
    }

    out.join(&options.line_end)
}

/// Renders one line as an optional chord line above its lyrics.
pub(crate) fn render_text_line(
    line: &FlatLine,
    line_end: &str,
    chord_formatter: Option<&Formatter>,
) -> String {
    let mut text = String::new();

    if !line.chords.is_empty() {
        // Visible width, which differs from `text.len()` once a formatter adds markup.
        let mut width = 0usize;
        for chord in &line.chords {
            if chord.position > width {
                text.push_str(&" ".repeat(chord.position - width));
                width = chord.position;
            }
            text.push_str(&apply(chord_formatter, &chord.text));
            width += chord.width();
        }
    }

    if !line.lyrics.is_empty() || line.chords.is_empty() {
        if !text.is_empty() {
            text.push_str(line_end);
        }
        text.push_str(&line.lyrics);
    }

    text
}
