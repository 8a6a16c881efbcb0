use crate::ast::{Document, Metadata};
use crate::emit::{emit_html, escape_attr};
use crate::options::{MarkupOptions, PreOptions, RenderMode, TextOptions, wrap_in};
use crate::parser::parse;
use crate::sanitize::{sanitize_input, sanitize_output};
use crate::text::render_text;

/// Renders an already parsed document. Markup output is not sanitized here.
pub fn render(document: &Document, mode: &RenderMode) -> String {
    match mode {
        RenderMode::PlainText(options) => render_text(document, options),
        RenderMode::Markup(options) => emit_html(document, options),
    }
}

/// Chords above lyrics, newline separated.
pub fn to_text(source: &str) -> String {
    let document = parse(source);
    render(&document, &RenderMode::PlainText(TextOptions::default()))
}

pub fn to_text_with_options(source: &str, options: &TextOptions) -> String {
    render(&parse(source), &RenderMode::PlainText(options.clone()))
}

/// The plain-text layout inside a `<pre>`, with `<br/>` line ends.
pub fn to_pre_html(source: &str, options: &PreOptions) -> String {
    let text_options = TextOptions {
        line_end: "<br/>".to_string(),
        chord_formatter: Some(
            options
                .chord_formatter
                .clone()
                .unwrap_or_else(|| wrap_in("b")),
        ),
        title_formatter: Some(
            options
                .title_formatter
                .clone()
                .unwrap_or_else(|| wrap_in("h1")),
        ),
        subtitle_formatter: Some(
            options
                .subtitle_formatter
                .clone()
                .unwrap_or_else(|| wrap_in("h2")),
        ),
    };
    let body = render(&parse(source), &RenderMode::PlainText(text_options));

    let opening = match &options.class {
        Some(class) => format!("<pre class=\"{}\">", escape_attr(class)),
        None => "<pre>".to_string(),
    };
    sanitize_output(&format!("{}{}</pre>", opening, body))
}

/// Structured markup: tags are stripped from `source` before parsing and the
/// result is cleaned again before it is returned.
pub fn to_html(source: &str, options: &MarkupOptions) -> String {
    let clean_source = sanitize_input(source);
    let document = parse(&clean_source);
    let html = render(&document, &RenderMode::Markup(options.clone()));
    sanitize_output(&html)
}

pub fn metadata(source: &str) -> Metadata {
    parse(source).metadata()
}
