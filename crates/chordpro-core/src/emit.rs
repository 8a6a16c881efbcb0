use crate::ast::{Document, DirectiveKind, Line, SegmentKind};
use crate::layout::columns;
use crate::options::{Layout, MarkupOptions, apply};

/// Class names shared with the stylesheets.
pub mod class {
    pub const TITLE_SECTION: &str = "song-title-section";
    pub const TITLE: &str = "song-title";
    pub const SUBTITLE: &str = "song-subtitle";
    pub const COMMENT: &str = "song-comment";
    pub const DIRECTIVE: &str = "song-directive";

    pub const LINE: &str = "line";
    pub const LINE_FRAGMENT: &str = "linefragment";
    pub const CHORD: &str = "chord";
    pub const LYRICS: &str = "lyrics";

    pub const SONG_LINE: &str = "song-line";
    pub const SONG_LINE_SEGMENT: &str = "song-linesegment";
    pub const SONG_CHORD: &str = "song-chord";
    pub const SONG_LYRICS: &str = "song-lyrics";
    pub const SONG_LYRICS_WHITESPACE: &str = "song-lyrics-whitespace";

    pub const CHORUS: &str = "song-chorus";
    pub const HIGHLIGHT: &str = "song-highlight";
    pub const TAB: &str = "song-tab";

    pub const ALL: &[&str] = &[
        TITLE_SECTION,
        TITLE,
        SUBTITLE,
        COMMENT,
        DIRECTIVE,
        LINE,
        LINE_FRAGMENT,
        CHORD,
        LYRICS,
        SONG_LINE,
        SONG_LINE_SEGMENT,
        SONG_CHORD,
        SONG_LYRICS,
        SONG_LYRICS_WHITESPACE,
        CHORUS,
        HIGHLIGHT,
        TAB,
    ];
}

const NBSP: &str = "&nbsp;";

/// Emits un-sanitized markup. Text is copied as-is, so `document` should come
/// from sanitized input.
pub fn emit_html(document: &Document, options: &MarkupOptions) -> String {
    let mut writer = HtmlWriter::new();
    if let Some(wrapper) = &options.class {
        writer.open("div", wrapper);
    }
    match options.layout {
        Layout::Columns => emit_columns(&mut writer, document, options),
        Layout::Segments => emit_segments(&mut writer, document, options),
    }
    if options.class.is_some() {
        writer.close("div");
    }
    writer.finish()
}

struct HtmlWriter {
    out: String,
}

impl HtmlWriter {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn open(&mut self, tag: &str, class: &str) {
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push_str(" class=\"");
        self.out.push_str(&escape_attr(class));
        self.out.push_str("\">");
    }

    fn close(&mut self, tag: &str) {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    fn element(&mut self, tag: &str, class: &str, content: &str) {
        self.open(tag, class);
        self.out.push_str(content);
        self.close(tag);
    }

    fn finish(self) -> String {
        self.out
    }
}

fn emit_columns(writer: &mut HtmlWriter, document: &Document, options: &MarkupOptions) {
    if document.title.is_some() || document.subtitle.is_some() {
        writer.open("div", class::TITLE_SECTION);
        if let Some(title) = &document.title {
            let title = apply(options.title_formatter.as_ref(), title);
            writer.element("div", class::TITLE, &title);
        }
        if let Some(subtitle) = &document.subtitle {
            let subtitle = apply(options.subtitle_formatter.as_ref(), subtitle);
            writer.element("div", class::SUBTITLE, &subtitle);
        }
        writer.close("div");
    }

    for line in &document.lines {
        let flat = line.flatten();
        let cols = columns(&flat);
        // Blank and directive-only lines have no columns and no markup.
        if cols.is_empty() {
            continue;
        }
        let has_chords = !flat.chords.is_empty();

        writer.open("div", class::LINE);
        for col in &cols {
            writer.open("div", class::LINE_FRAGMENT);
            if has_chords {
                let chord = col
                    .chord
                    .map(|chord| apply(options.chord_formatter.as_ref(), chord))
                    .unwrap_or_else(|| NBSP.to_string());
                writer.element("div", class::CHORD, &chord);
            }
            writer.element("div", class::LYRICS, col.lyrics.unwrap_or(NBSP));
            writer.close("div");
        }
        writer.close("div");
    }
}

fn emit_segments(writer: &mut HtmlWriter, document: &Document, options: &MarkupOptions) {
    let mut open_blocks = 0;
    for line in &document.lines {
        emit_segment_line(writer, line, options, &mut open_blocks);
    }
    if open_blocks > 0 {
        log::debug!("closing {} block(s) left open at end of document", open_blocks);
    }
    for _ in 0..open_blocks {
        writer.close("div");
    }
}

fn emit_segment_line(
    writer: &mut HtmlWriter,
    line: &Line,
    options: &MarkupOptions,
    open_blocks: &mut usize,
) {
    let has_chords = line.has_chords();
    // Segment nodes of the current `song-line`, flushed around block directives.
    let mut pending = HtmlWriter::new();

    for segment in &line.segments {
        match &segment.kind {
            SegmentKind::Blank => {
                pending.open("span", class::SONG_LINE_SEGMENT);
                pending.element("span", class::SONG_LYRICS, NBSP);
                pending.close("span");
            }
            SegmentKind::Directive { kind, value } => {
                if let Some((block_class, opens)) = block_directive(kind) {
                    flush_line(writer, &mut pending);
                    if opens {
                        writer.open("div", block_class);
                        *open_blocks += 1;
                    } else if *open_blocks > 0 {
                        writer.close("div");
                        *open_blocks -= 1;
                    } else {
                        log::debug!("ignoring {} with no open block", kind.key());
                    }
                    continue;
                }
                let (inline_class, content) = match kind {
                    DirectiveKind::Title => (
                        class::TITLE.to_string(),
                        apply(options.title_formatter.as_ref(), value),
                    ),
                    DirectiveKind::Subtitle => (
                        class::SUBTITLE.to_string(),
                        apply(options.subtitle_formatter.as_ref(), value),
                    ),
                    DirectiveKind::Comment => (class::COMMENT.to_string(), value.clone()),
                    other => (
                        format!(
                            "{} {}-{}",
                            class::DIRECTIVE,
                            class::DIRECTIVE,
                            class_token(other.key())
                        ),
                        value.clone(),
                    ),
                };
                pending.open("span", class::SONG_LINE_SEGMENT);
                pending.element("span", &inline_class, &content);
                pending.close("span");
            }
            SegmentKind::Fragment { chord, lyrics } => {
                pending.open("span", class::SONG_LINE_SEGMENT);
                if has_chords {
                    let chord = chord
                        .as_deref()
                        .map(|chord| apply(options.chord_formatter.as_ref(), chord))
                        .unwrap_or_else(|| NBSP.to_string());
                    pending.element("span", class::SONG_CHORD, &chord);
                }
                if let Some(lyrics) = lyrics {
                    if lyrics.chars().all(char::is_whitespace) {
                        let classes = format!(
                            "{} {}",
                            class::SONG_LYRICS,
                            class::SONG_LYRICS_WHITESPACE
                        );
                        pending.element("span", &classes, lyrics);
                    } else {
                        pending.element("span", class::SONG_LYRICS, lyrics);
                    }
                }
                pending.close("span");
            }
        }
    }

    flush_line(writer, &mut pending);
}

fn flush_line(writer: &mut HtmlWriter, pending: &mut HtmlWriter) {
    if pending.out.is_empty() {
        return;
    }
    writer.open("span", class::SONG_LINE);
    writer.out.push_str(&pending.out);
    writer.close("span");
    pending.out.clear();
}

/// Container class for chorus, highlight and tab directives, and whether the directive opens it.
fn block_directive(kind: &DirectiveKind) -> Option<(&'static str, bool)> {
    match kind {
        DirectiveKind::StartOfChorus => Some((class::CHORUS, true)),
        DirectiveKind::EndOfChorus => Some((class::CHORUS, false)),
        DirectiveKind::StartOfHighlight => Some((class::HIGHLIGHT, true)),
        DirectiveKind::EndOfHighlight => Some((class::HIGHLIGHT, false)),
        DirectiveKind::StartOfTab => Some((class::TAB, true)),
        DirectiveKind::EndOfTab => Some((class::TAB, false)),
        _ => None,
    }
}

/// Reduces a directive key to a single class-name token.
fn class_token(key: &str) -> String {
    key.chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '-'
            }
        })
        .collect()
}

pub(crate) fn escape_attr(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{class_token, emit_html};
    use crate::options::{Layout, MarkupOptions};
    use crate::parser::parse;

    fn segments() -> MarkupOptions {
        MarkupOptions {
            layout: Layout::Segments,
            ..Default::default()
        }
    }

    #[test]
    fn columns_emit_title_section_and_cells() {
        let html = emit_html(&parse("{t: Song}\n[C]one"), &MarkupOptions::default());
        assert_eq!(
            html,
            "<div class=\"song-title-section\"><div class=\"song-title\">Song</div></div>\
             <div class=\"line\"><div class=\"linefragment\"><div class=\"chord\">C</div>\
             <div class=\"lyrics\">one</div></div></div>"
        );
    }

    #[test]
    fn segments_render_title_inline() {
        let html = emit_html(&parse("{t: The Title}"), &segments());
        assert_eq!(
            html,
            "<span class=\"song-line\"><span class=\"song-linesegment\">\
             <span class=\"song-title\">The Title</span></span></span>"
        );
    }

    #[test]
    fn segments_without_chords_have_no_chord_cells() {
        let html = emit_html(&parse("Lyrics"), &segments());
        assert_eq!(
            html,
            "<span class=\"song-line\"><span class=\"song-linesegment\">\
             <span class=\"song-lyrics\">Lyrics</span></span></span>"
        );
    }

    #[test]
    fn segments_give_every_segment_a_chord_cell_once_a_chord_exists() {
        let html = emit_html(&parse("Lyrics [C]here"), &segments());
        assert_eq!(
            html,
            "<span class=\"song-line\">\
             <span class=\"song-linesegment\"><span class=\"song-chord\">&nbsp;</span>\
             <span class=\"song-lyrics\">Lyrics</span></span>\
             <span class=\"song-linesegment\"><span class=\"song-chord\">&nbsp;</span>\
             <span class=\"song-lyrics song-lyrics-whitespace\"> </span></span>\
             <span class=\"song-linesegment\"><span class=\"song-chord\">C</span>\
             <span class=\"song-lyrics\">here</span></span>\
             </span>"
        );
    }

    #[test]
    fn block_directives_sit_outside_line_wrappers() {
        let html = emit_html(&parse("{soc}\nla\n{eoc}"), &segments());
        assert_eq!(
            html,
            "<div class=\"song-chorus\"><span class=\"song-line\"><span class=\"song-linesegment\">\
             <span class=\"song-lyrics\">la</span></span></span></div>"
        );
    }

    #[test]
    fn unmatched_block_directives_keep_markup_balanced() {
        let html = emit_html(&parse("{eot}\n{soc}\nla"), &segments());
        assert_eq!(
            html,
            "<div class=\"song-chorus\"><span class=\"song-line\"><span class=\"song-linesegment\">\
             <span class=\"song-lyrics\">la</span></span></span></div>"
        );
    }

    #[test]
    fn blank_line_renders_placeholder_in_segments() {
        let html = emit_html(&parse(""), &segments());
        assert_eq!(
            html,
            "<span class=\"song-line\"><span class=\"song-linesegment\">\
             <span class=\"song-lyrics\">&nbsp;</span></span></span>"
        );
    }

    #[test]
    fn wrapper_class_encloses_output() {
        let options = MarkupOptions {
            class: Some("song".to_string()),
            ..Default::default()
        };
        assert_eq!(
            emit_html(&parse("la"), &options),
            "<div class=\"song\"><div class=\"line\"><div class=\"linefragment\">\
             <div class=\"lyrics\">la</div></div></div></div>"
        );
    }

    #[test]
    fn directive_keys_become_class_tokens() {
        assert_eq!(class_token("capo"), "capo");
        assert_eq!(class_token("new song\"x"), "new-song-x");
    }
}
