use crate::ast::{DirectiveKind, Document, Line, Segment, SegmentKind};
use crate::span::Span;

pub fn parse(source: &str) -> Document {
    let mut lines = Vec::new();
    let mut in_tab = false;

    for raw in source.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if is_comment(raw) {
            continue;
        }

        // Tokenize first so that an end-of-tab line is still recognized.
        let mut line = tokenize_line(raw);
        if in_tab
            && !line
                .directives()
                .any(|(kind, _)| *kind == DirectiveKind::EndOfTab)
        {
            line = Line::verbatim(raw);
        }

        for (kind, _) in line.directives() {
            match kind {
                DirectiveKind::StartOfTab if !in_tab => {
                    log::trace!("tab region opens at line {}", lines.len() + 1);
                    in_tab = true;
                }
                DirectiveKind::EndOfTab if in_tab => {
                    log::trace!("tab region closes at line {}", lines.len() + 1);
                    in_tab = false;
                }
                _ => {}
            }
        }
        lines.push(line);
    }

    if in_tab {
        log::debug!("tab region left open at end of document");
    }

    let title = first_directive_value(&lines, &DirectiveKind::Title);
    let subtitle = first_directive_value(&lines, &DirectiveKind::Subtitle);
    log::trace!(
        "parsed {} lines (title: {:?}, subtitle: {:?})",
        lines.len(),
        title,
        subtitle
    );

    Document {
        lines,
        title,
        subtitle,
    }
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn first_directive_value(lines: &[Line], wanted: &DirectiveKind) -> Option<String> {
    lines
        .iter()
        .flat_map(|line| line.directives())
        .find(|(kind, _)| *kind == wanted)
        .map(|(_, value)| value.to_string())
}

/// Splits one raw line (without its newline) into segments.
pub fn tokenize_line(line: &str) -> Line {
    if line.is_empty() {
        return Line::blank();
    }

    let mut scanner = Scanner::new(line);
    let mut segments = Vec::new();

    while !scanner.at_end() {
        let start = scanner.pos;

        if let Some(directive) = scanner.directive() {
            segments.push(Segment {
                span: scanner.span_from(start),
                kind: SegmentKind::Directive {
                    kind: DirectiveKind::from_key(directive.key),
                    value: directive.value.to_string(),
                },
            });
            continue;
        }

        if let Some(chord) = scanner.chord() {
            let lyrics = scanner
                .whitespace()
                .or_else(|| scanner.word_after_chord());
            segments.push(Segment {
                span: scanner.span_from(start),
                kind: SegmentKind::Fragment {
                    chord: Some(chord.to_string()),
                    lyrics: lyrics.map(str::to_string),
                },
            });
            continue;
        }

        // Directive and chord both failed here, so a leading `[` or `{` is a word.
        if let Some(run) = scanner.whitespace().or_else(|| scanner.word()) {
            segments.push(Segment {
                span: scanner.span_from(start),
                kind: SegmentKind::Fragment {
                    chord: None,
                    lyrics: Some(run.to_string()),
                },
            });
            continue;
        }

        // None of the rules advanced; skip one character so the scan terminates.
        log::debug!(
            "forced advance at byte {} of line {:?}",
            scanner.pos,
            scanner.text
        );
        scanner.bump();
    }

    Line {
        source: line.to_string(),
        segments,
    }
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    delimiters: Delimiters,
}

struct DirectiveMatch<'a> {
    len: usize,
    key: &'a str,
    value: &'a str,
}

/// Byte offset of the next `:` and `}` at or after every offset of a line,
/// with the line length standing for "none".
struct Delimiters {
    next_colon: Vec<usize>,
    next_close: Vec<usize>,
}

impl Delimiters {
    fn new(text: &str) -> Self {
        let len = text.len();
        let mut next_colon = vec![len; len + 1];
        let mut next_close = vec![len; len + 1];
        for (idx, byte) in text.bytes().enumerate().rev() {
            next_colon[idx] = if byte == b':' { idx } else { next_colon[idx + 1] };
            next_close[idx] = if byte == b'}' { idx } else { next_close[idx + 1] };
        }
        Self {
            next_colon,
            next_close,
        }
    }
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            delimiters: Delimiters::new(text),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn span_from(&self, start: usize) -> Span {
        Span {
            start,
            end: self.pos,
        }
    }

    fn bump(&mut self) {
        if let Some(ch) = self.rest().chars().next() {
            self.pos += ch.len_utf8();
        }
    }

    fn directive(&mut self) -> Option<DirectiveMatch<'a>> {
        let found = match_directive(self.text, self.pos, &self.delimiters)?;
        self.pos += found.len;
        Some(found)
    }

    fn chord(&mut self) -> Option<&'a str> {
        let (len, chord) = match_chord(self.rest())?;
        self.pos += len;
        Some(chord)
    }

    fn whitespace(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest
            .find(|ch: char| !ch.is_whitespace())
            .unwrap_or(rest.len());
        self.take(len)
    }

    fn word(&mut self) -> Option<&'a str> {
        self.take(word_len(self.rest()))
    }

    /// The word run owned by a chord. Markup starting here opens the next segment instead.
    fn word_after_chord(&mut self) -> Option<&'a str> {
        if match_chord(self.rest()).is_some()
            || match_directive(self.text, self.pos, &self.delimiters).is_some()
        {
            return None;
        }
        self.word()
    }

    fn take(&mut self, len: usize) -> Option<&'a str> {
        if len == 0 {
            return None;
        }
        let run = &self.text[self.pos..self.pos + len];
        self.pos += len;
        Some(run)
    }
}

fn is_chord_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '#' | '+' | '/')
}

/// Matches `[` chord-chars+ `]` at the start of `rest`; returns the consumed length and the chord.
fn match_chord(rest: &str) -> Option<(usize, &str)> {
    let body = rest.strip_prefix('[')?;
    let end = body.find(|ch: char| !is_chord_char(ch))?;
    if end == 0 || body.as_bytes()[end] != b']' {
        return None;
    }
    Some((end + 2, &body[..end]))
}

/// Matches `{ key [:] value }` at byte `start` of `text`.
///
/// The key runs to the first `:` or `}`; the value runs to the first `}` and
/// may not contain a `:`. Both are trimmed. Delimiter lookups are constant
/// time, so a failed match never rescans the rest of the line.
fn match_directive<'a>(
    text: &'a str,
    start: usize,
    delimiters: &Delimiters,
) -> Option<DirectiveMatch<'a>> {
    if text.as_bytes().get(start) != Some(&b'{') {
        return None;
    }
    let body = start + 1;
    let close = delimiters.next_close[body];
    if close == text.len() {
        return None;
    }
    let colon = delimiters.next_colon[body];
    let value_start = if colon < close { colon + 1 } else { close };
    if delimiters.next_colon[value_start] < close {
        return None;
    }

    // A blank key holds no `{`, so this scan never overlaps another start.
    let key = text[body..colon.min(close)].trim();
    if key.is_empty() {
        return None;
    }

    Some(DirectiveMatch {
        len: close + 1 - start,
        key,
        value: text[value_start..close].trim(),
    })
}

/// Length of the word run at the start of `rest`. A leading `[` or `{` belongs to the word.
fn word_len(rest: &str) -> usize {
    let mut chars = rest.char_indices();
    match chars.next() {
        None => return 0,
        Some((_, ch)) if ch.is_whitespace() => return 0,
        Some(_) => {}
    }
    for (idx, ch) in chars {
        if ch.is_whitespace() || ch == '[' || ch == '{' {
            return idx;
        }
    }
    rest.len()
}
