use crate::span::Span;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<Line>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

impl Document {
    pub fn metadata(&self) -> Metadata {
        Metadata {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

/// One non-comment source line in segment form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub source: String,
    pub segments: Vec<Segment>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub span: Span,
    pub kind: SegmentKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    /// Marker for a literally empty source line.
    Blank,
    Directive {
        kind: DirectiveKind,
        value: String,
    },
    /// A chord, the lyric run that follows it, or both.
    Fragment {
        chord: Option<String>,
        lyrics: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Title,
    Subtitle,
    Comment,
    StartOfChorus,
    EndOfChorus,
    StartOfHighlight,
    EndOfHighlight,
    StartOfTab,
    EndOfTab,
    /// Unrecognized key, lowercased.
    Other(String),
}

impl DirectiveKind {
    pub fn from_key(key: &str) -> Self {
        let key = key.trim().to_lowercase();
        match key.as_str() {
            "title" | "t" => DirectiveKind::Title,
            "subtitle" | "st" => DirectiveKind::Subtitle,
            "comment" | "c" => DirectiveKind::Comment,
            "start_of_chorus" | "soc" => DirectiveKind::StartOfChorus,
            "end_of_chorus" | "eoc" => DirectiveKind::EndOfChorus,
            "start_of_highlight" | "soh" => DirectiveKind::StartOfHighlight,
            "end_of_highlight" | "eoh" => DirectiveKind::EndOfHighlight,
            "start_of_tab" | "sot" => DirectiveKind::StartOfTab,
            "end_of_tab" | "eot" => DirectiveKind::EndOfTab,
            _ => DirectiveKind::Other(key),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            DirectiveKind::Title => "title",
            DirectiveKind::Subtitle => "subtitle",
            DirectiveKind::Comment => "comment",
            DirectiveKind::StartOfChorus => "start_of_chorus",
            DirectiveKind::EndOfChorus => "end_of_chorus",
            DirectiveKind::StartOfHighlight => "start_of_highlight",
            DirectiveKind::EndOfHighlight => "end_of_highlight",
            DirectiveKind::StartOfTab => "start_of_tab",
            DirectiveKind::EndOfTab => "end_of_tab",
            DirectiveKind::Other(key) => key,
        }
    }
}

/// A chord anchored to a character column of the flattened lyrics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chord {
    pub position: usize,
    pub text: String,
}

impl Chord {
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    pub position: usize,
    pub kind: DirectiveKind,
    pub value: String,
}

/// A line with chord and directive markup stripped from the lyrics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlatLine {
    pub lyrics: String,
    pub chords: Vec<Chord>,
    pub directives: Vec<Directive>,
    pub blank: bool,
}

impl FlatLine {
    /// False for lines whose source held only directives or whitespace.
    /// A literally empty source line still counts.
    pub fn has_content(&self) -> bool {
        self.blank || !self.lyrics.is_empty() || !self.chords.is_empty()
    }
}

impl Line {
    pub(crate) fn blank() -> Self {
        Self {
            source: String::new(),
            segments: vec![Segment {
                span: Span::default(),
                kind: SegmentKind::Blank,
            }],
        }
    }

    /// The whole line as a single lyric run, used inside tab regions.
    pub(crate) fn verbatim(source: &str) -> Self {
        if source.is_empty() {
            return Self::blank();
        }
        Self {
            source: source.to_string(),
            segments: vec![Segment {
                span: Span {
                    start: 0,
                    end: source.len(),
                },
                kind: SegmentKind::Fragment {
                    chord: None,
                    lyrics: Some(source.to_string()),
                },
            }],
        }
    }

    pub fn directives(&self) -> impl Iterator<Item = (&DirectiveKind, &str)> {
        self.segments.iter().filter_map(|segment| match &segment.kind {
            SegmentKind::Directive { kind, value } => Some((kind, value.as_str())),
            _ => None,
        })
    }

    pub fn has_chords(&self) -> bool {
        self.segments.iter().any(|segment| {
            matches!(
                segment.kind,
                SegmentKind::Fragment {
                    chord: Some(_),
                    ..
                }
            )
        })
    }

    pub fn flatten(&self) -> FlatLine {
        let mut flat = FlatLine::default();
        // Width of `flat.lyrics` in characters.
        let mut width = 0usize;

        for segment in &self.segments {
            match &segment.kind {
                SegmentKind::Blank => flat.blank = true,
                SegmentKind::Directive { kind, value } => flat.directives.push(Directive {
                    position: width,
                    kind: kind.clone(),
                    value: value.clone(),
                }),
                SegmentKind::Fragment { chord, lyrics } => {
                    if let Some(chord) = chord {
                        // Keep at least one column between consecutive chords.
                        if let Some(previous) = flat.chords.last() {
                            let min = previous.position + previous.width() + 1;
                            while width < min {
                                flat.lyrics.push(' ');
                                width += 1;
                            }
                        }
                        flat.chords.push(Chord {
                            position: width,
                            text: chord.clone(),
                        });
                    }
                    if let Some(lyrics) = lyrics {
                        flat.lyrics.push_str(lyrics);
                        width += lyrics.chars().count();
                    }
                }
            }
        }

        let trimmed = flat.lyrics.trim_end().len();
        flat.lyrics.truncate(trimmed);
        flat
    }
}
