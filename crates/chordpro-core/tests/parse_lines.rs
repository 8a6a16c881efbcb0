use std::time::{Duration, Instant};

use chordpro_core::{Chord, DirectiveKind, SegmentKind, metadata, parse, tokenize_line};

fn chords(line: &str) -> Vec<(usize, String)> {
    tokenize_line(line)
        .flatten()
        .chords
        .into_iter()
        .map(|Chord { position, text }| (position, text))
        .collect()
}

fn chord(position: usize, text: &str) -> (usize, String) {
    (position, text.to_string())
}

#[test]
fn chords_are_removed_from_lyrics() {
    let flat = tokenize_line("[C]one t[D]wo").flatten();
    assert_eq!(flat.lyrics, "one two");
    assert_eq!(chords("[C]one t[D]wo"), vec![chord(0, "C"), chord(5, "D")]);
}

#[test]
fn plain_lyrics_pass_through() {
    let flat = tokenize_line("one two").flatten();
    assert_eq!(flat.lyrics, "one two");
    assert!(flat.chords.is_empty());
}

#[test]
fn chords_only_line_has_empty_lyrics_and_spaced_chords() {
    let flat = tokenize_line("[C] [D]").flatten();
    assert_eq!(flat.lyrics, "");
    assert_eq!(chords("[C] [D]"), vec![chord(0, "C"), chord(2, "D")]);
}

#[test]
fn long_chords_shift_the_text() {
    let flat = tokenize_line("[Cmin] [Dmin]one").flatten();
    assert_eq!(flat.lyrics, "     one");
    assert_eq!(
        chords("[Cmin] [Dmin]one"),
        vec![chord(0, "Cmin"), chord(5, "Dmin")]
    );
}

#[test]
fn chord_alphabet() {
    assert_eq!(chords("[C7] [D7]"), vec![chord(0, "C7"), chord(3, "D7")]);
    assert_eq!(chords("[C#] [D7]"), vec![chord(0, "C#"), chord(3, "D7")]);
    assert_eq!(chords("[C/D] [D7]"), vec![chord(0, "C/D"), chord(4, "D7")]);
    assert_eq!(chords("[Eb+]x"), vec![chord(0, "Eb+")]);
}

#[test]
fn invalid_chord_characters_stay_literal() {
    let flat = tokenize_line("[C!] [D]").flatten();
    assert_eq!(flat.lyrics, "[C!]");
    assert_eq!(chords("[C!] [D]"), vec![chord(5, "D")]);
}

#[test]
fn leading_whitespace_shifts_chords() {
    let flat = tokenize_line("  [C]one").flatten();
    assert_eq!(flat.lyrics, "  one");
    assert_eq!(chords("  [C]one"), vec![chord(2, "C")]);
}

#[test]
fn multiple_lines_are_parsed_in_order() {
    let document = parse("[C]one\n[D]two");
    assert_eq!(document.lines.len(), 2);
    assert_eq!(document.lines[0].flatten().lyrics, "one");
    assert_eq!(document.lines[1].flatten().lyrics, "two");
    assert_eq!(document.lines[1].flatten().chords[0].text, "D");
}

#[test]
fn comment_lines_are_dropped() {
    let document = parse("one\n# comment\ntwo");
    assert_eq!(document.lines.len(), 2);

    let document = parse("one\n   # comment\ntwo");
    let lyrics: Vec<_> = document
        .lines
        .iter()
        .map(|line| line.flatten().lyrics)
        .collect();
    assert_eq!(lyrics, vec!["one", "two"]);
}

#[test]
fn empty_source_is_one_blank_line() {
    let document = parse("");
    assert_eq!(document.lines.len(), 1);
    assert!(document.lines[0].flatten().blank);
}

#[test]
fn carriage_returns_are_dropped() {
    let document = parse("[C]one\r\ntwo\r\n");
    assert_eq!(document.lines.len(), 3);
    assert_eq!(document.lines[0].source, "[C]one");
    assert_eq!(document.lines[1].flatten().lyrics, "two");
}

#[test]
fn directives_record_lyrics_position() {
    let flat = tokenize_line("one {c: note} two").flatten();
    assert_eq!(flat.lyrics, "one  two");
    assert_eq!(flat.directives.len(), 1);
    assert_eq!(flat.directives[0].position, 4);
    assert_eq!(flat.directives[0].kind, DirectiveKind::Comment);
    assert_eq!(flat.directives[0].value, "note");
}

#[test]
fn unknown_directive_keys_are_lowercased() {
    let flat = tokenize_line("{Capo: 2}").flatten();
    assert_eq!(
        flat.directives[0].kind,
        DirectiveKind::Other("capo".to_string())
    );
    assert_eq!(flat.directives[0].value, "2");
}

#[test]
fn metadata_takes_first_title_and_subtitle() {
    let meta = metadata("{t: The Title}");
    assert_eq!(meta.title.as_deref(), Some("The Title"));
    assert_eq!(meta.subtitle, None);

    let meta = metadata("{st: The Subtitles}");
    assert_eq!(meta.subtitle.as_deref(), Some("The Subtitles"));

    let meta = metadata("{t: The Title}\n{st: The Subtitles}\n{title: Later}");
    assert_eq!(meta.title.as_deref(), Some("The Title"));
    assert_eq!(meta.subtitle.as_deref(), Some("The Subtitles"));
}

#[test]
fn tab_region_lines_are_verbatim() {
    let document = parse("{sot}\ne|--[0]--|\n{eot}\n[C]after");
    assert_eq!(document.lines.len(), 4);

    let tab_line = &document.lines[1];
    assert_eq!(tab_line.segments.len(), 1);
    assert_eq!(
        tab_line.segments[0].kind,
        SegmentKind::Fragment {
            chord: None,
            lyrics: Some("e|--[0]--|".to_string()),
        }
    );

    let end = &document.lines[2];
    assert!(
        end.directives()
            .any(|(kind, _)| *kind == DirectiveKind::EndOfTab)
    );
    assert_eq!(document.lines[3].flatten().chords[0].text, "C");
}

#[test]
fn directives_inside_tab_regions_are_ignored() {
    let document = parse("{start_of_tab}\n{t: Not A Title}\n{end_of_tab}");
    assert_eq!(document.title, None);
}

#[test]
fn start_of_tab_line_itself_is_tokenized() {
    let document = parse("[G]{sot}\n[C]x");
    assert!(document.lines[0].has_chords());
    assert!(!document.lines[1].has_chords());
}

#[test]
fn unclosed_braces_tokenize_in_linear_time() {
    // Each input would take minutes if every `{` rescanned the rest of the line.
    let inputs = [
        "{".repeat(200_000),
        "{a ".repeat(70_000),
        format!("{}{}:a:}}", "{".repeat(100_000), " ".repeat(100_000)),
        "[C]{".repeat(50_000),
    ];
    for input in &inputs {
        let started = Instant::now();
        let line = tokenize_line(input);
        let elapsed = started.elapsed();

        let covered: usize = line.segments.iter().map(|segment| segment.span.len()).sum();
        assert_eq!(covered, input.len());
        assert!(
            elapsed < Duration::from_secs(5),
            "tokenizing {} bytes took {:?}",
            input.len(),
            elapsed
        );
    }
}

#[test]
fn unmatched_braces_stay_lyrics() {
    let flat = tokenize_line("{{a}").flatten();
    assert_eq!(flat.lyrics, "");
    assert_eq!(flat.directives.len(), 1);
    assert_eq!(flat.directives[0].kind, DirectiveKind::Other("{a".to_string()));

    let flat = tokenize_line("{ {c: x:y}").flatten();
    assert_eq!(flat.lyrics, "{ {c: x:y}");
    assert!(flat.directives.is_empty());
}
