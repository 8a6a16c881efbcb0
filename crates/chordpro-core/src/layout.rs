use crate::ast::FlatLine;

/// One visual column shared by the chord axis and the lyric axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column<'a> {
    pub start: usize,
    pub chord: Option<&'a str>,
    /// `None` when the column starts past the end of the lyrics.
    pub lyrics: Option<&'a str>,
}

/// Ascending character positions at which a new column begins.
///
/// Every word start opens a column unless a chord's span already covers it;
/// every chord position opens a column.
pub fn segment_start_indexes(line: &FlatLine) -> Vec<usize> {
    let mut indexes: Vec<usize> = word_starts(&line.lyrics)
        .filter(|&index| {
            !line
                .chords
                .iter()
                .any(|chord| index > chord.position && index <= chord.position + chord.width())
        })
        .collect();

    for chord in &line.chords {
        if !indexes.contains(&chord.position) {
            indexes.push(chord.position);
        }
    }

    indexes.sort_unstable();
    indexes
}

pub fn columns(line: &FlatLine) -> Vec<Column<'_>> {
    let indexes = segment_start_indexes(line);
    // Byte offset of every character, plus the end of the string.
    let offsets: Vec<usize> = line
        .lyrics
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(line.lyrics.len()))
        .collect();
    let char_len = offsets.len() - 1;

    indexes
        .iter()
        .enumerate()
        .map(|(idx, &start)| {
            let chord = line
                .chords
                .iter()
                .find(|chord| chord.position == start)
                .map(|chord| chord.text.as_str());
            let lyrics = if start >= char_len {
                None
            } else {
                let end = indexes
                    .get(idx + 1)
                    .map_or(char_len, |&next| next.min(char_len));
                Some(&line.lyrics[offsets[start]..offsets[end]])
            };
            Column {
                start,
                chord,
                lyrics,
            }
        })
        .collect()
}

fn word_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    let mut previous_is_space = true;
    text.chars().enumerate().filter_map(move |(index, ch)| {
        let is_space = ch.is_whitespace();
        let starts_word = previous_is_space && !is_space;
        previous_is_space = is_space;
        starts_word.then_some(index)
    })
}
