use ammonia::Builder;
use std::collections::{HashMap, HashSet};

/// Strips every tag from raw song text. Text content is kept and HTML-escaped;
/// the contents of `script` and `style` are dropped.
pub fn sanitize_input(text: &str) -> String {
    Builder::new()
        .tags(HashSet::new())
        .generic_attributes(HashSet::new())
        .tag_attributes(HashMap::new())
        .clean(text)
        .to_string()
}

/// Cleans rendered markup down to the renderers' tag vocabulary. Only `class`
/// survives, and only on `div`, `span` and `pre`.
pub fn sanitize_output(html: &str) -> String {
    let tags: HashSet<&'static str> = [
        "b", "br", "div", "em", "h1", "h2", "h3", "h4", "h5", "h6", "i", "pre", "span", "strong",
        "sub", "sup", "u",
    ]
    .iter()
    .copied()
    .collect();

    let mut tag_attributes = HashMap::new();
    for tag in ["div", "span", "pre"] {
        tag_attributes.insert(tag, ["class"].iter().copied().collect::<HashSet<_>>());
    }

    Builder::new()
        .tags(tags)
        .generic_attributes(HashSet::new())
        .tag_attributes(tag_attributes)
        .clean(html)
        .to_string()
}
