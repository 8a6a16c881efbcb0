mod ast;
mod emit;
mod layout;
mod options;
mod parser;
mod render;
mod sanitize;
mod span;
mod text;

pub use ast::{
    Chord, Directive, DirectiveKind, Document, FlatLine, Line, Metadata, Segment, SegmentKind,
};
pub use emit::{class, emit_html};
pub use layout::{Column, columns, segment_start_indexes};
pub use options::{
    Formatter, Layout, MarkupOptions, PreOptions, RenderMode, TextOptions, UnknownLayout, wrap_in,
};
pub use parser::{parse, tokenize_line};
pub use render::{metadata, render, to_html, to_pre_html, to_text, to_text_with_options};
pub use sanitize::{sanitize_input, sanitize_output};
pub use span::Span;
