use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chordpro_core::{
    Layout, MarkupOptions, Metadata, PreOptions, TextOptions, metadata, to_html, to_pre_html,
    to_text_with_options,
};
use chordpro_renderer::{Renderer, Theme};
use clap::Parser;
use serde::Serialize;

/// Render ChordPro song sheets as text or HTML
#[derive(Parser)]
#[command(name = "chordpro-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Song file to read (stdin when omitted)
    input: Option<PathBuf>,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,

    /// Class name for the outer HTML element
    #[arg(long, value_name = "NAME")]
    class: Option<String>,

    /// Line terminator for text output
    #[arg(long, value_enum, default_value_t = LineEndArg::Lf)]
    line_end: LineEndArg,

    /// Wrap HTML output in a complete page with the stylesheet
    #[arg(long)]
    standalone: bool,

    /// Color theme of the standalone stylesheet
    #[arg(long, value_enum, default_value_t = ThemeArg::Auto)]
    theme: ThemeArg,

    /// Write the stylesheet into DIR and link it instead of inlining it
    #[arg(long, value_name = "DIR", requires = "standalone")]
    css_dir: Option<PathBuf>,

    /// Print the song's title and subtitle as JSON instead of rendering
    #[arg(long)]
    metadata: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum FormatArg {
    /// Chords above lyrics as plain text
    Text,
    /// Chords above lyrics inside <pre>
    Pre,
    /// Column markup
    Columns,
    /// Segment markup
    Segments,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LineEndArg {
    Lf,
    Crlf,
}

impl LineEndArg {
    fn as_str(self) -> &'static str {
        match self {
            LineEndArg::Lf => "\n",
            LineEndArg::Crlf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ThemeArg {
    Auto,
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Auto => Theme::Auto,
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Serialize)]
struct MetadataJson {
    title: Option<String>,
    subtitle: Option<String>,
}

impl From<Metadata> for MetadataJson {
    fn from(metadata: Metadata) -> Self {
        Self {
            title: metadata.title,
            subtitle: metadata.subtitle,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("error: {:#}", err);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let source = read_source(cli)?;
    log::info!("read {} bytes of song source", source.len());

    let output = if cli.metadata {
        let json = MetadataJson::from(metadata(&source));
        serde_json::to_string_pretty(&json).context("failed to serialize metadata")?
    } else {
        render(cli, &source)?
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(output.as_bytes())
        .context("failed to write output")?;
    if !output.ends_with('\n') {
        out.write_all(b"\n").context("failed to write output")?;
    }
    Ok(())
}

fn read_source(cli: &Cli) -> Result<String> {
    match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn render(cli: &Cli, source: &str) -> Result<String> {
    let body = match cli.format {
        FormatArg::Text => {
            if cli.standalone {
                log::warn!("--standalone has no effect on text output");
            }
            if cli.class.is_some() {
                log::warn!("--class has no effect on text output");
            }
            let options = TextOptions {
                line_end: cli.line_end.as_str().to_string(),
                ..Default::default()
            };
            return Ok(to_text_with_options(source, &options));
        }
        FormatArg::Pre => {
            let options = PreOptions {
                class: cli.class.clone(),
                ..Default::default()
            };
            to_pre_html(source, &options)
        }
        FormatArg::Columns | FormatArg::Segments => {
            let layout = if cli.format == FormatArg::Columns {
                Layout::Columns
            } else {
                Layout::Segments
            };
            let options = MarkupOptions {
                layout,
                class: cli.class.clone(),
                ..Default::default()
            };
            to_html(source, &options)
        }
    };

    if !cli.standalone {
        return Ok(body);
    }

    let renderer = Renderer::new(cli.theme.into());
    let title = Renderer::page_title(&metadata(source));
    let inline_css = match &cli.css_dir {
        Some(dir) => {
            renderer
                .generate_files(dir)
                .with_context(|| format!("failed to write stylesheet to {}", dir.display()))?;
            false
        }
        None => true,
    };
    Ok(renderer.embed_html(&body, inline_css, title.as_deref()))
}
