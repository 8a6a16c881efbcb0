use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use chordpro_core::Metadata;

const BASE_CSS: &str = include_str!("../assets/chordpro.css");

/// File name written by [`Renderer::generate_files`].
pub const STYLESHEET_FILE: &str = "chordpro.css";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    theme: Theme,
    custom_vars: BTreeMap<String, String>,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            custom_vars: BTreeMap::new(),
        }
    }

    /// Overrides a CSS custom property, e.g. `--chordpro-chord`.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_vars.insert(key.into(), value.into());
        self
    }

    pub fn stylesheet(&self) -> String {
        let mut out = String::new();
        let (light_vars, dark_vars) = default_theme_vars();

        match self.theme {
            Theme::Auto => {
                out.push_str(&root_block(&light_vars, true));
                out.push_str("@media (prefers-color-scheme: dark) {\n");
                out.push_str(&indent_root_block(&dark_vars));
                out.push_str("}\n");
            }
            Theme::Light => {
                out.push_str(&root_block(&light_vars, true));
            }
            Theme::Dark => {
                out.push_str(&root_block(&dark_vars, true));
            }
        }

        if !self.custom_vars.is_empty() {
            out.push_str(&root_block(&self.custom_vars, false));
        }

        out.push_str(BASE_CSS);
        out
    }

    /// Wraps rendered song markup in a standalone page. The title, when given,
    /// is escaped before it lands in `<title>`.
    pub fn embed_html(&self, html: &str, with_inline_css: bool, title: Option<&str>) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n");
        out.push_str("<html lang=\"en\">\n");
        out.push_str("<head>\n");
        out.push_str("  <meta charset=\"utf-8\" />\n");
        out.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
        if let Some(title) = title {
            out.push_str("  <title>");
            out.push_str(&escape_text(title));
            out.push_str("</title>\n");
        }
        if with_inline_css {
            out.push_str("  <style>\n");
            out.push_str(&self.stylesheet());
            out.push_str("\n  </style>\n");
        } else {
            out.push_str("  <link rel=\"stylesheet\" href=\"");
            out.push_str(STYLESHEET_FILE);
            out.push_str("\" />\n");
        }
        out.push_str("</head>\n");
        out.push_str("<body>\n");
        out.push_str(html);
        if !html.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("</body>\n");
        out.push_str("</html>\n");
        out
    }

    /// Page title from song metadata: "Title - Subtitle", either part alone, or none.
    pub fn page_title(metadata: &Metadata) -> Option<String> {
        match (&metadata.title, &metadata.subtitle) {
            (Some(title), Some(subtitle)) => Some(format!("{} - {}", title, subtitle)),
            (Some(title), None) => Some(title.clone()),
            (None, Some(subtitle)) => Some(subtitle.clone()),
            (None, None) => None,
        }
    }

    pub fn generate_files(&self, out_dir: &Path) -> io::Result<()> {
        fs::create_dir_all(out_dir)?;
        let path = out_dir.join(STYLESHEET_FILE);
        fs::write(&path, self.stylesheet())?;
        log::debug!("wrote stylesheet to {}", path.display());
        Ok(())
    }
}

fn default_theme_vars() -> (BTreeMap<String, String>, BTreeMap<String, String>) {
    let light = BTreeMap::from([
        ("--chordpro-bg".to_string(), "#fdfcf9".to_string()),
        ("--chordpro-fg".to_string(), "#1f2328".to_string()),
        ("--chordpro-muted".to_string(), "#5f6b76".to_string()),
        ("--chordpro-border".to_string(), "#d8dee4".to_string()),
        ("--chordpro-accent".to_string(), "#2b6cb0".to_string()),
        ("--chordpro-chord".to_string(), "#b23a48".to_string()),
        ("--chordpro-chorus-bg".to_string(), "#f4f6f8".to_string()),
        ("--chordpro-highlight-bg".to_string(), "#fff4c2".to_string()),
        (
            "--chordpro-font".to_string(),
            "system-ui, sans-serif".to_string(),
        ),
        (
            "--chordpro-mono".to_string(),
            "ui-monospace, monospace".to_string(),
        ),
    ]);

    let dark = BTreeMap::from([
        ("--chordpro-bg".to_string(), "#0e1116".to_string()),
        ("--chordpro-fg".to_string(), "#e6edf3".to_string()),
        ("--chordpro-muted".to_string(), "#9aa4af".to_string()),
        ("--chordpro-border".to_string(), "#2a313b".to_string()),
        ("--chordpro-accent".to_string(), "#63b3ed".to_string()),
        ("--chordpro-chord".to_string(), "#f08a9b".to_string()),
        ("--chordpro-chorus-bg".to_string(), "#1b212b".to_string()),
        ("--chordpro-highlight-bg".to_string(), "#3a3420".to_string()),
        (
            "--chordpro-font".to_string(),
            "system-ui, sans-serif".to_string(),
        ),
        (
            "--chordpro-mono".to_string(),
            "ui-monospace, monospace".to_string(),
        ),
    ]);

    (light, dark)
}

fn format_vars(vars: &BTreeMap<String, String>, indent: &str) -> String {
    let mut out = String::new();
    for (key, value) in vars {
        out.push_str(indent);
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push_str(";\n");
    }
    out
}

fn root_block(vars: &BTreeMap<String, String>, include_color_scheme: bool) -> String {
    let mut out = String::new();
    out.push_str(":root {\n");
    if include_color_scheme {
        out.push_str("  color-scheme: light dark;\n");
    }
    out.push_str(&format_vars(vars, "  "));
    out.push_str("}\n");
    out
}

fn indent_root_block(vars: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    out.push_str("  :root {\n");
    out.push_str("    color-scheme: light dark;\n");
    out.push_str(&format_vars(vars, "    "));
    out.push_str("  }\n");
    out
}

fn escape_text(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
