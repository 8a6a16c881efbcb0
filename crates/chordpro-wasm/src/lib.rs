use chordpro_core::{Layout, MarkupOptions, TextOptions, UnknownLayout};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderOptions {
    layout: Option<String>,
    class: Option<String>,
    line_end: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderResult {
    html: String,
    metadata: JsMetadata,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsMetadata {
    title: Option<String>,
    subtitle: Option<String>,
}

#[wasm_bindgen]
pub fn render_html(source: &str) -> Result<JsValue, JsValue> {
    render_html_with_options(source, JsValue::UNDEFINED)
}

#[wasm_bindgen]
pub fn render_html_with_options(source: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let options = options_from_js(options)?;
    let markup = markup_options(&options).map_err(|err| JsValue::from_str(&err.to_string()))?;
    let result = RenderResult {
        html: chordpro_core::to_html(source, &markup),
        metadata: metadata_of(source),
    };
    serde_wasm_bindgen::to_value(&result).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn render_text(source: &str, options: JsValue) -> Result<String, JsValue> {
    let options = options_from_js(options)?;
    Ok(chordpro_core::to_text_with_options(
        source,
        &text_options(&options),
    ))
}

#[wasm_bindgen]
pub fn get_metadata(source: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&metadata_of(source))
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

fn options_from_js(value: JsValue) -> Result<RenderOptions, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(RenderOptions::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn markup_options(options: &RenderOptions) -> Result<MarkupOptions, UnknownLayout> {
    let layout = match &options.layout {
        Some(name) => name.parse::<Layout>()?,
        None => Layout::default(),
    };
    Ok(MarkupOptions {
        layout,
        class: options.class.clone(),
        ..Default::default()
    })
}

fn text_options(options: &RenderOptions) -> TextOptions {
    let mut out = TextOptions::default();
    if let Some(line_end) = &options.line_end {
        out.line_end = line_end.clone();
    }
    out
}

fn metadata_of(source: &str) -> JsMetadata {
    let metadata = chordpro_core::metadata(source);
    JsMetadata {
        title: metadata.title,
        subtitle: metadata.subtitle,
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderOptions, markup_options, metadata_of, text_options};
    use chordpro_core::Layout;

    #[test]
    fn layout_names_map_to_layouts() {
        let options = RenderOptions {
            layout: Some("segments".to_string()),
            class: Some("song".to_string()),
            ..Default::default()
        };
        let markup = markup_options(&options).expect("known layout");
        assert_eq!(markup.layout, Layout::Segments);
        assert_eq!(markup.class.as_deref(), Some("song"));

        let markup = markup_options(&RenderOptions::default()).expect("default layout");
        assert_eq!(markup.layout, Layout::Columns);
    }

    #[test]
    fn unknown_layout_is_an_error() {
        let options = RenderOptions {
            layout: Some("grid".to_string()),
            ..Default::default()
        };
        let err = markup_options(&options).expect_err("unknown layout");
        assert!(err.to_string().contains("grid"));
    }

    #[test]
    fn line_end_overrides_default() {
        let options = RenderOptions {
            line_end: Some("<br/>".to_string()),
            ..Default::default()
        };
        assert_eq!(text_options(&options).line_end, "<br/>");
        assert_eq!(text_options(&RenderOptions::default()).line_end, "\n");
    }

    #[test]
    fn metadata_is_copied() {
        let metadata = metadata_of("{t: Song}\nla");
        assert_eq!(metadata.title.as_deref(), Some("Song"));
        assert_eq!(metadata.subtitle, None);
    }
}
