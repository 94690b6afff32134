use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use orgmark_core::{Document, HtmlEmitOptions, ParseOptions};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderOptions {
    heading_offset: Option<u8>,
    newline: Option<bool>,
    wrap: Option<bool>,
    sanitized: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderResult {
    html: String,
    identity: Option<String>,
    targets: Vec<JsTarget>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsTarget {
    id: String,
    text: String,
}

#[wasm_bindgen]
pub fn render_html(source: &str) -> Result<JsValue, JsValue> {
    render_html_with_options(source, JsValue::UNDEFINED)
}

#[wasm_bindgen]
pub fn render_html_with_options(source: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let (parse_options, emit_options) = options_from_js(options)?.into_options();
    let result = render(source, &parse_options, &emit_options)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    serde_wasm_bindgen::to_value(&result).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn render(
    source: &str,
    parse_options: &ParseOptions,
    emit_options: &HtmlEmitOptions,
) -> Result<RenderResult, orgmark_core::ParseError> {
    let mut document = Document::parse(source, parse_options)?;
    let html = document.to_html(emit_options);
    let targets = document
        .targets()
        .iter()
        .map(|target| JsTarget {
            id: target.id.clone(),
            text: target.text.clone(),
        })
        .collect();
    Ok(RenderResult {
        html,
        identity: document.identity().map(str::to_string),
        targets,
    })
}

fn options_from_js(value: JsValue) -> Result<RenderOptions, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(RenderOptions::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

impl RenderOptions {
    fn into_options(self) -> (ParseOptions, HtmlEmitOptions) {
        let mut parse = ParseOptions::default();
        if let Some(heading_offset) = self.heading_offset {
            parse.heading_offset = heading_offset.max(1);
        }
        let emit = HtmlEmitOptions {
            separator: if self.newline.unwrap_or(false) { "\n" } else { "" }.to_string(),
            wrap: self.wrap.unwrap_or(false),
            sanitize: self.sanitized.unwrap_or(false),
        };
        (parse, emit)
    }
}
