//! WebAssembly bindings for termglyph

use crate::{Config, Converter, Result, TextImage};
use image::RgbaImage;
use wasm_bindgen::prelude::*;

fn to_js(e: crate::TermglyphError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WasmConverter {
    config: Config,
}

#[wasm_bindgen]
impl WasmConverter {
    /// Create a converter with default settings and the given glyph ramp
    #[wasm_bindgen(constructor)]
    pub fn new(symbols: &str) -> std::result::Result<WasmConverter, JsValue> {
        let symbols = symbols.parse().map_err(to_js)?;
        Ok(WasmConverter { config: Config::new(symbols) })
    }

    /// Replace every setting with a JSON config document
    #[wasm_bindgen]
    pub fn load_config(&mut self, json: &str) -> std::result::Result<(), JsValue> {
        self.config = Config::from_json_str(json).map_err(to_js)?;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn config_json(&self) -> std::result::Result<String, JsValue> {
        self.config.to_json().map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_scale(&mut self, scale: u32) {
        self.config = self.config.clone().with_scale(scale);
    }

    #[wasm_bindgen]
    pub fn set_width(&mut self, width: Option<u32>) {
        self.config = self.config.clone().with_width(width);
    }

    #[wasm_bindgen]
    pub fn set_height(&mut self, height: Option<u32>) {
        self.config = self.config.clone().with_height(height);
    }

    #[wasm_bindgen]
    pub fn set_color(&mut self, enabled: bool) {
        self.config = self.config.clone().with_color(enabled);
    }

    #[wasm_bindgen]
    pub fn set_reverse(&mut self, enabled: bool) {
        self.config = self.config.clone().with_reverse(enabled);
    }

    /// `r,g,b` or `#RRGGBB`; `None` clears the background
    #[wasm_bindgen]
    pub fn set_background(&mut self, spec: Option<String>) -> std::result::Result<(), JsValue> {
        let background = spec.map(|s| s.parse()).transpose().map_err(to_js)?;
        self.config = self.config.clone().with_background(background);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_filter(&mut self, name: &str) -> std::result::Result<(), JsValue> {
        let filter = name.parse().map_err(to_js)?;
        self.config = self.config.clone().with_filter(filter);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_aspect_correction(&mut self, aspect: f32) {
        self.config = self.config.clone().with_aspect_correction(aspect);
    }

    /// Render canvas RGBA data to text, escapes included when color is on
    #[wasm_bindgen]
    pub fn render(&self, image_data: &[u8], width: u32, height: u32) -> std::result::Result<String, JsValue> {
        self.convert(image_data, width, height).map(|t| t.to_string()).map_err(to_js)
    }

    /// Render to `{ width, height, rows }` with plain glyph rows
    #[wasm_bindgen]
    pub fn render_grid(&self, image_data: &[u8], width: u32, height: u32) -> std::result::Result<js_sys::Object, JsValue> {
        let text = self.convert(image_data, width, height).map_err(to_js)?;

        let rows = js_sys::Array::new();
        for y in 0..text.rows() {
            if let Some(row) = text.row_text(y) {
                rows.push(&JsValue::from_str(&row));
            }
        }

        let result = js_sys::Object::new();
        js_sys::Reflect::set(&result, &"width".into(), &text.cols().into())?;
        js_sys::Reflect::set(&result, &"height".into(), &text.rows().into())?;
        js_sys::Reflect::set(&result, &"rows".into(), &rows)?;
        Ok(result)
    }

    fn convert(&self, image_data: &[u8], width: u32, height: u32) -> Result<TextImage> {
        let img = RgbaImage::from_raw(width, height, image_data.to_vec()).ok_or_else(|| {
            crate::TermglyphError::ImageSource(format!(
                "{} bytes is not a {}x{} RGBA image",
                image_data.len(),
                width,
                height
            ))
        })?;
        Converter::new(self.config.clone())?.convert(&img)
    }
}
