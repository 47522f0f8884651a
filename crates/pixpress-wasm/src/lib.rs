//! Pixpress WASM - WebAssembly bindings for Pixpress
//!
//! This crate provides WASM bindings to expose the pixpress-core functionality
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `compress` - One-shot compress and estimate functions, display helpers
//! - `session` - Stateful upload / compress / reset workflow
//! - `types` - WASM-compatible wrapper types for results and reports
//! - `logger` - Forwards core log output to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image, estimate_size } from '@pixpress/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_image(bytes, file.name, file.type, 80);
//! const report = estimate_size(result.data_url, file.size);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod logger;
mod session;
mod types;

// Re-export public types
pub use compress::{
    accepts_content_type, compress_image, compress_with_settings, estimate_size,
    format_file_size, quality_label, quality_presets,
};
pub use logger::set_log_level;
pub use session::JsCompressSession;
pub use types::{JsEncodedResult, JsSessionState, JsSizeReport};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install();
    log::debug!("pixpress-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
