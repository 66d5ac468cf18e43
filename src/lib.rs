//! ActiveText: mention / hashtag / URL / custom-pattern annotation for labels
//!
//! A Rust/WASM engine that turns a plain string into a final display string
//! plus a table of tappable ranges. Rendering, layout and hit-testing of
//! coordinates stay with the host.
//!
//! # Architecture
//!
//! ## Scanner (pure, stateless)
//! - `extract.rs` - Regex extractor: host pattern matches, optional in-place replacement
//! - `tokenize.rs` - Whitespace tokenizer with byte ranges
//! - `classify.rs` - WordClassifier: word -> mention / hashtag / url / none
//! - `link.rs` - LinkDetector trait + heuristic detector
//! - `builder.rs` - RangeTableBuilder: regex, then words, into an `ActiveTable`
//! - `lookup.rs` - Offset -> element lookup (inclusive ends, kind order)
//!
//! ## Label (host state)
//! - `label/mod.rs` - ActiveLabel: setters, batching, published snapshots
//! - `label/dispatch.rs` - Per-kind tap handlers and the delegate fallback
//! - `label/selection.rs` - Touch phases over text offsets
//!
//! ## WASM
//! - `wasm.rs` - ActiveTextCortex: JS class with UTF-16 ranges
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { ActiveTextCortex } from 'activetext';
//!
//! await init();
//!
//! const cortex = new ActiveTextCortex('{"pattern": "<([a-z0-9_]+)>([a-z0-9_]+)</\\\\1>", "case_insensitive": true}');
//! cortex.setReplaceHandler((caps) => caps[2]);
//! cortex.setText("方案ID：#<schemeId>123</schemeId>fsadfs @bob");
//!
//! console.log(cortex.finalText());   // 方案ID：#123fsadfs @bob
//! // "方案ID：#123fsadfs" starts with a CJK char, so only the regex and the mention are active
//! console.log(cortex.table());       // { mention: [...], hashtag: [], url: [], regex: [...] }
//! console.log(cortex.elementAt(18)); // { start, length, element: { kind: 'mention', value: 'bob' } }
//! ```

pub mod scanner;
pub mod label;
pub mod wasm;

// Public exports - Scanner
pub use scanner::*;

// Public exports - Label
pub use label::*;

// Public exports - WASM
pub use wasm::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Install the panic hook and route `tracing` output to the browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    tracing_wasm::set_as_global_default();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("activetext v{}", env!("CARGO_PKG_VERSION"))
}
