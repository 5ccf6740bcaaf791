//! Label profiles: a [`LabelConfig`] stored as JSON.
//!
//! ```json
//! {
//!   "label": { "width_mm": 70, "height_mm": 36, "dpi": 203 },
//!   "fields": [
//!     { "source": "sku", "kind": "text", "char_height_mm": 20, "char_width_mm": 10,
//!       "padding": { "left": 5, "top": 5 } },
//!     { "source": "batch", "kind": "wrapped_text", "justification": "right",
//!       "anchor": "bottom", "char_height_mm": 8, "char_width_mm": 6,
//!       "padding": { "left": 5, "right": 5, "bottom": 5 } }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use crate::config::{ConfigError, LabelConfig};

/// Parse and validate a label profile from a JSON string.
pub fn load_profile_from_str(s: &str) -> Result<LabelConfig, ConfigError> {
    let config: LabelConfig = serde_json::from_str(s)?;
    config.validate()?;
    Ok(config)
}

/// Read, parse, and validate a label profile file.
pub fn load_profile(path: impl AsRef<Path>) -> Result<LabelConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    load_profile_from_str(&text)
}
