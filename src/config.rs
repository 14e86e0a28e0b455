/// Application-level constants
pub const APP_NAME: &str = "emr-predict";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Free-text entries longer than this are skipped with a warning.
pub const DEFAULT_MAX_ENTRY_CHARS: usize = 20_000;

/// Uploaded documents larger than this are rejected before decoding.
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 25 * 1024 * 1024; // 25MB

const MAX_ENTRY_CHARS_VAR: &str = "EMR_MAX_ENTRY_CHARS";
const MAX_DOCUMENT_BYTES_VAR: &str = "EMR_MAX_DOCUMENT_BYTES";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "emr_predict_lib=debug,emr_predict=debug,warn"
    } else {
        "emr_predict_lib=info,emr_predict=info,warn"
    }
}

/// Limits applied by the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub max_entry_chars: usize,
    pub max_document_bytes: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_entry_chars: DEFAULT_MAX_ENTRY_CHARS,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

impl ExtractorConfig {
    /// Defaults overridden by `EMR_MAX_ENTRY_CHARS` / `EMR_MAX_DOCUMENT_BYTES`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_entry_chars: read_limit(&lookup, MAX_ENTRY_CHARS_VAR)
                .unwrap_or(defaults.max_entry_chars),
            max_document_bytes: read_limit(&lookup, MAX_DOCUMENT_BYTES_VAR)
                .unwrap_or(defaults.max_document_bytes),
        }
    }
}

fn read_limit<T: std::str::FromStr + PartialOrd + Default>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() => Some(v),
        _ => {
            tracing::warn!(key, value = %raw, "Ignoring invalid limit override, using default");
            None
        }
    }
}
