use anyhow::{bail, Context, Result};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Credentials and model selection handed to the text-generation client.
/// Core logic never reads these from the environment itself.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model_name: String,
    pub api_base: String,
}

/// How a resume document is turned into something the model can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationMode {
    /// First page rasterized to JPEG with poppler.
    Image,
    /// Plain text pulled out of the PDF.
    Text,
}

#[derive(Debug, Clone)]
pub struct DocumentConfig {
    pub mode: RepresentationMode,
    pub pdftoppm_path: String,
    pub raster_dpi: u32,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub document: DocumentConfig,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so parsing can be exercised
    /// without mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GOOGLE_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context("Required environment variable 'GOOGLE_API_KEY' is not set")?;

        let mode = match lookup("RESUME_REPRESENTATION").as_deref() {
            None | Some("image") => RepresentationMode::Image,
            Some("text") => RepresentationMode::Text,
            Some(other) => bail!("RESUME_REPRESENTATION must be 'image' or 'text', got '{other}'"),
        };

        Ok(Config {
            llm: LlmConfig {
                api_key,
                model_name: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_base: lookup("GEMINI_API_BASE")
                    .map(|base| base.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            },
            document: DocumentConfig {
                mode,
                pdftoppm_path: lookup("PDFTOPPM_PATH").unwrap_or_else(|| "pdftoppm".to_string()),
                raster_dpi: parse_or(&lookup, "RASTER_DPI", 200)?,
            },
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied_when_only_api_key_set() {
        let config = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "k")])).unwrap();
        assert_eq!(config.llm.api_key, "k");
        assert_eq!(config.llm.model_name, DEFAULT_MODEL);
        assert_eq!(config.llm.api_base, DEFAULT_API_BASE);
        assert_eq!(config.document.mode, RepresentationMode::Image);
        assert_eq!(config.document.pdftoppm_path, "pdftoppm");
        assert_eq!(config.document.raster_dpi, 200);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_api_key_fails() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_fails() {
        assert!(Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_overrides_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("GEMINI_API_BASE", "http://localhost:9000/v1beta/"),
            ("RESUME_REPRESENTATION", "text"),
            ("RASTER_DPI", "150"),
            ("PORT", "3000"),
        ]))
        .unwrap();
        assert_eq!(config.llm.model_name, "gemini-2.0-flash");
        assert_eq!(config.llm.api_base, "http://localhost:9000/v1beta");
        assert_eq!(config.document.mode, RepresentationMode::Text);
        assert_eq!(config.document.raster_dpi, 150);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "k"), ("PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_unknown_representation_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("RESUME_REPRESENTATION", "pdf"),
        ]));
        assert!(result.is_err());
    }
}
