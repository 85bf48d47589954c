//! User-supplied service URLs and their persisted record format.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Key under which the serialized record is kept in the local store.
pub const CONFIG_STORE_KEY: &str = "yt_brainrot_cfg";

/// Service URLs as edited in the panel. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceUrls {
    pub ollama_url: String,
    pub piper_url: String,
    pub sd_url: String,
}

/// Persisted form of [`ServiceUrls`]. Empty values are stored as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfig {
    pub ollama_url: Option<String>,
    pub piper_url: Option<String>,
    pub sd_url: Option<String>,
}

/// One of the three editable URL fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlField {
    Ollama,
    Piper,
    StableDiffusion,
}

impl UrlField {
    pub const ALL: [UrlField; 3] = [Self::Ollama, Self::Piper, Self::StableDiffusion];

    pub fn label(self) -> &'static str {
        match self {
            Self::Ollama => "Ollama URL",
            Self::Piper => "Piper URL",
            Self::StableDiffusion => "Stable Diffusion URL",
        }
    }
}

impl FromStr for UrlField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "piper" => Ok(Self::Piper),
            "sd" | "a1111" => Ok(Self::StableDiffusion),
            other => Err(CoreError::Validation(format!(
                "Unknown service field \"{other}\" (expected ollama, piper or sd)"
            ))),
        }
    }
}

/// `Some(value)` unless the value is empty.
pub fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl ServiceUrls {
    pub fn get(&self, field: UrlField) -> &str {
        match field {
            UrlField::Ollama => &self.ollama_url,
            UrlField::Piper => &self.piper_url,
            UrlField::StableDiffusion => &self.sd_url,
        }
    }

    pub fn set(&mut self, field: UrlField, value: impl Into<String>) {
        let value = value.into();
        match field {
            UrlField::Ollama => self.ollama_url = value,
            UrlField::Piper => self.piper_url = value,
            UrlField::StableDiffusion => self.sd_url = value,
        }
    }

    pub fn to_record(&self) -> StoredConfig {
        StoredConfig {
            ollama_url: non_empty(&self.ollama_url),
            piper_url: non_empty(&self.piper_url),
            sd_url: non_empty(&self.sd_url),
        }
    }

    /// Read a stored record field by field.
    ///
    /// A field that is absent, `null` or not a string becomes empty; the
    /// other fields are still used.
    pub fn from_record_value(value: &serde_json::Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            ollama_url: field("ollamaUrl"),
            piper_url: field("piperUrl"),
            sd_url: field("sdUrl"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_stored_as_null() {
        let urls = ServiceUrls {
            ollama_url: "http://x".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(urls.to_record()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"ollamaUrl": "http://x", "piperUrl": null, "sdUrl": null})
        );
    }

    #[test]
    fn invalid_fields_read_as_empty() {
        let value = serde_json::json!({"ollamaUrl": 42, "sdUrl": "http://sd:7860"});
        let urls = ServiceUrls::from_record_value(&value);
        assert_eq!(urls.ollama_url, "");
        assert_eq!(urls.piper_url, "");
        assert_eq!(urls.sd_url, "http://sd:7860");
    }

    #[test]
    fn non_object_record_reads_as_defaults() {
        let urls = ServiceUrls::from_record_value(&serde_json::json!([1, 2, 3]));
        assert_eq!(urls, ServiceUrls::default());
    }

    #[test]
    fn url_field_parsing() {
        assert_eq!("Ollama".parse::<UrlField>().unwrap(), UrlField::Ollama);
        assert_eq!("sd".parse::<UrlField>().unwrap(), UrlField::StableDiffusion);
        assert!("coqui".parse::<UrlField>().is_err());
    }

    #[test]
    fn set_and_get_round_through_field() {
        let mut urls = ServiceUrls::default();
        urls.set(UrlField::Piper, "http://piper:5002");
        assert_eq!(urls.get(UrlField::Piper), "http://piper:5002");
    }
}
