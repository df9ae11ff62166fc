use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};

pub const DEFAULT_CONFIG_FILE: &str = "dto_form.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub question_bank_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_anon_key: None,
            question_bank_path: PathBuf::from("question_bank.json"),
        }
    }
}

impl Settings {
    /// Project URL and anon key, required for any real insert.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let url = self
            .supabase_url
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("missing SUPABASE_URL (or supabase_url in config)"))?;
        let key = self
            .supabase_anon_key
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("missing SUPABASE_ANON_KEY (or supabase_anon_key in config)"))?;
        Ok((url, key))
    }
}

/// Reads the config file (optional when `config_path` is not given) and then
/// applies environment overrides.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let raw = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == ErrorKind::NotFound && config_path.is_none() => None,
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };

    resolve_settings(raw.as_deref(), |key| std::env::var(key).ok())
        .with_context(|| format!("invalid config file '{}'", path.display()))
}

pub fn resolve_settings(
    file_raw: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file_raw {
        let file_cfg: HashMap<String, String> = toml::from_str(raw)?;
        if let Some(v) = file_cfg.get("supabase_url") {
            settings.supabase_url = Some(v.clone());
        }
        if let Some(v) = file_cfg.get("supabase_anon_key") {
            settings.supabase_anon_key = Some(v.clone());
        }
        if let Some(v) = file_cfg.get("question_bank") {
            settings.question_bank_path = PathBuf::from(v);
        }
    }

    // Later names win.
    for key in ["VITE_SUPABASE_URL", "SUPABASE_URL", "APP__SUPABASE_URL"] {
        if let Some(v) = env(key) {
            settings.supabase_url = Some(v);
        }
    }
    for key in [
        "VITE_SUPABASE_ANON_KEY",
        "SUPABASE_ANON_KEY",
        "APP__SUPABASE_ANON_KEY",
    ] {
        if let Some(v) = env(key) {
            settings.supabase_anon_key = Some(v);
        }
    }
    if let Some(v) = env("APP__QUESTION_BANK") {
        settings.question_bank_path = PathBuf::from(v);
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
