use std::{collections::HashMap, fs};

#[derive(Debug)]
pub struct Settings {
    pub upload_url: Option<String>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            upload_url: None,
            log_filter: "info".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("demo.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("upload_url") {
                settings.upload_url = Some(v.clone());
            }
            if let Some(v) = file_cfg.get("log_filter") {
                settings.log_filter = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("DEMO_UPLOAD_URL") {
        settings.upload_url = Some(v);
    }
    if let Ok(v) = std::env::var("DEMO_LOG_FILTER") {
        settings.log_filter = v;
    }

    settings
}
