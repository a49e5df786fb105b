use initmusic_core::{ClientConfig, CONFIG_META_NAME};

use crate::dom;

pub(crate) fn load_client_config() -> ClientConfig {
    let Some(raw) = dom::meta_content(CONFIG_META_NAME) else {
        return ClientConfig::default();
    };
    match ClientConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            gloo::console::warn!("client config: using defaults", err.to_string());
            ClientConfig::default()
        }
    }
}

pub(crate) fn csrf_token(config: &ClientConfig) -> Option<String> {
    dom::meta_content(&config.csrf_meta_name)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub(crate) fn csrf_header(config: &ClientConfig) -> Option<String> {
    dom::meta_content(&config.csrf_header_meta_name)
}
