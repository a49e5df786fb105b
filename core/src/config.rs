use std::fmt;

use serde::Deserialize;

use crate::popup::POPUP_NAME;
use crate::storage::{MODAL_DATA_KEY, REPLAY_FLAG_KEY};

pub const CONFIG_META_NAME: &str = "initmusic-config";

const DEFAULT_LOGOUT_URL: &str = "/logout";
const DEFAULT_LOGOUT_REDIRECT: &str = "/login?logout";

/// Page wiring: storage keys, element ids and endpoints. Every field has a
/// default, so a page override only needs to name what differs. The popup
/// size is fixed and not part of it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub modal_data_key: String,
    pub replay_flag_key: String,
    pub popup_name: String,
    pub logout_url: String,
    pub logout_redirect: String,
    pub csrf_meta_name: String,
    pub csrf_header_meta_name: String,
    pub logout_button_id: String,
    pub add_song_modal_id: String,
    pub create_playlist_form_id: String,
    pub rename_playlist_modal_id: String,
    pub rename_playlist_id_field: String,
    pub delete_playlist_modal_id: String,
    pub delete_playlist_id_field: String,
    pub delete_song_modal_id: String,
    pub new_password_id: String,
    pub confirm_password_id: String,
    pub password_error_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            modal_data_key: MODAL_DATA_KEY.to_string(),
            replay_flag_key: REPLAY_FLAG_KEY.to_string(),
            popup_name: POPUP_NAME.to_string(),
            logout_url: default_logout_url(),
            logout_redirect: DEFAULT_LOGOUT_REDIRECT.to_string(),
            csrf_meta_name: "_csrf".to_string(),
            csrf_header_meta_name: "_csrf_header".to_string(),
            logout_button_id: "logoutButton".to_string(),
            add_song_modal_id: "addSongModal".to_string(),
            create_playlist_form_id: "createPlaylistForm".to_string(),
            rename_playlist_modal_id: "renamePlaylistModal".to_string(),
            rename_playlist_id_field: "renamePlaylistID".to_string(),
            delete_playlist_modal_id: "deletePlaylistModal".to_string(),
            delete_playlist_id_field: "deletePlaylistID".to_string(),
            delete_song_modal_id: "deleteSongModal".to_string(),
            new_password_id: "newPassword".to_string(),
            confirm_password_id: "confirmPassword".to_string(),
            password_error_id: "passwordError".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(reason) => write!(f, "invalid client config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ClientConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}

fn default_logout_url() -> String {
    if let Some(raw) = option_env!("INITMUSIC_LOGOUT_PATH") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    DEFAULT_LOGOUT_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_override_is_default() {
        assert_eq!(ClientConfig::from_json("  ").unwrap(), ClientConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = ClientConfig::from_json(r#"{"addSongModalId":"addToPlaylist"}"#).unwrap();
        assert_eq!(config.add_song_modal_id, "addToPlaylist");
        assert_eq!(config.replay_flag_key, REPLAY_FLAG_KEY);
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(ClientConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn popup_size_cannot_be_overridden() {
        let config =
            ClientConfig::from_json(r#"{"popupWidth":0,"popupHeight":9000,"popupName":"p"}"#)
                .unwrap();
        assert_eq!(config.popup_name, "p");
        assert_eq!(
            config,
            ClientConfig {
                popup_name: "p".to_string(),
                ..ClientConfig::default()
            }
        );
    }
}
