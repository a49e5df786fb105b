use crate::record::AttributeSource;

pub const LOGOUT_CONFIRM: &str = "Are you sure you want to log out?";
pub const DELETE_ACCOUNT_CONFIRM: &str =
    "Are you sure you want to delete your account? This action cannot be undone.";

pub const PLAYLIST_ID_ATTR: &str = "data-playlist-id";
pub const PLAYLIST_NAME_ATTR: &str = "data-playlist-name";
pub const SONG_ID_ATTR: &str = "data-song-id";
pub const SONG_NAME_ATTR: &str = "data-song-name";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaylistTarget {
    pub id: Option<String>,
    pub name: String,
}

impl PlaylistTarget {
    pub fn from_trigger<A: AttributeSource + ?Sized>(source: &A) -> Self {
        Self {
            id: source.attribute(PLAYLIST_ID_ATTR),
            name: source.attribute(PLAYLIST_NAME_ATTR).unwrap_or_default(),
        }
    }

    pub fn rename_title(&self) -> String {
        format!("Rename Playlist: {}", self.name)
    }

    pub fn delete_prompt(&self) -> String {
        format!("Are you sure you want to delete {}?", self.name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongRemoval {
    pub song_id: String,
    pub song_name: String,
    pub playlist_id: String,
    pub playlist_name: String,
}

impl SongRemoval {
    pub fn from_trigger<A: AttributeSource + ?Sized>(source: &A) -> Self {
        let read = |name: &str| source.attribute(name).unwrap_or_default();
        Self {
            song_id: read(SONG_ID_ATTR),
            song_name: read(SONG_NAME_ATTR),
            playlist_id: read(PLAYLIST_ID_ATTR),
            playlist_name: read(PLAYLIST_NAME_ATTR),
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to delete {} from {}?",
            self.song_name, self.playlist_name
        )
    }

    /// Hidden form fields of the delete-song modal, by element id.
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("playlistID", self.playlist_id.as_str()),
            ("songID", self.song_id.as_str()),
            ("playlistName", self.playlist_name.as_str()),
            ("songName", self.song_name.as_str()),
        ]
    }
}
