use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Anything that can answer `getAttribute(name)`.
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<String>;
}

impl AttributeSource for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl AttributeSource for [(&str, &str)] {
    fn attribute(&self, name: &str) -> Option<String> {
        self.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }
}

/// Destination for modal field writes, keyed by element id.
pub trait FieldSink {
    /// Returns false when no field with that id exists.
    fn set_field(&mut self, id: &str, value: &str) -> bool;
}

impl FieldSink for HashMap<String, String> {
    fn set_field(&mut self, id: &str, value: &str) -> bool {
        self.insert(id.to_string(), value.to_string());
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SongField {
    SongId,
    SongName,
    SongLength,
    ArtistName,
    ArtistId,
    AlbumName,
    AlbumId,
    SongImg,
    SongPreview,
}

#[derive(Clone, Copy, Debug)]
pub struct SongBinding {
    pub field: SongField,
    pub attribute: &'static str,
    pub field_id: &'static str,
}

pub const SONG_BINDINGS: &[SongBinding] = &[
    SongBinding {
        field: SongField::SongId,
        attribute: "data-song-id",
        field_id: "songID",
    },
    SongBinding {
        field: SongField::SongName,
        attribute: "data-song-name",
        field_id: "songName",
    },
    SongBinding {
        field: SongField::SongLength,
        attribute: "data-song-length",
        field_id: "songLength",
    },
    SongBinding {
        field: SongField::ArtistName,
        attribute: "data-artist-name",
        field_id: "artistName",
    },
    SongBinding {
        field: SongField::ArtistId,
        attribute: "data-artist-id",
        field_id: "artistID",
    },
    SongBinding {
        field: SongField::AlbumName,
        attribute: "data-album-name",
        field_id: "albumName",
    },
    SongBinding {
        field: SongField::AlbumId,
        attribute: "data-album-id",
        field_id: "albumID",
    },
    SongBinding {
        field: SongField::SongImg,
        attribute: "data-song-img",
        field_id: "songImg",
    },
    SongBinding {
        field: SongField::SongPreview,
        attribute: "data-song-pre",
        field_id: "songPreview",
    },
];

/// Song attributes captured from an "add to playlist" trigger.
///
/// Serialized as the JSON record kept in session storage across a reload.
/// Attributes missing on the trigger stay `None` and are left out of the JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PendingModalData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_img: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_preview: Option<String>,
}

impl PendingModalData {
    pub fn capture<A: AttributeSource + ?Sized>(source: &A) -> Self {
        let mut data = Self::default();
        for binding in SONG_BINDINGS {
            *data.slot_mut(binding.field) = source.attribute(binding.attribute);
        }
        data
    }

    pub fn get(&self, field: SongField) -> Option<&str> {
        let value = match field {
            SongField::SongId => &self.song_id,
            SongField::SongName => &self.song_name,
            SongField::SongLength => &self.song_length,
            SongField::ArtistName => &self.artist_name,
            SongField::ArtistId => &self.artist_id,
            SongField::AlbumName => &self.album_name,
            SongField::AlbumId => &self.album_id,
            SongField::SongImg => &self.song_img,
            SongField::SongPreview => &self.song_preview,
        };
        value.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        SONG_BINDINGS
            .iter()
            .all(|binding| self.get(binding.field).is_none())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Writes every bound field; absent values clear the field.
    pub fn populate<S: FieldSink + ?Sized>(&self, sink: &mut S) -> PopulateReport {
        let mut report = PopulateReport::default();
        for binding in SONG_BINDINGS {
            let value = self.get(binding.field).unwrap_or("");
            if sink.set_field(binding.field_id, value) {
                report.written += 1;
            } else {
                report.missing.push(binding.field_id);
            }
        }
        report
    }

    fn slot_mut(&mut self, field: SongField) -> &mut Option<String> {
        match field {
            SongField::SongId => &mut self.song_id,
            SongField::SongName => &mut self.song_name,
            SongField::SongLength => &mut self.song_length,
            SongField::ArtistName => &mut self.artist_name,
            SongField::ArtistId => &mut self.artist_id,
            SongField::AlbumName => &mut self.album_name,
            SongField::AlbumId => &mut self.album_id,
            SongField::SongImg => &mut self.song_img,
            SongField::SongPreview => &mut self.song_preview,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PopulateReport {
    pub written: usize,
    pub missing: Vec<&'static str>,
}
