pub mod account;
pub mod config;
pub mod popup;
pub mod prompts;
pub mod record;
pub mod replay;
pub mod storage;
pub mod trigger;

pub use account::{validate_password, LogoutRequest, PasswordError};
pub use config::{ClientConfig, ConfigError, CONFIG_META_NAME};
pub use popup::{PopupError, PopupGeometry, PopupHost, PopupSlot, PopupWindow, ScreenRect};
pub use prompts::{PlaylistTarget, SongRemoval};
pub use record::{AttributeSource, FieldSink, PendingModalData, PopulateReport, SONG_BINDINGS};
pub use replay::{ModalReplay, PopulateOutcome, ReplayError, ReplayOutcome, ReplayState};
pub use storage::{MemoryStore, SessionStore, StoreError};
pub use trigger::{is_preview_trigger, preview_url, ConfirmKind, TriggerRole};
