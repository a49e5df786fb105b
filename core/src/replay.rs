//! Capture of song data before a page-reloading form submit, and its replay
//! into the add-to-playlist modal once the next page has loaded.

use std::fmt;

use crate::record::{AttributeSource, FieldSink, PendingModalData, PopulateReport};
use crate::storage::{SessionStore, StoreError, MODAL_DATA_KEY, REPLAY_FLAG_KEY};

const FLAG_TRUE: &str = "true";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayState {
    Idle,
    DataCaptured,
    PendingReplay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    Malformed(String),
    Store(StoreError),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Malformed(reason) => write!(f, "stored modal data is malformed: {reason}"),
            ReplayError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<StoreError> for ReplayError {
    fn from(err: StoreError) -> Self {
        ReplayError::Store(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulateOutcome {
    Populated(PopulateReport),
    NoRecord,
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOutcome {
    NotPending,
    /// Flag was present but not `"true"`; it has been removed.
    Discarded,
    NoRecord,
    Malformed(String),
    Replayed(PopulateReport),
}

impl ReplayOutcome {
    pub fn should_show_modal(&self) -> bool {
        matches!(self, ReplayOutcome::Replayed(_))
    }
}

pub struct ModalReplay<S> {
    store: S,
    data_key: String,
    flag_key: String,
}

impl<S: SessionStore> ModalReplay<S> {
    pub fn new(store: S) -> Self {
        Self::with_keys(store, MODAL_DATA_KEY, REPLAY_FLAG_KEY)
    }

    pub fn with_keys(store: S, data_key: &str, flag_key: &str) -> Self {
        Self {
            store,
            data_key: data_key.to_string(),
            flag_key: flag_key.to_string(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> ReplayState {
        if self.store.get(&self.flag_key).as_deref() == Some(FLAG_TRUE) {
            return ReplayState::PendingReplay;
        }
        if self.store.get(&self.data_key).is_some() {
            return ReplayState::DataCaptured;
        }
        ReplayState::Idle
    }

    /// Overwrites any previously captured record.
    pub fn capture(&self, data: &PendingModalData) -> Result<(), ReplayError> {
        let raw = data
            .to_json()
            .map_err(|err| ReplayError::Malformed(err.to_string()))?;
        self.store.set(&self.data_key, &raw)?;
        Ok(())
    }

    pub fn capture_from<A: AttributeSource + ?Sized>(
        &self,
        source: &A,
    ) -> Result<PendingModalData, ReplayError> {
        let data = PendingModalData::capture(source);
        self.capture(&data)?;
        Ok(data)
    }

    pub fn load_record(&self) -> Result<Option<PendingModalData>, ReplayError> {
        let Some(raw) = self.store.get(&self.data_key) else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        PendingModalData::from_json(&raw)
            .map(Some)
            .map_err(|err| ReplayError::Malformed(err.to_string()))
    }

    pub fn populate<F: FieldSink + ?Sized>(&self, sink: &mut F) -> PopulateOutcome {
        match self.load_record() {
            Ok(Some(data)) => PopulateOutcome::Populated(data.populate(sink)),
            Ok(None) => PopulateOutcome::NoRecord,
            Err(err) => PopulateOutcome::Malformed(err.to_string()),
        }
    }

    /// Arms the replay for the next page load. Returns false (and sets
    /// nothing) when there is no usable record to replay.
    pub fn mark_pending(&self) -> Result<bool, ReplayError> {
        match self.load_record() {
            Ok(Some(_)) => {
                self.store.set(&self.flag_key, FLAG_TRUE)?;
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(ReplayError::Malformed(_)) => {
                self.store.remove(&self.data_key);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Runs once per page load. Flag and record are both cleared whenever the
    /// flag was armed, so a second load never replays again.
    pub fn replay_on_load<F: FieldSink + ?Sized>(&self, sink: &mut F) -> ReplayOutcome {
        let Some(flag) = self.store.get(&self.flag_key) else {
            return ReplayOutcome::NotPending;
        };
        self.store.remove(&self.flag_key);
        if flag != FLAG_TRUE {
            return ReplayOutcome::Discarded;
        }
        let outcome = match self.populate(sink) {
            PopulateOutcome::Populated(report) => ReplayOutcome::Replayed(report),
            PopulateOutcome::NoRecord => ReplayOutcome::NoRecord,
            PopulateOutcome::Malformed(reason) => ReplayOutcome::Malformed(reason),
        };
        self.store.remove(&self.data_key);
        outcome
    }

    pub fn clear(&self) {
        self.store.remove(&self.flag_key);
        self.store.remove(&self.data_key);
    }
}
