use crate::record::AttributeSource;

pub const ACTION_ATTR: &str = "data-action";
pub const PREVIEW_URL_ATTR: &str = "data-url";
pub const CONFIRM_ATTR: &str = "data-confirm";

/// What a clicked element asks the page to do, read from `data-action`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerRole {
    Preview,
    AddToPlaylist,
    Logout,
    GoBack,
}

impl TriggerRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "preview" => Some(TriggerRole::Preview),
            "add-to-playlist" => Some(TriggerRole::AddToPlaylist),
            "logout" => Some(TriggerRole::Logout),
            "go-back" => Some(TriggerRole::GoBack),
            _ => None,
        }
    }

    pub fn of<A: AttributeSource + ?Sized>(source: &A) -> Option<Self> {
        source.attribute(ACTION_ATTR).as_deref().and_then(Self::parse)
    }
}

pub fn is_preview_trigger<A: AttributeSource + ?Sized>(source: &A) -> bool {
    TriggerRole::of(source) == Some(TriggerRole::Preview)
}

/// Preview target: `data-url`, falling back to `href`.
pub fn preview_url<A: AttributeSource + ?Sized>(source: &A) -> Option<String> {
    source
        .attribute(PREVIEW_URL_ATTR)
        .or_else(|| source.attribute("href"))
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty() && url != "#")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmKind {
    DeleteAccount,
}

impl ConfirmKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "delete-account" => Some(ConfirmKind::DeleteAccount),
            _ => None,
        }
    }

    pub fn of<A: AttributeSource + ?Sized>(source: &A) -> Option<Self> {
        source.attribute(CONFIRM_ATTR).as_deref().and_then(Self::parse)
    }

    pub fn message(self) -> &'static str {
        match self {
            ConfirmKind::DeleteAccount => crate::prompts::DELETE_ACCOUNT_CONFIRM,
        }
    }
}
