use std::fmt;

pub const POPUP_NAME: &str = "songPreview";
pub const POPUP_WIDTH: i32 = 400;
pub const POPUP_HEIGHT: i32 = 300;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopupGeometry {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl PopupGeometry {
    pub fn centered(screen: ScreenRect, width: i32, height: i32) -> Self {
        let left = screen.left + ((screen.width - width) / 2).max(0);
        let top = screen.top + ((screen.height - height) / 2).max(0);
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn features(&self) -> String {
        format!(
            "width={},height={},left={},top={}",
            self.width, self.height, self.left, self.top
        )
    }
}

pub trait PopupWindow {
    fn close(&self);
    fn is_closed(&self) -> bool;
}

pub trait PopupHost {
    type Window: PopupWindow;

    fn screen(&self) -> ScreenRect;
    /// `None` when the browser refused to open the window.
    fn open_window(&self, url: &str, name: &str, features: &str) -> Option<Self::Window>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupError {
    EmptyUrl,
    Blocked { url: String },
}

impl fmt::Display for PopupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopupError::EmptyUrl => write!(f, "preview url is empty"),
            PopupError::Blocked { url } => write!(f, "popup blocked for {url}"),
        }
    }
}

impl std::error::Error for PopupError {}

/// Single owner of the song preview window. Opening always closes the
/// previous window first, so at most one handle is held.
pub struct PopupSlot<W> {
    handle: Option<W>,
    name: String,
    width: i32,
    height: i32,
}

impl<W: PopupWindow> Default for PopupSlot<W> {
    fn default() -> Self {
        Self::new(POPUP_NAME, POPUP_WIDTH, POPUP_HEIGHT)
    }
}

impl<W: PopupWindow> PopupSlot<W> {
    pub fn new(name: &str, width: i32, height: i32) -> Self {
        Self {
            handle: None,
            name: name.to_string(),
            width,
            height,
        }
    }

    pub fn open<H>(&mut self, host: &H, url: &str) -> Result<(), PopupError>
    where
        H: PopupHost<Window = W>,
    {
        let url = url.trim();
        if url.is_empty() {
            return Err(PopupError::EmptyUrl);
        }
        self.close();
        let geometry = PopupGeometry::centered(host.screen(), self.width, self.height);
        let window = host
            .open_window(url, &self.name, &geometry.features())
            .ok_or_else(|| PopupError::Blocked {
                url: url.to_string(),
            })?;
        self.handle = Some(window);
        Ok(())
    }

    pub fn close(&mut self) {
        let Some(window) = self.handle.take() else {
            return;
        };
        if !window.is_closed() {
            window.close();
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle
            .as_ref()
            .map(|window| !window.is_closed())
            .unwrap_or(false)
    }

    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// Document-level click. Clicks on a preview trigger are handled by the
    /// caller; anything else dismisses the popup.
    pub fn dismiss_on_outside_click(&mut self, on_preview_trigger: bool) -> bool {
        if on_preview_trigger || !self.has_handle() {
            return false;
        }
        let was_open = self.is_open();
        self.close();
        was_open
    }
}
