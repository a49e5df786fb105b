use web_sys::Window;

use initmusic_core::{PopupHost, PopupWindow, ScreenRect};

use crate::dom::js_err;

pub(crate) struct BrowserWindow(Window);

impl PopupWindow for BrowserWindow {
    fn close(&self) {
        if let Err(err) = self.0.close() {
            gloo::console::warn!("preview: close failed", js_err(err));
        }
    }

    fn is_closed(&self) -> bool {
        self.0.closed().unwrap_or(true)
    }
}

pub(crate) struct BrowserPopupHost {
    window: Window,
}

impl BrowserPopupHost {
    pub(crate) fn current() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }
}

impl PopupHost for BrowserPopupHost {
    type Window = BrowserWindow;

    fn screen(&self) -> ScreenRect {
        let Ok(screen) = self.window.screen() else {
            return ScreenRect::default();
        };
        ScreenRect {
            left: 0,
            top: 0,
            width: screen.width().unwrap_or(0),
            height: screen.height().unwrap_or(0),
        }
    }

    fn open_window(&self, url: &str, name: &str, features: &str) -> Option<BrowserWindow> {
        self.window
            .open_with_url_and_target_and_features(url, name, features)
            .ok()
            .flatten()
            .map(BrowserWindow)
    }
}
