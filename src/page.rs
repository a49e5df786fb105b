use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlFormElement};

use initmusic_core::account::PASSWORD_MISMATCH_MESSAGE;
use initmusic_core::popup::{POPUP_HEIGHT, POPUP_WIDTH};
use initmusic_core::trigger::ACTION_ATTR;
use initmusic_core::{
    is_preview_trigger, preview_url, validate_password, ClientConfig, ConfirmKind, ModalReplay,
    PendingModalData, PopupHost, PopupSlot, ReplayOutcome, TriggerRole,
};

use crate::dom::{self, js_err, DocumentFields, ElementAttributes};
use crate::logout;
use crate::modal;
use crate::popup::BrowserPopupHost;
use crate::session::BrowserSessionStore;

thread_local! {
    static PAGE: RefCell<Option<Rc<PageRuntime>>> = RefCell::new(None);
}

/// Everything one page load owns: the preview popup, the replay store and
/// the delegated listeners. Dropping it detaches every listener.
pub(crate) struct PageRuntime<H: PopupHost = BrowserPopupHost> {
    config: ClientConfig,
    host: Option<H>,
    popup: RefCell<PopupSlot<H::Window>>,
    replay: ModalReplay<BrowserSessionStore>,
    listeners: RefCell<Vec<EventListener>>,
}

impl PageRuntime {
    fn new(config: ClientConfig) -> Self {
        Self::with_host(config, BrowserPopupHost::current())
    }
}

impl<H: PopupHost + 'static> PageRuntime<H> {
    fn with_host(config: ClientConfig, host: Option<H>) -> Self {
        let popup = PopupSlot::new(&config.popup_name, POPUP_WIDTH, POPUP_HEIGHT);
        let replay = ModalReplay::with_keys(
            BrowserSessionStore::open(),
            &config.modal_data_key,
            &config.replay_flag_key,
        );
        Self {
            config,
            host,
            popup: RefCell::new(popup),
            replay,
            listeners: RefCell::new(Vec::new()),
        }
    }

    fn install(self: &Rc<Self>) {
        let Some(document) = dom::document() else {
            gloo::console::warn!("page: no document, nothing installed");
            return;
        };
        let mut listeners = Vec::new();

        let runtime = Rc::downgrade(self);
        listeners.push(EventListener::new_with_options(
            &document,
            "click",
            EventListenerOptions {
                phase: EventListenerPhase::Bubble,
                passive: false,
            },
            move |event: &Event| {
                if let Some(runtime) = runtime.upgrade() {
                    runtime.handle_click(event);
                }
            },
        ));

        let runtime = Rc::downgrade(self);
        listeners.push(EventListener::new_with_options(
            &document,
            "submit",
            EventListenerOptions {
                phase: EventListenerPhase::Bubble,
                passive: false,
            },
            move |event: &Event| {
                if let Some(runtime) = runtime.upgrade() {
                    runtime.handle_submit(event);
                }
            },
        ));

        listeners.extend(modal::install_playlist_modals(&self.config));
        *self.listeners.borrow_mut() = listeners;
    }

    fn handle_click(&self, event: &Event) {
        let trigger = dom::closest_from_event(event, &format!("[{ACTION_ATTR}]"));
        let on_preview = trigger
            .as_ref()
            .is_some_and(|element| is_preview_trigger(&ElementAttributes(element)));
        if self.popup.borrow_mut().dismiss_on_outside_click(on_preview) {
            gloo::console::log!("preview: closed by outside click");
        }

        let role = trigger
            .as_ref()
            .and_then(|element| TriggerRole::of(&ElementAttributes(element)));

        match (role, trigger) {
            (Some(TriggerRole::Preview), Some(trigger)) => {
                event.prevent_default();
                self.open_preview(&trigger);
            }
            (Some(TriggerRole::AddToPlaylist), Some(trigger)) => self.capture_song(&trigger),
            (Some(TriggerRole::Logout), _) => {
                event.prevent_default();
                logout::confirm_and_logout(&self.config);
            }
            (Some(TriggerRole::GoBack), _) => {
                event.prevent_default();
                go_back();
            }
            _ => {
                let selector = format!("#{}", self.config.logout_button_id);
                if dom::closest_from_event(event, &selector).is_some() {
                    event.prevent_default();
                    logout::confirm_and_logout(&self.config);
                }
            }
        }
    }

    fn open_preview(&self, trigger: &Element) {
        let Some(url) = preview_url(&ElementAttributes(trigger)) else {
            gloo::console::warn!("preview: trigger has no url");
            return;
        };
        let Some(host) = self.host.as_ref() else {
            gloo::console::warn!("preview: no window to open from");
            return;
        };
        if let Err(err) = self.popup.borrow_mut().open(host, &url) {
            gloo::console::warn!("preview:", err.to_string());
        }
    }

    fn capture_song(&self, trigger: &Element) {
        let data = match self.replay.capture_from(&ElementAttributes(trigger)) {
            Ok(data) => data,
            Err(err) => {
                gloo::console::warn!("modal replay: capture not stored", err.to_string());
                PendingModalData::capture(&ElementAttributes(trigger))
            }
        };
        let report = data.populate(&mut DocumentFields::new());
        for id in report.missing {
            gloo::console::warn!("modal replay: missing field", id);
        }
    }

    fn handle_submit(&self, event: &Event) {
        let Some(form) = event
            .target()
            .and_then(|target| target.dyn_into::<HtmlFormElement>().ok())
        else {
            return;
        };

        if let Some(kind) = ConfirmKind::of(&ElementAttributes(&form)) {
            if !dom::confirm(kind.message()) {
                event.prevent_default();
                return;
            }
        }

        if !self.check_password_form(&form) {
            event.prevent_default();
            return;
        }

        if form.id() == self.config.create_playlist_form_id {
            match self.replay.mark_pending() {
                Ok(true) => gloo::console::log!("modal replay: armed for next load"),
                Ok(false) => {}
                Err(err) => gloo::console::warn!("modal replay: not armed", err.to_string()),
            }
        }
    }

    /// False when the form holds the password pair and they differ.
    fn check_password_form(&self, form: &Element) -> bool {
        let config = &self.config;
        let has_pair = dom::query(form, &format!("#{}", config.new_password_id)).is_some()
            && dom::query(form, &format!("#{}", config.confirm_password_id)).is_some();
        if !has_pair {
            return true;
        }
        let password = dom::input_value(&config.new_password_id).unwrap_or_default();
        let confirm = dom::input_value(&config.confirm_password_id).unwrap_or_default();
        let error = dom::element_by_id(&config.password_error_id);
        match validate_password(&password, &confirm) {
            Ok(()) => {
                if let Some(error) = error {
                    dom::set_text(&error, "");
                }
                true
            }
            Err(_) => {
                if let Some(error) = error {
                    dom::set_text(&error, PASSWORD_MISMATCH_MESSAGE);
                }
                if let Some(field) = dom::element_by_id(&config.confirm_password_id) {
                    dom::focus(&field);
                }
                false
            }
        }
    }

    fn replay_pending_modal(&self) {
        let outcome = self.replay.replay_on_load(&mut DocumentFields::new());
        match &outcome {
            ReplayOutcome::NotPending => return,
            ReplayOutcome::Discarded => gloo::console::log!("modal replay: stale flag discarded"),
            ReplayOutcome::NoRecord => gloo::console::warn!("modal replay: flag set but no record"),
            ReplayOutcome::Malformed(reason) => {
                gloo::console::warn!("modal replay: malformed record", reason.clone())
            }
            ReplayOutcome::Replayed(report) => {
                for id in &report.missing {
                    gloo::console::warn!("modal replay: missing field", *id);
                }
            }
        }
        if !outcome.should_show_modal() {
            return;
        }
        if let Err(err) = modal::show_modal(&self.config.add_song_modal_id) {
            gloo::console::warn!("modal replay: cannot show modal", err);
        }
    }
}

fn go_back() {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(err) = window.history().and_then(|history| history.back()) {
        gloo::console::warn!("go back:", js_err(err));
    }
}

pub(crate) fn start() {
    let runtime = Rc::new(PageRuntime::new(crate::config::load_client_config()));
    runtime.install();
    runtime.replay_pending_modal();
    PAGE.with(|slot| {
        *slot.borrow_mut() = Some(runtime);
    });
    gloo::console::log!("page: ready");
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use initmusic_core::{PopupWindow, ScreenRect, SessionStore};
    use js_sys::{Function, Reflect};
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::*;
    use web_sys::{EventInit, HtmlInputElement};

    wasm_bindgen_test_configure!(run_in_browser);

    struct FakeWindow {
        closed: Rc<Cell<bool>>,
    }

    impl PopupWindow for FakeWindow {
        fn close(&self) {
            self.closed.set(true);
        }

        fn is_closed(&self) -> bool {
            self.closed.get()
        }
    }

    #[derive(Default)]
    struct FakeHost {
        opened: RefCell<Vec<(String, String)>>,
        windows: RefCell<Vec<Rc<Cell<bool>>>>,
    }

    impl PopupHost for FakeHost {
        type Window = FakeWindow;

        fn screen(&self) -> ScreenRect {
            ScreenRect {
                left: 0,
                top: 0,
                width: 1280,
                height: 800,
            }
        }

        fn open_window(&self, url: &str, _name: &str, features: &str) -> Option<FakeWindow> {
            self.opened
                .borrow_mut()
                .push((url.to_string(), features.to_string()));
            let closed = Rc::new(Cell::new(false));
            self.windows.borrow_mut().push(closed.clone());
            Some(FakeWindow { closed })
        }
    }

    fn mount(html: &str) -> Element {
        let document = dom::document().unwrap();
        let host = document.create_element("div").unwrap();
        host.set_inner_html(html);
        document.body().unwrap().append_child(&host).unwrap();
        host
    }

    fn value_of(id: &str) -> String {
        dom::element_by_id(id)
            .unwrap()
            .dyn_into::<HtmlInputElement>()
            .unwrap()
            .value()
    }

    fn test_config(suffix: &str) -> ClientConfig {
        ClientConfig {
            modal_data_key: format!("test.{suffix}.data"),
            replay_flag_key: format!("test.{suffix}.flag"),
            ..ClientConfig::default()
        }
    }

    fn installed(suffix: &str) -> Rc<PageRuntime<FakeHost>> {
        let runtime = Rc::new(PageRuntime::with_host(
            test_config(suffix),
            Some(FakeHost::default()),
        ));
        runtime.install();
        runtime
    }

    /// Dispatches a bubbling, cancelable event so the document listeners see it.
    fn fire(target: &Element, kind: &str) -> Event {
        let init = EventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        let event = Event::new_with_event_init_dict(kind, &init).unwrap();
        target.dispatch_event(&event).unwrap();
        event
    }

    fn answer_confirm(answer: bool) -> JsValue {
        let window = web_sys::window().unwrap();
        let key = JsValue::from_str("confirm");
        let original = Reflect::get(&window, &key).unwrap();
        let body = if answer { "return true;" } else { "return false;" };
        Reflect::set(&window, &key, &Function::new_no_args(body)).unwrap();
        original
    }

    fn restore_confirm(original: &JsValue) {
        let window = web_sys::window().unwrap();
        Reflect::set(&window, &JsValue::from_str("confirm"), original).unwrap();
    }

    #[wasm_bindgen_test]
    fn add_to_playlist_click_captures_and_populates() {
        let host = mount(
            r#"<button id="t1" data-action="add-to-playlist" data-song-id="42"
                  data-song-name="Test"></button>
               <input id="songID"><input id="songName">"#,
        );
        let runtime = installed("capture");
        fire(&dom::element_by_id("t1").unwrap(), "click");
        assert_eq!(value_of("songID"), "42");
        assert_eq!(value_of("songName"), "Test");
        assert_eq!(
            runtime.replay.store().get("test.capture.data").as_deref(),
            Some(r#"{"songId":"42","songName":"Test"}"#)
        );
        runtime.replay.clear();
        host.remove();
    }

    #[wasm_bindgen_test]
    fn preview_clicks_keep_one_popup_and_outside_click_closes_it() {
        let host = mount(
            r##"<a id="pv1" href="#" data-action="preview" data-url="/preview/1">
                  <span id="pv1-label">1</span>
               </a>
               <a id="pv2" href="/preview/2" data-action="preview"></a>
               <div id="elsewhere"></div>"##,
        );
        let runtime = installed("popup");
        let popup_host = runtime.host.as_ref().unwrap();

        let event = fire(&dom::element_by_id("pv1-label").unwrap(), "click");
        assert!(event.default_prevented());
        assert!(runtime.popup.borrow().is_open());
        assert_eq!(
            popup_host.opened.borrow()[0],
            (
                "/preview/1".to_string(),
                "width=400,height=300,left=440,top=250".to_string()
            )
        );

        fire(&dom::element_by_id("pv2").unwrap(), "click");
        assert_eq!(popup_host.opened.borrow().len(), 2);
        assert_eq!(popup_host.opened.borrow()[1].0, "/preview/2");
        assert!(popup_host.windows.borrow()[0].get());
        assert!(!popup_host.windows.borrow()[1].get());

        let event = fire(&dom::element_by_id("elsewhere").unwrap(), "click");
        assert!(!event.default_prevented());
        assert!(popup_host.windows.borrow()[1].get());
        assert!(!runtime.popup.borrow().is_open());

        fire(&dom::element_by_id("elsewhere").unwrap(), "click");
        assert_eq!(popup_host.opened.borrow().len(), 2);
        host.remove();
    }

    #[wasm_bindgen_test]
    fn create_playlist_submit_arms_replay_only_with_a_record() {
        let host = mount(r#"<form id="createPlaylistForm"></form>"#);
        let runtime = installed("arm");
        let form = dom::element_by_id("createPlaylistForm").unwrap();

        fire(&form, "submit");
        assert_eq!(runtime.replay.store().get("test.arm.flag"), None);

        let trigger: &[(&str, &str)] = &[("data-song-id", "42")];
        runtime.replay.capture_from(trigger).unwrap();
        let event = fire(&form, "submit");
        assert!(!event.default_prevented());
        assert_eq!(
            runtime.replay.store().get("test.arm.flag").as_deref(),
            Some("true")
        );
        runtime.replay.clear();
        host.remove();
    }

    #[wasm_bindgen_test]
    fn pending_replay_fills_fields_and_clears_the_flag() {
        let host = mount(
            r#"<input id="songID"><input id="songName"><input id="artistName" value="stale">"#,
        );
        let runtime = PageRuntime::new(test_config("reload"));
        let store = runtime.replay.store();
        store
            .set("test.reload.data", r#"{"songId":"42","songName":"Test"}"#)
            .unwrap();
        store.set("test.reload.flag", "true").unwrap();

        runtime.replay_pending_modal();
        assert_eq!(value_of("songID"), "42");
        assert_eq!(value_of("songName"), "Test");
        assert_eq!(value_of("artistName"), "");
        assert_eq!(store.get("test.reload.flag"), None);
        assert_eq!(store.get("test.reload.data"), None);

        dom::set_input_value(&dom::element_by_id("songID").unwrap(), "edited");
        runtime.replay_pending_modal();
        assert_eq!(value_of("songID"), "edited");
        host.remove();
    }

    #[wasm_bindgen_test]
    fn replay_without_flag_writes_nothing() {
        let host = mount(r#"<input id="songID" value="keep">"#);
        let runtime = PageRuntime::new(test_config("idle"));
        runtime.replay_pending_modal();
        assert_eq!(value_of("songID"), "keep");
        host.remove();
    }

    #[wasm_bindgen_test]
    fn account_delete_needs_confirmation() {
        let host = mount(r#"<form id="deleteAccount" data-confirm="delete-account"></form>"#);
        let runtime = installed("delete");
        let form = dom::element_by_id("deleteAccount").unwrap();

        let original = answer_confirm(false);
        let declined = fire(&form, "submit");
        answer_confirm(true);
        let accepted = fire(&form, "submit");
        restore_confirm(&original);

        assert!(declined.default_prevented());
        assert!(!accepted.default_prevented());
        drop(runtime);
        host.remove();
    }

    #[wasm_bindgen_test]
    fn mismatched_password_form_is_blocked() {
        let host = mount(
            r#"<form id="pw">
                  <input id="newPassword" value="a"><input id="confirmPassword" value="b">
               </form>
               <span id="passwordError"></span>"#,
        );
        let runtime = installed("pw");
        let event = fire(&dom::element_by_id("pw").unwrap(), "submit");
        assert!(event.default_prevented());
        let error = dom::element_by_id("passwordError").unwrap();
        assert_eq!(error.text_content().as_deref(), Some(PASSWORD_MISMATCH_MESSAGE));

        dom::set_input_value(&dom::element_by_id("confirmPassword").unwrap(), "a");
        let event = fire(&dom::element_by_id("pw").unwrap(), "submit");
        assert!(!event.default_prevented());
        assert_eq!(error.text_content().as_deref(), Some(""));
        drop(runtime);
        host.remove();
    }
}
