use gloo::events::EventListener;
use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event};

use initmusic_core::{ClientConfig, FieldSink, PlaylistTarget, SongRemoval};

use crate::dom::{self, DocumentFields, ElementAttributes};

const SHOW_EVENT: &str = "show.bs.modal";

/// Shows a Bootstrap modal through `bootstrap.Modal.getOrCreateInstance`.
pub(crate) fn show_modal(id: &str) -> Result<(), String> {
    let element = dom::element_by_id(id).ok_or_else(|| format!("missing modal #{id}"))?;
    let window = web_sys::window().ok_or_else(|| "missing window".to_string())?;
    let bootstrap = Reflect::get(&window, &JsValue::from_str("bootstrap")).map_err(dom::js_err)?;
    if bootstrap.is_null() || bootstrap.is_undefined() {
        return Err("bootstrap is not loaded".to_string());
    }
    let modal_class = Reflect::get(&bootstrap, &JsValue::from_str("Modal")).map_err(dom::js_err)?;
    let factory = Reflect::get(&modal_class, &JsValue::from_str("getOrCreateInstance"))
        .map_err(dom::js_err)?
        .dyn_into::<Function>()
        .map_err(|_| "bootstrap.Modal.getOrCreateInstance missing".to_string())?;
    let instance = factory.call1(&modal_class, &element).map_err(dom::js_err)?;
    let show = Reflect::get(&instance, &JsValue::from_str("show"))
        .map_err(dom::js_err)?
        .dyn_into::<Function>()
        .map_err(|_| "modal instance has no show()".to_string())?;
    show.call0(&instance).map_err(dom::js_err)?;
    Ok(())
}

/// The button that opened the modal (`event.relatedTarget` on `show.bs.modal`).
fn related_trigger(event: &Event) -> Option<Element> {
    let value = Reflect::get(event, &JsValue::from_str("relatedTarget")).ok()?;
    value.dyn_into::<Element>().ok()
}

fn on_show<F>(modal: &Element, handler: F) -> EventListener
where
    F: Fn(&Element, &Element) + 'static,
{
    let modal_for_cb = modal.clone();
    EventListener::new(modal, SHOW_EVENT, move |event: &Event| {
        let Some(trigger) = related_trigger(event) else {
            return;
        };
        handler(&modal_for_cb, &trigger);
    })
}

pub(crate) fn install_playlist_modals(config: &ClientConfig) -> Vec<EventListener> {
    let mut listeners = Vec::new();

    if let Some(modal) = dom::element_by_id(&config.rename_playlist_modal_id) {
        let id_field = config.rename_playlist_id_field.clone();
        listeners.push(on_show(&modal, move |modal, trigger| {
            let target = PlaylistTarget::from_trigger(&ElementAttributes(trigger));
            populate_rename_playlist(modal, &target, &id_field);
        }));
    }

    if let Some(modal) = dom::element_by_id(&config.delete_playlist_modal_id) {
        let id_field = config.delete_playlist_id_field.clone();
        listeners.push(on_show(&modal, move |modal, trigger| {
            let target = PlaylistTarget::from_trigger(&ElementAttributes(trigger));
            populate_delete_playlist(modal, &target, &id_field);
        }));
    }

    if let Some(modal) = dom::element_by_id(&config.delete_song_modal_id) {
        listeners.push(on_show(&modal, |modal, trigger| {
            let removal = SongRemoval::from_trigger(&ElementAttributes(trigger));
            populate_delete_song(modal, &removal);
        }));
    }

    listeners
}

pub(crate) fn populate_rename_playlist(modal: &Element, target: &PlaylistTarget, id_field: &str) {
    if let Some(title) = dom::query(modal, ".modal-title") {
        dom::set_text(&title, &target.rename_title());
    }
    if let Some(input) = dom::query(modal, ".modal-body input:not([type=hidden])") {
        dom::set_input_value(&input, &target.name);
    }
    write_playlist_id(target, id_field);
}

pub(crate) fn populate_delete_playlist(modal: &Element, target: &PlaylistTarget, id_field: &str) {
    match dom::query(modal, ".modal-body") {
        Some(body) => dom::set_text(&body, &target.delete_prompt()),
        None => gloo::console::warn!("delete playlist modal: missing .modal-body"),
    }
    write_playlist_id(target, id_field);
}

pub(crate) fn populate_delete_song(modal: &Element, removal: &SongRemoval) {
    match dom::query(modal, ".modal-body") {
        Some(body) => dom::set_text(&body, &removal.prompt()),
        None => gloo::console::warn!("delete song modal: missing .modal-body"),
    }
    let mut fields = DocumentFields::new();
    for (id, value) in removal.fields() {
        if !fields.set_field(id, value) {
            gloo::console::warn!("delete song modal: missing field", id);
        }
    }
}

fn write_playlist_id(target: &PlaylistTarget, id_field: &str) {
    let Some(id) = target.id.as_deref() else {
        return;
    };
    if let Some(field) = dom::element_by_id(id_field) {
        dom::set_input_value(&field, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::HtmlInputElement;

    wasm_bindgen_test_configure!(run_in_browser);

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

    fn text_of(root: &Element, selector: &str) -> String {
        dom::query(root, selector)
            .and_then(|element| element.text_content())
            .unwrap_or_default()
    }

    #[wasm_bindgen_test]
    fn rename_modal_shows_name_and_copies_id() {
        let host = mount(
            r#"<button id="rename-trigger" data-playlist-id="9"
                  data-playlist-name="Road Trip"></button>
               <div id="renameModal">
                 <h5 class="modal-title"></h5>
                 <div class="modal-body">
                   <input type="hidden" id="renameID" value="old">
                   <input type="text" name="name">
                 </div>
               </div>"#,
        );
        let modal = dom::element_by_id("renameModal").unwrap();
        let trigger = dom::element_by_id("rename-trigger").unwrap();
        let target = PlaylistTarget::from_trigger(&ElementAttributes(&trigger));
        populate_rename_playlist(&modal, &target, "renameID");

        assert_eq!(text_of(&modal, ".modal-title"), "Rename Playlist: Road Trip");
        let name = dom::query(&modal, "input[name=name]")
            .unwrap()
            .dyn_into::<HtmlInputElement>()
            .unwrap();
        assert_eq!(name.value(), "Road Trip");
        assert_eq!(value_of("renameID"), "9");
        host.remove();
    }

    #[wasm_bindgen_test]
    fn playlist_id_is_left_alone_without_one_on_the_trigger() {
        let host = mount(
            r#"<div id="deleteModal"><div class="modal-body"></div></div>
               <input type="hidden" id="deleteID" value="keep">"#,
        );
        let modal = dom::element_by_id("deleteModal").unwrap();
        let target = PlaylistTarget {
            id: None,
            name: "Focus".to_string(),
        };
        populate_delete_playlist(&modal, &target, "deleteID");

        assert_eq!(
            text_of(&modal, ".modal-body"),
            "Are you sure you want to delete Focus?"
        );
        assert_eq!(value_of("deleteID"), "keep");
        host.remove();
    }

    #[wasm_bindgen_test]
    fn delete_song_modal_fills_prompt_and_hidden_fields() {
        let host = mount(
            r#"<button id="song-trigger" data-song-id="77" data-song-name="Halo"
                  data-playlist-id="9" data-playlist-name="Road Trip"></button>
               <div id="deleteSong"><p class="modal-body"></p></div>
               <input type="hidden" id="playlistID"><input type="hidden" id="songID">
               <input type="hidden" id="playlistName"><input type="hidden" id="songName">"#,
        );
        let modal = dom::element_by_id("deleteSong").unwrap();
        let trigger = dom::element_by_id("song-trigger").unwrap();
        populate_delete_song(&modal, &SongRemoval::from_trigger(&ElementAttributes(&trigger)));

        assert_eq!(
            text_of(&modal, ".modal-body"),
            "Are you sure you want to delete Halo from Road Trip?"
        );
        assert_eq!(value_of("playlistID"), "9");
        assert_eq!(value_of("songID"), "77");
        assert_eq!(value_of("playlistName"), "Road Trip");
        assert_eq!(value_of("songName"), "Halo");
        host.remove();
    }

    #[wasm_bindgen_test]
    fn show_modal_reports_missing_bootstrap() {
        let host = mount(r#"<div id="plainModal"></div>"#);
        assert!(show_modal("plainModal").is_err());
        assert!(show_modal("no-such-modal").is_err());
        host.remove();
    }
}
