use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Headers, Request, RequestCredentials, RequestInit, Response};

use initmusic_core::prompts::LOGOUT_CONFIRM;
use initmusic_core::{ClientConfig, LogoutRequest};

use crate::config;
use crate::dom::{self, js_err};

/// Asks for confirmation, then posts the logout in the background.
pub(crate) fn confirm_and_logout(config: &ClientConfig) {
    if !dom::confirm(LOGOUT_CONFIRM) {
        return;
    }
    let Some(token) = config::csrf_token(config) else {
        gloo::console::warn!("logout: missing csrf token meta", config.csrf_meta_name.clone());
        return;
    };
    let header = config::csrf_header(config);
    let request = LogoutRequest::new(
        &config.logout_url,
        &config.logout_redirect,
        header.as_deref(),
        &token,
    );
    spawn_local(async move {
        if let Err(err) = send_logout(&request).await {
            gloo::console::error!("logout: failed", err);
        }
    });
}

async fn send_logout(request: &LogoutRequest) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "missing window".to_string())?;
    let headers = Headers::new().map_err(js_err)?;
    for (name, value) in &request.headers {
        headers.append(name, value).map_err(js_err)?;
    }
    let init = RequestInit::new();
    init.set_method(LogoutRequest::METHOD);
    init.set_headers(&headers);
    init.set_credentials(RequestCredentials::Include);
    let fetch_request = Request::new_with_str_and_init(&request.url, &init).map_err(js_err)?;
    let value = JsFuture::from(window.fetch_with_request(&fetch_request))
        .await
        .map_err(js_err)?;
    let response = value
        .dyn_into::<Response>()
        .map_err(|_| "unexpected fetch result".to_string())?;
    if !response.ok() {
        return Err(format!("logout rejected with status {}", response.status()));
    }
    gloo::console::log!("logout: ok, redirecting");
    window
        .location()
        .set_href(&request.redirect)
        .map_err(js_err)
}
