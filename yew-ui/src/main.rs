/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

use watchparty_ui::auth::load_session;
use watchparty_ui::bridge;
use watchparty_ui::components::config_error::ConfigError;
use watchparty_ui::constants::{app_config, viewport_settings};
use watchparty_ui::context::{SessionCtx, ViewportStore};
use watchparty_ui::pages::watch::WatchPage;
use watchparty_ui::routing::Route;
use watchparty_ui::transport::{DataChannelSink, InputSinkHandle};
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(WatchApp)]
fn watch_app() -> Html {
    let session: SessionCtx = use_state(load_session);
    let services = use_memo((), |_| {
        let store = ViewportStore::new(viewport_settings());
        let sink = DataChannelSink::new(Callback::from(bridge::forward_clipboard));
        bridge::register(store.clone(), sink.clone());
        (store, InputSinkHandle::new(sink))
    });

    let render = {
        let services = services.clone();
        Callback::from(move |route: Route| {
            let (store, sink) = &*services;
            match route {
                Route::Home => html! {
                    <WatchPage store={store.clone()} sink={sink.clone()} />
                },
                Route::NotFound => html! { <h1>{ "404" }</h1> },
            }
        })
    };

    html! {
        <ContextProvider<SessionCtx> context={session}>
            <BrowserRouter>
                <Switch<Route> render={render} />
            </BrowserRouter>
        </ContextProvider<SessionCtx>>
    }
}

#[function_component(App)]
fn app_component() -> Html {
    if let Err(e) = app_config() {
        log::error!("{e}");
        return html! { <ConfigError message={e} /> };
    }
    html! { <WatchApp /> }
}

fn main() {
    let level = if cfg!(feature = "debugAssertions") {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    let _ = console_log::init_with_level(level);
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
