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

use yew::prelude::*;

use crate::bridge;
use crate::components::profile_modal::ProfileModal;
use crate::components::top_bar::TopBar;
use crate::components::video_viewport::VideoViewport;
use crate::context::{SessionCtx, ViewportStore};
use crate::transport::InputSinkHandle;

#[derive(Properties, PartialEq)]
pub struct WatchPageProps {
    pub store: ViewportStore,
    pub sink: InputSinkHandle,
}

#[function_component(WatchPage)]
pub fn watch_page(props: &WatchPageProps) -> Html {
    let session_ctx = use_context::<SessionCtx>();
    let profile_open = use_state(|| false);

    let open_profile = {
        let profile_open = profile_open.clone();
        Callback::from(move |_: MouseEvent| profile_open.set(true))
    };
    let close_profile = {
        let profile_open = profile_open.clone();
        Callback::from(move |_: ()| profile_open.set(false))
    };
    let on_signed_out = {
        let profile_open = profile_open.clone();
        let session_ctx = session_ctx.clone();
        Callback::from(move |_: ()| {
            profile_open.set(false);
            if let Some(session) = &session_ctx {
                session.set(None);
            }
        })
    };
    let on_resolution = Callback::from(|_: MouseEvent| bridge::request_resolution_menu());

    let session = session_ctx.as_ref().and_then(|ctx| (**ctx).clone());

    html! {
        <div class="watch-page">
            <TopBar on_open_profile={open_profile} />
            <VideoViewport
                store={props.store.clone()}
                sink={props.sink.clone()}
                on_resolution={on_resolution}
            />
            if let Some(session) = session.filter(|_| *profile_open) {
                <ProfileModal
                    session={session}
                    on_close={close_profile}
                    on_signed_out={on_signed_out}
                />
            }
        </div>
    }
}
