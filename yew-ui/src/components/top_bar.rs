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
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

use crate::context::SessionCtx;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TopBarProps {
    #[prop_or_default]
    pub on_open_profile: Callback<MouseEvent>,
}

#[function_component(TopBar)]
pub fn top_bar(props: &TopBarProps) -> Html {
    let session_ctx = use_context::<SessionCtx>();
    let session = session_ctx.and_then(|ctx| (*ctx).clone());

    html! {
        <div class="top-bar">
            <span class="top-bar-title">{"WatchParty"}</span>
            <div class="flex space-x-2 align-middle">
            {
                if let Some(session) = session {
                    html! {
                        <button class="button profile-button text-sm px-3 py-1 border rounded" onclick={props.on_open_profile.clone()} title="Open profile">
                            if let Some(src) = session.avatar_url() {
                                <img class="profile-button-avatar" src={src} alt="" />
                            }
                            { session.email.clone().unwrap_or_else(|| "Profile".to_string()) }
                        </button>
                    }
                } else { html!{} }
            }
            </div>
        </div>
    }
}
