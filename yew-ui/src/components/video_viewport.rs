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

//! The shared-browser video surface.
//!
//! Renders the remote stream at the remote's aspect ratio, forwards pointer,
//! wheel and keyboard input through an [`InputSinkHandle`] while the user
//! holds host control, and keeps the local and remote clipboards in step.

use gloo_events::{EventListener, EventListenerOptions};
use gloo_utils::{document, window};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use watchparty_types::RemoteInput;
use web_sys::{HtmlElement, HtmlVideoElement, ResizeObserver, WheelEvent};
use yew::prelude::*;

use crate::components::icons::{DesktopIcon, ExpandIcon, PlayIcon};
use crate::context::ViewportStore;
use crate::transport::InputSinkHandle;
use crate::types::StoreChange;
use crate::viewport::geometry::player_height;
use crate::viewport::{
    autoplay_decision, clipboard_update, normalize_key_code, normalize_pointer, normalize_wheel,
    AspectBox, HeldKeys, InputGate, OverlayRect, PlaybackState,
};

#[derive(Debug)]
pub enum Msg {
    Store(StoreChange),
    Resize,
    FullscreenChanged,
    RequestFullscreen,
    Toggle,
    CanPlayThrough,
    Ended,
    MediaError,
    DocumentFocusIn,
    DocumentFocusOut,
    ClipboardRead(String),
    MouseEnter,
    MouseLeave,
    MouseMove { client_x: f64, client_y: f64 },
    MouseDown { client_x: f64, client_y: f64, button: u32 },
    MouseUp { client_x: f64, client_y: f64, button: u32 },
    Wheel { client_x: f64, client_y: f64, delta_x: f64, delta_y: f64 },
    KeyDown { code: u32, key: String },
    KeyUp { code: u32, key: String },
}

#[derive(Properties, Debug, PartialEq)]
pub struct VideoViewportProps {
    pub store: ViewportStore,
    pub sink: InputSinkHandle,
    /// Clicked resolution button in the video menu (admins only).
    #[prop_or_default]
    pub on_resolution: Callback<MouseEvent>,
}

pub struct VideoViewport {
    component_ref: NodeRef,
    player_ref: NodeRef,
    container_ref: NodeRef,
    overlay_ref: NodeRef,
    aspect_ref: NodeRef,
    video_ref: NodeRef,
    subscription: usize,
    /// Pointer is over the overlay; keyboard forwarding needs it.
    focused: bool,
    fullscreen: bool,
    held_keys: HeldKeys,
    listeners: Vec<EventListener>,
    resize_observer: Option<(ResizeObserver, Closure<dyn FnMut(js_sys::Array)>)>,
}

impl Component for VideoViewport {
    type Message = Msg;
    type Properties = VideoViewportProps;

    fn create(ctx: &Context<Self>) -> Self {
        let subscription = ctx
            .props()
            .store
            .subscribe(ctx.link().callback(Msg::Store));
        Self {
            component_ref: NodeRef::default(),
            player_ref: NodeRef::default(),
            container_ref: NodeRef::default(),
            overlay_ref: NodeRef::default(),
            aspect_ref: NodeRef::default(),
            video_ref: NodeRef::default(),
            subscription,
            focused: false,
            fullscreen: false,
            held_keys: HeldKeys::default(),
            listeners: Vec::new(),
            resize_observer: None,
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().store != old_props.store {
            old_props.store.unsubscribe(self.subscription);
            self.subscription = ctx
                .props()
                .store
                .subscribe(ctx.link().callback(Msg::Store));
            self.apply_volume(ctx);
            self.apply_muted(ctx);
            self.apply_stream(ctx);
            self.resize(ctx);
        }
        true
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if !first_render {
            return;
        }
        self.apply_volume(ctx);
        self.apply_muted(ctx);
        self.apply_stream(ctx);
        self.resize(ctx);
        self.attach_listeners(ctx);
        self.observe_resize(ctx);
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let store = &ctx.props().store;
        match msg {
            Msg::Store(change) => self.on_store_change(ctx, change),
            Msg::Resize => {
                self.resize(ctx);
                false
            }
            Msg::FullscreenChanged => {
                self.fullscreen = document().fullscreen_element().is_some();
                self.resize(ctx);
                true
            }
            Msg::RequestFullscreen => {
                if let Some(player) = self.player_ref.cast::<HtmlElement>() {
                    if let Err(e) = player.request_fullscreen() {
                        log::warn!("Fullscreen request rejected: {e:?}");
                    }
                }
                self.resize(ctx);
                false
            }
            Msg::Toggle => {
                let video = store.video();
                if !video.playable {
                    return false;
                }
                if video.playing {
                    store.pause();
                } else {
                    store.play();
                }
                false
            }
            Msg::CanPlayThrough => {
                store.set_playable(true);
                let focused = document().has_focus().unwrap_or(false);
                if let Some(autoplay) =
                    autoplay_decision(store.settings().autoplay, focused, store.active())
                {
                    if autoplay.force_mute {
                        log::debug!("Autoplaying muted");
                        store.set_muted(true);
                        if let Some(video) = self.video_ref.cast::<HtmlVideoElement>() {
                            video.set_muted(true);
                        }
                    }
                    store.play();
                }
                false
            }
            Msg::Ended => {
                log::info!("Remote stream ended");
                store.set_playable(false);
                false
            }
            Msg::MediaError => {
                match self.video_ref.cast::<HtmlVideoElement>().and_then(|v| v.error()) {
                    Some(err) => log::error!("Video error {}: {}", err.code(), err.message()),
                    None => log::error!("Video error"),
                }
                store.set_playable(false);
                false
            }
            Msg::DocumentFocusIn => {
                self.sync_clipboard(ctx);
                false
            }
            Msg::DocumentFocusOut => {
                self.release_held_keys(ctx);
                false
            }
            Msg::ClipboardRead(text) => {
                if let Some(text) = clipboard_update(&store.remote().clipboard, text) {
                    store.set_clipboard(text.clone());
                    ctx.props().sink.send_clipboard(&text);
                }
                false
            }
            Msg::MouseEnter => {
                if let Some(overlay) = self.overlay_ref.cast::<HtmlElement>() {
                    let _ = overlay.focus();
                }
                self.sync_clipboard(ctx);
                self.focused = true;
                false
            }
            Msg::MouseLeave => {
                self.focused = false;
                false
            }
            Msg::MouseMove { client_x, client_y } => {
                if self.gate(ctx).allows_pointer() {
                    self.send_pointer(ctx, client_x, client_y);
                }
                false
            }
            Msg::MouseDown {
                client_x,
                client_y,
                button,
            } => {
                if self.gate(ctx).allows_pointer() {
                    self.send_pointer(ctx, client_x, client_y);
                    ctx.props()
                        .sink
                        .send_data(RemoteInput::MouseDown { key: button });
                }
                false
            }
            Msg::MouseUp {
                client_x,
                client_y,
                button,
            } => {
                if self.gate(ctx).allows_pointer() {
                    self.send_pointer(ctx, client_x, client_y);
                    ctx.props()
                        .sink
                        .send_data(RemoteInput::MouseUp { key: button });
                }
                false
            }
            Msg::Wheel {
                client_x,
                client_y,
                delta_x,
                delta_y,
            } => {
                if self.gate(ctx).allows_pointer() {
                    let settings = store.settings();
                    self.send_pointer(ctx, client_x, client_y);
                    let (x, y) =
                        normalize_wheel(delta_x, delta_y, settings.scroll_invert, settings.scroll);
                    ctx.props().sink.send_data(RemoteInput::Wheel { x, y });
                }
                false
            }
            Msg::KeyDown { code, key } => {
                if self.gate(ctx).allows_keyboard() {
                    let key = normalize_key_code(code, &key);
                    ctx.props().sink.send_data(RemoteInput::KeyDown { key });
                    self.held_keys.press(key);
                }
                false
            }
            Msg::KeyUp { code, key } => {
                if self.gate(ctx).allows_keyboard() {
                    let key = normalize_key_code(code, &key);
                    ctx.props().sink.send_data(RemoteInput::KeyUp { key });
                    self.held_keys.release(key);
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let store = &ctx.props().store;
        let video = store.video();
        let state = PlaybackState::from_flags(video.playable, video.playing);

        let suppress = Callback::from(|e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
        });
        let onmousemove = ctx.link().callback(|e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            Msg::MouseMove {
                client_x: f64::from(e.client_x()),
                client_y: f64::from(e.client_y()),
            }
        });
        let onmousedown = ctx.link().callback(|e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            Msg::MouseDown {
                client_x: f64::from(e.client_x()),
                client_y: f64::from(e.client_y()),
                button: u32::try_from(e.button()).unwrap_or_default(),
            }
        });
        let onmouseup = ctx.link().callback(|e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            Msg::MouseUp {
                client_x: f64::from(e.client_x()),
                client_y: f64::from(e.client_y()),
                button: u32::try_from(e.button()).unwrap_or_default(),
            }
        });
        let onmouseenter = ctx.link().callback(|e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            Msg::MouseEnter
        });
        let onmouseleave = ctx.link().callback(|e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            Msg::MouseLeave
        });
        let onkeydown = ctx.link().callback(|e: KeyboardEvent| {
            e.prevent_default();
            e.stop_propagation();
            Msg::KeyDown {
                code: e.key_code(),
                key: e.key(),
            }
        });
        let onkeyup = ctx.link().callback(|e: KeyboardEvent| {
            e.prevent_default();
            e.stop_propagation();
            Msg::KeyUp {
                code: e.key_code(),
                key: e.key(),
            }
        });
        let ontoggle = ctx.link().callback(|_: MouseEvent| Msg::Toggle);
        let onfullscreen = ctx.link().callback(|_: MouseEvent| Msg::RequestFullscreen);

        html! {
            <div ref={self.component_ref.clone()} class="video">
                <div ref={self.player_ref.clone()} class="player">
                    <div ref={self.container_ref.clone()} class="player-container">
                        <video ref={self.video_ref.clone()} playsinline={true} />
                        <div
                            ref={self.overlay_ref.clone()}
                            class="overlay"
                            tabindex="0"
                            onclick={suppress.clone()}
                            oncontextmenu={suppress}
                            onmousemove={onmousemove}
                            onmousedown={onmousedown}
                            onmouseup={onmouseup}
                            onmouseenter={onmouseenter}
                            onmouseleave={onmouseleave}
                            onkeydown={onkeydown}
                            onkeyup={onkeyup}
                        />
                        if !video.playing {
                            <div class="player-overlay">
                                if state.shows_play_button() {
                                    <button class="play-button" onclick={ontoggle}>
                                        <PlayIcon />
                                    </button>
                                }
                            </div>
                        }
                        <div ref={self.aspect_ref.clone()} class="player-aspect" />
                    </div>
                    if !self.fullscreen {
                        <ul class="video-menu">
                            <li>
                                <button class="video-menu-button" title="Fullscreen" onclick={onfullscreen}>
                                    <ExpandIcon />
                                </button>
                            </li>
                            if store.admin() {
                                <li>
                                    <button
                                        class="video-menu-button resolution"
                                        title="Resolution"
                                        onclick={ctx.props().on_resolution.clone()}
                                    >
                                        <DesktopIcon />
                                    </button>
                                </li>
                            }
                        </ul>
                    }
                </div>
            </div>
        }
    }

    fn destroy(&mut self, ctx: &Context<Self>) {
        let store = &ctx.props().store;
        store.unsubscribe(self.subscription);
        if let Some((observer, _closure)) = self.resize_observer.take() {
            observer.disconnect();
        }
        self.listeners.clear();
        store.set_playable(false);
    }
}

impl VideoViewport {
    fn gate(&self, ctx: &Context<Self>) -> InputGate {
        let remote = ctx.props().store.remote();
        InputGate {
            hosting: remote.hosting,
            locked: remote.locked,
            focused: self.focused,
        }
    }

    /// Returns whether the view depends on the change.
    fn on_store_change(&mut self, ctx: &Context<Self>, change: StoreChange) -> bool {
        match change {
            StoreChange::Volume => {
                self.apply_volume(ctx);
                false
            }
            StoreChange::Muted => {
                self.apply_muted(ctx);
                false
            }
            StoreChange::Stream => {
                self.apply_stream(ctx);
                false
            }
            StoreChange::Playing => {
                if ctx.props().store.video().playing {
                    self.play_video(ctx);
                } else {
                    self.pause_video(ctx);
                }
                true
            }
            StoreChange::Playable | StoreChange::Admin => true,
            StoreChange::Resolution => {
                self.resize(ctx);
                false
            }
            StoreChange::Clipboard => {
                self.write_clipboard(ctx);
                false
            }
            StoreChange::Hosting
            | StoreChange::Locked
            | StoreChange::Settings
            | StoreChange::Active => false,
        }
    }

    fn attach_listeners(&mut self, ctx: &Context<Self>) {
        let link = ctx.link();

        if let Some(player) = self.player_ref.cast::<HtmlElement>() {
            let link = link.clone();
            self.listeners
                .push(EventListener::new(&player, "fullscreenchange", move |_| {
                    link.send_message(Msg::FullscreenChanged)
                }));
        }

        if let Some(video) = self.video_ref.cast::<HtmlVideoElement>() {
            let media_events: [(&'static str, fn() -> Msg); 3] = [
                ("canplaythrough", || Msg::CanPlayThrough),
                ("ended", || Msg::Ended),
                ("error", || Msg::MediaError),
            ];
            for (event, msg) in media_events {
                let link = link.clone();
                self.listeners
                    .push(EventListener::new(&video, event, move |_| {
                        link.send_message(msg())
                    }));
            }
        }

        let doc = document();
        let focus_in = link.clone();
        self.listeners.push(EventListener::new(&doc, "focusin", move |_| {
            focus_in.send_message(Msg::DocumentFocusIn)
        }));
        let focus_out = link.clone();
        self.listeners.push(EventListener::new(&doc, "focusout", move |_| {
            focus_out.send_message(Msg::DocumentFocusOut)
        }));

        // Yew registers wheel handlers as passive, so the page would scroll
        // underneath the remote desktop.
        if let Some(overlay) = self.overlay_ref.cast::<HtmlElement>() {
            let link = link.clone();
            self.listeners.push(EventListener::new_with_options(
                &overlay,
                "wheel",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                        return;
                    };
                    wheel.prevent_default();
                    wheel.stop_propagation();
                    link.send_message(Msg::Wheel {
                        client_x: f64::from(wheel.client_x()),
                        client_y: f64::from(wheel.client_y()),
                        delta_x: wheel.delta_x(),
                        delta_y: wheel.delta_y(),
                    });
                },
            ));
        }
    }

    fn observe_resize(&mut self, ctx: &Context<Self>) {
        let Some(component) = self.component_ref.cast::<HtmlElement>() else {
            return;
        };
        let link = ctx.link().clone();
        let closure = Closure::<dyn FnMut(js_sys::Array)>::new(move |_entries: js_sys::Array| {
            link.send_message(Msg::Resize)
        });
        match ResizeObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&component);
                self.resize_observer = Some((observer, closure));
            }
            Err(e) => log::error!("ResizeObserver unavailable: {e:?}"),
        }
    }

    /// Fit the player box to the component and size the aspect box to the
    /// remote's ratio.
    fn resize(&self, ctx: &Context<Self>) {
        let (Some(component), Some(player), Some(container), Some(aspect)) = (
            self.component_ref.cast::<HtmlElement>(),
            self.player_ref.cast::<HtmlElement>(),
            self.container_ref.cast::<HtmlElement>(),
            self.aspect_ref.cast::<HtmlElement>(),
        ) else {
            return;
        };

        if !self.fullscreen {
            let style = player.style();
            let _ = style.set_property("width", &format!("{}px", component.offset_width()));
            let _ = style.set_property("height", &format!("{}px", component.offset_height()));
        }
        let height = player_height(
            self.fullscreen,
            f64::from(component.offset_height()),
            f64::from(player.offset_height()),
        );
        let aspect_box = AspectBox::compute(ctx.props().store.aspect_ratio(), height);
        let _ = container
            .style()
            .set_property("max-width", &aspect_box.max_width_css());
        let _ = aspect
            .style()
            .set_property("padding-bottom", &aspect_box.padding_bottom_css());
    }

    fn send_pointer(&self, ctx: &Context<Self>, client_x: f64, client_y: f64) {
        let Some(overlay) = self.overlay_ref.cast::<HtmlElement>() else {
            return;
        };
        let rect = overlay.get_bounding_client_rect();
        let rect = OverlayRect {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        };
        let resolution = ctx.props().store.resolution();
        if let Some((x, y)) = normalize_pointer(
            rect,
            client_x,
            client_y,
            (resolution.width, resolution.height),
        ) {
            ctx.props().sink.send_data(RemoteInput::MouseMove { x, y });
        }
    }

    fn release_held_keys(&mut self, ctx: &Context<Self>) {
        if !self.gate(ctx).allows_release_all() {
            return;
        }
        for key in self.held_keys.release_all() {
            ctx.props().sink.send_data(RemoteInput::KeyUp { key });
        }
    }

    /// Pull the local clipboard when the user comes back while hosting.
    fn sync_clipboard(&self, ctx: &Context<Self>) {
        let store = &ctx.props().store;
        if !document().has_focus().unwrap_or(false) || !store.active() {
            return;
        }
        if !store.remote().hosting {
            return;
        }
        let promise = window().navigator().clipboard().read_text();
        let link = ctx.link().clone();
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(text) => {
                    link.send_message(Msg::ClipboardRead(text.as_string().unwrap_or_default()))
                }
                Err(e) => log::error!("Clipboard read failed: {e:?}"),
            }
        });
    }

    fn write_clipboard(&self, ctx: &Context<Self>) {
        let text = ctx.props().store.remote().clipboard;
        let promise = window().navigator().clipboard().write_text(&text);
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("Clipboard write failed: {e:?}");
            }
        });
    }

    fn apply_volume(&self, ctx: &Context<Self>) {
        if let Some(video) = self.video_ref.cast::<HtmlVideoElement>() {
            video.set_volume(f64::from(ctx.props().store.video().volume) / 100.0);
        }
    }

    fn apply_muted(&self, ctx: &Context<Self>) {
        if let Some(video) = self.video_ref.cast::<HtmlVideoElement>() {
            video.set_muted(ctx.props().store.video().muted);
        }
    }

    fn apply_stream(&self, ctx: &Context<Self>) {
        let Some(video) = self.video_ref.cast::<HtmlVideoElement>() else {
            return;
        };
        match ctx.props().store.video().stream {
            Some(stream) => video.set_src_object(Some(&stream)),
            None => {
                video.set_src_object(None);
                ctx.props().store.set_playable(false);
            }
        }
    }

    fn play_video(&self, ctx: &Context<Self>) {
        let Some(video) = self.video_ref.cast::<HtmlVideoElement>() else {
            return;
        };
        if !video.paused() || !ctx.props().store.video().playable {
            return;
        }
        let promise = match video.play() {
            Ok(promise) => promise,
            Err(e) => {
                log::error!("play() threw: {e:?}");
                return;
            }
        };
        let link = ctx.link().clone();
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => link.send_message(Msg::Resize),
                Err(e) => log::error!("Playback rejected: {e:?}"),
            }
        });
    }

    fn pause_video(&self, ctx: &Context<Self>) {
        let Some(video) = self.video_ref.cast::<HtmlVideoElement>() else {
            return;
        };
        if video.paused() || !ctx.props().store.video().playable {
            return;
        }
        if let Err(e) = video.pause() {
            log::error!("pause() threw: {e:?}");
        }
    }
}
