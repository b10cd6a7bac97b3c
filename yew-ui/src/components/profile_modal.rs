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

use gloo_events::EventListener;
use gloo_utils::window;
use watchparty_types::account::find_linked;
use watchparty_types::{LinkAccount, LinkKind};
use yew::prelude::*;

use crate::account_service::{AccountServiceHandle, ServiceResult};
use crate::auth::{self, AuthSession};
use crate::components::icons::{
    CheckCircleIcon, DiscordIcon, ImageIcon, KeyIcon, MailIcon, SignOutIcon, TrashIcon,
};
use crate::constants::{
    discord_authorize_url, discord_client_id, oauth_redirect_hostname, DISCORD_POPUP_FEATURES,
    GRAVATAR_URL,
};

/// An account action that talks to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAction {
    ResetPassword,
    VerifyEmail,
    Unlink,
    DeleteAccount,
}

impl ProfileAction {
    fn failure_message(&self) -> &'static str {
        match self {
            ProfileAction::ResetPassword => "Could not send the password reset email",
            ProfileAction::VerifyEmail => "Could not send the verification email",
            ProfileAction::Unlink => "Could not unlink your Discord account",
            ProfileAction::DeleteAccount => "Could not delete your account",
        }
    }
}

pub enum ProfileMsg {
    FetchLinked,
    LinkedLoaded(Vec<LinkAccount>),
    FetchFailed(String),
    ResetPassword,
    VerifyEmail,
    LinkDiscord,
    WindowFocused,
    UnlinkDiscord,
    OpenDeleteConfirm,
    CloseDeleteConfirm,
    DeleteAccount,
    SignOut,
    Succeeded(ProfileAction),
    Failed(ProfileAction, String),
    DismissError,
}

#[derive(Properties, Clone, PartialEq)]
pub struct ProfileModalProps {
    pub session: AuthSession,
    /// Avatar override; falls back to the session's picture or Gravatar.
    #[prop_or_default]
    pub user_image: Option<String>,
    #[prop_or_default]
    pub service: AccountServiceHandle,
    pub on_close: Callback<()>,
    /// The session is gone (signed out or account deleted).
    pub on_signed_out: Callback<()>,
}

pub struct ProfileModal {
    linked_discord: Option<LinkAccount>,
    reset_sent: bool,
    verify_sent: bool,
    delete_confirm_open: bool,
    pending: Option<ProfileAction>,
    error: Option<String>,
    /// Armed while the Discord popup is open; refetches once focus returns.
    link_focus_listener: Option<EventListener>,
}

impl Component for ProfileModal {
    type Message = ProfileMsg;
    type Properties = ProfileModalProps;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(ProfileMsg::FetchLinked);
        Self {
            linked_discord: None,
            reset_sent: false,
            verify_sent: false,
            delete_confirm_open: false,
            pending: None,
            error: None,
            link_focus_listener: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let session = ctx.props().session.clone();
        let service = ctx.props().service.clone();
        match msg {
            ProfileMsg::FetchLinked => {
                let link = ctx.link().clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match service.0.linked_accounts(session).await {
                        Ok(accounts) => link.send_message(ProfileMsg::LinkedLoaded(accounts)),
                        Err(e) => link.send_message(ProfileMsg::FetchFailed(e)),
                    }
                });
                false
            }
            ProfileMsg::LinkedLoaded(accounts) => {
                self.linked_discord = find_linked(&accounts, &LinkKind::Discord).cloned();
                true
            }
            ProfileMsg::FetchFailed(error) => {
                log::error!("Failed to fetch linked accounts: {error}");
                false
            }
            ProfileMsg::ResetPassword => {
                if self.reset_sent || self.pending.is_some() {
                    return false;
                }
                let Some(email) = session.email.clone() else {
                    return false;
                };
                self.start(
                    ctx,
                    ProfileAction::ResetPassword,
                    service.0.send_password_reset(email),
                )
            }
            ProfileMsg::VerifyEmail => {
                if session.email_verified || self.verify_sent || self.pending.is_some() {
                    return false;
                }
                self.start(
                    ctx,
                    ProfileAction::VerifyEmail,
                    service.0.send_email_verification(session),
                )
            }
            ProfileMsg::LinkDiscord => {
                let url = discord_authorize_url(&discord_client_id(), &oauth_redirect_hostname());
                match window().open_with_url_and_target_and_features(
                    &url,
                    "_blank",
                    DISCORD_POPUP_FEATURES,
                ) {
                    Ok(Some(_)) => {
                        let link = ctx.link().clone();
                        self.link_focus_listener =
                            Some(EventListener::new(&window(), "focus", move |_| {
                                link.send_message(ProfileMsg::WindowFocused)
                            }));
                    }
                    Ok(None) => log::warn!("Discord popup was blocked by the browser"),
                    Err(e) => log::error!("Failed to open Discord popup: {e:?}"),
                }
                false
            }
            ProfileMsg::WindowFocused => {
                if self.link_focus_listener.take().is_some() {
                    ctx.link().send_message(ProfileMsg::FetchLinked);
                }
                false
            }
            ProfileMsg::UnlinkDiscord => {
                if self.linked_discord.is_none() || self.pending.is_some() {
                    return false;
                }
                self.start(ctx, ProfileAction::Unlink, service.0.unlink_discord(session))
            }
            ProfileMsg::OpenDeleteConfirm => {
                self.delete_confirm_open = true;
                true
            }
            ProfileMsg::CloseDeleteConfirm => {
                self.delete_confirm_open = false;
                true
            }
            ProfileMsg::DeleteAccount => {
                if self.pending.is_some() {
                    return false;
                }
                self.start(
                    ctx,
                    ProfileAction::DeleteAccount,
                    service.0.delete_account(session),
                )
            }
            ProfileMsg::SignOut => {
                auth::sign_out();
                ctx.props().on_signed_out.emit(());
                false
            }
            ProfileMsg::Succeeded(action) => {
                self.pending = None;
                match action {
                    ProfileAction::ResetPassword => self.reset_sent = true,
                    ProfileAction::VerifyEmail => self.verify_sent = true,
                    ProfileAction::Unlink => {
                        self.linked_discord = None;
                        ctx.link().send_message(ProfileMsg::FetchLinked);
                    }
                    ProfileAction::DeleteAccount => {
                        self.delete_confirm_open = false;
                        auth::clear_session();
                        ctx.props().on_signed_out.emit(());
                    }
                }
                true
            }
            ProfileMsg::Failed(action, error) => {
                log::error!("{}: {error}", action.failure_message());
                self.pending = None;
                self.error = Some(action.failure_message().to_string());
                true
            }
            ProfileMsg::DismissError => {
                self.error = None;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let link = ctx.link();

        let on_backdrop_click = {
            let on_close = props.on_close.clone();
            Callback::from(move |e: MouseEvent| {
                e.stop_propagation();
                on_close.emit(());
            })
        };
        let on_modal_click = Callback::from(|e: MouseEvent| {
            e.stop_propagation();
        });

        let avatar = props
            .user_image
            .clone()
            .or_else(|| props.session.avatar_url());

        html! {
            <div onclick={on_backdrop_click} class="glass-backdrop">
                <div onclick={on_modal_click} class="card-apple profile-modal" style="max-width: 420px; width: 90%;">
                    <div style="display: flex; justify-content: flex-end;">
                        <button type="button" class="modal-close" onclick={props.on_close.reform(|_| ())}>{"×"}</button>
                    </div>
                    <ProfileActions
                        email={props.session.email.clone()}
                        email_verified={props.session.email_verified}
                        avatar={avatar}
                        linked_discord={self.linked_discord.clone()}
                        reset_disabled={self.reset_sent || props.session.email.is_none()}
                        verify_disabled={props.session.email_verified || self.verify_sent}
                        pending={self.pending}
                        error={self.error.clone()}
                        on_reset_password={link.callback(|_| ProfileMsg::ResetPassword)}
                        on_verify_email={link.callback(|_| ProfileMsg::VerifyEmail)}
                        on_link_discord={link.callback(|_| ProfileMsg::LinkDiscord)}
                        on_unlink_discord={link.callback(|_| ProfileMsg::UnlinkDiscord)}
                        on_delete_account={link.callback(|_| ProfileMsg::OpenDeleteConfirm)}
                        on_sign_out={link.callback(|_| ProfileMsg::SignOut)}
                        on_dismiss_error={link.callback(|_| ProfileMsg::DismissError)}
                    />
                    if self.delete_confirm_open {
                        <DeleteAccountConfirm
                            busy={self.pending == Some(ProfileAction::DeleteAccount)}
                            on_confirm={link.callback(|_| ProfileMsg::DeleteAccount)}
                            on_cancel={link.callback(|_| ProfileMsg::CloseDeleteConfirm)}
                        />
                    }
                </div>
            </div>
        }
    }
}

impl ProfileModal {
    /// Mark `action` in flight and report its outcome back as a message.
    fn start<F>(&mut self, ctx: &Context<Self>, action: ProfileAction, call: F) -> bool
    where
        F: std::future::Future<Output = ServiceResult<()>> + 'static,
    {
        self.pending = Some(action);
        self.error = None;
        let link = ctx.link().clone();
        wasm_bindgen_futures::spawn_local(async move {
            match call.await {
                Ok(()) => link.send_message(ProfileMsg::Succeeded(action)),
                Err(e) => link.send_message(ProfileMsg::Failed(action, e)),
            }
        });
        true
    }
}

// =============================================================================
// Presentational parts
// =============================================================================

#[derive(Properties, Clone, PartialEq)]
pub struct ProfileActionsProps {
    #[prop_or_default]
    pub email: Option<String>,
    #[prop_or_default]
    pub email_verified: bool,
    #[prop_or_default]
    pub avatar: Option<String>,
    #[prop_or_default]
    pub linked_discord: Option<LinkAccount>,
    #[prop_or_default]
    pub reset_disabled: bool,
    #[prop_or_default]
    pub verify_disabled: bool,
    #[prop_or_default]
    pub pending: Option<ProfileAction>,
    #[prop_or_default]
    pub error: Option<String>,
    #[prop_or_default]
    pub on_reset_password: Callback<MouseEvent>,
    #[prop_or_default]
    pub on_verify_email: Callback<MouseEvent>,
    #[prop_or_default]
    pub on_link_discord: Callback<MouseEvent>,
    #[prop_or_default]
    pub on_unlink_discord: Callback<MouseEvent>,
    #[prop_or_default]
    pub on_delete_account: Callback<MouseEvent>,
    #[prop_or_default]
    pub on_sign_out: Callback<MouseEvent>,
    #[prop_or_default]
    pub on_dismiss_error: Callback<MouseEvent>,
}

#[function_component(ProfileActions)]
pub fn profile_actions(props: &ProfileActionsProps) -> Html {
    let busy = props.pending.is_some();

    html! {
        <div class="profile-actions">
            <div class="profile-header">
                if let Some(src) = props.avatar.clone() {
                    <img class="profile-avatar" src={src} alt="Profile picture" />
                }
                <div class="profile-identity">
                    <span class="profile-email">{ props.email.clone().unwrap_or_default() }</span>
                    if props.email_verified {
                        <span class="profile-verified" title="Verified">
                            <CheckCircleIcon />
                        </span>
                    }
                </div>
            </div>

            if let Some(error) = props.error.clone() {
                <div class="profile-error" role="alert">
                    <span>{ error }</span>
                    <button type="button" class="profile-error-dismiss" onclick={props.on_dismiss_error.clone()}>{"×"}</button>
                </div>
            }

            <div class="profile-buttons">
                <a class="btn-apple btn-secondary" href={GRAVATAR_URL} target="_blank" rel="noopener noreferrer">
                    <ImageIcon />
                    {"Edit Gravatar"}
                </a>
                <button
                    type="button"
                    class="btn-apple btn-secondary verify-email"
                    disabled={props.verify_disabled || busy}
                    onclick={props.on_verify_email.clone()}
                >
                    <MailIcon />
                    {"Verify Email"}
                </button>
                {
                    match &props.linked_discord {
                        Some(account) => html! {
                            <button
                                type="button"
                                class="btn-apple btn-discord unlink-discord"
                                disabled={busy}
                                onclick={props.on_unlink_discord.clone()}
                            >
                                <DiscordIcon />
                                { format!("Unlink Discord {}", account.display_name()) }
                            </button>
                        },
                        None => html! {
                            <button
                                type="button"
                                class="btn-apple btn-discord link-discord"
                                title="Link your Discord account to automatically receive your Subscriber role if you're subscribed"
                                onclick={props.on_link_discord.clone()}
                            >
                                <DiscordIcon />
                                {"Link Discord Account"}
                            </button>
                        },
                    }
                }
                <button
                    type="button"
                    class="btn-apple btn-secondary reset-password"
                    disabled={props.reset_disabled || busy}
                    onclick={props.on_reset_password.clone()}
                >
                    <KeyIcon />
                    {"Reset Password"}
                </button>
                <button
                    type="button"
                    class="btn-apple btn-danger delete-account"
                    disabled={busy}
                    onclick={props.on_delete_account.clone()}
                >
                    <TrashIcon />
                    {"Delete Account"}
                </button>
                <button
                    type="button"
                    class="btn-apple btn-primary sign-out"
                    onclick={props.on_sign_out.clone()}
                >
                    <SignOutIcon />
                    {"Sign out"}
                </button>
            </div>
        </div>
    }
}

#[derive(Properties, Clone, PartialEq)]
pub struct DeleteAccountConfirmProps {
    #[prop_or_default]
    pub busy: bool,
    pub on_confirm: Callback<MouseEvent>,
    pub on_cancel: Callback<MouseEvent>,
}

#[function_component(DeleteAccountConfirm)]
pub fn delete_account_confirm(props: &DeleteAccountConfirmProps) -> Html {
    html! {
        <div class="glass-backdrop delete-confirm" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
            <div class="card-apple" style="max-width: 360px; width: 90%;">
                <h3 style="margin: 0 0 1rem; font-size: 1.25rem; font-weight: 600;">{"Delete Your Account"}</h3>
                <p>{"Are you sure you want to delete your account? This can't be undone."}</p>
                <div style="display: flex; gap: 0.75rem; margin-top: 1.5rem;">
                    <button
                        type="button"
                        class="btn-apple btn-danger confirm-yes"
                        style="flex: 1;"
                        disabled={props.busy}
                        onclick={props.on_confirm.clone()}
                    >
                        {"Yes"}
                    </button>
                    <button
                        type="button"
                        class="btn-apple btn-secondary confirm-no"
                        style="flex: 1;"
                        onclick={props.on_cancel.clone()}
                    >
                        {"No"}
                    </button>
                </div>
            </div>
        </div>
    }
}
