pub mod config_error;
pub mod icons;
pub mod profile_modal;
pub mod top_bar;
pub mod video_viewport;
