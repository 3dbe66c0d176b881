//! Screens of the client.
//!
//! Each feature owns its state, key handling, and rendering. Key handlers
//! return [`PageAction`]s; the reducer turns those into navigation, overlay
//! changes, and effects.

pub mod chat;
pub mod dashboard;
pub mod landing;
pub mod login;
pub mod nav;
pub mod summary;
pub mod wizard;

use perspectiq_core::api::{LoginRequest, StartSessionRequest};

use crate::overlays::ModalState;
use crate::route::Route;

/// Intent produced by a screen's key handler.
#[derive(Debug, Clone, PartialEq)]
pub enum PageAction {
    Navigate(Route),
    OpenModal(ModalState),
    SubmitLogin(LoginRequest),
    ReloadHistory,
    GenerateScenario { role: String },
    StartSession(StartSessionRequest),
    SendMessage { session_id: i64, text: String },
    Logout,
    Quit,
}
