#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]

//! talkback: chat session client core.
//!
//! One active conversation, two storage tiers: a local cache written through
//! on every turn (the availability guarantee) and a remote multi-session
//! archive mirrored best-effort. The [`session::SessionController`] owns the
//! lifecycle; [`session::SessionBrowser`] lists and restores archived
//! sessions. Providers, caches, and archives are trait seams with concrete
//! backends selected by [`Config`].

pub mod archive;
pub mod cache;
pub mod config;
pub mod logging;
pub mod providers;
pub mod session;
pub mod util;

pub use config::Config;
pub use session::{
    ArchivedSession, Message, SessionBrowser, SessionController, Speaker, SubmitOutcome,
};
