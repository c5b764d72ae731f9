pub mod browser;
pub mod controller;
pub mod types;

pub use browser::SessionBrowser;
pub use controller::{SessionController, SubmitOutcome};
pub use types::{ArchivedSession, Message, Speaker};
