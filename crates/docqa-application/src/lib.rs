pub mod controller;
pub mod dispatch;
pub mod selection;

pub use controller::{ClearOutcome, SendOutcome, SessionController, UploadOutcome};
pub use dispatch::{ClearDispatcher, QueryDispatcher, SendRejection, UploadDispatcher};
pub use selection::UploadSelection;
