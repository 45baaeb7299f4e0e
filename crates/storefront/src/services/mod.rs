//! Collaborator surfaces the engine consumes but does not implement:
//! the authenticated session and the user-facing notification sink.

pub mod notify;
pub mod session;

pub use notify::{Notifier, TracingNotifier};
pub use session::{ProfileAddress, Session, UserProfile};
