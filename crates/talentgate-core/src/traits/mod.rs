//! Collaborator traits injected into the executor.

mod clock;
mod session_provider;
mod sign_out;
mod transport;

pub use clock::{Clock, SystemClock};
pub use session_provider::SessionProvider;
pub use sign_out::SignOutHandler;
pub use transport::Transport;
