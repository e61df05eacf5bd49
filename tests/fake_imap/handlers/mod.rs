//! IMAP command handlers for the fake server.
//!
//! Each handler lives in its own module and processes a single IMAP
//! command (LIST/LSUB, LOGIN, SELECT, UID SEARCH, UID FETCH). LOGOUT is
//! answered by the server loop itself.

mod list;
mod login;

pub use list::handle_list;
pub use login::handle_login;
pub use select::handle_select;
pub use uid_fetch::handle_uid_fetch;
pub use uid_search::handle_uid_search;
