mod handler;

pub use handler::{index, owner_confirm_page};
