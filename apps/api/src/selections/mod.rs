// Selection history: confirmed picks feed the cooldown window.

pub mod handlers;
pub mod repo;
