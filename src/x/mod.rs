//! Talking to the X-Server

pub(crate) mod randr;
pub(crate) mod utils;
