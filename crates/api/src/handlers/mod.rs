pub mod admin;
pub mod sessions;
pub mod submissions;
pub mod survey;
pub mod waitlist;
