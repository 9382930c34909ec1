pub mod document;
pub mod question;
pub mod session;
