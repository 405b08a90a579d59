pub mod access_code;
pub mod session;
