pub mod email;
pub mod redis;
