pub mod export;
pub mod roles;
