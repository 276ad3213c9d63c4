pub mod download;
pub mod inspect;
pub mod render;
