pub mod address;
pub mod entry;
pub mod level;
pub mod metadata;
