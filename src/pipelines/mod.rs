pub mod markdown;
pub mod paste;
pub mod url;
