pub mod clipboard;
pub mod error;
pub mod files;
pub mod history;
pub mod result;
pub mod visitor;

pub use clipboard::*;
pub use error::*;
pub use files::*;
pub use history::*;
pub use result::*;
pub use visitor::*;
