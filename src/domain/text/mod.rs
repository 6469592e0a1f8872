pub mod chapters;
pub mod loader;

pub use chapters::{split_chapters, Chapter};
pub use loader::{load, InputText, TextSource};
