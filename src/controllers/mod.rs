pub mod chapters;
pub mod narrate;
pub mod translate;
