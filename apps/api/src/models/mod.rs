pub mod rich_text;
pub mod schema;
pub mod source;
