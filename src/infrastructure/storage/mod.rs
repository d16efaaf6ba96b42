pub mod cache;

pub use cache::MenuCache;
