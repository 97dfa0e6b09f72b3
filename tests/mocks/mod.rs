pub mod loaders;
pub mod summarizer;
