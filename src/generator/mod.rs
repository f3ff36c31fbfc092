pub mod corpus_generator;

pub use corpus_generator::{CorpusGenerator, GenerationProgress};
