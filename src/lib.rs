pub mod cli;
pub mod compress;
pub mod config;
pub mod draft;
pub mod error;
pub mod export;
pub mod grouping;
pub mod normalize;
pub mod phrases;
pub mod pipeline;
pub mod polarity;
pub mod prompts;
pub mod section;
pub mod sheet;
pub mod similarity;
pub mod summarizer;
