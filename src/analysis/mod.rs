pub mod analyzer;

pub use analyzer::CodeAnalyzer;
