pub mod clusterer;
pub mod discovery;
pub mod extractor;
pub mod fingerprint;
pub mod matrix;
pub mod parser;
pub mod ranker;
pub mod report;
pub mod scorer;
pub mod taxonomy;
