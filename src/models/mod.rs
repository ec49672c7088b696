pub mod group;
pub mod record;
pub mod report;
pub mod similarity;
