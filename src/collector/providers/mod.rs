pub mod fixture;
pub mod tiki;
