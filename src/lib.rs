pub mod annotate;
pub mod geocode;
pub mod table;
