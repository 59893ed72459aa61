pub mod chart_parser;
pub mod timeline;
