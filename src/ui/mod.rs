pub mod batch;
pub mod panels;
pub mod plot;
pub mod single;
