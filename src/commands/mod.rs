pub mod cluster;
pub mod extract;
