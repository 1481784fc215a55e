pub mod ai;
pub mod client;
pub mod shazu;
pub mod token;
