pub mod class;
pub mod score;
pub mod show;
pub mod startlist;
