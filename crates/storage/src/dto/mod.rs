pub mod class;
pub mod results;
pub mod rules;
pub mod score;
pub mod show;
pub mod startlist;
