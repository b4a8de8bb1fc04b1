pub mod classes;
pub mod rules;
pub mod scores;
pub mod shows;
pub mod startlist;
pub mod status;
