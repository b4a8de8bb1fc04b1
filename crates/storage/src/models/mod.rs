mod class;
mod score;
mod show;
mod startlist_entry;
mod status;

pub use class::CompetitionClass;
pub use score::Score;
pub use show::Show;
pub use startlist_entry::StartlistEntry;
pub use status::{EventStatus, ScoreStatus, ShowType};
