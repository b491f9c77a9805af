pub mod streak;
pub mod ticker;
pub mod timer;

pub use ticker::TimerController;
pub use timer::Completion;
