pub mod habit;
pub mod settings;
pub mod task;
pub mod timer;

pub use habit::*;
pub use settings::*;
pub use task::*;
pub use timer::*;
