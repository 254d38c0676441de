// Data model for profiles, plans, templates, and workouts

pub mod plan;
pub mod profile;
pub mod template;
pub mod workout;

pub use plan::*;
pub use profile::*;
pub use template::*;
pub use workout::*;
