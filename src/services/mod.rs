// Plan engine (pure) and the services that orchestrate it against storage

pub mod checkpoint_planner;
pub mod draft_cache;
pub mod macro_allocator;
pub mod metabolic;
pub mod plan_assembler;
pub mod plan_patch;
pub mod plan_renderer;
pub mod plan_service;
pub mod profile_service;
pub mod workout_cycle;

pub use draft_cache::DraftCache;
pub use plan_service::PlanService;
pub use profile_service::ProfileService;
