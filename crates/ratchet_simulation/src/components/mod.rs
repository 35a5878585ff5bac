//! ECS Components общие для всех доменов
//!
//! - player: player interaction (Carried, LookedAt, Pickable, InteractionInput, InteractionPrompt)
//! - world: слои движка (GameLayer, WorldLayer)
//!
//! Доменные компоненты живут в своих модулях (parts::components, fasteners::components).

pub mod player;
pub mod world;

// Re-exports для удобного импорта
pub use player::*;
pub use world::*;
