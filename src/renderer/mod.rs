pub mod classifier;
pub mod components;
pub mod expressions;
pub mod renderer;
pub mod renders;
pub mod state;
pub mod traits;

pub use classifier::*;
pub use components::*;
pub use expressions::Owner;
pub use renderer::*;
pub use renders::*;
pub use state::*;
pub use traits::*;
