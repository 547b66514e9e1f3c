pub mod frame;
pub mod hit;

pub use frame::{EdgeInstruction, EntityFlags, RenderFrame, Renderer};
pub use hit::{HitTarget, hit_test, hit_test_rect};
