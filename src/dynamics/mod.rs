//! Movement: precision tiers, cascading pushes, and velocity/gravity motion.

pub mod motion;
pub mod pusher;
pub mod resolver;

pub use motion::{Gravity, Motion};
pub use pusher::PushChain;
pub use resolver::{Movement, Resolver};
