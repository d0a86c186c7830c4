//! Click Animation Core (engine-agnostic)
//!
//! Plays every animation clip of an interactive object once when it is clicked.
//! For each entity carrying the animatable-on-click marker set the core:
//!
//! 1. walks the scene ancestry to find the nearest clip-owning root and the
//!    nearest externally driven player ([`resolve_context`]),
//! 2. creates a dedicated [`ClipPlayer`] bound to that root and stops the
//!    players that were already driving it ([`PlayerRegistry`]),
//! 3. advances the player every frame and restarts its clips on interaction
//!    ([`ClickAnimator::step`]),
//! 4. stops and releases the player when the marker goes away.
//!
//! Adapters provide the scene graph through [`SceneGraph`] and stop foreign
//! players through [`PlayerHost`].

pub mod autotag;
pub mod config;
pub mod engine;
pub mod ids;
pub mod membership;
pub mod outputs;
pub mod player;
pub mod registry;
pub mod resolve;
pub mod scene;

// Re-exports for consumers (adapters)
pub use autotag::AutoTagger;
pub use config::{Config, ConfigError, PlaybackCfg, DEFAULT_NAME_TAG};
pub use engine::ClickAnimator;
pub use ids::{ClipId, PlayerId};
pub use membership::{FrameBatch, MembershipTracker};
pub use outputs::{FrameEvent, Outputs};
pub use player::{ActionState, ClipAction, ClipPlayer, LoopMode};
pub use registry::{EnterOutcome, PlayerRegistry, PlayerSlot};
pub use resolve::{resolve_context, AnimationContext};
pub use scene::{Clip, Marker, MarkerSink, PlayerHost, SceneGraph, CLICK_ANIMATION_MARKERS};
