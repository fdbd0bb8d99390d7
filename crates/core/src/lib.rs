//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the block-stacking simulation: geometry, pooling, the
//! frame clock and the game state machine. It performs no I/O of its own;
//! configuration and score submission go through the [`ConfigSource`] and
//! [`ScoreService`] traits, and drawing goes through [`Stage`].
//!
//! # Module Structure
//!
//! - [`block`]: axis-aligned cuboid and the overlap/cut algorithm
//! - [`pool`]: LIFO recycler for block instances
//! - [`ticker`]: frame clock producing normalized deltas
//! - [`anim`]: tweens driven by the game clock
//! - [`config`]: JSON game configuration and launch options
//! - [`color`]: per-block color derivation
//! - [`rng`]: seeded generator for reproducible runs
//! - [`service`] / [`leaderboard`]: collaborator contracts and an in-memory scoreboard
//! - [`stage`]: renderer contract and queued scene events
//! - [`game_state`]: the state machine tying everything together
//!
//! # Example
//!
//! ```
//! use tui_stacker_core::{GameConfig, GameState, LocalLeaderboard, NullStage};
//! use tui_stacker_core::types::Phase;
//!
//! let mut game = GameState::new(12345);
//! let mut scores = LocalLeaderboard::new("player");
//! game.prepare(&mut GameConfig::default(), &mut scores).unwrap();
//! assert_eq!(game.phase(), Phase::Ready);
//!
//! // Start a round; a block begins sweeping over the base.
//! game.action(&mut scores).unwrap();
//! game.tick(16.0, 1.0);
//! game.render(&mut NullStage);
//!
//! // Dropping right away misses: the block spawns past the edge of the stack.
//! let mut game = GameState::new(1);
//! game.prepare(&mut GameConfig::default(), &mut scores).unwrap();
//! game.action(&mut scores).unwrap();
//! game.action(&mut scores).unwrap();
//! assert_eq!(game.phase(), Phase::Ended);
//! ```

pub mod anim;
pub mod block;
pub mod color;
pub mod config;
pub mod error;
pub mod game_state;
pub mod leaderboard;
pub mod pool;
pub mod rng;
pub mod service;
pub mod snapshot;
pub mod stage;
pub mod ticker;

pub use tui_stacker_types as types;

// Re-export commonly used types for convenience
pub use block::{Axis, Block, BlockId, BlockView, CutOutcome, Direction};
pub use config::{GameConfig, LaunchOptions};
pub use error::{ConfigError, GameError, ServiceError};
pub use game_state::GameState;
pub use leaderboard::LocalLeaderboard;
pub use pool::{Pool, Recycle};
pub use rng::SimpleRng;
pub use service::{
    AllTimeStats, ConfigSource, JsonConfigFile, LeaderboardEntry, ScoreService, Standings,
};
pub use snapshot::{GameSnapshot, MAX_VISIBLE_BLOCKS};
pub use stage::{NullStage, Stage, StageEvent};
pub use ticker::{Frame, Ticker};
