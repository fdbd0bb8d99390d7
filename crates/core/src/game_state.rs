//! Game state machine: the block stack, the moving block and round sequencing.

use glam::DVec3;

use crate::anim::{Easing, Tween, VecTween};
use crate::block::{Axis, Block, BlockId, CutOutcome, Direction};
use crate::color::block_color;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::pool::Pool;
use crate::rng::SimpleRng;
use crate::service::{AllTimeStats, ConfigSource, LeaderboardEntry, ScoreService, Standings};
use crate::snapshot::GameSnapshot;
use crate::stage::{Stage, StageEvent};
use crate::types::{
    CutKind, Phase, COLOR_OFFSET_MAX, FALL_DRIFT, FALL_DROP, FALL_DURATION_MS,
    FALL_SPIN, FALL_SPIN_DELAY_MS, FALL_SPIN_DURATION_MS, RESET_SHRINK_MS, RESET_SPIN,
    RESET_STAGGER_MS,
};

/// Preallocated room for the stack, the pool and running animations.
pub const STACK_CAPACITY: usize = 64;

const EVENT_CAPACITY: usize = 64;

/// Id of the base block. Pooled blocks are numbered from 1.
pub const BASE_BLOCK_ID: BlockId = BlockId(0);

/// A block leaving the scene, owned by its animation until it is released.
#[derive(Debug)]
struct Animated {
    block: Block,
    motion: Motion,
    done_ms: f64,
}

#[derive(Debug, Clone, Copy)]
enum Motion {
    Fall { position: VecTween, rotation: VecTween },
    Shrink { scale: VecTween, spin: Tween },
}

impl Animated {
    fn apply(&mut self, now_ms: f64) {
        match self.motion {
            Motion::Fall { position, rotation } => {
                self.block.set_position(position.value_at(now_ms));
                self.block.set_rotation(rotation.value_at(now_ms));
            }
            Motion::Shrink { scale, spin } => {
                self.block.set_scale(scale.value_at(now_ms));
                let mut rotation = self.block.rotation();
                rotation.y = spin.value_at(now_ms);
                self.block.set_rotation(rotation);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ResetPlan {
    due_ms: f64,
    countdown: Tween,
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    phase: Phase,
    config: Option<GameConfig>,
    /// Index 0 is the base; while playing, the last block is the moving one.
    stack: Vec<Block>,
    pool: Pool<Block>,
    animating: Vec<Animated>,
    events: Vec<StageEvent>,
    rng: SimpleRng,
    color_offset: u32,
    now_ms: f64,
    reset: Option<ResetPlan>,
    /// Final score of a missed round that has not been submitted yet.
    pending_score: Option<u32>,
    best: Option<AllTimeStats>,
    leaderboard: Vec<LeaderboardEntry>,
    leaderboard_dirty: bool,
    new_high_score: bool,
    instructions_visible: bool,
    /// Last cut outcome (consumed by observers).
    last_cut: Option<CutKind>,
    round: u32,
    load_error: Option<String>,
    snapshot: GameSnapshot,
}

impl GameState {
    /// Create a game waiting for its configuration.
    pub fn new(seed: u32) -> Self {
        let mut next_id = BASE_BLOCK_ID.0;
        let pool = Pool::with_capacity(STACK_CAPACITY, move || {
            next_id += 1;
            Block::new(BlockId(next_id))
        });

        Self {
            phase: Phase::Loading,
            config: None,
            stack: Vec::with_capacity(STACK_CAPACITY),
            pool,
            animating: Vec::with_capacity(STACK_CAPACITY),
            events: Vec::with_capacity(EVENT_CAPACITY),
            rng: SimpleRng::new(seed),
            color_offset: 0,
            now_ms: 0.0,
            reset: None,
            pending_score: None,
            best: None,
            leaderboard: Vec::new(),
            leaderboard_dirty: false,
            new_high_score: false,
            instructions_visible: false,
            last_cut: None,
            round: 0,
            load_error: None,
            snapshot: GameSnapshot::default(),
        }
    }

    /// Fetch and validate the configuration, load standings and place the base block.
    ///
    /// On failure the game stays in `Loading` and keeps the error message.
    pub fn prepare(
        &mut self,
        source: &mut impl ConfigSource,
        scores: &mut impl ScoreService,
    ) -> Result<(), GameError> {
        if self.phase != Phase::Loading {
            log::debug!("prepare ignored in phase {}", self.phase.as_str());
            return Ok(());
        }

        match self.try_prepare(source, scores) {
            Ok(()) => {
                self.load_error = None;
                Ok(())
            }
            Err(e) => {
                log::error!("failed to prepare game: {}", e);
                self.load_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn try_prepare(
        &mut self,
        source: &mut impl ConfigSource,
        scores: &mut impl ScoreService,
    ) -> Result<(), GameError> {
        let config = source.fetch_config()?;
        config.validate()?;
        let base_color = config.base_color()?;
        let standings = scores.standings()?;

        let mut base = Block::with_scale(BASE_BLOCK_ID, config.base_scale());
        base.set_color(base_color);
        self.events.push(StageEvent::Add(base.view()));
        self.stack.clear();
        self.stack.push(base);

        self.apply_standings(standings);
        self.config = Some(config);
        self.instructions_visible = true;
        self.set_phase(Phase::Ready);
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> Option<&GameConfig> {
        self.config.as_ref()
    }

    /// Blocks placed in the current round.
    pub fn score(&self) -> u32 {
        let placed = self.stack.len().saturating_sub(1) - usize::from(self.has_active());
        placed as u32
    }

    /// Score to display: the reset countdown while resetting, otherwise [`score`](Self::score).
    pub fn display_score(&self) -> u32 {
        match (self.phase, self.reset) {
            (Phase::Resetting, Some(plan)) => plan.countdown.value_at(self.now_ms).floor() as u32,
            _ => self.score(),
        }
    }

    pub fn stack(&self) -> &[Block] {
        &self.stack
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// The moving block, if any.
    pub fn active_block(&self) -> Option<&Block> {
        if self.has_active() {
            self.stack.last()
        } else {
            None
        }
    }

    /// The block the moving one is cut against.
    pub fn target_block(&self) -> Option<&Block> {
        if self.has_active() {
            self.stack.get(self.stack.len() - 2)
        } else {
            None
        }
    }

    pub fn pool(&self) -> &Pool<Block> {
        &self.pool
    }

    /// Blocks falling or shrinking out of the scene.
    pub fn animating(&self) -> usize {
        self.animating.len()
    }

    /// Stage events not yet flushed by [`render`](Self::render).
    pub fn pending_events(&self) -> &[StageEvent] {
        &self.events
    }

    pub fn best(&self) -> Option<AllTimeStats> {
        self.best
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    pub fn new_high_score(&self) -> bool {
        self.new_high_score
    }

    pub fn instructions_visible(&self) -> bool {
        self.instructions_visible
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn color_offset(&self) -> u32 {
        self.color_offset
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn pending_submission(&self) -> Option<u32> {
        self.pending_score
    }

    /// Take and clear the last cut outcome.
    pub fn take_last_cut(&mut self) -> Option<CutKind> {
        self.last_cut.take()
    }

    /// Handle the player's drop trigger. Returns whether anything happened.
    ///
    /// Ready starts a round, Playing places the moving block (or retries a
    /// failed score submission), Ended starts the reset. Loading and
    /// Resetting ignore the action.
    pub fn action(&mut self, scores: &mut impl ScoreService) -> Result<bool, GameError> {
        match self.phase {
            Phase::Loading | Phase::Resetting => Ok(false),
            Phase::Ready => {
                self.start_game();
                Ok(true)
            }
            Phase::Playing => {
                if self.pending_score.is_some() {
                    self.end_game(scores)?;
                } else {
                    self.place_block(scores)?;
                }
                Ok(true)
            }
            Phase::Ended => {
                self.restart_game();
                Ok(true)
            }
        }
    }

    /// Advance animations, finish a due reset, then move the active block.
    pub fn tick(&mut self, now_ms: f64, delta: f64) {
        self.now_ms = now_ms;
        self.advance_animations();
        self.finish_reset_if_due();
        self.update(delta);
    }

    /// Move the active block by one frame and bounce it off the band edges.
    pub fn update(&mut self, delta: f64) {
        if !self.has_active() {
            return;
        }
        let Some(config) = self.config.as_ref() else {
            return;
        };

        let len = self.stack.len();
        let speed = config.gameplay.speed.at(len);
        let distance = config.gameplay.distance;

        let (below, top) = self.stack.split_at_mut(len - 1);
        let target = &below[len - 2];
        let current = &mut top[0];

        current.move_scalar(speed * delta);

        let direction = current.direction();
        if let Some(axis) = direction.axis() {
            let diff = current.position_on(axis) - target.position_on(axis);
            let sign = direction.sign();
            if (sign > 0.0 && diff > distance) || (sign < 0.0 && diff < -distance) {
                current.set_direction(direction.reversed());
            }
        }
    }

    /// Submit the pending final score and move to `Ended`.
    ///
    /// On failure nothing changes: the score stays pending and the next
    /// action retries.
    pub fn end_game(&mut self, scores: &mut impl ScoreService) -> Result<(), GameError> {
        let Some(score) = self.pending_score else {
            return Ok(());
        };

        match scores.submit_score(score) {
            Ok(standings) => {
                self.new_high_score = self.best.is_some_and(|best| score > best.score);
                self.pending_score = None;
                self.apply_standings(standings);
                log::info!(
                    "round {} over: score {}{}",
                    self.round,
                    score,
                    if self.new_high_score {
                        " (new high score)"
                    } else {
                        ""
                    }
                );
                self.set_phase(Phase::Ended);
                Ok(())
            }
            Err(e) => {
                log::warn!("score submission failed, will retry on next action: {}", e);
                Err(e.into())
            }
        }
    }

    /// Flush queued scene changes into `stage`, then draw the frame.
    pub fn render(&mut self, stage: &mut impl Stage) {
        for event in self.events.drain(..) {
            event.apply(stage);
        }
        if self.leaderboard_dirty {
            stage.show_leaderboard(&self.leaderboard);
            self.leaderboard_dirty = false;
        }

        let mut snapshot = std::mem::take(&mut self.snapshot);
        self.snapshot_into(&mut snapshot);
        stage.render(&snapshot);
        self.snapshot = snapshot;
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.clear();
        out.phase = self.phase;
        out.score = self.score();
        out.display_score = self.display_score();
        out.stack_len = self.stack.len();

        let capacity = out.blocks.capacity();
        let falling = self.animating.len().min(capacity);
        let room = capacity - falling;
        let first = self.stack.len().saturating_sub(room);
        for block in &self.stack[first..] {
            out.blocks.push(block.view());
        }
        for animated in &self.animating[..falling] {
            out.blocks.push(animated.block.view());
        }
        out.falling = falling;

        out.active = self.active_block().map(Block::view);
        out.new_high_score = self.new_high_score;
        out.best = self.best;
        out.instructions_visible = self.instructions_visible;
        out.round = self.round;
        out.now_ms = self.now_ms;
        out.pending_submission = self.pending_score.is_some();
        out.load_failed = self.load_error.is_some();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut out = GameSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    fn has_active(&self) -> bool {
        self.phase == Phase::Playing && self.pending_score.is_none() && self.stack.len() >= 2
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::info!("phase {} -> {}", self.phase.as_str(), phase.as_str());
        }
        self.phase = phase;
    }

    fn apply_standings(&mut self, standings: Standings) {
        self.leaderboard = standings.leaderboard;
        self.best = Some(standings.all_time);
        self.leaderboard_dirty = true;
    }

    fn start_game(&mut self) {
        if self.stack.is_empty() {
            return;
        }
        self.color_offset = self.rng.next_range(COLOR_OFFSET_MAX + 1);
        self.new_high_score = false;
        self.pending_score = None;
        self.reset = None;
        self.round += 1;
        self.set_phase(Phase::Playing);
        self.spawn_block();
    }

    fn place_block(&mut self, scores: &mut impl ScoreService) -> Result<(), GameError> {
        let len = self.stack.len();
        if len < 2 {
            return Ok(());
        }
        let accuracy = match self.config.as_ref() {
            Some(config) => config.gameplay.accuracy,
            None => return Err(GameError::NotPrepared),
        };

        let (below, top) = self.stack.split_at_mut(len - 1);
        let outcome = top[0].cut(&below[len - 2], accuracy);
        let kind = outcome.kind();
        self.last_cut = Some(kind);
        log::debug!("cut at height {}: {}", len - 1, kind.as_str());

        match outcome {
            CutOutcome::Missed => {
                if let Some(block) = self.stack.pop() {
                    self.events.push(StageEvent::Remove(block.id()));
                    self.pool.release(block);
                }
                // Still Playing here, so score() would discount a block that is gone.
                self.pending_score = Some(self.stack.len().saturating_sub(1) as u32);
                self.end_game(scores)
            }
            CutOutcome::Perfect => {
                self.spawn_block();
                Ok(())
            }
            CutOutcome::Chopped { position, scale } => {
                let (source, color) = match self.stack.last() {
                    Some(b) => (b.position(), b.color()),
                    None => return Ok(()),
                };
                self.spawn_block();
                self.drop_fragment(position, scale, source, color);
                Ok(())
            }
        }
    }

    /// Put a fresh moving block on top of the stack.
    fn spawn_block(&mut self) {
        let Some(config) = self.config.as_ref() else {
            return;
        };
        let Some(top) = self.stack.last() else {
            return;
        };

        let offset = (self.stack.len() + self.color_offset as usize) as f64;
        let color = block_color(&config.block.colors, offset);
        let scale = top.scale();
        let position = top.position() + DVec3::new(0.0, top.height(), 0.0);

        let mut block = self.pool.get();
        block.set_rotation(DVec3::ZERO);
        block.set_scale(scale);
        block.set_position(position);
        block.set_color(color);

        let len = self.stack.len() + 1;
        let axis = if len % 2 == 0 { Axis::X } else { Axis::Z };
        block.set_direction(Direction::along(axis, self.rng.next_bool()));
        block.move_scalar(config.gameplay.distance);

        if len >= config.instructions.height {
            self.instructions_visible = false;
        }

        self.events.push(StageEvent::Add(block.view()));
        self.events.push(StageEvent::Camera {
            y: block.position().y,
            at_ms: self.now_ms,
        });
        self.stack.push(block);
    }

    /// Animate the chopped-off piece away from `source` and release it afterwards.
    fn drop_fragment(&mut self, position: DVec3, scale: DVec3, source: DVec3, color: u32) {
        let mut block = self.pool.get();
        block.set_rotation(DVec3::ZERO);
        block.set_scale(scale);
        block.set_position(position);
        block.set_color(color);
        self.events.push(StageEvent::Add(block.view()));

        let sx = sign(position.x - source.x);
        let sz = sign(position.z - source.z);
        let now = self.now_ms;

        let fall = VecTween::new(
            position,
            position + DVec3::new(sx * FALL_DRIFT, -FALL_DROP, sz * FALL_DRIFT),
            now,
            FALL_DURATION_MS,
        )
        .eased(Easing::QuadraticIn);
        let spin = VecTween::new(
            DVec3::ZERO,
            DVec3::new(sz * FALL_SPIN, 0.0, -sx * FALL_SPIN),
            now,
            FALL_SPIN_DURATION_MS,
        )
        .delayed(FALL_SPIN_DELAY_MS);

        self.animating.push(Animated {
            block,
            motion: Motion::Fall {
                position: fall,
                rotation: spin,
            },
            done_ms: fall.end_ms(),
        });
    }

    /// Shrink every placed block away and count the score down.
    fn restart_game(&mut self) {
        let score = self.score();
        // The missed block left the stack at drop time but still counts here.
        let len = self.stack.len() + 1;
        let now = self.now_ms;
        let total = 2.0 * RESET_SHRINK_MS + len as f64 * RESET_STAGGER_MS;

        // Topmost block goes first.
        let mut k = 0.0;
        while self.stack.len() > 1 {
            let Some(block) = self.stack.pop() else {
                break;
            };
            let delay = k * RESET_STAGGER_MS;
            let scale = VecTween::new(block.scale(), DVec3::ZERO, now, RESET_SHRINK_MS)
                .eased(Easing::CubicIn)
                .delayed(delay);
            let spin = Tween::new(block.rotation().y, RESET_SPIN, now, RESET_SHRINK_MS)
                .eased(Easing::CubicIn)
                .delayed(delay);
            self.animating.push(Animated {
                block,
                motion: Motion::Shrink { scale, spin },
                done_ms: scale.end_ms(),
            });
            k += 1.0;
        }

        self.events.push(StageEvent::CameraReset {
            duration_ms: total,
            at_ms: now,
        });
        self.reset = Some(ResetPlan {
            due_ms: now + total,
            countdown: Tween::new(score as f64, 0.0, now, total),
        });
        self.set_phase(Phase::Resetting);
    }

    fn advance_animations(&mut self) {
        let now = self.now_ms;
        let mut i = 0;
        while i < self.animating.len() {
            if now >= self.animating[i].done_ms {
                let done = self.animating.remove(i);
                self.events.push(StageEvent::Remove(done.block.id()));
                self.pool.release(done.block);
            } else {
                self.animating[i].apply(now);
                i += 1;
            }
        }
    }

    fn finish_reset_if_due(&mut self) {
        if self.phase != Phase::Resetting {
            return;
        }
        match self.reset {
            Some(plan) if self.now_ms >= plan.due_ms => {
                self.stack.truncate(1);
                self.start_game();
            }
            _ => {}
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Like `f64::signum`, but zero stays zero.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
