//! Block module - an axis-aligned cuboid and the overlap/cut algorithm
//!
//! A block is centered on its position; `scale` holds its full extent
//! (width = x, height = y, depth = z). Only the active (moving) block ever has a
//! non-still [`Direction`], and movement is strictly horizontal.

use glam::DVec3;

use crate::pool::Recycle;
use crate::types::CutKind;

/// Stable identity of a block instance.
///
/// Ids survive pooling: a recycled block keeps its id, so a renderer can key
/// drawables by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockId(pub u32);

/// Horizontal axis a block moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// Component of `v` on this axis.
    #[inline]
    pub fn of(self, v: DVec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Z => v.z,
        }
    }

    #[inline]
    pub fn set(self, v: &mut DVec3, value: f64) {
        match self {
            Axis::X => v.x = value,
            Axis::Z => v.z = value,
        }
    }
}

/// Movement direction of a block.
///
/// At most one horizontal component is non-zero and it is always ±1; Y never moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Still,
    PosX,
    NegX,
    PosZ,
    NegZ,
}

impl Direction {
    /// Direction along `axis`, positive when `positive` is set.
    pub fn along(axis: Axis, positive: bool) -> Self {
        match (axis, positive) {
            (Axis::X, true) => Direction::PosX,
            (Axis::X, false) => Direction::NegX,
            (Axis::Z, true) => Direction::PosZ,
            (Axis::Z, false) => Direction::NegZ,
        }
    }

    /// Axis of motion, `None` when still.
    pub fn axis(self) -> Option<Axis> {
        match self {
            Direction::Still => None,
            Direction::PosX | Direction::NegX => Some(Axis::X),
            Direction::PosZ | Direction::NegZ => Some(Axis::Z),
        }
    }

    /// +1, -1, or 0 when still.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Still => 0.0,
            Direction::PosX | Direction::PosZ => 1.0,
            Direction::NegX | Direction::NegZ => -1.0,
        }
    }

    /// Same axis, opposite sign.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Still => Direction::Still,
            Direction::PosX => Direction::NegX,
            Direction::NegX => Direction::PosX,
            Direction::PosZ => Direction::NegZ,
            Direction::NegZ => Direction::PosZ,
        }
    }

    /// Unit vector form.
    pub fn vector(self) -> DVec3 {
        match self {
            Direction::Still => DVec3::ZERO,
            Direction::PosX => DVec3::X,
            Direction::NegX => DVec3::NEG_X,
            Direction::PosZ => DVec3::Z,
            Direction::NegZ => DVec3::NEG_Z,
        }
    }
}

/// Result of [`Block::cut`].
///
/// For `Chopped`, `position` and `scale` describe the discarded fragment; the
/// block itself has already been turned into the surviving piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutOutcome {
    Missed,
    Perfect,
    Chopped { position: DVec3, scale: DVec3 },
}

impl CutOutcome {
    pub fn kind(&self) -> CutKind {
        match self {
            CutOutcome::Missed => CutKind::Missed,
            CutOutcome::Perfect => CutKind::Perfect,
            CutOutcome::Chopped { .. } => CutKind::Chopped,
        }
    }
}

/// Plain copy of a block's drawable state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockView {
    pub id: BlockId,
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
    pub color: u32,
}

/// Positioned, scaled, colored cuboid.
///
/// Deliberately not `Clone`: an instance lives in exactly one place at a time
/// (the stack, the pool, or a running animation).
#[derive(Debug, PartialEq)]
pub struct Block {
    id: BlockId,
    position: DVec3,
    rotation: DVec3,
    scale: DVec3,
    color: u32,
    direction: Direction,
}

impl Block {
    /// Unit cube at the origin.
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
            color: 0,
            direction: Direction::Still,
        }
    }

    pub fn with_scale(id: BlockId, scale: DVec3) -> Self {
        Self {
            scale,
            ..Self::new(id)
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn set_position(&mut self, position: DVec3) {
        self.position = position;
    }

    pub fn rotation(&self) -> DVec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: DVec3) {
        self.rotation = rotation;
    }

    pub fn scale(&self) -> DVec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: DVec3) {
        self.scale = scale;
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn set_color(&mut self, color: u32) {
        self.color = color & 0x00ff_ffff;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn height(&self) -> f64 {
        self.scale.y
    }

    /// Extent along `axis`.
    pub fn size_on(&self, axis: Axis) -> f64 {
        axis.of(self.scale)
    }

    /// Center coordinate along `axis`.
    pub fn position_on(&self, axis: Axis) -> f64 {
        axis.of(self.position)
    }

    /// Axis used by [`Block::cut`]: X when moving along X, otherwise Z.
    pub fn cut_axis(&self) -> Axis {
        self.direction.axis().unwrap_or(Axis::Z)
    }

    /// Translate by `direction * amount`.
    pub fn move_scalar(&mut self, amount: f64) {
        self.position += self.direction.vector() * amount;
    }

    /// Cut this block against `target` on the active axis.
    ///
    /// `overlap < 0` is a miss (no epsilon); a shortfall strictly below
    /// `accuracy` snaps onto the target; anything else is chopped in place and
    /// the discarded fragment is returned. Y and the other horizontal axis are
    /// never touched.
    pub fn cut(&mut self, target: &Block, accuracy: f64) -> CutOutcome {
        let axis = self.cut_axis();
        let current = self.position_on(axis);
        let anchor = target.position_on(axis);

        let overlap = target.size_on(axis) - (current - anchor).abs();
        if overlap < 0.0 {
            return CutOutcome::Missed;
        }

        let size = self.size_on(axis);
        if size - overlap < accuracy {
            axis.set(&mut self.position, anchor);
            return CutOutcome::Perfect;
        }

        let mut fragment_position = self.position;
        let mut fragment_scale = self.scale;

        let center = (anchor + current) * 0.5;
        axis.set(&mut self.scale, overlap);
        axis.set(&mut self.position, center);

        let fragment_size = size - overlap;
        let side = if center < anchor { -0.5 } else { 0.5 };
        axis.set(&mut fragment_scale, fragment_size);
        axis.set(
            &mut fragment_position,
            center + (fragment_size + overlap) * side,
        );

        CutOutcome::Chopped {
            position: fragment_position,
            scale: fragment_scale,
        }
    }

    pub fn view(&self) -> BlockView {
        BlockView {
            id: self.id,
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            color: self.color,
        }
    }
}

impl Recycle for Block {
    fn recycle(&mut self) {
        self.position = DVec3::ZERO;
        self.rotation = DVec3::ZERO;
        self.scale = DVec3::ONE;
        self.color = 0;
        self.direction = Direction::Still;
    }
}
