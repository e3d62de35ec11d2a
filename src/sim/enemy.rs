//! Enemy agent: state machine, animation and facing bucket.

use std::f32::consts::{FRAC_PI_4, FRAC_PI_8};

use glam::Vec2;
use rand::Rng;

use crate::{config::EnemyConfig, world::normalize_angle};

/// What the enemy is doing. Timed states carry their remaining seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyState {
    Idle,
    Walk { dest: Vec2 },
    Shoot { remaining: f32 },
    Pain { remaining: f32 },
    Dead,
}

/// Payload-free tag of [`EnemyState`], used to pick an animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKind {
    Idle,
    Walk,
    Shoot,
    Pain,
    Dead,
}

impl EnemyState {
    pub fn kind(&self) -> StateKind {
        match self {
            EnemyState::Idle => StateKind::Idle,
            EnemyState::Walk { .. } => StateKind::Walk,
            EnemyState::Shoot { .. } => StateKind::Shoot,
            EnemyState::Pain { .. } => StateKind::Pain,
            EnemyState::Dead => StateKind::Dead,
        }
    }

    /// Shoot, pain and death run to completion without re-thinking.
    pub fn is_locked(&self) -> bool {
        matches!(
            self,
            EnemyState::Shoot { .. } | EnemyState::Pain { .. } | EnemyState::Dead
        )
    }
}

/*──────────────────────────── animation ────────────────────────────*/

/// Frame numbers per state, as listed in the enemy frame file.
#[derive(Clone, Debug, PartialEq)]
pub struct Animations {
    pub idle: Vec<u32>,
    pub walk: Vec<u32>,
    pub shoot: Vec<u32>,
    pub pain: Vec<u32>,
    pub dead: Vec<u32>,
}

impl Default for Animations {
    fn default() -> Self {
        Self {
            idle: vec![0],
            walk: vec![1, 2, 3, 4],
            shoot: vec![5, 6],
            pain: vec![7],
            dead: vec![8, 9, 10],
        }
    }
}

impl Animations {
    pub fn frames(&self, kind: StateKind) -> &[u32] {
        match kind {
            StateKind::Idle => &self.idle,
            StateKind::Walk => &self.walk,
            StateKind::Shoot => &self.shoot,
            StateKind::Pain => &self.pain,
            StateKind::Dead => &self.dead,
        }
    }
}

/// Cursor into the current state's frame list.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Animator {
    index: usize,
    frac_time: f32,
}

impl Animator {
    pub fn reset(&mut self) {
        *self = Animator::default();
    }

    /// Advance by `dt`; `looping == false` holds on the last frame.
    pub fn advance(&mut self, dt: f32, per_frame: f32, len: usize, looping: bool) {
        if len == 0 || per_frame <= 0.0 {
            return;
        }
        self.frac_time += dt;
        while self.frac_time >= per_frame {
            self.frac_time -= per_frame;
            if looping {
                self.index = (self.index + 1) % len;
            } else {
                self.index = (self.index + 1).min(len - 1);
            }
        }
    }

    pub fn frame(&self, frames: &[u32]) -> u32 {
        frames
            .get(self.index.min(frames.len().saturating_sub(1)))
            .copied()
            .unwrap_or(0)
    }
}

/*─────────────────────────────── agent ─────────────────────────────*/

/// Outcome of [`Enemy::take_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wound {
    Ignored,
    Hurt,
    Flinched,
    Killed,
}

/// Per-enemy AI component. Position and collision size live in their own
/// components.
#[derive(Clone, Debug)]
pub struct Enemy {
    pub state: EnemyState,
    pub health: i32,
    /// Facing in radians, measured like `atan2(−dy, dx)`.
    pub angle: f32,
    pub alerted: bool,
    pub can_see_player: bool,
    /// Sector `0..=7` of the player relative to our facing.
    pub direction: u8,
    pub think_timer: f32,
    /// Hits landed on the player this frame, drained by the damage system.
    pub damage_this_frame: i32,
    pub animations: Animations,
    pub anim: Animator,
}

impl Enemy {
    pub fn new(cfg: &EnemyConfig, angle: f32) -> Self {
        Self {
            state: EnemyState::Idle,
            health: cfg.health,
            angle,
            alerted: false,
            can_see_player: false,
            direction: 0,
            think_timer: 0.0,
            damage_this_frame: 0,
            animations: Animations::default(),
            anim: Animator::default(),
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }

    /// Switch state; the animation restarts whenever the kind changes.
    pub fn enter(&mut self, next: EnemyState) {
        if self.state.kind() != next.kind() {
            log::debug!("enemy {:?} -> {:?}", self.state.kind(), next.kind());
            self.anim.reset();
        }
        self.state = next;
    }

    pub fn alert(&mut self) {
        self.alerted = true;
    }

    pub fn take_damage<R: Rng + ?Sized>(
        &mut self,
        amount: i32,
        cfg: &EnemyConfig,
        rng: &mut R,
    ) -> Wound {
        if self.is_dead() {
            return Wound::Ignored;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.health = 0;
            self.enter(EnemyState::Dead);
            return Wound::Killed;
        }
        self.alert();
        if matches!(self.state, EnemyState::Shoot { .. }) {
            return Wound::Hurt;
        }
        if cfg.pain_chance_divisor > 0 && rng.gen_ratio(1, cfg.pain_chance_divisor) {
            self.enter(EnemyState::Pain {
                remaining: cfg.pain_duration,
            });
            return Wound::Flinched;
        }
        Wound::Hurt
    }

    /// Count down shoot/pain. Returns `true` when a shot just finished.
    pub fn tick_timers(&mut self, dt: f32) -> bool {
        let (expired, was_shooting) = match &mut self.state {
            EnemyState::Shoot { remaining } => {
                *remaining -= dt;
                (*remaining <= 0.0, true)
            }
            EnemyState::Pain { remaining } => {
                *remaining -= dt;
                (*remaining <= 0.0, false)
            }
            _ => (false, false),
        };
        if expired {
            self.enter(EnemyState::Idle);
        }
        expired && was_shooting
    }

    /// Pick the next state. Only called for idle or walking enemies.
    pub fn think<R: Rng + ?Sized>(
        &mut self,
        own: Vec2,
        player: Vec2,
        cfg: &EnemyConfig,
        rng: &mut R,
    ) {
        if self.state.is_locked() {
            return;
        }
        if self.can_see_player
            && cfg.attack_chance_divisor > 0
            && rng.gen_ratio(1, cfg.attack_chance_divisor)
        {
            self.face(player - own);
            self.enter(EnemyState::Shoot {
                remaining: cfg.shoot_duration,
            });
        } else if self.alerted {
            let dest = player.floor() + Vec2::splat(0.5);
            self.enter(EnemyState::Walk { dest });
        } else {
            self.enter(EnemyState::Idle);
        }
    }

    /// Turn towards a world-space direction.
    pub fn face(&mut self, dir: Vec2) {
        if dir != Vec2::ZERO {
            self.angle = (-dir.y).atan2(dir.x);
        }
    }

    pub fn animate(&mut self, dt: f32, per_frame: f32) {
        let kind = self.state.kind();
        let len = self.animations.frames(kind).len();
        self.anim
            .advance(dt, per_frame, len, kind != StateKind::Dead);
    }

    #[inline]
    pub fn current_frame(&self) -> u32 {
        self.anim.frame(self.animations.frames(self.state.kind()))
    }
}

/// Which of the eight facing buckets the viewer at `viewer` sees.
///
/// Bucket 0 is head-on; buckets advance by `π/4` each and are centred on
/// their nominal angle.
pub fn direction_index(pos: Vec2, facing: f32, viewer: Vec2) -> u8 {
    let d = viewer - pos;
    let target = (-d.y).atan2(d.x);
    let rel = normalize_angle(target - facing);
    let sector = ((rel + FRAC_PI_8) / FRAC_PI_4).floor() as i32;
    sector.rem_euclid(8) as u8
}
