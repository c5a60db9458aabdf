//! Attack instances and their per-frame contracts
//!
//! Every attack advances with `update` and answers `check_collision` for a
//! circle. One-shot kinds (punch, projectile) deactivate on their first hit.
//! Inactive attacks are removed by the resolver in the same frame.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{circles_overlap, distance, segment_circle_overlap};
use super::state::Hp;
use crate::consts::BEAM_REACH;
use crate::in_field;

pub const PUNCH_SPEED: f32 = 25.0;
pub const FIST_RADIUS: f32 = 20.0;
pub const POWER_FIELD_RADIUS: f32 = 200.0;
pub const POWER_FIELD_LIFETIME: u32 = 240;
/// Safety net for projectiles that never leave the field
pub const PROJECTILE_MAX_LIFETIME: u32 = 600;
pub const SLASH_SPEED: f32 = 40.0;
pub const SLASH_REACH: f32 = 400.0;
pub const SLASH_LIFETIME: u32 = 30;
pub const SLASH_WIDTH: f32 = 5.0;
pub const BEAM_LIFETIME: u32 = 45;
pub const BEAM_MAX_WIDTH: f32 = 30.0;
pub const BEAM_GROW_RATE: f32 = 3.0;
pub const BEAM_SHRINK_RATE: f32 = 1.0;
/// Beam widens while life is above this, then narrows
pub const BEAM_FADE_AFTER: u32 = 30;

/// Who an attack belongs to; decides which targets it can hurt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackOwner {
    Player,
    Crew,
    Boss,
}

/// Extending or retracting reach, shared by punches and slashes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reach {
    pub dir: Vec2,
    pub current: f32,
    pub max: f32,
    pub extending: bool,
}

impl Reach {
    fn toward(origin: Vec2, target: Vec2, max: f32) -> Self {
        Self {
            dir: (target - origin).normalize_or_zero(),
            current: 0.0,
            max,
            extending: true,
        }
    }

    /// Advance one frame; returns false once fully retracted
    fn step(&mut self, speed: f32) -> bool {
        if self.extending {
            self.current = (self.current + speed).min(self.max);
            if self.current >= self.max {
                self.extending = false;
            }
            true
        } else {
            self.current = (self.current - speed).max(0.0);
            self.current > 0.0
        }
    }

    fn tip(&self, origin: Vec2) -> Vec2 {
        origin + self.dir * self.current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AttackKind {
    /// Player basic attack: a fist thrown toward a point and pulled back
    Punch { reach: Reach, fist_radius: f32 },
    /// Player special: damages everything whose center lies inside
    PowerField { radius: f32, life: u32 },
    /// Straight-line shot
    Projectile {
        pos: Vec2,
        vel: Vec2,
        radius: f32,
        life: u32,
    },
    /// Extending blade segment
    Slash { reach: Reach, width: f32, life: u32 },
    /// Circle that is harmless until its warm-up ends
    Strike { radius: f32, warmup: u32, life: u32 },
    /// Expanding circle, optionally timed and drifting
    Area {
        radius: f32,
        max_radius: f32,
        growth: f32,
        life: Option<u32>,
        drift: f32,
    },
    /// Expanding band that shoves what it hits
    Ring {
        radius: f32,
        max_radius: f32,
        growth: f32,
        band: f32,
        push: f32,
    },
    /// Long segment toward an aim point that swells then fades
    Beam {
        dir: Vec2,
        width: f32,
        max_width: f32,
        life: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub id: u32,
    pub owner: AttackOwner,
    pub origin: Vec2,
    pub active: bool,
    pub damage: Hp,
    pub kind: AttackKind,
}

impl Attack {
    fn new(owner: AttackOwner, origin: Vec2, damage: Hp, kind: AttackKind) -> Self {
        Self {
            id: 0,
            owner,
            origin,
            active: true,
            damage,
            kind,
        }
    }

    /// Player punch from `origin` toward `target`, reaching exactly the target distance
    pub fn punch(origin: Vec2, target: Vec2) -> Self {
        let reach = Reach::toward(origin, target, distance(origin, target));
        Self::new(
            AttackOwner::Player,
            origin,
            Hp::whole(1),
            AttackKind::Punch {
                reach,
                fist_radius: FIST_RADIUS,
            },
        )
    }

    /// Player power field centred on `origin`, dealing `rate` per frame
    pub fn power_field(origin: Vec2, rate: Hp) -> Self {
        Self::new(
            AttackOwner::Player,
            origin,
            rate,
            AttackKind::PowerField {
                radius: POWER_FIELD_RADIUS,
                life: POWER_FIELD_LIFETIME,
            },
        )
    }

    /// Projectile along `dir` (normalized here); a zero direction stays put
    pub fn projectile(
        owner: AttackOwner,
        origin: Vec2,
        dir: Vec2,
        speed: f32,
        radius: f32,
        damage: Hp,
    ) -> Self {
        Self::new(
            owner,
            origin,
            damage,
            AttackKind::Projectile {
                pos: origin,
                vel: dir.normalize_or_zero() * speed,
                radius,
                life: PROJECTILE_MAX_LIFETIME,
            },
        )
    }

    /// Crew slash from `origin` reaching out to `target`
    pub fn slash(origin: Vec2, target: Vec2) -> Self {
        Self::new(
            AttackOwner::Crew,
            origin,
            Hp::whole(2),
            AttackKind::Slash {
                reach: Reach::toward(origin, target, distance(origin, target)),
                width: SLASH_WIDTH,
                life: SLASH_LIFETIME,
            },
        )
    }

    pub fn strike(owner: AttackOwner, at: Vec2, radius: f32, warmup: u32, life: u32, damage: Hp) -> Self {
        Self::new(
            owner,
            at,
            damage,
            AttackKind::Strike {
                radius,
                warmup,
                life,
            },
        )
    }

    pub fn area(
        owner: AttackOwner,
        at: Vec2,
        radius: f32,
        max_radius: f32,
        growth: f32,
        life: Option<u32>,
        drift: f32,
        damage: Hp,
    ) -> Self {
        Self::new(
            owner,
            at,
            damage,
            AttackKind::Area {
                radius,
                max_radius,
                growth,
                life,
                drift,
            },
        )
    }

    pub fn ring(at: Vec2, max_radius: f32, growth: f32, band: f32, push: f32, damage: Hp) -> Self {
        Self::new(
            AttackOwner::Crew,
            at,
            damage,
            AttackKind::Ring {
                radius: 0.0,
                max_radius,
                growth,
                band,
                push,
            },
        )
    }

    /// Crew beam from `origin` toward `aim`
    pub fn beam(origin: Vec2, aim: Vec2) -> Self {
        Self::new(
            AttackOwner::Crew,
            origin,
            Hp::whole(4),
            AttackKind::Beam {
                dir: (aim - origin).normalize_or_zero(),
                width: 0.0,
                max_width: BEAM_MAX_WIDTH,
                life: BEAM_LIFETIME,
            },
        )
    }

    /// Advance kinematics and lifetime by one frame
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.active {
            return;
        }
        let alive = match &mut self.kind {
            AttackKind::Punch { reach, .. } => reach.step(PUNCH_SPEED),
            AttackKind::PowerField { life, .. } => tick_life(life),
            AttackKind::Projectile { pos, vel, life, .. } => {
                *pos += *vel;
                tick_life(life) && in_field(*pos)
            }
            AttackKind::Slash { reach, life, .. } => tick_life(life) && reach.step(SLASH_SPEED),
            AttackKind::Strike { warmup, life, .. } => {
                if *warmup > 0 {
                    *warmup -= 1;
                    true
                } else {
                    tick_life(life)
                }
            }
            AttackKind::Area {
                radius,
                max_radius,
                growth,
                life,
                drift,
            } => {
                if *radius < *max_radius {
                    *radius = (*radius + *growth).min(*max_radius);
                }
                if *drift > 0.0 {
                    self.origin += Vec2::new(
                        rng.random_range(-*drift..=*drift),
                        rng.random_range(-*drift..=*drift),
                    );
                }
                match life {
                    Some(life) => tick_life(life),
                    None => *radius < *max_radius,
                }
            }
            AttackKind::Ring {
                radius,
                max_radius,
                growth,
                ..
            } => {
                *radius += *growth;
                *radius < *max_radius
            }
            AttackKind::Beam {
                width,
                max_width,
                life,
                ..
            } => {
                let alive = tick_life(life);
                if *life > BEAM_FADE_AFTER {
                    *width = (*width + BEAM_GROW_RATE).min(*max_width);
                } else {
                    *width = (*width - BEAM_SHRINK_RATE).max(0.0);
                }
                alive
            }
        };
        if !alive {
            self.active = false;
        }
    }

    /// Does this attack hit the circle? One-shot kinds are consumed on a hit.
    pub fn check_collision(&mut self, center: Vec2, radius: f32) -> bool {
        if !self.active {
            return false;
        }
        let origin = self.origin;
        let hit = match &self.kind {
            AttackKind::Punch { reach, fist_radius } => {
                circles_overlap(reach.tip(origin), *fist_radius, center, radius)
            }
            AttackKind::PowerField { radius: field, .. } => distance(origin, center) < *field,
            AttackKind::Projectile {
                pos, radius: r, ..
            } => circles_overlap(*pos, *r, center, radius),
            AttackKind::Slash { reach, width, .. } => {
                segment_circle_overlap(origin, reach.tip(origin), *width, center, radius)
            }
            AttackKind::Strike {
                radius: r, warmup, ..
            } => *warmup == 0 && circles_overlap(origin, *r, center, radius),
            AttackKind::Area { radius: r, .. } => circles_overlap(origin, *r, center, radius),
            AttackKind::Ring {
                radius: r, band, ..
            } => {
                let d = distance(origin, center);
                d > *r - *band && d < *r
            }
            AttackKind::Beam { dir, width, .. } => {
                let end = origin + *dir * BEAM_REACH;
                segment_circle_overlap(origin, end, *width / 2.0, center, radius)
            }
        };
        if hit && self.is_one_shot() {
            self.active = false;
        }
        hit
    }

    pub fn is_one_shot(&self) -> bool {
        matches!(
            self.kind,
            AttackKind::Punch { .. } | AttackKind::Projectile { .. }
        )
    }

    pub fn is_punch(&self) -> bool {
        matches!(self.kind, AttackKind::Punch { .. })
    }

    pub fn is_power_field(&self) -> bool {
        matches!(self.kind, AttackKind::PowerField { .. })
    }

    /// Push strength applied to whatever this attack hits
    pub fn push_strength(&self) -> Option<f32> {
        match self.kind {
            AttackKind::Ring { push, .. } => Some(push),
            _ => None,
        }
    }

    /// Point a renderer should centre the attack on
    pub fn position(&self) -> Vec2 {
        match &self.kind {
            AttackKind::Punch { reach, .. } => reach.tip(self.origin),
            AttackKind::Projectile { pos, .. } => *pos,
            _ => self.origin,
        }
    }

    /// Far end of segment-shaped attacks
    pub fn segment_end(&self) -> Option<Vec2> {
        match &self.kind {
            AttackKind::Slash { reach, .. } => Some(reach.tip(self.origin)),
            AttackKind::Beam { dir, .. } => Some(self.origin + *dir * BEAM_REACH),
            _ => None,
        }
    }

    /// Radius (or half-width for segments) for drawing
    pub fn extent(&self) -> f32 {
        match &self.kind {
            AttackKind::Punch { fist_radius, .. } => *fist_radius,
            AttackKind::PowerField { radius, .. }
            | AttackKind::Projectile { radius, .. }
            | AttackKind::Strike { radius, .. }
            | AttackKind::Area { radius, .. }
            | AttackKind::Ring { radius, .. } => *radius,
            AttackKind::Slash { width, .. } => *width,
            AttackKind::Beam { width, .. } => *width / 2.0,
        }
    }

    /// Short name for renderers and logs
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            AttackKind::Punch { .. } => "punch",
            AttackKind::PowerField { .. } => "power_field",
            AttackKind::Projectile { .. } => "projectile",
            AttackKind::Slash { .. } => "slash",
            AttackKind::Strike { .. } => "strike",
            AttackKind::Area { .. } => "area",
            AttackKind::Ring { .. } => "ring",
            AttackKind::Beam { .. } => "beam",
        }
    }

    /// Strike still warming up (drawn as a warning marker)
    pub fn is_warming_up(&self) -> bool {
        matches!(self.kind, AttackKind::Strike { warmup, .. } if warmup > 0)
    }
}

/// Count a lifetime down; false once it hits zero
fn tick_life(life: &mut u32) -> bool {
    *life = life.saturating_sub(1);
    *life > 0
}
