//! Stacking status effects carried by enemies. Each application keeps its
//! own timer; nothing is merged or replaced.

/// Damage-over-time payload as carried by a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotPayload {
    pub dps: f32,
    pub duration: f32,
}

/// Slow payload as carried by a projectile. `factor` multiplies movement
/// speed, so smaller is stronger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlowPayload {
    pub factor: f32,
    pub duration: f32,
}

#[derive(Clone, Copy, Debug)]
struct ActiveDot {
    dps: f32,
    remaining: f32,
}

#[derive(Clone, Copy, Debug)]
struct ActiveSlow {
    factor: f32,
    remaining: f32,
}

#[derive(Clone, Debug, Default)]
pub struct StatusEffects {
    dots: Vec<ActiveDot>,
    slows: Vec<ActiveSlow>,
}

impl StatusEffects {
    pub fn apply_dot(&mut self, payload: DotPayload) {
        self.dots.push(ActiveDot { dps: payload.dps, remaining: payload.duration });
    }

    pub fn apply_slow(&mut self, payload: SlowPayload) {
        self.slows.push(ActiveSlow { factor: payload.factor, remaining: payload.duration });
    }

    /// Effective speed multiplier: the strongest (smallest) active factor,
    /// not a product. Query before `tick` so a fresh application counts for
    /// the step that applies it.
    pub fn slow_factor(&self) -> f32 {
        self.slows.iter().map(|slow| slow.factor).fold(1.0, f32::min)
    }

    /// Advances every active effect by `dt` and returns the hp drain owed
    /// for this step. An effect that expires mid-step only charges for the
    /// portion of the step it was alive.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let mut drain = 0.0;
        for dot in &mut self.dots {
            drain += dot.dps * dt.min(dot.remaining);
            dot.remaining -= dt;
        }
        self.dots.retain(|dot| dot.remaining > 0.0);
        for slow in &mut self.slows {
            slow.remaining -= dt;
        }
        self.slows.retain(|slow| slow.remaining > 0.0);
        drain
    }

    pub fn is_burning(&self) -> bool {
        !self.dots.is_empty()
    }

    pub fn is_slowed(&self) -> bool {
        !self.slows.is_empty()
    }
}
