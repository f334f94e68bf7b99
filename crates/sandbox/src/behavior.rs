use thiserror::Error;
use tracing::{debug, info, warn};

use crate::actor::{Actor, ActorId, ActorWorld, Transform};
use crate::assertions::AssertionError;
use crate::physics::{InvalidPresetError, PhysicsPreset, PhysicsPresetExt};
use crate::profiling::{ScopeTimings, TimingSnapshot};

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("actor {0:?} no longer exists")]
    ActorMissing(ActorId),
    #[error(transparent)]
    InvalidPreset(#[from] InvalidPresetError),
    #[error(transparent)]
    Assertion(#[from] AssertionError),
    #[error("{0}")]
    Script(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum HostError {
    #[error("fixed step must be finite and > 0, got {dt_seconds}")]
    InvalidStep { dt_seconds: f32 },
    #[error("cannot attach behavior '{behavior}' to missing actor {owner:?}")]
    OwnerMissing { owner: ActorId, behavior: String },
}

/// Per-call view a behavior gets of its owning actor and the world.
pub struct BehaviorContext<'a> {
    owner: ActorId,
    world: &'a mut ActorWorld,
}

impl<'a> BehaviorContext<'a> {
    /// For driving a behavior outside a [`BehaviorHost`].
    pub fn new(owner: ActorId, world: &'a mut ActorWorld) -> Self {
        Self { owner, world }
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    pub fn actor(&self) -> Result<&Actor, BehaviorError> {
        self.world
            .find(self.owner)
            .ok_or(BehaviorError::ActorMissing(self.owner))
    }

    pub fn actor_mut(&mut self) -> Result<&mut Actor, BehaviorError> {
        self.world
            .find_mut(self.owner)
            .ok_or(BehaviorError::ActorMissing(self.owner))
    }

    pub fn world(&self) -> &ActorWorld {
        &*self.world
    }

    pub fn physics_preset(&self) -> Result<Option<PhysicsPreset>, BehaviorError> {
        Ok(self.actor()?.physics_preset())
    }

    pub fn physics_preset_of(&self, id: ActorId) -> Result<Option<PhysicsPreset>, BehaviorError> {
        self.world
            .find(id)
            .map(|actor| actor.physics_preset())
            .ok_or(BehaviorError::ActorMissing(id))
    }

    pub fn set_physics_preset(&mut self, preset: PhysicsPreset) -> Result<(), BehaviorError> {
        self.actor_mut()?.set_physics_preset(preset);
        Ok(())
    }

    pub fn set_physics_preset_by_name(&mut self, name: &str) -> Result<(), BehaviorError> {
        self.actor_mut()?.set_physics_preset_by_name(name)?;
        Ok(())
    }

    /// Queued; visible after the current tick.
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> ActorId {
        self.world.spawn(name, transform)
    }

    /// Queued; takes effect after the current tick.
    pub fn despawn(&mut self, id: ActorId) -> bool {
        self.world.despawn(id)
    }
}

pub trait Behavior {
    fn name(&self) -> &str;

    fn on_start(&mut self, _ctx: &mut BehaviorContext<'_>) -> Result<(), BehaviorError> {
        Ok(())
    }

    fn on_update(
        &mut self,
        dt_seconds: f32,
        ctx: &mut BehaviorContext<'_>,
    ) -> Result<(), BehaviorError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub started: usize,
    pub updated: usize,
    pub failed: usize,
    pub detached: usize,
}

struct Attached {
    owner: ActorId,
    behavior: Box<dyn Behavior>,
    started: bool,
}

#[derive(Default)]
pub struct BehaviorHost {
    world: ActorWorld,
    behaviors: Vec<Attached>,
    timings: ScopeTimings,
    tick_count: u64,
}

impl BehaviorHost {
    pub fn new(world: ActorWorld) -> Self {
        Self {
            world,
            ..Self::default()
        }
    }

    pub fn world(&self) -> &ActorWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut ActorWorld {
        &mut self.world
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }

    pub fn attach(&mut self, owner: ActorId, behavior: Box<dyn Behavior>) -> Result<(), HostError> {
        self.world.apply_pending();
        if self.world.find(owner).is_none() {
            return Err(HostError::OwnerMissing {
                owner,
                behavior: behavior.name().to_string(),
            });
        }
        debug!(owner = owner.0, behavior = behavior.name(), "behavior_attached");
        self.behaviors.push(Attached {
            owner,
            behavior,
            started: false,
        });
        Ok(())
    }

    /// Starts new behaviors, then updates all of them in attach order.
    /// A failing behavior is detached; the rest keep running.
    pub fn tick(&mut self, dt_seconds: f32) -> Result<TickReport, HostError> {
        if !dt_seconds.is_finite() || dt_seconds <= 0.0 {
            return Err(HostError::InvalidStep { dt_seconds });
        }

        self.world.apply_pending();
        let mut report = TickReport::default();
        let world = &mut self.world;
        let timings = &mut self.timings;

        self.behaviors.retain_mut(|attached| {
            let mut ctx = BehaviorContext {
                owner: attached.owner,
                world: &mut *world,
            };
            if ctx.actor().is_err() {
                info!(
                    owner = attached.owner.0,
                    behavior = attached.behavior.name(),
                    "behavior_owner_gone"
                );
                report.detached += 1;
                return false;
            }

            let label = attached.behavior.name().to_string();
            let result = timings.time(&label, || -> Result<(), BehaviorError> {
                if !attached.started {
                    attached.started = true;
                    report.started += 1;
                    attached.behavior.on_start(&mut ctx)?;
                }
                attached.behavior.on_update(dt_seconds, &mut ctx)
            });

            match result {
                Ok(()) => {
                    report.updated += 1;
                    true
                }
                Err(error) => {
                    warn!(
                        owner = attached.owner.0,
                        behavior = %label,
                        error = %error,
                        "behavior_failed"
                    );
                    report.failed += 1;
                    report.detached += 1;
                    false
                }
            }
        });

        self.world.apply_pending();
        self.tick_count += 1;
        Ok(report)
    }

    pub fn run_ticks(&mut self, ticks: u32, dt_seconds: f32) -> Result<TickReport, HostError> {
        let mut total = TickReport::default();
        for _ in 0..ticks {
            let report = self.tick(dt_seconds)?;
            total.started += report.started;
            total.updated += report.updated;
            total.failed += report.failed;
            total.detached += report.detached;
        }
        Ok(total)
    }

    pub fn timing(&self, behavior_name: &str) -> Option<TimingSnapshot> {
        self.timings.snapshot(behavior_name)
    }

    pub fn timings(&self) -> Vec<(String, TimingSnapshot)> {
        self.timings.snapshots()
    }
}
