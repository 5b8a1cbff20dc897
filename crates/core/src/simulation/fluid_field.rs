//! Fluid field orchestration
//!
//! Owns every buffer of the simulation and runs the solver stages in their fixed
//! order. There is no hidden global state: a driver builds a [`FluidField`], queues
//! impulses between frames and calls [`step`](FluidField::step).
//!
//! # Frame sequence
//!
//! ```text
//! reset_fields()                      driver: zero every `previous` buffer
//! queue_impulse / add_source          driver: stamp impulses into `previous`
//! step(dt):
//!   1. drain queued impulses          -> previous buffers
//!   2. velocity_step(dt)
//!        add_source(h), add_source(v)
//!        swap both -> diffuse both (viscosity) -> project
//!        swap both -> advect both through themselves -> project
//!   3. density_step(dt)
//!        add_source(density)
//!        swap -> diffuse (diffusion rate)
//!        swap -> advect through the finalized velocity
//! ```
//!
//! After `step`, the `current` buffers hold the renderable result. The `previous`
//! buffers still hold stage intermediates; zeroing them before the next frame's
//! impulses is the driver's job ([`reset_fields`](FluidField::reset_fields)).

use super::config::{ConfigError, FluidConfig};
use super::impulse::{stamp_disk, FieldKind, SourceImpulse};
use super::stats::{FluidSnapshot, FluidStats};
use crate::core_types::Vec2;
use crate::field::{DoubleBufferedField, FieldBuffer, ScalarField};
use crate::grid::Grid;
use crate::solver::{
    advect_scalar, advect_velocity, diffuse_scalar, diffuse_velocity, divergence_l2, project,
    FrameTimer, ProfilerScope,
};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A 2D incompressible fluid carrying a passive density.
pub struct FluidField {
    config: FluidConfig,
    grid: Grid,

    density: DoubleBufferedField,
    h_velocity: DoubleBufferedField,
    v_velocity: DoubleBufferedField,

    // Projection scratch, reused every step.
    pressure: ScalarField,
    divergence: ScalarField,

    pending: Vec<SourceImpulse>,
    frame: u64,
    timer: FrameTimer,
}

impl FluidField {
    /// Build a zeroed fluid field.
    ///
    /// # Panics
    /// Panics if `config` fails [`FluidConfig::validate`].
    pub fn new(config: FluidConfig) -> Self {
        match Self::try_new(config) {
            Ok(field) => field,
            Err(err) => panic!("Invalid fluid configuration: {err}"),
        }
    }

    /// Build a zeroed fluid field, rejecting an invalid configuration.
    ///
    /// # Errors
    /// Returns the [`ConfigError`] reported by [`FluidConfig::validate`].
    pub fn try_new(config: FluidConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.resolution);

        info!(
            resolution = config.resolution,
            viscosity = config.viscosity,
            diffusion_rate = config.diffusion_rate,
            cells = grid.cell_count(),
            "Fluid field created"
        );

        Ok(Self {
            config,
            grid,
            density: DoubleBufferedField::new(grid),
            h_velocity: DoubleBufferedField::new(grid),
            v_velocity: DoubleBufferedField::new(grid),
            pressure: ScalarField::new(grid),
            divergence: ScalarField::new(grid),
            pending: Vec::new(),
            frame: 0,
            timer: FrameTimer::new(),
        })
    }

    /// Advance the simulation by `dt`.
    ///
    /// # Panics
    /// Panics if `dt` is negative or not finite.
    pub fn step(&mut self, dt: f32) {
        check_timestep(dt);
        if dt == 0.0 {
            warn!(frame = self.frame, "Stepping with dt = 0");
        }

        let start = Instant::now();
        self.apply_pending();
        self.velocity_step(dt);
        self.density_step(dt);
        self.frame += 1;

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.timer.record(elapsed_ms);
        debug!(frame = self.frame, dt, elapsed_ms, "Fluid step complete");
    }

    /// Velocity half of a step: sources, viscous diffusion, projection,
    /// self-advection, projection again.
    ///
    /// # Panics
    /// Panics if `dt` is negative or not finite.
    pub fn velocity_step(&mut self, dt: f32) {
        check_timestep(dt);
        self.h_velocity.add_source(dt);
        self.v_velocity.add_source(dt);

        self.h_velocity.swap();
        self.v_velocity.swap();
        {
            let _scope = ProfilerScope::new("diffuse_velocity");
            diffuse_velocity(
                &mut self.h_velocity,
                &mut self.v_velocity,
                self.config.viscosity,
                dt,
            );
        }
        self.project_current("project_diffused");

        self.h_velocity.swap();
        self.v_velocity.swap();
        {
            let _scope = ProfilerScope::new("advect_velocity");
            advect_velocity(&mut self.h_velocity, &mut self.v_velocity, dt);
        }
        self.project_current("project_advected");
    }

    /// Density half of a step: sources, diffusion, advection through the current
    /// velocity field.
    ///
    /// # Panics
    /// Panics if `dt` is negative or not finite.
    pub fn density_step(&mut self, dt: f32) {
        check_timestep(dt);
        self.density.add_source(dt);

        self.density.swap();
        {
            let _scope = ProfilerScope::new("diffuse_density");
            diffuse_scalar(&mut self.density, self.config.diffusion_rate, dt);
        }

        self.density.swap();
        let _scope = ProfilerScope::new("advect_density");
        advect_scalar(
            &mut self.density,
            self.h_velocity.current(),
            self.v_velocity.current(),
            dt,
        );
    }

    fn project_current(&mut self, stage: &'static str) {
        let _scope = ProfilerScope::new(stage);
        project(
            self.h_velocity.current_mut(),
            self.v_velocity.current_mut(),
            &mut self.pressure,
            &mut self.divergence,
        );
    }

    /// Zero every `previous` buffer. Call once per frame before new impulses.
    pub fn reset_fields(&mut self) {
        self.density.clear_previous();
        self.h_velocity.clear_previous();
        self.v_velocity.clear_previous();
    }

    /// Queue an impulse to be stamped at the start of the next [`step`](Self::step).
    pub fn queue_impulse(&mut self, impulse: SourceImpulse) {
        self.pending.push(impulse);
    }

    /// Impulses waiting for the next step.
    pub fn pending_impulses(&self) -> &[SourceImpulse] {
        &self.pending
    }

    fn apply_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending);
        for impulse in &pending {
            self.add_source(impulse.x, impulse.y, impulse.kind, impulse.value);
        }
        debug!(count = pending.len(), "Applied queued impulses");

        // Hand the allocation back for the next frame.
        self.pending = pending;
        self.pending.clear();
    }

    /// Add `value` into `kind`'s `previous` buffer over a disk of
    /// `config.source_radius` cells around `(x, y)`, clipped to the lattice.
    ///
    /// The impulse is folded in (scaled by `dt`) by the next step's source stage.
    pub fn add_source(&mut self, x: usize, y: usize, kind: FieldKind, value: f32) {
        let radius = self.config.source_radius;
        let target = match kind {
            FieldKind::Density => &mut self.density,
            FieldKind::HorizontalVelocity => &mut self.h_velocity,
            FieldKind::VerticalVelocity => &mut self.v_velocity,
        };
        stamp_disk(target.previous_mut(), x, y, radius, value);
    }

    /// Add a directional impulse to both velocity components.
    pub fn add_velocity_impulse(&mut self, x: usize, y: usize, velocity: Vec2) {
        self.add_source(x, y, FieldKind::HorizontalVelocity, velocity.x);
        self.add_source(x, y, FieldKind::VerticalVelocity, velocity.y);
    }

    /// Current density buffer.
    pub fn density(&self) -> &ScalarField {
        self.density.current()
    }

    /// Current horizontal velocity buffer.
    pub fn h_velocity(&self) -> &ScalarField {
        self.h_velocity.current()
    }

    /// Current vertical velocity buffer.
    pub fn v_velocity(&self) -> &ScalarField {
        self.v_velocity.current()
    }

    /// Double-buffered density, for drivers that manage sources themselves.
    pub fn density_buffers_mut(&mut self) -> &mut DoubleBufferedField {
        &mut self.density
    }

    /// Velocity at cell `(i, j)` of the current buffers.
    ///
    /// # Panics
    /// Panics if `(i, j)` lies outside the allocated lattice.
    pub fn velocity_at(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new(
            self.h_velocity.current().get(i, j),
            self.v_velocity.current().get(i, j),
        )
    }

    /// Pressure solved by the most recent projection.
    pub fn pressure(&self) -> &ScalarField {
        &self.pressure
    }

    /// Divergence measured before the most recent projection.
    pub fn divergence(&self) -> &ScalarField {
        &self.divergence
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> &FluidConfig {
        &self.config
    }

    /// Change viscosity for subsequent steps.
    ///
    /// # Panics
    /// Panics if `viscosity` is negative or not finite.
    pub fn set_viscosity(&mut self, viscosity: f32) {
        assert!(
            viscosity.is_finite() && viscosity >= 0.0,
            "Viscosity must be finite and non-negative, got {viscosity}"
        );
        self.config.viscosity = viscosity;
    }

    /// Change the density diffusion rate for subsequent steps.
    ///
    /// # Panics
    /// Panics if `rate` is negative or not finite.
    pub fn set_diffusion_rate(&mut self, rate: f32) {
        assert!(
            rate.is_finite() && rate >= 0.0,
            "Diffusion rate must be finite and non-negative, got {rate}"
        );
        self.config.diffusion_rate = rate;
    }

    /// Completed steps since construction.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Wall-clock timing of recent steps.
    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Interior diagnostics of the current buffers.
    pub fn stats(&self) -> FluidStats {
        let h = self.h_velocity.current();
        let v = self.v_velocity.current();
        let max_speed = self
            .grid
            .interior()
            .map(|(i, j)| Vec2::new(h.get(i, j), v.get(i, j)).norm())
            .fold(0.0_f32, f32::max);

        FluidStats {
            frame: self.frame,
            total_density: self.density().interior_sum(),
            max_density: self.density().interior_max(),
            max_speed,
            divergence_l2: divergence_l2(h, v),
        }
    }

    /// Interior copy of the renderable fields.
    pub fn snapshot(&self) -> FluidSnapshot {
        FluidSnapshot {
            frame: self.frame,
            resolution: self.grid.resolution(),
            density: self.density().interior_values(),
            h_velocity: self.h_velocity().interior_values(),
            v_velocity: self.v_velocity().interior_values(),
        }
    }
}

fn check_timestep(dt: f32) {
    assert!(
        dt.is_finite() && dt >= 0.0,
        "Timestep must be finite and non-negative, got {dt}"
    );
}
