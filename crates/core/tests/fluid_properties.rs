//! Whole-step properties of the fluid solver
//!
//! These tests drive [`FluidField`] through its public API the way an external
//! render loop would: reset the `previous` buffers, stamp impulses, step.

use approx::assert_relative_eq;
use ctor::ctor;
use stable_fluids_core::field::FieldBuffer;
use stable_fluids_core::solver::{divergence_l2, project};
use stable_fluids_core::{
    DoubleBufferedField, FieldKind, FluidConfig, FluidField, Grid, ScalarField, SourceImpulse,
    Vec2,
};

#[ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const DT: f32 = 0.1;

fn fluid(resolution: usize, source_radius: usize) -> FluidField {
    FluidField::new(FluidConfig {
        resolution,
        source_radius,
        ..FluidConfig::default()
    })
}

fn assert_density_contained(field: &ScalarField) {
    let n = field.grid().resolution();
    for k in 1..=n {
        assert_eq!(field.get(0, k), field.get(1, k), "left border, row {k}");
        assert_eq!(field.get(n + 1, k), field.get(n, k), "right border, row {k}");
        assert_eq!(field.get(k, 0), field.get(k, 1), "bottom border, column {k}");
        assert_eq!(field.get(k, n + 1), field.get(k, n), "top border, column {k}");
    }
    assert_relative_eq!(
        field.get(0, 0),
        0.5 * (field.get(1, 0) + field.get(0, 1)),
        epsilon = 1e-6
    );
    assert_relative_eq!(
        field.get(n + 1, n + 1),
        0.5 * (field.get(n, n + 1) + field.get(n + 1, n)),
        epsilon = 1e-6
    );
}

fn density_center_x(fluid: &FluidField) -> f64 {
    let density = fluid.density();
    let total = density.interior_sum();
    let weighted: f64 = fluid
        .grid()
        .interior()
        .map(|(i, j)| i as f64 * f64::from(density.get(i, j)))
        .sum();
    weighted / total
}

#[test]
fn test_end_to_end_single_impulse() {
    let mut fluid = fluid(8, 0);
    fluid.reset_fields();
    fluid.add_source(4, 4, FieldKind::Density, 5.0 / DT);

    fluid.step(DT);

    let density = fluid.density();
    assert!(density.get(4, 4) > 0.0);
    assert_relative_eq!(density.interior_sum(), 5.0, epsilon = 1e-4);
    assert_density_contained(density);
}

#[test]
fn test_mass_not_created_by_moving_flow() {
    let mut fluid = fluid(16, 2);
    fluid.reset_fields();
    fluid.add_source(8, 8, FieldKind::Density, 10.0);
    fluid.add_source(3, 12, FieldKind::Density, 4.0);
    fluid.add_velocity_impulse(8, 8, Vec2::new(3.0, 2.0));
    fluid.step(DT);

    let mut previous_mass = fluid.density().interior_sum();
    assert!(previous_mass > 0.0);
    assert!(fluid.stats().max_speed > 0.0);

    for _ in 0..20 {
        fluid.reset_fields();
        fluid.step(DT);
        let mass = fluid.density().interior_sum();
        assert!(
            mass <= previous_mass + 1e-4,
            "Mass grew from {previous_mass} to {mass}"
        );
        previous_mass = mass;
    }
}

#[test]
fn test_zero_diffusion_zero_velocity_is_identity() {
    let mut fluid = fluid(12, 1);
    fluid.reset_fields();
    fluid.add_source(6, 6, FieldKind::Density, 10.0);
    fluid.step(DT);
    let before = fluid.density().clone();

    for _ in 0..5 {
        fluid.reset_fields();
        fluid.step(DT);
    }

    assert_eq!(fluid.density(), &before);
}

#[test]
fn test_borders_hold_after_moving_step() {
    let mut fluid = fluid(16, 2);
    for frame in 0..4 {
        fluid.reset_fields();
        fluid.add_source(4 + frame, 8, FieldKind::Density, 10.0);
        fluid.add_velocity_impulse(4 + frame, 8, Vec2::new(3.0, 1.5));
        fluid.step(DT);
    }

    assert_density_contained(fluid.density());

    let h = fluid.h_velocity();
    let v = fluid.v_velocity();
    let n = fluid.grid().resolution();
    for k in 1..=n {
        // Normal components negate across their walls.
        assert_eq!(h.get(0, k), -h.get(1, k));
        assert_eq!(h.get(n + 1, k), -h.get(n, k));
        assert_eq!(v.get(k, 0), -v.get(k, 1));
        assert_eq!(v.get(k, n + 1), -v.get(k, n));
        // Tangential components are copied.
        assert_eq!(h.get(k, 0), h.get(k, 1));
        assert_eq!(v.get(0, k), v.get(1, k));
    }
}

#[test]
fn test_extrema_bounded_without_diffusion() {
    let mut fluid = fluid(16, 2);
    fluid.reset_fields();
    fluid.add_source(8, 8, FieldKind::Density, 10.0);
    fluid.add_velocity_impulse(8, 8, Vec2::new(-2.0, 3.0));
    fluid.step(DT);
    let ceiling = fluid.density().interior_max();

    for _ in 0..8 {
        fluid.reset_fields();
        fluid.add_source(8, 6, FieldKind::VerticalVelocity, 3.0);
        fluid.add_source(6, 8, FieldKind::HorizontalVelocity, 2.0);
        fluid.step(DT);

        let density = fluid.density();
        assert!(density.interior_max() <= ceiling + 1e-5);
        assert!(density.interior_min() >= -1e-6);
    }
}

#[test]
fn test_horizontal_push_moves_density_right() {
    let mut fluid = fluid(16, 2);
    fluid.reset_fields();
    fluid.add_source(5, 8, FieldKind::Density, 10.0);
    fluid.step(DT);

    let mut center = density_center_x(&fluid);
    assert_relative_eq!(center, 5.0, epsilon = 1e-4);

    for _ in 0..3 {
        fluid.reset_fields();
        fluid.queue_impulse(SourceImpulse::new(
            5,
            8,
            FieldKind::HorizontalVelocity,
            5.0,
        ));
        fluid.step(DT);

        let moved = density_center_x(&fluid);
        assert!(moved > center, "Density center went from {center} to {moved}");
        center = moved;
    }
    assert!(center > 6.0);
}

#[test]
fn test_projection_reduces_divergence() {
    let grid = Grid::new(16);
    let mut h = ScalarField::new(grid);
    let mut v = ScalarField::new(grid);
    let mut pressure = ScalarField::new(grid);
    let mut divergence = ScalarField::new(grid);
    h.set(8, 8, 1.0);

    let before = divergence_l2(&h, &v);
    project(&mut h, &mut v, &mut pressure, &mut divergence);
    let after = divergence_l2(&h, &v);

    assert!(before > 0.0);
    assert!(after < before, "Divergence {before} -> {after}");
}

#[test]
fn test_swap_exchanges_buffers() {
    let grid = Grid::new(4);
    let mut field = DoubleBufferedField::new(grid);
    field.current_mut().fill(1.0);
    field.previous_mut().fill(2.0);

    field.swap();

    assert_eq!(field.current(), &ScalarField::with_value(grid, 2.0));
    assert_eq!(field.previous(), &ScalarField::with_value(grid, 1.0));
}

#[test]
fn test_stats_track_a_running_simulation() {
    let mut fluid = fluid(16, 2);
    for _ in 0..3 {
        fluid.reset_fields();
        fluid.add_source(8, 4, FieldKind::Density, 10.0);
        fluid.add_velocity_impulse(8, 4, Vec2::new(0.0, 2.0));
        fluid.step(DT);
    }

    let stats = fluid.stats();
    assert_eq!(stats.frame, 3);
    assert!(stats.total_density > 0.0);
    assert!(stats.max_speed > 0.0);
    assert!(stats.divergence_l2.is_finite());

    let snapshot = fluid.snapshot();
    assert_eq!(snapshot.density.len(), 16 * 16);
    assert_eq!(snapshot.density_at(8, 4), fluid.density().get(8, 4));
}
