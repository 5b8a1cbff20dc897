use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stable_fluids_core::field::FieldBuffer;
use stable_fluids_core::solver::{divergence_l2, project};
use stable_fluids_core::{
    FieldKind, FluidConfig, FluidField, Grid, ScalarField, SourceImpulse, Vec2,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Headless stable-fluids demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "fluid-demo")]
#[command(about = "2D stable-fluids smoke simulation demo", long_about = None)]
struct Args {
    /// Interior cells per axis
    #[arg(short = 'n', long, default_value_t = 100)]
    resolution: usize,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 200)]
    frames: u64,

    /// Timestep per frame
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Velocity viscosity
    #[arg(long, default_value_t = 0.0)]
    viscosity: f32,

    /// Density diffusion rate
    #[arg(long, default_value_t = 0.0)]
    diffusion: f32,

    /// Impulse disk radius in cells
    #[arg(long, default_value_t = 3)]
    radius: usize,

    /// Print statistics every N frames
    #[arg(short, long, default_value_t = 20)]
    report_interval: u64,

    /// Seed for the wandering emitter
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Density injected per frame
    #[arg(long, default_value_t = 5.0)]
    density: f32,

    /// Upward velocity injected per frame
    #[arg(long, default_value_t = 0.1)]
    force: f32,

    /// Run validation checks after the simulation
    #[arg(short, long)]
    validate: bool,
}

/// Emitter that drifts like a pointer held near the bottom of the domain.
struct Emitter {
    x: usize,
    y: usize,
    rng: StdRng,
}

impl Emitter {
    fn new(grid: Grid, seed: u64) -> Self {
        let n = grid.resolution();
        Self {
            x: n.div_ceil(2),
            y: (n / 8).max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Move at most one cell sideways, staying inside the interior.
    /// Returns the sideways step taken.
    fn wander(&mut self, grid: Grid) -> isize {
        let step = self.rng.random_range(-1..=1_i64) as isize;
        let n = grid.resolution();
        self.x = self.x.saturating_add_signed(step).clamp(1, n);
        step
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    println!("=== Stable Fluids Demo ===\n");

    let config = FluidConfig {
        resolution: args.resolution,
        viscosity: args.viscosity,
        diffusion_rate: args.diffusion,
        source_radius: args.radius,
        density_amount: args.density,
        force: args.force,
    };
    let mut fluid = match FluidField::try_new(config) {
        Ok(fluid) => fluid,
        Err(err) => {
            error!("{err}");
            std::process::exit(2);
        }
    };
    if !(args.dt.is_finite() && args.dt >= 0.0) {
        error!(dt = args.dt, "Timestep must be finite and non-negative");
        std::process::exit(2);
    }

    let grid = fluid.grid();
    println!(
        "Grid: {}x{} interior cells ({}x{} allocated)",
        grid.resolution(),
        grid.resolution(),
        grid.extent(),
        grid.extent()
    );
    println!(
        "Viscosity: {}, Diffusion: {}, dt: {}, Radius: {}\n",
        config.viscosity, config.diffusion_rate, args.dt, config.source_radius
    );

    let mut emitter = Emitter::new(grid, args.seed);

    println!("Running simulation...\n");
    println!(" Frame |       Mass | Max Density |  Max Speed | Divergence L2");
    println!("-------|------------|-------------|------------|--------------");

    for frame in 1..=args.frames {
        fluid.reset_fields();

        let sideways = emitter.wander(grid) as f32;
        fluid.queue_impulse(SourceImpulse::density(
            emitter.x,
            emitter.y,
            config.density_amount,
        ));
        fluid.add_velocity_impulse(
            emitter.x,
            emitter.y,
            Vec2::new(0.5 * sideways, 1.0) * config.force,
        );

        fluid.step(args.dt);

        if args.report_interval > 0 && frame % args.report_interval == 0 {
            let stats = fluid.stats();
            println!(
                "{:6} | {:10.4} | {:11.4} | {:10.4} | {:13.3e}",
                stats.frame,
                stats.total_density,
                stats.max_density,
                stats.max_speed,
                stats.divergence_l2
            );
        }
    }

    let stats = fluid.stats();
    println!("\n=== Simulation Complete ===");
    println!("{stats}");
    println!(
        "Mean step time: {:.3} ms",
        fluid.timer().mean_frame_time_ms()
    );
    println!("\nDensity preview:\n{}", ascii_preview(fluid.density(), 48, 24));

    if args.validate {
        run_validation_tests();
    }
}

/// Coarse ASCII rendering of the interior, top row first.
fn ascii_preview(field: &ScalarField, columns: usize, rows: usize) -> String {
    const RAMP: &[u8] = b" .:-=+*#%@";

    let n = field.grid().resolution();
    let columns = columns.min(n);
    let rows = rows.min(n);
    let peak = field.interior_max().max(f32::EPSILON);

    let mut out = String::with_capacity((columns + 1) * rows);
    for row in (0..rows).rev() {
        let j = 1 + row * n / rows;
        for column in 0..columns {
            let i = 1 + column * n / columns;
            let level = (field.get(i, j) / peak).clamp(0.0, 1.0);
            let index = (level * (RAMP.len() - 1) as f32).round() as usize;
            out.push(char::from(RAMP[index]));
        }
        out.push('\n');
    }
    out
}

fn run_validation_tests() {
    println!("\n=== Running Validation Tests ===\n");

    // Test 1: Mass is not created by transport alone
    println!("Test 1: Mass Non-Creation");
    let mut fluid = FluidField::new(FluidConfig {
        resolution: 32,
        source_radius: 2,
        ..FluidConfig::default()
    });
    fluid.reset_fields();
    fluid.add_source(16, 16, FieldKind::Density, 10.0);
    fluid.step(0.1);
    let initial = fluid.density().interior_sum();
    for _ in 0..20 {
        fluid.reset_fields();
        fluid.step(0.1);
    }
    let final_mass = fluid.density().interior_sum();
    println!("  Initial mass: {initial:.4}");
    println!("  Final mass:   {final_mass:.4}");
    if final_mass <= initial + 1e-4 {
        println!("  ✓ PASS: No mass created");
    } else {
        println!("  ✗ FAIL: Mass grew without sources");
    }

    // Test 2: Projection removes divergence
    println!("\nTest 2: Divergence Reduction");
    let grid = Grid::new(16);
    let mut h = ScalarField::new(grid);
    let mut v = ScalarField::new(grid);
    let mut pressure = ScalarField::new(grid);
    let mut divergence = ScalarField::new(grid);
    h.set(8, 8, 1.0);
    let before = divergence_l2(&h, &v);
    project(&mut h, &mut v, &mut pressure, &mut divergence);
    let after = divergence_l2(&h, &v);
    println!("  Before: {before:.5}");
    println!("  After:  {after:.5}");
    if after < before {
        println!("  ✓ PASS: Projection reduced divergence");
    } else {
        println!("  ✗ FAIL: Divergence did not drop");
    }

    // Test 3: Upward push lifts density
    println!("\nTest 3: Buoyant Transport");
    let mut fluid = FluidField::new(FluidConfig {
        resolution: 32,
        source_radius: 2,
        ..FluidConfig::default()
    });
    fluid.reset_fields();
    fluid.add_source(16, 8, FieldKind::Density, 10.0);
    fluid.step(0.1);
    let start = density_center_y(&fluid);
    for _ in 0..5 {
        fluid.reset_fields();
        fluid.add_source(16, 8, FieldKind::VerticalVelocity, 5.0);
        fluid.step(0.1);
    }
    let end = density_center_y(&fluid);
    println!("  Density center row: {start:.2} -> {end:.2}");
    if end > start {
        println!("  ✓ PASS: Density rose with the flow");
    } else {
        println!("  ✗ FAIL: Density did not move upward");
    }

    info!("Validation complete");
    println!("\n=== Validation Complete ===");
}

fn density_center_y(fluid: &FluidField) -> f64 {
    let density = fluid.density();
    let total = density.interior_sum();
    if total <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = fluid
        .grid()
        .interior()
        .map(|(i, j)| j as f64 * f64::from(density.get(i, j)))
        .sum();
    weighted / total
}
