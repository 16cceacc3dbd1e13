use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use canvasloop_common::CameraId;
use canvasloop_engine::{
    DeviceSize, EntityKind, EntityOptions, EntityState, RecordingSurface, Runtime, RuntimeConfig,
    SpriteHandle, Surface,
};
use canvasloop_render::{Camera, Canvas};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "canvasloop-cli", about = "CLI tool for canvasloop operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Show the border and pixel scale a camera would use
    Border {
        /// Canvas width in pixels
        #[arg(long, default_value = "800")]
        width: u32,
        /// Canvas height in pixels
        #[arg(long, default_value = "400")]
        height: u32,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        /// Depth: world half-extent along the canvas's shorter axis
        #[arg(long)]
        z: f64,
    },
    /// Run the demo scene headless for a while
    Run {
        /// YAML or JSON runtime config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Wall-clock run time in milliseconds
        #[arg(short, long, default_value = "1000")]
        duration_ms: u64,
        /// Activate a camera at X,Y,Z
        #[arg(long, value_parser = parse_triple, allow_hyphen_values = true)]
        camera: Option<(f64, f64, f64)>,
    },
}

fn parse_triple(s: &str) -> Result<(f64, f64, f64), String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let &[x, y, z] = parts.as_slice() else {
        return Err(format!("expected X,Y,Z, got `{s}`"));
    };
    let num = |v: &str| v.parse::<f64>().map_err(|e| format!("`{v}`: {e}"));
    Ok((num(x)?, num(y)?, num(z)?))
}

/// Payload of the demo bouncers.
#[derive(Debug, Clone)]
struct Velocity {
    dx: f64,
    dy: f64,
}

fn bouncer_kind(bounds: DeviceSize) -> anyhow::Result<EntityKind<Velocity>> {
    let (max_x, max_y) = (f64::from(bounds.width), f64::from(bounds.height));
    let kind = EntityKind::builder("bouncer")
        .update(move |s: &mut EntityState<Velocity>| {
            s.x += s.data.dx;
            s.y += s.data.dy;
            if s.x < 0.0 || s.x + s.width > max_x {
                s.data.dx = -s.data.dx;
            }
            if s.y < 0.0 || s.y + s.height > max_y {
                s.data.dy = -s.data.dy;
            }
        })
        .render(|s: &EntityState<Velocity>, surface: &mut dyn Surface| {
            surface.draw_image(s.sprite, s.bounds().origin, Some(s.bounds().size));
        })
        .create(|| {
            EntityState::new(
                0.0,
                0.0,
                16.0,
                16.0,
                SpriteHandle(1),
                Velocity { dx: 4.0, dy: 3.0 },
            )
        })
        .build()?;
    Ok(kind)
}

fn marker_kind(x: f64, y: f64, sprite: u64) -> anyhow::Result<EntityKind<()>> {
    let kind = EntityKind::builder("marker")
        .update(|_| {})
        .render(|_, _| {})
        .create(move || EntityState::new(x, y, 32.0, 32.0, SpriteHandle(sprite), ()))
        .build()?;
    Ok(kind)
}

fn run_demo(config: RuntimeConfig, duration: Duration, camera: Option<(f64, f64, f64)>) -> anyhow::Result<()> {
    let surface = RecordingSurface::new(config.canvas);
    let mut rt = Runtime::new(&config, surface)?;

    let bouncer = bouncer_kind(config.canvas)?;
    rt.register(&bouncer, EntityOptions::default());
    rt.register(&bouncer, EntityOptions::auto_render());
    for (i, (x, y)) in [(40.0, 40.0), (400.0, 200.0), (2000.0, 2000.0)].into_iter().enumerate() {
        rt.register(&marker_kind(x, y, 10 + i as u64)?, EntityOptions::auto_render());
    }

    if let Some((x, y, z)) = camera {
        let id = rt.create_camera(x, y, z)?;
        rt.set_camera(id)?;
    }

    println!(
        "Running demo: canvas={}x{} period={}ms duration={}ms entities={}",
        config.canvas.width,
        config.canvas.height,
        config.frame_period_ms,
        duration.as_millis(),
        rt.registry().len()
    );

    rt.start()?;
    let started = Instant::now();
    let mut last = started;
    let nap = config.frame_period() / 4;
    while started.elapsed() < duration {
        std::thread::sleep(nap);
        let now = Instant::now();
        rt.advance(now - last);
        last = now;
    }
    rt.stop()?;

    if let Some(stats) = rt.last_frame() {
        println!(
            "Last frame: mode={:?} drawn={} culled={}",
            stats.mode, stats.drawn, stats.culled
        );
    }
    let (summary, surface) = rt.shutdown();
    println!("{summary}");
    print!("{}", surface.dump_last_frame());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("canvasloop-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", canvasloop_common::crate_info());
            println!("kernel: {}", canvasloop_kernel::crate_info());
            println!("render: {}", canvasloop_render::crate_info());
            println!("engine: {}", canvasloop_engine::crate_info());
        }
        Commands::Border {
            width,
            height,
            x,
            y,
            z,
        } => {
            let canvas = Canvas::new(DeviceSize::new(width, height))?;
            let mut camera = Camera::new(CameraId(0), canvas, x, y, z)?;
            let border = camera.border();
            let scale = camera.pixel_scale();
            println!(
                "Canvas: {width}x{height} ratio={:.4} minor={}",
                canvas.ratio(),
                canvas.minor_axis()
            );
            println!("Camera: x={x} y={y} z={z}");
            println!("Border: {border}");
            println!("Pixel scale: ({}, {})", scale.x, scale.y);
        }
        Commands::Run {
            config,
            duration_ms,
            camera,
        } => {
            let config = match config {
                Some(path) => RuntimeConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => RuntimeConfig::default(),
            };
            tracing::info!(?config, "canvasloop-cli run");
            run_demo(config, Duration::from_millis(duration_ms), camera)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_triple_accepts_three_numbers() {
        assert_eq!(parse_triple("100, 50,25.5"), Ok((100.0, 50.0, 25.5)));
        assert_eq!(parse_triple("-1,-2,3"), Ok((-1.0, -2.0, 3.0)));
    }

    #[test]
    fn parse_triple_rejects_bad_input() {
        assert!(parse_triple("1,2").is_err());
        assert!(parse_triple("1,2,3,4").is_err());
        assert!(parse_triple("1,two,3").is_err());
    }

    #[test]
    fn bouncer_reverses_at_the_edge() {
        let kind = bouncer_kind(DeviceSize::new(20, 20)).unwrap();
        let config = RuntimeConfig {
            canvas: DeviceSize::new(20, 20),
            ..RuntimeConfig::default()
        };
        let mut rt = Runtime::new(&config, RecordingSurface::new(config.canvas)).unwrap();
        let id = rt.register(&kind, EntityOptions::default());
        // 16 wide on a 20 canvas: the second step crosses the edge.
        rt.update_pass();
        rt.update_pass();
        let state = rt.registry().get(id).unwrap().state::<Velocity>().unwrap();
        assert!(state.data.dx < 0.0);
    }
}
