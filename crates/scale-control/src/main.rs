use clap::{Args, Parser, Subcommand};
use scale_control::protocol::{HostCommand, SOCKET_PATH};
use scale_control::{
    DisplayMode, HitTolerance, LayoutModeSelector, Point, ScaleControl, Size, TrackPath,
    UnitSize, ViewMetrics,
};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;

#[derive(Parser, Debug)]
#[command(name = "scalectl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send one command to a running scale-host (e.g. `send tap 176 16`)
    Send {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Print the display mode chosen for the given metrics
    Mode {
        #[arg(long)]
        width: f64,
        #[arg(long, default_value_t = UnitSize::BASELINE)]
        unit: f64,
        #[arg(long)]
        count: u64,
        /// Compact portrait environment (allows the circular mode)
        #[arg(long)]
        compact: bool,
    },
    /// Print label centers and the track for a range
    Layout(ScaleArgs),
    /// Print the value a point selects, or "miss"
    Hit {
        #[command(flatten)]
        scale: ScaleArgs,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        /// Map as a drag sample (no off-track rejection)
        #[arg(long)]
        drag: bool,
    },
}

#[derive(Args, Debug)]
struct ScaleArgs {
    #[arg(long, allow_negative_numbers = true)]
    min: i64,
    #[arg(long, allow_negative_numbers = true)]
    max: i64,
    /// Available width of the hosting view
    #[arg(long)]
    width: f64,
    #[arg(long, default_value_t = UnitSize::BASELINE)]
    unit: f64,
    /// Force a display mode instead of letting the selector pick
    #[arg(long)]
    mode: Option<DisplayMode>,
    #[arg(long)]
    compact: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Send { words } => send_command(&words.join(" ")),
        Commands::Mode {
            width,
            unit,
            count,
            compact,
        } => {
            let unit = UnitSize::new(unit);
            let mode = LayoutModeSelector::default().select(width, unit.get(), count, compact);
            println!("{mode}");
            Ok(())
        }
        Commands::Layout(args) => print_layout(&build_control(&args)?),
        Commands::Hit { scale, x, y, drag } => {
            let control = build_control(&scale)?;
            let point = Point::new(x, y);
            let geometry = control.geometry();
            let offset = if drag {
                geometry.project(point)
            } else {
                geometry.hit_test(point, &HitTolerance::default())
            };
            match offset.and_then(|o| control.range().value_at(o)) {
                Some(value) => println!("{value}"),
                None => println!("miss"),
            }
            Ok(())
        }
    }
}

fn build_control(args: &ScaleArgs) -> anyhow::Result<ScaleControl> {
    let mut control = ScaleControl::with_bounds(args.min, args.max)?;
    control.set_mode_override(args.mode);
    control.set_metrics(ViewMetrics {
        available: Size::new(args.width, args.width),
        unit: UnitSize::new(args.unit),
        compact: args.compact,
    });
    control.update();
    Ok(control)
}

fn print_layout(control: &ScaleControl) -> anyhow::Result<()> {
    let layout = control.layout();
    println!(
        "{} {}x{} unit {}",
        layout.mode, layout.content_size.width, layout.content_size.height, layout.unit_size
    );
    match layout.track {
        TrackPath::Line { start, end } => {
            println!("track line ({:.2}, {:.2}) -> ({:.2}, {:.2})", start.x, start.y, end.x, end.y)
        }
        TrackPath::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            ..
        } => println!(
            "track arc center ({:.2}, {:.2}) radius {:.2} from {:.4} to {:.4} rad",
            center.x, center.y, radius, start_angle, end_angle
        ),
    }
    for label in &layout.labels {
        let center = label.frame.center();
        println!("{:>6} {:>9.2} {:>9.2}", label.text, center.x, center.y);
    }
    Ok(())
}

fn send_command(line: &str) -> anyhow::Result<()> {
    let command: HostCommand = line.parse()?;

    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to scale-host at {}: {}. Is scale-host running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", command)?;

    let mut reply = String::new();
    BufReader::new(&stream).read_line(&mut reply)?;
    match reply.trim() {
        "ok" | "" => Ok(()),
        other => anyhow::bail!("scale-host refused '{}': {}", command, other),
    }
}
