use clap::{Args, Parser, Subcommand};
use wingrid::common::config::{ArrangeSettings, DEFAULT_MIN_SPACING_Y, Settings};
use wingrid::common::log;
use wingrid::layout_engine::{GridRequest, plan_grid};
use wingrid::sys::geometry::{Point, Rect, Size};
use wingrid::ui::console;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Start the interactive session (the default).
    Run(RunArgs),
    /// Print the grid an arrange would use, without touching any window.
    Plan(PlanArgs),
}

#[derive(Args, Default)]
struct RunArgs {
    /// Monitor the hotkey arranges on.
    #[arg(long, default_value_t = 0)]
    monitor: usize,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset_x: i32,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset_y: i32,
    /// Minimum vertical gap between rows.
    #[arg(long, default_value_t = DEFAULT_MIN_SPACING_Y, allow_negative_numbers = true)]
    spacing: i32,
    /// Also show notifications as message boxes that close after two seconds.
    #[arg(long)]
    dialogs: bool,
    /// Print the window list and notifications as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PlanArgs {
    #[arg(long)]
    windows: usize,
    /// Work-area width.
    #[arg(long)]
    width: i32,
    /// Work-area height.
    #[arg(long)]
    height: i32,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    left: i32,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    top: i32,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset_x: i32,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset_y: i32,
    #[arg(long, default_value_t = DEFAULT_MIN_SPACING_Y, allow_negative_numbers = true)]
    spacing: i32,
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn settings(&self) -> Settings {
        Settings {
            arrange: ArrangeSettings {
                monitor: self.monitor,
                offset_x: self.offset_x,
                offset_y: self.offset_y,
                min_spacing_y: self.spacing,
            },
            dialogs: self.dialogs,
            json: self.json,
            ..Settings::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    log::init_logging();
    let cli = Cli::parse();
    match cli.command {
        Some(Cmd::Plan(args)) => plan(&args),
        Some(Cmd::Run(args)) => run(args.settings()),
        None => run(RunArgs { spacing: DEFAULT_MIN_SPACING_Y, ..RunArgs::default() }.settings()),
    }
}

fn plan(args: &PlanArgs) -> anyhow::Result<()> {
    let request = GridRequest {
        window_count: args.windows,
        work_area: Rect::from_origin_size(
            Point::new(args.left, args.top),
            Size::new(args.width, args.height),
        ),
        offset_x: args.offset_x,
        offset_y: args.offset_y,
        min_spacing_y: args.spacing.max(0),
    };
    let plan = plan_grid(&request)?;
    if args.json {
        println!("{}", console::render_json(&plan));
    } else {
        print!("{}", console::render_plan(&plan));
    }
    Ok(())
}

#[cfg(windows)]
fn run(settings: Settings) -> anyhow::Result<()> { wingrid::sys::win32::run(settings) }

#[cfg(not(windows))]
fn run(_settings: Settings) -> anyhow::Result<()> {
    anyhow::bail!("the interactive session needs a Windows desktop; `plan` works everywhere")
}
