// What you SEE:
// • A window; moving the mouse inside it draws a fading, tapering trail.
// • Left click drops an expanding ring (if ripples are on in config.json).
// • S saves a PNG of the current frame. ESC quits.
// • Editing config.json while running applies the change within a second.

use clap::Parser;
use cursor_trail::draw::Drawer;
use cursor_trail::config::ConfigWatcher;
use cursor_trail::{BlendState, Canvas, Config, Error, FrameBuffer, FrameController, snapshot};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Cursor trail: a fading mouse trail with click ripples
#[derive(Parser, Debug)]
#[command(name = "cursor-trail")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Window width in pixels
    #[arg(long, default_value_t = 1280)]
    width: usize,

    /// Window height in pixels
    #[arg(long, default_value_t = 720)]
    height: usize,

    /// Directory for PNG snapshots (S key)
    #[arg(long, default_value = ".")]
    snapshot_dir: PathBuf,

    /// Write the effective config to --config and exit
    #[arg(long)]
    write_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // Hot reload: poll the file about once a second.
    let (mut cfg, watcher) = ConfigWatcher::open(&cli.config, Duration::from_secs(1));

    if cli.write_config {
        cfg.save(&cli.config)?;
        info!(path = %cli.config.display(), "config written");
        return Ok(());
    }

    run(&cli, &mut cfg, watcher)
}

fn run(cli: &Cli, cfg: &mut Config, mut watcher: ConfigWatcher) -> Result<(), Error> {
    /* --- Window + buffers (reused every frame) --- */
    let mut drawer = Drawer::new("Cursor Trail", cli.width, cli.height)?;
    let mut screen = FrameBuffer::new(cli.width, cli.height);
    let mut canvas = Canvas::new(cli.width, cli.height);

    let mut frame = FrameController::new();
    let mut tick_rate = frame.tick_rate();
    drawer.set_tick_rate(tick_rate);

    // Off-window ticks keep the last position so the trail still fades.
    let (mut mx, mut my) = (0.0, 0.0);

    // Snapshot numbering; existing files are skipped, never overwritten.
    let mut snapshots = 0u32;

    info!(width = cli.width, height = cli.height, "running");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Input */
        if let Some((x, y)) = drawer.mouse_pos() {
            mx = x;
            my = y;
        }
        if drawer.left_clicked() {
            frame.click(mx, my, cfg);
        }

        /* 2) Simulate */
        let active = frame.update(mx, my, cfg);

        /* 3) Geometry + raster */
        canvas.clear();
        let mesh = frame.draw(cfg);
        if !mesh.is_empty() {
            canvas.draw_mesh(mesh, BlendState::MAX);
        }
        canvas.present_into(&mut screen);

        /* 4) Present */
        drawer.present(&screen)?;

        if drawer.snapshot_pressed() {
            let path = snapshot::next_free_path(&cli.snapshot_dir, &mut snapshots);
            if let Err(e) = snapshot::save_png(&canvas, &path) {
                error!("{e}");
            }
        }

        /* 5) Retune the loop when the activity policy says so */
        if frame.tick_rate() != tick_rate {
            tick_rate = frame.tick_rate();
            debug!(tick_rate, active, "retuning loop");
            drawer.set_tick_rate(tick_rate);
        }

        /* 6) Pick up external config edits between frames */
        watcher.poll(cfg);
    }

    Ok(())
}
