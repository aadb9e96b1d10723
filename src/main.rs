use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use speedwatch::{data, events, html_chart, logfile, ui, App, Settings};
use speedwatch_probe::{probe, Probe, SpeedtestClient, SpeedtestSettings};

#[derive(Parser, Debug)]
#[command(name = "speedwatch")]
#[command(about = "Record internet speed tests to a CSV log and chart the history")]
struct Args {
    /// Append the measurement to this log, creating it with a header
    #[arg(short, long, conflicts_with = "infile")]
    outfile: Option<PathBuf>,

    /// Chart an existing log instead of measuring
    #[arg(short, long)]
    infile: Option<PathBuf>,

    /// Show the terminal chart instead of writing the HTML chart
    #[arg(short = 's', long = "static", requires = "infile")]
    static_chart: bool,

    /// ISP to record when the speedtest configuration cannot be fetched
    #[arg(short, long)]
    provider: Option<String>,

    /// Comment stored with the measurement
    #[arg(short, long, conflicts_with = "infile")]
    comment: Option<String>,

    /// Settings file (defaults to speedwatch.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Install the stderr log subscriber; stdout is reserved for the record line.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let settings = Settings::load(args.config.as_deref()).context("failed to load settings")?;
    debug!(?settings, "settings loaded");

    // Read path
    if let Some(ref infile) = args.infile {
        let dataset = data::load(infile)
            .with_context(|| format!("failed to read {}", infile.display()))?;
        info!(rows = dataset.len(), path = %infile.display(), "loaded measurement log");

        if args.static_chart {
            let app = App::new(infile, dataset, settings.histogram_bins, ui::Theme::auto_detect())
                .with_export_path(&settings.html_output);
            return run_tui(app);
        }

        html_chart::write(&dataset, &settings.html_output).with_context(|| {
            format!("failed to write {}", settings.html_output.display())
        })?;
        return Ok(());
    }

    // Write path
    let provider = args.provider.unwrap_or(settings.provider);
    let record = measure(settings.probe, &provider)?.with_comment(args.comment);

    match args.outfile {
        Some(ref outfile) => logfile::append_record(outfile, &record)
            .with_context(|| format!("failed to append to {}", outfile.display()))?,
        None => println!("{}", logfile::format_record(&record)),
    }

    Ok(())
}

/// Run one probe against speedtest.net on a fresh runtime.
fn measure(
    probe_settings: SpeedtestSettings,
    provider: &str,
) -> Result<speedwatch::MeasurementRecord> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let client = SpeedtestClient::builder().settings(probe_settings).build()?;
        debug!(backend = client.description(), "probing");
        let record = probe(&client, Some(provider)).await?;
        Ok::<_, anyhow::Error>(record)
    })
    .context("speed test failed")
}

/// Run the static chart until the user quits
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(app.theme.highlight));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5u16.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1),      // Header bar
                Constraint::Percentage(50), // Histogram
                Constraint::Min(6),         // Time series
                Constraint::Length(1),      // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::histogram::render(frame, app, chunks[1]);
            ui::timeseries::render(frame, app, chunks[2]);
            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(100))? {
            events::handle_key_event(app, key);
        }
    }

    Ok(())
}
