use anyhow::{Context, Result};
use gridlife::{
    CsvStats, DriverError, Engine, FrameRenderer, PatternCodec, ProgressReport, RunLengthEncoded,
    Simulation, SimulationConfig, SinkError, StateLog, Symbols, VideoEncoder,
};

mod console;
mod options;

/// Generations computed for seeds that do not come from a config file
const DEFAULT_GENERATIONS: i64 = 100;

/// Builds the simulation from an RLE pattern, a fill mode or the config file,
/// in that order of precedence
fn seed_simulation(args: &options::Args) -> Result<(Simulation<'static>, Symbols)> {
    if let Some(file_name) = args.input_file() {
        let encoded_str = std::fs::read_to_string(&file_name)
            .with_context(|| format!("reading pattern {}", file_name))?;
        let grid = RunLengthEncoded::default()
            .decode(&encoded_str)
            .with_context(|| format!("decoding pattern {}", file_name))?;
        let gens = args.generations()?.unwrap_or(DEFAULT_GENERATIONS);
        return Ok((Simulation::new(grid, gens)?, Symbols::default()));
    }

    if let Some(mode) = args.fill_mode()? {
        let (rows, columns) = args.grid_size()?;
        let grid = mode.create_grid(rows, columns)?;
        let gens = args.generations()?.unwrap_or(DEFAULT_GENERATIONS);
        return Ok((Simulation::new(grid, gens)?, Symbols::default()));
    }

    let path = args.config_file();
    let mut config = SimulationConfig::from_file(&path)
        .with_context(|| format!("loading config {}", path.display()))?;
    if let Some(gens) = args.generations()? {
        config.set_n_iterations(gens);
    }
    Ok((Simulation::from_source(&config)?, config.symbols()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(args) = options::Args::from_env()? else {
        return Ok(());
    };

    let threads = args.threads()?.unwrap_or(1);
    if threads > 1 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring worker threads")?;
    }

    let (sim, symbols) = seed_simulation(&args)?;
    let out_dir = args.out_dir();
    log::info!(
        "alive: {} of {}x{}",
        sim.current().alive_count(),
        sim.current().rows(),
        sim.current().columns()
    );

    // setup the collaborators that consume each generation
    let mut sim = sim.with_engine(Engine::for_threads(threads));
    if args.console() {
        sim = sim.add_sink(console::ConsoleRender::new(args.sleep()?)?);
    } else {
        sim = sim.add_sink(ProgressReport::new());
    }
    sim = sim.add_sink(StateLog::create(&out_dir, symbols)?);
    if args.frames() {
        let frames = FrameRenderer::create(&out_dir, args.scale()?)?;
        let frames_dir = frames.dir().to_owned();
        sim = sim.add_sink(frames);
        if args.video() {
            sim = sim.add_sink(VideoEncoder::new(frames_dir, &out_dir, args.fps()?));
        }
    }
    if let Some(file_name) = args.stats_file() {
        sim = sim.add_sink(CsvStats::new(file_name));
    }

    match sim.run() {
        Ok(()) => {}
        Err(DriverError::Collaborator {
            generation,
            source: SinkError::Interrupted,
        }) => log::info!("stopped at generation {}", generation),
        Err(e) => return Err(e.into()),
    }
    // dropping the simulation restores the terminal
    let grid = sim.into_grid();

    if let Some(file_name) = args.output_file() {
        let encoder = RunLengthEncoded::default().set_name("gridlife generated pattern");
        std::fs::write(&file_name, encoder.encode(&grid))
            .with_context(|| format!("writing pattern {}", file_name))?;
    }

    Ok(())
}
