use anyhow::Result;
use clap::{Parser, ValueEnum};
use csv::WriterBuilder;
use log::info;
use qtab::{
    core::{RngSource, Stats, Trainer, TrainerConfig},
    problems::{GridConfig, GridWorld},
};
use std::{cell::RefCell, fs::File, rc::Rc};

const LOG_INTERVAL: usize = 100;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    /// 8x3 grid between two rows of hazards
    Cliff,
    /// 10x10 grid without hazards
    Robot,
}

/// Train Q-learning in a grid world
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Grid to train on
    #[arg(short, long, value_enum, default_value_t = Preset::Robot)]
    preset: Preset,

    /// YAML file with a grid configuration, overrides the preset
    #[arg(short, long)]
    config: Option<String>,

    /// The number of trials
    #[arg(short, long, default_value_t = 2000)]
    trials: usize,

    /// Seed of the random number generator
    #[arg(short, long)]
    seed: Option<u64>,

    /// Cut trials longer than this
    #[arg(long)]
    max_steps: Option<usize>,

    /// Stop when the shortest trial has not improved for this many trials (0 disables)
    #[arg(long, default_value_t = 0)]
    patience: usize,

    /// Write the statistics of every trial to this CSV file
    #[arg(long)]
    csv: Option<String>,
}

fn grid_config(args: &Args) -> Result<GridConfig> {
    match &args.config {
        Some(path) => GridConfig::load(path),
        None => Ok(match args.preset {
            Preset::Cliff => GridConfig::cliff(),
            Preset::Robot => GridConfig::robot(),
        }),
    }
}

fn train(args: &Args) -> Result<Vec<Stats>> {
    let problem = GridWorld::new(grid_config(args)?)?;
    let config = {
        let config = TrainerConfig::default().log_interval(LOG_INTERVAL);
        match args.max_steps {
            Some(n) => config.max_steps_per_trial(n),
            None => config,
        }
    };
    let rng = match args.seed {
        Some(seed) => RngSource::seed_from_u64(seed),
        None => RngSource::from_entropy(),
    };
    let mut trainer = Trainer::build(problem, config, rng)?;

    let history = Rc::new(RefCell::new(Vec::new()));
    {
        let history = history.clone();
        let stop = trainer.stop_signal();
        let patience = args.patience;
        let mut best = (usize::MAX, 0);
        trainer.add_event_listener(move |stats| {
            history.borrow_mut().push(*stats);
            if stats.steps_per_trial < best.0 {
                best = (stats.steps_per_trial, stats.trials_completed);
            } else if patience > 0 && stats.trials_completed - best.1 >= patience {
                info!(
                    "No shorter trial than {} steps for {} trials",
                    best.0, patience
                );
                stop.raise();
            }
        });
    }

    let n = trainer.run(args.trials)?;
    let stats = trainer.stats();
    info!(
        "Finished {} trials, {} steps in total, last trial {} steps",
        n, stats.total_steps, stats.steps_per_trial
    );

    let history = history.borrow().clone();
    if let Some(path) = &args.csv {
        let mut wtr = WriterBuilder::new().from_writer(File::create(path)?);
        for stats in history.iter() {
            wtr.serialize(stats)?;
        }
        wtr.flush()?;
        info!("Wrote {} rows to {}", history.len(), path);
    }

    Ok(history)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    train(&args)?;
    Ok(())
}
