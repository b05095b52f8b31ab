use anyhow::Result;
use qtab_core::{RngSource, Stats, Trainer, TrainerConfig};
use qtab_problems::{GridConfig, GridWorld};
use std::{cell::RefCell, rc::Rc};

fn train(config: GridConfig, trials: usize, seed: u64) -> Result<(Trainer<GridWorld>, Vec<Stats>)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let config_trainer = TrainerConfig::default().max_steps_per_trial(10_000);
    let mut trainer = Trainer::build(
        GridWorld::new(config)?,
        config_trainer,
        RngSource::seed_from_u64(seed),
    )?;

    let history = Rc::new(RefCell::new(Vec::new()));
    let history_ = history.clone();
    trainer.add_event_listener(move |stats| history_.borrow_mut().push(*stats));
    trainer.run(trials)?;

    let history = history.borrow().clone();
    Ok((trainer, history))
}

#[test]
fn test_cliff() -> Result<()> {
    let (trainer, history) = train(GridConfig::cliff(), 300, 42)?;
    assert_eq!(history.len(), 300);
    assert_eq!(trainer.stats().trials_completed, 300);
    assert_eq!(trainer.algorithm().table().len(), 24 * 4);

    // Stepping right from the start falls off the cliff. With alpha = 1 and
    // a terminal successor, the value is exactly the hazard reward.
    let q = trainer.algorithm().table().get_by_name("1,1", "Move Right")?;
    assert_eq!(q, -50.0);
    Ok(())
}

#[test]
fn test_robot() -> Result<()> {
    let (trainer, history) = train(GridConfig::robot(), 50, 7)?;
    assert_eq!(trainer.stats().trials_completed, 50);

    // (3, 3) -> (10, 10) takes at least 14 moves.
    assert!(history.iter().all(|s| s.steps_per_trial >= 14));
    assert_eq!(
        history.iter().map(|s| s.steps_per_trial).sum::<usize>(),
        trainer.stats().total_steps
    );
    Ok(())
}

#[test]
fn test_same_seed_same_run() -> Result<()> {
    let (_, a) = train(GridConfig::cliff(), 30, 3)?;
    let (_, b) = train(GridConfig::cliff(), 30, 3)?;
    assert_eq!(a, b);
    Ok(())
}
