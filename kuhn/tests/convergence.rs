use kuhn::{
    eval::compute_exploitability,
    run,
    trainer::Trainer,
    TrainingArgs,
    GAME_VALUE,
};
use more_asserts::{
    assert_ge,
    assert_le,
    assert_lt,
};
use rand::{
    rngs::StdRng,
    SeedableRng,
};

const ITERATIONS: usize = 100_000;

#[test]
fn test_converges_to_equilibrium() {
    for seed in [1, 2, 3] {
        let report = run(&TrainingArgs::new(ITERATIONS).with_seed(seed)).unwrap();

        assert_lt!((report.average_game_value - GAME_VALUE).abs(), 0.02);
        assert_ge!(report.exploitability, -1e-9);
        assert_lt!(report.exploitability, 0.05);

        let jack_bet = report.strategy_of("J").unwrap()[0];
        let king_bet = report.strategy_of("K").unwrap()[0];
        assert_ge!(jack_bet, 0.0);
        assert_le!(jack_bet, 1.0 / 3.0 + 0.02);
        assert_lt!((king_bet - 3.0 * jack_bet).abs(), 0.1);

        // Never bet a Queen first, always call a bet with a King.
        assert_lt!(report.strategy_of("Q").unwrap()[0], 0.05);
        assert_lt!(report.strategy_of("KB").unwrap()[1], 0.05);
    }
}

#[test]
fn test_strategy_table_holds_distributions() {
    let report = run(&TrainingArgs::new(10_000).with_seed(9)).unwrap();
    assert_eq!(12, report.strategy_table.len());
    for (key, strategy) in &report.strategy_table {
        assert_ge!(strategy[0], 0.0, "{}", key);
        assert_ge!(strategy[1], 0.0, "{}", key);
        assert_lt!((strategy[0] + strategy[1] - 1.0).abs(), 1e-9, "{}", key);
    }
}

#[test]
fn test_exploitability_decreases_with_training() {
    let mut trainer = Trainer::new();
    let mut rng = StdRng::seed_from_u64(17);
    trainer.train(1_000, &mut rng).unwrap();
    let early = compute_exploitability(trainer.store()).unwrap();
    trainer.train(50_000, &mut rng).unwrap();
    let late = compute_exploitability(trainer.store()).unwrap();
    assert_lt!(late, early);
}

#[test]
fn test_untrained_store_cannot_be_evaluated() {
    let trainer = Trainer::new();
    assert!(matches!(
        compute_exploitability(trainer.store()),
        Err(kuhn::KuhnError::MissingInfoSet { .. })
    ));
}
