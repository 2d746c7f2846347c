pub mod error;
pub mod eval;
pub mod node;
pub mod rules;
pub mod sampling;
pub mod trainer;

use std::{
    fmt::Display,
    fs::File,
    io::{
        BufWriter,
        Write,
    },
    path::{
        Path,
        PathBuf,
    },
    time::{
        Duration,
        Instant,
    },
};

use clap::{
    Args,
    ValueHint,
};
use log::{
    debug,
    info,
};
use rand::{
    rngs::StdRng,
    SeedableRng,
};

pub use crate::error::{
    KuhnError,
    Result,
};
use crate::{
    eval::compute_exploitability,
    node::InfoSetKey,
    rules::{
        Action,
        PlayerId,
    },
    trainer::Trainer,
};

/// Value of the game for the first player at equilibrium.
pub const GAME_VALUE: f64 = -1.0 / 18.0;

const CHECKPOINT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Args, Clone, Debug)]
pub struct TrainingArgs {
    #[clap(long, short, value_parser, default_value_t = 100_000)]
    pub iterations: usize,

    /// Seed for dealing cards. Uses OS entropy when omitted.
    #[clap(long, short, value_parser)]
    pub seed: Option<u64>,

    /// Appends exploitability checkpoints to this CSV file.
    #[clap(long, short, value_parser, value_hint(ValueHint::FilePath))]
    pub log_path: Option<PathBuf>,
}

impl TrainingArgs {
    pub fn new(iterations: usize) -> Self {
        TrainingArgs {
            iterations,
            seed: None,
            log_path: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[derive(Clone, Debug)]
pub struct TrainingReport {
    pub iterations: usize,
    pub average_game_value: f64,
    /// Average strategy per information set, `[bet, pass]`, sorted by key text.
    pub strategy_table: Vec<(InfoSetKey, [f64; Action::COUNT])>,
    pub exploitability: f64,
}

impl TrainingReport {
    pub fn strategy_of(&self, key: &str) -> Option<[f64; Action::COUNT]> {
        self.strategy_table.iter().find(|(k, _)| k.to_string() == key).map(|(_, s)| *s)
    }
}

impl Display for TrainingReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Running Kuhn Poker chance sampling CFR for {} iterations", self.iterations)?;
        writeln!(
            f,
            "Expected average game value (for {:?}): {}",
            PlayerId::Player0,
            GAME_VALUE
        )?;
        writeln!(f, "Computed average game value: {}", self.average_game_value)?;
        writeln!(f, "We expect the bet frequency for a Jack to be between 0 and 1/3")?;
        writeln!(f, "The bet frequency for a King should be three times the one for a Jack")?;
        writeln!(f, "History  Bet  Pass")?;
        for (key, strategy) in &self.strategy_table {
            writeln!(f, "{}: {:.2}, {:.2}", key, strategy[0], strategy[1])?;
        }
        write!(f, "Exploitability of final strategy is: {}", self.exploitability)
    }
}

struct CheckpointLog {
    writer: BufWriter<File>,
}

impl CheckpointLog {
    fn create(path: &Path) -> Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "epoch,elapsed_seconds,exploitability")?;
        Ok(Self {
            writer,
        })
    }

    fn append(&mut self, epoch: usize, elapsed: Duration, exploitability: f64) -> Result<()> {
        writeln!(self.writer, "{},{},{:.12}", epoch, elapsed.as_secs(), exploitability)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Trains a fresh strategy for `args.iterations` hands and evaluates it.
pub fn run(args: &TrainingArgs) -> Result<TrainingReport> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut log = match &args.log_path {
        Some(path) => Some(CheckpointLog::create(path)?),
        None => None,
    };

    let mut trainer = Trainer::new();
    let start_t = Instant::now();
    let mut timer = Instant::now();
    let average_game_value =
        trainer.train_with_checkpoints(args.iterations, &mut rng, |i, average, current| {
            if timer.elapsed() <= CHECKPOINT_INTERVAL {
                return Ok(());
            }
            timer = Instant::now();
            match compute_exploitability(current.store()) {
                Ok(exploitability) => {
                    info!("epoch {:10}: exploitability: {}", i, exploitability);
                    info!("Average game value: {}", average);
                    if let Some(log) = &mut log {
                        log.append(i, start_t.elapsed(), exploitability)?;
                    }
                }
                Err(err) => debug!("epoch {:10}: skipped checkpoint: {}", i, err),
            }
            Ok(())
        })?;

    let store = trainer.into_store();
    let mut nodes: Vec<_> = store.iter().collect();
    nodes.sort_by_cached_key(|(key, _)| key.to_string());
    debug!("Nodes [");
    for (key, node) in nodes {
        debug!("    {:4} {}", key.to_string(), node);
    }
    debug!("]");

    let exploitability = compute_exploitability(&store)?;
    info!("exploitability: {}", exploitability);

    Ok(TrainingReport {
        iterations: args.iterations,
        average_game_value,
        strategy_table: store.strategy_table(),
        exploitability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_rejects_zero_iterations() {
        assert!(matches!(run(&TrainingArgs::new(0)), Err(KuhnError::InvalidIterations(0))));
    }

    #[test]
    fn test_report_format() {
        let report = run(&TrainingArgs::new(5_000).with_seed(1)).unwrap();
        assert_eq!(12, report.strategy_table.len());

        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!("Running Kuhn Poker chance sampling CFR for 5000 iterations", lines[0]);
        assert_eq!(
            format!("Expected average game value (for Player0): {}", GAME_VALUE),
            lines[1]
        );
        assert_eq!("History  Bet  Pass", lines[5]);
        assert!(lines[6].starts_with("J: "));
        assert!(lines[17].starts_with("QCB: "));
        assert!(lines[18].starts_with("Exploitability of final strategy is: "));

        let king = report.strategy_of("KB").unwrap();
        assert_eq!(format!("KB: {:.2}, {:.2}", king[0], king[1]), lines[6 + 5]);
    }

    #[test]
    fn test_checkpoint_log() {
        let file_name = format!("kuhn-checkpoints-{}.csv", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        let mut log = CheckpointLog::create(&path).unwrap();
        log.append(10, Duration::from_secs(3), 0.25).unwrap();
        drop(log);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!("epoch,elapsed_seconds,exploitability\n10,3,0.250000000000\n", content);
        std::fs::remove_file(&path).unwrap();
    }
}
