use log::{
    debug,
    info,
};
use rand::Rng;

use crate::{
    error::{
        KuhnError,
        Result,
    },
    node::{
        InfoSetKey,
        InfoSetStore,
    },
    rules::{
        Action,
        Deal,
        History,
        PlayerId,
    },
    sampling,
};

/// Chance-sampled CFR. One trainer owns the information sets of one run.
#[derive(Default)]
pub struct Trainer {
    store: InfoSetStore,
}

impl Trainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &InfoSetStore {
        &self.store
    }

    pub fn into_store(self) -> InfoSetStore {
        self.store
    }

    /// Returns the value of `history` for the player to act.
    /// `actions_prob[p]` is the probability that player `p`'s own choices lead
    /// to `history`.
    pub fn cfr(&mut self, cards: &Deal, history: &History, actions_prob: [f64; 2]) -> f64 {
        if history.is_terminal() {
            return history.payoff(cards);
        }

        let player = history.to_act();
        let opponent = player.opponent();
        let info_set = InfoSetKey::new(cards[player.index()], history.clone());

        let realization_weight = actions_prob[player.index()];
        let strategy = self.store.get_or_insert(info_set.clone()).to_strategy(realization_weight);

        let mut action_utils = [0.0; Action::COUNT];
        let mut node_util = 0.0;
        for (i, act) in Action::VALUES.iter().enumerate() {
            let action_prob = strategy[i];
            let mut next_actions_prob = actions_prob;
            next_actions_prob[player.index()] *= action_prob;

            action_utils[i] = -self.cfr(cards, &history.with_action(*act), next_actions_prob);
            node_util += action_prob * action_utils[i];
        }

        let opponent_prob = actions_prob[opponent.index()];
        let node = self.store.get_or_insert(info_set);
        for (i, action_util) in action_utils.iter().enumerate() {
            node.add_regret_sum(i, action_util - node_util, opponent_prob);
        }

        node_util
    }

    /// Plays one hand on a freshly sampled deal and returns player 0's value.
    pub fn train_one_epoch<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let cards = sampling::deal(rng);
        debug!("deal: {:?}", cards);
        self.cfr(&cards, &History::root(), [1.0, 1.0])
    }

    /// Runs `iterations` hands and returns the average game value for player 0.
    pub fn train<R: Rng + ?Sized>(&mut self, iterations: usize, rng: &mut R) -> Result<f64> {
        self.train_with_checkpoints(iterations, rng, |_, _, _| Ok(()))
    }

    /// Same as [`Trainer::train`], calling `on_epoch(epoch, average_game_value, self)`
    /// after every hand. An error from `on_epoch` stops training.
    pub fn train_with_checkpoints<R, F>(
        &mut self,
        iterations: usize,
        rng: &mut R,
        mut on_epoch: F,
    ) -> Result<f64>
    where
        R: Rng + ?Sized,
        F: FnMut(usize, f64, &Trainer) -> Result<()>,
    {
        if iterations == 0 {
            return Err(KuhnError::InvalidIterations(iterations));
        }

        let mut util = 0.0;
        for i in 0..iterations {
            util += self.train_one_epoch(rng);
            on_epoch(i, util / (i + 1) as f64, self)?;
        }
        let average_game_value = util / iterations as f64;
        info!("Training has finished");
        info!("# of infoset: {}", self.store.len());
        info!("Average game value for {:?}: {}", PlayerId::Player0, average_game_value);
        Ok(average_game_value)
    }
}
