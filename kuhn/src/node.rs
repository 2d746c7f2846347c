use std::{
    collections::HashMap,
    fmt::Display,
};

use more_asserts::debug_assert_ge;

use crate::{
    eval::Strategy,
    rules::{
        Action,
        Card,
        History,
    },
};

/// What the acting player knows: their own card and the public history.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct InfoSetKey {
    pub card: Card,
    pub history: History,
}

impl InfoSetKey {
    pub fn new(card: Card, history: History) -> Self {
        Self {
            card,
            history,
        }
    }
}

impl Display for InfoSetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.card, self.history)
    }
}

fn normalize(weights: &[f64; Action::COUNT]) -> [f64; Action::COUNT] {
    let normalizing_sum: f64 = weights.iter().sum();
    if normalizing_sum <= 0.0 {
        return [1.0 / Action::COUNT as f64; Action::COUNT];
    }
    weights.map(|w| w / normalizing_sum)
}

#[derive(Clone, Debug, Default)]
pub struct Node {
    regret_sum: [f64; Action::COUNT],
    strategy_sum: [f64; Action::COUNT],
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regret-matched strategy. Adds `realization_weight * strategy` into the
    /// strategy sum, so the average strategy is weighted by the player's own
    /// reach probability rather than by visit count.
    pub fn to_strategy(&mut self, realization_weight: f64) -> [f64; Action::COUNT] {
        let positive_regrets = self.regret_sum.map(|r| r.max(0.0));
        let strategy = normalize(&positive_regrets);

        for (i, prob) in strategy.iter().enumerate() {
            debug_assert_ge!(*prob, 0.0);
            self.strategy_sum[i] += realization_weight * prob;
        }
        strategy
    }

    pub fn to_average_strategy(&self) -> [f64; Action::COUNT] {
        normalize(&self.strategy_sum)
    }

    pub fn add_regret_sum(&mut self, action_index: usize, regret: f64, opponent_prob: f64) {
        self.regret_sum[action_index] += opponent_prob * regret;
    }

    pub fn regret_sum(&self) -> &[f64; Action::COUNT] {
        &self.regret_sum
    }

    pub fn strategy_sum(&self) -> &[f64; Action::COUNT] {
        &self.strategy_sum
    }
}

/// All information sets touched during one training run.
#[derive(Clone, Debug, Default)]
pub struct InfoSetStore {
    nodes: HashMap<InfoSetKey, Node>,
}

impl InfoSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `key`, creating zeroed accumulators on first access.
    pub fn get_or_insert(&mut self, key: InfoSetKey) -> &mut Node {
        self.nodes.entry(key).or_default()
    }

    pub fn get(&self, key: &InfoSetKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InfoSetKey, &Node)> {
        self.nodes.iter()
    }

    /// Average strategy of every information set, sorted by the textual key.
    pub fn strategy_table(&self) -> Vec<(InfoSetKey, [f64; Action::COUNT])> {
        let mut table: Vec<(InfoSetKey, [f64; Action::COUNT])> = self
            .nodes
            .iter()
            .map(|(key, node)| (key.clone(), node.to_average_strategy()))
            .collect();
        table.sort_by_cached_key(|(key, _)| key.to_string());
        table
    }
}

impl Strategy for InfoSetStore {
    fn get_strategy(&self, key: &InfoSetKey) -> Option<[f64; Action::COUNT]> {
        self.nodes.get(key).map(Node::to_average_strategy)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let avg_strategy = self.to_average_strategy();

        write!(f, "Avg Strategy[")?;
        for (i, act) in Action::VALUES.iter().enumerate() {
            write!(f, "{}: {:.03}, ", act, avg_strategy[i])?;
        }
        write!(f, "]")?;

        write!(f, " Regret[")?;
        for (i, act) in Action::VALUES.iter().enumerate() {
            write!(f, "{}: {:.03}, ", act, self.regret_sum[i])?;
        }
        write!(f, "]")?;

        Ok(())
    }
}
