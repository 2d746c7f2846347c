use std::collections::HashMap;

use itertools::Itertools;
use log::debug;

use crate::{
    error::{
        KuhnError,
        Result,
    },
    node::InfoSetKey,
    rules::{
        Action,
        Deal,
        History,
        PlayerId,
    },
    sampling::all_deals,
};

pub trait Strategy {
    fn get_strategy(&self, key: &InfoSetKey) -> Option<[f64; Action::COUNT]>;

    fn require_strategy(&self, key: &InfoSetKey) -> Result<[f64; Action::COUNT]> {
        self.get_strategy(key).ok_or_else(|| KuhnError::MissingInfoSet {
            key: key.to_string(),
        })
    }
}

impl Strategy for HashMap<InfoSetKey, [f64; Action::COUNT]> {
    fn get_strategy(&self, key: &InfoSetKey) -> Option<[f64; Action::COUNT]> {
        self.get(key).copied()
    }
}

/// Index of the first maximal value.
fn max_index(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

fn dot(a: &[f64; Action::COUNT], b: &[f64; Action::COUNT]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Sibling states of one best-response information set: the deal and the
/// probability that chance and the opponent's strategy reach it.
pub type ReachProbabilities = HashMap<InfoSetKey, Vec<(Deal, f64)>>;

/// Records, for every information set of `br_player`, the deals that reach it
/// together with the opponent's reach probability `reach_prob`.
pub fn calc_reach_probabilities<St: Strategy>(
    reach_probabilities: &mut ReachProbabilities,
    br_player: PlayerId,
    strategy: &St,
    cards: &Deal,
    history: &History,
    reach_prob: f64,
) -> Result<()> {
    if history.is_terminal() {
        return Ok(());
    }

    let player = history.to_act();
    let key = InfoSetKey::new(cards[player.index()], history.clone());
    if player == br_player {
        reach_probabilities.entry(key).or_default().push((*cards, reach_prob));
        for act in Action::VALUES {
            calc_reach_probabilities(
                reach_probabilities,
                br_player,
                strategy,
                cards,
                &history.with_action(act),
                reach_prob, // br_player always chooses the best action.
            )?;
        }
        return Ok(());
    }

    // the opponent plays the trained strategy.
    let opponent_strategy = strategy.require_strategy(&key)?;
    for (i, act) in Action::VALUES.iter().enumerate() {
        calc_reach_probabilities(
            reach_probabilities,
            br_player,
            strategy,
            cards,
            &history.with_action(*act),
            reach_prob * opponent_strategy[i],
        )?;
    }
    Ok(())
}

/// Value of `history` for the player who acted last, when `br_player` plays
/// a best response and the other player follows `strategy`.
///
/// The best response cannot see the opponent's card, so the action at a
/// `br_player` node is chosen once per INFO SET: `weights[key][a]` sums the
/// value of action `a` over every sibling state in `reach_probabilities`,
/// weighted by the opponent's reach probability. The best of these is then
/// played in every state of that info set.
pub fn calc_best_response_value<St: Strategy>(
    weights: &mut HashMap<InfoSetKey, [f64; Action::COUNT]>,
    reach_probabilities: &ReachProbabilities,
    br_player: PlayerId,
    strategy: &St,
    cards: &Deal,
    history: &History,
) -> Result<f64> {
    if history.is_terminal() {
        return Ok(-history.payoff(cards));
    }

    let player = history.to_act();
    let key = InfoSetKey::new(cards[player.index()], history.clone());

    if player == br_player {
        if !weights.contains_key(&key) {
            let states = reach_probabilities.get(&key).map(Vec::as_slice).unwrap_or_default();
            let mut action_weights = [0.0; Action::COUNT];
            for (i, act) in Action::VALUES.iter().enumerate() {
                for (sib_cards, state_reach_prob) in states {
                    let value = calc_best_response_value(
                        weights,
                        reach_probabilities,
                        br_player,
                        strategy,
                        sib_cards,
                        &history.with_action(*act),
                    )?;
                    action_weights[i] += state_reach_prob * value;
                }
            }
            weights.insert(key.clone(), action_weights);
        }

        let best_action = Action::VALUES[max_index(&weights[&key])];
        let best_value = calc_best_response_value(
            weights,
            reach_probabilities,
            br_player,
            strategy,
            cards,
            &history.with_action(best_action),
        )?;
        return Ok(-best_value);
    }

    // the opponent plays the trained strategy.
    let opponent_strategy = strategy.require_strategy(&key)?;
    let mut action_values = [0.0; Action::COUNT];
    for (i, act) in Action::VALUES.iter().enumerate() {
        action_values[i] = calc_best_response_value(
            weights,
            reach_probabilities,
            br_player,
            strategy,
            cards,
            &history.with_action(*act),
        )?;
    }
    Ok(-dot(&opponent_strategy, &action_values))
}

fn best_response_weights_to_pure_strategy(
    weights: &HashMap<InfoSetKey, [f64; Action::COUNT]>,
) -> HashMap<InfoSetKey, [f64; Action::COUNT]> {
    weights
        .iter()
        .map(|(key, w)| {
            let mut pure_strategy = [0.0; Action::COUNT];
            pure_strategy[max_index(w)] = 1.0;
            (key.clone(), pure_strategy)
        })
        .collect()
}

/// Deterministic best response of both seats against `strategy`, as one
/// profile keyed by information set.
pub fn best_response<St: Strategy>(
    strategy: &St,
) -> Result<HashMap<InfoSetKey, [f64; Action::COUNT]>> {
    let deals = all_deals();
    let root = History::root();
    let mut weights = HashMap::new();
    for br_player in [PlayerId::Player0, PlayerId::Player1] {
        let mut reach_probabilities = ReachProbabilities::new();
        for cards in &deals {
            calc_reach_probabilities(
                &mut reach_probabilities,
                br_player,
                strategy,
                cards,
                &root,
                1.0,
            )?;
        }
        for cards in &deals {
            calc_best_response_value(
                &mut weights,
                &reach_probabilities,
                br_player,
                strategy,
                cards,
                &root,
            )?;
        }
    }

    if log::log_enabled!(log::Level::Debug) {
        for key in weights.keys().sorted_by_key(|k| k.to_string()) {
            debug!("best response weights {}: {:?}", key, weights[key]);
        }
    }
    Ok(best_response_weights_to_pure_strategy(&weights))
}

/// Value of `history` for the player who acted last, with `strategy0` playing
/// seat 0 and `strategy1` playing seat 1.
pub fn calc_expected_value<S0, S1>(
    strategy0: &S0,
    strategy1: &S1,
    cards: &Deal,
    history: &History,
) -> Result<f64>
where
    S0: Strategy,
    S1: Strategy,
{
    if history.is_terminal() {
        return Ok(-history.payoff(cards));
    }

    let player = history.to_act();
    let key = InfoSetKey::new(cards[player.index()], history.clone());
    let strategy = match player {
        PlayerId::Player0 => strategy0.require_strategy(&key)?,
        PlayerId::Player1 => strategy1.require_strategy(&key)?,
    };

    let mut action_values = [0.0; Action::COUNT];
    for (i, act) in Action::VALUES.iter().enumerate() {
        action_values[i] =
            calc_expected_value(strategy0, strategy1, cards, &history.with_action(*act))?;
    }
    Ok(-dot(&strategy, &action_values))
}

/// Sum of what a best response gains against `strategy` in both seats,
/// averaged over all deals. Zero at a Nash equilibrium, positive otherwise.
///
/// Every information set reachable from the root must be present in
/// `strategy`; evaluating an untrained store fails with
/// [`KuhnError::MissingInfoSet`].
pub fn compute_exploitability<St: Strategy>(strategy: &St) -> Result<f64> {
    let br = best_response(strategy)?;
    let deals = all_deals();
    let deal_prob = 1.0 / deals.len() as f64;
    let root = History::root();

    let mut exploitability = 0.0;
    for cards in &deals {
        // Both values are seen from player 1's side.
        let ev_br1 = calc_expected_value(strategy, &br, cards, &root)?;
        let ev_br0 = calc_expected_value(&br, strategy, cards, &root)?;
        debug!("{:?}: util_1(s0, br1): {} util_1(br0, s1): {}", cards, ev_br1, ev_br0);
        exploitability += deal_prob * (ev_br1 - ev_br0);
    }
    Ok(exploitability)
}
