use std::collections::{BTreeMap, HashSet, VecDeque};

use super::{State, StateId};

pub(super) struct Pruned {
    pub states: Vec<State>,
    pub start: StateId,
    pub goal: StateId,
    pub by_output: BTreeMap<String, StateId>,
}

/// Keep only edges on some start-to-goal path and renumber the survivors
/// in breadth-first order from `start`.
pub(super) fn prune(
    states: &[State],
    start: StateId,
    goal: StateId,
    by_output: &BTreeMap<String, StateId>,
) -> Pruned {
    // Backward from the goal: an edge is live if its child reaches the goal.
    let mut live: HashSet<(StateId, char)> = HashSet::new();
    let mut reaches_goal = vec![false; states.len()];
    let mut stack = vec![goal];
    while let Some(id) = stack.pop() {
        if std::mem::replace(&mut reaches_goal[id], true) {
            continue;
        }
        for &(key, parent) in &states[id].parents {
            if states[parent].children.get(&key) == Some(&id) {
                live.insert((parent, key));
                stack.push(parent);
            }
        }
    }

    let mut remap: Vec<Option<StateId>> = vec![None; states.len()];
    let mut order = vec![start];
    remap[start] = Some(0);
    let mut queue = VecDeque::from([start]);
    while let Some(old) = queue.pop_front() {
        for (&key, &child) in &states[old].children {
            if live.contains(&(old, key)) && remap[child].is_none() {
                remap[child] = Some(order.len());
                order.push(child);
                queue.push_back(child);
            }
        }
    }

    let mut pruned: Vec<State> = vec![State::default(); order.len()];
    for (new_id, &old) in order.iter().enumerate() {
        for (&key, &child) in &states[old].children {
            if !live.contains(&(old, key)) {
                continue;
            }
            let Some(new_child) = remap[child] else {
                continue;
            };
            pruned[new_id].children.insert(key, new_child);
            pruned[new_child].parents.push((key, new_id));
        }
    }

    Pruned {
        states: pruned,
        start: 0,
        goal: remap[goal].unwrap_or(0),
        by_output: by_output
            .iter()
            .filter_map(|(output, &old)| remap[old].map(|id| (output.clone(), id)))
            .collect(),
    }
}
