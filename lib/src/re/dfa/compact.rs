use std::ops::RangeInclusive;

use indexmap::IndexMap;

use crate::re::dfa::{ActionSet, State, StateId};

/// Runs of consecutive bytes longer than this become ranges. Shorter runs
/// are kept as individual points.
const MAX_POINTS_RUN: usize = 2;

/// A group of transitions of the same state that share target and actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionSet {
    pub target: StateId,
    pub actions: ActionSet,
    /// True if the target is an accepting state.
    pub accept: bool,
    /// Runs of more than two consecutive bytes.
    pub ranges: Vec<RangeInclusive<u8>>,
    /// Bytes that are not part of a range.
    pub points: Vec<u8>,
}

impl TransitionSet {
    /// Returns every byte in the set, in ascending order.
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self
            .ranges
            .iter()
            .flat_map(|r| r.clone())
            .chain(self.points.iter().copied())
            .collect();
        bytes.sort_unstable();
        bytes
    }
}

/// Groups the transitions of `state` by target and action set. Groups are
/// ordered by their lowest byte.
pub(super) fn compact(state: &State) -> Vec<TransitionSet> {
    let mut groups: IndexMap<(StateId, &ActionSet), (bool, Vec<u8>)> =
        IndexMap::new();

    for (b, transition) in &state.transitions {
        groups
            .entry((transition.target, &transition.actions))
            .or_insert_with(|| (transition.accept, Vec::new()))
            .1
            .push(*b);
    }

    groups
        .into_iter()
        .map(|((target, actions), (accept, bytes))| {
            let (ranges, points) = split_runs(&bytes);
            TransitionSet {
                target,
                actions: actions.clone(),
                accept,
                ranges,
                points,
            }
        })
        .collect()
}

/// Splits a sorted list of distinct bytes into maximal runs of consecutive
/// values.
fn split_runs(bytes: &[u8]) -> (Vec<RangeInclusive<u8>>, Vec<u8>) {
    let mut ranges = Vec::new();
    let mut points = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let mut j = i;
        while j + 1 < bytes.len() && bytes[j + 1] == bytes[j] + 1 {
            j += 1;
        }
        if j - i + 1 > MAX_POINTS_RUN {
            ranges.push(bytes[i]..=bytes[j]);
        } else {
            points.extend_from_slice(&bytes[i..=j]);
        }
        i = j + 1;
    }

    (ranges, points)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::split_runs;

    #[test]
    fn runs() {
        assert_eq!(
            split_runs(b"0123456789_abcxz"),
            (vec![b'0'..=b'9', b'a'..=b'c'], b"_xz".to_vec())
        );
        assert_eq!(split_runs(b"ab"), (vec![], b"ab".to_vec()));
        assert_eq!(split_runs(&[253, 254, 255]), (vec![253..=255], vec![]));
        assert_eq!(split_runs(&[]), (vec![], vec![]));
    }
}
