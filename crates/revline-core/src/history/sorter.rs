//! Chronological ordering of one element's revisions.
//!
//! Ordering edges are authoritative when any exist within the set. Corrupted
//! input may contain cycles; they are broken deterministically and counted,
//! never treated as an error.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use revline_core_types::schema::STAGE_SORT;

use crate::history::label::natural_cmp;
use crate::model::{Ordering, Revision};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChronologicalOrder<'a> {
    /// Oldest first
    pub revisions: Vec<&'a Revision>,
    pub cycles_broken: usize,
}

impl<'a> ChronologicalOrder<'a> {
    pub fn labels(&self) -> Vec<&'a str> {
        self.revisions.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn latest(&self) -> Option<&'a Revision> {
        self.revisions.last().copied()
    }
}

/// Order `revisions` oldest first
///
/// Duplicate identifiers in the input are collapsed to their first
/// occurrence. Only ordering edges with both endpoints in the set are used;
/// revisions those edges leave unrelated are placed by schedule time or
/// natural label order.
pub fn chronological_order<'a, 'o, I>(
    revisions: &[&'a Revision],
    orderings: I,
) -> ChronologicalOrder<'a>
where
    I: IntoIterator<Item = &'o Ordering>,
{
    let mut nodes: Vec<&'a Revision> = Vec::with_capacity(revisions.len());
    let mut index: HashMap<&'a str, usize> = HashMap::with_capacity(revisions.len());
    for revision in revisions {
        if let Entry::Vacant(slot) = index.entry(revision.global_id.as_str()) {
            slot.insert(nodes.len());
            nodes.push(*revision);
        }
    }
    let position = |id: &str| index.get(id).copied();

    // Self-loops carry no ordering information.
    let edges: BTreeSet<(usize, usize)> = orderings
        .into_iter()
        .filter_map(|o| Some((position(&o.predecessor_id)?, position(&o.successor_id)?)))
        .filter(|(from, to)| from != to)
        .collect();

    if edges.is_empty() {
        return ChronologicalOrder {
            revisions: fallback_order(nodes),
            cycles_broken: 0,
        };
    }

    let n = nodes.len();
    let rank = fallback_ranks(&nodes);
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];
    for &(from, to) in &edges {
        successors[from].push(to);
        predecessors[to].push(from);
        in_degree[to] += 1;
    }

    // Ready nodes leave in fallback order, so revisions the restricted graph
    // leaves unrelated still come out chronologically.
    let mut queued = vec![false; n];
    let mut visited = vec![false; n];
    let mut ready: BTreeSet<(usize, usize)> = BTreeSet::new();
    for (i, degree) in in_degree.iter().enumerate() {
        if *degree == 0 {
            queued[i] = true;
            ready.insert((rank[i], i));
        }
    }

    let mut order = Vec::with_capacity(n);
    let mut cycles_broken = 0;
    while order.len() < n {
        let Some((_, current)) = ready.pop_first() else {
            let Some(breaker) = cycle_breaker(&queued, &visited, &predecessors, &rank) else {
                break;
            };
            tracing::warn!(
                stage = STAGE_SORT,
                global_id = %nodes[breaker].global_id,
                label = %nodes[breaker].label,
                "cycle in ordering relations; breaking at revision"
            );
            cycles_broken += 1;
            queued[breaker] = true;
            ready.insert((rank[breaker], breaker));
            continue;
        };

        visited[current] = true;
        order.push(nodes[current]);
        for &next in &successors[current] {
            in_degree[next] = in_degree[next].saturating_sub(1);
            if in_degree[next] == 0 && !queued[next] {
                queued[next] = true;
                ready.insert((rank[next], next));
            }
        }
    }

    for (i, node) in nodes.iter().enumerate() {
        if !visited[i] {
            order.push(*node);
        }
    }

    ChronologicalOrder {
        revisions: order,
        cycles_broken,
    }
}

// Earliest-ranked unqueued node continuing from the visited part of the
// graph, else the earliest-ranked unqueued node at all.
fn cycle_breaker(
    queued: &[bool],
    visited: &[bool],
    predecessors: &[Vec<usize>],
    rank: &[usize],
) -> Option<usize> {
    let unqueued = || (0..queued.len()).filter(|&i| !queued[i]);
    unqueued()
        .filter(|&i| predecessors[i].iter().any(|&p| visited[p]))
        .min_by_key(|&i| rank[i])
        .or_else(|| unqueued().min_by_key(|&i| rank[i]))
}

/// Position of every node in the edge-free fallback order
fn fallback_ranks(nodes: &[&Revision]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..nodes.len()).collect();
    let all_scheduled = nodes.iter().all(|r| r.scheduled_at().is_some());
    indices.sort_by(|&a, &b| fallback_cmp(nodes[a], nodes[b], all_scheduled));
    let mut rank = vec![0; nodes.len()];
    for (position, index) in indices.into_iter().enumerate() {
        rank[index] = position;
    }
    rank
}

fn fallback_cmp(a: &Revision, b: &Revision, by_schedule: bool) -> std::cmp::Ordering {
    let by_label = || natural_cmp(&a.label, &b.label);
    if by_schedule {
        a.scheduled_at().cmp(&b.scheduled_at()).then_with(by_label)
    } else {
        by_label()
    }
}

fn fallback_order(mut nodes: Vec<&Revision>) -> Vec<&Revision> {
    let all_scheduled = nodes.iter().all(|r| r.scheduled_at().is_some());
    nodes.sort_by(|a, b| fallback_cmp(a, b, all_scheduled));
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revs(labels: &[&str]) -> Vec<Revision> {
        labels
            .iter()
            .map(|label| Revision::new(format!("id-{}", label), *label))
            .collect()
    }

    fn edge(from: &str, to: &str) -> Ordering {
        Ordering::new(
            format!("o-{}-{}", from, to),
            format!("id-{}", from),
            format!("id-{}", to),
        )
    }

    #[test]
    fn test_follows_edges_regardless_of_input_order() {
        let owned = revs(&["C", "A", "B"]);
        let refs: Vec<&Revision> = owned.iter().collect();
        let edges = [edge("A", "B"), edge("B", "C")];

        let order = chronological_order(&refs, &edges);
        assert_eq!(order.labels(), vec!["A", "B", "C"]);
        assert_eq!(order.cycles_broken, 0);
        assert_eq!(order.latest().unwrap().label, "C");
    }

    #[test]
    fn test_unrelated_revision_placed_by_label() {
        // element touched in runs 1, 2 and 4: only PM1 -> PM2 lies in its set
        let owned = revs(&["PM1", "PM4", "PM2"]);
        let refs: Vec<&Revision> = owned.iter().collect();
        let edges = [edge("PM1", "PM2"), edge("PM2", "PM3"), edge("PM3", "PM4")];

        let order = chronological_order(&refs, &edges);
        assert_eq!(order.labels(), vec!["PM1", "PM2", "PM4"]);
        assert_eq!(order.latest().unwrap().label, "PM4");
    }

    #[test]
    fn test_unrelated_revision_placed_by_schedule_time() {
        let owned = vec![
            Revision::new("id-a", "A").with_schedule_time("2026-01-01T00:00:00Z"),
            Revision::new("id-z", "Z").with_schedule_time("2026-02-01T00:00:00Z"),
            Revision::new("id-b", "B").with_schedule_time("2026-03-01T00:00:00Z"),
        ];
        let refs: Vec<&Revision> = owned.iter().collect();
        let edges = [Ordering::new("o1", "id-a", "id-b")];

        let order = chronological_order(&refs, &edges);
        assert_eq!(order.labels(), vec!["A", "Z", "B"]);
    }

    #[test]
    fn test_edges_outside_set_are_ignored() {
        let owned = revs(&["PM3", "PM1"]);
        let refs: Vec<&Revision> = owned.iter().collect();
        // PM1 -> PM2 -> PM3, but PM2 is not in the set
        let edges = [edge("PM1", "PM2"), edge("PM2", "PM3")];

        let order = chronological_order(&refs, &edges);
        assert_eq!(order.labels(), vec!["PM1", "PM3"]);
    }

    #[test]
    fn test_cycle_is_broken_deterministically() {
        let owned = revs(&["A", "B", "C"]);
        let refs: Vec<&Revision> = owned.iter().collect();
        let edges = [edge("A", "B"), edge("B", "C"), edge("C", "B")];

        let order = chronological_order(&refs, &edges);
        assert_eq!(order.labels(), vec!["A", "B", "C"]);
        assert_eq!(order.cycles_broken, 1);
    }

    #[test]
    fn test_pure_cycle_keeps_every_node() {
        let owned = revs(&["PM2", "PM1"]);
        let refs: Vec<&Revision> = owned.iter().collect();
        let edges = [edge("PM1", "PM2"), edge("PM2", "PM1")];

        let order = chronological_order(&refs, &edges);
        assert_eq!(order.labels(), vec!["PM1", "PM2"]);
        assert_eq!(order.cycles_broken, 1);
    }

    #[test]
    fn test_fallback_natural_label_order() {
        let owned = revs(&["V.10", "draft", "V.2"]);
        let refs: Vec<&Revision> = owned.iter().collect();
        let order = chronological_order(&refs, std::iter::empty());
        assert_eq!(order.labels(), vec!["V.2", "V.10", "draft"]);
    }

    #[test]
    fn test_fallback_schedule_time_wins_when_complete() {
        let owned = vec![
            Revision::new("a", "PM2").with_schedule_time("2026-01-01T00:00:00Z"),
            Revision::new("b", "PM1").with_schedule_time("2026-02-01T00:00:00Z"),
        ];
        let refs: Vec<&Revision> = owned.iter().collect();
        let order = chronological_order(&refs, std::iter::empty());
        assert_eq!(order.labels(), vec!["PM2", "PM1"]);
    }

    #[test]
    fn test_partial_schedule_times_fall_back_to_labels() {
        let owned = vec![
            Revision::new("a", "PM2").with_schedule_time("2026-01-01T00:00:00Z"),
            Revision::new("b", "PM1"),
        ];
        let refs: Vec<&Revision> = owned.iter().collect();
        let order = chronological_order(&refs, std::iter::empty());
        assert_eq!(order.labels(), vec!["PM1", "PM2"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let owned = revs(&["A"]);
        let refs = vec![&owned[0], &owned[0]];
        let order = chronological_order(&refs, std::iter::empty());
        assert_eq!(order.revisions.len(), 1);
    }
}
