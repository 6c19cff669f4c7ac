//! Connected components

use std::collections::{HashMap, VecDeque};

use strands_core::{Direction, Error, GraphView, Result};

/// Components with direction ignored
///
/// Every node lands in exactly one component. Components are ordered by
/// their earliest node and members follow node creation order.
pub fn weakly_connected_components<G: GraphView>(graph: &G) -> Result<Vec<Vec<G::Label>>> {
    let labels = graph.node_labels();
    let position = positions(&labels);
    let mut component: Vec<Option<usize>> = vec![None; labels.len()];
    let mut count = 0;

    for root in 0..labels.len() {
        if component[root].is_some() {
            continue;
        }
        component[root] = Some(count);
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            for neighbor in graph.neighbors(&labels[current], Direction::Both)? {
                let idx = locate(&position, &neighbor)?;
                if component[idx].is_none() {
                    component[idx] = Some(count);
                    queue.push_back(idx);
                }
            }
        }
        count += 1;
    }

    tracing::debug!("Found {} weakly connected components", count);
    Ok(group(labels, &component, count))
}

/// Components where every member reaches every other along edge direction
///
/// Iterative Tarjan; same ordering rules as
/// [`weakly_connected_components`].
pub fn strongly_connected_components<G: GraphView>(graph: &G) -> Result<Vec<Vec<G::Label>>> {
    let labels = graph.node_labels();
    let position = positions(&labels);
    let n = labels.len();

    let mut successors: Vec<Vec<usize>> = Vec::with_capacity(n);
    for label in &labels {
        let next = graph.neighbors(label, Direction::Outgoing)?;
        successors.push(
            next.iter()
                .map(|l| locate(&position, l))
                .collect::<Result<_>>()?,
        );
    }

    let mut index: Vec<Option<usize>> = vec![None; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut component: Vec<Option<usize>> = vec![None; n];
    let mut next_index = 0;
    let mut count = 0;

    for root in 0..n {
        if index[root].is_some() {
            continue;
        }
        // (node, next successor to look at)
        let mut work: Vec<(usize, usize)> = vec![(root, 0)];
        index[root] = Some(next_index);
        lowlink[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;

        while let Some(frame) = work.last_mut() {
            let node = frame.0;
            if let Some(&next) = successors[node].get(frame.1) {
                frame.1 += 1;
                match index[next] {
                    None => {
                        index[next] = Some(next_index);
                        lowlink[next] = next_index;
                        next_index += 1;
                        stack.push(next);
                        on_stack[next] = true;
                        work.push((next, 0));
                    }
                    Some(i) if on_stack[next] => lowlink[node] = lowlink[node].min(i),
                    Some(_) => {}
                }
                continue;
            }

            work.pop();
            if let Some(&(parent, _)) = work.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[node]);
            }
            if Some(lowlink[node]) == index[node] {
                while let Some(member) = stack.pop() {
                    on_stack[member] = false;
                    component[member] = Some(count);
                    if member == node {
                        break;
                    }
                }
                count += 1;
            }
        }
    }

    tracing::debug!("Found {} strongly connected components", count);
    Ok(group(labels, &component, count))
}

/// True when the graph has at most one weak component
pub fn is_connected<G: GraphView>(graph: &G) -> Result<bool> {
    Ok(weakly_connected_components(graph)?.len() <= 1)
}

fn positions<L: Clone + Eq + std::hash::Hash>(labels: &[L]) -> HashMap<L, usize> {
    labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.clone(), i))
        .collect()
}

fn locate<L: Eq + std::hash::Hash + std::fmt::Debug>(
    position: &HashMap<L, usize>,
    label: &L,
) -> Result<usize> {
    position
        .get(label)
        .copied()
        .ok_or_else(|| Error::node_not_found(label))
}

/// Bucket labels by component id, ordering components by earliest member
fn group<L>(labels: Vec<L>, component: &[Option<usize>], count: usize) -> Vec<Vec<L>> {
    let mut rank: Vec<Option<usize>> = vec![None; count];
    let mut groups: Vec<Vec<L>> = Vec::new();
    for (label, id) in labels.into_iter().zip(component) {
        let Some(id) = *id else { continue };
        let slot = *rank[id].get_or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(label);
    }
    groups
}
