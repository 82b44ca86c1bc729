//! Uniform-cost (Dijkstra-style) search: no heuristic, correct anywhere.

use wayplan_core::{NavGraph, NavNode, PathQuery, PathTask, PlanFailure};

use crate::heap::MinHeap;
use crate::planner::{NO_PARENT, PathPlanner, PlannerKind, SearchScratch};

/// Dijkstra-style planner over the external navigation graph.
///
/// Same contract as [`GraphSearchPlanner`](crate::GraphSearchPlanner) but
/// with no cost-to-goal estimate, so it stays correct on sparse or irregular
/// graphs where no admissible heuristic exists and on topology that mutates
/// between frames. Slower on large maps; selection avoids it unless the
/// query hints indicate otherwise.
pub struct UniformCostPlanner {
    open: MinHeap<u32>,
    scratch: SearchScratch,
    max_expansions: usize,
}

impl UniformCostPlanner {
    pub fn new() -> Self {
        Self {
            open: MinHeap::new(),
            scratch: SearchScratch::new(),
            max_expansions: usize::MAX,
        }
    }

    /// Bound the number of node expansions a single request may perform.
    pub fn set_max_expansions(&mut self, cap: usize) {
        self.max_expansions = cap;
    }

    fn search(&mut self, graph: &dyn NavGraph, query: &PathQuery) -> PathTask {
        let Some(start) = graph.nearest_node(query.start, query.agent_radius, query.area_mask)
        else {
            log::debug!("uniform cost: start {:?} is off the navigable surface", query.start);
            return PathTask::failed(PlanFailure::InvalidQuery);
        };
        let Some(goal) = graph.nearest_node(query.goal, query.agent_radius, query.area_mask)
        else {
            log::debug!("uniform cost: goal {:?} is off the navigable surface", query.goal);
            return PathTask::failed(PlanFailure::InvalidQuery);
        };

        let start_idx = start.index();
        let goal_idx = goal.index();
        if start_idx == goal_idx {
            return PathTask::success(vec![query.start, query.goal]);
        }

        let cur_gen = self.scratch.begin(graph.node_count());
        {
            let node = &mut self.scratch.nodes[start_idx];
            node.g = 0.0;
            node.parent = NO_PARENT;
            node.generation = cur_gen;
            node.open = true;
        }
        self.open.clear();
        self.open.push(0.0, start_idx as u32);

        let mut nbuf = std::mem::take(&mut self.scratch.nbuf);
        let mut expansions = 0usize;
        let mut found = false;
        let mut capped = false;

        while let Some((current, _)) = self.open.pop() {
            let ci = current as usize;
            {
                let n = &self.scratch.nodes[ci];
                if n.generation != cur_gen || !n.open {
                    continue;
                }
            }
            if ci == goal_idx {
                found = true;
                break;
            }
            if expansions >= self.max_expansions {
                log::warn!(
                    "uniform cost: expansion cap {} hit before reaching goal",
                    self.max_expansions
                );
                capped = true;
                break;
            }
            expansions += 1;

            self.scratch.nodes[ci].open = false;
            let current_g = self.scratch.nodes[ci].g;
            let current_pos = graph.position(NavNode(current));

            nbuf.clear();
            graph.neighbors(NavNode(current), query.area_mask, &mut nbuf);

            for &np in nbuf.iter() {
                let ni = np.index();
                let Some(n) = self.scratch.nodes.get_mut(ni) else {
                    continue;
                };
                let tentative = current_g + current_pos.distance(graph.position(np));

                if n.generation == cur_gen {
                    if tentative >= n.g {
                        continue;
                    }
                } else {
                    n.generation = cur_gen;
                }

                n.g = tentative;
                n.parent = current;
                n.open = true;
                self.open.push(tentative, ni as u32);
            }
        }

        self.scratch.nbuf = nbuf;

        if !found {
            if !capped {
                log::debug!(
                    "uniform cost: open set exhausted, no route {:?} -> {:?}",
                    query.start,
                    query.goal
                );
            }
            return PathTask::failed(PlanFailure::PlanningFailed);
        }
        PathTask::success(self.scratch.reconstruct(graph, query, goal_idx))
    }
}

impl Default for UniformCostPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl PathPlanner for UniformCostPlanner {
    fn kind(&self) -> PlannerKind {
        PlannerKind::UniformCost
    }

    fn request_path(&mut self, graph: &dyn NavGraph, query: &PathQuery) -> PathTask {
        self.search(graph, query)
    }
}
