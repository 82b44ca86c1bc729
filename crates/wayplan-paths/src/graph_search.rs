//! Heuristic graph search: near-shortest corridors with a density-aware
//! cost term.

use wayplan_core::{NavGraph, NavNode, PathQuery, PathTask, PlanFailure, PlannerHints};

use crate::heap::MinHeap;
use crate::planner::{NO_PARENT, PathPlanner, PlannerKind, SearchScratch};

/// A\*-style planner over the external navigation graph.
///
/// Edge cost is geometric edge length plus `density_multiplier *` the local
/// density sample at the edge's target (0 disables the term); the heuristic
/// is straight-line distance to the goal, which never overestimates. Every
/// request completes synchronously in the same call.
pub struct GraphSearchPlanner {
    open: MinHeap<u32>,
    scratch: SearchScratch,
    density_multiplier: f32,
    max_expansions: usize,
}

impl GraphSearchPlanner {
    pub fn new() -> Self {
        Self {
            open: MinHeap::new(),
            scratch: SearchScratch::new(),
            density_multiplier: 0.0,
            max_expansions: usize::MAX,
        }
    }

    pub fn with_density_multiplier(multiplier: f32) -> Self {
        let mut p = Self::new();
        p.density_multiplier = multiplier;
        p
    }

    /// Bound the number of node expansions a single request may perform.
    /// A capped-out search fails rather than stalling the frame.
    pub fn set_max_expansions(&mut self, cap: usize) {
        self.max_expansions = cap;
    }

    fn search(&mut self, graph: &dyn NavGraph, query: &PathQuery) -> PathTask {
        let Some(start) = graph.nearest_node(query.start, query.agent_radius, query.area_mask)
        else {
            log::debug!("graph search: start {:?} is off the navigable surface", query.start);
            return PathTask::failed(PlanFailure::InvalidQuery);
        };
        let Some(goal) = graph.nearest_node(query.goal, query.agent_radius, query.area_mask)
        else {
            log::debug!("graph search: goal {:?} is off the navigable surface", query.goal);
            return PathTask::failed(PlanFailure::InvalidQuery);
        };

        let start_idx = start.index();
        let goal_idx = goal.index();
        if start_idx == goal_idx {
            return PathTask::success(vec![query.start, query.goal]);
        }

        // Crowd-averse queries get the density term even if tuning left the
        // multiplier at zero.
        let density_mult = if query.hints.contains(PlannerHints::AVOID_CROWDS) {
            self.density_multiplier.max(1.0)
        } else {
            self.density_multiplier
        };
        let goal_pos = graph.position(goal);

        let cur_gen = self.scratch.begin(graph.node_count());
        {
            let node = &mut self.scratch.nodes[start_idx];
            node.g = 0.0;
            node.parent = NO_PARENT;
            node.generation = cur_gen;
            node.open = true;
        }
        self.open.clear();
        self.open
            .push(graph.position(start).distance(goal_pos), start_idx as u32);

        let mut nbuf = std::mem::take(&mut self.scratch.nbuf);
        let mut expansions = 0usize;
        let mut found = false;
        let mut capped = false;

        while let Some((current, _)) = self.open.pop() {
            let ci = current as usize;
            {
                let n = &self.scratch.nodes[ci];
                // Skip stale entries.
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
                    "graph search: expansion cap {} hit before reaching goal",
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
                let next_pos = graph.position(np);
                let step = current_pos.distance(next_pos) + density_mult * graph.density(np);
                let tentative = current_g + step;

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
                self.open.push(tentative + next_pos.distance(goal_pos), ni as u32);
            }
        }

        self.scratch.nbuf = nbuf;

        if !found {
            if !capped {
                log::debug!(
                    "graph search: open set exhausted, no route {:?} -> {:?}",
                    query.start,
                    query.goal
                );
            }
            return PathTask::failed(PlanFailure::PlanningFailed);
        }
        PathTask::success(self.scratch.reconstruct(graph, query, goal_idx))
    }
}

impl Default for GraphSearchPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl PathPlanner for GraphSearchPlanner {
    fn kind(&self) -> PlannerKind {
        PlannerKind::GraphSearch
    }

    fn request_path(&mut self, graph: &dyn NavGraph, query: &PathQuery) -> PathTask {
        self.search(graph, query)
    }

    fn set_density_multiplier(&mut self, multiplier: f32) {
        self.density_multiplier = multiplier;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testgrid::GridNav;
    use glam::Vec3;

    #[test]
    fn two_node_edge_has_length_five() {
        // Two nodes five units apart, one edge between them.
        let grid = GridNav::line(&[0.0, 5.0]);
        let mut planner = GraphSearchPlanner::new();
        let query = PathQuery::new(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0));

        let task = planner.request_path(&grid, &query);
        assert!(task.completed);
        assert!(task.succeeded);
        assert_eq!(task.corners.len(), 2);
        assert!((task.path_length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn disconnected_components_fail_closed() {
        let mut grid = GridNav::open(11, 3);
        for z in 0..3 {
            grid.block(5, z);
        }
        let mut planner = GraphSearchPlanner::new();
        let query = PathQuery::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));

        let task = planner.request_path(&grid, &query);
        assert!(task.completed);
        assert!(!task.succeeded);
        assert!(task.corners.is_empty());
        assert_eq!(task.failure, Some(PlanFailure::PlanningFailed));
    }

    #[test]
    fn off_mesh_query_is_invalid_not_a_panic() {
        let grid = GridNav::open(4, 4);
        let mut planner = GraphSearchPlanner::new();
        let query = PathQuery::new(Vec3::new(-50.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));

        let task = planner.request_path(&grid, &query);
        assert!(!task.succeeded);
        assert_eq!(task.failure, Some(PlanFailure::InvalidQuery));
    }

    #[test]
    fn endpoints_are_exact() {
        let grid = GridNav::open(11, 3);
        let mut planner = GraphSearchPlanner::new();
        let start = Vec3::new(0.2, 0.0, 1.1);
        let goal = Vec3::new(9.8, 0.0, 0.9);
        let task = planner.request_path(&grid, &PathQuery::new(start, goal));

        assert!(task.succeeded);
        assert_eq!(task.corners.first(), Some(&start));
        assert_eq!(task.corners.last(), Some(&goal));
    }

    #[test]
    fn density_term_biases_away_from_crowds() {
        // Three lanes east; the middle lane is crowded.
        let mut grid = GridNav::open(11, 3);
        for x in 1..10 {
            grid.set_density(x, 1, 10.0);
        }
        let start = Vec3::new(0.0, 0.0, 1.0);
        let goal = Vec3::new(10.0, 0.0, 1.0);

        let mut plain = GraphSearchPlanner::new();
        let direct = plain.request_path(&grid, &PathQuery::new(start, goal));
        assert!(direct.succeeded);

        let mut averse = GraphSearchPlanner::with_density_multiplier(5.0);
        let detour = averse.request_path(&grid, &PathQuery::new(start, goal));
        assert!(detour.succeeded);

        // The crowd-averse route leaves the middle lane; the plain one
        // stays in it and is geometrically shorter.
        assert!(detour.path_length() > direct.path_length());
        assert!(
            detour
                .corners
                .iter()
                .skip(1)
                .take(detour.corners.len().saturating_sub(2))
                .all(|c| c.z != 1.0)
        );
    }

    #[test]
    fn avoid_crowds_hint_applies_with_zero_multiplier() {
        let mut grid = GridNav::open(11, 3);
        for x in 1..10 {
            grid.set_density(x, 1, 10.0);
        }
        let start = Vec3::new(0.0, 0.0, 1.0);
        let goal = Vec3::new(10.0, 0.0, 1.0);

        let mut planner = GraphSearchPlanner::new();
        let query = PathQuery::new(start, goal).with_hints(PlannerHints::AVOID_CROWDS);
        let task = planner.request_path(&grid, &query);
        assert!(task.succeeded);
        assert!(task.path_length() > 10.0 + 1e-3);
    }

    #[test]
    fn area_mask_excludes_region_classes() {
        use wayplan_core::AreaMask;

        // Middle lane marked as area class 1; query forbids it.
        let mut grid = GridNav::open(11, 3);
        for x in 1..10 {
            grid.set_area(x, 1, 1);
        }
        let start = Vec3::new(0.0, 0.0, 1.0);
        let goal = Vec3::new(10.0, 0.0, 1.0);
        let query = PathQuery::new(start, goal).with_area_mask(AreaMask(1 << 0));

        let mut planner = GraphSearchPlanner::new();
        let task = planner.request_path(&grid, &query);
        assert!(task.succeeded);
        assert!(task.path_length() > 10.0 + 1e-3);

        // The sentinel mask allows the direct lane.
        let all = planner.request_path(&grid, &PathQuery::new(start, goal));
        assert!((all.path_length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn same_node_query_degenerates_to_direct_corridor() {
        let grid = GridNav::open(4, 4);
        let mut planner = GraphSearchPlanner::new();
        let query = PathQuery::new(Vec3::new(1.1, 0.0, 1.0), Vec3::new(0.9, 0.0, 1.0));

        let task = planner.request_path(&grid, &query);
        assert!(task.succeeded);
        assert_eq!(task.corners.len(), 2);
    }

    #[test]
    fn expansion_cap_fails_instead_of_stalling() {
        let grid = GridNav::open(20, 20);
        let mut planner = GraphSearchPlanner::new();
        planner.set_max_expansions(3);
        let query = PathQuery::new(Vec3::ZERO, Vec3::new(19.0, 0.0, 19.0));

        let task = planner.request_path(&grid, &query);
        assert!(!task.succeeded);
        assert_eq!(task.failure, Some(PlanFailure::PlanningFailed));
    }

    #[test]
    fn planner_reuse_across_searches() {
        let grid = GridNav::open(8, 8);
        let mut planner = GraphSearchPlanner::new();
        for i in 0..5 {
            let goal = Vec3::new(7.0, 0.0, i as f32);
            let task = planner.request_path(&grid, &PathQuery::new(Vec3::ZERO, goal));
            assert!(task.succeeded, "search {i} failed");
        }
    }
}
