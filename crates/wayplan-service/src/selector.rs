//! Planner selection: a pure decision function over the query, the world
//! snapshot and the registered strategy tags.

use wayplan_core::{PathQuery, PlannerHints, WorldState};
use wayplan_paths::PlannerKind;

/// Pick the planner for a query.
///
/// A pure function of its three inputs, so selection is deterministic and
/// testable. The priority order is a contract — agents' perceived path
/// quality depends on it:
///
/// 1. Many agents to one goal, flow fields registered → flow field.
/// 2. High dynamics, uniform cost registered → uniform cost.
/// 3. Very large map, graph search registered → graph search.
/// 4. No good heuristic, uniform cost registered → uniform cost.
/// 5. Otherwise whichever of graph search, uniform cost, flow field is
///    registered, in that preference order.
/// 6. Nothing registered → `None`; the caller falls back to the external
///    navigation service's direct corridor query.
pub fn choose_planner(
    query: &PathQuery,
    world: &WorldState,
    registered: &[PlannerKind],
) -> Option<PlannerKind> {
    let has = |kind: PlannerKind| registered.contains(&kind);

    if query.hints.contains(PlannerHints::MANY_AGENTS_TO_SAME_GOAL) && has(PlannerKind::FlowField)
    {
        return Some(PlannerKind::FlowField);
    }
    if query.hints.contains(PlannerHints::HIGH_DYNAMICS) && has(PlannerKind::UniformCost) {
        return Some(PlannerKind::UniformCost);
    }
    if world.map_is_very_large && has(PlannerKind::GraphSearch) {
        return Some(PlannerKind::GraphSearch);
    }
    if query.hints.contains(PlannerHints::NO_GOOD_HEURISTIC) && has(PlannerKind::UniformCost) {
        return Some(PlannerKind::UniformCost);
    }
    [
        PlannerKind::GraphSearch,
        PlannerKind::UniformCost,
        PlannerKind::FlowField,
    ]
    .into_iter()
    .find(|&kind| has(kind))
}
