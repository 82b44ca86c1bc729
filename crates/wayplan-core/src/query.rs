//! The path request contract: [`PathQuery`], [`PlannerHints`], [`AreaMask`].

use glam::Vec3;

// ---------------------------------------------------------------------------
// PlannerHints
// ---------------------------------------------------------------------------

/// Bitflags a caller attaches to a query to steer planner selection.
///
/// Hints are orthogonal; any combination may be set. Selection only consults
/// [`MANY_AGENTS_TO_SAME_GOAL`](Self::MANY_AGENTS_TO_SAME_GOAL),
/// [`HIGH_DYNAMICS`](Self::HIGH_DYNAMICS) and
/// [`NO_GOOD_HEURISTIC`](Self::NO_GOOD_HEURISTIC); the remaining flags are
/// carried through for planners and downstream movement consumers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerHints(pub u8);

impl PlannerHints {
    pub const NONE: Self = Self(0);
    /// Many agents are heading to one shared destination.
    pub const MANY_AGENTS_TO_SAME_GOAL: Self = Self(1 << 0);
    /// The surrounding topology mutates faster than a heuristic search can
    /// exploit.
    pub const HIGH_DYNAMICS: Self = Self(1 << 1);
    /// No admissible cost-to-goal estimate is available.
    pub const NO_GOOD_HEURISTIC: Self = Self(1 << 2);
    /// Prefer straighter corridors over strictly shortest ones.
    pub const PREFER_STRAIGHT: Self = Self(1 << 3);
    /// Bias the route away from crowded regions.
    pub const AVOID_CROWDS: Self = Self(1 << 4);
    /// Charge-style movement; consumed by movement controllers.
    pub const BOSS_CHARGE: Self = Self(1 << 5);

    /// Whether this set contains all bits of `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for PlannerHints {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for PlannerHints {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// AreaMask
// ---------------------------------------------------------------------------

/// Bitmask restricting which traversable region classes a query may use.
///
/// Bit `n` set means area class `n` is allowed. [`AreaMask::ALL`] (every bit
/// set) is the "all areas" sentinel and the default.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaMask(pub u32);

impl AreaMask {
    /// Every area class allowed.
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    /// Whether area class `area` (a bit index) is allowed by this mask.
    #[inline]
    pub const fn allows(self, area: u32) -> bool {
        self.0 & (1 << area) != 0
    }

    /// Whether this mask contains all bits of `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for AreaMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl std::ops::BitOr for AreaMask {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for AreaMask {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// GroupId
// ---------------------------------------------------------------------------

/// Correlates queries that should share planner state, e.g. all agents
/// flowing toward one flow field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupId(pub u32);

impl GroupId {
    /// The query belongs to no group.
    pub const NONE: Self = Self(0);
}

// ---------------------------------------------------------------------------
// PathQuery
// ---------------------------------------------------------------------------

/// A path request. Immutable once submitted to the service.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathQuery {
    pub start: Vec3,
    pub goal: Vec3,
    /// Traversable region classes this query may use.
    pub area_mask: AreaMask,
    /// Clearance requirement; also the snap radius when resolving `start`
    /// and `goal` onto the navigation graph.
    pub agent_radius: f32,
    pub hints: PlannerHints,
    pub group_id: GroupId,
}

impl PathQuery {
    /// A query from `start` to `goal` with default mask, radius and hints.
    pub fn new(start: Vec3, goal: Vec3) -> Self {
        Self {
            start,
            goal,
            area_mask: AreaMask::ALL,
            agent_radius: 0.5,
            hints: PlannerHints::NONE,
            group_id: GroupId::NONE,
        }
    }

    #[inline]
    pub fn with_hints(mut self, hints: PlannerHints) -> Self {
        self.hints = hints;
        self
    }

    #[inline]
    pub fn with_area_mask(mut self, mask: AreaMask) -> Self {
        self.area_mask = mask;
        self
    }

    #[inline]
    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group_id = group;
        self
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn query_round_trip() {
        let q = PathQuery::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0))
            .with_hints(PlannerHints::AVOID_CROWDS)
            .with_area_mask(AreaMask(0b101));
        let json = serde_json::to_string(&q).unwrap();
        let back: PathQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(q, back);
    }
}
