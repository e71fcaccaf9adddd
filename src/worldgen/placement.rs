use rand::Rng;
use rand::RngCore;

use crate::hex::{HexPos, hex_distance};
use crate::model::{Holding, Landmark, LandmarkKind, Myth, RealmMap};

use super::names::NameBook;

/// Minimum hex distance between two holdings.
pub const HOLDING_SPACING: u32 = 3;

/// Landmarks must be farther than this from every other feature.
pub const LANDMARK_CLEARANCE: u32 = 1;

/// Minimum hex distance from a myth to any holding or other myth.
pub const MYTH_SPACING: u32 = 3;

/// Outcome of placing one category of feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementReport {
    pub requested: u32,
    pub placed: u32,
}

impl PlacementReport {
    pub fn shortfall(&self) -> u32 {
        self.requested - self.placed
    }

    pub fn is_complete(&self) -> bool {
        self.placed == self.requested
    }

    fn record(&mut self, placed: bool) {
        self.requested += 1;
        if placed {
            self.placed += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Validity rules
// ---------------------------------------------------------------------------

/// Free cell, and at least `HOLDING_SPACING` from every holding.
pub fn is_valid_holding_position(realm: &RealmMap, pos: HexPos) -> bool {
    !realm.has_feature_at(pos)
        && realm
            .holdings()
            .iter()
            .all(|h| hex_distance(pos, h.pos) >= HOLDING_SPACING)
}

/// Free cell, and not adjacent to any holding, landmark or myth.
pub fn is_valid_landmark_position(realm: &RealmMap, pos: HexPos) -> bool {
    !realm.has_feature_at(pos)
        && realm
            .features()
            .all(|f| hex_distance(pos, f.pos()) > LANDMARK_CLEARANCE)
}

/// Free cell, and at least `MYTH_SPACING` from every holding and every myth.
///
/// Landmarks are deliberately not consulted: a myth may sit next to a
/// landmark even though a landmark may not sit next to a myth.
pub fn is_valid_myth_position(realm: &RealmMap, pos: HexPos) -> bool {
    !realm.has_feature_at(pos)
        && realm
            .holdings()
            .iter()
            .all(|h| hex_distance(pos, h.pos) >= MYTH_SPACING)
        && realm
            .myths()
            .iter()
            .all(|m| hex_distance(pos, m.pos) >= MYTH_SPACING)
}

/// Try up to `max_attempts` uniformly random cells and return the first one
/// accepted by `is_valid`.
pub fn find_valid_position(
    realm: &RealmMap,
    is_valid: fn(&RealmMap, HexPos) -> bool,
    max_attempts: u32,
    rng: &mut dyn RngCore,
) -> Option<HexPos> {
    if realm.is_empty() {
        return None;
    }
    (0..max_attempts)
        .map(|_| {
            HexPos::new(
                rng.random_range(0..realm.rows()) as i32,
                rng.random_range(0..realm.cols()) as i32,
            )
        })
        .find(|&pos| is_valid(realm, pos))
}

/// A placement rule broken by a realm, typically one edited by hand or
/// loaded from a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementViolation {
    #[error("more than one feature at {0}")]
    SharedCell(HexPos),

    #[error("holdings at {a} and {b} are {distance} apart (minimum {min})", min = HOLDING_SPACING)]
    HoldingsTooClose { a: HexPos, b: HexPos, distance: u32 },

    #[error("landmark at {landmark} is {distance} from the feature at {other}")]
    LandmarkCrowded {
        landmark: HexPos,
        other: HexPos,
        distance: u32,
    },

    #[error(
        "myth at {myth} is {distance} from the feature at {other} (minimum {min})",
        min = MYTH_SPACING
    )]
    MythTooClose {
        myth: HexPos,
        other: HexPos,
        distance: u32,
    },

    #[error("{0} holdings are marked as the seat of power")]
    MultipleSeats(usize),
}

/// Re-check every placement rule against the features currently on `realm`.
///
/// Each offending pair is reported once.
pub fn placement_violations(realm: &RealmMap) -> Vec<PlacementViolation> {
    let mut violations = Vec::new();

    let mut occupied: Vec<HexPos> = realm.features().map(|f| f.pos()).collect();
    occupied.sort();
    let mut shared: Vec<HexPos> = occupied
        .windows(2)
        .filter(|w| w[0] == w[1])
        .map(|w| w[0])
        .collect();
    shared.dedup();
    violations.extend(shared.into_iter().map(PlacementViolation::SharedCell));

    let holdings = realm.holdings();
    for (i, a) in holdings.iter().enumerate() {
        for b in &holdings[i + 1..] {
            let distance = hex_distance(a.pos, b.pos);
            if distance < HOLDING_SPACING {
                violations.push(PlacementViolation::HoldingsTooClose {
                    a: a.pos,
                    b: b.pos,
                    distance,
                });
            }
        }
    }

    let seats = holdings.iter().filter(|h| h.is_seat_of_power).count();
    if seats > 1 {
        violations.push(PlacementViolation::MultipleSeats(seats));
    }

    // Same-cell pairs are already covered by SharedCell. Myths are placed
    // after landmarks and never check them, so landmark-myth pairs are not
    // a violation.
    for (i, landmark) in realm.landmarks().iter().enumerate() {
        let others = holdings
            .iter()
            .map(|h| h.pos)
            .chain(realm.landmarks()[i + 1..].iter().map(|l| l.pos));
        for other in others {
            let distance = hex_distance(landmark.pos, other);
            if distance > 0 && distance <= LANDMARK_CLEARANCE {
                violations.push(PlacementViolation::LandmarkCrowded {
                    landmark: landmark.pos,
                    other,
                    distance,
                });
            }
        }
    }

    for (i, myth) in realm.myths().iter().enumerate() {
        let others = holdings
            .iter()
            .map(|h| h.pos)
            .chain(realm.myths()[i + 1..].iter().map(|m| m.pos));
        for other in others {
            let distance = hex_distance(myth.pos, other);
            if distance > 0 && distance < MYTH_SPACING {
                violations.push(PlacementViolation::MythTooClose {
                    myth: myth.pos,
                    other,
                    distance,
                });
            }
        }
    }

    violations
}

// ---------------------------------------------------------------------------
// FeaturePlacer
// ---------------------------------------------------------------------------

/// Places features by rejection sampling. Each placed feature is visible to
/// the validity checks of every later one.
#[derive(Debug, Clone)]
pub struct FeaturePlacer {
    names: NameBook,
    max_attempts: u32,
}

impl FeaturePlacer {
    pub fn new(names: NameBook, max_attempts: u32) -> Self {
        Self {
            names,
            max_attempts,
        }
    }

    /// Place up to `count` holdings; the first one placed is the seat of power.
    pub fn place_holdings(
        &mut self,
        realm: &mut RealmMap,
        count: u32,
        rng: &mut dyn RngCore,
    ) -> PlacementReport {
        let mut report = PlacementReport::default();
        for i in 0..count {
            let placed =
                match find_valid_position(realm, is_valid_holding_position, self.max_attempts, rng)
                {
                    Some(pos) => {
                        let is_seat = report.placed == 0;
                        let name = self.names.holding(rng);
                        realm.add_holding(Holding::new(pos, is_seat, name))
                    }
                    None => {
                        tracing::warn!(
                            "could not place holding {} of {count} due to placement constraints",
                            i + 1
                        );
                        false
                    }
                };
            report.record(placed);
        }
        report
    }

    /// Place `per_kind` landmarks of every landmark kind. Sanctums also get a seer.
    pub fn place_landmarks(
        &mut self,
        realm: &mut RealmMap,
        per_kind: u32,
        rng: &mut dyn RngCore,
    ) -> PlacementReport {
        let mut report = PlacementReport::default();
        for kind in LandmarkKind::ALL {
            for i in 0..per_kind {
                let placed = match find_valid_position(
                    realm,
                    is_valid_landmark_position,
                    self.max_attempts,
                    rng,
                ) {
                    Some(pos) => {
                        let mut landmark = Landmark::new(pos, kind, self.names.landmark(kind, rng));
                        if kind.has_seer() {
                            landmark = landmark.with_seer(self.names.seer(rng));
                        }
                        realm.add_landmark(landmark)
                    }
                    None => {
                        tracing::warn!(
                            "could not place {kind} landmark {} of {per_kind} due to placement constraints",
                            i + 1
                        );
                        false
                    }
                };
                report.record(placed);
            }
        }
        report
    }

    pub fn place_myths(
        &mut self,
        realm: &mut RealmMap,
        count: u32,
        rng: &mut dyn RngCore,
    ) -> PlacementReport {
        let mut report = PlacementReport::default();
        for i in 0..count {
            let placed =
                match find_valid_position(realm, is_valid_myth_position, self.max_attempts, rng) {
                    Some(pos) => {
                        let name = self.names.myth(rng);
                        realm.add_myth(Myth::new(pos, name))
                    }
                    None => {
                        tracing::warn!(
                            "could not place myth {} of {count} due to placement constraints",
                            i + 1
                        );
                        false
                    }
                };
            report.record(placed);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn placer() -> FeaturePlacer {
        FeaturePlacer::new(NameBook::new(), 100)
    }

    #[test]
    fn holding_rules() {
        let mut realm = RealmMap::new("Test", 8, 8);
        realm.add_holding(Holding::new(HexPos::new(4, 4), true, "Castle"));
        assert!(!is_valid_holding_position(&realm, HexPos::new(4, 4)));
        assert!(!is_valid_holding_position(&realm, HexPos::new(4, 6)));
        assert!(is_valid_holding_position(&realm, HexPos::new(4, 7)));
        assert!(is_valid_holding_position(&realm, HexPos::new(1, 4)));
    }

    #[test]
    fn landmark_rules_cover_every_feature() {
        let mut realm = RealmMap::new("Test", 8, 8);
        realm.add_myth(Myth::new(HexPos::new(2, 2), "The Wall"));
        assert!(!is_valid_landmark_position(&realm, HexPos::new(2, 2)));
        assert!(!is_valid_landmark_position(&realm, HexPos::new(2, 3)));
        assert!(is_valid_landmark_position(&realm, HexPos::new(2, 4)));

        realm.add_landmark(Landmark::new(HexPos::new(6, 6), LandmarkKind::Ruin, "Skull heap"));
        assert!(!is_valid_landmark_position(&realm, HexPos::new(6, 5)));
    }

    #[test]
    fn myth_rules_ignore_landmarks() {
        let mut realm = RealmMap::new("Test", 8, 8);
        realm.add_landmark(Landmark::new(HexPos::new(3, 3), LandmarkKind::Curse, "Icy mist"));
        // Adjacent to a landmark is fine for a myth...
        assert!(is_valid_myth_position(&realm, HexPos::new(3, 4)));
        // ...but not on top of it.
        assert!(!is_valid_myth_position(&realm, HexPos::new(3, 3)));

        realm.add_myth(Myth::new(HexPos::new(0, 0), "The Dead"));
        assert!(!is_valid_myth_position(&realm, HexPos::new(0, 2)));
        assert!(is_valid_myth_position(&realm, HexPos::new(0, 3)));
    }

    #[test]
    fn first_holding_is_seat_of_power() {
        let mut realm = RealmMap::new("Test", 12, 12);
        let mut rng = SmallRng::seed_from_u64(42);
        let report = placer().place_holdings(&mut realm, 4, &mut rng);
        assert_eq!(report.requested, 4);
        assert_eq!(report.placed as usize, realm.holdings().len());
        assert!(realm.holdings()[0].is_seat_of_power);
        assert_eq!(realm.holdings().iter().filter(|h| h.is_seat_of_power).count(), 1);
    }

    #[test]
    fn crowded_map_reports_shortfall() {
        // A 2x2 grid has room for exactly one holding.
        let mut realm = RealmMap::new("Test", 2, 2);
        let mut rng = SmallRng::seed_from_u64(1);
        let report = placer().place_holdings(&mut realm, 3, &mut rng);
        assert_eq!(report.requested, 3);
        assert_eq!(report.placed, 1);
        assert_eq!(report.shortfall(), 2);
        assert!(!report.is_complete());
    }

    #[test]
    fn empty_realm_places_nothing() {
        let mut realm = RealmMap::new("Test", 0, 0);
        let mut rng = SmallRng::seed_from_u64(1);
        let report = placer().place_myths(&mut realm, 2, &mut rng);
        assert_eq!(report.placed, 0);
        assert_eq!(report.requested, 2);
    }

    #[test]
    fn sanctums_get_seers() {
        let mut realm = RealmMap::new("Test", 20, 20);
        let mut rng = SmallRng::seed_from_u64(5);
        placer().place_landmarks(&mut realm, 2, &mut rng);
        assert!(!realm.landmarks().is_empty());
        for l in realm.landmarks() {
            assert_eq!(l.seer.is_some(), l.kind == LandmarkKind::Sanctum, "{l:?}");
        }
    }

    #[test]
    fn zero_attempts_never_places() {
        let mut realm = RealmMap::new("Test", 6, 6);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut placer = FeaturePlacer::new(NameBook::new(), 0);
        assert_eq!(placer.place_myths(&mut realm, 1, &mut rng).placed, 0);
    }

    #[test]
    fn generated_layout_has_no_violations() {
        let mut realm = RealmMap::new("Test", 16, 16);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut placer = placer();
        placer.place_holdings(&mut realm, 4, &mut rng);
        placer.place_landmarks(&mut realm, 2, &mut rng);
        placer.place_myths(&mut realm, 4, &mut rng);
        assert_eq!(placement_violations(&realm), vec![]);
    }

    #[test]
    fn hand_placed_features_are_flagged() {
        let mut realm = RealmMap::new("Test", 8, 8);
        realm.add_holding(Holding::new(HexPos::new(0, 0), true, "Castle"));
        realm.add_holding(Holding::new(HexPos::new(0, 2), true, "Tower"));
        realm.add_myth(Myth::new(HexPos::new(0, 2), "The Dead"));
        realm.add_landmark(Landmark::new(HexPos::new(5, 5), LandmarkKind::Ruin, "Skull heap"));
        realm.add_landmark(Landmark::new(HexPos::new(5, 6), LandmarkKind::Hazard, "Quicksand"));

        let violations = placement_violations(&realm);
        assert!(violations.contains(&PlacementViolation::SharedCell(HexPos::new(0, 2))));
        assert!(violations.contains(&PlacementViolation::HoldingsTooClose {
            a: HexPos::new(0, 0),
            b: HexPos::new(0, 2),
            distance: 2,
        }));
        assert!(violations.contains(&PlacementViolation::MultipleSeats(2)));
        assert!(violations.contains(&PlacementViolation::MythTooClose {
            myth: HexPos::new(0, 2),
            other: HexPos::new(0, 0),
            distance: 2,
        }));
        assert!(violations.contains(&PlacementViolation::LandmarkCrowded {
            landmark: HexPos::new(5, 5),
            other: HexPos::new(5, 6),
            distance: 1,
        }));
        assert_eq!(violations.len(), 5);
    }

    #[test]
    fn myth_beside_landmark_is_not_a_violation() {
        let mut realm = RealmMap::new("Test", 8, 8);
        realm.add_landmark(Landmark::new(HexPos::new(3, 3), LandmarkKind::Curse, "Icy mist"));
        realm.add_myth(Myth::new(HexPos::new(3, 4), "The Wall"));
        assert_eq!(placement_violations(&realm), vec![]);
    }
}
