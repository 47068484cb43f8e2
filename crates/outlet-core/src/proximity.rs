//! Neighbor detection: which outlets lie within a radius of a focal outlet.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::entity::{EntityId, Outlet};
use crate::geo::distance_km;

/// Radius, in kilometers, within which two outlets count as neighbors.
pub const DEFAULT_NEIGHBOR_RADIUS_KM: f64 = 5.0;

/// Converts a radius in kilometers to meters, the unit map circles are drawn in.
#[must_use]
pub fn radius_meters(radius_km: f64) -> f64 {
    radius_km * 1000.0
}

/// An outlet near the focal outlet, with its distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub id: EntityId,
    pub name: String,
    pub distance_km: f64,
}

/// Source of neighbor sets for a focal outlet.
///
/// [`LinearScanIndex`] is enough for city-scale collections; a spatial index
/// can implement this trait without changing callers.
pub trait NeighborIndex {
    /// Ids of every outlet other than `focal` within `radius_km` (inclusive).
    fn neighbors_within(&self, focal: &Outlet, radius_km: f64) -> BTreeSet<EntityId>;

    /// Same membership as [`NeighborIndex::neighbors_within`], nearest first.
    fn nearest_within(&self, focal: &Outlet, radius_km: f64) -> Vec<Neighbor>;
}

/// Brute-force O(n) scan over a borrowed outlet slice.
#[derive(Debug, Clone, Copy)]
pub struct LinearScanIndex<'a> {
    outlets: &'a [Outlet],
}

impl<'a> LinearScanIndex<'a> {
    #[must_use]
    pub fn new(outlets: &'a [Outlet]) -> Self {
        Self { outlets }
    }

    fn scan<'s>(
        &'s self,
        focal: &'s Outlet,
        radius_km: f64,
    ) -> impl Iterator<Item = (&'a Outlet, f64)> + 's {
        let origin = focal.coordinate();
        self.outlets.iter().filter_map(move |other| {
            if other.id == focal.id {
                return None;
            }
            let distance = distance_km(origin?, other.coordinate()?);
            (distance <= radius_km).then_some((other, distance))
        })
    }
}

impl NeighborIndex for LinearScanIndex<'_> {
    fn neighbors_within(&self, focal: &Outlet, radius_km: f64) -> BTreeSet<EntityId> {
        self.scan(focal, radius_km)
            .map(|(outlet, _)| outlet.id.clone())
            .collect()
    }

    fn nearest_within(&self, focal: &Outlet, radius_km: f64) -> Vec<Neighbor> {
        let mut neighbors: Vec<Neighbor> = self
            .scan(focal, radius_km)
            .map(|(outlet, distance)| Neighbor {
                id: outlet.id.clone(),
                name: outlet.name.clone(),
                distance_km: distance,
            })
            .collect();
        neighbors.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then_with(|| a.id.cmp(&b.id))
        });
        neighbors
    }
}

/// Ids of all outlets in `all` within `threshold_km` of `focal`.
///
/// The focal outlet is never its own neighbor, and outlets without a valid
/// coordinate are skipped. A focal outlet without a valid coordinate has no
/// neighbors.
#[must_use]
pub fn find_neighbors(focal: &Outlet, all: &[Outlet], threshold_km: f64) -> BTreeSet<EntityId> {
    LinearScanIndex::new(all).neighbors_within(focal, threshold_km)
}

/// Like [`find_neighbors`], with distances, sorted nearest first.
#[must_use]
pub fn neighbors_with_distance(focal: &Outlet, all: &[Outlet], threshold_km: f64) -> Vec<Neighbor> {
    LinearScanIndex::new(all).nearest_within(focal, threshold_km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::EARTH_RADIUS_KM;

    fn klcc() -> Outlet {
        Outlet::new("klcc", "KLCC", 3.1579, 101.7116)
    }

    /// ~1.7 km south-east of KLCC.
    fn pavilion() -> Outlet {
        Outlet::new("pavilion", "Pavilion", 3.1490, 101.7236)
    }

    /// ~48 km south of KLCC.
    fn nilai() -> Outlet {
        Outlet::new("nilai", "Nilai", 2.7260, 101.7500)
    }

    /// Outlet due north of the origin, `km` away along the meridian.
    fn north_of_origin(id: &str, km: f64) -> Outlet {
        let lat = (km / EARTH_RADIUS_KM).to_degrees();
        Outlet::new(id, id, lat, 0.0)
    }

    #[test]
    fn finds_close_outlet_and_excludes_far_one() {
        let all = vec![klcc(), pavilion(), nilai()];
        let near = distance_km(
            klcc().coordinate().unwrap(),
            pavilion().coordinate().unwrap(),
        );
        let far = distance_km(
            klcc().coordinate().unwrap(),
            nilai().coordinate().unwrap(),
        );
        assert!(near < 3.0, "fixture drifted: {near}");
        assert!(far > 40.0, "fixture drifted: {far}");

        let neighbors = find_neighbors(&klcc(), &all, DEFAULT_NEIGHBOR_RADIUS_KM);
        assert_eq!(neighbors, BTreeSet::from([EntityId::from("pavilion")]));
    }

    #[test]
    fn boundary_distance_is_inclusive() {
        let origin = Outlet::new("origin", "origin", 0.0, 0.0);
        let edge = north_of_origin("edge", 5.0);
        let exact = distance_km(origin.coordinate().unwrap(), edge.coordinate().unwrap());
        assert!((exact - 5.0).abs() < 1e-9, "constructed distance was {exact}");

        let all = vec![origin.clone(), edge];
        let neighbors = find_neighbors(&origin, &all, exact);
        assert!(neighbors.contains(&EntityId::from("edge")));
    }

    #[test]
    fn just_past_the_boundary_is_excluded() {
        let origin = Outlet::new("origin", "origin", 0.0, 0.0);
        let all = vec![origin.clone(), north_of_origin("beyond", 5.001)];
        assert!(find_neighbors(&origin, &all, 5.0).is_empty());
    }

    #[test]
    fn focal_is_never_its_own_neighbor() {
        let all = vec![klcc(), pavilion(), nilai()];
        for threshold in [0.0, 5.0, 100.0, 20_000.0] {
            for focal in &all {
                let neighbors = find_neighbors(focal, &all, threshold);
                assert!(!neighbors.contains(&focal.id), "threshold {threshold}");
            }
        }
    }

    #[test]
    fn colocated_outlets_are_neighbors_at_zero_radius() {
        let a = Outlet::new("a", "a", 3.0, 101.0);
        let b = Outlet::new("b", "b", 3.0, 101.0);
        let all = vec![a.clone(), b];
        assert_eq!(
            find_neighbors(&a, &all, 0.0),
            BTreeSet::from([EntityId::from("b")])
        );
    }

    #[test]
    fn outlets_without_coordinates_are_skipped() {
        let mut broken = pavilion();
        broken.id = EntityId::from("broken");
        broken.latitude = None;
        let mut out_of_range = pavilion();
        out_of_range.id = EntityId::from("out-of-range");
        out_of_range.longitude = Some(250.0);

        let all = vec![klcc(), pavilion(), broken, out_of_range];
        assert_eq!(
            find_neighbors(&klcc(), &all, DEFAULT_NEIGHBOR_RADIUS_KM),
            BTreeSet::from([EntityId::from("pavilion")])
        );
    }

    #[test]
    fn focal_without_coordinates_has_no_neighbors() {
        let mut focal = klcc();
        focal.latitude = None;
        let all = vec![focal.clone(), pavilion()];
        assert!(find_neighbors(&focal, &all, 1_000.0).is_empty());
    }

    #[test]
    fn result_depends_only_on_inputs() {
        let all = vec![nilai(), pavilion(), klcc()];
        let first = find_neighbors(&klcc(), &all, 60.0);
        let mut reversed = all.clone();
        reversed.reverse();
        let second = find_neighbors(&klcc(), &reversed, 60.0);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn nearest_within_sorts_by_distance() {
        let origin = Outlet::new("origin", "origin", 0.0, 0.0);
        let all = vec![
            origin.clone(),
            north_of_origin("three", 3.0),
            north_of_origin("one", 1.0),
            north_of_origin("far", 9.0),
        ];
        let neighbors = neighbors_with_distance(&origin, &all, 5.0);
        let ids: Vec<String> = neighbors.iter().map(|n| n.id.to_string()).collect();
        assert_eq!(ids, ["one", "three"]);
        assert!((neighbors[0].distance_km - 1.0).abs() < 1e-9);
    }

    #[test]
    fn radius_meters_converts_kilometers() {
        assert!((radius_meters(DEFAULT_NEIGHBOR_RADIUS_KM) - 5000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn index_trait_matches_free_function() {
        let all = vec![klcc(), pavilion(), nilai()];
        let index = LinearScanIndex::new(&all);
        assert_eq!(
            index.neighbors_within(&klcc(), 5.0),
            find_neighbors(&klcc(), &all, 5.0)
        );
    }
}
