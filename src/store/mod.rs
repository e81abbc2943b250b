//! Session-scoped observation table.
//!
//! Append-only: records are never edited, reordered or removed. Insertion
//! order is display order. The store lives as long as the `Session` that owns
//! it and nothing is written to disk unless an export is requested.

use crate::domain::Observation;

#[derive(Debug, Clone, Default)]
pub struct ObservationStore {
    observations: Vec<Observation>,
}

impl ObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record to the end of the table. No deduplication.
    pub fn append(&mut self, record: Observation) -> &Observation {
        self.observations.push(record);
        &self.observations[self.observations.len() - 1]
    }

    /// Every record, in insertion order.
    pub fn all(&self) -> &[Observation] {
        &self.observations
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// `(distance, velocity)` pairs in insertion order.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.observations.iter().map(Observation::point).collect()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObservationInput;
    use crate::physics::observe;

    fn obs(name: &str, m: f64) -> Observation {
        observe(&ObservationInput {
            galaxy: name.to_string(),
            object: "A".to_string(),
            m,
            k_measured: 3950.0,
            h_measured: 3985.0,
        })
    }

    #[test]
    fn starts_empty() {
        let store = ObservationStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.all().is_empty());
        assert!(store.last().is_none());
    }

    #[test]
    fn append_preserves_submission_order() {
        let mut store = ObservationStore::new();
        let names = ["NGC 1", "NGC 2", "NGC 3", "NGC 4", "NGC 5"];
        for (i, name) in names.iter().enumerate() {
            store.append(obs(name, 10.0 + i as f64));
        }

        assert_eq!(store.len(), names.len());
        let got: Vec<&str> = store.all().iter().map(|o| o.galaxy.as_str()).collect();
        assert_eq!(got, names);
        assert_eq!(store.last().map(|o| o.galaxy.as_str()), Some("NGC 5"));
    }

    #[test]
    fn duplicates_are_kept() {
        let mut store = ObservationStore::new();
        store.append(obs("M87", 12.0));
        store.append(obs("M87", 12.0));
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0], store.all()[1]);
    }

    #[test]
    fn points_follow_store_order() {
        let mut store = ObservationStore::new();
        store.append(obs("a", 10.0));
        store.append(obs("b", 15.0));
        let pts = store.points();
        assert_eq!(pts.len(), 2);
        assert!(pts[0].0 < pts[1].0);
        assert_eq!(pts[1], store.all()[1].point());
    }
}
