//! Radar editing service.
//!
//! # Invariants
//! - Listed items always start unmodified.
//! - Only items marked changed are written back.
//! - The service never bypasses repository validation or batch atomicity.

use crate::model::radar::{Radar, RadarLabelNames, RadarRecord};
use crate::model::tracked::{track_all, Tracked};
use crate::repo::error::RepoResult;
use crate::repo::radar_repo::RadarRepository;

/// Use-case wrapper around a `RadarRepository`.
pub struct RadarService<R: RadarRepository> {
    repo: R,
}

impl<R: RadarRepository> RadarService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Loads radars under one shiploader (`0` = all) for editing, by id.
    pub fn load_radars(&self, shiploader_id: i64) -> RepoResult<Vec<Tracked<RadarRecord>>> {
        Ok(track_all(self.repo.list_by_shiploader_id(shiploader_id)?))
    }

    /// Loads the label-name projection for editing, by id.
    pub fn load_label_names(&self) -> RepoResult<Vec<Tracked<RadarLabelNames>>> {
        Ok(track_all(self.repo.list_label_names_by_id()?))
    }

    /// Saves every changed radar in one transaction.
    ///
    /// Returns `true` when nothing changed or the batch committed.
    pub fn save_changed(&self, records: &[Tracked<RadarRecord>]) -> RepoResult<bool> {
        let radars: Vec<Radar> = changed_items(records)
            .into_iter()
            .map(|record| record.radar)
            .collect();
        self.repo.save_radars(&radars)
    }

    /// Saves every changed label-name row from `load_label_names` in one
    /// transaction.
    pub fn save_changed_label_names(
        &self,
        labels: &[Tracked<RadarLabelNames>],
    ) -> RepoResult<bool> {
        self.repo.save_label_names(&changed_items(labels))
    }

    pub fn delete_radar(&self, id: i64) -> RepoResult<usize> {
        self.repo.delete_radar(id)
    }
}

fn changed_items<T: Clone>(items: &[Tracked<T>]) -> Vec<T> {
    items
        .iter()
        .filter(|item| item.is_changed())
        .map(|item| item.get().clone())
        .collect()
}
