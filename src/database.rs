// 🗂️ NEO Database - Linking layer
//
// Owns every NearEarthObject and every CloseApproach (arena), and links them
// exactly once at construction:
//
//   designation → NeoId index
//   for each approach (source order):
//     found     → approach.neo = id, neo.approaches.push(approach id)
//     not found → approach stays unlinked, still kept for queries
//
// No mutation API after construction. The dataset is read-only from then on.

use crate::filters::ApproachFilter;
use crate::models::{ApproachId, CloseApproach, LinkedApproach, NearEarthObject, NeoId};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// A linked, read-only collection of NEOs and their close approaches
#[derive(Debug, Clone)]
pub struct NeoDatabase {
    neos: Vec<NearEarthObject>,
    approaches: Vec<CloseApproach>,

    /// designation → NEO (last record wins on duplicates)
    by_designation: HashMap<String, NeoId>,

    /// name → NEO, only for named NEOs
    by_name: HashMap<String, NeoId>,
}

impl NeoDatabase {
    /// Build the database and link approaches to their NEOs. O(N + M).
    pub fn new(mut neos: Vec<NearEarthObject>, mut approaches: Vec<CloseApproach>) -> Self {
        let mut by_designation = HashMap::with_capacity(neos.len());
        let mut by_name = HashMap::new();

        for (index, neo) in neos.iter().enumerate() {
            let id = NeoId(index);
            if let Some(previous) = by_designation.insert(neo.designation.clone(), id) {
                warn!(
                    designation = %neo.designation,
                    previous = previous.index(),
                    replacement = index,
                    "duplicate NEO designation, later record wins"
                );
            }
            if let Some(name) = &neo.name {
                by_name.insert(name.clone(), id);
            }
        }

        let mut unresolved = 0usize;
        for (index, approach) in approaches.iter_mut().enumerate() {
            match by_designation.get(approach.designation()) {
                Some(&neo_id) => {
                    approach.link(neo_id);
                    neos[neo_id.index()].push_approach(ApproachId(index));
                }
                None => {
                    unresolved += 1;
                    debug!(
                        designation = %approach.designation(),
                        "close approach references no loaded NEO"
                    );
                }
            }
        }

        info!(
            neos = neos.len(),
            approaches = approaches.len(),
            unresolved,
            "linked NEO database"
        );

        NeoDatabase {
            neos,
            approaches,
            by_designation,
            by_name,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn neos(&self) -> &[NearEarthObject] {
        &self.neos
    }

    pub fn approaches(&self) -> &[CloseApproach] {
        &self.approaches
    }

    /// NEO behind an id handed out by this database.
    ///
    /// # Panics
    /// If `id` came from a different, larger database. Ids can only be
    /// obtained from a database's own records, so this is a caller bug.
    pub fn neo(&self, id: NeoId) -> &NearEarthObject {
        &self.neos[id.index()]
    }

    /// Close approach behind an id handed out by this database.
    ///
    /// # Panics
    /// Same as [`NeoDatabase::neo`]: only for ids from another database.
    pub fn approach(&self, id: ApproachId) -> &CloseApproach {
        &self.approaches[id.index()]
    }

    /// A close approach paired with its NEO
    pub fn linked<'a>(&'a self, approach: &'a CloseApproach) -> LinkedApproach<'a> {
        LinkedApproach::new(approach, approach.neo().map(|id| self.neo(id)))
    }

    /// Every approach in source order, linked or not
    pub fn linked_approaches(&self) -> impl Iterator<Item = LinkedApproach<'_>> + '_ {
        self.approaches.iter().map(move |a| self.linked(a))
    }

    /// All close approaches of one NEO, in source order
    pub fn approaches_of<'a>(
        &'a self,
        neo: &'a NearEarthObject,
    ) -> impl Iterator<Item = LinkedApproach<'a>> + 'a {
        neo.approaches()
            .iter()
            .map(move |&id| LinkedApproach::new(self.approach(id), Some(neo)))
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    /// Find a NEO by its primary designation (exact match)
    pub fn get_neo_by_designation(&self, designation: &str) -> Option<&NearEarthObject> {
        self.by_designation
            .get(designation.trim())
            .map(|&id| self.neo(id))
    }

    /// Find a NEO by its IAU name (exact match). Unnamed NEOs are never found.
    pub fn get_neo_by_name(&self, name: &str) -> Option<&NearEarthObject> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.by_name.get(name).map(|&id| self.neo(id))
    }

    // ========================================================================
    // QUERY
    // ========================================================================

    /// Approaches (source order) that pass every filter.
    ///
    /// An empty filter list yields every approach.
    pub fn query<'a>(
        &'a self,
        filters: &'a [ApproachFilter],
    ) -> impl Iterator<Item = LinkedApproach<'a>> + 'a {
        self.linked_approaches()
            .filter(move |linked| filters.iter().all(|f| f.matches(linked)))
    }

    /// Like [`NeoDatabase::query`], but only approaches linked to a NEO.
    ///
    /// Exports need the NEO fields, so they go through this one.
    pub fn query_linked<'a>(
        &'a self,
        filters: &'a [ApproachFilter],
    ) -> impl Iterator<Item = LinkedApproach<'a>> + 'a {
        self.query(filters).filter(|linked| linked.neo.is_some())
    }

    /// Number of approaches that resolved to no NEO
    pub fn unresolved_count(&self) -> usize {
        self.approaches.iter().filter(|a| a.neo().is_none()).count()
    }
}
