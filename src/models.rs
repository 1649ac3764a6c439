// ☄️ Models - Near-Earth objects and their close approaches
//
// Two record types loaded independently from two different files:
// - NearEarthObject: identity = designation (unique catalog id)
// - CloseApproach: one pass near Earth, refers to its NEO by designation
//
// Neither record holds a pointer to the other. The database owns both
// collections (arena) and the link is an index in each direction:
// - CloseApproach.neo        → NeoId (None until linked)
// - NearEarthObject.approaches → Vec<ApproachId> (empty until linked)

use crate::error::NeoError;
use crate::helpers::{datetime_to_str, non_empty, parse_f64_or, parse_hazard_flag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::Deref;

// ============================================================================
// ARENA IDS
// ============================================================================

/// Position of a NearEarthObject inside the database's NEO collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeoId(pub(crate) usize);

/// Position of a CloseApproach inside the database's approach collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApproachId(pub(crate) usize);

impl NeoId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl ApproachId {
    pub fn index(&self) -> usize {
        self.0
    }
}

// ============================================================================
// NEAR-EARTH OBJECT
// ============================================================================

/// A near-Earth object (NEO)
///
/// - designation: primary key, never absent (empty source → "")
/// - name: optional IAU name (empty source → None)
/// - diameter: km, NaN when unknown
/// - hazardous: true only for the "Y" marker
#[derive(Debug, Clone)]
pub struct NearEarthObject {
    pub designation: String,
    pub name: Option<String>,
    pub diameter: f64,
    pub hazardous: bool,

    /// Linked close approaches, in source order. Only the database writes this.
    approaches: Vec<ApproachId>,
}

impl NearEarthObject {
    /// Create a new NEO from normalized values.
    ///
    /// An empty name is still treated as "no name".
    pub fn new(
        designation: impl Into<String>,
        name: Option<String>,
        diameter: f64,
        hazardous: bool,
    ) -> Self {
        NearEarthObject {
            designation: designation.into(),
            name: name.filter(|n| !n.trim().is_empty()),
            diameter,
            hazardous,
            approaches: Vec::new(),
        }
    }

    /// Create a new NEO from raw source text, applying the coercion rules
    pub fn from_raw(
        designation: Option<&str>,
        name: Option<&str>,
        diameter: Option<&str>,
        hazard_flag: Option<&str>,
    ) -> Self {
        NearEarthObject::new(
            non_empty(designation).unwrap_or_default(),
            non_empty(name),
            parse_f64_or(diameter, f64::NAN),
            parse_hazard_flag(hazard_flag),
        )
    }

    /// "<designation> (<name>)" when named, otherwise just the designation
    pub fn fullname(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", self.designation, name),
            None => self.designation.clone(),
        }
    }

    /// Ids of this NEO's close approaches, in source order
    pub fn approaches(&self) -> &[ApproachId] {
        &self.approaches
    }

    pub(crate) fn push_approach(&mut self, id: ApproachId) {
        self.approaches.push(id);
    }

    /// Canonical dictionary view
    pub fn to_record(&self) -> NeoRecord {
        NeoRecord {
            designation: self.designation.clone(),
            name: self.name.clone(),
            diameter_km: self.diameter,
            potentially_hazardous: self.hazardous,
        }
    }
}

impl fmt::Display for NearEarthObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NEO {} has a diameter of {:.3} km and {} potentially hazardous.",
            self.fullname(),
            self.diameter,
            if self.hazardous { "is" } else { "is not" }
        )
    }
}

/// Canonical dictionary view of a NEO (JSON output)
///
/// An unknown diameter serializes as JSON `null` and reads back as NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeoRecord {
    pub designation: String,
    pub name: Option<String>,
    #[serde(deserialize_with = "nan_from_null")]
    pub diameter_km: f64,
    pub potentially_hazardous: bool,
}

fn nan_from_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl From<NeoRecord> for NearEarthObject {
    fn from(record: NeoRecord) -> Self {
        NearEarthObject::new(
            record.designation,
            record.name,
            record.diameter_km,
            record.potentially_hazardous,
        )
    }
}

// ============================================================================
// CLOSE APPROACH
// ============================================================================

/// A close approach to Earth by an NEO
///
/// - time: UTC, minute precision, None when unknown
/// - distance: au, 0.0 when missing
/// - velocity: km/s, 0.0 when missing
#[derive(Debug, Clone)]
pub struct CloseApproach {
    /// Raw NEO designation from the approach record (the join key)
    designation: String,

    pub time: Option<DateTime<Utc>>,
    pub distance: f64,
    pub velocity: f64,

    /// Owning NEO, resolved during linking
    neo: Option<NeoId>,
}

impl CloseApproach {
    /// Create a new, unlinked close approach
    pub fn new(time: Option<DateTime<Utc>>, distance: f64, velocity: f64) -> Self {
        CloseApproach {
            designation: String::new(),
            time,
            distance,
            velocity,
            neo: None,
        }
    }

    /// Create a close approach from raw source text, applying the coercion rules.
    ///
    /// Missing distance/velocity default to 0.0, not NaN.
    pub fn from_raw(
        designation: Option<&str>,
        time: Option<&str>,
        distance: Option<&str>,
        velocity: Option<&str>,
    ) -> Self {
        CloseApproach::new(
            time.and_then(crate::helpers::cd_to_datetime),
            parse_f64_or(distance, 0.0),
            parse_f64_or(velocity, 0.0),
        )
        .with_designation(non_empty(designation).unwrap_or_default())
    }

    /// Builder pattern: capture the NEO designation this approach refers to
    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = designation.into();
        self
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    /// Linked NEO id; None when the designation matched no loaded NEO
    pub fn neo(&self) -> Option<NeoId> {
        self.neo
    }

    pub(crate) fn link(&mut self, neo: NeoId) {
        self.neo = Some(neo);
    }

    /// Approach time formatted with minute precision (or "unknown time")
    pub fn time_str(&self) -> String {
        datetime_to_str(self.time.as_ref())
    }
}

// ============================================================================
// LINKED VIEW
// ============================================================================

/// A close approach together with its resolved NEO (if any).
///
/// Every view that needs NEO fields goes through this type. Asking for one
/// of those views on an unresolved approach is a fault, not a silent default.
#[derive(Debug, Clone, Copy)]
pub struct LinkedApproach<'a> {
    pub approach: &'a CloseApproach,
    pub neo: Option<&'a NearEarthObject>,
}

impl<'a> LinkedApproach<'a> {
    pub fn new(approach: &'a CloseApproach, neo: Option<&'a NearEarthObject>) -> Self {
        LinkedApproach { approach, neo }
    }

    /// The linked NEO, or UnresolvedReference
    pub fn require_neo(&self) -> Result<&'a NearEarthObject, NeoError> {
        self.neo.ok_or_else(|| NeoError::UnresolvedReference {
            designation: self.approach.designation.clone(),
        })
    }

    /// Canonical dictionary view with the NEO nested
    pub fn to_record(&self) -> Result<ApproachRecord, NeoError> {
        let neo = self.require_neo()?;
        Ok(ApproachRecord {
            datetime_utc: self.approach.time_str(),
            distance_au: self.approach.distance,
            velocity_km_s: self.approach.velocity,
            neo: neo.to_record(),
        })
    }

    /// Flat row view: NEO fields denormalized inline for tabular output
    pub fn to_row(&self) -> Result<ApproachRow, NeoError> {
        let neo = self.require_neo()?;
        Ok(ApproachRow {
            datetime_utc: self.approach.time_str(),
            distance_au: self.approach.distance,
            velocity_km_s: self.approach.velocity,
            designation: neo.designation.clone(),
            name: neo.name.clone().unwrap_or_default(),
            diameter_km: if neo.diameter.is_nan() {
                "nan".to_string()
            } else {
                neo.diameter.to_string()
            },
            potentially_hazardous: if neo.hazardous { "True" } else { "False" }.to_string(),
        })
    }
}

impl Deref for LinkedApproach<'_> {
    type Target = CloseApproach;

    fn deref(&self) -> &CloseApproach {
        self.approach
    }
}

impl fmt::Display for LinkedApproach<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = match self.neo {
            Some(neo) => neo.fullname(),
            None => self.approach.designation.clone(),
        };
        write!(
            f,
            "At {}, '{}' approaches Earth at a distance of {:.2} au and a velocity of {:.2} km/s.",
            self.approach.time_str(),
            who,
            self.approach.distance,
            self.approach.velocity
        )
    }
}

/// Canonical dictionary view of a close approach (JSON output)
#[derive(Debug, Clone, Serialize)]
pub struct ApproachRecord {
    pub datetime_utc: String,
    pub distance_au: f64,
    pub velocity_km_s: f64,
    pub neo: NeoRecord,
}

/// Flat row view of a close approach (CSV output).
///
/// Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApproachRow {
    pub datetime_utc: String,
    pub distance_au: f64,
    pub velocity_km_s: f64,
    pub designation: String,
    pub name: String,
    pub diameter_km: String,
    pub potentially_hazardous: String,
}

impl ApproachRow {
    pub const HEADER: [&'static str; 7] = [
        "datetime_utc",
        "distance_au",
        "velocity_km_s",
        "designation",
        "name",
        "diameter_km",
        "potentially_hazardous",
    ];
}
