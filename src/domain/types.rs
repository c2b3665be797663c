//! Shared types for the complaint form

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Complaint reason, as offered by the form's "Motif" choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReasonCode {
    #[default]
    #[serde(rename = "colis_endommage")]
    Damaged,
    #[serde(rename = "retard_livraison")]
    Late,
    #[serde(rename = "comportement_livreur")]
    CourierBehavior,
    #[serde(rename = "autre")]
    Other,
}

impl ReasonCode {
    pub const ALL: [ReasonCode; 4] =
        [ReasonCode::Damaged, ReasonCode::Late, ReasonCode::CourierBehavior, ReasonCode::Other];

    /// Value sent as `REC_MOTIF`
    pub fn as_wire(&self) -> &'static str {
        match self {
            ReasonCode::Damaged => "colis_endommage",
            ReasonCode::Late => "retard_livraison",
            ReasonCode::CourierBehavior => "comportement_livreur",
            ReasonCode::Other => "autre",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReasonCode::Damaged => "Colis endommagé",
            ReasonCode::Late => "Retard de livraison",
            ReasonCode::CourierBehavior => "Comportement du livreur",
            ReasonCode::Other => "Autre",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

/// In-progress complaint owned by the active form session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintDraft {
    pub parcel_barcode: String,
    pub phone_number: String,
    pub subject: String,
    pub description: String,
    pub reason: ReasonCode,
}

impl ComplaintDraft {
    /// Build the body posted to the complaint endpoint
    pub fn to_payload(&self) -> ComplaintPayload {
        ComplaintPayload {
            barcode: self.parcel_barcode.clone(),
            phone: self.phone_number.clone(),
            subject: self.subject.clone(),
            description: self.description.clone(),
            reason: self.reason,
        }
    }
}

/// JSON body of the complaint POST
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintPayload {
    #[serde(rename = "POSBARCODE")]
    pub barcode: String,
    #[serde(rename = "POSPORTABLE")]
    pub phone: String,
    #[serde(rename = "REC_OBJET")]
    pub subject: String,
    #[serde(rename = "REC_DESC")]
    pub description: String,
    #[serde(rename = "REC_MOTIF")]
    pub reason: ReasonCode,
}

/// A single tracking event. Only `date` is interpreted; everything else is
/// kept as returned so the UI can show it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub date: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrackingEvent {
    /// Short human summary built from the common free-text fields
    pub fn summary(&self) -> String {
        const KEYS: [&str; 4] = ["libelle", "etat", "statut", "description"];
        KEYS.iter()
            .filter_map(|k| self.extra.get(*k))
            .filter_map(Value::as_str)
            .next()
            .map(str::to_string)
            .unwrap_or_else(|| {
                self.extra
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
    }
}

/// Parcel record returned by the tracking endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParcelDetails {
    pub evenements: Vec<TrackingEvent>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ParcelDetails {
    /// Order events ascending by their `date` string.
    ///
    /// Lexicographic, so callers must use a representation whose string order
    /// matches time order (ISO-8601). The sort is stable.
    pub fn sort_events(&mut self) {
        self.evenements.sort_by(|a, b| a.date.cmp(&b.date));
    }

    pub fn into_sorted(mut self) -> Self {
        self.sort_events();
        self
    }
}

/// Result of a parcel/phone lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ParcelLookupResult {
    /// The service answered with the `"inexistant"` sentinel
    NotFound,
    Found(ParcelDetails),
    /// Any other 2xx body: the pair exists but no event list could be read
    Confirmed,
}
