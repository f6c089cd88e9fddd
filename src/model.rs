use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Category value meaning "no filter". Never stored on a monument.
pub const ALL_MONUMENTS: &str = "All Monuments";

/// The fixed set of categories a monument may carry.
pub const MONUMENT_CATEGORIES: [&str; 6] = [
    "Roman Era",
    "Islamic Architecture",
    "Coastal Village",
    "Ancient Ruins",
    "Berber Village",
    "Historical City",
];

pub type MonumentId = u64;
pub type RecognitionId = u64;
pub type UserImageId = u64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitorInfo {
    pub opening_hours: String,
    pub admission_fees: String,
    pub tips: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonumentDetails {
    pub history: String,
    pub architecture: String,
    pub significance: String,
    pub visitor_info: VisitorInfo,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A catalogued monument as served to clients.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Monument {
    pub id: MonumentId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub era: String,
    pub details: MonumentDetails,
    pub image_url: String,
    pub coordinates: Coordinates,
}

/// Monument payload before the store assigns it an identifier.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewMonument {
    pub name: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub era: String,
    pub details: MonumentDetails,
    pub image_url: String,
    pub coordinates: Coordinates,
}

impl NewMonument {
    pub fn with_id(self, id: MonumentId) -> Monument {
        Monument {
            id,
            name: self.name,
            description: self.description,
            location: self.location,
            category: self.category,
            era: self.era,
            details: self.details,
            image_url: self.image_url,
            coordinates: self.coordinates,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)?;
        require_text("location", &self.location)?;
        require_text("era", &self.era)?;
        require_text("details.history", &self.details.history)?;
        require_text("details.architecture", &self.details.architecture)?;
        require_text("details.significance", &self.details.significance)?;
        require_text("details.visitorInfo.openingHours", &self.details.visitor_info.opening_hours)?;
        require_text("details.visitorInfo.admissionFees", &self.details.visitor_info.admission_fees)?;
        require_text("details.visitorInfo.tips", &self.details.visitor_info.tips)?;
        require_text("imageUrl", &self.image_url)?;

        if !MONUMENT_CATEGORIES.contains(&self.category.as_str()) {
            return Err(ValidationError::UnknownCategory(self.category.clone()));
        }

        let Coordinates { lat, lng } = self.coordinates;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(ValidationError::CoordinatesOutOfRange { lat, lng });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub id: RecognitionId,
    pub monument_id: MonumentId,
    pub image_url: String,
    pub confidence: String,
    pub timestamp: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewRecognitionResult {
    pub monument_id: MonumentId,
    pub image_url: String,
    pub confidence: String,
    pub timestamp: String,
}

impl NewRecognitionResult {
    pub fn with_id(self, id: RecognitionId) -> RecognitionResult {
        RecognitionResult {
            id,
            monument_id: self.monument_id,
            image_url: self.image_url,
            confidence: self.confidence,
            timestamp: self.timestamp,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.monument_id == 0 {
            return Err(ValidationError::InvalidMonumentId);
        }
        require_text("imageUrl", &self.image_url)?;
        parse_percentage(&self.confidence)?;
        require_timestamp(&self.timestamp)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserImage {
    pub id: UserImageId,
    pub image_url: String,
    pub processed: bool,
    pub timestamp: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewUserImage {
    pub image_url: String,
    #[serde(default)]
    pub processed: bool,
    pub timestamp: String,
}

impl NewUserImage {
    pub fn with_id(self, id: UserImageId) -> UserImage {
        UserImage {
            id,
            image_url: self.image_url,
            processed: self.processed,
            timestamp: self.timestamp,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("imageUrl", &self.image_url)?;
        require_timestamp(&self.timestamp)
    }
}

/// Body of a successful `POST /recognize`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecognitionOutcome {
    pub recognition: RecognitionResult,
    pub monument: Monument,
}

/// Current UTC time as `2025-05-30T10:00:00.000Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Renders a percentage the way clients display it: at most three
/// decimals, trailing zeros dropped (`87.0` -> `"87%"`, `93.2140` -> `"93.214%"`).
pub fn format_confidence(percent: f64) -> String {
    let fixed = format!("{:.3}", percent.clamp(0.0, 100.0));
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", trimmed)
}

/// Parses a `"<number>%"` string back into its numeric value.
pub fn parse_percentage(value: &str) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidConfidence(value.to_string());

    let number = value.strip_suffix('%').ok_or_else(invalid)?;
    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (number, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !fraction.map_or(true, all_digits) {
        return Err(invalid());
    }

    let parsed: f64 = number.parse().map_err(|_| invalid())?;
    if parsed > 100.0 {
        return Err(invalid());
    }
    Ok(parsed)
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

fn require_timestamp(value: &str) -> Result<(), ValidationError> {
    DateTime::parse_from_rfc3339(value)
    .map(|_| ())
    .map_err(|_| ValidationError::InvalidTimestamp(value.to_string()))
}
