use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier wrapper for stored consultations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsultationId(pub String);

impl fmt::Display for ConsultationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Biological sex selecting the body-fat threshold set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const fn label(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Parses the wire value; anything other than male/female is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// BMI band computed from weight and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Ideal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub const ALL: [BmiCategory; 4] = [
        BmiCategory::Underweight,
        BmiCategory::Ideal,
        BmiCategory::Overweight,
        BmiCategory::Obese,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Ideal => "Ideal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(normalized))
    }
}

/// Body-fat band; thresholds differ per [`Sex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyFatCategory {
    Low,
    Normal,
    High,
}

impl BodyFatCategory {
    pub const ALL: [BodyFatCategory; 3] = [
        BodyFatCategory::Low,
        BodyFatCategory::Normal,
        BodyFatCategory::High,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            BodyFatCategory::Low => "Low",
            BodyFatCategory::Normal => "Normal",
            BodyFatCategory::High => "High",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(normalized))
    }

    pub(crate) const fn rank(self) -> u8 {
        match self {
            BodyFatCategory::Low => 0,
            BodyFatCategory::Normal => 1,
            BodyFatCategory::High => 2,
        }
    }
}

/// Ordered (BMI, body-fat) pair; serialized as `"Obese-Low"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Combination {
    pub bmi: BmiCategory,
    pub body_fat: BodyFatCategory,
}

impl Combination {
    pub const fn new(bmi: BmiCategory, body_fat: BodyFatCategory) -> Self {
        Self { bmi, body_fat }
    }

    /// All twelve pairs in category order.
    pub fn all() -> impl Iterator<Item = Combination> {
        BmiCategory::ALL.into_iter().flat_map(|bmi| {
            BodyFatCategory::ALL
                .into_iter()
                .map(move |body_fat| Combination::new(bmi, body_fat))
        })
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.bmi.label(), self.body_fat.label())
    }
}

impl FromStr for Combination {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (bmi, body_fat) = raw
            .split_once('-')
            .ok_or_else(|| format!("'{raw}' is not a BMI-BodyFat combination"))?;
        let bmi = BmiCategory::parse(bmi).ok_or_else(|| format!("unknown BMI category '{bmi}'"))?;
        let body_fat = BodyFatCategory::parse(body_fat)
            .ok_or_else(|| format!("unknown body-fat category '{body_fat}'"))?;
        Ok(Combination::new(bmi, body_fat))
    }
}

impl Serialize for Combination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Combination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Opaque program token. The engine never inspects program content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramCode(pub String);

impl ProgramCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Range-checked measurements accepted by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurements {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub body_fat_percent: f64,
    pub sex: Sex,
}

/// Inbound consultation payload before intake validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub body_fat_percent: f64,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Lifecycle status of a stored consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationStatus {
    Active,
    Completed,
    Cancelled,
}

impl ConsultationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ConsultationStatus::Active => "active",
            ConsultationStatus::Completed => "completed",
            ConsultationStatus::Cancelled => "cancelled",
        }
    }
}
