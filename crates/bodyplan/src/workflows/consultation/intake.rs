use super::domain::{ConsultationRequest, Measurements, Sex};

/// Input contract violations detected before a request reaches the resolver.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be between {min} and {max} (found {found})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        found: f64,
    },
    #[error("sex is required")]
    MissingSex,
    #[error("sex must be 'male' or 'female' (found '{0}')")]
    UnknownSex(String),
}

/// Inclusive plausibility range for one measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRange {
    pub min: f64,
    pub max: f64,
}

impl MeasurementRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn check(&self, field: &'static str, value: f64) -> Result<f64, IntakeViolation> {
        if !value.is_finite() {
            return Err(IntakeViolation::NotFinite { field });
        }
        if value < self.min || value > self.max {
            return Err(IntakeViolation::OutOfRange {
                field,
                min: self.min,
                max: self.max,
                found: value,
            });
        }
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntakeBounds {
    pub weight_kg: MeasurementRange,
    pub height_cm: MeasurementRange,
    pub body_fat_percent: MeasurementRange,
}

impl Default for IntakeBounds {
    fn default() -> Self {
        Self {
            weight_kg: MeasurementRange::new(1.0, 500.0),
            height_cm: MeasurementRange::new(50.0, 300.0),
            body_fat_percent: MeasurementRange::new(1.0, 70.0),
        }
    }
}

/// Guard turning raw requests into [`Measurements`]. Sex is never defaulted.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    bounds: IntakeBounds,
}

impl IntakeGuard {
    pub fn with_bounds(bounds: IntakeBounds) -> Self {
        Self { bounds }
    }

    pub fn measurements_from_request(
        &self,
        request: &ConsultationRequest,
    ) -> Result<Measurements, IntakeViolation> {
        let weight_kg = self.bounds.weight_kg.check("weightKg", request.weight_kg)?;
        let height_cm = self.bounds.height_cm.check("heightCm", request.height_cm)?;
        let body_fat_percent = self
            .bounds
            .body_fat_percent
            .check("bodyFatPercent", request.body_fat_percent)?;

        let raw_sex = request
            .sex
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or(IntakeViolation::MissingSex)?;
        let sex = Sex::parse(raw_sex).ok_or_else(|| IntakeViolation::UnknownSex(raw_sex.to_string()))?;

        Ok(Measurements {
            weight_kg,
            height_cm,
            body_fat_percent,
            sex,
        })
    }
}
