use super::super::domain::{BmiCategory, BodyFatCategory, Combination, Measurements, Sex};

const UNDERWEIGHT_BELOW: f64 = 18.5;
const OVERWEIGHT_FROM: f64 = 25.0;
const OBESE_FROM: f64 = 30.0;

/// Body-fat band edges: `< low_below` is Low, `<= normal_up_to` is Normal, anything above is High.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFatThresholds {
    pub low_below: f64,
    pub normal_up_to: f64,
}

impl BodyFatThresholds {
    pub const fn for_sex(sex: Sex) -> Self {
        match sex {
            Sex::Male => Self {
                low_below: 10.0,
                normal_up_to: 20.0,
            },
            Sex::Female => Self {
                low_below: 20.0,
                normal_up_to: 30.0,
            },
        }
    }
}

/// Categories derived from one set of measurements, before any edge-case handling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Unrounded BMI; rounding happens only when the decision record is assembled.
    pub bmi: f64,
    pub combination: Combination,
}

pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

pub fn round_bmi(bmi: f64) -> f64 {
    (bmi * 100.0).round() / 100.0
}

/// Maps a BMI onto its band. Values between the documented 24.9/25 and 29.9/30 edges fall into
/// the lower band, so the function has no gaps.
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < UNDERWEIGHT_BELOW {
        BmiCategory::Underweight
    } else if bmi < OVERWEIGHT_FROM {
        BmiCategory::Ideal
    } else if bmi < OBESE_FROM {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

pub fn classify_body_fat(percent: f64, sex: Sex) -> BodyFatCategory {
    let thresholds = BodyFatThresholds::for_sex(sex);
    if percent < thresholds.low_below {
        BodyFatCategory::Low
    } else if percent <= thresholds.normal_up_to {
        BodyFatCategory::Normal
    } else {
        BodyFatCategory::High
    }
}

pub fn classify(measurements: &Measurements) -> Classification {
    let bmi = compute_bmi(measurements.weight_kg, measurements.height_cm);
    let combination = Combination::new(
        classify_bmi(bmi),
        classify_body_fat(measurements.body_fat_percent, measurements.sex),
    );

    Classification { bmi, combination }
}
