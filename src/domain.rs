use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AdvisorError;

pub const MIN_FARM_SIZE: f64 = 0.1;
pub const MAX_FARM_SIZE: f64 = 10000.0;

/// Declares a form enumeration whose wire value is its display label.
/// The first variant is the default, matching the preselected option.
macro_rules! labeled_enum {
    ($name:ident { $first:ident => $first_label:tt $(, $variant:ident => $label:tt)* $(,)? }) => {
        #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            #[serde(rename = $first_label)]
            $first,
            $(
                #[serde(rename = $label)]
                $variant,
            )*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$name::$first $(, $name::$variant)*];

            pub fn label(&self) -> &'static str {
                match self {
                    $name::$first => $first_label,
                    $($name::$variant => $label,)*
                }
            }

            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.label()).collect()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$first
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labeled_enum!(Climate {
    Tropical => "Tropical",
    Subtropical => "Subtropical",
    Temperate => "Temperate",
    Arid => "Arid",
    SemiArid => "Semi-Arid",
    Mediterranean => "Mediterranean",
});

labeled_enum!(SoilType {
    Clay => "Clay",
    Sandy => "Sandy",
    Loamy => "Loamy",
    Silt => "Silt",
    Peat => "Peat",
    Chalky => "Chalky",
    NotSure => "Not Sure",
});

labeled_enum!(CropStage {
    Planning => "Planning/Pre-Sowing",
    Sowing => "Sowing/Planting",
    Germination => "Germination",
    Vegetative => "Vegetative Growth",
    Flowering => "Flowering",
    Fruiting => "Fruiting/Grain Filling",
    Harvest => "Maturity/Harvest",
});

labeled_enum!(FarmingType {
    Conventional => "Conventional",
    Organic => "Organic",
    Mixed => "Mixed/Integrated",
    Precision => "Precision Farming",
});

labeled_enum!(IrrigationMethod {
    Drip => "Drip",
    Sprinkler => "Sprinkler",
    Flood => "Flood",
    RainFed => "Rain-fed",
    Mixed => "Mixed Methods",
});

labeled_enum!(Concern {
    PestControl => "Pest Control",
    DiseaseManagement => "Disease Management",
    FertilizerOptimization => "Fertilizer Optimization",
    WaterManagement => "Water Management",
    YieldImprovement => "Yield Improvement",
    CostReduction => "Cost Reduction",
    SoilHealth => "Soil Health",
    WeatherChallenges => "Weather Challenges",
});

labeled_enum!(BudgetLevel {
    Low => "Low Budget",
    Moderate => "Moderate Budget",
    High => "High Budget",
    Unconstrained => "No Constraint",
});

/// Everything the user fills in on the recommendation form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FarmRequest {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub climate: Climate,
    #[serde(default)]
    pub soil_type: SoilType,
    #[serde(default)]
    pub crop: String,
    #[serde(default)]
    pub stage: CropStage,
    #[serde(default = "default_farm_size")]
    pub farm_size: f64,
    #[serde(default)]
    pub farming_type: FarmingType,
    #[serde(default)]
    pub irrigation: IrrigationMethod,
    #[serde(default)]
    pub concerns: Vec<Concern>,
    #[serde(default)]
    pub budget: BudgetLevel,
    #[serde(default)]
    pub additional_info: String,
}

fn default_farm_size() -> f64 {
    10.0
}

impl Default for FarmRequest {
    fn default() -> Self {
        Self {
            location: String::new(),
            climate: Climate::default(),
            soil_type: SoilType::default(),
            crop: String::new(),
            stage: CropStage::default(),
            farm_size: default_farm_size(),
            farming_type: FarmingType::default(),
            irrigation: IrrigationMethod::default(),
            concerns: vec![],
            budget: BudgetLevel::default(),
            additional_info: String::new(),
        }
    }
}

impl FarmRequest {
    /// Checks the form before anything goes over the network.  Required
    /// fields are checked first so the user sees the most useful message.
    pub fn validate(&self) -> Result<(), AdvisorError> {
        if self.location.trim().is_empty() || self.crop.trim().is_empty() {
            return Err(AdvisorError::MissingRequiredFields);
        }

        if !self.farm_size.is_finite()
            || self.farm_size < MIN_FARM_SIZE
            || self.farm_size > MAX_FARM_SIZE
        {
            return Err(AdvisorError::InvalidInput(format!(
                "Farm size must be between {MIN_FARM_SIZE} and {MAX_FARM_SIZE} acres, got {}",
                self.farm_size
            )));
        }

        Ok(())
    }

    /// Copy of the form with surrounding whitespace removed from free text.
    pub fn trimmed(&self) -> Self {
        Self {
            location: self.location.trim().to_string(),
            crop: self.crop.trim().to_string(),
            additional_info: self.additional_info.trim().to_string(),
            concerns: self.concerns.clone(),
            ..*self
        }
    }
}

/// One successful submission and the text the model sent back.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QueryRecord {
    pub id: usize,
    pub timestamp: NaiveDateTime,
    pub location: String,
    pub crop: String,
    pub stage: CropStage,
    pub recommendation: String,
}

/// Labels for every select box on the form.
#[derive(Serialize, Debug)]
pub struct FormOptions {
    pub climates: Vec<&'static str>,
    pub soil_types: Vec<&'static str>,
    pub stages: Vec<&'static str>,
    pub farming_types: Vec<&'static str>,
    pub irrigation_methods: Vec<&'static str>,
    pub concerns: Vec<&'static str>,
    pub budgets: Vec<&'static str>,
    pub min_farm_size: f64,
    pub max_farm_size: f64,
}

impl FormOptions {
    pub fn build() -> Self {
        Self {
            climates: Climate::labels(),
            soil_types: SoilType::labels(),
            stages: CropStage::labels(),
            farming_types: FarmingType::labels(),
            irrigation_methods: IrrigationMethod::labels(),
            concerns: Concern::labels(),
            budgets: BudgetLevel::labels(),
            min_farm_size: MIN_FARM_SIZE,
            max_farm_size: MAX_FARM_SIZE,
        }
    }
}
