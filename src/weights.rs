use crate::category::ExpenditureCategory;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const MAX_PERCENTAGE: f64 = 100.0;
const MAX_PLAUSIBLE_AMOUNT: f64 = 1_000_000.0;

/// Unit the user typed their weights in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    #[schemars(description = "Share of total spending, in percent")]
    Percentage,
    #[schemars(description = "Absolute monthly spending in currency units")]
    Amount,
}

impl InputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Amount => "amount",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "percentage" => Some(Self::Percentage),
            "amount" => Some(Self::Amount),
            _ => None,
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category spending weights. A category without an entry weighs zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct WeightDistribution(BTreeMap<ExpenditureCategory, f64>);

impl WeightDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// The national-average spending mix, in percent.
    pub fn national_average() -> Self {
        ExpenditureCategory::ALL
            .into_iter()
            .map(|c| (c, c.national_average_share()))
            .collect()
    }

    /// Every category at zero.
    pub fn zeroed() -> Self {
        ExpenditureCategory::ALL.into_iter().map(|c| (c, 0.0)).collect()
    }

    pub fn get(&self, category: ExpenditureCategory) -> f64 {
        self.0.get(&category).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, category: ExpenditureCategory, value: f64) {
        self.0.insert(category, value);
    }

    pub fn contains(&self, category: ExpenditureCategory) -> bool {
        self.0.contains_key(&category)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExpenditureCategory, f64)> + '_ {
        self.0.iter().map(|(c, v)| (*c, *v))
    }

    pub fn total(&self) -> f64 {
        self.0.values().copied().map(finite_or_zero).sum()
    }

    /// Copy with an explicit zero entry for every category that has none.
    pub fn filled(&self) -> Self {
        let mut filled = Self::zeroed();
        for (category, value) in self.iter() {
            filled.set(category, value);
        }
        filled
    }
}

impl FromIterator<(ExpenditureCategory, f64)> for WeightDistribution {
    fn from_iter<I: IntoIterator<Item = (ExpenditureCategory, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<ExpenditureCategory, f64>> for WeightDistribution {
    fn from(map: BTreeMap<ExpenditureCategory, f64>) -> Self {
        Self(map)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Rescales the distribution so its values sum to 100.
///
/// An all-zero distribution becomes equal shares (100/N over the N categories
/// present, or over the whole canonical set when the map is empty). Non-finite
/// values count as zero. Negative values are not rejected here; see [`validate`].
pub fn normalize_to_percentage(distribution: &WeightDistribution) -> WeightDistribution {
    let source = if distribution.is_empty() {
        WeightDistribution::zeroed()
    } else {
        distribution.clone()
    };

    let mut scale = 1.0;
    let mut total = source.total();

    // Finite values can still overflow when summed; rescale by the largest one.
    if !total.is_finite() {
        scale = source
            .iter()
            .map(|(_, v)| finite_or_zero(v).abs())
            .fold(0.0, f64::max);
        total = source.iter().map(|(_, v)| finite_or_zero(v) / scale).sum();
    }

    if total == 0.0 {
        let equal_share = 100.0 / source.len() as f64;
        return source.iter().map(|(c, _)| (c, equal_share)).collect();
    }

    source
        .iter()
        .map(|(c, v)| (c, finite_or_zero(v) / scale / total * 100.0))
        .collect()
}

/// Converts currency amounts to a percentage distribution. Same arithmetic as
/// [`normalize_to_percentage`], different input unit.
pub fn amounts_to_percentage(amounts: &WeightDistribution) -> WeightDistribution {
    normalize_to_percentage(amounts)
}

/// Percentages (summing to 100) to fractions (summing to 1).
pub fn to_fractional(percentages: &WeightDistribution) -> WeightDistribution {
    percentages.iter().map(|(c, v)| (c, v / 100.0)).collect()
}

pub fn normalize(distribution: &WeightDistribution, mode: InputMode) -> WeightDistribution {
    match mode {
        InputMode::Percentage => normalize_to_percentage(distribution),
        InputMode::Amount => amounts_to_percentage(distribution),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WeightWarning {
    Negative {
        category: ExpenditureCategory,
        value: f64,
    },
    PercentageAboveHundred {
        category: ExpenditureCategory,
        value: f64,
    },
    ImplausibleAmount {
        category: ExpenditureCategory,
        value: f64,
    },
}

impl fmt::Display for WeightWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative { category, .. } => {
                write!(f, "{}: value cannot be negative", category.display_name())
            }
            Self::PercentageAboveHundred { category, .. } => {
                write!(f, "{}: percentage cannot exceed 100%", category.display_name())
            }
            Self::ImplausibleAmount { category, .. } => {
                write!(f, "{}: amount seems unrealistically high", category.display_name())
            }
        }
    }
}

/// Advisory checks for display next to the input form. Never blocks computation.
pub fn validate(distribution: &WeightDistribution, mode: InputMode) -> Vec<WeightWarning> {
    let mut warnings = Vec::new();

    for (category, value) in distribution.iter() {
        if value < 0.0 {
            warnings.push(WeightWarning::Negative { category, value });
        }

        match mode {
            InputMode::Percentage if value > MAX_PERCENTAGE => {
                warnings.push(WeightWarning::PercentageAboveHundred { category, value });
            }
            InputMode::Amount if value > MAX_PLAUSIBLE_AMOUNT => {
                warnings.push(WeightWarning::ImplausibleAmount { category, value });
            }
            _ => {}
        }
    }

    warnings
}
