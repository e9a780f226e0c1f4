use crate::error::{MyflationError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// COICOP 2018 expenditure divisions. Declaration order is the canonical order
/// used by the bundled dataset columns and by every `BTreeMap` keyed on this type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ExpenditureCategory {
    #[schemars(description = "01 Food and non-alcoholic beverages")]
    Food,
    #[schemars(description = "02 Alcoholic beverages, tobacco and narcotics")]
    AlcoholTobacco,
    #[schemars(description = "03 Clothing and footwear")]
    Clothing,
    #[schemars(description = "04 Housing, water, electricity, gas and other fuels")]
    Housing,
    #[schemars(description = "05 Furnishings, household equipment and routine maintenance")]
    Furnishings,
    #[schemars(description = "06 Health")]
    Health,
    #[schemars(description = "07 Transport")]
    Transport,
    #[schemars(description = "08 Information and communication")]
    InformationCommunication,
    #[schemars(description = "09 Recreation, sport and culture")]
    Recreation,
    #[schemars(description = "10 Education services")]
    Education,
    #[schemars(description = "11 Restaurants and accommodation services")]
    Restaurants,
    #[schemars(description = "12 Insurance and financial services")]
    InsuranceFinance,
    #[schemars(description = "13 Personal care, social protection and miscellaneous")]
    PersonalCareMisc,
}

pub const CATEGORY_COUNT: usize = 13;

impl ExpenditureCategory {
    pub const ALL: [ExpenditureCategory; CATEGORY_COUNT] = [
        Self::Food,
        Self::AlcoholTobacco,
        Self::Clothing,
        Self::Housing,
        Self::Furnishings,
        Self::Health,
        Self::Transport,
        Self::InformationCommunication,
        Self::Recreation,
        Self::Education,
        Self::Restaurants,
        Self::InsuranceFinance,
        Self::PersonalCareMisc,
    ];

    /// Stable machine key, identical to the serde representation.
    pub fn key(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::AlcoholTobacco => "alcohol_tobacco",
            Self::Clothing => "clothing",
            Self::Housing => "housing",
            Self::Furnishings => "furnishings",
            Self::Health => "health",
            Self::Transport => "transport",
            Self::InformationCommunication => "information_communication",
            Self::Recreation => "recreation",
            Self::Education => "education",
            Self::Restaurants => "restaurants",
            Self::InsuranceFinance => "insurance_finance",
            Self::PersonalCareMisc => "personal_care_misc",
        }
    }

    /// Two-digit COICOP division code as published by the statistics provider.
    pub fn code(self) -> &'static str {
        match self {
            Self::Food => "01",
            Self::AlcoholTobacco => "02",
            Self::Clothing => "03",
            Self::Housing => "04",
            Self::Furnishings => "05",
            Self::Health => "06",
            Self::Transport => "07",
            Self::InformationCommunication => "08",
            Self::Recreation => "09",
            Self::Education => "10",
            Self::Restaurants => "11",
            Self::InsuranceFinance => "12",
            Self::PersonalCareMisc => "13",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Food => "Food and non-alcoholic beverages",
            Self::AlcoholTobacco => "Alcoholic beverages, tobacco and narcotics",
            Self::Clothing => "Clothing and footwear",
            Self::Housing => "Housing, water, electricity, gas and other fuels",
            Self::Furnishings => "Furnishings and household equipment",
            Self::Health => "Health",
            Self::Transport => "Transport",
            Self::InformationCommunication => "Information and communication",
            Self::Recreation => "Recreation, sport and culture",
            Self::Education => "Education services",
            Self::Restaurants => "Restaurants and accommodation",
            Self::InsuranceFinance => "Insurance and financial services",
            Self::PersonalCareMisc => "Personal care and miscellaneous",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Food => "Groceries, meat, dairy, fruit, vegetables, coffee and soft drinks",
            Self::AlcoholTobacco => "Beer, wine, spirits, cigarettes and snus",
            Self::Clothing => "Garments, shoes and their repair",
            Self::Housing => "Rent, mortgage interest, electricity, heating, water and repairs",
            Self::Furnishings => {
                "Furniture, textiles, appliances, tools and routine household maintenance"
            }
            Self::Health => "Medicines, medical products, doctor and dental visits",
            Self::Transport => "Vehicles, fuel, maintenance, public transport and travel",
            Self::InformationCommunication => {
                "Phones, computers, internet and mobile subscriptions, streaming"
            }
            Self::Recreation => "Hobbies, sports, culture, pets, package holidays and books",
            Self::Education => "Course fees and other education services",
            Self::Restaurants => "Eating out, cafés, take-away and hotels",
            Self::InsuranceFinance => "Home, vehicle and health insurance, bank fees",
            Self::PersonalCareMisc => {
                "Hairdressing, toiletries, jewellery, childcare and other services"
            }
        }
    }

    /// National-average household spending share in percent; the shares sum to 100.
    pub fn national_average_share(self) -> f64 {
        match self {
            Self::Food => 12.8,
            Self::AlcoholTobacco => 2.1,
            Self::Clothing => 4.2,
            Self::Housing => 28.5,
            Self::Furnishings => 4.8,
            Self::Health => 3.9,
            Self::Transport => 13.2,
            Self::InformationCommunication => 2.8,
            Self::Recreation => 10.7,
            Self::Education => 0.6,
            Self::Restaurants => 5.8,
            Self::InsuranceFinance => 6.1,
            Self::PersonalCareMisc => 4.5,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Position in the canonical order, `0..CATEGORY_COUNT`.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ExpenditureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ExpenditureCategory {
    type Err = MyflationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_key(s.trim()).ok_or_else(|| MyflationError::UnknownCategory(s.to_string()))
    }
}
