//! Procedure categories and the keyword classifier
//!
//! Free-text procedure names from the scheduling export are mapped onto a
//! closed set of 13 categories. Matching is plain substring search against an
//! ordered keyword table; the first category with a hit wins.

use serde::{Serialize, Serializer};

/// Standardized procedure category, declared in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    OpenMri,
    Ultrasound,
    Ct,
    SleepStudy,
    Mri,
    PetCt,
    Xray,
    Mammogram,
    Ncs,
    BoneDensity,
    NuclearMedicine,
    CardiacPet,
    Other,
}

/// Keyword table, evaluated top to bottom.
///
/// PET/CT sits ahead of CT, otherwise "PET/CT" would be swallowed by the
/// generic "CT" keyword.
const KEYWORDS: &[(Category, &[&str])] = &[
    (Category::OpenMri, &["OPEN MRI", "OPEN MAGNETIC"]),
    (Category::Ultrasound, &["US", "ULTRA", "SONOGRAM"]),
    (Category::PetCt, &["PET/CT", "PET CT"]),
    (Category::Ct, &["CT", "CAT SCAN", "COMPUTED TOMOGRAPHY"]),
    (Category::SleepStudy, &["SLEEP"]),
    (Category::Mri, &["MRI", "MAGNETIC"]),
    (Category::Xray, &["XRAY", "X-RAY", "X RAY", "RAD"]),
    (Category::Mammogram, &["MAMMO", "BREAST"]),
    (Category::Ncs, &["NCS", "NERVE", "CONDUCTION"]),
    (Category::BoneDensity, &["BONE", "DEXA", "DENSITOMETRY"]),
    (
        Category::NuclearMedicine,
        &["NUC MED", "NUCLEAR", "THYROID UPTAKE"],
    ),
    (Category::CardiacPet, &["CARDIAC PET", "HEART PET"]),
];

impl Category {
    /// Every category in report order (OTHER last)
    pub const ALL: [Category; 13] = [
        Category::OpenMri,
        Category::Ultrasound,
        Category::Ct,
        Category::SleepStudy,
        Category::Mri,
        Category::PetCt,
        Category::Xray,
        Category::Mammogram,
        Category::Ncs,
        Category::BoneDensity,
        Category::NuclearMedicine,
        Category::CardiacPet,
        Category::Other,
    ];

    /// Classify a raw procedure name. Never fails; unmatched input is OTHER.
    pub fn classify(procedure_type: &str) -> Category {
        let normalized = procedure_type.trim().to_uppercase();
        if normalized.is_empty() {
            return Category::Other;
        }

        KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| normalized.contains(kw)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }

    /// Display label as used in the clinic's reports
    pub fn label(&self) -> &'static str {
        match self {
            Category::OpenMri => "OPEN MRI",
            Category::Ultrasound => "US",
            Category::Ct => "CT",
            Category::SleepStudy => "SLEEP STUDY",
            Category::Mri => "MRI",
            Category::PetCt => "PET/CT",
            Category::Xray => "XRAY",
            Category::Mammogram => "MAMMOGRAM",
            Category::Ncs => "NCS",
            Category::BoneDensity => "BONE DENSITY",
            Category::NuclearMedicine => "NUCLEAR MEDICINE",
            Category::CardiacPet => "CARDIAC PET",
            Category::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_examples() {
        assert_eq!(Category::classify("Knee X-Ray"), Category::Xray);
        assert_eq!(Category::classify("abc123"), Category::Other);
        assert_eq!(Category::classify("PET/CT Scan"), Category::PetCt);
        assert_eq!(Category::classify("Open MRI Lumbar"), Category::OpenMri);
    }

    #[test]
    fn test_classify_empty_is_other() {
        assert_eq!(Category::classify(""), Category::Other);
        assert_eq!(Category::classify("   "), Category::Other);
    }

    #[test]
    fn test_classify_is_case_and_whitespace_insensitive() {
        assert_eq!(Category::classify("  ct head w/o contrast "), Category::Ct);
        assert_eq!(Category::classify("sleep study"), Category::SleepStudy);
        assert_eq!(Category::classify("Pet Ct Skull Base"), Category::PetCt);
    }

    #[test]
    fn test_open_mri_before_mri() {
        assert_eq!(Category::classify("Open Magnetic Knee"), Category::OpenMri);
        assert_eq!(Category::classify("MRI Brain"), Category::Mri);
        assert_eq!(Category::classify("Magnetic Resonance"), Category::Mri);
    }

    #[test]
    fn test_first_match_wins() {
        // "CONDUCTION" contains "CT", and CT is checked before NCS
        assert_eq!(Category::classify("Nerve Conduction"), Category::Ct);
        assert_eq!(Category::classify("NCS Upper"), Category::Ncs);
        // "BREAST ULTRASOUND" hits US first
        assert_eq!(Category::classify("Breast Ultrasound"), Category::Ultrasound);
    }

    #[test]
    fn test_remaining_categories() {
        assert_eq!(Category::classify("Mammogram Screening"), Category::Mammogram);
        assert_eq!(Category::classify("DEXA"), Category::BoneDensity);
        assert_eq!(Category::classify("Thyroid Uptake"), Category::NuclearMedicine);
        assert_eq!(Category::classify("Nuc Med Gastric Emptying"), Category::NuclearMedicine);
        assert_eq!(Category::classify("Cardiac PET"), Category::CardiacPet);
        assert_eq!(Category::classify("Heart PET"), Category::CardiacPet);
        assert_eq!(Category::classify("Sonogram Pelvis"), Category::Ultrasound);
    }

    #[test]
    fn test_all_labels_distinct() {
        let mut labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 13);
        assert_eq!(Category::ALL[12], Category::Other);
    }

    #[test]
    fn test_serialize_as_label() {
        let json = serde_json::to_string(&Category::PetCt).unwrap();
        assert_eq!(json, "\"PET/CT\"");
    }
}
