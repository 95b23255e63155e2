//! Curated recipient, program and object-class lists for fixture records.
//!
//! All picks are deterministic (same RNG stream = same choices).

use crate::rng::SeededRng;

pub struct Catalog;

impl Catalog {
    pub fn pick_recipient(rng: &mut SeededRng) -> &'static str {
        *rng.pick(Self::recipients())
    }

    pub fn pick_program(rng: &mut SeededRng) -> &'static str {
        *rng.pick(Self::programs())
    }

    pub fn pick_object_class(rng: &mut SeededRng) -> &'static str {
        *rng.pick(Self::object_classes())
    }

    /// Manufacturers, labs, health systems and state health departments.
    pub fn recipients() -> &'static [&'static str] {
        &[
            "Moderna, Inc.", "Pfizer, Inc.", "Johnson & Johnson", "AstraZeneca",
            "State of California Health Department", "New York State Department of Health",
            "Texas Health and Human Services Commission", "Florida Department of Health",
            "Mayo Clinic", "Johns Hopkins University", "University of California San Francisco",
            "Harvard Medical School", "Cleveland Clinic", "Quest Diagnostics", "LabCorp",
            "Abbott Laboratories", "Gilead Sciences", "Regeneron Pharmaceuticals",
            "Eli Lilly and Company", "Merck & Co.", "Novavax, Inc.", "CVS Health",
            "Walgreens Boots Alliance", "UnitedHealth Group", "McKesson Corporation",
            "AmerisourceBergen", "Cardinal Health", "Medtronic", "Siemens Healthineers",
            "Roche Diagnostics",
        ]
    }

    pub fn programs() -> &'static [&'static str] {
        &[
            "COVID-19 Vaccine Development", "Emergency Medical Response",
            "Hospital Preparedness Program", "COVID-19 Testing Initiative",
            "COVID-19 Treatment Acceleration Program", "Public Health Emergency Preparedness",
            "Strategic National Stockpile", "Health Workforce Training",
            "Telehealth Network Grant Program", "Mental Health Services Block Grant",
            "Substance Abuse Prevention and Treatment", "Health Center Program",
            "Ryan White HIV/AIDS Program", "Maternal and Child Health Services",
            "Medical Reserve Corps", "Rural Health Outreach Program",
            "Biomedical Advanced Research and Development", "Hospital Infection Control",
            "Healthcare Systems Preparedness", "Provider Relief Fund",
        ]
    }

    /// Only contract records carry an object class.
    pub fn object_classes() -> &'static [&'static str] {
        &[
            "Medical Supplies and Equipment", "Pharmaceuticals", "Personal Protective Equipment",
            "Laboratory Services", "Research and Development", "Testing Supplies",
            "Vaccination Distribution", "Personnel Services", "IT Systems and Services",
            "Healthcare Facility Support", "Emergency Response Equipment",
            "Administrative Support", "Training Services", "Transportation and Logistics",
            "Community Outreach",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn lists_have_no_duplicates() {
        for list in [Catalog::recipients(), Catalog::programs(), Catalog::object_classes()] {
            let unique: HashSet<_> = list.iter().collect();
            assert_eq!(unique.len(), list.len(), "duplicate entry in {list:?}");
        }
    }

    #[test]
    fn picks_are_deterministic() {
        let mut a = SeededRng::new(12345, 0);
        let mut b = SeededRng::new(12345, 0);
        for _ in 0..20 {
            assert_eq!(Catalog::pick_recipient(&mut a), Catalog::pick_recipient(&mut b));
            assert_eq!(Catalog::pick_program(&mut a), Catalog::pick_program(&mut b));
        }
    }

    #[test]
    fn picks_come_from_the_lists() {
        let mut rng = SeededRng::new(7, 0);
        for _ in 0..50 {
            let recipient: &'static str = Catalog::pick_recipient(&mut rng);
            assert!(Catalog::recipients().contains(&recipient));
            assert!(Catalog::programs().contains(&Catalog::pick_program(&mut rng)));
            assert!(Catalog::object_classes().contains(&Catalog::pick_object_class(&mut rng)));
        }
    }
}
