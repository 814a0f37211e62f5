//! Render investigators as a text sheet or JSON.

use arkham_domain::Investigator;

/// Multi-line character sheet.
pub fn render_sheet(investigator: &Investigator) -> String {
    let mut lines = vec![investigator.to_string(), String::new()];

    lines.push("Characteristics".to_string());
    lines.extend(
        investigator
            .characteristics()
            .iter()
            .map(|(_, attribute)| format!("  {attribute}")),
    );

    let derived = investigator.derived();
    lines.push(String::new());
    lines.push(format!(
        "Damage bonus: {}  Build: {}  Hit points: {}  Move: {}",
        derived.damage_bonus, derived.build, derived.hit_point_max, derived.movement
    ));

    if !investigator.skills().is_empty() {
        lines.push(String::new());
        lines.push("Skills".to_string());
        lines.extend(
            investigator
                .skills()
                .iter()
                .map(|skill| format!("  {skill}")),
        );
    }

    lines.join("\n")
}

/// Pretty-printed JSON array of investigators.
pub fn render_json(investigators: &[Investigator]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(investigators)
}

#[cfg(test)]
mod tests {
    use arkham_domain::{Attribute, Characteristics, Gender, InvestigatorProfile, RandomPort};

    use super::*;

    struct LowestRandom;

    impl RandomPort for LowestRandom {
        fn gen_range(&self, min: i32, _max: i32) -> i32 {
            min
        }
    }

    fn investigator() -> Investigator {
        let profile = InvestigatorProfile::new(
            "Harvey", "Walters", Gender::Male, "Journalist", "Boston", "Arkham", 30,
        )
        .unwrap();
        Investigator::develop(profile, Characteristics::from_fn(|_| 50), &LowestRandom).unwrap()
    }

    #[test]
    fn test_sheet_lists_summary_characteristics_and_derived_stats() {
        let sheet = render_sheet(&investigator());
        let lines: Vec<&str> = sheet.lines().collect();
        assert_eq!(
            lines[0],
            "Harvey Walters is a 30 year old man born in Boston and living in Arkham. At the moment he is a Journalist"
        );
        assert!(lines.contains(&"  Strength/STR(R: 50 H:25 F: 10)"));
        assert!(lines.contains(&"  Luck/LUCK(R: 50 H:25 F: 10)"));
        assert!(lines.contains(&"Damage bonus: 0  Build: 0  Hit points: 10  Move: 8"));
        assert!(!sheet.contains("Skills"));
    }

    #[test]
    fn test_sheet_lists_skills_when_present() {
        let mut investigator = investigator();
        investigator.set_skill(Attribute::new("Library Use", None).with_value(60));
        let sheet = render_sheet(&investigator);
        assert!(sheet.contains("Skills\n  Library Use(R: 60 H:30 F: 12)"));
    }

    #[test]
    fn test_json_is_an_array() {
        let json = render_json(&[investigator(), investigator()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["derived"]["movement"], 8);
    }
}
