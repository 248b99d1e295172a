//! Canned explanation templates keyed by intent and experience level

use crate::intent::IntentCategory;
use crate::types::ExperienceLevel;

const SLEEP_TEMPLATE: &str = "For better sleep, indica strains and products with CBN work best. \
These products can help you get the rest you need.\n\n\
Why it works: THC has been shown to shorten the time it takes to fall asleep, and CBN adds a mild \
sedating effect. Terpenes like myrcene and linalool deepen the relaxation.\n\n\
How to use: Take edibles 60-90 minutes before bed. Flower and vapes act within minutes, so use them \
closer to lights out.";

const ENERGY_TEMPLATE: &str = "Sativa strains provide energizing effects perfect for daytime use. \
Try these for enhanced focus and creativity.\n\n\
Why it works: Uplifting terpenes like limonene and pinene promote alertness without the heavy body \
feel of indica strains.\n\n\
How to use: Keep doses modest during the day. A single puff or a low-dose edible is usually enough \
to lift your mood without losing focus.";

const PAIN_TEMPLATE: &str = "Higher THC products and balanced THC:CBD ratios work well for pain \
management.\n\n\
Why it works: THC activates CB1 receptors that modulate pain perception, while CBD can soften the \
psychoactive edge. Topicals provide localized relief without a high.\n\n\
How to use: Begin with 5-10mg THC for edibles or one puff for inhalables, and increase gradually.";

const ANXIETY_TEMPLATE: &str = "For anxiety relief, balanced products or lower THC doses work best. \
Start low and go slow.\n\n\
Why it works: Low doses of THC may ease anxiety while higher doses can increase it. CBD may \
counteract THC-induced anxiety, and linalool has calming properties.\n\n\
How to use: Try 2.5-5mg THC or a 1:1 THC:CBD product, and wait before taking more.";

const BEGINNER_TEMPLATE: &str = "Welcome to cannabis! Start with lower THC products to find your \
comfort level.\n\n\
Getting started: Edibles take 30-120 minutes to kick in, so wait at least 2 hours before taking \
more. Inhaled products act within 5-10 minutes.\n\n\
Stay safe: Keep CBD on hand in case you feel too high, stay hydrated, and never drive after use.";

const DEFAULT_TEMPLATE: &str = "Here are some popular products from Premo Cannabis in Keyport, NJ. \
Each product is lab-tested for quality and potency.\n\n\
Not sure where to start? Tell us what you're looking for, such as better sleep, more energy, pain \
relief or calm, and we'll narrow things down.";

/// Fixed template for an intent, without any prefix
pub fn template_for(intent: IntentCategory) -> &'static str {
    match intent {
        IntentCategory::Sleep => SLEEP_TEMPLATE,
        IntentCategory::Energy => ENERGY_TEMPLATE,
        IntentCategory::Pain => PAIN_TEMPLATE,
        IntentCategory::Anxiety => ANXIETY_TEMPLATE,
        IntentCategory::Beginner => BEGINNER_TEMPLATE,
        IntentCategory::Default => DEFAULT_TEMPLATE,
    }
}

/// Lead-in sentence for the experience level; casual users get none
pub fn experience_prefix(level: ExperienceLevel) -> Option<&'static str> {
    match level {
        ExperienceLevel::New => {
            Some("Since you're new to cannabis, we've kept these suggestions gentle.")
        }
        ExperienceLevel::Casual => None,
        ExperienceLevel::Experienced => {
            Some("As an experienced consumer, you may prefer the higher-potency options below.")
        }
    }
}

pub fn generate_explanation(intent: IntentCategory, level: ExperienceLevel) -> String {
    let template = template_for(intent);
    match experience_prefix(level) {
        Some(prefix) => format!("{} {}", prefix, template),
        None => template.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_casual_gets_bare_template() {
        let text = generate_explanation(IntentCategory::Sleep, ExperienceLevel::Casual);
        assert_eq!(text, SLEEP_TEMPLATE);
    }

    #[test]
    fn test_prefix_precedes_template() {
        let text = generate_explanation(IntentCategory::Energy, ExperienceLevel::New);
        assert!(text.starts_with("Since you're new"));
        assert!(text.ends_with(ENERGY_TEMPLATE));

        let text = generate_explanation(IntentCategory::Pain, ExperienceLevel::Experienced);
        assert!(text.starts_with("As an experienced consumer"));
        assert!(text.contains(PAIN_TEMPLATE));
    }

    #[test]
    fn test_templates_are_distinct() {
        let all = [
            IntentCategory::Sleep,
            IntentCategory::Energy,
            IntentCategory::Pain,
            IntentCategory::Anxiety,
            IntentCategory::Beginner,
            IntentCategory::Default,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(template_for(*a), template_for(*b));
            }
        }
    }
}
