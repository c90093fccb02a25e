//! Static content pages.

use crate::{
    core::generator::{CERTIFICATIONS, VERIFICATIONS},
    entities::{ContentItem, ContentPage, ContentSection},
};

const CERTIFICATION_TEXT: [&str; 5] = [
    "Travelers get continuous help at the destination, day or night, for emergencies or \
     anything else that comes up.",
    "Every housing option has been inspected and approved against strict safety, \
     cleanliness and location criteria.",
    "The agency prepares travelers before departure, covering cultural, safety, logistic \
     and emotional aspects of the trip.",
    "All program costs are itemised with no hidden fees, so travelers know exactly what \
     they pay for.",
    "The agency partners with local organisations responsibly, leaving a positive impact \
     on the host community.",
];

const VERIFICATION_TEXT: [&str; 10] = [
    "Programs meeting the highest standard in every evaluation criterion.",
    "Designed for people who never traveled alone, with extra support and integration \
     activities.",
    "Includes workshops, mentoring or activities that build leadership skills for women.",
    "Goes beyond tourism with genuine contact with local customs, language and daily life.",
    "Encourages bonds with residents through volunteering, events or community projects.",
    "The program and its housing are equipped to welcome people with disabilities.",
    "Built around practices that respect the environment and local sustainability.",
    "Offers events and contacts that grow the traveler's professional network.",
    "Flexible start dates and payment options make planning easier.",
    "Consistently high ratings make this one of our travelers' favourites.",
];

fn section(title: &str, items: impl IntoIterator<Item = (&'static str, &'static str)>) -> ContentSection {
    ContentSection {
        title: title.to_string(),
        content: items
            .into_iter()
            .map(|(subtitle, text)| ContentItem {
                subtitle: subtitle.to_string(),
                text: text.to_string(),
            })
            .collect(),
    }
}

/// Explains every agency certification and program verification tag.
#[must_use]
pub fn certifications_page() -> ContentPage {
    ContentPage {
        title: "Certifications and Verifications".to_string(),
        sections: vec![
            section(
                "Agency Certifications",
                CERTIFICATIONS.into_iter().zip(CERTIFICATION_TEXT),
            ),
            section(
                "Program Verification Seals",
                VERIFICATIONS.into_iter().zip(VERIFICATION_TEXT),
            ),
        ],
    }
}

/// Describes the platform.
#[must_use]
pub fn about_page() -> ContentPage {
    ContentPage {
        title: "About SafeJourney".to_string(),
        sections: vec![
            section(
                "Our Mission",
                [(
                    "Safer exchanges",
                    "SafeJourney helps women choose study abroad programs with confidence by \
                     putting real traveler feedback and verified safety practices first.",
                )],
            ),
            section(
                "How It Works",
                [
                    (
                        "Verified agencies",
                        "Agencies earn certifications for local support, safe housing, \
                         training, financial transparency and ethical partnerships.",
                    ),
                    (
                        "Community feedback",
                        "Every program shows ratings from past travelers, and the safety map \
                         summarises how positive that feedback is in each city.",
                    ),
                    (
                        "Knowledge hub",
                        "Courses and mentorships prepare travelers for their destination, \
                         often free when bundled with a program.",
                    ),
                ],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certifications_page_covers_every_tag() {
        let page = certifications_page();
        assert_eq!(page.sections.len(), 2);
        let subtitles: Vec<&str> = page.sections[0]
            .content
            .iter()
            .map(|item| item.subtitle.as_str())
            .collect();
        assert_eq!(subtitles, CERTIFICATIONS);
        assert_eq!(page.sections[1].content.len(), VERIFICATIONS.len());
        assert!(page
            .sections
            .iter()
            .flat_map(|s| &s.content)
            .all(|item| !item.text.is_empty()));
    }

    #[test]
    fn test_about_page_has_content() {
        let page = about_page();
        assert_eq!(page.title, "About SafeJourney");
        assert!(!page.sections.is_empty());
    }
}
