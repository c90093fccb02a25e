//! Mock catalog generation.
//!
//! Builds the demo catalog the app starts from: agencies, a shuffled feedback pool spread
//! over programs, two knowledge hub offerings per program and the city directory used by
//! the map. A fixed seed reproduces the same catalog.

use crate::{
    config::CatalogConfig,
    core::cities::{CityDirectory, DESTINATIONS},
    entities::{
        Agency, Course, CourseKind, Feedback, Program, ProgramId,
        feedback::{MAX_RATING, MIN_RATING, POSITIVE_RATING},
    },
};
use chrono::NaiveDate;
use rand::{
    Rng, SeedableRng,
    rngs::StdRng,
    seq::{IteratorRandom, SliceRandom},
};
use std::collections::BTreeSet;
use tracing::{info, trace};

/// Agency certification tags
pub const CERTIFICATIONS: [&str; 5] = [
    "24/7 Local Support",
    "Verified Safe Accommodation",
    "Comprehensive Pre-Departure Training",
    "Full Financial Transparency",
    "Ethical Community Partnerships",
];

/// Program verification tags
pub const VERIFICATIONS: [&str; 10] = [
    "SafeJourney Premium Seal",
    "Ideal for First-Time Travelers",
    "Women's Leadership Focus",
    "Deep Cultural Immersion",
    "Local Community Connection",
    "Accessible for People with Disabilities",
    "Sustainable and Eco-Friendly",
    "Networking Opportunities",
    "Flexible Dates and Payment",
    "Outstanding Student Reviews",
];

/// Partner attached to every mentorship
pub const ALUMNI_PARTNER: &str = "SafeJourney Alumni";

const AGENCY_NAMES: [&str; crate::config::MAX_AGENCIES] = [
    "Global Sisters Exchange",
    "Wanderlust Women Abroad",
    "Athena Adventures",
    "Femme Forward Travels",
    "Empower Exchange",
    "Sisterhood Journeys",
    "Galavant Girls",
    "ConnectHer Abroad",
    "The Abroad Arc",
    "Venture Vixens",
    "StudySphere International",
    "Global Horizons",
    "Academic Adventures",
    "World Class Studies",
    "InterConnect",
    "Future Frontiers",
    "Odyssey Exchange",
    "Pioneer Programs",
    "Summit Studies",
    "Nexus International",
];

const EXCELLENCE_REASON: &str = "Verified for excellence in safety, support and transparency, \
    meeting every SafeJourney criterion.";
const TRACK_RECORD_REASON: &str = "Verified by SafeJourney for a strong feedback record and a \
    commitment to traveler safety.";

const FIRST_NAMES: [&str; 20] = [
    "Maria", "Ana", "Sofia", "Lara", "Beatriz", "Mariana", "Julia", "Isabella", "Laura", "Camila",
    "Gabriela", "Priya", "Chloe", "Aisha", "Elena", "Fernanda", "Luiza", "Valentina", "Yasmin",
    "Bruna",
];
const LAST_NAMES: [&str; 15] = [
    "Silva", "Santos", "Oliveira", "Souza", "Rodrigues", "Ferreira", "Alves", "Pereira", "Lima",
    "Gomes", "Costa", "Ribeiro", "Martins", "Carvalho", "Almeida",
];

const POSITIVE_COMMENTS: [&str; 5] = [
    "A transformative experience! I felt safe and welcome from start to finish.",
    "Highly recommended. Local support was amazing and I made friends for life.",
    "Perfectly organised. Great accommodation and enriching classes. Unforgettable.",
    "The best decision I ever made. The team helped with every detail.",
    "Simply perfect. Pre-departure training made me confident to travel alone.",
];
const NEUTRAL_COMMENTS: [&str; 5] = [
    "A good experience overall. Strong academics, social events could be better.",
    "Amazing city. Some early accommodation issues, but the agency sorted them out.",
    "The course met expectations. Communication was slow at times.",
    "The listing was a bit more glamorous than reality. Still worth it.",
    "Solid, not extraordinary. The housing location was not ideal.",
];
const NEGATIVE_COMMENTS: [&str; 5] = [
    "Disappointing. The promised support was missing when I needed it.",
    "Not recommended. The accommodation photos did not match reality.",
    "Very disorganised. Key information arrived at the last minute.",
    "Poor value. Extra costs were not disclosed up front.",
    "I felt abandoned. Reaching the agency during the exchange was nearly impossible.",
];

const PROGRAM_TYPES: [&str; 6] = [
    "Immersion in",
    "Studies in",
    "Volunteering in",
    "Internship in",
    "Workshop on",
    "Adventure and",
];
const PROGRAM_SUBJECTS: [&str; 12] = [
    "Language and Culture",
    "European Business",
    "Digital Arts and Design",
    "Creative Writing",
    "Marine Biology",
    "Fashion Marketing",
    "Sustainability",
    "International Relations",
    "Global Health",
    "Gastronomy",
    "Photography",
    "Human Rights",
];
const INCLUDES: [&str; 10] = [
    "Tuition",
    "Verified Accommodation",
    "Cultural Activities",
    "24/7 Local Support",
    "Travel Insurance",
    "Course Materials",
    "Public Transport Pass",
    "Safety Workshop",
    "Mentoring Session",
    "Welcome Kit",
];

const COURSE_PARTNERS: [&str; 6] = [
    "SafeJourney Team",
    "Global Connect Institute",
    "Smart Money Abroad",
    ALUMNI_PARTNER,
    "Career Builders",
    "Cultural Insights Co.",
];
const COURSE_INSTRUCTORS: [&str; 8] = [
    "Maria Reis",
    "Dr. Aiko Tanaka",
    "Chloe Davis",
    "Ana Pereira",
    "Juliana Costa",
    "Renata Alves",
    "Beatriz Lima",
    "Carla Martins",
];
const PARTIAL_DISCOUNTS: [u8; 5] = [30, 35, 40, 45, 50];

/// Everything the app starts with
#[derive(Debug, Clone)]
pub struct GeneratedCatalog {
    /// Agencies with ids `1..=agencies`
    pub agencies: Vec<Agency>,
    /// Programs with ids `1..=programs`
    pub programs: Vec<Program>,
    /// Two offerings per program
    pub courses: Vec<Course>,
    /// Map placement of every destination
    pub cities: CityDirectory,
}

/// Generates the demo catalog described by `config`.
///
/// The config is expected to have passed [`crate::config::AppConfig::validate`].
#[must_use]
pub fn generate_catalog(config: &CatalogConfig) -> GeneratedCatalog {
    let mut rng = config
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    let agencies = generate_agencies(&mut rng, config);
    let mut pool = FeedbackPool::new(&mut rng, config.feedbacks);
    let programs = generate_programs(&mut rng, config, &agencies, &mut pool);
    let courses = generate_courses(&mut rng, &programs);
    let cities = CityDirectory::with_random_radii(&mut rng);

    info!(
        "Generated catalog: {} agencies, {} programs, {} courses (seed {:?})",
        agencies.len(),
        programs.len(),
        courses.len(),
        config.seed
    );

    GeneratedCatalog {
        agencies,
        programs,
        courses,
        cities,
    }
}

fn tag_subset<R: Rng>(rng: &mut R, tags: &[&str], amount: usize) -> BTreeSet<String> {
    tags.choose_multiple(rng, amount)
        .map(ToString::to_string)
        .collect()
}

fn all_tags(tags: &[&str]) -> BTreeSet<String> {
    tags.iter().map(ToString::to_string).collect()
}

fn pick<'a, R: Rng>(rng: &mut R, values: &[&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

fn generate_agencies<R: Rng>(rng: &mut R, config: &CatalogConfig) -> Vec<Agency> {
    AGENCY_NAMES
        .iter()
        .take(config.agencies)
        .zip(1u64..)
        .enumerate()
        .map(|(index, (name, id))| {
            let top = index < config.top_agencies;
            let certifications = if top {
                all_tags(&CERTIFICATIONS)
            } else {
                let amount = rng.gen_range(0..=4);
                tag_subset(rng, &CERTIFICATIONS, amount)
            };
            let is_verified = top || rng.gen_bool(0.6);
            let verification_reason = is_verified.then(|| {
                if top {
                    EXCELLENCE_REASON.to_string()
                } else {
                    TRACK_RECORD_REASON.to_string()
                }
            });
            let description = format!(
                "Agency specialised in {} and {}.",
                pick(rng, &PROGRAM_SUBJECTS).to_lowercase(),
                pick(rng, &PROGRAM_SUBJECTS).to_lowercase()
            );

            Agency {
                id,
                name: (*name).to_string(),
                logo: format!("https://picsum.photos/seed/agency{id}/200/200"),
                is_verified,
                verification_reason,
                description,
                certifications,
            }
        })
        .collect()
}

fn random_rating<R: Rng>(rng: &mut R) -> u8 {
    let roll: f64 = rng.r#gen();
    if roll < 0.8 {
        rng.gen_range(POSITIVE_RATING..=MAX_RATING)
    } else if roll < 0.9 {
        POSITIVE_RATING - 1
    } else {
        rng.gen_range(MIN_RATING..POSITIVE_RATING - 1)
    }
}

fn random_feedback<R: Rng>(rng: &mut R, id: u64) -> Feedback {
    let rating = random_rating(rng);
    let comments = match rating {
        POSITIVE_RATING.. => &POSITIVE_COMMENTS,
        3 => &NEUTRAL_COMMENTS,
        _ => &NEGATIVE_COMMENTS,
    };
    let comment = pick(rng, comments).to_string();
    let first = pick(rng, &FIRST_NAMES);
    let initial = pick(rng, &LAST_NAMES).chars().next().unwrap_or('A');
    let date = NaiveDate::from_ymd_opt(
        2020 + rng.gen_range(2..=4),
        rng.gen_range(1..=12),
        rng.gen_range(1..=28),
    )
    .unwrap_or_default();

    Feedback {
        id,
        author: format!("{first} {initial}."),
        avatar: format!("https://loremflickr.com/150/150/woman,portrait?lock={id}"),
        rating,
        comment,
        date,
    }
}

/// Shuffled feedback entries, each handed to exactly one program.
///
/// Once the configured entries run out, fresh ones are created with the next free ids.
struct FeedbackPool {
    entries: std::vec::IntoIter<Feedback>,
    next_id: u64,
}

impl FeedbackPool {
    fn new<R: Rng>(rng: &mut R, size: usize) -> Self {
        let size = size as u64;
        let mut entries: Vec<Feedback> = (1..=size).map(|id| random_feedback(rng, id)).collect();
        entries.shuffle(rng);
        Self {
            entries: entries.into_iter(),
            next_id: size + 1,
        }
    }

    fn take<R: Rng>(&mut self, rng: &mut R, amount: usize) -> Vec<Feedback> {
        (0..amount)
            .map(|_| match self.entries.next() {
                Some(feedback) => feedback,
                None => {
                    let id = self.next_id;
                    self.next_id += 1;
                    trace!("Feedback pool exhausted, creating feedback {id}");
                    random_feedback(rng, id)
                }
            })
            .collect()
    }
}

fn generate_programs<R: Rng>(
    rng: &mut R,
    config: &CatalogConfig,
    agencies: &[Agency],
    pool: &mut FeedbackPool,
) -> Vec<Program> {
    (0..config.programs)
        .zip(1u64..)
        .filter_map(|(index, id)| {
            let premium = index < config.premium_programs;
            let agency = if premium {
                agencies.get(index % config.top_agencies.max(1))
            } else {
                agencies.choose(rng)
            }?
            .clone();
            let destination = *DESTINATIONS.choose(rng)?;
            let kind = pick(rng, &PROGRAM_TYPES);
            let subject = pick(rng, &PROGRAM_SUBJECTS);
            let feedback_count = rng.gen_range(2..=4);
            let includes_count = rng.gen_range(4..=7);
            let verifications = if premium {
                all_tags(&VERIFICATIONS)
            } else {
                let amount = rng.gen_range(0..=5);
                tag_subset(rng, &VERIFICATIONS, amount)
            };
            let city = destination.city;

            Some(Program {
                id,
                name: format!("{kind} {subject} in {city}"),
                destination_city: city.to_string(),
                destination_country: destination.country.to_string(),
                price: rng.gen_range(1500..=5000),
                short_description: format!(
                    "Explore {} in the vibrant city of {city}. A unique experience offered by {}.",
                    subject.to_lowercase(),
                    agency.name
                ),
                long_description: format!(
                    "This immersive program in {city} is a unique chance to deepen your \
                     knowledge of {}. With the support of {}, you get workshops, cultural \
                     activities and a solid support network for a safe and rewarding journey.",
                    subject.to_lowercase(),
                    agency.name
                ),
                includes: INCLUDES
                    .iter()
                    .choose_multiple(rng, includes_count)
                    .into_iter()
                    .map(ToString::to_string)
                    .collect(),
                feedbacks: pool.take(rng, feedback_count),
                image: format!(
                    "https://picsum.photos/seed/{}{index}/800/600",
                    city.replace(' ', "")
                ),
                verifications,
                agency,
            })
        })
        .collect()
}

fn course_discount<R: Rng>(rng: &mut R) -> u8 {
    if rng.gen_bool(0.5) {
        crate::entities::course::FREE_DISCOUNT
    } else {
        PARTIAL_DISCOUNTS.choose(rng).copied().unwrap_or(30)
    }
}

/// Tenth of the program price, rounded half-up.
fn offering_price(program_price: u32) -> u32 {
    (program_price + 5) / 10
}

fn generate_courses<R: Rng>(rng: &mut R, programs: &[Program]) -> Vec<Course> {
    programs
        .iter()
        .zip(0u64..)
        .flat_map(|(program, index)| {
            let program_id: ProgramId = program.id;
            let city = &program.destination_city;
            let price = offering_price(program.price);
            let course = Course {
                id: index * 2 + 1,
                kind: CourseKind::Course,
                title: format!("Cultural Immersion Course for {city}"),
                description: format!(
                    "Get ready for your time in {city}: local customs, safety tips and the \
                     phrases you need to settle in smoothly."
                ),
                instructor: pick(rng, &COURSE_INSTRUCTORS).to_string(),
                partner: pick(rng, &COURSE_PARTNERS).to_string(),
                price,
                program_id,
                discount_percentage: course_discount(rng),
            };
            let mentorship = Course {
                id: index * 2 + 2,
                kind: CourseKind::Mentorship,
                title: format!("Career Mentorship in {city}"),
                description: format!(
                    "Meet a mentor who already lived an exchange in {city} and get practical \
                     advice for your career during and after the program."
                ),
                instructor: pick(rng, &COURSE_INSTRUCTORS).to_string(),
                partner: ALUMNI_PARTNER.to_string(),
                price,
                program_id,
                discount_percentage: course_discount(rng),
            };
            [course, mentorship]
        })
        .collect()
}
