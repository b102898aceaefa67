//! Concept classification for quiz labels.
//!
//! Maps free-text label text to a stable dotted `subject.topic.slug`
//! concept id used as the clustering key for mistake aggregation.
//! Classification is a prioritized rule scan: rule order and keyword
//! order within a rule are part of the contract, so identical input
//! always yields an identical concept id.

/// One (subject, topic) family and the keywords that select it.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub subject: &'static str,
    pub topic: &'static str,
    pub keywords: &'static [&'static str],
}

/// Built-in rule table covering the supported subject families.
/// Scanned top to bottom; first keyword substring match wins.
pub const DEFAULT_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        subject: "biology",
        topic: "cell_biology",
        keywords: &[
            "mitochondria",
            "nucleus",
            "ribosome",
            "chloroplast",
            "golgi",
            "endoplasmic reticulum",
            "lysosome",
            "cell membrane",
            "cell wall",
            "cytoplasm",
            "vacuole",
            "organelle",
        ],
    },
    ClassificationRule {
        subject: "biology",
        topic: "genetics",
        keywords: &[
            "dna", "rna", "chromosome", "gene", "allele", "mutation", "heredity", "genotype",
            "phenotype",
        ],
    },
    ClassificationRule {
        subject: "biology",
        topic: "anatomy",
        keywords: &[
            "heart", "lung", "liver", "kidney", "brain", "neuron", "artery", "vein", "muscle",
            "bone", "stomach", "intestine",
        ],
    },
    ClassificationRule {
        subject: "biology",
        topic: "ecology",
        keywords: &["ecosystem", "food chain", "biome", "habitat", "predator", "biodiversity"],
    },
    ClassificationRule {
        subject: "physics",
        topic: "mechanics",
        keywords: &["force", "velocity", "acceleration", "momentum", "friction", "gravity", "newton"],
    },
    ClassificationRule {
        subject: "physics",
        topic: "electricity",
        keywords: &["circuit", "voltage", "current", "resistance", "ohm", "capacitor", "electric"],
    },
    ClassificationRule {
        subject: "physics",
        topic: "optics",
        keywords: &["lens", "refraction", "reflection", "prism", "mirror", "wavelength"],
    },
    ClassificationRule {
        subject: "physics",
        topic: "thermodynamics",
        keywords: &["heat", "temperature", "entropy", "thermal"],
    },
    ClassificationRule {
        subject: "chemistry",
        topic: "periodic_table",
        keywords: &["element", "atomic number", "isotope", "periodic", "halogen", "noble gas"],
    },
    ClassificationRule {
        subject: "chemistry",
        topic: "bonding",
        keywords: &["covalent", "ionic", "electronegativity", "molecule", "bond"],
    },
    ClassificationRule {
        subject: "chemistry",
        topic: "reactions",
        keywords: &["reaction", "catalyst", "oxidation", "reduction", "combustion", "acid", "base"],
    },
];

// Unmatched labels land here. "anatomy" under "general" is a
// historical naming artifact kept for id stability.
const FALLBACK_SUBJECT: &str = "general";
const FALLBACK_TOPIC: &str = "anatomy";

/// Classify a label against the built-in rule table.
pub fn classify(label: &str) -> String {
    classify_with_rules(label, DEFAULT_RULES)
}

/// Classify a label against an explicit rule table.
pub fn classify_with_rules(label: &str, rules: &[ClassificationRule]) -> String {
    let normalized = label.trim().to_lowercase();
    let slug = slugify(&normalized);

    for rule in rules {
        for keyword in rule.keywords {
            if normalized.contains(keyword) {
                return format!("{}.{}.{}", rule.subject, rule.topic, slug);
            }
        }
    }
    format!("{FALLBACK_SUBJECT}.{FALLBACK_TOPIC}.{slug}")
}

/// Split a concept id into its (subject, topic) segments, defaulting
/// missing segments to `general`.
pub fn split_concept(concept_id: &str) -> (String, String) {
    let mut segments = concept_id.split('.');
    let subject = match segments.next() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => FALLBACK_SUBJECT.to_string(),
    };
    let topic = match segments.next() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => FALLBACK_SUBJECT.to_string(),
    };
    (subject, topic)
}

/// Collapse whitespace runs to single underscores and drop everything
/// outside `[a-z0-9_]`. Expects already-lowercased input.
fn slugify(normalized: &str) -> String {
    let slug: String = normalized
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();
    if slug.is_empty() {
        "unlabeled".to_string()
    } else {
        slug
    }
}
