use crate::models::SchoolSlug;

/// One entry of the exception table that maps display names to URL slugs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugRule {
    /// Substring replacement. When the replacement embeds the pattern and is already
    /// present, the rule is skipped so a slug is never expanded twice (`nebraska-omaha`).
    Replace(&'static str, &'static str),
    /// Fires only when the whole name equals the pattern
    Exact(&'static str, &'static str),
}

impl SlugRule {
    fn apply(&self, name: String) -> String {
        match *self {
            SlugRule::Replace(from, to) => {
                if to.contains(from) && name.contains(to) {
                    name
                } else {
                    name.replace(from, to)
                }
            }
            SlugRule::Exact(from, to) => {
                if name == from {
                    to.to_string()
                } else {
                    name
                }
            }
        }
    }
}

/// Markers stripped before the exception table runs. Order matters: the
/// non-breaking-space "ncaa" suffix must go before the punctuation.
const STRIP_MARKERS: &[&str] = &["\u{a0}ncaa", "(", ")", "&", "'", "."];

/// Schools whose sports-reference slug differs from their display name, applied in order
pub const SCHOOL_SLUG_RULES: &[SlugRule] = &[
    SlugRule::Replace("bowling green", "bowling-green-state"),
    SlugRule::Replace("east texas am", "texas-am-commerce"),
    SlugRule::Replace("fdu", "fairleigh-dickinson"),
    SlugRule::Replace("houston christian", "houston-baptist"),
    SlugRule::Replace("iu indy", "iupui"),
    SlugRule::Replace("kansas city", "missouri-kansas-city"),
    SlugRule::Replace("little rock", "arkansas little-rock"),
    SlugRule::Exact("louisiana", "louisiana-lafayette"),
    SlugRule::Replace("nc state", "north-carolina-state"),
    SlugRule::Replace("omaha", "nebraska-omaha"),
    SlugRule::Replace("purdue fort wayne", "ipfw"),
    SlugRule::Replace("sam houston", "sam-houston-state"),
    SlugRule::Replace("siu edwardsville", "southern-illinois-edwardsville"),
    SlugRule::Replace("st thomas", "st-thomas-mn"),
    SlugRule::Replace("tcu", "texas-christian"),
    SlugRule::Replace("texas-rio grande valley", "texas-pan-american"),
    SlugRule::Replace("the citadel", "citadel"),
    SlugRule::Replace("uab", "alabama-birmingham"),
    SlugRule::Replace("uc davis", "california-davis"),
    SlugRule::Replace("uc irvine", "california-irvine"),
    SlugRule::Replace("uc riverside", "california-riverside"),
    SlugRule::Replace("uc san diego", "california-san-diego"),
    SlugRule::Replace("uc santa barbara", "california-santa-barbara"),
    SlugRule::Replace("ucf", "central-florida"),
    SlugRule::Replace("unc asheville", "north-carolina-asheville"),
    SlugRule::Replace("unc greensboro", "north-carolina-greensboro"),
    SlugRule::Replace("unc wilmington", "north-carolina-wilmington"),
    SlugRule::Replace("ut arlington", "texas-arlington"),
    SlugRule::Replace("utah tech", "dixie-state"),
    SlugRule::Replace("utep", "texas-el-paso"),
    SlugRule::Replace("utsa", "texas-san-antonio"),
    SlugRule::Replace("vmi", "virginia-military-institute"),
    // "William & Mary" loses its ampersand above, leaving two spaces
    SlugRule::Replace("william  mary", "william-mary"),
];

/// Normalize a school display name into its sports-reference URL slug
pub fn normalize_school_name(raw: &str) -> String {
    normalize_with(raw, SCHOOL_SLUG_RULES)
}

/// Same as [`normalize_school_name`] with a caller-supplied exception table
pub fn normalize_with(raw: &str, rules: &[SlugRule]) -> String {
    let mut name = raw.to_lowercase();
    for marker in STRIP_MARKERS {
        name = name.replace(marker, "");
    }
    // "UConn (NCAA)" style markers survive the punctuation strip as a trailing word
    if let Some(stripped) = name.strip_suffix(" ncaa") {
        name = stripped.to_string();
    }

    for rule in rules {
        name = rule.apply(name);
    }

    name.replace(' ', "-")
}

/// Typed wrapper around [`normalize_school_name`]
pub fn school_slug(raw: &str) -> SchoolSlug {
    SchoolSlug::new(normalize_school_name(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every exception-table school as shown on the roster page, with its expected slug
    fn exception_slugs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("Bowling Green", "bowling-green-state"),
            ("East Texas A&M", "texas-am-commerce"),
            ("FDU", "fairleigh-dickinson"),
            ("Houston Christian", "houston-baptist"),
            ("IU Indy", "iupui"),
            ("Kansas City", "missouri-kansas-city"),
            ("Little Rock", "arkansas-little-rock"),
            ("Louisiana", "louisiana-lafayette"),
            ("NC State", "north-carolina-state"),
            ("Omaha", "nebraska-omaha"),
            ("Purdue Fort Wayne", "ipfw"),
            ("Sam Houston", "sam-houston-state"),
            ("SIU Edwardsville", "southern-illinois-edwardsville"),
            ("St. Thomas", "st-thomas-mn"),
            ("TCU", "texas-christian"),
            ("Texas-Rio Grande Valley", "texas-pan-american"),
            ("The Citadel", "citadel"),
            ("UAB", "alabama-birmingham"),
            ("UC Davis", "california-davis"),
            ("UC Irvine", "california-irvine"),
            ("UC Riverside", "california-riverside"),
            ("UC San Diego", "california-san-diego"),
            ("UC Santa Barbara", "california-santa-barbara"),
            ("UCF", "central-florida"),
            ("UNC Asheville", "north-carolina-asheville"),
            ("UNC Greensboro", "north-carolina-greensboro"),
            ("UNC Wilmington", "north-carolina-wilmington"),
            ("UT Arlington", "texas-arlington"),
            ("Utah Tech", "dixie-state"),
            ("UTEP", "texas-el-paso"),
            ("UTSA", "texas-san-antonio"),
            ("VMI", "virginia-military-institute"),
            ("William & Mary", "william-mary"),
        ]
    }

    #[test]
    fn test_every_exception_maps_to_its_slug() {
        let cases = exception_slugs();
        assert_eq!(cases.len(), SCHOOL_SLUG_RULES.len());
        for (raw, expected) in cases {
            assert_eq!(normalize_school_name(raw), expected, "slug for {raw:?}");
        }
    }

    #[test]
    fn test_rule_whose_replacement_contains_part_of_pattern() {
        assert_eq!(normalize_school_name("The Citadel"), "citadel");
        assert_eq!(
            normalize_with("The Citadel", &[SlugRule::Replace("the citadel", "citadel")]),
            "citadel"
        );
    }

    #[test]
    fn test_other_names() {
        assert_eq!(normalize_school_name("St. John's (NY)"), "st-johns-ny");
        assert_eq!(normalize_school_name("Texas A&M"), "texas-am");
    }

    #[test]
    fn test_plain_names_are_hyphenated() {
        assert_eq!(normalize_school_name("Duke"), "duke");
        assert_eq!(normalize_school_name("North Carolina"), "north-carolina");
        assert_eq!(normalize_school_name("Miami (FL)"), "miami-fl");
    }

    #[test]
    fn test_ncaa_markers_are_stripped() {
        let slug = normalize_school_name("UConn (NCAA)");
        assert_eq!(slug, "uconn");
        assert!(!slug.contains('('));
        assert!(!slug.contains(')'));
        assert!(!slug.contains("ncaa"));

        assert_eq!(normalize_school_name("Duke\u{a0}NCAA"), "duke");
    }

    #[test]
    fn test_louisiana_is_exact_match_only() {
        assert_eq!(normalize_school_name("Louisiana"), "louisiana-lafayette");
        assert_eq!(normalize_school_name("Louisiana Tech"), "louisiana-tech");
        assert_eq!(normalize_school_name("Louisiana State"), "louisiana-state");
    }

    #[test]
    fn test_normalize_is_idempotent_for_exceptions() {
        for (raw, expected) in exception_slugs() {
            let once = normalize_school_name(raw);
            assert_eq!(once, expected);
            assert_eq!(
                normalize_school_name(&once),
                expected,
                "normalizing {raw:?} twice changed the slug"
            );
        }
    }

    #[test]
    fn test_custom_rule_table() {
        let rules = [SlugRule::Replace("ole miss", "mississippi")];
        assert_eq!(normalize_with("Ole Miss", &rules), "mississippi");
        // built-in exceptions are not applied when a custom table is supplied
        assert_eq!(normalize_with("UCF", &rules), "ucf");
    }
}
