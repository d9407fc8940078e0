//! WMO weather condition codes: labels and severity.
//!
//! See <https://open-meteo.com/en/docs> for the code reference.

/// Label returned for codes outside [`LABELS`].
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Known WMO codes and their display labels.
pub const LABELS: &[(i32, &str)] = &[
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Fog"),
    (48, "Depositing rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (56, "Light freezing drizzle"),
    (57, "Dense freezing drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (66, "Light freezing rain"),
    (67, "Heavy freezing rain"),
    (71, "Slight snow fall"),
    (73, "Moderate snow fall"),
    (75, "Heavy snow fall"),
    (77, "Snow grains"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (85, "Slight snow showers"),
    (86, "Heavy snow showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm with slight hail"),
    (99, "Thunderstorm with heavy hail"),
];

/// Ranked codes, least to most severe. A code's rank is its index.
///
/// Codes not listed rank below every listed one.
pub const SEVERITY: &[i32] = &[61, 63, 65, 66, 67, 80, 81, 82, 95, 96, 99];

/// Human-readable label for a WMO code; `"Unknown"` for anything unrecognised.
pub fn describe(code: i32) -> &'static str {
    LABELS
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(UNKNOWN_LABEL, |&(_, label)| label)
}

/// Severity rank of `code`, or `None` when the code is unranked.
pub fn rank(code: i32) -> Option<usize> {
    SEVERITY.iter().position(|ranked| *ranked == code)
}

/// Most severe code among `codes`.
///
/// When none of the codes is ranked the first one wins, so the result depends
/// on input order only in that case. Returns `None` for an empty slice.
pub fn worst(codes: &[i32]) -> Option<i32> {
    let first = *codes.first()?;

    let most_severe = codes
        .iter()
        .filter_map(|&code| rank(code).map(|r| (r, code)))
        .max_by_key(|(r, _)| *r)
        .map(|(_, code)| code);

    Some(most_severe.unwrap_or(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: [i32; 28] = [
        0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80, 81, 82,
        85, 86, 95, 96, 99,
    ];

    #[test]
    fn every_known_code_has_a_label() {
        for code in KNOWN {
            let label = describe(code);
            assert!(!label.is_empty());
            assert_ne!(label, UNKNOWN_LABEL, "code {code} should be known");
        }
        assert_eq!(LABELS.len(), KNOWN.len());
    }

    #[test]
    fn unrecognised_codes_are_unknown() {
        for code in [-1, 4, 50, 60, 100, 1000, i32::MIN, i32::MAX] {
            assert_eq!(describe(code), "Unknown");
        }
    }

    #[test]
    fn worst_picks_highest_rank_regardless_of_order() {
        assert_eq!(worst(&[61, 99, 63]), Some(99));
        assert_eq!(worst(&[99, 61]), Some(99));
        assert_eq!(worst(&[61, 99]), Some(99));
        assert_eq!(worst(&[80, 67, 66]), Some(80));
    }

    #[test]
    fn ranked_code_beats_unranked() {
        assert_eq!(worst(&[3, 45, 61, 0]), Some(61));
        assert_eq!(worst(&[71, 75, 63]), Some(63));
    }

    #[test]
    fn first_code_wins_when_none_ranked() {
        assert_eq!(worst(&[2, 3, 0]), Some(2));
        assert_eq!(worst(&[0, 3, 2]), Some(0));
        assert_eq!(worst(&[75]), Some(75));
    }

    #[test]
    fn worst_of_nothing_is_none() {
        assert_eq!(worst(&[]), None);
    }

    #[test]
    fn severity_ranks_are_increasing() {
        assert_eq!(rank(61), Some(0));
        assert_eq!(rank(82), Some(7));
        assert_eq!(rank(99), Some(10));
        assert_eq!(rank(3), None);
    }
}
