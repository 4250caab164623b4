//! Shared test utilities for `morphotree-core`.

use std::env;

use proptest::test_runner::Config as ProptestConfig;

/// Environment variable overriding proptest case counts.
const PROPTEST_CASES_ENV_KEY: &str = "PROPTEST_CASES";

/// Builds the proptest configuration shared by every property suite.
///
/// `PROPTEST_CASES` overrides `default_cases` when it holds a positive
/// integer; anything else is ignored with a warning.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases: cases_or_default(env::var(PROPTEST_CASES_ENV_KEY).ok().as_deref(), default_cases),
        ..ProptestConfig::default()
    }
}

fn cases_or_default(raw: Option<&str>, default_cases: u32) -> u32 {
    let Some(raw) = raw else {
        return default_cases;
    };
    match raw.trim().parse::<u32>() {
        Ok(cases) if cases > 0 => cases,
        _ => {
            tracing::warn!(
                env = PROPTEST_CASES_ENV_KEY,
                raw = %raw,
                "invalid property-test case override; using default",
            );
            default_cases
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 64)]
    #[case(Some("12"), 12)]
    #[case(Some(" 7 "), 7)]
    #[case(Some("0"), 64)]
    #[case(Some("many"), 64)]
    fn parses_case_overrides(#[case] raw: Option<&str>, #[case] expected: u32) {
        assert_eq!(cases_or_default(raw, 64), expected);
    }
}
