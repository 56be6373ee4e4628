//! Include/exclude filters and the per-step gate.

use std::collections::HashSet;

/// Step filters collected from `--only` and `--skip`/`--without`.
///
/// Built once from the command line and never mutated afterwards. Both sets
/// may be populated at the same time: `only` narrows the run, `skip` is
/// always subtracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    skip: HashSet<String>,
    only: HashSet<String>,
}

impl Filters {
    pub fn new<S, O>(skip: S, only: O) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            skip: skip.into_iter().map(Into::into).collect(),
            only: only.into_iter().map(Into::into).collect(),
        }
    }

    /// Build filters from the raw comma-separated flag values.
    pub fn from_lists(skip: Option<&str>, only: Option<&str>) -> Self {
        Self::new(
            skip.map(split_list).unwrap_or_default(),
            only.map(split_list).unwrap_or_default(),
        )
    }

    /// Whether the step called `name` passes the gate.
    pub fn should_run(&self, name: &str) -> bool {
        (self.only.is_empty() || self.only.contains(name)) && !self.skip.contains(name)
    }

    /// True when an `--only` list was given, i.e. this is a targeted run.
    pub fn is_targeted(&self) -> bool {
        !self.only.is_empty()
    }

    pub fn skip(&self) -> &HashSet<String> {
        &self.skip
    }

    pub fn only(&self) -> &HashSet<String> {
        &self.only
    }
}

/// Split a comma-separated step list. Tokens are kept verbatim.
pub fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 3] = ["migrate", "seed", "composer"];

    /// Every subset of `NAMES`, as bitmasks.
    fn subsets() -> impl Iterator<Item = Vec<&'static str>> {
        (0..(1u8 << NAMES.len())).map(|mask| {
            NAMES
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, n)| *n)
                .collect()
        })
    }

    #[test]
    fn empty_filters_run_everything() {
        let filters = Filters::default();
        for name in NAMES {
            assert!(filters.should_run(name));
        }
        assert!(!filters.is_targeted());
    }

    #[test]
    fn gate_matches_definition_over_all_small_sets() {
        for skip in subsets() {
            for only in subsets() {
                let filters = Filters::new(skip.clone(), only.clone());
                for name in NAMES {
                    let expected =
                        (only.is_empty() || only.contains(&name)) && !skip.contains(&name);
                    assert_eq!(
                        filters.should_run(name),
                        expected,
                        "skip={skip:?} only={only:?} name={name}"
                    );
                }
            }
        }
    }

    #[test]
    fn skip_wins_over_only() {
        let filters = Filters::new(["migrate"], ["migrate", "seed"]);
        assert!(!filters.should_run("migrate"));
        assert!(filters.should_run("seed"));
        assert!(!filters.should_run("composer"));
    }

    #[test]
    fn from_lists_splits_on_commas() {
        let filters = Filters::from_lists(Some("npm_install,npm_build"), None);
        assert!(!filters.should_run("npm_install"));
        assert!(!filters.should_run("npm_build"));
        assert!(filters.should_run("migrate"));
    }

    #[test]
    fn tokens_are_not_trimmed() {
        let filters = Filters::from_lists(None, Some("migrate, seed"));
        assert!(filters.should_run("migrate"));
        assert!(!filters.should_run("seed"));
        assert!(filters.only().contains(" seed"));
    }
}
