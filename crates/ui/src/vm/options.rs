use std::num::NonZeroUsize;

use quiz_core::subset::SubsetPolicy;

const PAGE_SIZES: [usize; 5] = [1, 5, 10, 20, 50];
const SUBSET_COUNTS: [usize; 4] = [10, 20, 50, 65];

/// Choices for the questions-per-page selector; the current value is always
/// offered.
#[must_use]
pub fn page_size_options(current: usize) -> Vec<usize> {
    let mut sizes = PAGE_SIZES.to_vec();
    if current > 0 && !sizes.contains(&current) {
        sizes.push(current);
        sizes.sort_unstable();
    }
    sizes
}

/// Choices for the total-questions selector, `all` first.
#[must_use]
pub fn subset_options(current: SubsetPolicy) -> Vec<SubsetPolicy> {
    let mut options = vec![SubsetPolicy::All];
    options.extend(
        SUBSET_COUNTS
            .iter()
            .filter_map(|n| NonZeroUsize::new(*n))
            .map(SubsetPolicy::Count),
    );
    if !options.contains(&current) {
        options.push(current);
    }
    options
}

#[must_use]
pub fn parse_page_size(raw: &str) -> Option<NonZeroUsize> {
    raw.trim().parse::<usize>().ok().and_then(NonZeroUsize::new)
}
