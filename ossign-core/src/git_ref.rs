//! Git ref handling

const BRANCH_PREFIX: &str = "refs/heads/";
const TAG_PREFIX: &str = "refs/tags/";

/// Strips a leading `refs/heads/` or `refs/tags/` prefix from a ref.
///
/// Exactly one prefix is removed. Refs matching neither prefix (pull request
/// refs, bare names) pass through unchanged.
pub fn resolve_ref_name(git_ref: &str) -> &str {
    git_ref
        .strip_prefix(BRANCH_PREFIX)
        .or_else(|| git_ref.strip_prefix(TAG_PREFIX))
        .unwrap_or(git_ref)
}
