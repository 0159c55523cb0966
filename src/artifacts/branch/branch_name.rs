use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use crate::errors::{RepositoryError, Result};
use derive_new::new;

const REF_PREFIX: &str = "refs/heads/";

/// Path of a reference relative to the metadata directory,
/// e.g. `HEAD` or `refs/heads/master`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, new)]
pub struct SymRefName(String);

impl SymRefName {
    pub fn is_detached_head(&self) -> bool {
        self.0 == "HEAD"
    }

    pub fn as_ref_path(&self) -> &str {
        &self.0
    }

    pub fn from_branch(branch_name: &BranchName) -> Self {
        Self(format!("{REF_PREFIX}{}", branch_name.as_ref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .map_err(|e| RepositoryError::corrupt("branch name pattern", e))?;

        if name.is_empty() || re.is_match(&name) {
            Err(RepositoryError::InvalidBranchName(name))
        } else {
            Ok(Self(name))
        }
    }

    /// Branch name behind a `refs/heads/...` reference, `None` for HEAD
    pub fn try_parse_sym_ref_name(sym_ref_name: &SymRefName) -> Result<Option<Self>> {
        if sym_ref_name.is_detached_head() {
            return Ok(None);
        }

        match sym_ref_name.0.strip_prefix(REF_PREFIX) {
            Some(name) => Self::try_parse(name).map(Some),
            None => Err(RepositoryError::corrupt(
                "HEAD",
                format!("symbolic ref must start with '{REF_PREFIX}', got '{}'", sym_ref_name.0),
            )),
        }
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;

    proptest! {
        #[test]
        fn test_is_valid_branch_name_with_valid_branch_name(
            branch_name in "[a-zA-Z0-9_-]+"
        ) {
            assert!(BranchName::try_parse(branch_name).is_ok());
        }

        #[test]
        fn test_is_valid_branch_name_with_slashes(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}/{}", prefix, suffix);
            assert!(BranchName::try_parse(branch_name).is_ok());
        }

        #[test]
        fn test_is_invalid_branch_name_starting_with_dot(
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!(".{}", suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn test_is_invalid_branch_name_ending_with_lock(
            prefix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}.lock", prefix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn test_is_invalid_branch_name_with_consecutive_dots(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}..{}", prefix, suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn test_is_invalid_branch_name_with_special_chars(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+",
            special_char in r"[\*:\?\[\\^~ ]"
        ) {
            let branch_name = format!("{}{}{}", prefix, special_char, suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }
    }

    #[test]
    fn test_is_invalid_branch_name_empty() {
        assert!(BranchName::try_parse("").is_err());
    }

    #[test]
    fn test_sym_ref_name_round_trip() {
        let branch = BranchName::try_parse("feature/login").unwrap();
        let sym_ref = SymRefName::from_branch(&branch);

        assert_eq!(sym_ref.as_ref_path(), "refs/heads/feature/login");
        assert_eq!(
            BranchName::try_parse_sym_ref_name(&sym_ref).unwrap(),
            Some(branch)
        );
        assert_eq!(
            BranchName::try_parse_sym_ref_name(&SymRefName::new("HEAD".to_string())).unwrap(),
            None
        );
    }
}
