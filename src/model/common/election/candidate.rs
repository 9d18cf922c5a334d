use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A candidate standing in an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Candidate name, also used as the candidate's ID when voting.
    pub name: String,
    #[serde(default)]
    pub party: String,
    /// Short form of the party name.
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub slogan: String,
}

impl Display for Candidate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.abbreviation.is_empty() {
            write!(f, " ({})", self.abbreviation)?;
        } else if !self.party.is_empty() {
            write!(f, " ({})", self.party)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod examples {
    use super::*;

    impl Candidate {
        pub fn example1() -> Self {
            Self {
                name: "Chris Riches".to_string(),
                party: "Quidditch Party".to_string(),
                abbreviation: "QP".to_string(),
                slogan: "Catch the snitch".to_string(),
            }
        }

        pub fn example2() -> Self {
            Self {
                name: "Parry Hotter".to_string(),
                party: "Moongolf Alliance".to_string(),
                abbreviation: "".to_string(),
                slogan: "Hole in one".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefers_abbreviation() {
        assert_eq!(Candidate::example1().to_string(), "Chris Riches (QP)");
        assert_eq!(
            Candidate::example2().to_string(),
            "Parry Hotter (Moongolf Alliance)"
        );
    }

    #[test]
    fn optional_fields_default() {
        let candidate: Candidate = serde_json::from_str(r#"{"name": "Jane Doe"}"#).unwrap();
        assert_eq!(candidate.name, "Jane Doe");
        assert!(candidate.party.is_empty());
        assert!(candidate.slogan.is_empty());
    }
}
