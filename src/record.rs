use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("malformed record {0:?}: expected a user id and a friend list")]
    Malformed(String),
}

/// One parsed input line: a user and the friends that user lists.
///
/// `friend_ids` keeps input order and duplicates; deduplication happens in
/// the reducer, where the lists become sets.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub friend_ids: Vec<String>,
}

impl UserRecord {
    pub fn new(user_id: String, friend_ids: Vec<String>) -> Self {
        UserRecord {
            user_id,
            friend_ids,
        }
    }

    /// Parses a line of the form `<userId><ws><f1>,<f2>,...`.
    ///
    /// Fields past the second are ignored. Trailing empty segments of the
    /// friend field are discarded, so `A B,C,` lists `["B", "C"]` and `A ,`
    /// lists no friends at all.
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let mut fields = line.split_whitespace();
        let user_id = match fields.next() {
            Some(f) => f,
            None => return Err(RecordError::Malformed(line.to_string())),
        };
        let friend_field = match fields.next() {
            Some(f) => f,
            None => return Err(RecordError::Malformed(line.to_string())),
        };

        let mut friend_ids: Vec<String> =
            friend_field.split(',').map(str::to_string).collect();
        while friend_ids.last().is_some_and(|f| f.is_empty()) {
            friend_ids.pop();
        }

        Ok(UserRecord::new(user_id.to_string(), friend_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_and_friends() {
        let rec = UserRecord::parse("A B,C,D").unwrap();
        assert_eq!(rec.user_id, "A");
        assert_eq!(rec.friend_ids, vec!["B", "C", "D"]);
    }

    #[test]
    fn keeps_duplicates_and_order() {
        let rec = UserRecord::parse("A\tC,B,C").unwrap();
        assert_eq!(rec.friend_ids, vec!["C", "B", "C"]);
    }

    #[test]
    fn single_field_is_malformed() {
        assert!(UserRecord::parse("A").is_err());
        assert!(UserRecord::parse("A   ").is_err());
        assert!(UserRecord::parse("").is_err());
    }

    #[test]
    fn trailing_comma_adds_no_empty_friend_id() {
        let rec = UserRecord::parse("A B,C,").unwrap();
        assert_eq!(rec.friend_ids, vec!["B", "C"]);
        let rec = UserRecord::parse("A B,,").unwrap();
        assert_eq!(rec.friend_ids, vec!["B"]);
    }

    #[test]
    fn all_empty_friend_field_yields_zero_friends() {
        let rec = UserRecord::parse("A ,").unwrap();
        assert!(rec.friend_ids.is_empty());
        let rec = UserRecord::parse("A ,,,").unwrap();
        assert!(rec.friend_ids.is_empty());
    }

    #[test]
    fn interior_empty_segments_are_kept() {
        let rec = UserRecord::parse("A B,,C").unwrap();
        assert_eq!(rec.friend_ids, vec!["B", "", "C"]);
    }

    #[test]
    fn ignores_fields_past_the_second() {
        let rec = UserRecord::parse("A B,C trailing junk").unwrap();
        assert_eq!(rec.friend_ids, vec!["B", "C"]);
    }
}
