//! Value records used by the demos.

use std::fmt;
use thiserror::Error;

/// Errors raised while building demo records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
  /// A full name without a family name.
  #[error("expected a given and a family name, got {0:?}")]
  MalformedName(String),
}

/// A person with a given and a family name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
  given_name: String,
  family_name: String,
}

impl Person {
  /// Creates a person.
  pub fn new(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
    Self {
      given_name: given_name.into(),
      family_name: family_name.into(),
    }
  }

  /// Splits `"Given Family"` at the first space, upper-casing both parts.
  pub fn parse_upper(full_name: &str) -> Result<Self, ModelError> {
    match full_name.split_once(' ') {
      Some((given, family)) if !given.is_empty() && !family.is_empty() => {
        Ok(Self::new(given.to_uppercase(), family.to_uppercase()))
      }
      _ => Err(ModelError::MalformedName(full_name.to_string())),
    }
  }

  /// The given name.
  pub fn given_name(&self) -> &str {
    &self.given_name
  }

  /// The family name.
  pub fn family_name(&self) -> &str {
    &self.family_name
  }

  /// The same person with the given name in lower case.
  pub fn with_lowercase_given_name(mut self) -> Self {
    self.given_name = self.given_name.to_lowercase();
    self
  }
}

impl fmt::Display for Person {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Person [given_name={}, family_name={}]",
      self.given_name, self.family_name
    )
  }
}

/// An ordered list of comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentList {
  comments: Vec<String>,
}

impl CommentList {
  /// An empty list.
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a comment at the end.
  pub fn append(&mut self, comment: impl Into<String>) {
    self.comments.push(comment.into());
  }

  /// The comments in insertion order.
  pub fn comments(&self) -> &[String] {
    &self.comments
  }
}

impl fmt::Display for CommentList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "CommentList [comments=[{}]]", self.comments.join(", "))
  }
}

/// A person together with their comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonWithComments {
  person: Person,
  comments: CommentList,
}

impl PersonWithComments {
  /// Pairs `person` with `comments`.
  pub fn new(person: Person, comments: CommentList) -> Self {
    Self { person, comments }
  }

  /// The person.
  pub fn person(&self) -> &Person {
    &self.person
  }

  /// Their comments.
  pub fn comments(&self) -> &CommentList {
    &self.comments
  }
}

impl fmt::Display for PersonWithComments {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "PersonWithComments [person={}, comments={}]",
      self.person, self.comments
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_upper() {
    let person = Person::parse_upper("Bruce Lee").unwrap();
    assert_eq!(person, Person::new("BRUCE", "LEE"));
    assert_eq!(
      person.with_lowercase_given_name().to_string(),
      "Person [given_name=bruce, family_name=LEE]"
    );
  }

  #[test]
  fn test_parse_upper_rejects_single_word() {
    assert_eq!(
      Person::parse_upper("Cher"),
      Err(ModelError::MalformedName("Cher".to_string()))
    );
  }

  #[test]
  fn test_comment_list_display() {
    let mut comments = CommentList::new();
    comments.append("uno");
    comments.append("dos");
    assert_eq!(comments.comments(), ["uno", "dos"]);
    let combined = PersonWithComments::new(Person::new("John", "Doe"), comments);
    assert_eq!(
      combined.to_string(),
      "PersonWithComments [person=Person [given_name=John, family_name=Doe], comments=CommentList [comments=[uno, dos]]]"
    );
  }
}
