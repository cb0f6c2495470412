//! Demos combining a person with their comments.
//!
//! Both halves come from `Single::from_callable`, so nothing is built before
//! the subscription starts. The three demos differ only in how the halves are
//! joined.

use super::models::{CommentList, Person, PersonWithComments};
use super::{DemoEnv, DemoError, await_termination};
use crate::single::Single;
use crate::subscriber::Subscriber;
use crate::traits::publisher::Publisher;
use std::sync::Arc;

/// The comments attached to the demo user, in order.
pub const COMMENTS: [&str; 3] = [
  "Hola pepe, qué tal!",
  "Mañana voy a la playa",
  "Estoy tomando el curso de spring con reactor",
];

/// The demo user.
pub fn user() -> Single<Person> {
  Single::from_callable(|| Ok(Person::new("John", "Doe")))
}

/// The demo user's comments.
pub fn user_comments() -> Single<CommentList> {
  Single::from_callable(|| {
    let mut comments = CommentList::new();
    for comment in COMMENTS {
      comments.append(comment);
    }
    Ok(comments)
  })
}

async fn log_combined(combined: Single<PersonWithComments>, env: &DemoEnv) -> Result<(), DemoError> {
  let sink = Arc::clone(env.sink());
  let subscription = combined.subscribe_on(
    Arc::clone(env.scheduler()),
    Subscriber::new().on_next(move |combined: PersonWithComments| sink.info(&combined.to_string())),
  );
  await_termination(subscription, env).await
}

/// Zips the user with their comments through a combiner.
pub async fn zip_with(env: &DemoEnv) -> Result<(), DemoError> {
  log_combined(user().zip_with(user_comments(), PersonWithComments::new), env).await
}

/// Zips the user with their comments into a tuple, then maps the tuple.
pub async fn zip_with_tuple(env: &DemoEnv) -> Result<(), DemoError> {
  let combined = user()
    .zip(user_comments())
    .map(|(person, comments)| PersonWithComments::new(person, comments));
  log_combined(combined, env).await
}

/// Flat-maps the user into their comments.
pub async fn user_comments_flat_map(env: &DemoEnv) -> Result<(), DemoError> {
  let comments = user_comments();
  let combined = user().flat_map(move |person| {
    comments.map(move |comments| PersonWithComments::new(person.clone(), comments))
  });
  log_combined(combined, env).await
}
