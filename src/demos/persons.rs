//! Demos over a fixed list of persons.

use super::models::Person;
use super::{DemoEnv, DemoError, await_termination};
use crate::error::Cause;
use crate::multi::Multi;
use crate::single::Single;
use crate::subscriber::Subscriber;
use crate::traits::publisher::Publisher;
use std::sync::Arc;
use tracing::debug;

/// Full names fed to the person demos.
pub const FULL_NAMES: [&str; 7] = [
  "Andres Fonseca",
  "Pedro Fulano",
  "Maria Fulana",
  "Diego Sultano",
  "Juan Mengano",
  "Bruce Lee",
  "Bruce Willis",
];

/// Logged by [`iterable`] once the stream completes.
pub const COMPLETION_LINE: &str = "Ha finalizado la ejecución del observable con éxito!";

fn full_names() -> Multi<&'static str> {
  Multi::from_iterable(FULL_NAMES)
}

fn parsed_persons() -> Multi<Person> {
  full_names().try_map(|name| Person::parse_upper(name).map_err(Cause::new))
}

fn is_bruce(person: &Person) -> bool {
  person.given_name().eq_ignore_ascii_case("bruce")
}

/// The persons of [`FULL_NAMES`] with their original casing.
pub fn persons() -> Vec<Person> {
  FULL_NAMES
    .iter()
    .filter_map(|name| name.split_once(' '))
    .map(|(given, family)| Person::new(given, family))
    .collect()
}

/// Parses the names, keeps the Bruces and logs them with a lower-cased given
/// name, followed by a completion line.
pub async fn iterable(env: &DemoEnv) -> Result<(), DemoError> {
  let people = parsed_persons()
    .filter(is_bruce)
    .try_do_on_next(|person| {
      if person.given_name().is_empty() {
        return Err(Cause::msg("Nombres no pueden ser vacíos"));
      }
      debug!(given = person.given_name(), family = person.family_name(), "selected");
      Ok(())
    })
    .map(Person::with_lowercase_given_name);

  let (on_next, on_error, on_complete) = (
    Arc::clone(env.sink()),
    Arc::clone(env.sink()),
    Arc::clone(env.sink()),
  );
  let subscription = people.subscribe_on(
    Arc::clone(env.scheduler()),
    Subscriber::new()
      .on_next(move |person: Person| on_next.info(&person.to_string()))
      .on_error(move |cause| on_error.error(&cause.message()))
      .on_complete(move || on_complete.info(COMPLETION_LINE)),
  );
  await_termination(subscription, env).await
}

/// Like [`iterable`], selecting each person through a flat-map into a
/// `Single` or an empty one.
pub async fn flat_map(env: &DemoEnv) -> Result<(), DemoError> {
  let people = parsed_persons()
    .filter(is_bruce)
    .flat_map(|person| {
      if is_bruce(&person) {
        Single::just(person)
      } else {
        Single::empty()
      }
    })
    .map(Person::with_lowercase_given_name);

  let sink = Arc::clone(env.sink());
  let subscription = people.subscribe_on(
    Arc::clone(env.scheduler()),
    Subscriber::new().on_next(move |person: Person| sink.info(&person.to_string())),
  );
  await_termination(subscription, env).await
}

/// Upper-cases every full name, keeps those containing `BRUCE` and logs them
/// in lower case.
pub async fn to_string(env: &DemoEnv) -> Result<(), DemoError> {
  let names = Multi::from_iterable(persons())
    .map(|person| format!("{} {}", person.given_name(), person.family_name()).to_uppercase())
    .flat_map(|name| {
      if name.contains("BRUCE") {
        Single::just(name)
      } else {
        Single::empty()
      }
    })
    .map(|name| name.to_lowercase());

  let sink = Arc::clone(env.sink());
  let subscription = names.subscribe_on(
    Arc::clone(env.scheduler()),
    Subscriber::new().on_next(move |name: String| sink.info(&name)),
  );
  await_termination(subscription, env).await
}

/// Gathers every person into one list and logs it as a single line.
pub async fn collect_list(env: &DemoEnv) -> Result<(), DemoError> {
  let batch = Multi::from_iterable(persons()).collect_list();

  let sink = Arc::clone(env.sink());
  let subscription = batch.subscribe_on(
    Arc::clone(env.scheduler()),
    Subscriber::new().on_next(move |people: Vec<Person>| sink.info(&format_batch(&people))),
  );
  await_termination(subscription, env).await
}

/// Renders a batch of persons as `[first, second, ...]`.
pub fn format_batch(people: &[Person]) -> String {
  let items: Vec<String> = people.iter().map(Person::to_string).collect();
  format!("[{}]", items.join(", "))
}
