use crate::domain::{Book, Person};
use crate::errors::{FlowError, Result};

pub struct PersonService;

impl PersonService {
    pub fn add(book: &mut Book, person: Person) -> Result<String> {
        if person.id.trim().is_empty() {
            return Err(FlowError::InvalidInput("person id must not be empty".into()));
        }
        if book.person(&person.id).is_some() {
            return Err(FlowError::InvalidInput(format!(
                "person {} already exists",
                person.id
            )));
        }
        Ok(book.add_person(person))
    }

    pub fn get<'a>(book: &'a Book, id: &str) -> Result<&'a Person> {
        book.person(id)
            .ok_or_else(|| FlowError::PersonNotFound(id.to_string()))
    }

    pub fn list(book: &Book) -> Vec<&Person> {
        let mut people: Vec<&Person> = book.people.iter().collect();
        people.sort_by(|a, b| a.name.cmp(&b.name));
        people
    }
}
