//! Plain-text rendering of API records for the terminal

use chrono::{DateTime, Utc};

use crate::data::{Department, Person};

/// Notice printed when reads are served from the cache
pub const OFFLINE_NOTICE: &str =
    "No internet connection. You will only see cached data until you have an active internet connection again.";

/// Formats people as an aligned table: id, name, department, phone
pub fn format_people(people: &[Person]) -> String {
    if people.is_empty() {
        return "No people found.".to_string();
    }

    let name_width = people
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let dept_width = people
        .iter()
        .map(|p| p.department_name().chars().count())
        .max()
        .unwrap_or(0)
        .max("DEPARTMENT".len());

    let mut lines = vec![format!(
        "{:>5}  {:<name_width$}  {:<dept_width$}  PHONE",
        "ID", "NAME", "DEPARTMENT"
    )];
    for p in people {
        lines.push(format!(
            "{:>5}  {:<name_width$}  {:<dept_width$}  {}",
            p.id,
            p.name,
            p.department_name(),
            p.phone.as_deref().unwrap_or("")
        ));
    }
    lines.join("\n")
}

/// Formats every known field of one person
pub fn format_person(person: &Person) -> String {
    let mut lines = vec![
        format!("ID:         {}", person.id),
        format!("Name:       {}", person.name),
        format!("Department: {}", person.department_name()),
    ];
    if let Some(phone) = &person.phone {
        lines.push(format!("Phone:      {}", phone));
    }
    if let Some(address) = person.address() {
        lines.push(format!("Address:    {}", address));
    }
    lines.join("\n")
}

pub fn format_departments(departments: &[Department]) -> String {
    if departments.is_empty() {
        return "No departments found.".to_string();
    }
    departments
        .iter()
        .map(|d| format!("{:>5}  {}", d.id, d.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Human-readable age of a cached entry, e.g. "12 minutes ago"
pub fn format_age(stored_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - stored_at).num_minutes().max(0);
    match minutes {
        0 => "just now".to_string(),
        1 => "1 minute ago".to_string(),
        m if m < 60 => format!("{} minutes ago", m),
        m => format!("{}h {}m ago", m / 60, m % 60),
    }
}
