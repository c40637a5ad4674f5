use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

mod repository;

pub use repository::CustomerRepository;

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum CustomerError {
    #[error("ID must not be empty")]
    EmptyIdentifier,
    #[error("ID is not valid")]
    InvalidIdentifier,
    #[error("{0} cannot be null or empty")]
    EmptyField(CustomerField),
    #[error("Email is not valid")]
    InvalidEmail,
    #[error("Birthdate is not valid")]
    InvalidDate,
    #[error("Birthdate cannot be after today")]
    FutureDate,
    #[error("Index is not valid")]
    InvalidIndex,
    #[error("Customer not found")]
    NotFound,
}

impl CustomerError {
    /// True for errors caused by malformed input rather than a missing record.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Mandatory customer fields, in the order validation checks them.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CustomerField {
    Id,
    Name,
    Surname,
    Email,
    Birthdate,
}

impl CustomerField {
    pub const ALL: [Self; 5] = [Self::Id, Self::Name, Self::Surname, Self::Email, Self::Birthdate];
}

impl Display for CustomerField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Id => "ID",
            Self::Name => "Name",
            Self::Surname => "Surname",
            Self::Email => "Email",
            Self::Birthdate => "Birthdate",
        };
        f.write_str(label)
    }
}

/// One customer record as exchanged over the wire and kept in the repository.
///
/// Missing or `null` keys decode to the empty string, which validation then
/// reports as an empty field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct Customer {
    #[serde(default, deserialize_with = "empty_when_null")]
    pub id: String,
    #[serde(default, deserialize_with = "empty_when_null")]
    pub name: String,
    #[serde(default, deserialize_with = "empty_when_null")]
    pub surname: String,
    #[serde(default, deserialize_with = "empty_when_null")]
    pub email: String,
    #[serde(default, deserialize_with = "empty_when_null")]
    pub birthdate: String,
}

fn empty_when_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Customer {
    #[must_use]
    pub fn field(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::Id => &self.id,
            CustomerField::Name => &self.name,
            CustomerField::Surname => &self.surname,
            CustomerField::Email => &self.email,
            CustomerField::Birthdate => &self.birthdate,
        }
    }

    /// Validate the record against today's UTC date.
    ///
    /// # Errors
    /// Returns the first violation found: an empty field (checked in
    /// [`CustomerField::ALL`] order), then [`CustomerError::InvalidEmail`],
    /// then [`CustomerError::InvalidDate`] or [`CustomerError::FutureDate`].
    pub fn validate(&self) -> Result<(), CustomerError> {
        self.validate_as_of(OffsetDateTime::now_utc().date())
    }

    /// Same as [`Customer::validate`] with an explicit reference date.
    ///
    /// # Errors
    /// See [`Customer::validate`].
    pub fn validate_as_of(&self, today: Date) -> Result<(), CustomerError> {
        let empty = CustomerField::ALL.into_iter().find(|field| self.field(*field).is_empty());
        if let Some(field) = empty {
            return Err(CustomerError::EmptyField(field));
        }

        if !is_valid_email(&self.email) {
            return Err(CustomerError::InvalidEmail);
        }

        let birthdate = parse_birthdate(&self.birthdate)?;
        if birthdate > today {
            return Err(CustomerError::FutureDate);
        }

        Ok(())
    }

    /// Copy every mutable field from `source`; the identifier is kept.
    pub fn apply_update(&mut self, source: &Customer) {
        self.name.clone_from(&source.name);
        self.surname.clone_from(&source.surname);
        self.email.clone_from(&source.email);
        self.birthdate.clone_from(&source.birthdate);
    }
}

/// Check a raw identifier from a request path.
///
/// # Errors
/// Returns [`CustomerError::EmptyIdentifier`] for the empty string and
/// [`CustomerError::InvalidIdentifier`] when the value is not a base-10
/// non-negative integer.
pub fn validate_id(id: &str) -> Result<u64, CustomerError> {
    if id.is_empty() {
        return Err(CustomerError::EmptyIdentifier);
    }
    id.parse::<u64>().map_err(|_| CustomerError::InvalidIdentifier)
}

/// Parse a `YYYY-MM-DD` birth date.
///
/// # Errors
/// Returns [`CustomerError::InvalidDate`] when the value is not a calendar date
/// in that format.
pub fn parse_birthdate(value: &str) -> Result<Date, CustomerError> {
    // `[year]` also takes a leading sign.
    if !value.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(CustomerError::InvalidDate);
    }
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|_| CustomerError::InvalidDate)
}

/// Accepts an RFC 5322 mailbox: `local@domain`, optionally wrapped as
/// `Display Name <local@domain>`.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    match value.strip_suffix('>') {
        Some(rest) => {
            let Some((display_name, address)) = rest.split_once('<') else {
                return false;
            };
            is_display_name(display_name.trim()) && is_addr_spec(address)
        }
        None => is_addr_spec(value),
    }
}

fn is_addr_spec(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    (is_dot_atom(local) || is_quoted_string(local))
        && (is_dot_atom(domain) || is_domain_literal(domain))
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(c) || !c.is_ascii()
}

fn is_dot_atom(value: &str) -> bool {
    !value.is_empty()
        && value.split('.').all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

fn is_quoted_string(value: &str) -> bool {
    let Some(inner) = value.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) else {
        return false;
    };
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if chars.next().is_none() {
                    return false;
                }
            }
            '"' => return false,
            c if c.is_control() => return false,
            _ => {}
        }
    }
    true
}

fn is_domain_literal(value: &str) -> bool {
    value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .is_some_and(|inner| !inner.contains(['[', ']', '\\']))
}

fn is_display_name(value: &str) -> bool {
    value.is_empty()
        || is_quoted_string(value)
        || value
            .split_whitespace()
            .all(|word| word.split('.').all(|part| part.chars().all(is_atext)))
}
