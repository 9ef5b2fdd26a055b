use diesel::prelude::*;
use jiff::civil::Date;
use jiff_diesel::ToDiesel;

/// A persisted user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub birthdate: Date,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Candidate values for a user before validation.
///
/// Every field is optional: drafts come from request bodies (where callers may
/// omit anything) and from merging a patch onto an existing record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub birthdate: Option<Date>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl From<User> for UserDraft {
    fn from(user: User) -> Self {
        Self {
            email: Some(user.email),
            firstname: Some(user.firstname),
            lastname: Some(user.lastname),
            birthdate: Some(user.birthdate),
            address: user.address,
            phone_number: user.phone_number,
        }
    }
}

/// User values that passed validation and are ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub birthdate: Date,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl NewUser {
    /// Attaches a storage-assigned id.
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            email: self.email,
            firstname: self.firstname,
            lastname: self.lastname,
            birthdate: self.birthdate,
            address: self.address,
            phone_number: self.phone_number,
        }
    }
}

/// Row filter understood by every storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFilter {
    /// The whole collection.
    NoFilter,
    /// Users born in the half-open interval `[from, to)`.
    DateRange { from: Date, to: Date },
}

impl UserFilter {
    /// Returns true when the user belongs to the filtered set.
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserFilter::NoFilter => true,
            UserFilter::DateRange { from, to } => user.birthdate >= *from && user.birthdate < *to,
        }
    }
}

/// User row as read from the `users` table.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub birthdate: jiff_diesel::Date,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            firstname: row.firstname,
            lastname: row.lastname,
            birthdate: row.birthdate.to_jiff(),
            address: row.address,
            phone_number: row.phone_number,
        }
    }
}

/// Column values for INSERT and full-row UPDATE.
///
/// `treat_none_as_null` makes an update clear optional columns instead of
/// leaving them untouched.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
#[diesel(treat_none_as_null = true)]
pub struct UserChangeset<'a> {
    pub email: &'a str,
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub birthdate: jiff_diesel::Date,
    pub address: Option<&'a str>,
    pub phone_number: Option<&'a str>,
}

impl<'a> From<&'a NewUser> for UserChangeset<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            email: &user.email,
            firstname: &user.firstname,
            lastname: &user.lastname,
            birthdate: user.birthdate.to_diesel(),
            address: user.address.as_deref(),
            phone_number: user.phone_number.as_deref(),
        }
    }
}
