mod page;
mod user;

pub use page::Page;
pub use user::{NewUser, User, UserChangeset, UserDraft, UserFilter, UserRow};
