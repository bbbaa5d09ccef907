//! Domain entities returned by the forum API.

mod category;
mod comment;
mod post;
mod profile;
mod user;

pub use category::Category;
pub use comment::{Comment, Subcomment};
pub use post::Post;
pub use profile::Profile;
pub use user::{Role, User};

pub(crate) use profile::profile_key;
