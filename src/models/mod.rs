mod film;
mod patch;
mod user;

pub use film::{Film, FilmPatch, NewFilm};
pub use patch::Patch;
pub use user::{NewUser, User, UserPatch};
