mod login;
pub use login::Login;

mod notes;
pub use notes::Notes;
