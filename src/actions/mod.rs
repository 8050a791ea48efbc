pub mod login;
pub mod regenerate_token;
pub mod update_user;

pub use login::LoginAction;
pub use regenerate_token::RegenerateTokenAction;
pub use update_user::{UpdateUserAction, UserChanges};
